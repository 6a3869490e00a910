//! CSS class completion inside a class argument.

use camino::Utf8Path;
use elem_css::ProjectClassIndex;
use elem_php::is_class_argument;
use elem_source::LineIndex;
use elem_source::Offset;
use elem_source::PositionEncoding;
use serde::Serialize;
use tower_lsp_server::ls_types;

use crate::context::ProjectContext;
use crate::converters::completion_to_lsp;
use crate::converters::position_to_offset;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CompletionKind {
    CssClass,
}

/// A suggestion and how the host should display it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub label: String,
    pub kind: CompletionKind,
    pub bold: bool,
}

impl Completion {
    #[must_use]
    pub fn css_class(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: CompletionKind::CssClass,
            bold: true,
        }
    }

    #[must_use]
    pub fn detail(&self) -> &'static str {
        match self.kind {
            CompletionKind::CssClass => "CSS class",
        }
    }
}

/// Every known class name, when `offset` sits inside the class argument of a
/// helper call. Empty otherwise.
pub fn completions_for<C: ProjectContext>(
    ctx: &C,
    path: &Utf8Path,
    offset: Offset,
) -> Vec<Completion> {
    let Some((call, index)) = ctx.call_site_at(path, offset) else {
        return Vec::new();
    };
    let Some(argument) = call.arguments().get(index) else {
        return Vec::new();
    };
    if !is_class_argument(ctx.catalog(), &call, argument) {
        tracing::trace!(
            "{} at {} is not a class argument",
            call.function_name(),
            offset.get()
        );
        return Vec::new();
    }

    let index = ProjectClassIndex::build(ctx);
    if !index.is_complete() {
        tracing::debug!("Class index incomplete, returning partial completions");
    }
    index.variants().into_iter().map(Completion::css_class).collect()
}

/// Answer an LSP completion request for the file at `path`.
pub fn handle_completion<C: ProjectContext>(
    ctx: &C,
    path: &Utf8Path,
    position: ls_types::Position,
    encoding: PositionEncoding,
) -> Option<ls_types::CompletionResponse> {
    let text = match ctx.read_text(path) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!("Cannot complete in {}: {}", path, err);
            return None;
        }
    };
    let line_index = LineIndex::from_text(&text);
    let offset = position_to_offset(position, &text, &line_index, encoding)?;

    let items: Vec<ls_types::CompletionItem> = completions_for(ctx, path, offset)
        .iter()
        .map(completion_to_lsp)
        .collect();
    if items.is_empty() {
        return None;
    }
    Some(ls_types::CompletionResponse::Array(items))
}
