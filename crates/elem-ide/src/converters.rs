//! Convert internal IDE types to LSP types

use camino::Utf8Path;
use elem_css::ClassDefinition;
use elem_source::LineCol;
use elem_source::LineIndex;
use elem_source::Offset;
use elem_source::PositionEncoding;
use elem_source::Span;
use tower_lsp_server::ls_types;

use crate::completions::Completion;
use crate::completions::CompletionKind;

#[must_use]
pub fn span_to_lsp_range(
    span: Span,
    text: &str,
    line_index: &LineIndex,
    encoding: PositionEncoding,
) -> ls_types::Range {
    let start = line_index.to_line_col(span.start_offset(), text, encoding);
    let end = line_index.to_line_col(span.end_offset(), text, encoding);

    ls_types::Range {
        start: ls_types::Position {
            line: start.line(),
            character: start.column(),
        },
        end: ls_types::Position {
            line: end.line(),
            character: end.column(),
        },
    }
}

#[must_use]
pub fn position_to_offset(
    position: ls_types::Position,
    text: &str,
    line_index: &LineIndex,
    encoding: PositionEncoding,
) -> Option<Offset> {
    line_index.offset(
        LineCol::new(position.line, position.character),
        text,
        encoding,
    )
}

#[must_use]
pub fn completion_to_lsp(completion: &Completion) -> ls_types::CompletionItem {
    let kind = match completion.kind {
        CompletionKind::CssClass => ls_types::CompletionItemKind::CLASS,
    };
    ls_types::CompletionItem {
        label: completion.label.clone(),
        kind: Some(kind),
        detail: Some(completion.detail().to_string()),
        ..Default::default()
    }
}

#[must_use]
pub fn path_to_uri(path: &Utf8Path) -> Option<ls_types::Uri> {
    ls_types::Uri::from_file_path(path.as_std_path())
}

/// `target_text` is the content of the stylesheet the definition points into.
#[must_use]
pub fn definition_to_location(
    definition: &ClassDefinition,
    target_text: &str,
    encoding: PositionEncoding,
) -> Option<ls_types::Location> {
    let uri = path_to_uri(definition.path())?;
    let line_index = LineIndex::from_text(target_text);
    Some(ls_types::Location {
        uri,
        range: span_to_lsp_range(definition.span(), target_text, &line_index, encoding),
    })
}
