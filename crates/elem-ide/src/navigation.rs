use camino::Utf8Path;
use elem_css::ClassDefinition;
use elem_source::LineIndex;
use elem_source::Offset;
use elem_source::PositionEncoding;
use tower_lsp_server::ls_types;

use crate::context::ProjectContext;
use crate::converters::definition_to_location;
use crate::converters::position_to_offset;
use crate::references::references_for;
use crate::references::ClassReference;

/// The class name under the cursor, if it sits in a class argument.
pub fn reference_at<C: ProjectContext>(
    ctx: &C,
    path: &Utf8Path,
    offset: Offset,
) -> Option<ClassReference> {
    let (call, index) = ctx.call_site_at(path, offset)?;
    let argument = call.arguments().get(index)?;
    references_for(ctx.catalog(), &call, argument)
        .into_iter()
        .find(|reference| reference.contains(offset))
}

/// Where the class under the cursor is declared.
pub fn get_reference_at<C: ProjectContext>(
    ctx: &C,
    path: &Utf8Path,
    offset: Offset,
) -> Option<ClassDefinition> {
    let reference = reference_at(ctx, path, offset)?;
    let definition = reference.resolve(ctx);
    if definition.is_none() {
        tracing::debug!("No stylesheet declares `.{}`", reference.name());
    }
    definition
}

/// Answer an LSP definition request. Every declaration of the class is
/// returned, the one [`get_reference_at`] would pick first.
pub fn goto_definition<C: ProjectContext>(
    ctx: &C,
    path: &Utf8Path,
    position: ls_types::Position,
    encoding: PositionEncoding,
) -> Option<ls_types::GotoDefinitionResponse> {
    let text = ctx.read_text(path).ok()?;
    let line_index = LineIndex::from_text(&text);
    let offset = position_to_offset(position, &text, &line_index, encoding)?;

    let reference = reference_at(ctx, path, offset)?;
    tracing::debug!("Found class reference: '{}'", reference.name());

    let mut locations: Vec<ls_types::Location> = reference
        .resolve_all(ctx)
        .iter()
        .filter_map(|definition| {
            let target = match ctx.read_text(definition.path()) {
                Ok(target) => target,
                Err(err) => {
                    tracing::warn!("Cannot read {}: {}", definition.path(), err);
                    return None;
                }
            };
            definition_to_location(definition, &target, encoding)
        })
        .collect();

    match locations.len() {
        0 => None,
        1 => locations.pop().map(ls_types::GotoDefinitionResponse::Scalar),
        _ => Some(ls_types::GotoDefinitionResponse::Array(locations)),
    }
}
