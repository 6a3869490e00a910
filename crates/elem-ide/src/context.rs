use camino::Utf8Path;
use elem_css::StylesheetHost;
use elem_php::CallSite;
use elem_php::HelperFunctionCatalog;
use elem_source::Offset;

/// Everything a query needs to know about the project it runs against.
///
/// Passed explicitly into each completion or navigation request; nothing is
/// cached between requests.
pub trait ProjectContext: StylesheetHost {
    fn catalog(&self) -> &HelperFunctionCatalog;

    /// The call whose string argument contains `offset` in the file at
    /// `path`, and the index of that argument. `None` when the cursor is not
    /// inside a string argument of any call.
    fn call_site_at(&self, path: &Utf8Path, offset: Offset) -> Option<(CallSite, usize)>;
}
