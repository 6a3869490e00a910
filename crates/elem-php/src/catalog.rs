use elem_conf::Settings;
use rustc_hash::FxHashSet;

/// Namespace the Elem helpers are declared in.
pub const ELEM_NAMESPACE: &str = "Epic64\\Elem";

const HELPER_FUNCTIONS: &[&str] = &[
    "div", "span", "p", "a", "h", "img", "button", "input", "form", "label", "ul", "ol", "li",
    "table", "tr", "td", "th", "el", "nav", "header", "footer", "section", "article", "aside",
    "main", "textarea", "select", "option", "body", "html", "head",
];

const CLASS_ARGUMENT: &str = "class";

/// The helper functions whose class argument is cross-referenced.
///
/// Built once from settings and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HelperFunctionCatalog {
    functions: FxHashSet<String>,
    class_argument: String,
}

impl HelperFunctionCatalog {
    pub fn new<I, S>(functions: I, class_argument: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            functions: functions.into_iter().map(Into::into).collect(),
            class_argument: class_argument.into(),
        }
    }

    /// Built-in helpers plus any configured extras.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let functions = HELPER_FUNCTIONS
            .iter()
            .map(|name| (*name).to_string())
            .chain(settings.functions.iter().cloned());
        Self::new(functions, settings.class_argument.clone())
    }

    /// Whether a called function name refers to a helper.
    ///
    /// Unqualified names match directly. Qualified names must live in
    /// [`ELEM_NAMESPACE`]; PHP namespaces are case-insensitive.
    #[must_use]
    pub fn is_helper(&self, function_name: &str) -> bool {
        let trimmed = function_name.trim_start_matches('\\');
        match trimmed.rsplit_once('\\') {
            None => self.functions.contains(trimmed),
            Some((namespace, short)) => {
                namespace.eq_ignore_ascii_case(ELEM_NAMESPACE) && self.functions.contains(short)
            }
        }
    }

    #[must_use]
    pub fn class_argument(&self) -> &str {
        &self.class_argument
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for HelperFunctionCatalog {
    fn default() -> Self {
        Self::new(HELPER_FUNCTIONS.iter().copied(), CLASS_ARGUMENT)
    }
}
