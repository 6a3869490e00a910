use elem_css::is_class_name;
use elem_css::ClassDefinition;
use elem_css::ProjectClassIndex;
use elem_css::StylesheetHost;
use elem_php::is_class_argument;
use elem_php::Argument;
use elem_php::CallSite;
use elem_php::HelperFunctionCatalog;
use elem_source::Offset;
use elem_source::Span;

/// One class name inside a class argument.
///
/// Resolution is deferred until asked for, and each call rebuilds the class
/// index from the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassReference {
    name: String,
    span: Span,
}

impl ClassReference {
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Range of the class name in the PHP source.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    #[must_use]
    pub fn contains(&self, offset: Offset) -> bool {
        self.span.contains(offset)
    }

    /// The first definition of this class in enumeration order.
    pub fn resolve<H: StylesheetHost>(&self, host: &H) -> Option<ClassDefinition> {
        ProjectClassIndex::build(host).resolve(&self.name).cloned()
    }

    pub fn resolve_all<H: StylesheetHost>(&self, host: &H) -> Vec<ClassDefinition> {
        ProjectClassIndex::build(host).definitions(&self.name).to_vec()
    }

    /// Class names that could stand in this position.
    pub fn variants<H: StylesheetHost>(&self, host: &H) -> Vec<String> {
        ProjectClassIndex::build(host)
            .variants()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// References for each class name in `argument`, or none when it is not the
/// class argument of a helper call.
#[must_use]
pub fn references_for(
    catalog: &HelperFunctionCatalog,
    call: &CallSite,
    argument: &Argument,
) -> Vec<ClassReference> {
    if !is_class_argument(catalog, call, argument) {
        return Vec::new();
    }
    let Some(literal) = argument.value() else {
        return Vec::new();
    };

    literal
        .class_tokens()
        .filter(|token| is_class_name(token.name()))
        .map(|token| ClassReference::new(token.name(), token.span()))
        .collect()
}
