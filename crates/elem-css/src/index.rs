use std::collections::BTreeSet;
use std::io;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use elem_source::Span;
use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::scanner::scan;
use crate::scanner::scan_nodes;
use crate::scanner::ClassToken;
use crate::scanner::ParsedNode;

/// What the index needs from whoever owns the project files.
pub trait StylesheetHost {
    /// Extensions, without the dot, of files that may declare classes.
    fn stylesheet_extensions(&self) -> Vec<String> {
        vec!["css".to_string()]
    }

    /// Every file in scope with the given extension, in a stable order.
    fn enumerate_files(&self, extension: &str) -> Vec<Utf8PathBuf>;

    /// A host-parsed view of the file. `None` means the host has no parser
    /// for it and the raw text is scanned instead.
    fn read_structured_tree(&self, _path: &Utf8Path) -> Option<Vec<ParsedNode>> {
        None
    }

    fn read_text(&self, path: &Utf8Path) -> io::Result<String>;

    /// Checked between files; once it returns `true` the build stops.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Where a class is declared.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ClassDefinition {
    name: String,
    path: Utf8PathBuf,
    span: Span,
}

impl ClassDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, path: Utf8PathBuf, span: Span) -> Self {
        Self {
            name: name.into(),
            path,
            span,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Range of the class name in the stylesheet, excluding the leading `.`.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }
}

/// Snapshot of every class selector declared across a project.
///
/// Built from scratch for each query; holds no reference to the host.
#[derive(Clone, Debug, Default)]
pub struct ProjectClassIndex {
    definitions: FxHashMap<String, Vec<ClassDefinition>>,
    files: usize,
    complete: bool,
}

impl ProjectClassIndex {
    pub fn build(host: &dyn StylesheetHost) -> Self {
        let mut index = Self {
            complete: true,
            ..Self::default()
        };
        let mut seen = FxHashSet::default();

        for extension in host.stylesheet_extensions() {
            for path in host.enumerate_files(&extension) {
                if host.is_cancelled() {
                    tracing::debug!("Class index build cancelled after {} files", index.files);
                    index.complete = false;
                    return index;
                }
                if !seen.insert(path.clone()) {
                    continue;
                }
                index.add_file(host, path);
            }
        }

        tracing::debug!(
            "Indexed {} classes from {} stylesheets",
            index.definitions.len(),
            index.files
        );
        index
    }

    fn add_file(&mut self, host: &dyn StylesheetHost, path: Utf8PathBuf) {
        let tokens: Vec<ClassToken> = match host.read_structured_tree(&path) {
            Some(nodes) => scan_nodes(&nodes).collect(),
            None => match host.read_text(&path) {
                Ok(text) => scan(&text).collect(),
                Err(err) => {
                    tracing::warn!("Skipping unreadable stylesheet {}: {}", path, err);
                    return;
                }
            },
        };

        tracing::trace!("{}: {} class selectors", path, tokens.len());
        self.files += 1;

        for token in tokens {
            let definition = ClassDefinition::new(token.name(), path.clone(), token.span());
            self.definitions
                .entry(token.name().to_string())
                .or_default()
                .push(definition);
        }
    }

    /// The first definition of `name` in enumeration order.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&ClassDefinition> {
        self.definitions.get(name).and_then(|defs| defs.first())
    }

    /// Every definition of `name`, in enumeration order.
    #[must_use]
    pub fn definitions(&self, name: &str) -> &[ClassDefinition] {
        self.definitions
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All known class names.
    #[must_use]
    pub fn variants(&self) -> BTreeSet<&str> {
        self.definitions.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Number of stylesheets that were read successfully.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files
    }

    /// `false` when the host cancelled the build part way.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}
