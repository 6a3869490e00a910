use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use elem_conf::ConfigError;
use elem_conf::Settings;
use elem_css::StylesheetHost;
use elem_ide::ProjectContext;
use elem_php::calls::call_site_at;
use elem_php::CallSite;
use elem_php::HelperFunctionCatalog;
use elem_source::FileKind;
use elem_source::FileSystem;
use elem_source::Offset;
use elem_source::OsFileSystem;

use crate::buffers::Buffers;
use crate::document::TextDocument;
use crate::fs::WorkspaceFileSystem;
use crate::walk::canonical;
use crate::walk::exclusions;
use crate::walk::walk_files;
use crate::walk::WalkOptions;

/// A project rooted at a directory, with its settings and open buffers.
pub struct Workspace {
    root: Utf8PathBuf,
    settings: Settings,
    catalog: HelperFunctionCatalog,
    buffers: Buffers,
    fs: WorkspaceFileSystem,
    cancelled: Arc<AtomicBool>,
}

impl Workspace {
    /// Open the project at `root`, loading its settings.
    pub fn load(root: &Utf8Path) -> Result<Self, ConfigError> {
        let settings = Settings::new(root.as_std_path())?;
        Ok(Self::new(root, settings))
    }

    #[must_use]
    pub fn new(root: &Utf8Path, settings: Settings) -> Self {
        Self::with_file_system(root, settings, Arc::new(OsFileSystem))
    }

    /// Like [`Workspace::new`] but reading files that are not open through
    /// `disk`.
    #[must_use]
    pub fn with_file_system(
        root: &Utf8Path,
        settings: Settings,
        disk: Arc<dyn FileSystem>,
    ) -> Self {
        let root = canonical(root);
        let catalog = HelperFunctionCatalog::from_settings(&settings);
        let buffers = Buffers::new();
        let fs = WorkspaceFileSystem::new(buffers.clone(), disk);
        tracing::debug!(
            "Workspace at {} with {} helper functions",
            root,
            catalog.len()
        );
        Self {
            root,
            settings,
            catalog,
            buffers,
            fs,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn buffers(&self) -> &Buffers {
        &self.buffers
    }

    pub fn open_document(&self, path: Utf8PathBuf, content: String, version: i32) {
        tracing::trace!(
            "Opened {} ({:?}) at version {}",
            path,
            self.file_kind(&path),
            version
        );
        self.buffers.open(path, TextDocument::new(content, version));
    }

    pub fn close_document(&self, path: &Utf8Path) -> Option<TextDocument> {
        self.buffers.close(path)
    }

    /// Flag shared with whoever may want to abandon a running query. Index
    /// builds check it between files.
    #[must_use]
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn reset_cancellation(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }

    #[must_use]
    pub fn file_kind(&self, path: &Utf8Path) -> FileKind {
        FileKind::from_path(path, &self.settings.stylesheet_extensions)
    }

    fn is_excluded(&self, path: &Utf8Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return true;
        };
        let Some(overrides) = exclusions(&self.root, &self.settings.exclude) else {
            return false;
        };
        // a directory glob such as `vendor/` only matches the directory itself
        overrides.matched(relative, false).is_ignore()
            || relative
                .ancestors()
                .skip(1)
                .filter(|dir| !dir.as_str().is_empty())
                .any(|dir| overrides.matched(dir, true).is_ignore())
    }
}

impl StylesheetHost for Workspace {
    fn stylesheet_extensions(&self) -> Vec<String> {
        self.settings.stylesheet_extensions.clone()
    }

    fn enumerate_files(&self, extension: &str) -> Vec<Utf8PathBuf> {
        let has_extension = |path: &Utf8Path| path.extension() == Some(extension);
        let options = WalkOptions {
            exclude: self.settings.exclude.clone(),
            ..WalkOptions::default()
        };

        let mut files = walk_files(&self.root, has_extension, &options);
        files.extend(
            self.buffers
                .paths()
                .into_iter()
                .filter(|path| has_extension(path) && !self.is_excluded(path)),
        );
        files.sort();
        files.dedup();
        files
    }

    fn read_text(&self, path: &Utf8Path) -> io::Result<String> {
        self.fs.read_to_string(path)
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl ProjectContext for Workspace {
    fn catalog(&self) -> &HelperFunctionCatalog {
        &self.catalog
    }

    fn call_site_at(&self, path: &Utf8Path, offset: Offset) -> Option<(CallSite, usize)> {
        if self.file_kind(path) != FileKind::Php {
            return None;
        }
        match self.fs.read_to_string(path) {
            Ok(source) => call_site_at(&source, offset),
            Err(err) => {
                tracing::warn!("Cannot read {}: {}", path, err);
                None
            }
        }
    }
}
