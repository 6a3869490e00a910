use camino::Utf8Path;
use camino::Utf8PathBuf;
use ignore::overrides::Override;
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;

/// Options controlling how [`walk_files`] traverses a project.
#[derive(Clone, Debug, Default)]
pub struct WalkOptions {
    /// Include hidden files and directories (those starting with `.`).
    pub hidden: bool,
    /// Gitignore-style globs to leave out, such as `vendor/**`.
    pub exclude: Vec<String>,
    /// Disable `.gitignore`, `.ignore` and friends.
    pub no_ignore: bool,
    pub follow_links: bool,
}

/// Walk `root` and collect the files that pass `predicate`.
///
/// Hidden entries are skipped and ignore files are honoured unless
/// `options` says otherwise; `.gitignore` applies even outside a git
/// checkout. Returns a sorted, deduplicated list of canonical paths.
#[must_use]
pub fn walk_files(
    root: &Utf8Path,
    predicate: impl Fn(&Utf8Path) -> bool,
    options: &WalkOptions,
) -> Vec<Utf8PathBuf> {
    if !root.is_dir() {
        tracing::debug!("Not walking {}: not a directory", root);
        return Vec::new();
    }

    let mut builder = WalkBuilder::new(root.as_std_path());
    // standard_filters resets hidden and the ignore toggles, so it goes first
    builder
        .standard_filters(!options.no_ignore)
        .hidden(!options.hidden)
        .require_git(false)
        .follow_links(options.follow_links);

    if let Some(overrides) = exclusions(root, &options.exclude) {
        builder.overrides(overrides);
    }

    let mut files = Vec::new();
    for entry in builder.build().filter_map(Result::ok) {
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let Some(path) = Utf8Path::from_path(entry.path()) else {
            continue;
        };
        if predicate(path) {
            files.push(canonical(path));
        }
    }

    files.sort();
    files.dedup();
    files
}

/// Overrides that drop the given globs. Invalid globs are skipped with a
/// warning.
pub(crate) fn exclusions(root: &Utf8Path, globs: &[String]) -> Option<Override> {
    if globs.is_empty() {
        return None;
    }
    let mut overrides = OverrideBuilder::new(root.as_std_path());
    for glob in globs {
        let negated = if glob.starts_with('!') {
            glob.clone()
        } else {
            format!("!{glob}")
        };
        if let Err(err) = overrides.add(&negated) {
            tracing::warn!("Ignoring invalid exclude glob `{}`: {}", glob, err);
        }
    }
    match overrides.build() {
        Ok(built) => Some(built),
        Err(err) => {
            tracing::warn!("Ignoring exclude globs: {}", err);
            None
        }
    }
}

pub(crate) fn canonical(path: &Utf8Path) -> Utf8PathBuf {
    dunce::canonicalize(path.as_std_path())
        .ok()
        .and_then(|resolved| Utf8PathBuf::from_path_buf(resolved).ok())
        .unwrap_or_else(|| path.to_owned())
}
