use camino::Utf8Path;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FileKind {
    Other,
    Php,
    Stylesheet,
}

impl FileKind {
    /// Determine [`FileKind`] from a file path extension.
    ///
    /// `stylesheet_extensions` are compared without a leading dot.
    #[must_use]
    pub fn from_path(path: &Utf8Path, stylesheet_extensions: &[String]) -> Self {
        match path.extension() {
            Some("php" | "phtml") => FileKind::Php,
            Some(ext) if stylesheet_extensions.iter().any(|e| e == ext) => FileKind::Stylesheet,
            _ => FileKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        let exts = vec!["css".to_string(), "pcss".to_string()];
        assert_eq!(
            FileKind::from_path(Utf8Path::new("src/page.php"), &exts),
            FileKind::Php
        );
        assert_eq!(
            FileKind::from_path(Utf8Path::new("assets/app.pcss"), &exts),
            FileKind::Stylesheet
        );
        assert_eq!(
            FileKind::from_path(Utf8Path::new("assets/app.scss"), &exts),
            FileKind::Other
        );
        assert_eq!(
            FileKind::from_path(Utf8Path::new("Makefile"), &exts),
            FileKind::Other
        );
    }
}
