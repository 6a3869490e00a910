use std::io;
use std::sync::Arc;

use camino::Utf8Path;
use elem_source::FileSystem;

use crate::buffers::Buffers;

/// Reads through open buffers first and falls back to `disk`.
pub struct WorkspaceFileSystem {
    buffers: Buffers,
    disk: Arc<dyn FileSystem>,
}

impl WorkspaceFileSystem {
    pub fn new(buffers: Buffers, disk: Arc<dyn FileSystem>) -> Self {
        Self { buffers, disk }
    }
}

impl FileSystem for WorkspaceFileSystem {
    fn read_to_string(&self, path: &Utf8Path) -> io::Result<String> {
        if let Some(document) = self.buffers.get(path) {
            return Ok(document.content().to_string());
        }
        self.disk.read_to_string(path)
    }
}

#[cfg(test)]
mod tests {
    use elem_source::InMemoryFileSystem;

    use super::*;
    use crate::document::TextDocument;

    fn setup() -> (Buffers, WorkspaceFileSystem) {
        let mut disk = InMemoryFileSystem::new();
        disk.add_file("/p/a.css".into(), ".disk {}".to_string());
        let buffers = Buffers::new();
        let fs = WorkspaceFileSystem::new(buffers.clone(), Arc::new(disk));
        (buffers, fs)
    }

    #[test]
    fn test_disk_when_not_open() {
        let (_, fs) = setup();
        assert_eq!(
            fs.read_to_string(Utf8Path::new("/p/a.css")).unwrap(),
            ".disk {}"
        );
    }

    #[test]
    fn test_buffer_shadows_disk() {
        let (buffers, fs) = setup();
        buffers.open("/p/a.css".into(), TextDocument::new(".unsaved {}".to_string(), 3));
        assert_eq!(
            fs.read_to_string(Utf8Path::new("/p/a.css")).unwrap(),
            ".unsaved {}"
        );

        buffers.close(Utf8Path::new("/p/a.css"));
        assert_eq!(
            fs.read_to_string(Utf8Path::new("/p/a.css")).unwrap(),
            ".disk {}"
        );
    }

    #[test]
    fn test_buffer_only_file_is_readable() {
        let (buffers, fs) = setup();
        let path = Utf8Path::new("/p/new.css");
        assert!(fs.read_to_string(path).is_err());
        buffers.open(path.into(), TextDocument::new(String::new(), 1));
        assert!(fs.read_to_string(path).unwrap().is_empty());
    }

    #[test]
    fn test_missing_everywhere() {
        let (_, fs) = setup();
        let err = fs.read_to_string(Utf8Path::new("/p/gone.css")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
