mod file;
mod position;
mod span;
mod system;

pub use file::FileKind;
pub use position::LineCol;
pub use position::LineIndex;
pub use position::PositionEncoding;
pub use span::Offset;
pub use span::Span;
pub use system::FileSystem;
pub use system::InMemoryFileSystem;
pub use system::OsFileSystem;
