//! Filesystem-backed project host.
//!
//! [`Workspace`] answers the questions the Elem features ask about a project
//! rooted on disk, with open editor buffers layered over the files they
//! shadow.

mod buffers;
mod document;
mod fs;
mod walk;
mod workspace;

pub use buffers::Buffers;
pub use document::TextDocument;
pub use fs::WorkspaceFileSystem;
pub use walk::walk_files;
pub use walk::WalkOptions;
pub use workspace::Workspace;
