//! Editor features for Elem helper calls
//!
//! Completion of CSS class names inside a `class:` argument and navigation
//! from a class name to the stylesheet that declares it. Every query takes a
//! [`ProjectContext`] and rebuilds what it needs from it.

pub mod completions;
mod context;
pub mod converters;
pub mod logging;
pub mod navigation;
mod references;

pub use completions::completions_for;
pub use completions::handle_completion;
pub use completions::Completion;
pub use completions::CompletionKind;
pub use context::ProjectContext;
pub use navigation::get_reference_at;
pub use navigation::goto_definition;
pub use navigation::reference_at;
pub use references::references_for;
pub use references::ClassReference;
