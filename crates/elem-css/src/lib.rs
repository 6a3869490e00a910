//! CSS class selector discovery.
//!
//! [`scan`] finds the class names a stylesheet declares and
//! [`ProjectClassIndex`] aggregates them across every stylesheet a
//! [`StylesheetHost`] exposes.

mod index;
mod scanner;

pub use index::ClassDefinition;
pub use index::ProjectClassIndex;
pub use index::StylesheetHost;
pub use scanner::is_class_name;
pub use scanner::NodeTokens;
pub use scanner::scan;
pub use scanner::scan_nodes;
pub use scanner::ClassToken;
pub use scanner::ClassTokens;
pub use scanner::ParsedNode;
