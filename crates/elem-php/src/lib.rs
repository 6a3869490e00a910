//! PHP side of the Elem class cross-reference.
//!
//! Knows which helper calls carry CSS classes ([`HelperFunctionCatalog`]),
//! decides whether a string argument is the class argument
//! ([`is_class_argument`]) and splits that argument into class tokens
//! ([`tokenize`]). [`lexer`] and [`calls`] recover call sites from raw
//! source for hosts that do not provide a syntax tree of their own.

pub mod calls;
mod catalog;
mod call_site;
pub mod lexer;
mod matcher;
mod tokenizer;

pub use call_site::Argument;
pub use call_site::CallSite;
pub use call_site::StringLiteral;
pub use catalog::HelperFunctionCatalog;
pub use catalog::ELEM_NAMESPACE;
pub use lexer::SyntaxToken;
pub use lexer::TokenKind;
pub use matcher::is_class_argument;
pub use tokenizer::tokenize;
pub use tokenizer::LiteralTokens;
