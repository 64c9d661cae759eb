//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! The tree builder and the data structures it keeps: the stack of open
//! elements, the list of active formatting elements, and the quirks table.

mod adoption;
/// The tree builder and its insertion helpers.
pub mod core;
/// SVG and MathML handling.
pub mod foreign_content;
/// The list of active formatting elements.
pub mod formatting;
mod modes;
/// DOCTYPE classification.
pub mod quirks;
/// The stack of open elements.
pub mod stack;

pub use core::{InsertionMode, TreeBuilder, is_formatting_element, is_special_element};
pub use formatting::{ActiveFormattingElements, FormattingEntry};
pub use quirks::quirks_mode_for_doctype;
pub use stack::{Scope, StackOfOpenElements};
