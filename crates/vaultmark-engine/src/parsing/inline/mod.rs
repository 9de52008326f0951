//! # Inline Parsing
//!
//! Cursor-based inline parsing over the text of one line (a paragraph, a
//! heading's text, a list item's text or a table cell).
//!
//! - **`kinds`**: inline types that own their delimiters
//! - **`cursor`**: `Cursor` for byte-by-byte scanning
//! - **`parser`**: `parse_inline()` entry point
//!
//! Code spans are raw zones: `` `[[not a link]]` `` parses as one code span.
//! Emphasis, kbd and link text are parsed recursively, so a run's tokens
//! form a tree whose leaves concatenate back to the input.

pub mod cursor;
pub mod kinds;
pub mod parser;

pub use parser::parse_inline;
