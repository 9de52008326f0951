//! # Parsing
//!
//! Markup to document tree, in three stages:
//!
//! 1. **Tokenize** (`blocks`, `inline`): split the text into lines and group
//!    them into block tokens with inline children. Purely syntactic, never
//!    fails; unknown syntax is paragraph text.
//! 2. **Transform** (`transform`): the type-keyed transformer table retags
//!    and enriches tokens (tasks, directives, diagrams, embeds).
//! 3. **Convert** (`convert`, `lists`): build the typed tree, nesting list
//!    runs and resolving references through the index snapshot.

pub mod blocks;
pub mod convert;
pub mod inline;
pub mod lists;
pub mod tokens;
pub mod transform;

pub use convert::convert;
pub use tokens::{Token, TokenKind};
pub use transform::TransformPipeline;

use crate::model::LineEnding;

/// Splits markup into lines on `line_ending`. The empty string is one empty line.
pub fn split_lines(markup: &str, line_ending: LineEnding) -> Vec<&str> {
    markup.split(line_ending.as_str()).collect()
}

/// Tokenizes markup whose lines end with `line_ending`.
pub fn tokenize(markup: &str, line_ending: LineEnding) -> Vec<Token> {
    blocks::tokenize_lines(&split_lines(markup, line_ending))
}
