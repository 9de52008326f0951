//! # Block Parsing
//!
//! Two-phase, line-oriented block parsing.
//!
//! 1. **Line Classification** (`classify`): each line is classified into a
//!    `LineClass` holding only local facts (fence opener/closer, heading,
//!    quote prefix, table row, list marker).
//! 2. **Block Construction** (`builder`): a `BlockBuilder` groups classified
//!    lines into block tokens and parses inline content of text-bearing lines.
//!
//! Every construct is recognised only in an exact form that can be written
//! back byte for byte; anything else becomes a paragraph, one per line.

pub mod builder;
pub mod classify;
pub mod kinds;

pub use builder::{BlockBuilder, QuoteRun};
pub use classify::{LineClass, MarkdownLineClassifier};

use crate::parsing::tokens::Token;

/// Tokenizes already-split lines.
///
/// Each quote level is built as its own pass over its stripped lines, driven
/// from a work list, so nesting depth never grows the call stack.
pub fn tokenize_lines(lines: &[&str]) -> Vec<Token> {
    let classifier = MarkdownLineClassifier;
    // (level, token) of the blockquote a level fills, and that level's tokens.
    let mut levels: Vec<(Option<(usize, usize)>, Vec<Token>)> = vec![];
    let mut pending = vec![(None, lines.to_vec())];
    while let Some((parent, lines)) = pending.pop() {
        let mut builder = BlockBuilder::new();
        for &line in &lines {
            builder.push(classifier.classify(line));
        }
        let (tokens, quotes) = builder.finish();
        let level = levels.len();
        pending.extend(quotes.into_iter().map(|q| (Some((level, q.token)), q.lines)));
        levels.push((parent, tokens));
    }
    // A level always sits after the one holding its blockquote token.
    while let Some((parent, tokens)) = levels.pop() {
        let Some((level, token)) = parent else {
            return tokens;
        };
        if let Some(quote) = levels.get_mut(level).and_then(|(_, t)| t.get_mut(token)) {
            quote.children = tokens;
        }
    }
    vec![]
}
