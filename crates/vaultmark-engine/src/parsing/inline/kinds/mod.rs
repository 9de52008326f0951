//! # Inline Kinds
//!
//! Inline types that own their syntax delimiters. The parser and the
//! serializers call these constants; neither hardcodes `[[` or `` ` ``.

pub mod code_span;
pub mod emphasis;
pub mod link;
pub mod wikilink;

pub use code_span::CodeSpan;
pub use emphasis::Emphasis;
pub use link::{InlineMath, Kbd, Label, Link};
pub use wikilink::{WikiLink, WikiTarget};
