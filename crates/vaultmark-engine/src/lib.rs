//! Bidirectional converter between portable vault markup and a typed,
//! JSON-serializable document tree.
//!
//! ```
//! use vaultmark_engine::{ConvertContext, ReferenceIndex, parse, serialize};
//!
//! let index = ReferenceIndex::new();
//! let ctx = ConvertContext::new("vault", &index);
//! let markup = "# Plan\n- [ ] ship it start:2024-06-01";
//! let doc = parse(markup, &ctx).unwrap();
//! assert_eq!(serialize(&doc, &ctx), markup);
//! ```

pub mod context;
pub mod converter;
pub mod error;
pub mod ids;
pub mod index;
pub mod model;
pub mod parsing;
pub mod paste;
pub mod serialize;

#[cfg(test)]
pub mod tests;

pub use context::{ConvertContext, ConvertOptions, DiagnosticSink, LogSink, Platform};
pub use converter::{Converter, default_converter, parse, serialize};
pub use error::{ConvertError, PasteError, TransformError};
pub use index::{EntityRecord, EntityType, Key, ReferenceIndex};
pub use model::{BlockNode, Document, InlineNode, LineEnding, Mark};
pub use paste::{PasteRule, PasteSession, Transaction, UiEvent, apply_paste_rules};
pub use serialize::SerializerSet;
