use thiserror::Error;

use crate::parsing::tokens::TokenKind;

/// Fatal conversion failure. The input is never modified; the host should
/// treat the document as unopenable rather than show partial content.
#[derive(Debug, Clone, Error)]
pub enum ConvertError {
    #[error("{kind:?} token is missing the `{attr}` attribute")]
    MissingAttribute { kind: TokenKind, attr: &'static str },

    #[error("{kind:?} token has an invalid `{attr}` attribute: {value:?}")]
    InvalidAttribute {
        kind: TokenKind,
        attr: &'static str,
        value: String,
    },

    #[error("{kind:?} token cannot appear in {context} content")]
    MisplacedToken { kind: TokenKind, context: &'static str },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Failure inside one transformer. Reported to the diagnostic sink and
/// otherwise ignored; it never aborts a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("missing attribute `{0}`")]
    MissingAttribute(&'static str),

    #[error("{0}")]
    Failed(String),
}

/// Failure inside a paste rule handler. Aborts the whole paste transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasteError {
    #[error("paste rule `{rule}` failed: {message}")]
    Handler { rule: String, message: String },
}
