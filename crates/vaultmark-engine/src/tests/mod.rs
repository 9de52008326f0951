//! Helpers shared by unit tests across modules.

use std::sync::Mutex;

use crate::context::DiagnosticSink;
use crate::error::TransformError;
use crate::parsing::tokens::TokenKind;

/// Sink that remembers every reported transformer failure.
#[derive(Debug, Default)]
pub struct RecordingSink {
    failures: Mutex<Vec<(String, TokenKind)>>,
}

impl RecordingSink {
    pub fn failures(&self) -> Vec<(String, TokenKind)> {
        self.failures.lock().map(|f| f.clone()).unwrap_or_default()
    }
}

impl DiagnosticSink for RecordingSink {
    fn transform_failed(&self, transformer: &str, kind: TokenKind, _error: &TransformError) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push((transformer.to_string(), kind));
        }
    }
}
