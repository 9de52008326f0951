use log::warn;
use relative_path::{RelativePath, RelativePathBuf};

use crate::error::TransformError;
use crate::index::ReferenceIndex;
use crate::model::LineEnding;
use crate::parsing::tokens::TokenKind;

/// Receives recoverable problems found during conversion.
pub trait DiagnosticSink: Send + Sync {
    fn transform_failed(&self, transformer: &str, kind: TokenKind, error: &TransformError);
}

/// Default sink: forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn transform_failed(&self, transformer: &str, kind: TokenKind, error: &TransformError) {
        warn!("transformer `{transformer}` failed on {kind:?} token: {error}");
    }
}

static LOG_SINK: LogSink = LogSink;

/// Conversion knobs that are fixed for the lifetime of a [`crate::Converter`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Spaces per nesting level for lists that carry no source spacing.
    pub list_indent: usize,
    /// Code block language that turns a fence into a diagram.
    pub diagram_language: String,
    /// Link title prefix that turns a link into a preview card.
    pub preview_prefix: String,
    /// Hosts whose image links become video embeds.
    pub video_hosts: Vec<String>,
    /// Used for documents that contain no line break.
    pub line_ending: LineEnding,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            list_indent: 4,
            diagram_language: "mermaid".to_string(),
            preview_prefix: "preview:".to_string(),
            video_hosts: vec!["youtube.com".to_string(), "youtu.be".to_string()],
            line_ending: LineEnding::Lf,
        }
    }
}

/// Per-call inputs: which vault and document is being converted, the index
/// snapshot to resolve against, and where to report problems.
#[derive(Clone, Copy)]
pub struct ConvertContext<'a> {
    pub vault_id: &'a str,
    pub document_path: Option<&'a RelativePath>,
    pub index: &'a ReferenceIndex,
    pub sink: &'a dyn DiagnosticSink,
}

impl<'a> ConvertContext<'a> {
    pub fn new(vault_id: &'a str, index: &'a ReferenceIndex) -> Self {
        Self {
            vault_id,
            document_path: None,
            index,
            sink: &LOG_SINK,
        }
    }

    pub fn with_document(mut self, path: &'a RelativePath) -> Self {
        self.document_path = Some(path);
        self
    }

    pub fn with_sink(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.sink = sink;
        self
    }

    /// Directory of the document being converted; the vault root if unknown.
    pub fn referencing_dir(&self) -> &'a RelativePath {
        self.document_path
            .and_then(RelativePath::parent)
            .unwrap_or(RelativePath::new(""))
    }
}

/// Host platform facts needed to turn native paths into vault paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub path_separator: char,
    pub vault_root: String,
}

impl Platform {
    pub fn new(vault_root: impl Into<String>, path_separator: char) -> Self {
        Self {
            path_separator,
            vault_root: vault_root.into(),
        }
    }

    pub fn native(vault_root: impl Into<String>) -> Self {
        Self::new(vault_root, std::path::MAIN_SEPARATOR)
    }

    /// Vault-relative form of a native path; `None` if it lies outside the vault.
    pub fn vault_relative(&self, native_path: &str) -> Option<RelativePathBuf> {
        let sep = self.path_separator;
        let root = self.vault_root.replace(sep, "/");
        let root = root.trim_end_matches('/');
        let path = native_path.replace(sep, "/");
        let rest = path.strip_prefix(root)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        Some(RelativePathBuf::from(rest.trim_start_matches('/')).normalize())
    }
}
