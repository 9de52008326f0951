//! # Token Transform Pipeline
//!
//! A dispatch table from [`TokenKind`] to an ordered list of transformers.
//! Each transformer sees one token and may return a replacement; a failure
//! is reported to the context's [`DiagnosticSink`](crate::context::DiagnosticSink)
//! and leaves the token as the previous successful step produced it.
//!
//! When a transformer retags a token, the remaining transformers for the old
//! kind are skipped and the transformers registered for the new kind run.
//! Every kind is dispatched at most once per token, so retag cycles end.

pub mod directives;
pub mod embeds;
pub mod task;

use std::collections::HashMap;

use log::trace;

use crate::context::{ConvertContext, ConvertOptions};
use crate::error::{ConvertError, TransformError};
use crate::parsing::tokens::{Token, TokenKind};

pub use directives::ScheduleDirective;
pub use embeds::VideoHosts;
pub use task::Checkbox;

type TransformFn = dyn Fn(&Token) -> Result<Option<Token>, TransformError> + Send + Sync;

/// A named entry in the dispatch table.
pub struct Transformer {
    pub name: String,
    apply: Box<TransformFn>,
}

#[derive(Default)]
pub struct TransformPipeline {
    table: HashMap<TokenKind, Vec<Transformer>>,
}

impl TransformPipeline {
    /// An empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in transformers: task checkboxes, scheduling directives,
    /// diagram fences, video embeds and link previews.
    pub fn with_builtins(options: &ConvertOptions) -> Result<Self, ConvertError> {
        let mut pipeline = Self::new();
        pipeline.register(TokenKind::ListItem, "task-checkbox", task::list_item_to_task);
        pipeline.register(TokenKind::TaskItem, "schedule-directives", directives::extract_task_directives);
        pipeline.register(
            TokenKind::CodeBlock,
            "diagram-fence",
            embeds::code_block_to_diagram(options.diagram_language.clone()),
        );
        pipeline.register(
            TokenKind::Image,
            "video-embed",
            embeds::image_to_video(VideoHosts::new(&options.video_hosts)?),
        );
        pipeline.register(
            TokenKind::Link,
            "link-preview",
            embeds::link_to_preview(options.preview_prefix.clone()),
        );
        Ok(pipeline)
    }

    /// Appends a transformer for `kind`; transformers run in registration order.
    pub fn register<F>(&mut self, kind: TokenKind, name: impl Into<String>, f: F)
    where
        F: Fn(&Token) -> Result<Option<Token>, TransformError> + Send + Sync + 'static,
    {
        self.table.entry(kind).or_default().push(Transformer {
            name: name.into(),
            apply: Box::new(f),
        });
    }

    pub fn transformers(&self, kind: TokenKind) -> impl Iterator<Item = &str> {
        self.table
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|t| t.name.as_str())
    }

    /// Runs the table over `tokens` and their descendants, parents before
    /// children. Containers are walked from an explicit stack.
    pub fn apply(&self, tokens: Vec<Token>, ctx: &ConvertContext<'_>) -> Vec<Token> {
        let mut stack = vec![Frame::new(None, tokens)];
        loop {
            let Some(frame) = stack.last_mut() else {
                return vec![];
            };
            if let Some(token) = frame.pending.next() {
                let mut token = self.dispatch(token, ctx);
                let children = std::mem::take(&mut token.children);
                if children.is_empty() {
                    frame.done.push(token);
                } else {
                    stack.push(Frame::new(Some(token), children));
                }
                continue;
            }
            let Some(Frame { parent, done, .. }) = stack.pop() else {
                return vec![];
            };
            match (parent, stack.last_mut()) {
                (Some(mut parent), Some(outer)) => {
                    parent.children = done;
                    outer.done.push(parent);
                }
                _ => return done,
            }
        }
    }

    fn dispatch(&self, mut token: Token, ctx: &ConvertContext<'_>) -> Token {
        let mut dispatched: Vec<TokenKind> = vec![];
        while !dispatched.contains(&token.kind) {
            let kind = token.kind;
            dispatched.push(kind);
            for transformer in self.table.get(&kind).into_iter().flatten() {
                match (transformer.apply)(&token) {
                    Ok(Some(next)) => {
                        trace!("{} rewrote {kind:?} as {:?}", transformer.name, next.kind);
                        token = next;
                    }
                    Ok(None) => {}
                    Err(error) => ctx.sink.transform_failed(&transformer.name, kind, &error),
                }
                if token.kind != kind {
                    break;
                }
            }
        }
        token
    }
}

/// A container whose children are part way through the pipeline.
struct Frame {
    parent: Option<Token>,
    pending: std::vec::IntoIter<Token>,
    done: Vec<Token>,
}

impl Frame {
    fn new(parent: Option<Token>, children: Vec<Token>) -> Self {
        Self {
            parent,
            done: Vec::with_capacity(children.len()),
            pending: children.into_iter(),
        }
    }
}
