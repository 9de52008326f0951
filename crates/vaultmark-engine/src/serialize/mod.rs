//! # Serializer Set
//!
//! Document tree back to markup. One built-in serializer per node type,
//! composed recursively; hosts may override any block, inline or mark type
//! by its `type` tag. An override returning `None` falls back to the
//! built-in serializer.
//!
//! Serialization is the left inverse of parsing: every construct is written
//! in the exact form the tokenizer recognises, and references are written as
//! the portable text they were parsed from, never as resolved ids.

mod block;
mod inline;
pub mod marks;

use std::collections::HashMap;

use crate::context::{ConvertContext, ConvertOptions};
use crate::model::{BlockNode, Document, InlineNode, Mark};

pub type BlockSerializer = dyn Fn(&BlockNode, &ConvertContext<'_>) -> Option<String> + Send + Sync;
pub type InlineSerializer = dyn Fn(&InlineNode, &ConvertContext<'_>) -> Option<String> + Send + Sync;
pub type MarkSerializer = dyn Fn(&Mark) -> Option<(String, String)> + Send + Sync;

pub struct SerializerSet {
    diagram_language: String,
    list_indent: usize,
    blocks: HashMap<String, Box<BlockSerializer>>,
    inlines: HashMap<String, Box<InlineSerializer>>,
    marks: HashMap<String, Box<MarkSerializer>>,
}

impl SerializerSet {
    pub fn new(options: &ConvertOptions) -> Self {
        Self {
            diagram_language: options.diagram_language.clone(),
            list_indent: options.list_indent,
            blocks: HashMap::new(),
            inlines: HashMap::new(),
            marks: HashMap::new(),
        }
    }

    /// Replaces the serializer for blocks tagged `type_name`. Multi-line
    /// output is split on `\n` and re-joined with the document's line ending.
    pub fn override_block<F>(&mut self, type_name: impl Into<String>, f: F)
    where
        F: Fn(&BlockNode, &ConvertContext<'_>) -> Option<String> + Send + Sync + 'static,
    {
        self.blocks.insert(type_name.into(), Box::new(f));
    }

    /// Replaces the serializer for inline leaves tagged `type_name`. Marks
    /// around the leaf are still written by the mark serializers.
    pub fn override_inline<F>(&mut self, type_name: impl Into<String>, f: F)
    where
        F: Fn(&InlineNode, &ConvertContext<'_>) -> Option<String> + Send + Sync + 'static,
    {
        self.inlines.insert(type_name.into(), Box::new(f));
    }

    /// Replaces the opening/closing delimiters of marks tagged `type_name`.
    pub fn override_mark<F>(&mut self, type_name: impl Into<String>, f: F)
    where
        F: Fn(&Mark) -> Option<(String, String)> + Send + Sync + 'static,
    {
        self.marks.insert(type_name.into(), Box::new(f));
    }

    pub fn serialize(&self, doc: &Document, ctx: &ConvertContext<'_>) -> String {
        let mut lines = vec![];
        for block in &doc.content {
            self.block_lines(block, ctx, &mut lines);
        }
        lines.join(doc.line_ending.as_str())
    }

    /// Appends the source lines of `block` to `out`.
    pub fn block_lines(&self, block: &BlockNode, ctx: &ConvertContext<'_>, out: &mut Vec<String>) {
        if let Some(text) = self.overridden(block, ctx) {
            out.extend(text.split('\n').map(str::to_string));
            return;
        }
        self.builtin_block(block, ctx, out);
    }

    fn overridden(&self, block: &BlockNode, ctx: &ConvertContext<'_>) -> Option<String> {
        self.blocks.get(block.type_name()).and_then(|f| f(block, ctx))
    }

    /// Markup for a run of inline nodes, marks included.
    pub fn inline_text(&self, nodes: &[InlineNode], ctx: &ConvertContext<'_>) -> String {
        let mut writer = marks::MarkWriter::new(|mark: &Mark| self.mark_delimiters(mark));
        for node in nodes {
            let text = self
                .inlines
                .get(node.type_name())
                .and_then(|f| f(node, ctx))
                .unwrap_or_else(|| self.builtin_inline(node, ctx));
            writer.leaf(node.marks(), node.split(), &text);
        }
        writer.finish()
    }

    fn mark_delimiters(&self, mark: &Mark) -> (String, String) {
        self.marks
            .get(mark.type_name())
            .and_then(|f| f(mark))
            .unwrap_or_else(|| marks::delimiters(mark))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ReferenceIndex;
    use crate::model::{Paragraph, Text};
    use pretty_assertions::assert_eq;

    fn doc() -> Document {
        Document::new(vec![
            BlockNode::HorizontalRule,
            BlockNode::Paragraph(Paragraph {
                content: vec![InlineNode::Text(Text {
                    text: "loud".into(),
                    marks: vec![Mark::Bold],
                    split: None,
                })],
            }),
        ])
    }

    #[test]
    fn overrides_replace_builtins() {
        let index = ReferenceIndex::new();
        let ctx = ConvertContext::new("v", &index);
        let mut set = SerializerSet::new(&ConvertOptions::default());
        set.override_block("horizontalRule", |_, _| Some("***".to_string()));
        set.override_mark("bold", |_| Some(("__".to_string(), "__".to_string())));
        assert_eq!(set.serialize(&doc(), &ctx), "***\n__loud__");
    }

    #[test]
    fn declining_override_falls_back() {
        let index = ReferenceIndex::new();
        let ctx = ConvertContext::new("v", &index);
        let mut set = SerializerSet::new(&ConvertOptions::default());
        set.override_block("horizontalRule", |_, _| None);
        set.override_inline("text", |node, _| match node {
            InlineNode::Text(t) => Some(t.text.to_uppercase()),
            _ => None,
        });
        assert_eq!(set.serialize(&doc(), &ctx), "---\n**LOUD**");
    }
}
