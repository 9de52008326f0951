//! Document tree types.
//!
//! The tree is a plain value: every node is `Clone + PartialEq` and
//! (de)serializes to JSON with a `type` tag per node, so hosts can exchange
//! whole documents without holding references into them.

pub mod block;
pub mod inline;

use serde::{Deserialize, Serialize};

pub use block::*;
pub use inline::*;

/// Line ending used when splitting markup into lines and when re-joining them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }

    /// Detects the line ending from the first line break in `text`.
    pub fn detect(text: &str) -> Option<Self> {
        let idx = text.find('\n')?;
        if idx > 0 && text.as_bytes()[idx - 1] == b'\r' {
            Some(LineEnding::Crlf)
        } else {
            Some(LineEnding::Lf)
        }
    }
}

/// Root of a document tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub line_ending: LineEnding,
    pub content: Vec<BlockNode>,
}

impl Document {
    pub fn new(content: Vec<BlockNode>) -> Self {
        Self {
            line_ending: LineEnding::default(),
            content,
        }
    }

    /// Visits every node depth-first, parents before children.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(DocumentNode<'a>)) {
        // Blockquote levels live on this stack rather than the call stack.
        let mut stack = vec![self.content.iter()];
        while let Some(blocks) = stack.last_mut() {
            let Some(block) = blocks.next() else {
                stack.pop();
                continue;
            };
            visit_block(block, f);
            if let BlockNode::Blockquote(q) = block {
                stack.push(q.content.iter());
            }
        }
    }

    /// Wikilinks and images whose target could not be found in the index.
    pub fn unresolved_references(&self) -> Vec<DocumentNode<'_>> {
        let mut out = vec![];
        self.walk(&mut |node| {
            let unresolved = match node {
                DocumentNode::Inline(InlineNode::Wikilink(link)) => !link.resolved,
                DocumentNode::Inline(InlineNode::Image(image)) => !image.resolved,
                DocumentNode::Block(BlockNode::Image(image)) => !image.resolved,
                _ => false,
            };
            if unresolved {
                out.push(node);
            }
        });
        out
    }
}

/// Borrowed view over any node in the tree, grouped by category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DocumentNode<'a> {
    Block(&'a BlockNode),
    Entry(&'a ListEntry),
    Inline(&'a InlineNode),
    Mark(&'a Mark),
}

impl DocumentNode<'_> {
    /// The `type` tag this node carries in JSON.
    pub fn type_name(&self) -> &'static str {
        match self {
            DocumentNode::Block(b) => b.type_name(),
            DocumentNode::Entry(e) => e.type_name(),
            DocumentNode::Inline(i) => i.type_name(),
            DocumentNode::Mark(m) => m.type_name(),
        }
    }
}

/// `block` and everything inside it except nested blocks.
fn visit_block<'a>(block: &'a BlockNode, f: &mut impl FnMut(DocumentNode<'a>)) {
    f(DocumentNode::Block(block));
    match block {
        BlockNode::Heading(h) => walk_inlines(&h.content, f),
        BlockNode::Paragraph(p) => walk_inlines(&p.content, f),
        BlockNode::List(list) => walk_list(list, f),
        BlockNode::Table(table) => {
            for row in std::iter::once(&table.header).chain(&table.rows) {
                for cell in &row.cells {
                    walk_inlines(&cell.content, f);
                }
            }
        }
        BlockNode::CodeBlock(_)
        | BlockNode::MathBlock(_)
        | BlockNode::Diagram(_)
        | BlockNode::Image(_)
        | BlockNode::YoutubeEmbed(_)
        | BlockNode::Blockquote(_)
        | BlockNode::HorizontalRule => {}
    }
}

fn walk_list<'a>(list: &'a List, f: &mut impl FnMut(DocumentNode<'a>)) {
    for entry in &list.content {
        f(DocumentNode::Entry(entry));
        walk_inlines(entry.content(), f);
        for child in entry.children() {
            walk_list(child, f);
        }
    }
}

fn walk_inlines<'a>(nodes: &'a [InlineNode], f: &mut impl FnMut(DocumentNode<'a>)) {
    for node in nodes {
        f(DocumentNode::Inline(node));
        for mark in node.marks() {
            f(DocumentNode::Mark(mark));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detect_line_endings() {
        assert_eq!(LineEnding::detect("a\r\nb"), Some(LineEnding::Crlf));
        assert_eq!(LineEnding::detect("a\nb\r\n"), Some(LineEnding::Lf));
        assert_eq!(LineEnding::detect("no breaks"), None);
    }

    #[test]
    fn document_json_shape() {
        let doc = Document::new(vec![BlockNode::Paragraph(Paragraph {
            content: vec![InlineNode::text("hi")],
        })]);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "lineEnding": "lf",
                "content": [
                    {"type": "paragraph", "content": [{"type": "text", "text": "hi"}]}
                ]
            })
        );
        let back: Document = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn unresolved_references_are_collected() {
        let doc = Document::new(vec![BlockNode::Paragraph(Paragraph {
            content: vec![
                InlineNode::Wikilink(Wikilink::unresolved("Missing")),
                InlineNode::text(" and "),
                InlineNode::Wikilink(Wikilink {
                    target_id: Some("doc-1".into()),
                    resolved: true,
                    ..Wikilink::unresolved("Found")
                }),
            ],
        })]);
        let unresolved = doc.unresolved_references();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].type_name(), "wikilink");
    }
}
