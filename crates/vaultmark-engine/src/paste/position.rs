//! Flattened text over runs of paragraphs and the index mapping offsets in
//! that text back to blocks.

use std::ops::Range;

use crate::model::{BlockNode, InlineNode, Text};

/// Where one paragraph's text sits in a [`Segment`]'s flattened string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    /// Top-level block index in the document.
    pub block: usize,
    pub start: usize,
    pub end: usize,
}

/// A maximal run of contiguous paragraphs. Any other block ends a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub spans: Vec<BlockSpan>,
}

/// The part of one paragraph a match covers, in that paragraph's own
/// flattened offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// Top-level block index in the document.
    pub block: usize,
    pub range: Range<usize>,
}

impl Segment {
    /// The paragraphs `range` touches, in order, each with the part of it
    /// covered. A range ending just after a line break does not reach into
    /// the paragraph that follows.
    pub fn pieces(&self, range: Range<usize>) -> Vec<Piece> {
        let first = self.spans.partition_point(|s| s.end < range.start);
        let last = self.spans.partition_point(|s| s.end < range.end);
        let mut pieces: Vec<Piece> = self
            .spans
            .get(first..=last)
            .unwrap_or_default()
            .iter()
            .map(|s| Piece {
                block: s.block,
                range: range.start.max(s.start) - s.start..range.end.min(s.end) - s.start,
            })
            .collect();
        while pieces.len() > 1 && pieces.last().is_some_and(|p| p.range.is_empty()) {
            pieces.pop();
        }
        pieces
    }
}

/// Splits `blocks[range]` into segments, joining paragraph text with `\n`.
/// Non-text leaves contribute one U+FFFC each.
pub fn segments(blocks: &[BlockNode], range: Range<usize>) -> Vec<Segment> {
    let mut out = vec![];
    let mut current: Option<Segment> = None;
    for (i, block) in blocks.iter().enumerate().take(range.end).skip(range.start) {
        let BlockNode::Paragraph(p) = block else {
            out.extend(current.take());
            continue;
        };
        let seg = current.get_or_insert_with(|| Segment {
            text: String::new(),
            spans: vec![],
        });
        if !seg.spans.is_empty() {
            seg.text.push('\n');
        }
        let start = seg.text.len();
        for node in &p.content {
            seg.text.push_str(node.plain_text());
        }
        seg.spans.push(BlockSpan {
            block: i,
            start,
            end: seg.text.len(),
        });
    }
    out.extend(current);
    out
}

/// Total length of `content` in flattened text.
pub fn plain_len(content: &[InlineNode]) -> usize {
    content.iter().map(|n| n.plain_text().len()).sum()
}

/// The part of `content` covering flattened offsets `range`. Text leaves are
/// cut; other leaves are kept when the range covers them entirely.
pub fn slice(content: &[InlineNode], range: Range<usize>) -> Vec<InlineNode> {
    let mut out: Vec<InlineNode> = vec![];
    let mut at = 0;
    for node in content {
        let len = node.plain_text().len();
        let (from, to) = (range.start.max(at), range.end.min(at + len));
        if from < to {
            let piece = match node {
                InlineNode::Text(t) => Some(InlineNode::Text(Text {
                    text: t.text[from - at..to - at].to_string(),
                    marks: t.marks.clone(),
                    split: t.split,
                })),
                other if from == at && to == at + len => Some(other.clone()),
                _ => None,
            };
            if let Some(mut piece) = piece {
                // Span boundaries only mean something relative to a neighbour.
                if out.is_empty() {
                    piece.set_split(None);
                }
                out.push(piece);
            }
        }
        at += len;
    }
    out
}
