//! # Paste Rule Engine
//!
//! Turns pasted plain paragraphs into structure. Each rule's matcher runs
//! over the flattened text of every run of contiguous paragraphs inside the
//! transaction's changed range; any other block is a hard boundary.
//!
//! A match may start and end anywhere in its paragraphs. Block handlers
//! replace the paragraphs it touches, and the text before and after the
//! match stays behind as paragraphs of its own. Inline handlers rewrite the
//! match inside its paragraph.
//!
//! Matches are applied last to first so that replacing blocks never shifts
//! a match that is still pending. Rules run in order, each seeing the output
//! of the previous one.
//!
//! The engine works on a copy of the transaction. A handler error discards
//! the copy, so a transaction is either fully rewritten or returned as an
//! error with the caller's transaction untouched.

pub mod position;
pub mod rules;
pub mod transaction;

use log::{debug, trace};

use crate::error::PasteError;
use crate::model::{BlockNode, InlineNode, Mark};

use position::{Piece, plain_len, slice};

pub use rules::{PasteMatch, PasteRule, Replacement, builtin_rules};
pub use transaction::{PasteSession, ReplaceStep, Transaction, UiEvent};

/// Applies `rules` to a transaction tagged as a user paste or drop.
///
/// Untagged transactions come back unchanged. The returned transaction is
/// untagged, so feeding it back in is a no-op.
pub fn apply_paste_rules(tr: &Transaction, rules: &[PasteRule]) -> Result<Transaction, PasteError> {
    let mut next = tr.clone();
    let Some(origin) = next.origin() else {
        return Ok(next);
    };
    debug!("applying {} paste rules to {origin:?} over blocks {:?}", rules.len(), next.changed);
    for rule in rules {
        apply_rule(&mut next, rule)?;
    }
    next.clear_origin();
    Ok(next)
}

fn apply_rule(tr: &mut Transaction, rule: &PasteRule) -> Result<(), PasteError> {
    let segments = position::segments(&tr.doc.content, tr.changed.clone());
    for segment in segments.iter().rev() {
        let found: Vec<_> = rule
            .matcher
            .captures_iter(&segment.text)
            .filter_map(|captures| {
                let whole = captures.get(0)?.range();
                (!whole.is_empty()).then(|| (segment.pieces(whole), captures))
            })
            .collect();

        for (pieces, captures) in found.into_iter().rev() {
            let (Some(first), Some(last)) = (pieces.first(), pieces.last()) else {
                continue;
            };
            let blocks = first.block..last.block + 1;
            let replaced = &tr.doc.content[blocks.clone()];
            let replacement = rule.handle(&PasteMatch {
                captures: &captures,
                blocks: replaced,
                pieces: &pieces,
            })?;
            let Some(replacement) = replacement else {
                debug!("{}: handler declined blocks {blocks:?}", rule.name);
                continue;
            };
            match splice(replaced, &pieces, replacement) {
                Some(new_blocks) => {
                    trace!("{}: replaced blocks {blocks:?} with {} blocks", rule.name, new_blocks.len());
                    tr.replace(blocks, new_blocks);
                }
                None => debug!("{}: inline replacement across blocks {blocks:?} ignored", rule.name),
            }
        }
    }
    Ok(())
}

fn content(block: Option<&BlockNode>) -> &[InlineNode] {
    match block {
        Some(BlockNode::Paragraph(p)) => &p.content,
        _ => &[],
    }
}

/// The blocks that take the place of `replaced`: the text of the first
/// paragraph before the match, the replacement, then the text of the last
/// paragraph after it. `None` for inline content spanning several blocks.
fn splice(replaced: &[BlockNode], pieces: &[Piece], replacement: Replacement) -> Option<Vec<BlockNode>> {
    let (first, last) = (pieces.first()?, pieces.last()?);
    let head = slice(content(replaced.first()), 0..first.range.start);
    let tail_content = content(replaced.last());
    let mut tail = slice(tail_content, last.range.end..plain_len(tail_content));

    match replacement {
        Replacement::Blocks(blocks) => {
            let mut out = Vec::with_capacity(blocks.len() + 2);
            if !head.is_empty() {
                out.push(BlockNode::paragraph(head));
            }
            out.extend(blocks);
            if !tail.is_empty() {
                out.push(BlockNode::paragraph(tail));
            }
            Some(out)
        }
        Replacement::Inline(mut nodes) => {
            if pieces.len() != 1 {
                return None;
            }
            let covered = slice(content(replaced.first()), first.range.clone());
            let kept = shared(covered.first(), nodes.first());
            separate(head.last(), nodes.first_mut(), kept);
            let kept = shared(covered.last(), nodes.last());
            separate(nodes.last(), tail.first_mut(), kept);

            let mut content = head;
            content.extend(nodes);
            content.extend(tail);
            Some(vec![BlockNode::paragraph(content)])
        }
    }
}

fn shared(a: Option<&InlineNode>, b: Option<&InlineNode>) -> usize {
    match (a, b) {
        (Some(a), Some(b)) => Mark::shared_depth(a.marks(), b.marks()),
        _ => 0,
    }
}

/// Marks past depth `kept` were added by the handler, so they open new
/// spans even next to equal marks on the other side of the join.
fn separate(prev: Option<&InlineNode>, next: Option<&mut InlineNode>, kept: usize) {
    if let (Some(prev), Some(next)) = (prev, next)
        && Mark::shared_depth(prev.marks(), next.marks()) > kept
    {
        next.set_split(Some(kept));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ConvertOptions;
    use crate::model::Document;
    use pretty_assertions::assert_eq;
    use regex::Regex;

    fn pasted(lines: &[&str]) -> Transaction {
        let doc = Document::new(lines.iter().map(|l| BlockNode::paragraph(vec![InlineNode::text(*l)])).collect());
        let mut session = PasteSession::new();
        session.begin(UiEvent::Paste);
        session.tag(Transaction::new(doc))
    }

    #[test]
    fn untagged_transactions_are_left_alone() {
        let rules = builtin_rules(&ConvertOptions::default()).unwrap();
        let tr = Transaction::new(Document::new(vec![BlockNode::paragraph(vec![InlineNode::text("# x")])]));
        assert_eq!(apply_paste_rules(&tr, &rules).unwrap(), tr);
    }

    #[test]
    fn output_is_untagged() {
        let rules = builtin_rules(&ConvertOptions::default()).unwrap();
        let out = apply_paste_rules(&pasted(&["# x"]), &rules).unwrap();
        assert_eq!(out.origin(), None);
        assert!(matches!(out.doc.content[0], BlockNode::Heading(_)));
        assert_eq!(apply_paste_rules(&out, &rules).unwrap(), out);
    }

    fn para(text: &str) -> BlockNode {
        BlockNode::paragraph(vec![InlineNode::text(text)])
    }

    #[test]
    fn partial_block_matches_split_the_paragraph() {
        let rule = PasteRule::new("word", Regex::new("b").unwrap(), |_| Ok(Some(vec![BlockNode::HorizontalRule])));
        let out = apply_paste_rules(&pasted(&["abc", "b"]), &[rule]).unwrap();
        assert_eq!(
            out.doc.content,
            vec![para("a"), BlockNode::HorizontalRule, para("c"), BlockNode::HorizontalRule]
        );
    }

    #[test]
    fn block_match_across_paragraphs_keeps_outer_text() {
        let rule = PasteRule::new("span", Regex::new(r"c\nd").unwrap(), |m| {
            assert_eq!(m.blocks.len(), 2);
            assert_eq!(m.content(0), vec![InlineNode::text("c")]);
            assert_eq!(m.content(1), vec![InlineNode::text("d")]);
            Ok(Some(vec![BlockNode::HorizontalRule]))
        });
        let out = apply_paste_rules(&pasted(&["abc", "def"]), &[rule]).unwrap();
        assert_eq!(out.doc.content, vec![para("ab"), BlockNode::HorizontalRule, para("ef")]);
    }

    #[test]
    fn inline_rule_rewrites_inside_the_paragraph() {
        let rules = builtin_rules(&ConvertOptions::default()).unwrap();
        let out = apply_paste_rules(&pasted(&["press <kbd>K</kbd> now"]), &rules).unwrap();
        let mut key = InlineNode::text("K");
        key.marks_mut().push(Mark::Kbd);
        assert_eq!(
            out.doc.content,
            vec![BlockNode::paragraph(vec![InlineNode::text("press "), key, InlineNode::text(" now")])]
        );
    }

    #[test]
    fn adjacent_inline_matches_stay_separate_spans() {
        let rules = builtin_rules(&ConvertOptions::default()).unwrap();
        let out = apply_paste_rules(&pasted(&["<kbd>Ctrl</kbd><kbd>C</kbd>"]), &rules).unwrap();
        let BlockNode::Paragraph(p) = &out.doc.content[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(p.content.len(), 2);
        assert_eq!(p.content[1].split(), Some(0));

        let index = crate::index::ReferenceIndex::new();
        let ctx = crate::context::ConvertContext::new("v", &index);
        assert_eq!(crate::serialize(&out.doc, &ctx), "<kbd>Ctrl</kbd><kbd>C</kbd>");
    }

    #[test]
    fn inline_matches_across_paragraphs_are_ignored() {
        let rule = PasteRule::inline("span", Regex::new(r"a\nb").unwrap(), |_| Ok(Some(vec![InlineNode::text("x")])));
        let out = apply_paste_rules(&pasted(&["a", "b"]), &[rule]).unwrap();
        assert_eq!(out.doc.content, vec![para("a"), para("b")]);
        assert!(out.steps.is_empty());
    }

    #[test]
    fn changed_range_limits_matching() {
        let rules = builtin_rules(&ConvertOptions::default()).unwrap();
        let tr = pasted(&["---", "---"]).with_changed(1..2);
        let out = apply_paste_rules(&tr, &rules).unwrap();
        assert!(matches!(out.doc.content[0], BlockNode::Paragraph(_)));
        assert_eq!(out.doc.content[1], BlockNode::HorizontalRule);
    }
}
