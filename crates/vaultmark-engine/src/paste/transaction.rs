use std::ops::Range;

use crate::model::{BlockNode, Document};

/// The UI event a transaction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Paste,
    Drop,
}

/// One structural edit: top-level blocks `range` (in the document as it was
/// before this step) replaced by `blocks`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceStep {
    pub range: Range<usize>,
    pub blocks: Vec<BlockNode>,
}

/// An in-progress edit of a document.
///
/// `changed` is the range of top-level blocks the edit touched; paste rules
/// only look inside it. `origin` is set by [`PasteSession::tag`] for
/// transactions created by a user paste or drop.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub doc: Document,
    pub changed: Range<usize>,
    pub steps: Vec<ReplaceStep>,
    origin: Option<UiEvent>,
}

impl Transaction {
    /// A programmatic transaction over the whole of `doc`.
    pub fn new(doc: Document) -> Self {
        let changed = 0..doc.content.len();
        Self {
            doc,
            changed,
            steps: vec![],
            origin: None,
        }
    }

    pub fn with_changed(mut self, changed: Range<usize>) -> Self {
        let len = self.doc.content.len();
        self.changed = changed.start.min(len)..changed.end.min(len);
        self
    }

    pub fn origin(&self) -> Option<UiEvent> {
        self.origin
    }

    pub(crate) fn clear_origin(&mut self) {
        self.origin = None;
    }

    /// Splices `blocks` over `range` and keeps `changed` covering the edit.
    pub fn replace(&mut self, range: Range<usize>, blocks: Vec<BlockNode>) {
        let removed = range.len();
        let inserted = blocks.len();
        self.doc.content.splice(range.clone(), blocks.iter().cloned());

        if range.start < self.changed.end {
            self.changed.end = (self.changed.end + inserted).saturating_sub(removed).max(range.start);
        }
        self.changed.start = self.changed.start.min(range.start);
        self.steps.push(ReplaceStep { range, blocks });
    }
}

/// Tags the next transaction after a paste or drop event.
///
/// The host calls [`PasteSession::begin`] once per DOM event and passes the
/// transaction that event produced through [`PasteSession::tag`]. Tagging
/// consumes the pending event, so undo, replay and programmatic edits reach
/// the rule engine untagged.
#[derive(Debug, Default)]
pub struct PasteSession {
    pending: Option<UiEvent>,
}

impl PasteSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, event: UiEvent) {
        self.pending = Some(event);
    }

    pub fn tag(&mut self, mut tr: Transaction) -> Transaction {
        tr.origin = self.pending.take();
        tr
    }
}
