use std::ops::Range;

use regex::{Captures, Regex};

use crate::context::ConvertOptions;
use crate::error::PasteError;
use crate::ids::random_id;
use crate::model::{
    BlockNode, Blockquote, CodeBlock, Diagram, Heading, InlineNode, ListEntry, ListItem, ListKind, Mark, TaskItem,
};
use crate::parsing::blocks::kinds::{BlockQuote, ListMarker};
use crate::parsing::lists::{self, ListLine};
use crate::parsing::transform::{Checkbox, ScheduleDirective};

use super::position::{Piece, plain_len, slice};

pub type BlockHandler = dyn Fn(&PasteMatch<'_, '_>) -> Result<Option<Vec<BlockNode>>, PasteError> + Send + Sync;
pub type InlineHandler = dyn Fn(&PasteMatch<'_, '_>) -> Result<Option<Vec<InlineNode>>, PasteError> + Send + Sync;

enum Handler {
    Blocks(Box<BlockHandler>),
    Inline(Box<InlineHandler>),
}

/// What a handler puts in place of the matched text.
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    /// New blocks. Text of the first and last paragraph outside the match
    /// stays behind as paragraphs of its own.
    Blocks(Vec<BlockNode>),
    /// New inline content spliced into the paragraph in place of the match.
    /// Only used for matches inside a single paragraph.
    Inline(Vec<InlineNode>),
}

/// A matcher over flattened paragraph text and the handler that rewrites
/// what it matched.
pub struct PasteRule {
    pub name: String,
    pub matcher: Regex,
    handler: Handler,
}

impl PasteRule {
    /// A rule whose handler turns the match into blocks.
    pub fn new<F>(name: impl Into<String>, matcher: Regex, handler: F) -> Self
    where
        F: Fn(&PasteMatch<'_, '_>) -> Result<Option<Vec<BlockNode>>, PasteError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            matcher,
            handler: Handler::Blocks(Box::new(handler)),
        }
    }

    /// A rule whose handler rewrites the match as inline content of the
    /// paragraph it sits in.
    pub fn inline<F>(name: impl Into<String>, matcher: Regex, handler: F) -> Self
    where
        F: Fn(&PasteMatch<'_, '_>) -> Result<Option<Vec<InlineNode>>, PasteError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            matcher,
            handler: Handler::Inline(Box::new(handler)),
        }
    }

    /// `Ok(None)` declines the match.
    pub fn handle(&self, m: &PasteMatch<'_, '_>) -> Result<Option<Replacement>, PasteError> {
        Ok(match &self.handler {
            Handler::Blocks(f) => f(m)?.map(Replacement::Blocks),
            Handler::Inline(f) => f(m)?.map(Replacement::Inline),
        })
    }
}

impl std::fmt::Debug for PasteRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.handler {
            Handler::Blocks(_) => "blocks",
            Handler::Inline(_) => "inline",
        };
        f.debug_struct("PasteRule")
            .field("name", &self.name)
            .field("matcher", &self.matcher.as_str())
            .field("handler", &kind)
            .finish()
    }
}

/// A match over one or more paragraphs.
pub struct PasteMatch<'a, 't> {
    pub captures: &'a Captures<'t>,
    /// The paragraphs the match touches, one per line of the match.
    pub blocks: &'a [BlockNode],
    /// The covered part of each of `blocks`.
    pub pieces: &'a [Piece],
}

impl<'t> PasteMatch<'_, 't> {
    pub fn lines(&self) -> Vec<&'t str> {
        self.captures.get(0).map_or("", |m| m.as_str()).split('\n').collect()
    }

    /// The matched part of the `i`th paragraph's inline content.
    pub fn content(&self, i: usize) -> Vec<InlineNode> {
        match (self.blocks.get(i), self.pieces.get(i)) {
            (Some(BlockNode::Paragraph(p)), Some(piece)) => slice(&p.content, piece.range.clone()),
            _ => vec![],
        }
    }

    /// [`PasteMatch::content`] without its first `skip` bytes.
    pub fn content_after(&self, i: usize, skip: usize) -> Vec<InlineNode> {
        let content = self.content(i);
        let len = plain_len(&content);
        slice(&content, skip.min(len)..len)
    }

    /// Where capture group `i` sits, relative to the start of the match.
    pub fn group_range(&self, i: usize) -> Option<Range<usize>> {
        let whole = self.captures.get(0)?;
        let group = self.captures.get(i)?;
        Some(group.start() - whole.start()..group.end() - whole.start())
    }
}

const LIST_LINE: &str = r"[ \t]*(?:[-*+]|\d{1,9}[.)]) .*";
const TASK_LINE: &str = r"\[[ xX]\] .*";
const QUOTE_LINE: &str = r">(?: .+)?";

/// Lines matching `line`, one or more in a row.
fn line_run(line: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"(?m)^{line}$(?:\n{line}$)*"))
}

/// Code fences, keyboard keys, links, blockquotes, headings, horizontal
/// rules, lists and bare task lines, in that order.
pub fn builtin_rules(options: &ConvertOptions) -> Result<Vec<PasteRule>, regex::Error> {
    let diagram_language = options.diagram_language.clone();
    Ok(vec![
        PasteRule::new(
            "codeblock",
            Regex::new(r"(?ms)^(`{3,}|~{3,})([^\n]*)$.*?^(`{3,}|~{3,})$")?,
            move |m| Ok(code_block(m, &diagram_language)),
        ),
        PasteRule::inline("kbd", Regex::new(r"<kbd>([^<\n]+)</kbd>")?, |m| Ok(kbd(m))),
        PasteRule::inline(
            "link",
            Regex::new(r"\[([^\[\]\n]+)\]\(([a-z][a-z0-9+.-]*://[^\s()]+)\)")?,
            |m| Ok(link(m)),
        ),
        PasteRule::new("blockquote", line_run(QUOTE_LINE)?, |m| Ok(blockquote(m))),
        PasteRule::new("heading", Regex::new(r"(?m)^(#{1,6}) \S.*$")?, |m| Ok(heading(m))),
        PasteRule::new("hr", Regex::new(r"(?m)^---$")?, |_| Ok(Some(vec![BlockNode::HorizontalRule]))),
        PasteRule::new("list", line_run(LIST_LINE)?, |m| Ok(list(m))),
        PasteRule::new("task", line_run(TASK_LINE)?, |m| Ok(bare_tasks(m))),
    ])
}

/// The matched text of group `i` with `mark` added to every leaf.
fn marked_group(m: &PasteMatch<'_, '_>, i: usize, mark: Mark) -> Option<Vec<InlineNode>> {
    let mut nodes = slice(&m.content(0), m.group_range(i)?);
    for node in &mut nodes {
        node.marks_mut().push(mark.clone());
    }
    (!nodes.is_empty()).then_some(nodes)
}

fn kbd(m: &PasteMatch<'_, '_>) -> Option<Vec<InlineNode>> {
    marked_group(m, 1, Mark::Kbd)
}

fn link(m: &PasteMatch<'_, '_>) -> Option<Vec<InlineNode>> {
    let href = m.captures.get(2)?.as_str().to_string();
    marked_group(m, 1, Mark::Link { href, title: None })
}

fn code_block(m: &PasteMatch<'_, '_>, diagram_language: &str) -> Option<Vec<BlockNode>> {
    let fence = m.captures.get(1)?.as_str();
    if m.captures.get(3)?.as_str() != fence {
        return None;
    }
    let language = m.captures.get(2)?.as_str();
    let lines = m.lines();
    let body = (lines.len() > 2).then(|| lines[1..lines.len() - 1].join("\n"));
    let block = if language == diagram_language {
        BlockNode::Diagram(Diagram {
            fence: fence.to_string(),
            expression: body,
        })
    } else {
        BlockNode::CodeBlock(CodeBlock {
            language: language.to_string(),
            fence: fence.to_string(),
            code: body,
        })
    };
    Some(vec![block])
}

fn blockquote(m: &PasteMatch<'_, '_>) -> Option<Vec<BlockNode>> {
    let mut content = vec![];
    for (i, line) in m.lines().into_iter().enumerate() {
        let inner = BlockQuote::strip(line)?;
        content.push(BlockNode::paragraph(m.content_after(i, line.len() - inner.len())));
    }
    Some(vec![BlockNode::Blockquote(Blockquote { content })])
}

fn heading(m: &PasteMatch<'_, '_>) -> Option<Vec<BlockNode>> {
    let level = m.captures.get(1)?.as_str().len();
    Some(vec![BlockNode::Heading(Heading {
        level: level as u8,
        id: random_id(),
        content: m.content_after(0, level + 1),
    })])
}

fn list(m: &PasteMatch<'_, '_>) -> Option<Vec<BlockNode>> {
    let mut lines = vec![];
    for (i, line) in m.lines().into_iter().enumerate() {
        let marker = ListMarker::parse(line)?;
        let offset = line.len() - marker.text.len();
        let kind = if marker.ordered { ListKind::OrderedList } else { ListKind::BulletList };
        let entry = match Checkbox::parse(marker.text) {
            Some((checkbox, rest)) => task_entry(m, i, &marker, checkbox, rest, offset + Checkbox::LEN),
            None => ListEntry::ListItem(ListItem {
                marker: marker.marker.to_string(),
                spacing: marker.spacing,
                tabs: marker.tabs,
                content: m.content_after(i, offset),
                children: vec![],
            }),
        };
        lines.push(ListLine::new(kind, entry));
    }
    Some(lists::build(lines).into_iter().map(BlockNode::List).collect())
}

/// `[ ] text` lines without a list marker become a bullet task list.
fn bare_tasks(m: &PasteMatch<'_, '_>) -> Option<Vec<BlockNode>> {
    let bullet = ListMarker {
        spacing: 0,
        tabs: false,
        marker: "-",
        ordered: false,
        text: "",
    };
    let mut lines = vec![];
    for (i, line) in m.lines().into_iter().enumerate() {
        let (checkbox, rest) = Checkbox::parse(line)?;
        let entry = task_entry(m, i, &bullet, checkbox, rest, Checkbox::LEN);
        lines.push(ListLine::new(ListKind::BulletList, entry));
    }
    Some(lists::build(lines).into_iter().map(BlockNode::List).collect())
}

/// A task item from the text after its checkbox, which starts at byte
/// `offset` of paragraph `i`. Trailing scheduling directives become fields.
fn task_entry(
    m: &PasteMatch<'_, '_>,
    i: usize,
    marker: &ListMarker<'_>,
    checkbox: Checkbox,
    rest: &str,
    offset: usize,
) -> ListEntry {
    let (visible, directive) = ScheduleDirective::extract(rest);
    let (id, rrule) = match directive.rrule {
        Some((id, rule)) => (id, Some(rule)),
        None => (random_id(), None),
    };
    ListEntry::TaskItem(TaskItem {
        marker: marker.marker.to_string(),
        spacing: marker.spacing,
        tabs: marker.tabs,
        id,
        completed: checkbox.completed,
        uppercase: checkbox.uppercase,
        start: directive.start,
        end: directive.end,
        rrule,
        content: slice(&m.content(i), offset..offset + visible.len()),
        children: vec![],
    })
}
