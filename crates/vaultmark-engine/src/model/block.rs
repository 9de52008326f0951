use serde::{Deserialize, Serialize};

use super::inline::{Image, InlineNode, YoutubeEmbed};

fn is_false(b: &bool) -> bool {
    !*b
}

/// Block-level node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockNode {
    Heading(Heading),
    Paragraph(Paragraph),
    List(List),
    Blockquote(Blockquote),
    CodeBlock(CodeBlock),
    MathBlock(MathBlock),
    Diagram(Diagram),
    Image(Image),
    YoutubeEmbed(YoutubeEmbed),
    HorizontalRule,
    Table(Table),
}

impl BlockNode {
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockNode::Heading(_) => "heading",
            BlockNode::Paragraph(_) => "paragraph",
            BlockNode::List(_) => "list",
            BlockNode::Blockquote(_) => "blockquote",
            BlockNode::CodeBlock(_) => "codeBlock",
            BlockNode::MathBlock(_) => "mathBlock",
            BlockNode::Diagram(_) => "diagram",
            BlockNode::Image(_) => "image",
            BlockNode::YoutubeEmbed(_) => "youtubeEmbed",
            BlockNode::HorizontalRule => "horizontalRule",
            BlockNode::Table(_) => "table",
        }
    }

    pub fn paragraph(content: Vec<InlineNode>) -> Self {
        BlockNode::Paragraph(Paragraph { content })
    }

    /// Blocks whose content is running text (as opposed to code, tables, embeds).
    pub fn is_text_block(&self) -> bool {
        matches!(self, BlockNode::Paragraph(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub id: String,
    pub content: Vec<InlineNode>,
}

/// One source line of text. An empty paragraph is a blank line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    pub content: Vec<InlineNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blockquote {
    pub content: Vec<BlockNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Info string after the opening fence, verbatim.
    pub language: String,
    /// The opening/closing fence, e.g. "```" or "~~~~".
    pub fence: String,
    /// `None` when the fence encloses no lines at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub fence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub header: TableRow,
    /// Raw delimiter cells (`---`, `:-:`) including their padding.
    pub delimiter: Vec<String>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub content: Vec<InlineNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListKind {
    BulletList,
    OrderedList,
}

/// A list. `spacing` is the indentation column count of the line that opened it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub kind: ListKind,
    pub spacing: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    pub content: Vec<ListEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ListEntry {
    ListItem(ListItem),
    TaskItem(TaskItem),
}

impl ListEntry {
    pub fn type_name(&self) -> &'static str {
        match self {
            ListEntry::ListItem(_) => "listItem",
            ListEntry::TaskItem(_) => "taskItem",
        }
    }

    pub fn spacing(&self) -> usize {
        match self {
            ListEntry::ListItem(i) => i.spacing,
            ListEntry::TaskItem(t) => t.spacing,
        }
    }

    pub fn tabs(&self) -> bool {
        match self {
            ListEntry::ListItem(i) => i.tabs,
            ListEntry::TaskItem(t) => t.tabs,
        }
    }

    pub fn marker(&self) -> &str {
        match self {
            ListEntry::ListItem(i) => &i.marker,
            ListEntry::TaskItem(t) => &t.marker,
        }
    }

    pub fn content(&self) -> &[InlineNode] {
        match self {
            ListEntry::ListItem(i) => &i.content,
            ListEntry::TaskItem(t) => &t.content,
        }
    }

    pub fn children(&self) -> &[List] {
        match self {
            ListEntry::ListItem(i) => &i.children,
            ListEntry::TaskItem(t) => &t.children,
        }
    }

    pub fn children_mut(&mut self) -> &mut Vec<List> {
        match self {
            ListEntry::ListItem(i) => &mut i.children,
            ListEntry::TaskItem(t) => &mut t.children,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Bullet or number exactly as written (`-`, `*`, `3.`, `1)`).
    pub marker: String,
    pub spacing: usize,
    #[serde(default, skip_serializing_if = "is_false")]
    pub tabs: bool,
    pub content: Vec<InlineNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<List>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    pub marker: String,
    pub spacing: usize,
    #[serde(default, skip_serializing_if = "is_false")]
    pub tabs: bool,
    pub id: String,
    pub completed: bool,
    /// Checkbox was written `[X]`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub uppercase: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Recurrence rule text; when present `id` is the rule's id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rrule: Option<String>,
    pub content: Vec<InlineNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<List>,
}
