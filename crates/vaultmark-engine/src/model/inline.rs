use serde::{Deserialize, Serialize};

use crate::index::EntityType;

fn is_false(b: &bool) -> bool {
    !*b
}

/// Inline node. Every variant carries the marks that cover it, outermost first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InlineNode {
    Text(Text),
    Wikilink(Wikilink),
    Image(Image),
    YoutubeEmbed(YoutubeEmbed),
    LinkPreview(LinkPreview),
    InlineMath(InlineMath),
    Label(Label),
}

impl InlineNode {
    pub fn type_name(&self) -> &'static str {
        match self {
            InlineNode::Text(_) => "text",
            InlineNode::Wikilink(_) => "wikilink",
            InlineNode::Image(_) => "image",
            InlineNode::YoutubeEmbed(_) => "youtubeEmbed",
            InlineNode::LinkPreview(_) => "linkPreview",
            InlineNode::InlineMath(_) => "inlineMath",
            InlineNode::Label(_) => "label",
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        InlineNode::Text(Text {
            text: text.into(),
            marks: vec![],
            split: None,
        })
    }

    pub fn marks(&self) -> &[Mark] {
        match self {
            InlineNode::Text(n) => &n.marks,
            InlineNode::Wikilink(n) => &n.marks,
            InlineNode::Image(n) => &n.marks,
            InlineNode::YoutubeEmbed(n) => &n.marks,
            InlineNode::LinkPreview(n) => &n.marks,
            InlineNode::InlineMath(n) => &n.marks,
            InlineNode::Label(n) => &n.marks,
        }
    }

    pub fn marks_mut(&mut self) -> &mut Vec<Mark> {
        match self {
            InlineNode::Text(n) => &mut n.marks,
            InlineNode::Wikilink(n) => &mut n.marks,
            InlineNode::Image(n) => &mut n.marks,
            InlineNode::YoutubeEmbed(n) => &mut n.marks,
            InlineNode::LinkPreview(n) => &mut n.marks,
            InlineNode::InlineMath(n) => &mut n.marks,
            InlineNode::Label(n) => &mut n.marks,
        }
    }

    pub fn split(&self) -> Option<usize> {
        match self {
            InlineNode::Text(n) => n.split,
            InlineNode::Wikilink(n) => n.split,
            InlineNode::Image(n) => n.split,
            InlineNode::YoutubeEmbed(n) => n.split,
            InlineNode::LinkPreview(n) => n.split,
            InlineNode::InlineMath(n) => n.split,
            InlineNode::Label(n) => n.split,
        }
    }

    pub fn set_split(&mut self, split: Option<usize>) {
        let slot = match self {
            InlineNode::Text(n) => &mut n.split,
            InlineNode::Wikilink(n) => &mut n.split,
            InlineNode::Image(n) => &mut n.split,
            InlineNode::YoutubeEmbed(n) => &mut n.split,
            InlineNode::LinkPreview(n) => &mut n.split,
            InlineNode::InlineMath(n) => &mut n.split,
            InlineNode::Label(n) => &mut n.split,
        };
        *slot = split;
    }

    /// Plain text of this node; non-text leaves are an object replacement char.
    pub fn plain_text(&self) -> &str {
        match self {
            InlineNode::Text(t) => &t.text,
            _ => "\u{FFFC}",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    /// Marks from this depth on open a new span here, even where the
    /// previous leaf carries the same marks (`` `a``b` ``, not `` `ab` ``).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<usize>,
}

/// `[[raw]]` reference to another document or task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wikilink {
    /// Everything between the outer brackets, verbatim.
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<EntityType>,
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Written as an embed, `![[raw]]`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub preview: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<usize>,
}

impl Wikilink {
    pub fn unresolved(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            target_id: None,
            target_type: None,
            resolved: false,
            anchor: None,
            alias: None,
            preview: false,
            marks: vec![],
            split: None,
        }
    }
}

/// Image reference, either `![alt](src)` or `![[src]]` (`wiki`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Reference exactly as written in the markup.
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub wiki: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoutubeEmbed {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<usize>,
}

/// Link rendered as a rich preview card, `[label](href "preview:...")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPreview {
    pub href: String,
    pub label: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineMath {
    pub expression: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<usize>,
}

/// `#name` label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Bold,
    Italic,
    Strike,
    Highlight,
    Code,
    Kbd,
    Link {
        href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
}

impl Mark {
    pub fn type_name(&self) -> &'static str {
        match self {
            Mark::Bold => "bold",
            Mark::Italic => "italic",
            Mark::Strike => "strike",
            Mark::Highlight => "highlight",
            Mark::Code => "code",
            Mark::Kbd => "kbd",
            Mark::Link { .. } => "link",
        }
    }

    /// Length of the common prefix of two mark stacks.
    pub fn shared_depth(a: &[Mark], b: &[Mark]) -> usize {
        a.iter().zip(b).take_while(|(x, y)| x == y).count()
    }
}
