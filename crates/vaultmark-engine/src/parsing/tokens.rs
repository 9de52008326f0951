use std::collections::BTreeMap;

/// Token type tag; the key of the transform dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    // Block tokens
    Paragraph,
    Heading,
    CodeBlock,
    Diagram,
    MathBlock,
    HorizontalRule,
    Blockquote,
    Table,
    TableRow,
    TableCell,
    ListItem,
    TaskItem,
    // Inline tokens
    Text,
    Strong,
    Emphasis,
    Strike,
    Highlight,
    CodeSpan,
    Kbd,
    Link,
    LinkPreview,
    Image,
    YoutubeEmbed,
    WikiEmbed,
    Wikilink,
    InlineMath,
    Label,
}

/// A unit of syntax produced by the tokenizer.
///
/// `raw` is the exact source text the token covers (block tokens joined with
/// `\n`). Blockquotes are the exception: their `raw` is empty and the `lines`
/// attr holds the `start..end` line range they cover at their own level.
/// Per-kind facts live in `attrs`; container tokens hold `children`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub raw: String,
    pub children: Vec<Token>,
    pub attrs: BTreeMap<String, String>,
}

impl Token {
    pub fn new(kind: TokenKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
            children: vec![],
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_children(mut self, children: Vec<Token>) -> Self {
        self.children = children;
        self
    }

    pub fn retag(mut self, kind: TokenKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        self.attrs.insert(key.to_string(), value.into());
    }

    pub fn flag(&self, key: &str) -> bool {
        self.attr(key) == Some("true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attrs_and_flags() {
        let t = Token::new(TokenKind::ListItem, "- x")
            .with_attr("marker", "-")
            .with_attr("tabs", "true");
        assert_eq!(t.attr("marker"), Some("-"));
        assert!(t.flag("tabs"));
        assert!(!t.flag("ordered"));
        assert_eq!(t.retag(TokenKind::TaskItem).kind, TokenKind::TaskItem);
    }
}
