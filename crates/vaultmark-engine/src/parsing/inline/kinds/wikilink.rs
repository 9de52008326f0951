use std::collections::HashMap;

pub struct WikiLink;

impl WikiLink {
    pub const OPEN: &'static [u8; 2] = b"[[";
    pub const CLOSE: &'static [u8; 2] = b"]]";
    pub const EMBED: u8 = b'!';
    pub const ANCHOR: char = '#';
    pub const ALIAS: char = '|';

    /// Pairs every `[[` with the `]]` that balances it.
    ///
    /// Nested pairs are matched first, so `[[a [[b]] c]]` pairs the outer
    /// opener with the last closer instead of stopping at the first `]]`.
    pub fn match_pairs(s: &str) -> HashMap<usize, usize> {
        let b = s.as_bytes();
        let mut open = vec![];
        let mut pairs = HashMap::new();
        let mut i = 0;
        while i + 1 < b.len() {
            if b[i..].starts_with(Self::OPEN) {
                open.push(i);
                i += 2;
            } else if b[i..].starts_with(Self::CLOSE) {
                if let Some(start) = open.pop() {
                    pairs.insert(start, i);
                }
                i += 2;
            } else {
                i += 1;
            }
        }
        pairs
    }

    pub fn format(raw: &str, embed: bool) -> String {
        let bang = if embed { "!" } else { "" };
        format!("{bang}[[{raw}]]")
    }
}

/// The parts of a wikilink's inner text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WikiTarget<'a> {
    pub target: &'a str,
    pub anchor: Option<&'a str>,
    pub alias: Option<&'a str>,
}

impl<'a> WikiTarget<'a> {
    /// Splits `target#anchor|alias`. Anything after the first `|` is the
    /// alias, so display text may itself contain `#` or brackets.
    pub fn split(raw: &'a str) -> Self {
        let (head, alias) = match raw.split_once(WikiLink::ALIAS) {
            Some((head, alias)) => (head, Some(alias)),
            None => (raw, None),
        };
        let (target, anchor) = match head.split_once(WikiLink::ANCHOR) {
            Some((target, anchor)) => (target, Some(anchor)),
            None => (head, None),
        };
        Self { target, anchor, alias }
    }
}
