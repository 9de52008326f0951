use std::collections::HashMap;

use crate::parsing::tokens::{Token, TokenKind};

use super::{
    cursor::Cursor,
    kinds::{CodeSpan, Emphasis, InlineMath, Kbd, Label, Link, WikiLink},
};

/// Parses one run of inline text into a sequence of inline [`Token`]s.
///
/// # Precedence
/// At every position constructs are tried in this order: code span, wiki
/// embed, wikilink, image, link, inline math, kbd, emphasis, label. Code
/// spans are raw zones; `` `[[x]]` `` is code, not a wikilink.
///
/// # Returns
/// Tokens covering the entire input. Text between constructs is emitted as
/// [`TokenKind::Text`], so concatenating every token's `raw` reproduces `s`.
pub fn parse_inline(s: &str) -> Vec<Token> {
    let scan = Scan::new(s);
    let mut cur = Cursor::new(s);
    let mut out = vec![];
    let mut text_start = 0;

    while !cur.eof() {
        let start = cur.pos();
        if let Some(token) = scan.try_construct(&mut cur) {
            flush_text(&mut out, &s[text_start..start]);
            out.push(token);
            text_start = cur.pos();
            continue;
        }
        cur.bump_char();
    }

    flush_text(&mut out, &s[text_start..]);
    out
}

fn flush_text(out: &mut Vec<Token>, text: &str) {
    if !text.is_empty() {
        out.push(Token::new(TokenKind::Text, text));
    }
}

/// First entry of an ascending position list that is `>= from`.
fn first_from(positions: &[usize], from: usize) -> Option<usize> {
    let k = positions.partition_point(|&p| p < from);
    positions.get(k).copied()
}

/// Closing-delimiter positions computed once per run.
///
/// Looking closers up here instead of scanning forward from every opener
/// keeps a line full of unmatched openers linear.
struct Scan<'a> {
    s: &'a str,
    wiki: HashMap<usize, usize>,
    ticks: Vec<usize>,
    brackets: Vec<usize>,
    parens: Vec<usize>,
    dollars: Vec<usize>,
    kbd_closers: Vec<usize>,
    emphasis: Vec<(Emphasis, Vec<usize>)>,
}

impl<'a> Scan<'a> {
    fn new(s: &'a str) -> Self {
        let positions = |byte: u8| -> Vec<usize> {
            s.bytes()
                .enumerate()
                .filter(|&(_, b)| b == byte)
                .map(|(i, _)| i)
                .collect()
        };
        Self {
            s,
            wiki: WikiLink::match_pairs(s),
            ticks: positions(CodeSpan::TICK),
            brackets: positions(Link::CLOSE),
            parens: positions(Link::DEST_CLOSE),
            dollars: positions(InlineMath::DOLLAR),
            kbd_closers: s.match_indices(Kbd::CLOSE).map(|(i, _)| i).collect(),
            emphasis: Emphasis::ALL.iter().map(|&e| (e, e.closers(s))).collect(),
        }
    }

    fn try_construct(&self, cur: &mut Cursor<'_>) -> Option<Token> {
        match cur.peek()? {
            CodeSpan::TICK => self.code_span(cur),
            WikiLink::EMBED => self.wiki(cur, true).or_else(|| self.image(cur)),
            Link::OPEN => self.wiki(cur, false).or_else(|| self.link(cur)),
            InlineMath::DOLLAR => self.inline_math(cur),
            b'<' => self.kbd(cur),
            b'*' | b'~' | b'=' => self.emphasis(cur),
            Label::HASH => self.label(cur),
            _ => None,
        }
    }

    fn code_span(&self, cur: &mut Cursor<'_>) -> Option<Token> {
        let start = cur.pos();
        let close = first_from(&self.ticks, start + 1)?;
        if close == start + 1 {
            return None;
        }
        cur.jump_to(close + 1);
        Some(Token::new(TokenKind::CodeSpan, &self.s[start..=close]).with_attr("code", &self.s[start + 1..close]))
    }

    /// `[[target]]`, or `![[target]]` when `embed` is set.
    fn wiki(&self, cur: &mut Cursor<'_>, embed: bool) -> Option<Token> {
        let start = cur.pos();
        let open = if embed {
            if cur.peek_at(1) != Some(Link::OPEN) {
                return None;
            }
            start + 1
        } else {
            start
        };
        let close = *self.wiki.get(&open)?;
        let inner_start = open + WikiLink::OPEN.len();
        if close == inner_start {
            return None;
        }
        let end = close + WikiLink::CLOSE.len();
        let kind = if embed { TokenKind::WikiEmbed } else { TokenKind::Wikilink };
        cur.jump_to(end);
        Some(Token::new(kind, &self.s[start..end]).with_attr("target", &self.s[inner_start..close]))
    }

    /// Brackets and destination of `[text](dest)` starting at `open`.
    fn bracketed(&self, open: usize) -> Option<(usize, usize)> {
        let close_bracket = first_from(&self.brackets, open + 1)?;
        if self.s.as_bytes().get(close_bracket + 1) != Some(&Link::DEST_OPEN) {
            return None;
        }
        let close_paren = first_from(&self.parens, close_bracket + 2)?;
        Some((close_bracket, close_paren))
    }

    fn image(&self, cur: &mut Cursor<'_>) -> Option<Token> {
        if !cur.starts_with(Link::IMAGE) {
            return None;
        }
        let start = cur.pos();
        let (cb, cp) = self.bracketed(start + 1)?;
        let (src, title) = Link::parse_dest(&self.s[cb + 2..cp])?;
        if title.is_some() {
            return None;
        }
        cur.jump_to(cp + 1);
        Some(
            Token::new(TokenKind::Image, &self.s[start..=cp])
                .with_attr("src", src)
                .with_attr("alt", &self.s[start + 2..cb]),
        )
    }

    fn link(&self, cur: &mut Cursor<'_>) -> Option<Token> {
        let start = cur.pos();
        let (cb, cp) = self.bracketed(start)?;
        if cb == start + 1 {
            return None;
        }
        let (href, title) = Link::parse_dest(&self.s[cb + 2..cp])?;
        let text = &self.s[start + 1..cb];
        let mut token = Token::new(TokenKind::Link, &self.s[start..=cp])
            .with_attr("href", href)
            .with_attr("text", text)
            .with_children(parse_inline(text));
        if let Some(title) = title {
            token.set_attr("title", title);
        }
        cur.jump_to(cp + 1);
        Some(token)
    }

    fn inline_math(&self, cur: &mut Cursor<'_>) -> Option<Token> {
        let start = cur.pos();
        let close = first_from(&self.dollars, start + 1)?;
        if close == start + 1 {
            return None;
        }
        cur.jump_to(close + 1);
        Some(
            Token::new(TokenKind::InlineMath, &self.s[start..=close])
                .with_attr("expression", &self.s[start + 1..close]),
        )
    }

    fn kbd(&self, cur: &mut Cursor<'_>) -> Option<Token> {
        if !cur.starts_with(Kbd::OPEN.as_bytes()) {
            return None;
        }
        let start = cur.pos();
        let inner_start = start + Kbd::OPEN.len();
        let close = first_from(&self.kbd_closers, inner_start + 1)?;
        let end = close + Kbd::CLOSE.len();
        let inner = &self.s[inner_start..close];
        cur.jump_to(end);
        Some(Token::new(TokenKind::Kbd, &self.s[start..end]).with_children(parse_inline(inner)))
    }

    fn emphasis(&self, cur: &mut Cursor<'_>) -> Option<Token> {
        let start = cur.pos();
        let (kind, close) = self.emphasis.iter().find_map(|(kind, closers)| {
            if !kind.opens_at(self.s, start) {
                return None;
            }
            let inner_start = start + kind.delim().len();
            // In a run like `***` the closer is the last delimiter of the run.
            let mut k = closers.partition_point(|&p| p <= inner_start);
            let mut close = *closers.get(k)?;
            while closers.get(k + 1) == Some(&(close + 1)) {
                k += 1;
                close += 1;
            }
            Some((*kind, close))
        })?;
        let len = kind.delim().len();
        let end = close + len;
        let token_kind = match kind {
            Emphasis::Strong => TokenKind::Strong,
            Emphasis::Em => TokenKind::Emphasis,
            Emphasis::Strike => TokenKind::Strike,
            Emphasis::Highlight => TokenKind::Highlight,
        };
        cur.jump_to(end);
        Some(Token::new(token_kind, &self.s[start..end]).with_children(parse_inline(&self.s[start + len..close])))
    }

    fn label(&self, cur: &mut Cursor<'_>) -> Option<Token> {
        if !cur.after_boundary() {
            return None;
        }
        let start = cur.pos();
        let name_start = start + 1;
        let name_len: usize = self.s[name_start..]
            .chars()
            .take_while(|&c| Label::is_name_char(c))
            .map(char::len_utf8)
            .sum();
        if name_len == 0 {
            return None;
        }
        let end = name_start + name_len;
        cur.jump_to(end);
        Some(Token::new(TokenKind::Label, &self.s[start..end]).with_attr("name", &self.s[name_start..end]))
    }
}
