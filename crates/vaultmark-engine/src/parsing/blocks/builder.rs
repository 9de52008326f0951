use std::collections::HashMap;

use crate::parsing::inline::parse_inline;
use crate::parsing::tokens::{Token, TokenKind};

use super::classify::LineClass;
use super::kinds::TableRow;

/// Phase 2 of block parsing: groups classified lines into block tokens.
///
/// Lines are buffered by [`BlockBuilder::push`]; [`BlockBuilder::finish`]
/// resolves fence closers in one reverse pass and then emits tokens front to
/// back, so the whole build stays linear in the number of lines.
///
/// Quote runs come back unbuilt as [`QuoteRun`]s; the caller tokenizes their
/// lines as the next level down.
#[derive(Default)]
pub struct BlockBuilder<'a> {
    lines: Vec<LineClass<'a>>,
}

impl<'a> BlockBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, class: LineClass<'a>) {
        self.lines.push(class);
    }

    pub fn finish(self) -> (Vec<Token>, Vec<QuoteRun<'a>>) {
        let closers = self.closers();
        let lines = &self.lines;
        let mut out = Vec::with_capacity(lines.len());
        let mut quotes = vec![];
        let mut i = 0;

        while i < lines.len() {
            let line = &lines[i];

            if let Some(close) = closers[i] {
                out.push(if let Some(open) = line.fence {
                    fenced_code(lines, i, close, open.fence, open.info)
                } else {
                    math_block(lines, i, close)
                });
                i = close + 1;
                continue;
            }

            if line.rule {
                out.push(Token::new(TokenKind::HorizontalRule, line.text));
                i += 1;
                continue;
            }

            if let Some((level, text)) = line.heading {
                out.push(
                    Token::new(TokenKind::Heading, line.text)
                        .with_attr("level", level.to_string())
                        .with_attr("text", text)
                        .with_children(parse_inline(text)),
                );
                i += 1;
                continue;
            }

            if line.quote.is_some() {
                let end = run_end(lines, i, |l| l.quote.is_some());
                quotes.push(QuoteRun {
                    token: out.len(),
                    lines: lines[i..end].iter().filter_map(|l| l.quote).collect(),
                });
                out.push(Token::new(TokenKind::Blockquote, "").with_attr("lines", format!("{i}..{end}")));
                i = end;
                continue;
            }

            if line.table_row && lines.get(i + 1).is_some_and(|l| l.table_delimiter) {
                let end = run_end(lines, i + 2, |l| l.table_row);
                out.push(table(&lines[i..end]));
                i = end;
                continue;
            }

            if let Some(item) = line.list {
                let mut token = Token::new(TokenKind::ListItem, line.text)
                    .with_attr("spacing", item.spacing.to_string())
                    .with_attr("marker", item.marker)
                    .with_attr("text", item.text)
                    .with_children(parse_inline(item.text));
                if item.tabs {
                    token.set_attr("tabs", "true");
                }
                if item.ordered {
                    token.set_attr("ordered", "true");
                }
                out.push(token);
                i += 1;
                continue;
            }

            out.push(paragraph(line.text));
            i += 1;
        }

        (out, quotes)
    }

    /// For every opening line, the index of the line that closes it.
    ///
    /// Walking backwards, `next_closer` maps each closing text to its nearest
    /// occurrence below the current line.
    fn closers(&self) -> Vec<Option<usize>> {
        let mut next_closer: HashMap<&str, usize> = HashMap::new();
        let mut closers = vec![None; self.lines.len()];
        for (idx, line) in self.lines.iter().enumerate().rev() {
            if let Some(fence) = line.fence_text() {
                closers[idx] = next_closer.get(fence).copied();
            }
            if line.closer {
                next_closer.insert(line.text, idx);
            }
        }
        closers
    }
}

/// Lines of a blockquote with one `>` prefix removed, waiting to be
/// tokenized into the children of `token`.
#[derive(Debug)]
pub struct QuoteRun<'a> {
    pub token: usize,
    pub lines: Vec<&'a str>,
}

fn run_end(lines: &[LineClass<'_>], from: usize, pred: impl Fn(&LineClass<'_>) -> bool) -> usize {
    let mut end = from.min(lines.len());
    while end < lines.len() && pred(&lines[end]) {
        end += 1;
    }
    end
}

fn raw_of(lines: &[LineClass<'_>]) -> String {
    lines.iter().map(|l| l.text).collect::<Vec<_>>().join("\n")
}

fn paragraph(text: &str) -> Token {
    let children = if text.is_empty() { vec![] } else { parse_inline(text) };
    Token::new(TokenKind::Paragraph, text).with_children(children)
}

fn fenced_code(lines: &[LineClass<'_>], open: usize, close: usize, fence: &str, info: &str) -> Token {
    let mut token = Token::new(TokenKind::CodeBlock, raw_of(&lines[open..=close]))
        .with_attr("fence", fence)
        .with_attr("language", info);
    if close > open + 1 {
        token.set_attr("code", raw_of(&lines[open + 1..close]));
    }
    token
}

fn math_block(lines: &[LineClass<'_>], open: usize, close: usize) -> Token {
    let mut token = Token::new(TokenKind::MathBlock, raw_of(&lines[open..=close]));
    if close > open + 1 {
        token.set_attr("expression", raw_of(&lines[open + 1..close]));
    }
    token
}

/// `lines` is the header row, the delimiter row, then body rows.
fn table(lines: &[LineClass<'_>]) -> Token {
    let row = |line: &LineClass<'_>| {
        let cells = TableRow::cells(line.text)
            .into_iter()
            .map(|cell| Token::new(TokenKind::TableCell, cell).with_children(parse_inline(cell)))
            .collect();
        Token::new(TokenKind::TableRow, line.text).with_children(cells)
    };
    let rows = std::iter::once(&lines[0]).chain(&lines[2..]).map(row).collect();
    Token::new(TokenKind::Table, raw_of(lines))
        .with_attr("delimiter", lines[1].text)
        .with_children(rows)
}
