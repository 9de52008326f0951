use crate::model::Mark;
use crate::parsing::inline::kinds::{CodeSpan, Emphasis, Kbd, Link};

/// Opening and closing markup of a mark.
pub fn delimiters(mark: &Mark) -> (String, String) {
    let symmetric = |d: &str| (d.to_string(), d.to_string());
    match mark {
        Mark::Bold => symmetric(Emphasis::Strong.delim()),
        Mark::Italic => symmetric(Emphasis::Em.delim()),
        Mark::Strike => symmetric(Emphasis::Strike.delim()),
        Mark::Highlight => symmetric(Emphasis::Highlight.delim()),
        Mark::Code => symmetric(&char::from(CodeSpan::TICK).to_string()),
        Mark::Kbd => (Kbd::OPEN.to_string(), Kbd::CLOSE.to_string()),
        Mark::Link { href, title } => (
            char::from(Link::OPEN).to_string(),
            format!("{}{}", char::from(Link::CLOSE), Link::format_dest(href, title.as_deref())),
        ),
    }
}

/// Writes a run of marked leaves, opening and closing marks only where the
/// active mark stack changes.
///
/// Between two leaves the longest common prefix of their mark lists stays
/// open; the rest of the old stack is closed innermost first and the new
/// marks are opened outermost first. A leaf's `split` caps the prefix kept
/// open, so two adjacent spans of the same mark stay two spans.
pub struct MarkWriter<'m, F> {
    out: String,
    active: Vec<&'m Mark>,
    delimiters: F,
}

impl<'m, F> MarkWriter<'m, F>
where
    F: Fn(&Mark) -> (String, String),
{
    pub fn new(delimiters: F) -> Self {
        Self {
            out: String::new(),
            active: vec![],
            delimiters,
        }
    }

    pub fn leaf(&mut self, marks: &'m [Mark], split: Option<usize>, text: &str) {
        let common = self
            .active
            .iter()
            .zip(marks)
            .take_while(|(a, b)| **a == *b)
            .count()
            .min(split.unwrap_or(usize::MAX));
        self.close_to(common);
        for mark in &marks[common..] {
            let (open, _) = (self.delimiters)(mark);
            self.out.push_str(&open);
            self.active.push(mark);
        }
        self.out.push_str(text);
    }

    fn close_to(&mut self, depth: usize) {
        while self.active.len() > depth {
            if let Some(mark) = self.active.pop() {
                let (_, close) = (self.delimiters)(mark);
                self.out.push_str(&close);
            }
        }
    }

    pub fn finish(mut self) -> String {
        self.close_to(0);
        self.out
    }
}
