/// Paired delimiters that wrap a run of inline content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Strong,
    Em,
    Strike,
    Highlight,
}

impl Emphasis {
    pub const ALL: [Emphasis; 4] = [Emphasis::Strong, Emphasis::Em, Emphasis::Strike, Emphasis::Highlight];

    pub fn delim(self) -> &'static str {
        match self {
            Emphasis::Strong => "**",
            Emphasis::Em => "*",
            Emphasis::Strike => "~~",
            Emphasis::Highlight => "==",
        }
    }

    /// Can the delimiter at `at` open a span? The next character must not be
    /// whitespace.
    pub fn opens_at(self, s: &str, at: usize) -> bool {
        self.matches_at(s, at)
            && s[at + self.delim().len()..]
                .chars()
                .next()
                .is_some_and(|c| !c.is_whitespace())
    }

    /// Can the delimiter at `at` close a span? The previous character must
    /// not be whitespace.
    pub fn closes_at(self, s: &str, at: usize) -> bool {
        self.matches_at(s, at) && s[..at].chars().next_back().is_some_and(|c| !c.is_whitespace())
    }

    /// A single `*` only counts when it is not part of a longer `*` run.
    fn matches_at(self, s: &str, at: usize) -> bool {
        let b = s.as_bytes();
        let delim = self.delim().as_bytes();
        if !b.get(at..).is_some_and(|rest| rest.starts_with(delim)) {
            return false;
        }
        if self != Emphasis::Em {
            return true;
        }
        let star = delim[0];
        let before = at.checked_sub(1).and_then(|p| b.get(p));
        before != Some(&star) && b.get(at + 1) != Some(&star)
    }

    /// Every position in `s` where this delimiter could close a span, ascending.
    pub fn closers(self, s: &str) -> Vec<usize> {
        let first = self.delim().as_bytes()[0];
        s.bytes()
            .enumerate()
            .filter(|&(at, b)| b == first && self.closes_at(s, at))
            .map(|(at, _)| at)
            .collect()
    }
}
