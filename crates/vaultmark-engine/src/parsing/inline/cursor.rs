/// A cursor for byte-by-byte inline parsing.
///
/// Every construct the inline parser recognises starts and ends on an ASCII
/// byte, so positions handed out by the cursor are always char boundaries
/// whenever a construct matched.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being parsed.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Byte at `offset` past the current position.
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.s.as_bytes().get(self.i + offset).copied()
    }

    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s.as_bytes().get(self.i..).is_some_and(|rest| rest.starts_with(pat))
    }

    /// True at the start of input or right after a whitespace character.
    pub fn after_boundary(&self) -> bool {
        self.s[..self.i]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace)
    }

    /// Advances past the current character (not just one byte).
    pub fn bump_char(&mut self) {
        let len = self.s[self.i..].chars().next().map_or(1, char::len_utf8);
        self.i += len;
    }

    pub fn jump_to(&mut self, i: usize) {
        self.i = i;
    }
}
