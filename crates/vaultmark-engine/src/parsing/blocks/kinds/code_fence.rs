/// Opening line of a fenced block: the fence itself and the info string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceOpen<'a> {
    pub fence: &'a str,
    pub info: &'a str,
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICK: u8 = b'`';
    pub const TILDE: u8 = b'~';
    pub const MIN_LEN: usize = 3;

    /// Recognises an opening fence at column 0.
    pub fn open(line: &str) -> Option<FenceOpen<'_>> {
        let b = line.as_bytes();
        let ch = *b.first()?;
        if ch != Self::BACKTICK && ch != Self::TILDE {
            return None;
        }
        let len = b.iter().take_while(|&&c| c == ch).count();
        if len < Self::MIN_LEN {
            return None;
        }
        let info = &line[len..];
        if ch == Self::BACKTICK && info.as_bytes().contains(&Self::BACKTICK) {
            return None;
        }
        Some(FenceOpen {
            fence: &line[..len],
            info,
        })
    }

    /// A line that could close some fence: nothing but fence characters.
    pub fn is_closer(line: &str) -> bool {
        Self::open(line).is_some_and(|open| open.info.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_backtick_fence() {
        assert_eq!(
            CodeFence::open("```rust"),
            Some(FenceOpen {
                fence: "```",
                info: "rust"
            })
        );
    }

    #[test]
    fn detect_long_tilde_fence() {
        assert_eq!(
            CodeFence::open("~~~~"),
            Some(FenceOpen {
                fence: "~~~~",
                info: ""
            })
        );
        assert!(CodeFence::is_closer("~~~~"));
    }

    #[test]
    fn no_fence() {
        assert_eq!(CodeFence::open("hello"), None);
        assert_eq!(CodeFence::open("``"), None);
        assert_eq!(CodeFence::open(" ```"), None);
    }

    #[test]
    fn backtick_info_cannot_contain_backticks() {
        assert_eq!(CodeFence::open("``` a`b"), None);
        assert!(CodeFence::open("~~~ a`b").is_some());
    }

    #[test]
    fn opener_with_info_is_not_closer() {
        assert!(!CodeFence::is_closer("```js"));
        assert!(CodeFence::is_closer("```"));
    }
}
