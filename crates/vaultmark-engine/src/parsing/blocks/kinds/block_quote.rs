/// Blockquote block type with owned delimiter constant.
///
/// All blockquote-related syntax knowledge lives here, not scattered in
/// classifier or serializer code.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';

    /// Inner text of a quote line: `>` gives `""`, `> text` gives `text`.
    ///
    /// `> ` with nothing after it is not a quote line, since it could not be
    /// written back byte for byte.
    pub fn strip(line: &str) -> Option<&str> {
        let rest = line.strip_prefix(Self::PREFIX)?;
        if rest.is_empty() {
            return Some("");
        }
        let inner = rest.strip_prefix(' ')?;
        (!inner.is_empty()).then_some(inner)
    }

    /// Inverse of [`BlockQuote::strip`].
    pub fn prefix(inner: &str) -> String {
        if inner.is_empty() {
            Self::PREFIX.to_string()
        } else {
            format!("{} {inner}", Self::PREFIX)
        }
    }

    /// `inner` under `depth` levels of quoting; depth 1 is [`BlockQuote::prefix`].
    pub fn nest(inner: &str, depth: usize) -> String {
        if depth == 0 {
            return inner.to_string();
        }
        let mut line = format!("{} ", Self::PREFIX).repeat(depth - 1);
        line.push_str(&Self::prefix(inner));
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_no_quote() {
        assert_eq!(BlockQuote::strip("hello"), None);
        assert_eq!(BlockQuote::strip(" > hello"), None);
    }

    #[test]
    fn strip_single_quote() {
        assert_eq!(BlockQuote::strip("> hello"), Some("hello"));
        assert_eq!(BlockQuote::strip(">"), Some(""));
    }

    #[test]
    fn strip_keeps_nested_marker() {
        assert_eq!(BlockQuote::strip("> > hello"), Some("> hello"));
    }

    #[test]
    fn unrepresentable_forms_are_not_quotes() {
        assert_eq!(BlockQuote::strip(">hello"), None);
        assert_eq!(BlockQuote::strip("> "), None);
    }

    #[test]
    fn nest_matches_repeated_prefix() {
        for inner in ["", "x", "> y"] {
            let mut expected = inner.to_string();
            for depth in 0..4 {
                assert_eq!(BlockQuote::nest(inner, depth), expected);
                expected = BlockQuote::prefix(&expected);
            }
        }
    }

    #[test]
    fn prefix_is_inverse() {
        for line in [">", "> hello", "> > x"] {
            let inner = BlockQuote::strip(line).unwrap();
            assert_eq!(BlockQuote::prefix(inner), line);
        }
    }
}
