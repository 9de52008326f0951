/// `[text](dest)` and `![alt](dest)` syntax.
pub struct Link;

impl Link {
    pub const OPEN: u8 = b'[';
    pub const CLOSE: u8 = b']';
    pub const DEST_OPEN: u8 = b'(';
    pub const DEST_CLOSE: u8 = b')';
    pub const IMAGE: &'static [u8; 2] = b"![";

    /// Splits a destination into href and optional title. Accepted forms are
    /// `href` and `href "title"` with exactly one space; the href itself may
    /// not contain whitespace.
    pub fn parse_dest(dest: &str) -> Option<(&str, Option<&str>)> {
        let (href, title) = match dest.split_once(' ') {
            Some((href, rest)) => {
                let title = rest.strip_prefix('"')?.strip_suffix('"')?;
                (href, Some(title))
            }
            None => (dest, None),
        };
        if href.is_empty() || href.contains(char::is_whitespace) {
            return None;
        }
        Some((href, title))
    }

    pub fn format_dest(href: &str, title: Option<&str>) -> String {
        match title {
            Some(title) => format!("({href} \"{title}\")"),
            None => format!("({href})"),
        }
    }
}

/// `<kbd>key</kbd>`.
pub struct Kbd;

impl Kbd {
    pub const OPEN: &'static str = "<kbd>";
    pub const CLOSE: &'static str = "</kbd>";
}

/// `$expression$`.
pub struct InlineMath;

impl InlineMath {
    pub const DOLLAR: u8 = b'$';
}

/// `#name`, only at the start of a run or after whitespace.
pub struct Label;

impl Label {
    pub const HASH: u8 = b'#';

    pub fn is_name_char(c: char) -> bool {
        c.is_alphanumeric() || matches!(c, '-' | '_' | '/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://a.b", Some(("https://a.b", None)))]
    #[case("u \"Title here\"", Some(("u", Some("Title here"))))]
    #[case("u \"\"", Some(("u", Some(""))))]
    #[case("u  \"two spaces\"", None)]
    #[case("u title", None)]
    #[case("", None)]
    fn destinations(#[case] dest: &str, #[case] expected: Option<(&str, Option<&str>)>) {
        assert_eq!(Link::parse_dest(dest), expected);
    }

    #[test]
    fn dest_format_is_inverse() {
        assert_eq!(Link::format_dest("u", Some("t")), "(u \"t\")");
        assert_eq!(Link::format_dest("u", None), "(u)");
    }
}
