/// A list item line split into indentation, marker and text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker<'a> {
    /// Indentation width in characters.
    pub spacing: usize,
    /// Indentation is tabs rather than spaces.
    pub tabs: bool,
    pub marker: &'a str,
    pub ordered: bool,
    pub text: &'a str,
}

impl<'a> ListMarker<'a> {
    pub const BULLETS: [u8; 3] = [b'-', b'*', b'+'];
    pub const MAX_DIGITS: usize = 9;

    /// Recognises `<indent><marker> <text>`. Indentation must be all spaces
    /// or all tabs.
    pub fn parse(line: &'a str) -> Option<Self> {
        let b = line.as_bytes();
        let spacing = b.iter().take_while(|&&c| c == b' ' || c == b'\t').count();
        let indent = &b[..spacing];
        let tabs = indent.first() == Some(&b'\t');
        if indent.iter().any(|&c| c != indent[0]) {
            return None;
        }

        let rest = &b[spacing..];
        let (marker_len, ordered) = match rest.first() {
            Some(c) if Self::BULLETS.contains(c) => (1, false),
            Some(c) if c.is_ascii_digit() => {
                let digits = rest.iter().take_while(|c| c.is_ascii_digit()).count();
                if digits > Self::MAX_DIGITS || !matches!(rest.get(digits), Some(b'.' | b')')) {
                    return None;
                }
                (digits + 1, true)
            }
            _ => return None,
        };
        if rest.get(marker_len) != Some(&b' ') {
            return None;
        }

        let marker_end = spacing + marker_len;
        Some(Self {
            spacing,
            tabs,
            marker: &line[spacing..marker_end],
            ordered,
            text: &line[marker_end + 1..],
        })
    }

    /// Number of an ordered marker (`12.` gives 12).
    pub fn number(marker: &str) -> Option<u32> {
        marker
            .trim_end_matches(['.', ')'])
            .parse()
            .ok()
    }

    pub fn format(spacing: usize, tabs: bool, marker: &str, text: &str) -> String {
        let indent = if tabs { "\t" } else { " " }.repeat(spacing);
        format!("{indent}{marker} {text}")
    }
}
