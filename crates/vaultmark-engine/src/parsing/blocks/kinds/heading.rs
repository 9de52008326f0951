pub struct AtxHeading;

impl AtxHeading {
    pub const MARKER: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;

    /// `#` to `######` alone, or followed by a space and non-empty text.
    pub fn parse(line: &str) -> Option<(u8, &str)> {
        let level = line.bytes().take_while(|&b| b == Self::MARKER).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        let rest = &line[level..];
        if rest.is_empty() {
            return Some((level as u8, ""));
        }
        let text = rest.strip_prefix(' ')?;
        (!text.is_empty()).then_some((level as u8, text))
    }

    pub fn format(level: u8, text: &str) -> String {
        let hashes = "#".repeat(level as usize);
        if text.is_empty() {
            hashes
        } else {
            format!("{hashes} {text}")
        }
    }
}
