use super::kinds::{AtxHeading, BlockQuote, CodeFence, FenceOpen, ListMarker, MathFence, TableRow, ThematicBreak};

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of block parsing: each line is classified independently
/// without reference to surrounding context. Several fields may be set at
/// once; the builder decides precedence.
#[derive(Debug, Clone)]
pub struct LineClass<'a> {
    pub text: &'a str,
    /// Opens a fenced code block.
    pub fence: Option<FenceOpen<'a>>,
    /// Is exactly `$$`.
    pub math_fence: bool,
    /// Could close a fence or math block opened earlier.
    pub closer: bool,
    pub rule: bool,
    pub heading: Option<(u8, &'a str)>,
    pub quote: Option<&'a str>,
    pub table_row: bool,
    pub table_delimiter: bool,
    pub list: Option<ListMarker<'a>>,
}

impl<'a> LineClass<'a> {
    /// The text a closing line must equal, for lines that open a block.
    pub fn fence_text(&self) -> Option<&'a str> {
        match (self.fence, self.math_fence) {
            (Some(open), _) => Some(open.fence),
            (None, true) => Some(MathFence::DELIM),
            (None, false) => None,
        }
    }
}

/// Classifies individual lines for the block parsing phase.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    pub fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        let math_fence = line == MathFence::DELIM;
        LineClass {
            text: line,
            fence: CodeFence::open(line),
            math_fence,
            closer: math_fence || CodeFence::is_closer(line),
            rule: line == ThematicBreak::LINE,
            heading: AtxHeading::parse(line),
            quote: BlockQuote::strip(line),
            table_row: TableRow::is_row(line),
            table_delimiter: TableRow::is_delimiter(line),
            list: ListMarker::parse(line),
        }
    }
}
