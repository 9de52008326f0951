pub struct TableRow;

impl TableRow {
    pub const PIPE: char = '|';

    pub fn is_row(line: &str) -> bool {
        line.len() >= 2 && line.starts_with(Self::PIPE) && line.ends_with(Self::PIPE)
    }

    /// Raw cell texts between the outer pipes, padding included.
    pub fn cells(line: &str) -> Vec<&str> {
        line[1..line.len() - 1].split(Self::PIPE).collect()
    }

    /// `| --- | :-: |` style row separating the header from the body.
    pub fn is_delimiter(line: &str) -> bool {
        Self::is_row(line) && Self::cells(line).iter().all(|c| Self::is_delimiter_cell(c))
    }

    fn is_delimiter_cell(cell: &str) -> bool {
        let c = cell.trim_matches(' ');
        let c = c.strip_prefix(':').unwrap_or(c);
        let c = c.strip_suffix(':').unwrap_or(c);
        !c.is_empty() && c.bytes().all(|b| b == b'-')
    }

    pub fn format<S: AsRef<str>>(cells: &[S]) -> String {
        let inner: Vec<&str> = cells.iter().map(AsRef::as_ref).collect();
        format!("{p}{}{p}", inner.join("|"), p = Self::PIPE)
    }
}
