/// Why a tester's stdout couldn't be turned into a [`ParsedOutput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    /// Nothing but whitespace was written
    Empty,
    NotUtf8,
}

/// The two lines of a tester's output that matter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOutput {
    /// First non-blank line, opaque
    pub stats: String,
    /// Last non-blank line, holds the verdict
    pub last: String,
}

impl ParsedOutput {
    pub fn parse(text: &str) -> Result<Self, Malformed> {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

        let first = lines.next().ok_or(Malformed::Empty)?;
        let last = lines.last().unwrap_or(first);

        Ok(Self {
            stats: first.to_owned(),
            last: last.to_owned(),
        })
    }
}
