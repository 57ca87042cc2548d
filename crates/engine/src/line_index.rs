/// Maps byte offsets of a `\n` joined text to 1-based line numbers.
///
/// Tabs count as one byte like any other character; nothing is expanded
/// before offsets are taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Cumulative `len(line) + 1` per line.
    ends: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut total = 0;
        let ends = text
            .split('\n')
            .map(|line| {
                total += line.len() + 1;
                total
            })
            .collect();
        Self { ends }
    }

    /// First line whose cumulative end is past `offset`, or 0 when the offset
    /// lies beyond the text.
    pub fn line_of(&self, offset: usize) -> usize {
        let idx = self.ends.partition_point(|&end| end <= offset);
        if idx < self.ends.len() {
            idx + 1
        } else {
            0
        }
    }

    pub fn line_count(&self) -> usize {
        self.ends.len()
    }
}
