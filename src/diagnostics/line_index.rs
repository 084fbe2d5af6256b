use std::ops::Range;

/// Maps 1-based line numbers to character ranges of a single source file.
pub struct LineIndex {
    /// Character offset of the start of each line. line_starts[0] == 0 always.
    line_starts: Vec<usize>,
    /// Total number of characters in the source.
    len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0usize];
        let mut len = 0usize;
        for (i, c) in source.chars().enumerate() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
            len = i + 1;
        }
        Self { line_starts, len }
    }

    /// Characters of `line` (1-based), without the trailing newline.
    /// Out-of-range lines clamp to an empty range at the end of the source.
    pub fn line_range(&self, line: u32) -> Range<usize> {
        let idx = (line as usize).saturating_sub(1);
        match self.line_starts.get(idx) {
            Some(&start) => {
                let end = match self.line_starts.get(idx + 1) {
                    Some(&next) => next - 1,
                    None => self.len,
                };
                start..end
            }
            None => self.len..self.len,
        }
    }
}
