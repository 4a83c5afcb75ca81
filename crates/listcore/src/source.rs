use std::borrow::Cow;

/// Read access to a document by line. Offsets are char offsets from the start
/// of the document; line numbers start at zero.
pub trait LineSource {
    fn line_count(&self) -> usize;

    /// Text of `line` without its line terminator.
    fn line_text(&self, line: usize) -> Option<Cow<'_, str>>;

    /// Offset of the first char of `line`.
    fn line_start(&self, line: usize) -> usize;

    /// Line containing `offset`. Offsets past the end map to the last line.
    fn line_of_offset(&self, offset: usize) -> usize;

    /// Offset where the next line starts, or the end of the document for the
    /// last line.
    fn line_end_inclusive(&self, line: usize) -> usize {
        if line + 1 < self.line_count() {
            self.line_start(line + 1)
        } else {
            let text_len = self
                .line_text(line)
                .map_or(0, |text| text.chars().count());
            self.line_start(line) + text_len
        }
    }
}

/// An owned, immutable copy of a document split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSnapshot {
    lines: Vec<String>,
    starts: Vec<usize>,
}

impl TextSnapshot {
    pub fn new(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut starts = Vec::new();
        let mut offset = 0;
        for line in text.split('\n') {
            starts.push(offset);
            offset += line.chars().count() + 1;
            lines.push(line.strip_suffix('\r').unwrap_or(line).to_string());
        }
        Self { lines, starts }
    }
}

impl LineSource for TextSnapshot {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        self.lines.get(line).map(|l| Cow::Borrowed(l.as_str()))
    }

    fn line_start(&self, line: usize) -> usize {
        self.starts.get(line).copied().unwrap_or_else(|| {
            self.starts.last().copied().unwrap_or(0)
        })
    }

    fn line_of_offset(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset).saturating_sub(1)
    }
}
