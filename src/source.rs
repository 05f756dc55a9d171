//! Source text indexing.
//!
//! A [`SourceDocument`] is built once per analysis call and maps character
//! offsets back to 1-based line numbers for rules that locate findings via
//! regex match positions.

/// An indexed view over the submitted source text.
#[derive(Debug)]
pub struct SourceDocument<'a> {
    text: &'a str,
    /// Byte offset of the start of each line.
    line_starts: Vec<usize>,
}

impl<'a> SourceDocument<'a> {
    /// Index the given text.
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx + 1);
            }
        }
        Self { text, line_starts }
    }

    /// The raw text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Iterate over the lines of the document.
    pub fn lines(&self) -> std::str::Lines<'a> {
        self.text.lines()
    }

    /// Map a byte offset to its 1-based line number.
    ///
    /// Offsets past the end of the text clamp to the last line.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_offsets_to_lines() {
        let doc = SourceDocument::new("ab\ncd\nef");
        assert_eq!(doc.line_of_offset(0), 1);
        assert_eq!(doc.line_of_offset(1), 1);
        assert_eq!(doc.line_of_offset(2), 1); // the newline itself
        assert_eq!(doc.line_of_offset(3), 2);
        assert_eq!(doc.line_of_offset(6), 3);
        assert_eq!(doc.line_of_offset(7), 3);
    }

    #[test]
    fn clamps_past_end_to_last_line() {
        let doc = SourceDocument::new("ab\ncd");
        assert_eq!(doc.line_of_offset(100), 2);
    }

    #[test]
    fn empty_text_is_line_one() {
        let doc = SourceDocument::new("");
        assert_eq!(doc.line_of_offset(0), 1);
        assert_eq!(doc.lines().count(), 0);
    }
}
