use crate::span::Offset;

/// A line and column position within a text document.
///
/// Both components are zero-based. How `column` is counted depends on the
/// [`PositionEncoding`] negotiated with the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineCol {
    line: u32,
    column: u32,
}

impl LineCol {
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }
}

/// Unit in which a client counts columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PositionEncoding {
    Utf8,
    #[default]
    Utf16,
    Utf32,
}

impl PositionEncoding {
    fn width(self, ch: char) -> u32 {
        match self {
            PositionEncoding::Utf8 => u32::try_from(ch.len_utf8()).unwrap_or(0),
            PositionEncoding::Utf16 => u32::try_from(ch.len_utf16()).unwrap_or(0),
            PositionEncoding::Utf32 => 1,
        }
    }
}

/// Byte offsets of every line start in a text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    length: u32,
}

impl LineIndex {
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut pos = 0u32;

        for c in text.chars() {
            pos += u32::try_from(c.len_utf8()).unwrap_or(0);
            if c == '\n' {
                line_starts.push(pos);
            }
        }

        Self {
            line_starts,
            length: pos,
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to a line/column pair in the given encoding.
    ///
    /// Offsets past the end of the text are clamped to the end.
    #[must_use]
    pub fn to_line_col(&self, offset: Offset, text: &str, encoding: PositionEncoding) -> LineCol {
        let offset = offset.get().min(self.length);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let line_start = self.line_starts[line];

        let column = match encoding {
            PositionEncoding::Utf8 => offset - line_start,
            _ => text
                .get(line_start as usize..offset as usize)
                .map_or(offset - line_start, |prefix| {
                    prefix.chars().map(|ch| encoding.width(ch)).sum()
                }),
        };

        LineCol::new(u32::try_from(line).unwrap_or(u32::MAX), column)
    }

    /// Convert a line/column pair to a byte offset.
    ///
    /// Returns `None` when the line does not exist. Columns past the end of
    /// the line clamp to the line end.
    #[must_use]
    pub fn offset(
        &self,
        line_col: LineCol,
        text: &str,
        encoding: PositionEncoding,
    ) -> Option<Offset> {
        let line = line_col.line() as usize;
        let line_start = *self.line_starts.get(line)?;
        let line_end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.length);
        let line_text = text.get(line_start as usize..line_end as usize)?;

        let mut units = 0;
        let mut bytes = 0u32;
        for ch in line_text.chars() {
            if units >= line_col.column() || ch == '\n' {
                break;
            }
            units += encoding.width(ch);
            bytes += u32::try_from(ch.len_utf8()).unwrap_or(0);
        }

        Some(Offset::new(line_start + bytes))
    }
}
