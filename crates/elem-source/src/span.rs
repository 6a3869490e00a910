use std::ops::Deref;

use serde::Serialize;

/// A byte offset within a text document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Offset(u32);

impl Offset {
    #[must_use]
    pub fn new(offset: u32) -> Self {
        Self(offset)
    }

    #[must_use]
    pub fn from_usize(offset: usize) -> Self {
        Self(u32::try_from(offset).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn get_usize(self) -> usize {
        self.0 as usize
    }
}

impl Deref for Offset {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u32> for Offset {
    fn from(offset: u32) -> Self {
        Self(offset)
    }
}

/// A half-open byte range `[start, start + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    start: u32,
    length: u32,
}

impl Span {
    #[must_use]
    pub fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    #[must_use]
    pub fn from_parts(start: usize, length: usize) -> Self {
        let start_u32 = u32::try_from(start).unwrap_or(u32::MAX);
        let length_u32 = u32::try_from(length).unwrap_or(u32::MAX.saturating_sub(start_u32));
        Span::new(start_u32, length_u32)
    }

    /// Construct a span from integer bounds expressed as byte offsets.
    #[must_use]
    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self::from_parts(start, end.saturating_sub(start))
    }

    /// Move the span forward by `delta` bytes, keeping its length.
    #[must_use]
    pub fn shift(self, delta: u32) -> Self {
        Self::new(self.start.saturating_add(delta), self.length)
    }

    #[must_use]
    pub fn start(self) -> u32 {
        self.start
    }

    #[must_use]
    pub fn start_usize(self) -> usize {
        self.start as usize
    }

    #[must_use]
    pub fn end(self) -> u32 {
        self.start.saturating_add(self.length)
    }

    #[must_use]
    pub fn end_usize(self) -> usize {
        self.end() as usize
    }

    #[must_use]
    pub fn length(self) -> u32 {
        self.length
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.length == 0
    }

    #[must_use]
    pub fn start_offset(self) -> Offset {
        Offset(self.start)
    }

    #[must_use]
    pub fn end_offset(self) -> Offset {
        Offset(self.end())
    }

    /// Whether `offset` falls inside the span. The end bound is inclusive so a
    /// cursor sitting right after the last character still counts.
    #[must_use]
    pub fn contains(self, offset: Offset) -> bool {
        self.start <= offset.get() && offset.get() <= self.end()
    }

    /// Slice the spanned text out of `source`, if the bounds are valid.
    #[must_use]
    pub fn slice(self, source: &str) -> Option<&str> {
        source.get(self.start_usize()..self.end_usize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_end_inclusive() {
        let span = Span::new(4, 3);
        assert!(!span.contains(Offset::new(3)));
        assert!(span.contains(Offset::new(4)));
        assert!(span.contains(Offset::new(7)));
        assert!(!span.contains(Offset::new(8)));
    }

    #[test]
    fn test_shift_keeps_length() {
        let span = Span::new(1, 3).shift(10);
        assert_eq!(span, Span::new(11, 3));
        assert_eq!(span.end(), 14);
    }

    #[test]
    fn test_from_bounds_saturates_reversed_bounds() {
        assert_eq!(Span::from_bounds(5, 2), Span::new(5, 0));
    }

    #[test]
    fn test_slice() {
        let text = "div(class: 'btn')";
        assert_eq!(Span::new(12, 3).slice(text), Some("btn"));
        assert_eq!(Span::new(40, 3).slice(text), None);
    }
}
