// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source location tracking.
//!
//! Lang is line oriented, so spans are byte offsets inside one logical line.

/// A span in a logical source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice `text` with this span, if it fits.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_inside_line() {
        let span = Span::new(2, 5);
        assert_eq!(span.slice("a $abc d"), Some("$ab"));
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());
    }

    #[test]
    fn slice_past_end() {
        assert_eq!(Span::new(4, 9).slice("abc"), None);
        assert!(Span::new(3, 3).is_empty());
    }
}
