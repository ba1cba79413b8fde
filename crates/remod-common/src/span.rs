//! Byte-offset spans into the source text.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` into the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True when `other` lies entirely inside this span.
    #[inline]
    pub const fn contains_span(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Slice the span out of `source`, returning "" when out of range.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        let start = self.start as usize;
        let end = self.end as usize;
        if start <= end && end <= source.len() {
            source.get(start..end).unwrap_or("")
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_in_and_out_of_range() {
        let source = "var foo = 10;";
        assert_eq!(Span::new(4, 7).slice(source), "foo");
        assert_eq!(Span::new(4, 99).slice(source), "");
        assert!(Span::new(3, 3).is_empty());
        assert!(Span::new(0, 13).contains_span(Span::new(4, 7)));
    }
}
