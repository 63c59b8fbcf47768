// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Positions are reported as 1-based line/column pairs, the form users see
//! in diagnostics. Columns count characters, not bytes.

use std::fmt;

/// A 1-based (line, column) position in source text.
///
/// # Examples
///
/// ```
/// use expreval_core::source_analysis::Location;
///
/// let loc = Location::new(2, 5);
/// assert_eq!(loc.to_string(), "2:5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    line: u32,
    column: u32,
}

impl Location {
    /// The first character of the input.
    pub const START: Self = Self::new(1, 1);

    /// Creates a location from a line and column.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Returns the 1-based line.
    #[must_use]
    pub const fn line(self) -> u32 {
        self.line
    }

    /// Returns the 1-based column.
    #[must_use]
    pub const fn column(self) -> u32 {
        self.column
    }

    /// Returns the location `width` characters further along the same line.
    #[must_use]
    pub const fn advanced_by(self, width: u32) -> Self {
        Self::new(self.line, self.column + width)
    }

    /// Converts this location into a byte offset into `source`.
    ///
    /// Locations past the end of a line clamp to the line terminator, and
    /// locations past the end of the input clamp to `source.len()`.
    #[must_use]
    pub fn byte_offset(self, source: &str) -> usize {
        let mut line = 1;
        let mut line_start = 0;
        if self.line > 1 {
            for (idx, ch) in source.char_indices() {
                if ch == '\n' {
                    line += 1;
                    line_start = idx + 1;
                    if line == self.line {
                        break;
                    }
                }
            }
            if line < self.line {
                return source.len();
            }
        }

        let rest = &source[line_start..];
        let skip = self.column.saturating_sub(1) as usize;
        rest.char_indices()
            .take_while(|&(_, ch)| ch != '\n')
            .nth(skip)
            .map_or_else(
                || line_start + rest.find('\n').unwrap_or(rest.len()),
                |(idx, _)| line_start + idx,
            )
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A region of source text delimited by two locations.
///
/// `end` is exclusive: a single character at `1:1` spans `1:1..1:2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: Location,
    end: Location,
}

impl Span {
    /// Creates a span from its two endpoints.
    #[must_use]
    pub const fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// Creates a span covering `width` characters on one line.
    #[must_use]
    pub const fn on_line(line: u32, column: u32, width: u32) -> Self {
        let start = Location::new(line, column);
        Self::new(start, start.advanced_by(width))
    }

    /// Returns the start location.
    #[must_use]
    pub const fn start(self) -> Location {
        self.start
    }

    /// Returns the end location (exclusive).
    #[must_use]
    pub const fn end(self) -> Location {
        self.end
    }

    /// Returns true if the span covers no characters.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Returns true if `other` is fully contained within `self`.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Creates a span that covers both `self` and `other`.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns the byte range of this span within `source`.
    #[must_use]
    pub fn byte_range(self, source: &str) -> std::ops::Range<usize> {
        let start = self.start.byte_offset(source);
        let end = self.end.byte_offset(source).max(start);
        start..end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_accessors() {
        let loc = Location::new(3, 7);
        assert_eq!(loc.line(), 3);
        assert_eq!(loc.column(), 7);
        assert_eq!(loc.advanced_by(2), Location::new(3, 9));
    }

    #[test]
    fn locations_order_by_line_then_column() {
        assert!(Location::new(1, 9) < Location::new(2, 1));
        assert!(Location::new(2, 1) < Location::new(2, 2));
    }

    #[test]
    fn span_on_line() {
        let span = Span::on_line(1, 4, 3);
        assert_eq!(span.start(), Location::new(1, 4));
        assert_eq!(span.end(), Location::new(1, 7));
        assert!(!span.is_empty());
        assert!(Span::on_line(1, 4, 0).is_empty());
    }

    #[test]
    fn span_merge_and_contains() {
        let a = Span::on_line(1, 1, 2);
        let b = Span::on_line(2, 5, 1);
        let merged = a.merge(b);
        assert_eq!(merged.start(), Location::new(1, 1));
        assert_eq!(merged.end(), Location::new(2, 6));
        assert!(merged.contains(a));
        assert!(merged.contains(b));
        assert!(!a.contains(merged));
    }

    #[test]
    fn byte_offsets_follow_lines() {
        let source = "ab\ncd";
        assert_eq!(Location::new(1, 1).byte_offset(source), 0);
        assert_eq!(Location::new(1, 3).byte_offset(source), 2);
        assert_eq!(Location::new(2, 1).byte_offset(source), 3);
        assert_eq!(Location::new(2, 2).byte_offset(source), 4);
        assert_eq!(Location::new(2, 9).byte_offset(source), 5);
        assert_eq!(Location::new(7, 1).byte_offset(source), 5);
    }

    #[test]
    fn byte_offsets_count_characters() {
        let source = "é+1";
        assert_eq!(Location::new(1, 2).byte_offset(source), 2);
        assert_eq!(Span::on_line(1, 1, 1).byte_range(source), 0..2);
    }

    #[test]
    fn display() {
        assert_eq!(Span::on_line(1, 2, 3).to_string(), "1:2..1:5");
    }
}
