//! Line/column lookup for byte offsets.
//!
//! Warnings are reported by line, so every file gets a `LineMap` built
//! once from its source text.

use serde::Serialize;

/// A 1-based line and column position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Precomputed line start offsets for a source text.
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map. `\n`, `\r\n` and lone `\r` all end a line.
    pub fn build(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0u32];
        let mut cursor = 0usize;
        while let Some(offset) = memchr::memchr2(b'\n', b'\r', &bytes[cursor..]) {
            let at = cursor + offset;
            let next = if bytes[at] == b'\r' && bytes.get(at + 1) == Some(&b'\n') {
                at + 2
            } else {
                at + 1
            };
            line_starts.push(next as u32);
            cursor = next;
        }
        LineMap { line_starts }
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to a 1-based line/column position.
    pub fn position_of(&self, offset: u32) -> Position {
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        };
        let line_start = self.line_starts[line_index];
        Position {
            line: line_index as u32 + 1,
            column: offset.saturating_sub(line_start) + 1,
        }
    }

    /// 1-based line number of a byte offset.
    #[inline]
    pub fn line_of(&self, offset: u32) -> u32 {
        self.position_of(offset).line
    }

    /// Byte offset where the given 1-based line starts.
    pub fn line_start(&self, line: u32) -> Option<u32> {
        let index = line.checked_sub(1)? as usize;
        self.line_starts.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_map_positions() {
        let map = LineMap::build("if (true) { var x = 10; }\n x = 12;\n");
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.position_of(0), Position { line: 1, column: 1 });
        assert_eq!(map.position_of(12), Position { line: 1, column: 13 });
        assert_eq!(map.line_of(27), 2);
        assert_eq!(map.line_start(2), Some(26));
    }

    #[test]
    fn test_line_map_crlf() {
        let map = LineMap::build("a\r\nb\rc");
        assert_eq!(map.line_of(3), 2);
        assert_eq!(map.line_of(5), 3);
        assert_eq!(map.line_start(4), None);
    }
}
