//! Per-file collector of declined rewrites.

use remod_common::{LineMap, Warning};

/// Append-only list of warnings for one file-processing run.
///
/// One reporter belongs to one file; parallel runs each own theirs.
#[derive(Debug, Default)]
pub struct WarningReporter {
    warnings: Vec<Warning>,
}

impl WarningReporter {
    pub fn new() -> Self {
        WarningReporter::default()
    }

    pub fn report(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    /// Record a warning at a byte offset, resolving its line.
    pub fn warn_at(
        &mut self,
        line_map: &LineMap,
        transform: &'static str,
        pos: u32,
        message: impl Into<String>,
    ) {
        let line = line_map.line_of(pos);
        self.report(Warning::new(transform, pos, line, message));
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Warnings in ascending source position; ties keep reporting order.
    pub fn into_sorted(mut self) -> Vec<Warning> {
        self.warnings.sort_by_key(|warning| warning.pos);
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_flush_in_source_order() {
        let map = LineMap::build("a;\nb;\nc;\n");
        let mut reporter = WarningReporter::new();
        reporter.warn_at(&map, "let", 6, "third");
        reporter.warn_at(&map, "arrow", 0, "first");
        reporter.warn_at(&map, "let", 3, "second");
        let lines: Vec<_> = reporter
            .into_sorted()
            .into_iter()
            .map(|warning| (warning.line, warning.message))
            .collect();
        assert_eq!(
            lines,
            vec![
                (1, "first".to_string()),
                (2, "second".to_string()),
                (3, "third".to_string())
            ]
        );
    }

    #[test]
    fn equal_positions_keep_reporting_order() {
        let map = LineMap::build("x");
        let mut reporter = WarningReporter::new();
        reporter.warn_at(&map, "let", 0, "a");
        reporter.warn_at(&map, "arrow", 0, "b");
        let sorted = reporter.into_sorted();
        assert_eq!(sorted[0].transform, "let");
        assert_eq!(sorted[1].transform, "arrow");
    }
}
