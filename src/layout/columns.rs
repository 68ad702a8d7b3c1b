use tracing::debug;

/// A width threshold and the column count it selects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    /// Minimum width (inclusive) in pixels.
    pub min_width: f32,
    pub columns: usize,
}

impl Breakpoint {
    pub const fn new(min_width: f32, columns: usize) -> Self {
        Self { min_width, columns }
    }
}

/// Default thresholds, widest first.
pub const DEFAULT_BREAKPOINTS: [Breakpoint; 4] = [
    Breakpoint::new(1500.0, 5),
    Breakpoint::new(1000.0, 4),
    Breakpoint::new(600.0, 3),
    Breakpoint::new(400.0, 2),
];

/// Maps a width to a column count via ordered breakpoints.
#[derive(Debug, Clone)]
pub struct ColumnResolver {
    breakpoints: Vec<Breakpoint>,
    default_columns: usize,
}

impl Default for ColumnResolver {
    fn default() -> Self {
        Self::new(DEFAULT_BREAKPOINTS.to_vec(), 1)
    }
}

impl ColumnResolver {
    /// Breakpoints are evaluated widest first regardless of the order given.
    pub fn new(mut breakpoints: Vec<Breakpoint>, default_columns: usize) -> Self {
        breakpoints.sort_by(|a, b| b.min_width.total_cmp(&a.min_width));
        Self {
            breakpoints,
            default_columns: default_columns.max(1),
        }
    }

    /// First breakpoint the width satisfies, else the default.
    pub fn resolve(&self, width: f32) -> usize {
        self.breakpoints
            .iter()
            .find(|bp| width >= bp.min_width)
            .map(|bp| bp.columns.max(1))
            .unwrap_or(self.default_columns)
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }
}

/// Tracks the resolved column count across width notifications.
#[derive(Debug, Clone)]
pub struct ColumnTracker {
    resolver: ColumnResolver,
    current: Option<usize>,
}

impl ColumnTracker {
    pub fn new(resolver: ColumnResolver) -> Self {
        Self {
            resolver,
            current: None,
        }
    }

    /// Returns the new count when `width` crosses a breakpoint (or on the
    /// first call), `None` when the count is unchanged.
    pub fn update(&mut self, width: f32) -> Option<usize> {
        let columns = self.resolver.resolve(width);
        if self.current == Some(columns) {
            return None;
        }
        debug!(columns, width, previous = ?self.current, "Column count changed");
        self.current = Some(columns);
        Some(columns)
    }

    /// Current count, or the default before any width is known.
    pub fn columns(&self) -> usize {
        self.current.unwrap_or(self.resolver.default_columns)
    }
}

impl Default for ColumnTracker {
    fn default() -> Self {
        Self::new(ColumnResolver::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_breakpoints() {
        let resolver = ColumnResolver::default();
        assert_eq!(resolver.resolve(1920.0), 5);
        assert_eq!(resolver.resolve(1500.0), 5);
        assert_eq!(resolver.resolve(1499.9), 4);
        assert_eq!(resolver.resolve(1000.0), 4);
        assert_eq!(resolver.resolve(800.0), 3);
        assert_eq!(resolver.resolve(400.0), 2);
        assert_eq!(resolver.resolve(399.0), 1);
        assert_eq!(resolver.resolve(0.0), 1);
        assert_eq!(resolver.resolve(-50.0), 1);
    }

    #[test]
    fn test_unsorted_breakpoints_are_ordered() {
        let resolver = ColumnResolver::new(
            vec![Breakpoint::new(300.0, 2), Breakpoint::new(900.0, 6)],
            1,
        );
        assert_eq!(resolver.breakpoints()[0].min_width, 900.0);
        assert_eq!(resolver.resolve(1000.0), 6);
        assert_eq!(resolver.resolve(500.0), 2);
    }

    #[test]
    fn test_zero_columns_clamped() {
        let resolver = ColumnResolver::new(vec![Breakpoint::new(100.0, 0)], 0);
        assert_eq!(resolver.resolve(200.0), 1);
        assert_eq!(resolver.resolve(50.0), 1);
    }

    #[test]
    fn test_tracker_reports_crossings_only() {
        let mut tracker = ColumnTracker::default();
        assert_eq!(tracker.columns(), 1);
        assert_eq!(tracker.update(1200.0), Some(4));
        assert_eq!(tracker.update(1100.0), None);
        assert_eq!(tracker.update(1400.0), None);
        assert_eq!(tracker.update(1600.0), Some(5));
        assert_eq!(tracker.update(350.0), Some(1));
        assert_eq!(tracker.columns(), 1);
    }
}
