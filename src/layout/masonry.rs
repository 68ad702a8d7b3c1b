use crate::models::{MasonryGrid, PackedBox, ProjectItem};

/// Number of columns the expanded item tries to span.
const EXPANDED_SPAN: usize = 2;

/// Configuration for the masonry packer.
///
/// Items are dropped into the shortest column in input order. The expanded
/// item is taller and spans two adjacent columns when the layout has room.
#[derive(Debug, Clone)]
pub struct MasonryLayout {
    /// Gap between columns and between stacked items in pixels (default: 20)
    pub gap: f32,
    /// Multiplier from an item's desired height to its box height (default: 0.75)
    pub base_height_factor: f32,
    /// Extra height multiplier for the expanded item (default: 1.8)
    pub expansion_factor: f32,
    /// Upper bound for the expanded item's height in pixels (default: 500)
    pub max_expanded_height: f32,
    /// Space added below the lowest box (default: 40)
    pub bottom_padding: f32,
    /// Floor for the container height so short layouts don't collapse (default: 800)
    pub min_container_height: f32,
}

impl Default for MasonryLayout {
    fn default() -> Self {
        Self {
            gap: 20.0,
            base_height_factor: 0.75,
            expansion_factor: 1.8,
            max_expanded_height: 500.0,
            bottom_padding: 40.0,
            min_container_height: 800.0,
        }
    }
}

impl MasonryLayout {
    /// Gap actually used for `columns` in `width`.
    ///
    /// Shrinks when the nominal gaps alone would not fit, so boxes always stay
    /// inside the container.
    fn effective_gap(&self, columns: usize, width: f32) -> f32 {
        self.gap.max(0.0).min(width / columns as f32)
    }

    fn box_height(&self, item: &ProjectItem, expanded: bool) -> f32 {
        let base = item.base_height() * self.base_height_factor;
        if expanded {
            (base * self.expansion_factor).min(self.max_expanded_height)
        } else {
            base
        }
    }

    /// Packs `items` into `columns` columns across `container_width` pixels.
    ///
    /// # Algorithm
    /// 1. Column width is what remains after the gaps, split evenly.
    /// 2. Every item goes to the shortest column (first on ties).
    /// 3. The expanded item spans two columns when `columns >= 2`, starting at
    ///    the column pair whose taller member is lowest (first on ties), and
    ///    sits below the taller of the two.
    /// 4. Each spanned column grows to the box bottom plus one gap.
    ///
    /// A zero column count is treated as one. A non-positive width yields an
    /// empty grid at the minimum container height.
    pub fn compute(
        &self,
        columns: usize,
        container_width: f32,
        items: &[ProjectItem],
        expanded_id: Option<&str>,
    ) -> MasonryGrid {
        let columns = columns.max(1);
        if !container_width.is_finite() || container_width <= 0.0 {
            return MasonryGrid::empty(0.0, self.min_container_height, columns);
        }

        let gap = self.effective_gap(columns, container_width);
        let column_width = (container_width - gap * (columns - 1) as f32) / columns as f32;
        let mut column_heights = vec![0.0f32; columns];
        let mut boxes = Vec::with_capacity(items.len());

        for item in items {
            let expanded = expanded_id == Some(item.id.as_str());
            let span = if expanded && columns >= EXPANDED_SPAN {
                EXPANDED_SPAN
            } else {
                1
            };

            let column = if span == 1 {
                shortest_column(&column_heights)
            } else {
                lowest_span_start(&column_heights, span)
            };
            let y = span_top(&column_heights[column..column + span]);
            let width = column_width * span as f32 + gap * (span - 1) as f32;
            let height = self.box_height(item, expanded);
            let x = column as f32 * (column_width + gap);

            for h in &mut column_heights[column..column + span] {
                *h = y + height + gap;
            }

            boxes.push(PackedBox {
                id: item.id.clone(),
                x,
                y,
                width,
                height,
                column,
                column_span: span,
            });
        }

        let container_height = self.container_height(&boxes);
        MasonryGrid {
            boxes,
            container_width,
            container_height,
            column_width,
            column_count: columns,
        }
    }

    /// Height the container needs to show every box.
    pub fn container_height(&self, boxes: &[PackedBox]) -> f32 {
        if boxes.is_empty() {
            return self.min_container_height;
        }
        let max_bottom = boxes.iter().map(PackedBox::bottom).fold(f32::MIN, f32::max);
        (max_bottom + self.bottom_padding).max(self.min_container_height)
    }
}

/// Index of the lowest column; the first one wins ties.
fn shortest_column(heights: &[f32]) -> usize {
    let mut index = 0;
    let mut best = heights.first().copied().unwrap_or(0.0);
    for (i, h) in heights.iter().enumerate().skip(1) {
        if *h < best {
            best = *h;
            index = i;
        }
    }
    index
}

/// Start column minimising the tallest column under a `span`-wide box.
fn lowest_span_start(heights: &[f32], span: usize) -> usize {
    let mut index = 0;
    let mut best = f32::INFINITY;
    for start in 0..=heights.len() - span {
        let top = span_top(&heights[start..start + span]);
        if top < best {
            best = top;
            index = start;
        }
    }
    index
}

fn span_top(heights: &[f32]) -> f32 {
    heights.iter().copied().fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_items(heights: &[f32]) -> Vec<ProjectItem> {
        heights
            .iter()
            .enumerate()
            .map(|(i, h)| ProjectItem::new(format!("{}", i + 1), format!("{}.jpg", i + 1), *h))
            .collect()
    }

    fn portfolio_items() -> Vec<ProjectItem> {
        make_items(&[400.0, 300.0, 500.0, 400.0, 450.0, 400.0, 400.0, 400.0, 400.0])
    }

    #[test]
    fn test_empty_items() {
        let layout = MasonryLayout::default();
        let grid = layout.compute(3, 960.0, &[], None);
        assert!(grid.is_empty());
        assert_eq!(grid.container_height, 800.0);
    }

    #[test]
    fn test_zero_width_is_degenerate() {
        let layout = MasonryLayout::default();
        let items = portfolio_items();
        let grid = layout.compute(3, 0.0, &items, None);
        assert!(grid.is_empty());
        assert_eq!(grid.container_height, layout.min_container_height);

        let grid = layout.compute(3, -10.0, &items, Some("1"));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_zero_columns_treated_as_one() {
        let layout = MasonryLayout::default();
        let items = make_items(&[100.0, 100.0]);
        let grid = layout.compute(0, 500.0, &items, None);
        assert_eq!(grid.column_count, 1);
        assert_eq!(grid.len(), 2);
        assert!((grid.boxes[0].width - 500.0).abs() < 0.01);
        assert!((grid.boxes[1].y - (75.0 + 20.0)).abs() < 0.01);
    }

    #[test]
    fn test_three_column_scenario() {
        let layout = MasonryLayout::default();
        let items = portfolio_items();
        let grid = layout.compute(3, 960.0, &items, None);

        assert_eq!(grid.len(), 9);
        assert!((grid.column_width - 920.0 / 3.0).abs() < 0.01);

        for (i, b) in grid.boxes.iter().take(3).enumerate() {
            assert_eq!(b.column, i);
            assert_eq!(b.y, 0.0);
            assert!((b.x - i as f32 * (grid.column_width + 20.0)).abs() < 0.01);
        }

        // Column bottoms after the first pass: 300+20, 225+20, 375+20.
        // The fourth item lands in column 1, the shortest.
        let fourth = &grid.boxes[3];
        assert_eq!(fourth.column, 1);
        assert!((fourth.y - 245.0).abs() < 0.01);
    }

    #[test]
    fn test_single_span_picks_shortest_column() {
        let layout = MasonryLayout::default();
        let items = make_items(&[400.0, 120.0, 260.0, 500.0, 90.0, 330.0, 210.0, 410.0]);
        let grid = layout.compute(3, 900.0, &items, None);

        let mut heights = vec![0.0f32; 3];
        for b in &grid.boxes {
            let min = heights.iter().copied().fold(f32::INFINITY, f32::min);
            assert_eq!(heights[b.column], min, "item {} not in a shortest column", b.id);
            assert_eq!(b.y, heights[b.column]);
            heights[b.column] = b.bottom() + layout.gap;
        }
    }

    #[test]
    fn test_ties_prefer_first_column() {
        let layout = MasonryLayout::default();
        let items = make_items(&[100.0, 100.0, 100.0, 100.0]);
        let grid = layout.compute(3, 960.0, &items, None);
        let columns: Vec<usize> = grid.boxes.iter().map(|b| b.column).collect();
        assert_eq!(columns, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_boxes_stay_in_bounds() {
        let layout = MasonryLayout::default();
        let items = portfolio_items();
        for columns in 1..=6 {
            for width in [1.0f32, 35.0, 99.0, 400.0, 960.0, 1920.0] {
                for expanded in [None, Some("5"), Some("9")] {
                    let grid = layout.compute(columns, width, &items, expanded);
                    assert_eq!(grid.len(), items.len());
                    for b in &grid.boxes {
                        assert!(b.x >= 0.0);
                        assert!(b.width >= 0.0);
                        assert!(
                            b.right() <= width + 0.01,
                            "box {} overflows: right={} width={} columns={}",
                            b.id,
                            b.right(),
                            width,
                            columns
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_expanded_spans_two_columns() {
        let layout = MasonryLayout::default();
        let items = portfolio_items();
        let grid = layout.compute(3, 960.0, &items, Some("5"));
        let expanded = grid.get("5").unwrap();

        assert_eq!(expanded.column_span, 2);
        let expected_width = grid.column_width * 2.0 + 20.0;
        assert!((expanded.width - expected_width).abs() < 0.01);
        // 450 * 0.75 * 1.8 = 607.5, capped at 500
        assert_eq!(expanded.height, 500.0);
    }

    #[test]
    fn test_expanded_sits_below_taller_neighbor() {
        let layout = MasonryLayout::default();
        // Column bottoms before item 4: 320, 95, 170 -> best pair is (1,2) at 170
        let items = make_items(&[400.0, 100.0, 200.0, 100.0]);
        let grid = layout.compute(3, 960.0, &items, Some("4"));
        let expanded = grid.get("4").unwrap();
        assert_eq!(expanded.column, 1);
        assert!((expanded.y - 170.0).abs() < 0.01);

        for other in grid.boxes.iter().filter(|b| b.id != "4") {
            let overlaps_x = other.x < expanded.right() && expanded.x < other.right();
            let overlaps_y = other.y < expanded.bottom() && expanded.y < other.bottom();
            assert!(!(overlaps_x && overlaps_y), "box {} overlaps expanded", other.id);
        }
    }

    #[test]
    fn test_expanded_height_uses_factor_below_cap() {
        let layout = MasonryLayout::default();
        let items = make_items(&[200.0]);
        let grid = layout.compute(2, 600.0, &items, Some("1"));
        assert!((grid.boxes[0].height - 200.0 * 0.75 * 1.8).abs() < 0.01);
    }

    #[test]
    fn test_span_degrades_in_single_column() {
        let layout = MasonryLayout::default();
        let items = portfolio_items();
        let grid = layout.compute(1, 380.0, &items, Some("5"));
        let expanded = grid.get("5").unwrap();
        assert_eq!(expanded.column_span, 1);
        assert_eq!(expanded.column, 0);
        assert!((expanded.width - grid.column_width).abs() < 0.01);
        assert!((expanded.width - 380.0).abs() < 0.01);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let layout = MasonryLayout::default();
        let items = portfolio_items();
        let a = layout.compute(4, 1234.5, &items, Some("3"));
        let b = layout.compute(4, 1234.5, &items, Some("3"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_toggle_round_trip() {
        let layout = MasonryLayout::default();
        let items = portfolio_items();
        let before = layout.compute(3, 960.0, &items, None);
        let expanded = layout.compute(3, 960.0, &items, Some("2"));
        assert_ne!(before, expanded);
        let after = layout.compute(3, 960.0, &items, None);
        assert_eq!(before, after);
    }

    #[test]
    fn test_container_height() {
        let layout = MasonryLayout::default();
        let items = make_items(&[2000.0]);
        let grid = layout.compute(1, 400.0, &items, None);
        assert!((grid.container_height - (1500.0 + 40.0)).abs() < 0.01);

        let short = layout.compute(1, 400.0, &make_items(&[100.0]), None);
        assert_eq!(short.container_height, 800.0);
    }

    #[test]
    fn test_unknown_expanded_id_is_ignored() {
        let layout = MasonryLayout::default();
        let items = portfolio_items();
        let a = layout.compute(3, 960.0, &items, Some("missing"));
        let b = layout.compute(3, 960.0, &items, None);
        assert_eq!(a, b);
    }
}
