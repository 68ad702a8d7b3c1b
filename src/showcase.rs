//! The project showcase component.
//!
//! Owns the expansion state and the previous pack, and runs the cycle
//! width/items/expansion change -> column count -> pack -> reconcile. Nothing
//! is packed until the container width is known and every image has settled.

use std::time::Instant;

use tracing::{debug, info};

use crate::animation::{AnimationDirector, AnimationHandle, Frame, Viewport};
use crate::config::ShowcaseOptions;
use crate::interaction::ExpansionState;
use crate::layout::{ColumnTracker, LayoutCache, MasonryLayout};
use crate::models::{MasonryGrid, ProjectItem};
use crate::preload::PreloadReport;

type SelectedCallback = Box<dyn Fn(&ProjectItem)>;
type ClearedCallback = Box<dyn Fn()>;

pub struct Showcase {
    items: Vec<ProjectItem>,
    columns: ColumnTracker,
    layout: MasonryLayout,
    cache: LayoutCache,
    director: AnimationDirector,
    expansion: ExpansionState,
    viewport: Viewport,
    container_width: Option<f32>,
    images: Option<PreloadReport>,
    grid: MasonryGrid,
    selected_listeners: Vec<SelectedCallback>,
    cleared_listeners: Vec<ClearedCallback>,
}

impl Showcase {
    pub fn new(items: Vec<ProjectItem>, options: ShowcaseOptions) -> Self {
        Self::with_director(items, AnimationDirector::new(options))
    }

    pub fn with_director(items: Vec<ProjectItem>, director: AnimationDirector) -> Self {
        let layout = MasonryLayout::default();
        let columns = ColumnTracker::default();
        let grid = MasonryGrid::empty(0.0, layout.min_container_height, columns.columns());
        Self {
            items,
            columns,
            layout,
            cache: LayoutCache::new(),
            director,
            expansion: ExpansionState::default(),
            viewport: Viewport::default(),
            container_width: None,
            images: None,
            grid,
            selected_listeners: Vec::new(),
            cleared_listeners: Vec::new(),
        }
    }

    /// Window size changed. Column count follows the window width.
    pub fn set_viewport(&mut self, viewport: Viewport, now: Instant) -> Vec<AnimationHandle> {
        self.viewport = viewport;
        if self.columns.update(viewport.width).is_some() {
            return self.repack(now);
        }
        Vec::new()
    }

    /// The grid's own measured width changed.
    pub fn set_container_width(&mut self, width: f32, now: Instant) -> Vec<AnimationHandle> {
        if self.container_width == Some(width) {
            return Vec::new();
        }
        self.container_width = Some(width);
        self.repack(now)
    }

    /// Every image has settled; the first pack and entrance may run.
    pub fn images_ready(&mut self, report: PreloadReport, now: Instant) -> Vec<AnimationHandle> {
        info!(
            images = report.len(),
            failed = report.failed_count(),
            "Showcase images ready"
        );
        self.images = Some(report);
        self.repack(now)
    }

    /// Replace the item set. Kept cards move, new cards enter.
    pub fn set_items(&mut self, items: Vec<ProjectItem>, now: Instant) -> Vec<AnimationHandle> {
        self.items = items;
        let was_expanded = self.expansion.expanded_id().is_some();
        self.expansion
            .retain(self.items.iter().map(|item| item.id.as_str()));
        self.notify_if_cleared(was_expanded);
        self.repack(now)
    }

    /// Card clicked: toggle its expansion and report the selection.
    pub fn click_item(&mut self, id: &str, now: Instant) -> Vec<AnimationHandle> {
        let Some(item) = self.items.iter().find(|item| item.id == id) else {
            debug!(item_id = %id, "Click on unknown card ignored");
            return Vec::new();
        };
        for listener in &self.selected_listeners {
            listener(item);
        }
        let was_expanded = self.expansion.expanded_id().is_some();
        self.expansion.click_item(id);
        self.notify_if_cleared(was_expanded);
        self.repack(now)
    }

    /// Empty container space clicked.
    pub fn click_background(&mut self, now: Instant) -> Vec<AnimationHandle> {
        if self.expansion.click_background() {
            self.notify_if_cleared(true);
            self.repack(now)
        } else {
            Vec::new()
        }
    }

    pub fn hover_enter(&mut self, id: &str, now: Instant) {
        self.director.hover_enter(id, now);
    }

    pub fn hover_leave(&mut self, id: &str, now: Instant) {
        self.director.hover_leave(id, now);
    }

    /// Frames for every placed card, in pack order.
    pub fn tick(&self, now: Instant) -> Vec<(String, Frame)> {
        self.director.tick(now)
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.director.is_animating(now)
    }

    pub fn on_project_selected(&mut self, callback: impl Fn(&ProjectItem) + 'static) {
        self.selected_listeners.push(Box::new(callback));
    }

    /// Called whenever the expanded card collapses and nothing replaces it.
    pub fn on_selection_cleared(&mut self, callback: impl Fn() + 'static) {
        self.cleared_listeners.push(Box::new(callback));
    }

    /// The latest pack.
    pub fn grid(&self) -> &MasonryGrid {
        &self.grid
    }

    pub fn items(&self) -> &[ProjectItem] {
        &self.items
    }

    pub fn expanded_id(&self) -> Option<&str> {
        self.expansion.expanded_id()
    }

    pub fn columns(&self) -> usize {
        self.columns.columns()
    }

    pub fn is_ready(&self) -> bool {
        self.images.is_some() && self.container_width.is_some()
    }

    fn notify_if_cleared(&self, was_expanded: bool) {
        if was_expanded && self.expansion.expanded_id().is_none() {
            for listener in &self.cleared_listeners {
                listener();
            }
        }
    }

    fn repack(&mut self, now: Instant) -> Vec<AnimationHandle> {
        let Some(width) = self.container_width else {
            return Vec::new();
        };
        if self.images.is_none() {
            return Vec::new();
        }

        let columns = self.columns.columns();
        let expanded = self.expansion.expanded_id();
        self.grid = self
            .cache
            .get_or_compute(&self.layout, columns, width, &self.items, expanded);
        debug!(
            items = self.grid.len(),
            columns,
            width,
            container_height = self.grid.container_height,
            "Packed showcase"
        );
        let first_mount = !self.director.has_mounted();
        let handles = self
            .director
            .reconcile(&self.grid, expanded, self.viewport, now);
        if first_mount && self.director.has_mounted() {
            info!(cards = self.grid.len(), "Showcase mounted");
        }
        handles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Catalog;
    use crate::preload::preload_all;
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;
    use std::time::Duration;

    fn showcase() -> Showcase {
        let items = Catalog::builtin(Path::new("/nonexistent")).into_items();
        Showcase::with_director(items, AnimationDirector::with_seed(ShowcaseOptions::default(), 7))
    }

    fn settled_images() -> PreloadReport {
        PreloadReport::default()
    }

    #[test]
    fn test_nothing_packs_before_images_settle() {
        let now = Instant::now();
        let mut showcase = showcase();
        showcase.set_viewport(Viewport::new(1280.0, 800.0), now);
        assert!(showcase.set_container_width(960.0, now).is_empty());
        assert!(showcase.grid().is_empty());
        assert!(showcase.tick(now).is_empty());
        assert!(!showcase.is_ready());

        let handles = showcase.images_ready(settled_images(), now);
        assert_eq!(handles.len(), 9);
        assert_eq!(showcase.grid().len(), 9);
        assert!(showcase.is_ready());
    }

    #[tokio::test]
    async fn test_all_images_failing_still_lays_out() {
        let now = Instant::now();
        let mut showcase = showcase();
        let paths = showcase.items().iter().map(|i| i.image.clone()).collect();
        let report = preload_all(paths, 64).await;
        assert_eq!(report.failed_count(), 9);

        showcase.set_viewport(Viewport::new(1280.0, 800.0), now);
        showcase.set_container_width(960.0, now);
        showcase.images_ready(report, now);

        assert_eq!(showcase.grid().len(), 9);
        let frames = showcase.tick(now + Duration::from_secs(5));
        assert_eq!(frames.len(), 9);
        assert!(frames.iter().all(|(_, f)| (f.opacity - 1.0).abs() < 1e-4));
    }

    #[test]
    fn test_columns_follow_viewport() {
        let now = Instant::now();
        let mut showcase = showcase();
        showcase.images_ready(settled_images(), now);
        showcase.set_container_width(960.0, now);
        showcase.set_viewport(Viewport::new(1200.0, 800.0), now);
        assert_eq!(showcase.columns(), 4);
        assert_eq!(showcase.grid().column_count, 4);

        // Same breakpoint band: no repack.
        assert!(showcase
            .set_viewport(Viewport::new(1100.0, 800.0), now)
            .is_empty());

        showcase.set_viewport(Viewport::new(700.0, 800.0), now);
        assert_eq!(showcase.grid().column_count, 3);
    }

    #[test]
    fn test_expand_then_collapse_restores_layout() {
        let now = Instant::now();
        let mut showcase = showcase();
        showcase.set_viewport(Viewport::new(800.0, 800.0), now);
        showcase.set_container_width(960.0, now);
        showcase.images_ready(settled_images(), now);
        let before = showcase.grid().clone();

        showcase.click_item("2", now);
        assert_eq!(showcase.expanded_id(), Some("2"));
        let expanded = showcase.grid().get("2").unwrap();
        assert_eq!(expanded.column_span, 2);
        assert!(expanded.height <= 500.0);

        let later = now + Duration::from_secs(2);
        showcase.click_background(later);
        assert_eq!(showcase.expanded_id(), None);
        assert_eq!(showcase.grid(), &before);
    }

    #[test]
    fn test_click_notifies_selection() {
        let now = Instant::now();
        let mut showcase = showcase();
        let selected = Rc::new(RefCell::new(Vec::new()));
        let sink = selected.clone();
        showcase.on_project_selected(move |item| sink.borrow_mut().push(item.id.clone()));

        showcase.click_item("4", now);
        showcase.click_item("4", now);
        showcase.click_item("missing", now);

        assert_eq!(*selected.borrow(), vec!["4".to_string(), "4".to_string()]);
        assert_eq!(showcase.expanded_id(), None);
    }

    #[test]
    fn test_collapse_notifies_selection_cleared() {
        let now = Instant::now();
        let mut showcase = showcase();
        let cleared = Rc::new(RefCell::new(0));
        let sink = cleared.clone();
        showcase.on_selection_cleared(move || *sink.borrow_mut() += 1);

        // Switching between cards keeps a selection.
        showcase.click_item("1", now);
        showcase.click_item("2", now);
        assert_eq!(*cleared.borrow(), 0);

        // Clicking the expanded card again collapses it.
        showcase.click_item("2", now);
        assert_eq!(*cleared.borrow(), 1);

        showcase.click_item("3", now);
        showcase.click_background(now);
        assert_eq!(*cleared.borrow(), 2);

        // Nothing expanded: background clicks stay quiet.
        showcase.click_background(now);
        assert_eq!(*cleared.borrow(), 2);

        showcase.click_item("9", now);
        let kept: Vec<ProjectItem> = showcase.items()[..3].to_vec();
        showcase.set_items(kept, now);
        assert_eq!(*cleared.borrow(), 3);
    }

    #[test]
    fn test_background_click_when_collapsed_is_noop() {
        let now = Instant::now();
        let mut showcase = showcase();
        showcase.set_container_width(960.0, now);
        showcase.images_ready(settled_images(), now);
        assert!(showcase.click_background(now).is_empty());
    }

    #[test]
    fn test_set_items_drops_stale_expansion() {
        let now = Instant::now();
        let mut showcase = showcase();
        showcase.set_viewport(Viewport::new(800.0, 800.0), now);
        showcase.set_container_width(960.0, now);
        showcase.images_ready(settled_images(), now);
        showcase.click_item("9", now);

        let kept: Vec<ProjectItem> = showcase.items()[..3].to_vec();
        showcase.set_items(kept, now);
        assert_eq!(showcase.expanded_id(), None);
        assert_eq!(showcase.grid().len(), 3);
        assert_eq!(showcase.tick(now).len(), 3);
    }

    #[test]
    fn test_zero_width_is_degenerate_not_error() {
        let now = Instant::now();
        let mut showcase = showcase();
        showcase.images_ready(settled_images(), now);
        showcase.set_container_width(0.0, now);
        assert!(showcase.grid().is_empty());
        assert_eq!(showcase.grid().container_height, 800.0);
    }
}
