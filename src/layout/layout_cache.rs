use crate::layout::MasonryLayout;
use crate::models::{MasonryGrid, ProjectItem};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use tracing::trace;
use xxhash_rust::xxh3::xxh3_64;

/// Maximum number of cached layouts to keep in memory.
const MAX_CACHE_ENTRIES: usize = 8;

/// Key for the layout cache: every input the packer depends on.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    columns: usize,
    /// Exact container width; packs are not reusable across widths.
    width_bits: u32,
    expanded: Option<String>,
    list_hash: u64,
}

/// Memoises pack results.
///
/// Width toggles between a handful of values while a window is resized back
/// and forth, and each expand/collapse click flips between two packs, so a
/// small LRU absorbs most recomputes. A hit returns exactly what
/// `MasonryLayout::compute` would.
pub struct LayoutCache {
    cache: Mutex<LruCache<CacheKey, MasonryGrid>>,
}

impl LayoutCache {
    /// Creates a new empty layout cache.
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHE_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Computes a fast hash of the item list.
    /// The hash covers (id + desired height) for each item in order,
    /// so any change to content or order invalidates the entry.
    pub fn compute_list_hash(items: &[ProjectItem]) -> u64 {
        let mut hasher_input = Vec::with_capacity(items.len() * 16);

        for item in items {
            hasher_input.extend_from_slice(item.id.as_bytes());
            // Separator keeps "1"+"23" distinct from "12"+"3"
            hasher_input.push(0);
            hasher_input.extend_from_slice(&item.desired_height.to_bits().to_le_bytes());
        }

        xxh3_64(&hasher_input)
    }

    /// Returns the cached pack or computes and stores it.
    ///
    /// The layout configuration is not part of the key; call `clear` after
    /// changing it.
    pub fn get_or_compute(
        &self,
        layout: &MasonryLayout,
        columns: usize,
        container_width: f32,
        items: &[ProjectItem],
        expanded_id: Option<&str>,
    ) -> MasonryGrid {
        let key = CacheKey {
            columns,
            width_bits: container_width.to_bits(),
            expanded: expanded_id.map(str::to_owned),
            list_hash: Self::compute_list_hash(items),
        };

        if let Some(grid) = self.cache.lock().get(&key) {
            trace!(columns, container_width, "Layout cache hit");
            return grid.clone();
        }

        let grid = layout.compute(columns, container_width, items, expanded_id);
        self.cache.lock().put(key, grid.clone());
        grid
    }

    /// Clears the entire cache.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    /// Returns the number of cached layouts.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_items(count: usize) -> Vec<ProjectItem> {
        (0..count)
            .map(|i| ProjectItem::new(format!("{}", i), format!("{}.jpg", i), 200.0 + i as f32 * 37.0))
            .collect()
    }

    #[test]
    fn test_list_hash_consistency() {
        let items = make_items(4);
        assert_eq!(
            LayoutCache::compute_list_hash(&items),
            LayoutCache::compute_list_hash(&items)
        );
    }

    #[test]
    fn test_list_hash_changes_on_height() {
        let items1 = vec![ProjectItem::new("a", "a.jpg", 300.0)];
        let items2 = vec![ProjectItem::new("a", "a.jpg", 301.0)];
        assert_ne!(
            LayoutCache::compute_list_hash(&items1),
            LayoutCache::compute_list_hash(&items2)
        );
    }

    #[test]
    fn test_list_hash_changes_on_order() {
        let items = make_items(2);
        let reversed: Vec<ProjectItem> = items.iter().rev().cloned().collect();
        assert_ne!(
            LayoutCache::compute_list_hash(&items),
            LayoutCache::compute_list_hash(&reversed)
        );
    }

    #[test]
    fn test_hit_matches_direct_compute() {
        let cache = LayoutCache::new();
        let layout = MasonryLayout::default();
        let items = make_items(9);

        let first = cache.get_or_compute(&layout, 3, 960.0, &items, Some("4"));
        let second = cache.get_or_compute(&layout, 3, 960.0, &items, Some("4"));
        let direct = layout.compute(3, 960.0, &items, Some("4"));

        assert_eq!(first, direct);
        assert_eq!(second, direct);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_inputs_get_distinct_entries() {
        let cache = LayoutCache::new();
        let layout = MasonryLayout::default();
        let items = make_items(5);

        let collapsed = cache.get_or_compute(&layout, 3, 960.0, &items, None);
        let expanded = cache.get_or_compute(&layout, 3, 960.0, &items, Some("1"));
        let wider = cache.get_or_compute(&layout, 3, 961.0, &items, None);

        assert_ne!(collapsed, expanded);
        assert_ne!(collapsed, wider);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_cache_eviction() {
        let cache = LayoutCache::new();
        let layout = MasonryLayout::default();
        let items = make_items(3);

        for i in 0..(MAX_CACHE_ENTRIES + 5) {
            cache.get_or_compute(&layout, 2, 500.0 + i as f32, &items, None);
        }

        assert_eq!(cache.len(), MAX_CACHE_ENTRIES);
        cache.clear();
        assert!(cache.is_empty());
    }
}
