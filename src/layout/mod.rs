pub mod columns;
pub mod layout_cache;
pub mod masonry;

pub use columns::{Breakpoint, ColumnResolver, ColumnTracker, DEFAULT_BREAKPOINTS};
pub use layout_cache::LayoutCache;
pub use masonry::MasonryLayout;
