pub mod catalog;
pub mod packed_box;
pub mod project_item;

pub use catalog::*;
pub use packed_box::*;
pub use project_item::*;
