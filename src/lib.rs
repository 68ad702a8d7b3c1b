//! Animated masonry showcase for project cards.
//!
//! The toolkit-free core: column resolution, masonry packing, card animation
//! and the expand/collapse interaction. The `gui` feature adds the GTK4 host
//! binary on top.

pub mod animation;
pub mod config;
pub mod error;
pub mod image_loader;
pub mod interaction;
pub mod layout;
pub mod models;
pub mod observe;
pub mod preload;
pub mod showcase;

pub use config::ShowcaseOptions;
pub use error::{FolioError, Result};
pub use interaction::ExpansionState;
pub use showcase::Showcase;
