//! Card animation: easing curves, tweens and the per-card director.

pub mod director;
pub mod easing;
pub mod tween;

pub use director::{entrance_origin, AnimationDirector, AnimationHandle, EntryDirection, Viewport};
pub use easing::Easing;
pub use tween::{Appearance, Frame, Geometry, Lerp, Tween};
