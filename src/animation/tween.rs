use std::time::{Duration, Instant};

use super::easing::Easing;
use crate::models::PackedBox;

/// Linear interpolation between two values of the same kind.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

/// Position and size of a card in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Geometry {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl From<&PackedBox> for Geometry {
    fn from(b: &PackedBox) -> Self {
        Self::new(b.x, b.y, b.width, b.height)
    }
}

impl Lerp for Geometry {
    fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            x: self.x.lerp(to.x, t),
            y: self.y.lerp(to.y, t),
            width: self.width.lerp(to.width, t),
            height: self.height.lerp(to.height, t),
        }
    }
}

/// Opacity and blur radius, animated together on entrance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub opacity: f32,
    pub blur: f32,
}

impl Appearance {
    pub const VISIBLE: Appearance = Appearance {
        opacity: 1.0,
        blur: 0.0,
    };
}

impl Lerp for Appearance {
    fn lerp(self, to: Self, t: f32) -> Self {
        Self {
            opacity: self.opacity.lerp(to.opacity, t),
            blur: self.blur.lerp(to.blur, t),
        }
    }
}

/// Everything the host needs to draw one card for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub geometry: Geometry,
    pub opacity: f32,
    /// Blur radius in pixels.
    pub blur: f32,
    /// Uniform scale around the card centre.
    pub scale: f32,
    /// Opacity of the hover colour overlay.
    pub overlay: f32,
}

impl Frame {
    /// Geometry after applying `scale` around the centre.
    pub fn scaled_geometry(&self) -> Geometry {
        let g = self.geometry;
        let w = g.width * self.scale;
        let h = g.height * self.scale;
        Geometry::new(g.x + (g.width - w) / 2.0, g.y + (g.height - h) / 2.0, w, h)
    }
}

/// One value moving from `from` to `to` over time.
#[derive(Debug, Clone, Copy)]
pub struct Tween<T: Lerp> {
    pub from: T,
    pub to: T,
    start: Instant,
    delay: Duration,
    duration: Duration,
    easing: Easing,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, start: Instant, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            delay: Duration::ZERO,
            duration,
            easing,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// A tween that is already at `value`.
    pub fn settled(value: T, now: Instant) -> Self {
        Self::new(value, value, now, Duration::ZERO, Easing::Linear)
    }

    /// Linear progress in [0, 1]; 0 while the delay runs.
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start);
        let Some(active) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        (active.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: Instant) -> T {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, self.easing.evaluate(t))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.delay + self.duration
    }

    #[cfg(test)]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    #[cfg(test)]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_endpoints() {
        let start = Instant::now();
        let tween = Tween::new(0.0f32, 100.0, start, Duration::from_millis(500), Easing::Linear);
        assert_eq!(tween.sample(start), 0.0);
        assert!((tween.sample(start + Duration::from_millis(250)) - 50.0).abs() < 0.01);
        assert_eq!(tween.sample(start + Duration::from_millis(500)), 100.0);
        assert_eq!(tween.sample(start + Duration::from_secs(5)), 100.0);
        assert!(tween.is_finished(start + Duration::from_millis(500)));
        assert!(!tween.is_finished(start + Duration::from_millis(499)));
    }

    #[test]
    fn test_delay_holds_start_value() {
        let start = Instant::now();
        let tween = Tween::new(1.0f32, 0.0, start, Duration::from_millis(100), Easing::Linear)
            .with_delay(Duration::from_millis(200));
        assert_eq!(tween.sample(start + Duration::from_millis(150)), 1.0);
        assert!((tween.sample(start + Duration::from_millis(250)) - 0.5).abs() < 0.01);
        assert!(!tween.is_finished(start + Duration::from_millis(250)));
        assert!(tween.is_finished(start + Duration::from_millis(300)));
    }

    #[test]
    fn test_zero_duration_jumps() {
        let now = Instant::now();
        let tween = Tween::new(3.0f32, 7.0, now, Duration::ZERO, Easing::POWER3_OUT);
        assert_eq!(tween.sample(now), 7.0);
        assert!(tween.is_finished(now));
    }

    #[test]
    fn test_geometry_lerp() {
        let a = Geometry::new(0.0, 0.0, 100.0, 50.0);
        let b = Geometry::new(100.0, 200.0, 300.0, 150.0);
        assert_eq!(a.lerp(b, 0.5), Geometry::new(50.0, 100.0, 200.0, 100.0));
    }

    #[test]
    fn test_scaled_geometry_keeps_centre() {
        let frame = Frame {
            geometry: Geometry::new(100.0, 100.0, 200.0, 100.0),
            opacity: 1.0,
            blur: 0.0,
            scale: 0.5,
            overlay: 0.0,
        };
        let g = frame.scaled_geometry();
        assert_eq!(g, Geometry::new(150.0, 125.0, 100.0, 50.0));
    }
}
