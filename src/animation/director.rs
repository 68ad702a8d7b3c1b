//! Card animation choreography.
//!
//! The director turns successive pack results into per-card tweens:
//! - first pack: cards fly in from an entry direction, fading and
//!   un-blurring, staggered by index
//! - later packs: cards glide from wherever they are to their new box
//! - hover: an independent scale (and optional overlay) tween
//!
//! Each card owns at most one geometry tween. Issuing a new target replaces
//! it, starting from the card's current on-screen geometry. Every issued
//! animation gets a fresh generation in its `AnimationHandle`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, trace};

use super::easing::Easing;
use super::tween::{Appearance, Frame, Geometry, Tween};
use crate::config::ShowcaseOptions;
use crate::error::FolioError;
use crate::models::{MasonryGrid, PackedBox};

/// Entrance animation length.
const ENTRANCE_DURATION: Duration = Duration::from_millis(800);
/// Re-layout length for the card that just expanded.
const EXPAND_DURATION: Duration = Duration::from_millis(600);
/// Hover scale and overlay length.
const HOVER_DURATION: Duration = Duration::from_millis(300);
/// How far outside the viewport an entering card starts.
const OFFSCREEN_MARGIN: f32 = 200.0;
/// Blur radius a card starts from when blur-to-focus is on.
const ENTRANCE_BLUR: f32 = 10.0;
/// Overlay opacity while hovered with colour shift on.
const HOVER_OVERLAY: f32 = 0.3;

/// Where entering cards come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum EntryDirection {
    #[default]
    Bottom,
    Top,
    Left,
    Right,
    Center,
    /// One of top, bottom, left or right, picked per card.
    Random,
}

impl FromStr for EntryDirection {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bottom" => Ok(Self::Bottom),
            "top" => Ok(Self::Top),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "center" | "centre" => Ok(Self::Center),
            "random" => Ok(Self::Random),
            _ => Err(FolioError::UnknownDirection(s.to_string())),
        }
    }
}

impl TryFrom<String> for EntryDirection {
    type Error = FolioError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for EntryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bottom => "bottom",
            Self::Top => "top",
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::Random => "random",
        };
        f.write_str(name)
    }
}

/// Size of the visible window area, used to place off-screen entrance starts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Identifies one issued geometry animation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnimationHandle {
    pub id: String,
    pub generation: u64,
}

/// Synthetic start position for a card entering from `direction`.
///
/// `Random` must be resolved to a concrete edge before calling.
pub fn entrance_origin(
    direction: EntryDirection,
    target: &PackedBox,
    viewport: Viewport,
    container: (f32, f32),
) -> (f32, f32) {
    match direction {
        EntryDirection::Top => (target.x, -OFFSCREEN_MARGIN),
        EntryDirection::Bottom | EntryDirection::Random => {
            (target.x, viewport.height + OFFSCREEN_MARGIN)
        }
        EntryDirection::Left => (-OFFSCREEN_MARGIN, target.y),
        EntryDirection::Right => (viewport.width + OFFSCREEN_MARGIN, target.y),
        EntryDirection::Center => (
            container.0 / 2.0 - target.width / 2.0,
            container.1 / 2.0 - target.height / 2.0,
        ),
    }
}

struct CardTrack {
    geometry: Tween<Geometry>,
    appearance: Tween<Appearance>,
    scale: Tween<f32>,
    overlay: Tween<f32>,
}

impl CardTrack {
    fn frame(&self, now: Instant) -> Frame {
        let appearance = self.appearance.sample(now);
        Frame {
            geometry: self.geometry.sample(now),
            opacity: appearance.opacity,
            blur: appearance.blur,
            scale: self.scale.sample(now),
            overlay: self.overlay.sample(now),
        }
    }

    fn is_finished(&self, now: Instant) -> bool {
        self.geometry.is_finished(now)
            && self.appearance.is_finished(now)
            && self.scale.is_finished(now)
            && self.overlay.is_finished(now)
    }
}

/// Drives entrance, re-layout and hover animations for packed cards.
pub struct AnimationDirector {
    options: ShowcaseOptions,
    tracks: HashMap<String, CardTrack>,
    /// Card ids in the order of the latest pack.
    order: Vec<String>,
    next_generation: u64,
    rng: StdRng,
}

impl AnimationDirector {
    pub fn new(options: ShowcaseOptions) -> Self {
        Self::with_rng(options, StdRng::from_os_rng())
    }

    /// Deterministic random entrance edges, for tests and reproducible demos.
    pub fn with_seed(options: ShowcaseOptions, seed: u64) -> Self {
        Self::with_rng(options, StdRng::seed_from_u64(seed))
    }

    fn with_rng(options: ShowcaseOptions, rng: StdRng) -> Self {
        Self {
            options,
            tracks: HashMap::new(),
            order: Vec::new(),
            next_generation: 1,
            rng,
        }
    }

    /// True once any card has been placed; later packs animate from the
    /// previous boxes instead of entering.
    pub fn has_mounted(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Reconcile the tracked cards with a fresh pack.
    ///
    /// Cards without a track enter from the configured direction; tracked
    /// cards whose box changed are retargeted. Cards missing from `grid` are
    /// dropped. Returns a handle for every geometry animation issued.
    pub fn reconcile(
        &mut self,
        grid: &MasonryGrid,
        expanded_id: Option<&str>,
        viewport: Viewport,
        now: Instant,
    ) -> Vec<AnimationHandle> {
        self.forget_missing(grid.boxes.iter().map(|b| b.id.as_str()));
        self.order = grid.boxes.iter().map(|b| b.id.clone()).collect();

        let mut issued = Vec::new();
        let mut entering = 0usize;
        for b in &grid.boxes {
            let target = Geometry::from(b);
            let generation = self.next_generation;

            let handle = match self.tracks.get_mut(&b.id) {
                Some(track) => {
                    if track.geometry.to == target {
                        continue;
                    }
                    let (duration, easing) = if expanded_id == Some(b.id.as_str()) {
                        (EXPAND_DURATION, Easing::POWER2_OUT)
                    } else {
                        (self.options.duration(), self.options.easing)
                    };
                    let current = track.geometry.sample(now);
                    track.geometry = Tween::new(current, target, now, duration, easing);
                    trace!(item_id = %b.id, generation, "Retargeted card");
                    AnimationHandle {
                        id: b.id.clone(),
                        generation,
                    }
                }
                None => {
                    let track = self.entrance_track(b, grid, viewport, entering, now);
                    self.tracks.insert(b.id.clone(), track);
                    entering += 1;
                    AnimationHandle {
                        id: b.id.clone(),
                        generation,
                    }
                }
            };
            self.next_generation += 1;
            issued.push(handle);
        }

        debug!(
            cards = grid.boxes.len(),
            entering,
            issued = issued.len(),
            "Reconciled layout"
        );
        issued
    }

    fn entrance_track(
        &mut self,
        target: &PackedBox,
        grid: &MasonryGrid,
        viewport: Viewport,
        index: usize,
        now: Instant,
    ) -> CardTrack {
        let direction = match self.options.entry_direction {
            EntryDirection::Random => self.random_edge(),
            direction => direction,
        };
        let (x, y) = entrance_origin(
            direction,
            target,
            viewport,
            (grid.container_width, grid.container_height),
        );
        let delay = self.options.stagger().saturating_mul(index as u32);
        let start_blur = if self.options.blur_to_focus {
            ENTRANCE_BLUR
        } else {
            0.0
        };

        let from = Geometry::new(x, y, target.width, target.height);
        CardTrack {
            geometry: Tween::new(from, Geometry::from(target), now, ENTRANCE_DURATION, Easing::POWER3_OUT)
                .with_delay(delay),
            appearance: Tween::new(
                Appearance {
                    opacity: 0.0,
                    blur: start_blur,
                },
                Appearance::VISIBLE,
                now,
                ENTRANCE_DURATION,
                Easing::POWER3_OUT,
            )
            .with_delay(delay),
            scale: Tween::settled(1.0, now),
            overlay: Tween::settled(0.0, now),
        }
    }

    fn random_edge(&mut self) -> EntryDirection {
        const EDGES: [EntryDirection; 4] = [
            EntryDirection::Top,
            EntryDirection::Bottom,
            EntryDirection::Left,
            EntryDirection::Right,
        ];
        EDGES[self.rng.random_range(0..EDGES.len())]
    }

    /// Pointer entered a card.
    pub fn hover_enter(&mut self, id: &str, now: Instant) {
        let (scale, overlay) = (self.options.hover_scale, HOVER_OVERLAY);
        self.set_hover(id, scale, overlay, now);
    }

    /// Pointer left a card.
    pub fn hover_leave(&mut self, id: &str, now: Instant) {
        self.set_hover(id, 1.0, 0.0, now);
    }

    fn set_hover(&mut self, id: &str, scale: f32, overlay: f32, now: Instant) {
        let scale_on_hover = self.options.scale_on_hover;
        let color_shift = self.options.color_shift_on_hover;
        let Some(track) = self.tracks.get_mut(id) else {
            return;
        };
        if scale_on_hover {
            let current = track.scale.sample(now);
            track.scale = Tween::new(current, scale, now, HOVER_DURATION, Easing::POWER2_OUT);
        }
        if color_shift {
            let current = track.overlay.sample(now);
            track.overlay = Tween::new(current, overlay, now, HOVER_DURATION, Easing::Linear);
        }
    }

    /// Drop tracks for cards that are no longer laid out.
    pub fn forget_missing<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let keep: std::collections::HashSet<&str> = ids.into_iter().collect();
        self.tracks.retain(|id, _| keep.contains(id.as_str()));
        self.order.retain(|id| keep.contains(id.as_str()));
    }

    /// Frame for one card.
    pub fn frame(&self, id: &str, now: Instant) -> Option<Frame> {
        self.tracks.get(id).map(|t| t.frame(now))
    }

    /// Frames for every card, in pack order.
    pub fn tick(&self, now: Instant) -> Vec<(String, Frame)> {
        self.order
            .iter()
            .filter_map(|id| self.frame(id, now).map(|frame| (id.clone(), frame)))
            .collect()
    }

    /// Whether any card still has a tween running.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.tracks.values().any(|t| !t.is_finished(now))
    }
}
