// extensions/sweep.rs
//
// Scripted sweep: a one-shot, time-driven path the lens plays before it
// starts following the pointer. The target is a pure function of elapsed
// time, so the same elapsed value always yields the same position.

use std::fmt;
use std::rc::Rc;
use serde::{Deserialize, Serialize};
use crate::api::types::Position;
use super::easing::{ease, CubicBezier, Easing};

/// Intro length of the hero lens pass, in seconds.
pub const VISOR_SWEEP_SECONDS: f32 = 1.12;
/// Vertical resting line of the hero lens.
pub const VISOR_LINE_Y: f32 = 0.46;
/// How far past each edge the pass starts and ends, in lens widths.
const VISOR_OVERSHOOT: f32 = 0.7;

/// Path sampled by a scripted sweep. Input is progress in [0, 1].
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepPath {
    /// Horizontal pass along a fixed line. `from_x` and `to_x` may lie
    /// outside [0, 1]; sampled positions are clamped.
    Horizontal {
        from_x: f32,
        to_x: f32,
        y: f32,
        #[serde(default)]
        easing: Easing,
    },
    /// Caller-supplied path. Not loadable from JSON.
    #[serde(skip)]
    Custom(Rc<dyn Fn(f32) -> Position>),
}

impl SweepPath {
    /// Position at `progress`. `None` when the path produced a non-finite point.
    pub fn sample(&self, progress: f32) -> Option<Position> {
        let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        match self {
            SweepPath::Horizontal { from_x, to_x, y, easing } => {
                Position::try_new(ease(*from_x, *to_x, progress, *easing), *y)
            }
            SweepPath::Custom(path) => Some(path(progress)),
        }
    }
}

impl fmt::Debug for SweepPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepPath::Horizontal { from_x, to_x, y, easing } => f
                .debug_struct("Horizontal")
                .field("from_x", from_x)
                .field("to_x", to_x)
                .field("y", y)
                .field("easing", easing)
                .finish(),
            SweepPath::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A scripted sweep: a path played over `duration` seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Length of the sweep in seconds.
    pub duration: f32,
    pub path: SweepPath,
}

impl SweepConfig {
    pub fn new(duration: f32, path: SweepPath) -> Self {
        Self { duration, path }
    }

    /// Sweep driven by a closure over progress.
    pub fn custom(duration: f32, path: impl Fn(f32) -> Position + 'static) -> Self {
        Self::new(duration, SweepPath::Custom(Rc::new(path)))
    }

    /// The hero intro: the lens enters from the left edge, crosses the
    /// container along the resting line and leaves on the right.
    ///
    /// `container_width_px` and `lens_width_px` size the overshoot. A
    /// container with no width has nothing to cross, so the lens holds at
    /// the center of the resting line for the length of the intro.
    pub fn visor_pass(container_width_px: f32, lens_width_px: f32) -> Self {
        let (from_x, to_x) = if container_width_px > 0.0 && container_width_px.is_finite() {
            let overshoot = if lens_width_px.is_finite() {
                (lens_width_px * VISOR_OVERSHOOT / container_width_px).max(0.0)
            } else {
                0.0
            };
            (-overshoot, 1.0 + overshoot)
        } else {
            (0.5, 0.5)
        };
        Self::new(
            VISOR_SWEEP_SECONDS,
            SweepPath::Horizontal {
                from_x,
                to_x,
                y: VISOR_LINE_Y,
                easing: Easing::Bezier(CubicBezier::SWEEP),
            },
        )
    }

    /// Normalized progress for `elapsed` seconds.
    pub fn progress(&self, elapsed: f32) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Sweep target after `elapsed` seconds.
    pub fn target_at(&self, elapsed: f32) -> Option<Position> {
        self.path.sample(self.progress(elapsed))
    }

    pub fn is_finished(&self, elapsed: f32) -> bool {
        elapsed >= self.duration
    }
}
