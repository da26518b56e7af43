use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A point in normalized container space.
/// Both components are always inside [0, 1]; construction clamps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Position(Vec2);

impl Position {
    /// Dead center of the container.
    pub const CENTER: Position = Position(Vec2::new(0.5, 0.5));

    /// Build a position, clamping both components into [0, 1].
    /// NaN components collapse to 0.
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(unit(x), unit(y)))
    }

    /// Like [`Position::new`], but rejects NaN and infinite components
    /// instead of collapsing them.
    pub fn try_new(x: f32, y: f32) -> Option<Self> {
        if x.is_finite() && y.is_finite() {
            Some(Self::new(x, y))
        } else {
            None
        }
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    pub fn as_vec2(&self) -> Vec2 {
        self.0
    }

    /// One exponential-smoothing step: move `factor` of the way toward `goal`.
    pub fn lerp_toward(self, goal: Position, factor: f32) -> Position {
        let next = self.0 + (goal.0 - self.0) * factor;
        Position::new(next.x, next.y)
    }

    /// Euclidean distance in normalized units.
    pub fn distance(&self, other: Position) -> f32 {
        self.0.distance(other.0)
    }

    /// Components as percentages, the form CSS gradients consume.
    pub fn to_percent(&self) -> (f32, f32) {
        (self.0.x * 100.0, self.0.y * 100.0)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::CENTER
    }
}

impl From<[f32; 2]> for Position {
    fn from([x, y]: [f32; 2]) -> Self {
        Position::new(x, y)
    }
}

impl From<Position> for [f32; 2] {
    fn from(p: Position) -> Self {
        [p.0.x, p.0.y]
    }
}

#[inline]
fn unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Which source drives the target position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Not animating: not started, stopped, or running in static mode.
    #[default]
    Idle,
    /// Target follows a time-based path; input is ignored.
    ScriptedSweep,
    /// Target follows the latest pointer sample.
    Tracking,
}

impl Phase {
    /// Numeric tag written into [`crate::FrameRecord`].
    pub fn as_f32(self) -> f32 {
        match self {
            Phase::Idle => 0.0,
            Phase::ScriptedSweep => 1.0,
            Phase::Tracking => 2.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::ScriptedSweep => "sweep",
            Phase::Tracking => "tracking",
        }
    }
}

/// Snapshot of the engine's observable state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineState {
    /// Smoothed position, the one consumers render.
    pub current: Position,
    /// Latest requested position.
    pub target: Position,
    /// Whether the pointer is inside the tracked region.
    pub active: bool,
    pub phase: Phase,
}

impl EngineState {
    /// Fresh state resting at `rest`.
    pub fn at_rest(rest: Position) -> Self {
        Self {
            current: rest,
            target: rest,
            active: false,
            phase: Phase::Idle,
        }
    }
}
