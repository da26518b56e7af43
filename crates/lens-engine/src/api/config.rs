use serde::{Deserialize, Serialize};
use crate::api::types::Position;
use crate::extensions::sweep::{SweepConfig, VISOR_LINE_Y};

/// Smallest smoothing factor accepted by [`FollowConfig::sanitized`].
pub const MIN_SMOOTHING: f32 = 0.001;

/// Hero lens width in pixels; sizes the intro overshoot.
pub const VISOR_WIDTH_PX: f32 = 320.0;

/// Errors from loading a [`FollowConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid follow config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("smoothing factor must be in (0, 1], got {0}")]
    SmoothingFactor(f32),
    #[error("sweep duration must be finite and non-negative, got {0}")]
    SweepDuration(f32),
}

/// Configuration for one follow engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowConfig {
    /// Fraction of the remaining distance covered each frame, in (0, 1] (default: 0.2).
    pub smoothing_factor: f32,
    /// Where the lens settles while the pointer is away (default: center).
    pub rest_position: Position,
    /// Optional intro sweep played before tracking starts.
    pub sweep: Option<SweepConfig>,
    /// Publish a single static position and never animate.
    pub reduced_motion: bool,
    /// Whether the device has a hovering fine pointer. Without one the
    /// engine behaves as if `reduced_motion` were set.
    pub pointer_capable: bool,
    /// Position published in static mode. Defaults to `rest_position`.
    pub static_position: Option<Position>,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.2,
            rest_position: Position::CENTER,
            sweep: None,
            reduced_motion: false,
            pointer_capable: true,
            static_position: None,
        }
    }
}

impl FollowConfig {
    /// The hero name lens: snappy follow, rests just above center,
    /// opens with a left-to-right pass across the container.
    pub fn hero_visor(container_width_px: f32) -> Self {
        Self {
            smoothing_factor: 0.2,
            rest_position: Position::new(0.5, VISOR_LINE_Y),
            sweep: Some(SweepConfig::visor_pass(container_width_px, VISOR_WIDTH_PX)),
            ..Self::default()
        }
    }

    /// The page-wide glow: slower follow, rests in the upper third, no intro.
    pub fn reactive_background() -> Self {
        Self {
            smoothing_factor: 0.13,
            rest_position: Position::new(0.5, 0.3),
            ..Self::default()
        }
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    pub fn with_pointer_capable(mut self, capable: bool) -> Self {
        self.pointer_capable = capable;
        self
    }

    pub fn with_sweep(mut self, sweep: Option<SweepConfig>) -> Self {
        self.sweep = sweep;
        self
    }

    /// Parse and validate a config from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let alpha = self.smoothing_factor;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::SmoothingFactor(alpha));
        }
        if let Some(sweep) = &self.sweep {
            if !sweep.duration.is_finite() || sweep.duration < 0.0 {
                return Err(ConfigError::SweepDuration(sweep.duration));
            }
        }
        Ok(())
    }

    /// Force the config into a runnable shape instead of rejecting it.
    /// A bad smoothing factor is clamped; a bad sweep duration is zeroed
    /// so the sweep completes on its first frame.
    pub fn sanitized(mut self) -> Self {
        let alpha = self.smoothing_factor;
        if !(alpha > 0.0 && alpha <= 1.0) {
            let fixed = if alpha.is_nan() {
                Self::default().smoothing_factor
            } else {
                alpha.clamp(MIN_SMOOTHING, 1.0)
            };
            log::warn!("smoothing factor {} out of range, using {}", alpha, fixed);
            self.smoothing_factor = fixed;
        }
        if let Some(sweep) = &mut self.sweep {
            if !sweep.duration.is_finite() || sweep.duration < 0.0 {
                log::warn!("sweep duration {} invalid, skipping intro", sweep.duration);
                sweep.duration = 0.0;
            }
        }
        self
    }

    /// True when the engine should publish one frame and stay idle.
    pub fn is_static(&self) -> bool {
        self.reduced_motion || !self.pointer_capable
    }

    /// The position published in static mode.
    pub fn static_target(&self) -> Position {
        self.static_position.unwrap_or(self.rest_position)
    }
}
