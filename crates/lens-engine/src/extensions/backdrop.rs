// extensions/backdrop.rs
//
// Ambient drift for a full-page backdrop: a scroll parallax offset and a
// slowly crawling noise layer. Inputs only record values; `advance` is the
// single per-frame mutation.

use serde::{Deserialize, Serialize};

/// Drift tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Fraction of the page scroll applied to the backdrop grid.
    pub scroll_parallax: f32,
    /// Noise offset added each frame, in pixels.
    pub noise_drift_speed: f32,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            scroll_parallax: 0.04,
            noise_drift_speed: 0.18,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BackdropDrift {
    config: DriftConfig,
    scroll_y: f32,
    noise_offset: f32,
    /// Reduced motion: outputs stay at zero.
    frozen: bool,
}

impl BackdropDrift {
    pub fn new(config: DriftConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// A drift that never moves.
    pub fn frozen() -> Self {
        Self {
            frozen: true,
            ..Self::default()
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Record the latest page scroll offset in pixels.
    pub fn set_scroll(&mut self, scroll_y: f32) {
        if scroll_y.is_finite() {
            self.scroll_y = scroll_y;
        }
    }

    /// Step the noise layer by one frame.
    pub fn advance(&mut self) {
        if !self.frozen {
            self.noise_offset += self.config.noise_drift_speed;
        }
    }

    /// Parallax offset for the backdrop grid, in pixels.
    pub fn scroll_offset(&self) -> f32 {
        if self.frozen {
            0.0
        } else {
            self.scroll_y * self.config.scroll_parallax
        }
    }

    /// Horizontal noise offset, in pixels.
    pub fn noise_offset(&self) -> f32 {
        self.noise_offset
    }
}
