/// Converts display-frame timestamps (milliseconds, as handed to
/// `requestAnimationFrame` callbacks) into elapsed time.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Timestamp of the first observed frame.
    origin: Option<f64>,
    /// Timestamp of the most recent frame.
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a frame. Non-finite timestamps and timestamps that went
    /// backwards leave the clock unchanged.
    pub fn tick(&mut self, timestamp_ms: f64) {
        if !timestamp_ms.is_finite() {
            return;
        }
        if self.origin.is_none() {
            self.origin = Some(timestamp_ms);
        }
        if self.last.map_or(true, |last| timestamp_ms > last) {
            self.last = Some(timestamp_ms);
        }
    }

    /// Seconds between the first and the latest observed frame.
    pub fn elapsed(&self) -> f32 {
        match (self.origin, self.last) {
            (Some(origin), Some(last)) => ((last - origin) / 1000.0) as f32,
            _ => 0.0,
        }
    }

    /// Forget all observed frames; the next tick becomes the new origin.
    pub fn reset(&mut self) {
        self.origin = None;
        self.last = None;
    }
}
