use crate::api::types::Position;

/// A pointer sample in pixels, in the same coordinate space as [`Bounds`]
/// (client coordinates from a DOM event, or element-local with zero-origin bounds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Bounding box of the tracked region, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Bounds anchored at the origin.
    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Zero, negative or non-finite extent: nothing can be normalized against it.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
            || !self.width.is_finite()
            || !self.height.is_finite()
    }

    /// Normalize a sample into [0, 1] container space.
    /// Samples outside the box clamp to its edges. Degenerate bounds yield `None`.
    pub fn normalize(&self, sample: PointerSample) -> Option<Position> {
        if self.is_degenerate() {
            return None;
        }
        Position::try_new(
            (sample.x - self.left) / self.width,
            (sample.y - self.top) / self.height,
        )
    }
}

/// Pointer events the engine understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// The pointer entered the tracked region.
    Enter(PointerSample),
    /// The pointer moved.
    Move(PointerSample),
    /// A press began; treated as a position update.
    Down(PointerSample),
    /// The pointer left the tracked region.
    Leave,
}

impl PointerEvent {
    pub fn sample(&self) -> Option<PointerSample> {
        match *self {
            PointerEvent::Enter(s) | PointerEvent::Move(s) | PointerEvent::Down(s) => Some(s),
            PointerEvent::Leave => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_inside_bounds() {
        let bounds = Bounds::sized(400.0, 200.0);
        let p = bounds.normalize(PointerSample::new(100.0, 60.0)).unwrap();
        assert!((p.x() - 0.25).abs() < 1e-6);
        assert!((p.y() - 0.30).abs() < 1e-6);
    }

    #[test]
    fn offset_bounds_subtract_origin() {
        let bounds = Bounds::new(50.0, 20.0, 100.0, 100.0);
        let p = bounds.normalize(PointerSample::new(100.0, 70.0)).unwrap();
        assert!((p.x() - 0.5).abs() < 1e-6);
        assert!((p.y() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn outside_samples_clamp() {
        let bounds = Bounds::sized(400.0, 200.0);
        let p = bounds.normalize(PointerSample::new(-80.0, 900.0)).unwrap();
        assert_eq!(p.x(), 0.0);
        assert_eq!(p.y(), 1.0);
    }

    #[test]
    fn degenerate_bounds_yield_none() {
        let s = PointerSample::new(10.0, 10.0);
        assert!(Bounds::sized(0.0, 200.0).normalize(s).is_none());
        assert!(Bounds::sized(400.0, -1.0).normalize(s).is_none());
        assert!(Bounds::sized(f32::NAN, 10.0).normalize(s).is_none());
    }

    #[test]
    fn leave_has_no_sample() {
        assert!(PointerEvent::Leave.sample().is_none());
        let s = PointerSample::new(1.0, 2.0);
        assert_eq!(PointerEvent::Down(s).sample(), Some(s));
    }
}
