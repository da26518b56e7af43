use super::types::Position;

/// Receives positions published by a running engine.
///
/// How the position reaches the screen (CSS variables, a canvas uniform,
/// a test vector) is up to the implementor.
pub trait PositionSink {
    /// Called at most once per display frame with the smoothed position.
    fn on_update(&mut self, position: Position);

    /// Called once when a scripted sweep hands over to pointer tracking.
    fn on_sweep_complete(&mut self) {}
}

impl<F> PositionSink for F
where
    F: FnMut(Position),
{
    fn on_update(&mut self, position: Position) {
        self(position)
    }
}
