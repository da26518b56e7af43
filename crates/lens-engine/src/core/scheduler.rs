use std::cell::{Cell, RefCell};

/// Work to run on the next display frame. Receives the frame timestamp in ms.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Handle to a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub i32);

/// A source of display-synchronized callbacks.
///
/// Callbacks run one at a time on the thread that owns the scheduler.
/// Implementations take `&self` so a callback can request the next frame
/// while the scheduler is shared.
pub trait FrameScheduler {
    /// Queue `callback` for the next frame. `None` when the platform refused.
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameId>;

    /// Drop a pending request. Unknown or already-run ids are ignored.
    fn cancel_frame(&self, id: FrameId);
}

/// Scheduler driven by hand. Headless hosts call [`ManualScheduler::advance`]
/// once per rendered frame; tests use it to step the engine deterministically.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<Vec<(FrameId, FrameCallback)>>,
    next_id: Cell<i32>,
    now_ms: Cell<f64>,
    requested: Cell<usize>,
    invoked: Cell<usize>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every callback that was queued before this call, at `timestamp_ms`.
    /// Callbacks queued while running wait for the next frame.
    /// Returns the number of callbacks run.
    pub fn run_frame(&self, timestamp_ms: f64) -> usize {
        self.now_ms.set(timestamp_ms);
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            self.invoked.set(self.invoked.get() + 1);
            callback(timestamp_ms);
        }
        count
    }

    /// Move the clock forward by `frame_ms` and run one frame.
    pub fn advance(&self, frame_ms: f64) -> usize {
        self.run_frame(self.now_ms.get() + frame_ms)
    }

    /// Run `frames` frames spaced `frame_ms` apart.
    pub fn advance_frames(&self, frames: usize, frame_ms: f64) -> usize {
        (0..frames).map(|_| self.advance(frame_ms)).sum()
    }

    /// Timestamp of the most recent frame.
    pub fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }

    /// Callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Total frame requests ever made.
    pub fn requests(&self) -> usize {
        self.requested.get()
    }

    /// Total callbacks ever run.
    pub fn invocations(&self) -> usize {
        self.invoked.get()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameId> {
        let id = FrameId(self.next_id.get());
        self.next_id.set(id.0.wrapping_add(1));
        self.requested.set(self.requested.get() + 1);
        self.queue.borrow_mut().push((id, callback));
        Some(id)
    }

    fn cancel_frame(&self, id: FrameId) {
        self.queue.borrow_mut().retain(|(pending, _)| *pending != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn runs_queued_callbacks_once() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        scheduler.request_frame(Box::new(move |_| h.set(h.get() + 1)));

        assert_eq!(scheduler.advance(16.0), 1);
        assert_eq!(scheduler.advance(16.0), 0);
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.invocations(), 1);
    }

    #[test]
    fn cancel_drops_pending() {
        let scheduler = ManualScheduler::new();
        let id = scheduler.request_frame(Box::new(|_| panic!("cancelled callback ran"))).unwrap();
        scheduler.cancel_frame(id);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.advance(16.0), 0);
    }

    #[test]
    fn requests_made_during_a_frame_wait_for_the_next() {
        let scheduler = Rc::new(ManualScheduler::new());
        let inner = Rc::clone(&scheduler);
        scheduler.request_frame(Box::new(move |_| {
            inner.request_frame(Box::new(|_| {}));
        }));

        assert_eq!(scheduler.advance(16.0), 1);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.requests(), 2);
    }

    #[test]
    fn callbacks_see_frame_timestamp() {
        let scheduler = ManualScheduler::new();
        let seen = Rc::new(Cell::new(0.0));
        let s = Rc::clone(&seen);
        scheduler.request_frame(Box::new(move |ts| s.set(ts)));
        scheduler.advance(33.0);
        assert_eq!(seen.get(), 33.0);
    }
}
