use std::cell::{Cell, RefCell};
use std::rc::Rc;
use crate::api::config::FollowConfig;
use crate::api::sink::PositionSink;
use crate::api::types::{EngineState, Phase, Position};
use crate::bridge::protocol::FrameRecord;
use crate::core::engine::{FollowEngine, FrameOutcome, Launch};
use crate::core::scheduler::{FrameId, FrameScheduler};
use crate::input::pointer::{Bounds, PointerEvent, PointerSample};

/// State shared between a handle and its scheduled frame callback.
///
/// The engine and the sink sit in separate cells so a sink may call back
/// into the handle (`stop`, `report_input`) while it is being notified.
struct Shared {
    engine: RefCell<FollowEngine>,
    sink: RefCell<Box<dyn PositionSink>>,
    scheduler: Rc<dyn FrameScheduler>,
    pending: Cell<Option<FrameId>>,
    stopped: Cell<bool>,
}

/// Start a follow engine.
///
/// In static mode (reduced motion, or no fine pointer) the sink receives
/// exactly one position and no frame is ever requested. Otherwise the first
/// frame is requested immediately and every frame requests the next one until
/// [`FollowHandle::stop`] is called or the handle is dropped.
pub fn start<K, S>(config: FollowConfig, sink: K, scheduler: Rc<S>) -> FollowHandle
where
    K: PositionSink + 'static,
    S: FrameScheduler + 'static,
{
    let mut engine = FollowEngine::new(config);
    let launch = engine.launch();
    let shared = Rc::new(Shared {
        engine: RefCell::new(engine),
        sink: RefCell::new(Box::new(sink)),
        scheduler,
        pending: Cell::new(None),
        stopped: Cell::new(false),
    });

    match launch {
        Launch::Static(position) => {
            shared.stopped.set(true);
            shared.sink.borrow_mut().on_update(position);
        }
        Launch::Animated(_) => request_next(&shared),
    }

    FollowHandle { shared }
}

fn request_next(shared: &Rc<Shared>) {
    if shared.stopped.get() {
        return;
    }
    let next = Rc::clone(shared);
    let id = shared
        .scheduler
        .request_frame(Box::new(move |timestamp| run_frame(&next, timestamp)));
    if id.is_none() {
        log::warn!("frame request refused, pointer follow is now inert");
        shared.stopped.set(true);
        shared.engine.borrow_mut().halt();
    }
    shared.pending.set(id);
}

fn run_frame(shared: &Rc<Shared>, timestamp: f64) {
    shared.pending.set(None);
    // The platform may run a callback that was queued before stop().
    if shared.stopped.get() {
        return;
    }

    let outcome = shared.engine.borrow_mut().frame(timestamp);
    match outcome {
        FrameOutcome::Updated(position) => {
            shared.sink.borrow_mut().on_update(position);
        }
        FrameOutcome::SweepFinished(position) => {
            shared.sink.borrow_mut().on_update(position);
            if !shared.stopped.get() {
                shared.sink.borrow_mut().on_sweep_complete();
            }
        }
        FrameOutcome::Skipped => {}
    }

    request_next(shared);
}

/// Owner of a running engine. Dropping it stops the engine.
pub struct FollowHandle {
    shared: Rc<Shared>,
}

impl FollowHandle {
    /// Stop the loop. Idempotent. No sink call happens after this returns.
    pub fn stop(&self) {
        if self.shared.stopped.replace(true) {
            return;
        }
        if let Some(id) = self.shared.pending.take() {
            self.shared.scheduler.cancel_frame(id);
        }
        self.shared.engine.borrow_mut().halt();
        log::debug!("follow engine stopped");
    }

    /// Whether frames are still being scheduled.
    pub fn is_running(&self) -> bool {
        !self.shared.stopped.get()
    }

    /// Record a normalized sample. Takes effect on the next frame.
    pub fn report_input(&self, position: Position, active: bool) -> bool {
        if self.shared.stopped.get() {
            return false;
        }
        self.shared.engine.borrow_mut().report_input(position, active)
    }

    /// Record a pixel-space sample against the tracked region's bounds.
    pub fn report_pointer(&self, sample: PointerSample, bounds: Bounds, active: bool) -> bool {
        if self.shared.stopped.get() {
            return false;
        }
        self.shared.engine.borrow_mut().report_pointer(sample, bounds, active)
    }

    /// Apply a pointer enter/move/down/leave event.
    pub fn handle_event(&self, event: PointerEvent, bounds: Bounds) -> bool {
        if self.shared.stopped.get() {
            return false;
        }
        self.shared.engine.borrow_mut().apply_event(event, bounds)
    }

    pub fn state(&self) -> EngineState {
        self.shared.engine.borrow().state()
    }

    pub fn phase(&self) -> Phase {
        self.shared.engine.borrow().phase()
    }

    /// Wire record of the current state.
    pub fn record(&self) -> FrameRecord {
        FrameRecord::from_state(&self.state())
    }
}

impl Drop for FollowHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheduler::{FrameCallback, ManualScheduler};
    use crate::extensions::sweep::SweepConfig;

    const FRAME_MS: f64 = 16.0;

    #[derive(Default)]
    struct Recorded {
        updates: Vec<Position>,
        completions: usize,
    }

    /// Sink that records into a shared log the test can inspect.
    struct Recorder(Rc<RefCell<Recorded>>);

    impl PositionSink for Recorder {
        fn on_update(&mut self, position: Position) {
            self.0.borrow_mut().updates.push(position);
        }

        fn on_sweep_complete(&mut self) {
            self.0.borrow_mut().completions += 1;
        }
    }

    fn recorder() -> (Recorder, Rc<RefCell<Recorded>>) {
        let log = Rc::new(RefCell::new(Recorded::default()));
        (Recorder(Rc::clone(&log)), log)
    }

    /// A scheduler whose cancel arrives too late: the callback still runs.
    #[derive(Default)]
    struct LateCancel {
        queue: RefCell<Vec<FrameCallback>>,
    }

    impl LateCancel {
        fn flush(&self, timestamp: f64) {
            let due = std::mem::take(&mut *self.queue.borrow_mut());
            for callback in due {
                callback(timestamp);
            }
        }
    }

    impl FrameScheduler for LateCancel {
        fn request_frame(&self, callback: FrameCallback) -> Option<FrameId> {
            self.queue.borrow_mut().push(callback);
            Some(FrameId(0))
        }

        fn cancel_frame(&self, _id: FrameId) {}
    }

    /// A scheduler that refuses every request.
    struct Refusing;

    impl FrameScheduler for Refusing {
        fn request_frame(&self, _callback: FrameCallback) -> Option<FrameId> {
            None
        }

        fn cancel_frame(&self, _id: FrameId) {}
    }

    #[test]
    fn reduced_motion_publishes_once_and_schedules_nothing() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (sink, log) = recorder();
        let config = FollowConfig::reactive_background().with_reduced_motion(true);
        let handle = start(config, sink, Rc::clone(&scheduler));

        assert_eq!(log.borrow().updates, vec![Position::new(0.5, 0.3)]);
        assert!(!handle.is_running());
        assert_eq!(scheduler.requests(), 0);

        scheduler.advance_frames(10, FRAME_MS);
        assert!(!handle.report_input(Position::new(0.9, 0.9), true));
        assert_eq!(scheduler.invocations(), 0);
        assert_eq!(log.borrow().updates.len(), 1);
    }

    #[test]
    fn no_fine_pointer_uses_static_position() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (sink, log) = recorder();
        let mut config = FollowConfig::hero_visor(800.0).with_pointer_capable(false);
        config.static_position = Some(Position::new(0.5, 0.5));
        let _handle = start(config, sink, Rc::clone(&scheduler));

        assert_eq!(log.borrow().updates, vec![Position::new(0.5, 0.5)]);
        assert_eq!(log.borrow().completions, 0);
        assert_eq!(scheduler.requests(), 0);
    }

    #[test]
    fn input_does_not_publish_until_a_frame_runs() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (sink, log) = recorder();
        let handle = start(FollowConfig::default(), sink, Rc::clone(&scheduler));

        assert!(handle.report_pointer(PointerSample::new(100.0, 60.0), Bounds::sized(400.0, 200.0), true));
        assert!(log.borrow().updates.is_empty());
        assert_eq!(handle.state().current, Position::CENTER);

        scheduler.advance(FRAME_MS);
        let first = log.borrow().updates[0];
        assert!((first.x() - 0.45).abs() < 1e-6);
        assert!((first.y() - 0.46).abs() < 1e-6);

        scheduler.advance_frames(100, FRAME_MS);
        let last = *log.borrow().updates.last().unwrap();
        assert!((last.x() - 0.25).abs() < 1e-3);
        assert!((last.y() - 0.30).abs() < 1e-3);
    }

    #[test]
    fn one_update_per_frame() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (sink, log) = recorder();
        let handle = start(FollowConfig::default(), sink, Rc::clone(&scheduler));
        for i in 0..5 {
            handle.report_input(Position::new(0.1 * i as f32, 0.2), true);
        }
        scheduler.advance_frames(7, FRAME_MS);
        assert_eq!(log.borrow().updates.len(), 7);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn stop_ends_updates_and_is_idempotent() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (sink, log) = recorder();
        let handle = start(FollowConfig::default(), sink, Rc::clone(&scheduler));
        scheduler.advance_frames(3, FRAME_MS);
        let before = log.borrow().updates.len();

        handle.stop();
        handle.stop();
        assert!(!handle.is_running());
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(handle.phase(), Phase::Idle);

        assert!(!handle.report_input(Position::new(0.1, 0.1), true));
        scheduler.advance_frames(10, FRAME_MS);
        assert_eq!(log.borrow().updates.len(), before);
    }

    #[test]
    fn queued_callback_after_stop_publishes_nothing() {
        let scheduler = Rc::new(LateCancel::default());
        let (sink, log) = recorder();
        let handle = start(FollowConfig::default(), sink, Rc::clone(&scheduler));
        scheduler.flush(16.0);
        assert_eq!(log.borrow().updates.len(), 1);

        handle.stop();
        scheduler.flush(32.0);
        assert_eq!(log.borrow().updates.len(), 1);
        assert!(scheduler.queue.borrow().is_empty());
    }

    #[test]
    fn dropping_the_handle_stops_the_loop() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (sink, log) = recorder();
        let handle = start(FollowConfig::default(), sink, Rc::clone(&scheduler));
        scheduler.advance(FRAME_MS);
        drop(handle);
        assert_eq!(scheduler.pending(), 0);
        scheduler.advance_frames(5, FRAME_MS);
        assert_eq!(log.borrow().updates.len(), 1);
    }

    #[test]
    fn sweep_completes_once_then_tracks() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (sink, log) = recorder();
        let handle = start(FollowConfig::hero_visor(800.0), sink, Rc::clone(&scheduler));
        assert_eq!(handle.phase(), Phase::ScriptedSweep);

        // Input during the sweep is dropped.
        assert!(!handle.report_input(Position::new(0.1, 0.1), true));

        // 1.12 s at 16 ms per frame plus the origin frame.
        scheduler.advance_frames(80, FRAME_MS);
        assert_eq!(log.borrow().completions, 1);
        assert_eq!(handle.phase(), Phase::Tracking);

        scheduler.advance_frames(20, FRAME_MS);
        assert_eq!(log.borrow().completions, 1);

        assert!(handle.report_input(Position::new(0.1, 0.1), true));
        scheduler.advance_frames(60, FRAME_MS);
        let last = *log.borrow().updates.last().unwrap();
        assert!(last.distance(Position::new(0.1, 0.1)) < 1e-3, "{:?}", last);
    }

    #[test]
    fn sweep_positions_depend_only_on_time() {
        let run = |noise: bool| {
            let scheduler = Rc::new(ManualScheduler::new());
            let (sink, log) = recorder();
            let handle = start(FollowConfig::hero_visor(1000.0), sink, Rc::clone(&scheduler));
            for i in 0..40 {
                if noise {
                    handle.report_input(Position::new((i % 7) as f32 / 7.0, 0.9), i % 2 == 0);
                    handle.handle_event(PointerEvent::Leave, Bounds::sized(10.0, 10.0));
                }
                scheduler.advance(FRAME_MS);
            }
            let updates = log.borrow().updates.clone();
            updates
        };
        assert_eq!(run(false), run(true));
    }

    #[test]
    fn stop_from_sweep_completion_prevents_further_updates() {
        struct StopOnComplete {
            handle: Rc<RefCell<Option<FollowHandle>>>,
            updates: Rc<Cell<usize>>,
        }

        impl PositionSink for StopOnComplete {
            fn on_update(&mut self, _position: Position) {
                self.updates.set(self.updates.get() + 1);
            }

            fn on_sweep_complete(&mut self) {
                if let Some(handle) = self.handle.borrow().as_ref() {
                    handle.stop();
                }
            }
        }

        let scheduler = Rc::new(ManualScheduler::new());
        let slot = Rc::new(RefCell::new(None));
        let updates = Rc::new(Cell::new(0));
        let sink = StopOnComplete {
            handle: Rc::clone(&slot),
            updates: Rc::clone(&updates),
        };
        let config = FollowConfig::default()
            .with_sweep(Some(SweepConfig::custom(0.05, |p| Position::new(p, 0.5))));
        let handle = start(config, sink, Rc::clone(&scheduler));
        *slot.borrow_mut() = Some(handle);

        scheduler.advance_frames(10, FRAME_MS);
        let published = updates.get();
        assert!(published > 0);
        assert_eq!(scheduler.pending(), 0);

        scheduler.advance_frames(10, FRAME_MS);
        assert_eq!(updates.get(), published);
        let held = slot.borrow();
        let handle = held.as_ref().expect("handle stored in slot");
        assert!(!handle.is_running());
    }

    #[test]
    fn sweep_path_returning_nan_never_reaches_sink() {
        use crate::extensions::easing::Easing;
        use crate::extensions::sweep::SweepPath;

        let scheduler = Rc::new(ManualScheduler::new());
        let (sink, log) = recorder();
        let sweep = SweepConfig::new(
            0.1,
            SweepPath::Horizontal { from_x: f32::NAN, to_x: 1.0, y: 0.5, easing: Easing::Linear },
        );
        let _handle = start(FollowConfig::default().with_sweep(Some(sweep)), sink, Rc::clone(&scheduler));
        scheduler.advance_frames(20, FRAME_MS);

        let log = log.borrow();
        assert!(!log.updates.is_empty());
        for p in &log.updates {
            assert!(p.x().is_finite() && p.y().is_finite(), "{:?}", p);
        }
        assert_eq!(log.completions, 1);
    }

    #[test]
    fn record_tracks_state() {
        let scheduler = Rc::new(ManualScheduler::new());
        let handle = start(FollowConfig::default(), |_p: Position| {}, Rc::clone(&scheduler));
        handle.report_input(Position::new(0.0, 0.0), true);
        scheduler.advance(FRAME_MS);
        let record = handle.record();
        assert_eq!(record.phase, 2.0);
        assert_eq!(record.active, 1.0);
        assert!((record.x - 0.4).abs() < 1e-6);
    }

    #[test]
    fn refused_frame_request_leaves_engine_inert() {
        let (sink, log) = recorder();
        let handle = start(FollowConfig::default(), sink, Rc::new(Refusing));

        assert!(!handle.is_running());
        assert_eq!(handle.phase(), Phase::Idle);
        assert!(!handle.report_input(Position::new(0.9, 0.9), true));
        assert!(log.borrow().updates.is_empty());
        handle.stop();
    }

    #[test]
    fn zero_width_hero_holds_center_through_intro() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (sink, log) = recorder();
        let handle = start(FollowConfig::hero_visor(0.0), sink, Rc::clone(&scheduler));

        scheduler.advance_frames(80, FRAME_MS);
        assert_eq!(handle.phase(), Phase::Tracking);
        let log = log.borrow();
        assert_eq!(log.completions, 1);
        assert_eq!(log.updates.len(), 80);
        for position in &log.updates {
            assert_eq!(position.x(), 0.5, "lens left center: {:?}", position);
        }
    }
}
