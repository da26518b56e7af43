use crate::api::config::FollowConfig;
use crate::api::types::{EngineState, Phase, Position};
use crate::core::time::FrameClock;
use crate::input::pointer::{Bounds, PointerEvent, PointerSample};

/// How the engine leaves `Idle` when started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Launch {
    /// Static mode: publish this position once, never schedule a frame.
    Static(Position),
    /// Animated mode: frames run in this phase first.
    Animated(Phase),
}

/// Result of one frame step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FrameOutcome {
    /// Publish the smoothed position.
    Updated(Position),
    /// Publish the final sweep position, then signal sweep completion.
    SweepFinished(Position),
    /// Nothing to publish.
    Skipped,
}

/// The pointer-follow state machine.
///
/// `Idle → ScriptedSweep → Tracking`, or `Idle → Tracking` without a sweep.
/// Input only writes `target`/`active`; `current` moves only in [`FollowEngine::frame`].
#[derive(Debug)]
pub(crate) struct FollowEngine {
    config: FollowConfig,
    state: EngineState,
    clock: FrameClock,
}

impl FollowEngine {
    /// Create an idle engine resting at the configured rest position.
    pub fn new(config: FollowConfig) -> Self {
        let config = config.sanitized();
        let state = EngineState::at_rest(config.rest_position);
        Self {
            config,
            state,
            clock: FrameClock::new(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Leave `Idle`. Decides between static and animated mode.
    pub fn launch(&mut self) -> Launch {
        self.clock.reset();
        if self.config.is_static() {
            let fixed = self.config.static_target();
            self.state = EngineState {
                current: fixed,
                target: fixed,
                active: false,
                phase: Phase::Idle,
            };
            log::debug!("follow engine static at ({:.3}, {:.3})", fixed.x(), fixed.y());
            return Launch::Static(fixed);
        }

        let phase = if self.config.sweep.is_some() {
            Phase::ScriptedSweep
        } else {
            Phase::Tracking
        };
        self.state.phase = phase;
        log::debug!("follow engine launched in {:?}", phase);
        Launch::Animated(phase)
    }

    /// Back to `Idle`; later frames and input are no-ops.
    pub fn halt(&mut self) {
        self.state.phase = Phase::Idle;
        self.state.active = false;
    }

    /// Record a normalized input sample. Returns whether it was accepted;
    /// samples are ignored outside `Tracking`.
    pub fn report_input(&mut self, position: Position, active: bool) -> bool {
        if self.state.phase != Phase::Tracking {
            return false;
        }
        self.state.target = position;
        self.state.active = active;
        true
    }

    /// Record a pixel-space sample against `bounds`.
    /// Degenerate bounds drop the sample and keep the previous target.
    pub fn report_pointer(&mut self, sample: PointerSample, bounds: Bounds, active: bool) -> bool {
        match bounds.normalize(sample) {
            Some(position) => self.report_input(position, active),
            None => false,
        }
    }

    /// Apply a pointer event. Enter activates, leave deactivates,
    /// move and down update the target only.
    pub fn apply_event(&mut self, event: PointerEvent, bounds: Bounds) -> bool {
        if self.state.phase != Phase::Tracking {
            return false;
        }
        match event {
            PointerEvent::Enter(sample) => {
                self.state.active = true;
                self.report_pointer(sample, bounds, true);
                true
            }
            PointerEvent::Move(sample) | PointerEvent::Down(sample) => {
                let active = self.state.active;
                self.report_pointer(sample, bounds, active)
            }
            PointerEvent::Leave => {
                self.state.active = false;
                true
            }
        }
    }

    /// Advance one display frame at `timestamp_ms`.
    pub fn frame(&mut self, timestamp_ms: f64) -> FrameOutcome {
        match self.state.phase {
            Phase::Idle => FrameOutcome::Skipped,
            Phase::ScriptedSweep => {
                self.clock.tick(timestamp_ms);
                self.sweep_step()
            }
            Phase::Tracking => {
                self.clock.tick(timestamp_ms);
                let goal = if self.state.active {
                    self.state.target
                } else {
                    self.config.rest_position
                };
                let alpha = self.config.smoothing_factor;
                self.state.current = self.state.current.lerp_toward(goal, alpha);
                FrameOutcome::Updated(self.state.current)
            }
        }
    }

    fn sweep_step(&mut self) -> FrameOutcome {
        let Some(sweep) = self.config.sweep.as_ref() else {
            self.state.phase = Phase::Tracking;
            return FrameOutcome::Updated(self.state.current);
        };

        let elapsed = self.clock.elapsed();
        // A non-finite path point leaves the last valid position in place.
        if let Some(position) = sweep.target_at(elapsed) {
            self.state.target = position;
            self.state.current = position;
        }

        if sweep.is_finished(elapsed) {
            self.state.phase = Phase::Tracking;
            self.state.active = false;
            log::debug!("sweep finished after {:.3}s, tracking pointer", elapsed);
            FrameOutcome::SweepFinished(self.state.current)
        } else {
            FrameOutcome::Updated(self.state.current)
        }
    }
}
