//! Render-loop driver as an explicit state machine.
//!
//! The scheduler does not own the animation-frame callback. The host asks it
//! whether to request one (`start` / `reschedule`), feeds each callback's
//! timestamp to `tick`, and cancels the pending callback when `stop` reports a
//! transition. A callback that arrives while the scheduler is not `Scheduled`
//! is answered with [`Tick::Halted`] and must not draw.

use crate::constants::{FRAME_INTERVAL_SLACK_SEC, MAX_FRAME_DT_SEC};
use crate::kind::ClockPolicy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Scheduled,
    Stopped,
}

/// What the host should do with one animation-frame callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
    /// Reschedule without syncing or drawing.
    Skip,
    /// Sync uniforms, draw, then reschedule. `dt` is the speed-scaled delta in seconds.
    Render { dt: f64 },
    /// The loop is over; do nothing.
    Halted,
}

/// Speed-scaled elapsed-time accumulator.
#[derive(Clone, Debug)]
pub struct FrameClock {
    elapsed: f64,
    last_ts_ms: Option<f64>,
    policy: ClockPolicy,
}

impl FrameClock {
    pub fn new(policy: ClockPolicy) -> Self {
        Self {
            elapsed: 0.0,
            last_ts_ms: None,
            policy,
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn policy(&self) -> ClockPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ClockPolicy) {
        self.policy = policy;
    }

    /// Consume one callback timestamp and return the delta added to `elapsed`.
    ///
    /// The first timestamp after construction or [`resync`](Self::resync) is a
    /// baseline and contributes nothing. Real deltas are clamped to
    /// `MAX_FRAME_DT_SEC` so a throttled background tab does not jump.
    pub fn advance(&mut self, ts_ms: f64, visible: bool, speed: f32) -> f64 {
        let raw = match self.last_ts_ms {
            Some(prev) => ((ts_ms - prev) / 1000.0).clamp(0.0, MAX_FRAME_DT_SEC),
            None => 0.0,
        };
        self.last_ts_ms = Some(ts_ms);
        if !visible && self.policy == ClockPolicy::FreezeWhileHidden {
            return 0.0;
        }
        let dt = raw * speed as f64;
        self.elapsed += dt;
        dt
    }

    /// Forget the last timestamp; the next callback becomes a new baseline.
    pub fn resync(&mut self) {
        self.last_ts_ms = None;
    }
}

#[derive(Debug)]
pub struct FrameScheduler {
    state: SchedulerState,
    clock: FrameClock,
    min_interval_sec: Option<f64>,
    last_render_ms: Option<f64>,
    ticks: u64,
    rendered: u64,
}

impl FrameScheduler {
    pub fn new(clock: FrameClock) -> Self {
        Self {
            state: SchedulerState::Idle,
            clock,
            min_interval_sec: None,
            last_render_ms: None,
            ticks: 0,
            rendered: 0,
        }
    }

    /// Cap rendering to `fps` frames per second; `None` or a non-positive value removes the cap.
    pub fn with_target_fps(mut self, fps: Option<f32>) -> Self {
        self.set_target_fps(fps);
        self
    }

    pub fn set_target_fps(&mut self, fps: Option<f32>) {
        self.min_interval_sec = fps.filter(|f| *f > 0.0).map(|f| 1.0 / f as f64);
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    pub fn into_clock(self) -> FrameClock {
        self.clock
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn rendered(&self) -> u64 {
        self.rendered
    }

    /// Idle → Scheduled. Returns true when the caller must request a callback.
    pub fn start(&mut self) -> bool {
        self.reschedule()
    }

    /// Idle → Scheduled after a handled tick.
    pub fn reschedule(&mut self) -> bool {
        if self.state == SchedulerState::Idle {
            self.state = SchedulerState::Scheduled;
            true
        } else {
            false
        }
    }

    pub fn tick(&mut self, ts_ms: f64, visible: bool, speed: f32) -> Tick {
        if self.state != SchedulerState::Scheduled {
            return Tick::Halted;
        }
        self.state = SchedulerState::Idle;
        self.ticks += 1;
        let dt = self.clock.advance(ts_ms, visible, speed);
        if !visible {
            return Tick::Skip;
        }
        if let (Some(min), Some(last)) = (self.min_interval_sec, self.last_render_ms) {
            if (ts_ms - last) / 1000.0 + FRAME_INTERVAL_SLACK_SEC < min {
                return Tick::Skip;
            }
        }
        self.last_render_ms = Some(ts_ms);
        self.rendered += 1;
        Tick::Render { dt }
    }

    /// Enter the terminal state. Returns true on the transition (the caller
    /// cancels its pending callback then); later calls are no-ops.
    pub fn stop(&mut self) -> bool {
        if self.state == SchedulerState::Stopped {
            return false;
        }
        self.state = SchedulerState::Stopped;
        true
    }

    /// A draw failed; halt without retrying.
    pub fn fail(&mut self) -> bool {
        self.stop()
    }
}
