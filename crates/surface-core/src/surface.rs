//! The generic surface lifecycle.
//!
//! [`AnimatedSurface`] is sans-IO: every input (attach, visibility report,
//! context completion, animation-frame callback, config, pointer, resize,
//! teardown) is a method call, and every side effect the host must perform
//! comes back as [`Directives`]. The browser host in the web crate is a thin
//! shell around it; tests drive it with a fake [`RenderContext`].

use crate::bridge::ParameterBridge;
use crate::config::{ConfigPatch, SurfaceConfig};
use crate::context::{ContextSlot, RenderContext, Ticket};
use crate::effects::{EffectPolicy, ProgramSpec};
use crate::error::{ConfigError, SurfaceError};
use crate::geometry::Geometry;
use crate::kind::{EffectKind, HiddenPolicy};
use crate::scheduler::{FrameClock, FrameScheduler, SchedulerState, Tick};
use crate::sizing::SurfaceSize;
use crate::visibility::VisibilityGate;
use glam::Vec2;
use log::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostPhase {
    Detached,
    Mounted,
    /// Acquisition failed or the context was lost; nothing more will render.
    Disabled,
    TornDown,
}

impl HostPhase {
    /// Whether a surface in this phase still owns its container. A disabled
    /// surface keeps it, so the element is never mounted a second time.
    pub fn occupies_container(self) -> bool {
        matches!(self, HostPhase::Mounted | HostPhase::Disabled)
    }
}

/// Everything the host needs to build a context for one acquisition.
#[derive(Debug)]
pub struct AcquireRequest {
    pub ticket: Ticket,
    pub program: ProgramSpec,
    pub geometry: Geometry,
    pub size: Option<SurfaceSize>,
    pub policy: EffectPolicy,
}

/// Side effects requested by one call into the surface.
#[derive(Debug, Default)]
pub struct Directives {
    /// Start building a render context and report back via `on_context_ready`.
    pub acquire: Option<AcquireRequest>,
    /// Request one animation-frame callback.
    pub request_frame: bool,
    /// Cancel the pending animation-frame callback, if any.
    pub cancel_frame: bool,
    /// Drop the observer and event listeners; the surface is finished.
    pub shutdown: bool,
}

impl Directives {
    fn frame(request: bool) -> Self {
        Self {
            request_frame: request,
            ..Self::default()
        }
    }

    fn cancel(cancel: bool) -> Self {
        Self {
            cancel_frame: cancel,
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Drew,
    Skipped,
    Halted,
    Lost,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    pub draw_calls: u64,
    pub skipped_frames: u64,
    pub acquisitions: u32,
    pub contexts_created: u32,
    pub contexts_released: u32,
    pub geometry_rebuilds: u32,
}

impl SurfaceStats {
    pub fn live_contexts(&self) -> u32 {
        self.contexts_created - self.contexts_released
    }
}

pub struct AnimatedSurface<C: RenderContext> {
    bridge: ParameterBridge,
    gate: VisibilityGate,
    slot: ContextSlot<C>,
    scheduler: Option<FrameScheduler>,
    parked_clock: Option<FrameClock>,
    size: Option<SurfaceSize>,
    phase: HostPhase,
    stats: SurfaceStats,
}

impl<C: RenderContext> AnimatedSurface<C> {
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            bridge: ParameterBridge::new(config),
            gate: VisibilityGate::new(),
            slot: ContextSlot::new(),
            scheduler: None,
            parked_clock: None,
            size: None,
            phase: HostPhase::Detached,
            stats: SurfaceStats::default(),
        }
    }

    /// Defaults for `kind` overlaid with `patch`; bad values are logged and ignored.
    pub fn from_patch(kind: EffectKind, patch: &ConfigPatch) -> Self {
        let (config, issues) = SurfaceConfig::resolve(kind, patch, None);
        log_config_issues(kind, &issues);
        Self::new(config)
    }

    pub fn kind(&self) -> EffectKind {
        self.bridge.config().kind
    }

    pub fn config(&self) -> &SurfaceConfig {
        self.bridge.config()
    }

    pub fn policy(&self) -> EffectPolicy {
        self.bridge.policy()
    }

    pub fn phase(&self) -> HostPhase {
        self.phase
    }

    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    pub fn is_visible(&self) -> bool {
        self.gate.is_visible()
    }

    pub fn has_context(&self) -> bool {
        self.slot.is_active()
    }

    pub fn is_acquiring(&self) -> bool {
        self.slot.is_acquiring()
    }

    pub fn scheduler_state(&self) -> Option<SchedulerState> {
        self.scheduler.as_ref().map(FrameScheduler::state)
    }

    /// Speed-scaled seconds accumulated so far.
    pub fn elapsed(&self) -> f64 {
        self.scheduler
            .as_ref()
            .map(|s| s.clock().elapsed())
            .or_else(|| self.parked_clock.as_ref().map(FrameClock::elapsed))
            .unwrap_or(0.0)
    }

    pub fn size(&self) -> Option<SurfaceSize> {
        self.size
    }

    pub fn tracks_pointer(&self) -> bool {
        self.bridge.tracks_pointer()
    }

    pub fn pointer(&self) -> Vec2 {
        self.bridge.pointer()
    }

    /// Detached → Mounted and start observing. False if already attached or finished.
    pub fn attach(&mut self) -> bool {
        if self.phase != HostPhase::Detached {
            return false;
        }
        self.phase = HostPhase::Mounted;
        self.gate.observe()
    }

    /// One observer report. Only real transitions have effects.
    pub fn set_visibility(&mut self, visible: bool) -> Directives {
        if self.phase != HostPhase::Mounted {
            return Directives::default();
        }
        match self.gate.update(visible) {
            Some(true) => self.on_shown(),
            Some(false) => self.on_hidden(),
            None => Directives::default(),
        }
    }

    fn on_shown(&mut self) -> Directives {
        let Some(ticket) = self.slot.begin() else {
            return Directives::default();
        };
        self.stats.acquisitions += 1;
        Directives {
            acquire: Some(AcquireRequest {
                ticket,
                program: self.bridge.effect().program(),
                geometry: self.bridge.fresh_geometry(),
                size: self.size,
                policy: self.bridge.policy(),
            }),
            ..Directives::default()
        }
    }

    fn on_hidden(&mut self) -> Directives {
        if self.bridge.policy().hidden == HiddenPolicy::Pause {
            return Directives::default();
        }
        let mut cancel = false;
        if let Some(mut scheduler) = self.scheduler.take() {
            cancel = scheduler.stop();
            let mut clock = scheduler.into_clock();
            clock.resync();
            self.parked_clock = Some(clock);
        }
        // An acquisition in flight is settled in `on_context_ready`.
        if self.slot.is_active() {
            if let Some(ctx) = self.slot.take() {
                self.release(ctx);
                info!("[surface] {} hidden; context released", self.kind());
            }
        }
        Directives::cancel(cancel)
    }

    /// Completion of the acquisition identified by `ticket`.
    pub fn on_context_ready(&mut self, ticket: Ticket, result: Result<C, SurfaceError>) -> Directives {
        let ctx = match result {
            Ok(ctx) => ctx,
            Err(err) => return self.on_acquire_failed(ticket, err),
        };
        self.stats.contexts_created += 1;
        if self.phase != HostPhase::Mounted {
            self.release(ctx);
            return Directives::default();
        }
        if let Err(stale) = self.slot.complete(ticket, ctx) {
            self.release(stale);
            return Directives::default();
        }
        if self.bridge.policy().hidden == HiddenPolicy::Release && !self.gate.is_visible() {
            if let Some(ctx) = self.slot.take() {
                self.release(ctx);
            }
            return Directives::default();
        }
        if let (Some(size), Some(ctx)) = (self.size, self.slot.get_mut()) {
            ctx.set_size(size);
        }
        let clock = self
            .parked_clock
            .take()
            .unwrap_or_else(|| FrameClock::new(self.bridge.config().clock));
        let mut scheduler = FrameScheduler::new(clock).with_target_fps(self.bridge.policy().target_fps);
        let request = scheduler.start();
        self.scheduler = Some(scheduler);
        info!("[surface] {} context ready", self.kind());
        Directives::frame(request)
    }

    fn on_acquire_failed(&mut self, ticket: Ticket, err: SurfaceError) -> Directives {
        if !self.slot.abandon(ticket) {
            return Directives::default();
        }
        warn!("[surface] {} disabled: {}", self.kind(), err);
        self.slot.close();
        self.gate.disconnect();
        self.phase = HostPhase::Disabled;
        Directives {
            shutdown: true,
            ..Directives::default()
        }
    }

    /// One animation-frame callback at `ts_ms`.
    pub fn tick(&mut self, ts_ms: f64) -> (FrameOutcome, Directives) {
        let visible = self.gate.is_visible();
        let speed = self.bridge.config().speed;
        let Some(scheduler) = self.scheduler.as_mut() else {
            return (FrameOutcome::Halted, Directives::default());
        };
        let tick = scheduler.tick(ts_ms, visible, speed);
        let elapsed = scheduler.clock().elapsed();
        match tick {
            Tick::Halted => (FrameOutcome::Halted, Directives::default()),
            Tick::Skip => {
                self.stats.skipped_frames += 1;
                (FrameOutcome::Skipped, Directives::frame(scheduler.reschedule()))
            }
            Tick::Render { .. } => self.render(elapsed),
        }
    }

    fn render(&mut self, elapsed: f64) -> (FrameOutcome, Directives) {
        let (Some(ctx), Some(size)) = (self.slot.get_mut(), self.size) else {
            self.stats.skipped_frames += 1;
            let request = self.scheduler.as_mut().is_some_and(FrameScheduler::reschedule);
            return (FrameOutcome::Skipped, Directives::frame(request));
        };
        if let Some(geometry) = self.bridge.take_geometry_rebuild() {
            if let Err(err) = ctx.rebuild_geometry(&geometry) {
                return (FrameOutcome::Lost, self.lose_context(err));
            }
            self.stats.geometry_rebuilds += 1;
        }
        let uniforms = self.bridge.sync_to_program(elapsed, size);
        if let Err(err) = ctx.draw(uniforms) {
            return (FrameOutcome::Lost, self.lose_context(err));
        }
        self.stats.draw_calls += 1;
        let request = self.scheduler.as_mut().is_some_and(FrameScheduler::reschedule);
        (FrameOutcome::Drew, Directives::frame(request))
    }

    /// The driver dropped the context; halt for good without retrying.
    pub fn lose_context(&mut self, err: SurfaceError) -> Directives {
        if matches!(self.phase, HostPhase::TornDown | HostPhase::Disabled) {
            return Directives::default();
        }
        warn!("[surface] {} stopped: {}", self.kind(), err);
        let cancel = self.scheduler.as_mut().is_some_and(FrameScheduler::fail);
        if let Some(ctx) = self.slot.close() {
            self.release(ctx);
        }
        self.gate.disconnect();
        self.phase = HostPhase::Disabled;
        Directives {
            cancel_frame: cancel,
            shutdown: true,
            ..Directives::default()
        }
    }

    pub fn resize(&mut self, size: SurfaceSize) {
        self.size = Some(size);
        if let Some(ctx) = self.slot.get_mut() {
            ctx.set_size(size);
        }
    }

    /// Replace the configuration; omitted keys take defaults, bad values keep the current ones.
    pub fn set_config(&mut self, patch: &ConfigPatch) -> Vec<ConfigError> {
        let (config, issues) = self.bridge.config().apply(patch);
        log_config_issues(self.kind(), &issues);
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.clock_mut().set_policy(config.clock);
        }
        if let Some(clock) = self.parked_clock.as_mut() {
            clock.set_policy(config.clock);
        }
        self.bridge.replace(config);
        let fps = self.bridge.policy().target_fps;
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.set_target_fps(fps);
        }
        issues
    }

    /// JSON flavour of [`set_config`](Self::set_config); a malformed document changes nothing.
    pub fn set_config_json(&mut self, json: &str) -> Vec<ConfigError> {
        match ConfigPatch::from_json(json) {
            Ok(patch) => self.set_config(&patch),
            Err(err) => {
                warn!("[config] {} ignored: {}", self.kind(), err);
                vec![err]
            }
        }
    }

    pub fn set_pointer(&mut self, uv: Vec2) {
        self.bridge.set_pointer_raw(uv);
    }

    /// Stop the loop, release the context and stop observing. Idempotent;
    /// only the first call reports `shutdown`.
    pub fn teardown(&mut self) -> Directives {
        if self.phase == HostPhase::TornDown {
            return Directives::default();
        }
        let cancel = self.scheduler.as_mut().is_some_and(FrameScheduler::stop);
        if let Some(ctx) = self.slot.close() {
            self.release(ctx);
        }
        self.gate.disconnect();
        self.phase = HostPhase::TornDown;
        info!("[surface] {} torn down", self.kind());
        Directives {
            cancel_frame: cancel,
            shutdown: true,
            ..Directives::default()
        }
    }

    fn release(&mut self, ctx: C) {
        ctx.release();
        self.stats.contexts_released += 1;
    }
}

fn log_config_issues(kind: EffectKind, issues: &[ConfigError]) {
    for issue in issues {
        warn!("[config] {}: {}", kind, issue);
    }
}
