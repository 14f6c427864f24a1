// Host-side tests for the surface lifecycle.
// A recording fake stands in for the GPU context so every transition can be
// driven deterministically without a browser.

use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use surface_core::{
    AnimatedSurface, ConfigPatch, Directives, EffectKind, FrameOutcome, Geometry, HostPhase,
    RenderContext, SchedulerState, SurfaceError, SurfaceSize, Ticket,
};

#[derive(Default)]
struct Probe {
    created: u32,
    released: u32,
    draws: u32,
    rebuilds: Vec<u32>,
    sizes: Vec<SurfaceSize>,
    last_uniform_len: usize,
    fail_draw: bool,
}

type Shared = Rc<RefCell<Probe>>;

struct FakeContext {
    probe: Shared,
}

impl FakeContext {
    fn new(probe: &Shared) -> Self {
        probe.borrow_mut().created += 1;
        Self {
            probe: probe.clone(),
        }
    }
}

impl RenderContext for FakeContext {
    fn set_size(&mut self, size: SurfaceSize) {
        self.probe.borrow_mut().sizes.push(size);
    }

    fn rebuild_geometry(&mut self, geometry: &Geometry) -> Result<(), SurfaceError> {
        self.probe.borrow_mut().rebuilds.push(geometry.instance_count);
        Ok(())
    }

    fn draw(&mut self, uniforms: &[u8]) -> Result<(), SurfaceError> {
        let mut p = self.probe.borrow_mut();
        if p.fail_draw {
            return Err(SurfaceError::ContextLost("device lost".into()));
        }
        p.draws += 1;
        p.last_uniform_len = uniforms.len();
        Ok(())
    }

    fn release(self) {
        self.probe.borrow_mut().released += 1;
    }
}

const FRAME_MS: f64 = 1000.0 / 60.0;

fn size() -> SurfaceSize {
    SurfaceSize {
        width: 800,
        height: 600,
        css_width: 800.0,
        css_height: 600.0,
    }
}

fn mounted(kind: EffectKind, json: &str) -> AnimatedSurface<FakeContext> {
    let patch = ConfigPatch::from_json(json).expect("valid test config");
    let mut s = AnimatedSurface::from_patch(kind, &patch);
    s.resize(size());
    assert!(s.attach());
    s
}

/// Show the surface and complete the acquisition it requests.
fn show_and_acquire(s: &mut AnimatedSurface<FakeContext>, probe: &Shared) -> Directives {
    let d = s.set_visibility(true);
    let req = d.acquire.expect("acquire on first visibility");
    s.on_context_ready(req.ticket, Ok(FakeContext::new(probe)))
}

fn run_frames(s: &mut AnimatedSurface<FakeContext>, from: usize, n: usize) -> Vec<FrameOutcome> {
    (from..from + n)
        .map(|i| s.tick(i as f64 * FRAME_MS).0)
        .collect()
}

#[test]
fn particle_field_draws_only_after_entering_view() {
    let probe = Shared::default();
    let mut s = mounted(EffectKind::ParticleField, r#"{"count": 400}"#);

    // Mounted off-screen: no context, no loop, no draws.
    assert_eq!(s.tick(0.0).0, FrameOutcome::Halted);
    assert!(s.set_visibility(false).acquire.is_none());
    assert_eq!(probe.borrow().draws, 0);

    let d = s.set_visibility(true);
    let req = d.acquire.expect("acquire request");
    assert_eq!(req.geometry.instance_count, 400);
    let d = s.on_context_ready(req.ticket, Ok(FakeContext::new(&probe)));
    assert!(d.request_frame);

    // The very next callback draws.
    let (outcome, d) = s.tick(0.0);
    assert_eq!(outcome, FrameOutcome::Drew);
    assert!(d.request_frame);
    assert_eq!(probe.borrow().draws, 1);
    let expected = surface_core::effect_for(EffectKind::ParticleField)
        .program()
        .uniform_size;
    assert_eq!(probe.borrow().last_uniform_len, expected);
}

#[test]
fn teardown_twice_is_harmless() {
    let probe = Shared::default();
    let mut s = mounted(EffectKind::FogField, "");
    show_and_acquire(&mut s, &probe);
    run_frames(&mut s, 0, 3);

    let first = s.teardown();
    assert!(first.shutdown);
    assert!(first.cancel_frame);
    let second = s.teardown();
    assert!(!second.shutdown);
    assert!(!second.cancel_frame);

    assert_eq!(s.phase(), HostPhase::TornDown);
    assert!(!s.has_context());
    assert_eq!(s.stats().live_contexts(), 0);
    assert_eq!(probe.borrow().released, 1);
}

#[test]
fn teardown_without_acquire_is_harmless() {
    let mut s: AnimatedSurface<FakeContext> =
        AnimatedSurface::from_patch(EffectKind::LightRays, &ConfigPatch::default());
    let d = s.teardown();
    assert!(d.shutdown);
    assert!(!d.cancel_frame);
    assert_eq!(s.stats().contexts_created, 0);
    assert_eq!(s.stats().contexts_released, 0);
    assert!(!s.teardown().shutdown);
}

#[test]
fn rapid_toggles_request_a_single_context() {
    for kind in [EffectKind::ParticleField, EffectKind::LightRays] {
        let probe = Shared::default();
        let mut s = mounted(kind, "");
        let mut tickets: Vec<Ticket> = Vec::new();
        for _ in 0..10 {
            if let Some(req) = s.set_visibility(true).acquire {
                tickets.push(req.ticket);
            }
            assert!(s.set_visibility(false).acquire.is_none());
        }
        assert_eq!(tickets.len(), 1, "{kind}");
        if let Some(req) = s.set_visibility(true).acquire {
            tickets.push(req.ticket);
        }
        assert_eq!(tickets.len(), 1, "{kind}");

        s.on_context_ready(tickets[0], Ok(FakeContext::new(&probe)));
        assert!(s.stats().live_contexts() <= 1);
        assert_eq!(probe.borrow().created, 1);
    }
}

#[test]
fn release_policy_drops_context_completed_while_hidden() {
    let probe = Shared::default();
    let mut s = mounted(EffectKind::LightRays, "");
    let req = s.set_visibility(true).acquire.expect("acquire");
    s.set_visibility(false);

    s.on_context_ready(req.ticket, Ok(FakeContext::new(&probe)));
    assert!(!s.has_context());
    assert_eq!(probe.borrow().released, 1);

    // Coming back into view starts a fresh acquisition.
    assert!(s.set_visibility(true).acquire.is_some());
}

#[test]
fn late_completion_after_teardown_is_released() {
    let probe = Shared::default();
    let mut s = mounted(EffectKind::BeamField, "");
    let req = s.set_visibility(true).acquire.expect("acquire");
    s.teardown();

    let d = s.on_context_ready(req.ticket, Ok(FakeContext::new(&probe)));
    assert!(!d.request_frame);
    assert!(!s.has_context());
    assert_eq!(probe.borrow().created, 1);
    assert_eq!(probe.borrow().released, 1);
    assert_eq!(s.tick(0.0).0, FrameOutcome::Halted);
}

#[test]
fn failed_acquisition_disables_the_surface() {
    let mut s = mounted(EffectKind::GradientAurora, "");
    let req = s.set_visibility(true).acquire.expect("acquire");
    let d = s.on_context_ready(
        req.ticket,
        Err(SurfaceError::ContextAcquisition("no adapter".into())),
    );
    assert!(d.shutdown);
    assert_eq!(s.phase(), HostPhase::Disabled);
    assert!(!s.has_context());
    assert_eq!(s.tick(0.0).0, FrameOutcome::Halted);

    // Later visibility reports do nothing; teardown is still safe.
    assert!(s.set_visibility(false).acquire.is_none());
    assert!(s.set_visibility(true).acquire.is_none());
    // Still owns its container so the page never mounts a replacement.
    assert!(s.phase().occupies_container());
    assert!(s.teardown().shutdown);
    assert!(!s.phase().occupies_container());
    assert_eq!(s.stats().live_contexts(), 0);
}

#[test]
fn lost_context_halts_without_retry() {
    let probe = Shared::default();
    let mut s = mounted(EffectKind::FogField, r#"{"targetFps": 0}"#);
    show_and_acquire(&mut s, &probe);
    assert_eq!(s.tick(0.0).0, FrameOutcome::Drew);

    probe.borrow_mut().fail_draw = true;
    let (outcome, d) = s.tick(FRAME_MS);
    assert_eq!(outcome, FrameOutcome::Lost);
    assert!(!d.request_frame);
    assert!(d.shutdown);
    assert_eq!(s.phase(), HostPhase::Disabled);
    assert_eq!(s.scheduler_state(), Some(SchedulerState::Stopped));
    assert_eq!(probe.borrow().released, 1);

    probe.borrow_mut().fail_draw = false;
    assert_eq!(s.tick(2.0 * FRAME_MS).0, FrameOutcome::Halted);
    assert_eq!(probe.borrow().draws, 1);
    assert!(s.phase().occupies_container());
    assert!(s.set_visibility(false).acquire.is_none());
    assert!(s.set_visibility(true).acquire.is_none());
    assert_eq!(s.stats().contexts_created, 1);
}

#[test]
fn pause_policy_keeps_context_and_freezes_clock() {
    let probe = Shared::default();
    let mut s = mounted(EffectKind::ParticleField, "");
    show_and_acquire(&mut s, &probe);
    run_frames(&mut s, 0, 10);
    let draws = probe.borrow().draws;
    let elapsed = s.elapsed();
    assert!(elapsed > 0.0);

    s.set_visibility(false);
    let hidden = run_frames(&mut s, 10, 20);
    assert!(hidden.iter().all(|o| *o == FrameOutcome::Skipped));
    assert_eq!(probe.borrow().draws, draws);
    assert_eq!(s.elapsed(), elapsed);
    assert!(s.has_context());

    assert!(s.set_visibility(true).acquire.is_none());
    assert_eq!(run_frames(&mut s, 30, 1), vec![FrameOutcome::Drew]);
    assert_eq!(s.stats().acquisitions, 1);
}

#[test]
fn clock_can_advance_while_hidden() {
    let probe = Shared::default();
    let mut s = mounted(EffectKind::GradientAurora, r#"{"clockWhileHidden": "advance"}"#);
    show_and_acquire(&mut s, &probe);
    run_frames(&mut s, 0, 2);
    let before = s.elapsed();
    s.set_visibility(false);
    run_frames(&mut s, 2, 10);
    assert!(s.elapsed() > before);
    assert_eq!(probe.borrow().draws, 2);
}

#[test]
fn release_policy_reacquires_and_keeps_time() {
    let probe = Shared::default();
    let mut s = mounted(EffectKind::LightRays, "");
    show_and_acquire(&mut s, &probe);
    run_frames(&mut s, 0, 30);
    let elapsed = s.elapsed();

    let d = s.set_visibility(false);
    assert!(d.cancel_frame);
    assert!(!s.has_context());
    assert_eq!(probe.borrow().released, 1);
    assert_eq!(s.tick(30.0 * FRAME_MS).0, FrameOutcome::Halted);

    let d = show_and_acquire(&mut s, &probe);
    assert!(d.request_frame);
    assert_eq!(s.stats().acquisitions, 2);
    assert_eq!(s.stats().live_contexts(), 1);

    // A long gap while released does not jump the clock.
    s.tick(10_000.0);
    assert_eq!(s.elapsed(), elapsed);
    s.tick(10_000.0 + FRAME_MS);
    assert!(s.elapsed() > elapsed);
}

#[test]
fn count_change_rebuilds_geometry_on_next_frame() {
    let probe = Shared::default();
    let mut s = mounted(EffectKind::ParticleField, r#"{"count": 200}"#);
    show_and_acquire(&mut s, &probe);
    run_frames(&mut s, 0, 2);
    assert!(probe.borrow().rebuilds.is_empty());

    s.set_config_json(r#"{"count": 200, "speed": 0.4}"#);
    run_frames(&mut s, 2, 1);
    assert!(probe.borrow().rebuilds.is_empty());

    s.set_config_json(r#"{"count": 50}"#);
    run_frames(&mut s, 3, 3);
    assert_eq!(probe.borrow().rebuilds, vec![50]);
    assert_eq!(s.stats().geometry_rebuilds, 1);
    assert_eq!(s.stats().acquisitions, 1);
}

#[test]
fn malformed_config_changes_nothing() {
    let mut s = mounted(EffectKind::BeamField, r#"{"speed": 3.0}"#);
    let before = s.config().clone();
    let issues = s.set_config_json("{ speed: ");
    assert_eq!(issues.len(), 1);
    assert_eq!(s.config(), &before);
}

#[test]
fn wrong_typed_key_does_not_discard_the_rest() {
    let mut s = mounted(EffectKind::LightRays, "");
    let issues =
        s.set_config_json(r##"{"colors": ["#ff0000"], "speed": 3.0, "followPointer": "yes"}"##);
    assert_eq!(issues.len(), 1);
    assert_eq!(s.config().speed, 3.0);
    assert_eq!(s.config().color(0).to_string(), "#ff0000");
    assert!(s.config().follow_pointer);

    s.set_config_json(r##"{"colors": "#00ffff", "speed": 2.0}"##);
    assert_eq!(s.config().speed, 2.0);
    assert_eq!(s.config().color(0).to_bytes(), [0, 255, 255]);
}

#[test]
fn set_config_replaces_rather_than_merges() {
    let mut s = mounted(EffectKind::LightRays, r##"{"colors": ["#00ffff"], "speed": 0.5}"##);
    assert!(s.set_config_json(r#"{"pointerInfluence": 0.2}"#).is_empty());
    assert!((s.config().pointer_influence - 0.2).abs() < 1e-6);
    assert_eq!(s.config().speed, 1.0);
    assert_eq!(s.config().color(0).to_string(), "#ffffff");
}

#[test]
fn detached_and_torn_down_surfaces_free_their_container() {
    let mut s: AnimatedSurface<FakeContext> =
        AnimatedSurface::from_patch(EffectKind::FogField, &ConfigPatch::default());
    assert!(!s.phase().occupies_container());
    assert!(s.attach());
    assert!(s.phase().occupies_container());
    s.teardown();
    assert!(!s.phase().occupies_container());
}

#[test]
fn rays_pointer_approaches_target_monotonically() {
    let probe = Shared::default();
    let mut s = mounted(
        EffectKind::LightRays,
        r#"{"followPointer": true, "pointerInfluence": 0.1}"#,
    );
    assert!(s.tracks_pointer());
    show_and_acquire(&mut s, &probe);
    s.set_pointer(Vec2::new(0.8, 0.2));

    let target = Vec2::new(0.8, 0.2);
    let mut prev = s.pointer();
    for i in 0..60 {
        assert_eq!(s.tick(i as f64 * FRAME_MS).0, FrameOutcome::Drew);
        let p = s.pointer();
        assert!(p.x > prev.x && p.x <= target.x, "x step {i}: {} -> {}", prev.x, p.x);
        assert!(p.y < prev.y && p.y >= target.y, "y step {i}: {} -> {}", prev.y, p.y);
        prev = p;
    }
}

#[test]
fn pointer_is_ignored_when_not_followed() {
    let mut s = mounted(EffectKind::ParticleField, "");
    assert!(!s.tracks_pointer());
    s.set_pointer(Vec2::new(0.9, 0.9));
    assert_eq!(s.pointer(), Vec2::new(0.5, 0.5));
}

#[test]
fn resize_reaches_the_context() {
    let probe = Shared::default();
    let mut s = mounted(EffectKind::FogField, "");
    show_and_acquire(&mut s, &probe);
    let bigger = SurfaceSize {
        width: 1024,
        height: 512,
        css_width: 1024.0,
        css_height: 512.0,
    };
    s.resize(bigger);
    let sizes = probe.borrow().sizes.clone();
    assert_eq!(sizes, vec![size(), bigger]);
}

#[test]
fn pending_callback_after_teardown_does_not_draw() {
    let probe = Shared::default();
    let mut s = mounted(EffectKind::FogField, "");
    show_and_acquire(&mut s, &probe);
    // A callback is pending from the acquisition; tear down before it fires.
    s.teardown();
    assert_eq!(s.tick(0.0).0, FrameOutcome::Halted);
    assert_eq!(probe.borrow().draws, 0);
}

#[test]
fn attach_is_not_repeatable() {
    let mut s = mounted(EffectKind::FogField, "");
    assert!(!s.attach());
    s.teardown();
    assert!(!s.attach());
}
