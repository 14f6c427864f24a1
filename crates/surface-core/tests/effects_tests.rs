// Host-side tests for the effect strategies: programs, policies and uniforms.

use glam::{Mat4, Vec2, Vec3};
use surface_core::config::ConfigPatch;
use surface_core::effects::{particle_model, ray_anchor};
use surface_core::{
    effect_for, surface_size, EffectKind, FrameParams, HiddenPolicy, RaysOrigin, SurfaceConfig,
};

fn frame() -> FrameParams {
    FrameParams {
        elapsed: 1.5,
        size: surface_size(640.0, 360.0, 2.0, 2.0, 1.0),
        pointer: Vec2::new(0.25, 0.75),
    }
}

fn config(kind: EffectKind, json: &str) -> SurfaceConfig {
    let patch = ConfigPatch::from_json(json).unwrap();
    SurfaceConfig::resolve(kind, &patch, None).0
}

#[test]
fn uniform_blocks_are_aligned_and_fully_written() {
    for kind in EffectKind::ALL {
        let effect = effect_for(kind);
        assert_eq!(effect.kind(), kind);
        let spec = effect.program();
        assert_eq!(spec.uniform_size % 16, 0, "{kind}");
        let mut out = vec![0xAA; 3];
        effect.write_uniforms(&SurfaceConfig::defaults(kind), &frame(), &mut out);
        assert_eq!(out.len(), spec.uniform_size, "{kind}");
    }
}

#[test]
fn programs_expose_the_shared_entry_points() {
    for kind in EffectKind::ALL {
        let shader = effect_for(kind).program().shader;
        assert!(shader.contains("fn vs_main"), "{kind}");
        assert!(shader.contains("fn fs_main"), "{kind}");
        assert!(shader.contains("@group(0) @binding(0)"), "{kind}");
    }
}

#[test]
fn hidden_policies() {
    let policy = |kind| effect_for(kind).policy(&SurfaceConfig::defaults(kind)).hidden;
    assert_eq!(policy(EffectKind::LightRays), HiddenPolicy::Release);
    for kind in [
        EffectKind::FogField,
        EffectKind::GradientAurora,
        EffectKind::ParticleField,
        EffectKind::BeamField,
    ] {
        assert_eq!(policy(kind), HiddenPolicy::Pause, "{kind}");
    }
}

#[test]
fn rays_track_the_pointer_only_with_influence() {
    let rays = effect_for(EffectKind::LightRays);
    let on = rays.policy(&SurfaceConfig::defaults(EffectKind::LightRays));
    assert_eq!(on.pointer_smoothing, Some(0.92));
    assert_eq!(on.dpr_cap, 1.5);
    assert_eq!(on.visibility_threshold, 0.1);
    let off = rays.policy(&config(EffectKind::LightRays, r#"{"pointerInfluence": 0}"#));
    assert_eq!(off.pointer_smoothing, None);
}

#[test]
fn particles_smooth_the_pointer_when_following() {
    let particles = effect_for(EffectKind::ParticleField);
    let off = particles.policy(&SurfaceConfig::defaults(EffectKind::ParticleField));
    assert_eq!(off.pointer_smoothing, None);
    let on = particles.policy(&config(EffectKind::ParticleField, r#"{"followPointer": true}"#));
    assert_eq!(on.pointer_smoothing, Some(0.90));
}

#[test]
fn fog_renders_scaled_and_capped() {
    let fog = effect_for(EffectKind::FogField);
    let p = fog.policy(&SurfaceConfig::defaults(EffectKind::FogField));
    assert_eq!(p.pixel_scale, 0.75);
    assert_eq!(p.target_fps, Some(30.0));
    let uncapped = fog.policy(&config(EffectKind::FogField, r#"{"targetFps": 0}"#));
    assert_eq!(uncapped.target_fps, None);
}

#[test]
fn beams_clear_to_opaque_black() {
    let p = effect_for(EffectKind::BeamField).policy(&SurfaceConfig::defaults(EffectKind::BeamField));
    assert_eq!(p.clear, [0.0, 0.0, 0.0, 1.0]);
    let a = effect_for(EffectKind::GradientAurora)
        .policy(&SurfaceConfig::defaults(EffectKind::GradientAurora));
    assert_eq!(a.clear[3], 0.0);
    assert_eq!(a.pixel_scale, 0.8);
}

fn assert_anchor(origin: RaysOrigin, anchor: (f32, f32), dir: (f32, f32)) {
    let (a, d) = ray_anchor(origin, Vec2::new(100.0, 50.0));
    assert!(a.abs_diff_eq(Vec2::new(anchor.0, anchor.1), 1e-4), "{origin:?}: {a}");
    assert_eq!(d, Vec2::new(dir.0, dir.1), "{origin:?}");
}

#[test]
fn ray_anchors_sit_outside_the_edge() {
    assert_anchor(RaysOrigin::TopCenter, (50.0, -10.0), (0.0, 1.0));
    assert_anchor(RaysOrigin::TopLeft, (0.0, -10.0), (0.0, 1.0));
    assert_anchor(RaysOrigin::Right, (120.0, 25.0), (-1.0, 0.0));
    assert_anchor(RaysOrigin::Left, (-20.0, 25.0), (1.0, 0.0));
    assert_anchor(RaysOrigin::BottomLeft, (0.0, 60.0), (0.0, -1.0));
    assert_anchor(RaysOrigin::BottomRight, (100.0, 60.0), (0.0, -1.0));
}

#[test]
fn geometry_key_tracks_geometry_inputs_only() {
    for kind in [EffectKind::ParticleField, EffectKind::BeamField] {
        let effect = effect_for(kind);
        let base = effect.geometry_key(&SurfaceConfig::defaults(kind));
        let faster = effect.geometry_key(&config(kind, r#"{"speed": 3}"#));
        let more = effect.geometry_key(&config(kind, r#"{"count": 40}"#));
        let reseeded = effect.geometry_key(&config(kind, r#"{"seed": 7}"#));
        assert_eq!(base, faster, "{kind}");
        assert_ne!(base, more, "{kind}");
        assert_ne!(base, reseeded, "{kind}");
    }
    let fog = effect_for(EffectKind::FogField);
    assert_eq!(
        fog.geometry_key(&SurfaceConfig::defaults(EffectKind::FogField)),
        fog.geometry_key(&config(EffectKind::FogField, r#"{"hueShift": 90}"#))
    );
}

#[test]
fn built_geometry_matches_config() {
    let particles = config(EffectKind::ParticleField, r#"{"count": 400}"#);
    let g = effect_for(EffectKind::ParticleField).build_geometry(&particles);
    assert_eq!(g.instance_count, 400);
    let beams = SurfaceConfig::defaults(EffectKind::BeamField);
    let g = effect_for(EffectKind::BeamField).build_geometry(&beams);
    assert_eq!(g.indices.len(), 12 * 100 * 6);
    let g = effect_for(EffectKind::GradientAurora)
        .build_geometry(&SurfaceConfig::defaults(EffectKind::GradientAurora));
    assert_eq!(g.vertex_count, 3);
}

#[test]
fn particle_model_without_motion_is_identity() {
    assert_eq!(particle_model(0.0, None, 1.0, false), Mat4::IDENTITY);
    assert_eq!(particle_model(12.0, Some(Vec2::splat(0.5)), 1.0, false), Mat4::IDENTITY);
}

#[test]
fn particle_model_moves_away_from_the_pointer() {
    let m = particle_model(0.0, Some(Vec2::new(1.0, 0.0)), 1.0, false);
    assert_eq!(m.transform_point3(Vec3::ZERO), Vec3::new(-1.0, -1.0, 0.0));
}

#[test]
fn particle_model_spins_over_time() {
    let a = particle_model(0.0, None, 1.0, true);
    let b = particle_model(1.0, None, 1.0, true);
    assert_ne!(a, b);
    // Rotation only: the origin stays put.
    assert!(b.transform_point3(Vec3::ZERO).length() < 1e-6);
}
