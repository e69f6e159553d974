//! End-to-end checks on sampling, packing, deformation and the config file.

use glam::{Mat4, Vec2};
use image::{DynamicImage, Rgba, RgbaImage};
use memory_garden::config::{ParticleConfig, SavedState};
use memory_garden::deform::{deform, deform_all, drift, influence, repulsion_force, DeformParams, FrameState};
use memory_garden::driver::{FrameContext, UniformDriver, POINTER_FAR_AWAY};
use memory_garden::sampler::{sample_rgba, SamplerConfig};
use memory_garden::{sample_image, ParticleBuffers, PointSet, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn sample(img: &RgbaImage) -> PointSet {
    sample_rgba(img, &SamplerConfig::default(), &mut StdRng::seed_from_u64(42))
}

/// A 16x12 image with a soft alpha gradient and varied colour.
fn gradient_image() -> RgbaImage {
    RgbaImage::from_fn(16, 12, |x, y| {
        Rgba([(x * 16) as u8, (y * 20) as u8, 128, ((x + y) * 10) as u8])
    })
}

/// Camera at (0, 0, 15) looking at the image plane.
fn facing_camera(pointer_ndc: Option<Vec2>) -> FrameContext {
    let camera_position = Vec3::new(0.0, 0.0, 15.0);
    FrameContext {
        view: Mat4::look_at_rh(camera_position, Vec3::ZERO, Vec3::Y),
        proj: Mat4::perspective_rh(45f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0),
        camera_position,
        viewport: Vec2::new(1280.0, 720.0),
        device_pixel_ratio: 1.0,
        pointer_ndc,
    }
}

fn random_image(seed: u64, w: u32, h: u32) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbaImage::from_fn(w, h, |_, _| Rgba(rng.gen()))
}

#[test]
fn parallel_arrays_have_equal_length() {
    let points = sample(&gradient_image());
    let n = points.len();
    assert!(n > 0);
    assert_eq!(points.positions().len(), n);
    assert_eq!(points.reference_positions().len(), n);
    assert_eq!(points.colors().len(), n);
    assert_eq!(points.random_seeds().len(), n);
    assert_eq!(points.edge_factors().len(), n);

    let buffers = ParticleBuffers::from_point_set(&points);
    assert_eq!(buffers.len(), n);
}

#[test]
fn point_count_matches_visible_pixels() {
    for seed in 0..5 {
        let img = random_image(seed, 23, 17);
        let visible = img.pixels().filter(|p| p.0[3] as f32 / 255.0 >= 0.1).count();
        assert_eq!(sample(&img).len(), visible, "seed {seed}");
    }
}

#[test]
fn reference_equals_position_after_sampling() {
    let points = sample(&gradient_image());
    assert_eq!(points.positions(), points.reference_positions());
}

#[test]
fn edge_factor_bounded_with_center_and_corner() {
    let img = RgbaImage::from_pixel(9, 9, Rgba([200, 200, 200, 255]));
    let points = sample(&img);

    assert!(points.edge_factors().iter().all(|e| (0.0..=1.0).contains(e)));

    // Row-major: pixel (0, 0) first; the center (4.5, 4.5) is nearest to (4, 4) and (5, 5).
    let corner = points.get(0).unwrap().edge_factor;
    assert!((corner - 1.0).abs() < 1e-6);
    let min = points.edge_factors().iter().cloned().fold(f32::INFINITY, f32::min);
    assert!(min < 0.2);
}

#[test]
fn even_image_has_zero_edge_at_center_pixel() {
    let img = RgbaImage::from_pixel(4, 4, Rgba([50, 50, 50, 255]));
    let points = sample(&img);
    // pixel (2, 2) is at offset zero from centre (2, 2)
    let center = points.get(2 * 4 + 2).unwrap();
    assert_eq!(center.edge_factor, 0.0);
}

#[test]
fn random_seeds_in_unit_range() {
    let points = sample(&random_image(9, 40, 30));
    assert!(points.random_seeds().iter().all(|r| (0.0..1.0).contains(r)));
}

#[test]
fn sampling_is_idempotent_apart_from_seeds() {
    let img = DynamicImage::ImageRgba8(gradient_image());
    let config = SamplerConfig::default();
    let a = sample_image(&img, &config);
    let b = sample_image(&img, &config);

    assert_eq!(a.len(), b.len());
    assert_eq!(a.positions(), b.positions());
    assert_eq!(a.colors(), b.colors());
    assert_eq!(a.edge_factors(), b.edge_factors());
}

#[test]
fn solid_red_two_by_two() {
    let img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
    let points = sample(&img);

    assert_eq!(points.len(), 4);
    assert!(points.colors().iter().all(|c| *c == Vec3::new(1.0, 0.0, 0.0)));

    let z0 = points.positions()[0].z;
    assert!(points.positions().iter().all(|p| p.z == z0));

    // (1, 0) and (0, 1) are mirror images about the diagonal
    let edges = points.edge_factors();
    assert_eq!(edges[1], edges[2]);
}

#[test]
fn fully_transparent_image_is_empty() {
    let img = RgbaImage::from_pixel(32, 32, Rgba([255, 255, 255, 0]));
    let points = sample(&img);
    assert!(points.is_empty());
    assert!(ParticleBuffers::from_point_set(&points).is_empty());
}

#[test]
fn influence_is_monotonic_and_bounded() {
    let params = DeformParams::default();
    let mut prev = influence(0.0, &params);
    assert_eq!(prev, 0.0);
    for i in 1..=100 {
        let e = i as f32 / 100.0;
        let value = influence(e, &params);
        assert!(value >= prev);
        assert!((0.0..=1.0).contains(&value));
        prev = value;
    }
    assert_eq!(influence(1.0, &params), 1.0);
}

#[test]
fn anchored_center_and_fading_edges() {
    let params = DeformParams::default();
    let frame = FrameState {
        time: 3.7,
        mouse: POINTER_FAR_AWAY,
    };

    let still = deform(Vec3::new(0.5, -0.5, 1.0), 0.3, 0.0, &frame, &params);
    assert_eq!(still.position, Vec3::new(0.5, -0.5, 1.0));
    assert_eq!(still.alpha, 1.0);

    let edge = deform(Vec3::new(5.0, 3.0, 1.0), 0.3, 1.0, &frame, &params);
    assert!((edge.alpha - 0.3).abs() < 1e-6);
    assert!((edge.size_scale - 3.0).abs() < 1e-6);
    assert!(edge.position != Vec3::new(5.0, 3.0, 1.0));
}

#[test]
fn alpha_stays_in_range() {
    let params = DeformParams::default();
    let points = sample(&random_image(3, 30, 20));
    let frame = FrameState {
        time: 100.0,
        mouse: Vec3::ZERO,
    };
    for d in deform_all(&points, &frame, &params) {
        assert!((0.3 - 1e-6..=1.0).contains(&d.alpha));
        assert!(d.position.is_finite());
    }
}

#[test]
fn repulsion_monotonic_and_zero_outside_radius() {
    let radius = 4.0;
    assert_eq!(repulsion_force(0.0, radius), 1.0);
    assert_eq!(repulsion_force(radius, radius), 0.0);
    assert_eq!(repulsion_force(radius + 1.0, radius), 0.0);

    let mut prev = repulsion_force(0.0, radius);
    for i in 1..40 {
        let force = repulsion_force(i as f32 * 0.1, radius);
        assert!(force < prev, "d = {}", i as f32 * 0.1);
        prev = force;
    }
}

#[test]
fn far_pointer_has_no_effect() {
    let params = DeformParams::default();
    let reference = Vec3::new(1.0, 2.0, 0.5);
    let near_free = FrameState {
        time: 1.0,
        mouse: POINTER_FAR_AWAY,
    };
    let pushed = FrameState {
        time: 1.0,
        mouse: reference + Vec3::new(0.5, 0.0, 0.0),
    };
    let a = deform(reference, 0.1, 0.0, &near_free, &params);
    let b = deform(reference, 0.1, 0.0, &pushed, &params);
    assert_eq!(a.position, reference);
    // pushed away from the pointer, along -x
    assert!(b.position.x < reference.x);
}

#[test]
fn centered_pointer_pushes_hardest_at_origin() {
    let params = DeformParams::default();
    let mut driver = UniformDriver::new();
    let uniforms = driver.update(2.0, &facing_camera(Some(Vec2::ZERO)), &ParticleConfig::default());
    let frame = uniforms.frame_state();

    assert_eq!(frame.time, 2.0);
    let at_origin = repulsion_force(frame.mouse.distance(Vec3::ZERO), params.repulsion_radius);
    assert!((at_origin - 1.0).abs() < 1e-3, "force {at_origin}");

    // an anchored neighbour is pushed straight out along +x
    let neighbour = Vec3::new(0.5, 0.0, 0.0);
    let moved = deform(neighbour, 0.4, 0.0, &frame, &params);
    let expected = 0.5 + params.repulsion_strength * (1.0 - 0.5 / params.repulsion_radius).powi(2);
    assert!((moved.position.x - expected).abs() < 1e-2, "x {}", moved.position.x);
    assert!(moved.position.y.abs() < 1e-2);
}

#[test]
fn absent_pointer_leaves_sampled_points_unrepelled() {
    let params = DeformParams::default();
    let mut driver = UniformDriver::new();
    let uniforms = driver.update(7.5, &facing_camera(None), &ParticleConfig::default());
    let frame = uniforms.frame_state();
    assert_eq!(frame.mouse, POINTER_FAR_AWAY);

    let points = sample(&random_image(11, 40, 30));
    let deformed = deform_all(&points, &frame, &params);
    assert_eq!(deformed.len(), points.len());

    for (point, moved) in points.iter().zip(&deformed) {
        let weight = influence(point.edge_factor, &params);
        let reference = point.reference_position;
        let unrepelled = reference
            + drift(reference, point.random_seed, frame.time, &params) * weight * params.drift_scale
            + reference.normalize_or_zero() * weight * params.expansion_scale;
        assert_eq!(moved.position, unrepelled);
    }
}

#[test]
fn saved_state_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garden-particles.json");

    let state = SavedState {
        particle: ParticleConfig {
            size: 7.5,
            speed: 2.0,
            dispersion: 1.2,
            noise_strength: 4.0,
            color_hex: "#ff8800".to_string(),
        },
        last_image: Some(dir.path().join("portrait.png")),
    };
    state.save(&path).unwrap();

    assert_eq!(SavedState::load(&path).unwrap(), state);
}

#[test]
fn saved_values_are_clamped_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garden-particles.json");
    std::fs::write(&path, r#"{ "size": 40.0, "noiseStrength": -2.0 }"#).unwrap();

    let state = SavedState::load(&path).unwrap();
    assert_eq!(state.particle.size, 15.0);
    assert_eq!(state.particle.noise_strength, 0.0);
    assert_eq!(state.last_image, None);
}

#[test]
fn missing_or_broken_state_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    assert_eq!(SavedState::load_or_default(&missing), SavedState::default());

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ size: ").unwrap();
    assert!(SavedState::load(&broken).is_err());
    assert_eq!(SavedState::load_or_default(&broken), SavedState::default());
}
