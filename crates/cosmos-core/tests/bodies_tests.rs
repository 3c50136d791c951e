use cosmos_core::background::{galaxy_layers, meteor_gate_open, star_layer, Meteor, METEORS};
use cosmos_core::body::{BodyTransform, CelestialBody, WindowedBody};
use cosmos_core::catalog;
use cosmos_core::state::FrameInput;
use cosmos_core::viewport::{QualitySettings, ViewportProfile};
use glam::Vec3;

fn full() -> QualitySettings {
    ViewportProfile::Full.quality()
}

fn at(progress: f32, elapsed: f32) -> FrameInput {
    FrameInput::new(progress, elapsed, 1.0 / 60.0)
}

fn close(a: Vec3, b: Vec3) -> bool {
    a.distance(b) < 1e-3
}

#[test]
fn earth_slides_in_halfway_at_mid_entry() {
    let mut earth = WindowedBody::new(catalog::earth(&full()));
    let t = earth.update(&at(0.225, 0.0), None);
    assert!(close(t.position, Vec3::new(32.5, 2.0, -10.0)), "{:?}", t.position);
    // Pop curve: full size as soon as entry starts
    assert!((t.scale.x - 5.5).abs() < 1e-4);
}

#[test]
fn earth_holds_center_stage_at_peak() {
    let mut earth = WindowedBody::new(catalog::earth(&full()));
    let t = earth.update(&at(0.28, 0.0), None);
    assert!(close(t.position, Vec3::new(10.0, 2.0, -10.0)));
    assert!((t.scale.x - 5.5).abs() < 1e-4);
}

#[test]
fn bodies_outside_their_window_are_parked() {
    let mut earth = WindowedBody::new(catalog::earth(&full()));
    let t = earth.update(&at(0.5, 10.0), None);
    assert!(!t.is_rendered());
    assert_eq!(t.position, Vec3::new(200.0, -100.0, -200.0));
    // Rotation keeps running while parked
    assert!((t.rotation.y - 1.0).abs() < 1e-5);
}

#[test]
fn smoothed_bodies_lag_behind_raw_progress() {
    let mut mars = WindowedBody::new(catalog::mars(&full()));
    let first = mars.update(&at(0.4, 0.0), None);
    assert!(!first.is_rendered(), "mars should still be off stage on the first tick");
    assert!(!mars.is_settled(0.4));

    let mut last = first;
    for _ in 0..400 {
        last = mars.update(&at(0.4, 0.0), None);
    }
    assert!(mars.is_settled(0.4));
    assert!(close(last.position, Vec3::new(-10.0, 5.0, -15.0)), "{:?}", last.position);
    assert!((last.scale.x - 5.5).abs() < 1e-3);
}

#[test]
fn saturn_rests_tilted_at_the_end_of_the_page() {
    let mut saturn = WindowedBody::new(catalog::saturn(&full()));
    let mut t = BodyTransform::hidden();
    for _ in 0..400 {
        t = saturn.update(&at(1.0, 100.0), None);
    }
    assert!(close(t.position, Vec3::new(-10.0, -2.0, -25.0)), "{:?}", t.position);
    assert!((t.scale.x - 4.0).abs() < 1e-3);
    assert!(close(t.rotation, Vec3::new(0.5, 0.4, 0.15)));
}

#[test]
fn rocket_fades_in_and_out_of_the_hero() {
    let mut rocket = WindowedBody::new(catalog::rocket(&full()));
    assert!(!rocket.update(&at(0.0, 0.0), None).is_rendered());

    let entering = rocket.update(&at(0.005, 0.0), None);
    assert!((entering.scale.x - 0.9).abs() < 1e-3, "{}", entering.scale.x);

    let cruising = rocket.update(&at(0.1, 0.0), None);
    assert!((cruising.scale.x - 1.8).abs() < 1e-5);

    let leaving = rocket.update(&at(0.175, 0.0), None);
    assert!(leaving.scale.x > 0.0 && leaving.scale.x < 1.8);
    assert!(!rocket.update(&at(0.2, 0.0), None).is_rendered());
}

#[test]
fn rocket_travels_toward_the_camera() {
    let mut rocket = WindowedBody::new(catalog::rocket(&full()));
    let early = rocket.update(&at(0.02, 0.0), None);
    let late = rocket.update(&at(0.15, 0.0), None);
    assert!(late.position.z > early.position.z);
    assert!(late.position.y > early.position.y);
}

#[test]
fn moon_orbits_the_primary_transform() {
    let mut moon = WindowedBody::new(catalog::moon(&full()));
    assert_eq!(moon.primary(), Some(cosmos_core::BodyId::Earth));
    let earth = BodyTransform::uniform(Vec3::new(10.0, 2.0, -10.0), 5.5, Vec3::ZERO);
    let t = moon.update(&at(0.28, 0.0), Some(&earth));
    assert!(close(t.position, Vec3::new(55.0, 2.0, -20.0)), "{:?}", t.position);
    assert!((t.scale.x - 2.0).abs() < 1e-5);

    let moved = BodyTransform::uniform(Vec3::new(-5.0, 0.0, 0.0), 5.5, Vec3::ZERO);
    let t2 = moon.update(&at(0.28, 0.0), Some(&moved));
    assert!(close(t2.position - t.position, moved.position - earth.position));
}

#[test]
fn non_finite_input_parks_windowed_bodies() {
    let mut earth = WindowedBody::new(catalog::earth(&full()));
    let parked_at = earth.spec().parked_at;
    for input in [
        at(f32::NAN, 0.0),
        at(0.28, f32::NAN),
        at(0.28, f32::INFINITY),
        at(0.28, f32::NEG_INFINITY),
    ] {
        let t = earth.update(&input, None);
        assert!(!t.is_rendered());
        assert_eq!(t.position, parked_at);
        assert!(t.rotation.is_finite(), "{:?}", t.rotation);
        assert!(t.model_matrix().is_finite());
    }
    assert_eq!(earth.parked().position, parked_at);
}

#[test]
fn non_finite_input_keeps_background_transforms_finite() {
    let mut layers = galaxy_layers();
    let mut meteor = Meteor::new(0, METEORS[0]);
    for input in [at(f32::NAN, 1.0), at(0.5, f32::INFINITY)] {
        for layer in layers.iter_mut() {
            let t = layer.update(&input, None);
            assert!(!t.is_rendered());
            assert!(t.model_matrix().is_finite());
        }
        let t = meteor.update(&input, None);
        assert!(!t.is_rendered());
        assert_eq!(t.position, meteor.spec().start);
        assert!(t.model_matrix().is_finite());
    }
}

#[test]
fn quality_gates_optional_parts() {
    let constrained = ViewportProfile::Constrained.quality();
    assert_eq!(catalog::earth(&full()).parts.len(), 3);
    assert_eq!(catalog::earth(&constrained).parts.len(), 2);
    assert_eq!(catalog::mars(&full()).parts.len(), 2);
    assert_eq!(catalog::mars(&constrained).parts.len(), 1);
}

#[test]
fn catalog_windows_are_valid() {
    for spec in catalog::windowed_bodies(&full()) {
        assert!(spec.window.validate().is_ok(), "{:?}", spec.id);
    }
}

#[test]
fn galaxy_recedes_and_shrinks() {
    let mut layers = galaxy_layers();
    let start = layers[0].update(&at(0.0, 0.0), None);
    let end = layers[0].update(&at(1.0, 0.0), None);
    assert!((start.position.z + 30.0).abs() < 1e-4);
    assert!((start.scale.x - 2.5).abs() < 1e-5);
    assert!((end.position.z + 180.0).abs() < 1e-3);
    assert!((end.scale.x - 0.4).abs() < 1e-5);
    assert!((start.rotation.x + 0.7).abs() < 1e-6);
}

#[test]
fn star_layers_drift_with_depth() {
    let mut far = star_layer(0).unwrap();
    let mut near = star_layer(2).unwrap();
    assert!(star_layer(3).is_none());
    let f = far.update(&at(0.5, 0.0), None);
    let n = near.update(&at(0.5, 0.0), None);
    assert!(f.position.z > n.position.z);
    assert!((f.position.z - 40.0).abs() < 1e-3);
}

#[test]
fn meteors_only_fly_mid_page() {
    assert!(!meteor_gate_open(0.1));
    assert!(meteor_gate_open(0.5));
    assert!(!meteor_gate_open(0.9));

    let mut meteor = Meteor::new(0, METEORS[0]);
    assert!(!meteor.update(&at(0.05, 3.0), None).is_rendered());
    let t = meteor.update(&at(0.5, 3.0), None);
    assert!(t.is_rendered());
    assert!(close(t.position, meteor.position_at(3.0)));
}

#[test]
fn meteor_fall_repeats_on_its_period() {
    let meteor = Meteor::new(2, METEORS[2]);
    let period = 30.0 / METEORS[2].speed;
    let a = meteor.position_at(4.0);
    let b = meteor.position_at(4.0 + period);
    assert!(a.distance(b) < 1e-2, "{a:?} vs {b:?}");
    let start = meteor.position_at(-METEORS[2].delay);
    assert!(close(start, METEORS[2].start));
}
