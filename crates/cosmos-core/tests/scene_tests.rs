use cosmos_core::catalog;
use cosmos_core::geometry::{self, MeshData};
use cosmos_core::particles::{generate_cloud, star_count, ExhaustPlume, PointVertex};
use cosmos_core::scene::{SceneComposition, SceneError, SceneRenderer};
use cosmos_core::shading::{CloudId, GeometryRef, ShadingParams};
use cosmos_core::state::FrameInput;
use cosmos_core::viewport::{QualitySettings, ViewportProfile};
use cosmos_core::{background::STAR_LAYERS, BodyId};
use glam::{Mat4, Vec3};

fn full() -> QualitySettings {
    ViewportProfile::Full.quality()
}

fn constrained() -> QualitySettings {
    ViewportProfile::Constrained.quality()
}

fn at(progress: f32, elapsed: f32) -> FrameInput {
    FrameInput::new(progress, elapsed, 1.0 / 60.0)
}

#[derive(Default)]
struct Recorder {
    begun: usize,
    finished: usize,
    submitted: Vec<GeometryRef>,
    streamed: Vec<(CloudId, usize)>,
}

impl SceneRenderer for Recorder {
    type Error = ();

    fn begin_frame(&mut self, _input: &FrameInput) {
        self.begun += 1;
    }

    fn stream_points(&mut self, cloud: CloudId, points: &[PointVertex]) {
        self.streamed.push((cloud, points.len()));
    }

    fn submit_body(&mut self, geometry: GeometryRef, _shading: &ShadingParams, model: &Mat4) {
        assert!(model.is_finite());
        self.submitted.push(geometry);
    }

    fn finish_frame(&mut self) -> Result<(), ()> {
        self.finished += 1;
        Ok(())
    }
}

#[test]
fn satellites_follow_their_primary() {
    let scene = SceneComposition::new(&full()).unwrap();
    let ids: Vec<BodyId> = scene.body_ids().collect();
    let earth = ids.iter().position(|id| *id == BodyId::Earth).unwrap();
    let moon = ids.iter().position(|id| *id == BodyId::Moon).unwrap();
    assert!(earth < moon);
}

#[test]
fn registration_order_does_not_matter() {
    let q = full();
    let scene = SceneComposition::with_bodies(vec![catalog::moon(&q), catalog::earth(&q)], &q).unwrap();
    let ids: Vec<BodyId> = scene.body_ids().collect();
    let earth = ids.iter().position(|id| *id == BodyId::Earth).unwrap();
    let moon = ids.iter().position(|id| *id == BodyId::Moon).unwrap();
    assert!(earth < moon);
}

#[test]
fn missing_primary_is_rejected() {
    let q = full();
    let result = SceneComposition::with_bodies(vec![catalog::moon(&q)], &q);
    assert_eq!(
        result.err(),
        Some(SceneError::MissingPrimary {
            body: BodyId::Moon,
            primary: BodyId::Earth,
        })
    );
}

#[test]
fn duplicate_bodies_are_rejected() {
    let q = full();
    let result = SceneComposition::with_bodies(vec![catalog::earth(&q), catalog::earth(&q)], &q);
    assert_eq!(result.err(), Some(SceneError::DuplicateBody(BodyId::Earth)));
}

#[test]
fn moon_is_placed_from_this_tick_earth() {
    let mut scene = SceneComposition::new(&full()).unwrap();
    scene.update(&at(0.28, 0.0));
    let earth = scene.transform_of(BodyId::Earth).unwrap();
    let moon = scene.transform_of(BodyId::Moon).unwrap();
    assert!(earth.is_rendered() && moon.is_rendered());
    let offset = moon.position - earth.position;
    assert!(offset.distance(Vec3::new(45.0, 0.0, -10.0)) < 1e-3, "{offset:?}");
}

#[test]
fn exited_body_resolves_to_zero_scale() {
    let mut scene = SceneComposition::new(&full()).unwrap();
    let frame = scene.update(&at(0.40, 0.0));
    assert!(frame.of(BodyId::Earth).count() > 0);
    assert!(frame.of(BodyId::Earth).all(|item| !item.is_visible()));
    assert!(frame.of(BodyId::Moon).all(|item| !item.is_visible()));
}

#[test]
fn non_finite_input_hides_the_whole_scene() {
    let mut scene = SceneComposition::new(&full()).unwrap();
    let frame = scene.update(&at(f32::NAN, 1.0));
    assert!(!frame.items().is_empty());
    assert_eq!(frame.visible().count(), 0);

    let frame = scene.update(&at(0.5, f32::NAN));
    assert_eq!(frame.visible().count(), 0);

    // Recovers on the next finite tick
    let frame = scene.update(&at(0.5, 2.0));
    assert!(frame.visible().count() > 0);
}

#[test]
fn non_finite_input_parks_bodies_at_their_own_coordinates() {
    let mut scene = SceneComposition::new(&full()).unwrap();
    let earth_parked = catalog::earth(&full()).parked_at;
    for input in [at(f32::NAN, 1.0), at(0.28, f32::INFINITY)] {
        let frame = scene.update(&input);
        assert!(frame.items().iter().all(|item| item.model.is_finite()));
        let earth = scene.transform_of(BodyId::Earth).unwrap();
        assert_eq!(earth.position, earth_parked);
        assert_eq!(earth.scale, Vec3::ZERO);
        assert!(earth.rotation.is_finite());
    }
}

#[test]
fn backgrounds_are_always_present() {
    let mut scene = SceneComposition::new(&full()).unwrap();
    for p in [0.0, 0.5, 1.0] {
        let frame = scene.update(&at(p, 0.0));
        for id in [BodyId::GalaxyCore, BodyId::GalaxyArms, BodyId::Nebula, BodyId::StarLayer(0)] {
            assert!(frame.of(id).all(|item| item.is_visible()), "{id:?} hidden at {p}");
        }
    }
}

#[test]
fn constrained_quality_drops_optional_layers() {
    let mut scene = SceneComposition::new(&constrained()).unwrap();
    let ids: Vec<BodyId> = scene.body_ids().collect();
    assert!(!ids.contains(&BodyId::Nebula));
    assert!(!ids.contains(&BodyId::StarLayer(2)));
    assert!(ids.contains(&BodyId::StarLayer(1)));

    let frame = scene.update(&at(0.28, 0.0));
    let earth_parts = frame.of(BodyId::Earth).count();
    assert_eq!(earth_parts, 2, "clouds must be gone");

    let full_scene = SceneComposition::new(&full()).unwrap();
    let full_ids: Vec<BodyId> = full_scene.body_ids().collect();
    assert!(full_ids.contains(&BodyId::Nebula));
    assert!(full_ids.contains(&BodyId::StarLayer(2)));
}

#[test]
fn submit_forwards_each_visible_item_once() {
    let mut scene = SceneComposition::new(&full()).unwrap();
    let visible = scene.update(&at(0.1, 1.0)).visible().count();
    let mut recorder = Recorder::default();
    scene.submit(&mut recorder).unwrap();
    assert_eq!(recorder.begun, 1);
    assert_eq!(recorder.finished, 1);
    assert_eq!(recorder.submitted.len(), visible);
    assert!(recorder.submitted.contains(&GeometryRef::RocketHull));
    assert!(recorder.streamed.contains(&(CloudId::Flame, 150)));
    assert!(recorder.streamed.contains(&(CloudId::Smoke, 80)));
}

#[test]
fn scene_settles_only_after_body_smoothers_converge() {
    let mut scene = SceneComposition::new(&full()).unwrap();
    scene.update(&at(0.6, 0.0));
    assert!(!scene.is_settled(0.6));
    for _ in 0..400 {
        scene.update(&at(0.6, 0.0));
    }
    assert!(scene.is_settled(0.6));
    let jupiter = scene.transform_of(BodyId::Jupiter).unwrap();
    assert!(jupiter.is_rendered());
}

#[test]
fn invalid_windows_are_clamped_at_registration() {
    let q = full();
    let mut earth = catalog::earth(&q);
    earth.window.peak_start = 0.1;
    let mut scene = SceneComposition::with_bodies(vec![earth], &q).unwrap();
    for i in 0..=100 {
        let frame = scene.update(&at(i as f32 / 100.0, 0.0));
        assert!(frame.items().iter().all(|item| item.model.is_finite() || !item.is_visible()));
    }
}

#[test]
fn point_clouds_are_deterministic() {
    let q = full();
    for id in [CloudId::GalaxyCore, CloudId::GalaxyArms, CloudId::Nebula, CloudId::StarLayer(1)] {
        assert_eq!(generate_cloud(id, &q), generate_cloud(id, &q), "{id:?}");
    }
    assert_ne!(
        generate_cloud(CloudId::StarLayer(0), &q),
        generate_cloud(CloudId::StarLayer(1), &q)
    );
    assert!(generate_cloud(CloudId::Flame, &q).is_empty());
}

#[test]
fn star_density_scales_counts() {
    let sparse = constrained();
    assert_eq!(star_count(&STAR_LAYERS[0], &sparse), 360);
    assert_eq!(star_count(&STAR_LAYERS[1], &sparse), 180);
    assert_eq!(generate_cloud(CloudId::StarLayer(0), &full()).len(), 1200);
}

#[test]
fn exhaust_particles_stay_inside_the_plume() {
    let mut plume = ExhaustPlume::new(7);
    for _ in 0..2000 {
        plume.step(1.0 / 60.0);
    }
    // A long stall is capped instead of teleporting particles
    plume.step(5.0);
    for p in plume.flame() {
        assert!((-3.0..=0.0).contains(&p.position[1]), "flame y {}", p.position[1]);
    }
    for p in plume.smoke() {
        assert!((-12.0..=-2.0).contains(&p.position[1]), "smoke y {}", p.position[1]);
    }
}

fn assert_well_formed(mesh: &MeshData) {
    assert!(mesh.triangle_count() > 0);
    assert_eq!(mesh.indices.len() % 3, 0);
    let n = mesh.vertices.len() as u32;
    assert!(mesh.indices.iter().all(|i| *i < n));
    assert!(mesh
        .vertices
        .iter()
        .all(|v| v.position.iter().chain(v.normal.iter()).all(|c| c.is_finite())));
}

#[test]
fn sphere_resolution_follows_quality() {
    let full_sphere = geometry::build(GeometryRef::Sphere, &full()).unwrap();
    let low_sphere = geometry::build(GeometryRef::Sphere, &constrained()).unwrap();
    assert_eq!(full_sphere.vertices.len(), 65 * 65);
    assert_eq!(low_sphere.vertices.len(), 33 * 33);
    assert_well_formed(&full_sphere);
    for v in &low_sphere.vertices {
        let r = Vec3::from_array(v.position).length();
        assert!((r - 1.0).abs() < 1e-4);
    }
}

#[test]
fn every_mesh_geometry_builds() {
    let q = full();
    for g in [
        GeometryRef::Shell,
        GeometryRef::SaturnRing,
        GeometryRef::RocketHull,
        GeometryRef::RocketFlame,
        GeometryRef::MeteorRock(3),
        GeometryRef::MeteorCore,
    ] {
        let mesh = geometry::build(g, &q).unwrap_or_else(|| panic!("{g:?} has no mesh"));
        assert_well_formed(&mesh);
    }
    assert!(geometry::build(GeometryRef::Cloud(CloudId::Nebula), &q).is_none());
}

#[test]
fn meteor_rocks_are_seeded_per_index() {
    assert_eq!(geometry::meteor_rock(1), geometry::meteor_rock(1));
    assert_ne!(geometry::meteor_rock(1), geometry::meteor_rock(2));
}
