//! The scroll-windowed bodies of the scene, expressed as data.
//!
//! Windows are validated here; a malformed window is clamped to a safe
//! ordering with a warning rather than aborting scene construction.

use crate::body::{
    BodyId, BodyPart, BodySpec, FlightPath, OrbitPath, PartLocal, PathShape, ScaleCurve,
    ScrollSource, Wobble,
};
use crate::constants::PLANET_LERP_FACTOR;
use crate::shading::{
    hex_rgba, BlendMode, CloudId, GeometryRef, PointSizing, PointStyle, ShadingParams, Surface,
};
use crate::timeline::{TimelineError, TimelineWindow};
use crate::viewport::QualitySettings;
use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

pub const EARTH_RADIUS: f32 = 3.0;
pub const MARS_RADIUS: f32 = 3.5;
pub const JUPITER_RADIUS: f32 = 7.0;
pub const SATURN_RADIUS: f32 = 6.0;
pub const SATURN_RING_INNER: f32 = 8.0;
pub const SATURN_RING_OUTER: f32 = 14.0;

/// Exhaust attachment point below the engine bell, in rocket space.
pub const ROCKET_EXHAUST_OFFSET: [f32; 3] = [0.0, -2.4, 0.0];

fn window_or_clamped(
    id: BodyId,
    built: Result<TimelineWindow, TimelineError>,
    fallback: TimelineWindow,
) -> TimelineWindow {
    match built {
        Ok(window) => window,
        Err(e) => {
            log::warn!("[catalog] {:?} window rejected ({}), clamping", id, e);
            fallback.sanitized()
        }
    }
}

fn window(id: BodyId, enter: f32, peak_start: f32, peak_end: f32, exit: f32) -> TimelineWindow {
    window_or_clamped(
        id,
        TimelineWindow::new(enter, peak_start, peak_end, exit),
        TimelineWindow {
            enter_start: enter,
            peak_start,
            peak_end,
            exit_end: Some(exit),
        },
    )
}

fn part(geometry: GeometryRef, shading: ShadingParams, radius: f32) -> BodyPart {
    BodyPart {
        geometry,
        shading,
        local: PartLocal::scaled(radius),
    }
}

pub fn earth(quality: &QualitySettings) -> BodySpec {
    let id = BodyId::Earth;
    let mut parts = vec![part(
        GeometryRef::Sphere,
        ShadingParams::surface(Surface::Earth),
        EARTH_RADIUS,
    )];
    if quality.clouds {
        let mut clouds = part(
            GeometryRef::Shell,
            ShadingParams::surface(Surface::Clouds).with_blend(BlendMode::Alpha),
            3.05,
        );
        clouds.local = clouds.local.with_spin(Vec3::new(0.0, 0.02, 0.0));
        parts.push(clouds);
    }
    parts.push(part(
        GeometryRef::Shell,
        ShadingParams::surface(Surface::Atmosphere)
            .with_tint(hex_rgba(0x4d7fff))
            .with_blend(BlendMode::Additive),
        3.3,
    ));
    BodySpec {
        id,
        window: window(id, 0.20, 0.25, 0.30, 0.36),
        source: ScrollSource::Raw,
        path: PathShape::Slide {
            start: Vec3::new(55.0, 2.0, -10.0),
            slide: Vec3::new(-45.0, 0.0, 0.0),
            exit_drift: Vec3::new(70.0, -15.0, -80.0),
        },
        parked_at: Vec3::new(200.0, -100.0, -200.0),
        scale: 5.5,
        scale_curve: ScaleCurve::Pop,
        base_rotation: Vec3::ZERO,
        spin: Vec3::new(0.0, 0.1, 0.0),
        parts,
    }
}

/// Shares Earth's window and orbits Earth's current position.
pub fn moon(_quality: &QualitySettings) -> BodySpec {
    let id = BodyId::Moon;
    BodySpec {
        id,
        window: window(id, 0.20, 0.25, 0.30, 0.36),
        source: ScrollSource::Raw,
        path: PathShape::Orbit(OrbitPath {
            primary: BodyId::Earth,
            radius: 45.0,
            rate: 0.2,
            bob_height: 8.0,
            bob_ratio: 0.5,
            depth_offset: -10.0,
        }),
        parked_at: Vec3::new(200.0, -100.0, -210.0),
        scale: 2.0,
        scale_curve: ScaleCurve::Linear,
        base_rotation: Vec3::ZERO,
        spin: Vec3::new(0.0, 0.05, 0.0),
        parts: vec![part(GeometryRef::Shell, ShadingParams::surface(Surface::Moon), 1.0)],
    }
}

pub fn mars(quality: &QualitySettings) -> BodySpec {
    let id = BodyId::Mars;
    let mut parts = vec![part(
        GeometryRef::Sphere,
        ShadingParams::surface(Surface::Mars),
        MARS_RADIUS,
    )];
    if quality.atmospheres {
        parts.push(part(
            GeometryRef::Shell,
            ShadingParams::surface(Surface::Atmosphere)
                .with_tint([0.9, 0.4, 0.2, 1.0])
                .with_blend(BlendMode::Additive),
            3.7,
        ));
    }
    BodySpec {
        id,
        window: window(id, 0.32, 0.37, 0.42, 0.48),
        source: ScrollSource::Smoothed(PLANET_LERP_FACTOR),
        path: PathShape::Slide {
            start: Vec3::new(-65.0, 5.0, -15.0),
            slide: Vec3::new(55.0, 0.0, 0.0),
            exit_drift: Vec3::new(-70.0, -15.0, -80.0),
        },
        parked_at: Vec3::new(-200.0, -100.0, -200.0),
        scale: 5.5,
        scale_curve: ScaleCurve::Pop,
        base_rotation: Vec3::ZERO,
        spin: Vec3::new(0.0, 0.015, 0.0),
        parts,
    }
}

pub fn jupiter(_quality: &QualitySettings) -> BodySpec {
    let id = BodyId::Jupiter;
    BodySpec {
        id,
        window: window(id, 0.52, 0.58, 0.72, 0.78),
        source: ScrollSource::Smoothed(PLANET_LERP_FACTOR),
        path: PathShape::Slide {
            start: Vec3::new(120.0, 10.0, -70.0),
            slide: Vec3::new(-100.0, 0.0, 0.0),
            exit_drift: Vec3::new(90.0, 20.0, -100.0),
        },
        parked_at: Vec3::new(250.0, 100.0, -200.0),
        scale: 12.0,
        scale_curve: ScaleCurve::Grow,
        base_rotation: Vec3::ZERO,
        spin: Vec3::new(0.0, 0.008, 0.0),
        parts: vec![part(
            GeometryRef::Sphere,
            ShadingParams::surface(Surface::Jupiter),
            JUPITER_RADIUS,
        )],
    }
}

/// Arrives for the last section and never leaves.
pub fn saturn(_quality: &QualitySettings) -> BodySpec {
    let id = BodyId::Saturn;
    let window = window_or_clamped(
        id,
        TimelineWindow::entry_only(0.80, 1.0),
        TimelineWindow {
            enter_start: 0.80,
            peak_start: 1.0,
            peak_end: 1.0,
            exit_end: None,
        },
    );
    let ring = BodyPart {
        geometry: GeometryRef::SaturnRing,
        shading: ShadingParams::surface(Surface::SaturnRing).with_blend(BlendMode::Alpha),
        local: PartLocal::scaled(SATURN_RING_OUTER).with_rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0)),
    };
    BodySpec {
        id,
        window,
        source: ScrollSource::Smoothed(PLANET_LERP_FACTOR),
        path: PathShape::Slide {
            start: Vec3::new(-85.0, -2.0, -25.0),
            slide: Vec3::new(75.0, 0.0, 0.0),
            exit_drift: Vec3::ZERO,
        },
        parked_at: Vec3::new(-200.0, -2.0, -200.0),
        scale: 4.0,
        scale_curve: ScaleCurve::Grow,
        base_rotation: Vec3::new(0.5, 0.0, 0.15),
        spin: Vec3::new(0.0, 0.004, 0.0),
        parts: vec![
            part(GeometryRef::Sphere, ShadingParams::surface(Surface::Saturn), SATURN_RADIUS),
            ring,
        ],
    }
}

/// Flies toward the camera through the hero section.
pub fn rocket(_quality: &QualitySettings) -> BodySpec {
    let id = BodyId::Rocket;
    let flight = FlightPath {
        travel_end: 0.19,
        start: Vec3::new(-10.0, -20.0, -50.0),
        travel: Vec3::new(18.0, 30.0, 80.0),
        wobble: Wobble {
            amp: Vec3::new(0.3, 0.2, 0.0),
            rate: Vec3::new(1.5, 1.2, 0.0),
            phase: Vec3::new(0.0, FRAC_PI_2, 0.0),
        },
        tilt_start: Vec3::new(0.1, 0.0, -0.15),
        tilt_travel: Vec3::new(-0.15, 0.0, 0.25),
        tilt_wobble: Wobble {
            amp: Vec3::new(0.015, 0.0, 0.02),
            rate: Vec3::new(2.5, 0.0, 3.0),
            phase: Vec3::new(FRAC_PI_2, 0.0, 0.0),
        },
    };
    let flame_offset = Vec3::from_array(ROCKET_EXHAUST_OFFSET);
    BodySpec {
        id,
        window: window(id, 0.0, 0.01, 0.16, 0.19),
        source: ScrollSource::Raw,
        path: PathShape::Flight(flight),
        parked_at: Vec3::new(-10.0, -20.0, -300.0),
        scale: 1.8,
        scale_curve: ScaleCurve::FadeQuadratic,
        base_rotation: Vec3::ZERO,
        spin: Vec3::ZERO,
        parts: vec![
            part(GeometryRef::RocketHull, ShadingParams::surface(Surface::Lit), 1.0),
            BodyPart {
                geometry: GeometryRef::RocketFlame,
                shading: ShadingParams::glow([1.0; 4], BlendMode::Additive),
                local: PartLocal::scaled(1.0).with_offset(flame_offset),
            },
            BodyPart {
                geometry: GeometryRef::Cloud(CloudId::Flame),
                shading: ShadingParams::points(
                    [1.0; 4],
                    PointStyle::new(PointSizing::ViewportScaled, 0.8, 2.0).with_size_scale(0.144),
                ),
                local: PartLocal::scaled(1.0).with_offset(flame_offset),
            },
            BodyPart {
                geometry: GeometryRef::Cloud(CloudId::Smoke),
                shading: ShadingParams::points(
                    hex_rgba(0x888888),
                    PointStyle::new(PointSizing::ViewportScaled, 0.15, 2.0).with_size_scale(0.25),
                ),
                local: PartLocal::scaled(1.0).with_offset(flame_offset),
            },
        ],
    }
}

/// Every windowed body for the given quality, primaries before satellites.
pub fn windowed_bodies(quality: &QualitySettings) -> Vec<BodySpec> {
    vec![
        rocket(quality),
        earth(quality),
        moon(quality),
        mars(quality),
        jupiter(quality),
        saturn(quality),
    ]
}
