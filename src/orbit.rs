use crate::{
	bodies::CelestialBody,
	error::{OrreryError, OrreryResult},
	scene::AnchorPoint,
};
use glam::{vec3, Vec3};
use rustc_hash::FxHashMap;
use std::f32::consts::TAU;

pub const DEFAULT_RING_SAMPLES: usize = 100;

/// Offset of a point on a horizontal circle (in the XZ plane).
fn horizontal_offset(radius: f32, angle: f32) -> Vec3 {
	let (sin, cos) = angle.sin_cos();
	vec3(radius * cos, 0.0, radius * sin)
}

/// Evenly spaced points on a horizontal ring around `center`.
pub fn ring_positions(center: Vec3, radius: f32, sample_count: usize) -> Vec<Vec3> {
	(0..sample_count)
		.map(|i| (i as f32) * TAU / (sample_count as f32))
		.map(|angle| center + horizontal_offset(radius, angle))
		.collect()
}

/// Place each body on its own orbit, spreading them evenly by index rather than by real orbital angle.
pub fn body_positions<'a>(
	center: Vec3,
	bodies: &'a [CelestialBody],
) -> OrreryResult<FxHashMap<&'a str, Vec3>> {
	if bodies.is_empty() {
		return Err(OrreryError::InvalidArgument(
			"cannot lay out an empty set of bodies".to_string(),
		));
	}

	let count = bodies.len() as f32;
	let mut positions = FxHashMap::default();
	for (index, body) in bodies.iter().enumerate() {
		let angle = TAU * (index as f32) / count;
		let position = center + horizontal_offset(body.orbit_radius, angle);
		if positions.insert(body.identifier, position).is_some() {
			return Err(OrreryError::InvalidArgument(format!(
				"duplicate body identifier {:?}",
				body.identifier
			)));
		}
	}
	Ok(positions)
}

/// Decorative dotted orbit marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitRing {
	pub radius: f32,
	pub sample_count: usize,
}
impl OrbitRing {
	pub fn new(radius: f32) -> Self {
		OrbitRing {
			radius,
			sample_count: DEFAULT_RING_SAMPLES,
		}
	}
	pub fn positions(&self, center: Vec3) -> Vec<Vec3> {
		ring_positions(center, self.radius, self.sample_count)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyPlacement {
	pub identifier: &'static str,
	pub position: Vec3,
	pub visual_radius: f32,
	pub texture_key: &'static str,
}

/// Everything needed to put one solar system into the scene.
#[derive(Debug, Clone)]
pub struct Layout {
	pub anchor: AnchorPoint,
	pub rings: Vec<OrbitRing>,
	pub bodies: Vec<BodyPlacement>,
}
impl Layout {
	/// Rings are only produced for non-zero orbit radii, a body sitting on the anchor gets none.
	pub fn compute(
		anchor: AnchorPoint,
		bodies: &[CelestialBody],
		ring_samples: usize,
	) -> OrreryResult<Self> {
		let center = anchor.position();
		let positions = body_positions(center, bodies)?;

		// zero radius rings would collapse into the body at the anchor
		let mut rings: Vec<OrbitRing> = Vec::new();
		for body in bodies {
			if body.orbit_radius <= 0.0 || rings.iter().any(|r| r.radius == body.orbit_radius) {
				continue;
			}
			rings.push(OrbitRing {
				radius: body.orbit_radius,
				sample_count: ring_samples,
			});
		}

		let bodies = bodies
			.iter()
			.filter_map(|body| {
				Some(BodyPlacement {
					identifier: body.identifier,
					position: *positions.get(body.identifier)?,
					visual_radius: body.visual_radius,
					texture_key: body.texture_key,
				})
			})
			.collect();

		Ok(Layout {
			anchor,
			rings,
			bodies,
		})
	}

	pub fn contains(&self, identifier: &str) -> bool {
		self.bodies.iter().any(|b| b.identifier == identifier)
	}
	pub fn identifiers(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.bodies.iter().map(|b| b.identifier)
	}
}

#[test]
fn ring_points_lie_on_circle() {
	let center = vec3(0.3, -0.5, 1.2);
	let radius = 0.175;
	let points = ring_positions(center, radius, 100);
	assert_eq!(points.len(), 100);
	for point in &points {
		assert!((point.distance(center) - radius).abs() < 1e-5);
		assert!((point.y - center.y).abs() < 1e-6);
	}
	let step = TAU / 100.0;
	for pair in points.windows(2) {
		let angle = (pair[0] - center).angle_between(pair[1] - center);
		assert!((angle - step).abs() < 1e-3, "{angle} vs {step}");
	}
	assert!((points[0] - vec3(0.475, -0.5, 1.2)).length() < 1e-6);
}

#[test]
fn ring_without_samples_is_empty() {
	assert!(ring_positions(Vec3::ZERO, 1.0, 0).is_empty());
	assert_eq!(OrbitRing::new(0.5).positions(Vec3::ZERO).len(), DEFAULT_RING_SAMPLES);
}

#[test]
fn two_bodies_sit_opposite() {
	let bodies = [
		CelestialBody::new("mercury", 0.075, 0.01, "mercury.jpg"),
		CelestialBody::new("venus", 0.125, 0.015, "venus.jpg"),
	];
	let positions = body_positions(Vec3::ZERO, &bodies).unwrap();
	assert_eq!(positions.len(), 2);
	assert!((positions["mercury"] - vec3(0.075, 0.0, 0.0)).length() < 1e-6);
	assert!((positions["venus"] - vec3(-0.125, 0.0, 0.0)).length() < 1e-6);
}

#[test]
fn solar_system_is_spread_evenly() {
	let bodies = crate::bodies::SOLAR_SYSTEM;
	let center = vec3(1.0, 0.0, -2.0);
	let positions = body_positions(center, &bodies).unwrap();
	assert_eq!(positions.len(), bodies.len());
	for body in &bodies {
		let offset = positions[body.identifier] - center;
		assert!((offset.length() - body.orbit_radius).abs() < 1e-5);
		assert_eq!(offset.y, 0.0);
	}
	let step = TAU / bodies.len() as f32;
	for (index, body) in bodies.iter().enumerate().skip(1) {
		let offset = positions[body.identifier] - center;
		let angle = offset.z.atan2(offset.x).rem_euclid(TAU);
		assert!((angle - step * index as f32).abs() < 1e-4, "{}", body.identifier);
	}
}

#[test]
fn invalid_body_sets_are_rejected() {
	assert!(matches!(
		body_positions(Vec3::ZERO, &[]),
		Err(OrreryError::InvalidArgument(_))
	));
	let duplicated = [
		CelestialBody::new("earth", 0.1, 0.02, "earth.jpg"),
		CelestialBody::new("earth", 0.2, 0.02, "earth.jpg"),
	];
	assert!(matches!(
		body_positions(Vec3::ZERO, &duplicated),
		Err(OrreryError::InvalidArgument(_))
	));
}

#[test]
fn layout_skips_degenerate_rings() {
	let anchor = AnchorPoint::new([0.0, -0.4, -1.0]);
	let layout = Layout::compute(anchor, &crate::bodies::SOLAR_SYSTEM, 64).unwrap();
	assert_eq!(layout.bodies.len(), 9);
	assert_eq!(layout.rings.len(), 8);
	assert!(layout.rings.iter().all(|r| r.sample_count == 64 && r.radius > 0.0));
	assert_eq!(layout.bodies[0].position, anchor.position());
	assert!(layout.contains("saturn"));
	assert!(!layout.contains("pluto"));
}
