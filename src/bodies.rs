use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

/// A placeable sphere in the orrery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialBody {
	/// Unique among the bodies of one layout, also what hit tests resolve to
	pub identifier: &'static str,
	/// Distance from the anchor in meters
	pub orbit_radius: f32,
	/// Sphere radius in meters
	pub visual_radius: f32,
	pub texture_key: &'static str,
}
impl CelestialBody {
	pub const fn new(
		identifier: &'static str,
		orbit_radius: f32,
		visual_radius: f32,
		texture_key: &'static str,
	) -> Self {
		CelestialBody {
			identifier,
			orbit_radius,
			visual_radius,
			texture_key,
		}
	}
}

/// The sun and eight planets in placement order.
///
/// Planets are oversized relative to the sun to stay tappable at tabletop scale.
pub const SOLAR_SYSTEM: [CelestialBody; 9] = [
	CelestialBody::new("sun", 0.0, 0.05, "sun.jpg"),
	CelestialBody::new("mercury", 0.075, 0.01, "mercury.jpg"),
	CelestialBody::new("venus", 0.125, 0.015, "venus.jpg"),
	CelestialBody::new("earth", 0.175, 0.02, "earth.jpg"),
	CelestialBody::new("mars", 0.225, 0.0175, "mars.jpg"),
	CelestialBody::new("jupiter", 0.275, 0.04, "jupiter.jpg"),
	CelestialBody::new("saturn", 0.325, 0.035, "saturn.jpg"),
	CelestialBody::new("uranus", 0.375, 0.025, "uranus.jpg"),
	CelestialBody::new("neptune", 0.425, 0.0225, "neptune.jpg"),
];

/// Reference facts shown on a body's info card.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyFacts {
	/// Mean distance from the sun in astronomical units
	pub distance_au: f32,
	pub codename: &'static str,
}

lazy_static! {
	static ref BODY_FACTS: FxHashMap<&'static str, BodyFacts> = [
		("mercury", 0.39, "Hermes"),
		("venus", 0.72, "Aphrodite"),
		("earth", 1.0, "Terra"),
		("mars", 1.52, "Ares"),
		("jupiter", 5.20, "Zeus"),
		("saturn", 9.58, "Cronus"),
		("uranus", 19.22, "Uranus"),
		("neptune", 30.05, "Poseidon"),
	]
	.into_iter()
	.map(|(identifier, distance_au, codename)| {
		(
			identifier,
			BodyFacts {
				distance_au,
				codename,
			},
		)
	})
	.collect();
}

/// Look up the reference facts for a body, falling back to an empty entry for unknown identifiers.
pub fn facts(identifier: &str) -> BodyFacts {
	BODY_FACTS.get(identifier).copied().unwrap_or_default()
}

/// Find a body of the built-in catalogue by identifier.
pub fn find(identifier: &str) -> Option<&'static CelestialBody> {
	SOLAR_SYSTEM.iter().find(|b| b.identifier == identifier)
}

#[test]
fn catalogue_identifiers_are_unique() {
	let identifiers = rustc_hash::FxHashSet::from_iter(SOLAR_SYSTEM.iter().map(|b| b.identifier));
	assert_eq!(identifiers.len(), SOLAR_SYSTEM.len());
	assert_eq!(SOLAR_SYSTEM[0].identifier, "sun");
	assert_eq!(SOLAR_SYSTEM[0].orbit_radius, 0.0);
}

#[test]
fn facts_lookup() {
	let earth = facts("earth");
	assert_eq!(earth.distance_au, 1.0);
	assert_eq!(earth.codename, "Terra");
	assert_eq!(facts("neptune").codename, "Poseidon");

	assert_eq!(facts("sun"), BodyFacts::default());
	assert_eq!(facts("pluto").distance_au, 0.0);
	assert_eq!(facts("pluto").codename, "");
}

#[test]
fn every_planet_has_facts() {
	for body in SOLAR_SYSTEM.iter().skip(1) {
		assert!(facts(body.identifier).distance_au > 0.0, "{}", body.identifier);
	}
	assert_eq!(find("mars").map(|b| b.visual_radius), Some(0.0175));
	assert!(find("vulcan").is_none());
}
