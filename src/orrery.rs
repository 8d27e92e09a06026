use crate::{
	bodies::{CelestialBody, SOLAR_SYSTEM},
	card::CardSettings,
	error::OrreryResult,
	orbit::{Layout, DEFAULT_RING_SAMPLES},
	scene::{AnchorPoint, SceneRenderer, SurfaceProvider},
	session::SessionStatus,
	toggle::{CardRequest, ExpansionStates, ToggleTracker, TransitionResult},
	transition::TransitionSettings,
};
use mint::Vector2;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

/// Where placement taps hit test the detected surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementTarget {
	/// Always the middle of the screen, wherever the tap was
	#[default]
	ScreenCenter,
	TapLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrrerySettings {
	pub ring_samples: usize,
	pub dot_radius: f32,
	pub placement: PlacementTarget,
	pub transition: TransitionSettings,
	pub card: CardSettings,
}
impl Default for OrrerySettings {
	fn default() -> Self {
		Self {
			ring_samples: DEFAULT_RING_SAMPLES,
			dot_radius: 0.001,
			placement: PlacementTarget::ScreenCenter,
			transition: TransitionSettings::default(),
			card: CardSettings::default(),
		}
	}
}
impl OrrerySettings {
	/// Parse settings from TOML, anything missing keeps its default.
	pub fn from_toml_str(source: &str) -> OrreryResult<Self> {
		Ok(toml::from_str(source)?)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum TapOutcome {
	/// Nothing was hit and no surface was found
	Nothing,
	Placed(AnchorPoint),
	Toggled(TransitionResult),
}

/// A tabletop solar system: tap a surface to place it, tap a body to inspect it.
pub struct Orrery<P: SurfaceProvider, S: SceneRenderer> {
	surface: P,
	scene: S,
	settings: OrrerySettings,
	bodies: Vec<CelestialBody>,
	tracker: ToggleTracker,
	states: ExpansionStates,
	layout: Option<Layout>,
	session: Option<watch::Receiver<SessionStatus>>,
}
impl<P: SurfaceProvider, S: SceneRenderer> Orrery<P, S> {
	pub fn new(surface: P, scene: S, settings: OrrerySettings) -> Self {
		Self::with_bodies(surface, scene, settings, SOLAR_SYSTEM.to_vec())
	}
	pub fn with_bodies(
		surface: P,
		scene: S,
		settings: OrrerySettings,
		bodies: Vec<CelestialBody>,
	) -> Self {
		Orrery {
			surface,
			scene,
			tracker: ToggleTracker::new(settings.transition),
			settings,
			bodies,
			states: ExpansionStates::default(),
			layout: None,
			session: None,
		}
	}

	pub fn surface(&self) -> &P {
		&self.surface
	}
	pub fn surface_mut(&mut self) -> &mut P {
		&mut self.surface
	}
	pub fn scene(&self) -> &S {
		&self.scene
	}
	pub fn settings(&self) -> &OrrerySettings {
		&self.settings
	}
	pub fn layout(&self) -> Option<&Layout> {
		self.layout.as_ref()
	}
	pub fn states(&self) -> &ExpansionStates {
		&self.states
	}
	pub fn tracker(&self) -> &ToggleTracker {
		&self.tracker
	}

	/// Follow the tracking session so its status can be shown to the user.
	pub fn watch_session(&mut self, status: watch::Receiver<SessionStatus>) {
		self.session.replace(status);
	}
	pub fn session_status(&self) -> Option<SessionStatus> {
		self.session.as_ref().map(|s| s.borrow().clone())
	}

	/// Handle a tap on the screen: toggle the body under it, or place a new solar system.
	pub fn tap(&mut self, screen: impl Into<Vector2<f32>>) -> OrreryResult<TapOutcome> {
		let screen = screen.into();
		if self.layout.is_some() {
			if let Some(body) = self.surface.hit_body(screen) {
				return Ok(TapOutcome::Toggled(self.toggle(&body)));
			}
		}

		let target = match self.settings.placement {
			PlacementTarget::ScreenCenter => self.surface.screen_center(),
			PlacementTarget::TapLocation => screen,
		};
		let Some(anchor) = self.surface.anchor_at(target) else {
			info!("No surface detected");
			return Ok(TapOutcome::Nothing);
		};
		self.place(anchor)?;
		Ok(TapOutcome::Placed(anchor))
	}

	/// Put a fresh solar system at `anchor`, replacing any previous one.
	pub fn place(&mut self, anchor: AnchorPoint) -> OrreryResult<()> {
		let layout = Layout::compute(anchor, &self.bodies, self.settings.ring_samples)?;
		if self.layout.is_some() {
			self.scene.clear();
		}

		for ring in &layout.rings {
			self.scene
				.draw_ring(&ring.positions(anchor.position()), self.settings.dot_radius);
		}
		for body in &layout.bodies {
			debug!(body = body.identifier, position = ?body.position, "Placing body");
			self.scene.place_body(body);
		}
		self.states.reset(layout.identifiers());
		info!(anchor = ?anchor.position(), bodies = layout.bodies.len(), "Placed solar system");
		self.layout.replace(layout);
		Ok(())
	}

	/// Toggle a body by identifier, forwarding the resulting requests to the renderer.
	pub fn toggle(&mut self, body: &str) -> TransitionResult {
		let result = self.tracker.on_tap(&mut self.states, body);
		if let Some(effect) = &result.effect {
			self.scene.play_effect(body, effect);
		}
		match &result.card {
			Some(CardRequest::Attach(card)) => {
				self.scene.attach_card(body, card, &self.settings.card)
			}
			Some(CardRequest::Detach) => self.scene.detach_card(body),
			None => (),
		}
		result
	}

	/// Advance in-flight transitions and pick up session changes. Run once every frame.
	pub fn update(&mut self, delta: f32) {
		self.tracker.update(&mut self.states, delta);
		if let Some(session) = &mut self.session {
			if session.has_changed().unwrap_or(false) {
				let status = session.borrow_and_update().clone();
				info!(state = ?status.state, message = ?status.message, "Tracking session changed");
			}
		}
	}
}

#[cfg(test)]
use crate::{
	card::InfoCard,
	orbit::BodyPlacement,
	scene::RestartOptions,
	toggle::ToggleState,
	transition::{EffectKind, VisualEffect},
};

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
enum Recorded {
	Clear,
	Body(&'static str),
	Ring(usize),
	Effect(String, EffectKind),
	Attach(String, String),
	Detach(String),
}

#[cfg(test)]
#[derive(Default)]
struct RecordingScene(Vec<Recorded>);
#[cfg(test)]
impl SceneRenderer for RecordingScene {
	fn clear(&mut self) {
		self.0.push(Recorded::Clear);
	}
	fn place_body(&mut self, body: &BodyPlacement) {
		self.0.push(Recorded::Body(body.identifier));
	}
	fn draw_ring(&mut self, points: &[glam::Vec3], _dot_radius: f32) {
		self.0.push(Recorded::Ring(points.len()));
	}
	fn play_effect(&mut self, body: &str, effect: &VisualEffect) {
		self.0.push(Recorded::Effect(body.to_string(), effect.kind));
	}
	fn attach_card(&mut self, body: &str, card: &InfoCard, _settings: &CardSettings) {
		self.0.push(Recorded::Attach(body.to_string(), card.text()));
	}
	fn detach_card(&mut self, body: &str) {
		self.0.push(Recorded::Detach(body.to_string()));
	}
}

/// Resolves taps at x = 100 to earth and x = 200 to an orbit dot.
#[cfg(test)]
#[derive(Default)]
struct TableSurface {
	surface_found: bool,
	hits: Vec<Vector2<f32>>,
	restarts: Vec<RestartOptions>,
}
#[cfg(test)]
impl SurfaceProvider for TableSurface {
	fn screen_center(&self) -> Vector2<f32> {
		[50.0, 50.0].into()
	}
	fn anchor_at(&mut self, screen: Vector2<f32>) -> Option<AnchorPoint> {
		self.hits.push(screen);
		self.surface_found
			.then(|| AnchorPoint::new([0.0, -0.5, -1.0]))
	}
	fn hit_body(&mut self, screen: Vector2<f32>) -> Option<String> {
		match screen.x as i32 {
			100 => Some("earth".to_string()),
			200 => Some("orbit-dot".to_string()),
			_ => None,
		}
	}
	fn restart(&mut self, options: RestartOptions) {
		self.restarts.push(options);
	}
}

#[test]
fn no_surface_is_noop() {
	let mut orrery = Orrery::new(
		TableSurface::default(),
		RecordingScene::default(),
		OrrerySettings::default(),
	);
	assert_eq!(orrery.tap([10.0, 20.0]).unwrap(), TapOutcome::Nothing);
	assert!(orrery.layout().is_none());
	assert!(orrery.scene().0.is_empty());
	// placement hit tests the reticle, not the tap
	assert_eq!(orrery.surface().hits[0].x, 50.0);
}

#[test]
fn placing_draws_rings_and_bodies() {
	let surface = TableSurface {
		surface_found: true,
		..Default::default()
	};
	let mut orrery = Orrery::new(surface, RecordingScene::default(), OrrerySettings::default());
	assert!(matches!(orrery.tap([10.0, 20.0]).unwrap(), TapOutcome::Placed(_)));

	let recorded = &orrery.scene().0;
	assert_eq!(recorded.iter().filter(|r| **r == Recorded::Ring(100)).count(), 8);
	let bodies: Vec<_> = recorded
		.iter()
		.filter_map(|r| match r {
			Recorded::Body(identifier) => Some(*identifier),
			_ => None,
		})
		.collect();
	assert_eq!(bodies, SOLAR_SYSTEM.iter().map(|b| b.identifier).collect::<Vec<_>>());
	assert_eq!(orrery.states().len(), 9);
}

#[test]
fn tapping_a_body_toggles_it() {
	let surface = TableSurface {
		surface_found: true,
		..Default::default()
	};
	let mut orrery = Orrery::new(surface, RecordingScene::default(), OrrerySettings::default());
	orrery.tap([0.0, 0.0]).unwrap();
	let placed = orrery.scene().0.len();

	let TapOutcome::Toggled(result) = orrery.tap([100.0, 0.0]).unwrap() else {
		panic!("expected a toggle");
	};
	assert_eq!(result.state, ToggleState::Expanded);
	assert_eq!(
		orrery.scene().0[placed..],
		[
			Recorded::Effect("earth".to_string(), EffectKind::RaiseAndScaleUp),
			Recorded::Attach(
				"earth".to_string(),
				"Name: earth\nDistance: 1.00 AU\nCodename: Terra".to_string()
			),
		]
	);

	orrery.update(0.1);
	let TapOutcome::Toggled(result) = orrery.tap([100.0, 0.0]).unwrap() else {
		panic!("expected a toggle");
	};
	assert_eq!(result.state, ToggleState::Collapsed);
	assert_eq!(
		orrery.scene().0.last(),
		Some(&Recorded::Detach("earth".to_string()))
	);
	assert_eq!(orrery.states().expanded().count(), 0);
}

#[test]
fn tapping_unknown_geometry_changes_nothing() {
	let surface = TableSurface {
		surface_found: true,
		..Default::default()
	};
	let mut orrery = Orrery::new(surface, RecordingScene::default(), OrrerySettings::default());
	orrery.tap([0.0, 0.0]).unwrap();
	let placed = orrery.scene().0.len();

	let TapOutcome::Toggled(result) = orrery.tap([200.0, 0.0]).unwrap() else {
		panic!("expected a toggle attempt");
	};
	assert!(result.is_noop());
	assert_eq!(orrery.scene().0.len(), placed);
	// hitting placed geometry never falls through to a new placement
	assert_eq!(orrery.surface().hits.len(), 1);
}

#[test]
fn placing_again_replaces_the_system() {
	let surface = TableSurface {
		surface_found: true,
		..Default::default()
	};
	let mut orrery = Orrery::new(surface, RecordingScene::default(), OrrerySettings::default());
	orrery.tap([0.0, 0.0]).unwrap();
	orrery.toggle("earth");
	orrery.tap([0.0, 0.0]).unwrap();

	assert_eq!(
		orrery.scene().0.iter().filter(|r| **r == Recorded::Clear).count(),
		1
	);
	assert_eq!(orrery.states().state("earth"), Some(ToggleState::Collapsed));
}

#[test]
fn empty_body_set_fails_placement() {
	let surface = TableSurface {
		surface_found: true,
		..Default::default()
	};
	let mut orrery = Orrery::with_bodies(
		surface,
		RecordingScene::default(),
		OrrerySettings::default(),
		Vec::new(),
	);
	assert!(matches!(
		orrery.tap([0.0, 0.0]),
		Err(crate::error::OrreryError::InvalidArgument(_))
	));
	assert!(orrery.scene().0.is_empty());
}

#[test]
fn tap_location_placement() {
	let surface = TableSurface {
		surface_found: true,
		..Default::default()
	};
	let settings = OrrerySettings {
		placement: PlacementTarget::TapLocation,
		..Default::default()
	};
	let mut orrery = Orrery::new(surface, RecordingScene::default(), settings);
	orrery.tap([12.0, 34.0]).unwrap();
	assert_eq!(orrery.surface().hits[0].y, 34.0);
	orrery.surface_mut().restart(RestartOptions {
		reset_tracking: true,
		remove_anchors: false,
	});
	assert_eq!(orrery.surface().restarts.len(), 1);
}

#[test]
fn settings_from_toml() {
	let settings = OrrerySettings::from_toml_str(
		r#"
		ring_samples = 48
		placement = "tap_location"

		[transition]
		duration = 0.25
		retap = "ignore"
		"#,
	)
	.unwrap();
	assert_eq!(settings.ring_samples, 48);
	assert_eq!(settings.placement, PlacementTarget::TapLocation);
	assert_eq!(settings.transition.duration, 0.25);
	assert_eq!(settings.transition.lift, 0.2);
	assert_eq!(settings.transition.retap, crate::transition::RetapPolicy::Ignore);
	assert_eq!(settings.card, CardSettings::default());

	assert!(matches!(
		OrrerySettings::from_toml_str("ring_samples = \"lots\""),
		Err(crate::error::OrreryError::Settings(_))
	));
}

#[test]
fn follows_session_status() {
	use crate::session::{SessionEvent, SessionLifecycle, SessionState};

	let mut lifecycle = SessionLifecycle::new();
	let mut orrery = Orrery::new(
		TableSurface::default(),
		RecordingScene::default(),
		OrrerySettings::default(),
	);
	orrery.watch_session(lifecycle.subscribe());
	lifecycle.handle(SessionEvent::Started);
	lifecycle.handle(SessionEvent::Interrupted);
	orrery.update(0.016);
	assert_eq!(
		orrery.session_status().map(|s| s.state),
		Some(SessionState::Interrupted)
	);
}
