use crate::{
	card::InfoCard,
	transition::{BodyPose, EffectKind, RetapPolicy, Transition, TransitionSettings, VisualEffect},
};
use rustc_hash::FxHashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleState {
	#[default]
	Collapsed,
	Expanded,
}
impl ToggleState {
	pub fn toggled(self) -> Self {
		match self {
			ToggleState::Collapsed => ToggleState::Expanded,
			ToggleState::Expanded => ToggleState::Collapsed,
		}
	}
}

#[derive(Debug, Clone, Default)]
struct BodyToggle {
	state: ToggleState,
	transition: Option<Transition>,
}

/// Expanded/collapsed status of every tappable body in the current layout.
#[derive(Debug, Default)]
pub struct ExpansionStates {
	bodies: FxHashMap<String, BodyToggle>,
}
impl ExpansionStates {
	pub fn new<I: Into<String>>(identifiers: impl IntoIterator<Item = I>) -> Self {
		ExpansionStates {
			bodies: identifiers
				.into_iter()
				.map(|identifier| (identifier.into(), BodyToggle::default()))
				.collect(),
		}
	}
	/// Forget every body and start over with a fresh, all collapsed set.
	pub fn reset<I: Into<String>>(&mut self, identifiers: impl IntoIterator<Item = I>) {
		*self = Self::new(identifiers);
	}

	pub fn state(&self, body: &str) -> Option<ToggleState> {
		self.bodies.get(body).map(|b| b.state)
	}
	pub fn expanded(&self) -> impl Iterator<Item = &str> {
		self.bodies
			.iter()
			.filter(|(_, b)| b.state == ToggleState::Expanded)
			.map(|(identifier, _)| identifier.as_str())
	}
	/// Whether the body's last effect is still playing.
	pub fn in_flight(&self, body: &str) -> bool {
		self.bodies
			.get(body)
			.and_then(|b| b.transition.as_ref())
			.is_some_and(|t| !t.finished())
	}
	pub fn len(&self) -> usize {
		self.bodies.len()
	}
	pub fn is_empty(&self) -> bool {
		self.bodies.is_empty()
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardRequest {
	Attach(InfoCard),
	Detach,
}

/// Outcome of a tap: the body's state afterwards plus whatever the renderer should do about it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
	pub body: String,
	pub state: ToggleState,
	pub effect: Option<VisualEffect>,
	pub card: Option<CardRequest>,
}
impl TransitionResult {
	fn unchanged(body: &str, state: ToggleState) -> Self {
		TransitionResult {
			body: body.to_string(),
			state,
			effect: None,
			card: None,
		}
	}
	pub fn is_noop(&self) -> bool {
		self.effect.is_none() && self.card.is_none()
	}
}

/// Drives the two state expand/collapse cycle of tapped bodies.
#[derive(Debug, Clone, Default)]
pub struct ToggleTracker {
	settings: TransitionSettings,
}
impl ToggleTracker {
	pub fn new(settings: TransitionSettings) -> Self {
		ToggleTracker { settings }
	}
	pub fn settings(&self) -> &TransitionSettings {
		&self.settings
	}

	fn rest_pose(&self, state: ToggleState) -> BodyPose {
		match state {
			ToggleState::Collapsed => BodyPose::COLLAPSED,
			ToggleState::Expanded => BodyPose::expanded(&self.settings),
		}
	}

	/// Share of a full transition left between `current` and `target`.
	fn remaining_fraction(&self, current: BodyPose, target: BodyPose) -> f32 {
		let full_scale = (self.settings.expanded_scale - 1.0).abs();
		let full_lift = self.settings.lift.abs();
		let fraction = if full_scale > f32::EPSILON {
			(target.scale - current.scale).abs() / full_scale
		} else if full_lift > f32::EPSILON {
			(target.lift - current.lift).abs() / full_lift
		} else {
			1.0
		};
		fraction.clamp(0.0, 1.0)
	}

	pub fn on_tap(&self, states: &mut ExpansionStates, body: &str) -> TransitionResult {
		let Some(toggle) = states.bodies.get_mut(body) else {
			debug!(body, "Tap on unknown body ignored");
			return TransitionResult::unchanged(body, ToggleState::Collapsed);
		};

		let running = toggle.transition.filter(|t| !t.finished());
		if running.is_some() && self.settings.retap == RetapPolicy::Ignore {
			debug!(body, state = ?toggle.state, "Tap during transition ignored");
			return TransitionResult::unchanged(body, toggle.state);
		}

		let current = running
			.map(|t| t.pose())
			.unwrap_or_else(|| self.rest_pose(toggle.state));
		let state = toggle.state.toggled();
		let target = self.rest_pose(state);
		let effect = VisualEffect {
			kind: match state {
				ToggleState::Expanded => EffectKind::RaiseAndScaleUp,
				ToggleState::Collapsed => EffectKind::LowerAndScaleDown,
			},
			from: current,
			to: target,
			duration: self.settings.duration * self.remaining_fraction(current, target),
		};
		let card = match state {
			ToggleState::Expanded => CardRequest::Attach(InfoCard::for_body(body)),
			ToggleState::Collapsed => CardRequest::Detach,
		};

		toggle.state = state;
		toggle.transition = Some(Transition::from_effect(&effect));
		debug!(body, ?state, duration = effect.duration, "Toggled body");

		TransitionResult {
			body: body.to_string(),
			state,
			effect: Some(effect),
			card: Some(card),
		}
	}

	/// Advance running transitions by `delta` seconds. Run once every frame.
	pub fn update(&self, states: &mut ExpansionStates, delta: f32) {
		for toggle in states.bodies.values_mut() {
			if let Some(transition) = &mut toggle.transition {
				transition.update(delta);
				if transition.finished() {
					toggle.transition = None;
				}
			}
		}
	}

	/// Where a body currently is relative to its resting placement.
	pub fn pose(&self, states: &ExpansionStates, body: &str) -> Option<BodyPose> {
		let toggle = states.bodies.get(body)?;
		Some(
			toggle
				.transition
				.map(|t| t.pose())
				.unwrap_or_else(|| self.rest_pose(toggle.state)),
		)
	}
}

#[test]
fn alternates_strictly() {
	let tracker = ToggleTracker::default();
	let mut states = ExpansionStates::new(["earth", "mars"]);
	assert_eq!(states.state("earth"), Some(ToggleState::Collapsed));

	assert_eq!(tracker.on_tap(&mut states, "earth").state, ToggleState::Expanded);
	assert_eq!(tracker.on_tap(&mut states, "earth").state, ToggleState::Collapsed);
	assert_eq!(tracker.on_tap(&mut states, "earth").state, ToggleState::Expanded);
	assert_eq!(states.state("mars"), Some(ToggleState::Collapsed));
	assert_eq!(states.expanded().collect::<Vec<_>>(), vec!["earth"]);
}

#[test]
fn earth_expands_with_card_then_collapses() {
	let tracker = ToggleTracker::default();
	let mut states = ExpansionStates::new(crate::bodies::SOLAR_SYSTEM.iter().map(|b| b.identifier));

	let expanded = tracker.on_tap(&mut states, "earth");
	assert_eq!(expanded.state, ToggleState::Expanded);
	assert_eq!(
		expanded.card,
		Some(CardRequest::Attach(InfoCard {
			name: "earth".to_string(),
			distance_au: 1.0,
			codename: "Terra".to_string(),
		}))
	);
	let effect = expanded.effect.unwrap();
	assert_eq!(effect.kind, EffectKind::RaiseAndScaleUp);
	assert_eq!(effect.from, BodyPose::COLLAPSED);
	assert_eq!(effect.to, BodyPose { lift: 0.2, scale: 1.5 });
	assert_eq!(effect.duration, 0.5);

	tracker.update(&mut states, 1.0);
	let collapsed = tracker.on_tap(&mut states, "earth");
	assert_eq!(collapsed.state, ToggleState::Collapsed);
	assert_eq!(collapsed.card, Some(CardRequest::Detach));
	let effect = collapsed.effect.unwrap();
	assert_eq!(effect.kind, EffectKind::LowerAndScaleDown);
	assert_eq!(effect.to, BodyPose::COLLAPSED);
	assert!((effect.duration - 0.5).abs() < 1e-6);
}

#[test]
fn unknown_body_is_noop() {
	let tracker = ToggleTracker::default();
	let mut states = ExpansionStates::new(["earth"]);
	let result = tracker.on_tap(&mut states, "pluto");
	assert!(result.is_noop());
	assert_eq!(result.state, ToggleState::Collapsed);
	assert_eq!(states.len(), 1);
	assert!(states.state("pluto").is_none());
}

#[test]
fn replace_reverses_from_current_pose() {
	let tracker = ToggleTracker::default();
	let mut states = ExpansionStates::new(["venus"]);
	tracker.on_tap(&mut states, "venus");
	tracker.update(&mut states, 0.2);
	assert!(states.in_flight("venus"));

	let result = tracker.on_tap(&mut states, "venus");
	assert_eq!(result.state, ToggleState::Collapsed);
	let effect = result.effect.unwrap();
	assert!((effect.from.scale - 1.2).abs() < 1e-5);
	assert!((effect.from.lift - 0.08).abs() < 1e-5);
	assert!((effect.duration - 0.2).abs() < 1e-5);

	tracker.update(&mut states, 0.25);
	assert!(!states.in_flight("venus"));
	assert_eq!(tracker.pose(&states, "venus"), Some(BodyPose::COLLAPSED));
}

#[test]
fn ignore_drops_taps_mid_transition() {
	let tracker = ToggleTracker::new(TransitionSettings {
		retap: RetapPolicy::Ignore,
		..Default::default()
	});
	let mut states = ExpansionStates::new(["jupiter"]);
	tracker.on_tap(&mut states, "jupiter");
	tracker.update(&mut states, 0.1);

	let ignored = tracker.on_tap(&mut states, "jupiter");
	assert!(ignored.is_noop());
	assert_eq!(ignored.state, ToggleState::Expanded);

	tracker.update(&mut states, 0.5);
	let collapsed = tracker.on_tap(&mut states, "jupiter");
	assert_eq!(collapsed.state, ToggleState::Collapsed);
	assert_eq!(collapsed.card, Some(CardRequest::Detach));
}

#[test]
fn reset_collapses_everything() {
	let tracker = ToggleTracker::default();
	let mut states = ExpansionStates::new(["earth", "mars"]);
	tracker.on_tap(&mut states, "earth");
	states.reset(["saturn"]);
	assert_eq!(states.expanded().count(), 0);
	assert!(states.state("earth").is_none());
	assert_eq!(states.state("saturn"), Some(ToggleState::Collapsed));
}
