use crate::{
	card::{CardSettings, InfoCard},
	orbit::BodyPlacement,
	scene::{AnchorPoint, RestartOptions, SceneRenderer, SurfaceProvider},
	transition::VisualEffect,
};
use glam::Vec3;
use mint::Vector2;

/// Collaborator that finds no surfaces, hits nothing and draws nothing.
pub struct DummyHandler;

// Tracking
impl SurfaceProvider for DummyHandler {
	fn screen_center(&self) -> Vector2<f32> {
		[0.0, 0.0].into()
	}
	fn anchor_at(&mut self, _screen: Vector2<f32>) -> Option<AnchorPoint> {
		None
	}
	fn hit_body(&mut self, _screen: Vector2<f32>) -> Option<String> {
		None
	}
	fn restart(&mut self, _options: RestartOptions) {}
}

// Rendering
impl SceneRenderer for DummyHandler {
	fn clear(&mut self) {}
	fn place_body(&mut self, _body: &BodyPlacement) {}
	fn draw_ring(&mut self, _points: &[Vec3], _dot_radius: f32) {}
	fn play_effect(&mut self, _body: &str, _effect: &VisualEffect) {}
	fn attach_card(&mut self, _body: &str, _card: &InfoCard, _settings: &CardSettings) {}
	fn detach_card(&mut self, _body: &str) {}
}

#[test]
fn dummy_orrery_never_places() {
	let mut orrery = crate::Orrery::new(DummyHandler, DummyHandler, Default::default());
	assert_eq!(orrery.tap([0.0, 0.0]).unwrap(), crate::TapOutcome::Nothing);
	assert!(orrery.layout().is_none());
	assert!(orrery.toggle("earth").is_noop());
}
