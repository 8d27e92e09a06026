//! Interfaces to the tracking and rendering collaborators that host the orrery.

use crate::{
	card::{CardSettings, InfoCard},
	orbit::BodyPlacement,
	transition::VisualEffect,
};
use glam::Vec3;
use mint::{Vector2, Vector3};

/// World space point a layout is centered on, taken from a surface hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPoint(Vec3);
impl AnchorPoint {
	pub fn new(position: impl Into<Vector3<f32>>) -> Self {
		AnchorPoint(Vec3::from(position.into()))
	}
	pub fn position(&self) -> Vec3 {
		self.0
	}
}

/// How a restarted tracking session treats what it already knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartOptions {
	pub reset_tracking: bool,
	pub remove_anchors: bool,
}

/// Surface detection and hit testing, backed by the platform's world tracking.
pub trait SurfaceProvider {
	/// Center of the viewport in screen coordinates, used as the placement reticle.
	fn screen_center(&self) -> Vector2<f32>;
	/// Hit test the detected horizontal planes at a screen location.
	fn anchor_at(&mut self, screen: Vector2<f32>) -> Option<AnchorPoint>;
	/// Hit test placed geometry, returning the identifier of the body under the screen location.
	fn hit_body(&mut self, screen: Vector2<f32>) -> Option<String>;
	/// (Re)start world tracking with horizontal plane detection.
	fn restart(&mut self, options: RestartOptions);
}

/// Scene graph commands. Everything here is fire-and-forget.
pub trait SceneRenderer {
	/// Remove every node previously placed by the orrery.
	fn clear(&mut self);
	fn place_body(&mut self, body: &BodyPlacement);
	fn draw_ring(&mut self, points: &[Vec3], dot_radius: f32);
	/// Start animating a body. A new effect on the same body replaces the running one.
	fn play_effect(&mut self, body: &str, effect: &VisualEffect);
	fn attach_card(&mut self, body: &str, card: &InfoCard, settings: &CardSettings);
	fn detach_card(&mut self, body: &str);
}
