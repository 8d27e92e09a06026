use glam::{Mat4, Quat, Vec3};
use lerp::Lerp;
use map_range::MapRange;
use serde::{Deserialize, Serialize};

/// What happens when a body is tapped again before its transition has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetapPolicy {
	/// Abandon the running transition and head back from wherever the body currently is.
	#[default]
	Replace,
	/// Drop the tap, the body finishes its current transition first.
	Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
	/// How far an expanded body rises above its orbit, in meters
	pub lift: f32,
	pub expanded_scale: f32,
	/// Seconds for a full collapse or expansion
	pub duration: f32,
	pub retap: RetapPolicy,
}
impl Default for TransitionSettings {
	fn default() -> Self {
		Self {
			lift: 0.2,
			expanded_scale: 1.5,
			duration: 0.5,
			retap: RetapPolicy::Replace,
		}
	}
}

/// Offset of a body from its resting placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
	pub lift: f32,
	pub scale: f32,
}
impl BodyPose {
	pub const COLLAPSED: BodyPose = BodyPose {
		lift: 0.0,
		scale: 1.0,
	};

	pub fn expanded(settings: &TransitionSettings) -> Self {
		BodyPose {
			lift: settings.lift,
			scale: settings.expanded_scale,
		}
	}

	/// World transform of a body resting at `position` when in this pose.
	pub fn transform(&self, position: Vec3) -> Mat4 {
		Mat4::from_scale_rotation_translation(
			Vec3::splat(self.scale),
			Quat::IDENTITY,
			position + Vec3::Y * self.lift,
		)
	}
}
impl Default for BodyPose {
	fn default() -> Self {
		Self::COLLAPSED
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
	RaiseAndScaleUp,
	LowerAndScaleDown,
}

/// Animation request for the renderer, from one pose to another over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualEffect {
	pub kind: EffectKind,
	pub from: BodyPose,
	pub to: BodyPose,
	pub duration: f32,
}

/// Tracks an effect that the renderer is playing so the toggle logic knows where the body is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
	from: BodyPose,
	to: BodyPose,
	elapsed: f32,
	duration: f32,
}
impl Transition {
	pub fn new(from: BodyPose, to: BodyPose, duration: f32) -> Self {
		Transition {
			from,
			to,
			elapsed: 0.0,
			duration: duration.max(0.0),
		}
	}
	pub fn from_effect(effect: &VisualEffect) -> Self {
		Self::new(effect.from, effect.to, effect.duration)
	}

	pub fn update(&mut self, delta: f32) {
		self.elapsed = (self.elapsed + delta.max(0.0)).min(self.duration);
	}

	pub fn progress(&self) -> f32 {
		if self.duration <= 0.0 {
			return 1.0;
		}
		self.elapsed
			.map_range(0.0..self.duration, 0.0..1.0)
			.clamp(0.0, 1.0)
	}
	pub fn finished(&self) -> bool {
		self.progress() >= 1.0
	}

	pub fn pose(&self) -> BodyPose {
		let t = self.progress();
		BodyPose {
			lift: Lerp::lerp(self.from.lift, self.to.lift, t),
			scale: Lerp::lerp(self.from.scale, self.to.scale, t),
		}
	}
	pub fn target(&self) -> BodyPose {
		self.to
	}
}

#[test]
fn transition_interpolates() {
	let settings = TransitionSettings::default();
	let mut transition = Transition::new(BodyPose::COLLAPSED, BodyPose::expanded(&settings), 0.5);
	assert_eq!(transition.progress(), 0.0);
	assert_eq!(transition.pose(), BodyPose::COLLAPSED);

	transition.update(0.25);
	assert!((transition.progress() - 0.5).abs() < 1e-6);
	let pose = transition.pose();
	assert!((pose.lift - 0.1).abs() < 1e-6);
	assert!((pose.scale - 1.25).abs() < 1e-6);
	assert!(!transition.finished());

	transition.update(10.0);
	assert!(transition.finished());
	assert_eq!(transition.pose(), BodyPose::expanded(&settings));
}

#[test]
fn zero_duration_is_immediate() {
	let to = BodyPose {
		lift: 0.3,
		scale: 2.0,
	};
	let transition = Transition::new(BodyPose::COLLAPSED, to, 0.0);
	assert!(transition.finished());
	assert_eq!(transition.pose(), to);
}

#[test]
fn pose_transform() {
	let pose = BodyPose {
		lift: 0.2,
		scale: 1.5,
	};
	let transform = pose.transform(glam::vec3(1.0, 0.0, -1.0));
	let (scale, _, translation) = transform.to_scale_rotation_translation();
	assert!((scale - Vec3::splat(1.5)).length() < 1e-5);
	assert!((translation - glam::vec3(1.0, 0.2, -1.0)).length() < 1e-5);
}
