//! Headless run of the orrery against a scripted table and a renderer that only logs.

use color_eyre::eyre::Result;
use glam::Vec3;
use manifest_dir_macros::directory_relative_path;
use mint::Vector2;
use stardust_xr_orrery::{
	bodies::SOLAR_SYSTEM,
	card::{CardSettings, InfoCard},
	orbit::BodyPlacement,
	scene::{AnchorPoint, RestartOptions, SceneRenderer, SurfaceProvider},
	session::{SessionCommand, SessionEvent, SessionLifecycle},
	transition::VisualEffect,
	Orrery, OrrerySettings, TapOutcome,
};
use std::{path::Path, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_millis(16);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::from_default_env().add_directive("stardust_xr_orrery=debug".parse()?),
		)
		.init();

	let settings_path = Path::new(directory_relative_path!("demos")).join("orrery.toml");
	let settings = OrrerySettings::from_toml_str(&std::fs::read_to_string(settings_path)?)?;

	let mut lifecycle = SessionLifecycle::new();
	let mut orrery = Orrery::new(ScriptedTable::default(), LoggingScene, settings);
	orrery.watch_session(lifecycle.subscribe());
	orrery.surface_mut().restart(RestartOptions {
		reset_tracking: true,
		remove_anchors: true,
	});
	lifecycle.handle(SessionEvent::Started);

	tokio::select! {
		_ = tokio::signal::ctrl_c() => (),
		e = run(&mut orrery, &mut lifecycle) => e?,
	}
	Ok(())
}

async fn run(
	orrery: &mut Orrery<ScriptedTable, LoggingScene>,
	lifecycle: &mut SessionLifecycle,
) -> Result<()> {
	let mut interval = tokio::time::interval(FRAME);
	for frame in 0..180u32 {
		interval.tick().await;
		match frame {
			// the plane hasn't been detected yet
			0 => tap(orrery, [0.0, 0.0])?,
			20 => {
				orrery.surface_mut().plane_detected = true;
				tap(orrery, [0.0, 0.0])?
			}
			40 => tap(orrery, ScriptedTable::body_location("earth"))?,
			50 => tap(orrery, ScriptedTable::body_location("earth"))?,
			80 => tap(orrery, ScriptedTable::body_location("saturn"))?,
			100 => {
				lifecycle.handle(SessionEvent::Interrupted);
			}
			120 => {
				if let Some(SessionCommand::Restart(options)) =
					lifecycle.handle(SessionEvent::InterruptionEnded)
				{
					orrery.surface_mut().restart(options);
				}
			}
			140 => tap(orrery, ScriptedTable::body_location("saturn"))?,
			_ => (),
		}
		orrery.update(FRAME.as_secs_f32());
	}
	Ok(())
}

fn tap(
	orrery: &mut Orrery<ScriptedTable, LoggingScene>,
	screen: impl Into<Vector2<f32>>,
) -> Result<()> {
	match orrery.tap(screen)? {
		TapOutcome::Nothing => info!("Tap hit nothing"),
		TapOutcome::Placed(anchor) => info!(anchor = ?anchor.position(), "Tap placed the orrery"),
		TapOutcome::Toggled(result) => info!(body = %result.body, state = ?result.state, "Tap toggled"),
	}
	Ok(())
}

/// A table one meter ahead, with bodies laid out along the bottom of a 100 × 100 screen.
#[derive(Default)]
struct ScriptedTable {
	plane_detected: bool,
}
impl ScriptedTable {
	fn body_location(identifier: &str) -> [f32; 2] {
		let index = SOLAR_SYSTEM
			.iter()
			.position(|b| b.identifier == identifier)
			.unwrap_or_default();
		[index as f32 * 10.0 + 5.0, 90.0]
	}
}
impl SurfaceProvider for ScriptedTable {
	fn screen_center(&self) -> Vector2<f32> {
		[50.0, 50.0].into()
	}
	fn anchor_at(&mut self, _screen: Vector2<f32>) -> Option<AnchorPoint> {
		self.plane_detected
			.then(|| AnchorPoint::new([0.0, -0.4, -1.0]))
	}
	fn hit_body(&mut self, screen: Vector2<f32>) -> Option<String> {
		if screen.y < 80.0 {
			return None;
		}
		SOLAR_SYSTEM
			.get((screen.x / 10.0) as usize)
			.map(|b| b.identifier.to_string())
	}
	fn restart(&mut self, options: RestartOptions) {
		info!(?options, "Restarting world tracking");
	}
}

struct LoggingScene;
impl SceneRenderer for LoggingScene {
	fn clear(&mut self) {
		info!("Clearing scene");
	}
	fn place_body(&mut self, body: &BodyPlacement) {
		info!(
			body = body.identifier,
			position = ?body.position,
			radius = body.visual_radius,
			texture = body.texture_key,
			"Sphere"
		);
	}
	fn draw_ring(&mut self, points: &[Vec3], dot_radius: f32) {
		info!(dots = points.len(), dot_radius, "Ring");
	}
	fn play_effect(&mut self, body: &str, effect: &VisualEffect) {
		info!(body, kind = ?effect.kind, from = ?effect.from, to = ?effect.to, duration = effect.duration, "Effect");
	}
	fn attach_card(&mut self, body: &str, card: &InfoCard, settings: &CardSettings) {
		info!(body, offset = ?settings.offset, "Card\n{}", card.text());
	}
	fn detach_card(&mut self, body: &str) {
		info!(body, "Card removed");
	}
}
