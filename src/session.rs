use crate::scene::RestartOptions;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
	Running,
	Interrupted,
	#[default]
	Stopped,
}

/// Notifications from the platform's world tracking session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
	Started,
	Failed(String),
	Interrupted,
	InterruptionEnded,
	Stopped,
}

/// What the tracking collaborator has to do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
	Restart(RestartOptions),
}

/// Current state plus a human readable line for the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionStatus {
	pub state: SessionState,
	pub message: Option<String>,
}

/// Lifecycle of the world tracking session.
///
/// Owned by the tracking collaborator, anything else just subscribes to status changes.
/// Placed content is left alone across interruptions.
pub struct SessionLifecycle {
	status: watch::Sender<SessionStatus>,
}
impl SessionLifecycle {
	pub fn new() -> Self {
		let (status, _) = watch::channel(SessionStatus::default());
		SessionLifecycle { status }
	}

	pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
		self.status.subscribe()
	}
	pub fn state(&self) -> SessionState {
		self.status.borrow().state
	}

	fn transition(&self, state: SessionState, message: impl Into<String>) {
		let message = message.into();
		info!(?state, "{message}");
		self.status.send_replace(SessionStatus {
			state,
			message: Some(message),
		});
	}

	pub fn handle(&mut self, event: SessionEvent) -> Option<SessionCommand> {
		match (self.state(), event) {
			(_, SessionEvent::Failed(reason)) => {
				warn!(%reason, "Tracking session failed");
				self.transition(SessionState::Stopped, format!("Session failed: {reason}"));
				None
			}
			(SessionState::Stopped, SessionEvent::Started) => {
				self.transition(SessionState::Running, "Session started");
				None
			}
			(SessionState::Running, SessionEvent::Interrupted) => {
				self.transition(SessionState::Interrupted, "Session was interrupted");
				None
			}
			(SessionState::Interrupted, SessionEvent::InterruptionEnded) => {
				self.transition(SessionState::Running, "Session interruption ended");
				Some(SessionCommand::Restart(RestartOptions {
					reset_tracking: true,
					remove_anchors: true,
				}))
			}
			(SessionState::Running | SessionState::Interrupted, SessionEvent::Stopped) => {
				self.transition(SessionState::Stopped, "Session stopped");
				None
			}
			(state, event) => {
				debug!(?state, ?event, "Ignoring session event");
				None
			}
		}
	}
}
impl Default for SessionLifecycle {
	fn default() -> Self {
		Self::new()
	}
}

#[test]
fn interruption_restarts_tracking() {
	let mut lifecycle = SessionLifecycle::new();
	assert_eq!(lifecycle.state(), SessionState::Stopped);
	assert_eq!(lifecycle.handle(SessionEvent::Started), None);
	assert_eq!(lifecycle.handle(SessionEvent::Interrupted), None);
	assert_eq!(lifecycle.state(), SessionState::Interrupted);
	assert_eq!(
		lifecycle.handle(SessionEvent::InterruptionEnded),
		Some(SessionCommand::Restart(RestartOptions {
			reset_tracking: true,
			remove_anchors: true,
		}))
	);
	assert_eq!(lifecycle.state(), SessionState::Running);
}

#[test]
fn failure_stops_with_message() {
	let mut lifecycle = SessionLifecycle::new();
	let status = lifecycle.subscribe();
	lifecycle.handle(SessionEvent::Started);
	lifecycle.handle(SessionEvent::Failed("camera unavailable".to_string()));
	assert_eq!(
		*status.borrow(),
		SessionStatus {
			state: SessionState::Stopped,
			message: Some("Session failed: camera unavailable".to_string()),
		}
	);
}

#[test]
fn failure_to_start_is_reported() {
	let mut lifecycle = SessionLifecycle::new();
	let status = lifecycle.subscribe();
	assert_eq!(
		lifecycle.handle(SessionEvent::Failed("camera permission denied".to_string())),
		None
	);
	assert_eq!(
		*status.borrow(),
		SessionStatus {
			state: SessionState::Stopped,
			message: Some("Session failed: camera permission denied".to_string()),
		}
	);
}

#[test]
fn out_of_order_events_are_ignored() {
	let mut lifecycle = SessionLifecycle::new();
	assert_eq!(lifecycle.handle(SessionEvent::InterruptionEnded), None);
	assert_eq!(lifecycle.handle(SessionEvent::Interrupted), None);
	assert_eq!(lifecycle.state(), SessionState::Stopped);
	lifecycle.handle(SessionEvent::Started);
	lifecycle.handle(SessionEvent::Started);
	assert_eq!(lifecycle.state(), SessionState::Running);
}

#[cfg(test)]
#[tokio::test]
async fn subscribers_see_changes() {
	let mut lifecycle = SessionLifecycle::new();
	let mut status = lifecycle.subscribe();
	tokio::spawn(async move {
		lifecycle.handle(SessionEvent::Started);
		lifecycle.handle(SessionEvent::Interrupted);
	});
	status.changed().await.unwrap();
	let state = status.borrow_and_update().state;
	assert_ne!(state, SessionState::Stopped);
}
