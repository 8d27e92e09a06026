use crate::bodies;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardSettings {
	/// Width and height of the backing plane
	pub size: [f32; 2],
	/// Offset from the body center, in the body's local space
	pub offset: [f32; 3],
	/// Offset of the text block from the card center
	pub text_offset: [f32; 3],
	pub text_scale: f32,
	pub background_color: [f32; 4],
	pub text_color: [f32; 4],
}
impl Default for CardSettings {
	fn default() -> Self {
		Self {
			size: [0.1, 0.05],
			offset: [0.0, 0.1, 0.0],
			text_offset: [-0.04, -0.02, 0.0],
			text_scale: 0.005,
			background_color: [1.0, 1.0, 1.0, 0.5],
			text_color: [0.0, 0.0, 0.0, 1.0],
		}
	}
}

/// Contents of the info card attached to an expanded body.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoCard {
	pub name: String,
	pub distance_au: f32,
	pub codename: String,
}
impl InfoCard {
	pub fn for_body(identifier: &str) -> Self {
		let facts = bodies::facts(identifier);
		InfoCard {
			name: identifier.to_string(),
			distance_au: facts.distance_au,
			codename: facts.codename.to_string(),
		}
	}

	pub fn text(&self) -> String {
		self.to_string()
	}
}
impl Display for InfoCard {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		writeln!(f, "Name: {}", self.name)?;
		writeln!(f, "Distance: {:.2} AU", self.distance_au)?;
		write!(f, "Codename: {}", self.codename)
	}
}

#[test]
fn earth_card() {
	let card = InfoCard::for_body("earth");
	assert_eq!(
		card,
		InfoCard {
			name: "earth".to_string(),
			distance_au: 1.0,
			codename: "Terra".to_string(),
		}
	);
	assert_eq!(card.text(), "Name: earth\nDistance: 1.00 AU\nCodename: Terra");
}

#[test]
fn unknown_body_card_uses_defaults() {
	let card = InfoCard::for_body("sun");
	assert_eq!(card.text(), "Name: sun\nDistance: 0.00 AU\nCodename: ");
	assert_eq!(
		InfoCard::for_body("saturn").text(),
		"Name: saturn\nDistance: 9.58 AU\nCodename: Cronus"
	);
}
