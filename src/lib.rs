pub mod bodies;
pub mod card;
mod dummy;
mod error;
pub mod orbit;
mod orrery;
pub mod scene;
pub mod session;
pub mod toggle;
pub mod transition;

pub use dummy::*;
pub use error::*;
pub use orrery::*;
