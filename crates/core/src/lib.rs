//! Klondike rules engine. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod deal;
pub mod deck;
pub mod events;
pub mod game;
pub mod rng;
pub mod rules;
pub mod state;

pub use cards::*;
pub use deal::*;
pub use deck::*;
pub use events::*;
pub use game::*;
pub use rng::*;
pub use rules::*;
pub use state::*;
