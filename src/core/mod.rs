//! Core match data: player records, per-action context, match state.

mod context;
mod player;
mod state;

pub use context::GameContext;
pub use player::{Player, PlayerId};
pub use state::MatchState;
