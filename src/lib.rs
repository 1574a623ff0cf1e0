//! # card-duel
//!
//! A turn-based card-battle rules engine: two decks of creature cards
//! face off, each card has a power value and optional combat-modifying
//! abilities, and a player wins when the opponent's board is emptied.
//!
//! ## Design Principles
//!
//! 1. **Continuation-passing hooks**: every state-affecting hook
//!    resumes a one-shot [`Continuation`](tasks::Continuation) instead
//!    of returning a value, so view animations can gate game-logic
//!    progression without blocking a thread.
//!
//! 2. **Behavior as data**: a card's combat behavior is an owned
//!    [`BehaviorSet`](cards::BehaviorSet) of tagged
//!    [`Ability`](cards::Ability) variants, interpreted by the
//!    [`Engine`](engine::Engine). Own overrides shadow kind-level
//!    defaults, and the capability-transfer mechanism moves the own
//!    slots between cards by value - no shared definition is ever
//!    mutated mid-match.
//!
//! 3. **Single-threaded cooperative scheduling**: all "concurrency" is
//!    the deferred-continuation style above; within one
//!    [`TaskQueue`](tasks::TaskQueue) steps are strictly sequential,
//!    and the match driver never starts a new action until the current
//!    one's continuation fires.
//!
//! ## Modules
//!
//! - `core`: player records, match state, per-action context
//! - `cards`: card entities, kind definitions, behavior sets, roster
//! - `tasks`: continuations and the sequential task queue
//! - `engine`: hook dispatch, damage pipeline, capability transfer
//! - `view`: the rendering-collaborator seam and test doubles
//! - `game`: the match driver

pub mod cards;
pub mod core;
pub mod engine;
pub mod game;
pub mod tasks;
pub mod view;

// Re-export commonly used types
pub use crate::cards::{
    Ability, BehaviorSet, Card, CardId, HookName, KindDefinition, KindId, KindRegistry,
    ModifierOp, SpeciesTraits,
};
pub use crate::core::{GameContext, MatchState, Player, PlayerId};
pub use crate::engine::Engine;
pub use crate::game::{Deck, Game, GameResult};
pub use crate::tasks::{Continuation, TaskQueue};
pub use crate::view::{NullView, RecordingView, View, ViewEvent};
