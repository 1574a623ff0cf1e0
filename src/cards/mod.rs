//! Cards: entities, kinds, behavior sets, and the standard roster.
//!
//! A [`Card`] is a runtime entity with a power value and an **own**
//! [`BehaviorSet`] overlay; a [`KindDefinition`] is the static data all
//! cards of one kind share, including the kind-level default behavior.
//! The split matters: the capability-transfer mechanism moves only the
//! hooks a specific card personally carries, never the kind defaults
//! its siblings rely on.

mod behavior;
mod card;
mod kind;
pub mod roster;

pub use behavior::{Ability, BehaviorSet, HookName, ModifierOp};
pub use card::{Card, CardId};
pub use kind::{KindDefinition, KindId, KindRegistry, SpeciesTraits};
