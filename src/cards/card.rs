//! Card entities - runtime card state.
//!
//! A `Card` is one creature in a match: identity, power bounds, and the
//! **own** behavior overlay specific to this instance. The view binding
//! stays outside the core; rendering collaborators key off [`CardId`].

use serde::{Deserialize, Serialize};

use super::behavior::{Ability, BehaviorSet, HookName};
use super::kind::KindId;

/// Unique identifier for a card instance in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A creature card in a match.
///
/// ## Power invariant
///
/// `current_power` is clamped to at most `max_power` by the setter, not
/// by callers. Negative values pass through: the match driver treats
/// power at or below zero as "removed from play", and removal itself is
/// deferred to the driver's sweep (never mid-iteration).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Display name.
    pub name: String,

    /// The kind this card was spawned from.
    pub kind: KindId,

    /// Power ceiling. Mutable: some abilities raise it mid-match.
    pub max_power: i64,

    /// Current power; write through `set_current_power`.
    current_power: i64,

    /// Overrides this specific card carries, shadowing its kind's
    /// default behavior slot by slot.
    pub own: BehaviorSet,

    /// Behavior set temporarily adopted from another card. While
    /// present it sits between `own` and the kind default: own
    /// overrides shadow it, and it shadows the kind. Hooks written
    /// into `own` while it is up outlive its removal.
    pub assumed: Option<BehaviorSet>,

    /// Guard for the full-assume capability transfer: once set, the
    /// card never assumes another behavior set again.
    pub has_assumed: bool,
}

impl Card {
    /// Create a card at full power.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: KindId, max_power: i64) -> Self {
        Self {
            name: name.into(),
            kind,
            max_power,
            current_power: max_power,
            own: BehaviorSet::new(),
            assumed: None,
            has_assumed: false,
        }
    }

    /// Current power.
    #[must_use]
    pub fn current_power(&self) -> i64 {
        self.current_power
    }

    /// Assign current power, clamped to at most `max_power`.
    ///
    /// Values above the ceiling are silently clamped, never rejected.
    /// Negative values are permitted; interpreting them is the driver's
    /// job.
    pub fn set_current_power(&mut self, value: i64) {
        self.current_power = value.min(self.max_power);
    }

    /// True once power has dropped to zero or below.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.current_power <= 0
    }

    /// This card's own override for a hook, if it carries one.
    #[must_use]
    pub fn own_override(&self, hook: HookName) -> Option<&Ability> {
        self.own.get(hook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn card() -> Card {
        Card::new("Peaceful Duck", KindId::new(0), 2)
    }

    #[test]
    fn test_new_card_at_full_power() {
        let card = card();
        assert_eq!(card.current_power(), 2);
        assert_eq!(card.max_power, 2);
        assert!(!card.is_defeated());
        assert!(card.own.is_empty());
        assert!(card.assumed.is_none());
        assert!(!card.has_assumed);
    }

    #[test]
    fn test_setter_clamps_to_max() {
        let mut card = card();
        card.set_current_power(10);
        assert_eq!(card.current_power(), 2);
    }

    #[test]
    fn test_setter_permits_negative() {
        let mut card = card();
        card.set_current_power(-3);
        assert_eq!(card.current_power(), -3);
        assert!(card.is_defeated());
    }

    #[test]
    fn test_raised_ceiling_allows_higher_power() {
        let mut card = card();
        card.max_power += 1;
        card.set_current_power(card.current_power() + 2);
        assert_eq!(card.current_power(), 3);
    }

    proptest! {
        #[test]
        fn prop_power_never_exceeds_max(value in -100i64..100) {
            let mut card = Card::new("Creature", KindId::new(0), 5);
            card.set_current_power(value);
            prop_assert!(card.current_power() <= card.max_power);
            prop_assert_eq!(card.current_power(), value.min(card.max_power));
        }
    }
}
