//! Player identification and the per-player board record.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// Player identifier. Matches are strictly two-player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID (0 or 1).
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other player. Flips the pairing bit, so it never overflows
    /// even for an out-of-range id.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(self.0 ^ 1)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// A player record: name, board, and power tally.
///
/// The `table` is an ordered sequence of card-or-empty slots. Slots are
/// positional: an attacker at slot *i* engages the defender at slot *i*
/// on the opposing table. Removal clears the slot rather than shifting
/// the sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Display name.
    pub name: String,

    /// Board slots in fixed order.
    pub table: Vec<Option<CardId>>,

    /// Power tally reduced by damage dealt directly to the player.
    /// Purely informational: the terminal condition is board emptiness.
    pub power: i64,
}

impl Player {
    /// Starting player power.
    pub const STARTING_POWER: i64 = 20;

    /// Create a player with an empty board.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: Vec::new(),
            power: Self::STARTING_POWER,
        }
    }

    /// The card in a slot, if the slot exists and is occupied.
    #[must_use]
    pub fn card_at(&self, slot: usize) -> Option<CardId> {
        self.table.get(slot).copied().flatten()
    }

    /// Occupied slots in board order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, CardId)> + '_ {
        self.table
            .iter()
            .enumerate()
            .filter_map(|(slot, card)| card.map(|c| (slot, c)))
    }

    /// Clear a slot, returning the card that was there.
    pub fn clear_slot(&mut self, slot: usize) -> Option<CardId> {
        self.table.get_mut(slot).and_then(Option::take)
    }

    /// True once every slot is empty - this player has lost.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.table.iter().all(Option::is_none)
    }
}
