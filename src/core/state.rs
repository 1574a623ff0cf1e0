//! Match state: the single authority on boards, cards, and counters.
//!
//! Execution is single-threaded and strictly ordered, so state is
//! shared without locking; the one rule callers must keep is to never
//! remove a card from a table another hook is still iterating (the
//! driver defers removal to a sweep after each action).
//!
//! In-play counts are match-scoped, keyed by kind, and updated only
//! through the paired lifecycle hooks.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::cards::{Ability, BehaviorSet, Card, CardId, HookName, KindDefinition, KindId, KindRegistry};
use crate::core::player::{Player, PlayerId};

/// Complete state of one match.
#[derive(Clone, Debug)]
pub struct MatchState {
    players: [Player; 2],
    cards: FxHashMap<CardId, Card>,
    registry: KindRegistry,
    /// In-play counts per tracked kind (match-scoped, lifecycle-driven).
    in_play: FxHashMap<KindId, i64>,
    next_card: u32,
}

impl MatchState {
    /// Create a match over a kind registry with two named players.
    #[must_use]
    pub fn new(registry: KindRegistry, first: Player, second: Player) -> Self {
        Self {
            players: [first, second],
            cards: FxHashMap::default(),
            registry,
            in_play: FxHashMap::default(),
            next_card: 0,
        }
    }

    // === Players ===

    /// A player record.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    /// Mutable player record.
    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    // === Cards ===

    /// Spawn a card of `kind` at full power. The card is not placed on
    /// a table; the caller decides its slot.
    pub fn spawn(&mut self, kind: KindId) -> CardId {
        let card = self.registry.get_unchecked(kind).spawn();
        let id = CardId::new(self.next_card);
        self.next_card += 1;
        self.cards.insert(id, card);
        id
    }

    /// Get a card by ID.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Get a mutable card by ID.
    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(&id)
    }

    /// Get a card by ID, panicking if not found.
    #[must_use]
    pub fn card_unchecked(&self, id: CardId) -> &Card {
        self.cards.get(&id).expect("Card not found in match")
    }

    /// Get a mutable card by ID, panicking if not found.
    pub fn card_unchecked_mut(&mut self, id: CardId) -> &mut Card {
        self.cards.get_mut(&id).expect("Card not found in match")
    }

    /// The kind definition behind a card.
    #[must_use]
    pub fn kind_of(&self, card: CardId) -> &KindDefinition {
        self.registry.get_unchecked(self.card_unchecked(card).kind)
    }

    /// The kind registry.
    #[must_use]
    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    // === Effective behavior ===

    /// The implementation a hook resolves to for `card`: the card's own
    /// override if it carries one, else its assumed layer if one is up,
    /// else its kind's default, else none (the engine's no-op forward).
    #[must_use]
    pub fn effective_hook(&self, card: CardId, hook: HookName) -> Option<Ability> {
        let c = self.card_unchecked(card);
        c.own
            .get(hook)
            .or_else(|| c.assumed.as_ref().and_then(|set| set.get(hook)))
            .or_else(|| self.registry.get_unchecked(c.kind).behavior.get(hook))
            .cloned()
    }

    /// The full effective behavior set for `card`: own merged over the
    /// assumed layer (if up) merged over the kind default.
    #[must_use]
    pub fn effective_behavior(&self, card: CardId) -> BehaviorSet {
        let c = self.card_unchecked(card);
        let kind = &self.registry.get_unchecked(c.kind).behavior;
        let base = match &c.assumed {
            Some(borrowed) => borrowed.merged_over(kind),
            None => kind.clone(),
        };
        c.own.merged_over(&base)
    }

    // === In-play counters ===

    /// Cards of `kind` currently counted in play.
    #[must_use]
    pub fn in_play_count(&self, kind: KindId) -> i64 {
        self.in_play.get(&kind).copied().unwrap_or(0)
    }

    /// Adjust the in-play count for `kind`. Only the lifecycle hooks
    /// should call this.
    pub fn add_in_play(&mut self, kind: KindId, delta: i64) {
        *self.in_play.entry(kind).or_insert(0) += delta;
    }

    /// Pack bonus for `kind`: `k(k+1)/2` for the `k` cards in play.
    #[must_use]
    pub fn pack_bonus(&self, kind: KindId) -> i64 {
        let k = self.in_play_count(kind);
        k * (k + 1) / 2
    }

    // === Board queries ===

    /// Every tabled card as `(owner, slot, card)`, player 0's board
    /// first, each in board order.
    #[must_use]
    pub fn tabled(&self) -> Vec<(PlayerId, usize, CardId)> {
        let mut out = Vec::new();
        for id in [PlayerId::new(0), PlayerId::new(1)] {
            for (slot, card) in self.player(id).occupied() {
                out.push((id, slot, card));
            }
        }
        out
    }

    /// Tabled cards of the same kind as `card`, including `card` itself
    /// if tabled. These are the cards whose displayed description may
    /// depend on the kind's ability presence.
    #[must_use]
    pub fn kind_siblings(&self, card: CardId) -> Vec<CardId> {
        let kind = self.card_unchecked(card).kind;
        self.tabled()
            .into_iter()
            .map(|(_, _, c)| c)
            .filter(|&c| self.card_unchecked(c).kind == kind)
            .collect()
    }

    /// Tabled cards whose power has dropped to zero or below, in board
    /// order, for the driver's removal sweep.
    #[must_use]
    pub fn defeated_on_table(&self) -> Vec<(PlayerId, usize, CardId)> {
        self.tabled()
            .into_iter()
            .filter(|&(_, _, card)| self.card_unchecked(card).is_defeated())
            .collect()
    }

    // === Descriptions ===

    /// Human-readable description lines for a card, most-derived first:
    /// own-override ability texts, then kind-default texts for hooks the
    /// card does not shadow, then the species identity label.
    ///
    /// Pure: callable at any time without side effects.
    #[must_use]
    pub fn descriptions(&self, card: CardId) -> SmallVec<[String; 4]> {
        let c = self.card_unchecked(card);
        let kind = self.registry.get_unchecked(c.kind);
        let mut out = SmallVec::new();

        for hook in HookName::ALL {
            if let Some(text) = c.own.get(hook).and_then(|a| a.description(hook)) {
                out.push(text);
            }
        }
        for hook in HookName::ALL {
            if c.own.get(hook).is_some() {
                continue;
            }
            if let Some(text) = kind.behavior.get(hook).and_then(|a| a.description(hook)) {
                out.push(text);
            }
        }
        out.push(kind.species.label().to_string());
        out
    }
}
