//! Behavior sets: the hooks a card carries, as owned data.
//!
//! Hook implementations are tagged [`Ability`] variants interpreted by
//! the engine, not closures or inheritance chains. That makes a card's
//! behavior an explicit value that can be copied, cleared, or
//! temporarily swapped - the capability-transfer mechanism moves
//! `Option<Ability>` slots between cards by value.
//!
//! A [`BehaviorSet`] has one slot per hook, indexed by [`HookName`].
//! An absent slot means the hook falls through to the kind-level
//! default, and ultimately to the engine's no-op that forwards the
//! continuation unchanged.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The named extension points a card may override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookName {
    /// Board mutation before an attack resolves.
    BeforeAttack,
    /// The attack action itself (animation plus damage).
    Attack,
    /// Dealer-side transform of damage aimed at a creature.
    DealtDamageToCreature,
    /// Dealer-side transform of damage aimed at a player.
    DealtDamageToPlayer,
    /// Receiver-side transform of incoming damage.
    TakenDamage,
    /// Lifecycle: the card entered play.
    AfterComingIntoPlay,
    /// Lifecycle: the card is about to leave play.
    BeforeRemoving,
}

impl HookName {
    /// Every hook, in dispatch-protocol order.
    pub const ALL: [HookName; 7] = [
        HookName::BeforeAttack,
        HookName::Attack,
        HookName::DealtDamageToCreature,
        HookName::DealtDamageToPlayer,
        HookName::TakenDamage,
        HookName::AfterComingIntoPlay,
        HookName::BeforeRemoving,
    ];

    /// The three damage-modifier hooks, the usual target of a
    /// borrow-and-strip transfer.
    pub const MODIFIERS: [HookName; 3] = [
        HookName::DealtDamageToCreature,
        HookName::DealtDamageToPlayer,
        HookName::TakenDamage,
    ];
}

impl std::fmt::Display for HookName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HookName::BeforeAttack => "before_attack",
            HookName::Attack => "attack",
            HookName::DealtDamageToCreature => "dealt_damage_to_creature",
            HookName::DealtDamageToPlayer => "dealt_damage_to_player",
            HookName::TakenDamage => "taken_damage",
            HookName::AfterComingIntoPlay => "after_coming_into_play",
            HookName::BeforeRemoving => "before_removing",
        };
        f.write_str(name)
    }
}

/// How a damage modifier transforms the value flowing through it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierOp {
    /// Add a fixed delta (negative reduces).
    Flat(i64),
    /// Multiply by a fixed factor. Order-sensitive against `Flat`,
    /// which is what pins the dealer-before-receiver chain order.
    Scale(i64),
    /// Add the pack bonus `k(k+1)/2` for the `k` cards of this card's
    /// kind currently in play.
    PackBonus,
}

/// One hook implementation, as data the engine interprets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    /// Damage-modifier hook body (any of the three modifier slots).
    /// With `animate`, the ability cue plays before the value resumes.
    ModifyDamage { op: ModifierOp, animate: bool },

    /// Before attacking, buff every duck-like card on both tables.
    RallyFlock { max_gain: i64, power_gain: i64 },

    /// Before attacking, borrow-and-strip the three modifier hooks
    /// from the first eligible enemy card.
    StealModifiers,

    /// Before attacking, assume the first eligible enemy card's entire
    /// behavior set for a single action. At most once per card.
    AssumeBehavior,

    /// Attack override: damage every occupied enemy slot in board
    /// order for `damage` apiece.
    SweepAttack { damage: i64 },

    /// Paired lifecycle hooks keeping the match-scoped in-play count
    /// of this card's kind accurate.
    TrackInPlay,
}

impl Ability {
    /// A silent flat damage modifier.
    #[must_use]
    pub fn flat_modifier(delta: i64) -> Self {
        Ability::ModifyDamage {
            op: ModifierOp::Flat(delta),
            animate: false,
        }
    }

    /// A flat damage modifier that plays the ability cue first.
    #[must_use]
    pub fn animated_modifier(delta: i64) -> Self {
        Ability::ModifyDamage {
            op: ModifierOp::Flat(delta),
            animate: true,
        }
    }

    /// The pack-scaling damage modifier.
    #[must_use]
    pub fn pack_modifier() -> Self {
        Ability::ModifyDamage {
            op: ModifierOp::PackBonus,
            animate: false,
        }
    }

    /// Human-readable description for the card's description list.
    ///
    /// `hook` is the slot the ability sits in; the same data can read
    /// differently on the dealing and the receiving side. Returns
    /// `None` for hooks with nothing player-visible to say.
    #[must_use]
    pub fn description(&self, hook: HookName) -> Option<String> {
        match self {
            Ability::ModifyDamage { op, .. } => match (op, hook) {
                (ModifierOp::Flat(delta), HookName::TakenDamage) if *delta < 0 => {
                    Some(format!("Ability: reduces damage taken by {}.", -delta))
                }
                (ModifierOp::Flat(delta), _) if *delta >= 0 => {
                    Some(format!("Ability: deals {delta} extra damage."))
                }
                (ModifierOp::Flat(delta), _) => {
                    Some(format!("Ability: deals {} less damage.", -delta))
                }
                (ModifierOp::Scale(factor), _) => {
                    Some(format!("Ability: scales damage by {factor}."))
                }
                (ModifierOp::PackBonus, _) => {
                    Some("The more of them, the stronger.".to_string())
                }
            },
            Ability::RallyFlock { .. } => {
                Some("Ability: rallies every duck before attacking.".to_string())
            }
            Ability::StealModifiers => {
                Some("Ability: steals an enemy's combat tricks.".to_string())
            }
            Ability::AssumeBehavior => {
                Some("Ability: mimics an enemy's behavior.".to_string())
            }
            Ability::SweepAttack { damage } => {
                Some(format!("Ability: hits every enemy card for {damage}."))
            }
            Ability::TrackInPlay => None,
        }
    }
}

/// The hook overrides a card (or kind) carries: one optional slot per
/// hook, addressable by [`HookName`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorSet {
    before_attack: Option<Ability>,
    attack: Option<Ability>,
    dealt_to_creature: Option<Ability>,
    dealt_to_player: Option<Ability>,
    taken: Option<Ability>,
    after_coming_into_play: Option<Ability>,
    before_removing: Option<Ability>,
}

impl BehaviorSet {
    /// An empty set: every hook falls through to the next level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, hook: HookName) -> &Option<Ability> {
        match hook {
            HookName::BeforeAttack => &self.before_attack,
            HookName::Attack => &self.attack,
            HookName::DealtDamageToCreature => &self.dealt_to_creature,
            HookName::DealtDamageToPlayer => &self.dealt_to_player,
            HookName::TakenDamage => &self.taken,
            HookName::AfterComingIntoPlay => &self.after_coming_into_play,
            HookName::BeforeRemoving => &self.before_removing,
        }
    }

    fn slot_mut(&mut self, hook: HookName) -> &mut Option<Ability> {
        match hook {
            HookName::BeforeAttack => &mut self.before_attack,
            HookName::Attack => &mut self.attack,
            HookName::DealtDamageToCreature => &mut self.dealt_to_creature,
            HookName::DealtDamageToPlayer => &mut self.dealt_to_player,
            HookName::TakenDamage => &mut self.taken,
            HookName::AfterComingIntoPlay => &mut self.after_coming_into_play,
            HookName::BeforeRemoving => &mut self.before_removing,
        }
    }

    /// Get the override for a hook, if present.
    #[must_use]
    pub fn get(&self, hook: HookName) -> Option<&Ability> {
        self.slot(hook).as_ref()
    }

    /// Install an override for a hook, replacing any previous one.
    pub fn set(&mut self, hook: HookName, ability: Ability) {
        *self.slot_mut(hook) = Some(ability);
    }

    /// Builder-style `set`.
    #[must_use]
    pub fn with(mut self, hook: HookName, ability: Ability) -> Self {
        self.set(hook, ability);
        self
    }

    /// Remove and return the override for a hook.
    pub fn take(&mut self, hook: HookName) -> Option<Ability> {
        self.slot_mut(hook).take()
    }

    /// Remove every override.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True if no hook is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        HookName::ALL.iter().all(|&h| self.get(h).is_none())
    }

    /// Hooks with an override present, in protocol order.
    #[must_use]
    pub fn hooks(&self) -> SmallVec<[HookName; 7]> {
        HookName::ALL
            .iter()
            .copied()
            .filter(|&h| self.get(h).is_some())
            .collect()
    }

    /// The effective set with `self` overriding `base` slot by slot.
    ///
    /// This is how a card's own overlay combines with its kind-level
    /// default behavior.
    #[must_use]
    pub fn merged_over(&self, base: &BehaviorSet) -> BehaviorSet {
        let mut merged = base.clone();
        for hook in HookName::ALL {
            if let Some(ability) = self.get(hook) {
                merged.set(hook, ability.clone());
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set() {
        let set = BehaviorSet::new();
        assert!(set.is_empty());
        assert!(set.hooks().is_empty());
        for hook in HookName::ALL {
            assert!(set.get(hook).is_none());
        }
    }

    #[test]
    fn test_set_get_take() {
        let mut set = BehaviorSet::new();
        set.set(HookName::TakenDamage, Ability::animated_modifier(-1));

        assert!(!set.is_empty());
        assert_eq!(
            set.get(HookName::TakenDamage),
            Some(&Ability::animated_modifier(-1))
        );
        assert_eq!(set.hooks().as_slice(), &[HookName::TakenDamage]);

        let taken = set.take(HookName::TakenDamage);
        assert_eq!(taken, Some(Ability::animated_modifier(-1)));
        assert!(set.is_empty());
        assert!(set.take(HookName::TakenDamage).is_none());
    }

    #[test]
    fn test_merged_over_prefers_own() {
        let kind = BehaviorSet::new()
            .with(HookName::DealtDamageToCreature, Ability::pack_modifier())
            .with(HookName::Attack, Ability::SweepAttack { damage: 2 });
        let own = BehaviorSet::new()
            .with(HookName::DealtDamageToCreature, Ability::flat_modifier(3));

        let merged = own.merged_over(&kind);
        assert_eq!(
            merged.get(HookName::DealtDamageToCreature),
            Some(&Ability::flat_modifier(3)),
            "own override wins"
        );
        assert_eq!(
            merged.get(HookName::Attack),
            Some(&Ability::SweepAttack { damage: 2 }),
            "kind default shows through"
        );
    }

    #[test]
    fn test_modifier_descriptions() {
        assert_eq!(
            Ability::animated_modifier(-1).description(HookName::TakenDamage),
            Some("Ability: reduces damage taken by 1.".to_string())
        );
        assert_eq!(
            Ability::pack_modifier().description(HookName::DealtDamageToCreature),
            Some("The more of them, the stronger.".to_string())
        );
        assert_eq!(Ability::TrackInPlay.description(HookName::BeforeRemoving), None);
    }

    #[test]
    fn test_behavior_set_serialization() {
        let set = BehaviorSet::new()
            .with(HookName::BeforeAttack, Ability::StealModifiers)
            .with(HookName::TakenDamage, Ability::animated_modifier(-1));

        let json = serde_json::to_string(&set).unwrap();
        let deserialized: BehaviorSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set, deserialized);
    }
}
