//! The standard roster: kind definitions for the stock creatures.
//!
//! Deck construction is plain data - a deck is just an ordered slice of
//! [`KindId`]s - but every stock creature's behavior lives here so
//! matches and tests can build decks without redefining abilities.
//!
//! Note which abilities are kind-level (`with_hook`, shared by every
//! card of the kind) and which are per-instance (`with_spawn_override`,
//! carried by each card's own overlay and therefore stealable from one
//! card without touching its siblings).

use super::behavior::{Ability, HookName};
use super::kind::{KindDefinition, KindId, KindRegistry, SpeciesTraits};

/// Kind IDs for the standard roster.
#[derive(Clone, Copy, Debug)]
pub struct Roster {
    /// Plain duck.
    pub duck: KindId,
    /// Plain dog.
    pub dog: KindId,
    /// Dog that shrugs off one point of every hit.
    pub bruiser: KindId,
    /// Attacks every enemy card in board order.
    pub gatling: KindId,
    /// Pack dog: the more in play, the harder each hits.
    pub lad: KindId,
    /// Steals an enemy card's damage modifiers before attacking.
    pub rogue: KindId,
    /// Duck that buffs the whole flock before attacking.
    pub brewer: KindId,
    /// Dog that quacks and swims.
    pub pseudo_duck: KindId,
    /// Assumes an enemy card's entire behavior set, once.
    pub nemo: KindId,
}

/// Register the standard roster into `registry` and return its IDs.
pub fn standard_roster(registry: &mut KindRegistry) -> Roster {
    let duck = registry.allocate();
    registry.register(
        KindDefinition::new(duck, "Peaceful Duck", 2).with_species(SpeciesTraits::duck()),
    );

    let dog = registry.allocate();
    registry.register(
        KindDefinition::new(dog, "Bandit Dog", 3).with_species(SpeciesTraits::dog()),
    );

    // The damage shrug is per-instance: stealing it strips one Bruiser,
    // not the breed.
    let bruiser = registry.allocate();
    registry.register(
        KindDefinition::new(bruiser, "Bruiser", 5)
            .with_species(SpeciesTraits::dog())
            .with_spawn_override(HookName::TakenDamage, Ability::animated_modifier(-1)),
    );

    let gatling = registry.allocate();
    registry.register(
        KindDefinition::new(gatling, "Gatling", 6)
            .with_hook(HookName::Attack, Ability::SweepAttack { damage: 2 }),
    );

    let lad = registry.allocate();
    registry.register(
        KindDefinition::new(lad, "Lad", 2)
            .with_species(SpeciesTraits::dog())
            .with_hook(HookName::AfterComingIntoPlay, Ability::TrackInPlay)
            .with_hook(HookName::BeforeRemoving, Ability::TrackInPlay)
            .with_hook(HookName::DealtDamageToCreature, Ability::pack_modifier()),
    );

    let rogue = registry.allocate();
    registry.register(
        KindDefinition::new(rogue, "Rogue", 2)
            .with_hook(HookName::BeforeAttack, Ability::StealModifiers),
    );

    let brewer = registry.allocate();
    registry.register(
        KindDefinition::new(brewer, "Brewer", 2)
            .with_species(SpeciesTraits::duck())
            .with_hook(
                HookName::BeforeAttack,
                Ability::RallyFlock {
                    max_gain: 1,
                    power_gain: 2,
                },
            ),
    );

    let pseudo_duck = registry.allocate();
    registry.register(
        KindDefinition::new(pseudo_duck, "Pseudo Duck", 3)
            .with_species(SpeciesTraits::duck_dog()),
    );

    let nemo = registry.allocate();
    registry.register(
        KindDefinition::new(nemo, "Nemo", 4)
            .with_hook(HookName::BeforeAttack, Ability::AssumeBehavior),
    );

    Roster {
        duck,
        dog,
        bruiser,
        gatling,
        lad,
        rogue,
        brewer,
        pseudo_duck,
        nemo,
    }
}
