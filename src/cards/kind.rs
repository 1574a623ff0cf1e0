//! Kind definitions - static card data.
//!
//! A `KindDefinition` holds what every card of one kind shares: name,
//! default power, species traits, and the kind-level default
//! [`BehaviorSet`]. Definitions live in a [`KindRegistry`] and are
//! never mutated at match time - a capability transfer can strip a
//! card's own overrides, but the kind default its siblings share stays
//! intact.
//!
//! `spawn_overrides` covers abilities the source installs per instance
//! rather than per kind: every spawned card starts with a copy in its
//! own overlay, so stealing them affects that card alone.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::behavior::{Ability, BehaviorSet, HookName};
use super::card::Card;

/// Unique identifier for a card kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KindId(pub u32);

impl KindId {
    /// Create a new kind ID.
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

impl std::fmt::Display for KindId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Kind({})", self.0)
    }
}

/// Species traits used for identity descriptions and flock targeting.
///
/// Duck-likeness is behavioral, not nominal: anything that both quacks
/// and swims counts as a duck, whatever kind it was spawned from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesTraits {
    pub quacks: bool,
    pub swims: bool,
    pub dog: bool,
}

impl SpeciesTraits {
    /// Plain creature: no traits.
    #[must_use]
    pub const fn creature() -> Self {
        Self {
            quacks: false,
            swims: false,
            dog: false,
        }
    }

    /// A duck: quacks and swims.
    #[must_use]
    pub const fn duck() -> Self {
        Self {
            quacks: true,
            swims: true,
            dog: false,
        }
    }

    /// A dog.
    #[must_use]
    pub const fn dog() -> Self {
        Self {
            quacks: false,
            swims: false,
            dog: true,
        }
    }

    /// A dog that quacks and swims.
    #[must_use]
    pub const fn duck_dog() -> Self {
        Self {
            quacks: true,
            swims: true,
            dog: true,
        }
    }

    /// Quacks and swims, whatever else it is.
    #[must_use]
    pub const fn is_duck_like(self) -> bool {
        self.quacks && self.swims
    }

    /// Identity description by duck/dog similarity.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match (self.is_duck_like(), self.dog) {
            (true, true) => "Duck-Dog",
            (true, false) => "Duck",
            (false, true) => "Dog",
            (false, false) => "Creature",
        }
    }
}

/// Static definition of a card kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindDefinition {
    /// Unique identifier for this kind.
    pub id: KindId,

    /// Kind name; spawned cards display it.
    pub name: String,

    /// Power new cards of this kind start (and cap) at.
    pub power: i64,

    /// Species traits for identity descriptions and targeting.
    pub species: SpeciesTraits,

    /// Kind-level default behavior, shared by every card of this kind.
    pub behavior: BehaviorSet,

    /// Overrides copied into each spawned card's own overlay.
    pub spawn_overrides: BehaviorSet,
}

impl KindDefinition {
    /// Create a definition with no behavior.
    #[must_use]
    pub fn new(id: KindId, name: impl Into<String>, power: i64) -> Self {
        Self {
            id,
            name: name.into(),
            power,
            species: SpeciesTraits::creature(),
            behavior: BehaviorSet::new(),
            spawn_overrides: BehaviorSet::new(),
        }
    }

    /// Set the species traits (builder pattern).
    #[must_use]
    pub fn with_species(mut self, species: SpeciesTraits) -> Self {
        self.species = species;
        self
    }

    /// Add a kind-level default hook (builder pattern).
    #[must_use]
    pub fn with_hook(mut self, hook: HookName, ability: Ability) -> Self {
        self.behavior.set(hook, ability);
        self
    }

    /// Add a per-instance hook, copied into each spawned card's own
    /// overlay (builder pattern).
    #[must_use]
    pub fn with_spawn_override(mut self, hook: HookName, ability: Ability) -> Self {
        self.spawn_overrides.set(hook, ability);
        self
    }

    /// Spawn a card of this kind at full power.
    #[must_use]
    pub fn spawn(&self) -> Card {
        let mut card = Card::new(self.name.clone(), self.id, self.power);
        card.own = self.spawn_overrides.clone();
        card
    }
}

/// Registry of kind definitions.
///
/// Stores every kind a match can spawn and provides lookup by id.
#[derive(Clone, Debug, Default)]
pub struct KindRegistry {
    kinds: FxHashMap<KindId, KindDefinition>,
    next_id: u32,
}

impl KindRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh kind ID.
    pub fn allocate(&mut self) -> KindId {
        let id = KindId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register a kind definition.
    ///
    /// Panics if a kind with the same ID already exists.
    pub fn register(&mut self, kind: KindDefinition) {
        if self.kinds.contains_key(&kind.id) {
            panic!("Kind with ID {:?} already registered", kind.id);
        }
        self.next_id = self.next_id.max(kind.id.raw() + 1);
        self.kinds.insert(kind.id, kind);
    }

    /// Get a kind definition by ID.
    #[must_use]
    pub fn get(&self, id: KindId) -> Option<&KindDefinition> {
        self.kinds.get(&id)
    }

    /// Get a kind definition by ID, panicking if not found.
    ///
    /// Use when you're certain the kind exists.
    #[must_use]
    pub fn get_unchecked(&self, id: KindId) -> &KindDefinition {
        self.kinds.get(&id).expect("Kind not found in registry")
    }

    /// Check if a kind ID is registered.
    #[must_use]
    pub fn contains(&self, id: KindId) -> bool {
        self.kinds.contains_key(&id)
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Iterate over all definitions (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &KindDefinition> {
        self.kinds.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_labels() {
        assert_eq!(SpeciesTraits::duck().label(), "Duck");
        assert_eq!(SpeciesTraits::dog().label(), "Dog");
        assert_eq!(SpeciesTraits::duck_dog().label(), "Duck-Dog");
        assert_eq!(SpeciesTraits::creature().label(), "Creature");
    }

    #[test]
    fn test_duck_likeness_is_behavioral() {
        assert!(SpeciesTraits::duck_dog().is_duck_like());
        assert!(!SpeciesTraits::dog().is_duck_like());
        let half = SpeciesTraits {
            quacks: true,
            swims: false,
            dog: false,
        };
        assert!(!half.is_duck_like());
    }

    #[test]
    fn test_spawn_copies_overrides() {
        let def = KindDefinition::new(KindId::new(3), "Bruiser", 5)
            .with_species(SpeciesTraits::dog())
            .with_spawn_override(HookName::TakenDamage, Ability::animated_modifier(-1));

        let card = def.spawn();
        assert_eq!(card.name, "Bruiser");
        assert_eq!(card.kind, KindId::new(3));
        assert_eq!(card.current_power(), 5);
        assert_eq!(
            card.own_override(HookName::TakenDamage),
            Some(&Ability::animated_modifier(-1))
        );

        // Each spawn gets its own copy.
        let mut first = def.spawn();
        first.own.take(HookName::TakenDamage);
        let second = def.spawn();
        assert!(second.own_override(HookName::TakenDamage).is_some());
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = KindRegistry::new();
        let id = registry.allocate();
        registry.register(KindDefinition::new(id, "Gatling", 6));

        assert!(registry.contains(id));
        assert_eq!(registry.get(id).unwrap().name, "Gatling");
        assert_eq!(registry.len(), 1);
        assert!(registry.get(KindId::new(99)).is_none());
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_registry_rejects_duplicate_ids() {
        let mut registry = KindRegistry::new();
        let id = registry.allocate();
        registry.register(KindDefinition::new(id, "Duck", 2));
        registry.register(KindDefinition::new(id, "Dog", 3));
    }

    #[test]
    fn test_allocate_skips_registered_ids() {
        let mut registry = KindRegistry::new();
        registry.register(KindDefinition::new(KindId::new(5), "Nemo", 4));
        let next = registry.allocate();
        assert!(next.raw() > 5);
    }

    #[test]
    fn test_definition_serialization() {
        let def = KindDefinition::new(KindId::new(1), "Lad", 2)
            .with_species(SpeciesTraits::dog())
            .with_hook(HookName::DealtDamageToCreature, Ability::pack_modifier())
            .with_hook(HookName::AfterComingIntoPlay, Ability::TrackInPlay)
            .with_hook(HookName::BeforeRemoving, Ability::TrackInPlay);

        let json = serde_json::to_string(&def).unwrap();
        let deserialized: KindDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(def, deserialized);
    }
}
