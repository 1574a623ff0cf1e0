//! Hook dispatch: the match's rule interpreter.
//!
//! Every hook that can affect game state is continuation-terminated:
//! the engine performs whatever synchronous or asynchronous work the
//! hook needs (including waiting on view cues), then resumes the
//! caller's continuation exactly once. Callers never proceed past a
//! hook invocation except inside that continuation - that is the
//! mechanism letting animations gate game-logic progression without
//! blocking anything.
//!
//! The `Engine` looks up the acting card's effective behavior (own
//! overlay merged over its kind default) and interprets the tagged
//! [`Ability`] it finds there. An absent hook is a no-op that forwards
//! the continuation unchanged, which is what makes every hook optional
//! for concrete kinds.
//!
//! ## Damage pipeline
//!
//! Damage is routed through the modifier chain in fixed order: the
//! dealer's dealt-damage modifier first, then the receiver's
//! taken-damage modifier, each consuming the previous stage's output.
//! No clamping happens inside the chain; the final value is applied
//! through the card's clamping power setter. Removal of defeated cards
//! is *not* performed here - mutating a table mid-iteration is unsafe,
//! so the driver sweeps after the action completes.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::cards::{Ability, CardId, HookName, ModifierOp};
use crate::core::{GameContext, MatchState, PlayerId};
use crate::tasks::{Continuation, TaskQueue};
use crate::view::View;

use super::transfer;

/// Cheap-clone handle over the shared match state and the view.
///
/// Continuation closures capture clones of this handle; all state
/// access happens in short borrow scopes that end before any view cue
/// or continuation runs.
#[derive(Clone)]
pub struct Engine {
    state: Rc<RefCell<MatchState>>,
    view: Rc<dyn View>,
}

impl Engine {
    /// Create an engine owning a fresh match state.
    #[must_use]
    pub fn new(state: MatchState, view: Rc<dyn View>) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
            view,
        }
    }

    /// Borrow the match state.
    ///
    /// Panics if called while a mutation is in progress; hold the
    /// borrow only for the current synchronous scope.
    #[must_use]
    pub fn state(&self) -> Ref<'_, MatchState> {
        self.state.borrow()
    }

    /// Mutably borrow the match state.
    pub fn state_mut(&self) -> RefMut<'_, MatchState> {
        self.state.borrow_mut()
    }

    /// The rendering collaborator.
    #[must_use]
    pub fn view(&self) -> &Rc<dyn View> {
        &self.view
    }

    /// Build a fresh per-action context for `current_player`.
    #[must_use]
    pub fn context(&self, current_player: PlayerId) -> GameContext {
        GameContext::new(current_player, Rc::clone(&self.view))
    }

    // === Before-attack hooks ===

    /// Run `card`'s before-attack hook, then resume `k`.
    pub fn before_attack(&self, card: CardId, ctx: &GameContext, k: Continuation) {
        let hook = self.state.borrow().effective_hook(card, HookName::BeforeAttack);
        match hook {
            None => k.done(),
            Some(Ability::RallyFlock {
                max_gain,
                power_gain,
            }) => self.rally_flock(max_gain, power_gain, ctx, k),
            Some(Ability::StealModifiers) => self.steal_modifiers(card, ctx, k),
            Some(Ability::AssumeBehavior) => self.assume_behavior(card, ctx, k),
            Some(other) => {
                tracing::debug!(%card, ?other, "ability not applicable before attack");
                k.done();
            }
        }
    }

    /// Buff every duck-like card on both tables, with a heal flourish
    /// per card (fire-and-forget; nothing waits on the cue).
    fn rally_flock(&self, max_gain: i64, power_gain: i64, ctx: &GameContext, k: Continuation) {
        // Collect first: buffing mutates the cards while the tables are
        // being read.
        let flock: Vec<CardId> = {
            let state = self.state.borrow();
            state
                .tabled()
                .into_iter()
                .map(|(_, _, card)| card)
                .filter(|&card| state.kind_of(card).species.is_duck_like())
                .collect()
        };

        for member in flock {
            {
                let mut state = self.state.borrow_mut();
                let card = state.card_unchecked_mut(member);
                card.max_power += max_gain;
                let current = card.current_power();
                card.set_current_power(current + power_gain);
            }
            self.view.signal_heal(member, Continuation::noop());
            ctx.update_view(member);
        }
        k.done();
    }

    /// Borrow-and-strip the three damage-modifier hooks from the first
    /// eligible enemy card.
    fn steal_modifiers(&self, card: CardId, ctx: &GameContext, k: Continuation) {
        let target = {
            let state = self.state.borrow();
            transfer::first_enemy_target(&state, ctx.opposite_player, card)
        };
        let Some(target) = target else {
            return k.done();
        };

        let siblings = transfer::steal_own_hooks(
            &mut self.state.borrow_mut(),
            card,
            target,
            &HookName::MODIFIERS,
        );
        for sibling in siblings {
            ctx.update_view(sibling);
        }
        ctx.update_view(card);
        k.done();
    }

    /// Assume the first eligible enemy card's entire behavior set for a
    /// single before-attack action, then drop the borrowed layer. Own
    /// hooks the borrowed action installs (a borrowed steal, say)
    /// outlive the drop.
    ///
    /// At most once per card: the guard flag makes a second invocation
    /// a pure forward. Setting the guard before recursing is what
    /// terminates a borrowed behavior that would assume again.
    fn assume_behavior(&self, card: CardId, ctx: &GameContext, k: Continuation) {
        if self.state.borrow().card_unchecked(card).has_assumed {
            return k.done();
        }
        let target = {
            let state = self.state.borrow();
            transfer::first_enemy_target(&state, ctx.opposite_player, card)
        };
        let Some(target) = target else {
            return k.done();
        };

        transfer::assume_behavior_set(&mut self.state.borrow_mut(), card, target);

        let ctx_after = ctx.clone();
        self.before_attack(
            card,
            ctx,
            Continuation::labeled("assumed before_attack", move |()| {
                ctx_after.update_view(card);
                ctx_after.update_view(target);
                k.done();
            }),
        );

        // Drop the layer on the way back up the call stack. With a
        // deferring view this lands before the borrowed action's
        // continuation fires; see the caveat on
        // `transfer::drop_assumed_set`.
        transfer::drop_assumed_set(&mut self.state.borrow_mut(), card);
    }

    // === Attack ===

    /// Run `card`'s attack from `slot`: signal the attack animation,
    /// then apply damage. The default engages the defender at the same
    /// slot on the opposing table, or the opposing player if that slot
    /// is empty; a sweep override damages every occupied enemy slot in
    /// board order.
    pub fn attack(&self, card: CardId, slot: usize, ctx: &GameContext, k: Continuation) {
        let style = self.state.borrow().effective_hook(card, HookName::Attack);
        if let Some(Ability::SweepAttack { damage }) = style {
            self.sweep_attack(card, damage, ctx, k);
        } else {
            self.single_attack(card, slot, ctx, k);
        }
    }

    fn single_attack(&self, card: CardId, slot: usize, ctx: &GameContext, k: Continuation) {
        let (power, defender) = {
            let state = self.state.borrow();
            (
                state.card_unchecked(card).current_power(),
                state.player(ctx.opposite_player).card_at(slot),
            )
        };

        let this = self.clone();
        let ctx = ctx.clone();
        self.view.show_attack(
            card,
            Continuation::labeled("attack cue", move |()| match defender {
                Some(defender) => this.deal_damage_to_creature(power, card, defender, &ctx, k),
                None => this.deal_damage_to_player(power, card, &ctx, k),
            }),
        );
    }

    /// One attack cue, then one damage step per enemy slot in board
    /// order, empty slots skipped, all strictly sequenced.
    fn sweep_attack(&self, card: CardId, damage: i64, ctx: &GameContext, k: Continuation) {
        let queue = TaskQueue::new();

        {
            let view = Rc::clone(&self.view);
            queue.push(move |done| view.show_attack(card, done));
        }

        let slots: Vec<Option<CardId>> = self
            .state
            .borrow()
            .player(ctx.opposite_player)
            .table
            .clone();
        for target in slots {
            let this = self.clone();
            let ctx = ctx.clone();
            queue.push(move |done| match target {
                Some(target) => this.deal_damage_to_creature(damage, card, target, &ctx, done),
                None => done.done(),
            });
        }

        queue.continue_with(k);
    }

    // === Damage pipeline ===

    /// Deal `value` damage from `from` to the creature `to`, routed
    /// through both cards' modifier chains, then applied through the
    /// clamping power setter. The defeated card stays tabled until the
    /// driver's sweep.
    pub fn deal_damage_to_creature(
        &self,
        value: i64,
        from: CardId,
        to: CardId,
        ctx: &GameContext,
        k: Continuation,
    ) {
        let this = self.clone();
        let ctx_taken = ctx.clone();
        self.modify_dealt_to_creature(
            value,
            from,
            to,
            ctx,
            Continuation::new(move |dealt: i64| {
                let apply = this.clone();
                let ctx_apply = ctx_taken.clone();
                this.modify_taken(
                    dealt,
                    to,
                    from,
                    &ctx_taken,
                    Continuation::new(move |taken: i64| {
                        {
                            let mut state = apply.state.borrow_mut();
                            let card = state.card_unchecked_mut(to);
                            let current = card.current_power();
                            card.set_current_power(current - taken);
                        }
                        tracing::debug!(%from, %to, amount = taken, "damage applied");
                        ctx_apply.update_view(to);
                        k.done();
                    }),
                );
            }),
        );
    }

    /// Deal `value` damage from `from` to the opposing player, routed
    /// through the dealer's player-damage modifier.
    pub fn deal_damage_to_player(
        &self,
        value: i64,
        from: CardId,
        ctx: &GameContext,
        k: Continuation,
    ) {
        let this = self.clone();
        let opposite = ctx.opposite_player;
        self.modify_dealt_to_player(
            value,
            from,
            ctx,
            Continuation::new(move |dealt: i64| {
                this.state.borrow_mut().player_mut(opposite).power -= dealt;
                tracing::debug!(%from, %opposite, amount = dealt, "player damage applied");
                k.done();
            }),
        );
    }

    /// Dealer-side stage for creature-directed damage.
    pub fn modify_dealt_to_creature(
        &self,
        value: i64,
        card: CardId,
        _target: CardId,
        _ctx: &GameContext,
        k: Continuation<i64>,
    ) {
        let hook = self
            .state
            .borrow()
            .effective_hook(card, HookName::DealtDamageToCreature);
        match hook {
            Some(Ability::ModifyDamage { op, animate }) => {
                self.run_modifier(card, op, animate, value, k);
            }
            _ => k.resume(value),
        }
    }

    /// Dealer-side stage for player-directed damage.
    pub fn modify_dealt_to_player(
        &self,
        value: i64,
        card: CardId,
        _ctx: &GameContext,
        k: Continuation<i64>,
    ) {
        let hook = self
            .state
            .borrow()
            .effective_hook(card, HookName::DealtDamageToPlayer);
        match hook {
            Some(Ability::ModifyDamage { op, animate }) => {
                self.run_modifier(card, op, animate, value, k);
            }
            _ => k.resume(value),
        }
    }

    /// Receiver-side stage; consumes the dealer stage's output.
    pub fn modify_taken(
        &self,
        value: i64,
        card: CardId,
        _from: CardId,
        _ctx: &GameContext,
        k: Continuation<i64>,
    ) {
        let hook = self.state.borrow().effective_hook(card, HookName::TakenDamage);
        match hook {
            Some(Ability::ModifyDamage { op, animate }) => {
                self.run_modifier(card, op, animate, value, k);
            }
            _ => k.resume(value),
        }
    }

    /// Apply one modifier op, optionally behind the ability cue.
    fn run_modifier(
        &self,
        card: CardId,
        op: ModifierOp,
        animate: bool,
        value: i64,
        k: Continuation<i64>,
    ) {
        let out = {
            let state = self.state.borrow();
            match op {
                ModifierOp::Flat(delta) => value + delta,
                ModifierOp::Scale(factor) => value * factor,
                ModifierOp::PackBonus => {
                    value + state.pack_bonus(state.card_unchecked(card).kind)
                }
            }
        };

        if animate {
            self.view
                .signal_ability(card, Continuation::new(move |()| k.resume(out)));
        } else {
            k.resume(out);
        }
    }

    // === Lifecycle ===

    /// Run `card`'s coming-into-play hook, then resume `k`.
    ///
    /// Paired with [`before_removing`](Engine::before_removing): the
    /// two keep the match-scoped in-play counters accurate.
    pub fn after_coming_into_play(&self, card: CardId, _ctx: &GameContext, k: Continuation) {
        let hook = self
            .state
            .borrow()
            .effective_hook(card, HookName::AfterComingIntoPlay);
        if let Some(Ability::TrackInPlay) = hook {
            let mut state = self.state.borrow_mut();
            let kind = state.card_unchecked(card).kind;
            state.add_in_play(kind, 1);
        }
        k.done();
    }

    /// Run `card`'s before-removing hook, then resume `k`.
    pub fn before_removing(&self, card: CardId, k: Continuation) {
        let hook = self
            .state
            .borrow()
            .effective_hook(card, HookName::BeforeRemoving);
        if let Some(Ability::TrackInPlay) = hook {
            let mut state = self.state.borrow_mut();
            let kind = state.card_unchecked(card).kind;
            state.add_in_play(kind, -1);
        }
        k.done();
    }

    /// Remove the card at `slot` from `owner`'s table: before-removing
    /// hook, removal animation, then clear the slot. A no-op on an
    /// empty slot.
    pub fn remove_from_play(&self, owner: PlayerId, slot: usize, k: Continuation) {
        let card = self.state.borrow().player(owner).card_at(slot);
        let Some(card) = card else {
            return k.done();
        };

        let this = self.clone();
        self.before_removing(
            card,
            Continuation::labeled("removal", move |()| {
                let after = this.clone();
                let view = Rc::clone(&this.view);
                view.remove(
                    card,
                    Continuation::new(move |()| {
                        after.state.borrow_mut().player_mut(owner).clear_slot(slot);
                        k.done();
                    }),
                );
            }),
        );
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::roster::standard_roster;
    use crate::cards::KindRegistry;
    use crate::core::Player;
    use crate::view::NullView;
    use std::cell::Cell;

    fn engine() -> (Engine, crate::cards::roster::Roster) {
        let mut registry = KindRegistry::new();
        let roster = standard_roster(&mut registry);
        let state = MatchState::new(registry, Player::new("Sheriff"), Player::new("Bandit"));
        (Engine::new(state, Rc::new(NullView)), roster)
    }

    #[test]
    fn test_absent_hook_forwards_unchanged() {
        let (engine, roster) = engine();
        let duck = engine.state_mut().spawn(roster.duck);
        let ctx = engine.context(PlayerId::new(0));

        let seen = Rc::new(Cell::new(0));
        let inner = Rc::clone(&seen);
        engine.modify_dealt_to_creature(
            3,
            duck,
            duck,
            &ctx,
            Continuation::new(move |v: i64| inner.set(v)),
        );
        assert_eq!(seen.get(), 3);
    }

    #[test]
    fn test_before_attack_default_is_noop() {
        let (engine, roster) = engine();
        let duck = engine.state_mut().spawn(roster.duck);
        let ctx = engine.context(PlayerId::new(0));

        let fired = Rc::new(Cell::new(false));
        let inner = Rc::clone(&fired);
        engine.before_attack(duck, &ctx, Continuation::new(move |()| inner.set(true)));
        assert!(fired.get());
    }

    #[test]
    fn test_lifecycle_hooks_are_paired() {
        let (engine, roster) = engine();
        let lad = engine.state_mut().spawn(roster.lad);
        let ctx = engine.context(PlayerId::new(0));

        engine.after_coming_into_play(lad, &ctx, Continuation::noop());
        assert_eq!(engine.state().in_play_count(roster.lad), 1);

        engine.before_removing(lad, Continuation::noop());
        assert_eq!(engine.state().in_play_count(roster.lad), 0);
    }

    #[test]
    fn test_remove_from_play_clears_slot() {
        let (engine, roster) = engine();
        let dog = engine.state_mut().spawn(roster.dog);
        engine
            .state_mut()
            .player_mut(PlayerId::new(1))
            .table = vec![Some(dog)];

        engine.remove_from_play(PlayerId::new(1), 0, Continuation::noop());
        assert!(engine.state().player(PlayerId::new(1)).is_defeated());
    }
}
