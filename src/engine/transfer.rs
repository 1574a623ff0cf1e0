//! Capability transfer: moving or borrowing behavior between cards.
//!
//! Transfers operate strictly on a target card's **own** overrides -
//! hooks it personally carries. Kind-level defaults are never touched,
//! so sibling cards sharing a kind's behavior are structurally
//! unaffected; only their displayed descriptions may need a refresh.
//!
//! Two variants:
//!
//! - *Borrow-and-strip* ([`steal_own_hooks`]): permanently move a named
//!   set of hooks from the target onto the actor; the target reverts to
//!   its kind default.
//! - *Full-assume* ([`assume_behavior_set`] / [`drop_assumed_set`]):
//!   adopt the target's effective set as a temporary layer between the
//!   actor's own set and its kind default for the duration of one
//!   action, then drop it. Hooks the borrowed action writes into the
//!   actor's own set (a borrowed steal, say) outlive the drop.

use crate::cards::{CardId, HookName};
use crate::core::{MatchState, PlayerId};

/// The first occupied slot on `opponent`'s table holding a card other
/// than `actor`, in board order. `None` when no eligible target exists,
/// which makes every transfer a no-op.
#[must_use]
pub fn first_enemy_target(
    state: &MatchState,
    opponent: PlayerId,
    actor: CardId,
) -> Option<CardId> {
    state
        .player(opponent)
        .occupied()
        .map(|(_, card)| card)
        .find(|&card| card != actor)
}

/// Move each hook in `hooks` that `target` personally carries onto
/// `actor`, stripping it from `target`.
///
/// Returns the tabled cards sharing `target`'s kind (target included):
/// their effective behavior is unchanged, but their displayed
/// descriptions may depend on ability presence, so the caller should
/// refresh their views.
pub fn steal_own_hooks(
    state: &mut MatchState,
    actor: CardId,
    target: CardId,
    hooks: &[HookName],
) -> Vec<CardId> {
    for &hook in hooks {
        if let Some(ability) = state.card_unchecked_mut(target).own.take(hook) {
            tracing::debug!(%actor, %target, %hook, "hook stolen");
            state.card_unchecked_mut(actor).own.set(hook, ability);
        }
    }
    state.kind_siblings(target)
}

/// Install `target`'s effective behavior set as `actor`'s assumed
/// layer and raise the at-most-once guard.
///
/// The layer sits between the actor's own set and its kind default, so
/// hooks the borrowed action installs into the own set shadow it and
/// survive the later [`drop_assumed_set`].
///
/// The guard is set *before* the borrowed identity acts, so a borrowed
/// behavior that would assume again terminates immediately.
pub fn assume_behavior_set(state: &mut MatchState, actor: CardId, target: CardId) {
    let borrowed = state.effective_behavior(target);
    tracing::debug!(%actor, %target, "behavior set assumed");
    let card = state.card_unchecked_mut(actor);
    card.has_assumed = true;
    card.assumed = Some(borrowed);
}

/// Drop `actor`'s assumed layer after its single borrowed action.
///
/// Caveat: the caller drops it on the way back up the call stack, so
/// with a deferring view the drop can land before the borrowed
/// action's continuation fires.
pub fn drop_assumed_set(state: &mut MatchState, actor: CardId) {
    state.card_unchecked_mut(actor).assumed = None;
}
