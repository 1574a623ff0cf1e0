//! The match driver.
//!
//! `Game` walks attacker/defender pairs each turn, invoking card hooks
//! in fixed order and never proceeding past a hook except inside its
//! continuation. Defeated cards are swept only after the acting
//! player's full round completes - removal never mutates a table an
//! action is still iterating.
//!
//! A player loses when their board is emptied. Both boards emptying on
//! the same sweep is a draw, as is hitting the turn limit.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::cards::{KindId, KindRegistry};
use crate::core::{MatchState, Player, PlayerId};
use crate::engine::Engine;
use crate::tasks::{Continuation, TaskQueue};
use crate::view::View;

/// Result of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// No winner (mutual defeat or turn limit).
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }
}

/// A starting deck: player name plus an ordered kind sequence. Slot
/// *i* of the player's table holds the card spawned from `kinds[i]`.
#[derive(Clone, Debug)]
pub struct Deck {
    pub player_name: String,
    pub kinds: Vec<KindId>,
}

impl Deck {
    /// Create a deck.
    #[must_use]
    pub fn new(player_name: impl Into<String>, kinds: impl Into<Vec<KindId>>) -> Self {
        Self {
            player_name: player_name.into(),
            kinds: kinds.into(),
        }
    }
}

/// A two-player match over a kind registry.
#[derive(Clone)]
pub struct Game {
    engine: Engine,
    turn_limit: u32,
}

impl Game {
    /// Turns before a stalemate is declared a draw.
    pub const DEFAULT_TURN_LIMIT: u32 = 1000;

    /// Build a match: spawn both decks onto the tables in board order.
    #[must_use]
    pub fn new(registry: KindRegistry, first: Deck, second: Deck, view: Rc<dyn View>) -> Self {
        let mut state = MatchState::new(
            registry,
            Player::new(first.player_name),
            Player::new(second.player_name),
        );

        for (player, kinds) in [(PlayerId::new(0), first.kinds), (PlayerId::new(1), second.kinds)]
        {
            let table: Vec<_> = kinds
                .into_iter()
                .map(|kind| Some(state.spawn(kind)))
                .collect();
            state.player_mut(player).table = table;
        }

        Self {
            engine: Engine::new(state, view),
            turn_limit: Self::DEFAULT_TURN_LIMIT,
        }
    }

    /// Override the turn limit (builder pattern).
    #[must_use]
    pub fn with_turn_limit(mut self, limit: u32) -> Self {
        self.turn_limit = limit;
        self
    }

    /// The resolution engine (for inspection in tests and frontends).
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Play the match to completion. `on_finished` fires exactly once
    /// with the result - immediately with a synchronous view, or
    /// whenever the last animation completes with a deferring one.
    pub fn play(&self, on_finished: impl FnOnce(GameResult) + 'static) {
        // Lifecycle opening: every placed card comes into play before
        // the first attack.
        let queue = TaskQueue::new();
        for (owner, _, card) in self.engine.state().tabled() {
            let engine = self.engine.clone();
            queue.push(move |done| {
                let ctx = engine.context(owner);
                engine.after_coming_into_play(card, &ctx, done);
            });
        }

        let this = self.clone();
        queue.continue_with(Continuation::labeled("opening", move |()| {
            this.run_turn(PlayerId::new(0), 0, Box::new(on_finished));
        }));
    }

    /// Drive rounds from `current` onward until the match ends.
    ///
    /// Rounds that complete synchronously (every cue resumed before
    /// the round call returns) advance through the loop below, so
    /// match length never grows the stack. Only a genuinely deferred
    /// round (a cue was parked) resumes by re-entering here from its
    /// continuation.
    fn run_turn(&self, current: PlayerId, turn: u32, finish: Box<dyn FnOnce(GameResult)>) {
        let mut current = current;
        let mut turn = turn;
        let mut finish = finish;
        loop {
            if let Some(result) = self.terminal() {
                tracing::info!(?result, turn, "match over");
                return finish(result);
            }
            if turn >= self.turn_limit {
                tracing::info!(turn, "turn limit reached, declaring a draw");
                return finish(GameResult::Draw);
            }
            tracing::debug!(%current, turn, "turn start");

            // Handshake with the round continuation: while this frame
            // is still on the stack a synchronous completion only sets
            // the flag and the loop iterates; once the frame has
            // returned, the continuation re-enters run_turn instead.
            let on_stack = Rc::new(Cell::new(true));
            let completed = Rc::new(Cell::new(false));
            let parked_finish: Rc<RefCell<Option<Box<dyn FnOnce(GameResult)>>>> =
                Rc::new(RefCell::new(Some(finish)));

            {
                let this = self.clone();
                let on_stack = Rc::clone(&on_stack);
                let completed = Rc::clone(&completed);
                let parked_finish = Rc::clone(&parked_finish);
                self.play_round(
                    current,
                    Continuation::labeled("round", move |()| {
                        if on_stack.get() {
                            completed.set(true);
                        } else {
                            let resumed = parked_finish.borrow_mut().take();
                            if let Some(finish) = resumed {
                                this.run_turn(current.opponent(), turn + 1, finish);
                            }
                        }
                    }),
                );
            }

            on_stack.set(false);
            if !completed.get() {
                return;
            }
            match parked_finish.borrow_mut().take() {
                Some(resumed) => finish = resumed,
                None => return,
            }
            current = current.opponent();
            turn += 1;
        }
    }

    /// One full round for `current`: every occupied slot attacks in
    /// board order, then the defeated sweep, then `k`.
    fn play_round(&self, current: PlayerId, k: Continuation) {
        let queue = TaskQueue::new();
        let slots: Vec<_> = self.engine.state().player(current).occupied().collect();
        for (slot, card) in slots {
            let engine = self.engine.clone();
            queue.push(move |done| {
                // A card defeated earlier in this round stays tabled
                // until the sweep but no longer acts.
                if engine.state().card_unchecked(card).is_defeated() {
                    return done.done();
                }
                let ctx = engine.context(current);
                let attack_engine = engine.clone();
                let attack_ctx = ctx.clone();
                engine.before_attack(
                    card,
                    &ctx,
                    Continuation::labeled("before_attack", move |()| {
                        attack_engine.attack(card, slot, &attack_ctx, done);
                    }),
                );
            });
        }

        let this = self.clone();
        queue.continue_with(Continuation::labeled("round actions", move |()| {
            this.sweep_defeated(k);
        }));
    }

    /// Remove every defeated card from both tables, strictly in board
    /// order, each through its before-removing hook and removal cue.
    fn sweep_defeated(&self, k: Continuation) {
        let queue = TaskQueue::new();
        for (owner, slot, card) in self.engine.state().defeated_on_table() {
            tracing::debug!(%card, %owner, slot, "removing defeated card");
            let engine = self.engine.clone();
            queue.push(move |done| engine.remove_from_play(owner, slot, done));
        }
        queue.continue_with(k);
    }

    /// The match result, if either board has emptied.
    fn terminal(&self) -> Option<GameResult> {
        let state = self.engine.state();
        let first_out = state.player(PlayerId::new(0)).is_defeated();
        let second_out = state.player(PlayerId::new(1)).is_defeated();
        match (first_out, second_out) {
            (true, true) => Some(GameResult::Draw),
            (true, false) => Some(GameResult::Winner(PlayerId::new(1))),
            (false, true) => Some(GameResult::Winner(PlayerId::new(0))),
            (false, false) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::new(0));
        assert!(result.is_winner(PlayerId::new(0)));
        assert!(!result.is_winner(PlayerId::new(1)));
        assert!(!GameResult::Draw.is_winner(PlayerId::new(0)));
    }
}
