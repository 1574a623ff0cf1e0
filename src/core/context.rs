//! Per-action game context.
//!
//! A `GameContext` is a transient value bundle the match driver builds
//! fresh for every action and passes down through hooks and the damage
//! pipeline. No card owns one.

use std::rc::Rc;

use crate::cards::CardId;
use crate::core::player::PlayerId;
use crate::view::View;

/// References an action needs: who is acting, who is opposite, and the
/// view to ask for re-renders. Cheap to clone.
#[derive(Clone)]
pub struct GameContext {
    /// The acting player.
    pub current_player: PlayerId,
    /// The opposing player.
    pub opposite_player: PlayerId,
    view: Rc<dyn View>,
}

impl GameContext {
    /// Build a context for an action by `current_player`.
    #[must_use]
    pub fn new(current_player: PlayerId, view: Rc<dyn View>) -> Self {
        Self {
            current_player,
            opposite_player: current_player.opponent(),
            view,
        }
    }

    /// The rendering collaborator.
    #[must_use]
    pub fn view(&self) -> &Rc<dyn View> {
        &self.view
    }

    /// Request a re-render of `card` after a stat or description change.
    pub fn update_view(&self, card: CardId) {
        self.view.update(card);
    }
}

impl std::fmt::Debug for GameContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameContext")
            .field("current_player", &self.current_player)
            .field("opposite_player", &self.opposite_player)
            .finish()
    }
}
