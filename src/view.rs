//! The rendering collaborator seam.
//!
//! The core never draws anything; it asks a [`View`] for animation cues
//! and re-renders, and waits on the cue's [`Continuation`] before
//! letting game logic proceed. That is the whole mechanism by which
//! animations gate rule resolution without blocking a thread: a view is
//! free to park the continuation and resume it whenever its animation
//! finishes.
//!
//! [`NullView`] resumes every cue synchronously (headless play, most
//! tests). [`RecordingView`] additionally logs every call, and can park
//! continuations for manual release to exercise the gating contract.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::cards::CardId;
use crate::tasks::Continuation;

/// Rendering collaborator, per match.
///
/// Each cue receives a continuation it must resume exactly once when
/// the animation finishes. `update` is a plain re-render request after
/// a stat or description change; nothing waits on it.
pub trait View {
    /// Attack animation for `card`.
    fn show_attack(&self, card: CardId, done: Continuation);

    /// Ability flourish for `card`.
    fn signal_ability(&self, card: CardId, done: Continuation);

    /// Heal flourish for `card`.
    fn signal_heal(&self, card: CardId, done: Continuation);

    /// Removal animation for `card` as it leaves play.
    fn remove(&self, card: CardId, done: Continuation);

    /// Re-render `card` after a stat or description change.
    fn update(&self, card: CardId);
}

/// A view that completes every cue immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullView;

impl View for NullView {
    fn show_attack(&self, _card: CardId, done: Continuation) {
        done.done();
    }

    fn signal_ability(&self, _card: CardId, done: Continuation) {
        done.done();
    }

    fn signal_heal(&self, _card: CardId, done: Continuation) {
        done.done();
    }

    fn remove(&self, _card: CardId, done: Continuation) {
        done.done();
    }

    fn update(&self, _card: CardId) {}
}

/// One observed view call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    Attack(CardId),
    Ability(CardId),
    Heal(CardId),
    Remove(CardId),
    Update(CardId),
}

/// Test double: records every call in order.
///
/// In deferred mode, cue continuations are parked instead of resumed;
/// [`release_next`](RecordingView::release_next) fires them one at a
/// time, which is how tests assert that game logic does not outrun its
/// animations.
#[derive(Default)]
pub struct RecordingView {
    events: RefCell<Vec<ViewEvent>>,
    deferred: Cell<bool>,
    parked: RefCell<VecDeque<Continuation>>,
}

impl RecordingView {
    /// A synchronous recording view.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// A recording view that parks every cue continuation.
    #[must_use]
    pub fn deferred() -> Rc<Self> {
        let view = Self::default();
        view.deferred.set(true);
        Rc::new(view)
    }

    /// Snapshot of the observed calls so far.
    #[must_use]
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.borrow().clone()
    }

    /// Number of parked cue continuations.
    #[must_use]
    pub fn parked_count(&self) -> usize {
        self.parked.borrow().len()
    }

    /// Resume the oldest parked continuation. Returns `false` if none
    /// was waiting.
    pub fn release_next(&self) -> bool {
        let next = self.parked.borrow_mut().pop_front();
        match next {
            Some(done) => {
                done.done();
                true
            }
            None => false,
        }
    }

    /// Resume parked continuations until none remain, including ones
    /// parked by the resumes themselves.
    pub fn release_all(&self) {
        while self.release_next() {}
    }

    fn cue(&self, event: ViewEvent, done: Continuation) {
        self.events.borrow_mut().push(event);
        if self.deferred.get() {
            self.parked.borrow_mut().push_back(done);
        } else {
            done.done();
        }
    }
}

impl View for RecordingView {
    fn show_attack(&self, card: CardId, done: Continuation) {
        self.cue(ViewEvent::Attack(card), done);
    }

    fn signal_ability(&self, card: CardId, done: Continuation) {
        self.cue(ViewEvent::Ability(card), done);
    }

    fn signal_heal(&self, card: CardId, done: Continuation) {
        self.cue(ViewEvent::Heal(card), done);
    }

    fn remove(&self, card: CardId, done: Continuation) {
        self.cue(ViewEvent::Remove(card), done);
    }

    fn update(&self, card: CardId) {
        self.events.borrow_mut().push(ViewEvent::Update(card));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_view_resumes_synchronously() {
        let fired = Rc::new(Cell::new(false));
        let inner = Rc::clone(&fired);

        NullView.show_attack(CardId::new(0), Continuation::new(move |()| inner.set(true)));
        assert!(fired.get());
    }

    #[test]
    fn test_recording_view_logs_in_order() {
        let view = RecordingView::new();
        view.show_attack(CardId::new(1), Continuation::noop());
        view.update(CardId::new(2));
        view.signal_heal(CardId::new(3), Continuation::noop());

        assert_eq!(
            view.events(),
            vec![
                ViewEvent::Attack(CardId::new(1)),
                ViewEvent::Update(CardId::new(2)),
                ViewEvent::Heal(CardId::new(3)),
            ]
        );
    }

    #[test]
    fn test_deferred_view_parks_cues() {
        let view = RecordingView::deferred();
        let fired = Rc::new(Cell::new(false));
        let inner = Rc::clone(&fired);

        view.signal_ability(CardId::new(1), Continuation::new(move |()| inner.set(true)));
        assert!(!fired.get());
        assert_eq!(view.parked_count(), 1);

        assert!(view.release_next());
        assert!(fired.get());
        assert!(!view.release_next());
    }
}
