//! Sequential asynchronous task queue.
//!
//! A [`TaskQueue`] owns an ordered sequence of steps. Each step receives
//! a done-[`Continuation`] and must resume it exactly once - synchronously
//! or after any delay - to let the next step start. Once every pushed
//! step has completed and no further steps are pending, the queue fires
//! its own completion continuation.
//!
//! Used wherever a hook needs more than one animated sub-step, e.g. an
//! attack that damages every enemy card in board order.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::continuation::Continuation;

/// A unit of deferred work: performs one step, then resumes the given
/// done signal exactly once.
type Step = Box<dyn FnOnce(Continuation)>;

#[derive(Default)]
struct QueueState {
    pending: VecDeque<Step>,
    /// Set by `continue_with`; steps only run after that.
    started: bool,
    /// A step has been handed its done signal and has not resumed yet.
    in_flight: bool,
    on_complete: Option<Continuation>,
}

/// Sequential async runner.
///
/// ## Ordering guarantees
///
/// - Step *i+1* never starts before step *i*'s done signal fires.
/// - No two steps run concurrently.
/// - The completion continuation fires only when the pending sequence
///   is empty and nothing is in flight. "Has a next step" is the
///   authoritative test, so pushes racing finalization are tolerated:
///   a step pushed while the last one is still running simply extends
///   the sequence.
///
/// ## Failure semantics
///
/// A step that never resumes its done signal stalls the queue
/// indefinitely. That is a caller contract violation, not a recoverable
/// error; the queue performs no timeout (the dropped-continuation
/// watchdog in [`Continuation`] is the only development aid).
///
/// ## Example
///
/// ```
/// use card_duel::tasks::{Continuation, TaskQueue};
/// use std::{cell::RefCell, rc::Rc};
///
/// let log = Rc::new(RefCell::new(Vec::new()));
/// let queue = TaskQueue::new();
///
/// for i in 0..3 {
///     let log = Rc::clone(&log);
///     queue.push(move |done| {
///         log.borrow_mut().push(i);
///         done.done();
///     });
/// }
///
/// let log2 = Rc::clone(&log);
/// queue.continue_with(Continuation::new(move |()| log2.borrow_mut().push(99)));
/// assert_eq!(*log.borrow(), vec![0, 1, 2, 99]);
/// ```
#[derive(Clone, Default)]
pub struct TaskQueue {
    state: Rc<RefCell<QueueState>>,
}

impl TaskQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to the pending sequence.
    ///
    /// Pushing after the queue has started running is permitted and
    /// simply extends the sequence.
    pub fn push(&self, step: impl FnOnce(Continuation) + 'static) {
        let run_now = {
            let mut state = self.state.borrow_mut();
            state.pending.push_back(Box::new(step));
            state.started && !state.in_flight
        };
        if run_now {
            Self::advance(&self.state);
        }
    }

    /// Begin execution (if not already started) and register the
    /// continuation to fire once the last step has completed.
    ///
    /// On an empty queue this fires `on_complete` immediately.
    pub fn continue_with(&self, on_complete: Continuation) {
        {
            let mut state = self.state.borrow_mut();
            state.started = true;
            state.on_complete = Some(on_complete);
        }
        Self::advance(&self.state);
    }

    /// Number of steps not yet started.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Run the next pending step, or finalize if there is none.
    fn advance(shared: &Rc<RefCell<QueueState>>) {
        // The borrow must end before the step (or the completion
        // continuation) runs: either may synchronously re-enter the
        // queue via `push` or the done signal.
        let next = {
            let mut state = shared.borrow_mut();
            if !state.started || state.in_flight {
                return;
            }
            match state.pending.pop_front() {
                Some(step) => {
                    state.in_flight = true;
                    Some(step)
                }
                None => {
                    if let Some(on_complete) = state.on_complete.take() {
                        drop(state);
                        on_complete.done();
                    }
                    return;
                }
            }
        };

        if let Some(step) = next {
            let handle = Rc::clone(shared);
            let done = Continuation::labeled("task queue step", move |()| {
                handle.borrow_mut().in_flight = false;
                TaskQueue::advance(&handle);
            });
            step(done);
        }
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("TaskQueue")
            .field("pending", &state.pending.len())
            .field("started", &state.started)
            .field("in_flight", &state.in_flight)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_steps_run_in_push_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let queue = TaskQueue::new();

        for i in 0..5 {
            let log = Rc::clone(&log);
            queue.push(move |done| {
                log.borrow_mut().push(i);
                done.done();
            });
        }

        queue.continue_with(Continuation::noop());
        assert_eq!(*log.borrow(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_queue_completes_immediately() {
        let fired = Rc::new(RefCell::new(0));
        let queue = TaskQueue::new();

        let inner = Rc::clone(&fired);
        queue.continue_with(Continuation::new(move |()| *inner.borrow_mut() += 1));

        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn test_steps_wait_for_continue_with() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let queue = TaskQueue::new();

        let inner = Rc::clone(&log);
        queue.push(move |done| {
            inner.borrow_mut().push("step");
            done.done();
        });

        assert!(log.borrow().is_empty(), "step must not run before continue_with");
        queue.continue_with(Continuation::noop());
        assert_eq!(*log.borrow(), vec!["step"]);
    }

    #[test]
    fn test_deferred_step_gates_successors() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let parked: Rc<RefCell<Option<Continuation>>> = Rc::new(RefCell::new(None));
        let queue = TaskQueue::new();

        {
            let log = Rc::clone(&log);
            let parked = Rc::clone(&parked);
            queue.push(move |done| {
                log.borrow_mut().push("first");
                *parked.borrow_mut() = Some(done); // resume later
            });
        }
        {
            let log = Rc::clone(&log);
            queue.push(move |done| {
                log.borrow_mut().push("second");
                done.done();
            });
        }

        let inner = Rc::clone(&log);
        queue.continue_with(Continuation::new(move |()| inner.borrow_mut().push("complete")));

        // First step suspended: nothing else may have run.
        assert_eq!(*log.borrow(), vec!["first"]);

        let done = parked.borrow_mut().take().unwrap();
        done.done();
        assert_eq!(*log.borrow(), vec!["first", "second", "complete"]);
    }

    #[test]
    fn test_push_while_running_extends_sequence() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let queue = TaskQueue::new();

        {
            let log = Rc::clone(&log);
            let queue2 = queue.clone();
            queue.push(move |done| {
                log.borrow_mut().push(1);
                let log = Rc::clone(&log);
                queue2.push(move |done| {
                    log.borrow_mut().push(2);
                    done.done();
                });
                done.done();
            });
        }

        let inner = Rc::clone(&log);
        queue.continue_with(Continuation::new(move |()| inner.borrow_mut().push(99)));
        assert_eq!(*log.borrow(), vec![1, 2, 99]);
    }

    #[test]
    fn test_completion_fires_exactly_once() {
        let fired = Rc::new(RefCell::new(0));
        let queue = TaskQueue::new();

        {
            let queue2 = queue.clone();
            queue.push(move |done| {
                // Steps may be pushed from inside a step even after the
                // finalizer is registered.
                queue2.push(|done| done.done());
                done.done();
            });
        }

        let inner = Rc::clone(&fired);
        queue.continue_with(Continuation::new(move |()| *inner.borrow_mut() += 1));
        assert_eq!(*fired.borrow(), 1);
    }
}
