//! One-shot continuations.
//!
//! Every hook and task in the engine terminates by resuming a
//! [`Continuation`] exactly once. "Exactly once" is enforced by move
//! semantics: `resume` consumes the handle, so resuming twice does not
//! compile. The other half of the contract - a continuation that is
//! never resumed - stalls the caller; there is no timeout, but dropping
//! an unfired continuation emits a `tracing` warning as a
//! development-mode watchdog.

/// A one-shot resume handle: "what happens next".
///
/// `T` is the value the suspended caller is waiting for. Plain
/// completion signals use the default `Continuation<()>` and the
/// [`done`](Continuation::done) shorthand; value-transforming hooks
/// (the damage pipeline) use `Continuation<i64>`.
///
/// ## Example
///
/// ```
/// use card_duel::tasks::Continuation;
/// use std::{cell::Cell, rc::Rc};
///
/// let out = Rc::new(Cell::new(0));
/// let inner = Rc::clone(&out);
/// let k = Continuation::new(move |v: i64| inner.set(v));
/// k.resume(7);
/// assert_eq!(out.get(), 7);
/// ```
pub struct Continuation<T = ()> {
    resume: Option<Box<dyn FnOnce(T)>>,
    label: &'static str,
}

impl<T> Continuation<T> {
    /// Create a continuation from a closure.
    pub fn new(resume: impl FnOnce(T) + 'static) -> Self {
        Self {
            resume: Some(Box::new(resume)),
            label: "continuation",
        }
    }

    /// Create a labeled continuation.
    ///
    /// The label only appears in the dropped-without-firing warning,
    /// which makes a stalled chain much easier to locate.
    pub fn labeled(label: &'static str, resume: impl FnOnce(T) + 'static) -> Self {
        Self {
            resume: Some(Box::new(resume)),
            label,
        }
    }

    /// A continuation that discards its value.
    ///
    /// For fire-and-forget cues (e.g. a heal flourish nobody waits on).
    /// Dropping a noop continuation never warns.
    #[must_use]
    pub fn noop() -> Self {
        Self {
            resume: None,
            label: "noop",
        }
    }

    /// Resume the suspended caller with `value`.
    ///
    /// Consumes the handle; a continuation cannot be resumed twice.
    pub fn resume(mut self, value: T) {
        if let Some(resume) = self.resume.take() {
            resume(value);
        }
    }
}

impl Continuation<()> {
    /// Shorthand for `resume(())` on plain completion signals.
    pub fn done(self) {
        self.resume(());
    }
}

impl<T> Drop for Continuation<T> {
    fn drop(&mut self) {
        // A live closure here means some step forgot to resume. That is
        // a caller contract violation (the chain above is now stalled),
        // so make it visible in development runs.
        if self.resume.is_some() && !std::thread::panicking() {
            tracing::warn!(label = self.label, "continuation dropped without firing");
        }
    }
}

impl<T> std::fmt::Debug for Continuation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Continuation")
            .field("label", &self.label)
            .field("pending", &self.resume.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_resume_delivers_value() {
        let seen = Rc::new(Cell::new(0));
        let inner = Rc::clone(&seen);

        let k = Continuation::new(move |v: i64| inner.set(v));
        k.resume(42);

        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn test_done_shorthand() {
        let fired = Rc::new(Cell::new(false));
        let inner = Rc::clone(&fired);

        let k = Continuation::new(move |()| inner.set(true));
        k.done();

        assert!(fired.get());
    }

    #[test]
    fn test_noop_is_silent() {
        let k: Continuation<i64> = Continuation::noop();
        k.resume(99); // discarded
    }

    #[test]
    fn test_resume_fires_exactly_once() {
        // Double-resume is a compile error (resume consumes self), so
        // the runtime invariant to check is single delivery.
        let count = Rc::new(Cell::new(0u32));
        let inner = Rc::clone(&count);

        let k = Continuation::new(move |()| inner.set(inner.get() + 1));
        k.done();

        assert_eq!(count.get(), 1);
    }
}
