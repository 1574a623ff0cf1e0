//! Cooperative task scheduling primitives.
//!
//! The engine is single-threaded: all "concurrency" is deferred-callback
//! style, where suspension means waiting for a [`Continuation`] to be
//! resumed (typically by an animation finishing).
//!
//! - [`Continuation`]: a one-shot resume handle, the unit of suspension.
//! - [`TaskQueue`]: runs pushed steps strictly one at a time, in push
//!   order, then signals overall completion.

mod continuation;
mod queue;

pub use continuation::Continuation;
pub use queue::TaskQueue;
