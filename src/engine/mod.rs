//! Rule resolution: hook dispatch, the damage pipeline, and capability
//! transfer.

mod dispatch;
pub mod transfer;

pub use dispatch::Engine;
