//! Analysis session: staged input, the per-line dispatch loop, and the
//! observable state derived from them.

pub mod orchestrator;
pub mod state;
#[cfg(test)]
pub mod testing;

pub use orchestrator::Session;
pub use state::{SessionEvent, View};
