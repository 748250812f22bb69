//! Constructive heuristic for building an initial VRPTW solution.
//!
//! - [`regret_insertion`] — time-window-first sequential insertion (§4.8)

mod regret_insertion;

pub use regret_insertion::regret_insertion;
