//! Large neighborhood search destroy/repair pair (§4.6).
//!
//! [`related_removal`] tears a geographically clustered batch of
//! customers out of the solution; [`regret2_repair`] puts them back.
//! Callers (the improvement driver) accept the result only if the
//! penalized objective strictly decreases afterward.

mod destroy;
mod repair;

pub use destroy::related_removal;
pub use repair::regret2_repair;
