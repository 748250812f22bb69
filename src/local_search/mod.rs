//! Intra-route local search operators (§4.4).
//!
//! Each operator takes a single [`Route`](crate::models::Route) plus the
//! customer table and mutates the route in place, looping to a local
//! optimum. Inter-route moves live in [`crate::inter_route`].
//!
//! - [`two_opt_improve()`] — edge-reversal (Croes, 1958)
//! - [`or_opt_improve()`] — segment relocation, lengths 1-4 (Or, 1976)
//! - [`intra_relocate_improve()`] — single-customer best-improvement relocation
//! - [`swap_improve()`] — pairwise customer swap, capped search
//! - [`temporal_shift_improve()`] — depot departure-time adjustment

mod intra_relocate;
mod or_opt;
mod swap;
mod temporal_shift;
mod two_opt;

pub use intra_relocate::intra_relocate_improve;
pub use or_opt::or_opt_improve;
pub use swap::swap_improve;
pub use temporal_shift::temporal_shift_improve;
pub use two_opt::two_opt_improve;
