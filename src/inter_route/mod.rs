//! Inter-route local search operators (§4.5).
//!
//! Each operator takes the whole [`Solution`](crate::models::Solution)
//! and mutates its routes in place, since these moves necessarily touch
//! more than one route. Intra-route moves live in
//! [`crate::local_search`].
//!
//! - [`relocate_pass()`] — move a customer from one route to another
//! - [`two_opt_star_pass()`] — swap route tails
//! - [`cross_exchange_pass()`] — swap equal-length segments between routes
//! - [`route_merge_pass()`] — fold an underfilled route into another
//! - [`route_empty_pass()`] — fully rehome a small route's customers
//! - [`ejection_chain_eliminate()`] — eliminate a targeted route via chained relocations

mod cross_exchange;
mod ejection_chain;
mod relocate;
mod route_empty;
mod route_merge;
mod two_opt_star;

pub use cross_exchange::cross_exchange_pass;
pub use ejection_chain::ejection_chain_eliminate;
pub use relocate::relocate_pass;
pub use route_empty::route_empty_pass;
pub use route_merge::route_merge_pass;
pub use two_opt_star::two_opt_star_pass;
