//! Domain model types for the VRPTW core: customers with demands and time
//! windows, routes as ordered visit sequences with their own incremental
//! scheduler, and the solution that owns them.

mod customer;
mod route;
mod solution;

pub use customer::{Customer, TimeWindow};
pub use route::{Delta, Route};
pub use solution::{RestorationEvent, Solution, SolutionSnapshot};
