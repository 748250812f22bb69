//! # vrptw-core
//!
//! Vehicle routing optimization library: a constructive heuristic, intra-
//! and inter-route local search, large neighborhood search, and a
//! simulated-annealing driver for the capacitated VRP with time windows.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Customer, Route, Solution)
//! - [`geometry`] — Euclidean distance and bounding-box pruning
//! - [`distance`] — Dense distance matrix, used only to precompute candidate lists
//! - [`candidates`] — Per-customer k-nearest-neighbor candidate lists
//! - [`config`] — `SolverConfig`, every tunable in one place
//! - [`error`] — Instance-parsing and solve-time error types
//! - [`constructive`] — Regret-k sequential insertion construction heuristic
//! - [`local_search`] — Intra-route operators (2-opt, Or-opt, swap, ...)
//! - [`inter_route`] — Inter-route operators (relocate, 2-opt*, cross-exchange, ...)
//! - [`lns`] — Large neighborhood search destroy/repair pair
//! - [`criticality`] — Route criticality scorer, used to prioritize refinement
//! - [`driver`] — MDS improvement driver (fleet reduction + SA refinement)
//! - [`solver`] — Top-level `solve()` entry point
//! - [`instance`] — Solomon-format instance file parser
//! - [`http`] — Optional HTTP façade (feature `http`)

pub mod candidates;
pub mod config;
pub mod constructive;
pub mod criticality;
pub mod distance;
pub mod driver;
pub mod error;
pub mod geometry;
#[cfg(feature = "http")]
pub mod http;
pub mod instance;
pub mod inter_route;
pub mod lns;
pub mod local_search;
pub mod models;
pub mod solver;
