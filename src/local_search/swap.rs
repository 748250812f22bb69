//! Intra-route pairwise customer swap (§4.4).
//!
//! Exhaustively tries swapping every pair of positions, capped at
//! `MAX_SWAPS` attempts per pass to bound cost on long routes.

use crate::models::{Customer, Route};

/// Upper bound on the number of pair evaluations attempted per pass.
const MAX_SWAPS: usize = 20;

/// Applies pairwise swap to `route` until no further improving swap is
/// found. Returns `true` if any move was committed.
///
/// # Examples
///
/// ```
/// use vrptw_core::models::{Customer, TimeWindow, Route};
/// use vrptw_core::local_search::swap_improve;
///
/// let tw = TimeWindow::new(0.0, 1000.0).unwrap();
/// let customers = vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 1.0, 0.0, 10, 0.0, tw),
///     Customer::new(2, 2.0, 0.0, 10, 0.0, tw),
///     Customer::new(3, 3.0, 0.0, 10, 0.0, tw),
/// ];
/// let mut route = Route::from_customers(vec![3, 2, 1], 100, &customers);
/// swap_improve(&mut route, &customers);
/// assert!(route.is_feasible(&customers));
/// ```
pub fn swap_improve(route: &mut Route, customers: &[Customer]) -> bool {
    let mut any_improved = false;
    let mut improved = true;
    while improved {
        improved = false;
        let n = route.len();
        if n < 2 {
            break;
        }
        let mut attempts = 0usize;
        'outer: for i in 0..n - 1 {
            for j in (i + 1)..n {
                if attempts >= MAX_SWAPS {
                    break 'outer;
                }
                attempts += 1;
                let delta = route.delta_for_swap(i, j, customers);
                if delta.improves() {
                    route.swap_positions(i, j, customers);
                    improved = true;
                    any_improved = true;
                    continue 'outer;
                }
            }
        }
    }
    any_improved
}
