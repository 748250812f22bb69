//! Intra-route single-customer relocation (§4.4).
//!
//! For each customer, tries every other position in the route and commits
//! the best-improving move found (best-improvement per customer, as
//! distinct from Or-opt's far-first first-improvement over whole segments).

use crate::models::{Customer, Route};

/// Applies intra-relocate to `route` until no further improving move is
/// found. Returns `true` if any move was committed.
///
/// # Examples
///
/// ```
/// use vrptw_core::models::{Customer, TimeWindow, Route};
/// use vrptw_core::local_search::intra_relocate_improve;
///
/// let tw = TimeWindow::new(0.0, 1000.0).unwrap();
/// let customers = vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 1.0, 0.0, 10, 0.0, tw),
///     Customer::new(2, 2.0, 0.0, 10, 0.0, tw),
///     Customer::new(3, 3.0, 0.0, 10, 0.0, tw),
/// ];
/// let mut route = Route::from_customers(vec![2, 1, 3], 100, &customers);
/// intra_relocate_improve(&mut route, &customers);
/// assert!(route.is_feasible(&customers));
/// ```
pub fn intra_relocate_improve(route: &mut Route, customers: &[Customer]) -> bool {
    let mut any_improved = false;
    let mut improved = true;
    while improved {
        improved = false;
        let n = route.len();
        if n < 2 {
            break;
        }
        'outer: for from in 0..n {
            let mut best: Option<(usize, f64)> = None;
            for to in 0..=n {
                if to == from || to == from + 1 {
                    continue;
                }
                let delta = route.delta_for_segment_move(from, 1, to, customers);
                if delta.improves() && best.as_ref().is_none_or(|b| delta.cost < b.1) {
                    best = Some((to, delta.cost));
                }
            }
            if let Some((to, _)) = best {
                route.apply_segment_move(from, 1, to, customers);
                improved = true;
                any_improved = true;
                continue 'outer;
            }
        }
    }
    any_improved
}
