//! Intra-route 2-opt improvement (§4.4).
//!
//! For each `i`, scans `j` within a bounded lookahead window and simulates
//! reversing the segment between them. On routes long enough for the
//! lookahead cap to actually bind, this is a best-improvement search: a
//! move that drops cost by more than `BIG_IMPROVEMENT` is taken as soon as
//! it's found, otherwise the best feasible move seen across the whole
//! window is taken once the window is exhausted. On routes short enough
//! that the window already covers every remaining position, the cap can't
//! bind, so first-improvement is used directly.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::models::{Customer, Route};

/// How far ahead of `i` the search considers `j`, bounding per-pass cost on
/// long routes.
const LOOKAHEAD: usize = 30;

/// A move clearing this cost drop is accepted as soon as it's found,
/// without scanning the rest of the lookahead window.
const BIG_IMPROVEMENT: f64 = 10.0;

/// Applies 2-opt to `route` until no further improving reversal is found.
/// Returns `true` if any move was committed.
///
/// # Examples
///
/// ```
/// use vrptw_core::models::{Customer, TimeWindow, Route};
/// use vrptw_core::local_search::two_opt_improve;
///
/// let tw = TimeWindow::new(0.0, 1000.0).unwrap();
/// let customers = vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 1.0, 1.0, 10, 0.0, tw),
///     Customer::new(2, 2.0, 0.0, 10, 0.0, tw),
///     Customer::new(3, 1.0, -1.0, 10, 0.0, tw),
/// ];
/// let mut route = Route::from_customers(vec![1, 3, 2], 100, &customers);
/// let before = route.travel_only_cost();
/// two_opt_improve(&mut route, &customers);
/// assert!(route.travel_only_cost() <= before + 1e-9);
/// ```
pub fn two_opt_improve(route: &mut Route, customers: &[Customer]) -> bool {
    let mut any_improved = false;
    let mut improved = true;
    while improved {
        improved = false;
        let n = route.len();
        if n < 3 {
            break;
        }
        'outer: for i in 0..n - 1 {
            let limit = (i + 1 + LOOKAHEAD).min(n);
            let window_capped = limit - (i + 1) == LOOKAHEAD;

            if !window_capped {
                // Route fits entirely inside the lookahead window: the cap
                // never binds, so best-improvement buys nothing over
                // first-improvement.
                for j in (i + 1)..limit {
                    let delta = route.delta_for_reversal(i, j, customers);
                    if delta.improves() {
                        route.reverse_segment(i, j, customers);
                        improved = true;
                        any_improved = true;
                        continue 'outer;
                    }
                }
                continue;
            }

            let mut best: Option<(usize, f64)> = None;
            for j in (i + 1)..limit {
                let delta = route.delta_for_reversal(i, j, customers);
                if !delta.feasible || delta.cost >= -1e-9 {
                    continue;
                }
                if delta.cost < -BIG_IMPROVEMENT {
                    best = Some((j, delta.cost));
                    break;
                }
                if best.is_none_or(|(_, b)| delta.cost < b) {
                    best = Some((j, delta.cost));
                }
            }
            if let Some((j, _)) = best {
                route.reverse_segment(i, j, customers);
                improved = true;
                any_improved = true;
                continue 'outer;
            }
        }
    }
    any_improved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    fn crossing_customers() -> Vec<Customer> {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 1.0, 10, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 10, 0.0, tw),
            Customer::new(3, 1.0, -1.0, 10, 0.0, tw),
        ]
    }

    #[test]
    fn test_two_opt_does_not_worsen() {
        let customers = crossing_customers();
        let mut route = Route::from_customers(vec![1, 3, 2], 100, &customers);
        let before = route.travel_only_cost();
        two_opt_improve(&mut route, &customers);
        assert!(route.travel_only_cost() <= before + 1e-9);
    }

    #[test]
    fn test_two_opt_already_optimal_is_noop() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 10, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 10, 0.0, tw),
            Customer::new(3, 3.0, 0.0, 10, 0.0, tw),
        ];
        let mut route = Route::from_customers(vec![1, 2, 3], 100, &customers);
        let improved = two_opt_improve(&mut route, &customers);
        assert!(!improved);
        assert_eq!(route.customer_ids(), &[1, 2, 3]);
    }

    #[test]
    fn test_two_opt_short_route_noop() {
        let customers = crossing_customers();
        let mut route = Route::from_customers(vec![1], 100, &customers);
        assert!(!two_opt_improve(&mut route, &customers));
    }

    #[test]
    fn test_two_opt_preserves_feasibility() {
        let customers = crossing_customers();
        let mut route = Route::from_customers(vec![1, 3, 2], 100, &customers);
        two_opt_improve(&mut route, &customers);
        assert!(route.is_feasible(&customers));
    }
}
