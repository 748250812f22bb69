//! Intra-route departure-time shift (§4.4).
//!
//! Delaying the vehicle's departure from the depot can eliminate waiting
//! time at the first stop (and ripple through the rest of the route)
//! without violating any time window. Tries a small set of candidate
//! departures and keeps the best feasible one found.

use crate::models::{Customer, Route};

/// Applies temporal shift to `route`, replacing its departure time if a
/// strictly cheaper feasible alternative is found. Returns `true` if the
/// departure was changed.
///
/// # Examples
///
/// ```
/// use vrptw_core::models::{Customer, TimeWindow, Route};
/// use vrptw_core::local_search::temporal_shift_improve;
///
/// let tw = TimeWindow::new(50.0, 1000.0).unwrap();
/// let customers = vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 10.0, 0.0, 5, 0.0, tw),
/// ];
/// let mut route = Route::from_customers(vec![1], 100, &customers);
/// temporal_shift_improve(&mut route, &customers);
/// assert!(route.waiting_time() < 40.0);
/// ```
pub fn temporal_shift_improve(route: &mut Route, customers: &[Customer]) -> bool {
    if route.is_empty() {
        return false;
    }
    let first_id = route.customer_ids()[0];
    let ready = customers[first_id].time_window().ready();
    let dist_from_depot = customers[0].distance_to(&customers[first_id]);
    let earliest_feasible = ready - dist_from_depot;
    let current = route.departure_time();
    let midpoint = (current + earliest_feasible) / 2.0;

    let candidates = [
        current,
        earliest_feasible,
        midpoint,
        earliest_feasible + 1.0,
        earliest_feasible + 2.0,
    ];

    let base_cost = route.total_cost();
    let mut best: Option<(f64, f64)> = None;
    for &t in &candidates {
        let mut trial = route.clone();
        if trial.adjust_departure(t, customers) && trial.total_cost() < base_cost - 1e-9 {
            if best.as_ref().is_none_or(|b| trial.total_cost() < b.1) {
                best = Some((t, trial.total_cost()));
            }
        }
    }

    match best {
        Some((t, _)) => route.adjust_departure(t, customers),
        None => false,
    }
}
