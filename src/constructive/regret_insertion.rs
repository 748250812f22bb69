//! Regret-k sequential insertion construction heuristic (§4.8).
//!
//! Processes customers in `(due_date, distance_from_depot)` order, inserting
//! each at the cheapest feasible position across all currently open routes.
//! A new route is opened whenever the cheapest feasible insertion would cost
//! more than a direct round trip plus a fixed deterrent, which keeps the
//! constructor from padding a single route just to avoid growing the fleet.
//!
//! # Reference
//!
//! Solomon, M.M. (1987). "Algorithms for the Vehicle Routing and Scheduling
//! Problems with Time Window Constraints", *Operations Research* 35(2), 254-265.

use crate::models::{Customer, Route, Solution};

const DEPOT_ID: usize = 0;
/// Deterrent added to the direct round-trip cost before a new route is
/// opened in preference to a costly existing-route insertion.
const NEW_ROUTE_DETERRENT: f64 = 1000.0;

/// Builds an initial VRPTW solution via regret-k sequential insertion.
///
/// # Examples
///
/// ```
/// use vrptw_core::models::{Customer, TimeWindow};
/// use vrptw_core::constructive::regret_insertion;
///
/// let tw = TimeWindow::new(0.0, 100.0).unwrap();
/// let customers = vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 1.0, 0.0, 10, 2.0, tw),
///     Customer::new(2, 2.0, 0.0, 10, 2.0, tw),
/// ];
/// let solution = regret_insertion(&customers, 30);
/// assert_eq!(solution.num_served(), 2);
/// ```
/// Assumes every customer's demand is within `capacity`; `solver::solve`
/// checks this upfront and rejects the instance before construction starts.
pub fn regret_insertion(customers: &[Customer], capacity: i32) -> Solution {
    let n = customers.len();
    let mut solution = Solution::new();
    if n <= 1 {
        return solution;
    }

    let mut order: Vec<usize> = (1..n).collect();
    order.sort_by(|&a, &b| {
        let ca = &customers[a];
        let cb = &customers[b];
        ca.time_window()
            .due()
            .partial_cmp(&cb.time_window().due())
            .unwrap()
            .then_with(|| {
                customers[DEPOT_ID]
                    .distance_to(ca)
                    .partial_cmp(&customers[DEPOT_ID].distance_to(cb))
                    .unwrap()
            })
    });

    for cid in order {
        if solution.routes().is_empty() {
            solution.add_route(Route::from_customers(vec![cid], capacity, customers));
            continue;
        }

        let round_trip = 2.0 * customers[DEPOT_ID].distance_to(&customers[cid]);
        let mut best: Option<(usize, usize, f64)> = None; // (route_idx, pos, cost)

        for (r_idx, route) in solution.routes().iter().enumerate() {
            for pos in 0..=route.len() {
                let delta = route.delta_for_external(cid, pos, customers);
                if delta.feasible && best.as_ref().is_none_or(|b| delta.cost < b.2) {
                    best = Some((r_idx, pos, delta.cost));
                }
            }
        }

        match best {
            Some((r_idx, pos, cost)) if cost <= round_trip + NEW_ROUTE_DETERRENT => {
                let committed = solution.routes_mut()[r_idx].insert(pos, cid, customers);
                debug_assert!(committed, "insertion was pre-checked feasible");
            }
            _ => {
                solution.add_route(Route::from_customers(vec![cid], capacity, customers));
            }
        }
    }

    solution.recompute(customers, None);
    solution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    #[test]
    fn test_single_route_when_cheap() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 10, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 10, 0.0, tw),
            Customer::new(3, 3.0, 0.0, 10, 0.0, tw),
        ];
        let sol = regret_insertion(&customers, 100);
        assert_eq!(sol.num_served(), 3);
        assert_eq!(sol.routes().len(), 1);
    }

    #[test]
    fn test_capacity_forces_split() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 15, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 15, 0.0, tw),
            Customer::new(3, 3.0, 0.0, 15, 0.0, tw),
        ];
        let sol = regret_insertion(&customers, 25);
        assert_eq!(sol.num_served(), 3);
        assert!(sol.routes().len() >= 2);
        for route in sol.routes() {
            assert!(route.current_load() <= 25);
        }
    }

    #[test]
    fn test_tight_windows_force_split() {
        let tight = TimeWindow::new(0.0, 6.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 5.0, 0.0, 10, 5.0, tight),
            Customer::new(2, -5.0, 0.0, 10, 5.0, tight),
        ];
        let sol = regret_insertion(&customers, 100);
        assert_eq!(sol.num_served(), 2);
        assert_eq!(sol.routes().len(), 2);
    }

    #[test]
    fn test_single_customer() {
        let tw = TimeWindow::new(0.0, 100.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 5.0, 0.0, 10, 0.0, tw),
        ];
        let sol = regret_insertion(&customers, 100);
        assert_eq!(sol.num_served(), 1);
        assert_eq!(sol.routes().len(), 1);
    }

    #[test]
    fn test_trivial_empty() {
        let customers = vec![Customer::depot(0.0, 0.0)];
        let sol = regret_insertion(&customers, 100);
        assert_eq!(sol.routes().len(), 0);
    }

    #[test]
    fn test_all_routes_feasible_after_construction() {
        let tw = TimeWindow::new(0.0, 50.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 10, 1.0, tw),
            Customer::new(2, 2.0, 0.0, 10, 1.0, tw),
            Customer::new(3, 3.0, 0.0, 10, 1.0, tw),
            Customer::new(4, 4.0, 0.0, 10, 1.0, tw),
        ];
        let sol = regret_insertion(&customers, 20);
        for route in sol.routes() {
            assert!(route.is_feasible(&customers));
        }
        assert!(sol.validate_coverage(&customers).is_ok());
    }
}
