//! Route-empty operator (§4.5).
//!
//! Picks the smallest route with fewer than six customers and tries to
//! rehome every one of its customers into some other route. Commits only
//! if a feasible home is found for all of them, deleting the source route.

use crate::models::{Customer, Route, Solution};

const MAX_SOURCE_LEN: usize = 6;

fn smallest_eligible_route(solution: &Solution) -> Option<usize> {
    solution
        .routes()
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_empty() && r.len() < MAX_SOURCE_LEN)
        .min_by_key(|(_, r)| r.len())
        .map(|(i, _)| i)
}

/// Applies route-empty to `solution` until no further eligible route can
/// be fully rehomed. Returns `true` if any route was emptied.
pub fn route_empty_pass(solution: &mut Solution, customers: &[Customer]) -> bool {
    let mut any_improved = false;
    loop {
        let Some(src) = smallest_eligible_route(solution) else {
            break;
        };
        let src_ids = solution.routes()[src].customer_ids().to_vec();
        let mut trial_routes: Vec<Route> = solution.routes().to_vec();

        let mut all_placed = true;
        for &cid in &src_ids {
            let mut best: Option<(usize, usize, f64)> = None;
            for (j, r) in trial_routes.iter().enumerate() {
                if j == src {
                    continue;
                }
                for pos in 0..=r.len() {
                    let delta = r.delta_for_external(cid, pos, customers);
                    if delta.feasible && best.as_ref().is_none_or(|b| delta.cost < b.2) {
                        best = Some((j, pos, delta.cost));
                    }
                }
            }
            match best {
                Some((j, pos, _)) => {
                    trial_routes[j].insert(pos, cid, customers);
                }
                None => {
                    all_placed = false;
                    break;
                }
            }
        }

        if !all_placed {
            break;
        }

        trial_routes[src] = Route::new(solution.routes()[src].capacity());
        *solution.routes_mut() = trial_routes;
        any_improved = true;
    }

    if any_improved {
        solution.drop_empty_routes();
        solution.recompute(customers, None);
    }
    any_improved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    #[test]
    fn test_route_empty_disperses_small_route() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 5, 0.0, tw),
            Customer::new(2, 1.1, 0.0, 5, 0.0, tw),
            Customer::new(3, 5.0, 0.0, 5, 0.0, tw),
        ];
        let mut solution = Solution::new();
        solution.add_route(Route::from_customers(vec![1, 2], 100, &customers));
        solution.add_route(Route::from_customers(vec![3], 100, &customers));
        solution.recompute(&customers, None);

        route_empty_pass(&mut solution, &customers);
        assert!(solution.validate_coverage(&customers).is_ok());
    }

    #[test]
    fn test_route_empty_noop_when_no_home_found() {
        let tight = TimeWindow::new(0.0, 5.0).expect("valid");
        let wide = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 5, 0.0, tight),
            Customer::new(2, 100.0, 0.0, 5, 0.0, wide),
        ];
        let mut solution = Solution::new();
        solution.add_route(Route::from_customers(vec![1], 100, &customers));
        solution.add_route(Route::from_customers(vec![2], 100, &customers));
        solution.recompute(&customers, None);
        assert!(!route_empty_pass(&mut solution, &customers));
        assert_eq!(solution.num_vehicles(), 2);
    }
}
