//! Inter-route merge (§4.5).
//!
//! Tries to fold an underfilled route entirely into another, appending its
//! customers in order. The merge is atomic: every appended customer must
//! land feasibly, or nothing in the solution changes. A successful merge
//! always drops the fleet by one route, which is improvement enough.

use crate::models::{Customer, Route, Solution};

/// Applies route merge to `solution`, considering any route whose load
/// ratio is at or below `threshold` as a merge source. Returns `true` if
/// any merge was committed.
pub fn route_merge_pass(solution: &mut Solution, customers: &[Customer], threshold: f64) -> bool {
    let mut any_improved = false;
    let mut improved = true;
    while improved {
        improved = false;
        let n_routes = solution.routes().len();

        'outer: for src in 0..n_routes {
            if src >= solution.routes().len() {
                continue;
            }
            let cap = solution.routes()[src].capacity();
            if solution.routes()[src].is_empty() {
                continue;
            }
            let load_ratio = solution.routes()[src].current_load() as f64 / cap as f64;
            if load_ratio > threshold {
                continue;
            }
            let src_ids = solution.routes()[src].customer_ids().to_vec();

            for dst in 0..solution.routes().len() {
                if dst == src {
                    continue;
                }
                let mut trial = solution.routes()[dst].clone();
                let mut all_ok = true;
                for &cid in &src_ids {
                    let pos = trial.len();
                    if !trial.insert(pos, cid, customers) {
                        all_ok = false;
                        break;
                    }
                }
                if !all_ok {
                    continue;
                }

                // Every customer landed feasibly, so the source route is
                // gone and the fleet shrinks by one: commit unconditionally.
                solution.routes_mut()[dst] = trial;
                solution.routes_mut()[src] = Route::new(cap);
                improved = true;
                any_improved = true;
                continue 'outer;
            }
        }
        solution.drop_empty_routes();
    }
    if any_improved {
        solution.recompute(customers, None);
    }
    any_improved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    #[test]
    fn test_route_merge_folds_underfilled_route() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 5, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 5, 0.0, tw),
        ];
        let mut solution = Solution::new();
        solution.add_route(Route::from_customers(vec![1], 100, &customers));
        solution.add_route(Route::from_customers(vec![2], 100, &customers));
        solution.recompute(&customers, None);

        route_merge_pass(&mut solution, &customers, 0.8);
        assert_eq!(solution.num_vehicles(), 1);
        assert!(solution.validate_coverage(&customers).is_ok());
    }

    #[test]
    fn test_route_merge_respects_capacity() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 15, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 15, 0.0, tw),
        ];
        let mut solution = Solution::new();
        solution.add_route(Route::from_customers(vec![1], 20, &customers));
        solution.add_route(Route::from_customers(vec![2], 20, &customers));
        solution.recompute(&customers, None);

        route_merge_pass(&mut solution, &customers, 0.8);
        assert_eq!(solution.num_vehicles(), 2);
    }

    #[test]
    fn test_route_merge_threshold_zero_noop() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 5, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 5, 0.0, tw),
        ];
        let mut solution = Solution::new();
        solution.add_route(Route::from_customers(vec![1], 100, &customers));
        solution.add_route(Route::from_customers(vec![2], 100, &customers));
        solution.recompute(&customers, None);
        assert!(!route_merge_pass(&mut solution, &customers, 0.0));
    }
}
