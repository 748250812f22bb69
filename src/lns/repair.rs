//! Regret-2 repair operator (§4.6).
//!
//! Reinserts a batch of previously-removed customers, tightest time window
//! first, each at the cheapest feasible position found across every
//! current route. A customer with no feasible home anywhere opens a new
//! route by itself rather than blocking the rest of the batch. Every route
//! touched during repair gets a 2-opt pass afterward, since reinsertion
//! tends to leave easily-fixed local crossings behind.

use tracing::trace;

use crate::local_search::two_opt_improve;
use crate::models::{Customer, Route, Solution};

/// Reinserts `removed` into `solution`, opening new routes as a last
/// resort, then cleans up each touched route with 2-opt.
pub fn regret2_repair(solution: &mut Solution, customers: &[Customer], removed: &[usize], capacity: i32) {
    let mut order = removed.to_vec();
    order.sort_by(|&a, &b| {
        customers[a]
            .time_window()
            .width()
            .partial_cmp(&customers[b].time_window().width())
            .unwrap()
    });

    let mut touched: std::collections::HashSet<usize> = std::collections::HashSet::new();

    for cid in order {
        let mut best: Option<(usize, usize, f64)> = None;
        let mut second_best_cost = f64::INFINITY;

        for (r_idx, route) in solution.routes().iter().enumerate() {
            for pos in 0..=route.len() {
                let delta = route.delta_for_external(cid, pos, customers);
                if !delta.feasible {
                    continue;
                }
                match &best {
                    Some((_, _, cost)) if delta.cost < *cost => {
                        second_best_cost = *cost;
                        best = Some((r_idx, pos, delta.cost));
                    }
                    Some((_, _, cost)) => {
                        if delta.cost < second_best_cost && delta.cost > *cost {
                            second_best_cost = delta.cost;
                        }
                    }
                    None => best = Some((r_idx, pos, delta.cost)),
                }
            }
        }

        match best {
            Some((r_idx, pos, cost)) => {
                trace!(customer = cid, regret = second_best_cost - cost, "regret2 insertion");
                let committed = solution.routes_mut()[r_idx].insert(pos, cid, customers);
                debug_assert!(committed, "insertion was pre-checked feasible");
                touched.insert(r_idx);
            }
            None => {
                solution.add_route(Route::from_customers(vec![cid], capacity, customers));
                touched.insert(solution.routes().len() - 1);
            }
        }
    }

    for &r_idx in &touched {
        if let Some(route) = solution.routes_mut().get_mut(r_idx) {
            two_opt_improve(route, customers);
        }
    }
    solution.recompute(customers, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    fn customers() -> Vec<Customer> {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 5, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 5, 0.0, tw),
            Customer::new(3, 3.0, 0.0, 5, 0.0, tw),
        ]
    }

    #[test]
    fn test_regret2_repair_reinserts_all() {
        let customers = customers();
        let mut solution = Solution::new();
        solution.add_route(Route::from_customers(vec![1], 100, &customers));
        solution.recompute(&customers, None);
        regret2_repair(&mut solution, &customers, &[2, 3], 100);
        assert!(solution.validate_coverage(&customers).is_ok());
        assert_eq!(solution.num_served(), 3);
    }

    #[test]
    fn test_regret2_repair_opens_new_route_when_no_capacity() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 20, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 20, 0.0, tw),
        ];
        let mut solution = Solution::new();
        solution.add_route(Route::from_customers(vec![1], 20, &customers));
        solution.recompute(&customers, None);
        regret2_repair(&mut solution, &customers, &[2], 20);
        assert_eq!(solution.num_vehicles(), 2);
        assert!(solution.validate_coverage(&customers).is_ok());
    }

    #[test]
    fn test_regret2_repair_empty_batch_noop() {
        let customers = customers();
        let mut solution = Solution::new();
        solution.add_route(Route::from_customers(vec![1, 2, 3], 100, &customers));
        solution.recompute(&customers, None);
        let before = solution.total_base_cost();
        regret2_repair(&mut solution, &customers, &[], 100);
        assert!((solution.total_base_cost() - before).abs() < 1e-9);
    }
}
