//! Inter-route tail swap, 2-opt* (§4.5).
//!
//! Given routes `R1 = [a1..ai | ai+1..an]` and `R2 = [b1..bj | bj+1..bm]`,
//! tries producing `R1' = a1..ai + bj+1..bm` and `R2' = b1..bj + ai+1..an`.
//! Cut points are sampled rather than scanned exhaustively once either
//! route exceeds [`EXHAUSTIVE_LIMIT`] positions, and candidate tail swaps
//! are rejected on a capacity pre-filter before a full route is rebuilt to
//! check time-window feasibility.
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *Journal of the Operational
//! Research Society* 46(12), 1433-1446.

use crate::models::{Customer, Route, Solution};

/// Routes longer than this many positions are sampled instead of scanned
/// exhaustively for cut points.
const EXHAUSTIVE_LIMIT: usize = 15;
/// Number of sampled cut points used on routes over the exhaustive limit.
const SAMPLE_COUNT: usize = 15;

fn cut_points(len: usize) -> Vec<usize> {
    if len <= EXHAUSTIVE_LIMIT {
        (1..=len).collect()
    } else {
        (0..SAMPLE_COUNT)
            .map(|i| 1 + i * (len - 1) / (SAMPLE_COUNT - 1).max(1))
            .collect()
    }
}

fn tail_demand(ids: &[usize], customers: &[Customer]) -> i32 {
    ids.iter().map(|&id| customers[id].demand()).sum()
}

/// Applies inter-route 2-opt* to `solution` until no further improving
/// tail swap is found. Returns `true` if any swap was committed.
pub fn two_opt_star_pass(solution: &mut Solution, customers: &[Customer]) -> bool {
    let mut any_improved = false;
    let mut improved = true;
    while improved {
        improved = false;
        let n_routes = solution.routes().len();
        'outer: for r1 in 0..n_routes {
            for r2 in (r1 + 1)..n_routes {
                let ids1 = solution.routes()[r1].customer_ids().to_vec();
                let ids2 = solution.routes()[r2].customer_ids().to_vec();
                if ids1.is_empty() || ids2.is_empty() {
                    continue;
                }
                let cap1 = solution.routes()[r1].capacity();
                let cap2 = solution.routes()[r2].capacity();
                let base_cost = solution.routes()[r1].total_cost() + solution.routes()[r2].total_cost();

                for &cut1 in &cut_points(ids1.len()) {
                    for &cut2 in &cut_points(ids2.len()) {
                        let new1: Vec<usize> =
                            ids1[..cut1].iter().chain(ids2[cut2..].iter()).copied().collect();
                        let new2: Vec<usize> =
                            ids2[..cut2].iter().chain(ids1[cut1..].iter()).copied().collect();

                        if tail_demand(&new1, customers) > cap1 || tail_demand(&new2, customers) > cap2 {
                            continue;
                        }
                        if new1 == ids1 {
                            continue;
                        }

                        let trial1 = Route::from_customers(new1.clone(), cap1, customers);
                        let trial2 = Route::from_customers(new2.clone(), cap2, customers);
                        if !trial1.is_feasible(customers) || !trial2.is_feasible(customers) {
                            continue;
                        }

                        let new_cost = trial1.total_cost() + trial2.total_cost();
                        if new_cost < base_cost - 1e-6 {
                            solution.routes_mut()[r1] = trial1;
                            solution.routes_mut()[r2] = trial2;
                            improved = true;
                            any_improved = true;
                            continue 'outer;
                        }
                    }
                }
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
    fn test_two_opt_star_fixes_interleaved_routes() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 5.0, 1.0, 10, 0.0, tw),
            Customer::new(2, -5.0, -1.0, 10, 0.0, tw),
            Customer::new(3, 5.0, -1.0, 10, 0.0, tw),
            Customer::new(4, -5.0, 1.0, 10, 0.0, tw),
        ];
        let mut solution = Solution::new();
        solution.add_route(Route::from_customers(vec![1, 4], 100, &customers));
        solution.add_route(Route::from_customers(vec![3, 2], 100, &customers));
        solution.recompute(&customers, None);
        let before = solution.total_base_cost();

        two_opt_star_pass(&mut solution, &customers);
        assert!(solution.total_base_cost() <= before + 1e-9);
        assert!(solution.validate_coverage(&customers).is_ok());
    }

    #[test]
    fn test_two_opt_star_single_route_noop() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 10, 0.0, tw),
        ];
        let mut solution = Solution::new();
        solution.add_route(Route::from_customers(vec![1], 100, &customers));
        solution.recompute(&customers, None);
        assert!(!two_opt_star_pass(&mut solution, &customers));
    }

    #[test]
    fn test_two_opt_star_respects_capacity() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 15, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 15, 0.0, tw),
            Customer::new(3, 3.0, 0.0, 15, 0.0, tw),
        ];
        let mut solution = Solution::new();
        solution.add_route(Route::from_customers(vec![1, 2], 20, &customers));
        solution.add_route(Route::from_customers(vec![3], 20, &customers));
        solution.recompute(&customers, None);
        two_opt_star_pass(&mut solution, &customers);
        for route in solution.routes() {
            assert!(route.current_load() <= 20);
        }
    }
}
