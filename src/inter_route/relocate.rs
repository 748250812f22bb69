//! Inter-route customer relocation (§4.5).
//!
//! Source routes are visited largest-waiting-contribution first, since
//! routes dominated by waiting time are the likeliest to hold a customer
//! that belongs elsewhere. Destination routes are pruned by capacity and
//! bounding-box overlap before any cost is computed, and the insertion
//! search within a surviving destination is restricted to positions whose
//! predecessor is among the customer's candidates.

use crate::candidates::CandidateList;
use crate::models::{Customer, Solution};

/// Bounding-box expansion used to decide whether a destination route is
/// geometrically close enough to the source to be worth evaluating.
const BBOX_BUFFER: f64 = 20.0;

/// Applies inter-route relocate to `solution` until no further improving
/// move is found. Returns `true` if any move was committed.
pub fn relocate_pass(solution: &mut Solution, customers: &[Customer], candidates: &CandidateList) -> bool {
    let mut any_improved = false;
    let mut improved = true;
    while improved {
        improved = false;

        let mut order: Vec<usize> = (0..solution.routes().len()).collect();
        order.sort_by(|&a, &b| {
            solution.routes()[b]
                .waiting_time()
                .partial_cmp(&solution.routes()[a].waiting_time())
                .unwrap()
        });

        'outer: for &src in &order {
            if src >= solution.routes().len() {
                continue;
            }
            let src_len = solution.routes()[src].len();
            for pos in 0..src_len {
                let cust_id = solution.routes()[src].customer_ids()[pos];
                let src_bbox = solution.routes()[src].bbox().copied();

                let mut best: Option<(usize, usize, f64)> = None; // (dst, ipos, total_delta)
                for dst in 0..solution.routes().len() {
                    if dst == src {
                        continue;
                    }
                    let dst_route = &solution.routes()[dst];
                    if dst_route.current_load() + customers[cust_id].demand() > dst_route.capacity() {
                        continue;
                    }
                    if let (Some(sb), Some(db)) = (src_bbox, dst_route.bbox()) {
                        if !sb.overlaps(db, BBOX_BUFFER) {
                            continue;
                        }
                    }

                    let dst_len = dst_route.len();
                    for ipos in 0..=dst_len {
                        let pred = if ipos == 0 { 0 } else { dst_route.customer_ids()[ipos - 1] };
                        if !candidates.contains(cust_id, pred) {
                            continue;
                        }
                        let delta = dst_route.delta_for_external(cust_id, ipos, customers);
                        if !delta.feasible {
                            continue;
                        }
                        let removal_cost = solution.routes()[src].delta_for_removal(pos, customers);
                        let total = delta.cost + removal_cost;
                        if total < -1e-6 && best.as_ref().is_none_or(|b| total < b.2) {
                            best = Some((dst, ipos, total));
                        }
                    }
                }

                if let Some((dst, ipos, _)) = best {
                    let committed = solution.routes_mut()[dst].insert(ipos, cust_id, customers);
                    debug_assert!(committed, "insertion was pre-checked feasible");
                    solution.routes_mut()[src].remove(pos, customers);
                    improved = true;
                    any_improved = true;
                    continue 'outer;
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
    use crate::models::{Route, TimeWindow};

    fn customers() -> Vec<Customer> {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 10, 0.0, tw),
            Customer::new(2, 1.0, 0.1, 10, 0.0, tw),
            Customer::new(3, -1.0, 0.0, 10, 0.0, tw),
        ]
    }

    #[test]
    fn test_relocate_moves_misplaced_customer() {
        let customers = customers();
        let candidates = CandidateList::build(&customers, 3);
        let mut solution = Solution::new();
        solution.add_route(Route::from_customers(vec![3, 1], 100, &customers));
        solution.add_route(Route::from_customers(vec![2], 100, &customers));
        solution.recompute(&customers, None);
        let before = solution.total_base_cost();

        relocate_pass(&mut solution, &customers, &candidates);
        assert!(solution.total_base_cost() <= before + 1e-9);
        assert!(solution.validate_coverage(&customers).is_ok());
    }

    #[test]
    fn test_relocate_single_route_noop() {
        let customers = customers();
        let candidates = CandidateList::build(&customers, 3);
        let mut solution = Solution::new();
        solution.add_route(Route::from_customers(vec![1, 2, 3], 100, &customers));
        solution.recompute(&customers, None);
        assert!(!relocate_pass(&mut solution, &customers, &candidates));
    }

    #[test]
    fn test_relocate_respects_capacity() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 15, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 15, 0.0, tw),
        ];
        let candidates = CandidateList::build(&customers, 2);
        let mut solution = Solution::new();
        solution.add_route(Route::from_customers(vec![1], 20, &customers));
        solution.add_route(Route::from_customers(vec![2], 20, &customers));
        solution.recompute(&customers, None);
        relocate_pass(&mut solution, &customers, &candidates);
        for route in solution.routes() {
            assert!(route.current_load() <= 20);
        }
    }
}
