//! Inter-route equal-length segment exchange (§4.5).
//!
//! Swaps segments of the same length (1 to 3 customers) between two
//! routes. A cheap capacity pre-filter on the post-swap loads runs before
//! either candidate route is rebuilt and checked for time-window
//! feasibility; nothing is committed unless both sides pass.

use crate::models::{Customer, Route, Solution};

const MAX_SEGMENT_LEN: usize = 3;

fn total_demand(ids: &[usize], customers: &[Customer]) -> i32 {
    ids.iter().map(|&id| customers[id].demand()).sum()
}

/// Applies cross-exchange to `solution` until no further improving
/// segment swap is found. Returns `true` if any swap was committed.
pub fn cross_exchange_pass(solution: &mut Solution, customers: &[Customer]) -> bool {
    let mut any_improved = false;
    let mut improved = true;
    while improved {
        improved = false;
        let n_routes = solution.routes().len();
        'outer: for r1 in 0..n_routes {
            for r2 in (r1 + 1)..n_routes {
                let ids1 = solution.routes()[r1].customer_ids().to_vec();
                let ids2 = solution.routes()[r2].customer_ids().to_vec();
                let cap1 = solution.routes()[r1].capacity();
                let cap2 = solution.routes()[r2].capacity();
                let base_cost = solution.routes()[r1].total_cost() + solution.routes()[r2].total_cost();

                for seg_len in 1..=MAX_SEGMENT_LEN {
                    if ids1.len() < seg_len || ids2.len() < seg_len {
                        continue;
                    }
                    for start1 in 0..=(ids1.len() - seg_len) {
                        for start2 in 0..=(ids2.len() - seg_len) {
                            let seg1 = &ids1[start1..start1 + seg_len];
                            let seg2 = &ids2[start2..start2 + seg_len];

                            let mut new1 = ids1.clone();
                            new1.splice(start1..start1 + seg_len, seg2.iter().copied());
                            let mut new2 = ids2.clone();
                            new2.splice(start2..start2 + seg_len, seg1.iter().copied());

                            if total_demand(&new1, customers) > cap1 || total_demand(&new2, customers) > cap2 {
                                continue;
                            }

                            let trial1 = Route::from_customers(new1, cap1, customers);
                            let trial2 = Route::from_customers(new2, cap2, customers);
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
        }
        solution.drop_empty_routes();
    }
    if any_improved {
        solution.recompute(customers, None);
    }
    any_improved
}
