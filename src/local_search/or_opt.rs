//! Intra-route Or-opt segment relocation (§4.4).
//!
//! Tries relocating contiguous segments of length 1–4 to a different
//! position within the same route, longest segments first. Candidate
//! insertion positions are tried farthest-from-origin first (distant moves
//! are more likely to resolve a bad initial placement), and a geometric
//! pre-filter skips insertion points far outside the route's own footprint.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::geometry;
use crate::models::{Customer, Route};

const MAX_SEGMENT_LEN: usize = 4;
/// Insertion points farther than this multiple of the route's average span
/// from the segment's centroid are skipped without evaluation.
const GEOMETRIC_PREFILTER_FACTOR: f64 = 3.0;

fn centroid_of(ids: &[usize], customers: &[Customer]) -> (f64, f64) {
    let (sx, sy) = ids
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &id| {
            let p = customers[id].point();
            (sx + p.0, sy + p.1)
        });
    let n = ids.len() as f64;
    (sx / n, sy / n)
}

fn insertion_neighbor_point(route: &Route, to: usize, customers: &[Customer]) -> (f64, f64) {
    let ids = route.customer_ids();
    if to == 0 || to > ids.len() {
        customers[0].point()
    } else {
        customers[ids[to - 1]].point()
    }
}

/// Applies Or-opt to `route` until no further improving segment move is
/// found. Returns `true` if any move was committed.
///
/// # Examples
///
/// ```
/// use vrptw_core::models::{Customer, TimeWindow, Route};
/// use vrptw_core::local_search::or_opt_improve;
///
/// let tw = TimeWindow::new(0.0, 1000.0).unwrap();
/// let customers = vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 1.0, 0.0, 10, 0.0, tw),
///     Customer::new(2, 2.0, 0.0, 10, 0.0, tw),
///     Customer::new(3, 3.0, 0.0, 10, 0.0, tw),
/// ];
/// let mut route = Route::from_customers(vec![1, 3, 2], 100, &customers);
/// let before = route.travel_only_cost();
/// or_opt_improve(&mut route, &customers);
/// assert!(route.travel_only_cost() <= before + 1e-9);
/// ```
pub fn or_opt_improve(route: &mut Route, customers: &[Customer]) -> bool {
    let mut any_improved = false;
    let mut improved = true;
    while improved {
        improved = false;
        let n = route.len();
        let max_seg = MAX_SEGMENT_LEN.min(n.saturating_sub(1));
        if max_seg == 0 {
            break;
        }
        'outer: for seg_len in (1..=max_seg).rev() {
            let n = route.len();
            if n < seg_len + 1 {
                continue;
            }
            for from in 0..=(n - seg_len) {
                let seg_ids = route.customer_ids()[from..from + seg_len].to_vec();
                let centroid = centroid_of(&seg_ids, customers);
                let avg_span = route.bbox().map(|b| b.avg_span()).unwrap_or(0.0);

                let mut positions: Vec<usize> = (0..=n)
                    .filter(|&to| !(to >= from && to <= from + seg_len))
                    .collect();
                positions.sort_by_key(|&to| std::cmp::Reverse((to as isize - from as isize).abs()));

                for to in positions {
                    if avg_span > 0.0 {
                        let neighbor = insertion_neighbor_point(route, to, customers);
                        if geometry::dist(centroid, neighbor) > GEOMETRIC_PREFILTER_FACTOR * avg_span {
                            continue;
                        }
                    }
                    let delta = route.delta_for_segment_move(from, seg_len, to, customers);
                    if delta.improves() {
                        route.apply_segment_move(from, seg_len, to, customers);
                        improved = true;
                        any_improved = true;
                        continue 'outer;
                    }
                }
            }
        }
    }
    any_improved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    #[test]
    fn test_or_opt_fixes_bad_order() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 10, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 10, 0.0, tw),
            Customer::new(3, 3.0, 0.0, 10, 0.0, tw),
        ];
        let mut route = Route::from_customers(vec![1, 3, 2], 100, &customers);
        let before = route.travel_only_cost();
        or_opt_improve(&mut route, &customers);
        assert!(route.travel_only_cost() <= before + 1e-9);
    }

    #[test]
    fn test_or_opt_already_optimal_is_noop() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 10, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 10, 0.0, tw),
            Customer::new(3, 3.0, 0.0, 10, 0.0, tw),
        ];
        let mut route = Route::from_customers(vec![1, 2, 3], 100, &customers);
        assert!(!or_opt_improve(&mut route, &customers));
    }

    #[test]
    fn test_or_opt_single_customer_noop() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![Customer::depot(0.0, 0.0), Customer::new(1, 1.0, 0.0, 10, 0.0, tw)];
        let mut route = Route::from_customers(vec![1], 100, &customers);
        assert!(!or_opt_improve(&mut route, &customers));
    }

    #[test]
    fn test_or_opt_preserves_feasibility() {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 10, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 10, 0.0, tw),
            Customer::new(3, 3.0, 0.0, 10, 0.0, tw),
        ];
        let mut route = Route::from_customers(vec![2, 1, 3], 100, &customers);
        or_opt_improve(&mut route, &customers);
        assert!(route.is_feasible(&customers));
    }
}
