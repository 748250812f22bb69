//! Related-removal destroy operator (§4.6).
//!
//! Seeds a removal set with one uniformly random customer, then repeatedly
//! pulls in whichever remaining customer sits closest to the removal set
//! already assembled. This clusters the removed customers geographically,
//! which gives the repair step room to find a genuinely better
//! arrangement rather than just reinserting customers where they started.
//!
//! # Reference
//!
//! Shaw, P. (1998). "Using Constraint Programming and Local Search Methods
//! to Solve Vehicle Routing Problems", *CP 1998*, 417-431.

use rand::Rng;

use crate::models::{Customer, Solution};

/// A removal batch is never smaller than this, even on tiny instances.
const MIN_REMOVAL: usize = 5;

/// Removes a related cluster of customers from `solution`'s routes and
/// returns their ids. `removal_fraction` is clamped against the instance
/// size: at least [`MIN_REMOVAL`] customers come out (or every customer,
/// if fewer than that are served).
pub fn related_removal(
    solution: &mut Solution,
    customers: &[Customer],
    removal_fraction: f64,
    rng: &mut impl Rng,
) -> Vec<usize> {
    let mut remaining: Vec<usize> = solution
        .routes()
        .iter()
        .flat_map(|r| r.customer_ids().to_vec())
        .collect();
    if remaining.is_empty() {
        return Vec::new();
    }

    let target = ((removal_fraction * (customers.len() - 1) as f64).round() as usize)
        .max(MIN_REMOVAL)
        .min(remaining.len());

    let mut removed: Vec<usize> = Vec::with_capacity(target);
    let seed_idx = rng.random_range(0..remaining.len());
    removed.push(remaining.remove(seed_idx));

    while removed.len() < target && !remaining.is_empty() {
        let (idx, _) = remaining
            .iter()
            .enumerate()
            .map(|(i, &cid)| {
                let min_dist = removed
                    .iter()
                    .map(|&rid| customers[cid].distance_to(&customers[rid]))
                    .fold(f64::INFINITY, f64::min);
                (i, min_dist)
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .expect("remaining is non-empty");
        removed.push(remaining.remove(idx));
    }

    for route in solution.routes_mut() {
        let mut pos = 0;
        while pos < route.len() {
            if removed.contains(&route.customer_ids()[pos]) {
                route.remove(pos, customers);
            } else {
                pos += 1;
            }
        }
    }
    solution.drop_empty_routes();

    removed
}
