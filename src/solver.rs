//! Top-level entry point wiring construction, the improvement driver, and
//! the optional post-driver passes together (§4.10).

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::candidates::CandidateList;
use crate::config::SolverConfig;
use crate::constructive::regret_insertion;
use crate::driver::mds;
use crate::error::SolverError;
use crate::inter_route::route_merge_pass;
use crate::models::{Customer, Route, Solution};

const MERGE_THRESHOLDS: [f64; 5] = [0.7, 0.6, 0.5, 0.4, 0.3];
const POLISH_TOLERANCE: f64 = 1.05;

fn try_merge_passes(solution: &mut Solution, customers: &[Customer]) {
    for &threshold in &MERGE_THRESHOLDS {
        let snapshot = solution.snapshot();
        route_merge_pass(solution, customers, threshold);
        let broke = solution.validate_coverage(customers).is_err()
            || solution.routes().iter().any(|r| !r.is_feasible(customers));
        if broke {
            solution.restore(snapshot, customers);
        }
    }
}

/// Tries to eliminate the smallest route by redistributing its customers
/// into other routes, accepting only a bounded base-cost increase.
fn polish(solution: &mut Solution, customers: &[Customer]) -> bool {
    let mut any_improved = false;
    loop {
        let smallest = solution
            .routes()
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_empty())
            .min_by_key(|(_, r)| r.len())
            .map(|(i, _)| i);
        let Some(src) = smallest else { break };

        let src_ids = solution.routes()[src].customer_ids().to_vec();
        let cap = solution.routes()[src].capacity();
        let base_cost_before = solution.total_base_cost();

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

        trial_routes[src] = Route::new(cap);
        let trial_base_cost: f64 = trial_routes.iter().map(|r| r.total_cost()).sum();
        if trial_base_cost <= base_cost_before * POLISH_TOLERANCE {
            *solution.routes_mut() = trial_routes;
            solution.drop_empty_routes();
            solution.recompute(customers, None);
            any_improved = true;
        } else {
            break;
        }
    }
    any_improved
}

/// Builds and refines a VRPTW solution for `customers` (depot at index 0)
/// and a homogeneous fleet of the given `capacity`.
///
/// # Errors
///
/// Returns [`SolverError::UnplaceableCustomer`] if some customer's demand
/// exceeds `capacity`, since no route, even a single-customer one, could
/// ever hold it. Returns [`SolverError::CoverageViolation`] if, after every
/// pass, some customer still has no route (should not happen in a correct
/// run; the driver's restoration safety net exists precisely to prevent
/// this).
pub fn solve(customers: &[Customer], capacity: i32, config: &SolverConfig) -> Result<Solution, SolverError> {
    let n = customers.len();
    for customer in customers.iter().skip(1) {
        if customer.demand() > capacity {
            return Err(SolverError::UnplaceableCustomer {
                id: customer.id(),
                demand: customer.demand(),
                capacity,
            });
        }
    }

    let mut solution = regret_insertion(customers, capacity);

    let k = config.resolved_candidate_k(n);
    let candidates = CandidateList::build(customers, k);
    let mut rng = StdRng::seed_from_u64(config.seed);

    mds(&mut solution, customers, capacity, &candidates, config, &mut rng);

    if config.enable_merge_passes {
        try_merge_passes(&mut solution, customers);
    }
    if config.enable_polish {
        polish(&mut solution, customers);
    }

    solution.validate_coverage(customers)?;
    Ok(solution)
}
