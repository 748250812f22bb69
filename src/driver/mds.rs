//! Minimize-Distance-and-Size improvement driver (§4.9).
//!
//! Phase 1 greedily shrinks the fleet with relocate, route-empty, and
//! ejection-chain passes until no further route can be eliminated. Phase 2
//! refines the surviving solution with simulated annealing over a mix of
//! LNS destroy/repair, inter-route operators, and intra-route polish on
//! the currently most critical routes, with a restoration safety net
//! guarding against any customer silently falling out of the solution.

use rand::Rng;

use crate::candidates::CandidateList;
use crate::config::SolverConfig;
use crate::criticality::top_critical_routes;
use crate::inter_route::{cross_exchange_pass, ejection_chain_eliminate, relocate_pass, route_empty_pass, two_opt_star_pass};
use crate::lns::{regret2_repair, related_removal};
use crate::local_search::{intra_relocate_improve, or_opt_improve, temporal_shift_improve, two_opt_improve};
use crate::models::{Customer, Route, Solution};

/// Checks the coverage invariant after an operator pass and restores any
/// customer that fell out of the solution into a fresh single-customer
/// route, up to `max_restorations_per_customer` attempts. Returns `true`
/// if a restoration fired. Assumes every customer's demand is within
/// `capacity` (checked once by `solver::solve` before `mds` ever runs), so
/// the fresh route is always placeable.
fn restore_missing(solution: &mut Solution, customers: &[Customer], capacity: i32, config: &SolverConfig) -> bool {
    let missing = solution.missing_customers(customers);
    if missing.is_empty() {
        return false;
    }
    for cid in missing {
        let attempt = solution.record_restoration(cid);
        if attempt <= config.max_restorations_per_customer {
            tracing::warn!(customer = cid, attempt, "restoring missing customer into a fresh route");
            solution.add_route(Route::from_customers(vec![cid], capacity, customers));
        } else {
            tracing::warn!(customer = cid, attempt, "customer exceeded restoration limit, leaving unplaced");
        }
    }
    solution.recompute(customers, config.vehicle_penalty);
    true
}

fn phase1_fleet_reduction(
    solution: &mut Solution,
    customers: &[Customer],
    capacity: i32,
    candidates: &CandidateList,
    config: &SolverConfig,
    n: usize,
) {
    let passes = config.resolved_fleet_passes(n);
    for _ in 0..passes {
        let mut any = false;
        any |= relocate_pass(solution, customers, candidates);
        any |= route_empty_pass(solution, customers);

        let mut tried: std::collections::HashSet<Vec<usize>> = std::collections::HashSet::new();
        loop {
            let candidate = solution
                .routes()
                .iter()
                .enumerate()
                .filter(|(_, r)| !r.is_empty() && r.len() <= 9)
                .filter(|(_, r)| !tried.contains(&r.customer_ids().to_vec()))
                .min_by_key(|(_, r)| r.len())
                .map(|(i, r)| (i, r.customer_ids().to_vec()));
            let Some((idx, ids)) = candidate else { break };
            if ejection_chain_eliminate(solution, customers, idx) {
                any = true;
            } else {
                tried.insert(ids);
            }
        }

        if restore_missing(solution, customers, capacity, config) {
            break;
        }
        if !any {
            break;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn phase2_sa_refinement(
    solution: &mut Solution,
    customers: &[Customer],
    capacity: i32,
    candidates: &CandidateList,
    config: &SolverConfig,
    n: usize,
    rng: &mut impl Rng,
) {
    let max_iterations = config.resolved_max_iterations(n);
    let mut temperature = config.initial_temperature;
    let mut best = solution.snapshot();
    let mut no_improvement = 0usize;
    let mut no_best_improvement = 0usize;
    let mut since_reheat = 0usize;

    for iteration in 0..max_iterations {
        let before = solution.snapshot();

        let lns_prob = if temperature > 50.0 { 0.40 } else { 0.20 };
        if rng.random::<f64>() < lns_prob {
            let fraction = rng.random_range(config.lns_removal_min..=config.lns_removal_max);
            let removed = related_removal(solution, customers, fraction, rng);
            regret2_repair(solution, customers, &removed, capacity);
        }

        if iteration % 3 == 0 && solution.routes().len() >= 2 {
            let roll: f64 = rng.random();
            if roll < 0.40 {
                two_opt_star_pass(solution, customers);
            } else if roll < 0.70 {
                relocate_pass(solution, customers, candidates);
            } else {
                cross_exchange_pass(solution, customers);
            }
        }

        let top_n = rng.random_range(config.top_n_critical.clone());
        for idx in top_critical_routes(solution.routes(), customers, top_n) {
            for _ in 0..6 {
                let mut improved_any = false;
                if let Some(route) = solution.routes_mut().get_mut(idx) {
                    improved_any |= two_opt_improve(route, customers);
                    improved_any |= or_opt_improve(route, customers);
                    improved_any |= temporal_shift_improve(route, customers);
                    improved_any |= intra_relocate_improve(route, customers);
                }
                if !improved_any {
                    break;
                }
            }
        }

        restore_missing(solution, customers, capacity, config);
        solution.recompute(customers, config.vehicle_penalty);

        let delta_cost = solution.total_cost() - before.total_cost();
        let fleet_reduced = solution.num_vehicles() < before.num_vehicles();
        let accept = fleet_reduced
            || delta_cost < -0.001
            || rng.random::<f64>() < (-delta_cost / temperature).exp();

        if accept {
            if solution.total_cost() < before.total_cost() - 1e-9 || fleet_reduced {
                no_improvement = 0;
            } else {
                no_improvement += 1;
            }
        } else {
            solution.restore(before, customers);
            no_improvement += 1;
        }

        if solution.total_cost() < best.total_cost() - 1e-9 {
            best = solution.snapshot();
            no_best_improvement = 0;
            since_reheat = 0;
        } else {
            no_best_improvement += 1;
            since_reheat += 1;
        }

        temperature = (temperature * config.cooling_rate).max(config.min_temperature);
        if since_reheat >= config.reheat_after {
            temperature = config.reheat_temperature;
            since_reheat = 0;
        }

        if no_improvement >= config.early_termination || no_best_improvement >= config.no_best_improvement_limit {
            break;
        }
    }

    solution.restore(best, customers);
}

/// Runs the full two-phase improvement driver on `solution` in place.
pub fn mds(
    solution: &mut Solution,
    customers: &[Customer],
    capacity: i32,
    candidates: &CandidateList,
    config: &SolverConfig,
    rng: &mut impl Rng,
) {
    let n = customers.len();
    phase1_fleet_reduction(solution, customers, capacity, candidates, config, n);
    phase2_sa_refinement(solution, customers, capacity, candidates, config, n, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructive::regret_insertion;
    use crate::models::TimeWindow;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn clustered_customers() -> Vec<Customer> {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        let mut customers = vec![Customer::depot(0.0, 0.0)];
        for i in 0..10 {
            let x = (i as f64) * 1.0;
            customers.push(Customer::new(i + 1, x, 0.0, 5, 0.0, tw));
        }
        customers
    }

    #[test]
    fn test_mds_preserves_coverage() {
        let customers = clustered_customers();
        let mut solution = regret_insertion(&customers, 20);
        let candidates = CandidateList::build(&customers, 5);
        let config = SolverConfig::default().with_max_iterations(20).with_fleet_passes(3);
        let mut rng = StdRng::seed_from_u64(1);
        mds(&mut solution, &customers, 20, &candidates, &config, &mut rng);
        assert!(solution.validate_coverage(&customers).is_ok());
    }

    #[test]
    fn test_mds_never_worsens_best_known() {
        let customers = clustered_customers();
        let mut solution = regret_insertion(&customers, 20);
        let before = solution.total_cost();
        let candidates = CandidateList::build(&customers, 5);
        let config = SolverConfig::default().with_max_iterations(20).with_fleet_passes(3);
        let mut rng = StdRng::seed_from_u64(2);
        mds(&mut solution, &customers, 20, &candidates, &config, &mut rng);
        assert!(solution.total_cost() <= before + 1e-6);
    }

    #[test]
    fn test_mds_deterministic_given_seed() {
        let customers = clustered_customers();
        let candidates = CandidateList::build(&customers, 5);
        let config = SolverConfig::default().with_max_iterations(15).with_fleet_passes(2);

        let mut sol_a = regret_insertion(&customers, 20);
        let mut rng_a = StdRng::seed_from_u64(99);
        mds(&mut sol_a, &customers, 20, &candidates, &config, &mut rng_a);

        let mut sol_b = regret_insertion(&customers, 20);
        let mut rng_b = StdRng::seed_from_u64(99);
        mds(&mut sol_b, &customers, 20, &candidates, &config, &mut rng_b);

        assert!((sol_a.total_cost() - sol_b.total_cost()).abs() < 1e-9);
    }
}
