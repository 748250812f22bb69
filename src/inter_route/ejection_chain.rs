//! Ejection chains to eliminate a targeted route (§4.5).
//!
//! Processes the target route's customers one at a time. Each customer is
//! first tried as a direct relocation into any other route (depth 1). If
//! no route has room, a "victim" already living in some other route is
//! ejected to make space (depth 2), and the displaced victim is in turn
//! relocated elsewhere. If that second relocation also has no home, one
//! more level is tried (depth 3): a second victim is ejected from the
//! victim's destination route. The target route disappears only once
//! every one of its customers has been placed by some depth.

use crate::models::{Customer, Route, Solution};

const DEPTH2_TOP_K: usize = 6;
const DEPTH3_TOP_K: usize = 3;
const BBOX_PRUNE_FACTOR: f64 = 3.0;

fn victim_score(route: &Route, pos: usize, customers: &[Customer]) -> f64 {
    let cid = route.customer_ids()[pos];
    let demand = customers[cid].demand() as f64;
    let tw = customers[cid].time_window();
    let slack = (tw.due() - tw.ready()) / 80.0;
    let n = route.len();
    let position_score = if pos == 0 || pos == n - 1 {
        3.0
    } else if pos == 1 || pos == n.saturating_sub(2) {
        2.0
    } else {
        1.0
    };
    0.35 * demand + 0.30 * slack.min(2.0) + 0.35 * position_score
}

fn top_victims(route: &Route, customers: &[Customer], k: usize) -> Vec<usize> {
    let mut scored: Vec<(usize, f64)> = (0..route.len())
        .map(|pos| (pos, victim_score(route, pos, customers)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    scored.into_iter().take(k).map(|(pos, _)| pos).collect()
}

fn best_home(
    routes: &[Route],
    exclude: &[usize],
    cid: usize,
    customers: &[Customer],
) -> Option<(usize, usize, f64)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for (j, r) in routes.iter().enumerate() {
        if exclude.contains(&j) {
            continue;
        }
        for pos in 0..=r.len() {
            let delta = r.delta_for_external(cid, pos, customers);
            if delta.feasible && best.as_ref().is_none_or(|b| delta.cost < b.2) {
                best = Some((j, pos, delta.cost));
            }
        }
    }
    best
}

/// Tries to place `cid` (currently a member of `target`) into some other
/// route, using up to a depth-3 ejection chain. Mutates `trial_routes` in
/// place and returns `true` on success.
fn place_via_chain(trial_routes: &mut [Route], customers: &[Customer], target: usize, cid: usize) -> bool {
    if let Some((j, pos, _)) = best_home(trial_routes, &[target], cid, customers) {
        trial_routes[j].insert(pos, cid, customers);
        return true;
    }

    let target_bbox = trial_routes[target].bbox().copied();
    let n_routes = trial_routes.len();

    for a in 0..n_routes {
        if a == target || trial_routes[a].is_empty() {
            continue;
        }
        if let (Some(tb), Some(ab)) = (target_bbox, trial_routes[a].bbox()) {
            let buffer = BBOX_PRUNE_FACTOR * ab.avg_span().max(tb.avg_span());
            if !tb.overlaps(ab, buffer) {
                continue;
            }
        }

        for &vpos in &top_victims(&trial_routes[a], customers, DEPTH2_TOP_K) {
            let victim_id = trial_routes[a].customer_ids()[vpos];
            let mut route_a_trial = trial_routes[a].clone();
            route_a_trial.remove(vpos, customers);
            let insert_delta = route_a_trial.delta_for_external(cid, route_a_trial.len(), customers);
            if !insert_delta.feasible {
                continue;
            }

            if let Some((b, bpos, _)) =
                best_home(trial_routes, &[target, a], victim_id, customers)
            {
                trial_routes[a] = route_a_trial;
                trial_routes[a].insert(trial_routes[a].len(), cid, customers);
                trial_routes[b].insert(bpos, victim_id, customers);
                return true;
            }

            for b in 0..n_routes {
                if b == target || b == a || trial_routes[b].is_empty() {
                    continue;
                }
                for &v2pos in &top_victims(&trial_routes[b], customers, DEPTH3_TOP_K) {
                    let v2_id = trial_routes[b].customer_ids()[v2pos];
                    let mut route_b_trial = trial_routes[b].clone();
                    route_b_trial.remove(v2pos, customers);
                    let victim_insert = route_b_trial.delta_for_external(victim_id, route_b_trial.len(), customers);
                    if !victim_insert.feasible {
                        continue;
                    }
                    if let Some((c, cpos, _)) =
                        best_home(trial_routes, &[target, a, b], v2_id, customers)
                    {
                        trial_routes[a] = route_a_trial.clone();
                        trial_routes[a].insert(trial_routes[a].len(), cid, customers);
                        trial_routes[b] = route_b_trial;
                        trial_routes[b].insert(trial_routes[b].len(), victim_id, customers);
                        trial_routes[c].insert(cpos, v2_id, customers);
                        return true;
                    }
                }
            }
        }
    }

    false
}

/// Attempts to eliminate `target` entirely via ejection chains. Leaves
/// `solution` untouched and returns `false` if any of its customers could
/// not be placed elsewhere.
pub fn ejection_chain_eliminate(solution: &mut Solution, customers: &[Customer], target: usize) -> bool {
    let target_ids = solution.routes()[target].customer_ids().to_vec();
    if target_ids.is_empty() {
        return false;
    }
    let cap = solution.routes()[target].capacity();
    let mut trial_routes: Vec<Route> = solution.routes().to_vec();

    for &cid in &target_ids {
        if !place_via_chain(&mut trial_routes, customers, target, cid) {
            return false;
        }
    }

    trial_routes[target] = Route::new(cap);
    *solution.routes_mut() = trial_routes;
    solution.drop_empty_routes();
    solution.recompute(customers, None);
    true
}
