//! Route criticality scorer (§4.7).
//!
//! Ranks routes by how much they'd benefit from a dedicated local-search
//! pass, used only to prioritize where the improvement driver spends its
//! intra-route refinement budget. Never consulted for correctness.

use crate::models::{Customer, Route};

const TIGHT_THRESHOLD: f64 = 10.0;
const WAITING_NORM: f64 = 100.0;
const TIGHT_COUNT_NORM: f64 = 10.0;
const SLACK_NORM: f64 = 50.0;

fn norm(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn route_score(route: &Route, customers: &[Customer]) -> f64 {
    if route.is_empty() {
        return 0.0;
    }
    let mut tight_count = 0usize;
    let mut slack_sum = 0.0;
    for (pos, &cid) in route.customer_ids().iter().enumerate() {
        let tw = customers[cid].time_window();
        let arrival = route.arrival_times()[pos];
        let slack = tw.due() - arrival;
        if slack < TIGHT_THRESHOLD {
            tight_count += 1;
        }
        slack_sum += slack.max(0.0);
    }
    let avg_slack = slack_sum / route.len() as f64;

    0.4 * norm(route.waiting_time() / WAITING_NORM)
        + 0.4 * norm(tight_count as f64 / TIGHT_COUNT_NORM)
        + 0.2 * (1.0 - norm(avg_slack / SLACK_NORM))
}

/// Returns the indices (into `routes`) of the top-`n` most critical
/// non-empty routes, highest score first.
pub fn top_critical_routes(routes: &[Route], customers: &[Customer], n: usize) -> Vec<usize> {
    let mut scored: Vec<(usize, f64)> = routes
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_empty())
        .map(|(i, r)| (i, route_score(r, customers)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    scored.into_iter().take(n).map(|(i, _)| i).collect()
}
