//! Route type: an ordered sequence of customer visits with an incremental
//! scheduler, a lazily-populated per-route distance cache, and a feasibility
//! oracle.

use std::collections::HashMap;

use super::Customer;
use crate::geometry::{self, BoundingBox};

const DEPOT_ID: usize = 0;
/// Mild penalty applied to idle waiting time in the cost formula (§4.2).
const WAITING_WEIGHT: f64 = 1.1;

/// The outcome of simulating a prospective mutation without committing it:
/// the change in total cost, and whether the result would be feasible.
///
/// Replaces the infinity-sentinel pattern common in looser scripting
/// implementations: `cost` is only meaningful when `feasible` is `true`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    /// Change in the route's (or pair of routes') total cost.
    pub cost: f64,
    /// Whether the simulated result satisfies capacity and time windows.
    pub feasible: bool,
}

impl Delta {
    /// An infeasible outcome; `cost` is not meaningful.
    pub fn infeasible() -> Self {
        Self {
            cost: f64::NAN,
            feasible: false,
        }
    }

    /// A feasible outcome with the given cost change.
    pub fn feasible(cost: f64) -> Self {
        Self {
            cost,
            feasible: true,
        }
    }

    /// Whether this delta is both feasible and a strict improvement.
    pub fn improves(&self) -> bool {
        self.feasible && self.cost < -1e-9
    }
}

/// A single vehicle's ordered sequence of customer visits.
///
/// The depot is implicit at both ends and is not stored in `customer_ids`.
/// A route owns its own incremental scheduler: `recalculate_from` propagates
/// arrival times forward from a given position, and a lazily-populated
/// distance cache (keyed by ordered customer-id pairs, never the depot)
/// avoids recomputing Euclidean distances between the same two customers
/// across passes.
///
/// Per the crate's non-self-referential borrowing style (see `DESIGN.md`),
/// `Route` does not hold a reference to the shared customer table; every
/// method that needs customer data takes `customers: &[Customer]` as a
/// parameter, the same table the caller threads through the whole solver.
///
/// # Examples
///
/// ```
/// use vrptw_core::models::{Customer, TimeWindow, Route};
///
/// let depot = Customer::depot(0.0, 0.0);
/// let tw = TimeWindow::new(0.0, 100.0).unwrap();
/// let c1 = Customer::new(1, 10.0, 0.0, 5, 0.0, tw);
/// let customers = vec![depot, c1];
///
/// let route = Route::from_customers(vec![1], 50, &customers);
/// assert_eq!(route.len(), 1);
/// assert!((route.total_cost() - 20.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Route {
    customer_ids: Vec<usize>,
    arrival_times: Vec<f64>,
    edge_distances: Vec<f64>,
    waiting_times: Vec<f64>,
    return_distance: f64,
    departure_time: f64,
    current_load: i32,
    capacity: i32,
    travel_distance: f64,
    waiting_total: f64,
    total_cost: f64,
    bbox: Option<BoundingBox>,
    distance_cache: HashMap<(usize, usize), f64>,
}

impl Route {
    /// Creates an empty route for a vehicle of the given capacity.
    pub fn new(capacity: i32) -> Self {
        Self {
            customer_ids: Vec::new(),
            arrival_times: Vec::new(),
            edge_distances: Vec::new(),
            waiting_times: Vec::new(),
            return_distance: 0.0,
            departure_time: 0.0,
            current_load: 0,
            capacity,
            travel_distance: 0.0,
            waiting_total: 0.0,
            total_cost: 0.0,
            bbox: None,
            distance_cache: HashMap::new(),
        }
    }

    /// Builds a route from an ordered customer-id sequence, computing its
    /// schedule, load, cost, and bounding box.
    pub fn from_customers(customer_ids: Vec<usize>, capacity: i32, customers: &[Customer]) -> Self {
        let n = customer_ids.len();
        let mut route = Self {
            arrival_times: vec![0.0; n],
            edge_distances: vec![0.0; n],
            waiting_times: vec![0.0; n],
            customer_ids,
            ..Self::new(capacity)
        };
        route.recalculate_from(0, customers);
        route.refresh_load(customers);
        route.refresh_bbox(customers);
        route
    }

    /// Ordered customer ids, depot excluded.
    pub fn customer_ids(&self) -> &[usize] {
        &self.customer_ids
    }

    /// Number of customers on this route.
    pub fn len(&self) -> usize {
        self.customer_ids.len()
    }

    /// Whether this route serves no customers.
    pub fn is_empty(&self) -> bool {
        self.customer_ids.is_empty()
    }

    /// Vehicle capacity for this route.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Current cumulative load.
    pub fn current_load(&self) -> i32 {
        self.current_load
    }

    /// Departure time from the depot.
    pub fn departure_time(&self) -> f64 {
        self.departure_time
    }

    /// Scheduled (post-wait) arrival times, parallel to `customer_ids`.
    pub fn arrival_times(&self) -> &[f64] {
        &self.arrival_times
    }

    /// Total cost: travel distance plus `1.1 ×` waiting time (§4.2).
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Travel distance only, excluding the waiting penalty. Used for
    /// external reporting (e.g. the CLI's `--compare` baseline), never for
    /// acceptance decisions.
    pub fn travel_only_cost(&self) -> f64 {
        self.travel_distance
    }

    /// Total waiting time accumulated on this route.
    pub fn waiting_time(&self) -> f64 {
        self.waiting_total
    }

    /// This route's bounding box, if non-empty.
    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    /// `true` iff every scheduled arrival respects its customer's due date
    /// and the load does not exceed capacity.
    pub fn is_feasible(&self, customers: &[Customer]) -> bool {
        if self.current_load > self.capacity {
            return false;
        }
        self.customer_ids
            .iter()
            .zip(&self.arrival_times)
            .all(|(&cid, &arrival)| !customers[cid].time_window().is_violated(arrival))
    }

    /// Returns the first infeasible position, if any (used by the O(n)
    /// feasibility scan described in §4.2).
    pub fn first_infeasible_position(&self, customers: &[Customer]) -> Option<usize> {
        self.customer_ids
            .iter()
            .zip(&self.arrival_times)
            .position(|(&cid, &arrival)| customers[cid].time_window().is_violated(arrival))
    }

    fn cached_distance(&mut self, customers: &[Customer], a: usize, b: usize) -> f64 {
        if a == DEPOT_ID || b == DEPOT_ID {
            return customers[a].distance_to(&customers[b]);
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if let Some(&d) = self.distance_cache.get(&key) {
            return d;
        }
        let d = customers[a].distance_to(&customers[b]);
        self.distance_cache.insert(key, d);
        d
    }

    /// Recomputes the schedule and cost starting at position `k`, assuming
    /// positions `0..k` are already correct. `k == customer_ids.len()` is
    /// valid (no positions to re-propagate) and still refreshes totals.
    pub fn recalculate_from(&mut self, k: usize, customers: &[Customer]) {
        let n = self.customer_ids.len();
        debug_assert!(k <= n);

        let mut t = if k == 0 {
            self.departure_time
        } else {
            self.arrival_times[k - 1] + customers[self.customer_ids[k - 1]].service_time()
        };
        let mut prev = if k == 0 { DEPOT_ID } else { self.customer_ids[k - 1] };

        for i in k..n {
            let cid = self.customer_ids[i];
            let d = self.cached_distance(customers, prev, cid);
            self.edge_distances[i] = d;
            let raw = t + d;
            let ready = customers[cid].time_window().ready();
            let wait = (ready - raw).max(0.0);
            let arrival = raw + wait;
            self.arrival_times[i] = arrival;
            self.waiting_times[i] = wait;
            t = arrival + customers[cid].service_time();
            prev = cid;
        }

        self.return_distance = self.cached_distance(customers, prev, DEPOT_ID);
        self.travel_distance = self.edge_distances.iter().sum::<f64>() + self.return_distance;
        self.waiting_total = self.waiting_times.iter().sum();
        self.total_cost = self.travel_distance + WAITING_WEIGHT * self.waiting_total;
    }

    fn refresh_load(&mut self, customers: &[Customer]) {
        self.current_load = self
            .customer_ids
            .iter()
            .map(|&cid| customers[cid].demand())
            .sum();
    }

    fn refresh_bbox(&mut self, customers: &[Customer]) {
        let points: Vec<(f64, f64)> = self
            .customer_ids
            .iter()
            .map(|&cid| customers[cid].point())
            .collect();
        self.bbox = BoundingBox::from_points(&points);
    }

    fn insert_slot(&mut self, pos: usize, cust_id: usize) {
        self.customer_ids.insert(pos, cust_id);
        self.arrival_times.insert(pos, 0.0);
        self.edge_distances.insert(pos, 0.0);
        self.waiting_times.insert(pos, 0.0);
    }

    fn remove_slot(&mut self, pos: usize) -> usize {
        self.arrival_times.remove(pos);
        self.edge_distances.remove(pos);
        self.waiting_times.remove(pos);
        self.customer_ids.remove(pos)
    }

    /// Attempts to insert `cust_id` at `pos`. Performs a capacity check
    /// first, then a feasibility check after recomputing the schedule;
    /// rolls back in place if either fails. Returns whether the insertion
    /// was committed.
    pub fn insert(&mut self, pos: usize, cust_id: usize, customers: &[Customer]) -> bool {
        if self.current_load + customers[cust_id].demand() > self.capacity {
            return false;
        }
        self.insert_slot(pos, cust_id);
        self.recalculate_from(pos, customers);
        self.refresh_load(customers);
        if self.is_feasible(customers) {
            self.refresh_bbox(customers);
            true
        } else {
            self.remove_slot(pos);
            self.recalculate_from(pos, customers);
            self.refresh_load(customers);
            false
        }
    }

    /// Removes and returns the customer at `pos`. Always feasible: dropping
    /// a stop can only reduce downstream arrival times and load.
    pub fn remove(&mut self, pos: usize, customers: &[Customer]) -> usize {
        let cid = self.remove_slot(pos);
        self.recalculate_from(pos.min(self.customer_ids.len()), customers);
        self.refresh_load(customers);
        self.refresh_bbox(customers);
        cid
    }

    /// Reverses the segment `[i, j]` in place (the 2-opt move) and
    /// recomputes the schedule from `i`. Does not check feasibility; the
    /// caller decides whether to keep the result based on `total_cost()`
    /// and `is_feasible()`.
    pub fn reverse_segment(&mut self, i: usize, j: usize, customers: &[Customer]) {
        self.customer_ids[i..=j].reverse();
        self.recalculate_from(i, customers);
    }

    fn move_segment(&mut self, from: usize, seg_len: usize, to: usize, customers: &[Customer]) {
        let segment: Vec<usize> = self.customer_ids[from..from + seg_len].to_vec();
        for _ in 0..seg_len {
            self.remove_slot(from);
        }
        let insert_pos = if to > from { to - seg_len } else { to };
        for (offset, &cid) in segment.iter().enumerate() {
            self.insert_slot(insert_pos + offset, cid);
        }
        self.recalculate_from(from.min(insert_pos), customers);
    }

    /// Commits an Or-opt segment relocation within this route: moves the
    /// `seg_len`-long segment starting at `from` so that it precedes the
    /// customer currently at original index `to` (teacher convention:
    /// `to` is expressed in the pre-move index space). Recomputes the
    /// schedule but does not re-check feasibility on its own — callers
    /// should evaluate via `delta_for_segment_move` first.
    pub fn apply_segment_move(&mut self, from: usize, seg_len: usize, to: usize, customers: &[Customer]) {
        self.move_segment(from, seg_len, to, customers);
    }

    /// Swaps the customers at positions `i` and `j` and recomputes the
    /// schedule from the earlier of the two.
    pub fn swap_positions(&mut self, i: usize, j: usize, customers: &[Customer]) {
        self.customer_ids.swap(i, j);
        self.recalculate_from(i.min(j), customers);
    }

    /// Sets the depot departure time and recomputes the schedule. Rolls
    /// back and returns `false` if the new departure makes the route
    /// infeasible.
    pub fn adjust_departure(&mut self, t: f64, customers: &[Customer]) -> bool {
        let old = self.departure_time;
        self.departure_time = t;
        self.recalculate_from(0, customers);
        if self.is_feasible(customers) {
            true
        } else {
            self.departure_time = old;
            self.recalculate_from(0, customers);
            false
        }
    }

    /// Simulates inserting `cust_id` at `pos` without mutating this route.
    /// Does a cheap capacity pre-check before paying for the full
    /// recomputation.
    pub fn delta_for_external(&self, cust_id: usize, pos: usize, customers: &[Customer]) -> Delta {
        if self.current_load + customers[cust_id].demand() > self.capacity {
            return Delta::infeasible();
        }
        let mut trial = self.clone();
        trial.insert_slot(pos, cust_id);
        trial.recalculate_from(pos, customers);
        trial.refresh_load(customers);
        if trial.is_feasible(customers) {
            Delta::feasible(trial.total_cost - self.total_cost)
        } else {
            Delta::infeasible()
        }
    }

    /// Simulates moving the `seg_len`-long segment at `from` to precede the
    /// original-index position `to`, without mutating this route. `to ==
    /// from` is a no-op (zero-cost, feasible).
    pub fn delta_for_segment_move(
        &self,
        from: usize,
        seg_len: usize,
        to: usize,
        customers: &[Customer],
    ) -> Delta {
        if to >= from && to <= from + seg_len {
            return Delta::feasible(0.0);
        }
        let mut trial = self.clone();
        trial.move_segment(from, seg_len, to, customers);
        if trial.is_feasible(customers) {
            Delta::feasible(trial.total_cost - self.total_cost)
        } else {
            Delta::infeasible()
        }
    }

    /// Simulates reversing the segment `[i, j]` without mutating this route.
    pub fn delta_for_reversal(&self, i: usize, j: usize, customers: &[Customer]) -> Delta {
        if i >= j {
            return Delta::feasible(0.0);
        }
        let mut trial = self.clone();
        trial.reverse_segment(i, j, customers);
        if trial.is_feasible(customers) {
            Delta::feasible(trial.total_cost - self.total_cost)
        } else {
            Delta::infeasible()
        }
    }

    /// Simulates swapping the customers at positions `i` and `j` without
    /// mutating this route. `i == j` is a no-op (zero-cost, feasible).
    pub fn delta_for_swap(&self, i: usize, j: usize, customers: &[Customer]) -> Delta {
        if i == j {
            return Delta::feasible(0.0);
        }
        let mut trial = self.clone();
        trial.swap_positions(i, j, customers);
        if trial.is_feasible(customers) {
            Delta::feasible(trial.total_cost - self.total_cost)
        } else {
            Delta::infeasible()
        }
    }

    /// Simulates removing the customer at `pos`, returning the (always
    /// feasible) cost delta — useful to score ejection-chain victims and
    /// LNS removal candidates without committing.
    pub fn delta_for_removal(&self, pos: usize, customers: &[Customer]) -> f64 {
        let mut trial = self.clone();
        trial.remove(pos, customers);
        trial.total_cost - self.total_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    fn line_customers() -> Vec<Customer> {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 10, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 10, 0.0, tw),
            Customer::new(3, 3.0, 0.0, 10, 0.0, tw),
        ]
    }

    #[test]
    fn test_empty_route() {
        let r = Route::new(50);
        assert!(r.is_empty());
        assert_eq!(r.total_cost(), 0.0);
    }

    #[test]
    fn test_from_customers_basic_cost() {
        let customers = line_customers();
        let route = Route::from_customers(vec![1, 2, 3], 100, &customers);
        assert!((route.travel_only_cost() - 6.0).abs() < 1e-9);
        assert_eq!(route.waiting_time(), 0.0);
        assert_eq!(route.current_load(), 30);
    }

    #[test]
    fn test_insert_respects_capacity() {
        let customers = line_customers();
        let mut route = Route::from_customers(vec![1], 15, &customers);
        assert!(!route.insert(1, 2, &customers));
        assert_eq!(route.len(), 1);
    }

    #[test]
    fn test_insert_commits_when_feasible() {
        let customers = line_customers();
        let mut route = Route::from_customers(vec![1], 100, &customers);
        assert!(route.insert(1, 2, &customers));
        assert_eq!(route.customer_ids(), &[1, 2]);
    }

    #[test]
    fn test_insert_rolls_back_on_window_violation() {
        let tight = TimeWindow::new(0.0, 1.0).expect("valid");
        let loose = TimeWindow::new(0.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 10, 0.0, loose),
            Customer::new(2, 100.0, 0.0, 10, 0.0, tight),
        ];
        let mut route = Route::from_customers(vec![1], 100, &customers);
        assert!(!route.insert(1, 2, &customers));
        assert_eq!(route.customer_ids(), &[1]);
    }

    #[test]
    fn test_remove_is_always_feasible() {
        let customers = line_customers();
        let mut route = Route::from_customers(vec![1, 2, 3], 100, &customers);
        let removed = route.remove(1, &customers);
        assert_eq!(removed, 2);
        assert_eq!(route.customer_ids(), &[1, 3]);
    }

    #[test]
    fn test_reverse_segment_recomputes_cost() {
        let customers = line_customers();
        let mut route = Route::from_customers(vec![3, 1, 2], 100, &customers);
        let before = route.travel_only_cost();
        route.reverse_segment(0, 2, &customers);
        assert_eq!(route.customer_ids(), &[2, 1, 3]);
        assert!(route.travel_only_cost() <= before + 1e-9);
    }

    #[test]
    fn test_delta_for_external_matches_commit() {
        let customers = line_customers();
        let route = Route::from_customers(vec![1, 3], 100, &customers);
        let delta = route.delta_for_external(2, 1, &customers);
        assert!(delta.feasible);
        let mut committed = route.clone();
        committed.insert(1, 2, &customers);
        assert!((committed.total_cost() - (route.total_cost() + delta.cost)).abs() < 1e-9);
    }

    #[test]
    fn test_delta_for_segment_move_noop() {
        let customers = line_customers();
        let route = Route::from_customers(vec![1, 2, 3], 100, &customers);
        let delta = route.delta_for_segment_move(0, 1, 0, &customers);
        assert_eq!(delta.cost, 0.0);
        assert!(delta.feasible);
    }

    #[test]
    fn test_waiting_weight_applied() {
        let tw_early = TimeWindow::new(50.0, 1000.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 10.0, 0.0, 5, 0.0, tw_early),
        ];
        let route = Route::from_customers(vec![1], 100, &customers);
        // Arrival at 10, wait until 50: waiting = 40, travel = 20 (there+back)
        assert!((route.waiting_time() - 40.0).abs() < 1e-9);
        assert!((route.total_cost() - (20.0 + 1.1 * 40.0)).abs() < 1e-9);
    }

    #[test]
    fn test_capacity_feasibility() {
        let customers = line_customers();
        let route = Route::from_customers(vec![1, 2, 3], 25, &customers);
        assert!(!route.is_feasible(&customers));
    }

    #[test]
    fn test_delta_for_swap_matches_commit() {
        let customers = line_customers();
        let mut route = Route::from_customers(vec![1, 3, 2], 100, &customers);
        let delta = route.delta_for_swap(1, 2, &customers);
        let before = route.total_cost();
        route.swap_positions(1, 2, &customers);
        assert!((route.total_cost() - before - delta.cost).abs() < 1e-9);
    }

    #[test]
    fn test_delta_for_swap_noop() {
        let customers = line_customers();
        let route = Route::from_customers(vec![1, 2, 3], 100, &customers);
        let delta = route.delta_for_swap(1, 1, &customers);
        assert_eq!(delta.cost, 0.0);
        assert!(delta.feasible);
    }
}
