//! Solution type: the set of routes produced for an instance, plus the
//! bookkeeping needed for coverage validation and SA-style snapshot/restore.

use std::collections::HashSet;

use super::{Customer, Route};
use crate::error::SolverError;

const DEPOT_ID: usize = 0;

/// Clamp range for the computed fleet-size penalty λ (§4.2).
const PENALTY_MIN: f64 = 3000.0;
const PENALTY_MAX: f64 = 5000.0;

/// A restoration of a customer dropped by the safety net (§4.9). Recorded
/// so tests can assert the net never fires on a correct run, without
/// turning a recoverable event into a hard error in production.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestorationEvent {
    /// The customer that had to be restored.
    pub customer_id: usize,
    /// How many times this customer has now been restored.
    pub attempt: u32,
}

/// A complete VRPTW solution: an ordered collection of routes.
///
/// `Solution` owns its routes uniquely; operators borrow them mutably one
/// or two at a time through the driver. `total_base_cost` is the sum of
/// route costs; `total_cost` additionally adds the fleet-size penalty
/// `λ · num_vehicles` used as the driver's acceptance objective (§4.2).
///
/// # Examples
///
/// ```
/// use vrptw_core::models::{Customer, TimeWindow, Route, Solution};
///
/// let depot = Customer::depot(0.0, 0.0);
/// let tw = TimeWindow::new(0.0, 100.0).unwrap();
/// let customers = vec![depot, Customer::new(1, 10.0, 0.0, 5, 0.0, tw)];
///
/// let mut sol = Solution::new();
/// sol.add_route(Route::from_customers(vec![1], 50, &customers));
/// sol.recompute(&customers, None);
/// assert_eq!(sol.num_vehicles(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Solution {
    routes: Vec<Route>,
    total_base_cost: f64,
    total_cost: f64,
    restoration_events: Vec<RestorationEvent>,
    restoration_attempts: std::collections::HashMap<usize, u32>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            total_base_cost: 0.0,
            total_cost: 0.0,
            restoration_events: Vec::new(),
            restoration_attempts: std::collections::HashMap::new(),
        }
    }

    /// Appends a route. Callers should call `recompute` afterward.
    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Removes and discards routes that have become empty (e.g. after
    /// route-empty or relocate operators drain them).
    pub fn drop_empty_routes(&mut self) {
        self.routes.retain(|r| !r.is_empty());
    }

    /// All routes in this solution.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Mutable access to routes, for operators.
    pub fn routes_mut(&mut self) -> &mut Vec<Route> {
        &mut self.routes
    }

    /// Number of routes (vehicles used).
    pub fn num_vehicles(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Sum of per-route costs (travel + waiting penalty), before the
    /// fleet-size penalty.
    pub fn total_base_cost(&self) -> f64 {
        self.total_base_cost
    }

    /// The penalized objective: `total_base_cost + λ · num_vehicles`.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Sum of travel-only costs, excluding waiting. Exposed for external
    /// comparison (e.g. the CLI's `--compare` baseline); never used in
    /// acceptance decisions.
    pub fn travel_only_cost(&self) -> f64 {
        self.routes.iter().map(|r| r.travel_only_cost()).sum()
    }

    /// Total number of customer visits across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Recomputes `total_base_cost` and `total_cost` from the current
    /// routes. `penalty` overrides the computed λ; `None` uses the §4.2
    /// formula clamped to `[3000, 5000]`.
    pub fn recompute(&mut self, customers: &[Customer], penalty: Option<f64>) {
        self.total_base_cost = self.routes.iter().map(|r| r.total_cost()).sum();
        let lambda = penalty.unwrap_or_else(|| self.computed_penalty(customers));
        self.total_cost = self.total_base_cost + lambda * self.num_vehicles() as f64;
    }

    fn computed_penalty(&self, _customers: &[Customer]) -> f64 {
        let active = self.routes.iter().filter(|r| !r.is_empty()).count().max(1);
        let avg_route_cost = self.total_base_cost / active as f64;
        let avg_waiting = self.routes.iter().map(|r| r.waiting_time()).sum::<f64>() / active as f64;
        (1.5 * avg_route_cost + 0.5 * avg_waiting + 3000.0).clamp(PENALTY_MIN, PENALTY_MAX)
    }

    /// Checks invariant #1: the multiset of customer ids across all routes
    /// equals the input set exactly once. Returns the missing ids (empty on
    /// success; duplicates are reported as part of `missing` being
    /// inconsistent with the expected count).
    pub fn validate_coverage(&self, customers: &[Customer]) -> Result<(), SolverError> {
        let mut seen: HashSet<usize> = HashSet::new();
        let mut duplicates = 0usize;
        for route in &self.routes {
            for &cid in route.customer_ids() {
                if !seen.insert(cid) {
                    duplicates += 1;
                }
            }
        }
        let expected: HashSet<usize> = customers
            .iter()
            .map(|c| c.id())
            .filter(|&id| id != DEPOT_ID)
            .collect();
        let missing = expected.difference(&seen).count() + duplicates;
        if missing == 0 {
            Ok(())
        } else {
            Err(SolverError::CoverageViolation {
                missing,
                attempts: self.restoration_events.len(),
            })
        }
    }

    /// Returns the ids missing from route membership relative to the full
    /// customer set (used by the restoration safety net to know what to
    /// re-place).
    pub fn missing_customers(&self, customers: &[Customer]) -> Vec<usize> {
        let seen: HashSet<usize> = self
            .routes
            .iter()
            .flat_map(|r| r.customer_ids().iter().copied())
            .collect();
        customers
            .iter()
            .map(|c| c.id())
            .filter(|&id| id != DEPOT_ID && !seen.contains(&id))
            .collect()
    }

    /// Records a restoration event for `customer_id`, returning the new
    /// attempt count for that customer.
    pub fn record_restoration(&mut self, customer_id: usize) -> u32 {
        let attempt = self
            .restoration_attempts
            .entry(customer_id)
            .and_modify(|c| *c += 1)
            .or_insert(1);
        self.restoration_events.push(RestorationEvent {
            customer_id,
            attempt: *attempt,
        });
        *attempt
    }

    /// Restoration events recorded so far. Production code never panics on
    /// these; tests assert this stays empty on a correct run.
    pub fn restoration_events(&self) -> &[RestorationEvent] {
        &self.restoration_events
    }

    /// Captures the current state for SA-style snapshot/restore around a
    /// tentative mutation, without deep-cloning each route's distance
    /// cache (it is an optimization, not state worth copying).
    pub fn snapshot(&self) -> SolutionSnapshot {
        SolutionSnapshot {
            routes: self.routes.iter().map(RouteSnapshot::capture).collect(),
            total_base_cost: self.total_base_cost,
            total_cost: self.total_cost,
        }
    }

    /// Restores a previously taken snapshot in place, rebuilding each
    /// route's schedule from its customer ids rather than copying it.
    /// Restoration bookkeeping (`restoration_events`/`restoration_attempts`)
    /// is left untouched: it records the whole run's history, not state
    /// that backtracking should undo.
    pub fn restore(&mut self, snapshot: SolutionSnapshot, customers: &[Customer]) {
        self.routes = snapshot.routes.iter().map(|r| r.rebuild(customers)).collect();
        self.total_base_cost = snapshot.total_base_cost;
        self.total_cost = snapshot.total_cost;
    }
}

/// A lean capture of one route's state: just enough to rebuild it exactly
/// (customer order, capacity, depot departure time), skipping the
/// schedule vectors and distance cache that `Route::from_customers`
/// recomputes anyway.
#[derive(Debug, Clone)]
struct RouteSnapshot {
    customer_ids: Vec<usize>,
    capacity: i32,
    departure_time: f64,
}

impl RouteSnapshot {
    fn capture(route: &Route) -> Self {
        Self {
            customer_ids: route.customer_ids().to_vec(),
            capacity: route.capacity(),
            departure_time: route.departure_time(),
        }
    }

    fn rebuild(&self, customers: &[Customer]) -> Route {
        let mut route = Route::from_customers(self.customer_ids.clone(), self.capacity, customers);
        // The departure time was feasible when captured, so re-applying it
        // against the same customer order is feasible again.
        route.adjust_departure(self.departure_time, customers);
        route
    }
}

/// A lean snapshot of a [`Solution`], produced by [`Solution::snapshot`]
/// and consumed by [`Solution::restore`].
#[derive(Debug, Clone)]
pub struct SolutionSnapshot {
    routes: Vec<RouteSnapshot>,
    total_base_cost: f64,
    total_cost: f64,
}

impl SolutionSnapshot {
    /// The penalized objective captured at snapshot time.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// The base cost (sum of route costs) captured at snapshot time.
    pub fn total_base_cost(&self) -> f64 {
        self.total_base_cost
    }

    /// Vehicle count captured at snapshot time.
    pub fn num_vehicles(&self) -> usize {
        self.routes.iter().filter(|r| !r.customer_ids.is_empty()).count()
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;

    fn customers() -> Vec<Customer> {
        let tw = TimeWindow::new(0.0, 1000.0).expect("valid");
        vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 10, 0.0, tw),
            Customer::new(2, 2.0, 0.0, 10, 0.0, tw),
            Customer::new(3, 3.0, 0.0, 10, 0.0, tw),
        ]
    }

    #[test]
    fn test_empty_solution() {
        let sol = Solution::new();
        assert_eq!(sol.num_vehicles(), 0);
        assert_eq!(sol.num_served(), 0);
    }

    #[test]
    fn test_recompute_applies_penalty() {
        let customers = customers();
        let mut sol = Solution::new();
        sol.add_route(Route::from_customers(vec![1], 100, &customers));
        sol.recompute(&customers, Some(4000.0));
        assert!((sol.total_cost() - (sol.total_base_cost() + 4000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_validate_coverage_ok() {
        let customers = customers();
        let mut sol = Solution::new();
        sol.add_route(Route::from_customers(vec![1, 2], 100, &customers));
        sol.add_route(Route::from_customers(vec![3], 100, &customers));
        assert!(sol.validate_coverage(&customers).is_ok());
    }

    #[test]
    fn test_validate_coverage_missing() {
        let customers = customers();
        let mut sol = Solution::new();
        sol.add_route(Route::from_customers(vec![1], 100, &customers));
        assert!(sol.validate_coverage(&customers).is_err());
        assert_eq!(sol.missing_customers(&customers), vec![2, 3]);
    }

    #[test]
    fn test_validate_coverage_duplicate() {
        let customers = customers();
        let mut sol = Solution::new();
        sol.add_route(Route::from_customers(vec![1, 2], 100, &customers));
        sol.add_route(Route::from_customers(vec![2, 3], 100, &customers));
        assert!(sol.validate_coverage(&customers).is_err());
    }

    #[test]
    fn test_snapshot_restore() {
        let customers = customers();
        let mut sol = Solution::new();
        sol.add_route(Route::from_customers(vec![1, 2], 100, &customers));
        sol.recompute(&customers, Some(4000.0));
        let snap = sol.snapshot();
        sol.routes_mut()[0].remove(0, &customers);
        sol.recompute(&customers, Some(4000.0));
        assert_ne!(sol.num_served(), 2);
        sol.restore(snap, &customers);
        assert_eq!(sol.num_served(), 2);
    }

    #[test]
    fn test_restoration_recording() {
        let mut sol = Solution::new();
        assert_eq!(sol.record_restoration(5), 1);
        assert_eq!(sol.record_restoration(5), 2);
        assert_eq!(sol.restoration_events().len(), 2);
    }

    #[test]
    fn test_drop_empty_routes() {
        let customers = customers();
        let mut sol = Solution::new();
        sol.add_route(Route::new(100));
        sol.add_route(Route::from_customers(vec![1], 100, &customers));
        sol.drop_empty_routes();
        assert_eq!(sol.routes().len(), 1);
    }
}
