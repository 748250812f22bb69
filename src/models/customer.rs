//! Customer and time window types.

use serde::{Deserialize, Serialize};

/// A time window constraint for service at a customer location.
///
/// The vehicle must arrive no later than `due` and may arrive as early as
/// `ready` (waiting is allowed if early).
///
/// # Examples
///
/// ```
/// use vrptw_core::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0).unwrap();
/// assert!(tw.ready() <= tw.due());
/// assert!(tw.contains(150.0));
/// assert!(!tw.contains(250.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    ready: f64,
    due: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `ready > due` or either value is non-finite.
    pub fn new(ready: f64, due: f64) -> Option<Self> {
        if !ready.is_finite() || !due.is_finite() || ready > due {
            return None;
        }
        Some(Self { ready, due })
    }

    /// A window that accepts any non-negative arrival time, used for the depot.
    pub fn unbounded() -> Self {
        Self {
            ready: 0.0,
            due: f64::MAX,
        }
    }

    /// Earliest allowable arrival time.
    pub fn ready(&self) -> f64 {
        self.ready
    }

    /// Latest allowable arrival time.
    pub fn due(&self) -> f64 {
        self.due
    }

    /// Slack: how much later than `ready` the window still tolerates.
    pub fn width(&self) -> f64 {
        self.due - self.ready
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.ready && time <= self.due
    }

    /// Returns the waiting time if arriving at the given time.
    ///
    /// Zero if the vehicle arrives within or after the window.
    pub fn waiting_time(&self, arrival: f64) -> f64 {
        if arrival < self.ready {
            self.ready - arrival
        } else {
            0.0
        }
    }

    /// Returns `true` if arriving at the given time violates this window.
    pub fn is_violated(&self, arrival: f64) -> bool {
        arrival > self.due
    }
}

/// A customer (or depot) in a routing problem.
///
/// Customer 0 is conventionally the depot. Every non-depot customer carries
/// a mandatory time window: VRPTW has no "soft" or absent windows.
///
/// # Examples
///
/// ```
/// use vrptw_core::models::{Customer, TimeWindow};
///
/// let depot = Customer::depot(35.0, 35.0);
/// assert_eq!(depot.id(), 0);
/// assert_eq!(depot.demand(), 0);
///
/// let tw = TimeWindow::new(0.0, 100.0).unwrap();
/// let c = Customer::new(1, 41.0, 49.0, 10, 10.0, tw);
/// assert_eq!(c.id(), 1);
/// assert_eq!(c.demand(), 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    id: usize,
    x: f64,
    y: f64,
    demand: i32,
    service_time: f64,
    time_window: TimeWindow,
}

impl Customer {
    /// Creates a new customer.
    pub fn new(id: usize, x: f64, y: f64, demand: i32, service_time: f64, tw: TimeWindow) -> Self {
        Self {
            id,
            x,
            y,
            demand,
            service_time,
            time_window: tw,
        }
    }

    /// Creates a depot at the given coordinates (id=0, demand=0, unbounded window).
    pub fn depot(x: f64, y: f64) -> Self {
        Self::new(0, x, y, 0, 0.0, TimeWindow::unbounded())
    }

    /// Customer ID (0 = depot).
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Coordinate pair, for use with `geometry::dist`.
    pub fn point(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Demand at this customer (units to deliver).
    pub fn demand(&self) -> i32 {
        self.demand
    }

    /// Service duration at this customer.
    pub fn service_time(&self) -> f64 {
        self.service_time
    }

    /// Time window constraint.
    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    /// Euclidean distance to another customer.
    pub fn distance_to(&self, other: &Customer) -> f64 {
        crate::geometry::dist(self.point(), other.point())
    }
}
