//! Error types for instance loading and solving.

use thiserror::Error;

/// Failure while parsing or validating a problem instance.
#[derive(Debug, Error)]
pub enum InstanceError {
    /// The file could not be read from disk.
    #[error("failed to read instance file {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The text did not contain a recognizable `VEHICLE` section.
    #[error("instance is missing a VEHICLE section")]
    MissingVehicleSection,

    /// The text did not contain a recognizable `CUST` section.
    #[error("instance is missing a CUST section")]
    MissingCustomerSection,

    /// A data row did not have the expected 7 whitespace-separated fields.
    #[error("malformed customer row at line {line}: expected 7 fields, found {found}")]
    MalformedRow {
        /// 1-based line number within the instance text.
        line: usize,
        /// Number of fields actually found.
        found: usize,
    },

    /// A numeric field could not be parsed.
    #[error("malformed numeric field at line {line}: {text:?}")]
    MalformedNumber {
        /// 1-based line number within the instance text.
        line: usize,
        /// Offending token.
        text: String,
    },

    /// A customer's time window has `ready > due`.
    #[error("customer {id} has an invalid time window: ready={ready} > due={due}")]
    InvalidTimeWindow {
        /// Offending customer id.
        id: usize,
        /// Window ready time.
        ready: f64,
        /// Window due time.
        due: f64,
    },

    /// Two customers (or a customer and the depot) share an id.
    #[error("duplicate customer id {id}")]
    DuplicateId {
        /// The repeated id.
        id: usize,
    },

    /// The vehicle capacity field was not a positive integer.
    #[error("vehicle capacity must be positive, found {0}")]
    InvalidCapacity(i32),

    /// A customer row declared a negative demand.
    #[error("customer {id} has negative demand {demand}")]
    NegativeDemand {
        /// Offending customer id.
        id: usize,
        /// The declared demand.
        demand: i32,
    },
}

/// Failure while solving a validated instance.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The coverage invariant (every customer routed exactly once) was
    /// violated and could not be repaired within the restoration budget.
    #[error("coverage violation: {missing} customer(s) could not be placed after {attempts} restoration attempts")]
    CoverageViolation {
        /// Number of customers still missing from the solution.
        missing: usize,
        /// Restoration attempts made before giving up.
        attempts: usize,
    },

    /// A single customer cannot be served by any vehicle, even alone
    /// (e.g. its demand exceeds capacity). The instance itself is infeasible.
    #[error("customer {id} cannot be placed in any route, even alone (demand {demand} vs capacity {capacity})")]
    UnplaceableCustomer {
        /// Offending customer id.
        id: usize,
        /// Its demand.
        demand: i32,
        /// The fleet's vehicle capacity.
        capacity: i32,
    },
}
