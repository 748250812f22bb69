//! Solomon-compatible instance file parser (§4.12, §6).
//!
//! A plain-text format: a `VEHICLE` section header followed by a line of
//! two integers (fleet size, capacity), then a `CUST` section header
//! followed by whitespace-separated data rows of 7 integers each (id, x,
//! y, demand, ready_time, due_date, service_time). The first data row is
//! the depot. Blank lines are tolerated anywhere.

use crate::error::InstanceError;
use crate::models::{Customer, TimeWindow};

/// A parsed instance: the depot, its customers, and the fleet capacity.
/// Fleet size is informational only — the solver opens routes on demand.
#[derive(Debug, Clone)]
pub struct ParsedInstance {
    /// The depot, always at `customers[0]` as well for convenience.
    pub depot: Customer,
    /// All customers, depot included at index 0.
    pub customers: Vec<Customer>,
    /// Declared fleet size (informational; the solver is not limited by it).
    pub fleet_size: usize,
    /// Per-vehicle capacity.
    pub capacity: i32,
}

fn parse_i32(text: &str, line: usize) -> Result<i32, InstanceError> {
    text.parse::<i32>().map_err(|_| InstanceError::MalformedNumber {
        line,
        text: text.to_string(),
    })
}

fn parse_f64(text: &str, line: usize) -> Result<f64, InstanceError> {
    text.parse::<f64>().map_err(|_| InstanceError::MalformedNumber {
        line,
        text: text.to_string(),
    })
}

/// Parses Solomon-format instance text into a [`ParsedInstance`].
///
/// # Examples
///
/// ```
/// use vrptw_core::instance::parse;
///
/// let text = "
/// VEHICLE
/// NUMBER CAPACITY
/// 25 200
///
/// CUST NO. XCOORD. YCOORD. DEMAND READY_TIME DUE_DATE SERVICE_TIME
///
/// 0 40 50 0 0 1000 0
/// 1 45 68 10 0 200 10
/// ";
/// let parsed = parse(text).unwrap();
/// assert_eq!(parsed.customers.len(), 2);
/// assert_eq!(parsed.capacity, 200);
/// ```
pub fn parse(text: &str) -> Result<ParsedInstance, InstanceError> {
    let lines: Vec<&str> = text.lines().collect();

    let vehicle_idx = lines
        .iter()
        .position(|l| l.trim() == "VEHICLE")
        .ok_or(InstanceError::MissingVehicleSection)?;
    let (fleet_size, capacity) = lines[vehicle_idx + 1..]
        .iter()
        .enumerate()
        .find_map(|(offset, line)| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() == 2 {
                Some((offset + vehicle_idx + 1, fields))
            } else {
                None
            }
        })
        .and_then(|(line_no, fields)| {
            let fleet = fields[0].parse::<usize>().ok()?;
            let cap = fields[1].parse::<i32>().ok()?;
            Some((fleet, cap, line_no))
        })
        .map(|(fleet, cap, _)| (fleet, cap))
        .ok_or(InstanceError::MissingVehicleSection)?;

    if capacity <= 0 {
        return Err(InstanceError::InvalidCapacity(capacity));
    }

    let cust_idx = lines
        .iter()
        .position(|l| l.trim_start().starts_with("CUST"))
        .ok_or(InstanceError::MissingCustomerSection)?;

    let mut customers = Vec::new();
    let mut seen_ids = std::collections::HashSet::new();

    for (offset, line) in lines[cust_idx + 1..].iter().enumerate() {
        let line_no = cust_idx + 1 + offset + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != 7 {
            return Err(InstanceError::MalformedRow {
                line: line_no,
                found: fields.len(),
            });
        }

        let id = parse_i32(fields[0], line_no)? as usize;
        let x = parse_f64(fields[1], line_no)?;
        let y = parse_f64(fields[2], line_no)?;
        let demand = parse_i32(fields[3], line_no)?;
        let ready = parse_f64(fields[4], line_no)?;
        let due = parse_f64(fields[5], line_no)?;
        let service_time = parse_f64(fields[6], line_no)?;

        if !seen_ids.insert(id) {
            return Err(InstanceError::DuplicateId { id });
        }
        if demand < 0 {
            return Err(InstanceError::NegativeDemand { id, demand });
        }
        let tw = TimeWindow::new(ready, due).ok_or(InstanceError::InvalidTimeWindow { id, ready, due })?;
        customers.push(Customer::new(id, x, y, demand, service_time, tw));
    }

    if customers.is_empty() {
        return Err(InstanceError::MissingCustomerSection);
    }

    let depot = customers[0].clone();
    Ok(ParsedInstance {
        depot,
        customers,
        fleet_size,
        capacity,
    })
}
