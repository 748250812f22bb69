//! Per-customer candidate lists, used to prune operator search to
//! geometrically relevant positions (§4.3).

use crate::distance::DistanceMatrix;
use crate::models::Customer;

/// Sorted (closest-first) k-nearest-neighbor lists, one per customer id.
///
/// Operators restrict their search for insertion or swap partners to a
/// customer's candidate list rather than scanning every other customer,
/// turning an O(n) position search into an effective O(k).
///
/// # Examples
///
/// ```
/// use vrptw_core::models::Customer;
/// use vrptw_core::candidates::CandidateList;
///
/// let customers = vec![
///     Customer::depot(0.0, 0.0),
///     Customer::depot(1.0, 0.0),
///     Customer::depot(2.0, 0.0),
///     Customer::depot(100.0, 0.0),
/// ];
/// let candidates = CandidateList::build(&customers, 2);
/// assert_eq!(candidates.of(1), &[2, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct CandidateList {
    lists: Vec<Vec<usize>>,
}

impl CandidateList {
    /// Builds candidate lists of size `k` for every customer (depot
    /// included, though operators never consult the depot's own list).
    pub fn build(customers: &[Customer], k: usize) -> Self {
        let dm = DistanceMatrix::from_customers(customers);
        let lists = (0..customers.len()).map(|i| dm.nearest(i, k)).collect();
        Self { lists }
    }

    /// The candidate list for customer `id`, closest first.
    pub fn of(&self, id: usize) -> &[usize] {
        &self.lists[id]
    }

    /// `true` if `target` is among `from`'s candidates.
    pub fn contains(&self, from: usize, target: usize) -> bool {
        self.lists[from].contains(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customers() -> Vec<Customer> {
        vec![
            Customer::depot(0.0, 0.0),
            Customer::depot(1.0, 0.0),
            Customer::depot(2.0, 0.0),
            Customer::depot(100.0, 0.0),
        ]
    }

    #[test]
    fn test_build_sorted_closest_first() {
        let candidates = CandidateList::build(&customers(), 3);
        assert_eq!(candidates.of(0), &[1, 2, 3]);
    }

    #[test]
    fn test_contains() {
        let candidates = CandidateList::build(&customers(), 2);
        assert!(candidates.contains(1, 2));
        assert!(!candidates.contains(1, 3));
    }
}
