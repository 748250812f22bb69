//! Dense distance matrix, used only to precompute candidate lists.

use crate::models::Customer;

/// A dense n×n Euclidean distance matrix stored in row-major order.
///
/// This is a one-shot O(n²) precomputation consumed only by
/// [`crate::candidates::CandidateList::build`]. Routes never hold one of
/// these directly — each `Route` maintains its own small, lazily-populated
/// cache keyed by the customer pairs it actually visits (see
/// `models::Route`).
///
/// # Examples
///
/// ```
/// use vrptw_core::models::Customer;
/// use vrptw_core::distance::DistanceMatrix;
///
/// let customers = vec![
///     Customer::depot(0.0, 0.0),
///     Customer::depot(3.0, 4.0),
/// ];
/// let dm = DistanceMatrix::from_customers(&customers);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes a Euclidean distance matrix from customer coordinates.
    pub fn from_customers(customers: &[Customer]) -> Self {
        let n = customers.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = customers[i].distance_to(&customers[j]);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Returns the distance from location `from` to location `to`.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the `k` nearest locations to `from` among `0..size`,
    /// excluding `from` itself, sorted closest-first.
    pub fn nearest(&self, from: usize, k: usize) -> Vec<usize> {
        let mut candidates: Vec<usize> = (0..self.size).filter(|&i| i != from).collect();
        candidates.sort_by(|&a, &b| {
            self.get(from, a)
                .partial_cmp(&self.get(from, b))
                .expect("distance should not be NaN")
        });
        candidates.truncate(k);
        candidates
    }
}
