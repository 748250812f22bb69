//! The improvement driver (§4.9): fleet reduction followed by
//! simulated-annealing refinement.

mod mds;

pub use mds::mds;
