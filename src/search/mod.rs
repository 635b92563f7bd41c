//! Search operators: randomized construction, perturbation, local search.
//!
//! All operators take the problem instance and an explicit RNG; none of
//! them touch global state. Facility open flags always follow customer
//! assignments — a facility is open exactly while it serves at least one
//! customer — so the search explores facility closure by draining
//! facilities through reassignment rather than by flipping open bits
//! independently of usage.

mod construct;
mod local_search;
mod neighborhood;

pub use construct::{ConstructionError, Constructor};
pub use local_search::LocalSearch;
pub use neighborhood::NeighborhoodOperator;
