//! Perturbation operator producing nearby candidate solutions.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::instance::ProblemInstance;
use crate::solution::Solution;

/// Produces a neighbor by reassigning a small random batch of customers.
///
/// Each perturbation picks a random customer and moves it to a uniformly
/// chosen other facility that still has spare capacity for its demand; a
/// draw with no eligible target facility is skipped silently rather than
/// retried. The returned solution owns independent copies of all
/// bookkeeping arrays, and its cost is recomputed from scratch, so it is
/// consistent even when every draw was skipped.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborhoodOperator {
    /// Minimum number of reassignment attempts per neighbor.
    pub min_moves: usize,
    /// Maximum number of reassignment attempts per neighbor.
    pub max_moves: usize,
}

impl Default for NeighborhoodOperator {
    fn default() -> Self {
        Self {
            min_moves: 10,
            max_moves: 20,
        }
    }
}

impl NeighborhoodOperator {
    pub fn with_moves(mut self, min_moves: usize, max_moves: usize) -> Self {
        self.min_moves = min_moves;
        self.max_moves = max_moves;
        self
    }

    /// Returns a perturbed deep copy of `current`.
    pub fn generate<R: Rng>(
        &self,
        instance: &ProblemInstance,
        current: &Solution,
        rng: &mut R,
    ) -> Solution {
        debug_assert!(self.min_moves <= self.max_moves);

        let m = instance.num_facilities();
        let n = instance.num_customers();
        let mut neighbor = current.clone();

        if n > 0 {
            let moves = rng.random_range(self.min_moves..=self.max_moves);
            let mut candidates: Vec<usize> = Vec::with_capacity(m);

            for _ in 0..moves {
                let customer = rng.random_range(0..n);
                let demand = instance.customers()[customer].demand;
                let from = neighbor.assignment()[customer];

                candidates.clear();
                candidates.extend((0..m).filter(|&facility| {
                    facility != from && demand <= neighbor.spare_capacity()[facility]
                }));

                if let Some(&facility) = candidates.choose(rng) {
                    neighbor.move_customer(instance, customer, facility);
                }
            }
        }

        neighbor.recompute_cost(instance);
        neighbor
    }
}
