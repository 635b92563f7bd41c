//! Greedy-randomized initial solution construction.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::instance::ProblemInstance;
use crate::solution::Solution;

/// Construction could not place a customer: every facility's remaining
/// spare capacity was below the customer's demand at that point of the
/// randomized order. Retryable — earlier randomized choices may have
/// exhausted capacity that a fresh draw would leave available.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("no facility has spare capacity for customer {customer} (demand {demand})")]
pub struct ConstructionError {
    pub customer: usize,
    pub demand: f64,
}

/// Builds an initial feasible solution by greedy-randomized assignment.
///
/// Customers are visited in a shuffled order; each is assigned to the
/// first facility, ranked by assignment cost plus a small uniform jitter,
/// that still has spare capacity for its demand. The jitter diversifies
/// restarts — without it every draw would produce the identical greedy
/// assignment.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constructor {
    /// Upper bound of the uniform jitter added to each assignment cost
    /// while ranking facilities. Zero disables the jitter.
    pub jitter: f64,
}

impl Default for Constructor {
    fn default() -> Self {
        Self { jitter: 10.0 }
    }
}

impl Constructor {
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Attempts one randomized construction. First-fit over the jittered
    /// ranking, not a global optimization: a failed draw does not mean
    /// the instance is infeasible.
    pub fn build<R: Rng>(
        &self,
        instance: &ProblemInstance,
        rng: &mut R,
    ) -> Result<Solution, ConstructionError> {
        let n = instance.num_customers();

        let mut spare: Vec<f64> = instance.facilities().iter().map(|f| f.capacity).collect();
        let mut assignment = vec![0usize; n];

        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);

        let mut ranking: Vec<(f64, usize)> = Vec::with_capacity(instance.num_facilities());
        for &customer in &order {
            let demand = instance.customers()[customer].demand;

            ranking.clear();
            for (facility, &cost) in instance.customers()[customer].costs.iter().enumerate() {
                let jitter = if self.jitter > 0.0 {
                    rng.random_range(0.0..self.jitter)
                } else {
                    0.0
                };
                ranking.push((cost + jitter, facility));
            }
            ranking.sort_by(|a, b| a.0.total_cmp(&b.0));

            match ranking
                .iter()
                .find(|&&(_, facility)| demand <= spare[facility])
            {
                Some(&(_, facility)) => {
                    spare[facility] -= demand;
                    assignment[customer] = facility;
                }
                None => return Err(ConstructionError { customer, demand }),
            }
        }

        Ok(Solution::from_assignment(instance, assignment))
    }
}
