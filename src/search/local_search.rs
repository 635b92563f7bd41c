//! Sampled per-customer reassignment improvement.

use rand::seq::index;
use rand::Rng;

use crate::instance::ProblemInstance;
use crate::solution::Solution;

/// Re-evaluates a random sample of customer assignments within existing
/// spare capacity.
///
/// For each sampled customer the scan over the other facilities keeps a
/// running best candidate, replacing it when strictly cheaper — or, with
/// `jump_probability`, regardless of cost. The occasional non-improving
/// switch is the operator's diversification mechanism, so a pass is not
/// guaranteed to lower the total cost. Only facilities with spare
/// capacity for the customer's demand are ever considered, so a feasible
/// input stays feasible.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalSearch {
    /// Maximum number of customers re-evaluated per pass.
    pub sample_cap: usize,
    /// Probability of adopting a candidate facility that is not strictly
    /// cheaper than the running best.
    pub jump_probability: f64,
}

impl Default for LocalSearch {
    fn default() -> Self {
        Self {
            sample_cap: 100,
            jump_probability: 0.2,
        }
    }
}

impl LocalSearch {
    pub fn with_sample_cap(mut self, sample_cap: usize) -> Self {
        self.sample_cap = sample_cap;
        self
    }

    pub fn with_jump_probability(mut self, jump_probability: f64) -> Self {
        self.jump_probability = jump_probability;
        self
    }

    /// Improves `solution` in place over a sample of `sample_cap`
    /// distinct customers (all of them when the instance is smaller),
    /// then recomputes the cached cost once.
    pub fn improve<R: Rng>(
        &self,
        instance: &ProblemInstance,
        solution: &mut Solution,
        rng: &mut R,
    ) {
        let m = instance.num_facilities();
        let n = instance.num_customers();
        let amount = self.sample_cap.min(n);

        for customer in index::sample(rng, n, amount) {
            let demand = instance.customers()[customer].demand;
            let current = solution.assignment()[customer];
            let mut best = current;
            let mut best_cost = instance.customers()[customer].costs[current];

            for facility in 0..m {
                if facility == current || demand > solution.spare_capacity()[facility] {
                    continue;
                }
                let cost = instance.customers()[customer].costs[facility];
                if cost < best_cost || rng.random_range(0.0..1.0) < self.jump_probability {
                    best = facility;
                    best_cost = cost;
                }
            }

            if best != current {
                solution.move_customer(instance, customer, best);
            }
        }

        solution.recompute_cost(instance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Customer, Facility};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn instance(facilities: &[(f64, f64)], customers: &[(f64, &[f64])]) -> ProblemInstance {
        ProblemInstance::new(
            facilities
                .iter()
                .map(|&(capacity, fixed_cost)| Facility {
                    capacity,
                    fixed_cost,
                })
                .collect(),
            customers
                .iter()
                .map(|&(demand, costs)| Customer {
                    demand,
                    costs: costs.to_vec(),
                })
                .collect(),
        )
        .unwrap()
    }

    fn assignment_cost_sum(instance: &ProblemInstance, solution: &Solution) -> f64 {
        solution
            .assignment()
            .iter()
            .enumerate()
            .map(|(customer, &facility)| instance.customers()[customer].costs[facility])
            .sum()
    }

    #[test]
    fn test_moves_customer_to_cheaper_facility() {
        let instance = instance(
            &[(10.0, 0.0), (10.0, 0.0)],
            &[(5.0, &[1.0, 50.0])],
        );
        let mut solution = Solution::from_assignment(&instance, vec![1]);
        let local_search = LocalSearch::default().with_jump_probability(0.0);
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);

        local_search.improve(&instance, &mut solution, &mut rng);

        assert_eq!(solution.assignment(), &[0]);
        assert!((solution.total_cost() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_without_jumps_assignment_costs_never_increase() {
        let instance = instance(
            &[(15.0, 0.0), (15.0, 0.0), (15.0, 0.0)],
            &[
                (5.0, &[1.0, 8.0, 9.0]),
                (5.0, &[8.0, 1.0, 9.0]),
                (5.0, &[9.0, 8.0, 1.0]),
                (4.0, &[2.0, 3.0, 4.0]),
            ],
        );
        let local_search = LocalSearch::default().with_jump_probability(0.0);

        for seed in 0..10 {
            let mut solution = Solution::from_assignment(&instance, vec![2, 2, 0, 1]);
            let before = assignment_cost_sum(&instance, &solution);
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);

            local_search.improve(&instance, &mut solution, &mut rng);

            let after = assignment_cost_sum(&instance, &solution);
            assert!(after <= before + 1e-9);
            assert!(solution.is_feasible(&instance));
        }
    }

    #[test]
    fn test_spare_capacity_never_goes_negative() {
        // Tight capacities and a jump probability of 1 so every eligible
        // candidate is taken, including worsening ones.
        let instance = instance(
            &[(10.0, 10.0), (10.0, 10.0), (10.0, 10.0)],
            &[
                (5.0, &[1.0, 2.0, 3.0]),
                (5.0, &[3.0, 1.0, 2.0]),
                (5.0, &[2.0, 3.0, 1.0]),
                (5.0, &[1.0, 1.0, 1.0]),
                (5.0, &[2.0, 2.0, 2.0]),
            ],
        );
        let local_search = LocalSearch::default().with_jump_probability(1.0);

        for seed in 0..20 {
            let mut solution = Solution::from_assignment(&instance, vec![0, 0, 1, 1, 2]);
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);

            for _ in 0..10 {
                local_search.improve(&instance, &mut solution, &mut rng);
                assert!(solution.spare_capacity().iter().all(|&spare| spare >= -1e-9));
                assert!(solution.is_feasible(&instance));
            }
        }
    }

    #[test]
    fn test_respects_capacity_even_when_cheaper() {
        // Facility 0 is much cheaper but its spare (3) cannot take the
        // customer's demand of 7.
        let instance = instance(
            &[(10.0, 0.0), (10.0, 0.0)],
            &[(7.0, &[1.0, 50.0]), (7.0, &[1.0, 50.0])],
        );
        let mut solution = Solution::from_assignment(&instance, vec![0, 1]);
        let local_search = LocalSearch::default().with_jump_probability(0.0);
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);

        local_search.improve(&instance, &mut solution, &mut rng);

        assert_eq!(solution.assignment(), &[0, 1]);
    }

    #[test]
    fn test_cost_recomputed_after_pass() {
        let instance = instance(
            &[(20.0, 5.0), (20.0, 5.0)],
            &[(5.0, &[1.0, 2.0]), (5.0, &[2.0, 1.0])],
        );
        let mut solution = Solution::from_assignment(&instance, vec![1, 0]);
        let local_search = LocalSearch::default();
        let mut rng = Xoshiro256StarStar::seed_from_u64(42);

        local_search.improve(&instance, &mut solution, &mut rng);

        let mut check = solution.clone();
        let recomputed = check.recompute_cost(&instance);
        assert!((solution.total_cost() - recomputed).abs() < 1e-9);
    }
}
