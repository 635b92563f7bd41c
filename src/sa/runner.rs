//! Annealing execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use super::config::SaConfig;
use crate::instance::ProblemInstance;
use crate::search::ConstructionError;
use crate::solution::Solution;

/// Errors that prevent an annealing run from producing a solution.
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Aggregate demand exceeds the capacity of all facilities combined,
    /// so no construction draw can ever succeed.
    #[error(
        "instance is structurally infeasible: total demand {demand} exceeds total capacity {capacity}"
    )]
    StructurallyInfeasible { demand: f64, capacity: f64 },

    /// Every bounded construction retry failed on a fresh random draw.
    #[error("construction failed after {attempts} attempts")]
    ConstructionExhausted {
        attempts: usize,
        #[source]
        last: ConstructionError,
    },
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaResult {
    /// The best solution found.
    pub best: Solution,

    /// Cost of the constructed starting solution.
    pub initial_cost: f64,

    /// Total number of inner iterations (candidate evaluations).
    pub iterations: usize,

    /// Temperature when the loop stopped.
    pub final_temperature: f64,

    /// Number of accepted moves, improving ones included.
    pub accepted_moves: usize,

    /// Number of strictly improving accepted moves.
    pub improving_moves: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best cost sampled at regular intervals for history tracking.
    pub cost_history: Vec<f64>,
}

impl SaResult {
    /// Cost of the best solution.
    pub fn best_cost(&self) -> f64 {
        self.best.total_cost()
    }
}

/// Executes the annealing search.
pub struct SaRunner;

impl SaRunner {
    /// Runs the full annealing trajectory on `instance`.
    ///
    /// Once construction succeeds the run always returns the best
    /// solution seen; there is no iteration cap and no stagnation exit.
    pub fn run(instance: &ProblemInstance, config: &SaConfig) -> Result<SaResult, SolveError> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs with an optional cancellation token, checked between inner
    /// iterations. A cancelled run still returns the best solution seen
    /// so far.
    pub fn run_with_cancel(
        instance: &ProblemInstance,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult, SolveError> {
        config.validate().map_err(SolveError::InvalidConfig)?;

        if instance.is_structurally_infeasible() {
            return Err(SolveError::StructurallyInfeasible {
                demand: instance.total_demand(),
                capacity: instance.total_capacity(),
            });
        }

        let mut rng = match config.seed {
            Some(seed) => Xoshiro256StarStar::seed_from_u64(seed),
            None => Xoshiro256StarStar::seed_from_u64(rand::random()),
        };

        let mut current = Self::construct(instance, config, &mut rng)?;
        let initial_cost = current.total_cost();
        let mut best = current.clone();

        let mut temperature = config.initial_temperature;
        let mut total_iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;

        // Cost history: sample every N iterations
        let history_interval = 100.max(config.iterations_per_temperature);
        let mut cost_history = vec![best.total_cost()];

        'cooling: while temperature > config.accept_temperature {
            for _ in 0..config.iterations_per_temperature {
                if let Some(ref flag) = cancel {
                    if flag.load(Ordering::Relaxed) {
                        cancelled = true;
                        break 'cooling;
                    }
                }

                let mut candidate = config.neighborhood.generate(instance, &current, &mut rng);
                if let Some(ref local_search) = config.local_search {
                    local_search.improve(instance, &mut candidate, &mut rng);
                }

                let delta = candidate.total_cost() - current.total_cost();

                // Metropolis acceptance criterion
                let accept = if delta < 0.0 {
                    improving_moves += 1;
                    true
                } else if temperature > 0.0 {
                    let probability = (-delta / temperature).exp();
                    rng.random_range(0.0..1.0) < probability
                } else {
                    false
                };

                if accept {
                    current = candidate;
                    accepted_moves += 1;

                    if current.total_cost() < best.total_cost() {
                        best = current.clone();
                    }
                }

                total_iterations += 1;

                if total_iterations.is_multiple_of(history_interval) {
                    cost_history.push(best.total_cost());
                }
            }

            temperature *= config.cooling_rate;
        }

        if cost_history
            .last()
            .is_none_or(|&last| (last - best.total_cost()).abs() > 1e-15)
        {
            cost_history.push(best.total_cost());
        }

        log::debug!(
            "annealing finished: {} iterations, {} accepted, {} improving, best cost {}",
            total_iterations,
            accepted_moves,
            improving_moves,
            best.total_cost()
        );

        Ok(SaResult {
            best,
            initial_cost,
            iterations: total_iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            cancelled,
            cost_history,
        })
    }

    /// Bounded construction retries; each attempt is a fresh random draw.
    fn construct<R: Rng>(
        instance: &ProblemInstance,
        config: &SaConfig,
        rng: &mut R,
    ) -> Result<Solution, SolveError> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match config.constructor.build(instance, rng) {
                Ok(solution) => return Ok(solution),
                Err(err) if attempts >= config.construction_retries => {
                    return Err(SolveError::ConstructionExhausted {
                        attempts,
                        last: err,
                    });
                }
                Err(err) => {
                    log::debug!("construction attempt {attempts} failed: {err}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Customer, Facility};

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

    fn quick_config(seed: u64) -> SaConfig {
        SaConfig::default()
            .with_initial_temperature(100.0)
            .with_accept_temperature(0.01)
            .with_cooling_rate(0.9)
            .with_iterations_per_temperature(50)
            .with_seed(seed)
    }

    #[test]
    fn test_two_facility_instance_reaches_optimum() {
        // Routing both customers to facility 1 costs 50 + 2 + 1 = 53,
        // cheaper than any assignment that opens facility 0.
        let instance = instance(
            &[(10.0, 100.0), (10.0, 50.0)],
            &[(5.0, &[1.0, 2.0]), (5.0, &[2.0, 1.0])],
        );

        // No local-search polish here: it chases per-customer assignment
        // costs and would keep pulling customer 0 back into facility 0.
        let config = quick_config(7).without_local_search();
        let result = SaRunner::run(&instance, &config).unwrap();

        assert!(result.best.is_feasible(&instance));
        assert!((result.best_cost() - 53.0).abs() < 1e-9);
        assert_eq!(result.best.assignment(), &[1, 1]);
    }

    #[test]
    fn test_single_customer_finds_cheap_facility() {
        // Equal assignment costs, so only the fixed costs differ: the
        // optimum parks the customer at facility 1 for 10 + 5 = 15.
        let instance = instance(
            &[(10.0, 100.0), (10.0, 10.0)],
            &[(5.0, &[5.0, 5.0])],
        );

        let result = SaRunner::run(&instance, &quick_config(11)).unwrap();

        assert!(result.best.is_feasible(&instance));
        assert!((result.best_cost() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_never_exceeds_initial_cost() {
        let instance = instance(
            &[(20.0, 100.0), (20.0, 50.0), (20.0, 75.0)],
            &[
                (5.0, &[1.0, 2.0, 3.0]),
                (5.0, &[2.0, 1.0, 3.0]),
                (5.0, &[3.0, 2.0, 1.0]),
                (5.0, &[1.0, 3.0, 2.0]),
                (4.0, &[2.0, 2.0, 2.0]),
            ],
        );

        for seed in 0..5 {
            let result = SaRunner::run(&instance, &quick_config(seed)).unwrap();
            assert!(result.best_cost() <= result.initial_cost + 1e-9);
            assert!(result.best.is_feasible(&instance));
        }
    }

    #[test]
    fn test_cost_history_non_increasing() {
        let instance = instance(
            &[(20.0, 100.0), (20.0, 50.0)],
            &[(5.0, &[1.0, 2.0]), (5.0, &[2.0, 1.0]), (5.0, &[3.0, 3.0])],
        );

        let result = SaRunner::run(&instance, &quick_config(42)).unwrap();

        for window in result.cost_history.windows(2) {
            assert!(
                window[1] <= window[0] + 1e-10,
                "best cost history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_structurally_infeasible_instance_fails_loudly() {
        let instance = instance(&[(5.0, 0.0)], &[(5.0, &[0.0]), (5.0, &[0.0])]);

        let err = SaRunner::run(&instance, &quick_config(0)).unwrap_err();
        assert!(matches!(err, SolveError::StructurallyInfeasible { .. }));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let instance = instance(&[(10.0, 0.0)], &[(5.0, &[1.0])]);
        let config = quick_config(0).with_cooling_rate(1.5);

        let err = SaRunner::run(&instance, &config).unwrap_err();
        assert!(matches!(err, SolveError::InvalidConfig(_)));
    }

    #[test]
    fn test_cancellation() {
        let instance = instance(
            &[(20.0, 100.0), (20.0, 50.0)],
            &[(5.0, &[1.0, 2.0]), (5.0, &[2.0, 1.0])],
        );
        let config = SaConfig::default()
            .with_initial_temperature(1e10)
            .with_accept_temperature(1e-10)
            .with_seed(42);

        // Set the flag up front so cancellation is deterministic no
        // matter how fast the loop runs.
        let cancel = Arc::new(AtomicBool::new(true));

        let result = SaRunner::run_with_cancel(&instance, &config, Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert!(result.best.is_feasible(&instance));
    }

    #[test]
    fn test_same_seed_same_result() {
        let instance = instance(
            &[(20.0, 100.0), (20.0, 50.0), (20.0, 75.0)],
            &[
                (5.0, &[1.0, 2.0, 3.0]),
                (5.0, &[2.0, 1.0, 3.0]),
                (5.0, &[3.0, 2.0, 1.0]),
            ],
        );
        let config = quick_config(1234);

        let a = SaRunner::run(&instance, &config).unwrap();
        let b = SaRunner::run(&instance, &config).unwrap();

        assert_eq!(a.best.assignment(), b.best.assignment());
        assert_eq!(a.accepted_moves, b.accepted_moves);
        assert!((a.best_cost() - b.best_cost()).abs() < 1e-12);
    }
}
