//! Annealing configuration.

use crate::search::{Constructor, LocalSearch, NeighborhoodOperator};

/// Configuration for an annealing run.
///
/// # Examples
///
/// ```
/// use cflp_anneal::sa::SaConfig;
/// use cflp_anneal::search::LocalSearch;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(500.0)
///     .with_cooling_rate(0.99)
///     .with_iterations_per_temperature(20)
///     .with_local_search(LocalSearch::default().with_sample_cap(50))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature. Higher values accept more worsening moves
    /// early on.
    pub initial_temperature: f64,

    /// Temperature floor; the search stops once the temperature drops to
    /// or below this value.
    pub accept_temperature: f64,

    /// Geometric cooling factor in (0, 1), applied after each full pass
    /// at a temperature level.
    pub cooling_rate: f64,

    /// Number of candidate evaluations at each temperature level.
    pub iterations_per_temperature: usize,

    /// Maximum number of fresh construction draws before giving up on
    /// the instance.
    pub construction_retries: usize,

    /// Random seed for reproducibility. `None` draws a seed at random.
    pub seed: Option<u64>,

    /// Initial solution construction parameters.
    pub constructor: Constructor,

    /// Perturbation operator parameters.
    pub neighborhood: NeighborhoodOperator,

    /// Local-search polish applied to every candidate; `None` disables
    /// the pass.
    pub local_search: Option<LocalSearch>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            accept_temperature: 1e-5,
            cooling_rate: 0.9995,
            iterations_per_temperature: 10,
            construction_retries: 20,
            seed: None,
            constructor: Constructor::default(),
            neighborhood: NeighborhoodOperator::default(),
            local_search: Some(LocalSearch::default()),
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_accept_temperature(mut self, t: f64) -> Self {
        self.accept_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_construction_retries(mut self, n: usize) -> Self {
        self.construction_retries = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = constructor;
        self
    }

    pub fn with_neighborhood(mut self, neighborhood: NeighborhoodOperator) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    pub fn with_local_search(mut self, local_search: LocalSearch) -> Self {
        self.local_search = Some(local_search);
        self
    }

    pub fn without_local_search(mut self) -> Self {
        self.local_search = None;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive".into());
        }
        if self.accept_temperature <= 0.0 {
            return Err("accept_temperature must be positive".into());
        }
        if self.accept_temperature >= self.initial_temperature {
            return Err("accept_temperature must be less than initial_temperature".into());
        }
        if self.cooling_rate <= 0.0 || self.cooling_rate >= 1.0 {
            return Err(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        if self.iterations_per_temperature == 0 {
            return Err("iterations_per_temperature must be at least 1".into());
        }
        if self.construction_retries == 0 {
            return Err("construction_retries must be at least 1".into());
        }
        if !self.constructor.jitter.is_finite() || self.constructor.jitter < 0.0 {
            return Err(format!(
                "constructor jitter must be finite and non-negative, got {}",
                self.constructor.jitter
            ));
        }
        if self.neighborhood.min_moves > self.neighborhood.max_moves {
            return Err(format!(
                "neighborhood min_moves {} exceeds max_moves {}",
                self.neighborhood.min_moves, self.neighborhood.max_moves
            ));
        }
        if self.neighborhood.max_moves == 0 {
            return Err("neighborhood max_moves must be at least 1".into());
        }
        if let Some(ref local_search) = self.local_search {
            if local_search.sample_cap == 0 {
                return Err("local search sample_cap must be at least 1".into());
            }
            if !(0.0..=1.0).contains(&local_search.jump_probability) {
                return Err(format!(
                    "local search jump_probability must be in [0, 1], got {}",
                    local_search.jump_probability
                ));
            }
        }
        Ok(())
    }
}
