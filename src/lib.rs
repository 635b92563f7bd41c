//! Capacitated Facility Location Problem (CFLP) heuristic solver.
//!
//! Chooses a subset of facilities to open and assigns every customer to
//! exactly one open facility, minimizing the sum of facility fixed-opening
//! costs and customer-to-facility assignment costs, while no facility ever
//! serves more demand than its capacity. The search is a single
//! simulated-annealing trajectory over complete feasible solutions:
//!
//! - **Instance** ([`instance`]): immutable facility and customer data,
//!   plus the parser for the whitespace-delimited benchmark text format
//!   and the fixed capacity table of the `capa`/`capb`/`capc` families.
//! - **Solution** ([`solution`]): the candidate-answer representation —
//!   customer assignments, facility open flags, spare capacities, and the
//!   cached total cost.
//! - **Search operators** ([`search`]): greedy-randomized construction,
//!   the batch-reassignment perturbation operator, and the sampled
//!   local-search pass.
//! - **Annealing driver** ([`sa`]): geometric cooling with Metropolis
//!   acceptance, tracking the best solution seen.
//!
//! # Determinism
//!
//! There is no global random state. Every randomized operation takes an
//! explicit [`rand::Rng`], and the driver owns a seedable generator, so a
//! run is reproducible given its seed and independent runs never share
//! mutable state.

pub mod instance;
pub mod sa;
pub mod search;
pub mod solution;
