//! Simulated-annealing driver.
//!
//! A single-solution trajectory over complete feasible assignments:
//! construct a starting solution, then repeatedly perturb the current one,
//! optionally polish the candidate with local search, and accept it under
//! the Metropolis criterion while a geometric schedule cools the
//! temperature down to a configured floor. Termination is purely
//! temperature-driven.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod runner;

pub use config::SaConfig;
pub use runner::{SaResult, SaRunner, SolveError};
