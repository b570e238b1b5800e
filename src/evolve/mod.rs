//! Evolutionary search over candidate program solutions.
//!
//! # Overview
//!
//! The search loop consists of:
//!
//! - **Population seeding** (`population`): initial candidates at diverse
//!   sampling temperatures
//! - **Fitness** (`fitness`): complexity + sandboxed-execution scoring
//! - **Selection** (`selection`): rank and truncate to survivors
//! - **Mutation** (`mutation`): regrow the population via escalating
//!   strategies
//! - **Control** (`controller`): generation budget, convergence, cooldown
//! - **Leaderboard** (`leaderboard`): persisted top-k best results
//!
//! # Example
//!
//! ```rust,no_run
//! use evosolve::client::OpenAiGenerator;
//! use evosolve::evolve::SearchController;
//! use evosolve::sandbox::ProcessSandbox;
//! use evosolve::schema::SearchConfig;
//!
//! let config = SearchConfig::default();
//! let generator =
//!     OpenAiGenerator::new(config.generator.clone(), "api-key".into()).unwrap();
//! let executor = ProcessSandbox::new(config.sandbox.clone());
//!
//! let mut controller = SearchController::new(config, generator, executor);
//! let problems = vec!["Sum the digits of 2^100".to_string()];
//! let reports = controller.run(&problems).unwrap();
//!
//! for report in reports {
//!     println!("{}: best fitness {:.1}", report.problem, report.best_score);
//! }
//! ```

mod candidate;
mod controller;
mod fitness;
mod leaderboard;
mod mutation;
mod population;
mod selection;
mod solutions;

pub use candidate::{Candidate, Population};
pub use controller::{ProblemReport, SearchController, StopReason};
pub use fitness::FitnessEvaluator;
pub use leaderboard::{LeaderboardEntry, LeaderboardStore, SolveStatus, StoreError};
pub use mutation::MutationEngine;
pub use population::PopulationGenerator;
pub use selection::SurvivorSelector;
pub use solutions::SolutionStore;
