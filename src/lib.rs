//! Evolutionary search for short program solutions.
//!
//! Given natural-language problem statements, this crate repeatedly asks a
//! solution generator for candidate programs, executes them under
//! isolation, scores them on structural complexity and execution success,
//! and evolves the population toward higher fitness. The best-known result
//! per problem lands in a persisted top-k leaderboard.
//!
//! # Architecture
//!
//! - `schema`: configuration types and problem-list loading
//! - `evolve`: the search engine (seeding, fitness, selection, mutation,
//!   control, leaderboard)
//! - `client`: the solution-generator contract and its HTTP implementation
//! - `sandbox`: the executor contract and its process implementation
//!
//! The engine depends only on the `SolutionGenerator` and
//! `SandboxExecutor` traits; swapping in a different model API or
//! isolation mechanism does not touch the search loop.

pub mod client;
pub mod evolve;
pub mod sandbox;
pub mod schema;

// Re-export commonly used types
pub use client::{MutationStrategy, OpenAiGenerator, SolutionGenerator};
pub use evolve::{ProblemReport, SearchController, StopReason};
pub use sandbox::{ExecutionOutcome, ProcessSandbox, SandboxExecutor};
pub use schema::SearchConfig;
