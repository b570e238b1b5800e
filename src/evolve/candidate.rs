//! Candidate and population types.

use std::path::PathBuf;

/// A candidate solution in the population.
///
/// Only `fitness` is ever mutated after creation; `generation` is fixed at
/// birth and increases by exactly 1 from parent to child.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Generated program text.
    pub source: String,
    /// Persisted copy of `source`; handle owned by the solution store.
    pub artifact: PathBuf,
    /// Fitness in [0, 100]; `None` until computed for the current round.
    pub fitness: Option<f64>,
    /// Lineage depth, starting at 1 for the initial population.
    pub generation: u32,
}

/// The candidates alive in one generation round for one problem.
///
/// Order carries no meaning until the selector sorts it.
pub type Population = Vec<Candidate>;

impl Candidate {
    /// Create an unscored candidate.
    pub fn new(source: String, artifact: PathBuf, generation: u32) -> Self {
        Self {
            source,
            artifact,
            fitness: None,
            generation,
        }
    }

    /// Computed fitness, 0 when not yet scored.
    pub fn score(&self) -> f64 {
        self.fitness.unwrap_or(0.0)
    }

    /// Whether this candidate descends from a mutation.
    pub fn mutation_used(&self) -> bool {
        self.generation > 1
    }
}
