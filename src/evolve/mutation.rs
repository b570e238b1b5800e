//! Mutation-driven regeneration of a survivor population.

use log::{debug, warn};

use crate::client::{MutationStrategy, SolutionGenerator};
use crate::sandbox::SandboxExecutor;
use crate::schema::{AcceptancePolicy, MutationConfig};

use super::candidate::{Candidate, Population};
use super::fitness::FitnessEvaluator;
use super::solutions::SolutionStore;

/// Produces new candidates from survivors via escalating strategies.
pub struct MutationEngine {
    config: MutationConfig,
}

impl MutationEngine {
    /// Create an engine.
    pub fn new(config: MutationConfig) -> Self {
        Self { config }
    }

    /// Grow the survivor population toward `target_size`.
    ///
    /// The output is seeded with the survivors, so a non-empty input can
    /// never evolve into an empty population. Each attempt escalates the
    /// mutation strategy and raises the sampling temperature; a failed
    /// generation spends the attempt and adds nothing.
    ///
    /// Parent policy: the current fittest survivor, every attempt.
    pub fn evolve<G: SolutionGenerator, X: SandboxExecutor>(
        &self,
        generator: &G,
        evaluator: &FitnessEvaluator<X>,
        store: &SolutionStore,
        problem: &str,
        survivors: Population,
        target_size: usize,
    ) -> Population {
        if survivors.is_empty() {
            return survivors;
        }

        let parent = fittest(&survivors).clone();
        let mut next = survivors;

        for attempt in 1..=self.config.max_attempts {
            if next.len() >= target_size {
                break;
            }

            let strategy = MutationStrategy::for_attempt(attempt);
            let temperature = (self.config.base_temperature
                + self.config.temperature_step * attempt as f64)
                .min(1.0);

            let prompt_problem = if strategy == MutationStrategy::Rephrase {
                generator
                    .mutate(problem, strategy)
                    .unwrap_or_else(|| problem.to_string())
            } else {
                problem.to_string()
            };

            let Some(source) = generator.generate(&prompt_problem, strategy, temperature) else {
                debug!("mutation attempt {attempt} yielded no candidate");
                continue;
            };

            let artifact = match store.save(&source) {
                Ok(path) => path,
                Err(err) => {
                    warn!("failed to persist mutated candidate: {err}");
                    continue;
                }
            };

            let mut child = Candidate::new(source, artifact, parent.generation + 1);
            // Score against the original problem text; a rephrased prompt
            // does not change what the leaderboard is keyed by.
            child.fitness = Some(evaluator.score(problem, &child));

            if self.accepts(&child, &parent) {
                debug!(
                    "accepted mutation attempt {attempt} ({:.1} vs parent {:.1})",
                    child.score(),
                    parent.score()
                );
                next.push(child);
            }
        }

        next
    }

    fn accepts(&self, child: &Candidate, parent: &Candidate) -> bool {
        match self.config.acceptance {
            AcceptancePolicy::ImproveOnParent => child.score() > parent.score(),
            AcceptancePolicy::AnyPositive => child.score() > 0.0,
        }
    }
}

/// First candidate holding the maximum fitness.
fn fittest(population: &Population) -> &Candidate {
    population
        .iter()
        .reduce(|best, c| if c.score() > best.score() { c } else { best })
        .expect("population checked non-empty")
}
