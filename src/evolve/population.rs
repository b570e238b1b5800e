//! Initial population seeding.

use log::{debug, warn};
use rand::Rng;
use rand::rngs::StdRng;

use crate::client::{MutationStrategy, SolutionGenerator};
use crate::schema::PopulationConfig;

use super::candidate::{Candidate, Population};
use super::solutions::SolutionStore;

/// Builds the generation-1 population for a problem.
pub struct PopulationGenerator {
    size: usize,
    temperature_band: (f64, f64),
}

impl PopulationGenerator {
    /// Create a generator from config.
    pub fn new(config: &PopulationConfig) -> Self {
        Self {
            size: config.size,
            temperature_band: config.temperature_band,
        }
    }

    /// Request up to `size` candidates, each at an independently drawn
    /// temperature from the diversity band.
    ///
    /// Generator failures shrink the result; there is no internal retry
    /// (retry policy belongs to the collaborator). An empty population is
    /// a valid outcome the controller handles by skipping the problem.
    pub fn generate<G: SolutionGenerator>(
        &self,
        generator: &G,
        store: &SolutionStore,
        rng: &mut StdRng,
        problem: &str,
    ) -> Population {
        let (lo, hi) = self.temperature_band;
        let mut population = Vec::with_capacity(self.size);

        for slot in 0..self.size {
            let temperature = if lo < hi { rng.gen_range(lo..=hi) } else { lo };

            let Some(source) = generator.generate(problem, MutationStrategy::Solve, temperature)
            else {
                debug!("initial slot {slot} yielded no candidate");
                continue;
            };

            match store.save(&source) {
                Ok(artifact) => population.push(Candidate::new(source, artifact, 1)),
                Err(err) => warn!("failed to persist initial candidate: {err}"),
            }
        }

        population
    }
}
