//! Survivor selection by truncation.

use rayon::prelude::*;

use crate::sandbox::SandboxExecutor;

use super::candidate::Population;
use super::fitness::FitnessEvaluator;

/// Ranks a population and truncates it to the survivors.
pub struct SurvivorSelector {
    survival_rate: f64,
}

impl SurvivorSelector {
    /// Create a selector with the given survival rate in (0, 1].
    pub fn new(survival_rate: f64) -> Self {
        Self { survival_rate }
    }

    /// Score unevaluated candidates, sort descending, keep the top share.
    ///
    /// A non-empty input always yields at least one survivor, and the
    /// fittest candidate is always retained. Scoring runs in parallel;
    /// tie-breaking stays deterministic because the stable sort happens
    /// after all scores land.
    pub fn select<X: SandboxExecutor>(
        &self,
        evaluator: &FitnessEvaluator<X>,
        problem: &str,
        mut population: Population,
    ) -> Population {
        population.par_iter_mut().for_each(|candidate| {
            if candidate.fitness.is_none() {
                candidate.fitness = Some(evaluator.score(problem, candidate));
            }
        });

        population.sort_by(|a, b| b.score().total_cmp(&a.score()));

        let keep = ((population.len() as f64 * self.survival_rate).floor() as usize).max(1);
        population.truncate(keep);
        population
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolve::candidate::Candidate;
    use crate::sandbox::ExecutionOutcome;
    use crate::schema::FitnessConfig;
    use std::io;
    use std::path::{Path, PathBuf};

    struct SilentExecutor;

    impl SandboxExecutor for SilentExecutor {
        fn run(&self, _artifact: &Path) -> io::Result<ExecutionOutcome> {
            Ok(ExecutionOutcome {
                stdout: String::new(),
                succeeded: true,
            })
        }
    }

    fn evaluator() -> FitnessEvaluator<SilentExecutor> {
        FitnessEvaluator::new(FitnessConfig::default(), SilentExecutor)
    }

    fn scored(fitness: f64) -> Candidate {
        let mut candidate =
            Candidate::new("print(1)".to_string(), PathBuf::from("unused.py"), 1);
        candidate.fitness = Some(fitness);
        candidate
    }

    #[test]
    fn test_half_of_four_survive() {
        let population = vec![scored(10.0), scored(80.0), scored(40.0), scored(60.0)];
        let survivors = SurvivorSelector::new(0.5).select(&evaluator(), "p", population);

        assert_eq!(survivors.len(), 2);
        assert_eq!(survivors[0].score(), 80.0);
        assert_eq!(survivors[1].score(), 60.0);
    }

    #[test]
    fn test_singleton_survives_any_rate() {
        for rate in [0.1, 0.5, 1.0] {
            let survivors =
                SurvivorSelector::new(rate).select(&evaluator(), "p", vec![scored(5.0)]);
            assert_eq!(survivors.len(), 1);
        }
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut first = scored(50.0);
        first.source = "first".to_string();
        let mut second = scored(50.0);
        second.source = "second".to_string();

        let survivors =
            SurvivorSelector::new(1.0).select(&evaluator(), "p", vec![first, second]);
        assert_eq!(survivors[0].source, "first");
        assert_eq!(survivors[1].source, "second");
    }

    #[test]
    fn test_unknown_fitness_gets_computed() {
        let unscored = Candidate::new("x = 1".to_string(), PathBuf::from("unused.py"), 1);
        let survivors = SurvivorSelector::new(1.0).select(&evaluator(), "p", vec![unscored]);
        assert!(survivors[0].fitness.is_some());
    }

    #[test]
    fn test_empty_population_stays_empty() {
        let survivors = SurvivorSelector::new(0.5).select(&evaluator(), "p", Vec::new());
        assert!(survivors.is_empty());
    }

    proptest::proptest! {
        /// The fittest candidate always survives and the survivor count is
        /// exactly max(1, floor(n * rate)).
        #[test]
        fn prop_fittest_always_survives(
            fitnesses in proptest::collection::vec(0.0f64..100.0, 1..12),
            rate in 0.05f64..1.0,
        ) {
            let population: Vec<Candidate> = fitnesses.iter().map(|&f| scored(f)).collect();
            let max = fitnesses.iter().cloned().fold(f64::MIN, f64::max);
            let expected = ((fitnesses.len() as f64 * rate).floor() as usize).max(1);

            let survivors =
                SurvivorSelector::new(rate).select(&evaluator(), "p", population);

            proptest::prop_assert_eq!(survivors.len(), expected);
            proptest::prop_assert_eq!(survivors[0].score(), max);
        }
    }
}
