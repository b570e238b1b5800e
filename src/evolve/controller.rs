//! Generation control: drives the select -> mutate loop per problem and
//! publishes best-effort results to the leaderboard.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::client::SolutionGenerator;
use crate::sandbox::SandboxExecutor;
use crate::schema::SearchConfig;

use super::candidate::Candidate;
use super::fitness::FitnessEvaluator;
use super::leaderboard::{LeaderboardStore, StoreError};
use super::mutation::MutationEngine;
use super::population::PopulationGenerator;
use super::selection::SurvivorSelector;
use super::solutions::SolutionStore;

/// Why a problem's search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// Best fitness reached the success threshold.
    Converged,
    /// Generation budget exhausted; best-effort result published.
    BudgetExhausted,
    /// Cancelled externally; the current best was still published.
    Cancelled,
}

/// Outcome of one problem's search.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemReport {
    /// The problem searched.
    pub problem: String,
    /// Best fitness achieved.
    pub best_score: f64,
    /// Selection rounds run.
    pub generations: usize,
    /// Why the search stopped.
    pub stop: StopReason,
    /// Artifact path of the best candidate.
    pub solution_file: std::path::PathBuf,
    /// Whether the best candidate descends from a mutation.
    pub mutation_used: bool,
}

/// Drives the evolutionary search across problems.
///
/// Single-threaded from the outside: problems run to completion one after
/// another, and every collaborator call blocks. Candidate scoring within a
/// round may fan out internally (see [`SurvivorSelector`]).
pub struct SearchController<G, X> {
    config: SearchConfig,
    generator: G,
    evaluator: FitnessEvaluator<X>,
    selector: SurvivorSelector,
    mutation: MutationEngine,
    seeding: PopulationGenerator,
    store: SolutionStore,
    leaderboard: LeaderboardStore,
    rng: StdRng,
    cancelled: Arc<AtomicBool>,
}

impl<G: SolutionGenerator, X: SandboxExecutor> SearchController<G, X> {
    /// Create a controller wiring every component from one config.
    pub fn new(config: SearchConfig, generator: G, executor: X) -> Self {
        let seed = config.random_seed.unwrap_or_else(rand::random);
        Self {
            evaluator: FitnessEvaluator::new(config.fitness.clone(), executor),
            selector: SurvivorSelector::new(config.population.survival_rate),
            mutation: MutationEngine::new(config.mutation.clone()),
            seeding: PopulationGenerator::new(&config.population),
            store: SolutionStore::new(&config.output_dir),
            leaderboard: LeaderboardStore::new(&config.leaderboard),
            rng: StdRng::seed_from_u64(seed),
            cancelled: Arc::new(AtomicBool::new(false)),
            generator,
            config,
        }
    }

    /// Handle for aborting the run between generation rounds.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Process problems in order, with a cooldown between them.
    ///
    /// A problem that produces nothing is skipped; only leaderboard
    /// persistence failures abort the run.
    pub fn run(&mut self, problems: &[String]) -> Result<Vec<ProblemReport>, StoreError> {
        let limit = self.config.generations.max_problems.unwrap_or(usize::MAX);
        let cooldown = Duration::from_secs(self.config.generations.cooldown_secs);
        let mut reports = Vec::new();

        for (index, problem) in problems.iter().take(limit).enumerate() {
            if self.cancelled.load(Ordering::Relaxed) {
                info!("run cancelled before problem {index}");
                break;
            }
            if index > 0 && !cooldown.is_zero() {
                thread::sleep(cooldown);
            }

            if let Some(report) = self.run_problem(problem)? {
                reports.push(report);
            }
        }

        Ok(reports)
    }

    /// Search one problem to termination.
    ///
    /// Returns `None` when the problem produced no candidates at all; in
    /// that case nothing is published.
    pub fn run_problem(&mut self, problem: &str) -> Result<Option<ProblemReport>, StoreError> {
        info!("searching: {problem}");

        let mut population =
            self.seeding
                .generate(&self.generator, &self.store, &mut self.rng, problem);
        if population.is_empty() {
            warn!("no candidates generated, skipping problem");
            return Ok(None);
        }

        let mut best: Option<Candidate> = None;
        let mut rounds = 0;

        let stop = loop {
            rounds += 1;
            let mut survivors = self.selector.select(&self.evaluator, problem, population);

            if survivors.is_empty() {
                match &best {
                    // Nothing survived and nothing was ever good: give up
                    // on this problem without touching the leaderboard.
                    None => return Ok(None),
                    Some(incumbent) => survivors = vec![incumbent.clone()],
                }
            }

            // Survivors come back sorted descending; the head is the
            // round's fittest.
            let round_best = &survivors[0];
            if best
                .as_ref()
                .is_none_or(|incumbent| round_best.score() > incumbent.score())
            {
                best = Some(round_best.clone());
            }

            let best_score = best.as_ref().map_or(0.0, Candidate::score);
            info!(
                "round {rounds}: {} survivors, best {:.1}",
                survivors.len(),
                best_score
            );

            if best_score >= self.config.generations.success_threshold {
                break StopReason::Converged;
            }
            if rounds >= self.config.generations.budget {
                break StopReason::BudgetExhausted;
            }
            if self.cancelled.load(Ordering::Relaxed) {
                break StopReason::Cancelled;
            }

            population = self.mutation.evolve(
                &self.generator,
                &self.evaluator,
                &self.store,
                problem,
                survivors,
                self.config.population.size,
            );
        };

        let best = best.expect("loop ran at least one round");
        self.leaderboard
            .update(problem, best.score(), &best.artifact, best.mutation_used())?;

        Ok(Some(ProblemReport {
            problem: problem.to_string(),
            best_score: best.score(),
            generations: rounds,
            stop,
            solution_file: best.artifact.clone(),
            mutation_used: best.mutation_used(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MutationStrategy;
    use crate::sandbox::ExecutionOutcome;
    use std::io;
    use std::path::Path;

    struct PassingExecutor;

    impl SandboxExecutor for PassingExecutor {
        fn run(&self, _artifact: &Path) -> io::Result<ExecutionOutcome> {
            Ok(ExecutionOutcome {
                stdout: "42".to_string(),
                succeeded: true,
            })
        }
    }

    struct FailingExecutor;

    impl SandboxExecutor for FailingExecutor {
        fn run(&self, _artifact: &Path) -> io::Result<ExecutionOutcome> {
            Ok(ExecutionOutcome {
                stdout: String::new(),
                succeeded: false,
            })
        }
    }

    /// Generator returning the same source for every request.
    struct ConstantGenerator {
        source: Option<String>,
    }

    impl ConstantGenerator {
        fn new(source: Option<&str>) -> Self {
            Self {
                source: source.map(str::to_string),
            }
        }
    }

    impl SolutionGenerator for ConstantGenerator {
        fn generate(
            &self,
            _problem: &str,
            _strategy: MutationStrategy,
            _temperature: f64,
        ) -> Option<String> {
            self.source.clone()
        }

        fn mutate(&self, problem: &str, _strategy: MutationStrategy) -> Option<String> {
            Some(problem.to_string())
        }
    }

    fn test_config(dir: &tempfile::TempDir) -> SearchConfig {
        let mut config = SearchConfig::default();
        config.output_dir = dir.path().join("output");
        config.leaderboard.path = dir.path().join("leaderboard.json");
        config.generations.cooldown_secs = 0;
        config.random_seed = Some(7);
        config
    }

    #[test]
    fn test_no_candidates_means_no_leaderboard_update() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let leaderboard_path = config.leaderboard.path.clone();

        let mut controller =
            SearchController::new(config, ConstantGenerator::new(None), PassingExecutor);
        let report = controller.run_problem("unsolvable").unwrap();

        assert!(report.is_none());
        assert!(!leaderboard_path.exists());
    }

    #[test]
    fn test_convergence_stops_and_publishes() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let leaderboard = LeaderboardStore::new(&config.leaderboard);

        // A tiny passing program scores ~100: converges in round one.
        let generator = ConstantGenerator::new(Some("print(42)"));
        let mut controller = SearchController::new(config, generator, PassingExecutor);

        let report = controller.run_problem("print a number").unwrap().unwrap();
        assert_eq!(report.stop, StopReason::Converged);
        assert_eq!(report.generations, 1);
        assert!(report.best_score >= 90.0);
        assert!(!report.mutation_used);

        let entries = leaderboard.load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].status,
            crate::evolve::SolveStatus::Solved
        );
    }

    #[test]
    fn test_budget_exhaustion_publishes_best_effort() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let budget = config.generations.budget;
        let leaderboard = LeaderboardStore::new(&config.leaderboard);

        // Execution always fails, so fitness stays below the threshold.
        let generator = ConstantGenerator::new(Some("print(42)"));
        let mut controller = SearchController::new(config, generator, FailingExecutor);

        let report = controller.run_problem("hard problem").unwrap().unwrap();
        assert_eq!(report.stop, StopReason::BudgetExhausted);
        assert_eq!(report.generations, budget);
        assert!(report.best_score < 90.0);

        let entries = leaderboard.load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].status,
            crate::evolve::SolveStatus::Unsolved
        );
    }

    #[test]
    fn test_run_processes_each_problem_independently() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let leaderboard = LeaderboardStore::new(&config.leaderboard);

        let generator = ConstantGenerator::new(Some("print(42)"));
        let mut controller = SearchController::new(config, generator, PassingExecutor);

        let problems = vec!["first".to_string(), "second".to_string()];
        let reports = controller.run(&problems).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(leaderboard.load().unwrap().len(), 2);
    }

    #[test]
    fn test_max_problems_caps_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(&dir);
        config.generations.max_problems = Some(1);

        let generator = ConstantGenerator::new(Some("print(42)"));
        let mut controller = SearchController::new(config, generator, PassingExecutor);

        let problems = vec!["first".to_string(), "second".to_string()];
        let reports = controller.run(&problems).unwrap();
        assert_eq!(reports.len(), 1);
    }

    #[test]
    fn test_cancellation_before_start_runs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);

        let generator = ConstantGenerator::new(Some("print(42)"));
        let mut controller = SearchController::new(config, generator, PassingExecutor);
        controller.cancel_handle().store(true, Ordering::Relaxed);

        let reports = controller.run(&["p".to_string()]).unwrap();
        assert!(reports.is_empty());
    }
}
