//! Fitness scoring for candidate solutions.
//!
//! One deterministic weighted sum of two components: structural complexity
//! of the normalized source, and sandboxed execution of the artifact. The
//! score is a pure function of the source text and the executor outcome.

use log::warn;

use crate::sandbox::{ExecutionOutcome, SandboxExecutor};
use crate::schema::FitnessConfig;

use super::candidate::Candidate;

/// Problem keywords that demand numeric-looking output.
const NUMERIC_HINTS: &[&str] = &[
    "prime",
    "celsius",
    "fahrenheit",
    "area",
    "perimeter",
    "factorial",
    "average",
    "sum",
    "digit",
];

/// Scores one candidate against one problem.
pub struct FitnessEvaluator<X> {
    config: FitnessConfig,
    executor: X,
}

impl<X: SandboxExecutor> FitnessEvaluator<X> {
    /// Create an evaluator.
    pub fn new(config: FitnessConfig, executor: X) -> Self {
        Self { config, executor }
    }

    /// Combined fitness in [0, 100].
    ///
    /// Any evaluation error degrades to 0; scoring never fails.
    pub fn score(&self, problem: &str, candidate: &Candidate) -> f64 {
        let outcome = match self.executor.run(&candidate.artifact) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("candidate execution failed: {err}");
                return 0.0;
            }
        };

        let complexity = self.complexity_score(&candidate.source);
        let execution = self.execution_score(problem, &outcome);
        (complexity + execution).clamp(0.0, 100.0)
    }

    /// Structural-complexity component: shorter normalized source scores
    /// higher, linearly against the reference length.
    pub fn complexity_score(&self, source: &str) -> f64 {
        let weight = self.config.complexity_weight;
        let length = normalized_length(source);
        if length == 0 {
            return weight;
        }

        let ratio = 1.0 - length as f64 / self.config.reference_length as f64;
        (weight * ratio).clamp(0.0, weight)
    }

    /// Execution component: full weight only for a successful run with
    /// non-empty output that passes the keyword gate.
    pub fn execution_score(&self, problem: &str, outcome: &ExecutionOutcome) -> f64 {
        if !outcome.succeeded || outcome.stdout.trim().is_empty() {
            return 0.0;
        }

        if self.config.keyword_checks
            && wants_numeric_output(problem)
            && !looks_numeric(&outcome.stdout)
        {
            return 0.0;
        }

        self.config.execution_weight
    }
}

/// Length of the source after dropping comment lines and collapsing
/// whitespace runs on the remaining non-blank lines.
fn normalized_length(source: &str) -> usize {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("//"))
        .map(collapsed_length)
        .sum()
}

/// Line length with internal whitespace runs counted as single spaces.
fn collapsed_length(line: &str) -> usize {
    let mut words = line.split_whitespace();
    let first = words.next().map_or(0, str::len);
    words.map(|w| w.len() + 1).sum::<usize>() + first
}

fn wants_numeric_output(problem: &str) -> bool {
    let lowered = problem.to_lowercase();
    NUMERIC_HINTS.iter().any(|hint| lowered.contains(hint))
}

fn looks_numeric(stdout: &str) -> bool {
    stdout
        .split_whitespace()
        .any(|token| {
            token
                .trim_matches(&[',', ';', ':', '.'][..])
                .parse::<f64>()
                .is_ok()
        })
}
