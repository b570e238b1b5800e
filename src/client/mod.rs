//! Solution generator contract and implementations.
//!
//! The search engine only depends on the [`SolutionGenerator`] trait;
//! [`OpenAiGenerator`] is the production implementation speaking the
//! OpenAI-compatible chat-completions protocol.

mod openai;
mod prompts;

pub use openai::OpenAiGenerator;

/// Strategy passed to the generator; escalates across mutation attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStrategy {
    /// Direct solution request, used for the initial population.
    Solve,
    /// Ask for a simpler, shorter rendition of the parent's approach.
    Simplify,
    /// Structurally rephrase the problem statement itself.
    Rephrase,
    /// Demand a different, shortest-possible approach.
    Alternative,
}

impl MutationStrategy {
    /// Strategy for a 1-based mutation attempt index.
    pub fn for_attempt(attempt: usize) -> Self {
        match attempt {
            0 | 1 => Self::Simplify,
            2 => Self::Rephrase,
            _ => Self::Alternative,
        }
    }
}

/// Produces candidate program text for a problem statement.
///
/// `None` means the collaborator had no result (after its own retry
/// policy); absence is an expected outcome, not an error.
pub trait SolutionGenerator {
    /// Generate one candidate program for `problem`.
    fn generate(
        &self,
        problem: &str,
        strategy: MutationStrategy,
        temperature: f64,
    ) -> Option<String>;

    /// Produce a mutated rendition of the problem statement itself.
    fn mutate(&self, problem: &str, strategy: MutationStrategy) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_escalation() {
        assert_eq!(MutationStrategy::for_attempt(1), MutationStrategy::Simplify);
        assert_eq!(MutationStrategy::for_attempt(2), MutationStrategy::Rephrase);
        assert_eq!(
            MutationStrategy::for_attempt(3),
            MutationStrategy::Alternative
        );
        assert_eq!(
            MutationStrategy::for_attempt(7),
            MutationStrategy::Alternative
        );
    }
}
