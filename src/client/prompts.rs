//! Prompt templates for solution generation and problem mutation.

use super::MutationStrategy;

/// System prompt demanding clean code-only output.
pub(crate) const SYSTEM_PROMPT: &str = "\
You are an expert programmer focused on generating clean, correct code.
Rules:
1. Initialize all variables
2. Include complete function definitions
3. Exercise the code with example inputs and print the result
4. Return only valid code
5. No explanatory text or comments
6. No markdown formatting";

/// User prompt asking for a candidate solution.
pub(crate) fn solution_prompt(problem: &str, strategy: MutationStrategy) -> String {
    match strategy {
        MutationStrategy::Solve => format!(
            "Write a short program that solves the following problem and \
             prints its result:\n\n{problem}"
        ),
        MutationStrategy::Simplify => format!(
            "Write the simplest, shortest program you can that solves the \
             following problem and prints its result. Remove anything \
             unnecessary:\n\n{problem}"
        ),
        // A rephrased problem already carries its own framing.
        MutationStrategy::Rephrase => format!(
            "Write a short program that solves the following problem and \
             prints its result:\n\n{problem}"
        ),
        MutationStrategy::Alternative => format!(
            "Write a program that solves the following problem using a \
             different approach than the obvious one, as short as possible, \
             and prints its result:\n\n{problem}"
        ),
    }
}

/// User prompt asking for a mutated problem statement.
pub(crate) fn mutation_prompt(problem: &str, strategy: MutationStrategy) -> String {
    match strategy {
        MutationStrategy::Rephrase => format!(
            "Rephrase the following programming problem so that it asks for \
             the same computation in different words. Reply with the \
             rephrased problem only:\n\n{problem}"
        ),
        _ => format!(
            "Restate the following programming problem more precisely. \
             Reply with the restated problem only:\n\n{problem}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_problem() {
        let problem = "Sum the first 100 primes";
        for strategy in [
            MutationStrategy::Solve,
            MutationStrategy::Simplify,
            MutationStrategy::Rephrase,
            MutationStrategy::Alternative,
        ] {
            assert!(solution_prompt(problem, strategy).contains(problem));
        }
        assert!(mutation_prompt(problem, MutationStrategy::Rephrase).contains(problem));
    }
}
