//! evosolve CLI - run the evolutionary search from JSON configuration.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use evosolve::schema::{SearchConfig, load_problems};
use evosolve::{OpenAiGenerator, ProcessSandbox, SearchController, StopReason};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return ExitCode::SUCCESS;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [problems.txt]", args[0]);
        eprintln!();
        eprintln!("Run the evolutionary program search from a JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json   Path to search configuration file");
        eprintln!("  problems.txt  Problem list, one per line (default: problems.txt)");
        eprintln!();
        eprintln!("An example configuration is printed with --example.");
        return ExitCode::FAILURE;
    }

    let config_path = PathBuf::from(&args[1]);
    let problems_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("problems.txt"));

    let config_str = match fs::read_to_string(&config_path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("Error reading config file: {err}");
            return ExitCode::FAILURE;
        }
    };

    let config: SearchConfig = match serde_json::from_str(&config_str) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error parsing config: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = config.validate() {
        eprintln!("Invalid config: {err}");
        return ExitCode::FAILURE;
    }

    let api_key = match env::var(&config.generator.api_key_env) {
        Ok(key) => key,
        Err(_) => {
            eprintln!(
                "Missing API key: set the {} environment variable",
                config.generator.api_key_env
            );
            return ExitCode::FAILURE;
        }
    };

    let problems = match load_problems(&problems_path) {
        Ok(problems) => problems,
        Err(err) => {
            eprintln!("Error reading {}: {err}", problems_path.display());
            return ExitCode::FAILURE;
        }
    };

    let generator = match OpenAiGenerator::new(config.generator.clone(), api_key) {
        Ok(generator) => generator,
        Err(err) => {
            eprintln!("Error building generator client: {err}");
            return ExitCode::FAILURE;
        }
    };
    let executor = ProcessSandbox::new(config.sandbox.clone());

    println!("Evolutionary Program Search");
    println!("===========================");
    println!("Problems: {}", problems.len());
    println!(
        "Population: {} (survival rate {})",
        config.population.size, config.population.survival_rate
    );
    println!(
        "Generations: {} (success threshold {})",
        config.generations.budget, config.generations.success_threshold
    );
    println!("Leaderboard: {}", config.leaderboard.path.display());
    println!();

    let mut controller = SearchController::new(config, generator, executor);

    let start = Instant::now();
    let reports = match controller.run(&problems) {
        Ok(reports) => reports,
        Err(err) => {
            eprintln!("Leaderboard persistence failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!();
    println!("Results:");
    for report in &reports {
        let outcome = match report.stop {
            StopReason::Converged => "converged",
            StopReason::BudgetExhausted => "budget exhausted",
            StopReason::Cancelled => "cancelled",
        };
        println!(
            "  [{:>6.1}] {} ({} generations, {}, mutation: {})",
            report.best_score,
            report.problem,
            report.generations,
            outcome,
            if report.mutation_used { "yes" } else { "no" }
        );
    }
    println!();
    println!(
        "Processed {} problems in {:.1}s",
        reports.len(),
        start.elapsed().as_secs_f32()
    );

    ExitCode::SUCCESS
}

fn print_example_config() {
    let config = SearchConfig::default();
    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
