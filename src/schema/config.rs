//! Configuration types for the evolutionary search engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level search configuration.
///
/// Loaded from JSON by the CLI and threaded explicitly through the
/// controller and every collaborator call; there is no process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Population sizing and survival settings.
    #[serde(default)]
    pub population: PopulationConfig,
    /// Generation budget and termination settings.
    #[serde(default)]
    pub generations: GenerationConfig,
    /// Mutation attempt settings.
    #[serde(default)]
    pub mutation: MutationConfig,
    /// Fitness weighting.
    #[serde(default)]
    pub fitness: FitnessConfig,
    /// Sandboxed execution settings.
    #[serde(default)]
    pub sandbox: SandboxConfig,
    /// Solution generator (HTTP) settings.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Leaderboard persistence settings.
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
    /// Directory where candidate sources are persisted.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Random seed for reproducible temperature sampling.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population: PopulationConfig::default(),
            generations: GenerationConfig::default(),
            mutation: MutationConfig::default(),
            fitness: FitnessConfig::default(),
            sandbox: SandboxConfig::default(),
            generator: GeneratorConfig::default(),
            leaderboard: LeaderboardConfig::default(),
            output_dir: default_output_dir(),
            random_seed: None,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

/// Population sizing and survival settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Target number of candidates per generation round.
    #[serde(default = "default_population_size")]
    pub size: usize,
    /// Fraction of a round's population that survives selection (0, 1].
    #[serde(default = "default_survival_rate")]
    pub survival_rate: f64,
    /// Sampling-temperature band for initial population diversity.
    #[serde(default = "default_temperature_band")]
    pub temperature_band: (f64, f64),
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            survival_rate: default_survival_rate(),
            temperature_band: default_temperature_band(),
        }
    }
}

fn default_population_size() -> usize {
    3
}
fn default_survival_rate() -> f64 {
    0.5
}
fn default_temperature_band() -> (f64, f64) {
    (0.3, 0.7)
}

/// Generation budget and termination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum select->mutate rounds per problem.
    #[serde(default = "default_generation_budget")]
    pub budget: usize,
    /// Best fitness at which a problem counts as converged.
    #[serde(default = "default_success_threshold")]
    pub success_threshold: f64,
    /// Cooldown between problems, rate-limiting the generator.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    /// Cap on problems processed in one run.
    #[serde(default)]
    pub max_problems: Option<usize>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            budget: default_generation_budget(),
            success_threshold: default_success_threshold(),
            cooldown_secs: default_cooldown_secs(),
            max_problems: None,
        }
    }
}

fn default_generation_budget() -> usize {
    3
}
fn default_success_threshold() -> f64 {
    90.0
}
fn default_cooldown_secs() -> u64 {
    10
}

/// Mutation attempt settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Maximum mutation attempts per round.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Policy deciding whether a mutated child joins the population.
    #[serde(default)]
    pub acceptance: AcceptancePolicy,
    /// Temperature of the first mutation attempt.
    #[serde(default = "default_base_temperature")]
    pub base_temperature: f64,
    /// Temperature increase per attempt; exploration broadens as attempts
    /// escalate.
    #[serde(default = "default_temperature_step")]
    pub temperature_step: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            acceptance: AcceptancePolicy::default(),
            base_temperature: default_base_temperature(),
            temperature_step: default_temperature_step(),
        }
    }
}

fn default_max_attempts() -> usize {
    3
}
fn default_base_temperature() -> f64 {
    0.5
}
fn default_temperature_step() -> f64 {
    0.15
}

/// Acceptance policy for mutated children.
///
/// `ImproveOnParent` keeps the best-known solution monotonic; `AnyPositive`
/// trades monotonicity for diversity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptancePolicy {
    /// Child must strictly beat its parent's fitness.
    #[default]
    ImproveOnParent,
    /// Any positive fitness is accepted.
    AnyPositive,
}

/// Fitness weighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessConfig {
    /// Weight of the structural-complexity component.
    #[serde(default = "default_complexity_weight")]
    pub complexity_weight: f64,
    /// Weight of the execution component.
    #[serde(default = "default_execution_weight")]
    pub execution_weight: f64,
    /// Normalized source length at which complexity scores zero.
    #[serde(default = "default_reference_length")]
    pub reference_length: usize,
    /// Require numeric-looking output for problems with domain-hint
    /// keywords ("prime", "celsius", "area", ...).
    #[serde(default = "default_keyword_checks")]
    pub keyword_checks: bool,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            complexity_weight: default_complexity_weight(),
            execution_weight: default_execution_weight(),
            reference_length: default_reference_length(),
            keyword_checks: default_keyword_checks(),
        }
    }
}

fn default_complexity_weight() -> f64 {
    70.0
}
fn default_execution_weight() -> f64 {
    30.0
}
fn default_reference_length() -> usize {
    600
}
fn default_keyword_checks() -> bool {
    true
}

/// Sandboxed execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Interpreter invoked on the candidate artifact.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    /// Container image for isolated execution. When unset, candidates run
    /// as a direct child process under the shorter fallback timeout.
    #[serde(default)]
    pub container_image: Option<String>,
    /// Wall-clock timeout for containerized runs.
    #[serde(default = "default_sandbox_timeout_secs")]
    pub timeout_secs: u64,
    /// Wall-clock timeout for the direct-process fallback.
    #[serde(default = "default_fallback_timeout_secs")]
    pub fallback_timeout_secs: u64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            container_image: None,
            timeout_secs: default_sandbox_timeout_secs(),
            fallback_timeout_secs: default_fallback_timeout_secs(),
        }
    }
}

fn default_interpreter() -> String {
    "python3".to_string()
}
fn default_sandbox_timeout_secs() -> u64 {
    10
}
fn default_fallback_timeout_secs() -> u64 {
    5
}

/// Solution generator (HTTP) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Chat-completions endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model identifier sent with each request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Retries after a failed request, with exponential backoff.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Completion token cap per request.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-request timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_retries: default_max_retries(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_api_key_env() -> String {
    "EVOSOLVE_API_KEY".to_string()
}
fn default_max_retries() -> u32 {
    3
}
fn default_max_tokens() -> u32 {
    800
}
fn default_request_timeout_secs() -> u64 {
    60
}

/// Leaderboard persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Path of the persisted leaderboard file.
    #[serde(default = "default_leaderboard_path")]
    pub path: PathBuf,
    /// Number of entries retained.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Score at or above which an entry is marked solved.
    #[serde(default = "default_solved_threshold")]
    pub solved_threshold: f64,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            path: default_leaderboard_path(),
            top_k: default_top_k(),
            solved_threshold: default_solved_threshold(),
        }
    }
}

fn default_leaderboard_path() -> PathBuf {
    PathBuf::from("leaderboard.json")
}
fn default_top_k() -> usize {
    5
}
fn default_solved_threshold() -> f64 {
    90.0
}

/// Search configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("population size must be at least 1")]
    PopulationTooSmall,
    #[error("survival rate {0} must be in (0, 1]")]
    InvalidSurvivalRate(f64),
    #[error("temperature band ({0}, {1}) must satisfy 0 <= low <= high")]
    InvalidTemperatureBand(f64, f64),
    #[error("generation budget must be at least 1")]
    InvalidGenerationBudget,
    #[error("success threshold {0} must be in (0, 100]")]
    InvalidSuccessThreshold(f64),
    #[error("mutation attempts must be at least 1")]
    InvalidMutationAttempts,
    #[error("fitness weights ({complexity} + {execution}) must be non-negative and sum into (0, 100]")]
    InvalidWeights { complexity: f64, execution: f64 },
    #[error("reference length must be positive")]
    InvalidReferenceLength,
    #[error("sandbox timeout must be positive")]
    InvalidSandboxTimeout,
    #[error("generator endpoint must not be empty")]
    EmptyEndpoint,
    #[error("leaderboard must retain at least 1 entry")]
    InvalidTopK,
}

impl SearchConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population.size < 1 {
            return Err(ConfigError::PopulationTooSmall);
        }

        let rate = self.population.survival_rate;
        if !(rate > 0.0 && rate <= 1.0) {
            return Err(ConfigError::InvalidSurvivalRate(rate));
        }

        let (lo, hi) = self.population.temperature_band;
        if lo < 0.0 || lo > hi {
            return Err(ConfigError::InvalidTemperatureBand(lo, hi));
        }

        if self.generations.budget < 1 {
            return Err(ConfigError::InvalidGenerationBudget);
        }

        let threshold = self.generations.success_threshold;
        if !(threshold > 0.0 && threshold <= 100.0) {
            return Err(ConfigError::InvalidSuccessThreshold(threshold));
        }

        if self.mutation.max_attempts < 1 {
            return Err(ConfigError::InvalidMutationAttempts);
        }

        let complexity = self.fitness.complexity_weight;
        let execution = self.fitness.execution_weight;
        let sum = complexity + execution;
        if complexity < 0.0 || execution < 0.0 || !(sum > 0.0 && sum <= 100.0) {
            return Err(ConfigError::InvalidWeights {
                complexity,
                execution,
            });
        }

        if self.fitness.reference_length == 0 {
            return Err(ConfigError::InvalidReferenceLength);
        }

        if self.sandbox.timeout_secs == 0 || self.sandbox.fallback_timeout_secs == 0 {
            return Err(ConfigError::InvalidSandboxTimeout);
        }

        if self.generator.endpoint.is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }

        if self.leaderboard.top_k < 1 {
            return Err(ConfigError::InvalidTopK);
        }

        Ok(())
    }
}
