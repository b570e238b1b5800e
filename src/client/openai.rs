//! OpenAI-compatible chat-completions client.
//!
//! Blocking HTTP with bounded exponential-backoff retries. After the
//! retries are exhausted the client reports absence (`None`); request
//! failures never escape into the search loop.

use std::thread;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::schema::GeneratorConfig;

use super::prompts;
use super::{MutationStrategy, SolutionGenerator};

/// Temperature used for problem rephrasing requests.
const REPHRASE_TEMPERATURE: f64 = 0.7;

/// Solution generator backed by an OpenAI-compatible endpoint.
pub struct OpenAiGenerator {
    http: reqwest::blocking::Client,
    config: GeneratorConfig,
    api_key: String,
}

impl OpenAiGenerator {
    /// Create a client from config and an API key.
    pub fn new(config: GeneratorConfig, api_key: String) -> Result<Self, reqwest::Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    /// One completion round-trip, retried with exponential backoff.
    fn complete(&self, user_prompt: &str, temperature: f64) -> Option<String> {
        for attempt in 0..=self.config.max_retries {
            match self.request(user_prompt, temperature) {
                Ok(text) => return Some(text),
                Err(err) => {
                    warn!(
                        "completion request failed (attempt {}/{}): {err}",
                        attempt + 1,
                        self.config.max_retries + 1
                    );
                    if attempt < self.config.max_retries {
                        thread::sleep(Duration::from_secs(1 << attempt));
                    }
                }
            }
        }
        None
    }

    fn request(&self, user_prompt: &str, temperature: f64) -> Result<String, RequestError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature,
            top_p: 0.95,
            max_tokens: self.config.max_tokens,
        };

        let response: ChatResponse = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;

        extract_content(response).ok_or(RequestError::EmptyResponse)
    }
}

impl SolutionGenerator for OpenAiGenerator {
    fn generate(
        &self,
        problem: &str,
        strategy: MutationStrategy,
        temperature: f64,
    ) -> Option<String> {
        debug!("requesting candidate ({strategy:?}, T={temperature:.2})");
        let prompt = prompts::solution_prompt(problem, strategy);
        self.complete(&prompt, temperature)
            .map(|text| strip_code_fences(&text))
    }

    fn mutate(&self, problem: &str, strategy: MutationStrategy) -> Option<String> {
        debug!("requesting problem mutation ({strategy:?})");
        let prompt = prompts::mutation_prompt(problem, strategy);
        self.complete(&prompt, REPHRASE_TEMPERATURE)
    }
}

#[derive(Debug, thiserror::Error)]
enum RequestError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("response carried no completion content")]
    EmptyResponse,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

fn extract_content(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .filter(|content| !content.is_empty())
}

/// Remove markdown code fences the model sometimes wraps code in.
fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
