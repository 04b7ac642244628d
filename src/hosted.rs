//! Vertex AI `generateContent` backend.

use crate::config::HostedConfig;
use crate::generator::{DecodingConfig, GenerationError, TextGenerator, token_from_env};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_HARASSMENT",
];
const BLOCK_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    top_k: u32,
    top_p: f32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn request_body<'a>(prompt: &'a str, config: &DecodingConfig) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            max_output_tokens: config.max_output_tokens,
            top_k: config.top_k,
            top_p: config.top_p,
            temperature: config.temperature,
        },
        safety_settings: HARM_CATEGORIES
            .iter()
            .map(|&category| SafetySetting {
                category,
                threshold: BLOCK_THRESHOLD,
            })
            .collect(),
    }
}

/// Text of the first part of the first candidate.
fn parse_response(body: &str) -> Result<String, GenerationError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .and_then(|parts| parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or(GenerationError::EmptyResponse)
}

#[must_use]
pub fn endpoint(config: &HostedConfig) -> String {
    format!(
        "https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:generateContent",
        location = config.location,
        project = config.project,
        model = config.model,
    )
}

pub struct HostedGenerator {
    client: Client,
    url: String,
    token: String,
}

impl HostedGenerator {
    pub fn new(config: &HostedConfig, timeout: Duration) -> Result<Self, GenerationError> {
        let token = token_from_env(Some(config.token_env.as_str()))?
            .ok_or_else(|| GenerationError::MissingCredentials(config.token_env.clone()))?;
        let client = Client::builder().timeout(timeout).build()?;
        log::info!("Hosted backend ready: model {} in {}", config.model, config.location);
        Ok(Self {
            client,
            url: endpoint(config),
            token,
        })
    }
}

impl TextGenerator for HostedGenerator {
    fn generate(
        &mut self,
        prompt: &str,
        config: &DecodingConfig,
    ) -> Result<String, GenerationError> {
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&request_body(prompt, config))
            .send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }
        parse_response(&body)
    }
}
