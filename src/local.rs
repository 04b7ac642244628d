//! Locally served model, spoken to over the `/api/generate` endpoint.

use crate::config::LocalConfig;
use crate::generator::{DecodingConfig, GenerationError, TextGenerator, token_from_env};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: Options,
}

#[derive(Debug, Serialize)]
struct Options {
    num_predict: u32,
    top_k: u32,
    top_p: f32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

fn request_body<'a>(model: &'a str, prompt: &'a str, config: &DecodingConfig) -> GenerateRequest<'a> {
    GenerateRequest {
        model,
        prompt,
        stream: false,
        options: Options {
            num_predict: config.max_output_tokens,
            top_k: config.top_k,
            top_p: config.top_p,
            temperature: config.temperature,
        },
    }
}

/// Causal models may echo the prompt before continuing it; drop it.
fn parse_response(body: &str, prompt: &str) -> Result<String, GenerationError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text = response.response.ok_or(GenerationError::EmptyResponse)?;
    Ok(text.replace(prompt, ""))
}

pub struct LocalGenerator {
    client: Client,
    url: String,
    model: String,
    token: Option<String>,
}

impl LocalGenerator {
    pub fn new(config: &LocalConfig, timeout: Duration) -> Result<Self, GenerationError> {
        let token = token_from_env(config.token_env.as_deref())?;
        let client = Client::builder().timeout(timeout).build()?;
        log::info!("Local backend ready: model {} at {}", config.model, config.base_url);
        Ok(Self {
            client,
            url: format!("{}/api/generate", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            token,
        })
    }
}

impl TextGenerator for LocalGenerator {
    fn generate(
        &mut self,
        prompt: &str,
        config: &DecodingConfig,
    ) -> Result<String, GenerationError> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&request_body(&self.model, prompt, config));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let resp = request.send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }
        parse_response(&body, prompt)
    }
}
