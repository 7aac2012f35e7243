use std::fmt;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;
use nt_core::{Error, Result};
use super::InferenceModel;
use crate::Config;

#[derive(Debug, Clone)]
pub struct OllamaConfig {
    base_url: Url,
    model_name: String,
}

impl OllamaConfig {
    pub fn from_inference_config(config: &Config) -> Result<Self> {
        let mut base_url = Url::parse(&config.model_url)
            .map_err(|e| Error::Config(format!("Invalid model URL {}: {}", config.model_url, e)))?;
        // `join` replaces the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        if config.model_name.trim().is_empty() {
            return Err(Error::Config("A model name is required for Ollama".to_string()));
        }
        Ok(Self {
            base_url,
            model_name: config.model_name.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid Ollama endpoint {}: {}", path, e)))
    }
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: usize,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    /// The prompt already carries the chat template.
    raw: bool,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct ShowRequest<'a> {
    model: &'a str,
}

/// Client for a locally running Ollama server.
pub struct OllamaModel {
    client: Client,
    config: OllamaConfig,
}

impl fmt::Debug for OllamaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaModel")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.config.base_url.as_str())
            .field("model_name", &self.config.model_name)
            .finish()
    }
}

impl OllamaModel {
    /// Connect to the server and make sure the model is installed.
    pub async fn load(config: &Config) -> Result<Self> {
        let config = OllamaConfig::from_inference_config(config)?;
        let model = Self {
            client: Client::new(),
            config,
        };

        let response = model
            .client
            .post(model.config.endpoint("api/show")?)
            .json(&ShowRequest { model: &model.config.model_name })
            .send()
            .await
            .map_err(|e| Error::Inference(format!(
                "Ollama is not available at {}: {}. Please ensure Ollama is running.",
                model.config.base_url, e
            )))?;

        if !response.status().is_success() {
            return Err(Error::Inference(format!(
                "Model '{}' is not available on {} ({}). Pull it with `ollama pull {}`.",
                model.config.model_name,
                model.config.base_url,
                response.status(),
                model.config.model_name
            )));
        }

        info!("Loaded model {} from {}", model.config.model_name, model.config.base_url);
        Ok(model)
    }
}

#[async_trait]
impl InferenceModel for OllamaModel {
    fn name(&self) -> &str {
        "Ollama"
    }

    async fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        let request = GenerateRequest {
            model: &self.config.model_name,
            prompt,
            raw: true,
            stream: false,
            options: GenerateOptions { num_predict: max_tokens },
        };

        debug!("Sending {} prompt characters to {}", prompt.len(), self.config.model_name);
        let response = self
            .client
            .post(self.config.endpoint("api/generate")?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!("Ollama returned {}: {}", status, body.trim())));
        }

        let response = response.json::<GenerateResponse>().await?;
        Ok(response.response)
    }
}
