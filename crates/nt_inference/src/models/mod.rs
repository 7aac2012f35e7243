use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;
use nt_core::Result;
use crate::Config;

pub mod dummy;
pub mod ollama;

pub use dummy::DummyModel;
pub use nt_core::InferenceModel;
pub use ollama::OllamaModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    #[default]
    Ollama,
    Dummy,
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(ModelKind::Ollama),
            "dummy" => Ok(ModelKind::Dummy),
            other => Err(format!("Unknown model: {}. Available models: ollama (default), dummy", other)),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Ollama => f.write_str("ollama"),
            ModelKind::Dummy => f.write_str("dummy"),
        }
    }
}

/// Lets at most one generation run at a time against the wrapped model.
pub struct SerializedModel {
    inner: Arc<dyn InferenceModel>,
    slot: Mutex<()>,
}

impl SerializedModel {
    pub fn new(inner: Arc<dyn InferenceModel>) -> Self {
        Self {
            inner,
            slot: Mutex::new(()),
        }
    }
}

impl fmt::Debug for SerializedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializedModel")
            .field("inner", &self.inner)
            .finish()
    }
}

#[async_trait]
impl InferenceModel for SerializedModel {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        let _slot = self.slot.lock().await;
        self.inner.generate(prompt, max_tokens).await
    }
}

/// Load the configured backend once; the result is shared by every request.
pub async fn create_model(config: &Config) -> Result<Arc<dyn InferenceModel>> {
    let model: Arc<dyn InferenceModel> = match config.model {
        ModelKind::Ollama => Arc::new(OllamaModel::load(config).await?),
        ModelKind::Dummy => Arc::new(DummyModel::new()),
    };
    info!("Using {} inference backend ({} template)", model.name(), config.chat_template);
    Ok(Arc::new(SerializedModel::new(model)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct SlowModel {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl InferenceModel for SlowModel {
        fn name(&self) -> &str {
            "Slow"
        }

        async fn generate(&self, prompt: &str, _max_tokens: usize) -> Result<String> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(prompt.to_string())
        }
    }

    #[tokio::test]
    async fn test_serialized_model_runs_one_generation_at_a_time() {
        let slow = Arc::new(SlowModel::default());
        let model = Arc::new(SerializedModel::new(slow.clone()));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let model = model.clone();
                tokio::spawn(async move { model.generate(&format!("p{}", i), 16).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(slow.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_create_dummy_model() {
        let config = Config {
            model: ModelKind::Dummy,
            ..Config::default()
        };
        let model = create_model(&config).await.unwrap();
        assert_eq!(model.name(), "Dummy");
    }

    #[test]
    fn test_parse_model_kind() {
        assert_eq!("Ollama".parse::<ModelKind>().unwrap(), ModelKind::Ollama);
        assert_eq!("dummy".parse::<ModelKind>().unwrap(), ModelKind::Dummy);
        assert!("deepseek".parse::<ModelKind>().is_err());
    }
}
