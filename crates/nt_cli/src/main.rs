use clap::Parser;
use nt_core::DEFAULT_MAX_TOKENS;
use nt_inference::{ChatTemplate, ModelKind, DEFAULT_MODEL_NAME, DEFAULT_MODEL_URL};
use nt_scrappers::{FetcherConfig, HttpFetcher};
use nt_web::config::{DEFAULT_CORS_ORIGIN, DEFAULT_HOST, DEFAULT_PORT};
use nt_web::{AppState, WebConfig};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod logging;

#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                match c {
                    's' => total_seconds += num,
                    'm' => total_seconds += num * 60,
                    'h' => total_seconds += num * 3600,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                }
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A bare number is seconds
        if !current_number.is_empty() {
            total_seconds += current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            has_unit = true;
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headline sentiment and article summaries from a local model", long_about = None)]
pub struct Cli {
    #[arg(long, env = "NT_MODEL", default_value = "ollama", help = "Model to use for inference. Available models: ollama (default), dummy")]
    model: ModelKind,
    #[arg(long, env = "OLLAMA_URL", default_value = DEFAULT_MODEL_URL)]
    model_url: String,
    #[arg(long, env = "NT_MODEL_NAME", default_value = DEFAULT_MODEL_NAME)]
    model_name: String,
    #[arg(long, env = "NT_CHAT_TEMPLATE", default_value = "llama3", help = "Prompt layout of the served model: llama3 or chatml")]
    chat_template: ChatTemplate,
    #[arg(long, env = "NT_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: usize,
    /// Timeout for fetching the article (e.g. 10s, 1m)
    #[arg(long, env = "NT_FETCH_TIMEOUT", default_value = "10s")]
    fetch_timeout: HumanDuration,
    #[arg(long, env = "NT_HOST", default_value = DEFAULT_HOST)]
    host: String,
    #[arg(long, env = "NT_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
    /// The only origin allowed to call the API from a browser
    #[arg(long, env = "NT_CORS_ORIGIN", default_value = DEFAULT_CORS_ORIGIN)]
    cors_origin: String,
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API (default)
    Serve,
    /// Analyze a single URL and print the result as JSON
    Analyze {
        url: String,
    },
}

impl Cli {
    fn inference_config(&self) -> nt_inference::Config {
        nt_inference::Config {
            model: self.model,
            model_url: self.model_url.clone(),
            model_name: self.model_name.clone(),
            chat_template: self.chat_template,
            max_tokens: self.max_tokens,
        }
    }

    fn web_config(&self) -> WebConfig {
        WebConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origin: self.cors_origin.clone(),
        }
    }

    fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            timeout: self.fetch_timeout.0,
            ..FetcherConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let inference_config = cli.inference_config();
    let web_config = cli.web_config();

    let fetcher = Arc::new(HttpFetcher::new(cli.fetcher_config())?);
    let model = nt_inference::create_model(&inference_config).await?;
    info!("🧠 Inference model initialized successfully (using {})", model.name());

    let state = AppState::new(fetcher, model, &inference_config);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            nt_web::serve(state, &web_config).await?;
        }
        Commands::Analyze { url } => {
            info!("Analyzing single URL: {}", url);
            let response = state.analyzer.analyze(&url).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
