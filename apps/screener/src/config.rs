use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::extraction::WebSettings;
use crate::inference_client::InferenceSettings;

pub const DEFAULT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
pub const DEFAULT_INFERENCE_API_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; ResumeScreener/0.1)";
pub const DEFAULT_JOB_DESCRIPTION_DIR: &str = "data/job_descriptions/text";
pub const DEFAULT_LOG_FILE: &str = "screener.log";
pub const JOB_DESCRIPTION_FILE_NAME: &str = "job_description.txt";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application configuration loaded from environment variables.
/// Every value has a default; numeric values out of range are clamped.
#[derive(Debug, Clone)]
pub struct Config {
    pub model: String,
    pub inference_api_url: String,
    pub inference_api_token: Option<String>,
    pub inference_timeout: Duration,
    pub inference_max_tokens: usize,
    pub rate_limit_delay: Duration,
    pub similarity_threshold: f64,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub proxy: Option<String>,
    pub job_description_dir: PathBuf,
    pub log_level: String,
    /// `None` disables the log file.
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string());
        let non_empty = |key: &str| text(key).filter(|v| !v.is_empty());

        let inference_timeout_secs: u64 = parse_or(&lookup, "INFERENCE_TIMEOUT_SECS", 30)?;
        let inference_max_tokens: usize = parse_or(&lookup, "INFERENCE_MAX_TOKENS", 512)?;
        let rate_limit_delay_ms: u64 = parse_or(&lookup, "RATE_LIMIT_DELAY_MS", 1000)?;
        let similarity_threshold: f64 = parse_or(&lookup, "SIMILARITY_THRESHOLD", 0.5)?;
        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 10)?;

        Ok(Config {
            model: non_empty("SCREENING_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            inference_api_url: non_empty("INFERENCE_API_URL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            inference_api_token: non_empty("INFERENCE_API_TOKEN"),
            inference_timeout: Duration::from_secs(inference_timeout_secs.clamp(1, 300)),
            inference_max_tokens: inference_max_tokens.clamp(16, 512),
            rate_limit_delay: clamp_delay_ms(rate_limit_delay_ms),
            similarity_threshold: clamp_threshold(similarity_threshold),
            request_timeout: Duration::from_secs(request_timeout_secs.clamp(1, 120)),
            user_agent: non_empty("USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            proxy: non_empty("PROXY"),
            job_description_dir: non_empty("JOB_DESCRIPTION_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_JOB_DESCRIPTION_DIR)),
            log_level: normalize_log_level(text("LOG_LEVEL").as_deref()),
            log_file: match text("LOG_FILE") {
                Some(path) if path.is_empty() => None,
                Some(path) => Some(PathBuf::from(path)),
                None => Some(PathBuf::from(DEFAULT_LOG_FILE)),
            },
        })
    }

    /// Applies command-line overrides through the same clamps as the environment.
    pub fn with_overrides(mut self, delay_ms: Option<u64>, threshold: Option<f64>) -> Self {
        if let Some(ms) = delay_ms {
            self.rate_limit_delay = clamp_delay_ms(ms);
        }
        if let Some(t) = threshold {
            self.similarity_threshold = clamp_threshold(t);
        }
        self
    }

    pub fn inference_settings(&self) -> InferenceSettings {
        InferenceSettings {
            base_url: self.inference_api_url.clone(),
            model: self.model.clone(),
            api_token: self.inference_api_token.clone(),
            timeout: self.inference_timeout,
            max_input_tokens: self.inference_max_tokens,
        }
    }

    pub fn web_settings(&self) -> WebSettings {
        WebSettings {
            user_agent: self.user_agent.clone(),
            proxy: self.proxy.clone(),
            timeout: self.request_timeout,
        }
    }

    pub fn job_description_dump_path(&self) -> PathBuf {
        self.job_description_dir.join(JOB_DESCRIPTION_FILE_NAME)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).map(|v| v.trim().to_string()) {
        Some(raw) if !raw.is_empty() => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        _ => Ok(default),
    }
}

fn clamp_delay_ms(ms: u64) -> Duration {
    Duration::from_millis(ms.min(60_000))
}

fn clamp_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        return 0.5;
    }
    threshold.clamp(0.0, 1.0)
}

/// Lowercased level name, `info` when unrecognized.
fn normalize_log_level(raw: Option<&str>) -> String {
    raw.map(str::to_ascii_lowercase)
        .filter(|level| LOG_LEVELS.contains(&level.as_str()))
        .unwrap_or_else(|| "info".to_string())
}
