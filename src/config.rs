use std::env;
use std::time::Duration;

use log::{debug, error, info};
use url::Url;

use crate::error::{BotError, Result};

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub openai_api_token: String,
    pub openai_api_url: Url,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        let discord_token = env::var("DISCORD_TOKEN").map_err(|e| {
            error!("Failed to load DISCORD_TOKEN from environment: {e}");
            e
        })?;

        let openai_api_token = env::var("OPENAI_API_TOKEN").map_err(|e| {
            error!("Failed to load OPENAI_API_TOKEN from environment: {e}");
            e
        })?;

        let openai_api_url = parse_api_url(env::var("OPENAI_API_URL").ok().as_deref())?;
        let request_timeout = parse_timeout(env::var("REQUEST_TIMEOUT_SECS").ok().as_deref())?;

        info!("Configuration loaded successfully");
        debug!("Discord token length: {} characters", discord_token.len());
        debug!(
            "OpenAI API token length: {} characters",
            openai_api_token.len()
        );
        debug!("Completion endpoint: {openai_api_url}");
        debug!("Request timeout: {}s", request_timeout.as_secs());

        Ok(Self {
            discord_token,
            openai_api_token,
            openai_api_url,
            request_timeout,
        })
    }
}

fn parse_api_url(raw: Option<&str>) -> Result<Url> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_OPENAI_API_URL);

    Url::parse(raw).map_err(|e| BotError::Config(format!("OPENAI_API_URL '{raw}' is invalid: {e}")))
}

fn parse_timeout(raw: Option<&str>) -> Result<Duration> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    };

    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(BotError::Config(format!(
            "REQUEST_TIMEOUT_SECS must be a positive integer, got '{raw}'"
        ))),
    }
}
