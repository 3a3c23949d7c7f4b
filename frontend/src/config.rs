use anyhow::anyhow;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::{env, sync::OnceLock};

const DEFAULT_BACKEND_URL: &str = "http://localhost:80";
const DEFAULT_SESSION_SECRET: &str = "change-this-session-secret-in-production";
const DEFAULT_SESSION_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;
const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 3600;
const DEFAULT_REFRESH_SKEW_SECS: i64 = 60;
// Ten years; longer lifetimes are configuration mistakes.
const MAX_DURATION_SECS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub api_base_url: String,
    pub session_secret: String,
    pub session_max_age_secs: i64,
    pub access_token_ttl_secs: i64,
    pub refresh_skew_secs: i64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BACKEND_URL.to_string(),
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            session_max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
            access_token_ttl_secs: DEFAULT_ACCESS_TOKEN_TTL_SECS,
            refresh_skew_secs: DEFAULT_REFRESH_SKEW_SECS,
        }
    }
}

impl RuntimeConfig {
    /// Reads the configuration from the process environment, after loading a
    /// `.env` file when one is present.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup("BACKEND_URL")
            .filter(|value| !value.trim().is_empty())
            .map(|value| normalize_base_url(&value))
            .unwrap_or(defaults.api_base_url);

        let session_secret = lookup("SESSION_SECRET")
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.session_secret);

        let session_max_age_secs = parse_secs(
            &lookup,
            "SESSION_MAX_AGE_SECS",
            defaults.session_max_age_secs,
        )?;
        let access_token_ttl_secs = parse_secs(
            &lookup,
            "ACCESS_TOKEN_TTL_SECS",
            defaults.access_token_ttl_secs,
        )?;
        let refresh_skew_secs = parse_secs(
            &lookup,
            "TOKEN_REFRESH_SKEW_SECS",
            defaults.refresh_skew_secs,
        )?;

        Ok(Self {
            api_base_url,
            session_secret,
            session_max_age_secs,
            access_token_ttl_secs,
            refresh_skew_secs,
        })
    }

    pub fn session_max_age(&self) -> Duration {
        bounded_secs(self.session_max_age_secs)
    }

    pub fn access_token_ttl(&self) -> Duration {
        bounded_secs(self.access_token_ttl_secs)
    }

    pub fn refresh_skew(&self) -> Duration {
        bounded_secs(self.refresh_skew_secs)
    }
}

fn bounded_secs(secs: i64) -> Duration {
    Duration::seconds(secs.clamp(0, MAX_DURATION_SECS))
}

fn parse_secs<F>(lookup: &F, key: &str, default: i64) -> anyhow::Result<i64>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", key, raw))?;
    if value < 0 {
        return Err(anyhow!("{} must not be negative: {}", key, value));
    }
    if value > MAX_DURATION_SECS {
        return Err(anyhow!(
            "{} must be at most {} seconds: {}",
            key,
            MAX_DURATION_SECS,
            value
        ));
    }
    Ok(value)
}

pub fn normalize_base_url(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}

static RUNTIME_CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

/// Loads the configuration once. Invalid values fall back to the defaults
/// after logging, so a broken `.env` never prevents the app from starting.
pub fn init() -> &'static RuntimeConfig {
    RUNTIME_CONFIG.get_or_init(|| {
        let config = match RuntimeConfig::load() {
            Ok(config) => config,
            Err(err) => {
                log::error!("Failed to load runtime config, using defaults: {err}");
                RuntimeConfig::default()
            }
        };
        log::info!(
            "Runtime config: backend={}, session_secret={}, session_max_age={}s",
            config.api_base_url,
            crate::logging::mask_secret(&config.session_secret),
            config.session_max_age_secs
        );
        config
    })
}

pub fn current() -> RuntimeConfig {
    init().clone()
}
