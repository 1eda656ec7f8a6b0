//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::{LlmBackend, LlmConfig};

/// Relay the bot talks to unless `BOT_RELAY_URL` says otherwise.
pub const DEFAULT_RELAY_URL: &str = "wss://relay-jp.nostr.wirednet.jp";

/// Fixed system preamble prepended to every completion prompt.
pub const DEFAULT_INITIAL_PROMPT: &str = "\
あなたは「やる夫」というキャラクターとして振る舞ってください。\
一人称は「やる夫」、語尾には「お」を付けて、明るくフレンドリーに短く答えてください。\n";

/// Task preamble for news summaries, placed between the system preamble and the article.
pub const DEFAULT_NEWS_PROMPT: &str = "\
以下のニュース記事を読んで、200文字程度で要約し、やる夫としての感想を一言添えてください。\n\n";

/// News fires at minute 0 and 30 of every hour (seconds-first cron syntax).
pub const DEFAULT_NEWS_SCHEDULE: &str = "0 0,30 * * * *";

/// Random draws the selector makes before looking for any unseen item.
pub const DEFAULT_MAX_DRAWS: usize = 10;

/// Upper bound on waiting for the farewell post at shutdown.
pub const DEFAULT_FAREWELL_WAIT: Duration = Duration::from_secs(2);

/// News source configuration.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    /// Base URL of the NewsAPI-style endpoint.
    pub endpoint: String,
    pub api_key: SecretString,
    pub query: String,
    pub page_size: u32,
    /// Timeout for fetching article bodies.
    pub fetch_timeout: Duration,
}

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub relay_url: String,
    /// Identity credential used to sign outbound events.
    pub private_key: SecretString,
    pub llm: LlmConfig,
    pub initial_prompt: String,
    pub news_prompt: String,
    pub news: NewsConfig,
    /// Cron expression for unsolicited news posts.
    pub news_schedule: String,
    pub max_draws: usize,
    /// Route names (`help`, `fav`, `news`) that should be skipped.
    pub disabled_commands: Vec<String>,
    pub farewell_wait: Duration,
}

impl BotConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| ConfigError::MissingEnvVar(key.into()));

        let private_key = SecretString::from(require("BOT_PRIVATE_KEY_HEX")?);
        let llm_key = SecretString::from(require("OPENAI_API_KEY")?);
        let news_key = SecretString::from(require("NEWS_API_KEY")?);

        let backend = get("BOT_LLM_BACKEND")
            .map(|raw| raw.parse::<LlmBackend>())
            .transpose()
            .map_err(|message| ConfigError::InvalidValue {
                key: "BOT_LLM_BACKEND".into(),
                message,
            })?;

        let news_schedule =
            get("BOT_NEWS_SCHEDULE").unwrap_or_else(|| DEFAULT_NEWS_SCHEDULE.to_string());
        if let Err(e) = news_schedule.parse::<cron::Schedule>() {
            return Err(ConfigError::InvalidValue {
                key: "BOT_NEWS_SCHEDULE".into(),
                message: e.to_string(),
            });
        }

        let max_draws = parse_or(&get, "BOT_NEWS_MAX_DRAWS", DEFAULT_MAX_DRAWS)?;
        if max_draws == 0 {
            return Err(ConfigError::InvalidValue {
                key: "BOT_NEWS_MAX_DRAWS".into(),
                message: "must be at least 1".into(),
            });
        }

        let disabled_commands = get("BOT_DISABLED_COMMANDS")
            .map(|s| {
                s.split(',')
                    .map(|c| c.trim().to_lowercase())
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            relay_url: get("BOT_RELAY_URL").unwrap_or_else(|| DEFAULT_RELAY_URL.to_string()),
            private_key,
            llm: LlmConfig::new(llm_key, backend, get("BOT_MODEL")),
            initial_prompt: get("BOT_INITIAL_PROMPT")
                .unwrap_or_else(|| DEFAULT_INITIAL_PROMPT.to_string()),
            news_prompt: get("BOT_NEWS_PROMPT").unwrap_or_else(|| DEFAULT_NEWS_PROMPT.to_string()),
            news: NewsConfig {
                endpoint: get("NEWS_API_URL")
                    .unwrap_or_else(|| "https://newsapi.org/v2/everything".to_string()),
                api_key: news_key,
                query: get("NEWS_QUERY").unwrap_or_else(|| "ゲーム".to_string()),
                page_size: parse_or(&get, "NEWS_PAGE_SIZE", 50)?,
                fetch_timeout: Duration::from_secs(parse_or(&get, "BOT_FETCH_TIMEOUT_SECS", 30)?),
            },
            news_schedule,
            max_draws,
            disabled_commands,
            farewell_wait: Duration::from_secs(parse_or(
                &get,
                "BOT_FAREWELL_WAIT_SECS",
                DEFAULT_FAREWELL_WAIT.as_secs(),
            )?),
        })
    }

    /// Whether the named route was disabled by configuration.
    pub fn is_command_enabled(&self, name: &str) -> bool {
        !self.disabled_commands.iter().any(|c| c == name)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
