//! Application configuration loaded via OrthoConfig.
//!
//! [`AppSettings`] is read once at startup from CLI arguments, `TASKS_*`
//! environment variables and configuration files, then split into the
//! immutable per-component settings handed to adapter constructors.

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::domain::{AnswerLinks, SheetLayout};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8001";
const DEFAULT_CACHE_KEY_TEMPLATE: &str = "tasks:day:{day}";
const DEFAULT_WORKBOOK_PATH: &str = "PlayIT.xlsx";
const DEFAULT_WORKSHEET: &str = "Персонажи";
const DEFAULT_JWT_AUDIENCE: &str = "prod";
const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_BALANCE_SERVICE_URL: &str = "https://it-otdel.space/playit/auth";

/// Deep-link table compiled into the binary; `answer_links_path` overrides it.
const BUNDLED_ANSWER_LINKS: &str = include_str!("../fixtures/answer-links.json");
const BUNDLED_ANSWER_LINKS_ORIGIN: &str = "bundled fixtures/answer-links.json";

/// Startup configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting `{field}` (set {env})")]
    Missing {
        field: &'static str,
        env: &'static str,
    },
    #[error("invalid value for `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
    #[error("failed to read answer links from {origin}: {message}")]
    AnswerLinks { origin: String, message: String },
}

/// Accept bare scalars for text settings.
///
/// Environment values are parsed as typed literals, so an all-digit secret
/// arrives as a number rather than a string.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
        Flag(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Signed(value) => value.to_string(),
        Scalar::Unsigned(value) => value.to_string(),
        Scalar::Float(value) => value.to_string(),
        Scalar::Flag(value) => value.to_string(),
    }))
}

/// Raw settings as loaded from the environment and CLI.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TASKS")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Postgres connection string for the user registry.
    pub database_url: Option<String>,
    /// Redis connection string. The day cache always misses when unset.
    pub redis_url: Option<String>,
    /// Lifetime of a cached day bucket.
    #[ortho_config(default = 21600)]
    pub cache_ttl_seconds: u64,
    /// Cache key template; `{day}` is replaced by the day number.
    pub cache_key_template: Option<String>,
    pub workbook_path: Option<PathBuf>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub worksheet: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub id_column: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub day_column: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub answer_column: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub avatar_column: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub jwt_secret: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub jwt_audience: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub telegram_bot_token: Option<String>,
    /// Telegram chat receiving submissions. Group chat ids are negative.
    pub moderator_chat_id: Option<i64>,
    pub telegram_api_base: Option<String>,
    pub balance_service_url: Option<String>,
    /// JSON deep-link table replacing the bundled one.
    pub answer_links_path: Option<PathBuf>,
    #[ortho_config(default = 30)]
    pub outbound_timeout_seconds: u64,
}

fn required<'a>(
    value: &'a Option<String>,
    field: &'static str,
    env: &'static str,
) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing { field, env })
}

fn text_or(value: Option<&String>, default: &str) -> String {
    value
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .unwrap_or(default)
        .to_owned()
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| ConfigError::Invalid {
            field: "bind_addr",
            message: format!("{raw}: {err}"),
        })
    }

    pub fn database_url(&self) -> Result<&str, ConfigError> {
        required(&self.database_url, "database_url", "TASKS_DATABASE_URL")
    }

    pub fn outbound_timeout(&self) -> Duration {
        Duration::from_secs(self.outbound_timeout_seconds)
    }

    pub fn day_cache(&self) -> DayCacheSettings {
        DayCacheSettings {
            redis_url: self.redis_url.clone().filter(|url| !url.trim().is_empty()),
            ttl: Duration::from_secs(self.cache_ttl_seconds),
            key_template: text_or(self.cache_key_template.as_ref(), DEFAULT_CACHE_KEY_TEMPLATE),
        }
    }

    pub fn sheet(&self) -> SheetSettings {
        SheetSettings {
            workbook_path: self
                .workbook_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKBOOK_PATH)),
            worksheet: text_or(self.worksheet.as_ref(), DEFAULT_WORKSHEET),
        }
    }

    /// Column names of the task sheet, defaulting per column.
    pub fn layout(&self) -> SheetLayout {
        let defaults = SheetLayout::default();
        SheetLayout {
            id_column: text_or(self.id_column.as_ref(), &defaults.id_column),
            day_column: text_or(self.day_column.as_ref(), &defaults.day_column),
            answer_column: text_or(self.answer_column.as_ref(), &defaults.answer_column),
            avatar_column: text_or(self.avatar_column.as_ref(), &defaults.avatar_column),
        }
    }

    pub fn jwt(&self) -> Result<JwtSettings, ConfigError> {
        let secret = required(&self.jwt_secret, "jwt_secret", "TASKS_JWT_SECRET")?;
        Ok(JwtSettings {
            secret: Zeroizing::new(secret.to_owned()),
            audience: text_or(self.jwt_audience.as_ref(), DEFAULT_JWT_AUDIENCE),
        })
    }

    pub fn telegram(&self) -> Result<TelegramSettings, ConfigError> {
        let bot_token = required(
            &self.telegram_bot_token,
            "telegram_bot_token",
            "TASKS_TELEGRAM_BOT_TOKEN",
        )?;
        let chat_id = self.moderator_chat_id.ok_or(ConfigError::Missing {
            field: "moderator_chat_id",
            env: "TASKS_MODERATOR_CHAT_ID",
        })?;
        Ok(TelegramSettings {
            api_base: trim_base(
                self.telegram_api_base
                    .as_deref()
                    .unwrap_or(DEFAULT_TELEGRAM_API_BASE),
            ),
            bot_token: Zeroizing::new(bot_token.to_owned()),
            chat_id,
            timeout: self.outbound_timeout(),
        })
    }

    pub fn balance(&self) -> BalanceSettings {
        BalanceSettings {
            base_url: trim_base(
                self.balance_service_url
                    .as_deref()
                    .unwrap_or(DEFAULT_BALANCE_SERVICE_URL),
            ),
            timeout: self.outbound_timeout(),
        }
    }

    /// Parse the answer deep-link table, from `answer_links_path` when set.
    pub fn load_answer_links(&self) -> Result<AnswerLinks, ConfigError> {
        let (origin, raw) = match &self.answer_links_path {
            Some(path) => {
                let origin = path.display().to_string();
                let raw = fs::read_to_string(path).map_err(|err| ConfigError::AnswerLinks {
                    origin: origin.clone(),
                    message: err.to_string(),
                })?;
                (origin, raw)
            }
            None => (
                BUNDLED_ANSWER_LINKS_ORIGIN.to_owned(),
                BUNDLED_ANSWER_LINKS.to_owned(),
            ),
        };
        AnswerLinks::from_json(&raw).map_err(|err| ConfigError::AnswerLinks {
            origin,
            message: err.to_string(),
        })
    }
}

fn trim_base(raw: &str) -> String {
    raw.trim_end_matches('/').to_owned()
}

/// Day cache connection and key layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCacheSettings {
    pub redis_url: Option<String>,
    pub ttl: Duration,
    pub key_template: String,
}

/// Location of the task sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSettings {
    pub workbook_path: PathBuf,
    pub worksheet: String,
}

/// Token verification parameters.
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: Zeroizing<String>,
    pub audience: String,
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("audience", &self.audience)
            .finish()
    }
}

/// Moderator chat delivery.
#[derive(Clone)]
pub struct TelegramSettings {
    pub api_base: String,
    pub bot_token: Zeroizing<String>,
    pub chat_id: i64,
    pub timeout: Duration,
}

impl std::fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("api_base", &self.api_base)
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Balance service endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSettings {
    pub base_url: String,
    pub timeout: Duration,
}
