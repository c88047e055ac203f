use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::calendar::{FinancialCalendar, DEFAULT_LOOKBACK_DAYS, MAX_LOOKBACK_DAYS};
use crate::clock::{Clock, SystemClock};
use crate::models::{CategoryBuckets, EmojiTable};
use crate::sync::plaid::DEFAULT_BASE_URL;
use crate::sync::TransactionFetcher;

/// Environment variable that overrides the configured access token.
pub const ACCESS_TOKEN_ENV: &str = "FLEXITRACKR_ACCESS_TOKEN";

const CONFIG_FILE_NAME: &str = "flexitrackr.toml";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_lookback_days() -> u32 {
    DEFAULT_LOOKBACK_DAYS
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .map(|s| SecretString::new(s.into_boxed_str())))
}

/// Display/output formatting configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Currency symbol prefixed to `*_display` amounts.
    pub currency_symbol: Option<String>,

    /// When true, render amounts with thousands separators.
    pub currency_grouping: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: Some("$".to_string()),
            currency_grouping: true,
        }
    }
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend's Plaid proxy; `/transactions` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Plaid access token for the linked item.
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub access_token: Option<SecretString>,

    /// Days subtracted from "now" before picking the financial month.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// IANA timezone used for "today". Defaults to the system's local zone.
    pub timezone: Option<String>,

    /// Show Plaid's `merchant_name` instead of the raw name when available.
    pub prefer_merchant_name: bool,

    /// Spending category cards, keyed by a stable bucket id.
    pub buckets: CategoryBuckets,

    /// Extra or replacement glyphs keyed by secondary category.
    pub emoji: HashMap<String, String>,

    /// Glyph for secondary categories missing from the table.
    pub default_emoji: Option<String>,

    /// Display/output formatting settings.
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            lookback_days: default_lookback_days(),
            timezone: None,
            prefer_merchant_name: false,
            buckets: CategoryBuckets::default(),
            emoji: HashMap::new(),
            default_emoji: None,
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lookback_days > MAX_LOOKBACK_DAYS {
            anyhow::bail!(
                "lookback_days must be at most {MAX_LOOKBACK_DAYS}, got {}",
                self.lookback_days
            );
        }
        self.parsed_timezone()?;
        Ok(())
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "Config file not found; using defaults");
            Ok(Self::default())
        }
    }

    /// Resolve the access token, preferring `env_value` (normally the
    /// `FLEXITRACKR_ACCESS_TOKEN` variable) over the config file.
    pub fn resolve_access_token(&self, env_value: Option<String>) -> Result<SecretString> {
        if let Some(token) = env_value.filter(|s| is_usable_token(s)) {
            return Ok(SecretString::new(token.into_boxed_str()));
        }

        if let Some(token) = &self.access_token {
            return Ok(SecretString::new(token.expose_secret().into()));
        }

        anyhow::bail!(
            "No access token configured. Set access_token in the config file or {ACCESS_TOKEN_ENV}."
        );
    }

    /// Whether [`Config::resolve_access_token`] would find a token.
    pub fn has_access_token(&self, env_value: Option<&str>) -> bool {
        env_value.is_some_and(is_usable_token) || self.access_token.is_some()
    }

    pub fn parsed_timezone(&self) -> Result<Option<Tz>> {
        self.timezone
            .as_deref()
            .map(str::trim)
            .filter(|tz| !tz.is_empty() && !tz.eq_ignore_ascii_case("local"))
            .map(|tz| {
                tz.parse::<Tz>().map_err(|err| {
                    anyhow::anyhow!(
                        "Invalid timezone '{tz}' (expected IANA name, e.g. America/New_York): {err}"
                    )
                })
            })
            .transpose()
    }

    pub fn clock(&self) -> Result<SystemClock> {
        Ok(match self.parsed_timezone()? {
            Some(tz) => SystemClock::in_timezone(tz),
            None => SystemClock::new(),
        })
    }

    pub fn calendar(&self) -> FinancialCalendar {
        FinancialCalendar::with_lookback_days(self.lookback_days)
    }

    pub fn emoji_table(&self) -> EmojiTable {
        let table = EmojiTable::default().with_overrides(self.emoji.clone());
        match &self.default_emoji {
            Some(default) => table.with_default(default.clone()),
            None => table,
        }
    }

    pub fn fetcher(&self, clock: Arc<dyn Clock>) -> TransactionFetcher {
        TransactionFetcher::new(self.base_url.clone())
            .with_emoji_table(self.emoji_table())
            .with_clock(clock)
            .with_merchant_names(self.prefer_merchant_name)
    }
}

fn is_usable_token(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./flexitrackr.toml` if it exists in current directory
/// 2. `<config dir>/flexitrackr/flexitrackr.toml` (XDG config directory)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from(CONFIG_FILE_NAME);
    if local_config.exists() {
        return local_config;
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("flexitrackr").join(CONFIG_FILE_NAME);
    }

    local_config
}
