//! Layered settings: built-in defaults, an optional TOML file, then
//! `CIVIC_*` environment variables.

use crate::analytics::{
    AnalyticsOptions, ResponsePolicy, TrendWindow, DEFAULT_TREND_MONTHS, MAX_TREND_MONTHS,
};
use crate::error::Result;
use crate::storage::StorageConfig;
use chrono::NaiveDate;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "civic.toml";
pub const ENV_PREFIX: &str = "CIVIC";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub data_path: Option<PathBuf>,
    pub response: ResponsePolicy,
    pub analytics: AnalyticsSettings,
    pub feed: FeedSettings,
    pub notifications: NotificationSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AnalyticsSettings {
    pub trend_months: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FeedSettings {
    pub interval_secs: u64,
    pub capacity: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct NotificationSettings {
    pub interval_secs: u64,
    pub capacity: usize,
    /// Chance that a tick produces a notification.
    pub probability: f64,
}

impl Settings {
    /// Loads settings, reading `path` if given or `civic.toml` if present.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let settings: Settings = Self::builder()?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults only, ignoring files and environment.
    pub fn defaults() -> Result<Self> {
        Ok(Self::builder()?.build()?.try_deserialize()?)
    }

    /// Rejects values the engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        let months = self.analytics.trend_months;
        if !(1..=MAX_TREND_MONTHS).contains(&months) {
            return Err(ConfigError::Message(format!(
                "analytics.trend_months must be between 1 and {} (got {})",
                MAX_TREND_MONTHS, months
            ))
            .into());
        }
        Ok(())
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let policy = ResponsePolicy::default();
        Ok(Config::builder()
            .set_default("response.avg_first_response_hours", policy.avg_first_response_hours)?
            .set_default("response.sla_compliance", policy.sla_compliance)?
            .set_default("analytics.trend_months", i64::from(DEFAULT_TREND_MONTHS))?
            .set_default("feed.interval_secs", 8)?
            .set_default("feed.capacity", 10)?
            .set_default("notifications.interval_secs", 15)?
            .set_default("notifications.capacity", 20)?
            .set_default("notifications.probability", 0.3)?)
    }

    pub fn analytics_options(&self, as_of: NaiveDate) -> AnalyticsOptions {
        AnalyticsOptions {
            policy: self.response,
            trends: TrendWindow {
                months: self.analytics.trend_months,
                as_of,
            },
        }
    }

    /// Storage backed by `data_path`, or the built-in dataset.
    pub fn storage(&self) -> StorageConfig {
        StorageConfig::memory(self.data_path.clone())
    }

    pub fn feed_interval(&self) -> Duration {
        Duration::from_secs(self.feed.interval_secs.max(1))
    }

    pub fn notification_interval(&self) -> Duration {
        Duration::from_secs(self.notifications.interval_secs.max(1))
    }
}
