use std::env;
use std::path::PathBuf;
use std::time::Duration;

use studysync_core::model::OnboardingVariant;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_STREAM_TIMEOUT_SECS: u64 = 600;

/// Backend location and client behaviour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Longest wait between two stream events; `None` waits forever.
    pub stream_timeout: Option<Duration>,
    pub onboarding: OnboardingVariant,
    /// Where calendar exports are saved; resolved lazily when unset.
    pub download_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stream_timeout: Some(Duration::from_secs(DEFAULT_STREAM_TIMEOUT_SECS)),
            onboarding: OnboardingVariant::default(),
            download_dir: None,
        }
    }
}

impl ApiConfig {
    /// Read `STUDYSYNC_*` variables, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unparsable timeout or onboarding variant.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] with an injectable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unparsable timeout or onboarding variant.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(base_url) = value("STUDYSYNC_API_URL") {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(raw) = value("STUDYSYNC_STREAM_TIMEOUT_SECS") {
            config.stream_timeout = parse_stream_timeout(&raw)?;
        }
        if let Some(raw) = value("STUDYSYNC_ONBOARDING") {
            config.onboarding = raw.parse()?;
        }
        if let Some(dir) = value("STUDYSYNC_DOWNLOAD_DIR") {
            config.download_dir = Some(PathBuf::from(dir));
        }
        Ok(config)
    }
}

/// Parse a timeout in whole seconds; `0` disables it.
///
/// # Errors
///
/// Returns `ConfigError::InvalidTimeout` for anything but a non-negative integer.
pub fn parse_stream_timeout(raw: &str) -> Result<Option<Duration>, ConfigError> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidTimeout(raw.to_string()))?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}
