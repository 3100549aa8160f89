use log::LevelFilter;
use rink_api::client::{ApiConfig, DEFAULT_TIMEOUT};
use rink_api::provider::ProviderKind;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REFRESH: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: LevelFilter,
    pub provider: ProviderKind,
    pub sportsdata_key: Option<String>,
    pub sportradar_key: Option<String>,
    /// `None` disables the summary cache.
    pub cache_dir: Option<PathBuf>,
    pub refresh: Duration,
    pub timeout: Duration,
    /// Problems found while reading the environment. Logged once the logger
    /// is up, since settings are read before it exists.
    pub warnings: Vec<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: LevelFilter::Warn,
            provider: ProviderKind::default(),
            sportsdata_key: None,
            sportradar_key: None,
            cache_dir: None,
            refresh: DEFAULT_REFRESH,
            timeout: DEFAULT_TIMEOUT,
            warnings: Vec::new(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key/value source; `load` passes the process
    /// environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| get(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let mut settings = Self::default();

        if let Some(raw) = var("RINKSIDE_PROVIDER") {
            match raw.parse() {
                Ok(kind) => settings.provider = kind,
                Err(e) => settings.warnings.push(format!("RINKSIDE_PROVIDER: {e}")),
            }
        }

        if let Some(raw) = var("RINKSIDE_LOG") {
            match raw.parse() {
                Ok(level) => settings.log_level = level,
                Err(_) => settings
                    .warnings
                    .push(format!("RINKSIDE_LOG: unknown level '{raw}'")),
            }
        }

        settings.sportsdata_key = var("RINKSIDE_SPORTSDATA_KEY");
        settings.sportradar_key = var("RINKSIDE_SPORTRADAR_KEY");

        if let Some(secs) = seconds(&var, "RINKSIDE_REFRESH_SECS", &mut settings.warnings) {
            settings.refresh = secs;
        }
        if let Some(secs) = seconds(&var, "RINKSIDE_TIMEOUT_SECS", &mut settings.warnings) {
            settings.timeout = secs;
        }

        settings.cache_dir = var("RINKSIDE_CACHE_DIR")
            .map(PathBuf::from)
            .or_else(default_cache_dir);

        settings
    }

    /// Key for the configured provider, if it takes one.
    pub fn api_key(&self) -> Option<String> {
        match self.provider {
            ProviderKind::SportsData => self.sportsdata_key.clone(),
            ProviderKind::Sportradar => self.sportradar_key.clone(),
            ProviderKind::Espn | ProviderKind::NhlStats => None,
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            provider: self.provider,
            api_key: self.api_key(),
            cache_dir: self.cache_dir.clone(),
            timeout: self.timeout,
        }
    }
}

/// The platform cache directory (`~/.cache/rinkside` on Linux).
fn default_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("rinkside"))
}

fn seconds(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    warnings: &mut Vec<String>,
) -> Option<Duration> {
    let raw = var(key)?;
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warnings.push(format!("{key}: expected a positive number of seconds, got '{raw}'"));
            None
        }
    }
}
