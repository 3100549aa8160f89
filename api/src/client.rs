use crate::cache::SummaryCache;
use crate::provider::{Provider, ProviderKind, season_start_year};
use crate::{Game, GameSummary, RosterGroup, StandingsGroup};
use chrono::NaiveDate;
use reqwest::{Client, Url};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    InvalidUrl(String, String),
    MissingKey(&'static str),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::InvalidUrl(e, url) => write!(f, "Invalid URL {url}: {e}"),
            ApiError::MissingKey(provider) => write!(f, "No API key configured for {provider}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// A provider URL plus its query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), query: Vec::new() }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_owned(), value.into()));
        self
    }
}

#[derive(Debug, Clone)]
struct ApiKey {
    header: &'static str,
    value: String,
}

/// Plain JSON GETs. `fetch` never fails: anything that goes wrong is logged
/// and comes back as `None`.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
    api_key: Option<ApiKey>,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent("rinkside/0.1 (terminal scoreboard)")
                .build()
                .unwrap_or_default(),
            timeout,
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, header: &'static str, value: impl Into<String>) -> Self {
        self.api_key = Some(ApiKey { header, value: value.into() });
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn fetch(&self, endpoint: &Endpoint) -> Option<Value> {
        match self.try_fetch(endpoint).await {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("{e}");
                None
            }
        }
    }

    pub async fn try_fetch(&self, endpoint: &Endpoint) -> ApiResult<Value> {
        let url = endpoint.url.as_str();
        let target = if endpoint.query.is_empty() {
            Url::parse(url)
        } else {
            Url::parse_with_params(url, &endpoint.query)
        }
        .map_err(|e| ApiError::InvalidUrl(e.to_string(), url.to_owned()))?;
        let mut request = self.client.get(target).timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.header(key.header, key.value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<Value>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }
}

/// Everything the UI needs to build a [`SportsApi`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub provider: ProviderKind,
    pub api_key: Option<String>,
    pub cache_dir: Option<PathBuf>,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: None,
            cache_dir: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Normalized data together with the payload it came from (for the debug view).
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub data: T,
    pub raw: Value,
}

/// One configured provider behind a fetcher and an optional summary cache.
///
/// Every method returns `None` when the upstream call failed, so callers can
/// tell "could not load" apart from "loaded, nothing there".
pub struct SportsApi {
    fetcher: Fetcher,
    provider: Box<dyn Provider>,
    cache: Option<SummaryCache>,
}

impl SportsApi {
    pub fn new(config: ApiConfig) -> Self {
        let provider = config.provider.build();
        let mut fetcher = Fetcher::new(config.timeout);
        match (provider.api_key_header(), config.api_key) {
            (Some(header), Some(key)) if !key.trim().is_empty() => {
                fetcher = fetcher.with_api_key(header, key.trim());
            }
            (Some(_), _) => log::warn!("{}: no API key configured", provider.name()),
            (None, _) => {}
        }
        let cache = config.cache_dir.map(SummaryCache::new);
        Self::with_parts(fetcher, provider, cache)
    }

    pub fn with_parts(
        fetcher: Fetcher,
        provider: Box<dyn Provider>,
        cache: Option<SummaryCache>,
    ) -> Self {
        Self { fetcher, provider, cache }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn cache(&self) -> Option<&SummaryCache> {
        self.cache.as_ref()
    }

    pub async fn games(&self, date: NaiveDate) -> Option<Loaded<Vec<Game>>> {
        let raw = self.get(&self.provider.schedule(date)).await?;
        let data = self.provider.map_schedule(&raw);
        Some(Loaded { data, raw })
    }

    pub async fn standings(&self, date: NaiveDate) -> Option<Loaded<Vec<StandingsGroup>>> {
        let endpoint = self.provider.standings(season_start_year(date));
        let raw = self.get(&endpoint).await?;
        let data = self.provider.map_standings(&raw);
        Some(Loaded { data, raw })
    }

    /// Summaries of finished games are served from disk when the provider
    /// uses the cache; live games are always refetched.
    pub async fn game_summary(&self, game_id: &str) -> Option<Loaded<GameSummary>> {
        let endpoint = self.provider.summary(game_id);
        let raw = match &self.cache {
            Some(cache) if self.provider.uses_summary_cache() => {
                cache
                    .get_or_fetch(
                        game_id,
                        |blob| self.provider.summary_is_complete(blob),
                        || self.get(&endpoint),
                    )
                    .await?
            }
            _ => self.get(&endpoint).await?,
        };
        let data = self.provider.map_summary(game_id, &raw);
        Some(Loaded { data, raw })
    }

    pub async fn roster(&self, team_id: &str) -> Option<Loaded<Vec<RosterGroup>>> {
        let raw = self.get(&self.provider.roster(team_id)).await?;
        let data = self.provider.map_roster(&raw);
        Some(Loaded { data, raw })
    }

    async fn get(&self, endpoint: &Endpoint) -> Option<Value> {
        if self.provider.api_key_header().is_some() && !self.fetcher.has_api_key() {
            log::warn!("{}", ApiError::MissingKey(self.provider.name()));
            return None;
        }
        self.fetcher.fetch(endpoint).await
    }
}
