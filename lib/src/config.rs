use crate::error::Error;
use crate::filter::{ReliabilityFilter, DEFAULT_THRESHOLD};
use crate::{Result, Season};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_WEEKS: u32 = 18;
pub const DEFAULT_TOKEN_ENV: &str = "SHEETS_ACCESS_TOKEN";

/// Run configuration, loaded once and passed to every season explicitly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// League id per season. Seasons with an empty id are skipped.
    pub league_ids: BTreeMap<Season, String>,

    #[serde(default)]
    pub spreadsheet_id: Option<String>,

    #[serde(default)]
    pub players_file: Option<PathBuf>,

    #[serde(default = "default_threshold")]
    pub reliability_threshold: usize,

    /// Regular season length; weeks `1..=weeks` are fetched.
    #[serde(default = "default_weeks")]
    pub weeks: u32,

    /// The in-progress season. Defaults to the current calendar year.
    #[serde(default)]
    pub current_season: Option<Season>,

    /// Whether the in-progress season goes through the reliability filter.
    #[serde(default)]
    pub filter_current_season: bool,

    #[serde(default = "default_token_env")]
    pub sheets_token_env: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_threshold() -> usize {
    DEFAULT_THRESHOLD
}

fn default_weeks() -> u32 {
    DEFAULT_WEEKS
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

fn default_api_base_url() -> String {
    crate::sleeper::DEFAULT_BASE_URL.to_string()
}

impl Config {
    pub fn new(league_ids: BTreeMap<Season, String>) -> Self {
        Self {
            league_ids,
            spreadsheet_id: None,
            players_file: None,
            reliability_threshold: DEFAULT_THRESHOLD,
            weeks: DEFAULT_WEEKS,
            current_season: None,
            filter_current_season: false,
            sheets_token_env: default_token_env(),
            api_base_url: default_api_base_url(),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        log::info!("Loading configuration from {}", path.as_ref().display());
        let config: Self = crate::load_json(path)?;
        config.validate()?;
        log::debug!("Configuration {:#?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.weeks == 0 {
            return Err(Error::Config("weeks must be at least 1".to_string()));
        }
        if self.league_ids.values().all(|id| id.trim().is_empty()) {
            return Err(Error::Config("no league ids configured".to_string()));
        }
        Ok(())
    }

    /// Configured seasons with a league id, in season order.
    pub fn leagues(&self) -> impl Iterator<Item = (Season, &str)> {
        self.league_ids
            .iter()
            .map(|(&season, id)| (season, id.trim()))
            .filter(|(_, id)| !id.is_empty())
    }

    pub fn league_id(&self, season: Season) -> Option<&str> {
        self.leagues()
            .find(|&(configured, _)| configured == season)
            .map(|(_, id)| id)
    }

    pub fn current_season(&self) -> Season {
        self.current_season.unwrap_or_else(Season::current)
    }

    pub fn reliability_filter(&self) -> ReliabilityFilter {
        ReliabilityFilter::new(self.reliability_threshold)
    }

    /// Whether `season` goes through the reliability filter.
    pub fn filters(&self, season: Season) -> bool {
        self.filter_current_season || season != self.current_season()
    }
}
