use chrono::Datelike;
use parse_display::{Display, FromStr};
use serde::{de::DeserializeOwned, Deserialize};
use std::path::Path;

pub mod config;
mod error;
pub mod filter;
pub mod google;
pub mod highlights;
pub mod leaderboard;
pub mod pipeline;
pub mod players;
pub mod roster;
pub mod scoring;
pub mod sheets;
pub mod sleeper;
pub mod summary;

pub use config::Config;
pub use error::{DataSourceError, Error, PublishError};
pub use filter::ReliabilityFilter;

type Result<T> = std::result::Result<T, error::Error>;

/// A league season, identified by its calendar year.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, FromStr, Deserialize,
)]
#[display("{0}")]
#[serde(try_from = "RawSeason")]
pub struct Season(pub u16);

impl Season {
    /// The season for the current calendar year.
    pub fn current() -> Self {
        let year = chrono::Local::now().year();
        Season(u16::try_from(year).unwrap_or(u16::MAX))
    }
}

// Config files spell seasons either as map keys ("2023") or as plain numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSeason {
    Number(u16),
    Text(String),
}

impl TryFrom<RawSeason> for Season {
    type Error = parse_display::ParseError;

    fn try_from(raw: RawSeason) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawSeason::Number(year) => Ok(Season(year)),
            RawSeason::Text(text) => text.trim().parse(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Display, FromStr)]
#[display(style = "UPPERCASE")]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    K,
    Def,
}

pub fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let file = std::fs::File::open(path)?;
    let value = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(value)
}
