//! Sleeper API record fetching.
//!
//! Raw JSON is decoded into wire structs and validated into typed records
//! here, so nothing ill-formed reaches the scoring pipeline.

use crate::error::DataSourceError;
use crate::roster::{MatchupRecord, RosterRecord, StarterPoints, UserRecord};
use crate::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.sleeper.app/v1";

type FetchResult<T> = std::result::Result<T, DataSourceError>;

/// Source of league records for a single league.
pub trait RecordFetcher {
    fn fetch_users(&self, league_id: &str) -> FetchResult<Vec<UserRecord>>;

    fn fetch_rosters(&self, league_id: &str) -> FetchResult<Vec<RosterRecord>>;

    fn fetch_matchups(&self, league_id: &str, week: u32) -> FetchResult<Vec<MatchupRecord>>;

    /// Fetches weeks `1..=weeks`, keyed by week.
    fn fetch_season_matchups(
        &self,
        league_id: &str,
        weeks: u32,
    ) -> FetchResult<BTreeMap<u32, Vec<MatchupRecord>>> {
        let mut season = BTreeMap::new();
        for week in 1..=weeks {
            let matchups = self.fetch_matchups(league_id, week)?;
            log::debug!("Week {}: {} matchups", week, matchups.len());
            season.insert(week, matchups);
        }
        Ok(season)
    }
}

#[derive(Debug, Deserialize)]
struct SleeperUser {
    user_id: Option<String>,
    username: Option<String>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SleeperRoster {
    roster_id: Option<u32>,
    owner_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SleeperMatchup {
    roster_id: Option<u32>,
    points: Option<f64>,
    #[serde(default)]
    starters: Option<Vec<String>>,
    #[serde(default)]
    starters_points: Option<Vec<f64>>,
}

fn invalid(kind: &'static str, reason: String) -> DataSourceError {
    DataSourceError::Invalid { kind, reason }
}

fn users_from_wire(raw: Vec<SleeperUser>) -> FetchResult<Vec<UserRecord>> {
    let mut seen = HashSet::new();
    let mut users = Vec::with_capacity(raw.len());
    for user in raw {
        let user_id = user
            .user_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| invalid("user", "missing user_id".to_string()))?;
        if !seen.insert(user_id.clone()) {
            return Err(invalid("user", format!("duplicate user_id {}", user_id)));
        }
        let display_name = user
            .display_name
            .or(user.username)
            .unwrap_or_else(|| "Unknown".to_string());
        users.push(UserRecord {
            user_id,
            display_name,
        });
    }
    Ok(users)
}

fn rosters_from_wire(raw: Vec<SleeperRoster>) -> FetchResult<Vec<RosterRecord>> {
    let mut seen = HashSet::new();
    let mut rosters = Vec::with_capacity(raw.len());
    for roster in raw {
        let roster_id = roster
            .roster_id
            .ok_or_else(|| invalid("roster", "missing roster_id".to_string()))?;
        if !seen.insert(roster_id) {
            return Err(invalid("roster", format!("duplicate roster_id {}", roster_id)));
        }
        match roster.owner_id.filter(|id| !id.is_empty()) {
            Some(owner_user_id) => rosters.push(RosterRecord {
                roster_id,
                owner_user_id,
            }),
            None => log::warn!("Roster {} has no owner, skipping", roster_id),
        }
    }
    Ok(rosters)
}

fn matchups_from_wire(week: u32, raw: Vec<SleeperMatchup>) -> FetchResult<Vec<MatchupRecord>> {
    let mut matchups = Vec::with_capacity(raw.len());
    for matchup in raw {
        let roster_id = matchup
            .roster_id
            .ok_or_else(|| invalid("matchup", format!("week {}: missing roster_id", week)))?;
        let Some(points) = matchup.points else {
            log::debug!("Week {}: roster {} has no points yet", week, roster_id);
            matchups.push(MatchupRecord::unscored(week, roster_id));
            continue;
        };
        if !points.is_finite() || points < 0.0 {
            return Err(invalid(
                "matchup",
                format!("week {}: roster {} has points {}", week, roster_id, points),
            ));
        }

        let player_ids = matchup.starters.unwrap_or_default();
        let starter_points = matchup.starters_points.unwrap_or_default();
        if player_ids.len() != starter_points.len() {
            return Err(invalid(
                "matchup",
                format!(
                    "week {}: roster {} has {} starters but {} starter scores",
                    week,
                    roster_id,
                    player_ids.len(),
                    starter_points.len()
                ),
            ));
        }
        let starters = player_ids
            .into_iter()
            .zip(starter_points)
            .map(|(player_id, points)| StarterPoints { player_id, points })
            .collect();
        matchups.push(MatchupRecord::new(week, roster_id, points).with_starters(starters));
    }
    Ok(matchups)
}

pub struct SleeperClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl SleeperClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("sleeper-sheets/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(SleeperClient {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// GETs `path` and decodes it; a JSON `null` body decodes as empty.
    fn get<T: DeserializeOwned>(&self, path: &str, kind: &'static str) -> FetchResult<Vec<T>> {
        let url = format!("{}/{}", self.base_url, path);
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send();
        let response = match response {
            Ok(resp) => resp,
            Err(source) => return Err(DataSourceError::Http { url, source }),
        };
        let status = response.status();
        if !status.is_success() {
            return Err(DataSourceError::Status { url, status });
        }

        let body = match response.text() {
            Ok(body) => body,
            Err(source) => return Err(DataSourceError::Http { url, source }),
        };
        let records: Option<Vec<T>> = serde_json::from_str(&body)
            .map_err(|source| DataSourceError::Decode { url, kind, source })?;
        Ok(records.unwrap_or_default())
    }
}

impl RecordFetcher for SleeperClient {
    fn fetch_users(&self, league_id: &str) -> FetchResult<Vec<UserRecord>> {
        let raw = self.get(&format!("league/{}/users", league_id), "user")?;
        let users = users_from_wire(raw)?;
        log::info!("Fetched {} users for league {}", users.len(), league_id);
        Ok(users)
    }

    fn fetch_rosters(&self, league_id: &str) -> FetchResult<Vec<RosterRecord>> {
        let raw = self.get(&format!("league/{}/rosters", league_id), "roster")?;
        let rosters = rosters_from_wire(raw)?;
        log::info!("Fetched {} rosters for league {}", rosters.len(), league_id);
        Ok(rosters)
    }

    fn fetch_matchups(&self, league_id: &str, week: u32) -> FetchResult<Vec<MatchupRecord>> {
        let raw = self.get(&format!("league/{}/matchups/{}", league_id, week), "matchup")?;
        matchups_from_wire(week, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode<T: DeserializeOwned>(json: &str) -> Vec<T> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn users_fall_back_to_username() {
        let raw = decode(
            r#"[
                {"user_id": "1", "display_name": "Alice", "username": "alice", "avatar": null},
                {"user_id": "2", "username": "bob"},
                {"user_id": "3"}
            ]"#,
        );

        let users = users_from_wire(raw).unwrap();

        assert_eq!(
            users,
            vec![
                UserRecord::new("1", "Alice"),
                UserRecord::new("2", "bob"),
                UserRecord::new("3", "Unknown"),
            ]
        );
    }

    #[test]
    fn users_without_id_are_rejected() {
        let raw = decode(r#"[{"display_name": "Nobody"}]"#);
        assert!(matches!(
            users_from_wire(raw),
            Err(DataSourceError::Invalid { kind: "user", .. })
        ));

        let raw = decode(r#"[{"user_id": "1"}, {"user_id": "1"}]"#);
        assert!(users_from_wire(raw).is_err());
    }

    #[test]
    fn orphan_rosters_are_skipped() {
        let raw = decode(
            r#"[
                {"roster_id": 1, "owner_id": "u1", "players": ["4046"]},
                {"roster_id": 2, "owner_id": null}
            ]"#,
        );

        let rosters = rosters_from_wire(raw).unwrap();

        assert_eq!(rosters, vec![RosterRecord::new(1, "u1")]);
    }

    #[test]
    fn duplicate_roster_ids_are_rejected() {
        let raw = decode(r#"[{"roster_id": 1, "owner_id": "a"}, {"roster_id": 1, "owner_id": "b"}]"#);
        assert!(rosters_from_wire(raw).is_err());
    }

    #[test]
    fn matchups_carry_starter_points() {
        let raw = decode(
            r#"[
                {"roster_id": 1, "matchup_id": 1, "points": 101.5,
                 "starters": ["4046", "6794"], "starters_points": [30.1, 12.0]},
                {"roster_id": 2, "matchup_id": 1, "points": null},
                {"roster_id": 3, "matchup_id": 2, "points": 0}
            ]"#,
        );

        let matchups = matchups_from_wire(4, raw).unwrap();

        assert_eq!(matchups.len(), 3);
        assert_eq!(matchups[0].week, 4);
        assert_eq!(matchups[0].starters.len(), 2);
        assert_eq!(matchups[0].starters[0].player_id, "4046");
        assert_eq!(matchups[1], MatchupRecord::unscored(4, 2));
        assert_eq!(matchups[2], MatchupRecord::new(4, 3, 0.0));
    }

    #[test]
    fn mismatched_starter_scores_are_rejected() {
        let raw = decode(
            r#"[{"roster_id": 1, "points": 88.0,
                 "starters": ["4046", "6794"], "starters_points": [30.1]}]"#,
        );
        assert!(matches!(
            matchups_from_wire(2, raw),
            Err(DataSourceError::Invalid { kind: "matchup", .. })
        ));

        let raw = decode(r#"[{"roster_id": 1, "points": 88.0, "starters_points": [30.1]}]"#);
        assert!(matchups_from_wire(2, raw).is_err());
    }

    #[test]
    fn negative_points_are_rejected() {
        let raw = decode(r#"[{"roster_id": 1, "points": -3.5}]"#);
        assert!(matches!(
            matchups_from_wire(1, raw),
            Err(DataSourceError::Invalid { kind: "matchup", .. })
        ));
    }

    #[test]
    fn null_body_decodes_as_empty() {
        let records: Option<Vec<SleeperUser>> = serde_json::from_str("null").unwrap();
        assert!(records.unwrap_or_default().is_empty());
    }
}
