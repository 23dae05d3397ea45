use crate::{Position, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const UNKNOWN_PLAYER: &str = "Unknown Player";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub player_id: String,
    pub full_name: String,
    pub position: Option<Position>,
    pub team: Option<String>,
}

// One entry of the provider's players dump; every field is optional there.
#[derive(Debug, Deserialize)]
struct RawPlayer {
    full_name: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    position: Option<String>,
    team: Option<String>,
}

impl RawPlayer {
    fn into_player(self, player_id: String) -> Player {
        let joined = [self.first_name, self.last_name]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let full_name = self
            .full_name
            .filter(|name| !name.trim().is_empty())
            .or_else(|| Some(joined).filter(|name| !name.trim().is_empty()))
            .unwrap_or_else(|| UNKNOWN_PLAYER.to_string());

        Player {
            player_id,
            full_name,
            position: self.position.and_then(|position| position.parse().ok()),
            team: self.team,
        }
    }
}

/// Loads the players lookup (player id to metadata) from a JSON dump.
pub fn load_players<P: AsRef<Path>>(path: P) -> Result<HashMap<String, Player>> {
    log::info!("Loading players from {}", path.as_ref().display());
    let raw: HashMap<String, RawPlayer> = crate::load_json(path)?;
    let players: HashMap<String, Player> = raw
        .into_iter()
        .map(|(player_id, player)| (player_id.clone(), player.into_player(player_id)))
        .collect();
    log::info!("Loaded {} players", players.len());
    Ok(players)
}

pub fn player_name<'a>(players: &'a HashMap<String, Player>, player_id: &str) -> &'a str {
    players
        .get(player_id)
        .map(|player| player.full_name.as_str())
        .unwrap_or(UNKNOWN_PLAYER)
}
