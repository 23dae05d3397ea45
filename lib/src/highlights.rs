use crate::players::{player_name, Player};
use crate::roster::{MatchupRecord, RosterIndex, RosterRecord, StarterPoints, UserRecord};
use std::collections::{BTreeMap, HashMap};

const UNKNOWN_USER: &str = "Unknown";

/// The best individual starter of a week and who started them.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyHighScorer {
    pub week: u32,
    pub player_id: String,
    pub player_name: String,
    pub points: f64,
    pub user_id: Option<String>,
    pub display_name: String,
}

/// Finds each week's highest-scoring starter, in week order.
///
/// Stops at the first week without starters or whose best starter scored
/// exactly 0, which is how the provider reports weeks that have not been
/// played.
pub fn weekly_high_scorers(
    users: &[UserRecord],
    rosters: &[RosterRecord],
    matchups_by_week: &BTreeMap<u32, Vec<MatchupRecord>>,
    players: &HashMap<String, Player>,
) -> Vec<WeeklyHighScorer> {
    let index = RosterIndex::new(users, rosters);
    let mut scorers = Vec::new();

    for (&week, matchups) in matchups_by_week {
        let mut best: Option<(&MatchupRecord, &StarterPoints)> = None;
        for matchup in matchups {
            for starter in &matchup.starters {
                if best.map_or(true, |(_, top)| starter.points > top.points) {
                    best = Some((matchup, starter));
                }
            }
        }

        let Some((matchup, starter)) = best.filter(|(_, starter)| starter.points != 0.0) else {
            log::info!("Week {} has not started or has no points", week);
            break;
        };

        let owner = index.resolve(matchup.roster_id);
        let scorer = WeeklyHighScorer {
            week,
            player_id: starter.player_id.clone(),
            player_name: player_name(players, &starter.player_id).to_string(),
            points: starter.points,
            user_id: owner.map(|user| user.user_id.clone()),
            display_name: owner
                .map(|user| user.display_name.clone())
                .unwrap_or_else(|| UNKNOWN_USER.to_string()),
        };
        log::debug!(
            "Week {} high scorer: {} ({:.2}) for {}",
            week,
            scorer.player_name,
            scorer.points,
            scorer.display_name
        );
        scorers.push(scorer);
    }

    scorers
}
