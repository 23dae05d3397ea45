use crate::summary::{rank_order, top_scorer, SeasonSummaryRow};
use crate::Season;
use parse_display::Display;
use std::collections::BTreeMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum LeaderboardScope {
    #[display("{0}")]
    Season(Season),
    #[display("Overall")]
    Overall,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    pub scope: LeaderboardScope,
    /// The season the total was scored in; for the overall row, the season of
    /// the record.
    pub season: Season,
    pub user_id: String,
    pub display_name: String,
    pub total: f64,
}

impl LeaderboardRow {
    fn top_of(season: Season, top: &SeasonSummaryRow) -> Self {
        Self {
            scope: LeaderboardScope::Season(season),
            season,
            user_id: top.user_id.clone(),
            display_name: top.display_name.clone(),
            total: top.season_total,
        }
    }
}

/// Builds the cross-season leaderboard: each season's top scorer in season
/// order, followed by the single best season overall.
pub fn reduce(summaries: &BTreeMap<Season, Vec<SeasonSummaryRow>>) -> Vec<LeaderboardRow> {
    let mut board: Vec<LeaderboardRow> = summaries
        .iter()
        .filter_map(|(&season, summary)| {
            top_scorer(summary).map(|top| LeaderboardRow::top_of(season, top))
        })
        .collect();

    let overall = summaries
        .values()
        .flatten()
        .min_by(|a, b| rank_order(a, b).then_with(|| a.season.cmp(&b.season)))
        .map(|best| LeaderboardRow {
            scope: LeaderboardScope::Overall,
            ..LeaderboardRow::top_of(best.season, best)
        });

    if let Some(best) = &overall {
        log::info!(
            "League record: {} with {:.2} in {}",
            best.display_name,
            best.total,
            best.season
        );
    }
    board.extend(overall);
    board
}
