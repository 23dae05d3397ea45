use crate::roster::UserRecord;
use crate::scoring::SeasonScoreTable;
use crate::Season;
use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSummaryRow {
    pub user_id: String,
    pub display_name: String,
    pub season_total: f64,
    pub season: Season,
}

/// Highest total first, then user id ascending.
pub(crate) fn rank_order(a: &SeasonSummaryRow, b: &SeasonSummaryRow) -> Ordering {
    b.season_total
        .total_cmp(&a.season_total)
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Rolls a season's retained weekly rows into one total per user.
pub fn summarize(
    season: Season,
    table: &SeasonScoreTable,
    users: &[UserRecord],
) -> Vec<SeasonSummaryRow> {
    let names: HashMap<&str, &str> = users
        .iter()
        .map(|user| (user.user_id.as_str(), user.display_name.as_str()))
        .collect();

    let summary: Vec<SeasonSummaryRow> = table
        .iter()
        .map(|row| (row.user_id.as_str(), row.points))
        .into_group_map()
        .into_iter()
        .map(|(user_id, weekly)| SeasonSummaryRow {
            user_id: user_id.to_string(),
            display_name: names.get(user_id).copied().unwrap_or("N/A").to_string(),
            season_total: weekly.iter().sum(),
            season,
        })
        .sorted_by(rank_order)
        .collect();

    if let Some(top) = summary.first() {
        log::info!(
            "{} season: {} users, top scorer {} with {:.2}",
            season,
            summary.len(),
            top.display_name,
            top.season_total
        );
    }
    summary
}

pub fn top_scorer(summary: &[SeasonSummaryRow]) -> Option<&SeasonSummaryRow> {
    summary.iter().min_by(|a, b| rank_order(a, b))
}
