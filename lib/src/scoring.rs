use crate::roster::{MatchupRecord, RosterIndex, RosterRecord, UserRecord};
use derive_deref::Deref;
use parse_display::Display;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyScoreRow {
    pub user_id: String,
    pub week: u32,
    pub points: f64,
}

impl WeeklyScoreRow {
    pub fn new(user_id: impl Into<String>, week: u32, points: f64) -> Self {
        Self {
            user_id: user_id.into(),
            week,
            points,
        }
    }
}

/// Week-by-user scores for one season, ordered by week and then by the order
/// the matchups arrived in. Weeks a user did not play have no row.
#[derive(Debug, Clone, Default, PartialEq, Deref)]
pub struct SeasonScoreTable(Vec<WeeklyScoreRow>);

impl SeasonScoreTable {
    pub fn new(rows: Vec<WeeklyScoreRow>) -> Self {
        Self(rows)
    }

    pub fn into_rows(self) -> Vec<WeeklyScoreRow> {
        self.0
    }

    pub fn weeks(&self) -> BTreeSet<u32> {
        self.0.iter().map(|row| row.week).collect()
    }

    pub fn points(&self, user_id: &str, week: u32) -> Option<f64> {
        self.0
            .iter()
            .find(|row| row.week == week && row.user_id == user_id)
            .map(|row| row.points)
    }

    pub(crate) fn retain(self, keep: impl FnMut(&WeeklyScoreRow) -> bool) -> Self {
        let mut rows = self.0;
        rows.retain(keep);
        Self(rows)
    }
}

/// A matchup that could not be joined back to a known user.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ResolutionGap {
    #[display("week {week}: roster {roster_id} is not in the league")]
    UnknownRoster { week: u32, roster_id: u32 },

    #[display("week {week}: roster {roster_id} belongs to unknown user {owner_user_id}")]
    UnknownOwner {
        week: u32,
        roster_id: u32,
        owner_user_id: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateOutcome {
    pub table: SeasonScoreTable,
    pub gaps: Vec<ResolutionGap>,
    /// Matchups skipped because they carry no points yet.
    pub unscored: usize,
}

/// Joins matchups to rosters to users, producing one row per (user, week).
///
/// Matchups that cannot be resolved are dropped and reported as gaps. A user
/// owning several rosters gets their points added into a single row per week.
pub fn aggregate(
    users: &[UserRecord],
    rosters: &[RosterRecord],
    matchups_by_week: &BTreeMap<u32, Vec<MatchupRecord>>,
) -> AggregateOutcome {
    if users.is_empty() || rosters.is_empty() {
        log::debug!(
            "Nothing to aggregate: {} users, {} rosters",
            users.len(),
            rosters.len()
        );
        return AggregateOutcome::default();
    }

    let index = RosterIndex::new(users, rosters);
    let mut rows: Vec<WeeklyScoreRow> = Vec::new();
    let mut positions: HashMap<(&str, u32), usize> = HashMap::new();
    let mut gaps = Vec::new();
    let mut unscored = 0;

    for (&week, matchups) in matchups_by_week {
        for matchup in matchups {
            let Some(points) = matchup.points else {
                unscored += 1;
                continue;
            };
            let Some(owner) = index.owner(matchup.roster_id) else {
                gaps.push(ResolutionGap::UnknownRoster {
                    week,
                    roster_id: matchup.roster_id,
                });
                continue;
            };
            let Some(user) = index.user(owner) else {
                gaps.push(ResolutionGap::UnknownOwner {
                    week,
                    roster_id: matchup.roster_id,
                    owner_user_id: owner.to_string(),
                });
                continue;
            };

            match positions.get(&(user.user_id.as_str(), week)) {
                Some(&position) => {
                    log::debug!(
                        "Week {}: {} owns several rosters, merging roster {}",
                        week,
                        user.user_id,
                        matchup.roster_id
                    );
                    rows[position].points += points;
                }
                None => {
                    positions.insert((user.user_id.as_str(), week), rows.len());
                    rows.push(WeeklyScoreRow::new(&user.user_id, week, points));
                }
            }
        }
    }

    log::debug!(
        "Aggregated {} weekly rows across {} weeks ({} unresolved, {} unscored matchups)",
        rows.len(),
        matchups_by_week.len(),
        gaps.len(),
        unscored
    );
    AggregateOutcome {
        table: SeasonScoreTable(rows),
        gaps,
        unscored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn league() -> (Vec<UserRecord>, Vec<RosterRecord>) {
        let users = vec![UserRecord::new("a", "Alice"), UserRecord::new("b", "Bob")];
        let rosters = vec![RosterRecord::new(100, "a"), RosterRecord::new(101, "b")];
        (users, rosters)
    }

    #[test]
    fn rows_follow_week_then_matchup_order() {
        let (users, rosters) = league();
        let matchups = BTreeMap::from([
            (
                2,
                vec![MatchupRecord::new(2, 100, 80.0), MatchupRecord::new(2, 101, 95.5)],
            ),
            (
                1,
                vec![MatchupRecord::new(1, 101, 60.0), MatchupRecord::new(1, 100, 70.25)],
            ),
        ]);

        let outcome = aggregate(&users, &rosters, &matchups);

        assert!(outcome.gaps.is_empty());
        assert_eq!(
            outcome.table.to_vec(),
            vec![
                WeeklyScoreRow::new("b", 1, 60.0),
                WeeklyScoreRow::new("a", 1, 70.25),
                WeeklyScoreRow::new("a", 2, 80.0),
                WeeklyScoreRow::new("b", 2, 95.5),
            ]
        );
        assert_eq!(outcome.table.points("a", 2), Some(80.0));
        assert_eq!(outcome.table.points("a", 3), None);
    }

    #[test]
    fn unknown_rosters_and_owners_are_dropped() {
        let (users, mut rosters) = league();
        rosters.push(RosterRecord::new(102, "departed"));
        let matchups = BTreeMap::from([(
            1,
            vec![
                MatchupRecord::new(1, 100, 50.0),
                MatchupRecord::new(1, 999, 40.0),
                MatchupRecord::new(1, 102, 30.0),
            ],
        )]);

        let outcome = aggregate(&users, &rosters, &matchups);

        assert_eq!(outcome.table.to_vec(), vec![WeeklyScoreRow::new("a", 1, 50.0)]);
        assert_eq!(
            outcome.gaps,
            vec![
                ResolutionGap::UnknownRoster {
                    week: 1,
                    roster_id: 999
                },
                ResolutionGap::UnknownOwner {
                    week: 1,
                    roster_id: 102,
                    owner_user_id: "departed".to_string()
                },
            ]
        );
        assert_eq!(
            outcome.gaps[0].to_string(),
            "week 1: roster 999 is not in the league"
        );
    }

    #[test]
    fn empty_league_produces_empty_table() {
        let (users, rosters) = league();
        let matchups = BTreeMap::from([(1, vec![MatchupRecord::new(1, 100, 50.0)])]);

        assert_eq!(aggregate(&[], &rosters, &matchups), AggregateOutcome::default());
        assert_eq!(aggregate(&users, &[], &matchups), AggregateOutcome::default());
        assert!(aggregate(&users, &rosters, &BTreeMap::new()).table.is_empty());
    }

    #[test]
    fn co_owned_rosters_merge_into_one_row() {
        let users = vec![UserRecord::new("a", "Alice")];
        let rosters = vec![RosterRecord::new(100, "a"), RosterRecord::new(101, "a")];
        let matchups = BTreeMap::from([(
            1,
            vec![MatchupRecord::new(1, 100, 50.0), MatchupRecord::new(1, 101, 25.0)],
        )]);

        let outcome = aggregate(&users, &rosters, &matchups);

        assert_eq!(outcome.table.to_vec(), vec![WeeklyScoreRow::new("a", 1, 75.0)]);
    }

    #[test]
    fn unscored_matchups_are_counted_not_zeroed() {
        let (users, rosters) = league();
        let matchups = BTreeMap::from([(
            5,
            vec![MatchupRecord::new(5, 100, 64.0), MatchupRecord::unscored(5, 101)],
        )]);

        let outcome = aggregate(&users, &rosters, &matchups);

        assert_eq!(outcome.table.to_vec(), vec![WeeklyScoreRow::new("a", 5, 64.0)]);
        assert_eq!(outcome.table.points("b", 5), None);
        assert_eq!(outcome.unscored, 1);
        assert!(outcome.gaps.is_empty());
    }
}
