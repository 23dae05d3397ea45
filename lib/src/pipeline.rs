//! Season-by-season scoring runs.
//!
//! Each configured season is fetched, aggregated, filtered, summarized and
//! published on its own. A season whose records cannot be fetched is skipped;
//! publish failures are collected and reported once every season has run.

use crate::error::{DataSourceError, Error, PublishError};
use crate::filter::FilterOutcome;
use crate::highlights::{weekly_high_scorers, WeeklyHighScorer};
use crate::leaderboard::{reduce, LeaderboardRow};
use crate::players::Player;
use crate::scoring::{aggregate, AggregateOutcome, ResolutionGap, SeasonScoreTable};
use crate::sheets::{leaderboard_sheet, season_sheet, SheetPublisher};
use crate::sleeper::RecordFetcher;
use crate::summary::{summarize, SeasonSummaryRow};
use crate::{Config, Result, Season};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonReport {
    pub season: Season,
    pub league_id: String,
    /// Matchup records fetched across all weeks.
    pub matchups: usize,
    /// Fetched matchups without points, left out of the table.
    pub unscored: usize,
    /// Retained weekly rows.
    pub table: SeasonScoreTable,
    pub gaps: Vec<ResolutionGap>,
    /// Users dropped by the reliability filter.
    pub excluded: Vec<String>,
    /// False when the season was exempt from the reliability filter.
    pub filtered: bool,
    pub summary: Vec<SeasonSummaryRow>,
}

impl SeasonReport {
    fn empty(season: Season, league_id: &str) -> Self {
        Self {
            season,
            league_id: league_id.to_string(),
            matchups: 0,
            unscored: 0,
            table: SeasonScoreTable::default(),
            gaps: Vec::new(),
            excluded: Vec::new(),
            filtered: false,
            summary: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub seasons: Vec<SeasonReport>,
    pub skipped: Vec<(Season, DataSourceError)>,
    pub leaderboard: Vec<LeaderboardRow>,
    pub publish_failures: Vec<PublishError>,
}

impl RunReport {
    pub fn summaries(&self) -> BTreeMap<Season, Vec<SeasonSummaryRow>> {
        self.seasons
            .iter()
            .map(|report| (report.season, report.summary.clone()))
            .collect()
    }

    pub fn gap_count(&self) -> usize {
        self.seasons.iter().map(|report| report.gaps.len()).sum()
    }

    pub fn unscored_count(&self) -> usize {
        self.seasons.iter().map(|report| report.unscored).sum()
    }

    pub fn excluded_count(&self) -> usize {
        self.seasons.iter().map(|report| report.excluded.len()).sum()
    }

    /// Fails with every publish error, once the whole run is done.
    pub fn into_result(self) -> Result<Self> {
        if self.publish_failures.is_empty() {
            Ok(self)
        } else {
            Err(Error::Publish(self.publish_failures))
        }
    }
}

/// Fetches and scores one season: aggregate, filter, then summarize.
pub fn process_season<F: RecordFetcher + ?Sized>(
    config: &Config,
    fetcher: &F,
    season: Season,
    league_id: &str,
) -> std::result::Result<SeasonReport, DataSourceError> {
    log::info!("Processing {} season (league {})", season, league_id);

    let users = fetcher.fetch_users(league_id)?;
    let rosters = fetcher.fetch_rosters(league_id)?;
    if users.is_empty() || rosters.is_empty() {
        log::warn!("No users or rosters for the {} season", season);
        return Ok(SeasonReport::empty(season, league_id));
    }

    let matchups_by_week = fetcher.fetch_season_matchups(league_id, config.weeks)?;
    let matchups: usize = matchups_by_week.values().map(Vec::len).sum();

    let AggregateOutcome {
        table,
        gaps,
        unscored,
    } = aggregate(&users, &rosters, &matchups_by_week);
    for gap in &gaps {
        log::warn!("{} season: dropped matchup, {}", season, gap);
    }

    let filtered = config.filters(season);
    let FilterOutcome { table, excluded } = if filtered {
        config.reliability_filter().apply(table)
    } else {
        log::info!(
            "{} is the current season, skipping the reliability filter",
            season
        );
        FilterOutcome {
            table,
            excluded: Vec::new(),
        }
    };

    let summary = summarize(season, &table, &users);
    log::info!(
        "{} season: {} rows, {} users, {} excluded, {} unresolved and {} unscored matchups",
        season,
        table.len(),
        summary.len(),
        excluded.len(),
        gaps.len(),
        unscored
    );

    Ok(SeasonReport {
        season,
        league_id: league_id.to_string(),
        matchups,
        unscored,
        table,
        gaps,
        excluded,
        filtered,
        summary,
    })
}

/// Runs every configured season, publishing each season sheet and then the
/// cross-season leaderboard.
pub fn run<F, P>(config: &Config, fetcher: &F, publisher: &P) -> RunReport
where
    F: RecordFetcher + ?Sized,
    P: SheetPublisher + ?Sized,
{
    let mut report = RunReport::default();

    for (season, league_id) in config.leagues() {
        let season_report = match process_season(config, fetcher, season, league_id) {
            Ok(season_report) => season_report,
            Err(err) => {
                log::error!("Skipping the {} season: {}", season, err);
                report.skipped.push((season, err));
                continue;
            }
        };

        if season_report.summary.is_empty() {
            log::warn!("No data available for the {} season", season);
        } else {
            let sheet = season_sheet(
                season,
                &season_report.table,
                &season_report.summary,
                config.weeks,
            );
            if let Err(err) = publisher.publish(&sheet) {
                log::error!("Failed to publish the {} season: {}", season, err);
                report.publish_failures.push(err);
            }
        }
        report.seasons.push(season_report);
    }

    report.leaderboard = reduce(&report.summaries());
    if report.leaderboard.is_empty() {
        log::warn!("No season produced a leaderboard entry");
    } else if let Err(err) = publisher.publish(&leaderboard_sheet(&report.leaderboard)) {
        log::error!("Failed to publish the leaderboard: {}", err);
        report.publish_failures.push(err);
    }

    log::info!(
        "Run complete: {} seasons scored, {} skipped, {} publish failures",
        report.seasons.len(),
        report.skipped.len(),
        report.publish_failures.len()
    );
    report
}

/// Each week's best starter for one configured season.
pub fn high_scorers<F: RecordFetcher + ?Sized>(
    config: &Config,
    fetcher: &F,
    season: Season,
    players: &HashMap<String, Player>,
) -> Result<Vec<WeeklyHighScorer>> {
    let league_id = config
        .league_id(season)
        .ok_or_else(|| Error::Config(format!("no league configured for {}", season)))?;

    let users = fetcher.fetch_users(league_id)?;
    let rosters = fetcher.fetch_rosters(league_id)?;
    let matchups_by_week = fetcher.fetch_season_matchups(league_id, config.weeks)?;

    Ok(weekly_high_scorers(
        &users,
        &rosters,
        &matchups_by_week,
        players,
    ))
}
