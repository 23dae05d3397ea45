use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use itertools::Itertools;
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use sleeper_sheets::google::GoogleSheets;
use sleeper_sheets::pipeline;
use sleeper_sheets::players::load_players;
use sleeper_sheets::sheets::{CsvDirectory, SheetPublisher};
use sleeper_sheets::sleeper::SleeperClient;
use sleeper_sheets::{Config, Season};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(short = 'c', long = "config", value_name = "FILE", default_value = "config.json")]
    config: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every configured season and publish the sheets
    Run {
        /// Write CSV files to this directory instead of Google Sheets
        #[arg(long, value_name = "DIR")]
        csv_dir: Option<PathBuf>,

        /// Zero-point weeks allowed before a user is dropped
        #[arg(short = 't', long)]
        threshold: Option<usize>,
    },

    /// Show each week's highest-scoring starter for a season
    HighScorers {
        #[arg(short = 's', long)]
        season: Season,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set the default level based on verbosity
    let default_level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let log_config = ConfigBuilder::new()
        .add_filter_allow_str("sleeper_sheets")
        .build();

    TermLogger::init(
        default_level,
        log_config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    log::trace!("Args {:#?}", args);

    let mut config = Config::load(&args.config)?;
    let fetcher = SleeperClient::new(&config.api_base_url)?;

    match args.command {
        Command::Run { csv_dir, threshold } => {
            if let Some(threshold) = threshold {
                config.reliability_threshold = threshold;
            }

            let publisher: Box<dyn SheetPublisher> = match (csv_dir, &config.spreadsheet_id) {
                (Some(dir), _) => Box::new(CsvDirectory::new(dir)),
                (None, Some(spreadsheet_id)) => Box::new(GoogleSheets::from_env(
                    spreadsheet_id,
                    &config.sheets_token_env,
                )?),
                (None, None) => bail!("No spreadsheet_id configured. Set one or pass --csv-dir"),
            };

            let report = pipeline::run(&config, &fetcher, publisher.as_ref());
            for (season, err) in &report.skipped {
                eprintln!("Skipped {} season: {}", season, err);
            }
            log::info!(
                "{} unresolved and {} unscored matchups dropped, {} inactive users excluded",
                report.gap_count(),
                report.unscored_count(),
                report.excluded_count()
            );
            for row in &report.leaderboard {
                println!(
                    "{:>8}  {:<24} {:>10.2}  ({})",
                    row.scope.to_string(),
                    row.display_name,
                    row.total,
                    row.season
                );
            }
            report.into_result()?;
        }
        Command::HighScorers { season } => {
            let players = match &config.players_file {
                Some(path) => load_players(path).unwrap_or_else(|err| {
                    log::warn!("Continuing without player names: {}", err);
                    HashMap::new()
                }),
                None => HashMap::new(),
            };

            let scorers = pipeline::high_scorers(&config, &fetcher, season, &players)?;
            if scorers.is_empty() {
                println!("No weeks with points yet for {}", season);
                return Ok(());
            }
            println!(
                "{}",
                scorers
                    .iter()
                    .map(|s| format!(
                        "Week {:>2}  {:<24} {:>6.2}  {}",
                        s.week, s.player_name, s.points, s.display_name
                    ))
                    .join("\n")
            );
        }
    }

    Ok(())
}
