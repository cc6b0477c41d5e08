use clap::{Parser, Subcommand};
use color_eyre::Result;
use log::info;

mod aggregate;
mod changelog;
mod config;
mod diff;
mod fetch;
mod market;
mod render;
mod snapshot;
mod storage;
mod time;
mod tracker;

use crate::config::Config;
use crate::time::Timestamp;
use crate::tracker::Tracker;

#[derive(Parser)]
#[command(name = "showtimes", version, about = "Track new movies and screenings per market")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the current schedule into the market's temp snapshot
    Fetch { market: String },

    /// Print movies that are new since the cached snapshot
    Movies {
        market: String,
        #[arg(long)]
        markdown: bool,
    },

    /// Print screenings that went on sale since the cached snapshot
    Screenings {
        market: String,
        #[arg(long)]
        plain: bool,
    },

    /// Add a dated section to markets/<market>.md if anything changed
    Changelog { market: String },

    /// Replace the cached snapshot with the temp one
    Cleanup { market: String },

    /// Fetch, update the changelog and clean up, one market after another
    Run {
        /// Defaults to every known market
        markets: Vec<String>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let tracker = Tracker::from_config(&config)?;

    match cli.cmd {
        Command::Fetch { market } => tracker.fetch(&market)?,
        Command::Movies { market, markdown } => {
            let report = tracker.report(&market)?;
            if !report.new_titles.is_empty() {
                println!("{}", render::render_title_list(&report.new_titles, markdown));
            }
        }
        Command::Screenings { market, plain } => {
            let report = tracker.report(&market)?;
            let block = if plain {
                render::render_plain_text(&[], &report.screenings)
            } else {
                render::render_markdown(&[], &report.screenings, &market)
            };
            print!("{block}");
        }
        Command::Changelog { market } => {
            tracker.update_changelog(&market, Timestamp::now())?;
        }
        Command::Cleanup { market } => tracker.cleanup(&market)?,
        Command::Run { markets } => {
            let markets = if markets.is_empty() {
                tracker.registry().slugs().map(str::to_owned).collect()
            } else {
                markets
            };
            for market in &markets {
                let written = tracker.run(market, Timestamp::now())?;
                let outcome = if written { "changelog updated" } else { "no changes" };
                info!("{market}: done ({outcome})");
            }
        }
    }

    Ok(())
}
