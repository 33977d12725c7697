use anyhow::Result;
use clap::{Parser, Subcommand};
use pickem_league::api::{OddsApiClient, OddsFeed};
use pickem_league::engine::grade_pick;
use pickem_league::models::Sport;
use pickem_league::Config;

#[derive(Parser)]
#[command(name = "pickem", about = "Pick'em league operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch raw odds from the configured feed and print them
    Fetch {
        #[arg(long, default_value = "nfl")]
        sport: String,
    },
    /// Grade a hypothetical pick against a final score
    Grade {
        #[arg(long)]
        picked_team: String,
        #[arg(long)]
        home_team: String,
        #[arg(long)]
        away_team: String,
        #[arg(long)]
        home_score: i32,
        #[arg(long)]
        away_score: i32,
        /// Spread for the picked team (negative = favored)
        #[arg(long, allow_hyphen_values = true)]
        spread: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { sport } => {
            let sport: Sport = sport.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let config = Config::from_env()?;
            let client = OddsApiClient::new(config.odds_api_url, config.odds_api_key)?;

            let records = client.fetch_raw_odds(sport).await;
            if records.is_empty() {
                println!("No odds available (feed empty or unreachable).");
            }
            for record in &records {
                println!(
                    "{} | {} @ {} | home {:+.1} / away {:+.1} | kickoff {}",
                    record.external_id,
                    record.away_team,
                    record.home_team,
                    record.home_spread,
                    record.away_spread,
                    record
                        .commence_time
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "unknown".to_string())
                );
            }
        }
        Commands::Grade {
            picked_team,
            home_team,
            away_team,
            home_score,
            away_score,
            spread,
        } => {
            let outcome = grade_pick(
                &picked_team,
                &home_team,
                &away_team,
                home_score,
                away_score,
                spread,
            );
            println!(
                "{} ({:+.1}) with final {}-{}: {:?}",
                picked_team, spread, home_score, away_score, outcome
            );
        }
    }

    Ok(())
}
