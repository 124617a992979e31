use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fest_tracker::api::{build_router, dedup_by_key, state::AppState};
use fest_tracker::config::AppConfig;
use fest_tracker::models::{ResultRecord, ResultStatus};
use fest_tracker::parse_duration;
use fest_tracker::scoring::{aggregate, rank_totals, AggregationConfig, AggregationMode};
use fest_tracker::snapshot;
use fest_tracker::storage::{EntityType, JsonlStore, StorageConfig};

#[derive(Parser)]
#[command(name = "fest-tracker")]
#[command(about = "Festival competition tracker with result review and leaderboards")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print leaderboard standings
    Standings {
        /// Aggregation mode: "team" or "individual"
        #[arg(long, default_value = "team")]
        mode: String,

        /// Result status to aggregate (pending, checked, published)
        #[arg(long, default_value = "published")]
        status: String,

        /// Only show entities that scored
        #[arg(long)]
        winners_only: bool,

        /// Max rows to print
        #[arg(long, default_value = "25")]
        limit: usize,

        /// Re-run on an interval instead of once
        #[arg(long)]
        watch: bool,

        /// Refresh interval for --watch (e.g. "30s", "5m")
        #[arg(long, default_value = "30s")]
        interval: String,
    },

    /// Administer the result review queue
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },
}

#[derive(Subcommand)]
enum ReviewAction {
    /// List results in a status bucket
    List {
        #[arg(long, default_value = "pending")]
        status: String,

        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Move a single result to a new status
    Set {
        id: String,

        #[arg(long)]
        status: String,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Move several results to a new status
    Bulk {
        #[arg(long)]
        status: String,

        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting fest-tracker v{}", env!("CARGO_PKG_VERSION"));

    // Config file is optional; CLI flags override it.
    let config_path = std::path::PathBuf::from(&cli.config);
    let config = if config_path.exists() {
        AppConfig::from_file(&config_path)?
    } else {
        AppConfig::default()
    };
    let data_dir = cli
        .data_dir
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| config.data_dir.clone());
    let storage = StorageConfig::new(data_dir);

    match cli.command {
        Commands::Serve { host, port } => {
            let state = AppState::new(storage);
            let app = build_router(state);
            let addr = format!(
                "{}:{}",
                host.unwrap_or(config.server.host),
                port.unwrap_or(config.server.port)
            );
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Standings {
            mode,
            status,
            winners_only,
            limit,
            watch,
            interval,
        } => {
            let mode = match mode.as_str() {
                "individual" => AggregationMode::Individual,
                "team" => AggregationMode::Team,
                other => {
                    eprintln!("Unknown mode: {}. Use 'team' or 'individual'.", other);
                    return Ok(());
                }
            };
            let status: ResultStatus = match status.parse() {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("{}", e);
                    return Ok(());
                }
            };
            let config = AggregationConfig {
                mode,
                status_filter: status,
                seed_all_entities: !winners_only,
            };

            let refresh = parse_duration(&interval).unwrap_or(Duration::from_secs(30));
            loop {
                print_standings(&storage, &config, limit).await?;
                if !watch {
                    break;
                }
                tokio::time::sleep(refresh).await;
            }
        }
        Commands::Review { action } => match action {
            ReviewAction::List { status, limit } => {
                let status: ResultStatus = match status.parse() {
                    Ok(s) => s,
                    Err(e) => {
                        eprintln!("{}", e);
                        return Ok(());
                    }
                };

                let store =
                    JsonlStore::<ResultRecord>::for_entity(&storage, EntityType::Result);
                let results = store.read_all()?;
                let results = dedup_by_key(results, |r| r.id.as_str().to_string());

                let matching: Vec<&ResultRecord> =
                    results.iter().filter(|r| r.status == status).collect();
                println!("=== Results in '{}' ({}) ===\n", status, matching.len());
                for result in matching.iter().take(limit) {
                    println!(
                        "  {}  programme={}  section={}  entered={}",
                        result.id,
                        result.programme_id,
                        result.section,
                        result.created_at.format("%Y-%m-%d %H:%M"),
                    );
                }
            }
            ReviewAction::Set { id, status, notes } => {
                let status: ResultStatus = match status.parse() {
                    Ok(s) => s,
                    Err(e) => {
                        eprintln!("{}", e);
                        return Ok(());
                    }
                };

                let store =
                    JsonlStore::<ResultRecord>::for_entity(&storage, EntityType::Result);
                let results = store.read_all()?;
                let mut results = dedup_by_key(results, |r| r.id.as_str().to_string());

                let Some(target) = results.iter_mut().find(|r| r.id.as_str() == id) else {
                    eprintln!("No result with id {}", id);
                    return Ok(());
                };
                match target.transition_to(status, notes) {
                    Ok(()) => {
                        store.write_all(&results)?;
                        println!("Result {} moved to '{}'", id, status);
                    }
                    Err(e) => eprintln!("Refused: {}", e),
                }
            }
            ReviewAction::Bulk { status, ids } => {
                let status: ResultStatus = match status.parse() {
                    Ok(s) => s,
                    Err(e) => {
                        eprintln!("{}", e);
                        return Ok(());
                    }
                };

                let store =
                    JsonlStore::<ResultRecord>::for_entity(&storage, EntityType::Result);
                let results = store.read_all()?;
                let mut results = dedup_by_key(results, |r| r.id.as_str().to_string());

                let mut moved = 0u32;
                let mut skipped = 0u32;
                for result in results.iter_mut() {
                    if !ids.iter().any(|id| id == result.id.as_str()) {
                        continue;
                    }
                    match result.transition_to(status, None) {
                        Ok(()) => moved += 1,
                        Err(_) => skipped += 1,
                    }
                }

                if moved > 0 {
                    store.write_all(&results)?;
                }
                println!("Moved {} result(s) to '{}', skipped {}", moved, status, skipped);
            }
        },
    }

    Ok(())
}

/// Load a snapshot and print ranked standings to stdout.
async fn print_standings(
    storage: &StorageConfig,
    config: &AggregationConfig,
    limit: usize,
) -> Result<()> {
    let snapshot = match snapshot::load(storage).await {
        Ok(s) => s,
        Err(e) => {
            // Partial data never feeds the aggregator.
            tracing::error!("Snapshot load failed: {}", e);
            return Ok(());
        }
    };

    let totals = aggregate(
        &snapshot.results,
        &snapshot.teams,
        &snapshot.candidates,
        &snapshot.participants,
        config,
    );
    let ranked = rank_totals(totals);

    let label = match config.mode {
        AggregationMode::Team => "Team",
        AggregationMode::Individual => "Candidate",
    };
    println!(
        "\n=== {} standings ({} results) ===\n",
        label, config.status_filter
    );
    println!(
        "{:>4}  {:<12} {:>8} {:>6} {:>6} {:>8}",
        "#", label, "Points", "Wins", "G/S/B", "Rate"
    );
    for entry in ranked.iter().take(limit) {
        let name = match config.mode {
            AggregationMode::Team => snapshot
                .teams
                .iter()
                .find(|t| t.code == entry.key)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| entry.key.clone()),
            AggregationMode::Individual => snapshot
                .candidates
                .iter()
                .find(|c| c.chest_number == entry.key)
                .map(|c| format!("{} ({})", c.name, c.chest_number))
                .unwrap_or_else(|| entry.key.clone()),
        };
        println!(
            "{:>4}  {:<12} {:>8} {:>6} {:>6} {:>7.1}%",
            entry.rank,
            name,
            entry.totals.points.round(),
            entry.totals.wins,
            format!(
                "{}/{}/{}",
                entry.totals.medals.gold, entry.totals.medals.silver, entry.totals.medals.bronze
            ),
            entry.totals.win_rate(),
        );
    }

    Ok(())
}
