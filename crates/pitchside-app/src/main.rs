// Pitchside entry point.
//
// Startup sequence:
// 1. Load config (copying defaults on first run)
// 2. Initialize tracing (log to file, not terminal)
// 3. Build the HTTP gateway and the planner
// 4. Preload player data and fixtures
// 5. Spawn the stdin reader task
// 6. Run the command loop until `quit` or end of input

use std::path::Path;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use pitchside_app::command::HELP;
use pitchside_app::planner::Planner;
use pitchside_app::{app, config};
use pitchside_gateway::HttpGateway;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    init_tracing(Path::new(&config.logging.dir))?;
    info!(
        base_url = %config.gateway.base_url,
        budget = config.planner.budget,
        "Pitchside starting up"
    );

    // 3. Gateway and planner
    let gateway = HttpGateway::new(config.gateway.clone(), &config.cache)
        .context("failed to build data gateway")?;
    let mut planner = Planner::new(gateway, config.planner.clone());

    // 4. Preload; commands retry the load on demand if this fails
    println!("Loading player data from {} ...", config.gateway.base_url);
    match planner.load().await {
        Ok(()) => {
            if let Ok(catalog) = planner.catalog() {
                println!(
                    "{} players loaded, gameweek {}.",
                    catalog.players().len(),
                    planner.current_gameweek()
                );
            }
        }
        Err(e) => {
            warn!(error = %e, "initial load failed");
            println!("Could not load player data ({e}); it will be retried on demand.");
        }
    }
    println!("{HELP}");

    // 5. Stdin reader
    let (line_tx, line_rx) = mpsc::channel(64);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    // 6. Command loop
    let mut stdout = tokio::io::stdout();
    app::run(line_rx, &mut stdout, &mut planner)
        .await
        .context("command loop failed")?;

    reader.abort();
    info!("Pitchside shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which carries the
/// command interface).
fn init_tracing(log_dir: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join(log_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("pitchside.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("pitchside_app=info,pitchside_core=info,pitchside_gateway=info,warn")
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
