use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use rust_recipe_agent::api::{self, AppState, ServiceStatus};
use rust_recipe_agent::commands::{CommandHandler, CommandOutcome};
use rust_recipe_agent::config::{clamp_poll_interval, AppConfig};
use rust_recipe_agent::food::api::{NutritionProvider, NutritionixClient};
use rust_recipe_agent::food::RecipeOrchestrator;
use rust_recipe_agent::providers::traits::CompletionProvider;
use rust_recipe_agent::providers::NebiusProvider;
use rust_recipe_agent::scanner::ScanSource;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Serve the HTTP API instead of the interactive prompt
    #[arg(long)]
    api: bool,

    #[arg(long, default_value = "3000")]
    port: u16,

    /// Scan artifact written by the fridge camera
    #[arg(long, conflicts_with = "scan_url")]
    scan_file: Option<PathBuf>,

    /// Fetch the scan artifact over HTTP instead of from disk
    #[arg(long)]
    scan_url: Option<String>,

    #[arg(long)]
    capture_url: Option<String>,

    /// Seconds between scan checks in `watch start` (2-30)
    #[arg(long)]
    poll_interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = AppConfig::from_env().context("Invalid configuration")?;
    if let Some(url) = &args.capture_url {
        config.scan.capture_url = Some(url.trim_end_matches('/').to_string());
    }
    if let Some(secs) = args.poll_interval {
        config.scan.poll_interval = clamp_poll_interval(secs);
    }

    let scan_source = match (&args.scan_url, &args.scan_file) {
        (Some(url), _) => ScanSource::Url(url.clone()),
        (None, Some(path)) => ScanSource::File(path.clone()),
        (None, None) => ScanSource::File(config.scan.output_path.clone()),
    };

    let orchestrator = build_orchestrator(&config)?;

    if args.api {
        run_api_server(args.port, orchestrator, scan_source).await
    } else {
        run_cli_mode(orchestrator, scan_source, &config).await
    }
}

fn build_orchestrator(config: &AppConfig) -> Result<RecipeOrchestrator> {
    let nutrition = NutritionixClient::new(&config.food).context("Failed to create Nutritionix client")?;
    let generator = NebiusProvider::new(&config.generation).context("Failed to create Nebius provider")?;

    log::info!(
        "Using {} for nutrition and {} for recipes",
        nutrition.name(),
        generator.get_model_info()
    );

    Ok(RecipeOrchestrator::new(Arc::new(nutrition), Arc::new(generator)).with_timeout(config.request_timeout))
}

async fn run_cli_mode(orchestrator: RecipeOrchestrator, scan_source: ScanSource, config: &AppConfig) -> Result<()> {
    colored::control::set_override(true);

    let mut command_handler = CommandHandler::new(Arc::new(orchestrator), scan_source, config.scan.capture_url.clone())
        .map_err(anyhow::Error::msg)?
        .with_poll_interval(config.scan.poll_interval);

    println!("{}", "🧊 Fridge Recipe Agent".bold().bright_cyan());
    if let Err(e) = command_handler.handle_command("help").await {
        println!("{}", e.red());
    }

    let mut rl = Editor::<(), DefaultHistory>::new()?;

    loop {
        match rl.readline("🍳 ") {
            Ok(line) => {
                let input = line.trim();
                if !input.is_empty() {
                    let _ = rl.add_history_entry(input);
                }

                match command_handler.handle_command(input).await {
                    Ok(CommandOutcome::Exit) => break,
                    Ok(CommandOutcome::Continue) => {}
                    Err(e) => println!("{}", e.red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    command_handler.shutdown().await;
    Ok(())
}

async fn run_api_server(port: u16, orchestrator: RecipeOrchestrator, scan_source: ScanSource) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    // Configuration was validated above, so both services have credentials.
    let services = ServiceStatus {
        nutritionix: true,
        nebius: true,
    };
    let state = AppState::new(orchestrator, services, scan_source).context("Failed to set up scan access")?;
    let app = api::create_api(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    log::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
