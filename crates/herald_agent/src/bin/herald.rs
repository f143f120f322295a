//! herald - autonomous posting and mention replies on X.

use clap::{Parser, Subcommand};
use herald_agent::{
    AgentConfig, AgentMetrics, AgentServer, AutonomousPoster, PostOutcome, WeightedSelector,
    serve_status_api,
};
use herald_interface::{ContentPublisher, MentionSource};
use herald_models::build_generator;
use herald_social::{DryRunPublisher, XClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(about = "Autonomous social posting agent")]
#[command(version)]
struct Cli {
    /// Configuration file layered over the bundled defaults
    #[arg(short, long, global = true, env = "HERALD_CONFIG")]
    config: Option<PathBuf>,

    /// Debug-level logging when RUST_LOG is unset
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run both loops until interrupted
    Run {
        /// Log posts and replies instead of publishing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Load and validate configuration, then exit
    Validate {
        /// Print the resolved configuration as TOML
        #[arg(long)]
        print: bool,
    },
    /// Run a single posting cycle
    PostOnce {
        /// Log the post instead of publishing it
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<AgentConfig, Box<dyn std::error::Error>> {
    let config = AgentConfig::load(path.map(PathBuf::as_path))?;
    for warning in config.validate()? {
        warn!(%warning, "Configuration warning");
    }
    info!(
        topics = config.topics.len(),
        provider = ?config.model.provider,
        model = %config.model.model,
        "Configuration loaded"
    );
    Ok(config)
}

fn publisher_for(
    config: &AgentConfig,
    dry_run: bool,
) -> Result<(Arc<dyn ContentPublisher>, Option<Arc<XClient>>), Box<dyn std::error::Error>> {
    if dry_run {
        info!("DRY RUN MODE - nothing will be published");
        let x = match XClient::from_settings(&config.social) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!(error = %e, "No platform credentials, mentions will not be fetched");
                None
            }
        };
        let publisher: Arc<dyn ContentPublisher> =
            Arc::new(DryRunPublisher::new(config.social.max_chars));
        Ok((publisher, x))
    } else {
        let x = Arc::new(XClient::from_settings(&config.social)?);
        let publisher: Arc<dyn ContentPublisher> = x.clone();
        Ok((publisher, Some(x)))
    }
}

async fn run(config: AgentConfig, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let generator = build_generator(&config.model)?;
    let (publisher, x) = publisher_for(&config, dry_run)?;
    let source = x.map(|client| client as Arc<dyn MentionSource>);

    let metrics = AgentMetrics::new();
    let server = AgentServer::from_config(&config, generator, publisher, source, metrics.clone())?;
    let stop = server.stop_handle();

    if let Some(bind) = config.api.bind {
        let signal = stop.signal();
        tokio::spawn(async move {
            if let Err(e) = serve_status_api(bind, metrics, signal).await {
                error!(error = %e, "Status API stopped");
            }
        });
    }

    let ctrl_c_stop = stop.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Interrupt received, stopping after current cycles"),
            Err(e) => error!(error = %e, "Failed to listen for interrupt, stopping"),
        }
        ctrl_c_stop.stop();
    });

    server.run().await;
    Ok(())
}

async fn post_once(config: AgentConfig, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let generator = build_generator(&config.model)?;
    let (publisher, _) = publisher_for(&config, dry_run)?;
    let selector = WeightedSelector::new(config.topics.clone())?;
    let mut poster = AutonomousPoster::new(selector, generator, publisher, Arc::new(config.style));

    match poster.run_cycle().await? {
        PostOutcome::Published { topic, post } => {
            println!("Published {} (topic: {})", post.id, topic);
        }
        PostOutcome::Skipped { topic } => {
            println!("Nothing published, generator returned empty text (topic: {})", topic);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    match cli.command {
        Command::Run { dry_run } => {
            let config = load_config(cli.config.as_ref())?;
            run(config, dry_run).await?;
        }
        Command::Validate { print } => {
            let config = load_config(cli.config.as_ref())?;
            if print {
                println!("{}", toml::to_string_pretty(&config)?);
            }
            println!("Configuration is valid");
        }
        Command::PostOnce { dry_run } => {
            let config = load_config(cli.config.as_ref())?;
            post_once(config, dry_run).await?;
        }
    }

    Ok(())
}
