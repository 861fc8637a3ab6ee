mod config;

use ambienco_assistant::Corpus;
use ambienco_gateway::{GatewayOptions, GatewayServer};
use ambienco_security::{hash_password, AdminAuth, RateLimiter};
use ambienco_store::FileKvStore;
use clap::{Parser, Subcommand};
use config::AmbiencoConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// How often idle rate-limit buckets and expired admin tokens are dropped.
const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Parser)]
#[command(name = "ambienco", about = "Ambienco lighting site backend and assistant")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "ambienco.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Ask the assistant one question and print the reply
    Ask {
        /// The question
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Inspect knowledge corpora
    Corpus {
        #[command(subcommand)]
        action: CorpusAction,
    },
    /// Print the SHA-256 hex of a password, for `[admin].password_sha256`
    HashPassword {
        /// Plain-text password
        password: String,
    },
}

#[derive(Subcommand)]
enum CorpusAction {
    /// List the entries of the configured corpus
    List,
    /// Validate a corpus file
    Check {
        /// TOML or JSON corpus file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AmbiencoConfig::load(&cli.config).await?;
    config.apply_env(|key| std::env::var(key).ok());

    // Relative corpus paths are resolved against the config file's directory
    let config_dir = cli
        .config
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."))
        .to_path_buf();

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            serve(&config, &config_dir, &host, port).await?;
        }
        Commands::Ask { query } => {
            let assistant = config.assistant(&config_dir)?;
            let reply = assistant.reply(&query.join(" "));
            match &reply.category {
                Some(category) => println!("[{category}]"),
                None => println!("[no match]"),
            }
            println!("{}", reply.response);
            if let Some(follow_up) = reply.follow_up_message() {
                println!("\n{follow_up}");
            }
        }
        Commands::Corpus { action } => match action {
            CorpusAction::List => {
                let assistant = config.assistant(&config_dir)?;
                let corpus = assistant.corpus();
                println!("Knowledge entries (first match wins ties):");
                for (i, entry) in corpus.entries().iter().enumerate() {
                    println!("  {:>2}. {}: {}", i + 1, entry.category, entry.keywords.join(", "));
                }
                println!("\nTotal: {} entr(y/ies)", corpus.len());
            }
            CorpusAction::Check { path } => {
                let corpus = Corpus::load(&path)?;
                let follow_ups: usize = corpus.entries().iter().map(|e| e.follow_ups.len()).sum();
                println!(
                    "{}: OK ({} entries, {} follow-ups)",
                    path.display(),
                    corpus.len(),
                    follow_ups
                );
            }
        },
        Commands::HashPassword { password } => {
            println!("{}", hash_password(&password));
        }
    }

    Ok(())
}

async fn serve(
    config: &AmbiencoConfig,
    config_dir: &std::path::Path,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    info!("Starting Ambienco gateway on {}:{}", host, port);

    let rate_limiter = Arc::new(RateLimiter::new(
        config.security.max_burst,
        config.security.max_requests_per_second,
    ));

    let credentials = config.admin_credentials();
    if credentials.is_none() {
        warn!("No admin account configured, admin endpoints will reject every request");
    }
    let auth = Arc::new(AdminAuth::new(credentials, config.token_ttl()));

    let store = Arc::new(FileKvStore::new(config.data_dir.join("kv")).await?);

    let assistant = config.assistant(config_dir)?;
    info!(entries = assistant.corpus().len(), "Knowledge corpus loaded");

    spawn_maintenance(rate_limiter.clone(), auth.clone());

    let app = GatewayServer::build_with_options(
        store,
        assistant,
        auth,
        GatewayOptions {
            rate_limiter: Some(rate_limiter),
            pacing: config.pacing(),
            max_message_length: config.security.max_message_length,
        },
    );

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Ambienco gateway listening on {}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Ambienco gateway stopped");
    Ok(())
}

fn spawn_maintenance(rate_limiter: Arc<RateLimiter>, auth: Arc<AdminAuth>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(MAINTENANCE_INTERVAL);
        loop {
            ticker.tick().await;
            rate_limiter.cleanup(MAINTENANCE_INTERVAL * 2).await;
            let purged = auth.purge_expired().await;
            if purged > 0 {
                info!(purged, "Expired admin sessions dropped");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
