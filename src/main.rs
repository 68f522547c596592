use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bizflow_automation::nodes::webhook::build_http_client;
use bizflow_automation::{AutomationService, NodeDispatcher, WorkflowExecutor};
use bizflow_core::config::AppConfig;
use bizflow_core::types::{Caller, UserRole};
use bizflow_gateway::GatewayServer;
use bizflow_store::{AutomationBundle, SqliteStore};

#[derive(Parser)]
#[command(name = "bizflow", version, about = "Business automation workflow service")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "bizflow.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve,
    /// Run an automation once and print the result
    Run {
        /// Automation ID
        automation_id: String,
        /// Trigger payload as JSON (default: {})
        #[arg(short, long)]
        trigger: Option<String>,
        /// User the run is recorded for
        #[arg(short, long, default_value = "cli")]
        user: String,
    },
    /// Load automations and space members from a JSON bundle
    Import {
        /// Bundle file
        file: PathBuf,
    },
    /// Show recent executions of an automation
    Executions {
        /// Automation ID
        automation_id: String,
        /// Maximum number of executions to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Show current configuration
    Config,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bizflow=info,warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // Handle completions before config loading
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "bizflow", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
        Commands::Import { file } => {
            let store = open_store(&config)?;
            let content = std::fs::read_to_string(&file)?;
            let bundle = AutomationBundle::from_json(&content)?;
            let count = store.import_bundle(&bundle)?;
            println!(
                "Imported {} automation(s) and {} space member(s) from {}",
                count,
                bundle.space_members.len(),
                file.display()
            );
        }
        Commands::Run {
            automation_id,
            trigger,
            user,
        } => {
            let trigger_data = match trigger {
                Some(raw) => serde_json::from_str(&raw)?,
                None => serde_json::json!({}),
            };
            let service = build_service(&config, open_store(&config)?)?;
            let report = service
                .execute(&local_caller(user), &automation_id, trigger_data)
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Executions {
            automation_id,
            limit,
        } => {
            let service = build_service(&config, open_store(&config)?)?;
            let executions = service
                .executions(&local_caller("cli".to_string()), &automation_id, limit)
                .await?;
            if executions.is_empty() {
                println!("No executions for {}", automation_id);
            }
            for e in executions {
                println!(
                    "{}  {:<9}  {:>6}ms  {}{}",
                    e.started_at.format("%Y-%m-%d %H:%M:%S"),
                    e.status.as_str(),
                    e.duration_ms.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                    e.id,
                    e.error.map(|err| format!("  {}", err)).unwrap_or_default()
                );
            }
        }
        Commands::Serve => {
            let store = open_store(&config)?;
            let service = build_service(&config, store)?;
            let server = GatewayServer::new(config.gateway.clone(), service);
            let cancel = tokio_util::sync::CancellationToken::new();
            let cancel_clone = cancel.clone();

            // Graceful shutdown on Ctrl-C
            tokio::spawn(async move {
                tokio::signal::ctrl_c().await.ok();
                info!("Shutting down gateway...");
                cancel_clone.cancel();
            });

            server.run(cancel).await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    if path.exists() {
        info!(path = %path.display(), "Loading config");
    } else {
        eprintln!(
            "Warning: {} not found, using defaults (log-only email, no API keys)",
            path.display()
        );
    }
    Ok(AppConfig::load_or_default(path)?)
}

fn open_store(config: &AppConfig) -> anyhow::Result<Arc<SqliteStore>> {
    let path = config.database_path();
    let store = SqliteStore::open(&path)?;
    info!(path = %path.display(), "Database ready");
    Ok(Arc::new(store))
}

fn build_service(
    config: &AppConfig,
    store: Arc<SqliteStore>,
) -> anyhow::Result<Arc<AutomationService>> {
    let email = bizflow_mail::build_email_sender(&config.email)?;
    info!(sender = email.name(), "Email sender configured");
    let http = build_http_client(&config.webhook)?;

    let dispatcher = NodeDispatcher::new(email, store.clone(), http);
    let executor = Arc::new(WorkflowExecutor::new(dispatcher));
    Ok(Arc::new(AutomationService::new(store, executor)))
}

/// Local CLI runs act as a system administrator.
fn local_caller(user: String) -> Caller {
    Caller::new(user, UserRole::SystemAdmin)
}
