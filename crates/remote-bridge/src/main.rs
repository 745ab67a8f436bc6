//! Remote Bridge binary entry point.
//!
//! Usage: remote-bridge [run | check | send <action> [--command <cmd>]]
//!
//! Settings come from `<base_dir>/config.json`, then `REMOTE_BRIDGE_*`
//! environment variables, then the flags below.

use anyhow::Context;
use bridge_config::{init_logging, Config, Credentials, Paths};
use chrono::Utc;
use clap::{Parser, Subcommand};
use remote_actions::{
    check_tools, ActionRegistry, AdmissionFilter, CommandPipeline, Dispatcher, HostActions,
    SystemShell, CUSTOM_ACTION,
};
use remote_bridge::{Listener, RtdbClient};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Remote Bridge: run host actions written to a realtime database node.
#[derive(Parser, Debug)]
#[command(name = "remote-bridge", version)]
#[command(about = "Run media and system actions sent from a remote dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Base directory for config, credentials and logs
    #[arg(long, global = true, env = "REMOTE_BRIDGE_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Config file (defaults to <base_dir>/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Realtime database URL, e.g. https://<project>.firebaseio.com
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Database path holding the command record
    #[arg(long, global = true)]
    path: Option<String>,

    /// Credentials file (defaults to <base_dir>/credentials.json)
    #[arg(long, global = true)]
    credentials: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Listen for commands (default)
    Run,
    /// Report host tools and the resolved configuration
    Check,
    /// Write a command record to the listened path
    Send {
        /// Action name, e.g. play, volume_up, custom
        action: String,

        /// Shell command for the custom action
        #[arg(long)]
        command: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (paths, config) = load_settings(&cli)?;

    match cli.command {
        None | Some(Commands::Run) => run(&paths, &config).await,
        Some(Commands::Check) => check(&paths, &config),
        Some(Commands::Send { action, command }) => {
            send(&paths, &config, &action, command.as_deref()).await
        }
    }
}

/// Resolve paths and config: file, then environment, then flags.
fn load_settings(cli: &Cli) -> anyhow::Result<(Paths, Config)> {
    let paths = match &cli.base_dir {
        Some(dir) => Paths::with_base_dir(dir.clone()),
        None => Paths::new()?,
    };

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Config::load(&paths)
            .with_context(|| format!("failed to load {}", paths.config_file().display()))?,
    };

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(url) = &cli.database_url {
        config.database_url = Some(url.clone());
    }
    if let Some(path) = &cli.path {
        config.listen_path = path.clone();
    }
    if let Some(file) = &cli.credentials {
        config.credentials_file = Some(file.clone());
    }

    Ok((paths, config))
}

fn client(paths: &Paths, config: &Config) -> anyhow::Result<RtdbClient> {
    config.validate()?;
    let credentials_path = config.credentials_path(paths);
    let credentials = Credentials::load(&credentials_path)
        .with_context(|| format!("failed to load {}", credentials_path.display()))?;
    info!(kind = credentials.kind(), "Credentials loaded");

    Ok(RtdbClient::new(config.database_url()?, credentials)?
        .with_idle_timeout(config.stream_idle_timeout()))
}

async fn run(paths: &Paths, config: &Config) -> anyhow::Result<()> {
    if config.log_to_file {
        paths.ensure_dirs()?;
    }
    init_logging("remote-bridge", &config.log_level, config, paths);

    info!(
        database_url = config.database_url.as_deref().unwrap_or("<unset>"),
        path = %config.normalized_listen_path(),
        freshness_ms = config.freshness_window_ms,
        min_interval_ms = config.min_interval_ms,
        "Remote bridge starting..."
    );

    let client = match client(paths, config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Startup failed");
            return Err(e);
        }
    };

    for tool in check_tools(&config.browser_url) {
        if !tool.is_available() {
            let actions: Vec<&str> = tool.actions.iter().map(|a| a.name()).collect();
            warn!(
                program = tool.program,
                actions = ?actions,
                "Host tool not found, these actions will fail"
            );
        }
    }

    let host = Arc::new(HostActions::new(config.browser_url.clone()));
    let dispatcher = Dispatcher::new(
        ActionRegistry::from_provider(host),
        Arc::new(SystemShell::with_shell(config.shell.clone())),
        config.custom_command_timeout(),
    );
    let pipeline = CommandPipeline::new(
        AdmissionFilter::new(config.freshness_window(), config.min_interval()),
        dispatcher,
    );

    let mut listener = Listener::new(
        client,
        config.normalized_listen_path(),
        pipeline,
        config.reconnect_delay(),
    );

    let stream = match listener.connect().await {
        Ok(stream) => stream,
        Err(e) => {
            error!(path = %listener.path(), error = %e, "Could not open change stream");
            return Err(e.into());
        }
    };

    tokio::select! {
        result = listener.run(stream) => {
            if let Err(e) = result {
                error!(error = %e, "Listener exited with error");
                return Err(e.into());
            }
        }
        signal = shutdown_signal() => {
            info!(signal, "Received shutdown signal, exiting...");
        }
    }

    Ok(())
}

fn check(paths: &Paths, config: &Config) -> anyhow::Result<()> {
    println!("Base directory:   {}", paths.base_dir().display());
    println!(
        "Database URL:     {}",
        config.database_url.as_deref().unwrap_or("<unset>")
    );
    println!("Listen path:      /{}", config.normalized_listen_path());
    println!(
        "Credentials:      {}",
        config.credentials_path(paths).display()
    );
    println!("Freshness window: {}ms", config.freshness_window_ms);
    println!("Min interval:     {}ms", config.min_interval_ms);
    println!("Custom timeout:   {}s", config.custom_command_timeout_secs);
    println!("Custom shell:     {}", config.shell);
    println!("Idle timeout:     {}s", config.stream_idle_timeout_secs);
    match config.validate() {
        Ok(()) => println!("Config:           ok"),
        Err(e) => println!("Config:           {e}"),
    }

    println!();
    println!("Host tools:");
    let tools = check_tools(&config.browser_url);
    for tool in &tools {
        let actions: Vec<&str> = tool.actions.iter().map(|a| a.name()).collect();
        match &tool.path {
            Some(path) => println!("  ok       {:<28} {}", tool.program, path.display()),
            None => println!(
                "  missing  {:<28} needed by {}",
                tool.program,
                actions.join(", ")
            ),
        }
    }

    let missing = tools.iter().filter(|t| !t.is_available()).count();
    if missing > 0 {
        println!();
        println!("{missing} tool(s) missing; install them with your package manager.");
    }
    Ok(())
}

async fn send(
    paths: &Paths,
    config: &Config,
    action: &str,
    command: Option<&str>,
) -> anyhow::Result<()> {
    init_logging("remote-bridge", &config.log_level, config, paths);

    if action == CUSTOM_ACTION && command.is_none() {
        anyhow::bail!("the custom action needs --command");
    }

    let mut record = json!({
        "action": action,
        "timestamp": Utc::now().timestamp_millis(),
    });
    if let Some(command) = command {
        record["command"] = json!(command);
    }

    let client = client(paths, config)?;
    client
        .put(config.normalized_listen_path(), &record)
        .await
        .context("failed to write command record")?;

    println!("sent {record}");
    Ok(())
}

async fn shutdown_signal() -> &'static str {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => tokio::select! {
                _ = tokio::signal::ctrl_c() => "SIGINT",
                _ = terminate.recv() => "SIGTERM",
            },
            Err(e) => {
                warn!(error = %e, "Could not install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                "SIGINT"
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        "ctrl-c"
    }
}
