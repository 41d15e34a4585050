//! shardman - operator console for a Don't Starve Together shard fleet.
//!
//! Without a subcommand, starts the interactive dashboard. Subcommands
//! cover the same operations non-interactively for scripting:
//!
//! ```bash
//! # Interactive dashboard
//! shardman
//!
//! # One-shot operations
//! shardman list
//! shardman restart Master
//! shardman logs Caves --lines 100
//! shardman cmd "c_save()"
//! shardman update
//! shardman sync
//! ```

use std::io::Write;
use std::panic;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shardman_chat::ConsoleFifoTransport;
use shardman_config::Config;
use shardman_core::{init_logging, LogGuard, ShardAction, MASTER_SHARD};
use shardman_supervisor::{sync_units, ShardController, StatusProvider, Updater};
use shardman_tui::App;
use tracing::{error, info};

/// Operator console for a systemd-managed shard fleet.
#[derive(Parser, Debug)]
#[command(name = "shardman")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory for log files (defaults to ~/.shardman/logs/)
    #[arg(long)]
    log_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the status of every configured shard
    List,
    /// Start a shard
    Start { shard: String },
    /// Stop a shard
    Stop { shard: String },
    /// Restart a shard
    Restart { shard: String },
    /// Enable a shard to start on boot
    Enable { shard: String },
    /// Disable a shard from starting on boot
    Disable { shard: String },
    /// Print recent journal lines for a shard
    Logs {
        shard: String,
        /// Number of lines to fetch
        #[arg(short = 'n', long, default_value_t = 50)]
        lines: u32,
    },
    /// Send a raw console command to the Master shard
    Cmd {
        /// The console command, quoted or as trailing words
        #[arg(required = true, trailing_var_arg = true)]
        command: Vec<String>,
    },
    /// Run the external game updater
    Update,
    /// Reconcile systemd units with the configured shard list
    Sync,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::from(1);
        }
    };

    let result = match cli.command {
        Some(command) => run_command(command),
        None => run_dashboard(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn setup_logging(cli: &Cli) -> shardman_core::Result<LogGuard> {
    init_logging(cli.log_dir.clone(), cli.verbose > 0)
}

/// Start the interactive dashboard.
fn run_dashboard() -> anyhow::Result<()> {
    install_panic_hook();
    info!("starting dashboard");

    let config = Config::load().context("loading configuration")?;
    let mut app = App::new(config).map_err(|e| anyhow::anyhow!("{e}"))?;
    app.run().map_err(|e| anyhow::anyhow!("{e}"))?;

    info!("dashboard exited normally");
    Ok(())
}

/// Run a one-shot subcommand without the dashboard.
fn run_command(command: Command) -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    let runtime = tokio::runtime::Runtime::new().context("starting the async runtime")?;

    match command {
        Command::List => {
            let provider = StatusProvider::new(config.shards.clone());
            let shards = runtime.block_on(provider.poll());
            if shards.is_empty() {
                println!("No shards configured in {}", config.config_dir.display());
                return Ok(());
            }
            for shard in shards {
                let state = if shard.is_running { "running" } else { "stopped" };
                let boot = if shard.is_enabled { "enabled" } else { "disabled" };
                println!("{:<16} {state:<8} {boot}", shard.name);
            }
        }
        Command::Start { shard } => apply(&runtime, &shard, ShardAction::Start)?,
        Command::Stop { shard } => apply(&runtime, &shard, ShardAction::Stop)?,
        Command::Restart { shard } => apply(&runtime, &shard, ShardAction::Restart)?,
        Command::Enable { shard } => apply(&runtime, &shard, ShardAction::Enable)?,
        Command::Disable { shard } => apply(&runtime, &shard, ShardAction::Disable)?,
        Command::Logs { shard, lines } => {
            let controller = ShardController::new();
            let text = runtime.block_on(controller.fetch_logs(&shard, lines));
            println!("{text}");
        }
        Command::Cmd { command } => {
            let transport = ConsoleFifoTransport::new()?;
            transport.send_command(MASTER_SHARD, &command.join(" "))?;
            println!("sent");
        }
        Command::Update => {
            let updater = Updater::new(config.updater_path.clone());
            let output = runtime.block_on(updater.run());
            if !output.stdout.is_empty() {
                println!("{}", output.stdout);
            }
            if !output.success {
                anyhow::bail!("updater failed: {}", output.summary());
            }
        }
        Command::Sync => {
            let steps = runtime.block_on(sync_units(&config.shards));
            for step in &steps {
                let state = if step.output.success { "ok" } else { "FAILED" };
                println!("{:<10} {:<24} {state}", step.action, step.target);
            }
            if steps.iter().any(|s| !s.output.success) {
                anyhow::bail!("one or more sync steps failed");
            }
        }
    }
    Ok(())
}

fn apply(
    runtime: &tokio::runtime::Runtime,
    shard: &str,
    action: ShardAction,
) -> anyhow::Result<()> {
    let controller = ShardController::new();
    let output = runtime.block_on(controller.apply(shard, action));
    if output.success {
        println!("{action} {shard}: ok");
        Ok(())
    } else {
        anyhow::bail!("{action} {shard}: {}", output.summary())
    }
}

/// Restore the terminal before the panic message prints, so a crash in raw
/// mode does not leave the shell unusable.
fn install_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

fn restore_terminal() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    let _ = crossterm::terminal::disable_raw_mode();
    crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen)?;
    crossterm::execute!(stdout, crossterm::cursor::Show)?;
    stdout.flush()?;
    Ok(())
}
