use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use sitekit::config::{AppState, Config};
use sitekit::{logger, pipeline, server};

#[derive(Parser)]
#[command(name = "sitekit", version, about = "Static site build pipeline and hardened file server")]
struct Cli {
    /// Configuration file path, without extension
    #[arg(short, long, default_value = "sitekit", global = true)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the built site with the security header set
    Serve,
    /// Run build tasks (all of them when none are named)
    Build {
        /// Task names; dependencies are pulled in automatically
        tasks: Vec<String>,
    },
    /// List the build tasks and their dependencies
    Tasks,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = Config::load_from(&cli.config)
        .with_context(|| format!("failed to load configuration '{}'", cli.config))?;
    logger::init(&cfg).context("failed to initialize logging")?;

    match cli.command {
        Command::Serve => serve(cfg),
        Command::Build { tasks } => build(&cfg, &tasks),
        Command::Tasks => {
            list_tasks();
            Ok(())
        }
    }
}

/// Build the runtime by hand so the worker thread count follows config
fn serve(cfg: Config) -> anyhow::Result<()> {
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder
        .build()
        .context("failed to build async runtime")?;

    let state = Arc::new(AppState::new(cfg).context("invalid header configuration")?);
    runtime.block_on(server::run(state))
}

/// Run the pipeline; an external tool's exit status passes through
fn build(cfg: &Config, tasks: &[String]) -> anyhow::Result<()> {
    match pipeline::run(cfg, tasks) {
        Ok(()) => Ok(()),
        Err(e) => {
            logger::log_error(&e.to_string());
            std::process::exit(e.exit_code());
        }
    }
}

fn list_tasks() {
    for task in pipeline::TASKS {
        if task.deps.is_empty() {
            println!("{:<12} {}", task.name, task.summary);
        } else {
            println!(
                "{:<12} {} (after: {})",
                task.name,
                task.summary,
                task.deps.join(", ")
            );
        }
    }
}
