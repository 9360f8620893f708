use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

/// Due-date reminder dispatcher daemon.
#[derive(Parser, Debug)]
#[command(name = "taskping-daemon", version, about)]
struct Args {
    /// Path to taskping.toml (defaults to ~/.taskping/taskping.toml).
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "taskping_daemon=info,taskping_dispatch=info,taskping_store=info,taskping_mailer=info".into()
            }),
        )
        .init();

    let args = Args::parse();
    let config = taskping_core::config::TaskpingConfig::load(args.config.as_deref())
        .context("loading configuration")?;

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    taskping_store::db::init_db(&db)?;

    let store = Arc::new(taskping_store::TaskStore::new(db));
    let mailer = Arc::new(
        taskping_mailer::SmtpMailer::new(&config.mail).context("building SMTP transport")?,
    );
    let engine = taskping_dispatch::DispatchEngine::new(
        store,
        mailer,
        Duration::from_secs(config.mail.timeout),
    );

    let mut handle =
        taskping_dispatch::start(engine, Duration::from_secs(config.dispatcher.interval));
    info!(
        interval_secs = config.dispatcher.interval,
        "dispatcher running — press Ctrl-C to stop"
    );

    let faulted = tokio::select! {
        _ = tokio::signal::ctrl_c() => false,
        _ = handle.faulted() => true,
    };
    if faulted {
        error!("dispatcher loop exited unexpectedly — reminders are no longer being sent");
        anyhow::bail!("dispatcher fault");
    }

    info!("shutdown signal received — stopping dispatcher");
    handle.stop().await;
    info!("dispatcher stopped");
    Ok(())
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
