use clap::Parser;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fscatalog::{cli::Cli, config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration (embedded defaults -> fscatalog.toml -> env/.env)
    let app_cfg = config::load()?;

    // Logging: stderr (stdout carries results) + daily file rotation
    std::fs::create_dir_all(&app_cfg.logging.directory).ok();
    let (stderr_nb, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    let file_appender =
        tracing_appender::rolling::daily(&app_cfg.logging.directory, &app_cfg.logging.file_name);
    let (file_nb, file_guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| app_cfg.logging.filter.as_str().into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(stderr_nb))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_nb))
        .init();
    // Keep guards alive so the non-blocking writers flush on exit
    let _log_guards = (stderr_guard, file_guard);

    if let Err(e) = cli.execute(app_cfg).await {
        error!("{}", e);
        drop(_log_guards);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
