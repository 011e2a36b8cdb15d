use anyhow::Result;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PBJSON_LOG";

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only JSON.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    pbjson::cli::run()?;
    Ok(())
}
