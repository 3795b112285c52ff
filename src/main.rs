use std::io::Read;

use anyhow::Context;
use dotenvy::dotenv;
use polynomial_secret_recovery::{Config, Document, recover_secret, report::log_recovery};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

// Recovers the secret of a document read from the path given as first argument,
// `SECRET_INPUT_PATH`, or stdin, in this order.
// Run via
// ```
// cargo run -- <path/to/document.json>
// ```
fn main() -> Result<(), anyhow::Error> {
    if let Err(err) = dotenv()
        && !err.not_found()
    {
        return Err(anyhow::anyhow!("Error while loading .env file: {err}"));
    }

    let config = match Config::parse_environment() {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow::anyhow!(
                "Failed to parse environment variables for configuration: {e}"
            ));
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(Into::<LevelFilter>::into(config.log_level)),
        )
        .init();

    let input_path = std::env::args_os()
        .nth(1)
        .map(Into::into)
        .or(config.input_path);

    let raw = match &input_path {
        Some(path) => {
            info!("Reading document from {}", path.display());
            std::fs::read_to_string(path)
                .with_context(|| format!("Error while reading {}", path.display()))?
        }
        None => {
            info!("Reading document from stdin");
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Error while reading stdin")?;
            raw
        }
    };

    let recovery = Document::from_json(&raw).and_then(|document| recover_secret(&document))?;

    log_recovery(&recovery)?;

    println!("{}", recovery.primary);

    Ok(())
}
