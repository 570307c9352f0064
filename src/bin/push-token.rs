use std::path::PathBuf;

use anyhow::Result;
use clap::arg;
use clap::command;
use clap::Parser;
use push_token_agent::auth::signer::{der_to_pem, EcdsaSigner};
use push_token_agent::cache::token_manager::TokenManager;
use push_token_agent::observability::metrics::get_metrics;
use push_token_agent::utils::config_loader;
use push_token_agent::utils::logging;
use push_token_agent::utils::logging::LogLevel;
use push_token_agent::utils::constants::DEFAULT_CONFIG_PATH;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// Write a fresh P-256 PKCS#8 PEM key to this path and exit
    #[arg(long)]
    generate_key: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // -------------------------------
    // 1. Key generation short-circuit
    // -------------------------------

    if let Some(path) = args.generate_key.as_ref() {
        logging::run(None, args.log_level)?;
        let (signer, der) = EcdsaSigner::generate()?;
        tokio::fs::write(path, der_to_pem(&der)).await?;
        info!(
            path = %path.display(),
            public_key_len = signer.public_key().len(),
            "signing key written"
        );
        return Ok(());
    }

    // -------------------------------
    // 2. Load YAML config
    // -------------------------------

    let service_config = config_loader::run(&args.config).await?;
    logging::run(Some(&service_config), args.log_level)?;

    // -------------------------------
    // 3. Build manager and issue a token
    // -------------------------------

    let manager = TokenManager::from_config(&service_config.auth).await?;
    let token = manager.current_token().await?;
    println!("{token}");

    // -------------------------------
    // 4. Metrics dump (counters are always recorded,
    //    `is_enabled` only decides whether they are printed)
    // -------------------------------

    if service_config.settings.metrics.is_enabled {
        if let Some(metrics) = get_metrics() {
            eprint!("{}", metrics.render());
        }
    }

    Ok(())
}
