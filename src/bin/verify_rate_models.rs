//! Verifies every configured market's interest rate model against live chain state.
//!
//! Exit status: 0 when all markets pass, 1 when any market mismatched or errored,
//! 2 when configuration could not be loaded or names no markets for the network.

use lending_harness::chain::{DeploymentBook, RpcChainReader, TableNamer};
use lending_harness::config::chains::BlocksPerYearRegistry;
use lending_harness::config::markets::MarketTable;
use lending_harness::rates::verifier::{RateModelVerifier, VerificationReport};
use lending_harness::utils::config::Config;

const EXIT_MISMATCH: i32 = 1;
const EXIT_CONFIG: i32 = 2;

struct Inputs {
    config: Config,
    markets: MarketTable,
    deployments: DeploymentBook,
    namer: TableNamer,
}

fn load_inputs() -> lending_harness::error::Result<Inputs> {
    let config = Config::load()?;
    let markets = MarketTable::load(&config.markets_file)?;
    let deployments = match config.deployments_file.as_deref() {
        Some(path) => DeploymentBook::load(path)?,
        None => DeploymentBook::new(),
    };
    let namer = match config.rate_model_names_file.as_deref() {
        Some(path) => TableNamer::load(path)?,
        None => TableNamer::new(),
    };
    Ok(Inputs {
        config,
        markets,
        deployments,
        namer,
    })
}

async fn run(inputs: Inputs) -> anyhow::Result<VerificationReport> {
    let Inputs {
        config,
        markets,
        deployments,
        namer,
    } = inputs;
    tracing::info!(
        "[DEPLOY] {} deployment record(s), {} rate model name(s)",
        deployments.len(),
        namer.len()
    );
    let reader = RpcChainReader::connect(&config.rpc_url, deployments, config.retry)?;
    let registry = BlocksPerYearRegistry::default();
    let verifier = RateModelVerifier::new(&reader, &namer, &config.network, &registry)?;
    let descriptors = markets.markets(&config.network);
    if descriptors.is_empty() {
        anyhow::bail!(
            "no markets configured for {} in {}",
            config.network,
            config.markets_file.display()
        );
    }
    Ok(verifier.verify_markets(descriptors).await)
}

#[tokio::main]
async fn main() {
    lending_harness::utils::env_guard::harden_env_setup();

    // Default to `info` when `RUST_LOG` is unset or invalid.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let inputs = match load_inputs() {
        Ok(inputs) => inputs,
        Err(err) => {
            tracing::error!("[VERIFY] configuration failed: {err}");
            std::process::exit(EXIT_CONFIG);
        }
    };

    let report = match run(inputs).await {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("[VERIFY] setup failed: {err:#}");
            std::process::exit(EXIT_CONFIG);
        }
    };

    print!("{report}");
    if !report.all_passed() {
        std::process::exit(EXIT_MISMATCH);
    }
}
