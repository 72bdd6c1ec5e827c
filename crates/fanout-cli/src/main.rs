mod logging;

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use fanout_core::{Admission, Config, Service};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AdmissionArg {
    PerItem,
    Pooled,
}

impl From<AdmissionArg> for Admission {
    fn from(arg: AdmissionArg) -> Self {
        match arg {
            AdmissionArg::PerItem => Admission::PerItem,
            AdmissionArg::Pooled => Admission::Pooled,
        }
    }
}

/// Run one batch over ITEMS and log the results.
#[derive(Debug, Parser)]
#[command(name = "fanout", version)]
struct Cli {
    /// Items to process.
    #[arg(default_values = ["a", "b", "c"])]
    items: Vec<String>,

    /// JSON config file; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    concurrency: Option<NonZeroUsize>,

    /// Carried in the config, not enforced.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Carried in the config, not enforced.
    #[arg(long)]
    max_retries: Option<u32>,

    #[arg(long, value_enum)]
    admission: Option<AdmissionArg>,

    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn build_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(retries) = self.max_retries {
            config.max_retries = retries;
        }
        if let Some(admission) = self.admission {
            config.admission = admission.into();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.json_logs)?;

    let config = cli.build_config()?;
    info!(?config, "service started");

    let svc: Service = Service::new(config);
    let report = svc
        .process_report(&CancellationToken::new(), cli.items)
        .await?;

    info!(
        batch_id = %report.batch_id,
        results = ?report.results,
        peak_in_flight = report.peak_in_flight,
        "results"
    );
    Ok(())
}
