use std::error::Error;
use std::sync::Arc;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use hostcpu::app::{Config, Report};
use hostcpu::{CpuInfoCache, SysinfoPlatform};

fn main() -> Result<(), Box<dyn Error>> {
    install_logging();

    let config = match Config::from_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    };

    let cache = CpuInfoCache::with_timeout(Arc::new(SysinfoPlatform), config.info_timeout);
    let outcome = cache.init();
    if let Err(err) = &outcome {
        warn!(failures = err.len(), "CPU information is incomplete");
    }

    let report = Report::new(&cache, &outcome);
    println!("{}", report.render(config.format)?);

    Ok(())
}

fn install_logging() {
    let filter = std::env::var("HOSTCPU_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".into());
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
