use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;

/// Install the global logger.
///
/// The dashboard owns the terminal, so records go to `log_file` with
/// `RUST_LOG`-style filtering (default `info`). Without a file every record
/// is discarded.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let mut builder = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let mut b = Builder::from_env(Env::default().default_filter_or("info"));
            b.target(Target::Pipe(Box::new(file)));
            b.format_timestamp_millis();
            b
        }
        None => {
            let mut b = Builder::new();
            b.filter_level(LevelFilter::Off);
            b
        }
    };
    builder.try_init().context("logger already installed")?;
    Ok(())
}
