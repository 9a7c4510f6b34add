use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Env, Target};

use titration_cli::{app, config, AppError};

fn main() -> Result<()> {
    let config = config::load_config().context("failed to load configuration")?;
    init_logging(config.log_file.as_deref())?;

    match app::run(config) {
        Ok(()) => Ok(()),
        Err(AppError::Interrupted) => {
            println!("Interrupted, bye.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Logs go to `log_file` when configured since the prompts own the terminal.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}
