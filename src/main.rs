mod cli;
mod config;
mod converter;
mod image;
mod inline;
mod mime;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.default_log_filter()),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();

    let config = config::InlineConfig::from_cli(&cli)?;
    let summary = converter::run(&config)?;

    eprintln!(
        "Inlined {} of {} images ({} references) into {} ({} -> {} bytes)",
        summary.substituted_assets,
        summary.assets,
        summary.replacements,
        config.output.display(),
        summary.input_bytes,
        summary.output_bytes
    );

    Ok(())
}
