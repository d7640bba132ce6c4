use anyhow::Result;
use clap::Parser;
use log::info;

use glue::cache::BuildCache;
use glue::cli::CliArgs;
use glue::project::{self, BuildOptions, BuildStatus};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // The logger may not be initialized yet.
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .format_timestamp(None)
        .format_target(false)
        .init();

    let options = BuildOptions::from_args(&args)?;
    let mut cache = BuildCache::new();

    let reports = project::run(&options, &mut cache)?;

    let built = reports
        .iter()
        .filter(|r| r.status == BuildStatus::Built)
        .count();
    info!(
        "Done: {} built, {} up to date",
        built,
        reports.len() - built
    );

    Ok(())
}
