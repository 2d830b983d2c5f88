use std::io;
use std::process::ExitCode;

use iocompare::backend::create_backends;
use iocompare::bench::{DatasetGenerator, Harness};
use iocompare::config::BenchConfig;
use iocompare::util::format_duration;
use iocompare::{error, logging, Result};

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "benchmark failed");
            eprintln!("Error: {}", error::user_friendly_message(&e));
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = BenchConfig::load()?;
    tracing::info!(
        shape = %config.shape(),
        output_dir = %config.output_dir.display(),
        "configuration loaded"
    );

    let backends = create_backends(&config)?;
    let mut generator = match config.seed {
        Some(seed) => DatasetGenerator::from_seed(seed),
        None => DatasetGenerator::from_clock(),
    };

    let mut harness = Harness::new(config, backends)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = harness.run(&mut generator, &mut out)?;

    tracing::info!(
        total = %format_duration(report.total_elapsed()),
        "all operations finished"
    );
    Ok(())
}
