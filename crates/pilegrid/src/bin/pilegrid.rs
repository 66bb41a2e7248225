use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use pilegrid_correct::{CorrectionConfig, CorrectionReport};

/// Geometric correction of pile detections.
#[derive(Parser, Debug)]
#[command(name = "pilegrid", version, about)]
struct Cli {
    /// JSON run configuration.
    config: PathBuf,
    /// Run the chain pipeline whatever the config selects.
    #[arg(long)]
    chains: bool,
    /// Report path; overrides `output_path` from the config.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// off, error, warn, info, debug or trace.
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
    /// Emit tracing spans as JSON lines.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    json_trace: bool,
}

fn init_logging(cli: &Cli) {
    #[cfg(feature = "tracing")]
    {
        let _ = tracing_log::LogTracer::init();
        log::set_max_level(cli.log_level);
        pilegrid_core::init_tracing(cli.json_trace);
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = pilegrid_core::init_with_level(cli.log_level);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);
    log::debug!("{cli:?}");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = CorrectionConfig::load_json(&cli.config)?;
    if cli.chains {
        cfg.params.use_chain_search = true;
    }

    let detections = cfg.load_detections()?;
    let corrector = cfg.build_corrector()?;
    let result = corrector.correct(&detections, cfg.image);

    let stats = result.stats;
    println!(
        "{} -> {} detections (added {}, removed {})",
        stats.original_count, stats.corrected_count, stats.added_count, stats.removed_count
    );

    let output_path = cli.output.clone().unwrap_or_else(|| cfg.output_path());
    let report = CorrectionReport::new(&cfg, &cli.config, result);
    report.write_json(&output_path)?;
    println!("wrote report JSON to {}", output_path.display());

    Ok(())
}
