use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use rayon::prelude::*;
use std::io;
use std::path::PathBuf;
use uidump_layout::report::{self, Outcome, OutputFormat};
use uidump_layout::{
    Conversion, ConversionStats, ConvertError, ConvertOptions, DuplicateIdPolicy, InputSource,
    ScreenMetrics, extract_controls, format_statistics, parse_hierarchy_bytes, profiling,
    resolve_inputs,
};

#[derive(Parser)]
#[command(
    name = "uidump",
    version,
    about = "Convert captured UI hierarchy dumps into previewable Android layouts",
    long_about = None
)]
struct Cli {
    /// Hierarchy dumps to convert: files, glob patterns, or `-` for stdin
    inputs: Vec<String>,

    /// Reference screen width in pixels
    #[arg(short = 'W', long, env = "UIDUMP_SCREEN_WIDTH", default_value_t = uidump_layout::classify::DEFAULT_SCREEN_WIDTH)]
    width: u32,

    /// Reference screen height in pixels
    #[arg(short = 'H', long, env = "UIDUMP_SCREEN_HEIGHT", default_value_t = uidump_layout::classify::DEFAULT_SCREEN_HEIGHT)]
    height: u32,

    /// Screen density (pixels per dp)
    #[arg(short, long, env = "UIDUMP_DENSITY", default_value_t = uidump_layout::classify::DEFAULT_DENSITY)]
    density: f32,

    /// How to handle fields that derive the same identifier
    #[arg(long, value_enum, env = "UIDUMP_DUPLICATE_IDS", default_value = "suffix")]
    duplicate_ids: DuplicateIdPolicy,

    /// List actionable controls instead of generating a layout
    #[arg(long)]
    controls: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "xml")]
    format: OutputFormat,

    /// Write one file per input into this directory instead of stdout
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print conversion statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum)]
    completions: Option<clap_complete::Shell>,

    /// Generate profiling report (requires --features profiling)
    #[cfg(feature = "profiling")]
    #[arg(long)]
    profile: Option<String>,

    #[cfg(not(feature = "profiling"))]
    #[arg(long, hide = true)]
    profile: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    profiling::init_tracing(cli.verbose);

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "uidump", &mut io::stdout());
        return Ok(());
    }

    let mut profiler = if cli.profile.is_some() {
        Some(profiling::Profiler::new()?)
    } else {
        None
    };

    let metrics = ScreenMetrics::new(cli.width, cli.height, cli.density)?;
    let options = ConvertOptions {
        metrics,
        duplicate_ids: cli.duplicate_ids,
    };

    let sources = resolve_inputs(&cli.inputs)?;
    tracing::debug!(inputs = sources.len(), ?options, "Starting conversion");

    let results: Vec<(InputSource, Result<Outcome>)> = sources
        .into_par_iter()
        .map(|source| {
            let outcome = process(&source, &options, cli.controls)
                .with_context(|| format!("Failed to convert {source}"));
            (source, outcome)
        })
        .collect();

    let mut total = ConversionStats::default();
    let mut failures = 0usize;
    let mut reports = Vec::new();

    for (source, result) in &results {
        match result {
            Ok(outcome) => {
                if let Outcome::Layout(conversion) = outcome {
                    total.merge(&conversion.stats);
                }
                reports.push((source, outcome));
            }
            Err(e) => {
                failures += 1;
                eprintln!("Error: {e:#}");
                if e
                    .downcast_ref::<ConvertError>()
                    .is_some_and(ConvertError::is_parse_error)
                {
                    eprintln!("Input must be a UiAutomator/Appium hierarchy dump (page source XML)");
                }
            }
        }
    }

    match &cli.output_dir {
        Some(dir) => {
            report::write_output_files(dir, &reports, cli.format)?;
        }
        None => report::write_reports(&mut io::stdout().lock(), &reports, cli.format, failures)?,
    }

    if cli.stats {
        eprintln!("\n{}", format_statistics(&total, !cli.no_color));
    }

    if let Some(ref mut profiler) = profiler {
        if let Some(profile_path) = &cli.profile {
            profiler.report(profile_path)?;
        }
    }

    if failures > 0 {
        tracing::debug!(failures, "Conversion finished with errors");
        std::process::exit(1);
    }

    Ok(())
}

fn process(source: &InputSource, options: &ConvertOptions, controls: bool) -> Result<Outcome> {
    let bytes = source.read()?;
    let root = parse_hierarchy_bytes(&bytes)?;

    if controls {
        Ok(Outcome::Controls(extract_controls(&root)))
    } else {
        Ok(Outcome::Layout(Conversion::from_tree(&root, options)?))
    }
}
