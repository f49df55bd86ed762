//! gammon-vision CLI: board calibration and frame analysis from image files.

use clap::{Args, Parser, Subcommand, ValueEnum};
use gammon_vision::detect::{self, analyze_paths, run_config};
use gammon_vision::io::{AnalyzeConfig, AnalyzeReport};
use gammon_vision::{runtime, AnalyzerParams, BoardAnalyzer};
use log::{info, LevelFilter};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "gammon-vision")]
#[command(about = "Recognise a backgammon board, its checkers and dice in camera frames")]
#[command(version)]
struct Cli {
    /// Log verbosity.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the board outline and print the calibrated geometry.
    Calibrate(CalibrateArgs),

    /// Calibrate on one image, then analyse every frame.
    Analyze(AnalyzeArgs),

    /// Run a batch described by a JSON config.
    Run {
        /// Path to an `AnalyzeConfig` JSON file.
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
struct CalibrateArgs {
    /// Image of the empty (or populated) board.
    #[arg(long)]
    image: PathBuf,

    /// Optional `AnalyzerParams` JSON.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Write the calibration JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct AnalyzeArgs {
    /// Image used for board calibration.
    #[arg(long)]
    calibration: PathBuf,

    /// Optional `AnalyzerParams` JSON.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Write the report JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Frames to analyse.
    #[arg(required = true)]
    frames: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LogLevel) -> CliResult<()> {
    gammon_vision::core::init_with_level(level.into())?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(_level: LogLevel) -> CliResult<()> {
    gammon_vision::core::init_tracing(false);
    // No-op when the subscriber already bridged `log`.
    let _ = tracing_log::LogTracer::init();
    Ok(())
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level)?;

    match cli.command {
        Commands::Calibrate(args) => run_calibrate(&args),
        Commands::Analyze(args) => run_analyze(&args),
        Commands::Run { config } => run_batch(&config),
    }
}

fn load_params(path: Option<&Path>) -> CliResult<AnalyzerParams> {
    match path {
        Some(path) => AnalyzerParams::load_json(path).map_err(|e| -> CliError {
            format!("failed to read params {}: {e}", path.display()).into()
        }),
        None => Ok(AnalyzerParams::default()),
    }
}

fn emit_json<T: serde::Serialize>(value: &T, out: Option<&Path>) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_calibrate(args: &CalibrateArgs) -> CliResult<()> {
    let params = load_params(args.params.as_deref())?;
    let backend = runtime::init();
    let mut analyzer = BoardAnalyzer::new(backend, params);

    let img = detect::load_frame(&args.image)?;
    info!("image size: {}x{}", img.width(), img.height());

    if !analyzer.calibrate(&detect::frame_view(&img))? {
        return Err(format!("no board outline found in {}", args.image.display()).into());
    }
    emit_json(&analyzer.calibration(), args.out.as_deref())
}

fn run_analyze(args: &AnalyzeArgs) -> CliResult<()> {
    let params = load_params(args.params.as_deref())?;
    let report = analyze_paths(
        runtime::init(),
        &args.calibration,
        args.frames.as_slice(),
        params,
    )?;
    log_summary(&report);
    emit_json(&report, args.out.as_deref())
}

fn run_batch(config: &Path) -> CliResult<()> {
    let cfg = AnalyzeConfig::load_json(config).map_err(|e| -> CliError {
        format!("failed to read config {}: {e}", config.display()).into()
    })?;
    let report = run_config(runtime::init(), &cfg)?;
    log_summary(&report);
    let out = cfg.output_path();
    report.write_json(&out)?;
    info!("wrote {}", out.display());
    Ok(())
}

fn log_summary(report: &AnalyzeReport) {
    info!(
        "calibrated: {}, frames analysed: {}/{}",
        report.calibrated,
        report.snapshots().count(),
        report.frames.len()
    );
}
