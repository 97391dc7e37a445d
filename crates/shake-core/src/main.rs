//! `shake` command-line interface.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use shake_common::{MeasurementName, OutputFormat, SCHEMA_VERSION};
use shake_config::{
    check_config, resolve_config, resolve_preset, ConfigError, IsolationMode, PresetName,
    ResolvedConfig,
};
use shake_core::flush::worker::WORKER_SUBCOMMAND;
use shake_core::logging::{init_logging, LogFormat};
use shake_core::report::inspect;
use shake_core::{
    run_worker_stdin, to_gcode, waypoints, Direction, ExitCode, FlushOptions, FlushResult,
    MeasurementSession, SyntheticSweep,
};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "shake", version, about = "Resonance sample capture and persistence")]
struct Cli {
    /// Output format for command results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log line encoding on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text, env = "SHAKE_LOG_FORMAT")]
    log_format: LogFormat,

    /// Configuration file (overrides SHAKE_CONFIG and the XDG config file)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Start from a built-in preset (default, fast-ci) instead of a config file
    #[arg(long, global = true, conflicts_with = "config")]
    preset: Option<PresetName>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Capture a sweep from the synthetic source and flush it to disk
    Record(RecordArgs),

    /// Summarize a raw sample file
    Inspect {
        /// Path to a raw sample CSV
        path: PathBuf,
    },

    /// Plan the excitation moves for one direction
    Waypoints(WaypointsArgs),

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Process-isolation flush worker: JSON samples on stdin, CSV to --output
    #[command(name = WORKER_SUBCOMMAND, hide = true)]
    WriteCsv {
        #[arg(long)]
        output: PathBuf,

        #[arg(long, default_value_t = 0)]
        nice: i32,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the resolved configuration and where it came from
    Show,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum IsolationArg {
    Thread,
    Process,
}

impl From<IsolationArg> for IsolationMode {
    fn from(arg: IsolationArg) -> Self {
        match arg {
            IsolationArg::Thread => IsolationMode::Thread,
            IsolationArg::Process => IsolationMode::Process,
        }
    }
}

#[derive(Args, Debug)]
struct RecordArgs {
    /// Excitation direction: x, y, z, a, b, or an angle in degrees
    #[arg(long, default_value = "x")]
    axis: Direction,

    /// Capture length in seconds (defaults to the full sweep)
    #[arg(long)]
    duration: Option<f64>,

    /// Sample rate in Hz (overrides sweep.sample_rate)
    #[arg(long)]
    rate: Option<f64>,

    /// Uniform noise amplitude added to every axis
    #[arg(long, default_value_t = 0.0)]
    noise: f64,

    /// Seed for the noise generator
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Directory for the raw file (overrides output.dir)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// File name prefix (overrides output.prefix)
    #[arg(long)]
    prefix: Option<String>,

    /// Flush timeout in seconds (overrides flush.timeout_secs)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Flush execution context (overrides flush.isolation)
    #[arg(long, value_enum)]
    isolation: Option<IsolationArg>,
}

#[derive(Args, Debug)]
struct WaypointsArgs {
    /// Excitation direction: x, y, z, a, b, or an angle in degrees
    #[arg(long)]
    direction: Direction,

    /// Peak-to-peak excitation size in mm
    #[arg(long)]
    size: f64,

    /// Print G1 moves instead of coordinates
    #[arg(long)]
    gcode: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shake(#[from] shake_common::Error),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Config(_) => ExitCode::ConfigError,
            CliError::Shake(err) => ExitCode::from_error(err),
        }
    }
}

#[derive(Serialize)]
struct RecordReport {
    schema_version: &'static str,
    path: PathBuf,
    direction: String,
    samples: usize,
    result: FlushResult,
}

#[derive(Serialize)]
struct ErrorReport {
    schema_version: &'static str,
    error: String,
    exit_code: i32,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.verbose, cli.quiet);

    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            let code = err.exit_code();
            error!(error = %err, exit_code = code.as_i32(), "command failed");
            match cli.format {
                OutputFormat::Json => print_json(&ErrorReport {
                    schema_version: SCHEMA_VERSION,
                    error: err.to_string(),
                    exit_code: code.as_i32(),
                }),
                OutputFormat::Human => eprintln!("error: {err}"),
            }
            code
        }
    };
    std::process::exit(code.as_i32());
}

fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    match &cli.command {
        Commands::Record(args) => record(cli, args),
        Commands::Inspect { path } => {
            let report = inspect(path)?;
            match cli.format {
                OutputFormat::Json => print_json(&report),
                OutputFormat::Human => println!("{report}"),
            }
            Ok(ExitCode::Ok)
        }
        Commands::Waypoints(args) => {
            let resolved = load_config(cli)?;
            let points = waypoints(resolved.config.motion, args.direction, args.size)?;
            match (cli.format, args.gcode) {
                (OutputFormat::Json, false) => print_json(&points),
                (OutputFormat::Json, true) => print_json(&to_gcode(&points)),
                (OutputFormat::Human, true) => to_gcode(&points).iter().for_each(|l| println!("{l}")),
                (OutputFormat::Human, false) => {
                    for p in &points {
                        println!("{:>10.3} {:>10.3} {:>10.3}  F{:.0}", p.x, p.y, p.z, p.feedrate);
                    }
                }
            }
            Ok(ExitCode::Ok)
        }
        Commands::Config {
            command: ConfigCommand::Show,
        } => {
            let resolved = load_config(cli)?;
            show_config(cli.format, &resolved);
            Ok(ExitCode::Ok)
        }
        Commands::WriteCsv { output, nice } => {
            let rows = run_worker_stdin(output, *nice)?;
            info!(path = %output.display(), rows, "worker wrote samples");
            Ok(ExitCode::Ok)
        }
    }
}

fn record(cli: &Cli, args: &RecordArgs) -> Result<ExitCode, CliError> {
    let ResolvedConfig {
        mut config, source, ..
    } = load_config(cli)?;
    info!(config_source = %source, "recording sweep");

    if let Some(rate) = args.rate {
        config.sweep.sample_rate = rate;
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = Some(dir.clone());
    }
    if let Some(prefix) = &args.prefix {
        config.output.prefix = prefix.clone();
    }
    if let Some(isolation) = args.isolation {
        config.flush.isolation = isolation.into();
    }
    if let Some(secs) = args.timeout_secs {
        config.flush.timeout_secs = secs;
    }
    check_config(&config)?;

    let options = FlushOptions::from_config(&config.flush)?;

    let mut sweep = SyntheticSweep::new(config.sweep, args.axis).with_noise(args.noise, args.seed);
    if let Some(duration) = args.duration {
        sweep = sweep.with_duration(duration);
    }

    let dir = config.output.resolved_dir();
    std::fs::create_dir_all(&dir).map_err(shake_common::Error::from)?;
    let name = MeasurementName::now(&config.output.prefix, args.axis.label());
    let path = dir.join(name.file_name());

    let mut session = MeasurementSession::new(sweep);
    let samples = session.finish()?.len();
    let result = session.write_to_file(&path, &options)?;

    let report = RecordReport {
        schema_version: SCHEMA_VERSION,
        path,
        direction: args.axis.label(),
        samples,
        result,
    };
    match cli.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Human => println!(
            "{}: {} samples -> {}",
            report.result,
            report.samples,
            report.path.display()
        ),
    }
    Ok(ExitCode::from_flush(result))
}

fn load_config(cli: &Cli) -> Result<ResolvedConfig, ConfigError> {
    match cli.preset {
        Some(name) => resolve_preset(name),
        None => resolve_config(cli.config.as_deref()),
    }
}

fn show_config(format: OutputFormat, resolved: &ResolvedConfig) {
    match format {
        OutputFormat::Json => print_json(resolved),
        OutputFormat::Human => {
            println!("# source: {}", resolved.source);
            match serde_json::to_string_pretty(&resolved.config) {
                Ok(text) => println!("{text}"),
                Err(e) => eprintln!("error: {e}"),
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("error: failed to serialize output: {e}"),
    }
}
