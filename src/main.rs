//! CLI binary for the GPS analyzer
//!
//! Reads dataflash logs and writes their GPS track as CSV, or as the JSON
//! payload for an external 3D flight-path plot.

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches, Command};
use glob::glob;
use gps_analyzer::{
    analyze, parse_log_bytes, render_input, write_render_json, write_track_csv, CsvSchema,
    LeapSeconds, LogFormat, PipelineOptions, DEFAULT_LEAP_SECONDS,
};
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

const STDIO: &str = "-";

/// Where a log is read from
#[derive(Debug, Clone)]
enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn display_name(&self) -> String {
        match self {
            Input::Stdin => "<stdin>".to_string(),
            Input::File(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string(),
        }
    }

    fn path(&self) -> Option<&Path> {
        match self {
            Input::Stdin => None,
            Input::File(path) => Some(path),
        }
    }

    fn read(&self) -> Result<Vec<u8>> {
        match self {
            Input::Stdin => {
                let mut data = Vec::new();
                std::io::stdin()
                    .lock()
                    .read_to_end(&mut data)
                    .context("Failed to read log from stdin")?;
                Ok(data)
            }
            Input::File(path) => {
                std::fs::read(path).with_context(|| format!("Failed to read log file: {path:?}"))
            }
        }
    }
}

/// Command to run on each log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Csv,
    Plot,
}

impl Action {
    fn extension(&self) -> &'static str {
        match self {
            Action::Csv => "csv",
            Action::Plot => "json",
        }
    }
}

/// Where output for one log goes
#[derive(Debug, Clone)]
enum Output {
    Stdout,
    File(PathBuf),
}

impl Output {
    fn open(&self) -> Result<Box<dyn Write>> {
        match self {
            Output::Stdout => Ok(Box::new(BufWriter::new(std::io::stdout().lock()))),
            Output::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {parent:?}")
                    })?;
                }
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {path:?}"))?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

fn build_command() -> Command {
    Command::new("GPS Analyzer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Analyze dataflash log GPS data: export a CSV time series or a 3D flight-path plot payload")
        .arg(
            Arg::new("command")
                .help("What to do with the log: 'csv' writes the GPS track, 'plot' writes flight-path JSON for a renderer. 'LOGFILE COMMAND' order is also accepted")
                .required(true)
                .value_name("COMMAND")
                .index(1),
        )
        .arg(
            Arg::new("logfile")
                .help("Dataflash log files (or - for stdin). Supports globbing.")
                .required(true)
                .num_args(1..)
                .index(2),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .help("Log file format: 'bin', 'log' or 'auto'")
                .value_parser(["bin", "log", "auto"])
                .default_value("auto"),
        )
        .arg(
            Arg::new("skip-bad")
                .short('s')
                .long("skip-bad")
                .alias("skip_bad")
                .help("Skip over corrupt dataflash lines")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("outfile")
                .short('o')
                .long("outfile")
                .help("Output file (or - for stdout). Only valid with a single log")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for per-log output files named <log>.gps.csv / <log>.gps.json (default: same as input file)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("schema")
                .long("schema")
                .help("CSV layout: 'extended' (GMT,TimeUS,Lat,Lng,Alt) or 'basic' (TimeUS,Lat,Lng,Alt)")
                .value_parser(["basic", "extended"])
                .default_value("extended"),
        )
        .arg(
            Arg::new("leap-seconds")
                .long("leap-seconds")
                .help("GPS-UTC leap second offset (default: 18)")
                .value_name("N")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("leap-from-log")
                .long("leap-from-log")
                .help("Take the leap second offset from the receiver's GRXH messages when logged")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("comment-header")
                .long("comment-header")
                .help("Prefix the CSV header line with '# '")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("all-fixes")
                .long("all-fixes")
                .help("Keep CSV samples without a 3D fix")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Verbose output")
                .action(clap::ArgAction::SetTrue),
        )
}

fn pipeline_options(matches: &ArgMatches) -> Result<PipelineOptions> {
    let schema = matches
        .get_one::<String>("schema")
        .map(|s| s.parse::<CsvSchema>())
        .transpose()
        .map_err(|e| anyhow!(e))?
        .unwrap_or_default();

    let leap = matches
        .get_one::<i64>("leap-seconds")
        .copied()
        .unwrap_or(DEFAULT_LEAP_SECONDS);
    let leap_seconds = if matches.get_flag("leap-from-log") {
        LeapSeconds::FromLog { fallback: leap }
    } else {
        LeapSeconds::Fixed(leap)
    };

    Ok(PipelineOptions {
        schema,
        leap_seconds,
        require_3d_fix: !matches.get_flag("all-fixes"),
        header_prefix: matches
            .get_flag("comment-header")
            .then(|| "# ".to_string()),
    })
}

fn parse_action(name: &str) -> Option<Action> {
    match name {
        "csv" => Some(Action::Csv),
        "plot" => Some(Action::Plot),
        _ => None,
    }
}

/// Split positionals into the action and log patterns
///
/// Accepts `COMMAND LOG...` as well as the older `LOG COMMAND` order.
fn resolve_positionals(command: &str, logs: &[&String]) -> Result<(Action, Vec<String>)> {
    if let Some(action) = parse_action(command) {
        return Ok((action, logs.iter().map(|s| s.to_string()).collect()));
    }
    if let Some((last, rest)) = logs.split_last() {
        if let Some(action) = parse_action(last) {
            let mut patterns = vec![command.to_string()];
            patterns.extend(rest.iter().map(|s| s.to_string()));
            return Ok((action, patterns));
        }
    }
    Err(anyhow!(
        "Unknown command '{command}', expected 'csv' or 'plot'"
    ))
}

/// Expand log arguments into inputs, resolving glob patterns
fn expand_inputs(patterns: &[String]) -> Result<Vec<Input>> {
    let mut inputs = Vec::new();
    for pattern in patterns {
        if pattern.as_str() == STDIO {
            inputs.push(Input::Stdin);
        } else if pattern.contains('*') || pattern.contains('?') {
            let paths = glob(pattern)
                .with_context(|| format!("Invalid glob pattern '{pattern}'"))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .with_context(|| format!("Error expanding glob pattern '{pattern}'"))?;
            if paths.is_empty() {
                eprintln!("Warning: Pattern matched no files: {pattern}");
            }
            inputs.extend(paths.into_iter().map(Input::File));
        } else {
            inputs.push(Input::File(PathBuf::from(pattern)));
        }
    }
    Ok(inputs)
}

/// Output location for one input
///
/// A single input defaults to stdout; several inputs each get
/// `<stem>.gps.<ext>` in the output directory or next to the log.
fn compute_output(
    input: &Input,
    action: Action,
    outfile: Option<&String>,
    output_dir: Option<&String>,
    multiple: bool,
) -> Output {
    if let Some(outfile) = outfile {
        return if outfile.as_str() == STDIO {
            Output::Stdout
        } else {
            Output::File(PathBuf::from(outfile))
        };
    }
    if output_dir.is_none() && !multiple {
        return Output::Stdout;
    }

    let stem = input
        .path()
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .unwrap_or("stdin");
    let dir = output_dir
        .map(PathBuf::from)
        .or_else(|| input.path().and_then(|p| p.parent()).map(Path::to_path_buf))
        .unwrap_or_default();
    Output::File(dir.join(format!("{stem}.gps.{}", action.extension())))
}

fn process_log(
    input: &Input,
    output: &Output,
    action: Action,
    format: LogFormat,
    skip_bad: bool,
    options: &PipelineOptions,
    verbose: bool,
) -> Result<()> {
    let start = Instant::now();
    let data = input.read()?;
    let channels = parse_log_bytes(&data, format, input.path(), skip_bad)?;
    if verbose {
        eprintln!(
            "Log file read time: {:.2} seconds",
            start.elapsed().as_secs_f64()
        );
    }

    match action {
        Action::Csv => {
            // Analyze before opening the output so failures leave no file behind
            let track = analyze(&channels, options)?;
            let mut writer = output.open()?;
            write_track_csv(&mut writer, &track, &options.csv_options())?;
            writer.flush()?;
            info!("{}: wrote {} GPS samples", input.display_name(), track.len());
        }
        Action::Plot => {
            let payload = render_input(&channels)?;
            let mut writer = output.open()?;
            write_render_json(&mut writer, &payload)?;
            writer.flush()?;
            info!(
                "{}: wrote {} path points ({} speed)",
                input.display_name(),
                payload.len(),
                if payload.fused_speed { "3D" } else { "ground" }
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let verbose = matches.get_flag("verbose");
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();
    debug!(
        "gps-analyzer {} ({} {}, {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        option_env!("VERGEN_GIT_COMMIT_DATE").unwrap_or("unknown"),
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    );

    let format = matches
        .get_one::<String>("format")
        .map(|s| s.parse::<LogFormat>())
        .transpose()
        .map_err(|e| anyhow!(e))?
        .unwrap_or_default();
    let skip_bad = matches.get_flag("skip-bad");
    let outfile = matches.get_one::<String>("outfile");
    let output_dir = matches.get_one::<String>("output-dir");
    let options = pipeline_options(&matches)?;

    let command = matches
        .get_one::<String>("command")
        .map(String::as_str)
        .unwrap_or_default();
    let logs: Vec<&String> = matches
        .get_many::<String>("logfile")
        .map(|files| files.collect())
        .unwrap_or_default();
    let (action, patterns) = resolve_positionals(command, &logs)?;
    let inputs = expand_inputs(&patterns)?;

    if inputs.is_empty() {
        eprintln!("Error: No log files found to process.");
        eprintln!("Input patterns were: {patterns:?}");
        std::process::exit(1);
    }
    let multiple = inputs.len() > 1;
    if multiple && outfile.is_some() {
        return Err(anyhow!(
            "--outfile accepts a single log; use --output-dir for {} logs",
            inputs.len()
        ));
    }

    debug!("Processing {} log(s) with {:?}", inputs.len(), options);

    let mut processed = 0;
    for input in &inputs {
        let output = compute_output(input, action, outfile, output_dir, multiple);
        if verbose {
            eprintln!("Processing: {}", input.display_name());
        }
        match process_log(input, &output, action, format, skip_bad, &options, verbose) {
            Ok(()) => processed += 1,
            Err(e) => {
                eprintln!("Error processing {}: {e:#}", input.display_name());
            }
        }
    }

    if processed == 0 {
        eprintln!(
            "Error: No logs were successfully processed out of {} found.",
            inputs.len()
        );
        std::process::exit(1);
    }

    Ok(())
}
