use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use pktscope_core::{AnalyzeOptions, CaptureReport, FrameSummary, PcapFileSource};

#[derive(Parser, Debug)]
#[command(name = "pktscope")]
#[command(version)]
#[command(
    about = "Layer-by-layer decoder for captured Ethernet frames (ARP, IPv4, TCP, UDP, ICMP).",
    long_about = None,
    after_help = "Examples:\n  pktscope pcap decode capture.pcapng\n  pktscope pcap decode capture.pcap --json --pretty\n  pktscope frame 'ff:ff:ff:ff:ff:ff aa:bb:cc:dd:ee:ff 08:06'"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on PCAP/PCAPNG inputs.
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
    /// Decode a single frame given as hex.
    #[command(
        after_help = "Examples:\n  pktscope frame ffffffffffffaabbccddeeff0806\n  pktscope frame 'ff ff ff ff ff ff aa bb cc dd ee ff 86 dd'"
    )]
    Frame {
        /// Frame bytes in hex; whitespace and ':' separators are ignored
        hex: String,

        /// Suppress warnings
        #[arg(long)]
        quiet: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Decode every frame of a capture, as text or as a JSON report.
    #[command(alias = "dissect")]
    #[command(
        after_help = "Examples:\n  pktscope pcap decode capture.pcapng\n  pktscope pcap dissect 'captures/*.pcap' --limit 100\n  pktscope pcap decode capture.pcap -o report.json --pretty"
    )]
    Decode {
        /// Path (or glob matching exactly one file) to a .pcap or .pcapng file
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long)]
        report: Option<PathBuf>,

        /// Write the JSON report to stdout instead of text
        #[arg(long, conflicts_with = "report")]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Stop after this many frames
        #[arg(long, value_name = "N")]
        limit: Option<u64>,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if any frame is invalid or has a bad IPv4 checksum
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pcap { command } => match command {
            PcapCommands::Decode {
                input,
                report,
                json,
                pretty,
                compact,
                limit,
                quiet,
                strict,
            } => {
                init_logging(quiet);
                let output = if json || report.is_some() {
                    Output::Json
                } else {
                    Output::Text
                };
                cmd_pcap_decode(
                    input,
                    report,
                    output,
                    pretty,
                    compact,
                    AnalyzeOptions { limit },
                    quiet,
                    strict,
                )
            }
        },
        Commands::Frame { hex, quiet } => {
            init_logging(quiet);
            cmd_frame(&hex)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "error" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_pcap_decode(
    input: PathBuf,
    report: Option<PathBuf>,
    output: Output,
    pretty: bool,
    compact: bool,
    options: AnalyzeOptions,
    quiet: bool,
    strict: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    if let Some(report_path) = report.as_ref() {
        ensure_distinct_output(&resolved_input, report_path)?;
    }

    let mut source = PcapFileSource::open(&resolved_input)
        .with_context(|| format!("Failed to open capture: {}", resolved_input.display()))?;
    let rep = pktscope_core::analyze_source(&resolved_input, &mut source, &options)
        .context("PCAP/PCAPNG decoding failed")?;

    match (output, report) {
        (Output::Text, _) => print_frames(&rep),
        (Output::Json, None) => println!("{}", serialize_report(&rep, pretty, compact)?),
        (Output::Json, Some(report)) => {
            let json = serialize_report(&rep, pretty, compact)?;
            if let Some(parent) = report.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&report, json)
                .with_context(|| format!("Failed to write report: {}", report.display()))?;
            if !quiet {
                eprintln!("OK: report written -> {}", report.display());
            }
        }
    }

    if !quiet {
        print_totals(&rep);
    }
    if strict {
        check_strict(&rep)?;
    }
    Ok(())
}

fn cmd_frame(hex: &str) -> Result<(), CliError> {
    let bytes = parse_hex(hex)?;
    let result = pktscope_core::decode(&bytes);

    for layer in result.layers() {
        println!("{}", layer.render());
    }
    println!("status: {}", result.status());
    if let Some(ip) = result.ipv4() {
        let verdict = if ip.checksum_valid() { "ok" } else { "mismatch" };
        println!("ipv4 checksum: {verdict} (0x{:04x})", ip.checksum());
    }
    Ok(())
}

fn serialize_report(rep: &CaptureReport, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_frames(rep: &CaptureReport) {
    for frame in &rep.frames {
        for line in frame_lines(frame) {
            println!("{line}");
        }
    }
}

/// `#<index> <first layer>` followed by indented lines for the rest.
fn frame_lines(frame: &FrameSummary) -> Vec<String> {
    let mut lines = Vec::with_capacity(frame.layers.len() + 2);
    let mut layers = frame.layers.iter();
    match layers.next() {
        Some(first) => lines.push(format!("#{} {}", frame.index, first.summary)),
        None => lines.push(format!(
            "#{} {}",
            frame.index,
            frame.detail.as_deref().unwrap_or(frame.status.as_str())
        )),
    }
    lines.extend(layers.map(|layer| format!("    {}", layer.summary)));
    if !frame.layers.is_empty() {
        if let Some(detail) = frame.detail.as_deref() {
            lines.push(format!("    ! {detail}"));
        }
    }
    if frame.ipv4_checksum_ok == Some(false) {
        lines.push("    ! IPv4 header checksum mismatch".to_string());
    }
    lines
}

fn print_totals(rep: &CaptureReport) {
    let frames_total = rep
        .capture_summary
        .as_ref()
        .map_or(0, |summary| summary.frames_total);
    let stats = &rep.stats;
    eprintln!(
        "{} frame(s): {} complete, {} truncated, {} invalid, {} skipped",
        frames_total,
        stats.complete,
        stats.truncated,
        stats.invalid_first_layer,
        stats.non_ethernet_skipped
    );
}

fn check_strict(rep: &CaptureReport) -> Result<(), CliError> {
    let invalid = rep.stats.invalid_first_layer;
    let bad_checksums = rep.stats.ipv4_checksum_failures;
    if invalid == 0 && bad_checksums == 0 {
        return Ok(());
    }
    Err(CliError::new(
        format!(
            "strict check failed: {invalid} invalid frame(s), {bad_checksums} IPv4 checksum mismatch(es)"
        ),
        Some("run without --strict to inspect the frames".to_string()),
    ))
}

fn parse_hex(input: &str) -> Result<Vec<u8>, CliError> {
    let digits: Vec<u8> = input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace() && *b != b':')
        .collect();
    let hint = Some("expected hex byte pairs, e.g. 'ff:ff:ff:ff:ff:ff ...'".to_string());
    if digits.len() % 2 != 0 {
        return Err(CliError::new(
            format!("odd number of hex digits ({})", digits.len()),
            hint,
        ));
    }
    digits
        .chunks_exact(2)
        .map(|pair| match (hex_value(pair[0]), hex_value(pair[1])) {
            (Some(high), Some(low)) => Ok((high << 4) | low),
            _ => Err(CliError::new(
                format!(
                    "invalid hex byte '{}'",
                    String::from_utf8_lossy(pair)
                ),
                hint.clone(),
            )),
        })
        .collect()
}

fn hex_value(digit: u8) -> Option<u8> {
    char::from(digit)
        .to_digit(16)
        .and_then(|value| u8::try_from(value).ok())
}

fn ensure_distinct_output(input: &Path, report_path: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let report_dir = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::canonicalize(parent),
        _ => fs::canonicalize("."),
    };
    // A missing output directory is created later and cannot hold the input.
    let Ok(report_dir) = report_dir else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        count => {
            let mut listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            if count > 3 {
                listed.push_str(", ...");
            }
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{}' ({} matches); matches: {}",
                    pattern, count, listed
                ),
                Some("pass a single capture file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
