use std::fs;
use std::net::{SocketAddr, UdpSocket};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use artwire_core::{
    ARTNET_PORT, DMX_MAX_SLOTS, PacketRecord, PortFilter, decode, decode_buffer,
};
use clap::{ArgAction, Parser, Subcommand};
use glob::glob;
use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing_subscriber::EnvFilter;

/// Matches the receive buffer of common Art-Net nodes; an ArtDMX datagram is
/// at most 530 bytes.
const RECEIVE_BUFFER_LEN: usize = 1024;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("ARTWIRE_BUILD_COMMIT"),
    ", built ",
    env!("ARTWIRE_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "artwire")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decode Art-Net poll, poll reply and DMX traffic.",
    long_about = None,
    after_help = "Examples:\n  artwire listen --channels 1:16\n  artwire decode datagram.bin\n  artwire replay capture.pcapng -o report.json"
)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Receive datagrams on a UDP socket and print what they decode to.
    Listen {
        /// Local address to bind
        #[arg(long, default_value_t = SocketAddr::from(([0, 0, 0, 0], ARTNET_PORT)))]
        bind: SocketAddr,

        /// Stop after this many datagrams
        #[arg(long)]
        count: Option<u64>,

        /// Print one JSON record per datagram
        #[arg(long)]
        json: bool,

        /// Also print channels FROM:AMOUNT (1-based) of every DMX packet
        #[arg(long, value_parser = parse_channel_window)]
        channels: Option<ChannelWindow>,

        /// Separator between channel values
        #[arg(long, default_value = " ")]
        delimiter: String,
    },
    /// Decode a file holding one raw Art-Net datagram.
    Decode {
        /// Path (or glob matching exactly one file) of the datagram
        input: PathBuf,

        /// Sender address to attach to the decoded packet
        #[arg(long, default_value_t = SocketAddr::from(([0, 0, 0, 0], 0)))]
        source: SocketAddr,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Decode the Art-Net traffic of a capture file into a JSON report.
    #[command(
        after_help = "Examples:\n  artwire replay capture.pcapng -o report.json\n  artwire replay capture.pcap --stdout --any-port"
    )]
    Replay {
        /// Path to a .pcap or .pcapng file
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// UDP port carrying Art-Net
        #[arg(long, default_value_t = ARTNET_PORT)]
        port: u16,

        /// Decode every UDP datagram regardless of port
        #[arg(long)]
        any_port: bool,

        /// Exit with a non-zero code if any datagram failed to decode
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Debug, Clone, Copy)]
struct ChannelWindow {
    from: usize,
    amount: usize,
}

fn parse_channel_window(value: &str) -> Result<ChannelWindow, String> {
    let (from, amount) = value
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:AMOUNT, got '{value}'"))?;
    let from: usize = from
        .parse()
        .map_err(|_| format!("invalid channel '{from}'"))?;
    let amount: usize = amount
        .parse()
        .map_err(|_| format!("invalid amount '{amount}'"))?;
    if from == 0
        || from
            .checked_add(amount)
            .is_none_or(|end| end > DMX_MAX_SLOTS + 1)
    {
        return Err(format!("channels must stay within 1..={DMX_MAX_SLOTS}"));
    }
    Ok(ChannelWindow { from, amount })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Listen {
            bind,
            count,
            json,
            channels,
            delimiter,
        } => cmd_listen(bind, count, json, channels, &delimiter),
        Commands::Decode {
            input,
            source,
            pretty,
        } => cmd_decode(input, source, pretty),
        Commands::Replay {
            input,
            report,
            stdout,
            pretty,
            port,
            any_port,
            strict,
        } => {
            let filter = if any_port {
                PortFilter::Any
            } else {
                PortFilter::Port(port)
            };
            cmd_replay(input, report, stdout, pretty, filter, cli.quiet, strict)
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

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
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

#[derive(Serialize)]
struct ListenLine<'a> {
    received_at: String,
    #[serde(flatten)]
    record: &'a PacketRecord,
}

fn cmd_listen(
    bind: SocketAddr,
    count: Option<u64>,
    json: bool,
    channels: Option<ChannelWindow>,
    delimiter: &str,
) -> Result<(), CliError> {
    let socket = UdpSocket::bind(bind).map_err(|err| {
        CliError::new(
            format!("cannot bind {bind}: {err}"),
            Some(format!(
                "another Art-Net application may already own port {}",
                bind.port()
            )),
        )
    })?;
    tracing::info!(%bind, "listening for Art-Net datagrams");

    let mut buf = [0u8; RECEIVE_BUFFER_LEN];
    let mut received = 0u64;
    while count.is_none_or(|limit| received < limit) {
        let (n, sender) = socket
            .recv_from(&mut buf)
            .context("failed to receive datagram")?;
        received += 1;
        let result = decode_buffer(&buf, n, sender);

        if json {
            let record = PacketRecord::from_result(&result, None);
            let line = ListenLine {
                received_at: now_rfc3339(),
                record: &record,
            };
            println!(
                "{}",
                serde_json::to_string(&line).context("JSON serialization failed")?
            );
            continue;
        }

        match result {
            Ok(packet) => {
                println!("{packet}");
                if let Some(window) = channels.filter(|_| packet.has_channel_data()) {
                    let values = packet
                        .channels_as_joined_string(window.from, window.amount, delimiter)
                        .context("channel window out of range")?;
                    println!(
                        "  {}-{}: {}",
                        window.from,
                        window.from + window.amount.saturating_sub(1),
                        values
                    );
                }
            }
            Err(err) => tracing::warn!(source = %err.partial().source(), "{err}"),
        }
    }
    Ok(())
}

fn cmd_decode(input: PathBuf, source: SocketAddr, pretty: bool) -> Result<(), CliError> {
    let resolved = resolve_input_path(&input)?;
    if !resolved.is_file() {
        return Err(CliError::new(
            format!("input file not found: {}", resolved.display()),
            Some("pass a file containing one raw Art-Net datagram".to_string()),
        ));
    }
    let datagram = fs::read(&resolved)
        .with_context(|| format!("Failed to read input file: {}", resolved.display()))?;

    let result = decode(&datagram, source);
    let record = PacketRecord::from_result(&result, None);
    println!("{}", to_json(&record, pretty)?);

    match result {
        Ok(_) => Ok(()),
        Err(err) => Err(CliError::new(
            format!("datagram did not decode: {err}"),
            Some(format!("error kind: {}", err.error().kind())),
        )),
    }
}

fn cmd_replay(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    filter: PortFilter,
    quiet: bool,
    strict: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_capture_file(&resolved_input)?;

    let report_path = if stdout {
        None
    } else {
        let path = report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        ensure_distinct_paths(&resolved_input, &path)?;
        Some(path)
    };

    let rep = artwire_core::replay_pcap_file(&resolved_input, filter)
        .context("capture replay failed")?;
    let json = to_json(&rep, pretty)?;

    match report_path {
        None => print!("{}", json),
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&path, json)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            if !quiet {
                eprintln!("OK: report written -> {}", path.display());
            }
        }
    }

    tracing::debug!(
        datagrams = rep.summary.datagrams,
        decoded = rep.summary.decoded,
        "replay complete"
    );
    if strict && rep.summary.has_errors() {
        return Err(CliError::new(
            "decode errors detected",
            Some(format!("error counts: {:?}", rep.summary.errors)),
        ));
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("JSON serialization failed").map_err(Into::into)
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| artwire_core::DEFAULT_GENERATED_AT.to_string())
}

fn ensure_distinct_paths(input: &Path, report: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let parent = match report.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // Output directory does not exist yet.
    let Ok(report_dir) = fs::canonicalize(parent) else {
        return Ok(());
    };
    let file_name = report
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("report path must differ from input: {}", report.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_capture_file(input: &Path) -> Result<(), CliError> {
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

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
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
            Some("check the path or quote the pattern".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        total => {
            let listed = matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let more = if total > 3 { ", ..." } else { "" };
            Err(CliError::new(
                format!(
                    "multiple files match pattern '{}' ({} matches); matches: {}{}",
                    pattern, total, listed, more
                ),
                Some("pass a single file, or run once per file".to_string()),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

#[cfg(test)]
mod tests {
    use super::{is_glob_pattern, parse_channel_window};

    #[test]
    fn channel_window_parses_and_validates() {
        let window = parse_channel_window("1:16").unwrap();
        assert_eq!((window.from, window.amount), (1, 16));
        assert!(parse_channel_window("512:1").is_ok());
        assert!(parse_channel_window("0:4").is_err());
        assert!(parse_channel_window("500:20").is_err());
        assert!(parse_channel_window("500:13").is_ok());
        assert!(parse_channel_window("1:18446744073709551615").is_err());
        assert!(parse_channel_window("16").is_err());
    }

    #[test]
    fn glob_detection() {
        assert!(is_glob_pattern("captures/*.pcapng"));
        assert!(!is_glob_pattern("capture.pcapng"));
    }
}
