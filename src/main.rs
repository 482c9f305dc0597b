use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use portscan_rs::services::ServiceTable;
use portscan_rs::types::{Protocol, ScanResults, ScanTarget};
use portscan_rs::{ports, report, resolve, scanner};

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;

/// portscan-rs — Concurrent TCP/UDP port scanner with range-coalesced, service-annotated output.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "portscan-rs",
    version,
    about = "Concurrent TCP/UDP port scanner with range-coalesced, service-annotated output.",
    long_about = None
)]
struct Cli {
    /// Hostname or IP address of the target.
    hostname: String,

    /// First port to scan (inclusive).
    #[arg(short = 's', long = "startport", default_value_t = 1)]
    startport: u16,

    /// Last port to scan (inclusive).
    #[arg(short = 'e', long = "endport", default_value_t = 65535)]
    endport: u16,

    /// Port range as <start>-<end> (e.g. 20-80); overrides --startport/--endport.
    #[arg(short = 'p', long = "portrange", value_name = "START-END")]
    portrange: Option<String>,

    /// Include TCP ports in the scan.
    #[arg(short = 't', long = "tcp")]
    tcp: bool,

    /// Include UDP ports in the scan.
    #[arg(short = 'u', long = "udp")]
    udp: bool,

    /// Max concurrent probes.
    #[arg(long, default_value_t = 100)]
    concurrency: usize,

    /// Per-probe timeout in milliseconds.
    #[arg(long = "timeout-ms", default_value_t = 1_000)]
    timeout_ms: u64,

    /// Write results as pretty JSON to this path (optional).
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // All range validation happens before any socket is opened.
    let (start_port, end_port) = match cli.portrange.as_deref() {
        Some(range) => ports::parse_port_range(range)?,
        None => {
            ports::validate_bounds(cli.startport, cli.endport)?;
            (cli.startport, cli.endport)
        }
    };

    let mut protocols = Vec::new();
    if cli.tcp {
        protocols.push(Protocol::Tcp);
    }
    if cli.udp {
        protocols.push(Protocol::Udp);
    }
    if protocols.is_empty() {
        println!("No protocol selected, defaulting to TCP.");
        protocols.push(Protocol::Tcp);
    }

    // Resolution failure is fatal: no partial output, non-zero exit.
    let addr = resolve::resolve_target(&cli.hostname).await?;

    let tcp_services = ServiceTable::load_or_warn(Protocol::Tcp);
    let udp_services = ServiceTable::load_or_warn(Protocol::Udp);

    let target = ScanTarget {
        addr,
        start_port,
        end_port,
        protocols,
        timeout: Duration::from_millis(cli.timeout_ms),
        concurrency: cli.concurrency,
    };

    println!("Starting scan on host: {addr}");

    // Ctrl-C flips the token; the scheduler stops dispatching and returns
    // whatever accumulated, so the summary below covers both exit paths.
    let cancel = CancellationToken::new();
    let cancel_ctrlc = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        println!("\nScan interrupted, printing results...");
        cancel_ctrlc.cancel();
    });

    let results = scanner::scan_with_cancel(&target, cancel).await?;

    report::print_summary(&results, &tcp_services, &udp_services);

    if let Some(path) = cli.output.as_deref() {
        if let Err(e) = write_results_json(path, &results) {
            eprintln!("Failed to write JSON to {}: {}", path.display(), e);
        } else {
            println!("Wrote JSON results to {}", path.display());
        }
    }

    Ok(())
}

fn write_results_json(path: &std::path::Path, results: &ScanResults) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, results)?;
    Ok(())
}
