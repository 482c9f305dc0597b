use crate::types::{PortReport, PortStatus, Protocol, ScanResults, ScanTarget};
use anyhow::Result;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpStream, UdpSocket};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio::time;
use tokio_util::sync::CancellationToken;
use ::time::{format_description::well_known, OffsetDateTime};

/// Scan the target's port range over the selected protocols using
/// asynchronous probes with a concurrency limit.
///
/// - Limits concurrent socket attempts using a `Semaphore`.
/// - Uses `tokio::time::timeout` to bound each probe.
/// - Appends retained results to per-protocol collections behind a `Mutex`.
/// - Tracks progress counters and returns them in `ScanResults`.
pub async fn scan(target: &ScanTarget) -> Result<ScanResults> {
    scan_internal(target, CancellationToken::new()).await
}

/// Variant that accepts a `CancellationToken` to allow external cancellation.
///
/// Cancellation is cooperative: the dispatch loop stops handing out new work,
/// in-flight probes finish or bail, and the function still returns whatever
/// accumulated, with `interrupted` set.
pub async fn scan_with_cancel(
    target: &ScanTarget,
    cancel: CancellationToken,
) -> Result<ScanResults> {
    scan_internal(target, cancel).await
}

async fn scan_internal(target: &ScanTarget, cancel: CancellationToken) -> Result<ScanResults> {
    let span = target.end_port as u64 - target.start_port as u64 + 1;
    let total = span * target.protocols.len() as u64;
    let started_at = now_iso_like();

    let scanned_done = Arc::new(AtomicU64::new(0));
    let tcp_entries: Arc<Mutex<Vec<PortReport>>> = Arc::new(Mutex::new(Vec::new()));
    let udp_entries: Arc<Mutex<Vec<PortReport>>> = Arc::new(Mutex::new(Vec::new()));

    let sem = Arc::new(Semaphore::new(target.concurrency.clamp(1, 5_000)));
    let mut set = JoinSet::new();

    'dispatch: for port in target.start_port..=target.end_port {
        for &protocol in &target.protocols {
            if cancel.is_cancelled() {
                break 'dispatch;
            }
            let permit = sem
                .clone()
                .acquire_owned()
                .await
                .expect("semaphore in scope");
            let entries = match protocol {
                Protocol::Tcp => tcp_entries.clone(),
                Protocol::Udp => udp_entries.clone(),
            };
            let scanned_done = scanned_done.clone();
            let cancel = cancel.clone();
            let addr = target.addr;
            let timeout = target.timeout;

            set.spawn(async move {
                let _permit = permit; // keep permit until task completes

                if cancel.is_cancelled() {
                    return;
                }

                let report = match protocol {
                    Protocol::Tcp => probe_tcp(addr, port, timeout).await,
                    Protocol::Udp => {
                        let report = probe_udp(addr, port, timeout).await;
                        // Definite Closed is never retained for display.
                        (report.status != PortStatus::Closed).then_some(report)
                    }
                };
                if let Some(report) = report {
                    let mut guard = entries.lock().await;
                    guard.push(report);
                }

                scanned_done.fetch_add(1, Ordering::Relaxed);
            });
        }
    }

    // Drain every in-flight probe before touching the collections, so the
    // finalization read cannot race with a late append.
    while let Some(_res) = set.join_next().await {}

    let tcp = std::mem::take(&mut *tcp_entries.lock().await);
    let udp = std::mem::take(&mut *udp_entries.lock().await);

    Ok(ScanResults {
        started_at,
        scanned_total: total,
        scanned_done: scanned_done.load(Ordering::Relaxed),
        interrupted: cancel.is_cancelled(),
        tcp,
        udp,
    })
}

/// Attempt a full TCP connect to `addr:port` within `timeout`.
///
/// Only an established connection is reported; refused, timed-out, and
/// unreachable ports are silently discarded. The stream is dropped before
/// returning, so no socket outlives the probe.
pub async fn probe_tcp(addr: IpAddr, port: u16, timeout: Duration) -> Option<PortReport> {
    let sockaddr = SocketAddr::new(addr, port);
    match time::timeout(timeout, TcpStream::connect(sockaddr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            Some(PortReport {
                port,
                status: PortStatus::Open,
            })
        }
        _ => None,
    }
}

/// Send an empty datagram to `addr:port` and wait up to `timeout` for a reply.
///
/// Any reply classifies the port as `Open`. Silence is `OpenFiltered`,
/// since UDP gives no way to tell open-but-quiet from filtered. A receive error
/// (ICMP port-unreachable delivered through the connected socket) or any
/// socket setup failure classifies as `Closed`.
pub async fn probe_udp(addr: IpAddr, port: u16, timeout: Duration) -> PortReport {
    let closed = PortReport {
        port,
        status: PortStatus::Closed,
    };

    // Bind to the unspecified address of the target's family; connecting the
    // socket routes ICMP errors for this destination back to our recv call.
    let bind_addr = match addr {
        IpAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
        IpAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
    };
    let socket = match UdpSocket::bind(bind_addr).await {
        Ok(socket) => socket,
        Err(_) => return closed,
    };
    if socket.connect(SocketAddr::new(addr, port)).await.is_err() {
        return closed;
    }
    if socket.send(&[]).await.is_err() {
        return closed;
    }

    let mut buf = [0u8; 1024];
    let status = match time::timeout(timeout, socket.recv(&mut buf)).await {
        Ok(Ok(_)) => PortStatus::Open,
        Ok(Err(_)) => PortStatus::Closed,
        Err(_) => PortStatus::OpenFiltered,
    };
    PortReport { port, status }
}

fn now_iso_like() -> String {
    // RFC3339-like UTC timestamp using `time` crate for correctness without heavy deps.
    let now = OffsetDateTime::now_utc();
    now.format(&well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}
