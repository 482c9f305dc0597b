use crate::services::ServiceTable;
use crate::types::{PortReport, PortStatus, Protocol, ScanResults};

/// A run of contiguous ports sharing one status. Built transiently for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
    pub status: PortStatus,
}

/// Merge per-port results into ranges of contiguous ports with identical status.
///
/// Results arrive in completion order; they are sorted by port here, so the
/// scheduler never has to preserve submission order. A gap in port numbers or
/// a change of status closes the current range.
pub fn coalesce(reports: &[PortReport]) -> Vec<PortRange> {
    let mut sorted = reports.to_vec();
    sorted.sort_unstable_by_key(|r| r.port);

    let mut ranges = Vec::new();
    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return ranges;
    };
    let mut current = PortRange {
        start: first.port,
        end: first.port,
        status: first.status,
    };
    for report in iter {
        let contiguous = u32::from(report.port) == u32::from(current.end) + 1;
        if contiguous && report.status == current.status {
            current.end = report.port;
        } else {
            ranges.push(current);
            current = PortRange {
                start: report.port,
                end: report.port,
                status: report.status,
            };
        }
    }
    ranges.push(current);
    ranges
}

/// Render ranges as printable lines, annotated with service names.
///
/// Start and end services are looked up independently; they can differ within
/// one contiguous-status range.
pub fn render(ranges: &[PortRange], protocol: Protocol, services: &ServiceTable) -> Vec<String> {
    ranges
        .iter()
        .map(|range| {
            if range.start == range.end {
                format!(
                    "[{}] Port {} ({}) is {}",
                    protocol.label(),
                    range.start,
                    services.name_for(range.start),
                    range.status
                )
            } else {
                format!(
                    "[{}] Ports {}-{} ({} to {}) are {}",
                    protocol.label(),
                    range.start,
                    range.end,
                    services.name_for(range.start),
                    services.name_for(range.end),
                    range.status
                )
            }
        })
        .collect()
}

/// Coalesce and render one protocol's results. Empty results render nothing.
pub fn render_results(
    reports: &[PortReport],
    protocol: Protocol,
    services: &ServiceTable,
) -> Vec<String> {
    if reports.is_empty() {
        return Vec::new();
    }
    render(&coalesce(reports), protocol, services)
}

/// Print the TCP block then the UDP block. The single finalization sink for
/// both normal completion and interruption.
pub fn print_summary(
    results: &ScanResults,
    tcp_services: &ServiceTable,
    udp_services: &ServiceTable,
) {
    for (protocol, services) in [
        (Protocol::Tcp, tcp_services),
        (Protocol::Udp, udp_services),
    ] {
        for line in render_results(results.for_protocol(protocol), protocol, services) {
            println!("{line}");
        }
    }
}
