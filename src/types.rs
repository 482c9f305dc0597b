use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// Transport protocol a probe runs over.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    /// Uppercase label used in report headers and service-table file names.
    pub fn label(self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
        }
    }
}

/// Classification of a single probe outcome.
///
/// `Closed` is only ever produced transiently by a UDP probe; the scheduler
/// drops it before it reaches a result collection.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortStatus {
    Open,
    OpenFiltered,
    Closed,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortStatus::Open => write!(f, "Open"),
            PortStatus::OpenFiltered => write!(f, "Possibly Open/Filtered"),
            PortStatus::Closed => write!(f, "Closed"),
        }
    }
}

/// One retained probe outcome for a port.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortReport {
    pub port: u16,
    pub status: PortStatus,
}

/// Everything the scanner needs to know about one scan, built once from user
/// input and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ScanTarget {
    pub addr: IpAddr,
    pub start_port: u16,
    pub end_port: u16,
    pub protocols: Vec<Protocol>,
    pub timeout: Duration,
    pub concurrency: usize,
}

/// Aggregate results and progress counters for a finished (or interrupted) scan.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ScanResults {
    pub started_at: String,
    pub scanned_total: u64,
    pub scanned_done: u64,
    pub interrupted: bool,
    pub tcp: Vec<PortReport>,
    pub udp: Vec<PortReport>,
}

impl ScanResults {
    /// The retained results for one protocol.
    pub fn for_protocol(&self, protocol: Protocol) -> &[PortReport] {
        match protocol {
            Protocol::Tcp => &self.tcp,
            Protocol::Udp => &self.udp,
        }
    }
}
