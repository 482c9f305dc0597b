use crate::types::Protocol;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Display name for ports with no entry in the lookup table.
pub const UNKNOWN_SERVICE: &str = "Unknown Service";

/// Read-only port-number to service-name mapping, loaded once per protocol
/// before the scan starts.
#[derive(Debug, Clone, Default)]
pub struct ServiceTable {
    names: HashMap<u16, String>,
}

impl ServiceTable {
    /// An empty table; every lookup falls back to [`UNKNOWN_SERVICE`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `service-name,port-number` lines into a table.
    ///
    /// The lookup source is best-effort: lines without a comma or with a
    /// non-numeric port are skipped rather than failing the whole load.
    pub fn parse(s: &str) -> Self {
        let mut names = HashMap::new();
        for line in s.lines() {
            let Some((service, port)) = line.split_once(',') else {
                continue;
            };
            if let Ok(port) = port.trim().parse::<u16>() {
                names.insert(port, service.trim().to_string());
            }
        }
        Self { names }
    }

    /// Load a table from a file path.
    pub fn load_from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Conventional lookup-source file name for a protocol, e.g. `tcp-ports.txt`.
    pub fn default_path(protocol: Protocol) -> String {
        format!("{protocol}-ports.txt")
    }

    /// Load the per-protocol lookup source from the working directory, or warn
    /// once and return an empty table if it cannot be read.
    pub fn load_or_warn(protocol: Protocol) -> Self {
        let path = Self::default_path(protocol);
        match Self::load_from_path(&path) {
            Ok(table) => table,
            Err(_) => {
                eprintln!("Warning: {path} not found. Proceeding without service names.");
                Self::empty()
            }
        }
    }

    /// Service name for a port, falling back to [`UNKNOWN_SERVICE`].
    pub fn name_for(&self, port: u16) -> &str {
        self.names
            .get(&port)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_SERVICE)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
