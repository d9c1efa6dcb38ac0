//! Stop resolution across transport modes.

use crate::domain::TransportMode;

use super::loader::{StationDirectory, StationEntry};

/// The chosen station is not in the directory for that mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("station {name:?} not found in the {mode} directory")]
pub struct NotFound {
    pub mode: TransportMode,
    pub name: String,
}

/// Maps user-facing stop names to directory entries.
///
/// Holds one directory per mode. Loaded once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct StopResolver {
    rail: StationDirectory,
    bus: StationDirectory,
}

impl StopResolver {
    pub fn new(rail: StationDirectory, bus: StationDirectory) -> Self {
        Self { rail, bus }
    }

    /// The directory for `mode`.
    pub fn directory(&self, mode: TransportMode) -> &StationDirectory {
        match mode {
            TransportMode::Rail => &self.rail,
            TransportMode::Bus => &self.bus,
        }
    }

    /// Station names of `mode` containing `query` (case-insensitive), sorted.
    pub fn search(&self, mode: TransportMode, query: &str) -> Vec<&str> {
        self.directory(mode).search(query)
    }

    /// Look up the entry for a chosen station name.
    pub fn resolve(&self, mode: TransportMode, name: &str) -> Result<&StationEntry, NotFound> {
        let name = name.trim();
        self.directory(mode).get(name).ok_or_else(|| NotFound {
            mode,
            name: name.to_string(),
        })
    }
}
