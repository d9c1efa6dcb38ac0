//! Station map data.
//!
//! Builds the marker set for the map view from the rail directory, filtered
//! by the line names the user ticked.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::directory::{StationDirectory, StationEntry};

/// Marker image for stations.
pub const ICON_URL: &str = "https://cdn-icons-png.flaticon.com/128/684/684908.png";

/// Initial zoom level of the map view.
pub const DEFAULT_ZOOM: u8 = 11;

const ICON_SIZE: u32 = 128;

/// How a station marker is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconDescriptor {
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Pixels from the top of the image to the anchor point.
    pub anchor_y: u32,
}

impl Default for IconDescriptor {
    fn default() -> Self {
        Self {
            url: ICON_URL.to_string(),
            width: ICON_SIZE,
            height: ICON_SIZE,
            anchor_y: ICON_SIZE,
        }
    }
}

/// One station on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationMarker {
    pub name: String,
    pub lines: String,
    pub lat: f64,
    pub lon: f64,
}

/// Where the map opens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Everything the map view needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    /// Mean position of the markers; `None` when there are none.
    pub center: Option<MapCenter>,
    pub zoom: u8,
    pub icon: IconDescriptor,
    pub markers: Vec<StationMarker>,
}

/// Which line names to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineSelection {
    All,
    Only(BTreeSet<String>),
}

impl LineSelection {
    /// Build a selection from a comma-separated list of line names.
    ///
    /// `all` wins over any list.
    pub fn parse(lines: Option<&str>, all: bool) -> Self {
        if all {
            return LineSelection::All;
        }
        let selected = lines
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        LineSelection::Only(selected)
    }

    /// Whether a station serves any selected line.
    pub fn includes(&self, station: &StationEntry) -> bool {
        match self {
            LineSelection::All => true,
            LineSelection::Only(selected) => station.line_names().any(|l| selected.contains(l)),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, LineSelection::Only(selected) if selected.is_empty())
    }
}

/// Distinct line names of a directory.
///
/// Numeric names sort numerically and come first ("2" before "10"), then
/// the rest alphabetically.
pub fn available_lines(directory: &StationDirectory) -> Vec<String> {
    let mut lines: Vec<String> = directory
        .entries()
        .flat_map(|e| e.line_names())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    lines.sort_by_key(|l| (l.parse::<u32>().map_err(|_| ()), l.clone()));
    lines
}

/// Markers for the selected lines, centred on their mean position.
///
/// Stations without coordinates are left off.
pub fn map_view(directory: &StationDirectory, selection: &LineSelection) -> MapView {
    let markers: Vec<StationMarker> = directory
        .entries()
        .filter(|e| selection.includes(e))
        .filter_map(|e| {
            let position = e.coordinates?;
            Some(StationMarker {
                name: e.name.clone(),
                lines: e.lines.clone(),
                lat: position.lat,
                lon: position.lon,
            })
        })
        .collect();

    MapView {
        center: mean_position(&markers),
        zoom: DEFAULT_ZOOM,
        icon: IconDescriptor::default(),
        markers,
    }
}

fn mean_position(markers: &[StationMarker]) -> Option<MapCenter> {
    if markers.is_empty() {
        return None;
    }
    let n = markers.len() as f64;
    let (lat, lon) = markers
        .iter()
        .fold((0.0, 0.0), |(lat, lon), m| (lat + m.lat, lon + m.lon));
    Some(MapCenter {
        lat: lat / n,
        lon: lon / n,
    })
}
