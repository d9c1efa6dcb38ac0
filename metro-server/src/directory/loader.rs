//! Station directory loading.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::domain::TransportMode;

use super::error::DirectoryError;

/// Column holding the station display name (both modes).
const NAME_COLUMN: &str = "Denominació / Denominación";
/// Column holding the rail status page URL.
const RAIL_URL_COLUMN: &str = "Pròximes Arribades / Próximas llegadas";
/// Column holding the bus status page URL.
const BUS_URL_COLUMN: &str = "Pròximes Arribades / Proximas llegadas";
/// Column holding "lat,lon".
const COORDINATES_COLUMN: &str = "geo_point_2d";
/// Column holding the line names serving a station.
const LINES_COLUMN: &str = "Línies / Líneas";

/// Header names to read from a directory file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySchema {
    /// Required: station display name
    pub name_column: String,
    /// Required: status page URL
    pub url_column: String,
    /// Optional: "lat,lon" position
    pub coordinates_column: String,
    /// Optional: line names
    pub lines_column: String,
}

impl DirectorySchema {
    /// Default column names of the open-data export for `mode`.
    pub fn for_mode(mode: TransportMode) -> Self {
        let url_column = match mode {
            TransportMode::Rail => RAIL_URL_COLUMN,
            TransportMode::Bus => BUS_URL_COLUMN,
        };
        Self {
            name_column: NAME_COLUMN.to_string(),
            url_column: url_column.to_string(),
            coordinates_column: COORDINATES_COLUMN.to_string(),
            lines_column: LINES_COLUMN.to_string(),
        }
    }

    /// Read the status page URL from a different column.
    pub fn with_url_column(mut self, column: impl Into<String>) -> Self {
        self.url_column = column.into();
        self
    }
}

/// A station position in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Parse a `"lat,lon"` pair.
    ///
    /// Returns `None` for anything that is not two in-range numbers.
    pub fn parse(s: &str) -> Option<Self> {
        let (lat, lon) = s.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lon: f64 = lon.trim().parse().ok()?;
        let valid = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon);
        valid.then_some(Self { lat, lon })
    }
}

/// One row of a station directory.
#[derive(Debug, Clone, PartialEq)]
pub struct StationEntry {
    pub name: String,
    pub lookup_url: String,
    pub coordinates: Option<Coordinates>,
    /// Line names as published, e.g. "3, 5, 9". Empty when unknown.
    pub lines: String,
}

impl StationEntry {
    /// Individual line names, split on commas: "3, 5" gives "3" and "5".
    pub fn line_names(&self) -> impl Iterator<Item = &str> {
        self.lines.split(',').map(str::trim).filter(|l| !l.is_empty())
    }
}

/// Immutable name → entry lookup for one transport mode.
///
/// Names are unique; when a file repeats a name, the first row wins.
#[derive(Debug, Clone)]
pub struct StationDirectory {
    mode: TransportMode,
    entries: BTreeMap<String, StationEntry>,
}

impl StationDirectory {
    /// A directory with no stations.
    pub fn empty(mode: TransportMode) -> Self {
        Self {
            mode,
            entries: BTreeMap::new(),
        }
    }

    /// Build a directory from already-parsed entries.
    pub fn from_entries(mode: TransportMode, entries: impl IntoIterator<Item = StationEntry>) -> Self {
        let mut directory = Self::empty(mode);
        for entry in entries {
            directory.insert(entry);
        }
        directory
    }

    /// Load a directory file from disk.
    pub fn from_path(
        mode: TransportMode,
        path: impl AsRef<Path>,
        schema: &DirectorySchema,
    ) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| DirectoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let directory = Self::from_reader(mode, file, schema)?;
        info!(
            %mode,
            path = %path.display(),
            stations = directory.len(),
            "loaded station directory"
        );
        Ok(directory)
    }

    /// Load a directory from semicolon-separated text.
    ///
    /// Rows without a name or URL, and rows that are not valid UTF-8, are
    /// skipped with a warning.
    pub fn from_reader<R: Read>(
        mode: TransportMode,
        reader: R,
        schema: &DirectorySchema,
    ) -> Result<Self, DirectoryError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };
        let required = |name: &str| {
            column(name).ok_or_else(|| DirectoryError::MissingColumn {
                column: name.to_string(),
            })
        };

        let name_idx = required(&schema.name_column)?;
        let url_idx = required(&schema.url_column)?;
        let coordinates_idx = column(&schema.coordinates_column);
        let lines_idx = column(&schema.lines_column);

        let mut directory = Self::empty(mode);
        for (row, result) in rdr.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!(%mode, row, error = %e, "skipping unreadable station row");
                    continue;
                }
            };

            let field = |idx: Option<usize>| {
                idx.and_then(|i| record.get(i))
                    .map(str::trim)
                    .unwrap_or_default()
            };

            let name = field(Some(name_idx));
            let lookup_url = field(Some(url_idx));
            if name.is_empty() || lookup_url.is_empty() {
                warn!(%mode, row, "skipping station row without name or URL");
                continue;
            }

            directory.insert(StationEntry {
                name: name.to_string(),
                lookup_url: lookup_url.to_string(),
                coordinates: Coordinates::parse(field(coordinates_idx)),
                lines: field(lines_idx).to_string(),
            });
        }

        Ok(directory)
    }

    fn insert(&mut self, entry: StationEntry) {
        self.entries.entry(entry.name.clone()).or_insert(entry);
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a station by its exact display name.
    pub fn get(&self, name: &str) -> Option<&StationEntry> {
        self.entries.get(name)
    }

    /// All entries, ordered by name.
    pub fn entries(&self) -> impl Iterator<Item = &StationEntry> {
        self.entries.values()
    }

    /// Names containing `query`, case-insensitively, in ascending order.
    ///
    /// An empty query matches every station.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let needle = query.trim().to_lowercase();
        self.entries
            .keys()
            .filter(|name| name.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const RAIL_CSV: &str = "\
Codi / Código;Denominació / Denominación;Línies / Líneas;Pròximes Arribades / Próximas llegadas;geo_point_2d
1;Alameda;3, 5, 7, 9;https://example.test/arrivals?s=1;39.4745, -0.3649
2;Bétera;1;https://example.test/arrivals?s=2;39.5911,-0.4615
3;Aeroport;3, 5;https://example.test/arrivals?s=3;not a point
4;;1;https://example.test/arrivals?s=4;39.0,-0.3
5;Empalme;1, 2;;39.5,-0.4
6;Alameda;3;https://example.test/duplicate;39.0,-0.3
";

    fn rail(csv: &str) -> StationDirectory {
        StationDirectory::from_reader(
            TransportMode::Rail,
            csv.as_bytes(),
            &DirectorySchema::for_mode(TransportMode::Rail),
        )
        .unwrap()
    }

    #[test]
    fn loads_valid_rows() {
        let dir = rail(RAIL_CSV);
        assert_eq!(dir.len(), 3);
        assert_eq!(dir.mode(), TransportMode::Rail);

        let alameda = dir.get("Alameda").unwrap();
        assert_eq!(alameda.lookup_url, "https://example.test/arrivals?s=1");
        assert_eq!(alameda.lines, "3, 5, 7, 9");
        assert_eq!(
            alameda.coordinates,
            Some(Coordinates {
                lat: 39.4745,
                lon: -0.3649
            })
        );
    }

    #[test]
    fn first_duplicate_wins() {
        let dir = rail(RAIL_CSV);
        assert_eq!(
            dir.get("Alameda").unwrap().lookup_url,
            "https://example.test/arrivals?s=1"
        );
    }

    #[test]
    fn bad_coordinates_are_none() {
        let dir = rail(RAIL_CSV);
        assert_eq!(dir.get("Aeroport").unwrap().coordinates, None);
    }

    #[test]
    fn missing_required_column() {
        let err = StationDirectory::from_reader(
            TransportMode::Bus,
            RAIL_CSV.as_bytes(),
            &DirectorySchema::for_mode(TransportMode::Bus),
        )
        .unwrap_err();
        assert!(matches!(err, DirectoryError::MissingColumn { column } if column == BUS_URL_COLUMN));
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let csv = "Denominació / Denominación;Pròximes Arribades / Proximas llegadas\n\
                   Pl. Ajuntament;https://example.test/bus?p=1\n";
        let dir = StationDirectory::from_reader(
            TransportMode::Bus,
            csv.as_bytes(),
            &DirectorySchema::for_mode(TransportMode::Bus),
        )
        .unwrap();
        let entry = dir.get("Pl. Ajuntament").unwrap();
        assert_eq!(entry.coordinates, None);
        assert_eq!(entry.lines, "");
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let csv = "\u{feff}Denominació / Denominación;Pròximes Arribades / Próximas llegadas\n\
                   Xàtiva;https://example.test/x\n";
        let dir = rail(csv);
        assert!(dir.get("Xàtiva").is_some());
    }

    #[test]
    fn custom_url_column() {
        let csv = "Denominació / Denominación;url\nColón;https://example.test/c\n";
        let schema = DirectorySchema::for_mode(TransportMode::Rail).with_url_column("url");
        let dir = StationDirectory::from_reader(TransportMode::Rail, csv.as_bytes(), &schema).unwrap();
        assert_eq!(dir.get("Colón").unwrap().lookup_url, "https://example.test/c");
    }

    #[test]
    fn search_is_case_insensitive_and_sorted() {
        let dir = rail(RAIL_CSV);
        assert_eq!(dir.search("A"), vec!["Aeroport", "Alameda", "Bétera"]);
        assert_eq!(dir.search("BÉT"), vec!["Bétera"]);
        assert_eq!(dir.search("  ala "), vec!["Alameda"]);
        assert!(dir.search("zzz").is_empty());
    }

    #[test]
    fn empty_query_matches_all() {
        let dir = rail(RAIL_CSV);
        assert_eq!(dir.search("").len(), dir.len());
    }

    #[test]
    fn from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RAIL_CSV.as_bytes()).unwrap();

        let dir = StationDirectory::from_path(
            TransportMode::Rail,
            file.path(),
            &DirectorySchema::for_mode(TransportMode::Rail),
        )
        .unwrap();
        assert_eq!(dir.len(), 3);
    }

    #[test]
    fn from_path_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = StationDirectory::from_path(
            TransportMode::Rail,
            tmp.path().join("missing.csv"),
            &DirectorySchema::for_mode(TransportMode::Rail),
        )
        .unwrap_err();
        assert!(matches!(err, DirectoryError::Io { .. }));
    }

    #[test]
    fn line_names_split_on_commas() {
        let dir = rail(RAIL_CSV);
        let names: Vec<_> = dir.get("Alameda").unwrap().line_names().collect();
        assert_eq!(names, ["3", "5", "7", "9"]);
    }

    #[test]
    fn coordinates_parse() {
        assert_eq!(
            Coordinates::parse("39.47,-0.37"),
            Some(Coordinates {
                lat: 39.47,
                lon: -0.37
            })
        );
        assert_eq!(Coordinates::parse("39.47"), None);
        assert_eq!(Coordinates::parse("139.47,-0.37"), None);
        assert_eq!(Coordinates::parse(""), None);
    }
}
