//! Askama templates for the web frontend.

use askama::Template;

use crate::board::ArrivalBoard;
use crate::domain::TransportMode;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Welcome page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate;

/// Arrivals page for one transport mode.
#[derive(Template)]
#[template(path = "arrivals.html")]
pub struct ArrivalsTemplate {
    pub mode: String,
    pub mode_label: String,
    pub query: String,
    pub stations: Vec<StationOption>,
    /// The chosen station, if any
    pub station: Option<String>,
    pub board: BoardFragmentTemplate,
    pub refresh_ms: u128,
}

/// Station map page.
#[derive(Template)]
#[template(path = "map.html")]
pub struct MapTemplate {
    pub lines: Vec<String>,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// Fragment Templates (live updates, no base.html)
// ============================================================================

/// Arrival board fragment, or the reason there is none.
#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardFragmentTemplate {
    pub board: Option<BoardView>,
    pub error: Option<String>,
}

impl BoardFragmentTemplate {
    pub fn board(board: &ArrivalBoard) -> Self {
        Self {
            board: Some(BoardView::from_board(board)),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            board: None,
            error: Some(message.into()),
        }
    }

    /// Nothing selected yet.
    pub fn empty() -> Self {
        Self {
            board: None,
            error: None,
        }
    }
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Entry in the station selection list.
#[derive(Debug, Clone)]
pub struct StationOption {
    pub name: String,
    pub selected: bool,
}

/// Board view model for templates.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub station: String,
    pub mode_label: String,
    pub computed_at: String,
    pub rows: Vec<ArrivalRow>,
}

impl BoardView {
    pub fn from_board(board: &ArrivalBoard) -> Self {
        let rows = board
            .arrivals
            .iter()
            .map(|a| ArrivalRow {
                line: a.line.clone(),
                destination: a.destination.clone(),
                time: a.raw_time.clone(),
                remaining: a.remaining.to_string(),
                is_unknown: a.remaining.is_unknown(),
            })
            .collect();

        Self {
            station: board.station.clone(),
            mode_label: mode_label(board.mode),
            computed_at: board.computed_at.format("%H:%M:%S").to_string(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One table row.
#[derive(Debug, Clone)]
pub struct ArrivalRow {
    pub line: String,
    pub destination: String,
    pub time: String,
    pub remaining: String,
    pub is_unknown: bool,
}

fn mode_label(mode: TransportMode) -> String {
    mode.label().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    const PAGE: &str = r#"
        <div style="padding-left: 5px"><img src="/l_3.png"><b>Aeroport &amp; <i>Manises</i></b><span>13:05:00</span></div>
    "#;

    fn board() -> ArrivalBoard {
        let now = NaiveTime::from_hms_opt(13, 0, 0).unwrap();
        ArrivalBoard::from_markup(TransportMode::Rail, "Alameda", PAGE, now)
    }

    #[test]
    fn board_view_rows() {
        let view = BoardView::from_board(&board());
        assert_eq!(view.station, "Alameda");
        assert_eq!(view.mode_label, "Metro");
        assert_eq!(view.computed_at, "13:00:00");
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].destination, "Aeroport & Manises");
        assert_eq!(view.rows[0].remaining, "05:00");
    }

    #[test]
    fn board_fragment_escapes_text() {
        let html = BoardFragmentTemplate::board(&board()).render().unwrap();
        assert!(html.contains("Aeroport &amp; Manises"));
        assert!(html.contains("05:00"));
    }

    #[test]
    fn error_fragment_shows_message() {
        let html = BoardFragmentTemplate::error("station \"X\" not found")
            .render()
            .unwrap();
        assert!(html.contains("not found"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn empty_fragment_renders() {
        let html = BoardFragmentTemplate::empty().render().unwrap();
        assert!(!html.contains("<table"));
    }
}
