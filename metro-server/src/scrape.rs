//! Arrival scraping from the operator's status pages.
//!
//! A status page carries one `div` per upcoming vehicle. The only structural
//! marker we rely on is the inline `padding-left: 5px` on that `div`; inside
//! it the line badge is an `img` (`.../linea_3.png`), the destination is in a
//! `b`, and the time is the last `span`.
//!
//! Missing pieces degrade to sentinel strings. A matching row is never
//! dropped, so the number of records always equals the number of rows.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::domain::{ScrapedArrival, UNKNOWN_DESTINATION, UNKNOWN_LINE, UNKNOWN_TIME};

static ROW: LazyLock<Selector> = LazyLock::new(|| selector("div[style]"));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static BOLD: LazyLock<Selector> = LazyLock::new(|| selector("b"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Does an inline `style` attribute mark an arrival row?
///
/// True when one of the declarations is `padding-left: 5px`, ignoring case,
/// whitespace and a trailing `!important`.
///
/// ```
/// use metro_server::scrape::is_arrival_row_style;
///
/// assert!(is_arrival_row_style("padding-left: 5px"));
/// assert!(is_arrival_row_style("color:#333;PADDING-LEFT:5px;"));
/// assert!(!is_arrival_row_style("padding-left: 50px"));
/// ```
pub fn is_arrival_row_style(style: &str) -> bool {
    style.split(';').any(|declaration| {
        let Some((property, value)) = declaration.split_once(':') else {
            return false;
        };
        property.trim().eq_ignore_ascii_case("padding-left")
            && value
                .split_whitespace()
                .next()
                .is_some_and(|v| v.eq_ignore_ascii_case("5px"))
    })
}

/// Extract the line identifier from a line badge image path.
///
/// Takes the file name, keeps what follows the last underscore, and drops
/// the extension: `/img/lineas/linea_3.png` gives `3`.
pub fn line_from_image_src(src: &str) -> Option<&str> {
    let file_name = src.rsplit('/').next().unwrap_or(src);
    let tail = file_name.rsplit('_').next().unwrap_or(file_name);
    let line = tail.split('.').next().unwrap_or(tail).trim();
    (!line.is_empty()).then_some(line)
}

/// A parsed status page.
///
/// Holds the document so rows can be walked lazily. Each call to
/// [`ArrivalPage::arrivals`] walks the document afresh.
pub struct ArrivalPage {
    document: Html,
}

impl ArrivalPage {
    pub fn parse(markup: &str) -> Self {
        Self {
            document: Html::parse_document(markup),
        }
    }

    /// Iterate over the arrival rows of the page, in document order.
    pub fn arrivals(&self) -> impl Iterator<Item = ScrapedArrival> + '_ {
        self.document
            .select(&ROW)
            .filter(|row| row.value().attr("style").is_some_and(is_arrival_row_style))
            .map(scrape_row)
    }
}

/// Parse markup and collect all arrival rows.
pub fn scrape_arrivals(markup: &str) -> Vec<ScrapedArrival> {
    ArrivalPage::parse(markup).arrivals().collect()
}

fn scrape_row(row: ElementRef<'_>) -> ScrapedArrival {
    let line = row
        .select(&IMAGE)
        .next()
        .and_then(|img| img.value().attr("src"))
        .and_then(line_from_image_src)
        .unwrap_or(UNKNOWN_LINE)
        .to_string();

    let destination = row
        .select(&BOLD)
        .next()
        .and_then(trimmed_text)
        .unwrap_or_else(|| UNKNOWN_DESTINATION.to_string());

    let raw_time = row
        .select(&SPAN)
        .last()
        .and_then(trimmed_text)
        .unwrap_or_else(|| UNKNOWN_TIME.to_string());

    ScrapedArrival {
        line,
        destination,
        raw_time,
    }
}

fn trimmed_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAIL_PAGE: &str = r#"
        <html><body>
          <div id="header" style="padding-left: 10px">Pròximes arribades</div>
          <div style="padding-left: 5px">
            <img src="/images/lineas/linea_3.png" alt="L3">
            <b> Aeroport </b>
            <span>Via 1</span>
            <span> 13:05:00 </span>
          </div>
          <div style="padding-left: 5px; color: #000">
            <img src="/images/lineas/linea_5.gif">
            <b>Bétera</b>
            <span>12:58:00</span>
          </div>
        </body></html>
    "#;

    #[test]
    fn style_predicate() {
        assert!(is_arrival_row_style("padding-left: 5px"));
        assert!(is_arrival_row_style("padding-left:5px"));
        assert!(is_arrival_row_style("font-weight: bold; padding-left: 5px !important"));
        assert!(!is_arrival_row_style("padding-left: 15px"));
        assert!(!is_arrival_row_style("padding-right: 5px"));
        assert!(!is_arrival_row_style("padding-left"));
        assert!(!is_arrival_row_style(""));
    }

    #[test]
    fn line_from_src() {
        assert_eq!(line_from_image_src("/images/lineas/linea_3.png"), Some("3"));
        assert_eq!(line_from_image_src("img/bus_linea_C2.png?v=4"), Some("C2"));
        assert_eq!(line_from_image_src("https://x.es/l_10.svg"), Some("10"));
        assert_eq!(line_from_image_src("/images/tram.png"), Some("tram"));
        assert_eq!(line_from_image_src("/images/linea_.png"), None);
        assert_eq!(line_from_image_src(""), None);
    }

    #[test]
    fn scrapes_rail_rows() {
        let rows = scrape_arrivals(RAIL_PAGE);
        assert_eq!(
            rows,
            vec![
                ScrapedArrival {
                    line: "3".into(),
                    destination: "Aeroport".into(),
                    raw_time: "13:05:00".into(),
                },
                ScrapedArrival {
                    line: "5".into(),
                    destination: "Bétera".into(),
                    raw_time: "12:58:00".into(),
                },
            ]
        );
    }

    #[test]
    fn missing_fields_degrade_to_sentinels() {
        let page = r#"
            <div style="padding-left: 5px"><b>Torrent</b></div>
            <div style="padding-left: 5px"><img alt="no source"><span>  </span></div>
        "#;
        let rows = scrape_arrivals(page);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].line, UNKNOWN_LINE);
        assert_eq!(rows[0].destination, "Torrent");
        assert_eq!(rows[0].raw_time, UNKNOWN_TIME);

        assert_eq!(rows[1].line, UNKNOWN_LINE);
        assert_eq!(rows[1].destination, UNKNOWN_DESTINATION);
        assert_eq!(rows[1].raw_time, UNKNOWN_TIME);
    }

    #[test]
    fn bus_time_from_nested_spans() {
        let page = r#"
            <div style="padding-left: 5px">
              <img src="/img/emt_35.png">
              <b>Marxalenes</b>
              <span><span>P. Congressos - 21 min</span></span>
            </div>
        "#;
        let rows = scrape_arrivals(page);
        assert_eq!(rows[0].line, "35");
        assert_eq!(rows[0].raw_time, "P. Congressos - 21 min");
    }

    #[test]
    fn no_rows_on_unrelated_page() {
        assert!(scrape_arrivals("<html><body><p>Servei no disponible</p></body></html>").is_empty());
        assert!(scrape_arrivals("").is_empty());
    }

    #[test]
    fn reparsing_is_idempotent() {
        let page = ArrivalPage::parse(RAIL_PAGE);
        let first: Vec<_> = page.arrivals().collect();
        let second: Vec<_> = page.arrivals().collect();
        assert_eq!(first, second);
        assert_eq!(first, scrape_arrivals(RAIL_PAGE));
    }
}
