//! HTTP route handlers.

use std::convert::Infallible;
use std::path::Path;

use askama::Template;
use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use futures::{Stream, StreamExt};
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::board::{BoardError, load_board};
use crate::domain::TransportMode;
use crate::fetch::MarkupSource;
use crate::map::{LineSelection, MapView, available_lines, map_view};
use crate::refresh::live_boards;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// Rail and bus share one set of handlers, nested under `/rail` and `/bus`.
/// `static_dir` is the path to the static assets directory.
pub fn create_router<S>(state: AppState<S>, static_dir: impl AsRef<Path>) -> Router
where
    S: MarkupSource + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .nest("/rail", mode_routes::<S>(TransportMode::Rail))
        .nest("/bus", mode_routes::<S>(TransportMode::Bus))
        .route("/map", get(map_page::<S>))
        .route("/api/map", get(map_data::<S>))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .fallback(not_found)
        .with_state(state)
}

fn mode_routes<S>(mode: TransportMode) -> Router<AppState<S>>
where
    S: MarkupSource + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(arrivals_page::<S>))
        .route("/board", get(board::<S>))
        .route("/live", get(live_board::<S>))
        .route("/stations", get(search_stations::<S>))
        .layer(Extension(mode))
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Welcome page.
async fn index_page() -> Response {
    askama_axum::into_response(&IndexTemplate)
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn render(template: &impl Template) -> Result<String, AppError> {
    template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// Arrivals page: station picker plus the board of the chosen station.
///
/// Without an explicit `station`, the first station matching the filter is
/// shown.
async fn arrivals_page<S>(
    State(state): State<AppState<S>>,
    Extension(mode): Extension<TransportMode>,
    Query(req): Query<ArrivalsPageRequest>,
) -> Result<Html<String>, AppError>
where
    S: MarkupSource + Send + Sync + 'static,
{
    let query = req.q.unwrap_or_default();
    let matches: Vec<String> = state
        .resolver
        .search(mode, &query)
        .into_iter()
        .map(str::to_string)
        .collect();

    let station = req
        .station
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| matches.first().cloned());

    let board = match &station {
        Some(name) => {
            match load_board(&state.resolver, state.source.as_ref(), &state.clock, mode, name)
                .await
            {
                Ok(board) => BoardFragmentTemplate::board(&board),
                Err(e) => BoardFragmentTemplate::error(e.to_string()),
            }
        }
        None => BoardFragmentTemplate::empty(),
    };

    let stations = matches
        .into_iter()
        .map(|name| StationOption {
            selected: station.as_deref() == Some(name.as_str()),
            name,
        })
        .collect();

    let template = ArrivalsTemplate {
        mode: mode.as_str().to_string(),
        mode_label: mode.label().to_string(),
        query,
        stations,
        station,
        board,
        refresh_ms: state.refresh.period().as_millis(),
    };
    Ok(Html(render(&template)?))
}

/// One board, as an HTML fragment or JSON depending on `Accept`.
async fn board<S>(
    State(state): State<AppState<S>>,
    Extension(mode): Extension<TransportMode>,
    headers: HeaderMap,
    Query(req): Query<BoardRequest>,
) -> Result<Response, AppError>
where
    S: MarkupSource + Send + Sync + 'static,
{
    let result = load_board(
        &state.resolver,
        state.source.as_ref(),
        &state.clock,
        mode,
        &req.station,
    )
    .await;

    if accepts_html(&headers) {
        return match result {
            Ok(board) => Ok(Html(render(&BoardFragmentTemplate::board(&board))?).into_response()),
            Err(e) => {
                let err = AppError::from(e);
                let html = render(&BoardFragmentTemplate::error(err.message()))?;
                Ok((err.status(), Html(html)).into_response())
            }
        };
    }

    let board = result?;
    Ok(Json(BoardResponse::from_board(&board)).into_response())
}

/// Server-sent events: one rendered board fragment per refresh tick.
///
/// An unknown station is rejected up front; fetch failures during the
/// stream are sent as error fragments and the stream carries on.
async fn live_board<S>(
    State(state): State<AppState<S>>,
    Extension(mode): Extension<TransportMode>,
    Query(req): Query<BoardRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError>
where
    S: MarkupSource + Send + Sync + 'static,
{
    let station = state
        .resolver
        .resolve(mode, &req.station)
        .map_err(BoardError::from)?
        .name
        .clone();

    let boards = live_boards(
        state.resolver.clone(),
        state.source.clone(),
        state.clock,
        mode,
        station,
        state.refresh,
    );

    let events = boards.map(|result| {
        let fragment = match result {
            Ok(board) => BoardFragmentTemplate::board(&board),
            Err(e) => BoardFragmentTemplate::error(e.to_string()),
        };
        let html = fragment.render().unwrap_or_else(|e| {
            error!(error = %e, "failed to render live board");
            String::new()
        });
        // SSE data may not contain carriage returns
        Ok(Event::default().event("board").data(html.replace('\r', "")))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// Search station names for one mode.
async fn search_stations<S>(
    State(state): State<AppState<S>>,
    Extension(mode): Extension<TransportMode>,
    Query(req): Query<StationSearchRequest>,
) -> Json<StationSearchResponse>
where
    S: MarkupSource + Send + Sync + 'static,
{
    let stations = state
        .resolver
        .search(mode, &req.q)
        .into_iter()
        .take(req.limit())
        .map(str::to_string)
        .collect();

    Json(StationSearchResponse { mode, stations })
}

/// Map page with the line picker.
async fn map_page<S>(State(state): State<AppState<S>>) -> Result<Html<String>, AppError>
where
    S: MarkupSource + Send + Sync + 'static,
{
    let template = MapTemplate {
        lines: available_lines(state.resolver.directory(TransportMode::Rail)),
    };
    Ok(Html(render(&template)?))
}

/// Markers for the selected rail lines.
async fn map_data<S>(
    State(state): State<AppState<S>>,
    Query(req): Query<MapRequest>,
) -> Json<MapView>
where
    S: MarkupSource + Send + Sync + 'static,
{
    let selection = LineSelection::parse(req.lines.as_deref(), req.all);
    Json(map_view(
        state.resolver.directory(TransportMode::Rail),
        &selection,
    ))
}

/// Unknown paths.
async fn not_found(headers: HeaderMap) -> Response {
    let message = "no such page".to_string();
    if accepts_html(&headers) {
        let template = ErrorTemplate {
            title: "Not found".to_string(),
            message: message.clone(),
        };
        if let Ok(html) = template.render() {
            return (StatusCode::NOT_FOUND, Html(html)).into_response();
        }
    }
    AppError::NotFound { message }.into_response()
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotFound { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::NotFound { message }
            | AppError::BadGateway { message }
            | AppError::Internal { message } => message,
        }
    }
}

impl From<BoardError> for AppError {
    fn from(e: BoardError) -> Self {
        match e {
            BoardError::NotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            BoardError::Fetch(_) => AppError::BadGateway {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message().to_string();

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
