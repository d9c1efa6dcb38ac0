//! Web layer for the arrivals dashboard.
//!
//! Serves the welcome page, the metro and bus arrival views with live
//! refresh, the station map, and JSON endpoints behind them.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;
