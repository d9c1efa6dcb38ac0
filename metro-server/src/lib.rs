//! Valencia metro and bus arrival dashboard.
//!
//! A web application that answers: "when does the next train (or bus)
//! leave from this stop?" by scraping the operators' status pages.

pub mod board;
pub mod config;
pub mod directory;
pub mod domain;
pub mod fetch;
pub mod map;
pub mod refresh;
pub mod scrape;
pub mod web;
