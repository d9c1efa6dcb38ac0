//! Station directories and stop resolution.
//!
//! Each transport mode has its own semicolon-separated station file mapping
//! display names to the status page URL for that stop. The files are read
//! once at startup; the resulting [`StopResolver`] is immutable and shared.

mod error;
mod loader;
mod resolver;

pub use error::DirectoryError;
pub use loader::{Coordinates, DirectorySchema, StationDirectory, StationEntry};
pub use resolver::{NotFound, StopResolver};
