//! This module aggregates various utility submodules used throughout the application.

/// Per-guild settings stored in the application's SQLite database.
pub mod database;
/// Client for the LRCLIB lyrics API.
pub mod lyrics;
