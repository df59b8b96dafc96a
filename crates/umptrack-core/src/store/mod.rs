//! Local SQLite persistence.
//!
//! This module provides the `Database` handle for storing games and the
//! `sites`, `leagues` and `assignors` reference tables, plus the season
//! reports read back from them.

pub mod database;
pub mod reports;

pub use database::Database;
