//! Data models for the officiating tracker.
//!
//! - `Game`: a game worked, with derived fee, assignor and mileage
//! - `GameField` / `FieldValue`: typed single-field edits
//! - `LeagueTable`, `SiteTable`, `ReferenceTables`: immutable reference data
//! - Report rows: `LeagueSummary`, `UnpaidGame`, `LedgerEntry`, scoped by `Season`

pub mod game;
pub mod reference;
pub mod summary;

pub use game::{parse_date, today, FieldValue, Game, GameField, DATE_FORMAT};
pub use reference::{
    LeagueRate, LeagueTable, ReferenceTables, Site, SiteTable, DEFAULT_ASSIGNOR, DEFAULT_FEE,
};
pub use summary::{LeagueSummary, LedgerEntry, MileageReport, Season, UnpaidGame};
