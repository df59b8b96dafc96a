//! Report rows and season scoping.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::game::today;

/// A season is one calendar year of game dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Season(i32);

impl Season {
    pub fn new(year: i32) -> Self {
        Self(year)
    }

    /// The season containing today's date
    pub fn current() -> Self {
        Self(today().year())
    }

    /// Four-digit year as produced by SQLite's `strftime('%Y', ...)`
    pub(crate) fn sql_year(self) -> String {
        format!("{:04}", self.0)
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-league totals for a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueSummary {
    pub league: String,
    pub games: i64,
    pub owed: i64,
    pub paid: i64,
    pub mileage: f64,
}

/// A row of the unpaid-games view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnpaidGame {
    pub id: i64,
    pub date: NaiveDate,
    pub site: String,
    pub league: String,
    pub assignor: String,
    pub fee: i64,
    pub paid: bool,
}

/// A row of the full ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub site: String,
    pub assignor: String,
    pub fee: i64,
    pub paid: bool,
    pub volunteer: bool,
}

/// Outcome of a bulk mileage pass over sites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MileageReport {
    /// Sites whose mileage was resolved, with the cached value
    pub updated: Vec<(String, f64)>,
    /// Sites that could not be resolved
    pub skipped: Vec<String>,
}

impl MileageReport {
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && self.skipped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_season_is_this_year() {
        assert_eq!(Season::current(), Season::new(today().year()));
        assert_eq!(Season::new(2026).to_string(), "2026");
    }

    #[test]
    fn test_season_sql_year_is_padded() {
        assert_eq!(Season::new(2026).sql_year(), "2026");
        assert_eq!(Season::new(999).sql_year(), "0999");
    }
}
