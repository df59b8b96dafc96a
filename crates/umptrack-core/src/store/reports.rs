//! Aggregate views over stored games.
//!
//! Each view takes an optional [`Season`]; `None` covers every stored game.
//! The season is matched on the year of the stored ISO date.

use rusqlite::params;

use crate::error::Result;
use crate::models::{LeagueSummary, LedgerEntry, Season, UnpaidGame};

use super::Database;

impl Database {
    /// Per-league game count, fees owed and paid, and total mileage
    pub fn season_summary(&self, season: Option<Season>) -> Result<Vec<LeagueSummary>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT league,
                    COUNT(1),
                    SUM(CASE WHEN fee_paid = 0 THEN game_fee ELSE 0 END),
                    SUM(CASE WHEN fee_paid = 1 THEN game_fee ELSE 0 END),
                    ROUND(SUM(mileage), 1)
             FROM games
             WHERE ?1 IS NULL OR strftime('%Y', date) = ?1
             GROUP BY league
             ORDER BY league",
        )?;
        let rows = stmt
            .query_map(params![season.map(Season::sql_year)], |row| {
                Ok(LeagueSummary {
                    league: row.get(0)?,
                    games: row.get(1)?,
                    owed: row.get(2)?,
                    paid: row.get(3)?,
                    mileage: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn unpaid_ledger(&self, season: Option<Season>) -> Result<Vec<UnpaidGame>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, date, site, league, assignor, game_fee, fee_paid
             FROM games
             WHERE fee_paid = 0
               AND (?1 IS NULL OR strftime('%Y', date) = ?1)
             ORDER BY date, id",
        )?;
        let rows = stmt
            .query_map(params![season.map(Season::sql_year)], |row| {
                Ok(UnpaidGame {
                    id: row.get(0)?,
                    date: row.get(1)?,
                    site: row.get(2)?,
                    league: row.get(3)?,
                    assignor: row.get(4)?,
                    fee: row.get(5)?,
                    paid: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn full_ledger(&self, season: Option<Season>) -> Result<Vec<LedgerEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, date, site, assignor, game_fee, fee_paid, is_volunteer
             FROM games
             WHERE ?1 IS NULL OR strftime('%Y', date) = ?1
             ORDER BY date, id",
        )?;
        let rows = stmt
            .query_map(params![season.map(Season::sql_year)], |row| {
                Ok(LedgerEntry {
                    id: row.get(0)?,
                    date: row.get(1)?,
                    site: row.get(2)?,
                    assignor: row.get(3)?,
                    fee: row.get(4)?,
                    paid: row.get(5)?,
                    volunteer: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}
