//! SQLite storage for games and their reference entities.
//!
//! Every operation opens its own connection and drops it before returning,
//! so nothing holds the database file between menu actions.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};
use tracing::{debug, info};

use crate::error::{Result, TrackerError};
use crate::models::{FieldValue, Game, LeagueTable, ReferenceTables, Site};

/// Columns selected for a full game row, in `game_from_row` order
const GAME_COLUMNS: &str =
    "id, date, site, league, assignor, game_fee, fee_paid, is_volunteer, mileage";

const CREATE_GAMES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS games (
        id INTEGER PRIMARY KEY,
        date TEXT NOT NULL,
        site TEXT NOT NULL,
        league TEXT NOT NULL,
        assignor TEXT NOT NULL,
        game_fee INTEGER NOT NULL DEFAULT 0,
        fee_paid BOOLEAN NOT NULL DEFAULT 0,
        is_volunteer BOOLEAN NOT NULL DEFAULT 0,
        mileage REAL NOT NULL DEFAULT 0.0
    );
";

const CREATE_REFERENCE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS sites (
        id INTEGER PRIMARY KEY,
        name TEXT UNIQUE NOT NULL,
        mileage REAL DEFAULT 0.0
    );
    CREATE TABLE IF NOT EXISTS leagues (
        id INTEGER PRIMARY KEY,
        name TEXT UNIQUE NOT NULL
    );
    CREATE TABLE IF NOT EXISTS assignors (
        id INTEGER PRIMARY KEY,
        name TEXT UNIQUE NOT NULL
    );
";

const DROP_TABLES: &str = "
    DROP TABLE IF EXISTS games;
    DROP TABLE IF EXISTS sites;
    DROP TABLE IF EXISTS leagues;
    DROP TABLE IF EXISTS assignors;
";

/// Handle to the database file. Clone is cheap; it only holds the path.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

pub(crate) fn game_from_row(row: &Row<'_>) -> rusqlite::Result<Game> {
    Ok(Game {
        id: Some(row.get(0)?),
        date: row.get(1)?,
        site: row.get(2)?,
        league: row.get(3)?,
        assignor: row.get(4)?,
        game_fee: row.get(5)?,
        fee_paid: row.get(6)?,
        is_volunteer: row.get(7)?,
        mileage: row.get(8)?,
    })
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!(path = %self.path.display(), "Opening database");
        Ok(Connection::open(&self.path)?)
    }

    // ===== Schema =====

    /// Create all tables that do not exist yet
    pub fn initialize(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(CREATE_GAMES_TABLE)?;
        conn.execute_batch(CREATE_REFERENCE_TABLES)?;
        Ok(())
    }

    pub fn create_games_table(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(CREATE_GAMES_TABLE)?;
        info!("Games table created");
        Ok(())
    }

    pub fn create_reference_tables(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(CREATE_REFERENCE_TABLES)?;
        info!("Reference tables created");
        Ok(())
    }

    pub fn drop_tables(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(DROP_TABLES)?;
        info!("Tables dropped");
        Ok(())
    }

    /// Drop every table and recreate the schema in one transaction
    pub fn rebuild(&self) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute_batch(DROP_TABLES)?;
        tx.execute_batch(CREATE_GAMES_TABLE)?;
        tx.execute_batch(CREATE_REFERENCE_TABLES)?;
        tx.commit()?;
        info!("Database rebuilt");
        Ok(())
    }

    // ===== Games =====

    /// Validate and insert a game, creating its site, league and assignor
    /// reference rows if they are missing. Returns the new game id.
    pub fn add_game(&self, references: &ReferenceTables, game: &Game) -> Result<i64> {
        validate_site(references, &game.site)?;
        validate_league(references, &game.league)?;

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        ensure_site(&tx, &game.site)?;
        ensure_league(&tx, &game.league)?;
        ensure_assignor(&tx, &game.assignor)?;
        tx.execute(
            "INSERT INTO games (date, site, league, assignor, game_fee, fee_paid, is_volunteer, mileage)
             VALUES (?1, ?2, UPPER(?3), ?4, ?5, ?6, ?7, ?8)",
            params![
                game.date,
                game.site,
                game.league.trim(),
                game.assignor,
                game.game_fee,
                game.fee_paid,
                game.is_volunteer,
                game.mileage,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(game_id = id, site = %game.site, league = %game.league, "Game added");
        Ok(id)
    }

    pub fn get_game(&self, id: i64) -> Result<Option<Game>> {
        let conn = self.connect()?;
        let game = conn
            .query_row(
                &format!("SELECT {} FROM games WHERE id = ?1", GAME_COLUMNS),
                params![id],
                game_from_row,
            )
            .optional()?;
        Ok(game)
    }

    pub fn list_games(&self) -> Result<Vec<Game>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM games ORDER BY date, id",
            GAME_COLUMNS
        ))?;
        let games = stmt
            .query_map([], game_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(games)
    }

    /// Set one field of a stored game. Site and league values must be in the
    /// reference tables; derived fields are left untouched.
    pub fn update_field(
        &self,
        references: &ReferenceTables,
        id: i64,
        value: &FieldValue,
    ) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let column = value.field().column();
        let sql = format!("UPDATE games SET {} = ?1 WHERE id = ?2", column);

        let changed = match value {
            FieldValue::Date(date) => tx.execute(&sql, params![date, id])?,
            FieldValue::Site(site) => {
                validate_site(references, site)?;
                ensure_site(&tx, site)?;
                tx.execute(&sql, params![site, id])?
            }
            FieldValue::League(league) => {
                validate_league(references, league)?;
                ensure_league(&tx, league)?;
                tx.execute(&sql, params![league.trim().to_uppercase(), id])?
            }
            FieldValue::Assignor(assignor) => {
                ensure_assignor(&tx, assignor)?;
                tx.execute(&sql, params![assignor, id])?
            }
            FieldValue::GameFee(fee) => tx.execute(&sql, params![fee, id])?,
            FieldValue::FeePaid(flag) | FieldValue::Volunteer(flag) => {
                tx.execute(&sql, params![flag, id])?
            }
            FieldValue::Mileage(mileage) => tx.execute(&sql, params![mileage, id])?,
        };

        if changed == 0 {
            return Err(TrackerError::GameNotFound(id));
        }
        tx.commit()?;

        info!(game_id = id, field = column, "Game updated");
        Ok(())
    }

    /// Re-derive assignor and fee from the game's current league.
    pub fn recompute_derived(&self, leagues: &LeagueTable, id: i64) -> Result<Game> {
        let mut game = self.get_game(id)?.ok_or(TrackerError::GameNotFound(id))?;
        game.assignor = leagues.assignor(&game.league).to_string();
        game.game_fee = leagues.fee(&game.league);

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        ensure_assignor(&tx, &game.assignor)?;
        tx.execute(
            "UPDATE games SET assignor = ?1, game_fee = ?2 WHERE id = ?3",
            params![game.assignor, game.game_fee, id],
        )?;
        tx.commit()?;

        info!(game_id = id, fee = game.game_fee, assignor = %game.assignor, "Derived fields recomputed");
        Ok(game)
    }

    /// Delete a game. Returns whether a row was removed.
    pub fn delete_game(&self, id: i64) -> Result<bool> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM games WHERE id = ?1", params![id])?;
        if removed > 0 {
            info!(game_id = id, "Game deleted");
        }
        Ok(removed > 0)
    }

    // ===== Paid status =====

    pub fn fetch_unpaid_ids(&self) -> Result<Vec<i64>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT id FROM games WHERE fee_paid = 0 ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }

    /// Set `fee_paid` for all given ids in a single statement. Returns the
    /// number of rows changed. Callers check preconditions beforehand.
    pub fn bulk_mark_paid(&self, ids: &[i64], status: bool) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; ids.len()].join(",");
        let sql = format!(
            "UPDATE games SET fee_paid = ? WHERE id IN ({})",
            placeholders
        );
        let values = std::iter::once(i64::from(status)).chain(ids.iter().copied());

        let conn = self.connect()?;
        let changed = conn.execute(&sql, params_from_iter(values))?;
        info!(count = changed, paid = status, "Paid status updated");
        Ok(changed)
    }

    /// Check that `ids` is non-empty and names only currently unpaid games.
    pub fn validate_unpaid(&self, ids: &[i64]) -> Result<()> {
        if ids.is_empty() {
            return Err(TrackerError::NoGameIds);
        }
        let unpaid: HashSet<i64> = self.fetch_unpaid_ids()?.into_iter().collect();
        let invalid: Vec<i64> = ids.iter().copied().filter(|id| !unpaid.contains(id)).collect();
        if !invalid.is_empty() {
            return Err(TrackerError::NotUnpaid(invalid));
        }
        Ok(())
    }

    /// Mark games paid, but only if every id is a currently unpaid game.
    /// Any other id rejects the whole request before anything is written.
    pub fn mark_unpaid_paid(&self, ids: &[i64]) -> Result<usize> {
        self.validate_unpaid(ids)?;
        self.bulk_mark_paid(ids, true)
    }

    // ===== Sites =====

    /// Cached mileage for a site; `None` when the site has no row or a NULL value
    pub fn site_mileage(&self, site: &str) -> Result<Option<f64>> {
        let conn = self.connect()?;
        let mileage: Option<Option<f64>> = conn
            .query_row(
                "SELECT mileage FROM sites WHERE name = ?1",
                params![site],
                |row| row.get(0),
            )
            .optional()?;
        Ok(mileage.flatten())
    }

    pub fn save_site_mileage(&self, site: &str, mileage: f64) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO sites (name, mileage) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET mileage = excluded.mileage",
            params![site, mileage],
        )?;
        debug!(site = site, mileage = mileage, "Site mileage cached");
        Ok(())
    }

    pub fn sites_with_zero_mileage(&self) -> Result<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT name FROM sites WHERE mileage = 0 ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    pub fn list_sites(&self) -> Result<Vec<Site>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT id, name, mileage FROM sites ORDER BY name")?;
        let sites = stmt
            .query_map([], |row| {
                Ok(Site {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    mileage: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sites)
    }

    pub fn list_leagues(&self) -> Result<Vec<String>> {
        self.list_names("SELECT name FROM leagues ORDER BY name")
    }

    pub fn list_assignors(&self) -> Result<Vec<String>> {
        self.list_names("SELECT name FROM assignors ORDER BY name")
    }

    fn list_names(&self, sql: &str) -> Result<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }
}

fn validate_site(references: &ReferenceTables, site: &str) -> Result<()> {
    if site.trim().is_empty() || !references.sites.contains(site) {
        return Err(TrackerError::UnknownSite(site.to_string()));
    }
    Ok(())
}

fn validate_league(references: &ReferenceTables, league: &str) -> Result<()> {
    if league.trim().is_empty() || !references.leagues.contains(league) {
        return Err(TrackerError::UnknownLeague(league.to_string()));
    }
    Ok(())
}

fn ensure_site(tx: &Transaction<'_>, site: &str) -> Result<()> {
    tx.execute(
        "INSERT OR IGNORE INTO sites (name) VALUES (?1)",
        params![site],
    )?;
    Ok(())
}

fn ensure_league(tx: &Transaction<'_>, league: &str) -> Result<()> {
    tx.execute(
        "INSERT OR IGNORE INTO leagues (name) VALUES (UPPER(?1))",
        params![league.trim()],
    )?;
    Ok(())
}

fn ensure_assignor(tx: &Transaction<'_>, assignor: &str) -> Result<()> {
    tx.execute(
        "INSERT OR IGNORE INTO assignors (name) VALUES (UPPER(?1))",
        params![assignor.trim()],
    )?;
    Ok(())
}
