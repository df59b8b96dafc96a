#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tempfile::TempDir;
use umptrack_core::models::{LeagueTable, SiteTable};
use umptrack_core::{Database, DistanceError, DistanceLookup, ReferenceTables};

pub const HOME_BASE: &str = "1 Public Sq, Nashville, TN";

/// Distance service stand-in: answers from a fixed table keyed by
/// destination address and records every request.
#[derive(Default)]
pub struct FakeLookup {
    responses: HashMap<String, Option<String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, text: Option<&str>) -> Self {
        self.responses
            .insert(address.to_string(), text.map(str::to_string));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl DistanceLookup for FakeLookup {
    async fn driving_distance(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Option<String>, DistanceError> {
        assert_eq!(origin, HOME_BASE);
        self.calls.lock().unwrap().push(destination.to_string());
        match self.responses.get(destination) {
            Some(text) => Ok(text.clone()),
            None => Err(DistanceError::InvalidResponse("no canned response".to_string())),
        }
    }
}

pub fn references() -> Arc<ReferenceTables> {
    let sites: SiteTable = [
        ("Centennial HS", "5050 Mallory Ln, Franklin, TN"),
        ("Drakes Creek Park", "180 Drakes Creek Rd, Hendersonville, TN"),
        ("Sevier Park", "3021 Lealand Ln, Nashville, TN"),
    ]
    .into_iter()
    .collect();
    Arc::new(ReferenceTables::new(LeagueTable::builtin(), sites))
}

/// A fresh, initialized database in its own temp directory. Keep the
/// `TempDir` alive for the duration of the test.
pub fn setup_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().join("officiating.db"));
    db.initialize().unwrap();
    (dir, db)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
