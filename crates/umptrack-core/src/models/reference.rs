//! Reference data: league fee schedules and venue addresses.
//!
//! Both tables are immutable once built. They are constructed at startup from
//! the built-in league schedule plus whatever the config file adds, and then
//! shared by the resolver, the store and the shell.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Assignor reported for leagues missing from the table.
pub const DEFAULT_ASSIGNOR: &str = "TBD";

/// Fee reported for leagues missing from the table.
pub const DEFAULT_FEE: i64 = 0;

/// Fee schedule entry for one league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueRate {
    pub fee: i64,
    pub assignor: String,
}

impl LeagueRate {
    pub fn new(fee: i64, assignor: impl Into<String>) -> Self {
        Self {
            fee,
            assignor: assignor.into(),
        }
    }
}

/// League id -> fee and assignor. Ids are matched case-insensitively since
/// stored games carry the upper-cased id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeagueTable {
    rates: BTreeMap<String, LeagueRate>,
}

impl LeagueTable {
    pub fn builtin() -> Self {
        let mut table = Self::default();
        for (league, fee, assignor) in [
            ("ovl", 150, "TruBlu"),
            ("tssaa_hs", 90, "CCUA"),
            ("tssaa_ms", 80, "CCUA"),
            ("tssaa_post", 85, "CCUA"),
            ("mtaba", 90, "4 Star"),
            ("mtaba_post", 95, "4 Star"),
            ("trublu", 90, "TruBlu"),
            ("trublu_fall", 85, "TruBlu"),
            ("ll_majors", 55, "4 Star"),
            ("ll_minors", 45, "4 Star"),
        ] {
            table.insert(league, LeagueRate::new(fee, assignor));
        }
        table
    }

    /// Add or replace a league entry
    pub fn insert(&mut self, league: &str, rate: LeagueRate) {
        self.rates.insert(Self::key(league), rate);
    }

    pub fn get(&self, league: &str) -> Option<&LeagueRate> {
        self.rates.get(&Self::key(league))
    }

    pub fn contains(&self, league: &str) -> bool {
        self.get(league).is_some()
    }

    pub fn fee(&self, league: &str) -> i64 {
        self.get(league).map(|r| r.fee).unwrap_or(DEFAULT_FEE)
    }

    pub fn assignor(&self, league: &str) -> &str {
        self.get(league)
            .map(|r| r.assignor.as_str())
            .unwrap_or(DEFAULT_ASSIGNOR)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    fn key(league: &str) -> String {
        league.trim().to_lowercase()
    }
}

/// Venue name -> street address used as the distance destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteTable {
    addresses: BTreeMap<String, String>,
}

impl SiteTable {
    pub fn insert(&mut self, name: impl Into<String>, address: impl Into<String>) {
        self.addresses.insert(name.into(), address.into());
    }

    pub fn address(&self, site: &str) -> Option<&str> {
        self.addresses.get(site).map(String::as_str)
    }

    pub fn contains(&self, site: &str) -> bool {
        self.addresses.contains_key(site)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.addresses.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.addresses
            .iter()
            .map(|(name, address)| (name.as_str(), address.as_str()))
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

impl<N: Into<String>, A: Into<String>> FromIterator<(N, A)> for SiteTable {
    fn from_iter<I: IntoIterator<Item = (N, A)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (name, address) in iter {
            table.insert(name, address);
        }
        table
    }
}

/// A venue row as stored, with its cached mileage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: i64,
    pub name: String,
    pub mileage: Option<f64>,
}

/// The full set of reference data injected into the resolver and store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTables {
    pub leagues: LeagueTable,
    pub sites: SiteTable,
}

impl ReferenceTables {
    pub fn new(leagues: LeagueTable, sites: SiteTable) -> Self {
        Self { leagues, sites }
    }
}
