//! Site mileage resolution with a persistent cache.
//!
//! Mileage for a site is looked up in the `sites` table first. Only when no
//! value is cached does the resolver call the distance service, and whatever
//! it gets back (a distance or the `0.0` sentinel) is written to the table.
//! Sites holding the sentinel are retried by [`DistanceResolver::backfill`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::{MileageReport, ReferenceTables};
use crate::store::Database;

use super::DistanceLookup;

/// Mileage recorded when a distance could not be resolved
pub const SENTINEL_MILEAGE: f64 = 0.0;

/// Kilometres to statute miles
const KM_TO_MILES: f64 = 0.621371;

/// Metres to statute miles
const M_TO_MILES: f64 = 0.000621371;

const FEET_PER_MILE: f64 = 5280.0;

/// Parse a distance string such as `"12.4 km"`, `"1,204 km"`, `"7.7 mi"` or
/// `"450 ft"` into miles rounded to one decimal. A bare number is taken as
/// miles. Any other unit is rejected.
pub fn parse_distance_text(text: &str) -> Option<f64> {
    let mut parts = text.split_whitespace();
    let value: f64 = parts.next()?.replace(',', "").parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let miles = match parts.next().map(str::to_lowercase).as_deref() {
        None | Some("mi") | Some("mile") | Some("miles") => value,
        Some("km") => value * KM_TO_MILES,
        Some("m") => value * M_TO_MILES,
        Some("ft") => value / FEET_PER_MILE,
        Some(_) => return None,
    };
    Some(round_tenths(miles))
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub struct DistanceResolver<L> {
    lookup: L,
    home_base: String,
    references: Arc<ReferenceTables>,
    db: Database,
}

impl<L: DistanceLookup> DistanceResolver<L> {
    pub fn new(
        lookup: L,
        home_base: impl Into<String>,
        references: Arc<ReferenceTables>,
        db: Database,
    ) -> Self {
        Self {
            lookup,
            home_base: home_base.into(),
            references,
            db,
        }
    }

    pub fn references(&self) -> &ReferenceTables {
        &self.references
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Mileage for a site: the cached value when present, otherwise a fresh
    /// lookup that is then cached. Never fails; unresolvable sites yield the
    /// sentinel.
    pub async fn resolve(&self, site: &str) -> f64 {
        match self.db.site_mileage(site) {
            Ok(Some(mileage)) => {
                debug!(site = site, mileage = mileage, "Mileage cache hit");
                return mileage;
            }
            Ok(None) => {}
            Err(e) => warn!(site = site, error = %e, "Failed to read cached mileage"),
        }

        let Some(address) = self.references.sites.address(site) else {
            warn!(site = site, "Site address not found");
            return SENTINEL_MILEAGE;
        };

        let mileage = self.fetch(site, address).await.unwrap_or(SENTINEL_MILEAGE);
        if let Err(e) = self.db.save_site_mileage(site, mileage) {
            warn!(site = site, error = %e, "Failed to cache mileage");
        }
        mileage
    }

    /// Retry every site whose cached mileage is the sentinel. Each site gets
    /// exactly one lookup; failures are logged and skipped.
    pub async fn backfill(&self) -> crate::error::Result<MileageReport> {
        let sites = self.db.sites_with_zero_mileage()?;
        let mut report = MileageReport::default();

        for site in sites {
            let Some(address) = self.references.sites.address(&site) else {
                warn!(site = %site, "Site address not found, skipping");
                report.skipped.push(site);
                continue;
            };

            match self.fetch(&site, address).await {
                Some(mileage) => match self.db.save_site_mileage(&site, mileage) {
                    Ok(()) => {
                        info!(site = %site, mileage = mileage, "Backfilled site mileage");
                        report.updated.push((site, mileage));
                    }
                    Err(e) => {
                        warn!(site = %site, error = %e, "Failed to cache mileage");
                        report.skipped.push(site);
                    }
                },
                None => report.skipped.push(site),
            }
        }

        Ok(report)
    }

    /// Resolve every configured site, using the cache where possible.
    pub async fn populate_sites(&self) -> MileageReport {
        let mut report = MileageReport::default();
        for site in self.references.sites.names() {
            let mileage = self.resolve(site).await;
            if mileage == SENTINEL_MILEAGE {
                report.skipped.push(site.to_string());
            } else {
                report.updated.push((site.to_string(), mileage));
            }
        }
        report
    }

    async fn fetch(&self, site: &str, address: &str) -> Option<f64> {
        match self.lookup.driving_distance(&self.home_base, address).await {
            Ok(Some(text)) => {
                let miles = parse_distance_text(&text);
                if miles.is_none() {
                    warn!(site = site, text = %text, "Unrecognized distance text");
                }
                miles
            }
            Ok(None) => {
                warn!(site = site, "Distance not found");
                None
            }
            Err(e) => {
                warn!(site = site, error = %e, "Distance lookup failed");
                None
            }
        }
    }
}
