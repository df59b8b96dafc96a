//! Driving-distance lookup and site mileage caching.
//!
//! This module provides the `DistanceMatrixClient` for the Google Distance
//! Matrix API and the `DistanceResolver`, which serves site mileage from the
//! `sites` table and only calls out for sites that have no cached value.

pub mod client;
pub mod error;
pub mod resolver;

pub use client::{DistanceLookup, DistanceMatrixClient};
pub use error::DistanceError;
pub use resolver::{parse_distance_text, DistanceResolver, SENTINEL_MILEAGE};
