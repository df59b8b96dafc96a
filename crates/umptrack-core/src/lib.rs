//! Core library for umptrack: a record of games worked by a sports official.
//!
//! A game's fee and assignor are derived from its league, and its mileage
//! from its site via a cached driving-distance lookup. Games are stored in a
//! local SQLite file and summarized by season and league.

pub mod config;
pub mod distance;
pub mod error;
pub mod models;
pub mod store;
pub mod utils;

pub use config::{Config, Credentials};
pub use distance::{DistanceError, DistanceLookup, DistanceMatrixClient, DistanceResolver};
pub use error::{Result, TrackerError};
pub use models::{FieldValue, Game, GameField, ReferenceTables, Season};
pub use store::Database;
