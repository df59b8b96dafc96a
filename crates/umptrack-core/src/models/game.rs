//! The game record and its updatable fields.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::distance::{DistanceLookup, DistanceResolver};
use crate::error::{Result, TrackerError};

use super::reference::LeagueTable;

/// Storage and input format for game dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Input tokens accepted as "yes" for boolean fields
const TRUTHY: [&str; 4] = ["yes", "y", "true", "1"];

/// Input tokens accepted as "no" for boolean fields
const FALSY: [&str; 4] = ["no", "n", "false", "0"];

/// A game worked. Assignor, fee and mileage are derived when the record is
/// created and are not re-derived afterwards unless explicitly recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Assigned by the store; `None` until inserted
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub site: String,
    pub league: String,
    pub assignor: String,
    pub game_fee: i64,
    pub fee_paid: bool,
    pub is_volunteer: bool,
    pub mileage: f64,
}

impl Game {
    /// Build a record from its inputs and an already-resolved mileage.
    /// The league id is normalized to upper case.
    pub fn derive(
        site: &str,
        league: &str,
        date: Option<NaiveDate>,
        leagues: &LeagueTable,
        mileage: f64,
    ) -> Self {
        Self {
            id: None,
            date: date.unwrap_or_else(today),
            site: site.to_string(),
            league: league.trim().to_uppercase(),
            assignor: leagues.assignor(league).to_string(),
            game_fee: leagues.fee(league),
            fee_paid: false,
            is_volunteer: false,
            mileage,
        }
    }

    /// Build a record, resolving mileage for the site through the cache.
    pub async fn create<L: DistanceLookup>(
        site: &str,
        league: &str,
        date: Option<NaiveDate>,
        resolver: &DistanceResolver<L>,
    ) -> Self {
        let mileage = resolver.resolve(site).await;
        Self::derive(site, league, date, &resolver.references().leagues, mileage)
    }

    pub fn with_fee_paid(mut self, fee_paid: bool) -> Self {
        self.fee_paid = fee_paid;
        self
    }

    pub fn with_volunteer(mut self, is_volunteer: bool) -> Self {
        self.is_volunteer = is_volunteer;
        self
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| TrackerError::invalid("date", format!("{} (expected YYYY-MM-DD)", e)))
}

/// Fields of a stored game that can be edited one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameField {
    Date,
    Site,
    League,
    Assignor,
    GameFee,
    FeePaid,
    Volunteer,
    Mileage,
}

impl GameField {
    pub const ALL: [GameField; 8] = [
        GameField::Date,
        GameField::Site,
        GameField::League,
        GameField::Assignor,
        GameField::GameFee,
        GameField::FeePaid,
        GameField::Volunteer,
        GameField::Mileage,
    ];

    /// Parse a menu token such as `d` or `f`.
    pub fn from_token(token: &str) -> Result<Self> {
        let token = token.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.token() == token)
            .ok_or(TrackerError::UnknownField(token))
    }

    pub fn token(self) -> &'static str {
        match self {
            GameField::Date => "d",
            GameField::Site => "s",
            GameField::League => "l",
            GameField::Assignor => "a",
            GameField::GameFee => "g",
            GameField::FeePaid => "f",
            GameField::Volunteer => "v",
            GameField::Mileage => "m",
        }
    }

    /// Menu label with the token bracketed, e.g. `[G]ame Fee`
    pub fn menu_label(self) -> &'static str {
        match self {
            GameField::Date => "[D]ate",
            GameField::Site => "[S]ite",
            GameField::League => "[L]eague",
            GameField::Assignor => "[A]ssignor",
            GameField::GameFee => "[G]ame Fee",
            GameField::FeePaid => "[F]ee Paid",
            GameField::Volunteer => "[V]olunteer",
            GameField::Mileage => "[M]ileage",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            GameField::Date => "date",
            GameField::Site => "site",
            GameField::League => "league",
            GameField::Assignor => "assignor",
            GameField::GameFee => "game_fee",
            GameField::FeePaid => "fee_paid",
            GameField::Volunteer => "is_volunteer",
            GameField::Mileage => "mileage",
        }
    }

    /// Coerce raw user input into a typed value for this field.
    pub fn parse(self, raw: &str) -> Result<FieldValue> {
        let raw = raw.trim();
        let column = self.column();
        match self {
            GameField::Date => parse_date(raw).map(FieldValue::Date),
            GameField::Site | GameField::League | GameField::Assignor => {
                if raw.is_empty() {
                    return Err(TrackerError::invalid(column, "value is required"));
                }
                let text = raw.to_string();
                Ok(match self {
                    GameField::Site => FieldValue::Site(text),
                    GameField::League => FieldValue::League(text),
                    _ => FieldValue::Assignor(text),
                })
            }
            GameField::GameFee => {
                let fee = parse_number(column, raw)?;
                if fee.fract() != 0.0 {
                    return Err(TrackerError::invalid(column, "fee must be a whole amount"));
                }
                // i64::MAX rounds up to 2^63 as an f64, which no longer fits
                if fee >= i64::MAX as f64 {
                    return Err(TrackerError::invalid(column, format!("'{}' is too large", raw)));
                }
                Ok(FieldValue::GameFee(fee as i64))
            }
            GameField::Mileage => parse_number(column, raw).map(FieldValue::Mileage),
            GameField::FeePaid => parse_flag(column, raw).map(FieldValue::FeePaid),
            GameField::Volunteer => parse_flag(column, raw).map(FieldValue::Volunteer),
        }
    }
}

/// A typed new value for one game field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Date(NaiveDate),
    Site(String),
    League(String),
    Assignor(String),
    GameFee(i64),
    FeePaid(bool),
    Volunteer(bool),
    Mileage(f64),
}

impl FieldValue {
    pub fn field(&self) -> GameField {
        match self {
            FieldValue::Date(_) => GameField::Date,
            FieldValue::Site(_) => GameField::Site,
            FieldValue::League(_) => GameField::League,
            FieldValue::Assignor(_) => GameField::Assignor,
            FieldValue::GameFee(_) => GameField::GameFee,
            FieldValue::FeePaid(_) => GameField::FeePaid,
            FieldValue::Volunteer(_) => GameField::Volunteer,
            FieldValue::Mileage(_) => GameField::Mileage,
        }
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .parse()
        .map_err(|_| TrackerError::invalid(field, format!("'{}' is not a number", raw)))?;
    if !value.is_finite() || value < 0.0 {
        return Err(TrackerError::invalid(
            field,
            format!("'{}' is not a valid amount", raw),
        ));
    }
    Ok(value)
}

fn parse_flag(field: &'static str, raw: &str) -> Result<bool> {
    let lowered = raw.to_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSY.contains(&lowered.as_str()) || lowered.is_empty() {
        Ok(false)
    } else {
        Err(TrackerError::invalid(
            field,
            format!("'{}' is not yes or no", raw),
        ))
    }
}
