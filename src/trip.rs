//! Trip-log rows, as read from the source and after timestamp parsing.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDateTime};
use serde::Deserialize;

use crate::filters::weekday_name;

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Cell values that mean "no value", as spreadsheet and dataframe tools read them.
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single row deserialized from a city trip log.
///
/// `Gender` and `Birth Year` are absent from some cities' logs. Blank cells and
/// missing-value markers such as `NaN` or `NA` are read as `None`.
#[derive(Debug, Deserialize)]
pub struct RawTrip {
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "End Time")]
    pub end_time: String,
    #[serde(rename = "Start Station")]
    pub start_station: String,
    #[serde(rename = "End Station")]
    pub end_station: String,
    #[serde(rename = "User Type")]
    pub user_type: String,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    pub birth_year: Option<String>,
}

/// A parsed trip with the month and weekday derived from its start time.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    /// Calendar month of the start time, 1-12.
    pub month: u32,
    /// Full weekday name of the start time, e.g. "Monday".
    pub day_of_week: &'static str,
}

impl Trip {
    /// Parses both timestamps and derives `month` and `day_of_week`.
    ///
    /// # Errors
    ///
    /// Fails if either timestamp is blank or not in a recognized format, or
    /// if a present birth year is not a whole number.
    pub fn from_raw(raw: RawTrip) -> Result<Self> {
        let start_time = parse_timestamp(&raw.start_time).context("invalid Start Time")?;
        let end_time = parse_timestamp(&raw.end_time).context("invalid End Time")?;
        let birth_year = parse_birth_year(raw.birth_year).context("invalid Birth Year")?;

        Ok(Trip {
            month: start_time.month(),
            day_of_week: weekday_name(start_time.weekday()),
            start_time,
            end_time,
            start_station: raw.start_station,
            end_station: raw.end_station,
            user_type: present(Some(raw.user_type)),
            gender: present(raw.gender),
            birth_year,
        })
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end_time - self.start_time
    }
}

/// Parses a trip-log timestamp such as `2017-01-01 00:07:57`.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        bail!("timestamp is blank");
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .with_context(|| format!("unrecognized timestamp '{value}'"))
}

/// Parses a birth year cell. The source writes years as floats, e.g. `1992.0`.
pub fn parse_birth_year(value: Option<String>) -> Result<Option<i32>> {
    let Some(value) = present(value) else {
        return Ok(None);
    };

    let year: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("'{value}' is not a number"))?;
    if !year.is_finite() || year.fract() != 0.0 || year < i32::MIN as f64 || year > i32::MAX as f64 {
        bail!("'{value}' is not a whole year");
    }
    Ok(Some(year as i32))
}

/// Drops blank cells and missing-value markers.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && !MISSING_MARKERS.contains(&v)
    })
}
