use serde::Serialize;
use std::collections::BTreeMap;

use chrono::Timelike;

use crate::loader::TripTable;

/// Most frequent travel times.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct TimeStats {
    pub most_common_month: Option<u32>,
    pub most_common_day: Option<String>,
    pub most_common_hour: Option<u32>,
}

impl TimeStats {
    pub fn from_table(table: &TripTable) -> Self {
        TimeStats {
            most_common_month: mode(table.iter().map(|t| t.month)),
            most_common_day: mode(table.iter().map(|t| t.day_of_week)).map(str::to_string),
            most_common_hour: mode(table.iter().map(|t| t.start_time.hour())),
        }
    }
}

/// Most popular stations and trip.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct StationStats {
    pub most_common_start: Option<String>,
    pub most_common_end: Option<String>,
    pub most_common_trip: Option<(String, String)>,
}

impl StationStats {
    pub fn from_table(table: &TripTable) -> Self {
        StationStats {
            most_common_start: mode(table.iter().map(|t| t.start_station.as_str())).map(str::to_string),
            most_common_end: mode(table.iter().map(|t| t.end_station.as_str())).map(str::to_string),
            most_common_trip: mode(
                table
                    .iter()
                    .map(|t| (t.start_station.as_str(), t.end_station.as_str())),
            )
            .map(|(s, e)| (s.to_string(), e.to_string())),
        }
    }
}

/// Total and mean trip duration in seconds, measured as end minus start.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct DurationStats {
    pub trips: usize,
    pub total_seconds: f64,
    pub mean_seconds: Option<f64>,
}

impl DurationStats {
    pub fn from_table(table: &TripTable) -> Self {
        let total_millis: i64 = table.iter().map(|t| t.duration().num_milliseconds()).sum();
        let total_seconds = total_millis as f64 / 1000.0;
        let trips = table.len();

        DurationStats {
            trips,
            total_seconds,
            mean_seconds: if trips == 0 {
                None
            } else {
                Some(total_seconds / trips as f64)
            },
        }
    }
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct BirthYearStats {
    pub earliest: Option<i32>,
    pub most_recent: Option<i32>,
    pub most_common: Option<i32>,
}

/// Rider demographics. `gender` and `birth_year` are `None` when the source
/// has no such column.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct UserStats {
    pub user_types: Vec<(String, usize)>,
    pub gender: Option<Vec<(String, usize)>>,
    pub birth_year: Option<BirthYearStats>,
}

impl UserStats {
    pub fn from_table(table: &TripTable) -> Self {
        let fields = table.available_fields();

        let gender = fields
            .gender
            .then(|| value_counts(table.iter().filter_map(|t| t.gender.as_deref())));

        let birth_year = fields.birth_year.then(|| {
            let years = || table.iter().filter_map(|t| t.birth_year);
            BirthYearStats {
                earliest: years().min(),
                most_recent: years().max(),
                most_common: mode(years()),
            }
        });

        UserStats {
            user_types: value_counts(table.iter().filter_map(|t| t.user_type.as_deref())),
            gender,
            birth_year,
        }
    }
}

fn counts<T: Ord>(values: impl Iterator<Item = T>) -> BTreeMap<T, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Most frequent value. Ties resolve to the smallest value.
pub fn mode<T: Ord>(values: impl Iterator<Item = T>) -> Option<T> {
    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts(values) {
        if best.as_ref().is_none_or(|(_, c)| count > *c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Occurrences per value, highest count first.
pub fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut out: Vec<(String, usize)> = counts(values)
        .into_iter()
        .map(|(v, c)| (v.to_string(), c))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}
