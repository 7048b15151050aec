//! Loads a city's trip log and restricts it to the session filters.

use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::filters::{City, DayFilter, MonthFilter};
use crate::trip::{RawTrip, Trip};

const REQUIRED_COLUMNS: &[&str] = &["Start Time", "End Time", "Start Station", "End Station", "User Type"];
const GENDER_COLUMN: &str = "Gender";
const BIRTH_YEAR_COLUMN: &str = "Birth Year";

/// Which optional columns the source provided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailableFields {
    pub gender: bool,
    pub birth_year: bool,
}

/// Trips that passed the month/day filters, in source order.
#[derive(Debug, Clone, Default)]
pub struct TripTable {
    trips: Vec<Trip>,
    fields: AvailableFields,
}

impl TripTable {
    pub fn new(trips: Vec<Trip>, fields: AvailableFields) -> Self {
        Self { trips, fields }
    }

    pub fn available_fields(&self) -> AvailableFields {
        self.fields
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trip> {
        self.trips.iter()
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// Opens the trip log for `city` under `data_dir` and applies the filters.
///
/// # Errors
///
/// Fails if the file cannot be opened, a required column is missing, a row
/// cannot be deserialized, or a row has a blank or unparsable timestamp or a
/// birth year that is not a whole number.
#[tracing::instrument(skip(data_dir), fields(city = %city, month = %month, day = %day))]
pub fn load_data(data_dir: &Path, city: City, month: MonthFilter, day: DayFilter) -> Result<TripTable> {
    let path = data_dir.join(city.source_file());
    debug!(path = %path.display(), "Opening trip log");

    let file = File::open(&path).with_context(|| format!("Failed to open trip log {}", path.display()))?;
    load_from_reader(file, month, day).with_context(|| format!("Failed to load {}", path.display()))
}

/// Reads a trip log from any CSV source and applies the filters.
///
/// # Errors
///
/// Fails if any of the required columns is missing from the header, even
/// when the source has no data rows.
pub fn load_from_reader<R: Read>(reader: R, month: MonthFilter, day: DayFilter) -> Result<TripTable> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers().context("Failed to read CSV header")?;
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        bail!("Trip log is missing required columns: {}", missing.join(", "));
    }
    let fields = AvailableFields {
        gender: headers.iter().any(|h| h == GENDER_COLUMN),
        birth_year: headers.iter().any(|h| h == BIRTH_YEAR_COLUMN),
    };

    let month_index = month.index();
    let day_name = day.weekday().map(|_| day.title());

    let mut trips = Vec::new();
    let mut total = 0usize;

    for (i, result) in rdr.deserialize::<RawTrip>().enumerate() {
        let row = i + 1;
        let raw = result.with_context(|| format!("Failed to read row {row}"))?;
        let trip = Trip::from_raw(raw).with_context(|| format!("Row {row}"))?;
        total += 1;

        if month_index.is_some_and(|m| trip.month != m) {
            continue;
        }
        if day_name.as_deref().is_some_and(|d| trip.day_of_week != d) {
            continue;
        }
        trips.push(trip);
    }

    info!(
        total,
        kept = trips.len(),
        gender = fields.gender,
        birth_year = fields.birth_year,
        "Trip log loaded"
    );

    Ok(TripTable::new(trips, fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHICAGO_SAMPLE: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1,2017-01-01 00:00:00,2017-01-01 00:10:00,600,A,B,Subscriber,Male,1985.0
2,2017-02-03 08:00:00,2017-02-03 08:05:00,300,B,C,Customer,,
3,2017-03-03 09:00:00,2017-03-03 09:20:00,1200,A,C,Subscriber,Female,1990.0
4,2017-03-05 17:00:00,2017-03-05 17:15:00,900,C,A,Subscriber,Male,1975.0
5,2017-06-02 07:30:00,2017-06-02 07:40:00,600,A,B,Subscriber,Female,1985.0
";

    const WASHINGTON_SAMPLE: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
0,2017-04-07 13:00:00,2017-04-07 13:30:00,1800,X,Y,Registered
1,2017-04-08 14:00:00,2017-04-08 14:10:00,600,Y,X,Casual
";

    fn load(data: &str, month: MonthFilter, day: DayFilter) -> Result<TripTable> {
        load_from_reader(data.as_bytes(), month, day)
    }

    #[test]
    fn test_all_filters_keep_every_row() {
        let table = load(CHICAGO_SAMPLE, MonthFilter::All, DayFilter::All).unwrap();

        assert_eq!(table.len(), 5);
        let months: Vec<u32> = table.iter().map(|t| t.month).collect();
        assert_eq!(months, vec![1, 2, 3, 3, 6]);
        assert_eq!(table.trips()[0].day_of_week, "Sunday");
    }

    #[test]
    fn test_month_filter() {
        let table = load(CHICAGO_SAMPLE, MonthFilter::March, DayFilter::All).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|t| t.month == 3));
    }

    #[test]
    fn test_day_filter() {
        let table = load(CHICAGO_SAMPLE, MonthFilter::All, DayFilter::Friday).unwrap();

        // 2017-02-03, 2017-03-03 and 2017-06-02 are Fridays
        assert_eq!(table.len(), 3);
        assert!(table.iter().all(|t| t.day_of_week == "Friday"));
    }

    #[test]
    fn test_month_and_day_filter() {
        let table = load(CHICAGO_SAMPLE, MonthFilter::March, DayFilter::Sunday).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.trips()[0].start_station, "C");
    }

    #[test]
    fn test_june_excludes_february() {
        let table = load(CHICAGO_SAMPLE, MonthFilter::June, DayFilter::All).unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.iter().all(|t| t.month == 6));
    }

    #[test]
    fn test_available_fields() {
        let chicago = load(CHICAGO_SAMPLE, MonthFilter::All, DayFilter::All).unwrap();
        assert_eq!(
            chicago.available_fields(),
            AvailableFields { gender: true, birth_year: true }
        );
        assert_eq!(chicago.trips()[1].gender, None);
        assert_eq!(chicago.trips()[1].birth_year, None);

        let washington = load(WASHINGTON_SAMPLE, MonthFilter::All, DayFilter::All).unwrap();
        assert_eq!(washington.available_fields(), AvailableFields::default());
        assert_eq!(washington.len(), 2);
        assert!(washington.iter().all(|t| t.gender.is_none() && t.birth_year.is_none()));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let data = "Start Time,End Time,Start Station,End Station,User Type\n";
        let table = load(data, MonthFilter::All, DayFilter::All).unwrap();

        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_value_markers_are_dropped() {
        let data = "\
Start Time,End Time,Start Station,End Station,User Type,Gender,Birth Year
2017-01-01 00:00:00,2017-01-01 00:10:00,A,B,Subscriber,Male,NaN
2017-01-02 00:00:00,2017-01-02 00:10:00,A,B,NA,NA,NA
2017-01-03 00:00:00,2017-01-03 00:10:00,A,B,Customer,Female,1990.0
";
        let table = load(data, MonthFilter::All, DayFilter::All).unwrap();

        assert_eq!(table.len(), 3);
        let years: Vec<Option<i32>> = table.iter().map(|t| t.birth_year).collect();
        assert_eq!(years, vec![None, None, Some(1990)]);
        assert_eq!(table.trips()[1].gender, None);
        assert_eq!(table.trips()[1].user_type, None);
    }

    #[test]
    fn test_fractional_birth_year_fails() {
        let data = "\
Start Time,End Time,Start Station,End Station,User Type,Gender,Birth Year
2017-01-01 00:00:00,2017-01-01 00:10:00,A,B,Subscriber,Male,1990.5
";
        let err = load(data, MonthFilter::All, DayFilter::All).unwrap_err();
        assert!(format!("{err:#}").contains("Birth Year"));
    }

    #[test]
    fn test_missing_user_type_column_fails() {
        let data = "\
Start Time,End Time,Start Station,End Station
2017-01-01 00:00:00,2017-01-01 00:10:00,A,B
";
        let err = load(data, MonthFilter::All, DayFilter::All).unwrap_err();
        assert!(format!("{err}").contains("User Type"));

        let header_only = "Start Time,End Time,Start Station,End Station\n";
        assert!(load(header_only, MonthFilter::All, DayFilter::All).is_err());
    }

    #[test]
    fn test_bad_timestamp_fails_with_row_number() {
        let data = "\
Start Time,End Time,Start Station,End Station,User Type
2017-01-01 00:00:00,2017-01-01 00:10:00,A,B,Subscriber
not a date,2017-01-01 00:10:00,A,B,Subscriber
";
        let err = load(data, MonthFilter::All, DayFilter::All).unwrap_err();
        let msg = format!("{err:#}");

        assert!(msg.contains("Row 2"), "{msg}");
        assert!(msg.contains("Start Time"), "{msg}");
    }

    #[test]
    fn test_load_data_missing_file() {
        let dir = std::env::temp_dir().join("bikeshare_test_missing_dir");
        let err = load_data(&dir, City::Chicago, MonthFilter::All, DayFilter::All).unwrap_err();

        assert!(format!("{err}").contains("chicago.csv"));
    }
}
