//! The closed sets of values a session can be filtered by.

use chrono::Weekday;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Typed failures for filter parsing and city lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown city '{0}'")]
    UnknownCity(String),
    #[error("unknown month '{0}'")]
    UnknownMonth(String),
    #[error("unknown day '{0}'")]
    UnknownDay(String),
    #[error("input closed before a valid {0} was entered")]
    InputClosed(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    pub fn key(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// File name of the trip log backing this city.
    pub fn source_file(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

/// Month filter, restricted to the six months covered by the trip logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthFilter {
    January,
    February,
    March,
    April,
    May,
    June,
    All,
}

impl MonthFilter {
    /// Every accepted value, in list order. `All` occupies the last slot.
    pub const ALL: [MonthFilter; 7] = [
        MonthFilter::January,
        MonthFilter::February,
        MonthFilter::March,
        MonthFilter::April,
        MonthFilter::May,
        MonthFilter::June,
        MonthFilter::All,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MonthFilter::January => "january",
            MonthFilter::February => "february",
            MonthFilter::March => "march",
            MonthFilter::April => "april",
            MonthFilter::May => "may",
            MonthFilter::June => "june",
            MonthFilter::All => "all",
        }
    }

    /// 1-based position in the six-month list, or `None` for `All`.
    pub fn index(self) -> Option<u32> {
        match self {
            MonthFilter::All => None,
            month => Self::ALL
                .iter()
                .position(|m| *m == month)
                .map(|i| i as u32 + 1),
        }
    }

    /// Inverse of [`MonthFilter::index`]. Months outside the list yield `None`.
    pub fn from_index(index: u32) -> Option<MonthFilter> {
        match index {
            1..=6 => Some(Self::ALL[index as usize - 1]),
            _ => None,
        }
    }

    pub fn title(self) -> String {
        title_case(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayFilter {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    All,
}

impl DayFilter {
    pub const ALL: [DayFilter; 8] = [
        DayFilter::Monday,
        DayFilter::Tuesday,
        DayFilter::Wednesday,
        DayFilter::Thursday,
        DayFilter::Friday,
        DayFilter::Saturday,
        DayFilter::Sunday,
        DayFilter::All,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DayFilter::Monday => "monday",
            DayFilter::Tuesday => "tuesday",
            DayFilter::Wednesday => "wednesday",
            DayFilter::Thursday => "thursday",
            DayFilter::Friday => "friday",
            DayFilter::Saturday => "saturday",
            DayFilter::Sunday => "sunday",
            DayFilter::All => "all",
        }
    }

    pub fn weekday(self) -> Option<Weekday> {
        match self {
            DayFilter::Monday => Some(Weekday::Mon),
            DayFilter::Tuesday => Some(Weekday::Tue),
            DayFilter::Wednesday => Some(Weekday::Wed),
            DayFilter::Thursday => Some(Weekday::Thu),
            DayFilter::Friday => Some(Weekday::Fri),
            DayFilter::Saturday => Some(Weekday::Sat),
            DayFilter::Sunday => Some(Weekday::Sun),
            DayFilter::All => None,
        }
    }

    /// Title-cased name as it appears in the derived `day_of_week` field, e.g. "Monday".
    pub fn title(self) -> String {
        title_case(self.key())
    }
}

/// Full English weekday name, e.g. "Sunday".
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// The validated city/month/day triple for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filters {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

macro_rules! impl_key_traits {
    ($ty:ty, $err:ident) => {
        impl FromStr for $ty {
            type Err = FilterError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(s);
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|v| v.key() == wanted)
                    .ok_or_else(|| FilterError::$err(s.to_string()))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }
    };
}

impl_key_traits!(City, UnknownCity);
impl_key_traits!(MonthFilter, UnknownMonth);
impl_key_traits!(DayFilter, UnknownDay);
