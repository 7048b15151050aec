//! Plain-text rendering of the trip statistics.
//!
//! Each printer computes its summary from the table, writes it, and reports
//! how long the section took.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::time::Instant;
use tracing::debug;

use crate::filters::MonthFilter;
use crate::loader::TripTable;
use crate::prompt::SEPARATOR;
use crate::stats::{DurationStats, StationStats, TimeStats, UserStats};

const NO_TRIPS: &str = "No trips match the selected filters.";

/// Logs a summary as pretty-printed JSON.
pub fn log_json<T: Serialize>(stats: &T) -> Result<()> {
    debug!("{}", serde_json::to_string_pretty(stats)?);
    Ok(())
}

pub fn print_time_stats<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    writeln!(out, "\nCalculating The Most Frequent Times of Travel...\n")?;
    let started = Instant::now();

    let stats = TimeStats::from_table(table);
    log_json(&stats)?;

    match (stats.most_common_month, &stats.most_common_day, stats.most_common_hour) {
        (Some(month), Some(day), Some(hour)) => {
            writeln!(out, "The most common month is {}", month_name(month))?;
            writeln!(out, "The most common day of the week is {day}")?;
            writeln!(out, "The most common starting hour is {hour}")?;
        }
        _ => writeln!(out, "{NO_TRIPS}")?,
    }

    finish_section(out, started)
}

pub fn print_station_stats<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    writeln!(out, "\nCalculating The Most Popular Stations and Trip...\n")?;
    let started = Instant::now();

    let stats = StationStats::from_table(table);
    log_json(&stats)?;

    match (&stats.most_common_start, &stats.most_common_end, &stats.most_common_trip) {
        (Some(start), Some(end), Some((from, to))) => {
            writeln!(out, "The most commonly used start station is at {start}")?;
            writeln!(out, "The most commonly used end station is at {end}")?;
            writeln!(out, "The most common trip goes between \n{from} and {to}")?;
        }
        _ => writeln!(out, "{NO_TRIPS}")?,
    }

    finish_section(out, started)
}

pub fn print_duration_stats<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    writeln!(out, "\nCalculating Trip Duration...\n")?;
    let started = Instant::now();

    let stats = DurationStats::from_table(table);
    log_json(&stats)?;

    match stats.mean_seconds {
        Some(mean) => {
            writeln!(out, "The total travel time is {}", format_seconds(stats.total_seconds))?;
            writeln!(out, "The mean travel time is {}", format_seconds(mean))?;
        }
        None => writeln!(out, "{NO_TRIPS}")?,
    }

    finish_section(out, started)
}

pub fn print_user_stats<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    writeln!(out, "\nCalculating User Stats...\n")?;
    let started = Instant::now();

    let stats = UserStats::from_table(table);
    log_json(&stats)?;

    writeln!(out, "The user type counts are: ")?;
    write_counts(out, &stats.user_types)?;

    match &stats.gender {
        Some(counts) => {
            writeln!(out, "The gender counts are: ")?;
            write_counts(out, counts)?;
        }
        None => writeln!(out, "Gender is not a column in this dataframe. Moving on...")?,
    }

    match &stats.birth_year {
        Some(years) => match (years.earliest, years.most_recent, years.most_common) {
            (Some(earliest), Some(most_recent), Some(most_common)) => {
                writeln!(out, "The earliest year of birth is {earliest}")?;
                writeln!(out, "The most recent year of birth is {most_recent}")?;
                writeln!(out, "The most common year of birth is {most_common}")?;
            }
            _ => writeln!(out, "No birth years are recorded for the selected trips.")?,
        },
        None => writeln!(out, "Birth year is not a column in this dataframe. Moving on...")?,
    }

    finish_section(out, started)
}

/// Runs every report section in order.
pub fn print_report<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    print_time_stats(out, table)?;
    print_station_stats(out, table)?;
    print_duration_stats(out, table)?;
    print_user_stats(out, table)?;
    Ok(())
}

fn finish_section<W: Write>(out: &mut W, started: Instant) -> Result<()> {
    writeln!(out, "\nThis took {} seconds.", started.elapsed().as_secs_f64())?;
    writeln!(out, "{SEPARATOR}")?;
    out.flush()?;
    Ok(())
}

fn write_counts<W: Write>(out: &mut W, counts: &[(String, usize)]) -> Result<()> {
    let width = counts.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, count) in counts {
        writeln!(out, "{name:<width$}    {count}")?;
    }
    Ok(())
}

fn month_name(month: u32) -> String {
    MonthFilter::from_index(month)
        .map(MonthFilter::title)
        .unwrap_or_else(|| format!("month {month}"))
}

/// Renders seconds as e.g. `1 days 02:03:04` or `00:20:00`.
pub fn format_seconds(seconds: f64) -> String {
    let sign = if seconds < 0.0 { "-" } else { "" };
    let total = seconds.abs().round() as u64;
    let (days, rem) = (total / 86_400, total % 86_400);
    let (h, m, s) = (rem / 3600, rem % 3600 / 60, rem % 60);

    if days > 0 {
        format!("{sign}{days} days {h:02}:{m:02}:{s:02}")
    } else {
        format!("{sign}{h:02}:{m:02}:{s:02}")
    }
}
