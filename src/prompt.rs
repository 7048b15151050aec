//! Interactive prompts for the session filters.
//!
//! Each question is repeated until the answer is one of the accepted values.
//! Reader and writer are generic so the loop can run against stdin/stdout or
//! in-memory buffers.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::debug;

use crate::filters::{City, DayFilter, FilterError, Filters, MonthFilter};

pub const SEPARATOR: &str = "----------------------------------------";

/// Asks for a city, a month and a day until each is recognized.
///
/// # Errors
///
/// Returns [`FilterError::InputClosed`] if the input ends before a valid
/// answer is given, or an I/O error from the underlying streams.
pub fn get_filters<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Filters> {
    writeln!(output, "Hello! Let's explore some US bikeshare data!")?;

    let city: City = ask_until_valid(
        input,
        output,
        "city",
        "Enter the name of one city - Chicago, New York City, or Washington: ",
    )?;
    writeln!(output, "Thank you. We'll analyze the data for this city.")?;

    let month: MonthFilter = ask_until_valid(
        input,
        output,
        "month",
        "Enter the name of one month between January and June, or \"all\": ",
    )?;
    writeln!(output, "Great. Moving on...")?;

    let day: DayFilter = ask_until_valid(
        input,
        output,
        "day",
        "Enter a day of the week, or \"all\": ",
    )?;
    writeln!(output, "Okay. Thank you.")?;

    writeln!(output, "{SEPARATOR}")?;
    output.flush()?;

    debug!(%city, %month, %day, "Filters selected");
    Ok(Filters { city, month, day })
}

/// Asks whether to run another session. Only "yes" (any casing) restarts;
/// a closed input counts as "no".
pub fn ask_restart<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<bool> {
    writeln!(output, "\nWould you like to restart? Enter yes or no.")?;
    output.flush()?;

    Ok(match read_answer(input)? {
        Some(answer) => answer.trim().eq_ignore_ascii_case("yes"),
        None => false,
    })
}

fn ask_until_valid<T, R, W>(input: &mut R, output: &mut W, what: &'static str, prompt: &str) -> Result<T>
where
    T: FromStr<Err = FilterError>,
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;

        let answer = read_answer(input)?.ok_or(FilterError::InputClosed(what))?;
        match answer.parse::<T>() {
            Ok(value) => return Ok(value),
            Err(e) => debug!(error = %e, "Rejected {what}, asking again"),
        }
    }
}

/// Reads one line, or `None` at end of input.
fn read_answer<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("Failed to read answer from input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
