//! Interactive entry point for the bikeshare trip explorer.
//!
//! Asks for a city and month/day filters, loads the matching trips and prints
//! travel-time, station, duration and rider statistics until the user stops.

use anyhow::Result;
use bikeshare::{
    config::Config,
    loader::load_data,
    output::print_report,
    prompt::{ask_restart, get_filters},
};
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, info_span};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = Config::from_env();

    // Logging setup: quiet stderr so prompts stay readable + JSON rolling log file
    let log_dir = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = config
        .log_file
        .file_name()
        .unwrap_or(OsStr::new("bikeshare.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    info!(data_dir = %config.data_dir.display(), "Starting bikeshare session");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();

    let mut session = 0u32;
    loop {
        session += 1;
        let _span = info_span!("session", session).entered();

        let filters = get_filters(&mut input, &mut output)?;
        let table = load_data(&config.data_dir, filters.city, filters.month, filters.day)?;

        print_report(&mut output, &table)?;
        output.flush()?;

        if !ask_restart(&mut input, &mut output)? {
            break;
        }
    }

    info!(sessions = session, "Exiting");
    Ok(())
}
