pub mod config;
pub mod filters;
pub mod loader;
pub mod output;
pub mod prompt;
pub mod stats;
pub mod trip;
