//! Terminal front end: CLI, configuration, logging and the collaborators
//! that render progress and hand off finished reports.
mod app;
mod cli;
mod config;
mod logging;
mod render;
mod report;

pub use app::run_app;
