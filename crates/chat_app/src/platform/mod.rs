//! Terminal host for the chat widget: config, logging, IO wiring.
mod app;
mod config;
mod effects;
mod input;
mod logging;
mod ui;

pub use app::run_app;
