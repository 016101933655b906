mod app;
mod config;
mod dom;
mod effects;
mod ui;

pub use app::{run, RunOptions};
pub use config::{load_config, DEFAULT_CONFIG_FILE};
