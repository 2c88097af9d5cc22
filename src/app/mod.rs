mod config;
mod report;

pub use config::{Config, OutputFormat};
pub use report::Report;
