mod deadline;
mod format;

pub use deadline::run_with_deadline;
pub use format::{format_count, format_freq, format_ticks};
