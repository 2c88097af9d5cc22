use serde::Serialize;

use super::config::OutputFormat;
use crate::data::cpu::{CpuInfoCache, CpuSnapshot};
use crate::error::{InitError, Result};
use crate::utils::{format_freq, format_ticks};

/// Printable view of an initialized cache
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    #[serde(flatten)]
    pub snapshot: CpuSnapshot,
    pub info_timeout_secs: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl Report {
    pub fn new(cache: &CpuInfoCache, outcome: &std::result::Result<(), InitError>) -> Self {
        let errors = match outcome {
            Ok(()) => Vec::new(),
            Err(err) => err.iter().map(ToString::to_string).collect(),
        };
        Self {
            snapshot: cache.snapshot().cloned().unwrap_or_default(),
            info_timeout_secs: cache.info_timeout().as_secs(),
            errors,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Yaml => Ok(serde_yaml_ng::to_string(self)?),
        }
    }

    fn render_text(&self) -> String {
        let model = if self.snapshot.model_name.is_empty() {
            "unknown"
        } else {
            self.snapshot.model_name.as_str()
        };
        let mut lines = vec![
            format!("Model:        {model}"),
            format!("Cores:        {}", self.snapshot.num_cores),
            format!("Clock/core:   {}", format_freq(self.snapshot.mhz_per_core)),
            format!("Total ticks:  {}", format_ticks(self.snapshot.total_ticks)),
        ];
        for err in &self.errors {
            lines.push(format!("Error:        {err}"));
        }
        lines.join("\n")
    }
}
