use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::data::cpu::DEFAULT_INFO_TIMEOUT;
use crate::error::{CpuStatsError, Result};

const MIN_TIMEOUT_SECS: u64 = 1;

/// How the report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = CpuStatsError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(CpuStatsError::invalid_argument(value)),
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub info_timeout: Duration,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            info_timeout: DEFAULT_INFO_TIMEOUT,
            format: OutputFormat::Text,
        }
    }
}

/// File-based configuration (TOML)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    probe: ProbeConfig,
    output: OutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ProbeConfig {
    info_timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            info_timeout_secs: DEFAULT_INFO_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OutputConfig {
    format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
        }
    }
}

impl Config {
    pub fn from_args() -> std::result::Result<Self, String> {
        let file_config = match config_path() {
            Some(path) => load_config_file(&path).unwrap_or_else(|err| {
                warn!(error = %err, "ignoring config file");
                None
            }),
            None => None,
        };
        Self::parse(file_config.unwrap_or_default(), env::args().skip(1))
    }

    fn parse(
        file_config: FileConfig,
        args: impl IntoIterator<Item = String>,
    ) -> std::result::Result<Self, String> {
        // Start with file config values
        let mut timeout_secs = file_config.probe.info_timeout_secs;
        let mut format = file_config
            .output
            .format
            .parse::<OutputFormat>()
            .unwrap_or_default();

        // Override with CLI args
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => return Err(usage()),
                "--timeout-secs" => {
                    let value = args.next().ok_or_else(|| {
                        "Missing value for --timeout-secs\n\n".to_string() + &usage()
                    })?;
                    timeout_secs = value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid timeout value: {value}\n\n{}", usage()))?;
                }
                "--format" => {
                    let value = args
                        .next()
                        .ok_or_else(|| "Missing value for --format\n\n".to_string() + &usage())?;
                    format = value
                        .parse()
                        .map_err(|err| format!("{err}\n\n{}", usage()))?;
                }
                "--json" => format = OutputFormat::Json,
                _ => return Err(format!("Unknown argument: {arg}\n\n{}", usage())),
            }
        }

        Ok(Self {
            info_timeout: Duration::from_secs(normalize_timeout_secs(timeout_secs)),
            format,
        })
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hostcpu").join("config.toml"))
}

fn load_config_file(path: &Path) -> Result<Option<FileConfig>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(CpuStatsError::config_invalid(path.to_path_buf(), err.to_string())),
    };
    toml::from_str(&content)
        .map(Some)
        .map_err(|err| CpuStatsError::config_invalid(path.to_path_buf(), err.to_string()))
}

fn usage() -> String {
    let config_location = config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/hostcpu/config.toml".to_string());

    [
        "Usage: hostcpu [options]",
        "",
        "Options:",
        "  --timeout-secs <n>  CPU info query deadline in seconds (default: 60, min: 1)",
        "  --format <fmt>      text | json | yaml",
        "  --json              Shorthand for --format json",
        "  -h, --help          Show this help",
        "",
        "Environment:",
        "  HOSTCPU_LOG         Log filter (falls back to RUST_LOG, default: warn)",
        "",
        &format!("Config file: {config_location}"),
        "",
        "Example config.toml:",
        "  [probe]",
        "  info_timeout_secs = 60",
        "",
        "  [output]",
        "  format = \"text\"",
    ]
    .join("\n")
}

fn normalize_timeout_secs(value: u64) -> u64 {
    value.max(MIN_TIMEOUT_SECS)
}
