use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Result, ThermoError};

/// Narrowest accepted `--band-width` (°C).
pub const MIN_BAND_WIDTH: f64 = 0.1;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Merge smart-thermostat reports and summarize them per day
#[derive(Parser, Debug, Clone)]
#[command(
    name = "thermolog",
    about = "Merge smart-thermostat reports and summarize them per day",
    version
)]
pub struct Settings {
    /// Report files, or directories searched recursively for .csv reports,
    /// appended in the order given
    pub inputs: Vec<PathBuf>,

    /// Report configuration file (JSON); defaults to ~/.thermolog/config.json
    /// when that file exists
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "csv", "json"])]
    pub format: String,

    /// Write the summary here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also report device-on time per outdoor temperature band
    #[arg(long)]
    pub bands: bool,

    /// Width of each outdoor temperature band (°C)
    #[arg(long, default_value = "5.0")]
    pub band_width: f64,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Write the default report configuration to the config path and exit
    #[arg(long)]
    pub init_config: bool,
}

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Self {
        Self::parse_from(args).resolve()
    }

    /// Apply `--debug` over the log level.
    pub fn resolve(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }

    /// Reject values clap cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if !(self.band_width.is_finite() && self.band_width >= MIN_BAND_WIDTH) {
            return Err(ThermoError::Config(format!(
                "band width must be at least {} °C, got {}",
                MIN_BAND_WIDTH, self.band_width
            )));
        }
        if self.inputs.is_empty() && !self.init_config {
            return Err(ThermoError::Config(
                "at least one report file or directory is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Load the report configuration: the `--config` file when given (it must
    /// exist and parse), otherwise the default path, otherwise built-in
    /// defaults.
    pub fn report_config(&self) -> Result<ReportConfig> {
        match &self.config {
            Some(path) => ReportConfig::read_from(path),
            None => Ok(ReportConfig::load_from(&ReportConfig::config_path())),
        }
    }
}

// ── ReportConfig ───────────────────────────────────────────────────────────────

/// Header names of the report columns the parser reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    /// Combined `YYYY-MM-DD HH:MM:SS` column.
    pub datetime: String,
    /// Outdoor temperature, °F.
    pub outdoor_temp: String,
    /// Indoor (thermostat) temperature, °F.
    pub indoor_temp: String,
    pub indoor_humidity: String,
    pub outdoor_humidity: String,
    pub hvac_mode: String,
    /// Optional; absent columns are simply not carried.
    pub event: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            datetime: "DateTime".to_string(),
            outdoor_temp: "T_out".to_string(),
            indoor_temp: "Thermostat_Temperature".to_string(),
            indoor_humidity: "Humidity".to_string(),
            outdoor_humidity: "RH_out".to_string(),
            hvac_mode: "HvacMode".to_string(),
            event: "Event".to_string(),
        }
    }
}

impl ColumnMap {
    /// Columns whose absence makes a report unreadable.
    pub fn required(&self) -> [&str; 6] {
        [
            &self.datetime,
            &self.outdoor_temp,
            &self.indoor_temp,
            &self.indoor_humidity,
            &self.outdoor_humidity,
            &self.hvac_mode,
        ]
    }
}

/// How thermostat reports are laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub columns: ColumnMap,
    /// Field separator.
    pub delimiter: char,
    /// Lines containing this character are dropped by the fallback parser.
    pub comment_marker: char,
    /// HVAC mode label meaning the system is idle.
    pub off_label: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMap::default(),
            delimiter: ',',
            comment_marker: '#',
            off_label: "off".to_string(),
        }
    }
}

impl ReportConfig {
    /// Default config location: `~/.thermolog/config.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".thermolog").join("config.json")
    }

    /// Load from `path`, falling back to defaults when the file is absent or
    /// cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring unreadable config {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Load from `path`, failing when it is missing or malformed.
    pub fn read_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ThermoError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.delimiter_byte()?;
        Ok(config)
    }

    /// Atomically write the config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ThermoError::Config(format!(
                "delimiter must be an ASCII character, got {:?}",
                self.delimiter
            )))
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
