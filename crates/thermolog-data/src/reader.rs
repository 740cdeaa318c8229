//! Thermostat report discovery and parsing.
//!
//! A report is a delimited text file with one sensor sample per line. The
//! strict CSV pass handles well-formed files; reports with comment lines or
//! short rows go through a line-splitting fallback instead.

use std::path::{Path, PathBuf};

use csv::{ErrorKind, ReaderBuilder, Trim};
use thermolog_core::data_processors::{NumericCoercer, TemperatureConverter};
use thermolog_core::error::{Result, ThermoError};
use thermolog_core::models::{DayOrdinal, HvacMode, Record};
use thermolog_core::settings::{ColumnMap, ReportConfig};
use thermolog_core::time_utils::{calendar_ordinal, parse_datetime};
use tracing::{debug, warn};

// ── Types ─────────────────────────────────────────────────────────────────────

/// Normalized records of a single report, in file order.
///
/// Day ordinals here are calendar ordinals (0001-01-01 = 1); the master
/// table re-bases them on append.
#[derive(Debug, Clone, Default)]
pub struct ReportTable {
    pub source: PathBuf,
    pub records: Vec<Record>,
}

impl ReportTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest day ordinal, `None` when empty.
    pub fn min_day(&self) -> Option<i64> {
        self.records.iter().map(|r| r.day_ordinal.value()).min()
    }

    /// Largest day ordinal, `None` when empty.
    pub fn max_day(&self) -> Option<i64> {
        self.records.iter().map(|r| r.day_ordinal.value()).max()
    }
}

/// Outcome of [`parse_report`].
#[derive(Debug, Clone)]
pub enum ReportLoad {
    Loaded(ReportTable),
    /// The path does not exist.
    Missing,
}

/// Header plus positional rows, before typing. Short rows are already padded.
struct RawTable {
    headers: Vec<String>,
    /// `(line number, fields)`; line numbers are 1-based file lines.
    rows: Vec<(usize, Vec<String>)>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.csv` reports recursively under `dir`, sorted by path.
pub fn find_report_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Report path does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Expand command-line inputs into report paths, keeping their order.
///
/// Directories become their sorted `.csv` reports; anything else, including
/// paths that do not exist, is passed through so appending can skip it.
pub fn collect_report_paths(inputs: &[PathBuf]) -> Vec<PathBuf> {
    inputs
        .iter()
        .flat_map(|input| {
            if input.is_dir() {
                find_report_files(input)
            } else {
                vec![input.clone()]
            }
        })
        .collect()
}

/// Parse one report into normalized records.
///
/// A missing file yields [`ReportLoad::Missing`]. Unreadable files, rows
/// longer than the header and headers lacking a required column are errors.
pub fn parse_report(path: &Path, config: &ReportConfig) -> Result<ReportLoad> {
    if !path.exists() {
        return Ok(ReportLoad::Missing);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ThermoError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        debug!("Report {} is empty", path.display());
        return Ok(ReportLoad::Loaded(ReportTable {
            source: path.to_path_buf(),
            records: Vec::new(),
        }));
    }

    let delimiter = config.delimiter_byte()?;
    let raw = match read_strict(&content, delimiter) {
        Ok(raw) => raw,
        Err(e) if is_structural(&e) => {
            debug!(
                "Strict parse of {} failed ({}), using line fallback",
                path.display(),
                e
            );
            read_fallback(path, &content, config)?
        }
        Err(source) => {
            return Err(ThermoError::Csv {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let records = build_records(path, raw, config)?;
    debug!("Parsed {} records from {}", records.len(), path.display());

    Ok(ReportLoad::Loaded(ReportTable {
        source: path.to_path_buf(),
        records,
    }))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn is_structural(err: &csv::Error) -> bool {
    matches!(err.kind(), ErrorKind::UnequalLengths { .. })
}

/// Fixed-width CSV pass: every row must have as many fields as the header.
fn read_strict(content: &str, delimiter: u8) -> std::result::Result<RawTable, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        rows.push((line, record.iter().map(|f| f.to_string()).collect()));
    }

    Ok(RawTable { headers, rows })
}

/// Drop comment and blank lines, then split the rest on the delimiter.
fn read_fallback(path: &Path, content: &str, config: &ReportConfig) -> Result<RawTable> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.contains(config.comment_marker) && !line.trim().is_empty());

    let Some((_, header_line)) = lines.next() else {
        return Ok(RawTable {
            headers: Vec::new(),
            rows: Vec::new(),
        });
    };
    let headers: Vec<String> = split_fields(header_line, config.delimiter);
    let expected = headers.len();

    let mut rows = Vec::new();
    let mut padded = 0usize;
    for (line_no, line) in lines {
        let mut fields = split_fields(line, config.delimiter);
        if fields.len() > expected {
            return Err(ThermoError::RaggedReport {
                path: path.to_path_buf(),
                line: line_no,
                expected,
                found: fields.len(),
            });
        }
        if fields.len() < expected {
            padded += 1;
            fields.resize(expected, String::new());
        }
        rows.push((line_no, fields));
    }

    if padded > 0 {
        debug!("Padded {} short rows in {}", padded, path.display());
    }

    Ok(RawTable { headers, rows })
}

fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter).map(|f| f.trim().to_string()).collect()
}

/// Resolved positions of the configured columns.
struct ColumnIndex {
    datetime: usize,
    outdoor_temp: usize,
    indoor_temp: usize,
    indoor_humidity: usize,
    outdoor_humidity: usize,
    hvac_mode: usize,
    event: Option<usize>,
}

impl ColumnIndex {
    fn resolve(path: &Path, headers: &[String], columns: &ColumnMap) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);
        for name in columns.required() {
            if position(name).is_none() {
                return Err(ThermoError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                });
            }
        }
        let required = |name: &str| position(name).unwrap_or_default();
        Ok(Self {
            datetime: required(&columns.datetime),
            outdoor_temp: required(&columns.outdoor_temp),
            indoor_temp: required(&columns.indoor_temp),
            indoor_humidity: required(&columns.indoor_humidity),
            outdoor_humidity: required(&columns.outdoor_humidity),
            hvac_mode: required(&columns.hvac_mode),
            event: position(&columns.event),
        })
    }
}

fn build_records(path: &Path, raw: RawTable, config: &ReportConfig) -> Result<Vec<Record>> {
    if raw.rows.is_empty() {
        return Ok(Vec::new());
    }

    let index = ColumnIndex::resolve(path, &raw.headers, &config.columns)?;
    let mut records = Vec::with_capacity(raw.rows.len());
    let mut dropped = 0usize;
    let mut coerced = 0usize;

    for (line, fields) in &raw.rows {
        let cell = |i: usize| fields.get(i).map(String::as_str);

        let Some((date, time)) = cell(index.datetime).and_then(parse_datetime) else {
            warn!(
                "Dropping line {} of {}: unreadable date-time {:?}",
                line,
                path.display(),
                cell(index.datetime).unwrap_or_default()
            );
            dropped += 1;
            continue;
        };

        let mode = HvacMode::from_label(
            cell(index.hvac_mode).unwrap_or_default(),
            &config.off_label,
        );
        let mut record = Record::new(date, time, DayOrdinal(calendar_ordinal(date)), mode);

        record.outdoor_temp_c = TemperatureConverter::coerce_fahrenheit(cell(index.outdoor_temp));
        record.indoor_temp_c = TemperatureConverter::coerce_fahrenheit(cell(index.indoor_temp));
        record.indoor_humidity = NumericCoercer::coerce(cell(index.indoor_humidity));
        record.outdoor_humidity = NumericCoercer::coerce(cell(index.outdoor_humidity));
        record.event = index
            .event
            .and_then(cell)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        coerced += [
            (index.outdoor_temp, record.outdoor_temp_c),
            (index.indoor_temp, record.indoor_temp_c),
            (index.indoor_humidity, record.indoor_humidity),
            (index.outdoor_humidity, record.outdoor_humidity),
        ]
        .iter()
        .filter(|(i, v)| v.is_none() && !cell(*i).unwrap_or_default().is_empty())
        .count();

        records.push(record);
    }

    if dropped > 0 || coerced > 0 {
        debug!(
            "{}: {} rows dropped, {} non-numeric cells treated as missing",
            path.display(),
            dropped,
            coerced
        );
    }

    Ok(records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
