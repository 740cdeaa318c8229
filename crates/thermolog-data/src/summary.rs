//! Per-day summary table and the analyses built on it.

use serde::{Deserialize, Serialize};
use thermolog_core::models::{DayOrdinal, Measure, Record, SummaryField, SummaryRow};
use thermolog_core::statistics;
use tracing::warn;

use crate::aggregator::{group_by_day, DailyAggregator};
use crate::dataset::ThermostatLog;
use crate::device_on::DeviceOnAccumulator;

// ── SummaryTable ──────────────────────────────────────────────────────────────

/// One [`SummaryRow`] per day ordinal, in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryTable {
    rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of device-on minutes across every day.
    pub fn total_device_on_minutes(&self) -> i64 {
        self.rows.iter().map(|r| r.device_on_minutes).sum()
    }

    /// Device-on time per outdoor temperature band. See [`TemperatureBand`].
    pub fn temperature_bands(&self, width: f64) -> Vec<TemperatureBand> {
        TemperatureBand::partition(self, width)
    }

    /// Two summary columns against the day ordinal.
    pub fn comparison(&self, first: SummaryField, second: SummaryField) -> ComparisonSeries {
        ComparisonSeries::collect(
            self.rows
                .iter()
                .map(|r| (r.day, r.field(first), r.field(second))),
        )
    }
}

// ── SummaryBuilder ────────────────────────────────────────────────────────────

/// Builds the summary table from the master table.
pub struct SummaryBuilder;

impl SummaryBuilder {
    /// Recompute the summary. Depends only on the current table contents.
    pub fn summarize(log: &ThermostatLog) -> SummaryTable {
        Self::summarize_records(log.records())
    }

    pub fn summarize_records(records: &[Record]) -> SummaryTable {
        let rows = group_by_day(records)
            .iter()
            .map(|group| SummaryRow {
                day: group.day,
                outdoor_temp: DailyAggregator::summarize_day(group, Measure::OutdoorTemp),
                indoor_temp: DailyAggregator::summarize_day(group, Measure::IndoorTemp),
                indoor_humidity: DailyAggregator::summarize_day(group, Measure::IndoorHumidity),
                outdoor_humidity: DailyAggregator::summarize_day(group, Measure::OutdoorHumidity),
                device_on_minutes: DeviceOnAccumulator::day_minutes(&group.records),
            })
            .collect();
        SummaryTable { rows }
    }
}

/// Upper limit on the number of bands one partition produces.
pub const MAX_BANDS: usize = 1_000;

// ── TemperatureBand ───────────────────────────────────────────────────────────

/// Device-on statistics for days whose mean outdoor temperature falls in
/// `(upper_c - width, upper_c)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureBand {
    /// Upper edge of the band (°C), exclusive.
    pub upper_c: f64,
    pub width_c: f64,
    /// Days falling in the band.
    pub days: usize,
    /// Mean device-on hours per day; `None` for an empty band.
    pub mean_hours: Option<f64>,
    /// Population std of device-on hours; `None` for an empty band.
    pub std_hours: Option<f64>,
}

impl TemperatureBand {
    /// Upper edges run from `min + width` while below `max + width`, where
    /// min/max are the extremes of the daily mean outdoor temperature. Days
    /// without a mean outdoor temperature, and days exactly on an edge,
    /// belong to no band.
    pub fn partition(table: &SummaryTable, width: f64) -> Vec<TemperatureBand> {
        if !(width.is_finite() && width > 0.0) {
            return Vec::new();
        }

        let days: Vec<(f64, i64)> = table
            .rows()
            .iter()
            .filter_map(|r| r.outdoor_temp.mean.map(|t| (t, r.device_on_minutes)))
            .collect();

        let Some(min) = days.iter().map(|(t, _)| *t).reduce(f64::min) else {
            return Vec::new();
        };
        let max = days.iter().map(|(t, _)| *t).fold(min, f64::max);

        let needed = ((max - min) / width).ceil();
        let count = if needed > MAX_BANDS as f64 {
            warn!(
                "Band width {} °C would need {} bands; keeping the first {}",
                width, needed, MAX_BANDS
            );
            MAX_BANDS
        } else {
            needed as usize
        };
        (1..=count)
            .map(|i| {
                let upper = min + width * i as f64;
                let hours: Vec<f64> = days
                    .iter()
                    .filter(|(t, _)| *t > upper - width && *t < upper)
                    .map(|(_, minutes)| *minutes as f64 / 60.0)
                    .collect();
                TemperatureBand {
                    upper_c: upper,
                    width_c: width,
                    days: hours.len(),
                    mean_hours: statistics::mean(&hours),
                    std_hours: statistics::population_std(&hours),
                }
            })
            .collect()
    }

    /// Lower edge of the band (°C), exclusive.
    pub fn lower_c(&self) -> f64 {
        self.upper_c - self.width_c
    }
}

// ── ComparisonSeries ──────────────────────────────────────────────────────────

/// Two aligned value series over the day ordinal, ready for charting.
///
/// Rows missing either value are dropped, so all three vectors have the
/// same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSeries {
    pub x: Vec<DayOrdinal>,
    pub y1: Vec<f64>,
    pub y2: Vec<f64>,
}

impl ComparisonSeries {
    /// Two measures of the master table, one point per record.
    pub fn from_records(records: &[Record], first: Measure, second: Measure) -> Self {
        Self::collect(
            records
                .iter()
                .map(|r| (r.day_ordinal, first.value(r), second.value(r))),
        )
    }

    fn collect(points: impl Iterator<Item = (DayOrdinal, Option<f64>, Option<f64>)>) -> Self {
        let mut series = Self::default();
        for (x, y1, y2) in points {
            if let (Some(y1), Some(y2)) = (y1, y2) {
                series.x.push(x);
                series.y1.push(y1);
                series.y2.push(y2);
            }
        }
        series
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
