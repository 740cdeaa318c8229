use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a day within the merged series.
///
/// Starts at 1 for the first day ever appended and advances by the real
/// calendar gap between appended reports. This is a running counter, not a
/// calendar ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayOrdinal(pub i64);

impl DayOrdinal {
    /// Raw integer value.
    pub fn value(self) -> i64 {
        self.0
    }

    /// A new ordinal moved by `delta` days.
    pub fn shifted(self, delta: i64) -> Self {
        DayOrdinal(self.0 + delta)
    }
}

impl fmt::Display for DayOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// HVAC operating mode reported by the thermostat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HvacMode {
    /// The system is idle.
    Off,
    /// Any other label (`heat`, `cool`, `auto`, …), kept verbatim.
    Active(String),
}

impl HvacMode {
    /// Classify a raw mode label. Comparison against `off_label` ignores
    /// surrounding whitespace and ASCII case; everything else is active.
    pub fn from_label(label: &str, off_label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.eq_ignore_ascii_case(off_label.trim()) {
            HvacMode::Off
        } else {
            HvacMode::Active(trimmed.to_string())
        }
    }

    /// Whether the device was running in this sample.
    pub fn is_active(&self) -> bool {
        matches!(self, HvacMode::Active(_))
    }
}

/// One normalized thermostat sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Calendar date of the sample.
    pub date: NaiveDate,
    /// Clock time of the sample.
    pub time: NaiveTime,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Position of `date` in the merged series.
    pub day_ordinal: DayOrdinal,
    /// Outdoor temperature (°C).
    pub outdoor_temp_c: Option<f64>,
    /// Indoor (thermostat) temperature (°C).
    pub indoor_temp_c: Option<f64>,
    /// Indoor relative humidity (%RH).
    pub indoor_humidity: Option<f64>,
    /// Outdoor relative humidity (%RH).
    pub outdoor_humidity: Option<f64>,
    pub hvac_mode: HvacMode,
    /// Free-text event column (`Event`), when the report has one.
    #[serde(default)]
    pub event: Option<String>,
}

impl Record {
    /// Build a record, deriving year/month/day from `date`.
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        day_ordinal: DayOrdinal,
        hvac_mode: HvacMode,
    ) -> Self {
        Self {
            date,
            time,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            day_ordinal,
            outdoor_temp_c: None,
            indoor_temp_c: None,
            indoor_humidity: None,
            outdoor_humidity: None,
            hvac_mode,
            event: None,
        }
    }

    /// Clock time in minutes since midnight (`hours * 60 + minutes`).
    pub fn minutes_since_midnight(&self) -> i64 {
        i64::from(self.time.hour()) * 60 + i64::from(self.time.minute())
    }
}

// ── Measures ──────────────────────────────────────────────────────────────────

/// The numeric columns that the per-day statistics are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    OutdoorTemp,
    IndoorTemp,
    IndoorHumidity,
    OutdoorHumidity,
}

impl Measure {
    /// Summary column order: outdoor temp, indoor temp, indoor humidity,
    /// outdoor humidity.
    pub const ALL: [Measure; 4] = [
        Measure::OutdoorTemp,
        Measure::IndoorTemp,
        Measure::IndoorHumidity,
        Measure::OutdoorHumidity,
    ];

    /// Read this measure from a record.
    pub fn value(self, record: &Record) -> Option<f64> {
        match self {
            Measure::OutdoorTemp => record.outdoor_temp_c,
            Measure::IndoorTemp => record.indoor_temp_c,
            Measure::IndoorHumidity => record.indoor_humidity,
            Measure::OutdoorHumidity => record.outdoor_humidity,
        }
    }

    /// Human-readable label with unit.
    pub fn label(self) -> &'static str {
        match self {
            Measure::OutdoorTemp => "Outdoor Temp (C)",
            Measure::IndoorTemp => "Indoor Temp (C)",
            Measure::IndoorHumidity => "Indoor Humidity (%RH)",
            Measure::OutdoorHumidity => "Outdoor Humidity (%RH)",
        }
    }
}

/// Mean and population standard deviation of one measure for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanStd {
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

/// Extremes of one measure for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MaxMin {
    pub max: Option<f64>,
    pub min: Option<f64>,
}

/// All four statistics of one measure for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasureSummary {
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
}

impl MeasureSummary {
    pub fn from_parts(mean_std: MeanStd, max_min: MaxMin) -> Self {
        Self {
            mean: mean_std.mean,
            std_dev: mean_std.std_dev,
            max: max_min.max,
            min: max_min.min,
        }
    }
}

/// One row of the per-day summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub day: DayOrdinal,
    pub outdoor_temp: MeasureSummary,
    pub indoor_temp: MeasureSummary,
    pub indoor_humidity: MeasureSummary,
    pub outdoor_humidity: MeasureSummary,
    /// Minutes the HVAC spent in an active mode that day.
    pub device_on_minutes: i64,
}

impl SummaryRow {
    /// Statistics block for `measure`.
    pub fn measure(&self, measure: Measure) -> &MeasureSummary {
        match measure {
            Measure::OutdoorTemp => &self.outdoor_temp,
            Measure::IndoorTemp => &self.indoor_temp,
            Measure::IndoorHumidity => &self.indoor_humidity,
            Measure::OutdoorHumidity => &self.outdoor_humidity,
        }
    }

    /// Read one value column.
    pub fn field(&self, field: SummaryField) -> Option<f64> {
        match field {
            SummaryField::Mean(m) => self.measure(m).mean,
            SummaryField::StdDev(m) => self.measure(m).std_dev,
            SummaryField::Max(m) => self.measure(m).max,
            SummaryField::Min(m) => self.measure(m).min,
            SummaryField::DeviceOnMinutes => Some(self.device_on_minutes as f64),
        }
    }
}

// ── Summary columns ───────────────────────────────────────────────────────────

/// Header of the day-ordinal column in exported summaries.
pub const DAY_ORDINAL_HEADER: &str = "Days in Order";

/// A value column of the summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryField {
    Mean(Measure),
    StdDev(Measure),
    Max(Measure),
    Min(Measure),
    DeviceOnMinutes,
}

impl SummaryField {
    /// Export order: mean/std for every measure, then max/min for every
    /// measure, then device-on minutes.
    pub fn columns() -> Vec<SummaryField> {
        let mut columns = Vec::with_capacity(17);
        for m in Measure::ALL {
            columns.push(SummaryField::Mean(m));
            columns.push(SummaryField::StdDev(m));
        }
        for m in Measure::ALL {
            columns.push(SummaryField::Max(m));
            columns.push(SummaryField::Min(m));
        }
        columns.push(SummaryField::DeviceOnMinutes);
        columns
    }

    /// Column header used in exported reports.
    pub fn header(self) -> &'static str {
        use Measure::*;
        match self {
            SummaryField::Mean(OutdoorTemp) => "Mean Outdoor Temp (C)",
            SummaryField::Mean(IndoorTemp) => "Mean Indoor Temp (C)",
            SummaryField::Mean(IndoorHumidity) => "Mean Indoor Hum (%RH)",
            SummaryField::Mean(OutdoorHumidity) => "Mean Outdoor Hum (%RH)",
            SummaryField::StdDev(OutdoorTemp) => "Outdoor Temp Standard Deviation (C)",
            SummaryField::StdDev(IndoorTemp) => "Indoor Temp Standard Deviation (C)",
            SummaryField::StdDev(IndoorHumidity) => "Indoor Humidity Standard Deviation (%RH)",
            SummaryField::StdDev(OutdoorHumidity) => "Outdoor Humidity Standard Deviation (%RH)",
            SummaryField::Max(OutdoorTemp) => "Max Outdoor Temp (C)",
            SummaryField::Max(IndoorTemp) => "Max Indoor Temp (C)",
            SummaryField::Max(IndoorHumidity) => "Max Indoor Humidity (%RH)",
            SummaryField::Max(OutdoorHumidity) => "Max Outdoor Humidity (%RH)",
            SummaryField::Min(OutdoorTemp) => "Min Outdoor Temp (C)",
            SummaryField::Min(IndoorTemp) => "Min Indoor Temp (C)",
            SummaryField::Min(IndoorHumidity) => "Min Indoor Humidity (%RH)",
            SummaryField::Min(OutdoorHumidity) => "Min Outdoor Humidity (%RH)",
            SummaryField::DeviceOnMinutes => "Time on (min)",
        }
    }
}
