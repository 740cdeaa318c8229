//! Summary output: CSV with report headers, JSON, and a terminal table.

use std::fmt::Write as _;
use std::io::Write;

use thermolog_core::error::Result;
use thermolog_core::formatting::{format_duration, format_stat, pad_left};
use thermolog_core::models::{Measure, SummaryField, DAY_ORDINAL_HEADER};

use crate::summary::{SummaryTable, TemperatureBand};

/// Write the summary as CSV: `Days in Order` followed by every value
/// column. Missing values become empty cells.
pub fn write_csv<W: Write>(table: &SummaryTable, writer: W) -> Result<()> {
    let columns = SummaryField::columns();
    let mut out = csv::Writer::from_writer(writer);

    let mut header = vec![DAY_ORDINAL_HEADER];
    header.extend(columns.iter().map(|c| c.header()));
    out.write_record(&header).map_err(std::io::Error::from)?;

    for row in table.rows() {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(row.day.to_string());
        for column in &columns {
            let cell = match column {
                SummaryField::DeviceOnMinutes => row.device_on_minutes.to_string(),
                other => row.field(*other).map(|v| v.to_string()).unwrap_or_default(),
            };
            record.push(cell);
        }
        out.write_record(&record).map_err(std::io::Error::from)?;
    }

    out.flush()?;
    Ok(())
}

/// Pretty JSON array of summary rows.
pub fn to_json(table: &SummaryTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(table)?)
}

// ── Terminal rendering ────────────────────────────────────────────────────────

const DAY_WIDTH: usize = 6;
const STAT_WIDTH: usize = 24;
const ON_WIDTH: usize = 10;

fn mean_std_cell(mean: Option<f64>, std_dev: Option<f64>) -> String {
    match (mean, std_dev) {
        (Some(_), Some(_)) => format!("{} ±{}", format_stat(mean, 1), format_stat(std_dev, 1)),
        _ => format_stat(mean, 1),
    }
}

/// Plain-text table: mean ± std of each measure and device-on time per day.
pub fn render_table(table: &SummaryTable) -> String {
    let mut out = String::new();

    let _ = write!(out, "{}", pad_left("Day", DAY_WIDTH));
    for measure in Measure::ALL {
        let _ = write!(out, "{}", pad_left(measure.label(), STAT_WIDTH));
    }
    let _ = writeln!(out, "{}", pad_left("On", ON_WIDTH));

    for row in table.rows() {
        let _ = write!(out, "{}", pad_left(&row.day.to_string(), DAY_WIDTH));
        for measure in Measure::ALL {
            let stats = row.measure(measure);
            let _ = write!(
                out,
                "{}",
                pad_left(&mean_std_cell(stats.mean, stats.std_dev), STAT_WIDTH)
            );
        }
        let _ = writeln!(
            out,
            "{}",
            pad_left(&format_duration(row.device_on_minutes), ON_WIDTH)
        );
    }

    let _ = writeln!(
        out,
        "{} days, {} device-on",
        table.len(),
        format_duration(table.total_device_on_minutes())
    );
    out
}

/// Plain-text listing of temperature bands.
pub fn render_bands(bands: &[TemperatureBand]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}{}{}{}",
        pad_left("Band (C)", 18),
        pad_left("Days", 6),
        pad_left("Mean on (h)", 13),
        pad_left("Std (h)", 9)
    );
    for band in bands {
        let range = format!("{:.1} .. {:.1}", band.lower_c(), band.upper_c);
        let _ = writeln!(
            out,
            "{}{}{}{}",
            pad_left(&range, 18),
            pad_left(&band.days.to_string(), 6),
            pad_left(&format_stat(band.mean_hours, 2), 13),
            pad_left(&format_stat(band.std_hours, 2), 9)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use thermolog_core::models::{DayOrdinal, HvacMode, Record};

    use crate::summary::SummaryBuilder;

    fn table() -> SummaryTable {
        let date = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let mut on = Record::new(
            date,
            NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            DayOrdinal(1),
            HvacMode::Active("heat".to_string()),
        );
        on.outdoor_temp_c = Some(-1.5);
        on.indoor_temp_c = Some(20.0);
        let mut off = on.clone();
        off.day_ordinal = DayOrdinal(2);
        off.hvac_mode = HvacMode::Off;
        off.indoor_temp_c = None;
        off.outdoor_temp_c = None;
        SummaryBuilder::summarize_records(&[on, off])
    }

    #[test]
    fn test_write_csv_headers_and_cells() {
        let mut buf = Vec::new();
        write_csv(&table(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with(
            "Days in Order,Mean Outdoor Temp (C),Outdoor Temp Standard Deviation (C),"
        ));
        assert!(header.ends_with(",Time on (min)"));
        assert_eq!(header.split(',').count(), 18);

        let first = lines.next().unwrap();
        assert!(first.starts_with("1,-1.5,0,"));
        assert!(first.ends_with(",120"));

        let second: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(second[0], "2");
        assert_eq!(second[1], "");
        assert_eq!(second[17], "0");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_to_json_is_array() {
        let json = to_json(&table()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["day"], 1);
        assert_eq!(rows[0]["device_on_minutes"], 120);
        assert!(rows[1]["outdoor_temp"]["mean"].is_null());
    }

    #[test]
    fn test_render_table() {
        let text = render_table(&table());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Outdoor Temp (C)"));
        assert!(lines[0].contains("Outdoor Humidity (%RH)"));
        assert!(lines[1].contains("-1.5 ±0.0"));
        assert!(lines[1].trim_end().ends_with("2h"));
        assert!(lines[2].contains('-'));
        assert_eq!(lines[3], "2 days, 2h device-on");
    }

    #[test]
    fn test_render_bands() {
        let bands = vec![TemperatureBand {
            upper_c: 5.0,
            width_c: 5.0,
            days: 3,
            mean_hours: Some(2.5),
            std_hours: None,
        }];
        let text = render_bands(&bands);
        assert!(text.contains("0.0 .. 5.0"));
        assert!(text.contains("2.50"));
        assert_eq!(text.lines().count(), 2);
    }
}
