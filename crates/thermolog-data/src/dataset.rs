//! The master table: every appended report on one continuous day index.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thermolog_core::error::Result;
use thermolog_core::models::{DayOrdinal, Record};
use thermolog_core::settings::ReportConfig;
use tracing::{debug, error, warn};

use crate::reader::{parse_report, ReportLoad, ReportTable};

/// Result of one append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Rows were added; `first_day..=last_day` are their re-based ordinals.
    Appended {
        rows: usize,
        first_day: DayOrdinal,
        last_day: DayOrdinal,
    },
    /// Nothing changed: the file was missing or held no rows.
    Skipped,
}

/// Ordered sequence of records merged from any number of reports.
///
/// Day ordinals start at 1 for the first day of the first report and keep
/// the real calendar gap between consecutive reports. Rows are never
/// removed or rewritten once appended.
#[derive(Debug, Clone, Default)]
pub struct ThermostatLog {
    records: Vec<Record>,
    files_appended: usize,
    /// Largest calendar ordinal of the previous non-empty append.
    last_source_max: Option<i64>,
}

impl ThermostatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of non-empty reports appended so far.
    pub fn files_appended(&self) -> usize {
        self.files_appended
    }

    /// Largest day ordinal in the table.
    pub fn max_day(&self) -> Option<DayOrdinal> {
        self.records.iter().map(|r| r.day_ordinal).max()
    }

    /// Distinct day ordinals in order of first appearance.
    pub fn unique_days(&self) -> Vec<DayOrdinal> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.day_ordinal)
            .filter(|day| seen.insert(*day))
            .collect()
    }

    /// Re-base `table`'s calendar ordinals onto the running index and
    /// concatenate its rows.
    ///
    /// The first day of every report lands `first - previous_last` days after
    /// the current maximum, where both are calendar ordinals.
    pub fn append(&mut self, table: ReportTable) -> AppendOutcome {
        let (Some(new_min), Some(new_max)) = (table.min_day(), table.max_day()) else {
            debug!("Nothing to append from {}", table.source.display());
            return AppendOutcome::Skipped;
        };

        let mut delta = -(new_min - 1);
        if let (Some(prev_max), Some(master_max)) = (self.last_source_max, self.max_day()) {
            delta += master_max.value() + (new_min - prev_max) - 1;
        }

        let rows = table.records.len();
        self.records.extend(table.records.into_iter().map(|mut record| {
            record.day_ordinal = record.day_ordinal.shifted(delta);
            record
        }));
        self.last_source_max = Some(new_max);
        self.files_appended += 1;

        let outcome = AppendOutcome::Appended {
            rows,
            first_day: DayOrdinal(new_min + delta),
            last_day: DayOrdinal(new_max + delta),
        };
        debug!(
            "Appended {} rows from {} ({:?})",
            rows,
            table.source.display(),
            outcome
        );
        outcome
    }

    /// Parse `path` and append it. A missing file is skipped with a warning;
    /// parse errors propagate and leave the table untouched.
    pub fn append_file(&mut self, path: &Path, config: &ReportConfig) -> Result<AppendOutcome> {
        match parse_report(path, config)? {
            ReportLoad::Loaded(table) => Ok(self.append(table)),
            ReportLoad::Missing => {
                warn!("Skipping missing report {}", path.display());
                Ok(AppendOutcome::Skipped)
            }
        }
    }

    /// Append several reports in order.
    ///
    /// A report that cannot be parsed is logged and returned as an error
    /// next to its path; the reports after it are still appended.
    pub fn append_all(
        &mut self,
        paths: &[PathBuf],
        config: &ReportConfig,
    ) -> Vec<(PathBuf, Result<AppendOutcome>)> {
        paths
            .iter()
            .map(|path| {
                let result = self.append_file(path, config);
                if let Err(e) = &result {
                    error!("Failed to append {}: {}", path.display(), e);
                }
                (path.clone(), result)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use std::io::Write;
    use tempfile::TempDir;
    use thermolog_core::error::ThermoError;
    use thermolog_core::models::HvacMode;
    use thermolog_core::time_utils::calendar_ordinal;

    fn record(y: i32, m: u32, d: u32, hh: u32) -> Record {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        Record::new(
            date,
            NaiveTime::from_hms_opt(hh, 0, 0).unwrap(),
            DayOrdinal(calendar_ordinal(date)),
            HvacMode::Off,
        )
    }

    fn table(records: Vec<Record>) -> ReportTable {
        ReportTable {
            source: PathBuf::from("test.csv"),
            records,
        }
    }

    fn days(log: &ThermostatLog) -> Vec<i64> {
        log.records().iter().map(|r| r.day_ordinal.value()).collect()
    }

    #[test]
    fn test_first_append_starts_at_one() {
        let mut log = ThermostatLog::new();
        let outcome = log.append(table(vec![
            record(2019, 1, 1, 0),
            record(2019, 1, 1, 12),
            record(2019, 1, 2, 0),
        ]));

        assert_eq!(days(&log), vec![1, 1, 2]);
        assert_eq!(
            outcome,
            AppendOutcome::Appended {
                rows: 3,
                first_day: DayOrdinal(1),
                last_day: DayOrdinal(2)
            }
        );
        assert_eq!(log.files_appended(), 1);
    }

    #[test]
    fn test_second_append_keeps_calendar_gap() {
        let mut log = ThermostatLog::new();
        log.append(table(vec![record(2019, 1, 1, 0)]));
        log.append(table(vec![record(2019, 1, 3, 0), record(2019, 1, 4, 0)]));

        assert_eq!(days(&log), vec![1, 3, 4]);
        assert_eq!(log.max_day(), Some(DayOrdinal(4)));
    }

    #[test]
    fn test_gap_preserved_across_three_reports() {
        let mut log = ThermostatLog::new();
        log.append(table(vec![record(2019, 1, 30, 0), record(2019, 1, 31, 0)]));
        log.append(table(vec![record(2019, 2, 1, 0)]));
        log.append(table(vec![record(2019, 2, 10, 0), record(2019, 2, 11, 0)]));

        assert_eq!(days(&log), vec![1, 2, 3, 12, 13]);
    }

    #[test]
    fn test_overlapping_reports_keep_literal_rebasing() {
        let mut log = ThermostatLog::new();
        log.append(table(vec![record(2019, 1, 5, 0), record(2019, 1, 6, 0)]));
        log.append(table(vec![record(2019, 1, 3, 0), record(2019, 1, 4, 0)]));

        assert_eq!(days(&log), vec![1, 2, -1, 0]);
        assert_eq!(log.unique_days().len(), 4);
    }

    #[test]
    fn test_empty_append_is_noop() {
        let mut log = ThermostatLog::new();
        log.append(table(vec![record(2019, 1, 1, 0)]));
        let before = days(&log);

        assert_eq!(log.append(table(Vec::new())), AppendOutcome::Skipped);
        assert_eq!(days(&log), before);
        assert_eq!(log.files_appended(), 1);

        log.append(table(vec![record(2019, 1, 2, 0)]));
        assert_eq!(days(&log), vec![1, 2]);
    }

    #[test]
    fn test_unique_days_first_appearance_order() {
        let mut log = ThermostatLog::new();
        log.append(table(vec![
            record(2019, 1, 2, 0),
            record(2019, 1, 1, 0),
            record(2019, 1, 2, 6),
        ]));
        assert_eq!(log.unique_days(), vec![DayOrdinal(2), DayOrdinal(1)]);
    }

    // ── append_file ───────────────────────────────────────────────────────────

    fn write_report(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "DateTime,Thermostat_Temperature,HvacMode,T_out,Humidity,RH_out").unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    #[test]
    fn test_append_all_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let jan1 = write_report(tmp.path(), "a.csv", &["2019-01-01 00:00:00,68,heat,32,40,80"]);
        let jan3 = write_report(tmp.path(), "b.csv", &["2019-01-03 00:00:00,68,off,32,40,80"]);
        let missing = tmp.path().join("missing.csv");

        let mut log = ThermostatLog::new();
        let outcomes = log.append_all(&[jan1, missing, jan3], &ReportConfig::default());

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[1].1, Ok(AppendOutcome::Skipped)));
        assert_eq!(days(&log), vec![1, 3]);
        assert_eq!(log.unique_days(), vec![DayOrdinal(1), DayOrdinal(3)]);
        assert_eq!(log.files_appended(), 2);
    }

    #[test]
    fn test_append_file_error_leaves_table_untouched() {
        let tmp = TempDir::new().unwrap();
        let good = write_report(tmp.path(), "a.csv", &["2019-01-01 00:00:00,68,heat,32,40,80"]);
        let bad = write_report(tmp.path(), "b.csv", &["2019-01-02 00:00:00,68,heat,32,40,80,1,2"]);

        let mut log = ThermostatLog::new();
        log.append_file(&good, &ReportConfig::default()).unwrap();
        assert!(log.append_file(&bad, &ReportConfig::default()).is_err());
        assert_eq!(log.len(), 1);
        assert_eq!(log.files_appended(), 1);
    }

    #[test]
    fn test_append_all_continues_past_bad_report() {
        let tmp = TempDir::new().unwrap();
        let a = write_report(tmp.path(), "a.csv", &["2019-01-01 00:00:00,68,heat,32,40,80"]);
        let bad = write_report(
            tmp.path(),
            "b.csv",
            &["2019-01-02 00:00:00,68,heat,32,40,80,1,2,3"],
        );
        let c = write_report(tmp.path(), "c.csv", &["2019-01-04 00:00:00,68,off,32,40,80"]);

        let mut log = ThermostatLog::new();
        let results = log.append_all(&[a, bad.clone(), c], &ReportConfig::default());

        assert_eq!(results.len(), 3);
        assert!(results[0].1.is_ok());
        assert_eq!(results[1].0, bad);
        assert!(matches!(
            results[1].1,
            Err(ThermoError::RaggedReport { found: 9, .. })
        ));
        assert!(matches!(results[2].1, Ok(AppendOutcome::Appended { .. })));
        assert_eq!(days(&log), vec![1, 4]);
        assert_eq!(log.files_appended(), 2);
    }
}
