//! Per-day statistics over the master table.

use std::collections::HashMap;

use thermolog_core::models::{DayOrdinal, MaxMin, Measure, MeanStd, MeasureSummary, Record};
use thermolog_core::statistics;

// ── DayGroup ──────────────────────────────────────────────────────────────────

/// Records sharing one day ordinal, in table order.
#[derive(Debug, Clone)]
pub struct DayGroup<'a> {
    pub day: DayOrdinal,
    pub records: Vec<&'a Record>,
}

impl DayGroup<'_> {
    /// Values of `measure` for every record of the day, missing included.
    pub fn values(&self, measure: Measure) -> Vec<Option<f64>> {
        self.records.iter().map(|r| measure.value(r)).collect()
    }
}

/// Group records by day ordinal, in order of each day's first appearance.
pub fn group_by_day(records: &[Record]) -> Vec<DayGroup<'_>> {
    let mut index: HashMap<DayOrdinal, usize> = HashMap::new();
    let mut groups: Vec<DayGroup<'_>> = Vec::new();

    for record in records {
        let slot = *index.entry(record.day_ordinal).or_insert_with(|| {
            groups.push(DayGroup {
                day: record.day_ordinal,
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].records.push(record);
    }

    groups
}

// ── DailyAggregator ───────────────────────────────────────────────────────────

/// Stateless helper computing one statistic pair per day.
pub struct DailyAggregator;

impl DailyAggregator {
    /// `(max, min)` of `measure` for each day.
    pub fn max_min(records: &[Record], measure: Measure) -> Vec<(DayOrdinal, MaxMin)> {
        group_by_day(records)
            .iter()
            .map(|g| (g.day, statistics::max_min(&g.values(measure))))
            .collect()
    }

    /// `(mean, std)` of `measure` for each day.
    pub fn mean_std(records: &[Record], measure: Measure) -> Vec<(DayOrdinal, MeanStd)> {
        group_by_day(records)
            .iter()
            .map(|g| (g.day, statistics::mean_std(&g.values(measure))))
            .collect()
    }

    /// All four statistics of `measure` for one day.
    pub fn summarize_day(group: &DayGroup<'_>, measure: Measure) -> MeasureSummary {
        let values = group.values(measure);
        MeasureSummary::from_parts(statistics::mean_std(&values), statistics::max_min(&values))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
