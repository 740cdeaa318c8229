//! Minutes per day the HVAC spent in an active mode.

use thermolog_core::models::{DayOrdinal, Record};
use thermolog_core::time_utils::MINUTES_PER_DAY;

use crate::aggregator::group_by_day;

/// Stateless OFF/ON interval scanner.
pub struct DeviceOnAccumulator;

impl DeviceOnAccumulator {
    /// Device-on minutes for each day, in first-appearance order.
    pub fn time_on(records: &[Record]) -> Vec<(DayOrdinal, i64)> {
        group_by_day(records)
            .iter()
            .map(|g| (g.day, Self::day_minutes(&g.records)))
            .collect()
    }

    /// Scan one day's samples in order.
    ///
    /// An interval opens at the first active sample and closes at the next
    /// "off" sample, or at midnight when the day ends with the device on.
    /// Nothing carries over into the next day.
    pub fn day_minutes(samples: &[&Record]) -> i64 {
        let mut total = 0;
        let mut start: Option<i64> = None;

        for sample in samples {
            match (start, sample.hvac_mode.is_active()) {
                (None, true) => start = Some(sample.minutes_since_midnight()),
                (Some(begin), false) => {
                    total += sample.minutes_since_midnight() - begin;
                    start = None;
                }
                _ => {}
            }
        }

        if let Some(begin) = start {
            total += MINUTES_PER_DAY - begin;
        }
        total
    }
}
