use crate::models::{MaxMin, MeanStd};

/// Decimal places kept by every per-day statistic.
pub const STAT_DECIMALS: u32 = 2;

/// Round `value` to `decimals` places, exact ties going to the even digit
/// (`40.125` → `40.12`, `40.375` → `40.38`).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divisor `n`), `None` for an empty slice.
pub fn population_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Mean and population std of the present values, rounded to
/// [`STAT_DECIMALS`]. Missing entries are ignored; both parts are `None`
/// when nothing is present.
pub fn mean_std(values: &[Option<f64>]) -> MeanStd {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    MeanStd {
        mean: mean(&present).map(|v| round_to(v, STAT_DECIMALS)),
        std_dev: population_std(&present).map(|v| round_to(v, STAT_DECIMALS)),
    }
}

/// Maximum and minimum of the present values, rounded to [`STAT_DECIMALS`].
pub fn max_min(values: &[Option<f64>]) -> MaxMin {
    let mut present = values.iter().flatten().copied();
    let Some(first) = present.next() else {
        return MaxMin::default();
    };
    let (max, min) = present.fold((first, first), |(hi, lo), v| (hi.max(v), lo.min(v)));
    MaxMin {
        max: Some(round_to(max, STAT_DECIMALS)),
        min: Some(round_to(min, STAT_DECIMALS)),
    }
}
