/// Placeholder printed for a missing statistic.
pub const MISSING: &str = "-";

/// Format an optional statistic with a fixed number of decimals, printing
/// [`MISSING`] for `None`.
///
/// # Examples
///
/// ```
/// use thermolog_core::formatting::format_stat;
///
/// assert_eq!(format_stat(Some(21.456), 2), "21.46");
/// assert_eq!(format_stat(Some(-0.5), 1), "-0.5");
/// assert_eq!(format_stat(None, 2), "-");
/// ```
pub fn format_stat(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.prec$}", v, prec = decimals),
        None => MISSING.to_string(),
    }
}

/// Format a duration in whole minutes.
///
/// * `< 60` minutes → `"45m"`
/// * exact hours → `"3h"`
/// * otherwise → `"3h 45m"`
///
/// Negative totals (out-of-order samples) keep their sign.
///
/// # Examples
///
/// ```
/// use thermolog_core::formatting::format_duration;
///
/// assert_eq!(format_duration(45), "45m");
/// assert_eq!(format_duration(120), "2h");
/// assert_eq!(format_duration(1440), "24h");
/// assert_eq!(format_duration(225), "3h 45m");
/// ```
pub fn format_duration(minutes: i64) -> String {
    if minutes < 0 {
        return format!("-{}", format_duration(-minutes));
    }
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if mins == 0 {
        format!("{}h", hours)
    } else {
        format!("{}h {}m", hours, mins)
    }
}

/// Right-align `text` in a column of `width` characters.
pub fn pad_left(text: &str, width: usize) -> String {
    format!("{:>width$}", text, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_stat ──────────────────────────────────────────────────────────

    #[test]
    fn test_format_stat_rounds() {
        assert_eq!(format_stat(Some(1.005), 0), "1");
        assert_eq!(format_stat(Some(18.0), 2), "18.00");
    }

    #[test]
    fn test_format_stat_missing() {
        assert_eq!(format_stat(None, 0), MISSING);
    }

    // ── format_duration ──────────────────────────────────────────────────────

    #[test]
    fn test_format_duration_zero() {
        assert_eq!(format_duration(0), "0m");
    }

    #[test]
    fn test_format_duration_hours_and_minutes() {
        assert_eq!(format_duration(61), "1h 1m");
        assert_eq!(format_duration(90), "1h 30m");
    }

    #[test]
    fn test_format_duration_negative() {
        assert_eq!(format_duration(-90), "-1h 30m");
    }

    // ── pad_left ─────────────────────────────────────────────────────────────

    #[test]
    fn test_pad_left() {
        assert_eq!(pad_left("7", 3), "  7");
        assert_eq!(pad_left("1234", 3), "1234");
    }
}
