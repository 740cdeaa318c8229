// ── NumericCoercer ────────────────────────────────────────────────────────────

/// Best-effort conversion of raw report cells into numbers.
pub struct NumericCoercer;

impl NumericCoercer {
    /// Parse a cell as `f64`.
    ///
    /// Returns `None` for absent cells, blanks, non-numeric text and
    /// non-finite values (`nan`, `inf`), so one bad cell never aborts a parse.
    pub fn coerce(raw: Option<&str>) -> Option<f64> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

// ── TemperatureConverter ──────────────────────────────────────────────────────

/// Fahrenheit/Celsius conversion. Reports are recorded in °F and converted
/// once, at parse time.
pub struct TemperatureConverter;

impl TemperatureConverter {
    /// `(f - 32) * 5/9`
    pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
        (fahrenheit - 32.0) * (5.0 / 9.0)
    }

    /// `c * 9/5 + 32`
    pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
        celsius * (9.0 / 5.0) + 32.0
    }

    /// Coerce a raw °F cell and convert it to °C.
    pub fn coerce_fahrenheit(raw: Option<&str>) -> Option<f64> {
        NumericCoercer::coerce(raw).map(Self::fahrenheit_to_celsius)
    }
}
