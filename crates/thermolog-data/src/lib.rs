//! Report ingestion and per-day analysis for thermolog.
//!
//! Parses thermostat reports, merges them onto one continuous day index,
//! aggregates per-day statistics and device-on time, and renders the
//! resulting summary.

pub mod aggregator;
pub mod dataset;
pub mod device_on;
pub mod export;
pub mod reader;
pub mod summary;

pub use thermolog_core as core;

pub use dataset::{AppendOutcome, ThermostatLog};
pub use summary::{ComparisonSeries, SummaryBuilder, SummaryTable, TemperatureBand};
