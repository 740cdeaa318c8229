//! Shared types for thermolog: the typed record schema, errors, unit and
//! clock helpers, per-day statistics, formatting and configuration.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod statistics;
pub mod time_utils;

pub use error::{Result, ThermoError};
pub use models::{DayOrdinal, HvacMode, Measure, Record, SummaryField, SummaryRow};
