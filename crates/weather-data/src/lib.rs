//! Mock weather data for the weather assistant
//!
//! This crate owns the static weather dataset the tool server exposes. The
//! dataset is constructed once at startup ([`WeatherStore::with_builtin_cities`])
//! and shared read-only with whoever needs it; there is no global mutable
//! state.
//!
//! Lookups are case-insensitive. Reports carry the same fields and units as
//! the published tool descriptions (Fahrenheit, %, mph).

pub mod error;
pub mod store;

pub use error::{Error, Result};
pub use store::{CityConditions, CurrentReport, ForecastDay, ForecastReport, WeatherStore};
