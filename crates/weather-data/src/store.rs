//! The weather store and its report types
//!
//! `WeatherStore` keeps city records in insertion order so that listings and
//! "available cities" messages are stable across calls.

use serde::Serialize;

use crate::error::{Error, Result};

/// Days covered by the five-day forecast, in report order.
const FORECAST_DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Raw per-city record as stored in the dataset.
#[derive(Debug, Clone)]
pub struct CityConditions {
    /// Current temperature in Fahrenheit
    pub temperature: i32,
    /// Current sky condition (e.g. "Partly Cloudy")
    pub condition: String,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Wind speed in mph
    pub wind_speed: u32,
    /// Sky condition for each of the next five days
    pub forecast: [String; 5],
}

impl CityConditions {
    fn new(
        temperature: i32,
        condition: &str,
        humidity: u8,
        wind_speed: u32,
        forecast: [&str; 5],
    ) -> Self {
        Self {
            temperature,
            condition: condition.to_string(),
            humidity,
            wind_speed,
            forecast: forecast.map(str::to_string),
        }
    }
}

/// Current-conditions report for one city
#[derive(Debug, Clone, Serialize)]
pub struct CurrentReport {
    pub city: String,
    pub timestamp: String,
    pub temperature: i32,
    pub temperature_unit: String,
    pub condition: String,
    pub humidity: u8,
    pub humidity_unit: String,
    pub wind_speed: u32,
    pub wind_speed_unit: String,
}

/// One day of a forecast report
#[derive(Debug, Clone, Serialize)]
pub struct ForecastDay {
    pub day: String,
    pub condition: String,
}

/// Five-day forecast report for one city
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub city: String,
    pub forecast: Vec<ForecastDay>,
}

/// In-memory weather dataset, keyed by lowercased city name.
///
/// Insertion order is preserved: `city_names()` and the "available cities"
/// fragment of [`Error::UnknownCity`] always list cities in the order they
/// were added.
#[derive(Debug, Default)]
pub struct WeatherStore {
    cities: Vec<(String, CityConditions)>,
}

impl WeatherStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self { cities: Vec::new() }
    }

    /// Create a store populated with the built-in demo cities.
    pub fn with_builtin_cities() -> Self {
        let mut store = Self::new();
        store.insert(
            "new york",
            CityConditions::new(
                72,
                "Partly Cloudy",
                65,
                8,
                ["Sunny", "Cloudy", "Rainy", "Partly Cloudy", "Sunny"],
            ),
        );
        store.insert(
            "london",
            CityConditions::new(
                58,
                "Rainy",
                80,
                12,
                ["Rainy", "Cloudy", "Cloudy", "Partly Cloudy", "Sunny"],
            ),
        );
        store.insert(
            "tokyo",
            CityConditions::new(
                68,
                "Sunny",
                55,
                6,
                ["Sunny", "Sunny", "Partly Cloudy", "Cloudy", "Rainy"],
            ),
        );
        store.insert(
            "paris",
            CityConditions::new(
                64,
                "Cloudy",
                70,
                10,
                ["Cloudy", "Rainy", "Partly Cloudy", "Sunny", "Sunny"],
            ),
        );
        store.insert(
            "sydney",
            CityConditions::new(
                78,
                "Sunny",
                60,
                15,
                ["Sunny", "Sunny", "Partly Cloudy", "Partly Cloudy", "Cloudy"],
            ),
        );
        store
    }

    /// Insert or replace a city record. The key is stored lowercased.
    pub fn insert(&mut self, city: &str, conditions: CityConditions) {
        let key = city.to_lowercase();
        if let Some(entry) = self.cities.iter_mut().find(|(name, _)| *name == key) {
            entry.1 = conditions;
        } else {
            self.cities.push((key, conditions));
        }
    }

    /// Look up a city record, case-insensitively.
    fn get(&self, city: &str) -> Result<(&str, &CityConditions)> {
        let key = city.to_lowercase();
        self.cities
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(name, conditions)| (name.as_str(), conditions))
            .ok_or_else(|| Error::UnknownCity {
                city: key,
                available: self
                    .cities
                    .iter()
                    .map(|(name, _)| name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Current conditions for a city, stamped with the local time.
    pub fn current_conditions(&self, city: &str) -> Result<CurrentReport> {
        let (name, conditions) = self.get(city)?;
        Ok(CurrentReport {
            city: title_case(name),
            timestamp: chrono::Local::now().to_rfc3339(),
            temperature: conditions.temperature,
            temperature_unit: "Fahrenheit".to_string(),
            condition: conditions.condition.clone(),
            humidity: conditions.humidity,
            humidity_unit: "%".to_string(),
            wind_speed: conditions.wind_speed,
            wind_speed_unit: "mph".to_string(),
        })
    }

    /// Five-day forecast for a city, Monday through Friday.
    pub fn forecast(&self, city: &str) -> Result<ForecastReport> {
        let (name, conditions) = self.get(city)?;
        let forecast = FORECAST_DAYS
            .iter()
            .zip(conditions.forecast.iter())
            .map(|(day, condition)| ForecastDay {
                day: day.to_string(),
                condition: condition.clone(),
            })
            .collect();
        Ok(ForecastReport {
            city: title_case(name),
            forecast,
        })
    }

    /// Title-cased city names in insertion order.
    pub fn city_names(&self) -> Vec<String> {
        self.cities
            .iter()
            .map(|(name, _)| title_case(name))
            .collect()
    }

    /// Number of cities in the store.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

/// Capitalize the first letter of each whitespace-separated word.
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
