//! Error types for weather data lookups

/// Result type for weather data operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when querying the weather store
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested city is not in the dataset
    #[error("Weather data not available for '{city}'. Available cities: {available}")]
    UnknownCity {
        /// The (lowercased) city that was requested
        city: String,
        /// Comma-joined list of cities the store does know
        available: String,
    },
}
