use thiserror::Error;

/// Reasons a set of raw request parameters can't be turned into a
/// `QueryFilter`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Missing required parameter \"{0}\"")]
    MissingParameter(&'static str),

    #[error("Malformed date \"{0}\", expected M/D/YYYY or YYYY-MM-DD with an optional HH:MM time")]
    MalformedDate(String),

    #[error("Malformed receiver limit \"{0}\"")]
    MalformedLimit(String),

    #[error("Invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl FilterError {
    /// Missing parameters are answered with an empty result instead
    /// of an error by the filter driven endpoints.
    pub fn is_missing_parameter(&self) -> bool {
        matches!(self, FilterError::MissingParameter(_))
    }
}
