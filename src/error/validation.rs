use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("`--foreign-only` requires `--external`.")]
    ForeignOnlyRequiresExternal,
    #[cfg(test)]
    #[error("{0}")]
    Test(String),
}

#[cfg(test)]
impl From<&str> for ValidationError {
    fn from(value: &str) -> Self {
        Self::Test(value.to_owned())
    }
}

#[cfg(test)]
impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        Self::Test(value)
    }
}
