//! Domain error types.

/// Top-level error type for quantbt.
#[derive(Debug, thiserror::Error)]
pub enum QuantbtError {
    #[error("no OHLCV data: {context}")]
    NoData { context: String },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    Data { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl QuantbtError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        QuantbtError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&QuantbtError> for std::process::ExitCode {
    fn from(err: &QuantbtError) -> Self {
        let code: u8 = match err {
            QuantbtError::Io(_) => 1,
            QuantbtError::ConfigParse { .. }
            | QuantbtError::ConfigMissing { .. }
            | QuantbtError::ConfigInvalid { .. } => 2,
            QuantbtError::Data { .. } => 3,
            QuantbtError::Report { .. } => 4,
            QuantbtError::InvalidParameter { .. } => 5,
            QuantbtError::NoData { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_display() {
        let err = QuantbtError::invalid_parameter("length", "must be at least 1");
        assert_eq!(err.to_string(), "invalid parameter length: must be at least 1");
    }

    #[test]
    fn no_data_display() {
        let err = QuantbtError::NoData {
            context: "AAPL".into(),
        };
        assert_eq!(err.to_string(), "no OHLCV data: AAPL");
    }

    #[test]
    fn exit_codes_are_distinct_per_kind() {
        let code = |e: QuantbtError| format!("{:?}", std::process::ExitCode::from(&e));
        let no_data = code(QuantbtError::NoData {
            context: "AAPL".into(),
        });
        let invalid = code(QuantbtError::invalid_parameter("length", "too long"));
        assert_ne!(no_data, invalid);
        assert_eq!(no_data, format!("{:?}", std::process::ExitCode::from(6)));
        assert_eq!(invalid, format!("{:?}", std::process::ExitCode::from(5)));
    }

    #[test]
    fn io_error_is_transparent() {
        let err: QuantbtError = std::io::Error::other("disk full").into();
        assert_eq!(err.to_string(), "disk full");
    }
}
