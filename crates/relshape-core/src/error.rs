//! Error types for relshape operations.
//!
//! Resolution itself never fails with an error: a field that is not a valid
//! M2M/M2A simply resolves to `None`. The errors here cover the fallible
//! edges of the system, such as loading a schema snapshot or parsing
//! resolver configuration.

use std::fmt;

/// The primary error type for relshape operations.
#[derive(Debug)]
pub enum Error {
    /// Schema snapshot / store validation errors
    Schema(SchemaError),
    /// Configuration errors
    Config(ConfigError),
    /// I/O errors while reading a snapshot
    Io(std::io::Error),
    /// Serialization/deserialization errors
    Serde(String),
}

#[derive(Debug)]
pub struct SchemaError {
    pub kind: SchemaErrorKind,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorKind {
    /// A record is missing a required name (empty collection or field)
    Invalid,
    /// Two records share the same key
    Duplicate,
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Build an `Invalid` schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Error::Schema(SchemaError {
            kind: SchemaErrorKind::Invalid,
            message: message.into(),
            source: None,
        })
    }

    /// Build a `Duplicate` schema error.
    pub fn duplicate(message: impl Into<String>) -> Self {
        Error::Schema(SchemaError {
            kind: SchemaErrorKind::Duplicate,
            message: message.into(),
            source: None,
        })
    }

    /// The schema error kind, if this is a schema error.
    pub fn schema_kind(&self) -> Option<SchemaErrorKind> {
        match self {
            Error::Schema(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Is this a configuration error?
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Schema(e) => write!(f, "Schema error: {}", e.message),
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Serde(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Schema(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Config(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Io(e) => Some(e),
            Error::Serde(_) => None,
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serde(err.to_string())
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Error::Schema(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

/// Result type alias for relshape operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_schema_helpers_set_kind() {
        let invalid = Error::invalid_schema("field has an empty name");
        assert_eq!(invalid.schema_kind(), Some(SchemaErrorKind::Invalid));
        assert_eq!(
            invalid.to_string(),
            "Schema error: field has an empty name"
        );

        let dup = Error::duplicate("relation articles.tags declared twice");
        assert_eq!(dup.schema_kind(), Some(SchemaErrorKind::Duplicate));
        assert!(!dup.is_config_error());
    }

    #[test]
    fn test_config_error_display_and_source() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = Error::Config(ConfigError {
            message: "invalid resolver config".to_string(),
            source: Some(Box::new(parse)),
        });

        assert!(err.is_config_error());
        assert_eq!(err.schema_kind(), None);
        assert_eq!(err.to_string(), "Configuration error: invalid resolver config");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_serde_and_io_conversions() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serde(_)));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing snapshot");
        let err: Error = io.into();
        assert!(err.to_string().starts_with("I/O error"));
        assert!(err.source().is_some());
    }
}
