//! Core error types for lottie-rs.

/// A specialized Result type for lottie-rs operations.
pub type LottieResult<T> = Result<T, LottieError>;

/// Top-level error type encompassing all lottie-rs crates.
#[derive(Debug, thiserror::Error)]
pub enum LottieError {
    /// A property failed to load or serialize; wraps the underlying cause.
    #[error("{lottie} ({name}: {type_name}): {source}")]
    Property {
        lottie: String,
        name: String,
        type_name: String,
        #[source]
        source: Box<LottieError>,
    },

    #[error("expected {expected}, found {found}")]
    UnexpectedType { expected: String, found: String },

    #[error("unknown {kind} type {tag}")]
    UnknownDiscriminator { kind: String, tag: String },

    #[error("{kind} is missing its \"{key}\" discriminator")]
    MissingDiscriminator { kind: String, key: String },

    #[error("unknown extension: {0}")]
    UnknownExtension(String),

    #[error("cannot serialize non-finite number {0}")]
    NonFiniteNumber(f64),

    #[error("no layer with index {0}")]
    LayerNotFound(i64),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LottieError {
    /// Wrap an error with the property it occurred on.
    pub fn property(
        lottie: impl Into<String>,
        name: impl Into<String>,
        type_name: impl Into<String>,
        source: LottieError,
    ) -> Self {
        LottieError::Property {
            lottie: lottie.into(),
            name: name.into(),
            type_name: type_name.into(),
            source: Box::new(source),
        }
    }

    /// Create a type mismatch error.
    pub fn unexpected(expected: impl Into<String>, found: impl Into<String>) -> Self {
        LottieError::UnexpectedType {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an unknown discriminator error.
    pub fn unknown_discriminator(kind: impl Into<String>, tag: impl ToString) -> Self {
        LottieError::UnknownDiscriminator {
            kind: kind.into(),
            tag: tag.to_string(),
        }
    }

    /// Walks through property wraps down to the error that started it.
    pub fn root_cause(&self) -> &LottieError {
        match self {
            LottieError::Property { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_error_display() {
        let err = LottieError::property(
            "k",
            "value",
            "f64",
            LottieError::unexpected("number", "string"),
        );
        assert_eq!(err.to_string(), "k (value: f64): expected number, found string");
    }

    #[test]
    fn test_root_cause_unwraps_nesting() {
        let inner = LottieError::unknown_discriminator("shape", "zz");
        let err = LottieError::property(
            "shapes",
            "shapes",
            "ShapeElement",
            LottieError::property("it", "shapes", "ShapeElement", inner),
        );
        assert!(matches!(
            err.root_cause(),
            LottieError::UnknownDiscriminator { tag, .. } if tag == "zz"
        ));
    }
}
