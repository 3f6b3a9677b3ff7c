use thiserror::Error;

#[derive(Debug, Error)]
pub enum StubError {
    #[error(transparent)]
    Provider(#[from] crate::providers::ProviderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value in {path}: {source}")]
    Value {
        path: String,
        #[source]
        source: crate::value::ValueError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: StubError = io_err.into();
        assert!(matches!(err, StubError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_names_file() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StubError::Json {
            path: "plan.json".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid JSON in plan.json"));
    }

    #[test]
    fn test_provider_error_from_conversion() {
        let provider_err = crate::providers::ProviderError::UnknownProvider("aws".to_string());
        let err: StubError = provider_err.into();
        assert!(matches!(err, StubError::Provider(_)));
        assert!(err.to_string().contains("unknown provider: aws"));
    }
}
