use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error() {
        let error = DomainError::provider("openai", "rate limit exceeded");
        assert_eq!(
            error.to_string(),
            "Provider error: openai - rate limit exceeded"
        );
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Query must begin with SELECT");
        assert_eq!(
            error.to_string(),
            "Validation error: Query must begin with SELECT"
        );
    }

    #[test]
    fn test_malformed_response_error() {
        let error = DomainError::malformed_response("expected a JSON array of rows");
        assert_eq!(
            error.to_string(),
            "Malformed response: expected a JSON array of rows"
        );
    }

    #[test]
    fn test_persistence_error() {
        let error = DomainError::persistence("could not write cache file");
        assert_eq!(
            error.to_string(),
            "Persistence error: could not write cache file"
        );
    }
}
