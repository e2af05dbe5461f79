//! Model error types
//!
//! Re-exports runcraft-error and provides model-specific conveniences.

pub use runcraft_error::{Error, ErrorKind, ErrorStatus, Result};

use crate::provider::ProviderError;

/// Create an InvalidParameter error for a temperature outside [0, 1]
pub fn invalid_temperature(temperature: f32) -> Error {
    Error::invalid_parameter(
        "temperature",
        temperature,
        format!("temperature must be within [0, 1], got {}", temperature),
    )
}

/// Create an InvalidParameter error for a non-positive token limit
pub fn invalid_max_output_tokens(max_output_tokens: i64) -> Error {
    Error::invalid_parameter(
        "max_output_tokens",
        max_output_tokens,
        format!("max_output_tokens must be positive, got {}", max_output_tokens),
    )
}

/// Wrap a provider failure without altering it
pub fn remote_call_failed(err: ProviderError) -> Error {
    let status = if err.is_transient() {
        ErrorStatus::Temporary
    } else {
        ErrorStatus::Permanent
    };
    Error::remote_call_failed(err.to_string())
        .with_status(status)
        .set_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_call_failed_keeps_source() {
        let err = remote_call_failed(ProviderError::AuthenticationFailed);
        assert_eq!(err.kind(), ErrorKind::RemoteCallFailed);
        assert!(!err.is_retryable());

        let source = err.source_ref().expect("source attached");
        let provider_err = source.downcast_ref::<ProviderError>().expect("provider error");
        assert!(matches!(provider_err, ProviderError::AuthenticationFailed));
    }

    #[test]
    fn test_rate_limit_is_temporary() {
        let err = remote_call_failed(ProviderError::RateLimited { retry_after: Some(3) });
        assert!(err.is_retryable());
        assert!(err.message().contains("retry after 3s"));
    }

    #[test]
    fn test_display_names_provider_error_once() {
        let err = remote_call_failed(ProviderError::RateLimited { retry_after: None })
            .with_operation("runner::run");
        let display = err.to_string();
        assert_eq!(display.matches("Rate limited").count(), 1, "{}", display);
    }
}
