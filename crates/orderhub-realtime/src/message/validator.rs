//! Inbound message validation rules.

use orderhub_core::error::AppError;

/// Maximum allowed inbound message size in bytes.
const MAX_MESSAGE_SIZE: usize = 16_384;

/// Validates a raw inbound message before parsing.
pub fn validate_inbound(raw: &str) -> Result<(), AppError> {
    if raw.len() > MAX_MESSAGE_SIZE {
        return Err(AppError::validation(format!(
            "Message exceeds maximum size of {} bytes",
            MAX_MESSAGE_SIZE
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty message"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_oversized() {
        assert!(validate_inbound("   ").is_err());
        assert!(validate_inbound(&"x".repeat(MAX_MESSAGE_SIZE + 1)).is_err());
        assert!(validate_inbound(r#"{"type":"PONG"}"#).is_ok());
    }
}
