/*!
 * Error Handling for Sitecrypt
 *
 * Provides the error taxonomy shared by key resolution, encryption and
 * key-ring export, with numeric error codes, user-friendly messages and
 * suggested remediation strategies.
 *
 * Note that a key that is simply not configured is not an error: resolvers
 * report it as `Ok(None)` and callers branch on it.
 */

use std::collections::HashMap;
use thiserror::Error;

/// Error type for all key resolution and encryption operations
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Malformed key material in '{source_name}': {cause}")]
    FormatError {
        source_name: String,
        cause: String,
        error_code: u32,
    },

    #[error("Missing key configuration (key id: {key_id})")]
    KeyNotFound { key_id: String, error_code: u32 },

    #[error("Encryption failed: {cause}")]
    EncryptionError { cause: String, error_code: u32 },

    #[error("Decryption failed: {cause}")]
    DecryptionError { cause: String, error_code: u32 },

    #[error("Invalid parameter: {parameter} - {expected} - got {actual}")]
    InvalidParameter {
        parameter: String,
        expected: String,
        actual: String,
        error_code: u32,
    },

    #[error("Machine configuration error in {path}: {cause}")]
    ConfigurationError {
        path: String,
        cause: String,
        error_code: u32,
    },

    #[error("Key ring export failed: {cause}")]
    ExportError { cause: String, error_code: u32 },

    #[error("Random number generation failed: {cause}")]
    RandomGenerationError { cause: String, error_code: u32 },

    #[error("IO error: {0}")]
    IoError(String),
}

/// Error code constants for different error categories
pub mod error_codes {
    // Key material errors: 1000-1999
    pub const HEX_ODD_LENGTH: u32 = 1001;
    pub const HEX_INVALID_CHARACTER: u32 = 1002;

    // Resolution errors: 2000-2999
    pub const KEY_NOT_FOUND: u32 = 2001;

    // AES errors: 3000-3999
    pub const AES_ENCRYPTION_FAILED: u32 = 3001;
    pub const AES_DECRYPTION_FAILED: u32 = 3002;
    pub const AES_INVALID_KEY_SIZE: u32 = 3003;
    pub const AES_INVALID_IV_SIZE: u32 = 3004;
    pub const AES_TRUNCATED_CIPHERTEXT: u32 = 3005;
    pub const AES_PADDING_INVALID: u32 = 3006;
    pub const PAYLOAD_ENCODING_INVALID: u32 = 3007;

    // Machine configuration errors: 4000-4999
    pub const MACHINE_CONFIG_MALFORMED: u32 = 4001;

    // Export errors: 5000-5999
    pub const EXPORT_WRITE_FAILED: u32 = 5001;
    pub const EXPORT_DESCRIPTOR_FAILED: u32 = 5002;

    // Entropy errors: 6000-6999
    pub const RANDOM_SOURCE_FAILED: u32 = 6001;

    // Generic errors: 9000-9999
    pub const IO_ERROR: u32 = 9002;
    pub const INVALID_PARAMETER: u32 = 9999;
}

impl CryptoError {
    /// Get the numeric error code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            CryptoError::FormatError { error_code, .. } => *error_code,
            CryptoError::KeyNotFound { error_code, .. } => *error_code,
            CryptoError::EncryptionError { error_code, .. } => *error_code,
            CryptoError::DecryptionError { error_code, .. } => *error_code,
            CryptoError::InvalidParameter { error_code, .. } => *error_code,
            CryptoError::ConfigurationError { error_code, .. } => *error_code,
            CryptoError::ExportError { error_code, .. } => *error_code,
            CryptoError::RandomGenerationError { error_code, .. } => *error_code,
            CryptoError::IoError(_) => error_codes::IO_ERROR,
        }
    }

    /// Get a user-friendly error message
    pub fn user_friendly_message(&self) -> String {
        match self {
            CryptoError::FormatError { source_name, .. } => format!(
                "The key configured in '{}' is not valid hexadecimal text.",
                source_name
            ),
            CryptoError::KeyNotFound { key_id, .. } => format!(
                "No encryption key is configured for '{}'. Data cannot be encrypted or decrypted.",
                key_id
            ),
            CryptoError::EncryptionError { .. } => {
                "Encryption failed. The payload was not protected.".to_string()
            }
            CryptoError::DecryptionError { .. } => {
                "Decryption failed. The data may be corrupted or protected with a different key."
                    .to_string()
            }
            CryptoError::InvalidParameter {
                parameter,
                expected,
                ..
            } => format!(
                "Invalid parameter '{}'. Expected '{}'.",
                parameter, expected
            ),
            CryptoError::ConfigurationError { path, .. } => {
                format!("The machine configuration file '{}' could not be parsed.", path)
            }
            CryptoError::ExportError { .. } => {
                "The key ring could not be exported.".to_string()
            }
            CryptoError::RandomGenerationError { .. } => {
                "Random number generation failed. Cryptographic operations may be insecure."
                    .to_string()
            }
            CryptoError::IoError(_) => {
                "Input/output operation failed. Check file permissions.".to_string()
            }
        }
    }

    /// Get technical details for debugging
    pub fn technical_details(&self) -> HashMap<String, String> {
        let mut details = HashMap::new();

        details.insert("error_code".to_string(), self.error_code().to_string());
        details.insert("error_type".to_string(), self.error_type().to_string());
        details.insert("timestamp".to_string(), chrono::Utc::now().to_rfc3339());

        match self {
            CryptoError::FormatError {
                source_name, cause, ..
            } => {
                details.insert("source".to_string(), source_name.clone());
                details.insert("cause".to_string(), cause.clone());
            }
            CryptoError::KeyNotFound { key_id, .. } => {
                details.insert("key_id".to_string(), key_id.clone());
            }
            CryptoError::EncryptionError { cause, .. }
            | CryptoError::DecryptionError { cause, .. }
            | CryptoError::ExportError { cause, .. }
            | CryptoError::RandomGenerationError { cause, .. } => {
                details.insert("cause".to_string(), cause.clone());
            }
            CryptoError::InvalidParameter {
                parameter,
                expected,
                actual,
                ..
            } => {
                details.insert("parameter".to_string(), parameter.clone());
                details.insert("expected".to_string(), expected.clone());
                details.insert("actual".to_string(), actual.clone());
            }
            CryptoError::ConfigurationError { path, cause, .. } => {
                details.insert("path".to_string(), path.clone());
                details.insert("cause".to_string(), cause.clone());
            }
            CryptoError::IoError(cause) => {
                details.insert("cause".to_string(), cause.clone());
            }
        }

        details
    }

    /// Get suggested remediation steps
    pub fn suggested_remediation(&self) -> Option<String> {
        match self {
            CryptoError::FormatError { error_code, .. } => match *error_code {
                error_codes::HEX_ODD_LENGTH => Some(
                    "Key values must contain an even number of hexadecimal digits.".to_string(),
                ),
                _ => Some("Key values may only contain the characters 0-9 and A-F.".to_string()),
            },
            CryptoError::KeyNotFound { .. } => Some(
                "Set the platform or local encryption key variable, or configure the referenced key id."
                    .to_string(),
            ),
            CryptoError::DecryptionError { .. } => Some(
                "Check that the key id used for decryption is the one returned at encryption time."
                    .to_string(),
            ),
            CryptoError::InvalidParameter { error_code, .. }
                if *error_code == error_codes::AES_INVALID_KEY_SIZE =>
            {
                Some("Use a 128, 192 or 256-bit key.".to_string())
            }
            CryptoError::ConfigurationError { .. } => {
                Some("Verify that the machine configuration file is well-formed XML.".to_string())
            }
            CryptoError::RandomGenerationError { .. } => {
                Some("Check system entropy sources.".to_string())
            }
            _ => None,
        }
    }

    /// Get the error category/type as a string
    pub fn error_type(&self) -> &'static str {
        match self {
            CryptoError::FormatError { .. } => "FormatError",
            CryptoError::KeyNotFound { .. } => "KeyNotFound",
            CryptoError::EncryptionError { .. } => "EncryptionError",
            CryptoError::DecryptionError { .. } => "DecryptionError",
            CryptoError::InvalidParameter { .. } => "InvalidParameter",
            CryptoError::ConfigurationError { .. } => "ConfigurationError",
            CryptoError::ExportError { .. } => "ExportError",
            CryptoError::RandomGenerationError { .. } => "RandomGenerationError",
            CryptoError::IoError(_) => "IoError",
        }
    }

    /// Whether this error is a decryption failure
    pub fn is_decryption_error(&self) -> bool {
        matches!(self, CryptoError::DecryptionError { .. })
    }
}

/// Convenience constructors for common error types
impl CryptoError {
    pub fn format_error(source_name: &str, cause: &str, error_code: u32) -> Self {
        CryptoError::FormatError {
            source_name: source_name.to_string(),
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn key_not_found(key_id: Option<&str>) -> Self {
        CryptoError::KeyNotFound {
            key_id: key_id.unwrap_or("<current>").to_string(),
            error_code: error_codes::KEY_NOT_FOUND,
        }
    }

    pub fn encryption_error(cause: &str, error_code: u32) -> Self {
        CryptoError::EncryptionError {
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn decryption_error(cause: &str, error_code: u32) -> Self {
        CryptoError::DecryptionError {
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn invalid_parameter(parameter: &str, expected: &str, actual: &str) -> Self {
        CryptoError::InvalidParameter {
            parameter: parameter.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            error_code: error_codes::INVALID_PARAMETER,
        }
    }

    pub fn configuration_error(path: &str, cause: &str) -> Self {
        CryptoError::ConfigurationError {
            path: path.to_string(),
            cause: cause.to_string(),
            error_code: error_codes::MACHINE_CONFIG_MALFORMED,
        }
    }

    pub fn export_error(cause: &str, error_code: u32) -> Self {
        CryptoError::ExportError {
            cause: cause.to_string(),
            error_code,
        }
    }

    pub fn random_generation_error(cause: &str) -> Self {
        CryptoError::RandomGenerationError {
            cause: cause.to_string(),
            error_code: error_codes::RANDOM_SOURCE_FAILED,
        }
    }

    pub fn io_error(cause: &str) -> Self {
        CryptoError::IoError(cause.to_string())
    }
}

// From implementations for automatic error conversion
impl From<std::io::Error> for CryptoError {
    fn from(err: std::io::Error) -> Self {
        CryptoError::io_error(&format!("IO operation failed: {}", err))
    }
}

/// Result type alias for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;
