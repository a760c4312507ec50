//! Mv3ErrorCode trait for host-facing error reporting.

/// Every error enum implements this to provide a structured error code string
/// a host (editor integration, CI wrapper) can match on without parsing messages.
pub trait Mv3ErrorCode {
    /// Returns the error code string (e.g., "PARSE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const UNSUPPORTED_LANGUAGE: &str = "UNSUPPORTED_LANGUAGE";
pub const GRAMMAR_ERROR: &str = "GRAMMAR_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONFIG_READ_ERROR: &str = "CONFIG_READ_ERROR";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
