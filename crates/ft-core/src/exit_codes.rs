//! Exit codes for the ft-core CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.

use ft_common::Error;

/// Exit codes for ft-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Thresholds computed / config valid
    Ok = 0,

    /// Configuration rejected before computation
    ConfigError = 10,

    /// Labels or model outputs unusable
    DataError = 11,

    /// Model failed to produce outputs
    ModelError = 12,

    /// I/O error
    IoError = 13,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err.code() {
            10..=19 => ExitCode::ConfigError,
            20..=29 => ExitCode::DataError,
            30..=39 => ExitCode::ModelError,
            60 => ExitCode::IoError,
            61 => ExitCode::DataError,
            _ => ExitCode::InternalError,
        }
    }
}
