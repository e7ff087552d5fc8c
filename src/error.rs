use std::{io, string::FromUtf8Error};

use thiserror::Error;

#[derive(Error, Debug)]
/// Error reported by the writers.
///
/// Mapping problems never surface here: unmappable classes, missing
/// accessors and failing accessors all degrade the output instead.
pub enum CsvError {
    #[error("Unable to write to sink: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Output is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
/// Error returned by [`Record::invoke`](crate::core::item::Record::invoke).
pub enum AccessError {
    #[error("No method {0} on record")]
    NoSuchMethod(String),

    #[error("Method {method} failed: {reason}")]
    Failed { method: String, reason: String },
}

impl AccessError {
    pub fn no_such_method(method: &str) -> Self {
        AccessError::NoSuchMethod(method.to_string())
    }

    pub fn failed(method: &str, reason: impl Into<String>) -> Self {
        AccessError::Failed {
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}
