//! Error types for the Drishti tracking engine

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrishtiError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("Tracker channel closed")]
    ChannelClosed,
}

/// Result type alias for Drishti operations
pub type DrishtiResult<T> = Result<T, DrishtiError>;
