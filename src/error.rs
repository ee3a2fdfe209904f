//! Error types for sql-reveng

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reverse-engineering a schema dump
#[derive(Error, Debug)]
pub enum RevengError {
    #[error("Failed to read dump file: {path}")]
    DumpReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dump file contains invalid characters: {path}")]
    DumpEncodingError { path: PathBuf },

    #[error("Malformed extraction row: {message}")]
    MalformedRow { message: String },

    #[error("Invalid object exclusion pattern: {pattern}")]
    InvalidExclusionPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to write change script to {path}")]
    DestinationWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render manifest: {message}")]
    ManifestRenderError { message: String },

    #[error("Failed to write manifest to {path}")]
    ManifestWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
