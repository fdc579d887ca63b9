//! Error types
//!
//! - `RangeError` - a range spec that cannot be expanded (aborts one range)
//! - `BuildIssue` - a problem recorded while building tables (never fatal)
//! - `DecodeError` - a VIN rejected before decoding
//! - `SourceError` - a raw data source that cannot be loaded
//! - `StoreError` - a SQLite store operation that failed
//! - `CommandError` - anything the command layer can surface

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::reference::Tier;

/// Errors produced while expanding a range spec
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeError {
    /// The range does not match any supported notation
    #[error("malformed range '{spec}': {reason}")]
    Malformed { spec: String, reason: String },

    /// A hyphen range whose endpoints do not describe a valid ascending run
    #[error("invalid range order '{spec}': {reason}")]
    InvalidRangeOrder { spec: String, reason: String },
}

impl RangeError {
    pub(crate) fn malformed(spec: &str, reason: impl Into<String>) -> Self {
        RangeError::Malformed { spec: spec.to_string(), reason: reason.into() }
    }

    pub(crate) fn order(spec: &str, reason: impl Into<String>) -> Self {
        RangeError::InvalidRangeOrder { spec: spec.to_string(), reason: reason.into() }
    }
}

/// A non-fatal problem recorded while building the code tables
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildIssue {
    /// A raw name matched no canonical entity name or alias
    #[error("{tier} tier: entity not found: '{name}' (range: {range})")]
    EntityResolution { tier: Tier, name: String, range: String },

    /// Two entities claimed the same region/country code; the first was kept
    #[error("{tier} tier: code {code} already assigned to {kept}, rejected {rejected}")]
    CodeConflict { tier: Tier, code: String, kept: String, rejected: String },

    /// The range spec of a row could not be expanded
    #[error("{tier} tier: {error}")]
    Range { tier: Tier, error: RangeError },

    /// A manufacturer row without a usable name
    #[error("manufacturer tier: no manufacturer name for WMI '{wmi}'")]
    InvalidManufacturer { wmi: String },
}

/// Reasons a VIN is rejected before decoding
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeError {
    #[error("VIN must be exactly 17 characters (got {length})")]
    InvalidLength { length: usize },

    #[error("invalid character \"{character}\" found at position {position}")]
    InvalidCharacter { character: char, position: usize },
}

/// Errors loading raw seeding data
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to download {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("download of {url} failed with status {status}")]
    Status { url: String, status: u16 },
}

/// Errors from the SQLite store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("migration failed on statement: {statement}: {source}")]
    Migration {
        statement: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to {context}: {source}")]
    Query {
        context: String,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    pub(crate) fn query(context: impl Into<String>) -> impl FnOnce(sqlx::Error) -> Self {
        let context = context.into();
        move |source| StoreError::Query { context, source }
    }
}

/// Errors surfaced by the command layer
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("database not initialized")]
    NoDatabase,
}
