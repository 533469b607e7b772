// File: error.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::path::PathBuf;

/// Failures that stop a run before the first candidate is probed.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("could not parse target url '{url}': {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("invalid proxy url '{proxy}': {source}")]
    InvalidProxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid {name} header value '{value}': {source}")]
    InvalidHeader {
        name: &'static str,
        value: String,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("invalid timeout '{value}': {source}")]
    InvalidTimeout {
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("unable to read address list '{}': {source}", .path.display())]
    AddressFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to read addresses from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("failed to build http client: {0}")]
    HttpClientBuild(#[source] reqwest::Error),

    #[error("baseline request to {url} failed: {reason}")]
    Baseline { url: String, reason: String },
}

/// Why a single address specification line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("invalid CIDR network '{0}'")]
    InvalidCidr(String),

    #[error("'{0}' is not a valid block, expected exactly one '-' between two addresses")]
    MalformedBlock(String),

    #[error("invalid block endpoint '{0}'")]
    InvalidEndpoint(String),
}

pub type SetupResult<T> = Result<T, SetupError>;
