// File: outcome.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use serde::Serialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ProbeStatus {
    Success,
    Timeout,
    RejectedStatus(u16),
    TransportError(String),
}

impl ProbeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeStatus::Success)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProbeStatus::Success => "success",
            ProbeStatus::Timeout => "timeout",
            ProbeStatus::RejectedStatus(_) => "rejected_status",
            ProbeStatus::TransportError(_) => "transport_error",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Success => write!(f, "Success"),
            ProbeStatus::Timeout => write!(f, "Timeout"),
            ProbeStatus::RejectedStatus(code) => write!(f, "Rejected status {}", code),
            ProbeStatus::TransportError(e) => write!(f, "Transport error: {}", e),
        }
    }
}

/// Result of probing one candidate address. Only successful probes carry a
/// similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    address: String,
    status: ProbeStatus,
    similarity: Option<f64>,
    elapsed: Duration,
}

impl ProbeOutcome {
    pub fn success(address: String, similarity: f64, elapsed: Duration) -> Self {
        Self {
            address,
            status: ProbeStatus::Success,
            similarity: Some(similarity.clamp(0.0, 1.0)),
            elapsed,
        }
    }

    pub fn failure(address: String, status: ProbeStatus, elapsed: Duration) -> Self {
        Self {
            address,
            status,
            similarity: None,
            elapsed,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn status(&self) -> &ProbeStatus {
        &self.status
    }

    pub fn similarity(&self) -> Option<f64> {
        self.similarity
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
