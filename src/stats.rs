// File: stats.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2022-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::outcome::ProbeStatus;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy)]
pub struct RunStats {
    total: usize,
    successful: usize,
    timeouts: usize,
    rejected: usize,
    transport_errors: usize,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStats {
    pub fn new() -> RunStats {
        RunStats {
            total: 0,
            successful: 0,
            timeouts: 0,
            rejected: 0,
            transport_errors: 0,
            start_time: Utc::now(),
            end_time: None,
        }
    }

    pub fn record(&mut self, status: &ProbeStatus) {
        self.total += 1;
        match status {
            ProbeStatus::Success => self.successful += 1,
            ProbeStatus::Timeout => self.timeouts += 1,
            ProbeStatus::RejectedStatus(_) => self.rejected += 1,
            ProbeStatus::TransportError(_) => self.transport_errors += 1,
        }
    }

    /// A probe task that never produced an outcome.
    pub fn record_lost_task(&mut self) {
        self.total += 1;
        self.transport_errors += 1;
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Utc::now());
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn successful(&self) -> usize {
        self.successful
    }

    pub fn timeouts(&self) -> usize {
        self.timeouts
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn transport_errors(&self) -> usize {
        self.transport_errors
    }

    pub fn failed(&self) -> usize {
        self.total - self.successful
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn elapsed_ms(&self) -> i64 {
        let end = self.end_time.unwrap_or_else(Utc::now);
        (end - self.start_time).num_milliseconds()
    }

    pub fn summary(&self) -> String {
        let end = self.end_time.unwrap_or_else(Utc::now);
        format!(
            "{} requests. Started at {} / Ended at {}. {} ms. Successful: {}. Timeouts: {}. Rejected: {}. Errors: {}.",
            self.total,
            self.start_time.format("%Y-%m-%d %H:%M:%S"),
            end.format("%Y-%m-%d %H:%M:%S"),
            self.elapsed_ms(),
            self.successful,
            self.timeouts,
            self.rejected,
            self.transport_errors
        )
    }
}
