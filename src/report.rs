// File: report.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::outcome::{ProbeOutcome, ProbeStatus};
use colored::*;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct ResultLine<'a> {
    address: &'a str,
    similarity: f64,
    #[serde(flatten)]
    status: &'a ProbeStatus,
    elapsed_ms: u128,
}

/// Writes one line per successful probe. Failed probes are not reported.
pub struct Reporter<W: Write> {
    out: W,
    format: ReportFormat,
    color: bool,
}

impl Reporter<io::Stdout> {
    pub fn stdout(format: ReportFormat, color: bool) -> Self {
        Self::new(io::stdout(), format, color)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: ReportFormat, color: bool) -> Self {
        Self { out, format, color }
    }

    pub fn report(&mut self, outcome: &ProbeOutcome) -> io::Result<()> {
        match self.format_line(outcome) {
            Some(line) => {
                writeln!(self.out, "{}", line)?;
                self.out.flush()
            }
            None => Ok(()),
        }
    }

    pub fn format_line(&self, outcome: &ProbeOutcome) -> Option<String> {
        let similarity = outcome.similarity().filter(|_| outcome.is_success())?;
        match self.format {
            ReportFormat::Text => {
                let percent = format!("{:.2}%", similarity * 100.0);
                Some(format!(
                    "{:<17}{}",
                    outcome.address(),
                    self.paint(&percent, similarity)
                ))
            }
            ReportFormat::Json => serde_json::to_string(&ResultLine {
                address: outcome.address(),
                similarity,
                status: outcome.status(),
                elapsed_ms: outcome.elapsed().as_millis(),
            })
            .ok(),
        }
    }

    fn paint(&self, text: &str, similarity: f64) -> String {
        if !self.color {
            return text.to_string();
        }
        if similarity >= 0.9 {
            text.green().bold().to_string()
        } else if similarity >= 0.5 {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
