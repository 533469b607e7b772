// File: config.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::cli::Cli;
use crate::error::{SetupError, SetupResult};
use log::warn;
use std::collections::BTreeSet;
use std::num::NonZeroU32;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/51.0.2704.103 Safari/537.36";

/// Settings shared read-only by every probe of a run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    proxy: Option<String>,
    cookie: Option<String>,
    accepted_status: BTreeSet<u16>,
    timeout: Duration,
    user_agent: String,
    follow_redirects: bool,
    include_broadcast: bool,
    rate_limit: Option<NonZeroU32>,
    json: bool,
    progress: bool,
    suppress_stats: bool,
    color: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self {
            proxy: None,
            cookie: None,
            accepted_status: BTreeSet::new(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            follow_redirects: true,
            include_broadcast: false,
            rate_limit: None,
            json: false,
            progress: false,
            suppress_stats: false,
            color: true,
        }
    }

    pub fn from_cli(cli: &Cli) -> SetupResult<Self> {
        let mut config = Self::new();
        config.set_proxy(cli.proxy.clone());
        config.set_cookie(cli.cookie.clone());
        if let Some(codes) = &cli.status_codes {
            config.set_accepted_status(parse_status_codes(codes));
        }
        config.set_timeout(parse_timeout(&cli.timeout)?);
        if let Some(user_agent) = &cli.user_agent {
            config.set_user_agent(user_agent.clone());
        }
        config.set_follow_redirects(!cli.no_redirects);
        config.set_include_broadcast(cli.include_broadcast);
        config.set_rate_limit(cli.rate_limit.and_then(NonZeroU32::new));
        config.set_json(cli.json);
        config.set_progress(cli.progress);
        config.set_suppress_stats(cli.suppress_stats);
        config.set_color(!cli.no_color);
        Ok(config)
    }

    /// 2xx is always accepted, anything else only when listed.
    pub fn accepts(&self, status: u16) -> bool {
        (200..300).contains(&status) || self.accepted_status.contains(&status)
    }

    pub fn set_proxy(&mut self, proxy: Option<String>) {
        self.proxy = proxy.filter(|p| !p.trim().is_empty());
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn set_cookie(&mut self, cookie: Option<String>) {
        self.cookie = cookie.filter(|c| !c.is_empty());
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    pub fn set_accepted_status<I: IntoIterator<Item = u16>>(&mut self, codes: I) {
        self.accepted_status = codes.into_iter().collect();
    }

    pub fn accepted_status(&self) -> &BTreeSet<u16> {
        &self.accepted_status
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Time allowed for one probe including redirects and the body read.
    /// A zero timeout means no limit.
    pub fn deadline(&self) -> Option<Duration> {
        (!self.timeout.is_zero()).then_some(self.timeout)
    }

    pub fn set_user_agent(&mut self, user_agent: String) {
        self.user_agent = user_agent;
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn set_follow_redirects(&mut self, follow_redirects: bool) {
        self.follow_redirects = follow_redirects;
    }

    pub fn follow_redirects(&self) -> bool {
        self.follow_redirects
    }

    pub fn set_include_broadcast(&mut self, include_broadcast: bool) {
        self.include_broadcast = include_broadcast;
    }

    pub fn include_broadcast(&self) -> bool {
        self.include_broadcast
    }

    pub fn set_rate_limit(&mut self, rate_limit: Option<NonZeroU32>) {
        self.rate_limit = rate_limit;
    }

    pub fn rate_limit(&self) -> Option<NonZeroU32> {
        self.rate_limit
    }

    pub fn set_json(&mut self, json: bool) {
        self.json = json;
    }

    pub fn json(&self) -> bool {
        self.json
    }

    pub fn set_progress(&mut self, progress: bool) {
        self.progress = progress;
    }

    pub fn progress(&self) -> bool {
        self.progress
    }

    pub fn set_suppress_stats(&mut self, suppress_stats: bool) {
        self.suppress_stats = suppress_stats;
    }

    pub fn suppress_stats(&self) -> bool {
        self.suppress_stats
    }

    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn color(&self) -> bool {
        self.color
    }
}

/// Parses a comma separated status list. Entries that are not status codes
/// are skipped with a warning.
pub fn parse_status_codes(list: &str) -> Vec<u16> {
    list.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .filter_map(|code| match code.parse::<u16>() {
            Ok(value) if (100..=999).contains(&value) => Some(value),
            _ => {
                warn!("Ignoring invalid status code \"{}\"", code);
                None
            }
        })
        .collect()
}

/// Parses a timeout such as `10s`, `1m30s` or `1.5s`. `0` disables the limit.
pub fn parse_timeout(value: &str) -> SetupResult<Duration> {
    let trimmed = value.trim();
    humantime::parse_duration(trimmed).or_else(|source| {
        parse_fractional_duration(trimmed).ok_or(SetupError::InvalidTimeout {
            value: value.to_string(),
            source,
        })
    })
}

/// Accepts a sequence of decimal numbers with a unit each (`1.5s`, `2h45.5m`).
fn parse_fractional_duration(value: &str) -> Option<Duration> {
    match value {
        "" => return None,
        "0" => return Some(Duration::ZERO),
        _ => {}
    }
    let is_number = |c: char| c.is_ascii_digit() || c == '.';

    let mut rest = value;
    let mut seconds = 0f64;
    while !rest.is_empty() {
        let (number, tail) = rest.split_at(rest.find(|c| !is_number(c)).unwrap_or(rest.len()));
        let (unit, tail) = tail.split_at(tail.find(is_number).unwrap_or(tail.len()));
        let scale = match unit {
            "ns" => 1e-9,
            "us" | "µs" | "μs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            _ => return None,
        };
        seconds += number.parse::<f64>().ok()? * scale;
        rest = tail;
    }
    Duration::try_from_secs_f64(seconds).ok()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
