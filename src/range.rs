// File: range.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

//! Expansion of address specification lines into candidate addresses.
//!
//! Three forms are understood:
//!   - `192.168.0.0/24` (CIDR network)
//!   - `192.168.0.1 - 192.168.0.255` (inclusive block)
//!   - `192.168.0.4` (anything else, passed through as is)

use crate::error::RangeError;
use log::{trace, warn};
use std::net::Ipv4Addr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSpec {
    Cidr { network: Ipv4Addr, prefix: u8 },
    Block { start: Ipv4Addr, end: Ipv4Addr },
    Single(String),
}

impl AddressSpec {
    /// Parses one line. Returns `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>, RangeError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        if line.contains('/') {
            return parse_cidr(line).map(Some);
        }
        if line.contains('-') {
            return parse_block(line).map(Some);
        }
        Ok(Some(AddressSpec::Single(line.to_string())))
    }

    /// Lazily enumerates the addresses covered by this spec.
    ///
    /// CIDR networks yield `[network, broadcast)` unless `include_broadcast`
    /// is set, in which case the broadcast address is emitted as well.
    pub fn addresses(&self, include_broadcast: bool) -> Addresses {
        match self {
            AddressSpec::Cidr { network, prefix } => {
                let mask = netmask(*prefix);
                let start = u32::from(*network) & mask;
                let broadcast = start | !mask;
                let end = if include_broadcast {
                    u64::from(broadcast) + 1
                } else {
                    u64::from(broadcast)
                };
                Addresses::Range(AddressRange::new(u64::from(start), end))
            }
            AddressSpec::Block { start, end } => Addresses::Range(AddressRange::new(
                u64::from(u32::from(*start)),
                u64::from(u32::from(*end)) + 1,
            )),
            AddressSpec::Single(token) => Addresses::Single(Some(token.clone())),
        }
    }
}

fn netmask(prefix: u8) -> u32 {
    u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0)
}

fn parse_cidr(line: &str) -> Result<AddressSpec, RangeError> {
    let invalid = || RangeError::InvalidCidr(line.to_string());
    let (ip, prefix) = line.split_once('/').ok_or_else(invalid)?;
    let network: Ipv4Addr = ip.parse().map_err(|_| invalid())?;
    let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
    if prefix > 32 {
        return Err(invalid());
    }
    Ok(AddressSpec::Cidr { network, prefix })
}

fn parse_block(line: &str) -> Result<AddressSpec, RangeError> {
    let (start, end) = line
        .split_once('-')
        .map(|(s, e)| (s.trim(), e.trim()))
        .filter(|(s, e)| !s.is_empty() && !e.is_empty())
        .ok_or_else(|| RangeError::MalformedBlock(line.to_string()))?;

    let start: Ipv4Addr = start
        .parse()
        .map_err(|_| RangeError::InvalidEndpoint(start.to_string()))?;
    let end: Ipv4Addr = end
        .parse()
        .map_err(|_| RangeError::InvalidEndpoint(end.to_string()))?;

    if start > end {
        warn!("Block \"{}\" ends before it starts, it covers no address", line);
    }
    Ok(AddressSpec::Block { start, end })
}

/// Pull-based walk over a half-open `u64` span of IPv4 addresses.
#[derive(Debug, Clone)]
pub struct AddressRange {
    next: u64,
    end: u64,
}

impl AddressRange {
    fn new(start: u64, end: u64) -> Self {
        Self { next: start, end }
    }
}

impl Iterator for AddressRange {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next >= self.end {
            return None;
        }
        let ip = Ipv4Addr::from(self.next as u32);
        self.next += 1;
        Some(ip.to_string())
    }

    fn nth(&mut self, n: usize) -> Option<String> {
        self.next = self.next.saturating_add(n as u64).min(self.end);
        self.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AddressRange {}

#[derive(Debug, Clone)]
pub enum Addresses {
    Range(AddressRange),
    Single(Option<String>),
    Empty,
}

impl Iterator for Addresses {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match self {
            Addresses::Range(range) => range.next(),
            Addresses::Single(token) => token.take(),
            Addresses::Empty => None,
        }
    }

    fn nth(&mut self, n: usize) -> Option<String> {
        match self {
            Addresses::Range(range) => range.nth(n),
            Addresses::Single(token) if n == 0 => token.take(),
            Addresses::Single(token) => {
                token.take();
                None
            }
            Addresses::Empty => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Addresses::Range(range) => range.size_hint(),
            Addresses::Single(token) => {
                let n = usize::from(token.is_some());
                (n, Some(n))
            }
            Addresses::Empty => (0, Some(0)),
        }
    }
}

/// Expands one input line, logging and skipping it when it cannot be parsed.
pub fn expand(line: &str, include_broadcast: bool) -> Addresses {
    match AddressSpec::parse(line) {
        Ok(Some(spec)) => {
            trace!("Parsed \"{}\" as {:?}", line.trim(), spec);
            spec.addresses(include_broadcast)
        }
        Ok(None) => Addresses::Empty,
        Err(e) => {
            warn!("Unable to parse \"{}\": {}. Skipping...", line.trim(), e);
            Addresses::Empty
        }
    }
}

#[cfg(test)]
#[path = "range_tests.rs"]
mod tests;
