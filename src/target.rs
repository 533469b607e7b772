// File: target.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::error::{SetupError, SetupResult};
use reqwest::Url;

/// The fronted URL every candidate is compared against.
///
/// Each probe keeps `virtual_host` as its `Host` header and swaps only the
/// connection endpoint for the candidate address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: Url,
    scheme: String,
    virtual_host: String,
    path: String,
    query: Option<String>,
}

impl Target {
    pub fn parse(raw: &str) -> SetupResult<Self> {
        let invalid = |reason: &str| SetupError::InvalidTarget {
            url: raw.to_string(),
            reason: reason.to_string(),
        };

        let raw = raw.trim();
        let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(&format!("unsupported scheme '{}'", other))),
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host"));
        }
        let virtual_host = authority(raw)
            .filter(|authority| !authority.is_empty())
            .ok_or_else(|| invalid("missing host"))?
            .to_string();

        Ok(Self {
            scheme: url.scheme().to_string(),
            virtual_host,
            path: url.path().to_string(),
            query: url.query().map(str::to_string),
            url,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn virtual_host(&self) -> &str {
        &self.virtual_host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn baseline_url(&self) -> &str {
        self.url.as_str()
    }

    /// URL that dials `address` directly on the scheme's default port.
    pub fn candidate_url(&self, address: &str) -> String {
        match &self.query {
            Some(query) => format!("{}://{}{}?{}", self.scheme, address, self.path, query),
            None => format!("{}://{}{}", self.scheme, address, self.path),
        }
    }
}

/// The `host[:port]` part of `raw` as written, without any user info.
fn authority(raw: &str) -> Option<&str> {
    let (_, rest) = raw.split_once("://")?;
    let end = rest
        .find(|c| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let authority = &rest[..end];
    Some(authority.rsplit_once('@').map_or(authority, |(_, host)| host))
}
