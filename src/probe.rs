// File: probe.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::cli::Cli;
use crate::config::RunConfig;
use crate::error::{SetupError, SetupResult};
use crate::outcome::{ProbeOutcome, ProbeStatus};
use crate::similarity::{NgramProfile, SorensenDice};
use crate::target::Target;
use log::{debug, trace};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, HOST, LOCATION, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{StatusCode, Url};
use std::sync::Arc;
use std::time::Instant;

pub const MAX_REDIRECTS: usize = 10;

/// Body of the fronted target, fetched once and shared by every probe.
///
/// The n-gram profile of the body is built here so candidates are only
/// split into n-grams on their own side.
#[derive(Debug, Clone)]
pub struct Baseline {
    body: Arc<str>,
    profile: Arc<NgramProfile>,
}

impl Baseline {
    pub fn new(body: impl Into<Arc<str>>) -> Self {
        Self::with_comparator(body, &SorensenDice::default())
    }

    pub fn with_comparator(body: impl Into<Arc<str>>, comparator: &SorensenDice) -> Self {
        let body = body.into();
        let profile = Arc::new(comparator.profile(&body));
        Self { body, profile }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn profile(&self) -> &NgramProfile {
        &self.profile
    }

    pub fn score(&self, body: &str) -> f64 {
        self.profile.score(body)
    }
}

/// Issues Host-overridden GET requests against candidate addresses.
///
/// Cloning is cheap: the client, target and config are reference counted.
#[derive(Debug, Clone)]
pub struct OriginProbe {
    client: reqwest::Client,
    target: Arc<Target>,
    config: Arc<RunConfig>,
    cookie: Option<HeaderValue>,
    comparator: SorensenDice,
}

impl OriginProbe {
    pub fn new(target: Target, config: RunConfig) -> SetupResult<Self> {
        let client = build_client(&config)?;
        let cookie = config
            .cookie()
            .map(|cookie| header_value("Cookie", cookie))
            .transpose()?;
        Ok(Self {
            client,
            target: Arc::new(target),
            config: Arc::new(config),
            cookie,
            comparator: SorensenDice::default(),
        })
    }

    /// Validates every setup input on the command line without reading any
    /// candidate addresses.
    pub fn from_cli(cli: &Cli) -> SetupResult<Self> {
        let config = RunConfig::from_cli(cli)?;
        let target = Target::parse(&cli.target)?;
        Self::new(target, config)
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Fetches the target through its normal route. Any outcome other than
    /// an accepted response is fatal for the run.
    pub async fn baseline(&self) -> SetupResult<Baseline> {
        let url = self.target.baseline_url();
        debug!("Requesting baseline {}", url);
        match self.fetch(url).await {
            Ok(body) => {
                debug!("Baseline body is {} bytes", body.len());
                Ok(Baseline::with_comparator(body, &self.comparator))
            }
            Err(status) => Err(SetupError::Baseline {
                url: url.to_string(),
                reason: status.to_string(),
            }),
        }
    }

    /// Requests the target path from `address` and scores the body against
    /// the baseline.
    pub async fn probe(&self, address: &str, baseline: &Baseline) -> ProbeOutcome {
        let url = self.target.candidate_url(address);
        let started = Instant::now();
        let result = self.fetch(&url).await;
        let elapsed = started.elapsed();

        match result {
            Ok(body) => {
                let similarity = baseline.score(&body);
                trace!(
                    "{} answered in {}ms, similarity {:.4}",
                    address,
                    elapsed.as_millis(),
                    similarity
                );
                ProbeOutcome::success(address.to_string(), similarity, elapsed)
            }
            Err(status) => {
                debug!("{} skipped: {}", address, status);
                ProbeOutcome::failure(address.to_string(), status, elapsed)
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, ProbeStatus> {
        match self.config.deadline() {
            Some(deadline) => tokio::time::timeout(deadline, self.fetch_following(url))
                .await
                .unwrap_or(Err(ProbeStatus::Timeout)),
            None => self.fetch_following(url).await,
        }
    }

    /// Sends the request and follows redirects by hand. The virtual host and
    /// cookie only travel along while the redirect stays on the dialed host.
    async fn fetch_following(&self, url: &str) -> Result<String, ProbeStatus> {
        let mut current =
            Url::parse(url).map_err(|e| ProbeStatus::TransportError(format!("{}: {}", url, e)))?;
        let mut keep_virtual_host = true;
        let mut redirects = 0;

        loop {
            let mut request = self.client.get(current.clone());
            if keep_virtual_host {
                request = request.header(HOST, self.target.virtual_host());
                if let Some(cookie) = &self.cookie {
                    request = request.header(COOKIE, cookie.clone());
                }
            }

            let response = request.send().await.map_err(classify_error)?;
            let status = response.status();

            if self.config.follow_redirects() && is_followed_redirect(status) {
                if let Some(next) = redirect_location(&current, response.headers()) {
                    if redirects == MAX_REDIRECTS {
                        return Err(ProbeStatus::TransportError(format!(
                            "stopped after {} redirects",
                            MAX_REDIRECTS
                        )));
                    }
                    redirects += 1;
                    keep_virtual_host &= same_origin(&current, &next);
                    trace!("{} redirected to {}", current, next);
                    current = next;
                    continue;
                }
            }

            if !self.config.accepts(status.as_u16()) {
                return Err(ProbeStatus::RejectedStatus(status.as_u16()));
            }
            return response.text().await.map_err(classify_error);
        }
    }
}

fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

fn redirect_location(current: &Url, headers: &HeaderMap) -> Option<Url> {
    let location = headers.get(LOCATION)?.to_str().ok()?;
    let next = current.join(location).ok()?;
    matches!(next.scheme(), "http" | "https").then_some(next)
}

fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

fn classify_error(error: reqwest::Error) -> ProbeStatus {
    if error.is_timeout() {
        ProbeStatus::Timeout
    } else {
        ProbeStatus::TransportError(error.to_string())
    }
}

fn header_value(name: &'static str, value: &str) -> SetupResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|source| SetupError::InvalidHeader {
        name,
        value: value.to_string(),
        source,
    })
}

/// Builds the shared client. Certificate and hostname checks are off since
/// candidates are dialed by IP. Redirects are followed in `OriginProbe`.
pub fn build_client(config: &RunConfig) -> SetupResult<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value("User-Agent", config.user_agent())?);

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(Policy::none())
        .danger_accept_invalid_hostnames(true)
        .danger_accept_invalid_certs(true);

    if let Some(deadline) = config.deadline() {
        builder = builder.timeout(deadline);
    }

    match config.proxy() {
        Some(proxy) => {
            let proxy = reqwest::Proxy::all(proxy).map_err(|source| SetupError::InvalidProxy {
                proxy: proxy.to_string(),
                source,
            })?;
            builder = builder.proxy(proxy);
        }
        None => builder = builder.no_proxy(),
    }

    builder.build().map_err(SetupError::HttpClientBuild)
}
