// File: dispatch.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::outcome::ProbeOutcome;
use crate::probe::{Baseline, OriginProbe};
use crate::stats::RunStats;
use futures::stream::{FuturesUnordered, StreamExt};
use governor::{clock::DefaultClock, state::InMemoryState, state::NotKeyed, Quota, RateLimiter};
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use log::{debug, warn};
use std::fmt::Write;
use std::sync::Arc;

/// Runs one probe task per candidate and hands back outcomes in completion
/// order.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    probe: OriginProbe,
    rate_limiter: Option<Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>>,
}

impl Dispatcher {
    pub fn new(probe: OriginProbe) -> Self {
        let rate_limiter = probe
            .config()
            .rate_limit()
            .map(|rate| Arc::new(RateLimiter::direct(Quota::per_second(rate))));
        Dispatcher {
            probe,
            rate_limiter,
        }
    }

    pub fn probe(&self) -> &OriginProbe {
        &self.probe
    }

    /// Spawns every probe up front, then drains them until all have finished.
    ///
    /// `on_outcome` runs on the draining task only, so whatever it writes is
    /// never interleaved with another outcome.
    pub async fn run<I, F>(
        &self,
        addresses: I,
        baseline: &Baseline,
        mut on_outcome: F,
    ) -> RunStats
    where
        I: IntoIterator<Item = String>,
        F: FnMut(&ProbeOutcome),
    {
        let mut stats = RunStats::new();
        let mut futures = FuturesUnordered::new();

        for address in addresses {
            let probe = self.probe.clone();
            let baseline = baseline.clone();
            let rate_limiter = self.rate_limiter.clone();
            futures.push(tokio::spawn(async move {
                if let Some(rate_limiter) = rate_limiter {
                    rate_limiter.until_ready().await;
                }
                probe.probe(&address, &baseline).await
            }));
        }
        debug!("Dispatched {} probes", futures.len());

        let pb = self.progress_bar(futures.len() as u64);
        while let Some(task) = futures.next().await {
            match task {
                Ok(outcome) => {
                    stats.record(outcome.status());
                    pb.suspend(|| on_outcome(&outcome));
                }
                Err(e) => {
                    warn!("Probe task did not complete: {}", e);
                    stats.record_lost_task();
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        stats.finish();
        stats
    }

    /// Convenience wrapper collecting every outcome.
    pub async fn collect<I>(
        &self,
        addresses: I,
        baseline: &Baseline,
    ) -> (Vec<ProbeOutcome>, RunStats)
    where
        I: IntoIterator<Item = String>,
    {
        let mut outcomes = Vec::new();
        let stats = self
            .run(addresses, baseline, |outcome| outcomes.push(outcome.clone()))
            .await;
        (outcomes, stats)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.probe.config().progress() {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
        ) {
            pb.set_style(
                style
                    .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
                        let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                    })
                    .progress_chars("█▉▊▋▌▍▎▏  "),
            );
        }
        pb
    }
}
