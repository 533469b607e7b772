// File: e2e_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

mod common;

use common::*;
use rorigin::dispatch::Dispatcher;
use rorigin::input::read_addresses;
use rorigin::outcome::ProbeStatus;
use rorigin::probe::{Baseline, OriginProbe};
use rorigin::report::{ReportFormat, Reporter};
use rorigin::target::Target;
use serial_test::serial;
use std::collections::HashMap;
use std::io::Cursor;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
#[serial]
async fn test_complete_origin_hunt() {
    // Real origin serves the shop for the virtual host
    let origin = MockServer::start().await;
    mount_vhost(&origin, &origin_page()).await;

    // Unrelated server answering with its default page
    let decoy = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(default_vhost_page()))
        .mount(&decoy)
        .await;

    // Server that only knows other hosts
    let forbidden = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&forbidden)
        .await;

    let list = format!(
        "{}\n{}\n\n{}\n{}\n10.0.0.1-\n",
        address_of(&origin),
        address_of(&decoy),
        address_of(&forbidden),
        closed_address()
    );
    let addresses = read_addresses(Cursor::new(list), false).unwrap();
    assert_eq!(addresses.len(), 4);

    let dispatcher = Dispatcher::new(vhost_probe(quick_config()));
    let baseline = Baseline::new(origin_page());
    let mut reporter = Reporter::new(Vec::new(), ReportFormat::Text, false);
    let mut seen = Vec::new();
    let stats = dispatcher
        .run(addresses, &baseline, |outcome| {
            seen.push(outcome.clone());
            reporter.report(outcome).unwrap();
        })
        .await;

    assert_eq!(seen.len(), 4);
    assert_eq!(stats.total(), 4);
    assert_eq!(stats.successful(), 2);
    assert_eq!(stats.rejected(), 1);
    assert_eq!(stats.transport_errors(), 1);
    assert!(stats.end_time().is_some());

    let by_address: HashMap<&str, _> = seen.iter().map(|o| (o.address(), o)).collect();
    let origin_outcome = by_address[address_of(&origin).as_str()];
    let decoy_outcome = by_address[address_of(&decoy).as_str()];
    assert_eq!(origin_outcome.similarity(), Some(1.0));
    assert!(decoy_outcome.similarity().unwrap() < 0.2);
    assert_eq!(
        by_address[address_of(&forbidden).as_str()].status(),
        &ProbeStatus::RejectedStatus(403)
    );

    let printed = String::from_utf8(reporter.into_inner()).unwrap();
    let lines: Vec<&str> = printed.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines
        .iter()
        .any(|l| l.starts_with(&address_of(&origin)) && l.ends_with("100.00%")));
    assert!(lines.iter().all(|l| !l.contains(&address_of(&forbidden))));
}

#[tokio::test]
#[serial]
async fn test_baseline_then_dispatch_against_target_itself() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(origin_page()))
        .mount(&server)
        .await;

    let target = Target::parse(&server.uri()).unwrap();
    let probe = OriginProbe::new(target, quick_config()).unwrap();
    let baseline = probe.baseline().await.unwrap();

    let dispatcher = Dispatcher::new(probe);
    let (outcomes, stats) = dispatcher
        .collect(vec![address_of(&server)], &baseline)
        .await;

    assert_eq!(stats.successful(), 1);
    assert_eq!(outcomes[0].similarity(), Some(1.0));
}

#[tokio::test]
#[serial]
async fn test_duplicates_are_probed_independently() {
    let server = MockServer::start().await;
    mount_vhost(&server, &origin_page()).await;

    let address = address_of(&server);
    let dispatcher = Dispatcher::new(vhost_probe(quick_config()));
    let (outcomes, stats) = dispatcher
        .collect(
            vec![address.clone(), address.clone(), address],
            &Baseline::new(origin_page()),
        )
        .await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(stats.successful(), 3);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
#[serial]
async fn test_timeouts_do_not_block_siblings() {
    let slow = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(origin_page())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&slow)
        .await;

    let fast = MockServer::start().await;
    mount_vhost(&fast, &origin_page()).await;

    let mut config = quick_config();
    config.set_timeout(Duration::from_millis(300));
    let dispatcher = Dispatcher::new(vhost_probe(config));

    let mut order = Vec::new();
    let started = Instant::now();
    let stats = dispatcher
        .run(
            vec![address_of(&slow), address_of(&fast)],
            &Baseline::new(origin_page()),
            |outcome| order.push((outcome.address().to_string(), outcome.status().clone())),
        )
        .await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(stats.timeouts(), 1);
    assert_eq!(stats.successful(), 1);
    // completion order, not input order
    assert_eq!(order[0], (address_of(&fast), ProbeStatus::Success));
    assert_eq!(order[1], (address_of(&slow), ProbeStatus::Timeout));
}

#[tokio::test]
#[serial]
async fn test_probes_run_concurrently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(origin_page())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let addresses: Vec<String> = std::iter::repeat(address_of(&server)).take(10).collect();
    let dispatcher = Dispatcher::new(vhost_probe(quick_config()));

    let started = Instant::now();
    let (outcomes, _) = dispatcher
        .collect(addresses, &Baseline::new(origin_page()))
        .await;

    assert_eq!(outcomes.len(), 10);
    assert!(outcomes.iter().all(|o| o.is_success()));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
#[serial]
async fn test_empty_address_list() {
    let dispatcher = Dispatcher::new(vhost_probe(quick_config()));
    let (outcomes, stats) = dispatcher
        .collect(Vec::new(), &Baseline::new(origin_page()))
        .await;

    assert!(outcomes.is_empty());
    assert_eq!(stats.total(), 0);
}

#[tokio::test]
#[serial]
async fn test_rate_limited_run_probes_everything() {
    let server = MockServer::start().await;
    mount_vhost(&server, &origin_page()).await;

    let mut config = quick_config();
    config.set_rate_limit(std::num::NonZeroU32::new(50));
    let dispatcher = Dispatcher::new(vhost_probe(config));
    let addresses: Vec<String> = std::iter::repeat(address_of(&server)).take(5).collect();
    let (outcomes, stats) = dispatcher
        .collect(addresses, &Baseline::new(origin_page()))
        .await;

    assert_eq!(outcomes.len(), 5);
    assert_eq!(stats.successful(), 5);
}
