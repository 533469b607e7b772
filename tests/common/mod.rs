// File: common/mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(dead_code)]

use rorigin::config::RunConfig;
use rorigin::probe::OriginProbe;
use rorigin::target::Target;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const VHOST: &str = "shop.example.com";

pub fn origin_page() -> String {
    r#"<!DOCTYPE html>
<html>
<head>
    <title>Example Shop</title>
    <meta name="generator" content="WordPress 6.4">
</head>
<body>
    <h1>Welcome to the Example Shop</h1>
    <p>Free shipping on every order above 50 EUR.</p>
    <ul><li>Shoes</li><li>Shirts</li><li>Hats</li></ul>
</body>
</html>"#
        .to_string()
}

pub fn default_vhost_page() -> String {
    r#"<html><head><title>Welcome to nginx!</title></head>
<body><h1>Welcome to nginx!</h1><p>If you see this page, the nginx web server is successfully installed.</p></body></html>"#
        .to_string()
}

/// Address of a server answering `body` for `/` when addressed as `VHOST`.
pub async fn mount_vhost(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("host", VHOST))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

pub fn address_of(server: &MockServer) -> String {
    server.address().to_string()
}

/// A local address nothing listens on.
pub fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr.to_string()
}

pub fn quick_config() -> RunConfig {
    let mut config = RunConfig::new();
    config.set_timeout(Duration::from_secs(2));
    config
}

pub fn vhost_probe(config: RunConfig) -> OriginProbe {
    let target = Target::parse(&format!("http://{}/", VHOST)).expect("valid target");
    OriginProbe::new(target, config).expect("client builds")
}

/// Host headers seen by an `untrusted_tls_server`.
pub type SeenHosts = Arc<Mutex<Vec<String>>>;

/// HTTPS server whose self-signed certificate names `unrelated.invalid`.
/// Answers every request with 200 and `body`.
pub async fn untrusted_tls_server(body: String) -> (String, SeenHosts) {
    let identity = native_tls::Identity::from_pkcs8(
        include_bytes!("../fixtures/unrelated-cert.pem"),
        include_bytes!("../fixtures/unrelated-key.pem"),
    )
    .expect("load test identity");
    let acceptor = tokio_native_tls::TlsAcceptor::from(
        native_tls::TlsAcceptor::new(identity).expect("build tls acceptor"),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind tls listener");
    let address = listener.local_addr().expect("local addr").to_string();

    let hosts: SeenHosts = Arc::default();
    let seen = hosts.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            let body = body.clone();
            let seen = seen.clone();
            tokio::spawn(async move {
                let Ok(mut tls) = acceptor.accept(stream).await else {
                    return;
                };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match tls.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&request);
                let host = head.lines().find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("host")
                        .then(|| value.trim().to_string())
                });
                if let Some(host) = host {
                    seen.lock().expect("hosts lock").push(host);
                }

                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = tls.write_all(response.as_bytes()).await;
                let _ = tls.shutdown().await;
            });
        }
    });

    (address, hosts)
}
