// File: cli.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    after_help = "TLS certificate verification is disabled for every request: candidate \
                  origins are dialed by IP and will not present a matching certificate."
)]
pub struct Cli {
    #[arg(help = "Target URL to bypass, e.g. https://www.example.com/")]
    pub target: String,

    #[arg(
        short = 'l',
        long = "list",
        help = "File with every IP/range to test, one per line (default: stdin)"
    )]
    pub list: Option<PathBuf>,

    #[arg(
        long = "proxy",
        help = "Proxy to use. HTTP, HTTPS and SOCKS5 are supported"
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'c',
        long = "cookie",
        help = "Cookie string sent with every request. Helps with WAFs blocking automated clients"
    )]
    pub cookie: Option<String>,

    #[arg(
        short = 's',
        long = "status-codes",
        help = "Comma separated status codes accepted besides 2xx"
    )]
    pub status_codes: Option<String>,

    #[arg(
        short = 't',
        long = "timeout",
        default_value = "10s",
        help = "Per-request timeout, e.g. 10s, 1.5s or 1500ms (0 disables it)"
    )]
    pub timeout: String,

    #[arg(short = 'A', long = "user-agent", help = "User-Agent header override")]
    pub user_agent: Option<String>,

    #[arg(long = "no-redirects", help = "Do not follow redirects")]
    pub no_redirects: bool,

    #[arg(
        long = "include-broadcast",
        help = "Also probe the broadcast address of CIDR networks"
    )]
    pub include_broadcast: bool,

    #[arg(
        short = 'r',
        long = "rate-limit",
        help = "Maximum requests started per second (default: unlimited)"
    )]
    pub rate_limit: Option<u32>,

    #[arg(long = "json", help = "Print one JSON object per result")]
    pub json: bool,

    #[arg(long = "progress", help = "Draw a progress bar on stderr")]
    pub progress: bool,

    #[arg(long = "suppress-stats", help = "Suppress the run summary")]
    pub suppress_stats: bool,

    #[arg(long = "no-color", help = "Disable colored output")]
    pub no_color: bool,

    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short = 'q', long = "quiet", help = "Only log errors")]
    pub quiet: bool,
}

impl Cli {
    /// `-q` wins over `-v`, both win over `--log-level`.
    pub fn log_level_filter(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            self.log_level.parse().unwrap_or(LevelFilter::Warn)
        }
    }
}
