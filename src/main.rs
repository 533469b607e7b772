/*
Copyright 2022 Volker Schwaberow <volker@schwaberow.de>
Permission is hereby granted, free of charge, to any person obtaining a
copy of this software and associated documentation files (the
"Software"), to deal in the Software without restriction, including without
limitation the rights to use, copy, modify, merge, publish, distribute,
sublicense, and/or sell copies of the Software, and to permit persons to whom the
Software is furnished to do so, subject to the following conditions:
The above copyright notice and this permission notice shall be
included in all copies or substantial portions of the Software.
THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT
SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR
OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE,
ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
DEALINGS IN THE SOFTWARE.
Author(s): Volker Schwaberow
*/

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use log::{debug, info, warn};
use rorigin::cli::Cli;
use rorigin::dispatch::Dispatcher;
use rorigin::input::load_addresses;
use rorigin::probe::OriginProbe;
use rorigin::report::{ReportFormat, Reporter};
use rorigin::stats::RunStats;
use simple_logger::SimpleLogger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    if let Err(e) = init_logging(&cli) {
        eprintln!("{} {:#}", "✗".red().bold(), e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    SimpleLogger::new()
        .with_level(cli.log_level_filter())
        .with_colors(!cli.no_color)
        .init()
        .context("failed to initialise logger")
}

async fn run(cli: Cli) -> Result<RunStats> {
    let probe = OriginProbe::from_cli(&cli)?;
    let config = probe.config();
    let addresses = load_addresses(cli.list.as_deref(), config.include_broadcast())?;
    if addresses.is_empty() {
        warn!("No candidate addresses to probe");
    }

    let format = if config.json() {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    };
    let mut reporter = Reporter::stdout(format, config.color());
    let suppress_stats = config.suppress_stats();

    info!("TLS certificate verification is disabled for every probe");
    debug!(
        "Target {} with virtual host {}",
        probe.target().baseline_url(),
        probe.target().virtual_host()
    );

    let baseline = probe.baseline().await?;
    let dispatcher = Dispatcher::new(probe);
    let stats = dispatcher
        .run(addresses, &baseline, |outcome| {
            if let Err(e) = reporter.report(outcome) {
                warn!("Failed to write result for {}: {}", outcome.address(), e);
            }
        })
        .await;

    if !suppress_stats {
        eprintln!();
        eprintln!("{}", stats.summary());
    }
    Ok(stats)
}
