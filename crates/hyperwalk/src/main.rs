// Copyright 2026 Hyperwalk Contributors
// SPDX-License-Identifier: MIT

//! Hyperwalk CLI — follow relations through an HTML hypermedia API.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};

use hyperwalk::{Client, HttpTransport, Resource, TransportConfig};

#[derive(Parser)]
#[command(
    name = "hyperwalk",
    about = "Hyperwalk — walk relations through an HTML hypermedia API",
    version
)]
struct Cli {
    /// Entry point URL (http://, https:// or file://).
    url: String,

    /// Relations to follow from the entry point, in order.
    rels: Vec<String>,

    /// Fetch every resource at the end of the walk.
    #[arg(long)]
    resolve: bool,

    /// Output results as JSON (machine-readable).
    #[arg(long)]
    json: bool,

    /// Request timeout in milliseconds (also HYPERWALK_TIMEOUT_MS).
    #[arg(long)]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    let logger = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        logger.json().init();
    } else {
        logger.init();
    }

    let config = TransportConfig::resolve(cli.timeout);
    let client = Client::from_url_with(HttpTransport::new(&config), &cli.url)
        .with_context(|| format!("failed to load {}", cli.url))?;

    let found = client
        .traverse(cli.rels.as_slice())
        .with_context(|| format!("failed to traverse {}", cli.rels.join(" → ")))?;

    if cli.resolve {
        for resource in &found {
            resource
                .fetch()
                .with_context(|| format!("failed to fetch {}", resource.uri()))?;
        }
    }

    if cli.json {
        let out: Vec<Value> = found.iter().map(describe).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for resource in &found {
            let marker = if resource.is_resolved() { "*" } else { " " };
            println!(
                "{marker} {}  {}",
                resource.uri(),
                resource.title().unwrap_or_default()
            );
        }
    }

    Ok(())
}

fn describe(resource: &Resource) -> Value {
    json!({
        "uri": resource.uri(),
        "rel": resource.rel(),
        "title": resource.title(),
        "resolved": resource.is_resolved(),
        "relations": resource.relations(),
        "forms": resource.forms().into_keys().collect::<Vec<_>>(),
        "properties": resource.properties(),
    })
}
