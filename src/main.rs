mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::process;
use std::time::Duration;

use ui::output::{display_calls, display_collections, display_records, verbose};
use zotero_feed::api::HttpTransport;
use zotero_feed::cli::Args;
use zotero_feed::config::Config;
use zotero_feed::{extract_collections, extract_items, CallRegistry, Params, Zotero};

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("{} {:#}", "Error:".red(), e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    if args.list_calls {
        display_calls(&CallRegistry::new());
        return Ok(());
    }

    let config = Config::from_env_and_args(args)?;
    init_logging(config.verbose);

    let transport = HttpTransport::with_timeout(Some(Duration::from_secs(config.timeout_secs)))?;
    let zot = Zotero::with_transport(
        config.user_id.as_deref(),
        config.user_key.as_deref(),
        Box::new(transport),
    )
    .with_endpoint(&config.endpoint)?;

    if config.verbose {
        verbose(&format!("Endpoint: {}", config.endpoint));
        verbose(&format!(
            "Credentials: {}",
            if zot.credentials().is_some() {
                "configured"
            } else {
                "missing"
            }
        ));
    }

    if args.total {
        let total = zot.total_items()?;
        println!("{}", total);
        return Ok(());
    }

    let call = match args.call.as_deref() {
        Some(call) => call,
        None => {
            eprintln!("Usage: zot <call> [-p name=value]... [-q name=value]...");
            eprintln!("Run 'zot --list-calls' to see the available calls.");
            process::exit(1);
        }
    };

    let mut url_params: Params = args.query.iter().cloned().collect();
    if let Some(limit) = args.limit {
        url_params.insert("limit", limit);
    }
    if let Some(start) = args.start {
        url_params.insert("start", start);
    }
    let request_params: Option<Params> = if args.params.is_empty() {
        None
    } else {
        Some(args.params.iter().cloned().collect())
    };

    if config.verbose {
        verbose(&format!("Call: {}", call));
    }

    if args.raw {
        let body = zot.retrieve_raw(call, Some(&url_params), request_params.as_ref())?;
        println!("{}", body);
        return Ok(());
    }

    let feed = zot
        .retrieve_data(call, Some(&url_params), request_params.as_ref())
        .with_context(|| format!("Request '{}' failed", call))?;

    if config.verbose {
        verbose(&format!(
            "Received {} entries (total {})",
            feed.entries.len(),
            feed.total_results().unwrap_or("unknown")
        ));
    }

    if args.collections {
        let collections = extract_collections(&feed)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&collections)?);
        } else {
            display_collections(&collections);
        }
    } else {
        let records = extract_items(&feed)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&records)?);
        } else {
            display_records(&records);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("zotero_feed", level)
        .parse_default_env()
        .init();
}
