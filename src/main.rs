//! Trawler main entry point
//!
//! This is the command-line interface for the Trawler contact email crawler.

use anyhow::{bail, Context};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use trawler::config::{load_config, validate, Config};
use trawler::crawler::run_crawl;
use trawler::output::{ConsoleSink, CsvSink, ResultSink};
use trawler::url::has_http_scheme;
use tracing_subscriber::EnvFilter;

/// Trawler: a bounded-scope contact email crawler
///
/// Trawler walks a single site breadth-first, staying on the seed's
/// registered domain, and collects email addresses from HTML pages and
/// linked text, PDF, Word and Excel documents.
#[derive(Parser, Debug)]
#[command(name = "trawler")]
#[command(version = "1.0.0")]
#[command(about = "A bounded-scope contact email crawler", long_about = None)]
struct Cli {
    /// Seed URL (prompted for when omitted)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Maximum number of pages to process (prompted for when neither this
    /// nor a configuration file is given)
    #[arg(short, long, value_parser = parse_limit_arg)]
    limit: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Results file (overrides the configuration file)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Do not pre-seed the frontier from /sitemap.xml
    #[arg(long)]
    no_sitemap: bool,

    /// Do not fetch documents linked from HTML pages inline
    #[arg(long)]
    no_linked_documents: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    let (url, limit) = {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut prompt_out = io::stdout();

        let url = match cli.url {
            Some(url) => url,
            None => prompt_url(&mut input, &mut prompt_out)?,
        };

        if !has_http_scheme(&url) {
            println!("[i] No http(s):// prefix given, using https://{}", url.trim());
        }

        // A configuration file supplies its own page budget
        let limit = match (cli.limit, &cli.config) {
            (Some(limit), _) => limit,
            (None, Some(_)) => config.crawler.max_pages,
            (None, None) => prompt_limit(&mut input, &mut prompt_out)?,
        };

        (url, limit)
    };

    config.crawler.max_pages = limit;

    if let Some(path) = cli.output {
        config.output.results_path = path.display().to_string();
    }
    if cli.no_sitemap {
        config.crawler.use_sitemap = false;
    }
    if cli.no_linked_documents {
        config.crawler.fetch_linked_documents = false;
    }

    validate(&config).context("Invalid settings")?;

    let results_path = config.output.results_path.clone();

    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::warn!("Cannot listen for Ctrl-C; the crawl can only end on its own");
            std::future::pending::<()>().await;
        }
    };

    let report = run_crawl(config, &url, shutdown)
        .await
        .context("Crawl could not start")?;

    let mut console = ConsoleSink::new(io::stdout());
    console.write_summary(&report)?;
    console.write_results(&report.emails)?;

    if !report.emails.is_empty() {
        let mut csv = CsvSink::new(&results_path);
        println!("[i] Saving results to {}...", results_path);
        match csv.write_results(&report.emails) {
            Ok(()) => println!("[+] Successfully saved to {}", results_path),
            Err(e) => {
                tracing::error!("Failed to save {}: {}", results_path, e);
                println!("[!] Failed to save file: {}", e);
            }
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("trawler=info,warn"),
            1 => EnvFilter::new("trawler=debug,info"),
            2 => EnvFilter::new("trawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Parses a page limit: a positive integer
fn parse_limit(input: &str) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Some(limit),
        _ => None,
    }
}

fn parse_limit_arg(input: &str) -> Result<usize, String> {
    parse_limit(input).ok_or_else(|| format!("'{}' is not a positive whole number", input))
}

/// Reads one line, failing on end of input
fn read_line<R: BufRead>(input: &mut R) -> anyhow::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("No input available");
    }
    Ok(line.trim().to_string())
}

/// Asks for the seed URL until a non-empty answer is given
fn prompt_url<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> anyhow::Result<String> {
    loop {
        write!(out, "[+] Enter URL: ")?;
        out.flush()?;

        let url = read_line(input)?;
        if !url.is_empty() {
            return Ok(url);
        }
    }
}

/// Asks for the page limit until a positive integer is given
fn prompt_limit<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> anyhow::Result<usize> {
    loop {
        write!(out, "[+] How many pages to search (limit)?: ")?;
        out.flush()?;

        let answer = read_line(input)?;
        match parse_limit(&answer) {
            Some(limit) => return Ok(limit),
            None => writeln!(out, "[!] Please enter a positive whole number.")?,
        }
    }
}
