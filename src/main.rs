//! Site-Integrity main entry point
//!
//! This is the command-line interface for the Site-Integrity crawler.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use site_integrity::config::{load_config_with_hash, Config};
use site_integrity::crawler::run_crawl;
use site_integrity::output::{
    draft_issue, format_outcome_message, generate_markdown_report, print_statistics,
    summarize_message, write_issue_draft, CrawlOutcome, IssueStatistics,
};
use site_integrity::url::coerce_seed_url;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Site-Integrity: a budget-bounded website integrity crawler
///
/// Site-Integrity walks a site breadth-first from a seed URL, tests every
/// internal link and clickable control it finds, and reports error pages,
/// broken links, blank destinations and broken buttons.
#[derive(Parser, Debug)]
#[command(name = "site-integrity")]
#[command(version = "1.0.0")]
#[command(about = "A website integrity crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl one site and report what is broken
    Crawl {
        /// Seed URL; `localhost:3001` style seeds are treated as http
        url: String,

        /// Override the page budget
        #[arg(long)]
        max_pages: Option<u32>,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a markdown rendition of the report here
        #[arg(long)]
        markdown: Option<PathBuf>,

        /// Write a markdown issue draft here when issues are found
        #[arg(long)]
        issue_draft: Option<PathBuf>,

        /// Validate config and seed and show what would be crawled without crawling
        #[arg(long)]
        dry_run: bool,
    },

    /// Serve the crawl API over HTTP
    Serve {
        /// Address to bind, overriding the configured one
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl {
            url,
            max_pages,
            output,
            markdown,
            issue_draft,
            dry_run,
        } => {
            let mut config = config;
            if let Some(max_pages) = max_pages {
                config.crawler.max_pages = max_pages;
                site_integrity::config::validate(&config)
                    .context("Invalid --max-pages override")?;
            }

            if dry_run {
                handle_dry_run(&config, &url)
            } else {
                let files = ReportFiles {
                    output: output.as_deref(),
                    markdown: markdown.as_deref(),
                    issue_draft: issue_draft.as_deref(),
                };
                handle_crawl(&config, &url, files).await
            }
        }
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            site_integrity::server::serve(Arc::new(config), &bind)
                .await
                .with_context(|| format!("Server on {} failed", bind))
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_integrity=info,warn"),
            1 => EnvFilter::new("site_integrity=debug,info"),
            2 => EnvFilter::new("site_integrity=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so a JSON report on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_configuration(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles --dry-run: validates config and seed and shows what would be crawled
fn handle_dry_run(config: &Config, url: &str) -> Result<()> {
    let seed = coerce_seed_url(url).with_context(|| format!("Invalid seed URL: {}", url))?;
    let crawler = &config.crawler;

    println!("=== Site-Integrity Dry Run ===\n");

    println!("Seed: {}", seed);

    println!("\nCrawler Configuration:");
    println!("  Max pages: {}", crawler.max_pages);
    println!("  Max links per page: {}", crawler.max_links_per_page);
    println!("  Max buttons per page: {}", crawler.max_buttons_per_page);
    println!("  Content threshold: {} chars", crawler.content_threshold);
    println!("  Run timeout: {}s", crawler.run_timeout_secs);
    println!("  Request timeout: {}s", crawler.request_timeout_secs);
    println!(
        "  Settle times: page {}ms, link {}ms, button {}ms",
        crawler.page_settle_ms, crawler.link_settle_ms, crawler.button_settle_ms
    );

    println!("\nHeuristics:");
    println!(
        "  Title error keywords: {}",
        config.heuristics.title_error_keywords.join(", ")
    );
    println!(
        "  Body error keywords: {}",
        config.heuristics.body_error_keywords.join(", ")
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl up to {} pages starting at {}",
        crawler.max_pages, seed
    );

    Ok(())
}

/// Files a crawl writes its results to
struct ReportFiles<'a> {
    output: Option<&'a Path>,
    markdown: Option<&'a Path>,
    issue_draft: Option<&'a Path>,
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, url: &str, files: ReportFiles<'_>) -> Result<()> {
    let outcome = run_crawl(config, url).await;

    let json = serde_json::to_string_pretty(&outcome).context("Failed to serialize report")?;
    match files.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }

    let message = summarize_message(None, &format_outcome_message(&outcome)).await;
    eprintln!("\n{}\n", message);

    let report = match outcome {
        CrawlOutcome::Report(report) => report,
        CrawlOutcome::Failure(failure) => {
            anyhow::bail!("Crawl of {} failed: {}", failure.url, failure.error)
        }
    };

    if files.output.is_some() {
        print_statistics(&IssueStatistics::from_report(&report));
    }

    if let Some(path) = files.markdown {
        generate_markdown_report(&report, path)
            .with_context(|| format!("Failed to write markdown report to {}", path.display()))?;
        tracing::info!("Markdown report written to {}", path.display());
    }

    if let Some(path) = files.issue_draft {
        if report.bugs.is_empty() {
            tracing::info!("No issues found, skipping issue draft");
        } else {
            let draft = draft_issue(None, &report.bugs, &report.url).await;
            write_issue_draft(&draft, path)
                .with_context(|| format!("Failed to write issue draft to {}", path.display()))?;
            tracing::info!("Issue draft written to {}", path.display());
        }
    }

    Ok(())
}
