//! CLI tool to collapse a page document to one breakpoint.
//!
//! Usage:
//!   page-resolve --input page.json [--breakpoint mobile] [--output page.mobile.json] [--stats]
//!   page-resolve --template landing [--output landing.json]

mod stats;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use pagesmith::page::resolve_page_at_breakpoint;
use pagesmith::{Breakpoint, GroupIndex, Page, Template};
use stats::PageStats;

#[derive(Parser, Debug)]
#[command(
    name = "page-resolve",
    about = "Resolve a page document at a breakpoint, or emit a starter template",
    version
)]
struct Args {
    /// Input page JSON file
    #[arg(short, long, conflicts_with = "template")]
    input: Option<PathBuf>,

    /// Emit a built-in template instead of reading a file (blank, landing, portfolio, product)
    #[arg(short, long)]
    template: Option<String>,

    /// Breakpoint to resolve at (desktop, tablet, mobile)
    #[arg(short, long, default_value = "desktop", env = "PAGESMITH_BREAKPOINT")]
    breakpoint: String,

    /// Output file path (defaults to <input>.<breakpoint>.json, or stdout for templates)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print statistics about the page
    #[arg(long, default_value = "false")]
    stats: bool,

    /// Log at debug level
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let tier: Breakpoint = args
        .breakpoint
        .parse()
        .with_context(|| format!("Unknown breakpoint: {}", args.breakpoint))?;

    // 1. Template mode
    if let Some(name) = &args.template {
        let template: Template = name
            .parse()
            .with_context(|| format!("Unknown template: {}", name))?;
        let page = resolve_page_at_breakpoint(&template.instantiate(), tier);
        let json = page.to_json_pretty().context("Failed to serialize template")?;
        match &args.output {
            Some(path) => {
                std::fs::write(path, &json).context("Failed to write output file")?;
                info!(template = %template, path = %path.display(), "template written");
            }
            None => println!("{}", json),
        }
        return Ok(());
    }

    // 2. Validate input exists
    let Some(input_path) = args.input.as_ref() else {
        bail!("Either --input or --template is required");
    };
    if !input_path.exists() {
        bail!("Input file does not exist: {}", input_path.display());
    }

    // 3. Read and parse
    let json_content = std::fs::read_to_string(input_path).context("Failed to read input file")?;
    let mut page = Page::from_json(&json_content).context("Failed to parse page JSON")?;
    debug!(sections = page.sections.len(), "page loaded");

    // 4. Repair group back-references, then resolve
    let groups = GroupIndex::rebuild_from_page(&mut page);
    let resolved = resolve_page_at_breakpoint(&page, tier);
    let output = resolved.to_json_pretty().context("Failed to serialize page")?;

    // 5. Write output
    let output_path = args.output.clone().unwrap_or_else(|| {
        let mut path = input_path.clone();
        path.set_extension(format!("{}.json", tier));
        path
    });
    std::fs::write(&output_path, &output).context("Failed to write output file")?;

    // 6. Optional stats
    if args.stats {
        PageStats::collect(&page, &groups, &resolved).print(
            &page.title,
            tier,
            json_content.len(),
            output.len(),
        );
    }

    println!();
    println!(
        "Resolved {} at {} → {}",
        input_path.display(),
        tier,
        output_path.display()
    );

    Ok(())
}
