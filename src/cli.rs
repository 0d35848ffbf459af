//! Command-line interface for gfaio
//!
//! The commands only ever load a file, read its record lists, and save;
//! all graph semantics live in the library modules.

use crate::error::Result;
use crate::gfa::GfaFile;
use crate::stats::GfaStats;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

/// gfaio - reader/writer for GFA assembly graph files
#[derive(Parser)]
#[command(name = "gfaio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Display statistics about a GFA file
    Stats {
        /// Path to the GFA file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a GFA file for parse errors and graph inconsistencies
    Validate {
        /// Path to the GFA file
        #[arg(short, long)]
        input: PathBuf,

        /// Show detailed validation messages
        #[arg(short, long)]
        verbose: bool,
    },

    /// Rewrite a GFA file (header, then segments, then links)
    Reformat {
        /// Path to the input GFA file
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the output GFA file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats {
            input,
            format,
            output,
        } => cmd_stats(&input, &format, output.as_deref()),
        Commands::Validate { input, verbose } => cmd_validate(&input, verbose),
        Commands::Reformat { input, output } => cmd_reformat(&input, &output),
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn cmd_stats(input: &PathBuf, format: &str, output: Option<&std::path::Path>) -> Result<()> {
    let spinner = create_spinner("Reading GFA file...");
    let start = Instant::now();

    let gfa = GfaFile::from_file(input)?;
    spinner.set_message("Computing statistics...");

    let stats = GfaStats::from_file(&gfa)?;
    spinner.finish_with_message(format!("Done in {:.2?}", start.elapsed()));

    let output_text = match format.to_lowercase().as_str() {
        "json" => stats.to_json()?,
        _ => stats.format_summary(),
    };

    if let Some(output_path) = output {
        std::fs::write(output_path, &output_text)?;
        println!("Statistics written to: {}", output_path.display());
    } else {
        println!("{}", output_text);
    }

    Ok(())
}

fn cmd_reformat(input: &PathBuf, output: &PathBuf) -> Result<()> {
    let spinner = create_spinner("Reading GFA file...");
    let start = Instant::now();

    let gfa = GfaFile::from_file(input)?;
    spinner.set_message("Writing...");

    gfa.save(output)?;
    spinner.finish_with_message(format!("Rewritten in {:.2?}", start.elapsed()));

    println!(
        "{} segments and {} links written to: {}",
        gfa.segment_count(),
        gfa.link_count(),
        output.display()
    );

    Ok(())
}

fn cmd_validate(input: &PathBuf, verbose: bool) -> Result<()> {
    let spinner = create_spinner("Validating GFA file...");
    let start = Instant::now();

    let gfa = GfaFile::from_file(input)?;
    spinner.finish_with_message(format!("File parsed in {:.2?}", start.elapsed()));

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Links may legally reference names with no S record, but flag them.
    let segment_ids: HashSet<u32> = gfa.segments.iter().map(|s| s.id).collect();
    for link in &gfa.links {
        for end in [&link.a, &link.b] {
            if !segment_ids.contains(&end.id) {
                warnings.push(format!("Link references undefined segment: {}", end.name));
            }
        }
        if let Err(e) = link.alignment_length() {
            errors.push(format!(
                "Link {} -> {} has an invalid overlap: {}",
                link.a.name, link.b.name, e
            ));
        }
    }

    let mut seen = HashSet::new();
    for segment in &gfa.segments {
        if !seen.insert(segment.name.as_str()) {
            warnings.push(format!("Duplicate segment name: {}", segment.name));
        }
        if segment.sequence.is_none() && segment.length == 0 {
            warnings.push(format!(
                "Segment '{}' has placeholder sequence and no length tag",
                segment.name
            ));
        }
    }

    // Print results
    println!("\n=== Validation Results ===\n");
    println!("Segments: {}", gfa.segment_count());
    println!("Links: {}", gfa.link_count());
    println!();

    if errors.is_empty() && warnings.is_empty() {
        println!("✓ No issues found");
    } else {
        if !errors.is_empty() {
            println!("Errors ({}):", errors.len());
            let shown = if verbose { errors.len() } else { 5 };
            for err in errors.iter().take(shown) {
                println!("  ✗ {}", err);
            }
            if errors.len() > shown {
                println!("  ... and {} more errors", errors.len() - shown);
            }
            println!();
        }

        if !warnings.is_empty() {
            println!("Warnings ({}):", warnings.len());
            let shown = if verbose { warnings.len() } else { 5 };
            for warn in warnings.iter().take(shown) {
                println!("  ⚠ {}", warn);
            }
            if warnings.len() > shown {
                println!("  ... and {} more warnings", warnings.len() - shown);
            }
        }
    }

    if errors.is_empty() {
        println!("\n✓ Validation passed");
    } else {
        println!("\n✗ Validation failed with {} errors", errors.len());
    }
    Ok(())
}
