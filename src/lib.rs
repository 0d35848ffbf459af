//! gfaio - GFA reader/writer
//!
//! A library for reading and writing GFA (Graphical Fragment Assembly)
//! files as used by assembly pipelines: a header line, segment records,
//! and link records with overlap CIGARs.
//!
//! # Features
//!
//! - Parse the GFA 1.0 S/L subset with optional tags preserved verbatim
//! - Dense per-file segment ids, assigned in first-seen order across
//!   segment records and link endpoints
//! - CIGAR extent calculation (query, reference, and alignment lengths)
//! - Write files back with field-level round-trip fidelity
//!
//! # Example
//!
//! ```no_run
//! use gfaio::gfa::GfaFile;
//! use gfaio::stats::GfaStats;
//!
//! // Parse a GFA file
//! let gfa = GfaFile::from_file("assembly.gfa").unwrap();
//!
//! // Inspect the records
//! for link in &gfa.links {
//!     println!("{} -> {}: {} bp", link.a.name, link.b.name,
//!              link.alignment_length().unwrap());
//! }
//!
//! // Compute statistics and write the graph back out
//! let stats = GfaStats::from_file(&gfa).unwrap();
//! println!("{}", stats.format_summary());
//! gfa.save("assembly.regrouped.gfa").unwrap();
//! ```

pub mod cigar;
pub mod cli;
pub mod error;
pub mod gfa;
pub mod stats;

pub use cigar::{alignment_span, AlignmentSpan};
pub use error::{GfaError, Result};
pub use gfa::{GfaFile, Link, LinkEnd, NameIndex, Orientation, Segment};
pub use stats::GfaStats;
