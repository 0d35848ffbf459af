//! CIGAR extent calculation
//!
//! Walks a CIGAR string such as `10M2I3D` and accounts run lengths into
//! query, reference, and total alignment extents. Only the length semantics
//! of M/I/D are interpreted; anything else is rejected.

use crate::error::{GfaError, Result};
use serde::{Deserialize, Serialize};

/// Extents derived from a CIGAR string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentSpan {
    /// Bases consumed on the query (M + I)
    pub query: u32,
    /// Bases consumed on the reference (M + D)
    pub reference: u32,
    /// Total aligned columns (M + I + D)
    pub aligned: u32,
}

/// Compute the extents of a CIGAR string.
///
/// Each token is a run length immediately followed by one operation letter.
/// `M` counts toward all three extents, `I` toward query and aligned, `D`
/// toward reference and aligned. Zero-length runs are accepted; they show up
/// as `0M` overlaps in real GFA files. An empty string has zero extent.
pub fn alignment_span(cigar: &str) -> Result<AlignmentSpan> {
    let mut span = AlignmentSpan::default();
    let mut run: Option<u32> = None;

    for c in cigar.chars() {
        if let Some(d) = c.to_digit(10) {
            let len = run.unwrap_or(0);
            run = Some(
                len.checked_mul(10)
                    .and_then(|v| v.checked_add(d))
                    .ok_or_else(|| {
                        GfaError::MalformedCigar(format!("run length overflow in {:?}", cigar))
                    })?,
            );
        } else {
            let len = run.take().ok_or_else(|| {
                GfaError::MalformedCigar(format!("operation '{}' has no run length in {:?}", c, cigar))
            })?;
            match c {
                'M' => {
                    span.query += len;
                    span.reference += len;
                    span.aligned += len;
                }
                'I' => {
                    span.query += len;
                    span.aligned += len;
                }
                'D' => {
                    span.reference += len;
                    span.aligned += len;
                }
                _ => return Err(GfaError::UnsupportedCigarOp(c)),
            }
        }
    }

    if run.is_some() {
        return Err(GfaError::MalformedCigar(format!(
            "trailing run length without operation in {:?}",
            cigar
        )));
    }

    Ok(span)
}
