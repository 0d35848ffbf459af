//! Statistics computation for loaded GFA files

use crate::error::Result;
use crate::gfa::GfaFile;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Summary statistics about a GFA file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GfaStats {
    /// Total number of segments (nodes)
    pub segment_count: usize,
    /// Total number of links (edges)
    pub link_count: usize,
    /// Distinct names seen across segments and link endpoints
    pub name_count: usize,
    /// Total segment length
    pub total_length: u64,
    /// Average segment length
    pub average_length: f64,
    /// Minimum segment length
    pub min_length: u32,
    /// Maximum segment length
    pub max_length: u32,
    /// N50 of segment lengths
    pub n50: u32,
    /// GC content percentage over literal sequences
    pub gc_content: f64,
    /// Number of connected components
    pub connected_components: usize,
    /// Links carrying an overlap CIGAR (the rest are placeholders)
    pub links_with_overlap: usize,
    /// Mean alignment length over links with an overlap CIGAR
    pub mean_alignment_length: f64,
    /// Link endpoints whose id has no segment record
    pub dangling_endpoints: usize,
}

impl GfaStats {
    /// Compute statistics from a loaded file. Fails if a link carries a
    /// CIGAR the extent calculator rejects.
    pub fn from_file(gfa: &GfaFile) -> Result<Self> {
        let segment_count = gfa.segment_count();
        let link_count = gfa.link_count();
        let total_length = gfa.total_length();

        let lengths: Vec<u32> = gfa.segments.iter().map(|s| s.length).collect();
        let (min_length, max_length, average_length) = if lengths.is_empty() {
            (0, 0, 0.0)
        } else {
            let min = *lengths.iter().min().unwrap();
            let max = *lengths.iter().max().unwrap();
            let avg = total_length as f64 / lengths.len() as f64;
            (min, max, avg)
        };

        let n50 = compute_n50(&lengths);
        let gc_content = compute_gc_content(gfa);
        let connected_components = compute_connected_components(gfa);

        let mut links_with_overlap = 0;
        let mut alignment_total: u64 = 0;
        for link in &gfa.links {
            if link.cigar.is_some() {
                links_with_overlap += 1;
                alignment_total += link.alignment_length()? as u64;
            }
        }
        let mean_alignment_length = if links_with_overlap == 0 {
            0.0
        } else {
            alignment_total as f64 / links_with_overlap as f64
        };

        let segment_ids: HashSet<u32> = gfa.segments.iter().map(|s| s.id).collect();
        let dangling_endpoints = gfa
            .links
            .iter()
            .flat_map(|l| [l.a.id, l.b.id])
            .filter(|id| !segment_ids.contains(id))
            .count();

        Ok(GfaStats {
            segment_count,
            link_count,
            name_count: gfa.names.len(),
            total_length,
            average_length,
            min_length,
            max_length,
            n50,
            gc_content,
            connected_components,
            links_with_overlap,
            mean_alignment_length,
            dangling_endpoints,
        })
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut output = String::new();
        output.push_str("=== GFA File Statistics ===\n\n");

        output.push_str(&format!("Segments (nodes):        {:>12}\n", self.segment_count));
        output.push_str(&format!("Links (edges):           {:>12}\n", self.link_count));
        output.push_str(&format!("Distinct names:          {:>12}\n", self.name_count));
        output.push_str(&format!(
            "Connected components:    {:>12}\n",
            self.connected_components
        ));
        output.push('\n');

        output.push_str("--- Sequence Statistics ---\n");
        output.push_str(&format!(
            "Total segment length:    {:>12} bp\n",
            self.total_length
        ));
        output.push_str(&format!(
            "Average segment length:  {:>12.2} bp\n",
            self.average_length
        ));
        output.push_str(&format!("Min segment length:      {:>12} bp\n", self.min_length));
        output.push_str(&format!("Max segment length:      {:>12} bp\n", self.max_length));
        output.push_str(&format!("N50:                     {:>12} bp\n", self.n50));
        output.push_str(&format!("GC content:              {:>12.2}%\n", self.gc_content));
        output.push('\n');

        output.push_str("--- Link Statistics ---\n");
        output.push_str(&format!(
            "Links with overlap:      {:>12}\n",
            self.links_with_overlap
        ));
        output.push_str(&format!(
            "Mean alignment length:   {:>12.2} bp\n",
            self.mean_alignment_length
        ));
        output.push_str(&format!(
            "Dangling endpoints:      {:>12}\n",
            self.dangling_endpoints
        ));

        output
    }

    /// Export statistics as JSON
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn compute_n50(lengths: &[u32]) -> u32 {
    if lengths.is_empty() {
        return 0;
    }

    let mut sorted: Vec<u32> = lengths.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a)); // Sort descending

    let total: u64 = sorted.iter().map(|&l| l as u64).sum();
    let half = total / 2;

    let mut cumsum: u64 = 0;
    for len in sorted {
        cumsum += len as u64;
        if cumsum >= half {
            return len;
        }
    }

    0
}

fn compute_gc_content(gfa: &GfaFile) -> f64 {
    let mut gc_count: u64 = 0;
    let mut total_count: u64 = 0;

    for sequence in gfa.segments.iter().filter_map(|s| s.sequence.as_deref()) {
        for c in sequence.chars() {
            match c.to_ascii_uppercase() {
                'G' | 'C' => {
                    gc_count += 1;
                    total_count += 1;
                }
                'A' | 'T' => {
                    total_count += 1;
                }
                _ => {} // Skip N and other characters
            }
        }
    }

    if total_count == 0 {
        0.0
    } else {
        (gc_count as f64 / total_count as f64) * 100.0
    }
}

fn compute_connected_components(gfa: &GfaFile) -> usize {
    // Every resolved id is a node, segment record or not.
    let mut nodes: HashSet<u32> = gfa.segments.iter().map(|s| s.id).collect();
    let mut adjacency: HashMap<u32, Vec<u32>> = HashMap::new();

    for link in &gfa.links {
        nodes.insert(link.a.id);
        nodes.insert(link.b.id);
        adjacency.entry(link.a.id).or_default().push(link.b.id);
        adjacency.entry(link.b.id).or_default().push(link.a.id);
    }

    let mut visited: HashSet<u32> = HashSet::new();
    let mut components = 0;

    for &node in &nodes {
        if visited.contains(&node) {
            continue;
        }
        components += 1;
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(neighbors) = adjacency.get(&current) {
                stack.extend(neighbors.iter().copied());
            }
        }
    }

    components
}
