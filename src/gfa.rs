//! GFA (Graphical Fragment Assembly) file reader/writer
//!
//! This module handles the GFA subset used by assembly pipelines: an opaque
//! header line, segment (`S`) records, and link (`L`) records. Optional tags
//! are carried verbatim so a loaded file can be written back without losing
//! field content. Every segment name also receives a dense integer id,
//! assigned in first-seen order across both record kinds.

use crate::cigar::{alignment_span, AlignmentSpan};
use crate::error::{GfaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Placeholder field meaning "sequence/alignment omitted"
const PLACEHOLDER: &str = "*";

/// Prefix of the optional segment length tag
const LENGTH_TAG: &str = "LN:i:";

/// Orientation of a segment end in a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    fn from_field(field: &str) -> Result<Self> {
        match field {
            "+" => Ok(Orientation::Forward),
            "-" => Ok(Orientation::Reverse),
            _ => Err(GfaError::MalformedRecord(format!(
                "invalid orientation: {:?}",
                field
            ))),
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Forward => write!(f, "+"),
            Orientation::Reverse => write!(f, "-"),
        }
    }
}

/// A segment (node) in the GFA graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Segment name, the natural key
    pub name: String,
    /// Dense integer id assigned by the owning file's [`NameIndex`]
    pub id: u32,
    /// Sequence data; `None` when the record carried the `*` placeholder
    pub sequence: Option<String>,
    /// Segment length: the `LN:i:` tag if present, else the sequence
    /// character count, else 0
    pub length: u32,
    /// Unrecognized optional fields, tab-joined verbatim
    pub features: String,
}

impl Segment {
    /// Parse a tab-split `S` line. `fields[0]` is the record marker; the id
    /// is assigned afterwards by the owning file.
    fn parse_fields(fields: &[&str]) -> Result<Segment> {
        if fields.len() < 3 {
            return Err(GfaError::MalformedRecord(
                "segment record requires a name and a sequence".to_string(),
            ));
        }

        let name = fields[1].to_string();
        let sequence = match fields[2] {
            PLACEHOLDER => None,
            seq => Some(seq.to_string()),
        };

        let mut length = None;
        let mut features = Vec::new();
        for field in &fields[3..] {
            if let Some(value) = field.strip_prefix(LENGTH_TAG) {
                length = Some(value.parse::<u32>().map_err(|_| {
                    GfaError::MalformedRecord(format!("invalid length tag: {:?}", field))
                })?);
            } else {
                features.push(*field);
            }
        }

        let length = length.unwrap_or_else(|| {
            sequence.as_ref().map(|s| s.chars().count() as u32).unwrap_or(0)
        });

        Ok(Segment {
            name,
            id: 0,
            sequence,
            length,
            features: features.join("\t"),
        })
    }

    /// Serialize back to one GFA line, without trailing newline. The cached
    /// `length` is not re-emitted as a tag.
    pub fn to_gfa_line(&self) -> String {
        let mut line = format!(
            "S\t{}\t{}",
            self.name,
            self.sequence.as_deref().unwrap_or(PLACEHOLDER)
        );
        if !self.features.is_empty() {
            line.push('\t');
            line.push_str(&self.features);
        }
        line
    }
}

/// One endpoint of a link: a named segment end with orientation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkEnd {
    /// Segment name
    pub name: String,
    /// Dense integer id, resolved through the same [`NameIndex`] as segments
    pub id: u32,
    /// Strand of this end
    pub orientation: Orientation,
}

/// A link (edge) between two segment ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    /// Source end
    pub a: LinkEnd,
    /// Destination end
    pub b: LinkEnd,
    /// Overlap CIGAR; `None` when the record carried the `*` placeholder
    pub cigar: Option<String>,
    /// Unrecognized optional fields, tab-joined verbatim
    pub features: String,
}

impl Link {
    /// Parse a tab-split `L` line. Endpoint ids are resolved afterwards by
    /// the owning file.
    fn parse_fields(fields: &[&str]) -> Result<Link> {
        if fields.len() < 6 {
            return Err(GfaError::MalformedRecord(
                "link record requires two oriented endpoints and an overlap".to_string(),
            ));
        }

        let a = LinkEnd {
            name: fields[1].to_string(),
            id: 0,
            orientation: Orientation::from_field(fields[2])?,
        };
        let b = LinkEnd {
            name: fields[3].to_string(),
            id: 0,
            orientation: Orientation::from_field(fields[4])?,
        };
        let cigar = match fields[5] {
            PLACEHOLDER => None,
            c => Some(c.to_string()),
        };

        Ok(Link {
            a,
            b,
            cigar,
            features: fields[6..].join("\t"),
        })
    }

    /// Serialize back to one GFA line, without trailing newline.
    pub fn to_gfa_line(&self) -> String {
        let mut line = format!(
            "L\t{}\t{}\t{}\t{}\t{}",
            self.a.name,
            self.a.orientation,
            self.b.name,
            self.b.orientation,
            self.cigar.as_deref().unwrap_or(PLACEHOLDER)
        );
        if !self.features.is_empty() {
            line.push('\t');
            line.push_str(&self.features);
        }
        line
    }

    /// Query/reference/aligned extents of this link's overlap CIGAR.
    /// A placeholder CIGAR has zero extent.
    pub fn alignment_span(&self) -> Result<AlignmentSpan> {
        match &self.cigar {
            Some(cigar) => alignment_span(cigar),
            None => Ok(AlignmentSpan::default()),
        }
    }

    /// Total aligned columns of this link's overlap.
    pub fn alignment_length(&self) -> Result<u32> {
        Ok(self.alignment_span()?.aligned)
    }
}

/// Name to dense-id mapping, scoped to one [`GfaFile`]
///
/// Ids are assigned lazily in first-seen order starting at 0, whether the
/// name first appears as an `S` record or as a link endpoint. Looking up a
/// name again returns the id it was first given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameIndex {
    ids: HashMap<String, u32>,
}

impl NameIndex {
    /// Return the id for `name`, assigning the next sequential id if the
    /// name has not been seen before.
    pub fn resolve(&mut self, name: &str) -> u32 {
        let next = self.ids.len() as u32;
        *self.ids.entry(name.to_string()).or_insert(next)
    }

    /// Look up a name without assigning an id.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    /// Number of distinct names seen so far.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A loaded GFA file: header, segments, and links in input order
///
/// The file exclusively owns its records and its [`NameIndex`]; ids are only
/// meaningful within one `GfaFile` instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GfaFile {
    /// Header line content (text after the `H` marker), if present
    pub header: Option<String>,
    /// Segments in input order
    pub segments: Vec<Segment>,
    /// Links in input order
    pub links: Vec<Link>,
    /// Per-file identity resolver
    pub names: NameIndex,
}

impl GfaFile {
    /// Create a new empty GFA file
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a GFA file from a path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Parse GFA from a buffered reader.
    ///
    /// Any per-line failure aborts the whole load; the error carries the
    /// offending line number and raw text. No partial graph is returned.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut gfa = GfaFile::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            match fields[0] {
                "H" => gfa
                    .set_header(&fields)
                    .map_err(|e| e.at_line(line_num + 1, line))?,
                "S" => gfa
                    .push_segment_fields(&fields)
                    .map_err(|e| e.at_line(line_num + 1, line))?,
                "L" => gfa
                    .push_link_fields(&fields)
                    .map_err(|e| e.at_line(line_num + 1, line))?,
                _ => {
                    // Unknown record type, skip
                }
            }
        }

        Ok(gfa)
    }

    fn set_header(&mut self, fields: &[&str]) -> Result<()> {
        if self.header.is_some() {
            return Err(GfaError::DuplicateHeader);
        }
        self.header = Some(fields[1..].join("\t"));
        Ok(())
    }

    fn push_segment_fields(&mut self, fields: &[&str]) -> Result<()> {
        let mut segment = Segment::parse_fields(fields)?;
        segment.id = self.names.resolve(&segment.name);
        self.segments.push(segment);
        Ok(())
    }

    fn push_link_fields(&mut self, fields: &[&str]) -> Result<()> {
        let mut link = Link::parse_fields(fields)?;
        link.a.id = self.names.resolve(&link.a.name);
        link.b.id = self.names.resolve(&link.b.name);
        self.links.push(link);
        Ok(())
    }

    /// Append a segment built in memory; returns its assigned id.
    /// Length is derived from the sequence, 0 when omitted.
    pub fn add_segment(&mut self, name: &str, sequence: Option<&str>) -> u32 {
        let id = self.names.resolve(name);
        let length = sequence.map(|s| s.chars().count() as u32).unwrap_or(0);
        self.segments.push(Segment {
            name: name.to_string(),
            id,
            sequence: sequence.map(String::from),
            length,
            features: String::new(),
        });
        id
    }

    /// Append a link built in memory, resolving both endpoint ids.
    pub fn add_link(
        &mut self,
        a_name: &str,
        a_orientation: Orientation,
        b_name: &str,
        b_orientation: Orientation,
        cigar: Option<&str>,
    ) {
        let a_id = self.names.resolve(a_name);
        let b_id = self.names.resolve(b_name);
        self.links.push(Link {
            a: LinkEnd {
                name: a_name.to_string(),
                id: a_id,
                orientation: a_orientation,
            },
            b: LinkEnd {
                name: b_name.to_string(),
                id: b_id,
                orientation: b_orientation,
            },
            cigar: cigar.map(String::from),
            features: String::new(),
        });
    }

    /// Save to a path, grouping records by type.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write(BufWriter::new(file))
    }

    /// Write the file: header first, then all segments, then all links.
    /// The original interleaving of S/L lines is not preserved.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        if let Some(header) = &self.header {
            if header.is_empty() {
                writeln!(writer, "H")?;
            } else {
                writeln!(writer, "H\t{}", header)?;
            }
        }
        for segment in &self.segments {
            writeln!(writer, "{}", segment.to_gfa_line())?;
        }
        for link in &self.links {
            writeln!(writer, "{}", link.to_gfa_line())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Get the first segment with the given name
    pub fn get_segment(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name == name)
    }

    /// Total length across all segments
    pub fn total_length(&self) -> u64 {
        self.segments.iter().map(|s| s.length as u64).sum()
    }

    /// Number of segments
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> GfaFile {
        GfaFile::parse(Cursor::new(text)).unwrap()
    }

    #[test]
    fn test_parse_simple_gfa() {
        let gfa = parse(
            "H\tVN:Z:1.0\n\
             S\ts1\tACGT\n\
             S\ts2\tGGGG\n\
             L\ts1\t+\ts2\t+\t4M\n",
        );

        assert_eq!(gfa.header.as_deref(), Some("VN:Z:1.0"));
        assert_eq!(gfa.segment_count(), 2);
        assert_eq!(gfa.link_count(), 1);
        assert_eq!(gfa.total_length(), 8);
    }

    #[test]
    fn test_ids_assigned_in_first_seen_order() {
        let gfa = parse(
            "S\ttig1\tACGT\n\
             S\ttig2\tGGGG\n\
             S\ttig3\tTTTT\n",
        );
        assert_eq!(gfa.segments[0].id, 0);
        assert_eq!(gfa.segments[1].id, 1);
        assert_eq!(gfa.segments[2].id, 2);
        assert_eq!(gfa.names.get("tig2"), Some(1));
    }

    #[test]
    fn test_link_endpoint_seen_before_segment() {
        // tig2 first appears as a link endpoint; its id must hold when the
        // S record arrives later.
        let gfa = parse(
            "S\ttig1\tACGT\n\
             L\ttig1\t+\ttig2\t-\t*\n\
             S\ttig2\tGGGG\n",
        );
        assert_eq!(gfa.links[0].a.id, 0);
        assert_eq!(gfa.links[0].b.id, 1);
        assert_eq!(gfa.get_segment("tig2").unwrap().id, 1);
    }

    #[test]
    fn test_dangling_link_endpoint_still_gets_id() {
        let gfa = parse(
            "S\ttig1\tACGT\n\
             L\ttig1\t+\tghost\t+\t*\n",
        );
        assert_eq!(gfa.links[0].b.id, 1);
        assert!(gfa.get_segment("ghost").is_none());
    }

    #[test]
    fn test_segment_length_from_sequence() {
        let gfa = parse("S\ttig1\tACGTACGT\n");
        assert_eq!(gfa.segments[0].length, 8);
        assert_eq!(gfa.segments[0].sequence.as_deref(), Some("ACGTACGT"));
    }

    #[test]
    fn test_segment_length_placeholder_sequence() {
        let gfa = parse("S\ttig1\t*\n");
        assert_eq!(gfa.segments[0].length, 0);
        assert!(gfa.segments[0].sequence.is_none());
    }

    #[test]
    fn test_explicit_length_tag_wins() {
        let gfa = parse("S\ttig1\tACGT\tLN:i:100\n");
        assert_eq!(gfa.segments[0].length, 100);
        // The recognized tag is consumed, not carried in features.
        assert_eq!(gfa.segments[0].features, "");
    }

    #[test]
    fn test_features_preserved_verbatim() {
        let gfa = parse("S\ttig1\t*\tLN:i:50\tRC:i:3\tKC:i:120\n");
        assert_eq!(gfa.segments[0].length, 50);
        assert_eq!(gfa.segments[0].features, "RC:i:3\tKC:i:120");
    }

    #[test]
    fn test_parse_link_fields() {
        let gfa = parse(
            "S\ts1\tACGT\n\
             S\ts2\tGGGG\n\
             L\ts1\t+\ts2\t-\t2M\tRC:i:7\n",
        );
        let link = &gfa.links[0];
        assert_eq!(link.a.name, "s1");
        assert_eq!(link.a.orientation, Orientation::Forward);
        assert_eq!(link.b.name, "s2");
        assert_eq!(link.b.orientation, Orientation::Reverse);
        assert_eq!(link.cigar.as_deref(), Some("2M"));
        assert_eq!(link.features, "RC:i:7");
    }

    #[test]
    fn test_link_alignment_length() {
        let gfa = parse(
            "L\ts1\t+\ts2\t+\t10M2I3D\n\
             L\ts1\t-\ts2\t-\t*\n",
        );
        assert_eq!(gfa.links[0].alignment_length().unwrap(), 15);
        assert_eq!(gfa.links[1].alignment_length().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_segment_name_keeps_both() {
        let gfa = parse(
            "S\ttig1\tACGT\n\
             S\ttig1\tGGGG\n",
        );
        assert_eq!(gfa.segment_count(), 2);
        assert_eq!(gfa.segments[0].id, gfa.segments[1].id);
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let err = GfaFile::parse(Cursor::new("H\tVN:Z:1.0\nH\tVN:Z:1.0\n")).unwrap_err();
        match err {
            GfaError::AtLine { line, source, .. } => {
                assert_eq!(line, 2);
                assert!(matches!(*source, GfaError::DuplicateHeader));
            }
            other => panic!("expected AtLine, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_record_type_skipped() {
        let gfa = parse(
            "S\ts1\tACGT\n\
             P\tpath1\ts1+\t*\n",
        );
        assert_eq!(gfa.segment_count(), 1);
        assert_eq!(gfa.link_count(), 0);
    }

    #[test]
    fn test_short_segment_record_fails() {
        let err = GfaFile::parse(Cursor::new("S\ttig1\n")).unwrap_err();
        match err {
            GfaError::AtLine { line, text, source } => {
                assert_eq!(line, 1);
                assert_eq!(text, "S\ttig1");
                assert!(matches!(*source, GfaError::MalformedRecord(_)));
            }
            other => panic!("expected AtLine, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_orientation_fails() {
        let err = GfaFile::parse(Cursor::new("L\ts1\tx\ts2\t+\t*\n")).unwrap_err();
        match err {
            GfaError::AtLine { source, .. } => {
                assert!(matches!(*source, GfaError::MalformedRecord(_)))
            }
            other => panic!("expected AtLine, got {:?}", other),
        }
    }

    #[test]
    fn test_short_link_record_fails() {
        assert!(GfaFile::parse(Cursor::new("L\ts1\t+\ts2\t+\n")).is_err());
    }

    #[test]
    fn test_bad_length_tag_fails() {
        assert!(GfaFile::parse(Cursor::new("S\ttig1\t*\tLN:i:abc\n")).is_err());
    }

    #[test]
    fn test_load_failure_is_total() {
        let err = GfaFile::parse(Cursor::new(
            "S\ttig1\tACGT\n\
             L\ttig1\t+\n",
        ))
        .unwrap_err();
        match err {
            GfaError::AtLine { line, .. } => assert_eq!(line, 2),
            other => panic!("expected AtLine, got {:?}", other),
        }
    }

    #[test]
    fn test_add_segment_and_link() {
        let mut gfa = GfaFile::new();
        let a = gfa.add_segment("tig1", Some("ACGT"));
        let b = gfa.add_segment("tig2", None);
        gfa.add_link("tig1", Orientation::Forward, "tig2", Orientation::Reverse, Some("4M"));

        assert_eq!((a, b), (0, 1));
        assert_eq!(gfa.segments[1].length, 0);
        assert_eq!(gfa.links[0].a.id, 0);
        assert_eq!(gfa.links[0].b.id, 1);
    }

    #[test]
    fn test_write_groups_by_record_type() {
        let gfa = parse(
            "S\ts1\tACGT\n\
             L\ts1\t+\ts2\t+\t*\n\
             S\ts2\tGGGG\n",
        );
        let mut out = Vec::new();
        gfa.write(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "S\ts1\tACGT\nS\ts2\tGGGG\nL\ts1\t+\ts2\t+\t*\n"
        );
    }

    #[test]
    fn test_round_trip_preserves_field_content() {
        let input = "H\tVN:Z:1.0\n\
                     S\ttig1\tACGT\tRC:i:3\n\
                     S\ttig2\t*\tKC:i:9\tSH:H:AF\n\
                     L\ttig1\t+\ttig2\t-\t2M1I\tID:Z:ovl1\n";
        let first = parse(input);

        let mut out = Vec::new();
        first.write(&mut out).unwrap();
        let second = GfaFile::parse(Cursor::new(out)).unwrap();

        assert_eq!(second.header, first.header);
        assert_eq!(second.segment_count(), first.segment_count());
        for (a, b) in first.segments.iter().zip(&second.segments) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.sequence, b.sequence);
            assert_eq!(a.features, b.features);
            assert_eq!(a.id, b.id);
        }
        for (a, b) in first.links.iter().zip(&second.links) {
            assert_eq!(a.a.name, b.a.name);
            assert_eq!(a.a.orientation, b.a.orientation);
            assert_eq!(a.b.name, b.b.name);
            assert_eq!(a.b.orientation, b.b.orientation);
            assert_eq!(a.cigar, b.cigar);
            assert_eq!(a.features, b.features);
        }
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.gfa");

        let mut gfa = GfaFile::new();
        gfa.header = Some("VN:Z:1.0".to_string());
        gfa.add_segment("tig1", Some("ACGTACGT"));
        gfa.add_segment("tig2", Some("TTTT"));
        gfa.add_link("tig1", Orientation::Forward, "tig2", Orientation::Forward, Some("0M"));
        gfa.save(&path).unwrap();

        let loaded = GfaFile::from_file(&path).unwrap();
        assert_eq!(loaded.header.as_deref(), Some("VN:Z:1.0"));
        assert_eq!(loaded.segment_count(), 2);
        assert_eq!(loaded.link_count(), 1);
        assert_eq!(loaded.segments[0].length, 8);
    }
}
