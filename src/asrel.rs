//! AS-relationship graph: providers, peers, and customers per ASN.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, Result};

/// Adjacency lists for one AS, partitioned by relationship type.
///
/// Relationships are additive and duplicates are not deduplicated; the
/// input file is assumed already de-duplicated.
#[derive(Debug, Default, Clone)]
pub struct AsNeighbors {
    pub providers: Vec<u32>,
    pub peers: Vec<u32>,
    pub customers: Vec<u32>,
}

/// The in-memory AS-relationship graph.
#[derive(Debug, Default, Clone)]
pub struct AsRelGraph {
    ases: HashMap<u32, AsNeighbors>,
}

impl AsRelGraph {
    /// Load `asn1|asn2|rel` records from `path`. Blank and `#` lines are
    /// skipped; malformed lines are logged and skipped. Fails only if the
    /// file can't be opened.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::InputUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let mut graph = AsRelGraph::default();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_line(line) {
                Some((a, b, rel)) => graph.add_record(a, b, rel),
                None => warn!(line = lineno + 1, %line, "unable to parse AS-rel line, skipping"),
            }
        }

        info!(count = graph.ases.len(), path = %path.display(), "loaded AS-relationship graph");
        Ok(graph)
    }

    /// Apply one `(a, b, rel)` record symmetrically: `rel == -1` makes `a` a
    /// customer of `b` (`b` a provider of `a`); `rel == 0` makes `a` and `b`
    /// peers.
    fn add_record(&mut self, a: u32, b: u32, rel: i32) {
        match rel {
            -1 => {
                self.ases.entry(b).or_default().customers.push(a);
                self.ases.entry(a).or_default().providers.push(b);
            }
            0 => {
                self.ases.entry(a).or_default().peers.push(b);
                self.ases.entry(b).or_default().peers.push(a);
            }
            _ => unreachable!("parse_line only yields rel in {{-1, 0}}"),
        }
    }

    /// Adjacency record for `asn`, if it appears in the graph.
    pub fn neighbors(&self, asn: u32) -> Option<&AsNeighbors> {
        self.ases.get(&asn)
    }

    /// Number of ASes recorded (`|V|`).
    pub fn size(&self) -> usize {
        self.ases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ases.is_empty()
    }

    /// All ASNs present in the graph.
    pub fn asns(&self) -> impl Iterator<Item = u32> + '_ {
        self.ases.keys().copied()
    }
}

fn parse_line(line: &str) -> Option<(u32, u32, i32)> {
    let mut parts = line.splitn(3, '|');
    let a: u32 = parts.next()?.trim().parse().ok()?;
    let b: u32 = parts.next()?.trim().parse().ok()?;
    let rel: i32 = parts.next()?.trim().parse().ok()?;
    if rel != -1 && rel != 0 {
        return None;
    }
    Some((a, b, rel))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parses_provider_and_peer_lines() {
        assert_eq!(parse_line("1|2|-1"), Some((1, 2, -1)));
        assert_eq!(parse_line("1|2|0"), Some((1, 2, 0)));
        assert_eq!(parse_line("1|2|1"), None);
        assert_eq!(parse_line("garbage"), None);
    }

    #[test]
    fn symmetry_of_load_provider_customer() {
        // rel=-1 on "1|2|-1" makes AS1 a customer of AS2.
        let file = write_temp("1|2|-1\n");
        let g = AsRelGraph::load(&file).unwrap();
        assert_eq!(g.neighbors(1).unwrap().providers, vec![2]);
        assert_eq!(g.neighbors(2).unwrap().customers, vec![1]);
    }

    #[test]
    fn symmetry_of_load_peers() {
        let file = write_temp("1|2|0\n");
        let g = AsRelGraph::load(&file).unwrap();
        assert_eq!(g.neighbors(1).unwrap().peers, vec![2]);
        assert_eq!(g.neighbors(2).unwrap().peers, vec![1]);
    }

    #[test]
    fn malformed_line_is_skipped() {
        let file = write_temp("1|2|-1\ngarbage\n2|3|-1\n");
        let g = AsRelGraph::load(&file).unwrap();
        assert_eq!(g.size(), 3);
        assert_eq!(g.neighbors(2).unwrap().customers, vec![1]);
        assert_eq!(g.neighbors(2).unwrap().providers, vec![3]);
    }

    #[test]
    fn triangle_graph_providers_and_customers() {
        let file = write_temp("1|2|-1\n2|3|-1\n1|3|-1\n");
        let g = AsRelGraph::load(&file).unwrap();
        assert_eq!(g.size(), 3);
        assert_eq!(g.neighbors(1).unwrap().providers, vec![2, 3]);
        assert_eq!(g.neighbors(3).unwrap().customers, vec![2, 1]);
        assert!(g.neighbors(1).unwrap().customers.is_empty());
    }

    #[test]
    fn load_fails_on_missing_file() {
        assert!(AsRelGraph::load("/nonexistent/path.txt").is_err());
    }
}
