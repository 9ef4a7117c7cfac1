//! IPv4 range → ASN index.
//!
//! Parses the two line grammars documented for the IP→ASN file and answers
//! point lookups by binary search over a range list sorted by `ip_low`.

use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, Result};

/// A single `(ip_low, ip_high, asn)` range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Range {
    ip_low: u32,
    ip_high: u32,
    asn: u32,
}

/// ASN reserved to mean "no match".
pub const UNKNOWN_ASN: u32 = 0;

/// An IPv4 → ASN index built from a text file of IP ranges.
#[derive(Debug, Default, Clone)]
pub struct IpAsnIndex {
    ranges: Vec<Range>,
}

impl IpAsnIndex {
    /// Load ranges from `path`. Blank lines and lines starting with `#` are
    /// skipped; a malformed line is logged and skipped without failing the
    /// load. Fails only if the file itself can't be opened.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::InputUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let mut ranges = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match parse_line(line) {
                Some((low, high, asn)) => {
                    if low <= high {
                        ranges.push(Range {
                            ip_low: low,
                            ip_high: high,
                            asn,
                        });
                    } else {
                        warn!(line = lineno + 1, %line, "ip range low > high, skipping");
                    }
                }
                None => {
                    warn!(line = lineno + 1, %line, "unable to parse IP→ASN line, skipping");
                }
            }
        }

        ranges.sort_by_key(|r| r.ip_low);
        info!(count = ranges.len(), path = %path.display(), "loaded IP→ASN ranges");

        Ok(IpAsnIndex { ranges })
    }

    /// Look up the ASN whose range contains `ip`, in host byte order, or
    /// [`UNKNOWN_ASN`] if no range matches.
    ///
    /// If ranges overlap, which of the overlapping ranges wins is
    /// implementation-defined.
    pub fn lookup(&self, ip: u32) -> u32 {
        match self
            .ranges
            .binary_search_by(|r| {
                if ip < r.ip_low {
                    std::cmp::Ordering::Greater
                } else if ip > r.ip_high {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            }) {
            Ok(idx) => self.ranges[idx].asn,
            Err(_) => UNKNOWN_ASN,
        }
    }

    /// Convenience wrapper over [`IpAsnIndex::lookup`] for an [`Ipv4Addr`].
    pub fn lookup_addr(&self, ip: Ipv4Addr) -> u32 {
        self.lookup(u32::from(ip))
    }

    /// Number of ranges currently loaded.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Parse one non-blank, non-comment line in either of the two accepted
/// grammars: `L,H,A` or `"L","H","A",`.
fn parse_line(line: &str) -> Option<(u32, u32, u32)> {
    let stripped: String = line.chars().filter(|c| *c != '"').collect();
    let stripped = stripped.trim().trim_end_matches(',');
    let mut parts = stripped.split(',').map(str::trim);
    let low: u32 = parts.next()?.parse().ok()?;
    let high: u32 = parts.next()?.parse().ok()?;
    let asn: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((low, high, asn))
}
