//! Composes the IP index, AS-relationship graph, layered BFS, and ranking
//! pass into the crate's two public entry points.

use std::collections::HashMap;
use std::net::{Ipv4Addr, UdpSocket};
use std::path::Path;

use tracing::info;

use crate::asrel::AsRelGraph;
use crate::bfs;
use crate::error::{Error, Result};
use crate::ip_asn::IpAsnIndex;
use crate::resilience;

/// Compute resilience scores for `candidate_asns` against `source_asn`,
/// loading the AS-relationship graph from `asrel_path`.
///
/// Fails only if the AS-relationship file can't be opened. Every requested
/// candidate gets a score entry on success, including candidates unknown to
/// the graph (they score `0.0`).
pub fn compute_resil(
    asrel_path: impl AsRef<Path>,
    source_asn: u32,
    candidate_asns: &[u32],
) -> Result<HashMap<u32, f64>> {
    let graph = AsRelGraph::load(asrel_path)?;

    info!(source_asn, candidates = candidate_asns.len(), "running layered BFS");
    let bfs_results = bfs::run(&graph, source_asn);

    let scores = resilience::score_candidates(&bfs_results, source_asn, graph.size(), candidate_asns);
    Ok(scores)
}

/// Abstraction over "what is the caller's own IPv4 address", so
/// [`compute_node_as_resiliency`] doesn't have to hardcode a single way of
/// asking the OS (and so tests can substitute a fixed address).
pub trait SelfAddressSource {
    fn resolve(&self) -> Option<Ipv4Addr>;
}

/// Default self-address resolution: opens a UDP socket "connected" to a
/// public IPv4 address (no packet is actually sent) and reads back the
/// local address the kernel would use to route it. A common, dependency-free
/// trick for asking "which of my interfaces would the OS pick".
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSelfAddress;

impl SelfAddressSource for OsSelfAddress {
    fn resolve(&self) -> Option<Ipv4Addr> {
        let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
        socket.connect("8.8.8.8:80").ok()?;
        match socket.local_addr().ok()?.ip() {
            std::net::IpAddr::V4(v4) => Some(v4),
            std::net::IpAddr::V6(_) => None,
        }
    }
}

/// Resolve the caller's own IPv4 to an ASN, map each candidate relay IP to
/// an ASN, and delegate to [`compute_resil`].
///
/// Fails if the caller's own IPv4 can't be resolved, the IP-index file is
/// unreadable, the self-ASN can't be found in the index, or the
/// AS-relationship load fails.
pub fn compute_node_as_resiliency(
    ip_asn_path: impl AsRef<Path>,
    asrel_path: impl AsRef<Path>,
    candidate_ips: &[Ipv4Addr],
    self_address: &impl SelfAddressSource,
) -> Result<HashMap<u32, f64>> {
    let my_ip = self_address.resolve().ok_or(Error::ResolveSelfFailed)?;

    let ip_index = IpAsnIndex::load(ip_asn_path)?;
    let my_asn = ip_index.lookup_addr(my_ip);
    if my_asn == crate::ip_asn::UNKNOWN_ASN {
        return Err(Error::ResolveSelfFailed);
    }

    let candidate_asns: Vec<u32> = candidate_ips
        .iter()
        .map(|&ip| ip_index.lookup_addr(ip))
        .collect();

    compute_resil(asrel_path, my_asn, &candidate_asns)
}
