//! Ranking and resilience scoring: converts per-AS BFS path-class data into
//! a normalized resilience score for a candidate set of ASes.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::bfs::BfsEntry;

/// Score every candidate ASN against the BFS results for all ASes reached
/// from `source` (via `bfs_results`), given the total AS count `as_count`
/// (`graph.size()`, i.e. `|V|`).
///
/// Every candidate gets an entry in the returned map, defaulting to `0.0`
/// for a candidate that's unknown to the graph, unreached, or the source
/// itself.
pub fn score_candidates(
    bfs_results: &HashMap<u32, BfsEntry>,
    source: u32,
    as_count: usize,
    candidates: &[u32],
) -> HashMap<u32, f64> {
    let candidate_set: HashSet<u32> = candidates.iter().copied().collect();
    let mut scores: HashMap<u32, f64> = candidate_set.iter().map(|&asn| (asn, 0.0)).collect();

    if as_count <= 2 {
        // Normalizing by |V|-2 is undefined for a trivially small graph;
        // nothing meaningful to rank.
        return scores;
    }

    let mut destinations: Vec<(u32, BfsEntry)> = bfs_results
        .iter()
        .filter(|(&asn, _)| asn != source)
        .map(|(&asn, &entry)| (asn, entry))
        .collect();

    // Sort primary by uphill descending, secondary by weight descending:
    // later entries in this order are more attractive destinations.
    destinations.sort_unstable_by(|(_, a), (_, b)| {
        b.uphill.cmp(&a.uphill).then(b.weight.cmp(&a.weight))
    });

    let reached = destinations.len();
    let unreachable = as_count.saturating_sub(1).saturating_sub(reached) as f64;

    let mut nodes_in_better_classes: f64 = 0.0;

    for (_, group) in &destinations
        .into_iter()
        .chunk_by(|(_, entry)| (entry.weight, entry.uphill))
    {
        let class: Vec<(u32, BfsEntry)> = group.collect();
        let eq_nodes = class.len() as f64;
        let eq_path_total: u64 = class.iter().map(|(_, e)| e.equal_paths).sum();

        for &(asn, entry) in &class {
            if candidate_set.contains(&asn) {
                let raw = if class.len() == 1 {
                    nodes_in_better_classes + unreachable
                } else {
                    nodes_in_better_classes
                        + unreachable
                        + (entry.equal_paths as f64 / eq_path_total as f64)
                };
                scores.insert(asn, raw / (as_count as f64 - 2.0));
            }
        }

        nodes_in_better_classes += eq_nodes;
    }

    scores
}
