//! AS-level path resilience scoring for candidate relays, under the
//! Gao-Rexford valley-free BGP model.
//!
//! Given an AS-relationship graph and a source AS, [`bfs::run`] computes the
//! best valley-free path class reaching every other AS; [`resilience::score_candidates`]
//! turns that into a normalized resilience score per candidate AS.
//! [`orchestrator::compute_resil`] and [`orchestrator::compute_node_as_resiliency`]
//! compose the whole pipeline from file paths (and, for the latter, the
//! caller's own address) down to a `HashMap<u32, f64>` of scores.

pub mod asrel;
pub mod bfs;
pub mod error;
pub mod ip_asn;
pub mod orchestrator;
pub mod resilience;

pub use error::{Error, Result};
pub use orchestrator::{compute_node_as_resiliency, compute_resil, OsSelfAddress, SelfAddressSource};
