use std::net::Ipv4Addr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use as_resil::compute_resil;
use clap::{ArgGroup, Parser};
use serde_json::json;
use tracing::info;

/// resil-score computes AS-level path resilience scores for candidate
/// relay ASes or IPs, relative to a source AS, under the Gao-Rexford
/// valley-free BGP model.
#[derive(Parser, Debug)]
#[clap(group(
    ArgGroup::new("source")
        .required(true)
        .args(&["source_ip", "source_asn"])
))]
struct Opts {
    /// Path to the AS-relationship file (asn1|asn2|rel lines)
    asrel_file: PathBuf,

    /// Path to the IP->ASN index file
    ip_asn_file: PathBuf,

    /// Source IPv4 address; its ASN is looked up via ip_asn_file
    #[clap(long)]
    source_ip: Option<Ipv4Addr>,

    /// Source ASN, given directly
    #[clap(long)]
    source_asn: Option<u32>,

    /// Candidate relay IPv4 address (repeatable)
    #[clap(long = "candidate-ip")]
    candidate_ips: Vec<Ipv4Addr>,

    /// Candidate relay ASN (repeatable)
    #[clap(long = "candidate-asn")]
    candidate_asns: Vec<u32>,

    /// whether to print debug logs
    #[clap(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    if opts.debug {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    let needs_ip_index = opts.source_ip.is_some() || !opts.candidate_ips.is_empty();
    let ip_index = if needs_ip_index {
        Some(as_resil::ip_asn::IpAsnIndex::load(&opts.ip_asn_file).context("loading IP->ASN index")?)
    } else {
        None
    };

    let source_asn = match opts.source_asn {
        Some(asn) => asn,
        None => {
            // source_ip is guaranteed present: clap's ArgGroup requires
            // exactly one of source_ip/source_asn.
            let source_ip = opts.source_ip.expect("clap ArgGroup invariant");
            ip_index.as_ref().unwrap().lookup_addr(source_ip)
        }
    };
    info!(source_asn, "scoring candidates");

    let mut candidate_asns = opts.candidate_asns.clone();
    if let Some(ip_index) = &ip_index {
        candidate_asns.extend(opts.candidate_ips.iter().map(|&ip| ip_index.lookup_addr(ip)));
    }

    let scores =
        compute_resil(&opts.asrel_file, source_asn, &candidate_asns).context("computing resilience scores")?;

    println!("{}", serde_json::to_string_pretty(&json!(scores))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_source_asn_and_candidates() {
        let opts = Opts::parse_from([
            "resil-score",
            "asrel.txt",
            "ip_asn.csv",
            "--source-asn",
            "1",
            "--candidate-asn",
            "2",
            "--candidate-asn",
            "3",
        ]);
        assert_eq!(opts.source_asn, Some(1));
        assert_eq!(opts.candidate_asns, vec![2, 3]);
        assert!(opts.source_ip.is_none());
    }

    #[test]
    fn parses_source_ip_and_candidate_ips() {
        let opts = Opts::parse_from([
            "resil-score",
            "asrel.txt",
            "ip_asn.csv",
            "--source-ip",
            "10.0.0.1",
            "--candidate-ip",
            "10.0.0.2",
        ]);
        assert_eq!(opts.source_ip, Some(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(opts.candidate_ips, vec![Ipv4Addr::new(10, 0, 0, 2)]);
    }

    #[test]
    fn rejects_missing_source() {
        let result = Opts::try_parse_from(["resil-score", "asrel.txt", "ip_asn.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_both_sources() {
        let result = Opts::try_parse_from([
            "resil-score",
            "asrel.txt",
            "ip_asn.csv",
            "--source-ip",
            "10.0.0.1",
            "--source-asn",
            "1",
        ]);
        assert!(result.is_err());
    }
}
