use std::path::PathBuf;

/// Errors surfaced by the public API.
///
/// Malformed individual records never produce an `Error`: they're logged
/// and skipped. Only a file that can't be opened, or a self-address that
/// can't be resolved, is fatal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open input file {path}: {source}")]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to resolve caller's own IPv4 address or ASN")]
    ResolveSelfFailed,
}

pub type Result<T> = std::result::Result<T, Error>;
