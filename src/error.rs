//! Error kinds shared across every pipeline stage.
//!
//! Follows the source design in spec.md §7: `Corrupted` and `Mismatch` are
//! fatal and surface as a non-zero worker exit; `Transient` is retried with
//! backoff by the caller before becoming fatal; `OverCapacity` is design
//! intent rather than a bug (see [`Error::OverCapacity`]); `WorkerTimeout`
//! is raised by the dispatch coordinator, never by a worker itself.
use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Custom(String),

    /// A segmented-file block's declared length disagreed with the decoded
    /// length, or a record was otherwise malformed on disk.
    Corrupted(String),
    /// A cross-stream invariant was violated (e.g. a pulse-map node did not
    /// match the expected doc id). Always indicates an upstream bug.
    Mismatch(String),
    /// An input file was not yet present, or a connection attempt was
    /// refused. Retried with backoff up to a bounded attempt count.
    Transient(String),
    /// A bounded priority queue discarded its lowest-priority item because
    /// it was full. Not an error: callers should not treat this as fatal.
    OverCapacity,
    /// A worker exceeded its heartbeat timeout.
    WorkerTimeout { worker_id: u32 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Custom(s) => write!(f, "{s}"),
            Error::Corrupted(s) => write!(f, "corrupted: {s}"),
            Error::Mismatch(s) => write!(f, "mismatch: {s}"),
            Error::Transient(s) => write!(f, "transient: {s}"),
            Error::OverCapacity => write!(f, "over capacity"),
            Error::WorkerTimeout { worker_id } => {
                write!(f, "worker {worker_id} timed out")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}

impl Error {
    /// True for errors a caller should retry with backoff rather than abort on.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transient(_))
    }
}
