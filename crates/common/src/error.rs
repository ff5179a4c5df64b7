//! Central error types for the decode pipeline (thiserror-based).
//!
//! The decode surface reports outcomes as status-like errors on the
//! `Err` side of `Result`, in the spirit of
//! [`std::sync::mpsc::RecvTimeoutError`]: `EndOfStream` and `TimedOut`
//! are conditions a caller handles in its control flow, while the
//! remaining variants are hard faults the pipeline never retries
//! internally.

use std::time::Duration;

use thiserror::Error;

use crate::types::TimeStamp;

/// Errors and terminal/transient conditions from the decode pipeline.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The upstream source is exhausted and the output queue drained.
    /// Terminal for the session until it is re-opened or seeked.
    #[error("End of stream")]
    EndOfStream,

    /// No decoded unit became available within the requested budget,
    /// but the source is not known to be exhausted. Retry.
    #[error("No output within {budget:?}")]
    TimedOut { budget: Duration },

    /// `decode()` or `seek()` was called before `init()`.
    #[error("Decoder session not initialized")]
    NotInitialized,

    /// Operation on a session that has been closed.
    #[error("Decoder session closed")]
    SessionClosed,

    /// Codec-level fault while producing a decoded unit.
    #[error("Codec failure: {reason}")]
    Codec { reason: String },

    /// Bitstream that the codec could not make sense of.
    #[error("Malformed input: {detail}")]
    Malformed { detail: String },

    /// Seek request the upstream source could not satisfy.
    #[error("Seek to {target} failed: {reason}")]
    Seek { target: TimeStamp, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// True for the terminal end-of-stream condition.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }

    /// True for the transient empty-queue condition.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }

    /// True if the caller may simply retry the same call.
    pub fn is_recoverable(&self) -> bool {
        self.is_timeout()
    }
}

/// Convenience Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
