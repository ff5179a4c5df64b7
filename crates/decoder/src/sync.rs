//! Synchronous pull decoder — single-threaded FIFO delivery.
//!
//! [`SyncDecoder`] sits between a [`FrameProvider`] and a consumer
//! that calls [`decode`](SyncDecoder::decode) once per desired output
//! unit. A single pull may decode several units at once (e.g. audio
//! frames split from one packet); they are queued and drained in
//! strict decode order before the provider is asked again.
//!
//! The consumer loop is:
//!
//! ```no_run
//! # use std::time::Duration;
//! # use syncpipe_common::{DecodeError, DecoderConfig};
//! # use syncpipe_decoder::sync::SyncDecoder;
//! # fn run(provider: impl syncpipe_decoder::session::FrameProvider) -> Result<(), DecodeError> {
//! let mut decoder = SyncDecoder::new(provider, DecoderConfig::default());
//! decoder.init()?;
//! loop {
//!     match decoder.decode(Duration::from_millis(100)) {
//!         Ok(message) => { /* consume the frame */ }
//!         Err(e) if e.is_timeout() => continue,
//!         Err(e) if e.is_end_of_stream() => break,
//!         Err(e) => return Err(e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use tracing::trace;

use syncpipe_common::{DecodeError, DecoderConfig, TimeStamp};

use crate::message::DecoderOutputMessage;
use crate::session::{DecoderSession, FrameProvider, SessionState};

/// Aggregate counters for a decoding session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncDecoderStats {
    /// Messages handed to the caller.
    pub delivered: u64,
    /// Pull-step invocations.
    pub pulls: u64,
    /// `decode` calls that returned the transient timeout condition.
    pub timeouts: u64,
    /// Messages currently queued.
    pub queued: usize,
}

/// Synchronous pull decoder over a [`FrameProvider`].
///
/// Owns the decode FIFO and delegates lifecycle/stream handling to a
/// [`DecoderSession`]. Single-threaded: all calls must come from the
/// thread that owns the decoder.
pub struct SyncDecoder<P> {
    session: DecoderSession<P>,
    queue: VecDeque<DecoderOutputMessage>,
    delivered: u64,
    pulls: u64,
    timeouts: u64,
}

impl<P: FrameProvider> SyncDecoder<P> {
    pub fn new(provider: P, config: DecoderConfig) -> Self {
        Self {
            session: DecoderSession::new(provider, config),
            queue: VecDeque::new(),
            delivered: 0,
            pulls: 0,
            timeouts: 0,
        }
    }

    /// (Re)initialize the decoder: open the session and drop any
    /// queued messages. Must be called before the first `decode`.
    pub fn init(&mut self) -> Result<(), DecodeError> {
        self.session.open()?;
        self.queue.clear();
        Ok(())
    }

    /// Seek to `target`, dropping queued messages that no longer
    /// correspond to the new position.
    pub fn seek(&mut self, target: TimeStamp) -> Result<(), DecodeError> {
        self.session.seek(target)?;
        self.queue.clear();
        Ok(())
    }

    /// Produce the next decoded message, blocking for up to `timeout`.
    ///
    /// Outcomes:
    /// - `Ok(message)` — the oldest queued message, in decode order.
    /// - `Err(EndOfStream)` — source exhausted and queue drained;
    ///   terminal until [`init`](Self::init) or [`seek`](Self::seek).
    /// - `Err(TimedOut)` — nothing ready within the budget but the
    ///   source is not exhausted; retry. Note that this is also
    ///   reported when a pull made progress yet queued zero units
    ///   (e.g. metadata-only packets) — a known conflation of "real
    ///   timeout" and "empty progress".
    /// - any other error — hard fault from the pull step, propagated
    ///   verbatim; the end-of-stream flag is untouched and the caller
    ///   decides whether to seek or close.
    ///
    /// The pull step is invoked at most once per call, and only when
    /// the queue is empty.
    pub fn decode(&mut self, timeout: Duration) -> Result<DecoderOutputMessage, DecodeError> {
        if self.session.state() == SessionState::Uninitialized {
            return Err(DecodeError::NotInitialized);
        }
        if self.session.at_end() && self.queue.is_empty() {
            return Err(DecodeError::EndOfStream);
        }

        if self.queue.is_empty() {
            self.pulls += 1;
            for message in self.session.pull(timeout)? {
                self.push(message);
            }

            if self.queue.is_empty() {
                if self.session.at_end() {
                    return Err(DecodeError::EndOfStream);
                }
                trace!(?timeout, "decode queue empty after pull");
                self.timeouts += 1;
                return Err(DecodeError::TimedOut { budget: timeout });
            }
        }

        let message = self.queue.pop_front().expect("queue checked non-empty");
        self.delivered += 1;
        Ok(message)
    }

    /// [`decode`](Self::decode) with the configured default budget.
    pub fn decode_next(&mut self) -> Result<DecoderOutputMessage, DecodeError> {
        self.decode(self.session.config().default_timeout)
    }

    /// Close the underlying session and drop queued messages.
    pub fn close(&mut self) {
        self.session.close();
        self.queue.clear();
    }

    /// Enqueue a freshly decoded message at the tail of the FIFO.
    /// Internal: only the decode path feeds the queue.
    fn push(&mut self, message: DecoderOutputMessage) {
        self.queue.push_back(message);
    }

    /// Messages currently queued and undelivered.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// The underlying session (state, config, provider).
    pub fn session(&self) -> &DecoderSession<P> {
        &self.session
    }

    pub fn stats(&self) -> SyncDecoderStats {
        SyncDecoderStats {
            delivered: self.delivered,
            pulls: self.pulls,
            timeouts: self.timeouts,
            queued: self.queue.len(),
        }
    }

    pub fn reset_stats(&mut self) {
        self.delivered = 0;
        self.pulls = 0;
        self.timeouts = 0;
    }
}

impl<P> std::fmt::Debug for SyncDecoder<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncDecoder")
            .field("queued", &self.queue.len())
            .field("delivered", &self.delivered)
            .field("pulls", &self.pulls)
            .finish()
    }
}

// ── Tests ────────────────────────────────────────────────────────────
