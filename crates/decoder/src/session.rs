//! Decoder session — the base lifecycle state machine.
//!
//! A [`DecoderSession`] owns stream selection, seeking, and the
//! init/pull/shutdown lifecycle. It delegates codec work to a
//! [`FrameProvider`] (the demuxer/codec collaborator) and payload
//! allocation to [`ByteStorage`](crate::storage::ByteStorage).
//!
//! Lifecycle:
//!
//! ```text
//! Uninitialized ──open()──▶ Running ──provider drained──▶ EndOfStream
//!        ▲                     ▲                              │
//!        │                     └───────── seek() ◀────────────┘
//!        └──────────────────── close() ──▶ Closed (terminal)
//! ```
//!
//! Hard provider errors do not change state: the session stays
//! `Running` and the caller decides whether to retry, seek, or close.

use std::time::Duration;

use tracing::{info, trace, warn};

use syncpipe_common::{DecodeError, DecoderConfig, TimeStamp};

use crate::message::DecoderOutputMessage;
use crate::storage::{ByteStorage, VectorByteStorage};

/// Outcome of one pull-step invocation.
///
/// Hard errors travel on the `Err` side of the provider's `Result`;
/// these variants cover the non-error upstream signals.
#[derive(Debug)]
pub enum PullOutcome {
    /// Zero or more decoded units were produced, in decode order.
    Produced(Vec<DecoderOutputMessage>),
    /// The upstream source is exhausted; no further data will come.
    Drained,
    /// Nothing became ready within the budget; the source is not
    /// known to be exhausted.
    NotReady,
}

/// The codec-specific pull step (external collaborator).
///
/// Implementations drive the actual demux/decode work: one `pull`
/// attempts to produce the next decoded unit(s) from the source within
/// the given budget, blocking the calling thread at most that long.
pub trait FrameProvider {
    /// Attempt to produce the next decoded unit(s).
    fn pull(&mut self, budget: Duration) -> Result<PullOutcome, DecodeError>;

    /// Reposition the source to the nearest decodable point at or
    /// before `target`.
    fn seek(&mut self, target: TimeStamp) -> Result<(), DecodeError>;
}

/// Lifecycle state of a decoder session.
///
/// `EndOfStream` is the session's end-of-stream flag: it is entered
/// when the provider reports [`PullOutcome::Drained`], sticks until
/// `open()` or `seek()`, and gates further pull attempts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Running,
    EndOfStream,
    Closed,
}

/// Base decoder state machine over a [`FrameProvider`].
///
/// # Thread safety
///
/// Purely synchronous and single-threaded: a session is owned by one
/// decoding thread and must not be shared. Cancellation is expressed
/// only through the per-pull budget.
pub struct DecoderSession<P> {
    provider: P,
    config: DecoderConfig,
    state: SessionState,
    /// Units dropped by the stream filter since open.
    filtered: u64,
}

impl<P: FrameProvider> DecoderSession<P> {
    /// Create a session in the `Uninitialized` state.
    pub fn new(provider: P, config: DecoderConfig) -> Self {
        Self {
            provider,
            config,
            state: SessionState::Uninitialized,
            filtered: 0,
        }
    }

    /// Enter (or re-enter) the `Running` state.
    ///
    /// Safe to call repeatedly; each call resets the end-of-stream
    /// flag. Fails with [`DecodeError::SessionClosed`] once the
    /// session has been closed.
    pub fn open(&mut self) -> Result<(), DecodeError> {
        if self.state == SessionState::Closed {
            return Err(DecodeError::SessionClosed);
        }
        info!(streams = ?self.config.streams, "decoder session opened");
        self.state = SessionState::Running;
        self.filtered = 0;
        Ok(())
    }

    /// Seek the source and re-enter `Running` at the new position.
    ///
    /// Legal from `Running` and `EndOfStream` (a drained session can
    /// be rewound). Hard seek errors propagate and leave the state
    /// unchanged.
    pub fn seek(&mut self, target: TimeStamp) -> Result<(), DecodeError> {
        match self.state {
            SessionState::Uninitialized => return Err(DecodeError::NotInitialized),
            SessionState::Closed => return Err(DecodeError::SessionClosed),
            SessionState::Running | SessionState::EndOfStream => {}
        }
        self.provider.seek(target)?;
        info!(%target, "decoder session seeked");
        self.state = SessionState::Running;
        Ok(())
    }

    /// Invoke the pull step once, bounded by `budget`.
    ///
    /// Returns the units that passed the stream filter, in decode
    /// order. An empty vector means either `NotReady` or that the
    /// session just transitioned to `EndOfStream` (check
    /// [`at_end`](Self::at_end)). Hard errors propagate verbatim
    /// without touching the state.
    pub fn pull(&mut self, budget: Duration) -> Result<Vec<DecoderOutputMessage>, DecodeError> {
        match self.state {
            SessionState::Uninitialized => return Err(DecodeError::NotInitialized),
            SessionState::Closed => return Err(DecodeError::SessionClosed),
            SessionState::EndOfStream => return Ok(Vec::new()),
            SessionState::Running => {}
        }

        match self.provider.pull(budget) {
            Ok(PullOutcome::Produced(units)) => {
                let produced = units.len();
                let selected: Vec<_> = units
                    .into_iter()
                    .filter(|m| self.config.streams.contains(m.header.stream))
                    .collect();
                let dropped = produced - selected.len();
                if dropped > 0 {
                    self.filtered += dropped as u64;
                    trace!(dropped, "units dropped by stream filter");
                }
                Ok(selected)
            }
            Ok(PullOutcome::Drained) => {
                info!("source drained, session at end of stream");
                self.state = SessionState::EndOfStream;
                Ok(Vec::new())
            }
            Ok(PullOutcome::NotReady) => Ok(Vec::new()),
            Err(e) => {
                warn!(error = %e, "pull step failed");
                Err(e)
            }
        }
    }

    /// Close the session. Terminal; every later operation fails with
    /// [`DecodeError::SessionClosed`].
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }

    /// Allocate payload storage for the pull step.
    ///
    /// Alternate backends (pooled buffers) can bypass this and hand
    /// any [`ByteStorage`] implementation to a message.
    pub fn create_byte_storage(&self, n: usize) -> Box<dyn ByteStorage> {
        VectorByteStorage::boxed(n.max(self.config.initial_buffer_capacity))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True once the source has been drained (until re-open/seek).
    pub fn at_end(&self) -> bool {
        self.state == SessionState::EndOfStream
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Units dropped by the stream filter since the session opened.
    pub fn filtered_count(&self) -> u64 {
        self.filtered
    }

    /// The underlying pull step.
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P> std::fmt::Debug for DecoderSession<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderSession")
            .field("state", &self.state)
            .field("streams", &self.config.streams)
            .field("filtered", &self.filtered)
            .finish()
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{audio_message, video_message, ScriptedProvider};
    use syncpipe_common::{StreamIndex, StreamSelection};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    // ── Lifecycle ────────────────────────────────────────────────

    #[test]
    fn new_session_is_uninitialized() {
        let session = DecoderSession::new(ScriptedProvider::default(), DecoderConfig::default());
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(!session.at_end());
    }

    #[test]
    fn pull_before_open_fails() {
        let mut session =
            DecoderSession::new(ScriptedProvider::default(), DecoderConfig::default());
        let err = session.pull(ms(10)).unwrap_err();
        assert!(matches!(err, DecodeError::NotInitialized));
    }

    #[test]
    fn seek_before_open_fails() {
        let mut session =
            DecoderSession::new(ScriptedProvider::default(), DecoderConfig::default());
        let err = session.seek(TimeStamp::ZERO).unwrap_err();
        assert!(matches!(err, DecodeError::NotInitialized));
    }

    #[test]
    fn open_enters_running() {
        let mut session =
            DecoderSession::new(ScriptedProvider::default(), DecoderConfig::default());
        session.open().unwrap();
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn open_is_repeatable() {
        let mut session =
            DecoderSession::new(ScriptedProvider::default(), DecoderConfig::default());
        session.open().unwrap();
        session.open().unwrap();
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn closed_session_rejects_everything() {
        let mut session =
            DecoderSession::new(ScriptedProvider::default(), DecoderConfig::default());
        session.open().unwrap();
        session.close();

        assert!(matches!(session.open(), Err(DecodeError::SessionClosed)));
        assert!(matches!(
            session.seek(TimeStamp::ZERO),
            Err(DecodeError::SessionClosed)
        ));
        assert!(matches!(
            session.pull(ms(10)),
            Err(DecodeError::SessionClosed)
        ));
    }

    // ── Pull outcomes ────────────────────────────────────────────

    #[test]
    fn drained_enters_end_of_stream() {
        let provider = ScriptedProvider::with_script(vec![Ok(PullOutcome::Drained)]);
        let mut session = DecoderSession::new(provider, DecoderConfig::default());
        session.open().unwrap();

        let units = session.pull(ms(10)).unwrap();
        assert!(units.is_empty());
        assert!(session.at_end());
        assert_eq!(session.state(), SessionState::EndOfStream);
    }

    #[test]
    fn pull_at_end_does_not_invoke_provider() {
        let provider = ScriptedProvider::with_script(vec![Ok(PullOutcome::Drained)]);
        let mut session = DecoderSession::new(provider, DecoderConfig::default());
        session.open().unwrap();

        session.pull(ms(10)).unwrap();
        session.pull(ms(10)).unwrap();
        session.pull(ms(10)).unwrap();
        // Only the pull that observed Drained reached the provider.
        assert_eq!(session.provider.pulls(), 1);
    }

    #[test]
    fn hard_error_leaves_state_running() {
        let provider = ScriptedProvider::with_script(vec![
            Err(DecodeError::Codec {
                reason: "corrupt packet".into(),
            }),
            Ok(PullOutcome::Produced(vec![video_message(0, 0)])),
        ]);
        let mut session = DecoderSession::new(provider, DecoderConfig::default());
        session.open().unwrap();

        let err = session.pull(ms(10)).unwrap_err();
        assert!(matches!(err, DecodeError::Codec { .. }));
        assert_eq!(session.state(), SessionState::Running);

        // The session is still usable after a hard error.
        let units = session.pull(ms(10)).unwrap();
        assert_eq!(units.len(), 1);
    }

    #[test]
    fn not_ready_reports_empty_batch() {
        let provider = ScriptedProvider::with_script(vec![Ok(PullOutcome::NotReady)]);
        let mut session = DecoderSession::new(provider, DecoderConfig::default());
        session.open().unwrap();

        let units = session.pull(ms(10)).unwrap();
        assert!(units.is_empty());
        assert!(!session.at_end());
    }

    // ── Seek ─────────────────────────────────────────────────────

    #[test]
    fn seek_clears_end_of_stream() {
        let provider = ScriptedProvider::with_script(vec![Ok(PullOutcome::Drained)]);
        let mut session = DecoderSession::new(provider, DecoderConfig::default());
        session.open().unwrap();
        session.pull(ms(10)).unwrap();
        assert!(session.at_end());

        session.seek(TimeStamp::from_millis(500)).unwrap();
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(
            session.provider.last_seek(),
            Some(TimeStamp::from_millis(500))
        );
    }

    #[test]
    fn failed_seek_preserves_state() {
        let mut provider = ScriptedProvider::default();
        provider.fail_seeks("unseekable source");
        let mut session = DecoderSession::new(provider, DecoderConfig::default());
        session.open().unwrap();

        let err = session.seek(TimeStamp::from_millis(100)).unwrap_err();
        assert!(matches!(err, DecodeError::Seek { .. }));
        assert_eq!(session.state(), SessionState::Running);
    }

    // ── Stream selection ─────────────────────────────────────────

    #[test]
    fn stream_filter_drops_unselected_units() {
        let provider = ScriptedProvider::with_script(vec![Ok(PullOutcome::Produced(vec![
            video_message(0, 0),
            audio_message(1, 0),
            video_message(0, 33),
        ]))]);
        let config = DecoderConfig {
            streams: StreamSelection::Only(vec![StreamIndex(0)]),
            ..DecoderConfig::default()
        };
        let mut session = DecoderSession::new(provider, config);
        session.open().unwrap();

        let units = session.pull(ms(10)).unwrap();
        assert_eq!(units.len(), 2);
        assert!(units.iter().all(|m| m.header.stream == StreamIndex(0)));
        assert_eq!(session.filtered_count(), 1);
    }

    #[test]
    fn select_all_keeps_every_stream() {
        let provider = ScriptedProvider::with_script(vec![Ok(PullOutcome::Produced(vec![
            video_message(0, 0),
            audio_message(1, 0),
        ]))]);
        let mut session = DecoderSession::new(provider, DecoderConfig::default());
        session.open().unwrap();

        let units = session.pull(ms(10)).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(session.filtered_count(), 0);
    }

    // ── Storage factory ──────────────────────────────────────────

    #[test]
    fn storage_factory_honours_capacity_hint() {
        let session = DecoderSession::new(ScriptedProvider::default(), DecoderConfig::default());

        let small = session.create_byte_storage(16);
        assert!(small.tail() >= session.config().initial_buffer_capacity);

        let large = session.create_byte_storage(1 << 20);
        assert!(large.tail() >= 1 << 20);
    }

    // ── Debug ────────────────────────────────────────────────────

    #[test]
    fn debug_format() {
        let session = DecoderSession::new(ScriptedProvider::default(), DecoderConfig::default());
        let dbg = format!("{session:?}");
        assert!(dbg.contains("DecoderSession"));
        assert!(dbg.contains("Uninitialized"));
    }
}
