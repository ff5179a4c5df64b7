//! `syncpipe-decoder` — Synchronous media decode pipeline.
//!
//! Pulls compressed units from a demuxed source, drives a stateful
//! decoder session, manages growable payload storage, and exposes
//! decoded frames through a timeout-aware FIFO to a single-threaded
//! consumer.
//!
//! # Architecture
//!
//! ```text
//! FrameProvider (demuxer/codec) ──▶ DecoderSession ──▶ SyncDecoder FIFO ──▶ caller
//!                                      │
//!                                      └── ByteStorage (payload buffers)
//! ```
//!
//! ## Module Overview
//!
//! - [`storage`] — Growable byte buffers for decoded payloads
//!   - [`storage::ByteStorage`] — capability trait
//!   - [`storage::VectorByteStorage`] — default owning backend
//! - [`message`] — `DecoderOutputMessage`: one decoded unit + metadata
//! - [`session`] — Lifecycle state machine and the `FrameProvider` seam
//! - [`sync`] — `SyncDecoder`: the synchronous pull surface
//!
//! ## Usage
//!
//! ```ignore
//! use std::time::Duration;
//! use syncpipe_common::DecoderConfig;
//! use syncpipe_decoder::sync::SyncDecoder;
//!
//! let mut decoder = SyncDecoder::new(my_provider, DecoderConfig::default());
//! decoder.init()?;
//! loop {
//!     match decoder.decode(Duration::from_millis(100)) {
//!         Ok(frame) => consume(frame),
//!         Err(e) if e.is_recoverable() => continue,
//!         Err(e) if e.is_end_of_stream() => break,
//!         Err(e) => return Err(e),
//!     }
//! }
//! ```

pub mod message;
pub mod session;
pub mod storage;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

pub use message::{DecoderOutputMessage, MessageHeader};
pub use session::{DecoderSession, FrameProvider, PullOutcome, SessionState};
pub use storage::{ByteStorage, Region, VectorByteStorage};
pub use sync::{SyncDecoder, SyncDecoderStats};
