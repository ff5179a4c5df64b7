//! `syncpipe-common` — Shared types, formats, and errors for the SyncPipe decode pipeline.
//!
//! This crate is the foundation the decoder crate depends on.
//! It defines the core abstractions:
//!
//! - **Types**: `TimeStamp`, `StreamIndex`, `Rational` (newtypes for safety)
//! - **Formats**: `MediaFormat`, `AudioFormat`, `VideoFormat` (payload descriptions)
//! - **Errors**: `DecodeError` (thiserror-based status taxonomy)
//! - **Config**: `DecoderConfig`, `StreamSelection`

pub mod config;
pub mod error;
pub mod format;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{DecoderConfig, StreamSelection};
pub use error::{DecodeError, DecodeResult};
pub use format::{AudioFormat, MediaFormat, MediaType, PixelFormat, SampleFormat, VideoFormat};
pub use types::{Rational, StreamIndex, TimeStamp};
