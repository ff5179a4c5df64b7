//! Configuration structs for decoder sessions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::StreamIndex;

/// Which demuxed streams a decoder session delivers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamSelection {
    /// Deliver every stream the source produces.
    #[default]
    All,
    /// Deliver only the listed streams; units from other streams are
    /// dropped at the session boundary.
    Only(Vec<StreamIndex>),
}

impl StreamSelection {
    pub fn contains(&self, stream: StreamIndex) -> bool {
        match self {
            Self::All => true,
            Self::Only(streams) => streams.contains(&stream),
        }
    }
}

/// Decoder session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Stream filter applied to every pull.
    pub streams: StreamSelection,
    /// Initial capacity hint for payload byte storage.
    pub initial_buffer_capacity: usize,
    /// Budget used by `decode_next()` when the caller does not pass
    /// an explicit per-call timeout.
    pub default_timeout: Duration,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            streams: StreamSelection::All,
            initial_buffer_capacity: 4096,
            default_timeout: Duration::from_secs(1),
        }
    }
}
