//! Decoded output messages — one decoded unit plus its metadata.

use std::fmt;

use syncpipe_common::{MediaFormat, StreamIndex, TimeStamp};

use crate::storage::{ByteStorage, VectorByteStorage};

/// Timing and format metadata for one decoded unit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MessageHeader {
    /// Stream this unit was decoded from.
    pub stream: StreamIndex,
    /// Presentation timestamp.
    pub pts: TimeStamp,
    /// Duration of the unit.
    pub duration: TimeStamp,
    /// Whether this unit is a keyframe (IDR for H.264 video).
    pub key_frame: bool,
    /// Payload format description.
    pub format: MediaFormat,
}

/// One decoded unit (a frame, or a batch of audio samples) moving
/// through the pipeline.
///
/// A message exclusively owns its payload storage. It is moved, never
/// cloned, between the pull step, the decode FIFO, and the caller;
/// handing a message to the caller transfers responsibility for the
/// storage, which can be recycled with
/// [`ByteStorage::clear`](crate::storage::ByteStorage::clear).
pub struct DecoderOutputMessage {
    pub header: MessageHeader,
    pub payload: Box<dyn ByteStorage>,
}

impl DecoderOutputMessage {
    pub fn new(header: MessageHeader, payload: Box<dyn ByteStorage>) -> Self {
        Self { header, payload }
    }

    /// Message with the payload bytes copied into fresh owning storage.
    pub fn with_bytes(header: MessageHeader, bytes: &[u8]) -> Self {
        let mut payload = VectorByteStorage::with_capacity(bytes.len());
        payload.put(bytes);
        Self {
            header,
            payload: Box::new(payload),
        }
    }

    /// Valid payload bytes.
    pub fn bytes(&self) -> &[u8] {
        self.payload.data()
    }

    /// Valid payload byte count.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl fmt::Debug for DecoderOutputMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderOutputMessage")
            .field("stream", &self.header.stream)
            .field("pts", &self.header.pts)
            .field("duration", &self.header.duration)
            .field("key_frame", &self.header.key_frame)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

// ── Tests ────────────────────────────────────────────────────────────
