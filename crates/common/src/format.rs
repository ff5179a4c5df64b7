//! Media format descriptions attached to decoded output messages.
//!
//! A decoded unit carries the format of its payload so that consumers
//! (frame samplers, resamplers) can interpret the raw bytes without
//! consulting the decoder again.

use serde::{Deserialize, Serialize};

use crate::types::Rational;

/// Broad stream classification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Audio,
    Video,
    Subtitle,
    Data,
}

/// Audio sample representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleFormat {
    U8,
    S16,
    S32,
    F32,
}

impl SampleFormat {
    /// Bytes per sample per channel.
    pub fn byte_width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::S16 => 2,
            Self::S32 | Self::F32 => 4,
        }
    }
}

/// Pixel layout of decoded video frames.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Planar YUV 4:2:0 (the common decoder default).
    Yuv420p,
    /// Semi-planar YUV 4:2:0 (Y plane + interleaved UV).
    Nv12,
    /// Packed 8-bit RGB.
    Rgb24,
    /// Packed 8-bit RGBA.
    Rgba8,
}

/// Format of a decoded audio payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub format: SampleFormat,
}

impl AudioFormat {
    /// Byte size of one interleaved sample frame (all channels).
    pub fn frame_byte_size(self) -> usize {
        self.channels as usize * self.format.byte_width()
    }
}

/// Format of a decoded video payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoFormat {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub fps: Rational,
}

impl VideoFormat {
    /// Byte size of one frame in this format.
    pub fn frame_byte_size(self) -> usize {
        let pixels = self.width as usize * self.height as usize;
        match self.format {
            PixelFormat::Yuv420p | PixelFormat::Nv12 => pixels + pixels / 2,
            PixelFormat::Rgb24 => pixels * 3,
            PixelFormat::Rgba8 => pixels * 4,
        }
    }
}

/// Format description carried by every decoded output message.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MediaFormat {
    Audio(AudioFormat),
    Video(VideoFormat),
}

impl MediaFormat {
    pub fn media_type(self) -> MediaType {
        match self {
            Self::Audio(_) => MediaType::Audio,
            Self::Video(_) => MediaType::Video,
        }
    }

    pub fn is_video(self) -> bool {
        matches!(self, Self::Video(_))
    }

    pub fn is_audio(self) -> bool {
        matches!(self, Self::Audio(_))
    }
}
