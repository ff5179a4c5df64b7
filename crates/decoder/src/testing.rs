//! Shared test fixtures: a scriptable pull step and message builders.

use std::collections::VecDeque;
use std::time::Duration;

use syncpipe_common::{
    AudioFormat, DecodeError, MediaFormat, PixelFormat, Rational, SampleFormat, StreamIndex,
    TimeStamp, VideoFormat,
};

use crate::message::{DecoderOutputMessage, MessageHeader};
use crate::session::{FrameProvider, PullOutcome};

/// A [`FrameProvider`] that replays a pre-recorded script of pull
/// outcomes and records how it was driven.
///
/// An exhausted script answers [`PullOutcome::NotReady`], so tests
/// only script the calls they care about.
#[derive(Default)]
pub struct ScriptedProvider {
    script: VecDeque<Result<PullOutcome, DecodeError>>,
    pulls: usize,
    last_seek: Option<TimeStamp>,
    seek_failure: Option<String>,
}

impl ScriptedProvider {
    pub fn with_script(script: Vec<Result<PullOutcome, DecodeError>>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    /// Make every subsequent `seek` fail with the given reason.
    pub fn fail_seeks(&mut self, reason: &str) {
        self.seek_failure = Some(reason.to_string());
    }

    /// Number of `pull` calls observed.
    pub fn pulls(&self) -> usize {
        self.pulls
    }

    /// Target of the most recent `seek`, if any.
    pub fn last_seek(&self) -> Option<TimeStamp> {
        self.last_seek
    }
}

impl FrameProvider for ScriptedProvider {
    fn pull(&mut self, _budget: Duration) -> Result<PullOutcome, DecodeError> {
        self.pulls += 1;
        self.script.pop_front().unwrap_or(Ok(PullOutcome::NotReady))
    }

    fn seek(&mut self, target: TimeStamp) -> Result<(), DecodeError> {
        if let Some(reason) = &self.seek_failure {
            return Err(DecodeError::Seek {
                target,
                reason: reason.clone(),
            });
        }
        self.last_seek = Some(target);
        Ok(())
    }
}

/// A video message on `stream` with the pts encoded in the payload
/// (so ordering tests can identify messages by content too).
pub fn video_message(stream: u32, pts_ms: i64) -> DecoderOutputMessage {
    let header = MessageHeader {
        stream: StreamIndex(stream),
        pts: TimeStamp::from_millis(pts_ms),
        duration: TimeStamp::from_millis(33),
        key_frame: pts_ms == 0,
        format: MediaFormat::Video(VideoFormat {
            width: 16,
            height: 16,
            format: PixelFormat::Yuv420p,
            fps: Rational::FPS_30,
        }),
    };
    DecoderOutputMessage::with_bytes(header, &pts_ms.to_le_bytes())
}

/// An audio message on `stream`.
pub fn audio_message(stream: u32, pts_ms: i64) -> DecoderOutputMessage {
    let header = MessageHeader {
        stream: StreamIndex(stream),
        pts: TimeStamp::from_millis(pts_ms),
        duration: TimeStamp::from_millis(21),
        key_frame: true,
        format: MediaFormat::Audio(AudioFormat {
            sample_rate: 48_000,
            channels: 2,
            format: SampleFormat::S16,
        }),
    };
    DecoderOutputMessage::with_bytes(header, &pts_ms.to_le_bytes())
}
