//! Frame sources feeding the decoder.
//!
//! A source yields one owned frame per call until it is exhausted. Sources
//! do all the I/O; the decoder only ever borrows a frame's bytes.

mod pcap;

pub use pcap::PcapFileSource;

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pcap_parser::Linktype;
use thiserror::Error;

/// Largest frame handed to the decoder; longer captures are cut to this.
pub const MAX_FRAME_LEN: usize = 65536;

/// One captured frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    /// Capture time in seconds since the Unix epoch, when known.
    pub ts: Option<f64>,
    pub linktype: Linktype,
    pub data: Vec<u8>,
}

impl RawFrame {
    /// Copy `bytes` into a frame, keeping at most `MAX_FRAME_LEN` of them.
    pub fn from_captured(ts: Option<f64>, linktype: Linktype, bytes: &[u8]) -> Self {
        let len = bytes.len().min(MAX_FRAME_LEN);
        if len < bytes.len() {
            log::debug!("frame of {} bytes cut to {MAX_FRAME_LEN}", bytes.len());
        }
        Self {
            ts,
            linktype,
            data: bytes[..len].to_vec(),
        }
    }

    /// An Ethernet frame without timestamp.
    pub fn ethernet(bytes: &[u8]) -> Self {
        Self::from_captured(None, Linktype::ETHERNET, bytes)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

pub trait FrameSource {
    /// Next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<RawFrame>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PCAP parse error: {0}")]
    Pcap(String),
}

impl From<pcap::error::PcapSourceError> for SourceError {
    fn from(value: pcap::error::PcapSourceError) -> Self {
        match value {
            pcap::error::PcapSourceError::Io(err) => SourceError::Io(err),
            err @ pcap::error::PcapSourceError::UnknownFormat { .. } => {
                SourceError::Pcap(err.to_string())
            }
            pcap::error::PcapSourceError::Pcap { context, message } => {
                SourceError::Pcap(format!("{context}: {message}"))
            }
        }
    }
}

/// Frames held in memory, yielded in insertion order.
#[derive(Debug, Default)]
pub struct MemorySource {
    frames: VecDeque<RawFrame>,
}

impl MemorySource {
    pub fn new(frames: impl IntoIterator<Item = RawFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn push(&mut self, frame: RawFrame) {
        self.frames.push_back(frame);
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> Result<Option<RawFrame>, SourceError> {
        Ok(self.frames.pop_front())
    }
}

/// Shared stop flag for a frame loop. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Pull frames from `source` until it is exhausted or `cancel` is set.
///
/// The token is checked before every read, so a callback that cancels
/// stops the loop before the next frame. Returns the number of frames
/// handed to `on_frame`.
pub fn for_each_frame<S, F>(
    source: &mut S,
    cancel: &CancelToken,
    mut on_frame: F,
) -> Result<u64, SourceError>
where
    S: FrameSource + ?Sized,
    F: FnMut(u64, &RawFrame),
{
    let mut index = 0u64;
    while !cancel.is_cancelled() {
        let Some(frame) = source.next_frame()? else {
            break;
        };
        on_frame(index, &frame);
        index += 1;
    }
    if cancel.is_cancelled() {
        log::debug!("frame loop cancelled after {index} frame(s)");
    }
    Ok(index)
}
