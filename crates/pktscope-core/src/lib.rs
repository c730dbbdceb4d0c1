//! pktscope core library: zero-copy decoding of captured Ethernet frames.
//!
//! A frame is walked layer by layer (Ethernet, then IPv4 or ARP, then TCP,
//! UDP or ICMP). Every decoded header borrows the caller's buffer; nothing
//! is copied and nothing panics, whatever the input. Decoding stops at the
//! first layer that is too short, malformed or not supported, and the
//! layers decoded so far stay available together with the reason.
//!
//! Around the decoder sit a protocol registry (`EtherType`, `Protocol`), the
//! RFC 1071 checksum, one-line rendering of each layer, frame sources
//! (PCAP/PCAPNG files, in-memory queues) and an analysis step that folds a
//! whole capture into a serializable `CaptureReport`. All I/O stays in
//! `source`.
//!
//! # Examples
//! ```
//! use pktscope_core::{DecodeStatus, LayerKind, decode};
//!
//! // Ethernet header announcing ARP, followed by nothing.
//! let mut frame = vec![0xff; 12];
//! frame.extend_from_slice(&[0x08, 0x06]);
//! let result = decode(&frame);
//! assert_eq!(result.layers().map(|l| l.kind()).collect::<Vec<_>>(), [LayerKind::Ethernet]);
//! assert!(matches!(result.status(), DecodeStatus::Truncated(_)));
//! ```
//!
//! ```no_run
//! use std::path::Path;
//!
//! use pktscope_core::analyze_capture_file;
//!
//! let report = analyze_capture_file(Path::new("capture.pcapng"))?;
//! println!("{} frames", report.frames.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod analysis;
mod checksum;
mod pipeline;
mod protocols;
mod registry;
mod render;
mod source;

pub use analysis::{AnalysisError, AnalyzeOptions, analyze_capture_file, analyze_source};
pub use checksum::{internet_checksum, verify_ipv4_header};
pub use pipeline::{
    DecodeResult, DecodeStatus, DecodedLayer, NetworkLayer, TransportLayer, Truncation,
    Unsupported, decode,
};
pub use protocols::LayerKind;
pub use protocols::arp::ArpMessage;
pub use protocols::error::{DecodeError, MalformedReason, StopReason};
pub use protocols::ethernet::{EthernetFrame, MacAddr};
pub use protocols::icmp::IcmpHeader;
pub use protocols::ipv4::Ipv4Header;
pub use protocols::tcp::TcpHeader;
pub use protocols::udp::UdpHeader;
pub use registry::{EtherType, Protocol};
pub use source::{
    CancelToken, FrameSource, MAX_FRAME_LEN, MemorySource, PcapFileSource, RawFrame, SourceError,
    for_each_frame,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Decoded capture with per-frame summaries and totals.
///
/// # Examples
/// ```
/// use pktscope_core::make_report;
///
/// let report = make_report("capture.pcap", 24);
/// assert_eq!(report.report_version, pktscope_core::REPORT_VERSION);
/// assert!(report.frames.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 time of the last frame, or the epoch when no frame had one.
    pub generated_at: String,
    pub input: InputInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Decoded frames in capture order; non-Ethernet frames are left out.
    pub frames: Vec<FrameSummary>,
    pub stats: DecodeStats,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use pktscope_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "pktscope".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "pktscope");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input capture metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes, 0 when the path is not a file.
    pub bytes: u64,
}

/// Basic capture summary (timestamps may be absent).
///
/// # Examples
/// ```
/// use pktscope_core::CaptureSummary;
///
/// let summary = CaptureSummary {
///     frames_total: 10,
///     time_start: None,
///     time_end: None,
///     limit_reached: false,
/// };
/// assert_eq!(summary.frames_total, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    /// Frames read from the source, skipped ones included.
    pub frames_total: u64,
    /// RFC3339 timestamp of the earliest frame (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the latest frame (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
    /// Reading stopped at the frame limit.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub limit_reached: bool,
}

/// One decoded frame.
///
/// # Examples
/// ```
/// use pktscope_core::{FrameSummary, LayerKind, LayerSummary, StopReason};
///
/// let frame = FrameSummary {
///     index: 0,
///     ts: None,
///     length: 14,
///     layers: vec![LayerSummary {
///         kind: LayerKind::Ethernet,
///         summary: "Ethernet: ...".to_string(),
///     }],
///     status: "truncated".to_string(),
///     reason: Some(StopReason::UnsupportedLayer),
///     detail: Some("truncated: unhandled EtherType 0x86dd (IPv6)".to_string()),
///     ipv4_checksum_ok: None,
/// };
/// assert_eq!(frame.layers.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSummary {
    /// Zero-based position in the capture.
    pub index: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    /// Captured length in bytes.
    pub length: u64,
    pub layers: Vec<LayerSummary>,
    /// `complete`, `truncated` or `invalid_first_layer`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<StopReason>,
    /// Human-readable stop message when not complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// IPv4 header checksum verdict, when an IPv4 layer was decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4_checksum_ok: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSummary {
    pub kind: LayerKind,
    /// Rendered one-line form of the layer.
    pub summary: String,
}

/// Totals over the decoded frames.
///
/// Map keys are sorted: layer kinds by stack order, EtherTypes as
/// `0x....`, protocols as `number (name)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecodeStats {
    pub complete: u64,
    pub truncated: u64,
    pub invalid_first_layer: u64,
    pub ipv4_checksum_failures: u64,
    pub non_ethernet_skipped: u64,
    /// Number of frames each layer kind was decoded in.
    pub layers: BTreeMap<LayerKind, u64>,
    pub unsupported_ether_types: BTreeMap<String, u64>,
    pub unsupported_protocols: BTreeMap<String, u64>,
}

/// Build a report with base fields filled and no frames.
///
/// # Examples
/// ```
/// use pktscope_core::make_report;
///
/// let report = make_report("capture.pcapng", 123);
/// assert_eq!(report.tool.name, "pktscope");
/// assert_eq!(report.input.bytes, 123);
/// assert_eq!(report.stats.complete, 0);
/// ```
pub fn make_report(input_path: &str, input_bytes: u64) -> CaptureReport {
    CaptureReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "pktscope".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        capture_summary: None,
        frames: Vec::new(),
        stats: DecodeStats::default(),
    }
}
