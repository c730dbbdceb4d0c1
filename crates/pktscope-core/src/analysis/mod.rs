//! Capture analysis: drive a frame source through the decoder and fold the
//! results into a `CaptureReport`.

use std::path::Path;

use pcap_parser::Linktype;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::pipeline::decode;
use crate::source::{CancelToken, FrameSource, PcapFileSource, RawFrame, SourceError, for_each_frame};
use crate::{CaptureReport, CaptureSummary, DEFAULT_GENERATED_AT, FrameSummary, LayerSummary, make_report};

mod stats;

use stats::StatsBuilder;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Knobs for a single analysis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzeOptions {
    /// Stop after this many frames have been read.
    pub limit: Option<u64>,
}

/// Analyze a PCAP or PCAPNG file with default options.
///
/// # Errors
/// Fails when the file cannot be opened, is not a capture, or is cut in the
/// middle of a record.
pub fn analyze_capture_file(path: &Path) -> Result<CaptureReport, AnalysisError> {
    let mut source = PcapFileSource::open(path)?;
    analyze_source(path, &mut source, &AnalyzeOptions::default())
}

/// Analyze every frame `source` yields, up to `options.limit`.
///
/// `path` only labels the report; its size is recorded when it exists on
/// disk. Frames whose link type is not Ethernet are counted and skipped.
pub fn analyze_source<S>(
    path: &Path,
    source: &mut S,
    options: &AnalyzeOptions,
) -> Result<CaptureReport, AnalysisError>
where
    S: FrameSource + ?Sized,
{
    let cancel = CancelToken::new();
    if options.limit == Some(0) {
        cancel.cancel();
    }

    let mut first_ts = None;
    let mut last_ts = None;
    let mut frames = Vec::new();
    let mut stats = StatsBuilder::default();

    let frames_total = for_each_frame(source, &cancel, |index, frame| {
        update_ts_bounds(&mut first_ts, &mut last_ts, frame.ts);
        if let Some(summary) = summarize_frame(index, frame, &mut stats) {
            frames.push(summary);
        }
        if options.limit.is_some_and(|limit| index + 1 >= limit) {
            cancel.cancel();
        }
    })?;

    let input_bytes = match path.metadata() {
        Ok(metadata) => metadata.len(),
        Err(err) => {
            log::debug!("no size for {}: {err}", path.display());
            0
        }
    };

    let mut report = make_report(&path.display().to_string(), input_bytes);
    report.capture_summary = Some(CaptureSummary {
        frames_total,
        time_start: ts_to_rfc3339(first_ts),
        time_end: ts_to_rfc3339(last_ts),
        limit_reached: cancel.is_cancelled(),
    });
    report.generated_at = report
        .capture_summary
        .as_ref()
        .and_then(|summary| summary.time_end.clone().or(summary.time_start.clone()))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.frames = frames;
    report.stats = stats.finish();
    Ok(report)
}

fn summarize_frame(index: u64, frame: &RawFrame, stats: &mut StatsBuilder) -> Option<FrameSummary> {
    if frame.linktype != Linktype::ETHERNET {
        log::debug!("frame {index}: skipping linktype {}", frame.linktype.0);
        stats.record_skipped();
        return None;
    }

    let result = decode(&frame.data);
    let status = result.status();
    let ipv4_checksum_ok = result.ipv4().map(|ip| ip.checksum_valid());
    if ipv4_checksum_ok == Some(false) {
        log::warn!("frame {index}: IPv4 header checksum mismatch");
    }

    let layers = result
        .layers()
        .map(|layer| LayerSummary {
            kind: layer.kind(),
            summary: layer.render(),
        })
        .collect::<Vec<_>>();
    stats.record(&status, layers.iter().map(|layer| layer.kind), ipv4_checksum_ok);

    Some(FrameSummary {
        index,
        ts: ts_to_rfc3339(frame.ts),
        length: frame.len() as u64,
        layers,
        status: status.label().to_string(),
        reason: status.reason(),
        detail: (!status.is_complete()).then(|| status.to_string()),
        ipv4_checksum_ok,
    })
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let Some(ts) = ts else {
        return;
    };
    if first.is_none_or(|existing| ts < existing) {
        *first = Some(ts);
    }
    if last.is_none_or(|existing| ts > existing) {
        *last = Some(ts);
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pcap_parser::Linktype;

    use super::{AnalyzeOptions, analyze_source, ts_to_rfc3339, update_ts_bounds};
    use crate::protocols::LayerKind;
    use crate::protocols::error::StopReason;
    use crate::source::{MemorySource, RawFrame};

    fn udp_frame() -> Vec<u8> {
        let mut frame = vec![0u8; 14];
        frame[12..14].copy_from_slice(&0x0800u16.to_be_bytes());
        let mut ip = [
            0x45, 0x00, 0x00, 0x1c, 0x00, 0x01, 0x00, 0x00, 0x40, 0x11, 0x00, 0x00, 10, 0, 0, 1,
            10, 0, 0, 2,
        ];
        let checksum = crate::checksum::internet_checksum(&ip);
        ip[10..12].copy_from_slice(&checksum.to_be_bytes());
        frame.extend_from_slice(&ip);
        frame.extend_from_slice(&[0x30, 0x39, 0x00, 0x35, 0x00, 0x08, 0x00, 0x00]);
        frame
    }

    #[test]
    fn counts_statuses_and_layers() {
        let mut bad_checksum = udp_frame();
        bad_checksum[24] ^= 0xff;
        let mut source = MemorySource::new([
            RawFrame::from_captured(Some(1.0), Linktype::ETHERNET, &udp_frame()),
            RawFrame::from_captured(Some(2.0), Linktype::ETHERNET, &bad_checksum),
            RawFrame::from_captured(Some(3.0), Linktype::ETHERNET, &[0u8; 10]),
            RawFrame::from_captured(Some(4.0), Linktype::RAW, &udp_frame()[14..]),
        ]);

        let report =
            analyze_source(Path::new("memory"), &mut source, &AnalyzeOptions::default()).unwrap();
        let summary = report.capture_summary.as_ref().unwrap();
        assert_eq!(summary.frames_total, 4);
        assert!(!summary.limit_reached);
        assert_eq!(summary.time_start.as_deref(), Some("1970-01-01T00:00:01Z"));
        assert_eq!(summary.time_end.as_deref(), Some("1970-01-01T00:00:04Z"));
        assert_eq!(report.generated_at, "1970-01-01T00:00:04Z");

        assert_eq!(report.frames.len(), 3);
        assert_eq!(report.frames[0].ipv4_checksum_ok, Some(true));
        assert_eq!(report.frames[1].ipv4_checksum_ok, Some(false));
        assert_eq!(report.frames[2].status, "invalid_first_layer");
        assert_eq!(report.frames[2].reason, Some(StopReason::TooShort));

        let stats = &report.stats;
        assert_eq!(stats.complete, 2);
        assert_eq!(stats.invalid_first_layer, 1);
        assert_eq!(stats.ipv4_checksum_failures, 1);
        assert_eq!(stats.non_ethernet_skipped, 1);
        assert_eq!(stats.layers.get(&LayerKind::Udp), Some(&2));
    }

    #[test]
    fn limit_stops_the_loop() {
        let mut source = MemorySource::new((0..5).map(|_| RawFrame::ethernet(&udp_frame())));
        let options = AnalyzeOptions { limit: Some(2) };
        let report = analyze_source(Path::new("memory"), &mut source, &options).unwrap();
        let summary = report.capture_summary.as_ref().unwrap();
        assert_eq!(summary.frames_total, 2);
        assert!(summary.limit_reached);
        assert_eq!(report.frames.len(), 2);
        assert_eq!(report.generated_at, crate::DEFAULT_GENERATED_AT);
    }

    #[test]
    fn zero_limit_reads_nothing() {
        let mut source = MemorySource::new([RawFrame::ethernet(&udp_frame())]);
        let options = AnalyzeOptions { limit: Some(0) };
        let report = analyze_source(Path::new("memory"), &mut source, &options).unwrap();
        assert_eq!(report.capture_summary.unwrap().frames_total, 0);
        assert!(report.frames.is_empty());
    }

    #[test]
    fn ts_bounds_track_min_and_max() {
        let mut first = None;
        let mut last = None;
        for ts in [Some(5.0), None, Some(2.0), Some(9.0)] {
            update_ts_bounds(&mut first, &mut last, ts);
        }
        assert_eq!(first, Some(2.0));
        assert_eq!(last, Some(9.0));
    }

    #[test]
    fn rfc3339_keeps_subseconds() {
        assert_eq!(
            ts_to_rfc3339(Some(1.5)).as_deref(),
            Some("1970-01-01T00:00:01.5Z")
        );
        assert_eq!(ts_to_rfc3339(None), None);
    }
}
