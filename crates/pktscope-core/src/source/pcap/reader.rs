use std::io::{Read, Seek, SeekFrom};

use super::error::PcapSourceError;
use super::layout;
use pcap_parser::Linktype;

/// Capture container recognised from the first four bytes of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    Pcap { nanosecond: bool },
    PcapNg,
}

/// Read the magic bytes and rewind the reader to the start.
///
/// # Errors
/// Returns `PcapSourceError::Io` when the reader is shorter than four bytes
/// or cannot be rewound.
pub fn read_magic_and_rewind<R: Read + Seek>(reader: &mut R) -> Result<[u8; 4], PcapSourceError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(magic)
}

/// Classify a file by its magic bytes.
///
/// # Errors
/// Returns `PcapSourceError::UnknownFormat` for anything that is neither a
/// legacy PCAP (either byte order or timestamp precision) nor a PCAPNG
/// section header.
pub fn detect_format(magic: [u8; 4]) -> Result<CaptureFormat, PcapSourceError> {
    match magic {
        layout::PCAPNG_MAGIC => Ok(CaptureFormat::PcapNg),
        layout::PCAP_MAGIC_USEC_LE | layout::PCAP_MAGIC_USEC_BE => {
            Ok(CaptureFormat::Pcap { nanosecond: false })
        }
        layout::PCAP_MAGIC_NSEC_LE | layout::PCAP_MAGIC_NSEC_BE => {
            Ok(CaptureFormat::Pcap { nanosecond: true })
        }
        _ => Err(PcapSourceError::UnknownFormat { magic }),
    }
}

/// Resolve the linktype for a given interface id, defaulting to Ethernet.
pub fn linktype_for_interface(linktypes: &[Linktype], if_id: u32) -> Linktype {
    linktypes
        .get(if_id as usize)
        .copied()
        .unwrap_or(Linktype::ETHERNET)
}

/// Convert a legacy record timestamp to seconds.
pub fn legacy_ts_to_seconds(ts_sec: u32, ts_frac: u32, nanosecond: bool) -> f64 {
    let scale = if nanosecond { 1e-9 } else { 1e-6 };
    ts_sec as f64 + ts_frac as f64 * scale
}

/// Convert PCAPNG high/low timestamp to seconds, assuming the default
/// microsecond resolution.
pub fn pcapng_ts_to_seconds(ts_high: u32, ts_low: u32) -> f64 {
    let ts = ((ts_high as u64) << 32) | (ts_low as u64);
    ts as f64 * 1e-6
}
