use std::fs::File;
use std::path::Path;

use pcap_parser::{
    Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader,
    traits::PcapReaderIterator,
};

use crate::source::{FrameSource, RawFrame, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{
    CaptureFormat, detect_format, legacy_ts_to_seconds, linktype_for_interface,
    pcapng_ts_to_seconds, read_magic_and_rewind,
};

/// Frames read from a PCAP or PCAPNG file, in file order.
pub struct PcapFileSource {
    inner: PcapReader,
}

enum PcapReader {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Option<Linktype>,
        nanosecond: bool,
    },
    Ng {
        reader: PcapNGReader<File>,
        linktypes: Vec<Linktype>,
    },
}

impl PcapFileSource {
    /// Open `path` and sniff its container format.
    ///
    /// # Errors
    /// Fails when the file cannot be read or its magic bytes are neither
    /// PCAP nor PCAPNG.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        let inner = create_reader(file)?;
        Ok(Self { inner })
    }
}

impl FrameSource for PcapFileSource {
    fn next_frame(&mut self) -> Result<Option<RawFrame>, SourceError> {
        next_frame(&mut self.inner).map_err(SourceError::from)
    }
}

fn create_reader(mut file: File) -> Result<PcapReader, PcapSourceError> {
    let magic = read_magic_and_rewind(&mut file)?;

    match detect_format(magic)? {
        CaptureFormat::PcapNg => {
            log::debug!("reading PCAPNG capture");
            let reader = PcapNGReader::new(layout::PCAP_READER_BUFFER_SIZE, file).map_err(|e| {
                PcapSourceError::Pcap {
                    context: "pcapng reader init",
                    message: e.to_string(),
                }
            })?;
            Ok(PcapReader::Ng {
                reader,
                linktypes: Vec::new(),
            })
        }
        CaptureFormat::Pcap { nanosecond } => {
            log::debug!("reading legacy PCAP capture (nanosecond={nanosecond})");
            let reader =
                LegacyPcapReader::new(layout::PCAP_READER_BUFFER_SIZE, file).map_err(|e| {
                    PcapSourceError::Pcap {
                        context: "pcap reader init",
                        message: e.to_string(),
                    }
                })?;
            Ok(PcapReader::Legacy {
                reader,
                linktype: None,
                nanosecond,
            })
        }
    }
}

fn next_frame(reader: &mut PcapReader) -> Result<Option<RawFrame>, PcapSourceError> {
    loop {
        match reader {
            PcapReader::Legacy {
                reader,
                linktype,
                nanosecond,
            } => match reader.next() {
                Ok((offset, block)) => {
                    let frame = match block {
                        PcapBlockOwned::LegacyHeader(header) => {
                            *linktype = Some(header.network);
                            None
                        }
                        PcapBlockOwned::Legacy(packet) => {
                            let ts = legacy_ts_to_seconds(packet.ts_sec, packet.ts_usec, *nanosecond);
                            let lt = linktype.unwrap_or(Linktype::ETHERNET);
                            Some(RawFrame::from_captured(Some(ts), lt, packet.data))
                        }
                        _ => None,
                    };
                    reader.consume(offset);
                    if frame.is_some() {
                        return Ok(frame);
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::Incomplete(_)) => {
                    reader.refill().map_err(|e| PcapSourceError::Pcap {
                        context: "pcap reader refill",
                        message: e.to_string(),
                    })?;
                }
                Err(e) => {
                    return Err(PcapSourceError::Pcap {
                        context: "pcap reader next",
                        message: e.to_string(),
                    });
                }
            },
            PcapReader::Ng { reader, linktypes } => match reader.next() {
                Ok((offset, block)) => {
                    let frame = match block {
                        PcapBlockOwned::NG(Block::SectionHeader(_)) => {
                            // Interface ids restart in every section.
                            linktypes.clear();
                            None
                        }
                        PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                            linktypes.push(intf.linktype);
                            None
                        }
                        PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => {
                            let ts = pcapng_ts_to_seconds(packet.ts_high, packet.ts_low);
                            let lt = linktype_for_interface(linktypes, packet.if_id);
                            let data = unpadded(packet.data, packet.caplen);
                            Some(RawFrame::from_captured(Some(ts), lt, data))
                        }
                        PcapBlockOwned::NG(Block::SimplePacket(packet)) => {
                            let lt = linktype_for_interface(linktypes, 0);
                            let data = unpadded(packet.data, packet.origlen);
                            Some(RawFrame::from_captured(None, lt, data))
                        }
                        _ => None,
                    };
                    reader.consume(offset);
                    if frame.is_some() {
                        return Ok(frame);
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::Incomplete(_)) => {
                    reader.refill().map_err(|e| PcapSourceError::Pcap {
                        context: "pcapng reader refill",
                        message: e.to_string(),
                    })?;
                }
                Err(e) => {
                    return Err(PcapSourceError::Pcap {
                        context: "pcapng reader next",
                        message: e.to_string(),
                    });
                }
            },
        }
    }
}

/// PCAPNG packet data is padded to 32 bits; keep only the captured bytes.
fn unpadded(data: &[u8], captured: u32) -> &[u8] {
    let len = usize::try_from(captured).map_or(data.len(), |len| len.min(data.len()));
    &data[..len]
}

#[cfg(test)]
mod tests {
    use super::unpadded;

    #[test]
    fn padding_is_dropped() {
        let data = [1, 2, 3, 0];
        assert_eq!(unpadded(&data, 3), &[1, 2, 3]);
        assert_eq!(unpadded(&data, 10), &data);
    }
}
