use std::net::Ipv4Addr;

use super::layout;
use crate::checksum::verify_ipv4_header;
use crate::protocols::LayerKind;
use crate::protocols::common::reader::FieldReader;
use crate::protocols::error::{DecodeError, MalformedReason};
use crate::registry::Protocol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Header<'a> {
    header: &'a [u8],
    payload: &'a [u8],
    ihl: u8,
    tos: u8,
    total_length: u16,
    identification: u16,
    flags_fragment: u16,
    ttl: u8,
    protocol: u8,
    checksum: u16,
    source: Ipv4Addr,
    destination: Ipv4Addr,
}

impl<'a> Ipv4Header<'a> {
    /// Decode an IPv4 header from the start of `packet`.
    ///
    /// # Errors
    /// `TooShort` under 20 bytes or when `IHL * 4` exceeds the input;
    /// `Malformed` when the version is not 4 or IHL is below 5.
    pub fn parse(packet: &'a [u8]) -> Result<Self, DecodeError> {
        let reader = FieldReader::new(packet, LayerKind::Ipv4, layout::MIN_HEADER_LEN)?;

        let version_ihl = reader.read_u8(layout::VERSION_IHL_OFFSET)?;
        let version = version_ihl >> 4;
        if version != layout::VERSION {
            return Err(malformed(MalformedReason::InvalidVersion { version }));
        }
        let ihl = version_ihl & 0x0f;
        if ihl < layout::MIN_IHL {
            return Err(malformed(MalformedReason::InvalidHeaderLength { ihl }));
        }
        let header_len = usize::from(ihl) * 4;
        reader.require_len(header_len)?;

        let total_length = reader.read_u16_be(layout::TOTAL_LENGTH_RANGE)?;
        let payload_len = clamped_payload_len(header_len, usize::from(total_length), reader.len());

        Ok(Self {
            header: reader.read_slice(0..header_len)?,
            payload: reader.read_slice(header_len..header_len + payload_len)?,
            ihl,
            tos: reader.read_u8(layout::TOS_OFFSET)?,
            total_length,
            identification: reader.read_u16_be(layout::IDENTIFICATION_RANGE)?,
            flags_fragment: reader.read_u16_be(layout::FLAGS_FRAGMENT_RANGE)?,
            ttl: reader.read_u8(layout::TTL_OFFSET)?,
            protocol: reader.read_u8(layout::PROTOCOL_OFFSET)?,
            checksum: reader.read_u16_be(layout::CHECKSUM_RANGE)?,
            source: Ipv4Addr::from(reader.read_array::<4>(layout::SOURCE_RANGE)?),
            destination: Ipv4Addr::from(reader.read_array::<4>(layout::DESTINATION_RANGE)?),
        })
    }

    pub fn version(&self) -> u8 {
        layout::VERSION
    }

    /// Header length in 32-bit words.
    pub fn ihl(&self) -> u8 {
        self.ihl
    }

    /// Header length in bytes, options included.
    pub fn header_len(&self) -> usize {
        usize::from(self.ihl) * 4
    }

    pub fn tos(&self) -> u8 {
        self.tos
    }

    /// Total length as declared by the header, which may disagree with
    /// what was captured.
    pub fn total_length(&self) -> u16 {
        self.total_length
    }

    pub fn identification(&self) -> u16 {
        self.identification
    }

    pub fn dont_fragment(&self) -> bool {
        self.flags_fragment & 0x4000 != 0
    }

    pub fn more_fragments(&self) -> bool {
        self.flags_fragment & 0x2000 != 0
    }

    /// Fragment offset in 8-byte units.
    pub fn fragment_offset(&self) -> u16 {
        self.flags_fragment & 0x1fff
    }

    pub fn ttl(&self) -> u8 {
        self.ttl
    }

    pub fn protocol_number(&self) -> u8 {
        self.protocol
    }

    pub fn protocol(&self) -> Protocol {
        Protocol::from_number(self.protocol)
    }

    /// Header checksum as transmitted.
    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    pub fn source(&self) -> Ipv4Addr {
        self.source
    }

    pub fn destination(&self) -> Ipv4Addr {
        self.destination
    }

    /// Raw header bytes, options included.
    pub fn header(&self) -> &'a [u8] {
        self.header
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the header checksum verifies. Never evaluated by decoding.
    pub fn checksum_valid(&self) -> bool {
        verify_ipv4_header(self.header)
    }
}

fn malformed(reason: MalformedReason) -> DecodeError {
    DecodeError::Malformed {
        layer: LayerKind::Ipv4,
        reason,
    }
}

/// `total - header`, or 0 when the declared total does not exceed the header
/// or exceeds what was captured.
fn clamped_payload_len(header_len: usize, total_len: usize, captured_len: usize) -> usize {
    if total_len > header_len && total_len <= captured_len {
        total_len - header_len
    } else {
        0
    }
}
