use super::layout;
use crate::protocols::LayerKind;
use crate::protocols::common::reader::FieldReader;
use crate::protocols::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpHeader<'a> {
    header: &'a [u8],
    payload: &'a [u8],
    source_port: u16,
    destination_port: u16,
    sequence: u32,
    acknowledgment: u32,
    data_offset: u8,
    flags: u8,
    window: u16,
    checksum: u16,
    urgent_pointer: u16,
}

impl<'a> TcpHeader<'a> {
    pub fn parse(segment: &'a [u8]) -> Result<Self, DecodeError> {
        let reader = FieldReader::new(segment, LayerKind::Tcp, layout::MIN_HEADER_LEN)?;

        Ok(Self {
            header: reader.read_slice(0..layout::MIN_HEADER_LEN)?,
            // Options stay in the payload: the data offset is not applied.
            payload: reader.read_tail(layout::MIN_HEADER_LEN)?,
            source_port: reader.read_u16_be(layout::SOURCE_PORT_RANGE)?,
            destination_port: reader.read_u16_be(layout::DESTINATION_PORT_RANGE)?,
            sequence: reader.read_u32_be(layout::SEQUENCE_RANGE)?,
            acknowledgment: reader.read_u32_be(layout::ACKNOWLEDGMENT_RANGE)?,
            data_offset: reader.read_u8(layout::DATA_OFFSET_OFFSET)? >> 4,
            flags: reader.read_u8(layout::FLAGS_OFFSET)?,
            window: reader.read_u16_be(layout::WINDOW_RANGE)?,
            checksum: reader.read_u16_be(layout::CHECKSUM_RANGE)?,
            urgent_pointer: reader.read_u16_be(layout::URGENT_POINTER_RANGE)?,
        })
    }

    pub fn source_port(&self) -> u16 {
        self.source_port
    }

    pub fn destination_port(&self) -> u16 {
        self.destination_port
    }

    pub fn sequence_number(&self) -> u32 {
        self.sequence
    }

    pub fn acknowledgment_number(&self) -> u32 {
        self.acknowledgment
    }

    /// Data offset in 32-bit words, as declared.
    pub fn data_offset(&self) -> u8 {
        self.data_offset
    }

    /// Declared header length in bytes (`data_offset * 4`).
    pub fn header_len(&self) -> usize {
        usize::from(self.data_offset) * 4
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn has_flags(&self, mask: u8) -> bool {
        self.flags & mask == mask
    }

    pub fn syn(&self) -> bool {
        self.has_flags(layout::FLAG_SYN)
    }

    pub fn ack(&self) -> bool {
        self.has_flags(layout::FLAG_ACK)
    }

    pub fn fin(&self) -> bool {
        self.has_flags(layout::FLAG_FIN)
    }

    pub fn rst(&self) -> bool {
        self.has_flags(layout::FLAG_RST)
    }

    pub fn window(&self) -> u16 {
        self.window
    }

    /// Checksum as transmitted; never verified.
    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    pub fn urgent_pointer(&self) -> u16 {
        self.urgent_pointer
    }

    /// The fixed 20-byte header.
    pub fn header(&self) -> &'a [u8] {
        self.header
    }

    /// Everything after byte 20, options included.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }
}
