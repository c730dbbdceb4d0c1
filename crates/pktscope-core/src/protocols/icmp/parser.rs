use super::layout;
use crate::protocols::LayerKind;
use crate::protocols::common::reader::FieldReader;
use crate::protocols::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcmpHeader<'a> {
    header: &'a [u8],
    payload: &'a [u8],
    icmp_type: u8,
    code: u8,
    checksum: u16,
}

impl<'a> IcmpHeader<'a> {
    pub fn parse(message: &'a [u8]) -> Result<Self, DecodeError> {
        let reader = FieldReader::new(message, LayerKind::Icmp, layout::HEADER_LEN)?;

        Ok(Self {
            header: reader.read_slice(0..layout::HEADER_LEN)?,
            payload: reader.read_tail(layout::HEADER_LEN)?,
            icmp_type: reader.read_u8(layout::TYPE_OFFSET)?,
            code: reader.read_u8(layout::CODE_OFFSET)?,
            checksum: reader.read_u16_be(layout::CHECKSUM_RANGE)?,
        })
    }

    pub fn icmp_type(&self) -> u8 {
        self.icmp_type
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    /// Bytes 4..8, whose meaning depends on the type.
    pub fn rest_of_header(&self) -> &'a [u8] {
        let header = self.header;
        &header[layout::REST_OF_HEADER_RANGE]
    }

    pub fn header(&self) -> &'a [u8] {
        self.header
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }
}
