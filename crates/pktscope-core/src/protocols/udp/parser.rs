use super::layout;
use crate::protocols::LayerKind;
use crate::protocols::common::reader::FieldReader;
use crate::protocols::error::DecodeError;

/// UDP header and the datagram bytes after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpHeader<'a> {
    header: &'a [u8],
    payload: &'a [u8],
    source_port: u16,
    destination_port: u16,
    length: u16,
    checksum: u16,
}

impl<'a> UdpHeader<'a> {
    pub fn parse(datagram: &'a [u8]) -> Result<Self, DecodeError> {
        let reader = FieldReader::new(datagram, LayerKind::Udp, layout::HEADER_LEN)?;

        Ok(Self {
            header: reader.read_slice(0..layout::HEADER_LEN)?,
            payload: reader.read_tail(layout::HEADER_LEN)?,
            source_port: reader.read_u16_be(layout::SOURCE_PORT_RANGE)?,
            destination_port: reader.read_u16_be(layout::DESTINATION_PORT_RANGE)?,
            length: reader.read_u16_be(layout::LENGTH_RANGE)?,
            checksum: reader.read_u16_be(layout::CHECKSUM_RANGE)?,
        })
    }

    pub fn source_port(&self) -> u16 {
        self.source_port
    }

    pub fn destination_port(&self) -> u16 {
        self.destination_port
    }

    /// Length field (header plus data) as declared; not checked against the
    /// captured bytes.
    pub fn length(&self) -> u16 {
        self.length
    }

    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    pub fn header(&self) -> &'a [u8] {
        self.header
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::UdpHeader;
    use crate::protocols::error::DecodeError;

    #[test]
    fn parse_datagram() {
        let data = [0x19, 0x36, 0x00, 0x35, 0x00, 0x0c, 0xbe, 0xef, 1, 2, 3, 4];
        let udp = UdpHeader::parse(&data).unwrap();
        assert_eq!(udp.source_port(), 6454);
        assert_eq!(udp.destination_port(), 53);
        assert_eq!(udp.length(), 12);
        assert_eq!(udp.checksum(), 0xbeef);
        assert_eq!(udp.payload(), &[1, 2, 3, 4]);
    }

    #[test]
    fn parse_short_datagram() {
        let data = [0u8; 7];
        let err = UdpHeader::parse(&data).unwrap_err();
        assert!(matches!(err, DecodeError::TooShort { needed: 8, actual: 7, .. }));
    }
}
