use std::fmt;

use super::layout;
use crate::protocols::LayerKind;
use crate::protocols::common::reader::FieldReader;
use crate::protocols::error::DecodeError;
use crate::registry::EtherType;

/// 48-bit hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub const BROADCAST: MacAddr = MacAddr([0xff; 6]);

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Ethernet II header plus a view of everything after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetFrame<'a> {
    header: &'a [u8],
    destination: MacAddr,
    source: MacAddr,
    ether_type: u16,
    payload: &'a [u8],
}

impl<'a> EthernetFrame<'a> {
    /// Decode the 14-byte Ethernet II header at the start of `frame`.
    ///
    /// Fails only when fewer than 14 bytes are present; the payload is the
    /// rest of the frame, whatever its length.
    pub fn parse(frame: &'a [u8]) -> Result<Self, DecodeError> {
        let reader = FieldReader::new(frame, LayerKind::Ethernet, layout::HEADER_LEN)?;

        Ok(Self {
            header: reader.read_slice(0..layout::HEADER_LEN)?,
            destination: MacAddr(reader.read_array(layout::DESTINATION_RANGE)?),
            source: MacAddr(reader.read_array(layout::SOURCE_RANGE)?),
            ether_type: reader.read_u16_be(layout::ETHER_TYPE_RANGE)?,
            payload: reader.read_tail(layout::HEADER_LEN)?,
        })
    }

    pub fn destination(&self) -> MacAddr {
        self.destination
    }

    pub fn source(&self) -> MacAddr {
        self.source
    }

    pub fn ether_type_raw(&self) -> u16 {
        self.ether_type
    }

    pub fn ether_type(&self) -> EtherType {
        EtherType::from_raw(self.ether_type)
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
    use super::{EthernetFrame, MacAddr};
    use crate::protocols::LayerKind;
    use crate::protocols::error::DecodeError;
    use crate::registry::EtherType;

    fn frame(ether_type: u16, payload: &[u8]) -> Vec<u8> {
        let mut data = vec![0xff; 6];
        data.extend_from_slice(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        data.extend_from_slice(&ether_type.to_be_bytes());
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn parse_ipv4_frame() {
        let data = frame(0x0800, &[1, 2, 3, 4]);
        let eth = EthernetFrame::parse(&data).unwrap();
        assert_eq!(eth.destination(), MacAddr::BROADCAST);
        assert_eq!(eth.source(), MacAddr([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]));
        assert_eq!(eth.ether_type(), EtherType::Ipv4);
        assert_eq!(eth.payload(), &[1, 2, 3, 4]);
        assert_eq!(eth.header().len(), 14);
    }

    #[test]
    fn header_only_frame_has_empty_payload() {
        let data = frame(0x88cc, &[]);
        let eth = EthernetFrame::parse(&data).unwrap();
        assert_eq!(eth.ether_type(), EtherType::Lldp);
        assert!(eth.payload().is_empty());
    }

    #[test]
    fn payload_length_is_frame_minus_header() {
        let data = [0u8; 64];
        for len in 14..=data.len() {
            let eth = EthernetFrame::parse(&data[..len]).unwrap();
            assert_eq!(eth.payload().len(), len - 14);
        }
    }

    #[test]
    fn short_frames_fail() {
        let data = [0u8; 13];
        for len in 0..=data.len() {
            let err = EthernetFrame::parse(&data[..len]).unwrap_err();
            assert_eq!(
                err,
                DecodeError::TooShort {
                    layer: LayerKind::Ethernet,
                    needed: 14,
                    actual: len,
                }
            );
        }
    }

    #[test]
    fn mac_renders_lowercase_hex() {
        let mac = MacAddr([0xaa, 0xbb, 0xcc, 0x0d, 0xee, 0xff]);
        assert_eq!(mac.to_string(), "aa:bb:cc:0d:ee:ff");
        assert!(!mac.is_broadcast());
    }
}
