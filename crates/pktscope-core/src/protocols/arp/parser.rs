use std::net::Ipv4Addr;

use super::layout;
use crate::protocols::LayerKind;
use crate::protocols::common::reader::FieldReader;
use crate::protocols::error::DecodeError;
use crate::protocols::ethernet::MacAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpMessage<'a> {
    bytes: &'a [u8],
    hardware_type: u16,
    protocol_type: u16,
    hardware_size: u8,
    protocol_size: u8,
    opcode: u16,
    sender_mac: MacAddr,
    sender_ip: Ipv4Addr,
    target_mac: MacAddr,
    target_ip: Ipv4Addr,
}

impl<'a> ArpMessage<'a> {
    pub fn parse(payload: &'a [u8]) -> Result<Self, DecodeError> {
        let reader = FieldReader::new(payload, LayerKind::Arp, layout::MESSAGE_LEN)?;

        Ok(Self {
            bytes: reader.read_slice(0..layout::MESSAGE_LEN)?,
            hardware_type: reader.read_u16_be(layout::HARDWARE_TYPE_RANGE)?,
            protocol_type: reader.read_u16_be(layout::PROTOCOL_TYPE_RANGE)?,
            hardware_size: reader.read_u8(layout::HARDWARE_SIZE_OFFSET)?,
            protocol_size: reader.read_u8(layout::PROTOCOL_SIZE_OFFSET)?,
            opcode: reader.read_u16_be(layout::OPCODE_RANGE)?,
            sender_mac: MacAddr(reader.read_array(layout::SENDER_MAC_RANGE)?),
            sender_ip: Ipv4Addr::from(reader.read_array::<4>(layout::SENDER_IP_RANGE)?),
            target_mac: MacAddr(reader.read_array(layout::TARGET_MAC_RANGE)?),
            target_ip: Ipv4Addr::from(reader.read_array::<4>(layout::TARGET_IP_RANGE)?),
        })
    }

    pub fn hardware_type(&self) -> u16 {
        self.hardware_type
    }

    pub fn protocol_type(&self) -> u16 {
        self.protocol_type
    }

    pub fn hardware_size(&self) -> u8 {
        self.hardware_size
    }

    pub fn protocol_size(&self) -> u8 {
        self.protocol_size
    }

    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    pub fn is_request(&self) -> bool {
        self.opcode == layout::OPCODE_REQUEST
    }

    pub fn is_reply(&self) -> bool {
        self.opcode == layout::OPCODE_REPLY
    }

    pub fn sender_mac(&self) -> MacAddr {
        self.sender_mac
    }

    pub fn sender_ip(&self) -> Ipv4Addr {
        self.sender_ip
    }

    pub fn target_mac(&self) -> MacAddr {
        self.target_mac
    }

    pub fn target_ip(&self) -> Ipv4Addr {
        self.target_ip
    }

    /// The 28 bytes the message was decoded from.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::ArpMessage;
    use crate::protocols::arp::layout;
    use crate::protocols::error::DecodeError;
    use crate::protocols::ethernet::MacAddr;

    fn request() -> Vec<u8> {
        let mut payload = vec![0u8; layout::MESSAGE_LEN];
        payload[layout::HARDWARE_TYPE_RANGE].copy_from_slice(&1u16.to_be_bytes());
        payload[layout::PROTOCOL_TYPE_RANGE].copy_from_slice(&0x0800u16.to_be_bytes());
        payload[layout::HARDWARE_SIZE_OFFSET] = 6;
        payload[layout::PROTOCOL_SIZE_OFFSET] = 4;
        payload[layout::OPCODE_RANGE].copy_from_slice(&layout::OPCODE_REQUEST.to_be_bytes());
        payload[layout::SENDER_MAC_RANGE].copy_from_slice(&[0x02, 0, 0, 0, 0, 0x01]);
        payload[layout::SENDER_IP_RANGE].copy_from_slice(&[192, 168, 1, 1]);
        payload[layout::TARGET_IP_RANGE].copy_from_slice(&[192, 168, 1, 20]);
        payload
    }

    #[test]
    fn parse_request() {
        let payload = request();
        let arp = ArpMessage::parse(&payload).unwrap();
        assert_eq!(arp.hardware_type(), 1);
        assert_eq!(arp.protocol_type(), 0x0800);
        assert_eq!(arp.hardware_size(), 6);
        assert_eq!(arp.protocol_size(), 4);
        assert!(arp.is_request());
        assert!(!arp.is_reply());
        assert_eq!(arp.sender_mac(), MacAddr([0x02, 0, 0, 0, 0, 0x01]));
        assert_eq!(arp.sender_ip(), Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(arp.target_mac(), MacAddr([0; 6]));
        assert_eq!(arp.target_ip(), Ipv4Addr::new(192, 168, 1, 20));
    }

    #[test]
    fn trailing_padding_is_ignored() {
        let mut payload = request();
        payload.extend_from_slice(&[0u8; 18]);
        let arp = ArpMessage::parse(&payload).unwrap();
        assert_eq!(arp.bytes().len(), layout::MESSAGE_LEN);
    }

    #[test]
    fn size_fields_do_not_move_addresses() {
        let mut payload = request();
        payload[layout::HARDWARE_SIZE_OFFSET] = 8;
        payload[layout::PROTOCOL_SIZE_OFFSET] = 16;
        let arp = ArpMessage::parse(&payload).unwrap();
        assert_eq!(arp.hardware_size(), 8);
        assert_eq!(arp.sender_ip(), Ipv4Addr::new(192, 168, 1, 1));
    }

    #[test]
    fn parse_short_payload() {
        let payload = request();
        let err = ArpMessage::parse(&payload[..27]).unwrap_err();
        assert!(matches!(err, DecodeError::TooShort { needed: 28, actual: 27, .. }));
        assert!(err.to_string().contains("ARP header too short"));
    }
}
