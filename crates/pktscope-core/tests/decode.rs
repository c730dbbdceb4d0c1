use etherparse::PacketBuilder;
use pktscope_core::{
    DecodeError, DecodeStatus, DecodedLayer, EtherType, LayerKind, MacAddr, NetworkLayer,
    Protocol, StopReason, TransportLayer, Truncation, Unsupported, decode, internet_checksum,
    verify_ipv4_header,
};

const SRC_MAC: [u8; 6] = [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff];
const DST_MAC: [u8; 6] = [0xff; 6];

fn ethernet(ether_type: u16) -> Vec<u8> {
    let mut frame = Vec::with_capacity(64);
    frame.extend_from_slice(&DST_MAC);
    frame.extend_from_slice(&SRC_MAC);
    frame.extend_from_slice(&ether_type.to_be_bytes());
    frame
}

fn ipv4_header(protocol: u8, total_length: u16) -> [u8; 20] {
    let mut header = [0u8; 20];
    header[0] = 0x45;
    header[2..4].copy_from_slice(&total_length.to_be_bytes());
    header[8] = 64;
    header[9] = protocol;
    header[12..16].copy_from_slice(&[192, 168, 1, 10]);
    header[16..20].copy_from_slice(&[192, 168, 1, 1]);
    let checksum = internet_checksum(&header);
    header[10..12].copy_from_slice(&checksum.to_be_bytes());
    header
}

fn kinds(frame: &[u8]) -> Vec<LayerKind> {
    decode(frame).layers().map(|layer| layer.kind()).collect()
}

#[test]
fn ethernet_needs_fourteen_bytes() {
    let bytes = [0x5au8; 64];
    for len in 0..14 {
        let result = decode(&bytes[..len]);
        assert!(result.is_empty());
        match result.status() {
            DecodeStatus::InvalidFirstLayer(DecodeError::TooShort {
                layer, needed, actual, ..
            }) => {
                assert_eq!(layer, LayerKind::Ethernet);
                assert_eq!(needed, 14);
                assert_eq!(actual, len);
            }
            other => panic!("len {len}: unexpected status {other:?}"),
        }
    }
    for len in 14..=64 {
        let eth = decode(&bytes[..len]).ethernet().unwrap();
        assert_eq!(eth.payload().len(), len - 14);
    }
}

#[test]
fn thirteen_bytes_decode_nothing() {
    let result = decode(&[0u8; 13]);
    assert_eq!(result.len(), 0);
    assert_eq!(result.status().label(), "invalid_first_layer");
    assert_eq!(result.status().reason(), Some(StopReason::TooShort));
}

#[test]
fn ethernet_ipv4_tcp_decodes_three_layers() {
    let mut frame = ethernet(0x0800);
    frame.extend_from_slice(&ipv4_header(6, 40));
    let mut tcp = [0u8; 20];
    tcp[0..2].copy_from_slice(&12345u16.to_be_bytes());
    tcp[2..4].copy_from_slice(&80u16.to_be_bytes());
    tcp[12] = 0x50;
    tcp[13] = 0x02;
    frame.extend_from_slice(&tcp);

    let result = decode(&frame);
    assert_eq!(result.status(), DecodeStatus::Complete);
    assert_eq!(kinds(&frame), [LayerKind::Ethernet, LayerKind::Ipv4, LayerKind::Tcp]);

    let eth = result.ethernet().unwrap();
    assert_eq!(eth.source(), MacAddr(SRC_MAC));
    assert!(eth.destination().is_broadcast());
    assert_eq!(eth.ether_type(), EtherType::Ipv4);

    let ip = result.ipv4().unwrap();
    assert_eq!(ip.protocol(), Protocol::Tcp);
    assert_eq!(ip.total_length(), 40);
    assert_eq!(ip.payload_len(), 20);
    assert!(ip.checksum_valid());

    let Some(TransportLayer::Tcp(tcp)) = result.transport() else {
        panic!("expected TCP");
    };
    assert_eq!(tcp.source_port(), 12345);
    assert_eq!(tcp.destination_port(), 80);
    assert!(tcp.syn());
    assert!(tcp.payload().is_empty());
}

#[test]
fn unmapped_protocol_stops_after_ipv4() {
    let mut frame = ethernet(0x0800);
    frame.extend_from_slice(&ipv4_header(200, 28));
    frame.extend_from_slice(&[0u8; 8]);

    let result = decode(&frame);
    assert_eq!(kinds(&frame), [LayerKind::Ethernet, LayerKind::Ipv4]);
    assert_eq!(
        result.status(),
        DecodeStatus::Truncated(Truncation::Unsupported(Unsupported::Protocol {
            protocol: Protocol::Unknown,
            number: 200,
        }))
    );
    assert_eq!(result.status().reason(), Some(StopReason::UnsupportedLayer));
}

#[test]
fn unsupported_ether_types_yield_one_layer() {
    for raw in [0x86dd, 0x8100, 0x88cc, 0x0842, 0x1234] {
        let mut frame = ethernet(raw);
        frame.extend_from_slice(&[0u8; 40]);
        let result = decode(&frame);
        assert_eq!(result.len(), 1, "EtherType 0x{raw:04x}");
        assert_eq!(
            result.status(),
            DecodeStatus::Truncated(Truncation::Unsupported(Unsupported::EtherType(
                EtherType::from_raw(raw)
            )))
        );
    }
}

#[test]
fn arp_reply_is_complete() {
    let mut frame = ethernet(0x0806);
    frame.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 6, 4, 0x00, 0x02]);
    frame.extend_from_slice(&SRC_MAC);
    frame.extend_from_slice(&[192, 168, 1, 10]);
    frame.extend_from_slice(&[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
    frame.extend_from_slice(&[192, 168, 1, 1]);

    let result = decode(&frame);
    assert_eq!(result.status(), DecodeStatus::Complete);
    assert_eq!(kinds(&frame), [LayerKind::Ethernet, LayerKind::Arp]);
    let Some(NetworkLayer::Arp(arp)) = result.network() else {
        panic!("expected ARP");
    };
    assert!(arp.is_reply());
    assert_eq!(arp.sender_ip().octets(), [192, 168, 1, 10]);
    assert_eq!(arp.target_mac(), MacAddr([0x11, 0x22, 0x33, 0x44, 0x55, 0x66]));
}

#[test]
fn short_tcp_segment_truncates_after_ipv4() {
    let mut frame = ethernet(0x0800);
    frame.extend_from_slice(&ipv4_header(6, 30));
    frame.extend_from_slice(&[0u8; 10]);

    let result = decode(&frame);
    assert_eq!(result.len(), 2);
    assert!(matches!(
        result.status(),
        DecodeStatus::Truncated(Truncation::Failed(DecodeError::TooShort {
            layer: LayerKind::Tcp,
            needed: 20,
            actual: 10,
        }))
    ));
}

#[test]
fn total_length_outside_bounds_empties_payload() {
    for total_length in [20u16, 10, 200] {
        let mut frame = ethernet(0x0800);
        frame.extend_from_slice(&ipv4_header(17, total_length));
        frame.extend_from_slice(&[0u8; 12]);
        let ip = decode(&frame).ipv4().unwrap();
        assert_eq!(ip.payload_len(), 0, "total length {total_length}");
        assert!(ip.payload().is_empty());
    }
}

#[test]
fn checksum_of_filled_header_is_zero() {
    let header = ipv4_header(17, 20);
    assert_eq!(internet_checksum(&header), 0);
    assert!(verify_ipv4_header(&header));
}

#[test]
fn mappings_are_total() {
    for number in 0..=u8::MAX {
        let protocol = Protocol::from_number(number);
        match protocol.number() {
            Some(mapped) => assert_eq!(mapped, number),
            None => assert_eq!(protocol, Protocol::Unknown),
        }
    }
    for raw in 0..=u16::MAX {
        assert_eq!(EtherType::from_raw(raw).raw(), raw);
    }
}

#[test]
fn packet_builder_tcp_matches() {
    let builder = PacketBuilder::ethernet2(SRC_MAC, DST_MAC)
        .ipv4([10, 0, 0, 1], [10, 0, 0, 2], 32)
        .tcp(40000, 443, 0x0102_0304, 1024);
    let payload = b"hello";
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, payload).unwrap();

    let result = decode(&frame);
    assert_eq!(result.status(), DecodeStatus::Complete);
    let ip = result.ipv4().unwrap();
    assert_eq!(ip.source().octets(), [10, 0, 0, 1]);
    assert_eq!(ip.destination().octets(), [10, 0, 0, 2]);
    assert_eq!(ip.ttl(), 32);
    assert_eq!(usize::from(ip.total_length()), 20 + 20 + payload.len());
    assert!(ip.checksum_valid());

    let Some(TransportLayer::Tcp(tcp)) = result.transport() else {
        panic!("expected TCP");
    };
    assert_eq!(tcp.source_port(), 40000);
    assert_eq!(tcp.destination_port(), 443);
    assert_eq!(tcp.sequence_number(), 0x0102_0304);
    assert_eq!(tcp.window(), 1024);
    assert_eq!(tcp.header_len(), 20);
    assert_eq!(tcp.payload(), payload);
}

#[test]
fn packet_builder_udp_and_icmp_match() {
    let builder = PacketBuilder::ethernet2(SRC_MAC, DST_MAC)
        .ipv4([172, 16, 0, 1], [172, 16, 0, 2], 64)
        .udp(5353, 53);
    let payload = [1u8, 2, 3, 4];
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, &payload).unwrap();

    let result = decode(&frame);
    assert!(result.ipv4().unwrap().checksum_valid());
    let Some(TransportLayer::Udp(udp)) = result.transport() else {
        panic!("expected UDP");
    };
    assert_eq!(udp.source_port(), 5353);
    assert_eq!(udp.destination_port(), 53);
    assert_eq!(usize::from(udp.length()), 8 + payload.len());
    assert_eq!(udp.payload(), payload);

    let builder = PacketBuilder::ethernet2(SRC_MAC, DST_MAC)
        .ipv4([172, 16, 0, 1], [172, 16, 0, 2], 64)
        .icmpv4_echo_request(7, 1);
    let mut frame = Vec::with_capacity(builder.size(0));
    builder.write(&mut frame, &[]).unwrap();

    let result = decode(&frame);
    assert_eq!(result.status(), DecodeStatus::Complete);
    let layers: Vec<DecodedLayer<'_>> = result.layers().collect();
    let DecodedLayer::Icmp(icmp) = layers[2] else {
        panic!("expected ICMP");
    };
    assert_eq!(icmp.icmp_type(), 8);
    assert_eq!(icmp.code(), 0);
    assert_eq!(icmp.rest_of_header(), &[0, 7, 0, 1]);
    assert_eq!(internet_checksum(icmp.header()), 0);
}
