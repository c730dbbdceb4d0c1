//! One-line, human-readable summaries of decoded layers.

use std::fmt;

use crate::pipeline::DecodedLayer;
use crate::protocols::arp::ArpMessage;
use crate::protocols::ethernet::EthernetFrame;
use crate::protocols::icmp::IcmpHeader;
use crate::protocols::ipv4::Ipv4Header;
use crate::protocols::tcp::TcpHeader;
use crate::protocols::udp::UdpHeader;

impl DecodedLayer<'_> {
    /// Render every field of the layer on a single line.
    ///
    /// # Examples
    /// ```
    /// use pktscope_core::decode;
    ///
    /// let mut frame = vec![0xff; 6];
    /// frame.extend_from_slice(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, 0x86, 0xdd]);
    /// let result = decode(&frame);
    /// let line = result.layers().next().unwrap().render();
    /// assert_eq!(
    ///     line,
    ///     "Ethernet: aa:bb:cc:dd:ee:ff -> ff:ff:ff:ff:ff:ff, EtherType: 0x86dd (IPv6)"
    /// );
    /// ```
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DecodedLayer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedLayer::Ethernet(eth) => fmt_ethernet(eth, f),
            DecodedLayer::Arp(arp) => fmt_arp(arp, f),
            DecodedLayer::Ipv4(ip) => fmt_ipv4(ip, f),
            DecodedLayer::Tcp(tcp) => fmt_tcp(tcp, f),
            DecodedLayer::Udp(udp) => fmt_udp(udp, f),
            DecodedLayer::Icmp(icmp) => fmt_icmp(icmp, f),
        }
    }
}

fn fmt_ethernet(eth: &EthernetFrame<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
        f,
        "Ethernet: {} -> {}, EtherType: {}",
        eth.source(),
        eth.destination(),
        eth.ether_type()
    )
}

fn fmt_arp(arp: &ArpMessage<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
        f,
        "ARP: HwType={}, ProtoType=0x{:04x}, HwSize={}, ProtoSize={}, Opcode={}, Sender={}/{}, Target={}/{}",
        arp.hardware_type(),
        arp.protocol_type(),
        arp.hardware_size(),
        arp.protocol_size(),
        arp.opcode(),
        arp.sender_mac(),
        arp.sender_ip(),
        arp.target_mac(),
        arp.target_ip()
    )
}

fn fmt_ipv4(ip: &Ipv4Header<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
        f,
        "IPv4: {} -> {}, Protocol: {} ({}), HeaderLen={}, TotalLen={}, TTL={}, Checksum=0x{:04x}",
        ip.source(),
        ip.destination(),
        ip.protocol_number(),
        ip.protocol(),
        ip.header_len(),
        ip.total_length(),
        ip.ttl(),
        ip.checksum()
    )
}

fn fmt_tcp(tcp: &TcpHeader<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
        f,
        "TCP: SrcPort={}, DstPort={}, SeqNum={}, AckNum={}, DataOffset={}, Flags=0x{:02x}, Window={}",
        tcp.source_port(),
        tcp.destination_port(),
        tcp.sequence_number(),
        tcp.acknowledgment_number(),
        tcp.header_len(),
        tcp.flags(),
        tcp.window()
    )
}

fn fmt_udp(udp: &UdpHeader<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
        f,
        "UDP: SrcPort={}, DstPort={}, Length={}, Checksum=0x{:04x}",
        udp.source_port(),
        udp.destination_port(),
        udp.length(),
        udp.checksum()
    )
}

fn fmt_icmp(icmp: &IcmpHeader<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
        f,
        "ICMP: Type={}, Code={}, Checksum=0x{:04x}",
        icmp.icmp_type(),
        icmp.code(),
        icmp.checksum()
    )
}
