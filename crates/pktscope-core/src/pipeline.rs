//! Layer-by-layer dispatch from Ethernet down to the transport header.
//!
//! `decode` walks Start -> Ethernet -> network (IPv4 or ARP) -> transport
//! (TCP, UDP or ICMP) -> Done, handing each layer's payload view to the
//! next decoder. It decodes as far as possible: a failure or an unsupported
//! protocol stops the walk and the layers already decoded stay available.
//! No input makes it panic.

use std::fmt;

use crate::protocols::LayerKind;
use crate::protocols::arp::ArpMessage;
use crate::protocols::error::{DecodeError, StopReason};
use crate::protocols::ethernet::EthernetFrame;
use crate::protocols::icmp::IcmpHeader;
use crate::protocols::ipv4::Ipv4Header;
use crate::protocols::tcp::TcpHeader;
use crate::protocols::udp::UdpHeader;
use crate::registry::{EtherType, Protocol};

/// One decoded header, borrowing the frame it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedLayer<'a> {
    Ethernet(EthernetFrame<'a>),
    Arp(ArpMessage<'a>),
    Ipv4(Ipv4Header<'a>),
    Tcp(TcpHeader<'a>),
    Udp(UdpHeader<'a>),
    Icmp(IcmpHeader<'a>),
}

impl<'a> DecodedLayer<'a> {
    pub fn kind(&self) -> LayerKind {
        match self {
            DecodedLayer::Ethernet(_) => LayerKind::Ethernet,
            DecodedLayer::Arp(_) => LayerKind::Arp,
            DecodedLayer::Ipv4(_) => LayerKind::Ipv4,
            DecodedLayer::Tcp(_) => LayerKind::Tcp,
            DecodedLayer::Udp(_) => LayerKind::Udp,
            DecodedLayer::Icmp(_) => LayerKind::Icmp,
        }
    }

    /// Bytes this layer hands to the next one; `None` for ARP.
    pub fn payload(&self) -> Option<&'a [u8]> {
        match self {
            DecodedLayer::Ethernet(eth) => Some(eth.payload()),
            DecodedLayer::Arp(_) => None,
            DecodedLayer::Ipv4(ip) => Some(ip.payload()),
            DecodedLayer::Tcp(tcp) => Some(tcp.payload()),
            DecodedLayer::Udp(udp) => Some(udp.payload()),
            DecodedLayer::Icmp(icmp) => Some(icmp.payload()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkLayer<'a> {
    Arp(ArpMessage<'a>),
    Ipv4(Ipv4Header<'a>),
}

impl<'a> From<NetworkLayer<'a>> for DecodedLayer<'a> {
    fn from(layer: NetworkLayer<'a>) -> Self {
        match layer {
            NetworkLayer::Arp(arp) => DecodedLayer::Arp(arp),
            NetworkLayer::Ipv4(ip) => DecodedLayer::Ipv4(ip),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportLayer<'a> {
    Tcp(TcpHeader<'a>),
    Udp(UdpHeader<'a>),
    Icmp(IcmpHeader<'a>),
}

impl<'a> From<TransportLayer<'a>> for DecodedLayer<'a> {
    fn from(layer: TransportLayer<'a>) -> Self {
        match layer {
            TransportLayer::Tcp(tcp) => DecodedLayer::Tcp(tcp),
            TransportLayer::Udp(udp) => DecodedLayer::Udp(udp),
            TransportLayer::Icmp(icmp) => DecodedLayer::Icmp(icmp),
        }
    }
}

/// A protocol the pipeline recognizes but has no decoder for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    EtherType(EtherType),
    Protocol { protocol: Protocol, number: u8 },
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unsupported::EtherType(ether_type) => write!(f, "unhandled EtherType {ether_type}"),
            Unsupported::Protocol { protocol, number } => {
                write!(f, "unknown IPv4 protocol {number} ({protocol})")
            }
        }
    }
}

/// Why decoding stopped after at least one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truncation {
    Failed(DecodeError),
    Unsupported(Unsupported),
}

impl Truncation {
    pub fn reason(&self) -> StopReason {
        match self {
            Truncation::Failed(err) => err.reason(),
            Truncation::Unsupported(_) => StopReason::UnsupportedLayer,
        }
    }
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Truncation::Failed(err) => write!(f, "{err}"),
            Truncation::Unsupported(unsupported) => write!(f, "{unsupported}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// Every layer the frame announced was decoded.
    Complete,
    /// Stopped after one or more layers.
    Truncated(Truncation),
    /// The Ethernet header itself could not be decoded.
    InvalidFirstLayer(DecodeError),
}

impl DecodeStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, DecodeStatus::Complete)
    }

    pub fn reason(&self) -> Option<StopReason> {
        match self {
            DecodeStatus::Complete => None,
            DecodeStatus::Truncated(truncation) => Some(truncation.reason()),
            DecodeStatus::InvalidFirstLayer(err) => Some(err.reason()),
        }
    }

    /// Stable tag: `complete`, `truncated` or `invalid_first_layer`.
    pub fn label(&self) -> &'static str {
        match self {
            DecodeStatus::Complete => "complete",
            DecodeStatus::Truncated(_) => "truncated",
            DecodeStatus::InvalidFirstLayer(_) => "invalid_first_layer",
        }
    }
}

impl fmt::Display for DecodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeStatus::Complete => f.write_str("complete"),
            DecodeStatus::Truncated(truncation) => write!(f, "truncated: {truncation}"),
            DecodeStatus::InvalidFirstLayer(err) => write!(f, "invalid frame: {err}"),
        }
    }
}

/// Decoded layers of one frame, in order, plus how decoding ended.
///
/// Holds at most one layer per level, inline; no heap allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeResult<'a> {
    ethernet: Option<EthernetFrame<'a>>,
    network: Option<NetworkLayer<'a>>,
    transport: Option<TransportLayer<'a>>,
    status: DecodeStatus,
}

impl<'a> DecodeResult<'a> {
    fn invalid(err: DecodeError) -> Self {
        Self {
            ethernet: None,
            network: None,
            transport: None,
            status: DecodeStatus::InvalidFirstLayer(err),
        }
    }

    fn started(ethernet: EthernetFrame<'a>) -> Self {
        Self {
            ethernet: Some(ethernet),
            network: None,
            transport: None,
            status: DecodeStatus::Complete,
        }
    }

    fn truncated(mut self, truncation: Truncation) -> Self {
        log::debug!("decode stopped after {} layer(s): {truncation}", self.len());
        self.status = DecodeStatus::Truncated(truncation);
        self
    }

    pub fn status(&self) -> DecodeStatus {
        self.status
    }

    pub fn ethernet(&self) -> Option<EthernetFrame<'a>> {
        self.ethernet
    }

    pub fn network(&self) -> Option<NetworkLayer<'a>> {
        self.network
    }

    pub fn transport(&self) -> Option<TransportLayer<'a>> {
        self.transport
    }

    pub fn ipv4(&self) -> Option<Ipv4Header<'a>> {
        match self.network {
            Some(NetworkLayer::Ipv4(ip)) => Some(ip),
            _ => None,
        }
    }

    /// Decoded layers, outermost first.
    pub fn layers(&self) -> impl Iterator<Item = DecodedLayer<'a>> + '_ {
        self.ethernet
            .map(DecodedLayer::Ethernet)
            .into_iter()
            .chain(self.network.map(DecodedLayer::from))
            .chain(self.transport.map(DecodedLayer::from))
    }

    pub fn len(&self) -> usize {
        usize::from(self.ethernet.is_some())
            + usize::from(self.network.is_some())
            + usize::from(self.transport.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.ethernet.is_none()
    }
}

/// Decode `frame` as far as the supported protocols allow.
///
/// # Examples
/// ```
/// use pktscope_core::{DecodeStatus, StopReason, decode};
///
/// let result = decode(&[0u8; 13]);
/// assert!(result.is_empty());
/// assert!(matches!(result.status(), DecodeStatus::InvalidFirstLayer(_)));
/// assert_eq!(result.status().reason(), Some(StopReason::TooShort));
/// ```
pub fn decode(frame: &[u8]) -> DecodeResult<'_> {
    let ethernet = match EthernetFrame::parse(frame) {
        Ok(ethernet) => ethernet,
        Err(err) => {
            log::debug!("invalid frame: {err}");
            return DecodeResult::invalid(err);
        }
    };
    let mut result = DecodeResult::started(ethernet);
    log::trace!(
        "ethernet: {} -> {}, ethertype {}",
        ethernet.source(),
        ethernet.destination(),
        ethernet.ether_type()
    );

    let network = match ethernet.ether_type() {
        EtherType::Ipv4 => Ipv4Header::parse(ethernet.payload()).map(NetworkLayer::Ipv4),
        EtherType::Arp => ArpMessage::parse(ethernet.payload()).map(NetworkLayer::Arp),
        other => return result.truncated(Truncation::Unsupported(Unsupported::EtherType(other))),
    };
    let network = match network {
        Ok(network) => network,
        Err(err) => return result.truncated(Truncation::Failed(err)),
    };
    result.network = Some(network);

    let ip = match network {
        NetworkLayer::Arp(_) => {
            log::trace!("arp: terminal layer");
            return result;
        }
        NetworkLayer::Ipv4(ip) => ip,
    };
    log::trace!(
        "ipv4: {} -> {}, protocol {} ({}), payload {} bytes",
        ip.source(),
        ip.destination(),
        ip.protocol_number(),
        ip.protocol(),
        ip.payload_len()
    );

    let transport = match ip.protocol() {
        Protocol::Tcp => TcpHeader::parse(ip.payload()).map(TransportLayer::Tcp),
        Protocol::Udp => UdpHeader::parse(ip.payload()).map(TransportLayer::Udp),
        Protocol::Icmp => IcmpHeader::parse(ip.payload()).map(TransportLayer::Icmp),
        protocol => {
            let unsupported = Unsupported::Protocol {
                protocol,
                number: ip.protocol_number(),
            };
            return result.truncated(Truncation::Unsupported(unsupported));
        }
    };
    match transport {
        Ok(transport) => {
            result.transport = Some(transport);
            result
        }
        Err(err) => result.truncated(Truncation::Failed(err)),
    }
}
