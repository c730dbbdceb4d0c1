//! Numeric protocol identifiers mapped to closed enumerations.
//!
//! Both mappings are total: a value with no named variant becomes
//! `Unknown`, never an error. Values follow the IEEE EtherType registry and
//! the IANA protocol numbers registry.

use std::fmt;

/// EtherType carried in bytes 12..14 of an Ethernet II header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EtherType {
    Ipv4,
    Arp,
    WakeOnLan,
    Vlan,
    Ipv6,
    Lldp,
    Unknown(u16),
}

impl EtherType {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
    pub const WAKE_ON_LAN: u16 = 0x0842;
    pub const VLAN: u16 = 0x8100;
    pub const IPV6: u16 = 0x86DD;
    pub const LLDP: u16 = 0x88CC;

    pub fn from_raw(value: u16) -> Self {
        match value {
            Self::IPV4 => EtherType::Ipv4,
            Self::ARP => EtherType::Arp,
            Self::WAKE_ON_LAN => EtherType::WakeOnLan,
            Self::VLAN => EtherType::Vlan,
            Self::IPV6 => EtherType::Ipv6,
            Self::LLDP => EtherType::Lldp,
            other => EtherType::Unknown(other),
        }
    }

    pub fn raw(&self) -> u16 {
        match self {
            EtherType::Ipv4 => Self::IPV4,
            EtherType::Arp => Self::ARP,
            EtherType::WakeOnLan => Self::WAKE_ON_LAN,
            EtherType::Vlan => Self::VLAN,
            EtherType::Ipv6 => Self::IPV6,
            EtherType::Lldp => Self::LLDP,
            EtherType::Unknown(value) => *value,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EtherType::Ipv4 => "IPv4",
            EtherType::Arp => "ARP",
            EtherType::WakeOnLan => "Wake-on-LAN",
            EtherType::Vlan => "VLAN",
            EtherType::Ipv6 => "IPv6",
            EtherType::Lldp => "LLDP",
            EtherType::Unknown(_) => "Unknown",
        }
    }
}

impl From<u16> for EtherType {
    fn from(value: u16) -> Self {
        EtherType::from_raw(value)
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x} ({})", self.raw(), self.name())
    }
}

/// IP protocol number carried in byte 9 of an IPv4 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Hopopt,
    Icmp,
    Igmp,
    Tcp,
    Udp,
    Gre,
    Esp,
    Ah,
    Icmpv6,
    Eigrp,
    Ospf,
    Sctp,
    Unknown,
}

impl Protocol {
    pub fn from_number(number: u8) -> Self {
        match number {
            0 => Protocol::Hopopt,
            1 => Protocol::Icmp,
            2 => Protocol::Igmp,
            6 => Protocol::Tcp,
            17 => Protocol::Udp,
            47 => Protocol::Gre,
            50 => Protocol::Esp,
            51 => Protocol::Ah,
            58 => Protocol::Icmpv6,
            88 => Protocol::Eigrp,
            89 => Protocol::Ospf,
            132 => Protocol::Sctp,
            _ => Protocol::Unknown,
        }
    }

    /// Assigned number, `None` for `Unknown`.
    pub fn number(&self) -> Option<u8> {
        let number = match self {
            Protocol::Hopopt => 0,
            Protocol::Icmp => 1,
            Protocol::Igmp => 2,
            Protocol::Tcp => 6,
            Protocol::Udp => 17,
            Protocol::Gre => 47,
            Protocol::Esp => 50,
            Protocol::Ah => 51,
            Protocol::Icmpv6 => 58,
            Protocol::Eigrp => 88,
            Protocol::Ospf => 89,
            Protocol::Sctp => 132,
            Protocol::Unknown => return None,
        };
        Some(number)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Protocol::Hopopt => "HOPOPT",
            Protocol::Icmp => "ICMP",
            Protocol::Igmp => "IGMP",
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Gre => "GRE",
            Protocol::Esp => "ESP",
            Protocol::Ah => "AH",
            Protocol::Icmpv6 => "ICMPv6",
            Protocol::Eigrp => "EIGRP",
            Protocol::Ospf => "OSPF",
            Protocol::Sctp => "SCTP",
            Protocol::Unknown => "Unknown",
        }
    }
}

impl From<u8> for Protocol {
    fn from(number: u8) -> Self {
        Protocol::from_number(number)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
