//! Layer decoders.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte offsets and ranges (source of truth)
//! - `parser`: domain-level decoding through the shared `FieldReader`
//!
//! `common::reader` enforces bounds once per header and reads every
//! multi-byte field big-endian; `error` holds the decode error shared by
//! all layers. Decoders are pure and never copy the input: a decoded header
//! borrows the buffer it was parsed from.

pub mod arp;
pub(crate) mod common;
pub mod error;
pub mod ethernet;
pub mod icmp;
pub mod ipv4;
pub mod tcp;
pub mod udp;

use serde::{Deserialize, Serialize};

/// Protocol layer a decoder handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Ethernet,
    Arp,
    Ipv4,
    Tcp,
    Udp,
    Icmp,
}

impl LayerKind {
    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Ethernet => "Ethernet",
            LayerKind::Arp => "ARP",
            LayerKind::Ipv4 => "IPv4",
            LayerKind::Tcp => "TCP",
            LayerKind::Udp => "UDP",
            LayerKind::Icmp => "ICMP",
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
