//! ARP decoding for Ethernet/IPv4 address resolution.
//!
//! Fields sit at fixed offsets for 6-byte hardware and 4-byte protocol
//! addresses. The declared size fields are exposed but never used to move
//! the address fields, so ARP for other link or network types decodes with
//! misplaced addresses. ARP is a terminal layer.

pub mod layout;
pub mod parser;

pub use parser::ArpMessage;
