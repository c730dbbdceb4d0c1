//! Ethernet II decoding.
//!
//! The parser reads destination and source hardware addresses and the
//! EtherType, and hands everything after byte 14 to the next layer. There is
//! no checksum at this layer (the FCS is not part of captured frames).

pub mod layout;
pub mod parser;

pub use parser::{EthernetFrame, MacAddr};
