//! TCP header decoding (fixed 20-byte part).
//!
//! Options are not parsed. The data offset is decoded but the payload view
//! always starts at byte 20, and no checksum is computed since that needs
//! the IPv4 pseudo-header.

pub mod layout;
pub mod parser;

pub use parser::TcpHeader;
