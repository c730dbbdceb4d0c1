//! IPv4 header decoding.
//!
//! The parser validates version, IHL and the declared header length against
//! the captured bytes. The payload view is clamped: when the total length
//! field claims more than was captured, or no more than the header itself,
//! the payload is empty. It never reaches past the buffer.
//!
//! The header checksum is exposed but not verified here; see
//! [`crate::verify_ipv4_header`].

pub mod layout;
pub mod parser;

pub use parser::Ipv4Header;
