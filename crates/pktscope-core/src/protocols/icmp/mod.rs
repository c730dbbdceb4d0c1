//! ICMP header decoding. The four type-dependent bytes are exposed raw.

pub mod layout;
pub mod parser;

pub use parser::IcmpHeader;
