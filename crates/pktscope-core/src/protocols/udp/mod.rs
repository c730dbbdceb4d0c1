//! UDP header decoding.

pub mod layout;
pub mod parser;

pub use parser::UdpHeader;
