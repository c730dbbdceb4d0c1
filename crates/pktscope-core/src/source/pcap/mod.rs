//! PCAP/PCAPNG file source.
//!
//! Reads captures recorded elsewhere; the format is picked from the magic
//! number, and each frame keeps the link type of the interface it was
//! captured on.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;
