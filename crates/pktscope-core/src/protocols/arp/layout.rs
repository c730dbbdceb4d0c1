pub const HARDWARE_TYPE_RANGE: std::ops::Range<usize> = 0..2;
pub const PROTOCOL_TYPE_RANGE: std::ops::Range<usize> = 2..4;
pub const HARDWARE_SIZE_OFFSET: usize = 4;
pub const PROTOCOL_SIZE_OFFSET: usize = 5;
pub const OPCODE_RANGE: std::ops::Range<usize> = 6..8;

// Fixed for 6-byte hardware and 4-byte protocol addresses; the size fields
// above are never used to move these.
pub const SENDER_MAC_RANGE: std::ops::Range<usize> = 8..14;
pub const SENDER_IP_RANGE: std::ops::Range<usize> = 14..18;
pub const TARGET_MAC_RANGE: std::ops::Range<usize> = 18..24;
pub const TARGET_IP_RANGE: std::ops::Range<usize> = 24..28;

pub const MESSAGE_LEN: usize = 28;

pub const OPCODE_REQUEST: u16 = 1;
pub const OPCODE_REPLY: u16 = 2;
