pub const TYPE_OFFSET: usize = 0;
pub const CODE_OFFSET: usize = 1;
pub const CHECKSUM_RANGE: std::ops::Range<usize> = 2..4;
pub const REST_OF_HEADER_RANGE: std::ops::Range<usize> = 4..8;

pub const HEADER_LEN: usize = 8;
