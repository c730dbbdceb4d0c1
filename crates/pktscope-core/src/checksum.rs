//! Internet checksum (RFC 1071).

/// One's-complement sum of `bytes` taken as big-endian 16-bit words.
///
/// An odd trailing byte is the high byte of a zero-padded word. The result
/// is the numeric checksum; `to_be_bytes()` gives its on-wire form.
///
/// # Examples
/// ```
/// use pktscope_core::internet_checksum;
///
/// assert_eq!(internet_checksum(&[]), 0xffff);
/// assert_eq!(internet_checksum(&[0x00, 0x01, 0xf2, 0x03]), 0x0dfb);
/// ```
pub fn internet_checksum(bytes: &[u8]) -> u16 {
    let mut sum: u64 = 0;
    let mut words = bytes.chunks_exact(2);
    for word in &mut words {
        sum += u64::from(u16::from_be_bytes([word[0], word[1]]));
    }
    if let [last] = words.remainder() {
        sum += u64::from(*last) << 8;
    }
    while sum >> 16 != 0 {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    !(sum as u16)
}

/// True when an IPv4 header (checksum field included as transmitted) sums
/// to zero.
///
/// Decoding never calls this; a mismatch is for the caller to report.
pub fn verify_ipv4_header(header: &[u8]) -> bool {
    internet_checksum(header) == 0
}

#[cfg(test)]
mod tests {
    use super::{internet_checksum, verify_ipv4_header};

    // RFC 1071 section 3 worked example.
    const RFC_SAMPLE: [u8; 8] = [0x00, 0x01, 0xf2, 0x03, 0xf4, 0xf5, 0xf6, 0xf7];

    #[test]
    fn rfc1071_sample() {
        // Folded sum is 0xddf2.
        assert_eq!(internet_checksum(&RFC_SAMPLE), !0xddf2);
    }

    #[test]
    fn odd_length_pads_high_byte() {
        assert_eq!(internet_checksum(&[0xab]), !0xab00);
        assert_eq!(
            internet_checksum(&[0x12, 0x34, 0x56]),
            !(0x1234u16 + 0x5600)
        );
    }

    #[test]
    fn carries_are_folded() {
        // 0xffff + 0x0001 = 0x1_0000 folds to 0x0001.
        assert_eq!(internet_checksum(&[0xff, 0xff, 0x00, 0x01]), !0x0001);
    }

    #[test]
    fn inserting_checksum_makes_header_verify() {
        let mut header = [
            0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0x00, 0x00, 0xc0, 0xa8,
            0x00, 0x01, 0xc0, 0xa8, 0x00, 0xc7,
        ];
        let checksum = internet_checksum(&header);
        assert_eq!(checksum, 0xb861);
        header[10..12].copy_from_slice(&checksum.to_be_bytes());
        assert_eq!(internet_checksum(&header), 0);
        assert!(verify_ipv4_header(&header));

        header[8] = 0x3f;
        assert!(!verify_ipv4_header(&header));
    }
}
