use std::ops::Range;

use crate::protocols::LayerKind;
use crate::protocols::error::DecodeError;

/// Bounds-checked, big-endian field access over one layer's bytes.
///
/// The reader never copies: every slice it returns borrows the input with
/// the input's lifetime.
pub(crate) struct FieldReader<'a> {
    bytes: &'a [u8],
    layer: LayerKind,
}

impl<'a> FieldReader<'a> {
    /// Wrap `bytes`, rejecting them unless at least `min_len` are present.
    pub(crate) fn new(bytes: &'a [u8], layer: LayerKind, min_len: usize) -> Result<Self, DecodeError> {
        let reader = Self { bytes, layer };
        reader.require_len(min_len)?;
        Ok(reader)
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn require_len(&self, needed: usize) -> Result<(), DecodeError> {
        if self.bytes.len() < needed {
            return Err(self.too_short(needed));
        }
        Ok(())
    }

    pub(crate) fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or_else(|| self.too_short(offset + 1))
    }

    pub(crate) fn read_u16_be(&self, range: Range<usize>) -> Result<u16, DecodeError> {
        let bytes: [u8; 2] = self.read_array(range)?;
        Ok(u16::from_be_bytes(bytes))
    }

    pub(crate) fn read_u32_be(&self, range: Range<usize>) -> Result<u32, DecodeError> {
        let bytes: [u8; 4] = self.read_array(range)?;
        Ok(u32::from_be_bytes(bytes))
    }

    pub(crate) fn read_array<const N: usize>(&self, range: Range<usize>) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_slice(range)?;
        bytes.try_into().map_err(|_| self.too_short(N))
    }

    pub(crate) fn read_slice(&self, range: Range<usize>) -> Result<&'a [u8], DecodeError> {
        let end = range.end;
        self.bytes.get(range).ok_or_else(|| self.too_short(end))
    }

    /// Everything from `offset` to the end of the input.
    pub(crate) fn read_tail(&self, offset: usize) -> Result<&'a [u8], DecodeError> {
        self.bytes.get(offset..).ok_or_else(|| self.too_short(offset))
    }

    fn too_short(&self, needed: usize) -> DecodeError {
        DecodeError::TooShort {
            layer: self.layer,
            needed,
            actual: self.bytes.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FieldReader;
    use crate::protocols::LayerKind;
    use crate::protocols::error::DecodeError;

    #[test]
    fn new_rejects_short_input() {
        let bytes = [0u8; 7];
        let err = match FieldReader::new(&bytes, LayerKind::Udp, 8) {
            Ok(_) => panic!("expected short input to be rejected"),
            Err(err) => err,
        };
        assert_eq!(
            err,
            DecodeError::TooShort {
                layer: LayerKind::Udp,
                needed: 8,
                actual: 7,
            }
        );
    }

    #[test]
    fn reads_big_endian_fields() {
        let bytes = [0x12, 0x34, 0xde, 0xad, 0xbe, 0xef];
        let reader = FieldReader::new(&bytes, LayerKind::Tcp, 6).unwrap();
        assert_eq!(reader.read_u8(0).unwrap(), 0x12);
        assert_eq!(reader.read_u16_be(0..2).unwrap(), 0x1234);
        assert_eq!(reader.read_u32_be(2..6).unwrap(), 0xdead_beef);
        assert_eq!(reader.read_array::<2>(4..6).unwrap(), [0xbe, 0xef]);
    }

    #[test]
    fn out_of_range_reads_report_needed_length() {
        let bytes = [0u8; 4];
        let reader = FieldReader::new(&bytes, LayerKind::Icmp, 0).unwrap();
        let err = reader.read_u32_be(2..6).unwrap_err();
        assert!(matches!(err, DecodeError::TooShort { needed: 6, actual: 4, .. }));
        assert!(reader.read_u8(4).is_err());
    }

    #[test]
    fn tail_borrows_input() {
        let bytes = [1u8, 2, 3];
        let reader = FieldReader::new(&bytes, LayerKind::Ethernet, 0).unwrap();
        let tail = reader.read_tail(1).unwrap();
        assert_eq!(tail, &[2, 3]);
        assert!(std::ptr::eq(tail.as_ptr(), bytes[1..].as_ptr()));
        assert!(reader.read_tail(3).unwrap().is_empty());
        assert!(reader.read_tail(4).is_err());
    }
}
