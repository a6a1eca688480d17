use crate::{Error, Result};
use bytes::BufMut;

/// Maximum encoded size of a varint: ten 7-bit groups cover 64 bits.
pub const MAX_VARINT_SIZE: usize = 10;

/// The size of the value encoded as a varint.
pub fn varint_size(value: u64) -> usize {
    let mut v = value;
    let mut size = 1;
    while v >= 0x80 {
        v >>= 7;
        size += 1;
    }
    size
}

/// Write a varint to the buffer.
///
/// The encoding is base-128 little-endian: seven value bits per byte, high
/// bit set on every byte except the last. This is the record wire format,
/// it is not the Bitcoin 0xfd/0xfe/0xff scheme.
pub fn varint_encode(buffer: &mut dyn BufMut, value: u64) {
    let mut v = value;
    while v >= 0x80 {
        buffer.put_u8((v as u8 & 0x7f) | 0x80);
        v >>= 7;
    }
    buffer.put_u8(v as u8);
}

/// Read a varint from the start of the slice.
///
/// Returns the value and the number of bytes consumed. A truncated or
/// over-long encoding is [Error::NotTransactionPack].
pub fn varint_decode(buffer: &[u8]) -> Result<(u64, usize)> {
    let mut value: u64 = 0;
    for (i, &byte) in buffer.iter().take(MAX_VARINT_SIZE).enumerate() {
        if 9 == i && byte > 0x01 {
            // tenth byte may only carry the top bit of a u64
            return Err(Error::NotTransactionPack);
        }
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(Error::NotTransactionPack)
}

/// Read a varint length prefix and bound the field that follows it.
///
/// This is the single choke point for every variable-length field decoded
/// from untrusted input. The length must lie in `min ..= max` and the
/// prefixed field must fit inside the remaining buffer. On success returns
/// `(length, offset)` where `offset` points at the first byte of the field;
/// any violation is [Error::NotTransactionPack].
pub fn clipped_varint(buffer: &[u8], min: usize, max: usize) -> Result<(usize, usize)> {
    let (value, used) = varint_decode(buffer)?;
    if value > max as u64 || (value as usize) < min {
        return Err(Error::NotTransactionPack);
    }
    let length = value as usize;
    if used + length > buffer.len() {
        return Err(Error::NotTransactionPack);
    }
    Ok((length, used))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size() {
        assert_eq!(varint_size(0), 1);
        assert_eq!(varint_size(0x7f), 1);
        assert_eq!(varint_size(0x80), 2);
        assert_eq!(varint_size(0x3fff), 2);
        assert_eq!(varint_size(0x4000), 3);
        assert_eq!(varint_size(u32::max_value() as u64), 5);
        assert_eq!(varint_size(u64::max_value()), 10);
    }

    #[test]
    fn write_read() {
        write_read_value(0);
        write_read_value(0x7f);
        write_read_value(0x80);
        write_read_value(u16::max_value() as u64);
        write_read_value(u32::max_value() as u64);
        write_read_value(u64::max_value());
    }

    fn write_read_value(n: u64) {
        let mut v = Vec::new();
        varint_encode(&mut v, n);
        assert_eq!(v.len(), varint_size(n));
        let (j, used) = varint_decode(&v).unwrap();
        assert_eq!(j, n);
        assert_eq!(used, v.len());
    }

    #[test]
    fn test_known_values() {
        let mut v = Vec::new();
        varint_encode(&mut v, 0);
        assert_eq!(v, vec![0x00]);
        v.clear();
        varint_encode(&mut v, 1);
        assert_eq!(v, vec![0x01]);
        v.clear();
        varint_encode(&mut v, 0x7f);
        assert_eq!(v, vec![0x7f]);
        v.clear();
        varint_encode(&mut v, 0x80);
        assert_eq!(v, vec![0x80, 0x01]);
        v.clear();
        varint_encode(&mut v, 0x81);
        assert_eq!(v, vec![0x81, 0x01]);
        v.clear();
        varint_encode(&mut v, 300);
        assert_eq!(v, vec![0xac, 0x02]);
        v.clear();
        varint_encode(&mut v, 0x3fff);
        assert_eq!(v, vec![0xff, 0x7f]);
        v.clear();
        varint_encode(&mut v, 0x4000);
        assert_eq!(v, vec![0x80, 0x80, 0x01]);
        v.clear();
        varint_encode(&mut v, u64::max_value());
        assert_eq!(
            v,
            vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]
        );
    }

    #[test]
    fn decode_truncated() {
        // continuation bit set, nothing follows
        assert!(varint_decode(&[0x80]).is_err());
        assert!(varint_decode(&[0xff, 0xff]).is_err());
        assert!(varint_decode(&[]).is_err());
    }

    #[test]
    fn decode_overlong() {
        // eleven continuation bytes can never be a u64
        let overlong = [0xffu8; 11];
        assert!(varint_decode(&overlong).is_err());
        // tenth byte carrying more than the top bit overflows
        let overflow = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02];
        assert!(varint_decode(&overflow).is_err());
    }

    #[test]
    fn clipped_accepts_in_bounds() {
        // length 5, then 5 bytes of field
        let buf = [0x05, b'a', b'b', b'c', b'd', b'e'];
        let (length, offset) = clipped_varint(&buf, 1, 64).unwrap();
        assert_eq!(length, 5);
        assert_eq!(offset, 1);
        assert_eq!(&buf[offset..offset + length], b"abcde");
    }

    #[test]
    fn clipped_rejects_out_of_bounds() {
        let buf = [0x05, b'a', b'b', b'c', b'd', b'e'];
        // below minimum
        assert!(clipped_varint(&buf, 6, 64).is_err());
        // above maximum
        assert!(clipped_varint(&buf, 0, 4).is_err());
        // field extends past the buffer
        let short = [0x05, b'a', b'b'];
        assert!(clipped_varint(&short, 0, 64).is_err());
        // empty buffer
        assert!(clipped_varint(&[], 0, 64).is_err());
    }

    #[test]
    fn clipped_zero_length_field() {
        let buf = [0x00];
        let (length, offset) = clipped_varint(&buf, 0, 64).unwrap();
        assert_eq!(length, 0);
        assert_eq!(offset, 1);
    }
}
