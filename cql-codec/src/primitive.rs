//! Primitive byte I/O: the fixed-width integer, vint, length-prefixed-bytes
//! and UUID helpers every codec builds on, in the advance-the-slice reading
//! style (`let (rest, v) = read_i32(data)?; data = rest;`) and writing via
//! `bytes::BufMut`.
//!
//! `nom` is deliberately not used here (see DESIGN.md): every layout below is
//! a fixed binary shape, not a grammar, so a plain cursor is more direct than
//! a parser combinator.

use bytes::BufMut;
use integer_encoding::{VarInt, VarIntWriter};

use crate::error::{CodecError, CodecErrorKind};

fn require(input: &[u8], n: usize) -> Result<(), CodecError> {
    if input.len() < n {
        Err(CodecErrorKind::BytesInsufficient {
            needed: n,
            available: input.len(),
        }
        .into())
    } else {
        Ok(())
    }
}

macro_rules! read_fixed {
    ($name:ident, $t:ty, $size:expr) => {
        pub fn $name(input: &[u8]) -> Result<(&[u8], $t), CodecError> {
            require(input, $size)?;
            let (head, rest) = input.split_at($size);
            let array: [u8; $size] = head.try_into().expect("split_at guarantees the length");
            Ok((rest, <$t>::from_be_bytes(array)))
        }
    };
}

read_fixed!(read_u8, u8, 1);
read_fixed!(read_i8, i8, 1);
read_fixed!(read_u16, u16, 2);
read_fixed!(read_i16, i16, 2);
read_fixed!(read_u32, u32, 4);
read_fixed!(read_i32, i32, 4);
read_fixed!(read_u64, u64, 8);
read_fixed!(read_i64, i64, 8);
read_fixed!(read_u128, u128, 16);
read_fixed!(read_f32, f32, 4);
read_fixed!(read_f64, f64, 8);

pub fn write_u8(buf: &mut impl BufMut, v: u8) {
    buf.put_u8(v);
}
pub fn write_i8(buf: &mut impl BufMut, v: i8) {
    buf.put_i8(v);
}
pub fn write_u16(buf: &mut impl BufMut, v: u16) {
    buf.put_u16(v);
}
pub fn write_i16(buf: &mut impl BufMut, v: i16) {
    buf.put_i16(v);
}
pub fn write_u32(buf: &mut impl BufMut, v: u32) {
    buf.put_u32(v);
}
pub fn write_i32(buf: &mut impl BufMut, v: i32) {
    buf.put_i32(v);
}
pub fn write_u64(buf: &mut impl BufMut, v: u64) {
    buf.put_u64(v);
}
pub fn write_i64(buf: &mut impl BufMut, v: i64) {
    buf.put_i64(v);
}
pub fn write_u128(buf: &mut impl BufMut, v: u128) {
    buf.put_u128(v);
}
pub fn write_f32(buf: &mut impl BufMut, v: f32) {
    buf.put_f32(v);
}
pub fn write_f64(buf: &mut impl BufMut, v: f64) {
    buf.put_f64(v);
}

/// Reads a zigzag-encoded variable-length signed integer (Cassandra's
/// `vint`).
pub fn read_vint(input: &[u8]) -> Result<(&[u8], i64), CodecError> {
    i64::decode_var(input)
        .map(|(v, n)| (&input[n..], v))
        .ok_or_else(|| {
            CodecErrorKind::BytesInsufficient {
                needed: 1,
                available: input.len(),
            }
            .into()
        })
}

/// Writes a zigzag-encoded variable-length signed integer.
pub fn write_vint(buf: &mut Vec<u8>, value: i64) {
    buf.write_varint(value).expect("Vec<u8> writes never fail");
}

/// Reads a `[len:i32][body]` value; `len == -1` is the CQL NULL marker.
/// Lengths below `-1` are a protocol error.
pub fn read_bytes(input: &[u8]) -> Result<(&[u8], Option<&[u8]>), CodecError> {
    let (rest, len) = read_i32(input)?;
    if len == -1 {
        return Ok((rest, None));
    }
    if len < -1 {
        return Err(CodecErrorKind::BytesInsufficient {
            needed: 0,
            available: rest.len(),
        }
        .into());
    }
    require(rest, len as usize)?;
    let (body, rest) = rest.split_at(len as usize);
    Ok((rest, Some(body)))
}

/// Writes `value` as a `[len:i32][body]` pair, `None` as length `-1`.
pub fn write_bytes(buf: &mut impl BufMut, value: Option<&[u8]>) {
    match value {
        None => buf.put_i32(-1),
        Some(body) => {
            buf.put_i32(body.len() as i32);
            buf.put_slice(body);
        }
    }
}

pub fn read_uuid(input: &[u8]) -> Result<(&[u8], [u8; 16]), CodecError> {
    require(input, 16)?;
    let (head, rest) = input.split_at(16);
    Ok((rest, head.try_into().expect("split_at guarantees the length")))
}

pub fn write_uuid(buf: &mut impl BufMut, value: &[u8; 16]) {
    buf.put_slice(value);
}

/// Reads a collection/map `<size>` prefix: 2 bytes (unsigned) in legacy
/// versions, 4 bytes (signed, must be non-negative) otherwise.
pub fn read_collection_size(
    input: &[u8],
    four_byte: bool,
) -> Result<(&[u8], u32), CodecError> {
    if four_byte {
        let (rest, n) = read_i32(input)?;
        if n < 0 {
            return Err(CodecErrorKind::CollectionSizeNegative { size: n as i64 }.into());
        }
        Ok((rest, n as u32))
    } else {
        let (rest, n) = read_u16(input)?;
        Ok((rest, n as u32))
    }
}

/// Writes a collection/map `<size>` prefix, checking it fits the version's
/// width.
pub fn write_collection_size(
    buf: &mut impl BufMut,
    size: usize,
    four_byte: bool,
) -> Result<(), CodecError> {
    if four_byte {
        if size > i32::MAX as usize {
            return Err(CodecErrorKind::CollectionSizeTooLarge {
                size: size as i64,
                max: i32::MAX as i64,
            }
            .into());
        }
        buf.put_i32(size as i32);
    } else {
        if size > u16::MAX as usize {
            return Err(CodecErrorKind::CollectionSizeTooLarge {
                size: size as i64,
                max: u16::MAX as i64,
            }
            .into());
        }
        buf.put_u16(size as u16);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_fixed_integers() {
        let mut buf = Vec::new();
        write_i32(&mut buf, -7);
        let (rest, v) = read_i32(&buf).unwrap();
        assert!(rest.is_empty());
        assert_eq!(v, -7);
    }

    #[test]
    fn vint_round_trips_negative_and_positive() {
        for value in [0i64, 1, -1, 123456789, -123456789, i64::MAX, i64::MIN] {
            let mut buf = Vec::new();
            write_vint(&mut buf, value);
            let (rest, decoded) = read_vint(&buf).unwrap();
            assert!(rest.is_empty());
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn null_bytes_round_trip() {
        let mut buf = Vec::new();
        write_bytes(&mut buf, None);
        assert_eq!(buf, vec![0xff, 0xff, 0xff, 0xff]);
        let (rest, v) = read_bytes(&buf).unwrap();
        assert!(rest.is_empty());
        assert_eq!(v, None);
    }

    #[test]
    fn legacy_collection_size_accepts_max_and_rejects_overflow() {
        let mut buf = Vec::new();
        assert!(write_collection_size(&mut buf, 65535, false).is_ok());
        let mut buf = Vec::new();
        assert!(write_collection_size(&mut buf, 65536, false).is_err());
    }

    #[test]
    fn insufficient_bytes_reports_precise_counts() {
        let err = read_i32(&[0u8, 1]).unwrap_err();
        assert_eq!(
            *err.kind(),
            CodecErrorKind::BytesInsufficient {
                needed: 4,
                available: 2
            }
        );
    }
}
