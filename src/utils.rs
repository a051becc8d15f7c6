//! Low-level I/O primitives shared by the decoder.
//!
//! Structural reads never tolerate a short read: each function either fills
//! the whole buffer or reports [`FormatError::Truncated`] with the number of
//! bytes that were actually available.

use std::io::{ErrorKind, Read};

use crate::Result;
use crate::error::FormatError;

/// Fill `buf` completely from `r`.
///
/// `region` names what is being read so a truncation error can say where the
/// file ended.
pub(crate) fn read_region<R: Read>(r: &mut R, buf: &mut [u8], region: &'static str) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(FormatError::Truncated {
                    region,
                    expected: buf.len(),
                    actual: filled,
                }
                .into());
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Read exactly `N` bytes into a fixed-size array.
#[inline]
pub(crate) fn bytesa<const N: usize>(r: &mut impl Read, region: &'static str) -> Result<[u8; N]> {
    let mut b = [0u8; N];
    read_region(r, &mut b, region)?;
    Ok(b)
}

/// Read exactly `len` bytes into a `Vec`.
#[inline]
pub(crate) fn bytesv<R: Read>(r: &mut R, len: usize, region: &'static str) -> Result<Vec<u8>> {
    let mut b = vec![0u8; len];
    read_region(r, &mut b, region)?;
    Ok(b)
}

/// Decode a little-endian `u16` at `at`. `buf` must hold `at + 2` bytes.
#[inline]
pub(crate) fn le_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

/// Decode a little-endian `u32` at `at`. `buf` must hold `at + 4` bytes.
#[inline]
pub(crate) fn le_u32(buf: &[u8], at: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(b)
}

/// Decode a little-endian `u64` at `at`. `buf` must hold `at + 8` bytes.
#[inline]
pub(crate) fn le_u64(buf: &[u8], at: usize) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&buf[at..at + 8]);
    u64::from_le_bytes(b)
}

/// Extract a name from the string table starting at `offset`.
///
/// The name runs up to the first null byte, or to the end of the table if
/// there is none. Returns [`None`] if `offset` is past the end of `buf`.
#[inline]
pub(crate) fn null_string(buf: &[u8], offset: usize) -> Option<String> {
    let slice = buf.get(offset..)?;
    let end = slice.iter().position(|&b| b == 0).unwrap_or(slice.len());
    Some(String::from_utf8_lossy(&slice[..end]).into_owned())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::Error;

    #[test]
    fn short_read_reports_available_bytes() {
        let mut r = Cursor::new(vec![1u8, 2, 3]);
        let err = bytesa::<8>(&mut r, "header").unwrap_err();
        match err {
            Error::Format(FormatError::Truncated {
                region,
                expected,
                actual,
            }) => {
                assert_eq!(region, "header");
                assert_eq!(expected, 8);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn little_endian_fields() {
        let buf = [0x34, 0x12, 0, 0, 0xEF, 0xBE, 0xAD, 0xDE, 1, 0, 0, 0, 0, 0, 0, 0x80];
        assert_eq!(le_u16(&buf, 0), 0x1234);
        assert_eq!(le_u32(&buf, 4), 0xDEAD_BEEF);
        assert_eq!(le_u64(&buf, 8), 0x8000_0000_0000_0001);
    }

    #[test]
    fn names_stop_at_null_or_table_end() {
        let table = b"a.nca\0b.tik\0tail";
        assert_eq!(null_string(table, 0).as_deref(), Some("a.nca"));
        assert_eq!(null_string(table, 6).as_deref(), Some("b.tik"));
        assert_eq!(null_string(table, 12).as_deref(), Some("tail"));
        assert_eq!(null_string(table, table.len()).as_deref(), Some(""));
        assert_eq!(null_string(table, table.len() + 1), None);
    }
}
