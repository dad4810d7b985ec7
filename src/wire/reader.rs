use std::io::Read;

use crate::error::{PymaError, Result};

const INT_BYTES: usize = 4;
const DOUBLE_BYTES: usize = 8;

// ---------------------------------------------------------------------------
// ByteReader – little-endian primitive decoding over any `Read`
// ---------------------------------------------------------------------------

/// Cursor over a serialized state stream.
///
/// Wraps any [`Read`] and keeps count of the bytes consumed so errors can
/// point at the offending offset. All multi-byte values are little-endian
/// regardless of host byte order.
#[derive(Debug)]
pub struct ByteReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Give back the wrapped source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read exactly `count` bytes.
    ///
    /// The buffer grows only as data actually arrives, so a corrupt length
    /// field cannot trigger an allocation larger than the source itself.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let read = (&mut self.inner)
            .take(count as u64)
            .read_to_end(&mut buf)?;
        if read != count {
            return Err(PymaError::TruncatedInput {
                offset: self.offset,
                needed: count,
                available: read,
            });
        }
        self.offset += count as u64;
        Ok(buf)
    }

    /// Read `count` little-endian `i32` values.
    pub fn read_ints(&mut self, count: usize) -> Result<Vec<i32>> {
        let raw = self.read_bytes(byte_len(count, INT_BYTES)?)?;
        let ints = raw
            .chunks_exact(INT_BYTES)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect::<Vec<_>>();
        log::trace!("read {count} ints ending at byte {}", self.offset);
        Ok(ints)
    }

    /// Read `count` little-endian IEEE-754 doubles, bit for bit.
    pub fn read_doubles(&mut self, count: usize) -> Result<Vec<f64>> {
        let raw = self.read_bytes(byte_len(count, DOUBLE_BYTES)?)?;
        let doubles = raw
            .chunks_exact(DOUBLE_BYTES)
            .map(|c| {
                let mut word = [0u8; DOUBLE_BYTES];
                word.copy_from_slice(c);
                f64::from_le_bytes(word)
            })
            .collect::<Vec<_>>();
        log::trace!("read {count} doubles ending at byte {}", self.offset);
        Ok(doubles)
    }

    pub fn read_int(&mut self) -> Result<i32> {
        let raw = self.read_bytes(INT_BYTES)?;
        Ok(i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    pub fn read_double(&mut self) -> Result<f64> {
        Ok(self.read_doubles(1)?[0])
    }

    /// Read a non-negative `i32` used as a count or dimension.
    pub fn read_count(&mut self, what: &str) -> Result<usize> {
        let at = self.offset;
        let value = self.read_int()?;
        usize::try_from(value).map_err(|_| {
            PymaError::ShapeError(format!("negative {what} {value} at byte {at}"))
        })
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_count("string length")?;
        let start = self.offset;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes).map_err(|source| PymaError::InvalidString {
            offset: start,
            source,
        })
    }
}

fn byte_len(count: usize, width: usize) -> Result<usize> {
    count
        .checked_mul(width)
        .ok_or_else(|| PymaError::ShapeError(format!("{count} values of {width} bytes overflow")))
}
