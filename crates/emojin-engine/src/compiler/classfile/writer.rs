//! Big-endian primitives and the class-file string encoding.

use crate::error::CompileError;

/// Appends big-endian integers to a byte buffer.
pub trait ByteWriter {
    /// Appends one byte.
    fn put_u8(&mut self, value: u8);
    /// Appends a big-endian `u16`.
    fn put_u16(&mut self, value: u16);
    /// Appends a big-endian `u32`.
    fn put_u32(&mut self, value: u32);
    /// Appends a big-endian `i16`.
    fn put_i16(&mut self, value: i16);
    /// Appends a big-endian `i32`.
    fn put_i32(&mut self, value: i32);
    /// Appends a big-endian `i64`.
    fn put_i64(&mut self, value: i64);
}

impl ByteWriter for Vec<u8> {
    fn put_u8(&mut self, value: u8) {
        self.push(value);
    }

    fn put_u16(&mut self, value: u16) {
        self.extend_from_slice(&value.to_be_bytes());
    }

    fn put_u32(&mut self, value: u32) {
        self.extend_from_slice(&value.to_be_bytes());
    }

    fn put_i16(&mut self, value: i16) {
        self.extend_from_slice(&value.to_be_bytes());
    }

    fn put_i32(&mut self, value: i32) {
        self.extend_from_slice(&value.to_be_bytes());
    }

    fn put_i64(&mut self, value: i64) {
        self.extend_from_slice(&value.to_be_bytes());
    }
}

/// Encodes `text` the way `CONSTANT_Utf8` entries store it.
///
/// This is the JVM's "modified UTF-8": NUL is written as the two bytes
/// `C0 80`, and characters outside the BMP are written as a surrogate
/// pair, each half encoded in three bytes.
pub fn modified_utf8(text: &str) -> Result<Vec<u8>, CompileError> {
    let mut out = Vec::with_capacity(text.len());
    let mut units = [0u16; 2];

    for ch in text.chars() {
        match ch as u32 {
            0 => out.extend_from_slice(&[0xC0, 0x80]),
            1..=0x7F => out.push(ch as u8),
            0x80..=0xFFFF => push_unit(&mut out, ch as u32 as u16),
            _ => {
                for unit in ch.encode_utf16(&mut units) {
                    push_unit(&mut out, *unit);
                }
            }
        }
    }

    if out.len() > u16::MAX as usize {
        return Err(CompileError::StringTooLong { length: out.len() });
    }
    Ok(out)
}

fn push_unit(out: &mut Vec<u8>, unit: u16) {
    if unit < 0x800 {
        out.push(0xC0 | (unit >> 6) as u8);
        out.push(0x80 | (unit & 0x3F) as u8);
    } else {
        out.push(0xE0 | (unit >> 12) as u8);
        out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
        out.push(0x80 | (unit & 0x3F) as u8);
    }
}
