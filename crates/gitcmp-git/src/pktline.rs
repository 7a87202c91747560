//! Git pkt-line framing.
//!
//! Every frame starts with a 4-character hex length that counts itself, so
//! `"0006a\n"` carries the two bytes `a\n`. The reserved length `"0000"` is a
//! flush packet and has no payload.

use crate::error::PktLineError;
use std::io::{ErrorKind, Read};

/// Size of the hex length prefix.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Largest total frame length, prefix included.
pub const MAX_PKT_LEN: usize = 65520;

/// Largest payload a data frame can carry.
pub const MAX_DATA_LEN: usize = MAX_PKT_LEN - LENGTH_PREFIX_LEN;

const FLUSH_PKT: &[u8; 4] = b"0000";

/// A pkt-line packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PktLine {
    /// Data line with content.
    Data(Vec<u8>),
    /// Flush packet (0000).
    Flush,
}

impl PktLine {
    /// Creates a data packet from a string slice.
    pub fn from_string(s: &str) -> Self {
        Self::Data(s.as_bytes().to_vec())
    }

    /// Creates a data packet from bytes.
    pub fn from_bytes(b: impl Into<Vec<u8>>) -> Self {
        Self::Data(b.into())
    }

    /// Encodes the packet to bytes.
    ///
    /// # Panics
    ///
    /// Panics if a data payload exceeds [`MAX_DATA_LEN`].
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Data(data) => {
                assert!(data.len() <= MAX_DATA_LEN, "pkt-line payload too large");
                let len = data.len() + LENGTH_PREFIX_LEN;
                let mut result = format!("{len:04x}").into_bytes();
                result.extend_from_slice(data);
                result
            }
            Self::Flush => FLUSH_PKT.to_vec(),
        }
    }
}

/// Decodes a length field into a payload length.
///
/// Only ASCII hex digits are accepted. The flush sentinel is handled by the
/// caller, so `"0000"` is out of range here like any value below 4.
fn decode_length(field: [u8; 4]) -> Result<usize, PktLineError> {
    let malformed = || PktLineError::MalformedLength { field };

    let mut len = 0usize;
    for byte in field {
        let digit = char::from(byte).to_digit(16).ok_or_else(malformed)?;
        len = (len << 4) | digit as usize;
    }

    if !(LENGTH_PREFIX_LEN..=MAX_PKT_LEN).contains(&len) {
        return Err(malformed());
    }
    Ok(len - LENGTH_PREFIX_LEN)
}

/// Forward-only reader for the pkt-line format.
///
/// Also usable as an [`Iterator`] of `Result<PktLine, PktLineError>` that ends
/// when the input ends cleanly on a frame boundary, and stops after the first
/// error.
pub struct PktLineReader<R> {
    reader: R,
    done: bool,
}

impl<R: Read> PktLineReader<R> {
    /// Creates a new pkt-line reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }

    /// Reads the next packet, or `None` at a clean end of input.
    pub fn read(&mut self) -> Result<Option<PktLine>, PktLineError> {
        let mut len_buf = [0u8; LENGTH_PREFIX_LEN];
        match self.fill(&mut len_buf)? {
            0 => return Ok(None),
            LENGTH_PREFIX_LEN => {}
            actual => {
                return Err(PktLineError::TruncatedStream {
                    expected: LENGTH_PREFIX_LEN,
                    actual,
                })
            }
        }

        if &len_buf == FLUSH_PKT {
            return Ok(Some(PktLine::Flush));
        }

        let data_len = decode_length(len_buf)?;
        let mut data = vec![0u8; data_len];
        let actual = self.fill(&mut data)?;
        if actual != data_len {
            return Err(PktLineError::TruncatedStream {
                expected: data_len,
                actual,
            });
        }

        Ok(Some(PktLine::Data(data)))
    }

    /// Reads until `buf` is full or the input ends, returning the byte count.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, PktLineError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for PktLineReader<R> {
    type Item = Result<PktLine, PktLineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read() {
            Ok(Some(pkt)) => Some(Ok(pkt)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for PktLineReader<R> {}
