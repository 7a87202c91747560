//! Git wire error types.

use thiserror::Error;

/// Errors raised while splitting a byte stream into pkt-lines.
#[derive(Debug, Error)]
pub enum PktLineError {
    /// The 4-byte length field is not hex, or encodes a length outside `[4, 65520]`.
    #[error("malformed pkt-line length {:?}", String::from_utf8_lossy(.field))]
    MalformedLength {
        /// The raw length field.
        field: [u8; 4],
    },

    /// The stream ended before the bytes a frame declared were available.
    #[error("truncated pkt-line stream: expected {expected} bytes, got {actual}")]
    TruncatedStream {
        /// Bytes the length field (or the length field itself) called for.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// I/O error from the underlying reader.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The specific grammar rule a ref advertisement line broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RefLineError {
    /// The line does not end with `\n`.
    #[error("missing trailing newline")]
    MissingNewline,

    /// The line does not start with 40 lowercase hex characters.
    #[error("object id is not 40 lowercase hex characters")]
    InvalidObjectId,

    /// The object id is not followed by a single space.
    #[error("missing space after object id")]
    MissingSeparator,

    /// The ref name is empty.
    #[error("empty ref name")]
    EmptyName,

    /// The ref name contains a byte outside printable ASCII.
    #[error("non-printable byte {0:#04x} in ref name")]
    NonPrintableName(u8),

    /// The capability suffix contains a newline.
    #[error("newline inside capability list")]
    InvalidCapabilities,
}

/// Errors raised while parsing a ref advertisement.
#[derive(Debug, Error)]
pub enum AdvertisementError {
    /// The body does not start with a pkt-line carrying a `#` comment.
    #[error("not a smart HTTP advertisement: first bytes are {:?}", String::from_utf8_lossy(.prefix))]
    ProtocolMismatch {
        /// Up to the first five bytes of the body.
        prefix: Vec<u8>,
    },

    /// A data line did not match the ref grammar.
    #[error("malformed ref line \"{}\": {reason}", .line.escape_ascii())]
    MalformedRefLine {
        /// The offending pkt-line payload.
        line: Vec<u8>,
        /// Which rule was broken.
        reason: RefLineError,
    },

    /// The pkt-line framing itself was broken.
    #[error("bad pkt-line: {0}")]
    Frame(#[from] PktLineError),
}
