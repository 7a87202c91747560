//! Git wire primitives for gitcmp.
//!
//! This crate decodes the pkt-line framing used by git's smart protocols,
//! parses the ref advertisement a server sends from
//! `info/refs?service=git-upload-pack`, and compares the resulting ref sets.

mod advertisement;
mod diff;
mod error;
mod pktline;
mod refs;

pub use advertisement::{
    check_handshake, expect_separator, parse_advertisement, scan_name, split_capabilities,
    split_object_id, strip_newline, RefLine, SERVICE_ANNOUNCEMENT,
};
pub use diff::{diff, Mismatch, RefDiff, RefEntry};
pub use error::{AdvertisementError, PktLineError, RefLineError};
pub use pktline::{PktLine, PktLineReader, MAX_DATA_LEN, MAX_PKT_LEN};
pub use refs::{ObjectId, RefSet};
