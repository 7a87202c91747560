//! Smart HTTP ref advertisement parsing.
//!
//! Parses the body of `GET info/refs?service=git-upload-pack`, as described in
//! git's `Documentation/technical/http-protocol.txt`. Only the ref list is
//! read; capabilities are split off and dropped.

use crate::error::{AdvertisementError, RefLineError};
use crate::pktline::{PktLine, PktLineReader};
use crate::refs::{ObjectId, RefSet};

/// The service announcement line that opens an upload-pack advertisement.
pub const SERVICE_ANNOUNCEMENT: &[u8] = b"# service=git-upload-pack\n";

/// One parsed advertisement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefLine<'a> {
    /// Object the ref points at.
    pub id: ObjectId,
    /// Reference name.
    pub name: &'a str,
    /// Raw capability list after the NUL, if any.
    pub capabilities: Option<&'a [u8]>,
}

impl<'a> RefLine<'a> {
    /// Parses `<40 hex> SP <name> [NUL <capabilities>] LF`.
    pub fn parse(line: &'a [u8]) -> Result<Self, RefLineError> {
        let body = strip_newline(line)?;
        let (id, rest) = split_object_id(body)?;
        let rest = expect_separator(rest)?;
        let (name, capabilities) = split_capabilities(rest)?;
        let name = scan_name(name)?;
        Ok(Self {
            id,
            name,
            capabilities,
        })
    }
}

/// Removes the single trailing `\n` every ref line must end with.
pub fn strip_newline(line: &[u8]) -> Result<&[u8], RefLineError> {
    line.strip_suffix(b"\n").ok_or(RefLineError::MissingNewline)
}

/// Splits off the leading fixed-width object id.
pub fn split_object_id(body: &[u8]) -> Result<(ObjectId, &[u8]), RefLineError> {
    if body.len() < ObjectId::HEX_LEN {
        return Err(RefLineError::InvalidObjectId);
    }
    let (hex, rest) = body.split_at(ObjectId::HEX_LEN);
    let id = ObjectId::from_hex(hex).ok_or(RefLineError::InvalidObjectId)?;
    Ok((id, rest))
}

/// Consumes the single space between object id and name.
pub fn expect_separator(rest: &[u8]) -> Result<&[u8], RefLineError> {
    rest.strip_prefix(b" ").ok_or(RefLineError::MissingSeparator)
}

/// Splits `<name> NUL <capabilities>` at the first NUL.
///
/// The capability list may hold anything but a newline.
pub fn split_capabilities(rest: &[u8]) -> Result<(&[u8], Option<&[u8]>), RefLineError> {
    match rest.iter().position(|&b| b == 0) {
        Some(nul) => {
            let capabilities = &rest[nul + 1..];
            if capabilities.contains(&b'\n') {
                return Err(RefLineError::InvalidCapabilities);
            }
            Ok((&rest[..nul], Some(capabilities)))
        }
        None => Ok((rest, None)),
    }
}

/// Checks that a ref name is non-empty printable ASCII.
pub fn scan_name(name: &[u8]) -> Result<&str, RefLineError> {
    if name.is_empty() {
        return Err(RefLineError::EmptyName);
    }
    if let Some(&bad) = name.iter().find(|&&b| !(0x20..=0x7e).contains(&b)) {
        return Err(RefLineError::NonPrintableName(bad));
    }
    // Printable ASCII is always valid UTF-8.
    std::str::from_utf8(name).map_err(|_| RefLineError::NonPrintableName(name[0]))
}

/// Checks the first five bytes look like `<4 hex>#`.
///
/// A smart server opens with a pkt-line holding a `#` comment; a dumb server
/// or an HTML error page does not.
pub fn check_handshake(body: &[u8]) -> Result<(), AdvertisementError> {
    let ok = body.len() >= 5
        && body[..4]
            .iter()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        && body[4] == b'#';
    if ok {
        Ok(())
    } else {
        Err(AdvertisementError::ProtocolMismatch {
            prefix: body[..body.len().min(5)].to_vec(),
        })
    }
}

/// Parses a complete upload-pack ref advertisement into a [`RefSet`].
///
/// Flush packets are skipped, as is the service announcement wherever it
/// appears. A ref advertised twice keeps its last id.
pub fn parse_advertisement(body: &[u8]) -> Result<RefSet, AdvertisementError> {
    check_handshake(body)?;

    let mut refs = RefSet::new();
    for pkt in PktLineReader::new(body) {
        let data = match pkt? {
            PktLine::Flush => continue,
            PktLine::Data(data) => data,
        };
        if data == SERVICE_ANNOUNCEMENT {
            continue;
        }

        let line = match RefLine::parse(&data) {
            Ok(line) => line,
            Err(reason) => return Err(AdvertisementError::MalformedRefLine { line: data, reason }),
        };
        if let Some(capabilities) = line.capabilities {
            tracing::trace!(
                capabilities = %capabilities.escape_ascii(),
                "Ignoring advertised capabilities"
            );
        }
        if let Some(previous) = refs.insert(line.name, line.id) {
            tracing::debug!(
                name = line.name,
                previous = %previous,
                id = %line.id,
                "Ref advertised twice, keeping the later id"
            );
        }
    }

    tracing::debug!(refs = refs.len(), "Parsed ref advertisement");
    Ok(refs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PktLineError;
    use pretty_assertions::assert_eq;

    // From Documentation/technical/http-protocol.txt in git.
    const SAMPLE: &[u8] = b"001e# service=git-upload-pack\n\
004895dcfa3633004da0049d3d0fa03f80589cbcaf31 refs/heads/maint\0multi_ack\n\
003fd049f6c27a2244e12041955e262a404c7faba355 refs/heads/master\n\
003c2cb58b79488a98d2721cea644875a8dd0026b115 refs/tags/v1.0\n\
003fa3c2e2402b99163d1d59756e5f207ae21cccba4c refs/tags/v1.0^{}\n";

    const MAINT: &str = "95dcfa3633004da0049d3d0fa03f80589cbcaf31";

    fn id(hex: &str) -> ObjectId {
        ObjectId::from_hex(hex.as_bytes()).unwrap()
    }

    fn body(lines: &[PktLine]) -> Vec<u8> {
        lines.iter().flat_map(PktLine::encode).collect()
    }

    #[test]
    fn test_parse_sample_advertisement() {
        let refs = parse_advertisement(SAMPLE).unwrap();

        let expected: RefSet = [
            ("refs/heads/maint", id(MAINT)),
            ("refs/heads/master", id("d049f6c27a2244e12041955e262a404c7faba355")),
            ("refs/tags/v1.0", id("2cb58b79488a98d2721cea644875a8dd0026b115")),
            ("refs/tags/v1.0^{}", id("a3c2e2402b99163d1d59756e5f207ae21cccba4c")),
        ]
        .into_iter()
        .collect();
        assert_eq!(refs, expected);
    }

    #[test]
    fn test_parse_with_flush_sections() {
        let input = body(&[
            PktLine::from_bytes(SERVICE_ANNOUNCEMENT),
            PktLine::Flush,
            PktLine::from_string(&format!("{MAINT} HEAD\0side-band-64k ofs-delta\n")),
            PktLine::from_string(&format!("{MAINT} refs/heads/main\n")),
            PktLine::Flush,
        ]);
        let refs = parse_advertisement(&input).unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs.get("HEAD"), Some(&id(MAINT)));
        assert_eq!(refs.get("refs/heads/main"), Some(&id(MAINT)));
    }

    #[test]
    fn test_service_line_tolerated_anywhere() {
        let input = body(&[
            PktLine::from_bytes(SERVICE_ANNOUNCEMENT),
            PktLine::from_string(&format!("{MAINT} refs/heads/main\n")),
            PktLine::from_bytes(SERVICE_ANNOUNCEMENT),
        ]);
        let refs = parse_advertisement(&input).unwrap();
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn test_announcement_only_yields_empty_set() {
        let input = body(&[PktLine::from_bytes(SERVICE_ANNOUNCEMENT), PktLine::Flush]);
        assert!(parse_advertisement(&input).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_ref_keeps_last() {
        let other = "0000000000000000000000000000000000000001";
        let input = body(&[
            PktLine::from_bytes(SERVICE_ANNOUNCEMENT),
            PktLine::from_string(&format!("{MAINT} refs/heads/main\n")),
            PktLine::from_string(&format!("{other} refs/heads/main\n")),
        ]);
        let refs = parse_advertisement(&input).unwrap();
        assert_eq!(refs.get("refs/heads/main"), Some(&id(other)));
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn test_handshake_rejects_non_git_body() {
        let inputs: [&[u8]; 5] = [b"<html>", b"", b"001e", b"001E# service", b"001e service"];
        for input in inputs {
            let err = parse_advertisement(input).unwrap_err();
            match err {
                AdvertisementError::ProtocolMismatch { prefix } => {
                    assert_eq!(prefix, &input[..input.len().min(5)]);
                }
                other => panic!("unexpected error {other}"),
            }
        }
    }

    #[test]
    fn test_handshake_accepts_comment_prefix() {
        assert!(check_handshake(b"001e# service=git-upload-pack\n").is_ok());
        assert!(check_handshake(b"abcd#").is_ok());
    }

    #[test]
    fn test_malformed_ref_line_carries_payload() {
        let input = body(&[
            PktLine::from_bytes(SERVICE_ANNOUNCEMENT),
            PktLine::from_string("not a ref line\n"),
        ]);
        match parse_advertisement(&input).unwrap_err() {
            AdvertisementError::MalformedRefLine { line, reason } => {
                assert_eq!(line, b"not a ref line\n");
                assert_eq!(reason, RefLineError::InvalidObjectId);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_frame_errors_are_wrapped() {
        let mut input = SAMPLE.to_vec();
        input.extend_from_slice(b"003f");
        let err = parse_advertisement(&input).unwrap_err();
        assert!(matches!(
            err,
            AdvertisementError::Frame(PktLineError::TruncatedStream { .. })
        ));

        let mut input = SAMPLE.to_vec();
        input.extend_from_slice(b"0002");
        let err = parse_advertisement(&input).unwrap_err();
        assert!(matches!(
            err,
            AdvertisementError::Frame(PktLineError::MalformedLength { .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = AdvertisementError::MalformedRefLine {
            line: b"bad\0line\n".to_vec(),
            reason: RefLineError::InvalidObjectId,
        };
        assert_eq!(
            err.to_string(),
            "malformed ref line \"bad\\x00line\\n\": object id is not 40 lowercase hex characters"
        );

        let err = AdvertisementError::ProtocolMismatch {
            prefix: b"<html".to_vec(),
        };
        assert!(err.to_string().contains("<html"));
    }

    #[test]
    fn test_ref_line_with_capabilities() {
        let raw = format!("{MAINT} refs/heads/maint\0multi_ack thin-pack\n");
        let line = RefLine::parse(raw.as_bytes()).unwrap();
        assert_eq!(line.id, id(MAINT));
        assert_eq!(line.name, "refs/heads/maint");
        assert_eq!(line.capabilities, Some(&b"multi_ack thin-pack"[..]));
    }

    #[test]
    fn test_ref_line_empty_capabilities() {
        let raw = format!("{MAINT} HEAD\0\n");
        let line = RefLine::parse(raw.as_bytes()).unwrap();
        assert_eq!(line.capabilities, Some(&b""[..]));
    }

    #[test]
    fn test_ref_line_name_may_contain_spaces() {
        let raw = format!("{MAINT} refs/heads/odd name\n");
        assert_eq!(RefLine::parse(raw.as_bytes()).unwrap().name, "refs/heads/odd name");
    }

    #[test]
    fn test_ref_line_rejections() {
        let cases: Vec<(String, RefLineError)> = vec![
            (format!("{MAINT} refs/heads/main"), RefLineError::MissingNewline),
            (format!("{} refs/heads/main\n", MAINT.to_uppercase()), RefLineError::InvalidObjectId),
            (format!("{} refs/heads/main\n", &MAINT[..39]), RefLineError::InvalidObjectId),
            (format!("{MAINT}\trefs/heads/main\n"), RefLineError::MissingSeparator),
            (format!("{MAINT}\n"), RefLineError::MissingSeparator),
            (format!("{MAINT} \n"), RefLineError::EmptyName),
            (format!("{MAINT} \0caps\n"), RefLineError::EmptyName),
            (format!("{MAINT} refs/heads/main\n\n"), RefLineError::NonPrintableName(b'\n')),
            (format!("{MAINT} refs/heads/\u{7f}\n"), RefLineError::NonPrintableName(0x7f)),
            (format!("{MAINT} refs/heads/main\0a\nb\n"), RefLineError::InvalidCapabilities),
        ];
        for (raw, expected) in cases {
            assert_eq!(
                RefLine::parse(raw.as_bytes()),
                Err(expected),
                "line {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_ref_line_rejects_high_bytes() {
        let mut raw = format!("{MAINT} refs/heads/").into_bytes();
        raw.extend_from_slice(&[0xc3, 0xa9, b'\n']);
        assert_eq!(RefLine::parse(&raw), Err(RefLineError::NonPrintableName(0xc3)));
    }

    #[test]
    fn test_tokenizer_steps() {
        assert_eq!(strip_newline(b"abc\n"), Ok(&b"abc"[..]));
        assert_eq!(strip_newline(b"abc"), Err(RefLineError::MissingNewline));

        let line = format!("{MAINT} x");
        let (oid, rest) = split_object_id(line.as_bytes()).unwrap();
        assert_eq!(oid, id(MAINT));
        assert_eq!(rest, b" x");
        assert_eq!(split_object_id(b"abc"), Err(RefLineError::InvalidObjectId));

        assert_eq!(expect_separator(b" x"), Ok(&b"x"[..]));
        assert_eq!(expect_separator(b"x"), Err(RefLineError::MissingSeparator));

        assert_eq!(split_capabilities(b"HEAD"), Ok((&b"HEAD"[..], None)));
        assert_eq!(
            split_capabilities(b"HEAD\0a\0b"),
            Ok((&b"HEAD"[..], Some(&b"a\0b"[..])))
        );

        assert_eq!(scan_name(b"refs/tags/v1.0^{}"), Ok("refs/tags/v1.0^{}"));
        assert_eq!(scan_name(b""), Err(RefLineError::EmptyName));
        assert_eq!(scan_name(b"a\tb"), Err(RefLineError::NonPrintableName(b'\t')));
    }
}
