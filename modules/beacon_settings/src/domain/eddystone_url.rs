//! Eddystone-URL compression
//!
//! A URL is sent as a scheme byte followed by the body, where common
//! top-level domains are replaced by single-byte expansion codes.

use bytes::{BufMut, Bytes, BytesMut};

/// Maximum encoded body length after the scheme byte
pub const MAX_ENCODED_LEN: usize = 17;

const SCHEMES: [&str; 4] = ["http://www.", "https://www.", "http://", "https://"];

const EXPANSIONS: [&str; 14] = [
    ".com/", ".org/", ".edu/", ".net/", ".info/", ".biz/", ".gov/", ".com", ".org", ".edu",
    ".net", ".info", ".biz", ".gov",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    UnknownScheme,
    InvalidCharacter(char),
    Empty,
    TooLong(usize),
    ReservedByte(u8),
    Truncated,
}

impl std::fmt::Display for UrlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownScheme => write!(f, "URL must start with http:// or https://"),
            Self::InvalidCharacter(c) => write!(f, "URL contains unsupported character {:?}", c),
            Self::Empty => write!(f, "URL has no host"),
            Self::TooLong(len) => write!(
                f,
                "URL encodes to {} bytes (maximum {})",
                len, MAX_ENCODED_LEN
            ),
            Self::ReservedByte(b) => write!(f, "reserved byte 0x{:02x} in URL payload", b),
            Self::Truncated => write!(f, "URL payload is empty"),
        }
    }
}

/// Compress a URL. The result includes the scheme byte.
pub fn encode(url: &str) -> Result<Bytes, UrlError> {
    // Longer prefixes come first in the table, so the first match wins.
    let (scheme, body) = SCHEMES
        .iter()
        .enumerate()
        .find_map(|(code, prefix)| url.strip_prefix(prefix).map(|rest| (code as u8, rest)))
        .ok_or(UrlError::UnknownScheme)?;

    if body.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut out = BytesMut::with_capacity(1 + body.len());
    out.put_u8(scheme);

    let mut rest = body;
    while let Some(c) = rest.chars().next() {
        if let Some((code, expansion)) = EXPANSIONS
            .iter()
            .enumerate()
            .find(|(_, expansion)| rest.starts_with(**expansion))
        {
            out.put_u8(code as u8);
            rest = &rest[expansion.len()..];
            continue;
        }

        if !c.is_ascii_graphic() {
            return Err(UrlError::InvalidCharacter(c));
        }
        out.put_u8(c as u8);
        rest = &rest[1..];
    }

    let body_len = out.len() - 1;
    if body_len > MAX_ENCODED_LEN {
        return Err(UrlError::TooLong(body_len));
    }

    Ok(out.freeze())
}

/// Expand a compressed URL payload
pub fn decode(payload: &[u8]) -> Result<String, UrlError> {
    let (&scheme, body) = payload.split_first().ok_or(UrlError::Truncated)?;
    let prefix = SCHEMES
        .get(scheme as usize)
        .ok_or(UrlError::ReservedByte(scheme))?;

    if body.is_empty() {
        return Err(UrlError::Empty);
    }
    if body.len() > MAX_ENCODED_LEN {
        return Err(UrlError::TooLong(body.len()));
    }

    let mut url = String::from(*prefix);
    for &byte in body {
        match EXPANSIONS.get(byte as usize) {
            Some(expansion) => url.push_str(expansion),
            None if byte.is_ascii_graphic() => url.push(byte as char),
            None => return Err(UrlError::ReservedByte(byte)),
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_uses_scheme_and_expansion_codes() {
        let bytes = encode("https://estimote.com/").unwrap();
        let mut expected = vec![0x03];
        expected.extend_from_slice(b"estimote");
        expected.push(0x00);
        assert_eq!(&bytes[..], &expected[..]);
    }

    #[test]
    fn test_encode_prefers_www_scheme() {
        let bytes = encode("http://www.example.org").unwrap();
        assert_eq!(bytes[0], 0x00);
        assert_eq!(bytes[bytes.len() - 1], 0x08);
    }

    #[test]
    fn test_slash_expansion_wins_over_bare_domain() {
        let bytes = encode("https://a.gov/").unwrap();
        assert_eq!(&bytes[..], &[0x03, b'a', 0x06]);
    }

    #[test]
    fn test_decode_expands_codes() {
        let url = decode(&[0x01, b'g', b'o', b'o', b'g', b'l', b'e', 0x07]).unwrap();
        assert_eq!(url, "https://www.google.com");
    }

    #[test]
    fn test_decode_restores_encoded_url() {
        for url in ["https://goo.gl/abcdef", "http://example.net/x", "https://www.a.info"] {
            assert_eq!(decode(&encode(url).unwrap()).unwrap(), url);
        }
    }

    #[test]
    fn test_unknown_scheme_is_rejected() {
        assert_eq!(encode("ftp://example.com"), Err(UrlError::UnknownScheme));
        assert_eq!(encode("example.com"), Err(UrlError::UnknownScheme));
    }

    #[test]
    fn test_too_long_is_rejected() {
        let result = encode("https://a-very-long-hostname-for-a-beacon.io");
        assert!(matches!(result, Err(UrlError::TooLong(_))));
    }

    #[test]
    fn test_spaces_and_non_ascii_are_rejected() {
        assert_eq!(encode("https://a b.io"), Err(UrlError::InvalidCharacter(' ')));
        assert_eq!(encode("https://café.io"), Err(UrlError::InvalidCharacter('é')));
    }

    #[test]
    fn test_empty_body_is_rejected() {
        assert_eq!(encode("https://"), Err(UrlError::Empty));
        assert_eq!(decode(&[0x02]), Err(UrlError::Empty));
        assert_eq!(decode(&[]), Err(UrlError::Truncated));
    }

    #[test]
    fn test_reserved_bytes_are_rejected() {
        assert_eq!(decode(&[0x04, b'a']), Err(UrlError::ReservedByte(0x04)));
        assert_eq!(decode(&[0x03, 0x20]), Err(UrlError::ReservedByte(0x20)));
    }
}
