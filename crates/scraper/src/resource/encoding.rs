// ABOUTME: Text encoding normalization for fetched documents.
// ABOUTME: Picks an encoding from BOM, Content-Type charset, meta prescan or detection, then decodes to UTF-8.

use encoding_rs::{Encoding, REPLACEMENT, UTF_16BE, UTF_16LE, UTF_8};
use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// Number of leading bytes inspected for a `<meta>` charset declaration.
const META_PRESCAN_LEN: usize = 1024;

static META_CHARSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i-u)<meta[^>]+charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#).unwrap()
});

/// Where the chosen encoding came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    Bom,
    ContentType,
    Meta,
    Utf8,
    Detected,
}

/// Decoded document text plus the encoding it was decoded from.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static Encoding,
    pub source: EncodingSource,
    pub had_errors: bool,
}

/// Failure to transcode a body to UTF-8.
#[derive(Debug, thiserror::Error)]
#[error("cannot transcode from {label}")]
pub struct UnsupportedEncoding {
    pub label: String,
}

/// Extract charset value from a Content-Type header.
pub fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim().trim_matches('"').trim_matches('\'');
            if !charset.is_empty() {
                return Some(charset.to_string());
            }
        }
    }
    None
}

/// Look for a `<meta charset>` or `http-equiv` charset in the head of the document.
fn prescan_meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(META_PRESCAN_LEN)];
    let caps = META_CHARSET_RE.captures(head)?;
    let encoding = Encoding::for_label(caps.get(1)?.as_bytes())?;
    // A document cannot declare itself UTF-16 from inside its own ASCII markup.
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return Some(UTF_8);
    }
    Some(encoding)
}

fn sniff(body: &[u8], content_type: Option<&str>) -> (&'static Encoding, EncodingSource) {
    if let Some((encoding, _)) = Encoding::for_bom(body) {
        return (encoding, EncodingSource::Bom);
    }

    if let Some(encoding) = content_type
        .and_then(extract_charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return (encoding, EncodingSource::ContentType);
    }

    if let Some(encoding) = prescan_meta_charset(body) {
        return (encoding, EncodingSource::Meta);
    }

    if std::str::from_utf8(body).is_ok() {
        return (UTF_8, EncodingSource::Utf8);
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    (detector.guess(None, true), EncodingSource::Detected)
}

/// Decode body bytes to UTF-8 text.
///
/// Malformed sequences are replaced with U+FFFD. Only a body whose declared
/// encoding is the WHATWG `replacement` encoding is rejected, since nothing of
/// its content survives decoding.
pub fn decode_body(
    body: &[u8],
    content_type: Option<&str>,
) -> Result<Decoded, UnsupportedEncoding> {
    let (encoding, source) = sniff(body, content_type);
    if encoding == REPLACEMENT {
        return Err(UnsupportedEncoding {
            label: content_type
                .and_then(extract_charset)
                .unwrap_or_else(|| encoding.name().to_string()),
        });
    }

    let (decoded, actual, had_errors) = encoding.decode(body);
    Ok(Decoded {
        text: decoded.into_owned(),
        encoding: actual,
        source,
        had_errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_charset() {
        assert_eq!(
            extract_charset("text/html; charset=utf-8"),
            Some("utf-8".to_string())
        );
        assert_eq!(
            extract_charset("text/html; charset=ISO-8859-1"),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(
            extract_charset("text/html; charset=\"utf-8\""),
            Some("utf-8".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
        assert_eq!(extract_charset("text/html; charset="), None);
    }

    #[test]
    fn utf8_body_without_hints() {
        let decoded = decode_body("héllo".as_bytes(), Some("text/html")).unwrap();
        assert_eq!(decoded.text, "héllo");
        assert_eq!(decoded.encoding, UTF_8);
        assert_eq!(decoded.source, EncodingSource::Utf8);
    }

    #[test]
    fn content_type_charset_wins_over_meta() {
        let body = b"<html><head><meta charset=\"utf-8\"></head><body>caf\xe9</body></html>";
        let decoded = decode_body(body, Some("text/html; charset=windows-1252")).unwrap();
        assert!(decoded.text.contains("café"));
        assert_eq!(decoded.source, EncodingSource::ContentType);
    }

    #[test]
    fn meta_charset_is_used_without_header_charset() {
        let body = b"<html><head><meta charset=\"iso-8859-1\"></head><body>caf\xe9</body></html>";
        let decoded = decode_body(body, Some("text/html")).unwrap();
        assert!(decoded.text.contains("café"));
        assert_eq!(decoded.source, EncodingSource::Meta);
    }

    #[test]
    fn http_equiv_charset_is_used() {
        let body = b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1251\"><p>\xcf\xf0\xe8\xe2\xe5\xf2</p>";
        let decoded = decode_body(body, None).unwrap();
        assert!(decoded.text.contains("Привет"));
    }

    #[test]
    fn meta_utf16_declaration_means_utf8() {
        let body = "<meta charset=\"utf-16\"><p>ok ü</p>".as_bytes();
        let decoded = decode_body(body, None).unwrap();
        assert_eq!(decoded.encoding, UTF_8);
        assert!(decoded.text.contains("ok ü"));
    }

    #[test]
    fn bom_overrides_header() {
        let mut body = vec![0xEF, 0xBB, 0xBF];
        body.extend_from_slice("naïve".as_bytes());
        let decoded = decode_body(&body, Some("text/html; charset=iso-8859-1")).unwrap();
        assert_eq!(decoded.text, "naïve");
        assert_eq!(decoded.source, EncodingSource::Bom);
    }

    #[test]
    fn detection_for_legacy_bytes() {
        let iso_bytes: &[u8] = &[0x63, 0x61, 0x66, 0xe9];
        let decoded = decode_body(iso_bytes, None).unwrap();
        assert_eq!(decoded.text, "café");
        assert_eq!(decoded.source, EncodingSource::Detected);
    }

    #[test]
    fn replacement_encoding_is_rejected() {
        let err = decode_body(b"<p>hi</p>", Some("text/html; charset=iso-2022-kr")).unwrap_err();
        assert_eq!(err.label, "iso-2022-kr");
    }
}
