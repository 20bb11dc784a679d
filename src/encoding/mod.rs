//! Byte-stream decoding for [`Document::parse_bytes`](crate::Document::parse_bytes).
//!
//! The input encoding is chosen in this order:
//!
//! 1. a byte order mark (UTF-8, UTF-16LE, UTF-16BE), which always wins;
//! 2. the `encoding="..."` pseudo-attribute of a leading `<?xml ...?>`
//!    declaration, read as ASCII;
//! 3. UTF-8.
//!
//! Transcoding goes through `encoding_rs`. Malformed sequences are an error
//! rather than being replaced.

use encoding_rs::{Encoding, UTF_8};

use crate::error::EncodingError;

/// The declaration must appear within this many leading bytes.
const DECL_SCAN_LIMIT: usize = 200;

/// Decodes raw markup bytes into a UTF-8 string with any BOM removed.
///
/// # Errors
///
/// Returns `EncodingError` if a declared encoding is unknown to
/// `encoding_rs` or the bytes are malformed for the chosen encoding.
///
/// # Examples
///
/// ```
/// use xmlwalk::encoding::decode_to_utf8;
///
/// let text = decode_to_utf8(b"\xEF\xBB\xBF<root/>").unwrap();
/// assert_eq!(text, "<root/>");
/// ```
pub fn decode_to_utf8(bytes: &[u8]) -> Result<String, EncodingError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(encoding, &bytes[bom_len..]);
    }

    let encoding = match declared_encoding(bytes) {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| EncodingError::new(format!("unsupported encoding: {label}")))?,
        None => UTF_8,
    };
    decode_with(encoding, bytes)
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> Result<String, EncodingError> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(EncodingError::new(format!(
            "malformed byte sequence for encoding {}",
            encoding.name()
        )));
    }
    Ok(text.into_owned())
}

/// Reads the `encoding` pseudo-attribute from a leading XML declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let scan = &bytes[..bytes.len().min(DECL_SCAN_LIMIT)];
    if !scan.starts_with(b"<?xml") {
        return None;
    }
    let decl_end = scan.windows(2).position(|w| w == b"?>")?;
    let decl = &scan[..decl_end];

    let key = b"encoding";
    let key_pos = decl.windows(key.len()).position(|w| w == key)?;
    let rest = trim_ascii_start(&decl[key_pos + key.len()..]);
    let rest = trim_ascii_start(rest.strip_prefix(b"=")?);

    let (&quote, rest) = rest.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let end = rest.iter().position(|&b| b == quote)?;
    std::str::from_utf8(&rest[..end])
        .ok()
        .filter(|label| label.is_ascii())
}

fn trim_ascii_start(bytes: &[u8]) -> &[u8] {
    let skip = bytes
        .iter()
        .take_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .count();
    &bytes[skip..]
}
