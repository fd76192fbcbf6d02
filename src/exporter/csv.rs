//! CSV encoding of a string matrix, with charset-based stream encoding.

use crate::error::{TabioError, TabioResult};
use csv::{Terminator, WriterBuilder};
use std::io::Write;

/// Encode UTF-8 text into the charset named by `charset` (a WHATWG label,
/// e.g. "UTF-8", "ISO-8859-1", "windows-1252").
pub(crate) fn encode_text(charset: &str, text: &str) -> TabioResult<Vec<u8>> {
    let encoding = encoding_rs::Encoding::for_label(charset.as_bytes())
        .ok_or_else(|| TabioError::Encoding(charset.to_string()))?;
    let (bytes, _, _) = encoding.encode(text);
    Ok(bytes.into_owned())
}

/// Decode bytes from the charset named by `charset` into UTF-8 text.
pub(crate) fn decode_text(charset: &str, bytes: &[u8]) -> TabioResult<String> {
    let encoding = encoding_rs::Encoding::for_label(charset.as_bytes())
        .ok_or_else(|| TabioError::Encoding(charset.to_string()))?;
    let (text, _, _) = encoding.decode(bytes);
    Ok(text.into_owned())
}

/// Write a rectangular string matrix as CSV: configurable single-byte
/// separator, CRLF line terminator, quoting only where required.
pub(crate) fn write_matrix<W: Write>(
    matrix: &[Vec<String>],
    mut out: W,
    charset: &str,
    separator: char,
) -> TabioResult<()> {
    if !separator.is_ascii() {
        return Err(TabioError::Validation(format!(
            "separator must be a single ASCII character, got {separator:?}"
        )));
    }
    let mut writer = WriterBuilder::new()
        .delimiter(separator as u8)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    for row in matrix {
        writer.write_record(row)?;
    }
    let buf = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let text = String::from_utf8(buf)
        .map_err(|e| TabioError::Encoding(format!("internal UTF-8 error: {e}")))?;
    out.write_all(&encode_text(charset, &text)?)?;
    out.flush()?;
    Ok(())
}
