//! POS export decoding
//!
//! The register exports CP932 (Windows-31J) text, not UTF-8. Bytes are
//! decoded strictly first, then split into CSV records.

use crate::error::DecodeError;
use encoding_rs::{DecoderResult, SHIFT_JIS};

/// WHATWG Shift_JIS is the Windows-31J mapping the register writes.
pub const EXPORT_ENCODING: &str = "CP932";

/// Decode raw export bytes into ordered field rows
///
/// - Undecodable byte sequences fail the whole input (no replacement chars)
/// - Quotes inside unquoted fields are kept as literal characters
/// - Rows may have differing column counts
/// - Fully blank lines are dropped
///
/// The first row returned is the header; callers skip it.
pub fn decode_rows(raw: &[u8]) -> Result<Vec<Vec<String>>, DecodeError> {
    let text = decode_text(raw)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(true)
        .double_quote(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    log::debug!("📥 Decoded {} CSV rows ({} bytes)", rows.len(), raw.len());
    Ok(rows)
}

fn decode_text(raw: &[u8]) -> Result<String, DecodeError> {
    let mut decoder = SHIFT_JIS.new_decoder_without_bom_handling();
    let capacity = decoder
        .max_utf8_buffer_length_without_replacement(raw.len())
        .ok_or(DecodeError::Encoding {
            encoding: EXPORT_ENCODING,
            offset: 0,
        })?;

    let mut text = String::with_capacity(capacity);
    let (result, read) = decoder.decode_to_string_without_replacement(raw, &mut text, true);

    match result {
        DecoderResult::InputEmpty => Ok(text),
        DecoderResult::Malformed(bad, consumed_after) => Err(DecodeError::Encoding {
            encoding: EXPORT_ENCODING,
            offset: read.saturating_sub(bad as usize + consumed_after as usize),
        }),
        DecoderResult::OutputFull => Err(DecodeError::Encoding {
            encoding: EXPORT_ENCODING,
            offset: read,
        }),
    }
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.is_empty() || (record.len() == 1 && record[0].is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sjis(text: &str) -> Vec<u8> {
        let (bytes, _, had_errors) = SHIFT_JIS.encode(text);
        assert!(!had_errors);
        bytes.into_owned()
    }

    #[test]
    fn test_decode_sjis_rows() {
        let raw = sjis("オーダー番号,ステータス\nA-1,完了\nA-2,キャンセル\n");
        let rows = decode_rows(&raw).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["オーダー番号", "ステータス"]);
        assert_eq!(rows[1], vec!["A-1", "完了"]);
        assert_eq!(rows[2][1], "キャンセル");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let raw = sjis("h1,h2\r\n\r\nA-1,完了\r\n\r\n\r\nA-2,完了\r\n");
        let rows = decode_rows(&raw).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_relaxed_quotes() {
        let raw = sjis("h1,h2\nA-1,手回しロクロ 5\"皿\n");
        let rows = decode_rows(&raw).unwrap();
        assert_eq!(rows[1][1], "手回しロクロ 5\"皿");
    }

    #[test]
    fn test_quoted_field_with_delimiter() {
        let raw = sjis("h1,h2\nA-1,\"第1部, 10:00\"\n");
        let rows = decode_rows(&raw).unwrap();
        assert_eq!(rows[1], vec!["A-1", "第1部, 10:00"]);
    }

    #[test]
    fn test_ragged_rows_allowed() {
        let raw = sjis("a,b,c\n1,2\n1,2,3,4\n");
        let rows = decode_rows(&raw).unwrap();
        assert_eq!(rows[1].len(), 2);
        assert_eq!(rows[2].len(), 4);
    }

    #[test]
    fn test_truncated_multibyte_is_error() {
        let mut raw = sjis("h1\n完了");
        raw.pop(); // drop trailing byte of a double-byte char
        match decode_rows(&raw) {
            Err(DecodeError::Encoding { encoding, .. }) => assert_eq!(encoding, "CP932"),
            other => panic!("expected encoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(decode_rows(&[]).unwrap().is_empty());
    }
}
