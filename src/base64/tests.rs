#[cfg(test)]
mod tests {
    use crate::base64::core::*;
    use crate::error::{Error, FormatError};

    fn encode_bytes(input: &[u8], break_col: usize) -> Vec<u8> {
        let mut out = Vec::new();
        let mut reader = input;
        encode_stream(&mut reader, &mut out, break_col).unwrap();
        out
    }

    fn decode_bytes(input: &[u8]) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        let mut reader = input;
        decode_stream(&mut reader, &mut out)?;
        Ok(out)
    }

    fn format_err(input: &[u8]) -> FormatError {
        match decode_bytes(input) {
            Err(Error::Format(e)) => e,
            other => panic!("expected format error, got {:?}", other.map(|v| v.len())),
        }
    }

    // ===== ENCODING TESTS =====

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode_bytes(b"", 0), b"");
    }

    #[test]
    fn test_encode_empty_with_wrap() {
        // No spurious trailing newline for empty input.
        assert_eq!(encode_bytes(b"", 4), b"");
    }

    #[test]
    fn test_encode_man() {
        assert_eq!(encode_bytes(&[0x4d, 0x61, 0x6e], 0), b"TWFu");
    }

    #[test]
    fn test_encode_single_byte() {
        assert_eq!(encode_bytes(b"M", 0), b"TQ==");
    }

    #[test]
    fn test_encode_two_bytes() {
        assert_eq!(encode_bytes(b"Ma", 0), b"TWE=");
    }

    #[test]
    fn test_encode_hello() {
        assert_eq!(encode_bytes(b"Hello", 0), b"SGVsbG8=");
    }

    #[test]
    fn test_encode_exact_multiple_has_no_padding() {
        let encoded = encode_bytes(b"abc", 0);
        assert_eq!(encoded, b"YWJj");
        assert!(!encoded.contains(&b'='));
    }

    #[test]
    fn test_padding_counts() {
        // len % 3 == 1 -> two '=', len % 3 == 2 -> one '='.
        assert!(encode_bytes(b"a", 0).ends_with(b"=="));
        assert_eq!(encode_bytes(b"ab", 0).iter().filter(|&&b| b == b'=').count(), 1);
        assert_eq!(encode_bytes(b"abc", 0).iter().filter(|&&b| b == b'=').count(), 0);
    }

    #[test]
    fn test_output_alphabet() {
        let input: Vec<u8> = (0..=255).collect();
        for &b in &encode_bytes(&input, 10) {
            assert!(
                b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=' || b == b'\n',
                "unexpected output byte {b:#04x}"
            );
        }
    }

    // ===== WRAPPING TESTS =====

    #[test]
    fn test_wrap_exactly_one_break_for_two_lines() {
        // 6 input bytes -> 8 characters; break column 4 splits them with
        // exactly one line break after the 4th character.
        assert_eq!(encode_bytes(b"ABCDEF", 4), b"QUJD\nREVG");
    }

    #[test]
    fn test_wrap_mid_quantum() {
        // Break column 3 lands inside the single 4-character quantum.
        assert_eq!(encode_bytes(&[0x4d, 0x61, 0x6e], 3), b"TWF\nu");
    }

    #[test]
    fn test_wrap_no_trailing_newline() {
        let encoded = encode_bytes(b"Hello", 4);
        assert_eq!(encoded, b"SGVs\nbG8=");
        assert!(!encoded.ends_with(b"\n"));
    }

    #[test]
    fn test_wrap_no_trailing_newline_on_exact_line() {
        // Output length an exact multiple of the break column still does
        // not end with a newline.
        let encoded = encode_bytes(b"ABCDEF", 8);
        assert_eq!(encoded, b"QUJDREVG");
    }

    #[test]
    fn test_wrap_line_lengths() {
        let input: Vec<u8> = (0..57).collect();
        let encoded = encode_bytes(&input, 10);
        let lines: Vec<&[u8]> = encoded.split(|&b| b == b'\n').collect();
        for line in &lines[..lines.len() - 1] {
            assert_eq!(line.len(), 10);
        }
        assert!(!lines[lines.len() - 1].is_empty());
        assert!(lines[lines.len() - 1].len() <= 10);
    }

    #[test]
    fn test_wrap_column_persists_across_feeds() {
        let mut one_shot = Vec::new();
        let mut enc = Encoder::new(4);
        enc.feed(b"ABCDEF", &mut one_shot).unwrap();
        enc.finish(&mut one_shot).unwrap();

        let mut split = Vec::new();
        let mut enc = Encoder::new(4);
        enc.feed(b"AB", &mut split).unwrap();
        enc.feed(b"CD", &mut split).unwrap();
        enc.feed(b"EF", &mut split).unwrap();
        enc.finish(&mut split).unwrap();

        assert_eq!(one_shot, split);
        assert_eq!(split, b"QUJD\nREVG");
    }

    #[test]
    fn test_chunk_size_independence() {
        let input: Vec<u8> = (0..1000).map(|i| (i % 256) as u8).collect();
        let mut reference = Vec::new();
        let mut enc = Encoder::new(7);
        enc.feed(&input, &mut reference).unwrap();
        enc.finish(&mut reference).unwrap();

        for split in [1, 2, 3, 4, 5, 17, 64] {
            let mut out = Vec::new();
            let mut enc = Encoder::new(7);
            for part in input.chunks(split) {
                enc.feed(part, &mut out).unwrap();
            }
            enc.finish(&mut out).unwrap();
            assert_eq!(out, reference, "split size {split} changed the output");
        }
    }

    // ===== DECODING TESTS =====

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode_bytes(b"").unwrap(), b"");
    }

    #[test]
    fn test_decode_whitespace_only() {
        assert_eq!(decode_bytes(b" \n\t\r\n").unwrap(), b"");
    }

    #[test]
    fn test_decode_man() {
        assert_eq!(decode_bytes(b"TWFu").unwrap(), [0x4d, 0x61, 0x6e]);
    }

    #[test]
    fn test_decode_single_byte() {
        assert_eq!(decode_bytes(b"TQ==").unwrap(), [0x4d]);
    }

    #[test]
    fn test_decode_two_bytes() {
        assert_eq!(decode_bytes(b"TWE=").unwrap(), b"Ma");
    }

    #[test]
    fn test_decode_with_newlines() {
        assert_eq!(decode_bytes(b"SGVs\nbG8=\n").unwrap(), b"Hello");
    }

    #[test]
    fn test_decode_with_whitespace_variants() {
        // \r\n, tabs and spaces between quanta and even inside them.
        assert_eq!(decode_bytes(b"YWJj\r\nZGVm\n").unwrap(), b"abcdef");
        assert_eq!(decode_bytes(b"Y W J j").unwrap(), b"abc");
    }

    #[test]
    fn test_decode_wrapped_mid_quantum() {
        assert_eq!(decode_bytes(b"TWF\nu").unwrap(), [0x4d, 0x61, 0x6e]);
    }

    // ===== DECODE ERROR TESTS =====

    #[test]
    fn test_decode_padding_not_at_end() {
        assert_eq!(format_err(b"TQ=X"), FormatError::MisplacedPadding);
    }

    #[test]
    fn test_decode_padding_too_early() {
        assert_eq!(format_err(b"=AAA"), FormatError::MisplacedPadding);
        assert_eq!(format_err(b"A=AA"), FormatError::MisplacedPadding);
    }

    #[test]
    fn test_decode_trailing_data_after_padding() {
        assert_eq!(format_err(b"TQ==TWFu"), FormatError::TrailingData);
        // Also across a separator.
        assert_eq!(format_err(b"TQ==\nTWFu"), FormatError::TrailingData);
    }

    #[test]
    fn test_decode_truncated() {
        assert_eq!(format_err(b"TWF"), FormatError::Truncated);
        assert_eq!(format_err(b"TWFuT"), FormatError::Truncated);
    }

    #[test]
    fn test_decode_invalid_character() {
        assert_eq!(format_err(b"TW!u"), FormatError::InvalidByte(b'!'));
    }

    #[test]
    fn test_decoder_split_independence() {
        // Feeding one byte at a time, including split padding, matches the
        // one-shot decode.
        let input = b"SGVs\nbG8=";
        let mut out = Vec::new();
        let mut dec = Decoder::new();
        for b in input {
            dec.feed(std::slice::from_ref(b), &mut out).unwrap();
        }
        dec.finish().unwrap();
        assert_eq!(out, b"Hello");
    }

    // ===== ROUNDTRIP TESTS =====

    #[test]
    fn test_roundtrip_all_byte_values() {
        let input: Vec<u8> = (0..=255).collect();
        let decoded = decode_bytes(&encode_bytes(&input, 0)).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn test_roundtrip_wrapped() {
        let input: Vec<u8> = (0..10000).map(|i| (i % 256) as u8).collect();
        for wrap in [1, 3, 4, 5, 64, 76] {
            let decoded = decode_bytes(&encode_bytes(&input, wrap)).unwrap();
            assert_eq!(decoded, input, "round trip failed at wrap {wrap}");
        }
    }

    #[test]
    fn test_roundtrip_partial_tail_lengths() {
        for len in 0..8 {
            let input: Vec<u8> = (0..len).collect();
            let decoded = decode_bytes(&encode_bytes(&input, 0)).unwrap();
            assert_eq!(decoded, input, "round trip failed at length {len}");
        }
    }
}
