#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::ZlibEncoder;

    use crate::frame::Opcode;
    use crate::server::{ChatMessage, decode_text, extract, extract_candidates, parse_server_frame};
    use crate::{DecodeError, ExtractError};

    const ALICE: &str = r#"{"type":"1","data":{"from":{"nickName":"alice"},"content":"hi"}}"#;
    const BOB: &str = r#"{"type":"1","time":1499999999,"data":{"from":{"nickName":"bob","rid":"42","level":"3"},"content":"hello there"}}"#;

    fn inflated(text: &str) -> Vec<u8> {
        let mut raw = vec![0u8; 16];
        raw.extend_from_slice(text.as_bytes());
        raw
    }

    fn data_frame(text: &str) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&inflated(text)).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut frame = vec![0x00, 0x06, 0x00, 0x03, 0x00, 0x02];
        frame.extend_from_slice(&[0x01, 0x02]);
        frame.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
        frame.extend_from_slice(&compressed);
        frame
    }

    #[test]
    fn test_decode_text_strips_sub_header_and_whitespace() {
        let text = decode_text(&inflated("  \n{\"a\":1}\r\n "));

        assert_eq!(text, "{\"a\":1}");
    }

    #[test]
    fn test_decode_text_drops_invalid_utf8() {
        let mut raw = inflated("ab");
        raw.extend_from_slice(&[0xff, 0xfe]);
        raw.extend_from_slice("cd弹幕".as_bytes());

        assert_eq!(decode_text(&raw), "abcd弹幕");
    }

    #[test]
    fn test_decode_text_shorter_than_sub_header() {
        assert_eq!(decode_text(b"short"), "");
    }

    #[test]
    fn test_extract_single() {
        let messages = extract(&inflated(ALICE));

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0], serde_json::from_str::<ChatMessage>(ALICE).unwrap());
        assert_eq!(messages[0].nickname(), "alice");
        assert_eq!(messages[0].content(), "hi");
    }

    #[test]
    fn test_extract_single_after_leading_noise() {
        let text = format!("{{\"type\":\"2\"}}{}", BOB);
        let messages = extract(&inflated(&text));

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].nickname(), "bob");
    }

    #[test]
    fn test_extract_two_concatenated() {
        let text = format!("{}{}", ALICE, BOB);
        let messages = extract(&inflated(&text));

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], serde_json::from_str::<ChatMessage>(ALICE).unwrap());
        assert_eq!(messages[1], serde_json::from_str::<ChatMessage>(BOB).unwrap());
    }

    #[test]
    fn test_extract_keeps_extra_sender_fields() {
        let messages = extract(&inflated(BOB));

        let extra = &messages[0].data.from.extra;
        assert_eq!(extra.get("rid").and_then(|v| v.as_str()), Some("42"));
        assert_eq!(extra.get("level").and_then(|v| v.as_str()), Some("3"));
    }

    #[test]
    fn test_extract_without_marker() {
        let text = r#"{"type":"306","data":{"gift":"bamboo"}}"#;

        assert!(extract(&inflated(text)).is_empty());
        assert!(extract_candidates(text).is_empty());
    }

    #[test]
    fn test_extract_empty_input() {
        assert!(extract(&[]).is_empty());
    }

    #[test]
    fn test_bad_first_candidate_keeps_second() {
        let text = format!("{}{}", r#"{"type":"1","data":{"content":"no sender"}}"#, ALICE);
        let candidates = extract_candidates(&text);

        assert_eq!(candidates.len(), 2);
        assert!(matches!(candidates[0], Err(ExtractError::Json(_))));
        assert_eq!(candidates[1].as_ref().unwrap().nickname(), "alice");
    }

    #[test]
    fn test_bad_second_candidate_keeps_first() {
        let text = format!("{}{}", ALICE, r#"{"type":"1","data":"#);
        let messages = extract(&inflated(&text));

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].nickname(), "alice");
    }

    #[test]
    fn test_unterminated_first_candidate() {
        let text = format!("{}{}", r#"{"type":"1""#, ALICE);
        let candidates = extract_candidates(&text);

        assert!(matches!(candidates[0], Err(ExtractError::Unterminated)));
        assert!(candidates[1].is_ok());
    }

    #[test]
    fn test_only_first_and_last_of_three() {
        let text = format!("{}{}{}", ALICE, BOB, ALICE);
        let messages = extract(&inflated(&text));

        // The first slice spans the first two objects and fails to parse.
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].nickname(), "alice");
    }

    #[test]
    fn test_parse_data_frame() {
        let frame = parse_server_frame(&data_frame(ALICE)).unwrap().unwrap();

        assert!(frame.is_data());
        assert_eq!(frame.messages.len(), 1);
        assert_eq!(frame.messages[0].nickname(), "alice");
        assert_eq!(frame.messages[0].content(), "hi");
        assert!(frame.rejected.is_empty());
    }

    #[test]
    fn test_parse_data_frame_reports_rejected() {
        let text = format!("{}{}", ALICE, r#"{"type":"1",}"#);
        let frame = parse_server_frame(&data_frame(&text)).unwrap().unwrap();

        assert_eq!(frame.messages.len(), 1);
        assert_eq!(frame.rejected.len(), 1);
    }

    #[test]
    fn test_parse_short_blob_is_ignored() {
        for len in 0..5 {
            let blob = vec![0x03; len];
            assert!(parse_server_frame(&blob).unwrap().is_none());
        }
    }

    #[test]
    fn test_parse_control_frame_is_not_decompressed() {
        let frame = parse_server_frame(&[0x00, 0x06, 0x00, 0x06, 0x00, 0x00])
            .unwrap()
            .unwrap();

        assert_eq!(frame.header.opcode, Opcode::Other(6));
        assert!(frame.messages.is_empty());
    }

    #[test]
    fn test_parse_corrupt_data_frame() {
        let mut frame = data_frame(ALICE);
        frame[12] = 0xff;
        frame[13] = 0xff;

        assert!(matches!(parse_server_frame(&frame), Err(DecodeError::Inflate(_))));
    }
}
