//! nom parsers for the two notification line grammars
//!
//! Structured prefixes (markers, client id) are matched with nom; the hex
//! payload after the prefix is split on whitespace so arbitrary trailing
//! content never causes a rejection. A nom failure on the prefix means the
//! line is not a notification at all and classifies as
//! [`RejectReason::FormatMismatch`].

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while_m_n},
    character::complete::{digit1, space0, space1},
    combinator::{eof, map_res, verify},
    IResult,
};

use super::constants::{
    LABELED_MIN_HEX_BYTES, LABELED_SEQ_LEN, LABELED_SEQ_OFFSET, NOTIFICATION_MARKER,
    RAW_MARKER_BYTE, RAW_SEQ_LEN,
};
use super::{NotificationRecord, ParseOutcome, RejectReason};
use crate::types::{ClientId, SequenceNumber};

fn hex_pair(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        |s: &str| u8::from_str_radix(s, 16),
    )(input)
}

/// Match the labeled prefix anywhere in the line, the way the firmware's
/// chatter can precede it, and return the client index plus the payload tail
fn labeled_prefix(input: &str) -> IResult<&str, u16> {
    let (rest, _) = take_until(NOTIFICATION_MARKER)(input)?;
    let (rest, _) = tag(NOTIFICATION_MARKER)(rest)?;
    let (rest, _) = space1(rest)?;
    let (rest, index) = map_res(digit1, str::parse::<u16>)(rest)?;
    let (rest, _) = space1(rest)?;
    let (rest, _) = tag("(hex):")(rest)?;
    let (rest, _) = space0(rest)?;
    Ok((rest, index))
}

/// Match the raw prefix: 2-hex-digit client id followed by the `FF FF`
/// marker, returning the client byte plus the payload tail
///
/// Marker bytes are parsed as hex pairs and checked against
/// [`RAW_MARKER_BYTE`], which also makes them case-insensitive. The second
/// marker byte must end on a token boundary so a fused token like `FF0`
/// cannot pass as a marker plus payload.
fn raw_prefix(input: &str) -> IResult<&str, u8> {
    let marker_byte = |input| verify(hex_pair, |byte| *byte == RAW_MARKER_BYTE)(input);

    let (rest, client) = hex_pair(input)?;
    let (rest, _) = space1(rest)?;
    let (rest, _) = marker_byte(rest)?;
    let (rest, _) = space1(rest)?;
    let (rest, _) = marker_byte(rest)?;
    let (rest, _) = alt((space1, eof))(rest)?;
    Ok((rest, client))
}

/// Reconstruct a big-endian sequence number from hex byte tokens
///
/// The firmware always zero-pads, so every byte token is exactly two hex
/// digits; anything else is a decode failure, not a shorter byte.
fn decode_sequence(tokens: &[&str]) -> Result<SequenceNumber, RejectReason> {
    let mut value: u64 = 0;
    for token in tokens {
        let decode_failure = || RejectReason::DecodeFailure {
            field: "sequence byte",
            value: (*token).to_string(),
        };
        if token.len() != 2 {
            return Err(decode_failure());
        }
        let byte = u8::from_str_radix(token, 16).map_err(|_| decode_failure())?;
        value = (value << 8) | u64::from(byte);
    }
    Ok(SequenceNumber::new(value))
}

/// Parse a labeled notification line
///
/// Payload layout after the marker: byte 0 echoes the client id, bytes 1-2
/// are the fixed header, bytes 3-5 are the sequence. Echo and header are
/// not validated, matching the bridge's own tooling.
pub(super) fn parse_labeled(line: &str) -> ParseOutcome {
    let (payload, index) = match labeled_prefix(line) {
        Ok((payload, index)) => (payload, index),
        Err(_) => return ParseOutcome::Rejected(RejectReason::FormatMismatch),
    };
    let client_id = ClientId::from(index);

    let tokens: Vec<&str> = payload.split_whitespace().collect();
    if tokens.len() < LABELED_MIN_HEX_BYTES {
        return ParseOutcome::Rejected(RejectReason::InsufficientData {
            client_id,
            found: tokens.len(),
            required: LABELED_MIN_HEX_BYTES,
        });
    }

    match decode_sequence(&tokens[LABELED_SEQ_OFFSET..LABELED_SEQ_OFFSET + LABELED_SEQ_LEN]) {
        Ok(sequence_number) => ParseOutcome::Notification(NotificationRecord {
            client_id,
            sequence_number,
        }),
        Err(reason) => ParseOutcome::Rejected(reason),
    }
}

/// Parse a raw notification line
///
/// Exactly [`RAW_SEQ_LEN`] hex pairs after the marker form the sequence;
/// anything past them is trailing content and is ignored.
pub(super) fn parse_raw(line: &str) -> ParseOutcome {
    let (payload, client) = match raw_prefix(line) {
        Ok((payload, client)) => (payload, client),
        Err(_) => return ParseOutcome::Rejected(RejectReason::FormatMismatch),
    };
    let client_id = ClientId::from(client);

    let tokens: Vec<&str> = payload.split_whitespace().collect();
    if tokens.len() < RAW_SEQ_LEN {
        return ParseOutcome::Rejected(RejectReason::InsufficientData {
            client_id,
            found: tokens.len(),
            required: RAW_SEQ_LEN,
        });
    }

    match decode_sequence(&tokens[..RAW_SEQ_LEN]) {
        Ok(sequence_number) => ParseOutcome::Notification(NotificationRecord {
            client_id,
            sequence_number,
        }),
        Err(reason) => ParseOutcome::Rejected(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::LineGrammar;

    fn expect_record(outcome: ParseOutcome) -> NotificationRecord {
        match outcome {
            ParseOutcome::Notification(record) => record,
            ParseOutcome::Rejected(reason) => panic!("expected notification, got {:?}", reason),
        }
    }

    #[test]
    fn test_labeled_happy_path() {
        let line = "Notification received from client 2 (hex): 02 FF FF 00 00 0B 41 42";
        let record = expect_record(LineGrammar::Labeled.parse(line));
        assert_eq!(record.client_id, ClientId::new(2));
        assert_eq!(record.sequence_number, SequenceNumber::new(0x0B));
    }

    #[test]
    fn test_labeled_marker_mid_line() {
        // Firmware chatter can share the line with the marker
        let line = "> Notification received from client 10 (hex): 0A FF FF 01 02 03";
        let record = expect_record(LineGrammar::Labeled.parse(line));
        assert_eq!(record.client_id, ClientId::new(10));
        assert_eq!(record.sequence_number, SequenceNumber::new(0x010203));
    }

    #[test]
    fn test_labeled_three_byte_sequence_is_big_endian() {
        let line = "Notification received from client 1 (hex): 01 FF FF AB CD EF";
        let record = expect_record(LineGrammar::Labeled.parse(line));
        assert_eq!(record.sequence_number.get(), 0xABCDEF);
    }

    #[test]
    fn test_labeled_insufficient_bytes() {
        let line = "Notification received from client 3 (hex): 03 FF FF 00 01";
        match LineGrammar::Labeled.parse(line) {
            ParseOutcome::Rejected(RejectReason::InsufficientData {
                client_id,
                found,
                required,
            }) => {
                assert_eq!(client_id, ClientId::new(3));
                assert_eq!(found, 5);
                assert_eq!(required, 6);
            }
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_labeled_bad_hex_in_sequence() {
        let line = "Notification received from client 1 (hex): 01 FF FF 00 XY 05";
        match LineGrammar::Labeled.parse(line) {
            ParseOutcome::Rejected(RejectReason::DecodeFailure { field, value }) => {
                assert_eq!(field, "sequence byte");
                assert_eq!(value, "XY");
            }
            other => panic!("expected DecodeFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_labeled_rejects_firmware_chatter() {
        for line in ["OK", "BLE Server started, waiting for clients...", ""] {
            assert_eq!(
                LineGrammar::Labeled.parse(line),
                ParseOutcome::Rejected(RejectReason::FormatMismatch)
            );
        }
    }

    #[test]
    fn test_raw_happy_path() {
        let line = "01 FF FF 00 00 00 05 trailing";
        let record = expect_record(LineGrammar::Raw.parse(line));
        assert_eq!(record.client_id, ClientId::new(1));
        assert_eq!(record.sequence_number, SequenceNumber::new(5));
    }

    #[test]
    fn test_raw_four_byte_sequence_is_big_endian() {
        let record = expect_record(LineGrammar::Raw.parse("0A ff ff DE AD BE EF"));
        assert_eq!(record.client_id, ClientId::new(10));
        assert_eq!(record.sequence_number.get(), 0xDEAD_BEEF);
    }

    #[test]
    fn test_raw_marker_is_case_insensitive() {
        let record = expect_record(LineGrammar::Raw.parse("01 ff ff 00 00 00 09"));
        assert_eq!(record.sequence_number.get(), 9);
    }

    #[test]
    fn test_raw_insufficient_sequence_bytes() {
        match LineGrammar::Raw.parse("01 FF FF 00 00 00") {
            ParseOutcome::Rejected(RejectReason::InsufficientData {
                client_id,
                found,
                required,
            }) => {
                assert_eq!(client_id, ClientId::new(1));
                assert_eq!(found, 3);
                assert_eq!(required, 4);
            }
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_raw_requires_marker() {
        for line in [
            "01 FE FF 00 00 00 05",
            "01 FF FE 00 00 00 05",
            "zz FF FF 00 00 00 05",
            "012 FF FF 00 00 00 05",
            "OK",
        ] {
            assert_eq!(
                LineGrammar::Raw.parse(line),
                ParseOutcome::Rejected(RejectReason::FormatMismatch),
                "line {:?} should not match",
                line
            );
        }
    }

    #[test]
    fn test_raw_marker_must_end_on_token_boundary() {
        // A fused token like `FF0` is not a marker byte plus payload
        assert_eq!(
            LineGrammar::Raw.parse("01 FF FF0 00 00 00 05"),
            ParseOutcome::Rejected(RejectReason::FormatMismatch)
        );
    }

    #[test]
    fn test_raw_marker_at_end_of_line() {
        match LineGrammar::Raw.parse("01 FF FF") {
            ParseOutcome::Rejected(RejectReason::InsufficientData { found, .. }) => {
                assert_eq!(found, 0);
            }
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_sequence_tokens_must_be_two_digits() {
        for grammar_line in [
            (LineGrammar::Raw, "01 FF FF 0 00 00 05"),
            (
                LineGrammar::Labeled,
                "Notification received from client 1 (hex): 01 FF FF 0 00 05",
            ),
        ] {
            match grammar_line.0.parse(grammar_line.1) {
                ParseOutcome::Rejected(RejectReason::DecodeFailure { field, value }) => {
                    assert_eq!(field, "sequence byte");
                    assert_eq!(value, "0");
                }
                other => panic!("expected DecodeFailure, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_raw_bad_hex_after_marker() {
        match LineGrammar::Raw.parse("01 FF FF 00 00 GG 05") {
            ParseOutcome::Rejected(RejectReason::DecodeFailure { value, .. }) => {
                assert_eq!(value, "GG");
            }
            other => panic!("expected DecodeFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_is_pure() {
        let line = "01 FF FF 00 00 00 05";
        assert_eq!(LineGrammar::Raw.parse(line), LineGrammar::Raw.parse(line));
    }
}
