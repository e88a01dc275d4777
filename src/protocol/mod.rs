//! Notification line grammars and parse outcomes
//!
//! The bridge firmware surfaces BLE notifications as text lines in one of
//! two shapes:
//!
//! - **labeled**: `Notification received from client 2 (hex): 02 FF FF 00 00 0B ...`
//!   where the hex payload is a client-echo byte, a two-byte `FF FF` header
//!   and a 3-byte big-endian sequence number;
//! - **raw**: `02 FF FF 00 00 00 0B ...` where a 2-hex-digit client id is
//!   followed by the `FF FF` marker and a 4-byte big-endian sequence number.
//!
//! The active grammar is selected once at startup. Parsing is pure: a line
//! either yields a [`NotificationRecord`] or a classified [`RejectReason`];
//! neither outcome is an error and neither interrupts a reading loop.

pub mod constants;
mod parser;

use serde::{Deserialize, Serialize};

use crate::types::{ClientId, SequenceNumber};

/// Parsed content of one notification line, consumed immediately by the
/// sequence tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationRecord {
    pub client_id: ClientId,
    pub sequence_number: SequenceNumber,
}

/// Why a line was not accepted as a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Line does not match the grammar shape at all; such lines are the
    /// firmware's diagnostic chatter and are surfaced verbatim
    FormatMismatch,
    /// Grammar matched but the payload is too short to carry a sequence
    InsufficientData {
        client_id: ClientId,
        found: usize,
        required: usize,
    },
    /// An extracted hex field failed to convert to an integer
    DecodeFailure {
        field: &'static str,
        value: String,
    },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FormatMismatch => write!(f, "unrecognized line"),
            Self::InsufficientData {
                client_id,
                found,
                required,
            } => write!(
                f,
                "Client {}: insufficient data to extract sequence ({} of {} bytes)",
                client_id, found, required
            ),
            Self::DecodeFailure { field, value } => {
                write!(f, "error parsing {}: invalid hex value '{}'", field, value)
            }
        }
    }
}

/// Result of feeding one line to a grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Notification(NotificationRecord),
    Rejected(RejectReason),
}

impl ParseOutcome {
    /// Get the parsed record, if the line was accepted
    #[must_use]
    pub fn record(&self) -> Option<&NotificationRecord> {
        match self {
            Self::Notification(record) => Some(record),
            Self::Rejected(_) => None,
        }
    }
}

/// The closed set of accepted line grammars
///
/// Both variants are always compiled in; one is chosen at startup from
/// config or CLI and applied to every line of every port.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LineGrammar {
    /// Marker phrase + decimal client index + hex payload (3-byte sequence)
    #[default]
    Labeled,
    /// Leading hex client byte + `FF FF` + 4-byte sequence
    Raw,
}

impl LineGrammar {
    /// Parse one already-trimmed line of text under this grammar
    #[must_use]
    pub fn parse(&self, line: &str) -> ParseOutcome {
        match self {
            Self::Labeled => parser::parse_labeled(line),
            Self::Raw => parser::parse_raw(line),
        }
    }

    /// Width of the sequence field, in bytes
    #[must_use]
    pub const fn sequence_width(&self) -> usize {
        match self {
            Self::Labeled => constants::LABELED_SEQ_LEN,
            Self::Raw => constants::RAW_SEQ_LEN,
        }
    }

    /// Largest sequence value this grammar can carry before the device
    /// counter wraps
    #[must_use]
    pub const fn sequence_max(&self) -> u64 {
        match self {
            Self::Labeled => constants::LABELED_SEQ_MAX,
            Self::Raw => constants::RAW_SEQ_MAX,
        }
    }

    /// Human-readable name, matching the config/CLI spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Labeled => "labeled",
            Self::Raw => "raw",
        }
    }
}

impl std::fmt::Display for LineGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
