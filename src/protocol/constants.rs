//! Wire-format constants for the BLE bridge notification grammars

/// Marker phrase printed by the bridge firmware before each labeled
/// notification line
pub const NOTIFICATION_MARKER: &str = "Notification received from client";

/// Minimum number of hex bytes after the labeled marker: client echo,
/// two header bytes, three sequence bytes
pub const LABELED_MIN_HEX_BYTES: usize = 6;

/// Offset of the first sequence byte within a labeled hex payload
pub const LABELED_SEQ_OFFSET: usize = 3;

/// Sequence width in the labeled grammar (bytes)
pub const LABELED_SEQ_LEN: usize = 3;

/// Sequence width in the raw grammar (bytes)
pub const RAW_SEQ_LEN: usize = 4;

/// Header byte repeated twice as the raw-grammar marker (`FF FF`)
pub const RAW_MARKER_BYTE: u8 = 0xFF;

/// Largest sequence value a labeled (3-byte) notification can carry
///
/// A device counter passing this value wraps on the wire and is observed
/// by the tracker as a backwards jump, not as an error.
pub const LABELED_SEQ_MAX: u64 = 0x00FF_FFFF;

/// Largest sequence value a raw (4-byte) notification can carry
pub const RAW_SEQ_MAX: u64 = 0xFFFF_FFFF;
