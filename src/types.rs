//! Core identifier types for tracked clients and monitored ports

/// Identifier of one BLE peripheral/connection slot
///
/// Derived from the wire: a decimal index in the labeled grammar, a
/// 2-hex-digit byte in the raw grammar. Keys the drop-tracking map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(u16);

impl ClientId {
    /// Create a client ID from its wire value
    #[must_use]
    #[inline]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the underlying value
    #[must_use]
    #[inline]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

impl From<u16> for ClientId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl From<u8> for ClientId {
    fn from(id: u8) -> Self {
        Self(u16::from(id))
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Big-endian sequence counter reconstructed from notification bytes
///
/// 3 bytes wide in the labeled grammar, 4 bytes in the raw grammar.
/// Wraparound of the device counter is not modeled; see
/// [`crate::stats::ClientTracker::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    /// Create a sequence number from its reconstructed value
    #[must_use]
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the underlying value
    #[must_use]
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for SequenceNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable label of a monitored serial port (e.g. `/dev/ttyUSB0`)
///
/// Attached to every diagnostic line so interleaved output from multiple
/// workers stays attributable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortLabel(String);

impl PortLabel {
    /// Create a label from a port name
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Get the label as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PortLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
