//! Error types for port workers and their line sources
//!
//! Parser rejections are classified outcomes, not errors (see
//! [`crate::protocol::RejectReason`]); only the line source itself can
//! fail, and such a failure is fatal to exactly one worker.

use std::fmt;

/// Errors that end a single port worker
///
/// None of these ever propagates past the worker that hit them: the
/// aggregator and the other ports keep running.
#[derive(Debug)]
#[non_exhaustive]
pub enum MonitorError {
    /// Opening or configuring the serial port failed
    Open {
        port: String,
        source: serialport::Error,
    },

    /// The underlying device went away or the read failed hard
    Io {
        port: String,
        source: std::io::Error,
    },

    /// Provisioning command could not be written to the device
    CommandWrite {
        port: String,
        command: String,
        source: std::io::Error,
    },
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { port, source } => {
                write!(f, "Failed to open port {}: {}", port, source)
            }
            Self::Io { port, source } => {
                write!(f, "Error reading from serial port {}: {}", port, source)
            }
            Self::CommandWrite {
                port,
                command,
                source,
            } => {
                write!(
                    f,
                    "Failed to send '{}' to port {}: {}",
                    command, port, source
                )
            }
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Io { source, .. } | Self::CommandWrite { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_names_port() {
        let err = MonitorError::Io {
            port: "/dev/ttyUSB1".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "device unplugged"),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("/dev/ttyUSB1"));
        assert!(rendered.contains("device unplugged"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let err = MonitorError::Io {
            port: "p".to_string(),
            source: std::io::Error::other("boom"),
        };
        assert!(err.source().is_some());
    }

    #[test]
    fn test_command_write_display() {
        let err = MonitorError::CommandWrite {
            port: "/dev/ttyUSB0".to_string(),
            command: "AT+BLESTART".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"),
        };
        assert!(err.to_string().contains("AT+BLESTART"));
    }
}
