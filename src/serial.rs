//! serialport-backed line source
//!
//! Thin transport wrapper: opens the port 8N1 with a read timeout, clears
//! stale buffers, and turns raw bytes into trimmed text lines. Every read
//! is bounded by the configured timeout so the worker loop always gets a
//! polling point.

use std::io::{BufRead, BufReader, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, Parity, SerialPort, StopBits};

use crate::monitor::{LineRead, LineSource};
use crate::monitor_error::MonitorError;
use crate::types::PortLabel;

/// A serial port read line by line
pub struct SerialLineSource {
    label: PortLabel,
    reader: BufReader<Box<dyn SerialPort>>,
    /// Bytes of a line whose terminator has not arrived yet; survives
    /// read timeouts so slow writers never lose a partial line
    pending: Vec<u8>,
}

impl SerialLineSource {
    /// Open and configure a serial port for monitoring
    ///
    /// 8 data bits, no parity, one stop bit; input and output buffers are
    /// cleared so the first read starts at a line boundary from now, not
    /// from whatever the bridge printed before we attached.
    pub fn open(port: &str, baud_rate: u32, read_timeout: Duration) -> Result<Self, MonitorError> {
        let open_err = |source| MonitorError::Open {
            port: port.to_string(),
            source,
        };

        let handle = serialport::new(port, baud_rate)
            .timeout(read_timeout)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .open()
            .map_err(open_err)?;
        handle.clear(ClearBuffer::All).map_err(open_err)?;

        Ok(Self {
            label: PortLabel::new(port),
            reader: BufReader::new(handle),
            pending: Vec::new(),
        })
    }

    /// Write one command line, CR-LF terminated, used by provisioning
    pub fn send_command(&mut self, command: &str) -> Result<(), MonitorError> {
        let wrapped = format!("{}\r\n", command);
        self.reader
            .get_mut()
            .write_all(wrapped.as_bytes())
            .and_then(|()| self.reader.get_mut().flush())
            .map_err(|source| MonitorError::CommandWrite {
                port: self.label.as_str().to_string(),
                command: command.to_string(),
                source,
            })
    }
}

impl LineSource for SerialLineSource {
    fn label(&self) -> &PortLabel {
        &self.label
    }

    fn read_line(&mut self) -> Result<LineRead, MonitorError> {
        // read_until instead of read_line: bridge output is not guaranteed
        // to be valid UTF-8 and a stray byte must not kill the worker
        match self.reader.read_until(b'\n', &mut self.pending) {
            Ok(0) => Ok(LineRead::Empty),
            Ok(_) => {
                let line = String::from_utf8_lossy(&self.pending).trim().to_string();
                self.pending.clear();
                if line.is_empty() {
                    Ok(LineRead::Empty)
                } else {
                    Ok(LineRead::Line(line))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(LineRead::TimedOut),
            Err(source) => Err(MonitorError::Io {
                port: self.label.as_str().to_string(),
                source,
            }),
        }
    }
}
