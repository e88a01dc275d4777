//! BLE bridge provisioning over AT commands
//!
//! Before a port starts streaming notifications, the bridge firmware has
//! to be walked through its connection setup: start the BLE stack, connect
//! each peer, bind the notification service and characteristic to a slot,
//! then enable notifications per slot. The firmware acknowledges each
//! command with echo lines ending in `OK`.

use std::time::Duration;

use tracing::info;

use crate::monitor::{LineRead, LineSource};
use crate::monitor_error::MonitorError;
use crate::serial::SerialLineSource;

/// A line source commands can also be written to
pub trait CommandPort: LineSource {
    /// Send one AT command line to the device
    fn send_command(&mut self, command: &str) -> Result<(), MonitorError>;
}

impl CommandPort for SerialLineSource {
    fn send_command(&mut self, command: &str) -> Result<(), MonitorError> {
        SerialLineSource::send_command(self, command)
    }
}

/// What to provision on one port
#[derive(Debug, Clone)]
pub struct ProvisionPlan {
    /// Peer addresses this port connects to, one slot each
    pub peers: Vec<String>,
    /// Service UUID carrying the notification characteristic
    pub service_uuid: String,
    /// Characteristic to subscribe to
    pub characteristic_uuid: String,
    /// Pause after each command while the firmware settles
    pub settle: Duration,
}

/// Drain the device's response to one command
///
/// Echo lines are logged until the terminating `OK` or until the device
/// falls silent; either way the serial stream is back at a command
/// boundary.
fn drain_response<P: CommandPort>(port: &mut P) -> Result<(), MonitorError> {
    loop {
        match port.read_line()? {
            LineRead::Line(line) => {
                info!(port = %port.label(), "< {}", line);
                if line == "OK" {
                    return Ok(());
                }
            }
            LineRead::Empty | LineRead::TimedOut => return Ok(()),
        }
    }
}

fn exchange<P: CommandPort>(
    port: &mut P,
    command: &str,
    settle: Duration,
) -> Result<(), MonitorError> {
    info!(port = %port.label(), "> {}", command);
    port.send_command(command)?;
    std::thread::sleep(settle);
    drain_response(port)
}

/// Split the configured peer addresses over the monitored ports
///
/// Contiguous chunks in listed order, sized so every peer lands on some
/// port; trailing ports may get none.
#[must_use]
pub fn assign_peers(peers: &[String], port_count: usize) -> Vec<Vec<String>> {
    let mut assignments = vec![Vec::new(); port_count];
    if port_count == 0 || peers.is_empty() {
        return assignments;
    }
    let chunk = peers.len().div_ceil(port_count);
    for (index, group) in peers.chunks(chunk).enumerate() {
        assignments[index] = group.to_vec();
    }
    assignments
}

/// Run the full provisioning sequence on one port
///
/// Slots are numbered from 1 in the order peers are listed; the sequence
/// and its pacing follow the bridge firmware's expectations.
pub fn provision<P: CommandPort>(port: &mut P, plan: &ProvisionPlan) -> Result<(), MonitorError> {
    for (index, address) in plan.peers.iter().enumerate() {
        let slot = index + 1;
        exchange(port, "AT+BLESTART", plan.settle)?;
        exchange(port, &format!("AT+BLECONNECT={}", address), plan.settle)?;
        exchange(
            port,
            &format!("AT+BLESETSERVICE={},{}", slot, plan.service_uuid),
            plan.settle,
        )?;
        // The characteristic bind is the slowest step on real hardware
        exchange(
            port,
            &format!("AT+BLESETCHAR={},{}", slot, plan.characteristic_uuid),
            plan.settle.saturating_mul(2),
        )?;
    }

    std::thread::sleep(plan.settle);
    for slot in 1..=plan.peers.len() {
        exchange(port, &format!("AT+BLENOTIFY={}", slot), plan.settle)?;
    }
    std::thread::sleep(plan.settle);

    info!(port = %port.label(), "provisioned {} peer slot(s)", plan.peers.len());
    Ok(())
}
