//! Event and command types at the scheduler's stream seams.
//!
//! These are the payloads of the external interfaces: the transmit request
//! output, the three status input streams, the out-of-band control stream,
//! and the per-queue command/status register encoding.

use crate::internal::regmap::{
    CMD_SET_PORT_ENABLE, CMD_SET_PORT_PAUSE, CMD_SET_PORT_TC, CMD_SET_QUEUE_ENABLE,
    CMD_SET_QUEUE_PAUSE, QUEUE_STATUS_ACTIVE, QUEUE_STATUS_ENABLE, QUEUE_STATUS_PAUSE,
    QUEUE_STATUS_SCHEDULED,
};
use crate::internal::state::PortCtrl;

// =============================================================================
// Stream Payloads
// =============================================================================

/// Transmit request handed downstream to the TX engine.
///
/// Metadata only: the scheduler never sees payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxRequest {
    /// Originating queue index
    pub queue: u16,
    /// Destination hint from the issuing channel
    pub dest: u16,
    /// Queue generation at issue; completions echo it back
    pub tag: u16,
}

/// Dequeue result from the queue manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DequeueStatus {
    /// Queue the fetch targeted
    pub queue: u16,
    /// Tag echoed from the request
    pub tag: u16,
    /// Fetch found no descriptors
    pub empty: bool,
    /// Fetch failed
    pub error: bool,
}

/// Fetch-start report from the TX engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StartStatus {
    /// Queue the fetch targeted
    pub queue: u16,
    /// Tag echoed from the request
    pub tag: u16,
    /// Packet length in bytes
    pub len: u32,
    /// Fetch aborted before any bytes moved
    pub error: bool,
}

/// Transmission-finished report from the TX engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FinishStatus {
    /// Queue the packet came from
    pub queue: u16,
    /// Tag echoed from the request
    pub tag: u16,
    /// Transmitted length in bytes
    pub len: u32,
}

/// Out-of-band queue pause/enable from an external controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueCtrl {
    /// Target queue index
    pub queue: u16,
    /// `true` re-enables, `false` pauses
    pub enable: bool,
}

// =============================================================================
// Queue Commands
// =============================================================================

/// Decoded per-queue command register write.
///
/// Port commands carry the opcode in bits 31:16, the port in bits 15:8 and
/// the argument in bits 7:0; queue commands carry the opcode in bits 31:8
/// and the argument in bits 7:0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueueCommand {
    /// Assign the traffic class the queue uses on a port
    SetPortTc {
        /// Target port
        port: u8,
        /// Traffic class (0..=7)
        tc: u8,
    },
    /// Enable or disable the queue on a port
    SetPortEnable {
        /// Target port
        port: u8,
        /// New enable value
        enable: bool,
    },
    /// Pause or resume the queue on a port
    SetPortPause {
        /// Target port
        port: u8,
        /// New pause value
        pause: bool,
    },
    /// Enable or disable the queue
    SetEnable(bool),
    /// Pause or resume the queue
    SetPause(bool),
}

impl QueueCommand {
    /// Decode a raw register write. Returns `None` for unknown opcodes,
    /// which the scheduler acknowledges and drops.
    #[must_use]
    pub fn decode(word: u32) -> Option<Self> {
        let port = ((word >> 8) & 0xFF) as u8;
        let arg = (word & 0xFF) as u8;
        match word >> 16 {
            CMD_SET_PORT_TC => {
                return Some(QueueCommand::SetPortTc {
                    port,
                    tc: arg & 0x07,
                });
            }
            CMD_SET_PORT_ENABLE => {
                return Some(QueueCommand::SetPortEnable {
                    port,
                    enable: arg != 0,
                });
            }
            CMD_SET_PORT_PAUSE => {
                return Some(QueueCommand::SetPortPause {
                    port,
                    pause: arg != 0,
                });
            }
            _ => {}
        }
        match word >> 8 {
            CMD_SET_QUEUE_ENABLE => Some(QueueCommand::SetEnable(arg != 0)),
            CMD_SET_QUEUE_PAUSE => Some(QueueCommand::SetPause(arg != 0)),
            _ => None,
        }
    }

    /// Encode back into the raw register word.
    #[must_use]
    pub fn encode(self) -> u32 {
        match self {
            QueueCommand::SetPortTc { port, tc } => {
                (CMD_SET_PORT_TC << 16) | (u32::from(port) << 8) | u32::from(tc & 0x07)
            }
            QueueCommand::SetPortEnable { port, enable } => {
                (CMD_SET_PORT_ENABLE << 16) | (u32::from(port) << 8) | u32::from(enable)
            }
            QueueCommand::SetPortPause { port, pause } => {
                (CMD_SET_PORT_PAUSE << 16) | (u32::from(port) << 8) | u32::from(pause)
            }
            QueueCommand::SetEnable(enable) => (CMD_SET_QUEUE_ENABLE << 8) | u32::from(enable),
            QueueCommand::SetPause(pause) => (CMD_SET_QUEUE_PAUSE << 8) | u32::from(pause),
        }
    }
}

// =============================================================================
// Queue Status
// =============================================================================

/// Per-port fields of the packed queue status word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortStatus {
    /// Traffic class on this port
    pub tc: u8,
    /// Queue enabled on this port
    pub enabled: bool,
    /// Queue paused on this port
    pub paused: bool,
    /// Queue has work in flight on this port
    pub scheduled: bool,
}

/// Queue status flags parsed from the packed status word.
///
/// This structure provides a convenient way to check a queue's state
/// without manually parsing the raw register bits.
///
/// # Example
///
/// ```ignore
/// let status = QueueStatus::from_raw(regs.read(queue_offset));
/// if status.active && !status.scheduled {
///     // Queue has work but is held off (disabled or paused)
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueStatus {
    /// Queue enable flag
    pub enabled: bool,
    /// Queue pause flag
    pub paused: bool,
    /// Descriptors available
    pub active: bool,
    /// Queue present in the ready ring
    pub scheduled: bool,
    /// Per-port status bytes
    pub ports: [PortStatus; 3],
}

impl QueueStatus {
    /// Create from the raw status word
    #[inline]
    #[must_use]
    pub fn from_raw(word: u32) -> Self {
        let mut ports = [PortStatus::default(); 3];
        for (i, port) in ports.iter_mut().enumerate() {
            let bits = PortCtrl::from_bits(((word >> (8 * (i + 1))) & 0xFF) as u8);
            *port = PortStatus {
                tc: bits.tc,
                enabled: bits.enable,
                paused: bits.pause,
                scheduled: bits.scheduled,
            };
        }
        Self {
            enabled: (word & QUEUE_STATUS_ENABLE) != 0,
            paused: (word & QUEUE_STATUS_PAUSE) != 0,
            active: (word & QUEUE_STATUS_ACTIVE) != 0,
            scheduled: (word & QUEUE_STATUS_SCHEDULED) != 0,
            ports,
        }
    }

    /// Convert back to the raw status word
    #[inline]
    #[must_use]
    pub fn to_raw(&self) -> u32 {
        let mut word = 0u32;
        if self.enabled {
            word |= QUEUE_STATUS_ENABLE;
        }
        if self.paused {
            word |= QUEUE_STATUS_PAUSE;
        }
        if self.active {
            word |= QUEUE_STATUS_ACTIVE;
        }
        if self.scheduled {
            word |= QUEUE_STATUS_SCHEDULED;
        }
        for (i, port) in self.ports.iter().enumerate() {
            let bits = PortCtrl {
                tc: port.tc,
                enable: port.enabled,
                pause: port.paused,
                scheduled: port.scheduled,
            };
            word |= u32::from(bits.to_bits()) << (8 * (i + 1));
        }
        word
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
