// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! PlayStation Controller Port Registers
//!
//! # Register Map
//! - 0x1F801040: JOY_TX_DATA / JOY_RX_DATA (read/write)
//! - 0x1F801044: JOY_STAT (Status register)
//! - 0x1F801048: JOY_MODE (Mode register)
//! - 0x1F80104A: JOY_CTRL (Control register)
//! - 0x1F80104E: JOY_BAUD (Baud rate)
//!
//! # Protocol
//! 1. Write to JOY_CTRL to select a port
//! 2. Write bytes to JOY_TX_DATA
//! 3. Read responses from JOY_RX_DATA
//! 4. Write to JOY_CTRL to deselect

use super::{InputSnapshot, Pad};
use serde::{Deserialize, Serialize};

/// Controller serial port
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerPorts {
    /// JOY_RX_DATA - last received byte
    rx_data: u8,

    /// A received byte has not been read yet
    rx_full: bool,

    /// JOY_STAT bit 7, /ACK input level
    ack_level: bool,

    /// JOY_STAT bit 9, interrupt request
    irq: bool,

    /// JOY_MODE (0x1F801048) - Mode register
    mode: u16,

    /// JOY_CTRL (0x1F80104A) - Control register
    ctrl: u16,

    /// JOY_BAUD (0x1F80104E) - Baud rate
    baud: u16,

    /// Cycles until a pending /ACK pulse
    ack_timer: Option<u32>,

    pads: [Pad; 2],
}

impl ControllerPorts {
    /// Cycles for one byte at the BIOS baud rate (0x88 x 8 bits)
    pub const BYTE_CYCLES: u32 = 0x88 * 8;

    const CTRL_SELECT: u16 = 1 << 1;
    const CTRL_ACKNOWLEDGE: u16 = 1 << 4;
    const CTRL_RESET: u16 = 1 << 6;
    const CTRL_ACK_IRQ: u16 = 1 << 12;
    const CTRL_PORT2: u16 = 1 << 13;

    /// Create the ports with the pads of [`InputSnapshot::default`]
    pub fn new() -> Self {
        let mut ports = Self {
            rx_data: 0xFF,
            rx_full: false,
            ack_level: false,
            irq: false,
            mode: 0x000D,
            ctrl: 0,
            baud: 0,
            ack_timer: None,
            pads: [Pad::default(), Pad::default()],
        };
        ports.set_input(&InputSnapshot::default());
        ports
    }

    /// Reset the serial interface; latched pad states survive
    pub fn reset(&mut self) {
        let states = self.pads.clone().map(|pad| pad.state);
        *self = Self::new();
        for (pad, state) in self.pads.iter_mut().zip(states) {
            pad.state = state;
        }
    }

    /// Latch the host's input for the coming frame
    pub fn set_input(&mut self, input: &InputSnapshot) {
        for (pad, state) in self.pads.iter_mut().zip(input.ports) {
            pad.state = state;
        }
    }

    /// Write to TX_DATA register (0x1F801040)
    ///
    /// The reply is available immediately; the /ACK pulse (and its
    /// interrupt) follows one byte time later.
    pub fn write_tx_data(&mut self, value: u8) {
        let (reply, ack) = if self.ctrl & Self::CTRL_SELECT != 0 {
            self.pads[self.selected_port()].transfer(value)
        } else {
            (0xFF, false)
        };

        log::trace!("JOY TX 0x{:02X} -> RX 0x{:02X} ack={}", value, reply, ack);

        self.rx_data = reply;
        self.rx_full = true;
        self.ack_level = false;
        self.ack_timer = ack.then_some(Self::BYTE_CYCLES);
    }

    /// Read from RX_DATA register (0x1F801040)
    pub fn read_rx_data(&mut self) -> u8 {
        self.rx_full = false;
        self.rx_data
    }

    /// Advance the /ACK timer
    ///
    /// # Returns
    ///
    /// `true` when the controller interrupt should be raised
    pub fn tick(&mut self, cycles: u32) -> bool {
        let Some(remaining) = self.ack_timer else {
            return false;
        };
        if remaining > cycles {
            self.ack_timer = Some(remaining - cycles);
            return false;
        }

        self.ack_timer = None;
        self.ack_level = true;
        if self.ctrl & Self::CTRL_ACK_IRQ != 0 && !self.irq {
            self.irq = true;
            return true;
        }
        false
    }

    fn selected_port(&self) -> usize {
        usize::from(self.ctrl & Self::CTRL_PORT2 != 0)
    }

    /// Write to CTRL register (0x1F80104A)
    ///
    /// Bit 1 selects the port chosen by bit 13, bit 4 acknowledges the
    /// interrupt, bit 6 resets the interface.
    pub fn write_ctrl(&mut self, value: u16) {
        if value & Self::CTRL_RESET != 0 {
            self.rx_full = false;
            self.irq = false;
            self.ack_timer = None;
            self.ack_level = false;
            self.mode = 0;
            self.baud = 0;
        }
        if value & Self::CTRL_ACKNOWLEDGE != 0 {
            self.irq = false;
        }

        let was = (self.ctrl & Self::CTRL_SELECT != 0).then(|| self.selected_port());
        self.ctrl = value & !(Self::CTRL_ACKNOWLEDGE | Self::CTRL_RESET);
        let now = (self.ctrl & Self::CTRL_SELECT != 0).then(|| self.selected_port());

        if was != now {
            for pad in &mut self.pads {
                pad.deselect();
            }
            if let Some(port) = now {
                self.pads[port].select();
                log::trace!("Controller port {} selected", port + 1);
            }
        }
    }

    /// Read STAT register (0x1F801044)
    ///
    /// ```text
    /// Bit 0: TX ready
    /// Bit 1: RX FIFO not empty
    /// Bit 2: TX finished
    /// Bit 7: /ACK input level
    /// Bit 9: Interrupt request
    /// ```
    pub fn read_stat(&self) -> u32 {
        let mut stat = 0b101;
        if self.rx_full {
            stat |= 1 << 1;
        }
        if self.ack_level {
            stat |= 1 << 7;
        }
        if self.irq {
            stat |= 1 << 9;
        }
        stat
    }

    #[inline]
    pub fn read_mode(&self) -> u16 {
        self.mode
    }

    #[inline]
    pub fn write_mode(&mut self, value: u16) {
        self.mode = value;
    }

    #[inline]
    pub fn read_ctrl(&self) -> u16 {
        self.ctrl
    }

    #[inline]
    pub fn read_baud(&self) -> u16 {
        self.baud
    }

    #[inline]
    pub fn write_baud(&mut self, value: u16) {
        self.baud = value;
    }
}

impl Default for ControllerPorts {
    fn default() -> Self {
        Self::new()
    }
}
