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
//! Controller input
//!
//! The host hands the core an [`InputSnapshot`] before each frame. The
//! snapshot is latched into the two pad ports and read back by software
//! through the serial port at 0x1F801040 using the digital pad protocol:
//!
//! ```text
//! TX: 01h  42h  00h  00h      00h
//! RX: FFh  41h  5Ah  buttons  buttons
//!          (ID lo, ID hi)     (active low)
//! ```
//!
//! Every reply byte except the last is followed by an /ACK pulse, which
//! raises the controller interrupt when JOY_CTRL enables it.

mod ports;

#[cfg(test)]
mod tests;

pub use ports::ControllerPorts;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Pad buttons, active high
    ///
    /// Bit positions match the wire format, where the bits are inverted.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Buttons: u16 {
        const SELECT = 1 << 0;
        const L3 = 1 << 1;
        const R3 = 1 << 2;
        const START = 1 << 3;
        const UP = 1 << 4;
        const RIGHT = 1 << 5;
        const DOWN = 1 << 6;
        const LEFT = 1 << 7;
        const L2 = 1 << 8;
        const R2 = 1 << 9;
        const L1 = 1 << 10;
        const R1 = 1 << 11;
        const TRIANGLE = 1 << 12;
        const CIRCLE = 1 << 13;
        const CROSS = 1 << 14;
        const SQUARE = 1 << 15;
    }
}

/// State of one pad port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadState {
    pub connected: bool,
    pub buttons: Buttons,
    /// Left stick (x, y), 0x80 centered
    pub left_axis: (u8, u8),
    /// Right stick (x, y), 0x80 centered
    pub right_axis: (u8, u8),
}

impl PadState {
    /// A connected pad with `buttons` held
    pub fn connected(buttons: Buttons) -> Self {
        Self {
            connected: true,
            buttons,
            ..Self::default()
        }
    }

    /// Button bits as sent on the wire (active low)
    pub fn wire_buttons(&self) -> u16 {
        !self.buttons.bits()
    }
}

impl Default for PadState {
    /// An empty port
    fn default() -> Self {
        Self {
            connected: false,
            buttons: Buttons::empty(),
            left_axis: (0x80, 0x80),
            right_axis: (0x80, 0x80),
        }
    }
}

/// Input for one frame
///
/// # Example
///
/// ```
/// use psrx_core::core::controller::{Buttons, InputSnapshot, PadState};
///
/// let input = InputSnapshot::single(Buttons::CROSS | Buttons::START);
/// assert!(input.ports[0].connected);
/// assert!(!input.ports[1].connected);
/// assert_eq!(input.ports[0].wire_buttons() & Buttons::CROSS.bits(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub ports: [PadState; 2],
}

impl InputSnapshot {
    /// One pad in port 1, port 2 empty
    pub fn single(buttons: Buttons) -> Self {
        Self {
            ports: [PadState::connected(buttons), PadState::default()],
        }
    }
}

impl Default for InputSnapshot {
    /// One idle pad in port 1
    fn default() -> Self {
        Self::single(Buttons::empty())
    }
}

/// Digital pad serial protocol state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Pad {
    pub(crate) state: PadState,

    /// Position in the current transaction, `None` when not listening
    step: Option<u8>,
}

impl Pad {
    /// Pad ID (digital pad)
    const ID: u16 = 0x5A41;

    /// /SEL asserted: wait for the address byte
    pub(crate) fn select(&mut self) {
        self.step = Some(0);
    }

    pub(crate) fn deselect(&mut self) {
        self.step = None;
    }

    /// Exchange one byte
    ///
    /// # Returns
    ///
    /// The reply byte and whether the pad acknowledges it
    pub(crate) fn transfer(&mut self, tx: u8) -> (u8, bool) {
        let Some(step) = self.step else {
            return (0xFF, false);
        };
        if !self.state.connected {
            self.step = None;
            return (0xFF, false);
        }

        let wire = self.state.wire_buttons();
        let (reply, ack) = match (step, tx) {
            (0, 0x01) => (0xFF, true),
            (1, 0x42) => (Self::ID as u8, true),
            (2, _) => ((Self::ID >> 8) as u8, true),
            (3, _) => (wire as u8, true),
            (4, _) => ((wire >> 8) as u8, false),
            // Not for us (memory card address) or unsupported command
            _ => (0xFF, false),
        };

        self.step = if ack { Some(step + 1) } else { None };
        (reply, ack)
    }
}
