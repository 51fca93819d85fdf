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

//! PSX Interrupt Controller Implementation
//!
//! The interrupt controller latches interrupt requests from every hardware
//! component and drives the single interrupt line seen by the CPU
//! (COP0 CAUSE bit 10).
//!
//! ## Registers
//!
//! - **I_STAT** (0x1F801070): Interrupt status register (R/W)
//!   - Reading returns the latched request bits
//!   - Writing 0 to a bit acknowledges that interrupt (clears the bit)
//!   - Writing 1 to a bit leaves it unchanged
//!
//! - **I_MASK** (0x1F801074): Interrupt mask register (R/W)
//!   - 1 = interrupt enabled, 0 = interrupt masked
//!
//! Masking is level-sensitive: a masked request stays latched in I_STAT
//! and is delivered as soon as the mask bit is set again.
//!
//! ## Interrupt Sources (Bit Positions)
//!
//! ```text
//! Bit  | Source        | Description
//! -----|---------------|----------------------------------
//! 0    | VBLANK        | Vertical blank interrupt
//! 1    | GPU           | GP0(1Fh) interrupt request
//! 2    | CDROM         | CD-ROM controller
//! 3    | DMA           | DMA transfer complete
//! 4    | TIMER0        | Timer 0 interrupt
//! 5    | TIMER1        | Timer 1 interrupt
//! 6    | TIMER2        | Timer 2 interrupt
//! 7    | CONTROLLER    | Controller/memory card
//! 8    | SIO           | Serial I/O
//! 9    | SPU           | Sound processing unit
//! 10   | LIGHTPEN      | Lightpen/IRQ10 (PIO)
//! 11-15| -             | Not used
//! ```

use serde::{Deserialize, Serialize};

/// Interrupt source bit masks
pub mod interrupts {
    /// Vertical blank
    pub const VBLANK: u16 = 1 << 0;
    /// GPU interrupt request
    pub const GPU: u16 = 1 << 1;
    /// CD-ROM controller
    pub const CDROM: u16 = 1 << 2;
    /// DMA transfer complete
    pub const DMA: u16 = 1 << 3;
    /// Timer 0
    pub const TIMER0: u16 = 1 << 4;
    /// Timer 1
    pub const TIMER1: u16 = 1 << 5;
    /// Timer 2
    pub const TIMER2: u16 = 1 << 6;
    /// Controller and memory card byte received
    pub const CONTROLLER: u16 = 1 << 7;
    /// Serial port
    pub const SIO: u16 = 1 << 8;
    /// SPU
    pub const SPU: u16 = 1 << 9;
    /// Lightpen / PIO
    pub const LIGHTPEN: u16 = 1 << 10;

    /// Bits implemented by the controller
    pub const ALL: u16 = 0x07FF;

    /// Timer interrupt bit for timer `index`
    #[inline]
    pub fn timer(index: usize) -> u16 {
        TIMER0 << index
    }
}

/// Interrupt Controller
///
/// # Example
///
/// ```
/// use psrx_core::core::interrupt::{interrupts, InterruptController};
///
/// let mut ic = InterruptController::new();
/// ic.write_mask(interrupts::VBLANK as u32);
/// ic.raise(interrupts::VBLANK);
/// assert!(ic.is_pending_and_enabled());
///
/// // Writing 0 to the bit acknowledges it
/// ic.write_status(!(interrupts::VBLANK as u32));
/// assert!(!ic.is_pending_and_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptController {
    /// I_STAT: latched requests
    status: u16,

    /// I_MASK: enabled sources
    mask: u16,
}

impl InterruptController {
    /// Create a controller with no pending or enabled sources
    pub fn new() -> Self {
        Self { status: 0, mask: 0 }
    }

    /// Reset to power-on values
    pub fn reset(&mut self) {
        self.status = 0;
        self.mask = 0;
    }

    /// Latch one or more interrupt sources
    ///
    /// # Arguments
    ///
    /// * `source` - Bit mask from [`interrupts`]
    pub fn raise(&mut self, source: u16) {
        self.status |= source & interrupts::ALL;
        log::trace!("IRQ raised: 0x{:04X}, status=0x{:04X}", source, self.status);
    }

    /// Whether a latched source is currently enabled in I_MASK
    ///
    /// Consulted by the CPU once per instruction boundary.
    #[inline(always)]
    pub fn is_pending_and_enabled(&self) -> bool {
        (self.status & self.mask) != 0
    }

    /// Read I_STAT
    pub fn read_status(&self) -> u32 {
        self.status as u32
    }

    /// Write I_STAT
    ///
    /// Bits written as 0 are acknowledged; bits written as 1 are kept.
    pub fn write_status(&mut self, value: u32) {
        self.status &= value as u16;
        log::trace!("IRQ acknowledged, status=0x{:04X}", self.status);
    }

    /// Read I_MASK
    pub fn read_mask(&self) -> u32 {
        self.mask as u32
    }

    /// Write I_MASK
    pub fn write_mask(&mut self, value: u32) {
        self.mask = (value as u16) & interrupts::ALL;
        log::debug!("IRQ mask set: 0x{:04X}", self.mask);
    }
}

impl Default for InterruptController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
