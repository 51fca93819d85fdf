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
//! Coprocessor 0 (system control)
//!
//! Only the registers the R3000A actually implements are modelled. The
//! debug/breakpoint registers are plain storage: the core never raises
//! hardware breakpoints.

use serde::{Deserialize, Serialize};

/// Exception cause codes stored in CAUSE bits [6:2]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum ExceptionCause {
    /// External interrupt (IP2, wired to the interrupt controller)
    Interrupt = 0x00,
    /// Misaligned load or instruction fetch
    AddressErrorLoad = 0x04,
    /// Misaligned store
    AddressErrorStore = 0x05,
    /// Bus error on instruction fetch
    BusErrorInstruction = 0x06,
    /// Bus error on data access
    BusErrorData = 0x07,
    /// SYSCALL
    Syscall = 0x08,
    /// BREAK
    Breakpoint = 0x09,
    /// Undefined opcode
    ReservedInstruction = 0x0A,
    /// Access to a disabled or absent coprocessor
    CoprocessorUnusable = 0x0B,
    /// Signed overflow in ADD/ADDI/SUB
    Overflow = 0x0C,
}

/// SR bit: current interrupt enable
const SR_IEC: u32 = 1 << 0;
/// SR bit: isolate cache (stores go to the cache, not the bus)
const SR_ISC: u32 = 1 << 16;
/// SR bit: boot exception vectors
const SR_BEV: u32 = 1 << 22;
/// SR bit: COP2 usable
const SR_CU2: u32 = 1 << 30;

/// CAUSE bit: exception taken in a branch delay slot
const CAUSE_BD: u32 = 1 << 31;
/// CAUSE bits that software may write (IP0/IP1)
const CAUSE_SW_MASK: u32 = 0x0300;
/// CAUSE bit: IP2, the only hardware interrupt line on the PSX
const CAUSE_IP2: u32 = 1 << 10;

/// Value of SR after reset
const SR_RESET: u32 = SR_BEV;

/// Coprocessor 0 register file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct COP0 {
    sr: u32,
    cause: u32,
    epc: u32,
    bad_vaddr: u32,
    /// BPC, BDA, TAR, DCIC, BDAM, BPCM
    debug: [u32; 6],
}

impl COP0 {
    pub const BPC: u8 = 3;
    pub const BDA: u8 = 5;
    pub const TAR: u8 = 6;
    pub const DCIC: u8 = 7;
    pub const BADA: u8 = 8;
    pub const BDAM: u8 = 9;
    pub const BPCM: u8 = 11;
    pub const SR: u8 = 12;
    pub const CAUSE: u8 = 13;
    pub const EPC: u8 = 14;
    pub const PRID: u8 = 15;

    /// R3000A processor revision
    const PRID_VALUE: u32 = 0x0000_0002;

    pub fn new() -> Self {
        Self {
            sr: SR_RESET,
            cause: 0,
            epc: 0,
            bad_vaddr: 0,
            debug: [0; 6],
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn debug_slot(reg: u8) -> Option<usize> {
        match reg {
            Self::BPC => Some(0),
            Self::BDA => Some(1),
            Self::TAR => Some(2),
            Self::DCIC => Some(3),
            Self::BDAM => Some(4),
            Self::BPCM => Some(5),
            _ => None,
        }
    }

    /// Read a register for MFC0
    ///
    /// Returns `None` for registers the chip does not implement, which
    /// makes MFC0 raise a reserved instruction exception.
    pub fn read(&self, reg: u8) -> Option<u32> {
        match reg {
            Self::BADA => Some(self.bad_vaddr),
            Self::SR => Some(self.sr),
            Self::CAUSE => Some(self.cause),
            Self::EPC => Some(self.epc),
            Self::PRID => Some(Self::PRID_VALUE),
            _ => Self::debug_slot(reg).map(|i| self.debug[i]),
        }
    }

    /// Write a register for MTC0
    ///
    /// BADA, EPC and PRID are read-only. Only the software interrupt bits
    /// of CAUSE are writable.
    pub fn write(&mut self, reg: u8, value: u32) {
        match reg {
            Self::SR => self.sr = value,
            Self::CAUSE => self.cause = (self.cause & !CAUSE_SW_MASK) | (value & CAUSE_SW_MASK),
            Self::BADA | Self::EPC | Self::PRID => {
                log::debug!("Ignoring write to read-only COP0 r{}: 0x{:08X}", reg, value)
            }
            _ => match Self::debug_slot(reg) {
                Some(i) => self.debug[i] = value,
                None => log::warn!("Write to unimplemented COP0 r{}: 0x{:08X}", reg, value),
            },
        }
    }

    #[inline(always)]
    pub fn sr(&self) -> u32 {
        self.sr
    }

    #[inline(always)]
    pub fn cause(&self) -> u32 {
        self.cause
    }

    #[inline(always)]
    pub fn epc(&self) -> u32 {
        self.epc
    }

    #[inline(always)]
    pub fn bad_vaddr(&self) -> u32 {
        self.bad_vaddr
    }

    /// Stores are captured by the (unmodelled) data cache
    #[inline(always)]
    pub fn cache_isolated(&self) -> bool {
        self.sr & SR_ISC != 0
    }

    #[inline(always)]
    pub fn cop2_enabled(&self) -> bool {
        self.sr & SR_CU2 != 0
    }

    /// Mirror the interrupt controller's output line into CAUSE.IP2
    #[inline(always)]
    pub fn set_hardware_interrupt(&mut self, active: bool) {
        if active {
            self.cause |= CAUSE_IP2;
        } else {
            self.cause &= !CAUSE_IP2;
        }
    }

    /// An enabled interrupt is waiting to be taken
    #[inline(always)]
    pub fn interrupt_pending(&self) -> bool {
        let im = (self.sr >> 8) & 0xFF;
        let ip = (self.cause >> 8) & 0xFF;
        self.sr & SR_IEC != 0 && im & ip != 0
    }

    /// Update the registers for exception entry
    ///
    /// Pushes the KU/IE stack, records the cause, EPC and BD flag, and
    /// latches BADA for address errors.
    ///
    /// # Returns
    ///
    /// The handler address selected by SR.BEV
    pub fn enter_exception(
        &mut self,
        cause: ExceptionCause,
        epc: u32,
        in_delay_slot: bool,
        bad_address: Option<u32>,
    ) -> u32 {
        let mode = self.sr & 0x3F;
        self.sr = (self.sr & !0x3F) | ((mode << 2) & 0x3F);

        self.cause = (self.cause & !(0x7C | CAUSE_BD)) | ((cause as u32) << 2);
        if in_delay_slot {
            self.cause |= CAUSE_BD;
        }
        self.epc = epc;
        if let Some(address) = bad_address {
            self.bad_vaddr = address;
        }

        if self.sr & SR_BEV != 0 {
            0xBFC0_0180
        } else {
            0x8000_0080
        }
    }

    /// RFE: pop the KU/IE stack
    pub fn return_from_exception(&mut self) {
        let mode = self.sr & 0x3F;
        self.sr = (self.sr & !0x0F) | (mode >> 2);
    }
}

impl Default for COP0 {
    fn default() -> Self {
        Self::new()
    }
}
