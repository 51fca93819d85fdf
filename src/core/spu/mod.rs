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
//! SPU (Sound Processing Unit) register file
//!
//! Sound synthesis is delegated to the host; the core keeps what software
//! can observe: every register in 0x1F801C00-0x1F801FFF reads back what was
//! written, SPUSTAT follows SPUCNT, and the 512KB sound RAM is reachable
//! through the data transfer port and DMA channel 4.
//!
//! # Transfer port
//!
//! | Register   | Offset | Meaning                                  |
//! |------------|--------|------------------------------------------|
//! | 0x1F801DA6 | 0x1A6  | Transfer address (in 8-byte units)       |
//! | 0x1F801DA8 | 0x1A8  | Transfer FIFO (one halfword per write)   |
//! | 0x1F801DAA | 0x1AA  | SPUCNT                                   |
//! | 0x1F801DAE | 0x1AE  | SPUSTAT                                  |

mod registers;

#[cfg(test)]
mod tests;

pub use registers::{SpuControl, TransferMode};

use crate::core::dma::DmaDevice;
use crate::core::error::Result;
use crate::core::save_state::expect_len;
use serde::{Deserialize, Serialize};

/// SPU (Sound Processing Unit)
#[derive(Serialize, Deserialize)]
pub struct SPU {
    /// Raw register file, one halfword per 2 bytes of I/O space
    regs: Vec<u16>,

    /// Sound RAM (512KB)
    ram: Vec<u8>,

    control: SpuControl,

    /// Current transfer address in bytes
    transfer_address: u32,
}

impl SPU {
    /// Sound RAM size
    pub const RAM_SIZE: usize = 512 * 1024;

    const REG_COUNT: usize = 0x400 / 2;

    const TRANSFER_ADDRESS: u32 = 0x1A6;
    const TRANSFER_FIFO: u32 = 0x1A8;
    const SPUCNT: u32 = 0x1AA;
    const SPUSTAT: u32 = 0x1AE;

    pub fn new() -> Self {
        Self {
            regs: vec![0; Self::REG_COUNT],
            ram: vec![0; Self::RAM_SIZE],
            control: SpuControl::empty(),
            transfer_address: 0,
        }
    }

    pub fn reset(&mut self) {
        self.regs.fill(0);
        self.ram.fill(0);
        self.control = SpuControl::empty();
        self.transfer_address = 0;
    }

    /// Reject a restored register file or sound RAM of the wrong size
    pub(crate) fn validate_layout(&self) -> Result<()> {
        expect_len("SPU registers", self.regs.len(), Self::REG_COUNT)?;
        expect_len("SPU RAM", self.ram.len(), Self::RAM_SIZE)
    }

    pub fn control(&self) -> SpuControl {
        self.control
    }

    /// Read a register at `offset` from 0x1F801C00
    pub fn read16(&self, offset: u32) -> u16 {
        match offset {
            Self::SPUSTAT => self.control.status(),
            Self::SPUCNT => self.control.bits(),
            _ => self.regs[Self::reg_index(offset)],
        }
    }

    /// Write a register at `offset` from 0x1F801C00
    pub fn write16(&mut self, offset: u32, value: u16) {
        match offset {
            Self::TRANSFER_ADDRESS => {
                self.transfer_address = u32::from(value) * 8;
            }
            Self::TRANSFER_FIFO => {
                self.write_ram16(self.transfer_address, value);
                self.advance_transfer();
            }
            Self::SPUCNT => {
                let control = SpuControl::from_bits_retain(value);
                if control.transfer_mode() != self.control.transfer_mode() {
                    log::debug!("SPU transfer mode {:?}", control.transfer_mode());
                }
                self.control = control;
            }
            Self::SPUSTAT => {
                log::trace!("SPUSTAT write 0x{:04X} ignored", value);
                return;
            }
            0x188..=0x18F => log::trace!("SPU key on/off +0x{:03X} = 0x{:04X}", offset, value),
            _ => {}
        }
        self.regs[Self::reg_index(offset)] = value;
    }

    fn reg_index(offset: u32) -> usize {
        ((offset & 0x3FF) >> 1) as usize
    }

    fn advance_transfer(&mut self) {
        self.transfer_address = self.transfer_address.wrapping_add(2) % Self::RAM_SIZE as u32;
    }

    /// Read a halfword of sound RAM (address wraps)
    pub fn read_ram16(&self, address: u32) -> u16 {
        let index = (address as usize & !1) % Self::RAM_SIZE;
        u16::from_le_bytes([self.ram[index], self.ram[index + 1]])
    }

    /// Write a halfword of sound RAM (address wraps)
    pub fn write_ram16(&mut self, address: u32, value: u16) {
        let index = (address as usize & !1) % Self::RAM_SIZE;
        self.ram[index..index + 2].copy_from_slice(&value.to_le_bytes());
    }
}

impl Default for SPU {
    fn default() -> Self {
        Self::new()
    }
}

impl DmaDevice for SPU {
    fn dma_request(&self) -> bool {
        matches!(
            self.control.transfer_mode(),
            TransferMode::DmaWrite | TransferMode::DmaRead
        )
    }

    fn dma_read(&mut self) -> u32 {
        let lo = self.read_ram16(self.transfer_address);
        self.advance_transfer();
        let hi = self.read_ram16(self.transfer_address);
        self.advance_transfer();
        u32::from(lo) | (u32::from(hi) << 16)
    }

    fn dma_write(&mut self, value: u32) {
        self.write_ram16(self.transfer_address, value as u16);
        self.advance_transfer();
        self.write_ram16(self.transfer_address, (value >> 16) as u16);
        self.advance_transfer();
    }
}
