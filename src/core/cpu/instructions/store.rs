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
use super::super::decode::Instruction;
use super::super::{timing, ExceptionCause, CPU};
use crate::core::error::Result;
use crate::core::memory::Bus;

impl CPU {
    // === Store Instructions ===
    //
    // While SR.IsC is set, stores land in the (unmodelled) cache and never
    // reach the bus. The BIOS relies on this to flush the instruction cache.

    #[inline(always)]
    fn store_address(&self, instr: Instruction) -> u32 {
        self.reg(instr.rs()).wrapping_add(instr.imm_se())
    }

    pub(crate) fn store32(&mut self, bus: &mut Bus, addr: u32, value: u32) -> Result<()> {
        self.charge(timing::STORE);
        if self.cop0.cache_isolated() {
            log::trace!("Isolated store to 0x{:08X} ignored", addr);
            return Ok(());
        }
        bus.write32(addr, value)
    }

    fn store16(&mut self, bus: &mut Bus, addr: u32, value: u16) -> Result<()> {
        self.charge(timing::STORE);
        if self.cop0.cache_isolated() {
            return Ok(());
        }
        bus.write16(addr, value)
    }

    fn store8(&mut self, bus: &mut Bus, addr: u32, value: u8) -> Result<()> {
        self.charge(timing::STORE);
        if self.cop0.cache_isolated() {
            return Ok(());
        }
        bus.write8(addr, value)
    }

    /// SW: Store Word
    ///
    /// Format: sw rt, offset(rs)
    /// Operation: memory[rs + sign_extend(offset)] = rt
    pub(crate) fn op_sw(&mut self, instr: Instruction, bus: &mut Bus) -> Result<()> {
        let addr = self.store_address(instr);
        if addr & 3 != 0 {
            self.exception_with_address(ExceptionCause::AddressErrorStore, addr);
            return Ok(());
        }
        let value = self.reg(instr.rt());
        self.store32(bus, addr, value)
    }

    /// SH: Store Halfword
    pub(crate) fn op_sh(&mut self, instr: Instruction, bus: &mut Bus) -> Result<()> {
        let addr = self.store_address(instr);
        if addr & 1 != 0 {
            self.exception_with_address(ExceptionCause::AddressErrorStore, addr);
            return Ok(());
        }
        let value = self.reg(instr.rt()) as u16;
        self.store16(bus, addr, value)
    }

    /// SB: Store Byte
    pub(crate) fn op_sb(&mut self, instr: Instruction, bus: &mut Bus) -> Result<()> {
        let addr = self.store_address(instr);
        let value = self.reg(instr.rt()) as u8;
        self.store8(bus, addr, value)
    }

    /// SWL: Store Word Left
    ///
    /// Writes the high-order bytes of rt into the aligned word containing
    /// the address.
    pub(crate) fn op_swl(&mut self, instr: Instruction, bus: &mut Bus) -> Result<()> {
        let addr = self.store_address(instr);
        let aligned = addr & !3;
        let v = self.reg(instr.rt());
        let mem = bus.read32(aligned)?;

        let value = match addr & 3 {
            0 => (mem & 0xFFFF_FF00) | (v >> 24),
            1 => (mem & 0xFFFF_0000) | (v >> 16),
            2 => (mem & 0xFF00_0000) | (v >> 8),
            _ => v,
        };
        self.store32(bus, aligned, value)
    }

    /// SWR: Store Word Right
    pub(crate) fn op_swr(&mut self, instr: Instruction, bus: &mut Bus) -> Result<()> {
        let addr = self.store_address(instr);
        let aligned = addr & !3;
        let v = self.reg(instr.rt());
        let mem = bus.read32(aligned)?;

        let value = match addr & 3 {
            0 => v,
            1 => (mem & 0x0000_00FF) | (v << 8),
            2 => (mem & 0x0000_FFFF) | (v << 16),
            _ => (mem & 0x00FF_FFFF) | (v << 24),
        };
        self.store32(bus, aligned, value)
    }
}
