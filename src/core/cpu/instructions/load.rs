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
    // === Load Instructions ===
    //
    // All loads go through the load delay slot. A misaligned address raises
    // AddressErrorLoad with BADA set; the target register is not touched.

    #[inline(always)]
    fn load_address(&self, instr: Instruction) -> u32 {
        self.reg(instr.rs()).wrapping_add(instr.imm_se())
    }

    /// LW: Load Word (32-bit)
    ///
    /// Format: lw rt, offset(rs)
    /// Operation: rt = memory[rs + sign_extend(offset)]
    pub(crate) fn op_lw(&mut self, instr: Instruction, bus: &mut Bus) -> Result<()> {
        let addr = self.load_address(instr);
        if addr & 3 != 0 {
            self.exception_with_address(ExceptionCause::AddressErrorLoad, addr);
            return Ok(());
        }

        let value = bus.read32(addr)?;
        self.delayed_load_chain(instr.rt(), value);
        self.charge(timing::LOAD);
        Ok(())
    }

    /// LH: Load Halfword (sign-extended)
    pub(crate) fn op_lh(&mut self, instr: Instruction, bus: &mut Bus) -> Result<()> {
        let addr = self.load_address(instr);
        if addr & 1 != 0 {
            self.exception_with_address(ExceptionCause::AddressErrorLoad, addr);
            return Ok(());
        }

        let value = bus.read16(addr)? as i16 as u32;
        self.delayed_load_chain(instr.rt(), value);
        self.charge(timing::LOAD);
        Ok(())
    }

    /// LHU: Load Halfword Unsigned
    pub(crate) fn op_lhu(&mut self, instr: Instruction, bus: &mut Bus) -> Result<()> {
        let addr = self.load_address(instr);
        if addr & 1 != 0 {
            self.exception_with_address(ExceptionCause::AddressErrorLoad, addr);
            return Ok(());
        }

        let value = bus.read16(addr)? as u32;
        self.delayed_load_chain(instr.rt(), value);
        self.charge(timing::LOAD);
        Ok(())
    }

    /// LB: Load Byte (sign-extended)
    pub(crate) fn op_lb(&mut self, instr: Instruction, bus: &mut Bus) -> Result<()> {
        let addr = self.load_address(instr);
        let value = bus.read8(addr)? as i8 as u32;
        self.delayed_load_chain(instr.rt(), value);
        self.charge(timing::LOAD);
        Ok(())
    }

    /// LBU: Load Byte Unsigned
    pub(crate) fn op_lbu(&mut self, instr: Instruction, bus: &mut Bus) -> Result<()> {
        let addr = self.load_address(instr);
        let value = bus.read8(addr)? as u32;
        self.delayed_load_chain(instr.rt(), value);
        self.charge(timing::LOAD);
        Ok(())
    }

    /// LWL: Load Word Left
    ///
    /// Merges the high-order bytes of an unaligned word into rt. Paired
    /// with LWR to load a word from any address:
    ///
    /// ```text
    /// lwr r1, 0(r2)
    /// lwl r1, 3(r2)
    /// ```
    ///
    /// Unlike every other instruction, LWL/LWR see the value of a load
    /// still in its delay slot, so the pair works back to back.
    pub(crate) fn op_lwl(&mut self, instr: Instruction, bus: &mut Bus) -> Result<()> {
        let addr = self.load_address(instr);
        let word = bus.read32(addr & !3)?;
        let cur = self.reg_with_pending(instr.rt());

        let value = match addr & 3 {
            0 => (cur & 0x00FF_FFFF) | (word << 24),
            1 => (cur & 0x0000_FFFF) | (word << 16),
            2 => (cur & 0x0000_00FF) | (word << 8),
            _ => word,
        };

        self.delayed_load_chain(instr.rt(), value);
        self.charge(timing::LOAD);
        Ok(())
    }

    /// LWR: Load Word Right
    ///
    /// Merges the low-order bytes of an unaligned word into rt.
    pub(crate) fn op_lwr(&mut self, instr: Instruction, bus: &mut Bus) -> Result<()> {
        let addr = self.load_address(instr);
        let word = bus.read32(addr & !3)?;
        let cur = self.reg_with_pending(instr.rt());

        let value = match addr & 3 {
            0 => word,
            1 => (cur & 0xFF00_0000) | (word >> 8),
            2 => (cur & 0xFFFF_0000) | (word >> 16),
            _ => (cur & 0xFFFF_FF00) | (word >> 24),
        };

        self.delayed_load_chain(instr.rt(), value);
        self.charge(timing::LOAD);
        Ok(())
    }
}
