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
//! COP2 (GTE) instruction implementations
//!
//! The CPU side of the GTE: register moves, LWC2/SWC2 and command
//! issue. Access requires SR.CU2; that check happens in the dispatcher.

use super::super::decode::Instruction;
use super::super::{timing, ExceptionCause, CPU};
use crate::core::error::Result;
use crate::core::memory::Bus;

impl CPU {
    /// MFC2: Move From Coprocessor 2 (data register)
    ///
    /// Format: mfc2 rt, rd
    pub(crate) fn op_mfc2(&mut self, instr: Instruction) -> Result<()> {
        let value = self.gte.read_data(instr.rd() as usize) as u32;
        self.delayed_load_chain(instr.rt(), value);
        self.charge(timing::COP_TRANSFER);
        Ok(())
    }

    /// CFC2: Move From Coprocessor 2 (control register)
    ///
    /// Reading FLAG (r31) acknowledges it.
    pub(crate) fn op_cfc2(&mut self, instr: Instruction) -> Result<()> {
        let value = self.gte.read_control_acknowledge(instr.rd() as usize) as u32;
        self.delayed_load_chain(instr.rt(), value);
        self.charge(timing::COP_TRANSFER);
        Ok(())
    }

    /// MTC2: Move To Coprocessor 2 (data register)
    pub(crate) fn op_mtc2(&mut self, instr: Instruction) -> Result<()> {
        let value = self.reg(instr.rt()) as i32;
        self.gte.write_data(instr.rd() as usize, value);
        Ok(())
    }

    /// CTC2: Move To Coprocessor 2 (control register)
    pub(crate) fn op_ctc2(&mut self, instr: Instruction) -> Result<()> {
        let value = self.reg(instr.rt()) as i32;
        self.gte.write_control(instr.rd() as usize, value);
        Ok(())
    }

    /// Issue a GTE command; its latency is charged to this step
    pub(crate) fn op_gte_command(&mut self, instr: Instruction) -> Result<()> {
        let cycles = self.gte.execute(instr.0);
        self.charge(cycles);
        Ok(())
    }

    /// LWC2: Load Word to Coprocessor 2
    ///
    /// Format: lwc2 rt, offset(rs), where rt names a GTE data register
    pub(crate) fn op_lwc2(&mut self, instr: Instruction, bus: &mut Bus) -> Result<()> {
        if !self.cop0.cop2_enabled() {
            self.exception(ExceptionCause::CoprocessorUnusable);
            return Ok(());
        }

        let addr = self.reg(instr.rs()).wrapping_add(instr.imm_se());
        if addr & 3 != 0 {
            self.exception_with_address(ExceptionCause::AddressErrorLoad, addr);
            return Ok(());
        }

        let value = bus.read32(addr)?;
        self.gte.write_data(instr.rt() as usize, value as i32);
        self.charge(timing::LOAD);
        Ok(())
    }

    /// SWC2: Store Word from Coprocessor 2
    pub(crate) fn op_swc2(&mut self, instr: Instruction, bus: &mut Bus) -> Result<()> {
        if !self.cop0.cop2_enabled() {
            self.exception(ExceptionCause::CoprocessorUnusable);
            return Ok(());
        }

        let addr = self.reg(instr.rs()).wrapping_add(instr.imm_se());
        if addr & 3 != 0 {
            self.exception_with_address(ExceptionCause::AddressErrorStore, addr);
            return Ok(());
        }

        let value = self.gte.read_data(instr.rt() as usize) as u32;
        self.store32(bus, addr, value)
    }
}
