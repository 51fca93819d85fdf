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
use super::super::{ExceptionCause, CPU};
use crate::core::error::Result;

impl CPU {
    // === Arithmetic Instructions ===

    /// ADD: Add (with overflow exception)
    ///
    /// Format: add rd, rs, rt
    /// Operation: rd = rs + rt, trapping on signed overflow
    ///
    /// On overflow rd is left untouched.
    pub(crate) fn op_add(&mut self, instr: Instruction) -> Result<()> {
        let a = self.reg(instr.rs()) as i32;
        let b = self.reg(instr.rt()) as i32;

        match a.checked_add(b) {
            Some(result) => self.write_reg(instr.rd(), result as u32),
            None => self.exception(ExceptionCause::Overflow),
        }
        Ok(())
    }

    /// ADDU: Add Unsigned (no overflow exception)
    ///
    /// Format: addu rd, rs, rt
    pub(crate) fn op_addu(&mut self, instr: Instruction) -> Result<()> {
        let result = self.reg(instr.rs()).wrapping_add(self.reg(instr.rt()));
        self.write_reg(instr.rd(), result);
        Ok(())
    }

    /// ADDI: Add Immediate (with overflow exception)
    ///
    /// Format: addi rt, rs, imm
    /// Operation: rt = rs + sign_extend(imm), trapping on signed overflow
    pub(crate) fn op_addi(&mut self, instr: Instruction) -> Result<()> {
        let a = self.reg(instr.rs()) as i32;
        let b = instr.imm_se() as i32;

        match a.checked_add(b) {
            Some(result) => self.write_reg(instr.rt(), result as u32),
            None => self.exception(ExceptionCause::Overflow),
        }
        Ok(())
    }

    /// ADDIU: Add Immediate Unsigned
    ///
    /// Despite the name the immediate is sign-extended; only the overflow
    /// trap is absent.
    pub(crate) fn op_addiu(&mut self, instr: Instruction) -> Result<()> {
        let result = self.reg(instr.rs()).wrapping_add(instr.imm_se());
        self.write_reg(instr.rt(), result);
        Ok(())
    }

    /// SUB: Subtract (with overflow exception)
    pub(crate) fn op_sub(&mut self, instr: Instruction) -> Result<()> {
        let a = self.reg(instr.rs()) as i32;
        let b = self.reg(instr.rt()) as i32;

        match a.checked_sub(b) {
            Some(result) => self.write_reg(instr.rd(), result as u32),
            None => self.exception(ExceptionCause::Overflow),
        }
        Ok(())
    }

    /// SUBU: Subtract Unsigned
    pub(crate) fn op_subu(&mut self, instr: Instruction) -> Result<()> {
        let result = self.reg(instr.rs()).wrapping_sub(self.reg(instr.rt()));
        self.write_reg(instr.rd(), result);
        Ok(())
    }

    /// SLT: Set on Less Than (signed)
    pub(crate) fn op_slt(&mut self, instr: Instruction) -> Result<()> {
        let lt = (self.reg(instr.rs()) as i32) < (self.reg(instr.rt()) as i32);
        self.write_reg(instr.rd(), lt as u32);
        Ok(())
    }

    /// SLTU: Set on Less Than Unsigned
    pub(crate) fn op_sltu(&mut self, instr: Instruction) -> Result<()> {
        let lt = self.reg(instr.rs()) < self.reg(instr.rt());
        self.write_reg(instr.rd(), lt as u32);
        Ok(())
    }

    /// SLTI: Set on Less Than Immediate (signed)
    pub(crate) fn op_slti(&mut self, instr: Instruction) -> Result<()> {
        let lt = (self.reg(instr.rs()) as i32) < (instr.imm_se() as i32);
        self.write_reg(instr.rt(), lt as u32);
        Ok(())
    }

    /// SLTIU: Set on Less Than Immediate Unsigned
    ///
    /// The immediate is sign-extended, then compared unsigned.
    pub(crate) fn op_sltiu(&mut self, instr: Instruction) -> Result<()> {
        let lt = self.reg(instr.rs()) < instr.imm_se();
        self.write_reg(instr.rt(), lt as u32);
        Ok(())
    }
}
