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
use super::super::CPU;
use crate::core::error::Result;

impl CPU {
    // === Shift Instructions ===
    //
    // Variable shifts only use the low 5 bits of rs.

    /// SLL: Shift Left Logical (`sll r0, r0, 0` is the canonical NOP)
    pub(crate) fn op_sll(&mut self, instr: Instruction) -> Result<()> {
        let result = self.reg(instr.rt()) << instr.shamt();
        self.write_reg(instr.rd(), result);
        Ok(())
    }

    pub(crate) fn op_srl(&mut self, instr: Instruction) -> Result<()> {
        let result = self.reg(instr.rt()) >> instr.shamt();
        self.write_reg(instr.rd(), result);
        Ok(())
    }

    /// SRA: Shift Right Arithmetic (sign bit replicated)
    pub(crate) fn op_sra(&mut self, instr: Instruction) -> Result<()> {
        let result = (self.reg(instr.rt()) as i32) >> instr.shamt();
        self.write_reg(instr.rd(), result as u32);
        Ok(())
    }

    pub(crate) fn op_sllv(&mut self, instr: Instruction) -> Result<()> {
        let shift = self.reg(instr.rs()) & 0x1F;
        let result = self.reg(instr.rt()) << shift;
        self.write_reg(instr.rd(), result);
        Ok(())
    }

    pub(crate) fn op_srlv(&mut self, instr: Instruction) -> Result<()> {
        let shift = self.reg(instr.rs()) & 0x1F;
        let result = self.reg(instr.rt()) >> shift;
        self.write_reg(instr.rd(), result);
        Ok(())
    }

    pub(crate) fn op_srav(&mut self, instr: Instruction) -> Result<()> {
        let shift = self.reg(instr.rs()) & 0x1F;
        let result = (self.reg(instr.rt()) as i32) >> shift;
        self.write_reg(instr.rd(), result as u32);
        Ok(())
    }
}
