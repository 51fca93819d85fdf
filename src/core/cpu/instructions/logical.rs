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
    // === Logical Instructions ===

    pub(crate) fn op_and(&mut self, instr: Instruction) -> Result<()> {
        let result = self.reg(instr.rs()) & self.reg(instr.rt());
        self.write_reg(instr.rd(), result);
        Ok(())
    }

    pub(crate) fn op_or(&mut self, instr: Instruction) -> Result<()> {
        let result = self.reg(instr.rs()) | self.reg(instr.rt());
        self.write_reg(instr.rd(), result);
        Ok(())
    }

    pub(crate) fn op_xor(&mut self, instr: Instruction) -> Result<()> {
        let result = self.reg(instr.rs()) ^ self.reg(instr.rt());
        self.write_reg(instr.rd(), result);
        Ok(())
    }

    pub(crate) fn op_nor(&mut self, instr: Instruction) -> Result<()> {
        let result = !(self.reg(instr.rs()) | self.reg(instr.rt()));
        self.write_reg(instr.rd(), result);
        Ok(())
    }

    /// ANDI: the immediate is zero-extended
    pub(crate) fn op_andi(&mut self, instr: Instruction) -> Result<()> {
        let result = self.reg(instr.rs()) & instr.imm();
        self.write_reg(instr.rt(), result);
        Ok(())
    }

    pub(crate) fn op_ori(&mut self, instr: Instruction) -> Result<()> {
        let result = self.reg(instr.rs()) | instr.imm();
        self.write_reg(instr.rt(), result);
        Ok(())
    }

    pub(crate) fn op_xori(&mut self, instr: Instruction) -> Result<()> {
        let result = self.reg(instr.rs()) ^ instr.imm();
        self.write_reg(instr.rt(), result);
        Ok(())
    }

    /// LUI: Load Upper Immediate
    ///
    /// Format: lui rt, imm
    /// Operation: rt = imm << 16
    pub(crate) fn op_lui(&mut self, instr: Instruction) -> Result<()> {
        self.write_reg(instr.rt(), instr.imm() << 16);
        Ok(())
    }
}
