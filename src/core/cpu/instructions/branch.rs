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
    // === Branch Instructions ===
    //
    // When a branch executes, `self.pc` already holds the address of its
    // delay slot; the offset is relative to that address.

    /// Take a relative branch when `condition` holds
    #[inline(always)]
    fn branch_if(&mut self, instr: Instruction, condition: bool) {
        if condition {
            let target = self.pc.wrapping_add(instr.imm_se() << 2);
            self.branch_to(target);
        } else {
            // Not taken, but the next instruction is still a delay slot
            self.branch = true;
        }
    }

    /// BEQ: Branch on Equal
    ///
    /// Format: beq rs, rt, offset
    pub(crate) fn op_beq(&mut self, instr: Instruction) -> Result<()> {
        let cond = self.reg(instr.rs()) == self.reg(instr.rt());
        self.branch_if(instr, cond);
        Ok(())
    }

    /// BNE: Branch on Not Equal
    pub(crate) fn op_bne(&mut self, instr: Instruction) -> Result<()> {
        let cond = self.reg(instr.rs()) != self.reg(instr.rt());
        self.branch_if(instr, cond);
        Ok(())
    }

    /// BLEZ: Branch on Less Than or Equal to Zero (signed)
    pub(crate) fn op_blez(&mut self, instr: Instruction) -> Result<()> {
        let cond = (self.reg(instr.rs()) as i32) <= 0;
        self.branch_if(instr, cond);
        Ok(())
    }

    /// BGTZ: Branch on Greater Than Zero (signed)
    pub(crate) fn op_bgtz(&mut self, instr: Instruction) -> Result<()> {
        let cond = (self.reg(instr.rs()) as i32) > 0;
        self.branch_if(instr, cond);
        Ok(())
    }

    /// BcondZ: BLTZ, BGEZ, BLTZAL, BGEZAL (opcode 0x01)
    ///
    /// The rt field selects the variant:
    /// - bit 0: 0 = less than zero, 1 = greater or equal
    /// - bits 4..1 == 0b1000: link into r31
    ///
    /// The hardware decodes only these bits, so the other rt encodings
    /// alias BLTZ/BGEZ. The link happens whether or not the branch is
    /// taken.
    pub(crate) fn op_bcondz(&mut self, instr: Instruction) -> Result<()> {
        let rt = instr.rt();
        let is_bgez = rt & 1 != 0;
        let link = rt & 0x1E == 0x10;

        let negative = (self.reg(instr.rs()) as i32) < 0;
        let cond = negative != is_bgez;

        if link {
            let ra = self.next_pc;
            self.write_reg(31, ra);
        }

        self.branch_if(instr, cond);
        Ok(())
    }
}
