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
//! CPU instruction implementations
//!
//! Handlers are grouped by instruction class. Each one reads its operands
//! with [`CPU::reg`] and writes its result with `write_reg` (or
//! `delayed_load_chain` for loads), so the load delay slot falls out of the
//! register file split without any per-handler bookkeeping.

use super::decode::Instruction;
use super::{ExceptionCause, CPU};
use crate::core::error::Result;
use crate::core::memory::Bus;

mod arithmetic;
mod branch;
mod cop0;
mod cop2;
mod exception;
mod jump;
mod load;
mod logical;
mod multiply;
mod shift;
mod store;

impl CPU {
    /// Decode and execute one instruction
    pub(super) fn execute_instruction(&mut self, instr: Instruction, bus: &mut Bus) -> Result<()> {
        match instr.opcode() {
            0x00 => self.execute_special(instr),
            0x01 => self.op_bcondz(instr),
            0x02 => self.op_j(instr),
            0x03 => self.op_jal(instr),
            0x04 => self.op_beq(instr),
            0x05 => self.op_bne(instr),
            0x06 => self.op_blez(instr),
            0x07 => self.op_bgtz(instr),
            0x08 => self.op_addi(instr),
            0x09 => self.op_addiu(instr),
            0x0A => self.op_slti(instr),
            0x0B => self.op_sltiu(instr),
            0x0C => self.op_andi(instr),
            0x0D => self.op_ori(instr),
            0x0E => self.op_xori(instr),
            0x0F => self.op_lui(instr),
            0x10 => self.execute_cop0(instr),
            0x12 => self.execute_cop2(instr),
            0x11 | 0x13 => self.op_coprocessor_unusable(),
            0x20 => self.op_lb(instr, bus),
            0x21 => self.op_lh(instr, bus),
            0x22 => self.op_lwl(instr, bus),
            0x23 => self.op_lw(instr, bus),
            0x24 => self.op_lbu(instr, bus),
            0x25 => self.op_lhu(instr, bus),
            0x26 => self.op_lwr(instr, bus),
            0x28 => self.op_sb(instr, bus),
            0x29 => self.op_sh(instr, bus),
            0x2A => self.op_swl(instr, bus),
            0x2B => self.op_sw(instr, bus),
            0x2E => self.op_swr(instr, bus),
            0x32 => self.op_lwc2(instr, bus),
            0x3A => self.op_swc2(instr, bus),
            0x30 | 0x31 | 0x33 | 0x38 | 0x39 | 0x3B => self.op_coprocessor_unusable(),
            _ => self.op_illegal(instr),
        }
    }

    /// SPECIAL instructions (opcode 0x00), selected by the funct field
    fn execute_special(&mut self, instr: Instruction) -> Result<()> {
        match instr.funct() {
            0x00 => self.op_sll(instr),
            0x02 => self.op_srl(instr),
            0x03 => self.op_sra(instr),
            0x04 => self.op_sllv(instr),
            0x06 => self.op_srlv(instr),
            0x07 => self.op_srav(instr),
            0x08 => self.op_jr(instr),
            0x09 => self.op_jalr(instr),
            0x0C => self.op_syscall(),
            0x0D => self.op_break(),
            0x10 => self.op_mfhi(instr),
            0x11 => self.op_mthi(instr),
            0x12 => self.op_mflo(instr),
            0x13 => self.op_mtlo(instr),
            0x18 => self.op_mult(instr),
            0x19 => self.op_multu(instr),
            0x1A => self.op_div(instr),
            0x1B => self.op_divu(instr),
            0x20 => self.op_add(instr),
            0x21 => self.op_addu(instr),
            0x22 => self.op_sub(instr),
            0x23 => self.op_subu(instr),
            0x24 => self.op_and(instr),
            0x25 => self.op_or(instr),
            0x26 => self.op_xor(instr),
            0x27 => self.op_nor(instr),
            0x2A => self.op_slt(instr),
            0x2B => self.op_sltu(instr),
            _ => self.op_illegal(instr),
        }
    }

    /// COP0 instructions (opcode 0x10)
    fn execute_cop0(&mut self, instr: Instruction) -> Result<()> {
        match instr.cop_op() {
            0x00 => self.op_mfc0(instr),
            0x04 => self.op_mtc0(instr),
            0x10 if instr.funct() == 0x10 => self.op_rfe(),
            _ => self.op_illegal(instr),
        }
    }

    /// COP2 instructions (opcode 0x12)
    fn execute_cop2(&mut self, instr: Instruction) -> Result<()> {
        if !self.cop0.cop2_enabled() {
            return self.op_coprocessor_unusable();
        }

        if instr.is_gte_command() {
            return self.op_gte_command(instr);
        }

        match instr.cop_op() {
            0x00 => self.op_mfc2(instr),
            0x02 => self.op_cfc2(instr),
            0x04 => self.op_mtc2(instr),
            0x06 => self.op_ctc2(instr),
            _ => self.op_illegal(instr),
        }
    }

    /// Undefined opcode: reserved instruction exception
    fn op_illegal(&mut self, instr: Instruction) -> Result<()> {
        log::warn!(
            "Reserved instruction 0x{:08X} at PC=0x{:08X}",
            instr.0,
            self.current_pc
        );
        self.exception(ExceptionCause::ReservedInstruction);
        Ok(())
    }

    /// COP1, COP3 and disabled COP2: coprocessor unusable exception
    fn op_coprocessor_unusable(&mut self) -> Result<()> {
        self.exception(ExceptionCause::CoprocessorUnusable);
        Ok(())
    }
}
