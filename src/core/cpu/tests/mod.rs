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
//! CPU test modules
//!
//! - `basic`: initialization, reset, register access
//! - `alu`: arithmetic, logical, shift, multiply/divide
//! - `load_delay`: load delay slot behavior
//! - `branch_delay`: branch delay slot behavior
//! - `memory`: loads, stores, unaligned and isolated accesses
//! - `exceptions`: syscall, break, faults, interrupts
//! - `cop0`: MFC0, MTC0, RFE
//! - `cop2`: GTE register moves and command issue

mod alu;
mod memory;

use super::CPU;
use crate::core::memory::Bus;

/// Where test programs are placed (KSEG0 RAM)
pub(super) const PROGRAM_BASE: u32 = 0x8000_1000;

/// Write `program` at [`PROGRAM_BASE`] and point the CPU at it
pub(super) fn setup(program: &[u32]) -> (CPU, Bus) {
    let mut cpu = CPU::new();
    let mut bus = Bus::new();
    for (i, word) in program.iter().enumerate() {
        bus.write32(PROGRAM_BASE + 4 * i as u32, *word).unwrap();
    }
    cpu.set_pc(PROGRAM_BASE);
    (cpu, bus)
}

/// Step `n` instructions, returning the total cycles charged
pub(super) fn run(cpu: &mut CPU, bus: &mut Bus, n: usize) -> u32 {
    (0..n).map(|_| cpu.step(bus)).sum()
}

/// Minimal assembler for test programs
pub(super) mod asm {
    fn i_type(op: u32, rs: u8, rt: u8, imm: u16) -> u32 {
        (op << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | imm as u32
    }

    fn r_type(funct: u32, rs: u8, rt: u8, rd: u8, shamt: u32) -> u32 {
        ((rs as u32) << 21) | ((rt as u32) << 16) | ((rd as u32) << 11) | (shamt << 6) | funct
    }

    pub const NOP: u32 = 0;

    pub fn addiu(rt: u8, rs: u8, imm: i16) -> u32 {
        i_type(0x09, rs, rt, imm as u16)
    }
    pub fn addi(rt: u8, rs: u8, imm: i16) -> u32 {
        i_type(0x08, rs, rt, imm as u16)
    }
    pub fn ori(rt: u8, rs: u8, imm: u16) -> u32 {
        i_type(0x0D, rs, rt, imm)
    }
    pub fn lui(rt: u8, imm: u16) -> u32 {
        i_type(0x0F, 0, rt, imm)
    }
    pub fn lw(rt: u8, offset: i16, base: u8) -> u32 {
        i_type(0x23, base, rt, offset as u16)
    }
    pub fn lh(rt: u8, offset: i16, base: u8) -> u32 {
        i_type(0x21, base, rt, offset as u16)
    }
    pub fn lb(rt: u8, offset: i16, base: u8) -> u32 {
        i_type(0x20, base, rt, offset as u16)
    }
    pub fn lbu(rt: u8, offset: i16, base: u8) -> u32 {
        i_type(0x24, base, rt, offset as u16)
    }
    pub fn lwl(rt: u8, offset: i16, base: u8) -> u32 {
        i_type(0x22, base, rt, offset as u16)
    }
    pub fn lwr(rt: u8, offset: i16, base: u8) -> u32 {
        i_type(0x26, base, rt, offset as u16)
    }
    pub fn sw(rt: u8, offset: i16, base: u8) -> u32 {
        i_type(0x2B, base, rt, offset as u16)
    }
    pub fn sh(rt: u8, offset: i16, base: u8) -> u32 {
        i_type(0x29, base, rt, offset as u16)
    }
    pub fn sb(rt: u8, offset: i16, base: u8) -> u32 {
        i_type(0x28, base, rt, offset as u16)
    }
    pub fn swl(rt: u8, offset: i16, base: u8) -> u32 {
        i_type(0x2A, base, rt, offset as u16)
    }
    pub fn swr(rt: u8, offset: i16, base: u8) -> u32 {
        i_type(0x2E, base, rt, offset as u16)
    }
    pub fn beq(rs: u8, rt: u8, offset: i16) -> u32 {
        i_type(0x04, rs, rt, offset as u16)
    }
    pub fn bne(rs: u8, rt: u8, offset: i16) -> u32 {
        i_type(0x05, rs, rt, offset as u16)
    }
    pub fn bltzal(rs: u8, offset: i16) -> u32 {
        i_type(0x01, rs, 0x10, offset as u16)
    }
    pub fn bgezal(rs: u8, offset: i16) -> u32 {
        i_type(0x01, rs, 0x11, offset as u16)
    }
    pub fn j(target: u32) -> u32 {
        (0x02 << 26) | ((target >> 2) & 0x03FF_FFFF)
    }
    pub fn jal(target: u32) -> u32 {
        (0x03 << 26) | ((target >> 2) & 0x03FF_FFFF)
    }
    pub fn jr(rs: u8) -> u32 {
        r_type(0x08, rs, 0, 0, 0)
    }
    pub fn jalr(rd: u8, rs: u8) -> u32 {
        r_type(0x09, rs, 0, rd, 0)
    }
    pub fn addu(rd: u8, rs: u8, rt: u8) -> u32 {
        r_type(0x21, rs, rt, rd, 0)
    }
    pub fn add(rd: u8, rs: u8, rt: u8) -> u32 {
        r_type(0x20, rs, rt, rd, 0)
    }
    pub fn sub(rd: u8, rs: u8, rt: u8) -> u32 {
        r_type(0x22, rs, rt, rd, 0)
    }
    pub fn slt(rd: u8, rs: u8, rt: u8) -> u32 {
        r_type(0x2A, rs, rt, rd, 0)
    }
    pub fn sltu(rd: u8, rs: u8, rt: u8) -> u32 {
        r_type(0x2B, rs, rt, rd, 0)
    }
    pub fn nor(rd: u8, rs: u8, rt: u8) -> u32 {
        r_type(0x27, rs, rt, rd, 0)
    }
    pub fn sll(rd: u8, rt: u8, shamt: u32) -> u32 {
        r_type(0x00, 0, rt, rd, shamt)
    }
    pub fn sra(rd: u8, rt: u8, shamt: u32) -> u32 {
        r_type(0x03, 0, rt, rd, shamt)
    }
    pub fn srlv(rd: u8, rt: u8, rs: u8) -> u32 {
        r_type(0x06, rs, rt, rd, 0)
    }
    pub fn mult(rs: u8, rt: u8) -> u32 {
        r_type(0x18, rs, rt, 0, 0)
    }
    pub fn multu(rs: u8, rt: u8) -> u32 {
        r_type(0x19, rs, rt, 0, 0)
    }
    pub fn div(rs: u8, rt: u8) -> u32 {
        r_type(0x1A, rs, rt, 0, 0)
    }
    pub fn divu(rs: u8, rt: u8) -> u32 {
        r_type(0x1B, rs, rt, 0, 0)
    }
    pub fn mfhi(rd: u8) -> u32 {
        r_type(0x10, 0, 0, rd, 0)
    }
    pub fn mflo(rd: u8) -> u32 {
        r_type(0x12, 0, 0, rd, 0)
    }
    pub fn syscall() -> u32 {
        0x0000_000C
    }
    pub fn brk() -> u32 {
        0x0000_000D
    }
    pub fn mfc0(rt: u8, rd: u8) -> u32 {
        (0x10 << 26) | ((rt as u32) << 16) | ((rd as u32) << 11)
    }
    pub fn mtc0(rt: u8, rd: u8) -> u32 {
        (0x10 << 26) | (0x04 << 21) | ((rt as u32) << 16) | ((rd as u32) << 11)
    }
    pub fn rfe() -> u32 {
        0x4200_0010
    }
    pub fn mfc2(rt: u8, rd: u8) -> u32 {
        (0x12 << 26) | ((rt as u32) << 16) | ((rd as u32) << 11)
    }
    pub fn cfc2(rt: u8, rd: u8) -> u32 {
        (0x12 << 26) | (0x02 << 21) | ((rt as u32) << 16) | ((rd as u32) << 11)
    }
    pub fn mtc2(rt: u8, rd: u8) -> u32 {
        (0x12 << 26) | (0x04 << 21) | ((rt as u32) << 16) | ((rd as u32) << 11)
    }
    pub fn ctc2(rt: u8, rd: u8) -> u32 {
        (0x12 << 26) | (0x06 << 21) | ((rt as u32) << 16) | ((rd as u32) << 11)
    }
    pub fn lwc2(rt: u8, offset: i16, base: u8) -> u32 {
        i_type(0x32, base, rt, offset as u16)
    }
    pub fn swc2(rt: u8, offset: i16, base: u8) -> u32 {
        i_type(0x3A, base, rt, offset as u16)
    }
    /// GTE command word (`cop2 imm25`)
    pub fn cop2(command: u32) -> u32 {
        (0x12 << 26) | (1 << 25) | (command & 0x01FF_FFFF)
    }
}
