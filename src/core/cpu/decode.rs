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
//! Instruction word field accessors
//!
//! ```text
//! R: | op (6) | rs (5) | rt (5) | rd (5) | shamt (5) | funct (6) |
//! I: | op (6) | rs (5) | rt (5) |          imm (16)             |
//! J: | op (6) |                 target (26)                    |
//! ```

use std::fmt;

/// A raw 32-bit MIPS instruction
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Instruction(pub u32);

impl Instruction {
    /// Primary opcode, bits [31:26]
    #[inline(always)]
    pub fn opcode(self) -> u32 {
        self.0 >> 26
    }

    /// SPECIAL function, bits [5:0]
    #[inline(always)]
    pub fn funct(self) -> u32 {
        self.0 & 0x3F
    }

    #[inline(always)]
    pub fn rs(self) -> u8 {
        ((self.0 >> 21) & 0x1F) as u8
    }

    #[inline(always)]
    pub fn rt(self) -> u8 {
        ((self.0 >> 16) & 0x1F) as u8
    }

    #[inline(always)]
    pub fn rd(self) -> u8 {
        ((self.0 >> 11) & 0x1F) as u8
    }

    #[inline(always)]
    pub fn shamt(self) -> u32 {
        (self.0 >> 6) & 0x1F
    }

    /// Zero-extended immediate
    #[inline(always)]
    pub fn imm(self) -> u32 {
        self.0 & 0xFFFF
    }

    /// Sign-extended immediate
    #[inline(always)]
    pub fn imm_se(self) -> u32 {
        (self.0 & 0xFFFF) as i16 as u32
    }

    /// 26-bit jump target
    #[inline(always)]
    pub fn target(self) -> u32 {
        self.0 & 0x03FF_FFFF
    }

    /// Coprocessor sub-opcode, bits [25:21]
    #[inline(always)]
    pub fn cop_op(self) -> u32 {
        (self.0 >> 21) & 0x1F
    }

    /// Whether this is a COP2 command word (GTE operation)
    #[inline(always)]
    pub fn is_gte_command(self) -> bool {
        self.opcode() == 0x12 && self.0 & (1 << 25) != 0
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instruction(0x{:08X})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_r_type_fields() {
        // addu r3, r1, r2
        let i = Instruction(0x0022_1821);
        assert_eq!(i.opcode(), 0);
        assert_eq!(i.rs(), 1);
        assert_eq!(i.rt(), 2);
        assert_eq!(i.rd(), 3);
        assert_eq!(i.funct(), 0x21);
    }

    #[test]
    fn test_immediates() {
        // addiu r1, r0, -1
        let i = Instruction(0x2401_FFFF);
        assert_eq!(i.imm(), 0xFFFF);
        assert_eq!(i.imm_se(), 0xFFFF_FFFF);
    }

    #[test]
    fn test_gte_command_detection() {
        assert!(Instruction(0x4A18_0001).is_gte_command()); // RTPS
        assert!(!Instruction(0x4801_0800).is_gte_command()); // MTC2
        assert!(!Instruction(0x4200_0010).is_gte_command()); // RFE
    }

    #[test]
    fn test_jump_target() {
        let i = Instruction(0x0BF0_0010);
        assert_eq!(i.opcode(), 0x02);
        assert_eq!(i.target(), 0x03F0_0010);
    }
}
