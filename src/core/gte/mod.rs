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

//! Geometry Transformation Engine (COP2)
//!
//! Fixed-point vector/matrix coprocessor used for perspective transforms,
//! lighting and depth cueing. The GTE has no clock of its own: a command
//! runs to completion when the CPU issues it and its cost is charged to the
//! issuing instruction.
//!
//! ## Register File
//!
//! ```text
//! Data (cop2r0-31)                  Control (cop2r32-63)
//! 0  VXY0   1  VZ0                  0-4   RT (rotation matrix)
//! 2  VXY1   3  VZ1                  5-7   TRX, TRY, TRZ
//! 4  VXY2   5  VZ2                  8-12  LLM (light matrix)
//! 6  RGBC   7  OTZ                  13-15 RBK, GBK, BBK
//! 8  IR0    9-11 IR1-IR3            16-20 LCM (light color matrix)
//! 12-14 SXY0-SXY2  15 SXYP          21-23 RFC, GFC, BFC
//! 16-19 SZ0-SZ3                     24-25 OFX, OFY
//! 20-22 RGB0-RGB2  23 RES1          26 H  27 DQA  28 DQB
//! 24-27 MAC0-MAC3                   29 ZSF3  30 ZSF4
//! 28 IRGB 29 ORGB 30 LZCS 31 LZCR   31 FLAG
//! ```
//!
//! ## FLAG
//!
//! Every saturation or overflow sets its FLAG bit. FLAG is cumulative: the
//! bits stay set across commands until the CPU reads FLAG through CFC2 or
//! overwrites it through CTC2.
//!
//! ## References
//!
//! - [PSX-SPX: Geometry Transformation Engine](http://problemkaputt.de/psx-spx.htm#geometrytransformationenginegte)

use serde::{Deserialize, Serialize};

mod commands;
pub use commands::command_cycles;
mod divide;
#[cfg(test)]
mod tests;

/// 3x3 fixed-point matrix (1.3.12)
pub type Matrix = [[i16; 3]; 3];

/// FLAG register bits
pub mod flag {
    pub const MAC1_POS: u32 = 1 << 30;
    pub const MAC2_POS: u32 = 1 << 29;
    pub const MAC3_POS: u32 = 1 << 28;
    pub const MAC1_NEG: u32 = 1 << 27;
    pub const MAC2_NEG: u32 = 1 << 26;
    pub const MAC3_NEG: u32 = 1 << 25;
    pub const IR1_SAT: u32 = 1 << 24;
    pub const IR2_SAT: u32 = 1 << 23;
    pub const IR3_SAT: u32 = 1 << 22;
    pub const COLOR_R_SAT: u32 = 1 << 21;
    pub const COLOR_G_SAT: u32 = 1 << 20;
    pub const COLOR_B_SAT: u32 = 1 << 19;
    pub const SZ3_OTZ_SAT: u32 = 1 << 18;
    pub const DIVIDE_OVERFLOW: u32 = 1 << 17;
    pub const MAC0_POS: u32 = 1 << 16;
    pub const MAC0_NEG: u32 = 1 << 15;
    pub const SX2_SAT: u32 = 1 << 14;
    pub const SY2_SAT: u32 = 1 << 13;
    pub const IR0_SAT: u32 = 1 << 12;

    /// Bits reflected in the bit 31 error summary
    pub const ERROR_MASK: u32 = 0x7F87_E000;
    /// Writable bits
    pub const WRITE_MASK: u32 = 0x7FFF_F000;
    /// Error summary
    pub const ERROR: u32 = 1 << 31;
}

/// GTE state
///
/// # Example
///
/// ```
/// use psrx_core::core::gte::GTE;
///
/// let mut gte = GTE::new();
/// gte.write_data(GTE::IR1, 0x1234);
/// assert_eq!(gte.read_data(GTE::IR1), 0x1234);
///
/// // SQR: IR1 = IR1 * IR1 >> 12
/// gte.write_data(GTE::IR1, 0x2000);
/// gte.execute(0x0008_0028);
/// assert_eq!(gte.read_data(GTE::IR1), 0x4000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GTE {
    // Control registers
    /// Rotation matrix
    rotation: Matrix,
    /// Translation vector (TRX, TRY, TRZ)
    translation: [i32; 3],
    /// Light source matrix
    light: Matrix,
    /// Background color (RBK, GBK, BBK)
    bg_color: [i32; 3],
    /// Light color matrix
    light_color: Matrix,
    /// Far color (RFC, GFC, BFC)
    far_color: [i32; 3],
    /// Screen offset X (16.16)
    ofx: i32,
    /// Screen offset Y (16.16)
    ofy: i32,
    /// Projection plane distance
    h: u16,
    /// Depth cueing coefficient
    dqa: i16,
    /// Depth cueing offset
    dqb: i32,
    /// Average Z scale for 3 values
    zsf3: i16,
    /// Average Z scale for 4 values
    zsf4: i16,

    /// FLAG register (bits 12-30; bit 31 is derived on read)
    pub flags: u32,

    // Data registers
    /// Input vectors V0-V2
    v: [[i16; 3]; 3],
    /// Color/code register (R, G, B, CODE)
    rgbc: [u8; 4],
    /// Average Z output
    otz: u16,
    /// Intermediate results IR0-IR3
    ir: [i16; 4],
    /// Screen XY FIFO
    sxy: [[i16; 2]; 3],
    /// Screen Z FIFO
    sz: [u16; 4],
    /// Color FIFO (R, G, B, CODE)
    rgb_fifo: [[u8; 4]; 3],
    /// Prohibited register, stored as written
    res1: u32,
    /// Accumulators MAC0-MAC3
    mac: [i32; 4],
    /// Leading zero count source
    lzcs: u32,
    /// Leading zero count result
    lzcr: u32,
}

impl GTE {
    // Data register indices
    pub const VXY0: usize = 0;
    pub const VZ0: usize = 1;
    pub const VXY1: usize = 2;
    pub const VZ1: usize = 3;
    pub const VXY2: usize = 4;
    pub const VZ2: usize = 5;
    pub const RGBC: usize = 6;
    pub const OTZ: usize = 7;
    pub const IR0: usize = 8;
    pub const IR1: usize = 9;
    pub const IR2: usize = 10;
    pub const IR3: usize = 11;
    pub const SXY0: usize = 12;
    pub const SXY1: usize = 13;
    pub const SXY2: usize = 14;
    pub const SXYP: usize = 15;
    pub const SZ0: usize = 16;
    pub const SZ1: usize = 17;
    pub const SZ2: usize = 18;
    pub const SZ3: usize = 19;
    pub const RGB0: usize = 20;
    pub const RGB1: usize = 21;
    pub const RGB2: usize = 22;
    pub const RES1: usize = 23;
    pub const MAC0: usize = 24;
    pub const MAC1: usize = 25;
    pub const MAC2: usize = 26;
    pub const MAC3: usize = 27;
    pub const IRGB: usize = 28;
    pub const ORGB: usize = 29;
    pub const LZCS: usize = 30;
    pub const LZCR: usize = 31;

    // Control register indices
    pub const RT11_RT12: usize = 0;
    pub const RT13_RT21: usize = 1;
    pub const RT22_RT23: usize = 2;
    pub const RT31_RT32: usize = 3;
    pub const RT33: usize = 4;
    pub const TRX: usize = 5;
    pub const TRY: usize = 6;
    pub const TRZ: usize = 7;
    pub const L11_L12: usize = 8;
    pub const L13_L21: usize = 9;
    pub const L22_L23: usize = 10;
    pub const L31_L32: usize = 11;
    pub const L33: usize = 12;
    pub const RBK: usize = 13;
    pub const GBK: usize = 14;
    pub const BBK: usize = 15;
    pub const LR1_LR2: usize = 16;
    pub const LR3_LG1: usize = 17;
    pub const LG2_LG3: usize = 18;
    pub const LB1_LB2: usize = 19;
    pub const LB3: usize = 20;
    pub const RFC: usize = 21;
    pub const GFC: usize = 22;
    pub const BFC: usize = 23;
    pub const OFX: usize = 24;
    pub const OFY: usize = 25;
    pub const H: usize = 26;
    pub const DQA: usize = 27;
    pub const DQB: usize = 28;
    pub const ZSF3: usize = 29;
    pub const ZSF4: usize = 30;
    pub const FLAG: usize = 31;

    /// Create a GTE with every register cleared
    pub fn new() -> Self {
        Self {
            rotation: [[0; 3]; 3],
            translation: [0; 3],
            light: [[0; 3]; 3],
            bg_color: [0; 3],
            light_color: [[0; 3]; 3],
            far_color: [0; 3],
            ofx: 0,
            ofy: 0,
            h: 0,
            dqa: 0,
            dqb: 0,
            zsf3: 0,
            zsf4: 0,
            flags: 0,
            v: [[0; 3]; 3],
            rgbc: [0; 4],
            otz: 0,
            ir: [0; 4],
            sxy: [[0; 2]; 3],
            sz: [0; 4],
            rgb_fifo: [[0; 4]; 3],
            res1: 0,
            mac: [0; 4],
            lzcs: 0,
            // LZCS = 0 has 32 leading zeroes
            lzcr: 32,
        }
    }

    /// Reset every register
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Read a data register (cop2r0-31)
    pub fn read_data(&self, index: usize) -> i32 {
        let index = index & 0x1F;
        match index {
            0..=5 => {
                let v = &self.v[index / 2];
                if index % 2 == 0 {
                    pack_i16(v[0], v[1])
                } else {
                    v[2] as i32
                }
            }
            Self::RGBC => u32::from_le_bytes(self.rgbc) as i32,
            Self::OTZ => self.otz as i32,
            8..=11 => self.ir[index - 8] as i32,
            12..=14 => {
                let sxy = self.sxy[index - 12];
                pack_i16(sxy[0], sxy[1])
            }
            Self::SXYP => pack_i16(self.sxy[2][0], self.sxy[2][1]),
            16..=19 => self.sz[index - 16] as i32,
            20..=22 => u32::from_le_bytes(self.rgb_fifo[index - 20]) as i32,
            Self::RES1 => self.res1 as i32,
            24..=27 => self.mac[index - 24],
            Self::IRGB | Self::ORGB => {
                let r = Self::ir_to_rgb15(self.ir[1]);
                let g = Self::ir_to_rgb15(self.ir[2]);
                let b = Self::ir_to_rgb15(self.ir[3]);
                (r | (g << 5) | (b << 10)) as i32
            }
            Self::LZCS => self.lzcs as i32,
            _ => self.lzcr as i32,
        }
    }

    /// Write a data register (cop2r0-31)
    pub fn write_data(&mut self, index: usize, value: i32) {
        let word = value as u32;
        let index = index & 0x1F;
        match index {
            0..=5 => {
                let v = &mut self.v[index / 2];
                if index % 2 == 0 {
                    v[0] = word as i16;
                    v[1] = (word >> 16) as i16;
                } else {
                    v[2] = word as i16;
                }
            }
            Self::RGBC => self.rgbc = word.to_le_bytes(),
            Self::OTZ => self.otz = word as u16,
            8..=11 => self.ir[index - 8] = word as i16,
            12..=14 => self.sxy[index - 12] = [word as i16, (word >> 16) as i16],
            Self::SXYP => {
                self.sxy[0] = self.sxy[1];
                self.sxy[1] = self.sxy[2];
                self.sxy[2] = [word as i16, (word >> 16) as i16];
            }
            16..=19 => self.sz[index - 16] = word as u16,
            20..=22 => self.rgb_fifo[index - 20] = word.to_le_bytes(),
            Self::RES1 => self.res1 = word,
            24..=27 => self.mac[index - 24] = value,
            Self::IRGB => {
                self.ir[1] = ((word & 0x1F) << 7) as i16;
                self.ir[2] = (((word >> 5) & 0x1F) << 7) as i16;
                self.ir[3] = (((word >> 10) & 0x1F) << 7) as i16;
            }
            Self::ORGB => {}
            Self::LZCS => {
                self.lzcs = word;
                self.lzcr = if value < 0 {
                    word.leading_ones()
                } else {
                    word.leading_zeros()
                };
            }
            _ => {}
        }
    }

    /// Read a control register (cop2r32-63)
    pub fn read_control(&self, index: usize) -> i32 {
        let index = index & 0x1F;
        match index {
            0..=4 => read_matrix(&self.rotation, index),
            5..=7 => self.translation[index - 5],
            8..=12 => read_matrix(&self.light, index - 8),
            13..=15 => self.bg_color[index - 13],
            16..=20 => read_matrix(&self.light_color, index - 16),
            21..=23 => self.far_color[index - 21],
            Self::OFX => self.ofx,
            Self::OFY => self.ofy,
            // H reads back sign-extended
            Self::H => self.h as i16 as i32,
            Self::DQA => self.dqa as i32,
            Self::DQB => self.dqb,
            Self::ZSF3 => self.zsf3 as i32,
            Self::ZSF4 => self.zsf4 as i32,
            _ => self.flag_register() as i32,
        }
    }

    /// Write a control register (cop2r32-63)
    pub fn write_control(&mut self, index: usize, value: i32) {
        let index = index & 0x1F;
        match index {
            0..=4 => write_matrix(&mut self.rotation, index, value),
            5..=7 => self.translation[index - 5] = value,
            8..=12 => write_matrix(&mut self.light, index - 8, value),
            13..=15 => self.bg_color[index - 13] = value,
            16..=20 => write_matrix(&mut self.light_color, index - 16, value),
            21..=23 => self.far_color[index - 21] = value,
            Self::OFX => self.ofx = value,
            Self::OFY => self.ofy = value,
            Self::H => self.h = value as u16,
            Self::DQA => self.dqa = value as i16,
            Self::DQB => self.dqb = value,
            Self::ZSF3 => self.zsf3 = value as i16,
            Self::ZSF4 => self.zsf4 = value as i16,
            _ => self.flags = (value as u32) & flag::WRITE_MASK,
        }
    }

    /// Read a control register on behalf of CFC2
    ///
    /// Reading FLAG this way acknowledges it.
    pub fn read_control_acknowledge(&mut self, index: usize) -> i32 {
        let value = self.read_control(index);
        if index & 0x1F == Self::FLAG {
            self.flags = 0;
        }
        value
    }

    /// FLAG with the error summary bit computed
    pub fn flag_register(&self) -> u32 {
        let mut value = self.flags & flag::WRITE_MASK;
        if value & flag::ERROR_MASK != 0 {
            value |= flag::ERROR;
        }
        value
    }

    fn ir_to_rgb15(ir: i16) -> u32 {
        (ir >> 7).clamp(0, 0x1F) as u32
    }
}

impl Default for GTE {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn pack_i16(lo: i16, hi: i16) -> i32 {
    ((lo as u16 as u32) | ((hi as u16 as u32) << 16)) as i32
}

fn read_matrix(m: &Matrix, index: usize) -> i32 {
    // Row-major pairs; the fifth register holds the last element alone
    let flat = index * 2;
    if index == 4 {
        m[2][2] as i32
    } else {
        pack_i16(m[flat / 3][flat % 3], m[(flat + 1) / 3][(flat + 1) % 3])
    }
}

fn write_matrix(m: &mut Matrix, index: usize, value: i32) {
    let word = value as u32;
    if index == 4 {
        m[2][2] = word as i16;
    } else {
        let flat = index * 2;
        m[flat / 3][flat % 3] = word as i16;
        m[(flat + 1) / 3][(flat + 1) % 3] = (word >> 16) as i16;
    }
}
