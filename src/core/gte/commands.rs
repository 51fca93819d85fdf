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

//! GTE command execution
//!
//! Command word layout:
//!
//! ```text
//! 24-20  Ignored (fake opcode bits)
//! 19     sf  - shift results right by 12
//! 18-17  MVMVA multiply matrix (0=RT, 1=LLM, 2=LCM, 3=garbage)
//! 16-15  MVMVA multiply vector (0=V0, 1=V1, 2=V2, 3=IR)
//! 14-13  MVMVA translation vector (0=TR, 1=BK, 2=FC, 3=none)
//! 10     lm  - saturate IR1-IR3 to 0..7FFF instead of -8000..7FFF
//! 5-0    real opcode
//! ```

use super::divide::divide;
use super::{flag, Matrix, GTE};

/// Decoded command fields
#[derive(Debug, Clone, Copy)]
struct Command {
    opcode: u32,
    /// Right shift applied to MAC results (0 or 12)
    shift: u32,
    lm: bool,
    mx: u32,
    vx: u32,
    tx: u32,
}

impl Command {
    fn decode(command: u32) -> Self {
        Self {
            opcode: command & 0x3F,
            shift: if command & (1 << 19) != 0 { 12 } else { 0 },
            lm: command & (1 << 10) != 0,
            mx: (command >> 17) & 0x3,
            vx: (command >> 15) & 0x3,
            tx: (command >> 13) & 0x3,
        }
    }
}

/// Cycle cost of each GTE opcode
///
/// Unknown opcodes still occupy the coprocessor briefly.
pub fn command_cycles(opcode: u32) -> u32 {
    match opcode & 0x3F {
        0x01 => 15, // RTPS
        0x06 => 8,  // NCLIP
        0x0C => 6,  // OP
        0x10 => 8,  // DPCS
        0x11 => 8,  // INTPL
        0x12 => 8,  // MVMVA
        0x13 => 19, // NCDS
        0x14 => 13, // CDP
        0x16 => 44, // NCDT
        0x1B => 17, // NCCS
        0x1C => 11, // CC
        0x1E => 14, // NCS
        0x20 => 30, // NCT
        0x28 => 5,  // SQR
        0x29 => 8,  // DCPL
        0x2A => 17, // DPCT
        0x2D => 5,  // AVSZ3
        0x2E => 6,  // AVSZ4
        0x30 => 23, // RTPT
        0x3D => 5,  // GPF
        0x3E => 5,  // GPL
        0x3F => 39, // NCCT
        _ => 2,
    }
}

impl GTE {
    /// Execute a GTE command
    ///
    /// # Arguments
    ///
    /// * `command` - The 25-bit command field of a COP2 instruction
    ///
    /// # Returns
    ///
    /// Number of CPU cycles the command takes
    pub fn execute(&mut self, command: u32) -> u32 {
        let cmd = Command::decode(command);

        log::trace!("GTE command 0x{:02X} (raw 0x{:07X})", cmd.opcode, command);

        match cmd.opcode {
            0x01 => self.rtp(0, cmd, true),
            0x06 => self.nclip(),
            0x0C => self.op(cmd),
            0x10 => self.dpcs(cmd, false),
            0x11 => self.intpl(cmd),
            0x12 => self.mvmva(cmd),
            0x13 => self.ncd(0, cmd),
            0x14 => self.cdp(cmd),
            0x16 => (0..3).for_each(|i| self.ncd(i, cmd)),
            0x1B => self.ncc(0, cmd),
            0x1C => self.cc(cmd),
            0x1E => self.nc(0, cmd),
            0x20 => (0..3).for_each(|i| self.nc(i, cmd)),
            0x28 => self.sqr(cmd),
            0x29 => self.dcpl(cmd),
            0x2A => (0..3).for_each(|_| self.dpcs(cmd, true)),
            0x2D => self.avsz3(),
            0x2E => self.avsz4(),
            0x30 => {
                self.rtp(0, cmd, false);
                self.rtp(1, cmd, false);
                self.rtp(2, cmd, true);
            }
            0x3D => self.gpf(cmd),
            0x3E => self.gpl(cmd),
            0x3F => (0..3).for_each(|i| self.ncc(i, cmd)),
            _ => log::warn!("Unknown GTE command 0x{:02X}", cmd.opcode),
        }

        command_cycles(cmd.opcode)
    }

    /// RTPS: perspective transformation of V0
    pub fn rtps(&mut self, sf: bool) {
        let cmd = Command::decode(0x01 | if sf { 1 << 19 } else { 0 });
        self.rtp(0, cmd, true);
    }

    /// NCLIP: normal clipping
    ///
    /// MAC0 = SX0*SY1 + SX1*SY2 + SX2*SY0 - SX0*SY2 - SX1*SY0 - SX2*SY1
    pub fn nclip(&mut self) {
        let [s0, s1, s2] = self.sxy.map(|p| [p[0] as i64, p[1] as i64]);
        let value = s0[0] * s1[1] + s1[0] * s2[1] + s2[0] * s0[1]
            - s0[0] * s2[1]
            - s1[0] * s0[1]
            - s2[0] * s1[1];
        self.set_mac0(value);
    }

    // ---- pipeline stages ----

    fn rtp(&mut self, index: usize, cmd: Command, last: bool) {
        let v = self.v[index];
        let tr = self.translation;
        let rt = self.rotation;

        let mut z_raw = 0i64;
        for row in 0..3 {
            let mut acc = (tr[row] as i64) << 12;
            for (col, &vc) in v.iter().enumerate() {
                acc = self.check_mac(row + 1, acc + rt[row][col] as i64 * vc as i64);
            }
            self.mac[row + 1] = (acc >> cmd.shift) as i32;
            if row == 2 {
                z_raw = acc;
            }
        }

        self.ir[1] = self.saturate_ir(1, self.mac[1], cmd.lm);
        self.ir[2] = self.saturate_ir(2, self.mac[2], cmd.lm);

        // IR3's flag is checked against MAC3 >> 12 regardless of sf
        let z_shifted = (z_raw >> 12) as i32;
        let lo = if cmd.lm { 0 } else { -0x8000 };
        if !(-0x8000..=0x7FFF).contains(&z_shifted) {
            self.flags |= flag::IR3_SAT;
        }
        self.ir[3] = self.mac[3].clamp(lo, 0x7FFF) as i16;

        self.push_sz(z_shifted);

        let (quotient, overflow) = divide(self.h, self.sz[3]);
        if overflow {
            self.flags |= flag::DIVIDE_OVERFLOW;
        }
        let q = quotient as i64;

        let sx = self.set_mac0(q * self.ir[1] as i64 + self.ofx as i64);
        let sy = self.set_mac0(q * self.ir[2] as i64 + self.ofy as i64);
        self.push_sxy(sx >> 16, sy >> 16);

        if last {
            let depth = self.set_mac0(q * self.dqa as i64 + self.dqb as i64);
            self.set_ir0(depth >> 12);
        }
    }

    fn op(&mut self, cmd: Command) {
        let d = [
            self.rotation[0][0] as i64,
            self.rotation[1][1] as i64,
            self.rotation[2][2] as i64,
        ];
        let ir = [self.ir[1] as i64, self.ir[2] as i64, self.ir[3] as i64];

        let result = [
            d[1] * ir[2] - d[2] * ir[1],
            d[2] * ir[0] - d[0] * ir[2],
            d[0] * ir[1] - d[1] * ir[0],
        ];
        self.store_mac_ir(result, cmd);
    }

    fn sqr(&mut self, cmd: Command) {
        let result = [1, 2, 3].map(|i| {
            let ir = self.ir[i] as i64;
            ir * ir
        });
        self.store_mac_ir(result, cmd);
    }

    fn mvmva(&mut self, cmd: Command) {
        let matrix = match cmd.mx {
            0 => self.rotation,
            1 => self.light,
            2 => self.light_color,
            _ => {
                // Reserved selector yields a mix of registers
                let r = (self.rgbc[0] as i16) << 4;
                let rt13 = self.rotation[0][2];
                let rt22 = self.rotation[1][1];
                [[-r, r, self.ir[0]], [rt13; 3], [rt22; 3]]
            }
        };
        let vector = match cmd.vx {
            0..=2 => self.v[cmd.vx as usize],
            _ => [self.ir[1], self.ir[2], self.ir[3]],
        };
        let translation = match cmd.tx {
            0 => self.translation,
            1 => self.bg_color,
            2 => self.far_color,
            _ => [0; 3],
        };

        if cmd.tx == 2 {
            // Far color translation is broken in hardware: the first column
            // only feeds the flags, the result uses columns 2 and 3
            for row in 0..3 {
                let first = self.check_mac(
                    row + 1,
                    ((translation[row] as i64) << 12) + matrix[row][0] as i64 * vector[0] as i64,
                );
                let first_ir = (first >> cmd.shift) as i32;
                self.saturate_ir(row + 1, first_ir, false);

                let mut acc = self.check_mac(row + 1, matrix[row][1] as i64 * vector[1] as i64);
                acc = self.check_mac(row + 1, acc + matrix[row][2] as i64 * vector[2] as i64);
                self.mac[row + 1] = (acc >> cmd.shift) as i32;
            }
            for i in 1..=3 {
                self.ir[i] = self.saturate_ir(i, self.mac[i], cmd.lm);
            }
            return;
        }

        self.multiply_matrix_vector(&matrix, vector, translation, cmd);
    }

    fn nc(&mut self, index: usize, cmd: Command) {
        self.light_stage(index, cmd);
        self.push_color_from_mac();
    }

    fn ncc(&mut self, index: usize, cmd: Command) {
        self.light_stage(index, cmd);
        let product = self.color_times_ir();
        self.store_mac_ir(product, cmd);
        self.push_color_from_mac();
    }

    fn ncd(&mut self, index: usize, cmd: Command) {
        self.light_stage(index, cmd);
        let product = self.color_times_ir();
        self.depth_cue(product, cmd);
        self.push_color_from_mac();
    }

    fn cc(&mut self, cmd: Command) {
        self.background_stage(cmd);
        let product = self.color_times_ir();
        self.store_mac_ir(product, cmd);
        self.push_color_from_mac();
    }

    fn cdp(&mut self, cmd: Command) {
        self.background_stage(cmd);
        let product = self.color_times_ir();
        self.depth_cue(product, cmd);
        self.push_color_from_mac();
    }

    fn dcpl(&mut self, cmd: Command) {
        let product = self.color_times_ir();
        self.depth_cue(product, cmd);
        self.push_color_from_mac();
    }

    /// DPCS/DPCT: depth cue a color (RGBC, or RGB0 from the FIFO)
    fn dpcs(&mut self, cmd: Command, from_fifo: bool) {
        let color = if from_fifo {
            self.rgb_fifo[0]
        } else {
            self.rgbc
        };
        let value = [0, 1, 2].map(|i| (color[i] as i64) << 16);
        self.depth_cue(value, cmd);
        self.push_color_from_mac();
    }

    fn intpl(&mut self, cmd: Command) {
        let value = [1, 2, 3].map(|i| (self.ir[i] as i64) << 12);
        self.depth_cue(value, cmd);
        self.push_color_from_mac();
    }

    fn gpf(&mut self, cmd: Command) {
        let ir0 = self.ir[0] as i64;
        let result = [1, 2, 3].map(|i| ir0 * self.ir[i] as i64);
        self.store_mac_ir(result, cmd);
        self.push_color_from_mac();
    }

    fn gpl(&mut self, cmd: Command) {
        let ir0 = self.ir[0] as i64;
        let mut result = [0i64; 3];
        for (i, slot) in result.iter_mut().enumerate() {
            let base = (self.mac[i + 1] as i64) << cmd.shift;
            *slot = self.check_mac(i + 1, base + ir0 * self.ir[i + 1] as i64);
        }
        self.store_mac_ir(result, cmd);
        self.push_color_from_mac();
    }

    fn avsz3(&mut self) {
        let sum = self.sz[1] as i64 + self.sz[2] as i64 + self.sz[3] as i64;
        let value = self.set_mac0(self.zsf3 as i64 * sum);
        self.otz = self.saturate_otz(value >> 12);
    }

    fn avsz4(&mut self) {
        let sum = self.sz.iter().map(|&z| z as i64).sum::<i64>();
        let value = self.set_mac0(self.zsf4 as i64 * sum);
        self.otz = self.saturate_otz(value >> 12);
    }

    // ---- shared stages ----

    /// [IR] = LLM * V; then [IR] = BK + LCM * IR
    fn light_stage(&mut self, index: usize, cmd: Command) {
        let light = self.light;
        self.multiply_matrix_vector(&light, self.v[index], [0; 3], cmd);
        self.background_stage(cmd);
    }

    /// [IR] = BK + LCM * IR
    fn background_stage(&mut self, cmd: Command) {
        let lcm = self.light_color;
        let ir = [self.ir[1], self.ir[2], self.ir[3]];
        self.multiply_matrix_vector(&lcm, ir, self.bg_color, cmd);
    }

    /// [R*IR1, G*IR2, B*IR3] << 4
    fn color_times_ir(&self) -> [i64; 3] {
        [0, 1, 2].map(|i| ((self.rgbc[i] as i64) * self.ir[i + 1] as i64) << 4)
    }

    /// Interpolate `value` (unshifted) towards the far color by IR0
    fn depth_cue(&mut self, value: [i64; 3], cmd: Command) {
        let ir0 = self.ir[0] as i64;
        let mut result = [0i64; 3];
        for i in 0..3 {
            let far = self.check_mac(i + 1, ((self.far_color[i] as i64) << 12) - value[i]);
            let delta = self.saturate_ir(i + 1, (far >> cmd.shift) as i32, false) as i64;
            result[i] = self.check_mac(i + 1, delta * ir0 + value[i]);
        }
        self.store_mac_ir(result, cmd);
    }

    fn multiply_matrix_vector(
        &mut self,
        matrix: &Matrix,
        vector: [i16; 3],
        translation: [i32; 3],
        cmd: Command,
    ) {
        let mut result = [0i64; 3];
        for (row, slot) in result.iter_mut().enumerate() {
            let mut acc = (translation[row] as i64) << 12;
            for (col, &vc) in vector.iter().enumerate() {
                acc = self.check_mac(row + 1, acc + matrix[row][col] as i64 * vc as i64);
            }
            *slot = acc;
        }
        self.store_mac_ir(result, cmd);
    }

    /// MAC1-3 = value >> sf, IR1-3 = saturate(MAC)
    fn store_mac_ir(&mut self, value: [i64; 3], cmd: Command) {
        for (i, &v) in value.iter().enumerate() {
            let checked = self.check_mac(i + 1, v);
            self.mac[i + 1] = (checked >> cmd.shift) as i32;
        }
        for i in 1..=3 {
            self.ir[i] = self.saturate_ir(i, self.mac[i], cmd.lm);
        }
    }

    // ---- saturation helpers ----

    /// Record 44-bit overflow of MAC1-3 and sign-extend to 44 bits
    fn check_mac(&mut self, index: usize, value: i64) -> i64 {
        const MAX: i64 = (1 << 43) - 1;
        const MIN: i64 = -(1 << 43);
        if value > MAX {
            self.flags |= flag::MAC1_POS >> (index - 1);
        } else if value < MIN {
            self.flags |= flag::MAC1_NEG >> (index - 1);
        }
        (value << 20) >> 20
    }

    /// Store MAC0, recording 32-bit overflow
    fn set_mac0(&mut self, value: i64) -> i32 {
        if value > i32::MAX as i64 {
            self.flags |= flag::MAC0_POS;
        } else if value < i32::MIN as i64 {
            self.flags |= flag::MAC0_NEG;
        }
        self.mac[0] = value as i32;
        self.mac[0]
    }

    fn saturate_ir(&mut self, index: usize, value: i32, lm: bool) -> i16 {
        let lo = if lm { 0 } else { -0x8000 };
        if value < lo || value > 0x7FFF {
            self.flags |= flag::IR1_SAT >> (index - 1);
        }
        value.clamp(lo, 0x7FFF) as i16
    }

    fn set_ir0(&mut self, value: i32) {
        if !(0..=0x1000).contains(&value) {
            self.flags |= flag::IR0_SAT;
        }
        self.ir[0] = value.clamp(0, 0x1000) as i16;
    }

    fn saturate_otz(&mut self, value: i32) -> u16 {
        if !(0..=0xFFFF).contains(&value) {
            self.flags |= flag::SZ3_OTZ_SAT;
        }
        value.clamp(0, 0xFFFF) as u16
    }

    fn push_sz(&mut self, value: i32) {
        let z = self.saturate_otz(value);
        self.sz = [self.sz[1], self.sz[2], self.sz[3], z];
    }

    fn push_sxy(&mut self, x: i32, y: i32) {
        if !(-0x400..=0x3FF).contains(&x) {
            self.flags |= flag::SX2_SAT;
        }
        if !(-0x400..=0x3FF).contains(&y) {
            self.flags |= flag::SY2_SAT;
        }
        self.sxy[0] = self.sxy[1];
        self.sxy[1] = self.sxy[2];
        self.sxy[2] = [x.clamp(-0x400, 0x3FF) as i16, y.clamp(-0x400, 0x3FF) as i16];
    }

    fn push_color_from_mac(&mut self) {
        let bits = [flag::COLOR_R_SAT, flag::COLOR_G_SAT, flag::COLOR_B_SAT];
        let mut color = [0u8; 4];
        for i in 0..3 {
            let c = self.mac[i + 1] >> 4;
            if !(0..=0xFF).contains(&c) {
                self.flags |= bits[i];
            }
            color[i] = c.clamp(0, 0xFF) as u8;
        }
        color[3] = self.rgbc[3];
        self.rgb_fifo = [self.rgb_fifo[1], self.rgb_fifo[2], color];
    }
}
