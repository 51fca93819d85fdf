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
//! GP0 VRAM transfer commands
//!
//! Implements CPU↔VRAM and VRAM↔VRAM transfers and the VRAM fill.

use super::super::types::{Color, VramTransfer};
use super::super::GPU;

impl GPU {
    /// GP0(0x02): Fill Rectangle in VRAM
    ///
    /// - Word 0: Command + color
    /// - Word 1: Top-left (X rounded down to 16 pixels)
    /// - Word 2: Size (width rounded up to 16 pixels)
    ///
    /// The fill ignores the drawing area, the drawing offset and the mask
    /// settings, and wraps around VRAM.
    pub(super) fn gp0_fill_rectangle(&mut self, words: &[u32]) {
        let color = Color::from_u32(words[0]).to_rgb15();
        let x = (words[1] & 0x3F0) as u16;
        let y = ((words[1] >> 16) & 0x1FF) as u16;
        let width = (((words[2] & 0x3FF) + 0xF) & !0xF) as u16;
        let height = ((words[2] >> 16) & 0x1FF) as u16;

        log::trace!(
            "Fill ({}, {}) size {}×{} color 0x{:04X}",
            x,
            y,
            width,
            height,
            color
        );

        for dy in 0..height {
            for dx in 0..width {
                self.write_vram(x.wrapping_add(dx), y.wrapping_add(dy), color);
            }
        }
    }

    /// GP0(0xA0): CPU→VRAM Transfer
    ///
    /// - Word 1: Destination coordinates (X in bits 0-15, Y in bits 16-31)
    /// - Word 2: Size (Width in bits 0-15, Height in bits 16-31)
    ///
    /// After this command, subsequent GP0 writes are treated as pixel data
    /// (two pixels per word) until the rectangle is full.
    pub(super) fn gp0_cpu_to_vram_transfer(&mut self, words: &[u32]) {
        let transfer = VramTransfer::from_words(words[1], words[2]);
        log::debug!(
            "CPU→VRAM transfer: ({}, {}) size {}×{}",
            transfer.x,
            transfer.y,
            transfer.width,
            transfer.height
        );
        self.begin_image_load(transfer);
    }

    /// GP0(0xC0): VRAM→CPU Transfer
    ///
    /// The rectangle is then read through GPUREAD, two pixels per word.
    pub(super) fn gp0_vram_to_cpu_transfer(&mut self, words: &[u32]) {
        let transfer = VramTransfer::from_words(words[1], words[2]);
        log::debug!(
            "VRAM→CPU transfer: ({}, {}) size {}×{}",
            transfer.x,
            transfer.y,
            transfer.width,
            transfer.height
        );
        self.read_transfer = Some(transfer);
    }

    /// GP0(0x80): VRAM→VRAM Copy
    ///
    /// - Word 1: Source coordinates
    /// - Word 2: Destination coordinates
    /// - Word 3: Size
    ///
    /// Each row is read in full before it is written, so overlapping copies
    /// behave like the hardware's line buffer. Mask settings apply.
    pub(super) fn gp0_vram_to_vram_transfer(&mut self, words: &[u32]) {
        let src = VramTransfer::from_words(words[1], words[3]);
        let dst = VramTransfer::from_words(words[2], words[3]);

        log::trace!(
            "VRAM→VRAM copy: ({}, {}) -> ({}, {}) size {}×{}",
            src.x,
            src.y,
            dst.x,
            dst.y,
            src.width,
            src.height
        );

        let mut row = vec![0u16; src.width as usize];
        for dy in 0..src.height {
            for (dx, pixel) in row.iter_mut().enumerate() {
                *pixel = self.read_vram(src.x.wrapping_add(dx as u16), src.y.wrapping_add(dy));
            }
            for (dx, &pixel) in row.iter().enumerate() {
                self.store_masked(dst.x.wrapping_add(dx as u16), dst.y.wrapping_add(dy), pixel);
            }
        }
    }
}
