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
//! GP0 Drawing Mode Commands
//!
//! This module implements GP0 commands that control drawing settings such as
//! texture page, drawing area, drawing offset, and masking behavior.
//!
//! # Commands
//!
//! - 0xE1: Draw Mode Setting (texture page, transparency, dithering, etc.)
//! - 0xE2: Texture Window Setting
//! - 0xE3: Set Drawing Area Top-Left
//! - 0xE4: Set Drawing Area Bottom-Right
//! - 0xE5: Set Drawing Offset
//! - 0xE6: Mask Bit Setting
//!
//! # References
//!
//! - [PSX-SPX: GP0 Drawing Settings](http://problemkaputt.de/psx-spx.htm#gpurenderattributes)

use crate::core::gpu::types::{sign_extend_11, MaskSettings};
use crate::core::gpu::GPU;

impl GPU {
    /// GP0(E1h) - Draw Mode Setting (aka "Texpage")
    ///
    /// # Command Format
    ///
    /// ```text
    /// 0xE1000000 | params
    ///   Bit 0-3:   Texture page X Base   (N*64)
    ///   Bit 4:     Texture page Y Base   (N*256, 0=0, 1=256)
    ///   Bit 5-6:   Semi Transparency     (0=B/2+F/2, 1=B+F, 2=B-F, 3=B+F/4)
    ///   Bit 7-8:   Texture page colors   (0=4bit, 1=8bit, 2=15bit)
    ///   Bit 9:     Dithering enabled     (0=Off, 1=On)
    ///   Bit 10:    Drawing to display    (0=Prohibited, 1=Allowed)
    ///   Bit 11:    Texture disable       (0=Normal, 1=Disable)
    ///   Bit 12:    Textured rect X-flip (for Textured Rectangle command)
    ///   Bit 13:    Textured rect Y-flip (for Textured Rectangle command)
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use psrx_core::core::gpu::GPU;
    ///
    /// let mut gpu = GPU::new();
    /// gpu.write_gp0(0xE100_0012); // X=2 (128), Y=1 (256)
    /// assert_eq!(gpu.draw_mode().texture_page_origin(), (128, 256));
    /// ```
    pub(super) fn gp0_draw_mode(&mut self, value: u32) {
        let mode = &mut self.draw_mode;
        mode.set_texture_page(value);
        mode.dithering = value & (1 << 9) != 0;
        mode.draw_to_display = value & (1 << 10) != 0;
        mode.texture_disable = value & (1 << 11) != 0;
        mode.texture_x_flip = value & (1 << 12) != 0;
        mode.texture_y_flip = value & (1 << 13) != 0;
    }

    /// GP0(E2h) - Texture Window Setting
    ///
    /// Mask and offset are in 8-texel steps, 5 bits each.
    pub(super) fn gp0_texture_window(&mut self, value: u32) {
        let window = &mut self.texture_window;
        window.mask_x = (value & 0x1F) as u8;
        window.mask_y = ((value >> 5) & 0x1F) as u8;
        window.offset_x = ((value >> 10) & 0x1F) as u8;
        window.offset_y = ((value >> 15) & 0x1F) as u8;
    }

    /// GP0(E3h) - Set Drawing Area Top-Left (X in bits 0-9, Y in 10-18)
    pub(super) fn gp0_draw_area_top_left(&mut self, value: u32) {
        self.draw_area.left = (value & 0x3FF) as u16;
        self.draw_area.top = ((value >> 10) & 0x1FF) as u16;
        self.rasterizer.set_clip_rect(&self.draw_area);
        log::trace!("Draw area top-left: {:?}", self.draw_area);
    }

    /// GP0(E4h) - Set Drawing Area Bottom-Right (inclusive)
    pub(super) fn gp0_draw_area_bottom_right(&mut self, value: u32) {
        self.draw_area.right = (value & 0x3FF) as u16;
        self.draw_area.bottom = ((value >> 10) & 0x1FF) as u16;
        self.rasterizer.set_clip_rect(&self.draw_area);
        log::trace!("Draw area bottom-right: {:?}", self.draw_area);
    }

    /// GP0(E5h) - Set Drawing Offset (signed 11-bit X and Y)
    pub(super) fn gp0_draw_offset(&mut self, value: u32) {
        let x = sign_extend_11((value & 0x7FF) as u16);
        let y = sign_extend_11(((value >> 11) & 0x7FF) as u16);
        self.draw_offset = (x, y);
    }

    /// GP0(E6h) - Mask Bit Setting
    pub(super) fn gp0_mask_settings(&mut self, value: u32) {
        self.rasterizer.set_mask(MaskSettings {
            set_mask: value & 1 != 0,
            check_mask: value & 2 != 0,
        });
    }
}
