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
//! GP1 display configuration commands
//!
//! Implements display settings including resolution, area, and video mode.

use super::super::types::DisplayMode;
use super::super::GPU;

impl GPU {
    /// GP1(0x03): Display Enable
    ///
    /// Bit 0: 0=Enable, 1=Disable
    pub(in crate::core::gpu) fn gp1_display_enable(&mut self, value: u32) {
        self.display_disabled = value & 1 != 0;
        log::debug!(
            "Display {}",
            if self.display_disabled {
                "disabled"
            } else {
                "enabled"
            }
        );
    }

    /// GP1(0x05): Start of Display Area
    ///
    /// Bits 0-9: X (halfword aligned), Bits 10-18: Y
    pub(in crate::core::gpu) fn gp1_display_area_start(&mut self, value: u32) {
        let x = (value & 0x3FE) as u16;
        let y = ((value >> 10) & 0x1FF) as u16;
        self.display_start = (x, y);
    }

    /// GP1(0x06): Horizontal Display Range
    ///
    /// Bits 0-11: X1, Bits 12-23: X2, in video clock cycles from hsync.
    /// Everything outside `[X1, X2)` is horizontal blank.
    pub(in crate::core::gpu) fn gp1_horizontal_display_range(&mut self, value: u32) {
        let x1 = (value & 0xFFF) as u16;
        let x2 = ((value >> 12) & 0xFFF) as u16;
        self.hrange = (x1, x2);
    }

    /// GP1(0x07): Vertical Display Range
    ///
    /// Bits 0-9: Y1, Bits 10-19: Y2, in scanlines from vsync. Lines outside
    /// `[Y1, Y2)` are vertical blank.
    pub(in crate::core::gpu) fn gp1_vertical_display_range(&mut self, value: u32) {
        let y1 = (value & 0x3FF) as u16;
        let y2 = ((value >> 10) & 0x3FF) as u16;
        self.vrange = (y1, y2);
    }

    /// GP1(0x08): Display Mode
    ///
    /// ```text
    /// Bit 0-1: Horizontal resolution 1 (0=256, 1=320, 2=512, 3=640)
    /// Bit 2:   Vertical resolution (0=240, 1=480 when interlaced)
    /// Bit 3:   Video mode (0=NTSC, 1=PAL)
    /// Bit 4:   Display area color depth (0=15bit, 1=24bit)
    /// Bit 5:   Vertical interlace
    /// Bit 6:   Horizontal resolution 2 (1=368, overrides bits 0-1)
    /// Bit 7:   Reverse flag
    /// ```
    pub(in crate::core::gpu) fn gp1_display_mode(&mut self, value: u32) {
        self.display_mode = DisplayMode::from_u32(value);
        log::debug!("Display mode: {:?}", self.display_mode);
    }
}
