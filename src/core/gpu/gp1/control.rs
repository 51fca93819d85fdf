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
//! GP1 control commands
//!
//! Implements GPU control operations including reset, interrupt, DMA and
//! the info latch.

use super::super::types::DmaDirection;
use super::super::GPU;

impl GPU {
    /// GP1(0x00): Reset GPU
    ///
    /// Resets every register to its power-on value without clearing VRAM.
    /// The display is turned off.
    pub(in crate::core::gpu) fn gp1_reset_gpu(&mut self) {
        self.reset_state_preserving_vram();
        log::debug!("GPU reset");
    }

    /// GP1(0x01): Reset Command Buffer
    ///
    /// Drops a partially received GP0 command and cancels a CPU→VRAM
    /// transfer.
    pub(in crate::core::gpu) fn gp1_reset_command_buffer(&mut self) {
        self.clear_command_buffer();
        log::debug!("Command buffer reset");
    }

    /// GP1(0x02): Acknowledge GPU Interrupt
    pub(in crate::core::gpu) fn gp1_acknowledge_interrupt(&mut self) {
        self.irq = false;
        log::debug!("GPU interrupt acknowledged");
    }

    /// GP1(0x04): DMA Direction
    ///
    /// Bits 0-1: 0=Off, 1=FIFO, 2=CPU→GP0, 3=GPUREAD→CPU. Also selects what
    /// GPUSTAT bit 25 reports.
    pub(in crate::core::gpu) fn gp1_dma_direction(&mut self, value: u32) {
        self.dma_direction = DmaDirection::from(value);
        log::debug!("DMA direction {:?}", self.dma_direction);
    }

    /// GP1(0x10): GPU Info
    ///
    /// Latches a value into GPUREAD:
    /// - 0x02: Texture window settings
    /// - 0x03: Draw area top left
    /// - 0x04: Draw area bottom right
    /// - 0x05: Draw offset
    /// - 0x07: GPU version (2)
    ///
    /// Other indices leave the latch unchanged.
    pub(in crate::core::gpu) fn gp1_get_gpu_info(&mut self, value: u32) {
        let window = &self.texture_window;
        let area = &self.draw_area;

        let reply = match value & 0x0F {
            0x02 => Some(
                window.mask_x as u32
                    | (window.mask_y as u32) << 5
                    | (window.offset_x as u32) << 10
                    | (window.offset_y as u32) << 15,
            ),
            0x03 => Some(area.left as u32 | (area.top as u32) << 10),
            0x04 => Some(area.right as u32 | (area.bottom as u32) << 10),
            0x05 => {
                let x = self.draw_offset.0 as u32 & 0x7FF;
                let y = self.draw_offset.1 as u32 & 0x7FF;
                Some(x | (y << 11))
            }
            0x07 => Some(Self::VERSION),
            _ => None,
        };

        if let Some(reply) = reply {
            self.gpuread_latch = reply;
        }
    }
}
