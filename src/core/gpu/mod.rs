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
//! GPU (Graphics Processing Unit) implementation
//!
//! This module implements the Sony CXD8561Q GPU used in the PlayStation.
//! The GPU is responsible for:
//! - Managing 1MB of VRAM (1024×512 pixels, 16-bit per pixel)
//! - Processing GP0 (drawing) and GP1 (control) commands
//! - Rendering primitives (polygons, lines, rectangles)
//! - Video timing: hblank/vblank signals and the dot clock used by the timers
//!
//! # VRAM Layout
//!
//! VRAM is a 1024×512 surface of 16-bit pixels used for display buffers,
//! textures and color lookup tables (CLUTs) alike.
//!
//! # Color Format
//!
//! - Bits 0-4: Red
//! - Bits 5-9: Green
//! - Bits 10-14: Blue
//! - Bit 15: Mask bit
//!
//! # Command flow
//!
//! GP0 words are buffered until the command they belong to is complete;
//! a partially received command stalls the queue and is never dropped.
//! Complete commands execute immediately, in submission order.
//!
//! # References
//!
//! - [PSX-SPX: GPU](http://problemkaputt.de/psx-spx.htm#gpu)

use crate::core::dma::DmaDevice;
use crate::core::error::Result;
use crate::core::save_state::expect_len;
use serde::{Deserialize, Serialize};

// Module declarations
mod gp0;
mod gp1;
mod render;
#[cfg(test)]
mod tests;
pub mod timing;
mod types;

// Public re-exports
pub use gp0::{Gp0Command, LineFlags, PolygonFlags, RectFlags, RectSize};
pub use render::{PrimitiveStyle, RasterVertex, Rasterizer, Shading, TextureParams};
pub use timing::{VideoSignals, VideoStandard};
pub use types::*;

use timing::VideoClock;

/// What the next GP0 word is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum Gp0Mode {
    /// Part of a command
    Command,
    /// Pixel data for a CPU→VRAM transfer
    ImageLoad(VramTransfer),
}

/// GPU state representing the CXD8561 graphics processor
///
/// # Examples
///
/// ```
/// use psrx_core::core::gpu::GPU;
///
/// let mut gpu = GPU::new();
/// gpu.reset();
///
/// // Write a white pixel to VRAM
/// gpu.write_vram(100, 100, 0x7FFF);
/// assert_eq!(gpu.read_vram(100, 100), 0x7FFF);
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct GPU {
    /// VRAM, row-major
    pub(in crate::core::gpu) vram: Vec<u16>,

    /// Triangle/rectangle/line rasterizer (holds the clip rect and mask
    /// settings)
    pub(in crate::core::gpu) rasterizer: Rasterizer,

    /// Drawing mode state (GP0(E1h))
    pub(in crate::core::gpu) draw_mode: DrawMode,

    /// Drawing area (clipping rectangle)
    pub(in crate::core::gpu) draw_area: DrawingArea,

    /// Drawing offset (added to all vertex coordinates)
    pub(in crate::core::gpu) draw_offset: (i16, i16),

    pub(in crate::core::gpu) texture_window: TextureWindow,

    /// VRAM position of the top-left displayed pixel
    pub(in crate::core::gpu) display_start: (u16, u16),

    /// Horizontal display range in video cycles (GP1(06h))
    pub(in crate::core::gpu) hrange: (u16, u16),

    /// Vertical display range in lines (GP1(07h))
    pub(in crate::core::gpu) vrange: (u16, u16),

    pub(in crate::core::gpu) display_mode: DisplayMode,

    /// Video standard restored by GP1(00h)
    default_pal: bool,

    pub(in crate::core::gpu) display_disabled: bool,

    pub(in crate::core::gpu) dma_direction: DmaDirection,

    /// GPUSTAT bit 24
    pub(in crate::core::gpu) irq: bool,

    /// GP0(1Fh) was executed since the last [`GPU::take_irq`]
    irq_edge: bool,

    /// Words of the command being received
    pub(in crate::core::gpu) fifo: Vec<u32>,

    gp0_mode: Gp0Mode,

    /// VRAM→CPU transfer feeding GPUREAD
    pub(in crate::core::gpu) read_transfer: Option<VramTransfer>,

    /// GPUREAD value when no transfer is active (GP1(10h) replies)
    pub(in crate::core::gpu) gpuread_latch: u32,

    clock: VideoClock,

    in_vblank: bool,

    /// Interlace field shown this frame
    field: bool,

    /// Display snapshot from the last vblank
    frame: Framebuffer,
}

impl GPU {
    /// VRAM width in pixels
    pub const VRAM_WIDTH: usize = 1024;

    /// VRAM height in pixels
    pub const VRAM_HEIGHT: usize = 512;

    /// Total VRAM size in pixels
    pub const VRAM_SIZE: usize = Self::VRAM_WIDTH * Self::VRAM_HEIGHT;

    /// Value returned by GP1(10h) index 7
    const VERSION: u32 = 2;

    /// Create a new GPU with black VRAM and NTSC timing
    ///
    /// # Examples
    ///
    /// ```
    /// use psrx_core::core::gpu::GPU;
    ///
    /// let gpu = GPU::new();
    /// assert_eq!(gpu.read_vram(0, 0), 0x0000);
    /// assert_eq!(gpu.display_area().width, 256);
    /// ```
    pub fn new() -> Self {
        let mut gpu = Self {
            vram: vec![0x0000; Self::VRAM_SIZE],
            rasterizer: Rasterizer::new(),
            draw_mode: DrawMode::default(),
            draw_area: DrawingArea::default(),
            draw_offset: (0, 0),
            texture_window: TextureWindow::default(),
            display_start: (0, 0),
            hrange: (0x200, 0xC00),
            vrange: (0x10, 0x100),
            display_mode: DisplayMode::default(),
            default_pal: false,
            display_disabled: true,
            dma_direction: DmaDirection::Off,
            irq: false,
            irq_edge: false,
            fifo: Vec::with_capacity(16),
            gp0_mode: Gp0Mode::Command,
            read_transfer: None,
            gpuread_latch: 0,
            clock: VideoClock::default(),
            in_vblank: false,
            field: false,
            frame: Framebuffer::default(),
        };
        gpu.in_vblank = gpu.line_in_vblank();
        gpu
    }

    /// Power-on reset: clears VRAM and all state
    ///
    /// The configured video standard survives.
    pub fn reset(&mut self) {
        let pal = self.default_pal;
        *self = Self::new();
        self.set_video_standard(pal);
    }

    /// Reset every register but keep VRAM and the beam position (GP1(00h))
    pub(in crate::core::gpu) fn reset_state_preserving_vram(&mut self) {
        self.rasterizer = Rasterizer::new();
        self.draw_mode = DrawMode::default();
        self.draw_area = DrawingArea::default();
        self.draw_offset = (0, 0);
        self.texture_window = TextureWindow::default();
        self.display_start = (0, 0);
        self.hrange = (0x200, 0xC00);
        self.vrange = (0x10, 0x100);
        self.display_mode = DisplayMode {
            pal: self.default_pal,
            ..DisplayMode::default()
        };
        self.display_disabled = true;
        self.dma_direction = DmaDirection::Off;
        self.irq = false;
        self.fifo.clear();
        self.gp0_mode = Gp0Mode::Command;
        self.read_transfer = None;
    }

    /// Select the video standard used at power-on and after GP1(00h)
    pub fn set_video_standard(&mut self, pal: bool) {
        self.default_pal = pal;
        self.display_mode.pal = pal;
    }

    /// Timing of the standard currently programmed by GP1(08h)
    pub fn video_standard(&self) -> VideoStandard {
        VideoStandard::select(self.display_mode.pal)
    }

    /// Read a 16-bit pixel from VRAM (coordinates wrap)
    pub fn read_vram(&self, x: u16, y: u16) -> u16 {
        self.vram[self.vram_index(x, y)]
    }

    /// Write a 16-bit pixel to VRAM (coordinates wrap)
    ///
    /// # Examples
    ///
    /// ```
    /// use psrx_core::core::gpu::GPU;
    ///
    /// let mut gpu = GPU::new();
    /// gpu.write_vram(1024 + 5, 512 + 6, 0x7FFF);
    /// assert_eq!(gpu.read_vram(5, 6), 0x7FFF);
    /// ```
    pub fn write_vram(&mut self, x: u16, y: u16, value: u16) {
        let index = self.vram_index(x, y);
        self.vram[index] = value;
    }

    /// Reject restored VRAM or a frame snapshot of the wrong size
    pub(crate) fn validate_layout(&self) -> Result<()> {
        expect_len("VRAM", self.vram.len(), Self::VRAM_SIZE)?;
        let frame_pixels = (self.frame.width as usize).saturating_mul(self.frame.height as usize);
        expect_len("framebuffer", self.frame.pixels.len(), frame_pixels)
    }

    /// Whole VRAM, row-major
    pub fn vram(&self) -> &[u16] {
        &self.vram
    }

    #[inline(always)]
    pub(in crate::core::gpu) fn vram_index(&self, x: u16, y: u16) -> usize {
        let x = (x & 0x3FF) as usize;
        let y = (y & 0x1FF) as usize;
        y * Self::VRAM_WIDTH + x
    }

    /// Store a pixel through the mask-bit rules (transfers and copies)
    pub(in crate::core::gpu) fn store_masked(&mut self, x: u16, y: u16, value: u16) {
        let mask = self.rasterizer.mask();
        let index = self.vram_index(x, y);
        if mask.check_mask && self.vram[index] & 0x8000 != 0 {
            return;
        }
        self.vram[index] = if mask.set_mask { value | 0x8000 } else { value };
    }

    /// Displayed VRAM region
    pub fn display_area(&self) -> DisplayArea {
        DisplayArea {
            x: self.display_start.0,
            y: self.display_start.1,
            width: self.display_mode.horizontal_res.width(),
            height: self.display_mode.height(),
        }
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn draw_area(&self) -> DrawingArea {
        self.draw_area
    }

    pub fn draw_offset(&self) -> (i16, i16) {
        self.draw_offset
    }

    pub fn texture_window(&self) -> TextureWindow {
        self.texture_window
    }

    pub fn mask_settings(&self) -> MaskSettings {
        self.rasterizer.mask()
    }

    pub fn is_display_enabled(&self) -> bool {
        !self.display_disabled
    }

    pub fn is_in_vblank(&self) -> bool {
        self.in_vblank
    }

    /// Current scanline
    pub fn scanline(&self) -> u16 {
        self.clock.line
    }

    /// Snapshot of the display taken at the last vblank
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.frame
    }

    /// GPU interrupt requested by GP0(1Fh) since the last call
    pub fn take_irq(&mut self) -> bool {
        std::mem::take(&mut self.irq_edge)
    }

    /// Get current GPU status register value (GPUSTAT, 0x1F801814)
    ///
    /// # Examples
    ///
    /// ```
    /// use psrx_core::core::gpu::GPU;
    ///
    /// let gpu = GPU::new();
    /// let status = gpu.status();
    /// assert_ne!(status & (1 << 23), 0); // display disabled
    /// assert_ne!(status & (1 << 26), 0); // ready for commands
    /// ```
    pub fn status(&self) -> u32 {
        let mode = &self.draw_mode;
        let mask = self.rasterizer.mask();

        let mut status = mode.texture_page_x_base as u32 & 0x0F;
        status |= (mode.texture_page_y_base as u32 & 1) << 4;
        status |= (mode.semi_transparency as u32) << 5;
        status |= (mode.texture_depth_bits as u32 & 3) << 7;
        status |= (mode.dithering as u32) << 9;
        status |= (mode.draw_to_display as u32) << 10;
        status |= (mask.set_mask as u32) << 11;
        status |= (mask.check_mask as u32) << 12;
        status |= ((self.field || !self.display_mode.interlaced) as u32) << 13;
        status |= (mode.texture_disable as u32) << 15;
        status |= self.display_mode.status_bits();
        status |= (self.display_disabled as u32) << 23;
        status |= (self.irq as u32) << 24;

        let ready_cmd = true;
        let ready_vram_send = self.read_transfer.is_some();
        let ready_dma = true;
        let dma_request = match self.dma_direction {
            DmaDirection::Off => false,
            DmaDirection::Fifo => true,
            DmaDirection::CpuToGp0 => ready_dma,
            DmaDirection::VramToCpu => ready_vram_send,
        };
        status |= (dma_request as u32) << 25;
        status |= (ready_cmd as u32) << 26;
        status |= (ready_vram_send as u32) << 27;
        status |= (ready_dma as u32) << 28;
        status |= (self.dma_direction as u32) << 29;

        let odd_line = if self.in_vblank {
            false
        } else if self.display_mode.interlaced && self.display_mode.vertical_480 {
            self.field
        } else {
            self.clock.line & 1 != 0
        };
        status |= (odd_line as u32) << 31;

        status
    }

    /// Read from GPUREAD register (0x1F801810)
    ///
    /// During a VRAM→CPU transfer each read returns two pixels; otherwise
    /// the last GP1(10h) reply.
    pub fn read_gpuread(&mut self) -> u32 {
        let Some(mut transfer) = self.read_transfer.take() else {
            return self.gpuread_latch;
        };

        let mut word = 0u32;
        for shift in [0, 16] {
            if let Some((x, y)) = transfer.next_pixel() {
                word |= (self.read_vram(x, y) as u32) << shift;
            }
        }

        if transfer.is_done() {
            log::debug!("VRAM→CPU transfer complete");
        } else {
            self.read_transfer = Some(transfer);
        }
        self.gpuread_latch = word;
        word
    }

    /// Process a GP0 word (drawing and VRAM commands)
    pub fn write_gp0(&mut self, value: u32) {
        if let Gp0Mode::ImageLoad(mut transfer) = self.gp0_mode {
            for pixel in [value as u16, (value >> 16) as u16] {
                if let Some((x, y)) = transfer.next_pixel() {
                    self.store_masked(x, y, pixel);
                }
            }
            self.gp0_mode = if transfer.is_done() {
                log::trace!("CPU→VRAM transfer complete");
                Gp0Mode::Command
            } else {
                Gp0Mode::ImageLoad(transfer)
            };
            return;
        }

        self.fifo.push(value);
        if let Some(command) = gp0::complete_command(&self.fifo) {
            let words = std::mem::take(&mut self.fifo);
            self.execute_gp0(command, &words);
            self.fifo = words;
            self.fifo.clear();
        }
    }

    /// Enter CPU→VRAM mode for the rest of an A0h command
    pub(in crate::core::gpu) fn begin_image_load(&mut self, transfer: VramTransfer) {
        self.gp0_mode = Gp0Mode::ImageLoad(transfer);
    }

    /// Stop a pending command and any CPU→VRAM transfer (GP1(01h))
    pub(in crate::core::gpu) fn clear_command_buffer(&mut self) {
        self.fifo.clear();
        self.gp0_mode = Gp0Mode::Command;
    }

    /// Signal GP0(1Fh)
    pub(in crate::core::gpu) fn request_irq(&mut self) {
        if !self.irq {
            self.irq_edge = true;
        }
        self.irq = true;
    }

    /// Advance the video clock by `cycles` CPU cycles
    ///
    /// # Returns
    ///
    /// The dot/hblank/vblank signals for the timers and scheduler. A
    /// framebuffer snapshot is taken whenever vblank is entered.
    ///
    /// # Examples
    ///
    /// ```
    /// use psrx_core::core::gpu::GPU;
    ///
    /// let mut gpu = GPU::new();
    /// let frame = gpu.video_standard().cpu_cycles_per_frame() as u32;
    /// let signals = gpu.tick(frame);
    /// assert!(signals.vblank_started);
    /// assert_eq!(signals.hblanks, 263);
    /// ```
    pub fn tick(&mut self, cycles: u32) -> VideoSignals {
        let standard = self.video_standard();
        let video = self.clock.video_cycles(cycles, &standard);
        let divider = self.display_mode.horizontal_res.dot_divider();

        let mut signals = VideoSignals {
            dots: self.clock.dots(video, divider),
            ..VideoSignals::default()
        };

        self.clock.line_cycle += video;
        while self.clock.line_cycle >= standard.cycles_per_line {
            self.clock.line_cycle -= standard.cycles_per_line;
            self.clock.line += 1;
            if self.clock.line >= standard.lines_per_frame {
                self.clock.line = 0;
            }
            signals.hblanks += 1;

            let vblank = self.line_in_vblank();
            if vblank && !self.in_vblank {
                self.enter_vblank();
                signals.vblank_started = true;
            }
            self.in_vblank = vblank;
        }

        signals.in_vblank = self.in_vblank;
        signals.in_hblank = self.clock.line_cycle < self.hrange.0 as u32
            || self.clock.line_cycle >= self.hrange.1 as u32;
        signals
    }

    /// Displayed lines `[start, end)` for the current standard
    ///
    /// Falls back to the standard's default range when GP1(07h) programmed
    /// an empty one.
    fn display_lines(&self) -> (u16, u16) {
        let standard = self.video_standard();
        let last = standard.lines_per_frame - 1;
        let start = self.vrange.0.min(last);
        let end = self.vrange.1.min(last);
        if start < end {
            (start, end)
        } else {
            standard.default_vrange
        }
    }

    fn line_in_vblank(&self) -> bool {
        let (start, end) = self.display_lines();
        self.clock.line < start || self.clock.line >= end
    }

    fn enter_vblank(&mut self) {
        self.snapshot_frame();
        if self.display_mode.interlaced {
            self.field = !self.field;
        }
        log::trace!("VBlank entered");
    }

    /// Copy the display area out of VRAM as 0x00RRGGBB pixels
    fn snapshot_frame(&mut self) {
        let area = self.display_area();
        let width = area.width as usize;
        let height = area.height as usize;

        let mut pixels = std::mem::take(&mut self.frame.pixels);
        pixels.clear();
        pixels.reserve(width * height);

        for row in 0..height {
            let y = area.y.wrapping_add(row as u16);
            if self.display_mode.color_24bit {
                let byte_at = |k: usize| -> u32 {
                    let x = area.x.wrapping_add((k / 2) as u16);
                    let halfword = self.read_vram(x, y);
                    ((halfword >> ((k & 1) * 8)) & 0xFF) as u32
                };
                for col in 0..width {
                    let k = col * 3;
                    let r = byte_at(k);
                    let g = byte_at(k + 1);
                    let b = byte_at(k + 2);
                    pixels.push((r << 16) | (g << 8) | b);
                }
            } else {
                for col in 0..width {
                    let pixel = self.read_vram(area.x.wrapping_add(col as u16), y);
                    let r = ((pixel & 0x1F) as u32) << 3;
                    let g = (((pixel >> 5) & 0x1F) as u32) << 3;
                    let b = (((pixel >> 10) & 0x1F) as u32) << 3;
                    pixels.push((r << 16) | (g << 8) | b);
                }
            }
        }

        self.frame = Framebuffer {
            width: width as u32,
            height: height as u32,
            pixels,
        };
    }

    /// Process a GP1 word (control commands)
    pub fn write_gp1(&mut self, value: u32) {
        let command = (value >> 24) & 0x3F;
        log::debug!("GP1(0x{:02X}) = 0x{:06X}", command, value & 0xFF_FFFF);

        match command {
            0x00 => self.gp1_reset_gpu(),
            0x01 => self.gp1_reset_command_buffer(),
            0x02 => self.gp1_acknowledge_interrupt(),
            0x03 => self.gp1_display_enable(value),
            0x04 => self.gp1_dma_direction(value),
            0x05 => self.gp1_display_area_start(value),
            0x06 => self.gp1_horizontal_display_range(value),
            0x07 => self.gp1_vertical_display_range(value),
            0x08 => self.gp1_display_mode(value),
            0x10..=0x1F => self.gp1_get_gpu_info(value),
            _ => log::warn!("Unknown GP1 command: 0x{:02X}", command),
        }
    }
}

impl Default for GPU {
    fn default() -> Self {
        Self::new()
    }
}

impl DmaDevice for GPU {
    fn dma_request(&self) -> bool {
        match self.dma_direction {
            DmaDirection::Off => false,
            DmaDirection::Fifo | DmaDirection::CpuToGp0 => true,
            DmaDirection::VramToCpu => self.read_transfer.is_some(),
        }
    }

    fn dma_read(&mut self) -> u32 {
        self.read_gpuread()
    }

    fn dma_write(&mut self, value: u32) {
        self.write_gp0(value);
    }
}
