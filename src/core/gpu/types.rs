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
//! GPU type definitions
//!
//! Colors, vertices, drawing environment and display settings shared by the
//! GP0/GP1 command handlers and the rasterizer.

use serde::{Deserialize, Serialize};

/// A 24-bit RGB color used in GPU commands
///
/// PlayStation GPU commands use 24-bit RGB colors (8 bits per channel)
/// which are converted to 15-bit RGB for VRAM storage.
///
/// # Examples
///
/// ```
/// use psrx_core::core::gpu::Color;
///
/// let color = Color::from_u32(0x00FF8040);
/// assert_eq!(color.r, 0x40);
/// assert_eq!(color.g, 0x80);
/// assert_eq!(color.b, 0xFF);
///
/// let rgb15 = color.to_rgb15();
/// assert_eq!(rgb15 & 0x1F, 0x08);
/// assert_eq!((rgb15 >> 5) & 0x1F, 0x10);
/// assert_eq!((rgb15 >> 10) & 0x1F, 0x1F);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Color {
    /// Create a Color from the low 24 bits of a command word
    pub fn from_u32(value: u32) -> Self {
        Self {
            r: (value & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: ((value >> 16) & 0xFF) as u8,
        }
    }

    /// Convert to the VRAM 5-5-5 format (mask bit clear)
    pub fn to_rgb15(&self) -> u16 {
        let r = ((self.r as u16) >> 3) & 0x1F;
        let g = ((self.g as u16) >> 3) & 0x1F;
        let b = ((self.b as u16) >> 3) & 0x1F;
        (b << 10) | (g << 5) | r
    }
}

/// A 2D vertex position
///
/// Command coordinates are 11-bit signed values; bits above 10 are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub x: i16,
    pub y: i16,
}

impl Vertex {
    /// Decode a `YYYYXXXX` vertex word
    ///
    /// # Examples
    ///
    /// ```
    /// use psrx_core::core::gpu::Vertex;
    ///
    /// let v = Vertex::from_u32(0x0010_07FF);
    /// assert_eq!(v.x, -1);
    /// assert_eq!(v.y, 16);
    /// ```
    pub fn from_u32(value: u32) -> Self {
        Self {
            x: sign_extend_11(value as u16),
            y: sign_extend_11((value >> 16) as u16),
        }
    }
}

/// Sign-extend an 11-bit field
#[inline(always)]
pub(crate) fn sign_extend_11(value: u16) -> i16 {
    ((value << 5) as i16) >> 5
}

/// Texture coordinate (u, v) in texels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TexCoord {
    pub u: u8,
    pub v: u8,
}

impl TexCoord {
    /// Decode the low 16 bits of a texcoord word
    pub fn from_u32(value: u32) -> Self {
        Self {
            u: (value & 0xFF) as u8,
            v: ((value >> 8) & 0xFF) as u8,
        }
    }
}

/// Texture color depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextureDepth {
    /// 4-bit CLUT indices
    #[default]
    T4Bit,
    /// 8-bit CLUT indices
    T8Bit,
    /// Direct 15-bit color
    T15Bit,
}

impl From<u32> for TextureDepth {
    fn from(value: u32) -> Self {
        match value & 3 {
            0 => TextureDepth::T4Bit,
            1 => TextureDepth::T8Bit,
            // 3 is reserved and behaves like 15-bit
            _ => TextureDepth::T15Bit,
        }
    }
}

/// Semi-transparency equation (B = back pixel, F = front pixel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// B/2 + F/2
    #[default]
    Average,
    /// B + F
    Add,
    /// B - F
    Subtract,
    /// B + F/4
    AddQuarter,
}

impl From<u32> for BlendMode {
    fn from(value: u32) -> Self {
        match value & 3 {
            0 => BlendMode::Average,
            1 => BlendMode::Add,
            2 => BlendMode::Subtract,
            _ => BlendMode::AddQuarter,
        }
    }
}

/// Draw mode (GP0(E1h), also updated by textured polygons)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrawMode {
    /// Texture page X base in 64-pixel units (0-15)
    pub texture_page_x_base: u8,
    /// Texture page Y base in 256-line units (0-1)
    pub texture_page_y_base: u8,
    /// Semi-transparency equation
    pub semi_transparency: BlendMode,
    /// Texture page color depth
    pub texture_depth: TextureDepth,
    /// Texture depth field as written, reserved value 3 included
    pub texture_depth_bits: u8,
    /// Dither 24-bit to 15-bit (reported, never applied)
    pub dithering: bool,
    /// Drawing to the displayed area allowed
    pub draw_to_display: bool,
    /// Textures disabled
    pub texture_disable: bool,
    /// Textured rectangle X flip
    pub texture_x_flip: bool,
    /// Textured rectangle Y flip
    pub texture_y_flip: bool,
}

impl DrawMode {
    /// Apply the low 9 bits of a texpage attribute
    pub(crate) fn set_texture_page(&mut self, value: u32) {
        self.texture_page_x_base = (value & 0x0F) as u8;
        self.texture_page_y_base = ((value >> 4) & 1) as u8;
        self.semi_transparency = BlendMode::from(value >> 5);
        self.texture_depth = TextureDepth::from(value >> 7);
        self.texture_depth_bits = ((value >> 7) & 3) as u8;
    }

    /// Texture page origin in VRAM pixels
    pub fn texture_page_origin(&self) -> (u16, u16) {
        (
            self.texture_page_x_base as u16 * 64,
            self.texture_page_y_base as u16 * 256,
        )
    }
}

/// Drawing area (inclusive clip rectangle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawingArea {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

impl Default for DrawingArea {
    fn default() -> Self {
        Self {
            left: 0,
            top: 0,
            right: 1023,
            bottom: 511,
        }
    }
}

/// Texture window (GP0(E2h)), in 8-texel steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextureWindow {
    pub mask_x: u8,
    pub mask_y: u8,
    pub offset_x: u8,
    pub offset_y: u8,
}

impl TextureWindow {
    /// Apply the window to a texture coordinate
    #[inline(always)]
    pub fn apply(&self, u: u8, v: u8) -> (u8, u8) {
        let mx = self.mask_x << 3;
        let my = self.mask_y << 3;
        let ox = (self.offset_x & self.mask_x) << 3;
        let oy = (self.offset_y & self.mask_y) << 3;
        ((u & !mx) | ox, (v & !my) | oy)
    }
}

/// Mask bit settings (GP0(E6h))
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaskSettings {
    /// Force bit 15 on every drawn pixel
    pub set_mask: bool,
    /// Skip pixels whose bit 15 is already set
    pub check_mask: bool,
}

/// Displayed VRAM region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayArea {
    /// VRAM X of the first displayed pixel
    pub x: u16,
    /// VRAM Y of the first displayed line
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Horizontal display resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorizontalRes {
    #[default]
    R256,
    R320,
    R512,
    R640,
    R368,
}

impl HorizontalRes {
    /// Decode GP1(08h) bits 0-1 and 6
    pub fn from_fields(hr1: u32, hr2: bool) -> Self {
        if hr2 {
            return HorizontalRes::R368;
        }
        match hr1 & 3 {
            0 => HorizontalRes::R256,
            1 => HorizontalRes::R320,
            2 => HorizontalRes::R512,
            _ => HorizontalRes::R640,
        }
    }

    /// Width in pixels
    pub fn width(self) -> u16 {
        match self {
            HorizontalRes::R256 => 256,
            HorizontalRes::R320 => 320,
            HorizontalRes::R512 => 512,
            HorizontalRes::R640 => 640,
            HorizontalRes::R368 => 368,
        }
    }

    /// Video clock cycles per dot
    pub fn dot_divider(self) -> u32 {
        match self {
            HorizontalRes::R256 => 10,
            HorizontalRes::R320 => 8,
            HorizontalRes::R512 => 5,
            HorizontalRes::R640 => 4,
            HorizontalRes::R368 => 7,
        }
    }

    /// GPUSTAT bits 16-18
    fn status_bits(self) -> u32 {
        match self {
            HorizontalRes::R256 => 0,
            HorizontalRes::R320 => 1 << 1,
            HorizontalRes::R512 => 2 << 1,
            HorizontalRes::R640 => 3 << 1,
            HorizontalRes::R368 => 1,
        }
    }
}

/// Display settings (GP1(08h))
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayMode {
    pub horizontal_res: HorizontalRes,
    /// 480 lines (only effective when interlaced)
    pub vertical_480: bool,
    /// PAL video timing
    pub pal: bool,
    /// 24-bit display area
    pub color_24bit: bool,
    pub interlaced: bool,
    /// "Reverse" flag (bit 7), reported in GPUSTAT bit 14
    pub reverse: bool,
}

impl DisplayMode {
    /// Decode a GP1(08h) parameter
    pub fn from_u32(value: u32) -> Self {
        Self {
            horizontal_res: HorizontalRes::from_fields(value, value & 0x40 != 0),
            vertical_480: value & 0x04 != 0,
            pal: value & 0x08 != 0,
            color_24bit: value & 0x10 != 0,
            interlaced: value & 0x20 != 0,
            reverse: value & 0x80 != 0,
        }
    }

    /// GPUSTAT bits 14 and 16-22
    pub(crate) fn status_bits(&self) -> u32 {
        let mut status = self.horizontal_res.status_bits() << 16;
        status |= (self.reverse as u32) << 14;
        status |= (self.vertical_480 as u32) << 19;
        status |= (self.pal as u32) << 20;
        status |= (self.color_24bit as u32) << 21;
        status |= (self.interlaced as u32) << 22;
        status
    }

    /// Lines shown per field
    pub fn height(&self) -> u16 {
        if self.interlaced && self.vertical_480 {
            480
        } else {
            240
        }
    }
}

/// GPU DMA direction (GP1(04h))
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DmaDirection {
    #[default]
    Off,
    Fifo,
    CpuToGp0,
    VramToCpu,
}

impl From<u32> for DmaDirection {
    fn from(value: u32) -> Self {
        match value & 3 {
            0 => DmaDirection::Off,
            1 => DmaDirection::Fifo,
            2 => DmaDirection::CpuToGp0,
            _ => DmaDirection::VramToCpu,
        }
    }
}

/// An in-progress CPU<->VRAM rectangle transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VramTransfer {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub current_x: u16,
    pub current_y: u16,
}

impl VramTransfer {
    /// Decode the coordinate and size words shared by A0h/C0h
    ///
    /// Sizes wrap the way the hardware does: 0 means the full extent.
    pub fn from_words(coords: u32, size: u32) -> Self {
        let width = (((size & 0xFFFF) as u16).wrapping_sub(1) & 0x3FF) + 1;
        let height = ((((size >> 16) & 0xFFFF) as u16).wrapping_sub(1) & 0x1FF) + 1;
        Self {
            x: (coords & 0x3FF) as u16,
            y: ((coords >> 16) & 0x1FF) as u16,
            width,
            height,
            current_x: 0,
            current_y: 0,
        }
    }

    /// VRAM position of the next pixel, then advance
    ///
    /// # Returns
    ///
    /// `None` once every pixel has been visited
    pub fn next_pixel(&mut self) -> Option<(u16, u16)> {
        if self.current_y >= self.height {
            return None;
        }
        let pos = (
            self.x.wrapping_add(self.current_x) & 0x3FF,
            self.y.wrapping_add(self.current_y) & 0x1FF,
        );
        self.current_x += 1;
        if self.current_x >= self.width {
            self.current_x = 0;
            self.current_y += 1;
        }
        Some(pos)
    }

    pub fn is_done(&self) -> bool {
        self.current_y >= self.height
    }
}

/// Snapshot of the displayed area, taken at vblank
///
/// Pixels are `0x00RRGGBB`, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}
