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
//! Texture sampling
//!
//! Textures live in VRAM as 256x256 texel pages. 4-bit and 8-bit pages hold
//! indices into a color lookup table (CLUT) that is itself a row of 16 or
//! 256 pixels somewhere in VRAM; 15-bit pages hold colors directly.

use super::super::types::{DrawMode, TextureDepth, TextureWindow};
use super::super::GPU;

/// Everything needed to sample a texel for one primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureParams {
    /// Page origin in VRAM pixels
    pub page_x: u16,
    pub page_y: u16,
    pub depth: TextureDepth,
    /// CLUT origin in VRAM pixels
    pub clut_x: u16,
    pub clut_y: u16,
    pub window: TextureWindow,
    /// Raw texture: texels are not modulated by the vertex color
    pub raw: bool,
}

impl TextureParams {
    /// Build parameters from a draw mode and a CLUT attribute
    ///
    /// The CLUT attribute is the upper half of the first texcoord word:
    /// X in 16-pixel units in bits 0-5, Y in bits 6-14.
    pub fn new(mode: &DrawMode, clut: u16, window: TextureWindow, raw: bool) -> Self {
        let (page_x, page_y) = mode.texture_page_origin();
        Self {
            page_x,
            page_y,
            depth: mode.texture_depth,
            clut_x: (clut & 0x3F) * 16,
            clut_y: (clut >> 6) & 0x1FF,
            window,
            raw,
        }
    }

    /// Fetch the texel at (u, v)
    ///
    /// Returns the raw 16-bit VRAM value; 0x0000 means fully transparent.
    pub fn fetch(&self, vram: &[u16], u: u8, v: u8) -> u16 {
        let (u, v) = self.window.apply(u, v);
        let (u, v) = (u as u16, v as u16);
        let y = self.page_y + v;

        match self.depth {
            TextureDepth::T4Bit => {
                let word = vram_at(vram, self.page_x + u / 4, y);
                let index = (word >> ((u % 4) * 4)) & 0xF;
                vram_at(vram, self.clut_x + index, self.clut_y)
            }
            TextureDepth::T8Bit => {
                let word = vram_at(vram, self.page_x + u / 2, y);
                let index = (word >> ((u % 2) * 8)) & 0xFF;
                vram_at(vram, self.clut_x + index, self.clut_y)
            }
            TextureDepth::T15Bit => vram_at(vram, self.page_x + u, y),
        }
    }
}

/// Read a VRAM pixel with coordinate wrapping
#[inline(always)]
fn vram_at(vram: &[u16], x: u16, y: u16) -> u16 {
    let index = ((y & 0x1FF) as usize) * GPU::VRAM_WIDTH + (x & 0x3FF) as usize;
    vram.get(index).copied().unwrap_or(0)
}

/// Modulate a texel by a vertex color
///
/// A color component of 0x80 leaves the texel unchanged; the result
/// saturates at 31. The texel's mask bit is kept.
#[inline(always)]
pub(super) fn modulate(texel: u16, r: u8, g: u8, b: u8) -> u16 {
    let channel = |shift: u16, c: u8| -> u16 {
        let t = (texel >> shift) & 0x1F;
        ((t as u32 * c as u32) >> 7).min(31) as u16
    };
    (texel & 0x8000) | channel(0, r) | (channel(5, g) << 5) | (channel(10, b) << 10)
}
