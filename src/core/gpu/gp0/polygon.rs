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
//! GP0 polygon drawing commands (0x20-0x3F)
//!
//! Word layout, per vertex: `[color] vertex [texcoord]`. The first color
//! shares the opcode word; flat polygons have no further colors. The first
//! texcoord word carries the CLUT in its upper half, the second carries the
//! texture page (which also updates the draw mode).

use super::super::render::{PrimitiveStyle, RasterVertex, Shading, TextureParams};
use super::super::types::{Color, TexCoord, Vertex};
use super::super::GPU;
use super::PolygonFlags;

impl GPU {
    pub(super) fn gp0_polygon(&mut self, flags: PolygonFlags, words: &[u32]) {
        let count = if flags.quad { 4 } else { 3 };
        let mut vertices = [RasterVertex::default(); 4];
        let mut clut = 0u16;
        let mut words = words.iter().copied();

        let mut color = Color::from_u32(words.next().unwrap_or(0));
        for (i, slot) in vertices.iter_mut().take(count).enumerate() {
            if flags.gouraud && i > 0 {
                color = Color::from_u32(words.next().unwrap_or(0));
            }
            let position = Vertex::from_u32(words.next().unwrap_or(0));
            let mut uv = TexCoord::default();
            if flags.textured {
                let word = words.next().unwrap_or(0);
                uv = TexCoord::from_u32(word);
                match i {
                    0 => clut = (word >> 16) as u16,
                    1 => self.draw_mode.set_texture_page(word >> 16),
                    _ => {}
                }
            }
            *slot = self.offset_vertex(position, color).with_uv(uv);
        }

        let style = PrimitiveStyle {
            shading: if flags.gouraud && !(flags.textured && flags.raw) {
                Shading::Gouraud
            } else {
                Shading::Flat
            },
            texture: flags.textured.then(|| {
                TextureParams::new(&self.draw_mode, clut, self.texture_window, flags.raw)
            }),
            blend: flags
                .semi_transparent
                .then_some(self.draw_mode.semi_transparency),
        };

        if flags.quad {
            self.rasterizer.draw_quad(&mut self.vram, vertices, &style);
        } else {
            self.rasterizer
                .draw_triangle(&mut self.vram, [vertices[0], vertices[1], vertices[2]], &style);
        }
    }

    /// Apply the drawing offset to a command vertex
    pub(super) fn offset_vertex(&self, position: Vertex, color: Color) -> RasterVertex {
        RasterVertex::new(
            position.x as i32 + self.draw_offset.0 as i32,
            position.y as i32 + self.draw_offset.1 as i32,
            color,
        )
    }
}
