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
//! GP0 rectangle drawing commands (0x60-0x7F)
//!
//! Rectangles come in variable size and fixed 1×1, 8×8 and 16×16 sizes,
//! solid or textured. Textured rectangles sample the current texture page
//! and honor the draw mode's X/Y flip bits.
//!
//! ```text
//! Word 0: command + color
//! Word 1: top-left vertex
//! Word 2: texcoord + CLUT     (textured only)
//! Word 3: width + height      (variable size only)
//! ```

use super::super::render::{PrimitiveStyle, Shading, TextureParams};
use super::super::types::{Color, TexCoord, Vertex};
use super::super::GPU;
use super::{RectFlags, RectSize};

impl GPU {
    pub(super) fn gp0_rectangle(&mut self, flags: RectFlags, words: &[u32]) {
        let color = Color::from_u32(words[0]);
        let position = Vertex::from_u32(words[1]);
        let mut next = 2;

        let mut uv = TexCoord::default();
        let mut clut = 0u16;
        if flags.textured {
            uv = TexCoord::from_u32(words[next]);
            clut = (words[next] >> 16) as u16;
            next += 1;
        }

        let (width, height) = match flags.size {
            RectSize::Dot => (1, 1),
            RectSize::Sprite8 => (8, 8),
            RectSize::Sprite16 => (16, 16),
            RectSize::Variable => {
                let size = words[next];
                ((size & 0x3FF) as i32, ((size >> 16) & 0x1FF) as i32)
            }
        };

        let style = PrimitiveStyle {
            shading: Shading::Flat,
            texture: flags.textured.then(|| {
                TextureParams::new(&self.draw_mode, clut, self.texture_window, flags.raw)
            }),
            blend: flags
                .semi_transparent
                .then_some(self.draw_mode.semi_transparency),
        };
        let flip = (self.draw_mode.texture_x_flip, self.draw_mode.texture_y_flip);
        let origin = self.offset_vertex(position, color).with_uv(uv);

        self.rasterizer
            .draw_rect(&mut self.vram, origin, width, height, flip, &style);
    }
}
