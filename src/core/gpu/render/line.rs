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
//! Line rasterization
//!
//! Lines are stepped one pixel at a time along the major axis with a
//! 16.16 fixed-point minor axis. Both endpoints are drawn.

use super::super::types::{BlendMode, Color};
use super::rasterizer::{RasterVertex, Rasterizer, Shading};

impl Rasterizer {
    /// Draw a line segment from `a` to `b`
    ///
    /// Segments spanning 1024 or more pixels horizontally, or 512 or more
    /// vertically, are dropped.
    pub fn draw_line(
        &self,
        vram: &mut [u16],
        a: RasterVertex,
        b: RasterVertex,
        shading: Shading,
        blend: Option<BlendMode>,
    ) {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        if dx.abs() >= 1024 || dy.abs() >= 512 {
            log::trace!("Dropping oversized line {:?} -> {:?}", a, b);
            return;
        }

        let steps = dx.abs().max(dy.abs());
        if steps == 0 {
            if self.in_clip(a.x, a.y) {
                self.plot(vram, a.x, a.y, a.color.to_rgb15(), blend);
            }
            return;
        }

        let step_x = (dx << 16) / steps;
        let step_y = (dy << 16) / steps;
        // Start at pixel centers so rounding is symmetric
        let mut fx = (a.x << 16) + 0x8000;
        let mut fy = (a.y << 16) + 0x8000;

        for i in 0..=steps {
            let x = fx >> 16;
            let y = fy >> 16;
            if self.in_clip(x, y) {
                let color = match shading {
                    Shading::Flat => a.color,
                    Shading::Gouraud => lerp_color(a.color, b.color, i, steps),
                };
                self.plot(vram, x, y, color.to_rgb15(), blend);
            }
            fx += step_x;
            fy += step_y;
        }
    }
}

fn lerp_color(from: Color, to: Color, i: i32, steps: i32) -> Color {
    let lerp = |a: u8, b: u8| -> u8 {
        let a = a as i32;
        let b = b as i32;
        (a + (b - a) * i / steps) as u8
    };
    Color {
        r: lerp(from.r, to.r),
        g: lerp(from.g, to.g),
        b: lerp(from.b, to.b),
    }
}
