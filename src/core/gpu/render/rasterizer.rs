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
//! Software Rasterizer
//!
//! Converts primitives into VRAM pixels.
//!
//! # Fill convention
//!
//! Triangles are filled with edge functions evaluated at integer pixel
//! coordinates. A pixel that lies exactly on an edge is drawn only if that
//! edge is a top edge (horizontal, interior below) or a left edge. Two
//! triangles that share an edge therefore never both draw, and never both
//! skip, a pixel on it. Rectangles follow the same rule: the left column
//! and top row are drawn, the right column and bottom row are not.
//!
//! # Pixel pipeline
//!
//! 1. Clip to the drawing area
//! 2. Sample the texture (texel 0x0000 is transparent)
//! 3. Modulate by the vertex color unless the texture is raw
//! 4. Skip the pixel if mask checking is on and the target has bit 15 set
//! 5. Blend with the target if the primitive is semi-transparent (for
//!    textured primitives, only texels with bit 15 set are blended)
//! 6. Force bit 15 if mask setting is on
//!
//! # References
//!
//! - [PSX-SPX: GPU Rendering](http://problemkaputt.de/psx-spx.htm#gpurenderpolygoncommands)

use super::super::types::{BlendMode, Color, DrawingArea, MaskSettings, TexCoord};
use super::super::GPU;
use super::texture::{modulate, TextureParams};
use serde::{Deserialize, Serialize};

/// Color interpolation across a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// First vertex color everywhere
    Flat,
    /// Gouraud interpolation of the vertex colors
    Gouraud,
}

/// Per-primitive rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveStyle {
    pub shading: Shading,
    pub texture: Option<TextureParams>,
    /// Semi-transparency equation, `None` for opaque primitives
    pub blend: Option<BlendMode>,
}

impl PrimitiveStyle {
    /// Opaque, untextured, flat
    pub fn flat() -> Self {
        Self {
            shading: Shading::Flat,
            texture: None,
            blend: None,
        }
    }
}

/// A vertex after the drawing offset has been applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RasterVertex {
    pub x: i32,
    pub y: i32,
    pub color: Color,
    pub uv: TexCoord,
}

impl RasterVertex {
    pub fn new(x: i32, y: i32, color: Color) -> Self {
        Self {
            x,
            y,
            color,
            uv: TexCoord::default(),
        }
    }

    pub fn with_uv(mut self, uv: TexCoord) -> Self {
        self.uv = uv;
        self
    }
}

/// One triangle edge in edge-function form
struct Edge {
    /// Change of the edge function per +1 in x / y
    step_x: i32,
    step_y: i32,
    /// Value at (0, 0)
    origin: i32,
    /// Pixels exactly on the edge belong to this triangle
    inclusive: bool,
}

impl Edge {
    /// Edge from `a` to `b` of a triangle with positive orientation
    fn new(a: &RasterVertex, b: &RasterVertex) -> Self {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        Self {
            step_x: -dy,
            step_y: dx,
            origin: dy * a.x - dx * a.y,
            inclusive: dy < 0 || (dy == 0 && dx > 0),
        }
    }

    #[inline(always)]
    fn at(&self, x: i32, y: i32) -> i32 {
        self.origin + self.step_x * x + self.step_y * y
    }

    #[inline(always)]
    fn covers(&self, w: i32) -> bool {
        w > 0 || (w == 0 && self.inclusive)
    }
}

/// Twice the signed area of (a, b, c); positive when clockwise on screen
#[inline(always)]
fn orient2d(a: &RasterVertex, b: &RasterVertex, c: &RasterVertex) -> i32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Triangle rasterizer and pixel writer
///
/// # Examples
///
/// ```
/// use psrx_core::core::gpu::{Color, PrimitiveStyle, RasterVertex, Rasterizer};
///
/// let mut vram = vec![0u16; 1024 * 512];
/// let rasterizer = Rasterizer::new();
///
/// let red = Color { r: 0xFF, g: 0, b: 0 };
/// rasterizer.draw_triangle(
///     &mut vram,
///     [
///         RasterVertex::new(100, 100, red),
///         RasterVertex::new(200, 100, red),
///         RasterVertex::new(150, 200, red),
///     ],
///     &PrimitiveStyle::flat(),
/// );
/// assert_eq!(vram[120 * 1024 + 150], 0x001F);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rasterizer {
    /// Inclusive clip rectangle: (left, top, right, bottom)
    clip_rect: (i32, i32, i32, i32),
    mask: MaskSettings,
}

impl Rasterizer {
    /// Largest triangle/line extent the hardware accepts
    const MAX_WIDTH: i32 = 1024;
    const MAX_HEIGHT: i32 = 512;

    /// Create a rasterizer clipping to the full VRAM
    pub fn new() -> Self {
        Self {
            clip_rect: (0, 0, 1023, 511),
            mask: MaskSettings::default(),
        }
    }

    /// Clip to a drawing area (inclusive)
    pub fn set_clip_rect(&mut self, area: &DrawingArea) {
        self.clip_rect = (
            area.left.min(1023) as i32,
            area.top.min(511) as i32,
            area.right.min(1023) as i32,
            area.bottom.min(511) as i32,
        );
    }

    pub fn set_mask(&mut self, mask: MaskSettings) {
        self.mask = mask;
    }

    pub fn mask(&self) -> MaskSettings {
        self.mask
    }

    #[inline(always)]
    pub(super) fn in_clip(&self, x: i32, y: i32) -> bool {
        let (left, top, right, bottom) = self.clip_rect;
        x >= left && x <= right && y >= top && y <= bottom
    }

    /// Rasterize a triangle
    ///
    /// Vertex order does not matter. Degenerate triangles draw nothing;
    /// triangles wider than 1023 or taller than 511 pixels are dropped
    /// entirely, as on hardware.
    pub fn draw_triangle(
        &self,
        vram: &mut [u16],
        vertices: [RasterVertex; 3],
        style: &PrimitiveStyle,
    ) {
        let [a, mut b, mut c] = vertices;

        let mut area = orient2d(&a, &b, &c);
        if area == 0 {
            return;
        }
        if area < 0 {
            std::mem::swap(&mut b, &mut c);
            area = -area;
        }

        let min_x = a.x.min(b.x).min(c.x);
        let max_x = a.x.max(b.x).max(c.x);
        let min_y = a.y.min(b.y).min(c.y);
        let max_y = a.y.max(b.y).max(c.y);

        if max_x - min_x >= Self::MAX_WIDTH || max_y - min_y >= Self::MAX_HEIGHT {
            log::trace!("Dropping oversized triangle {:?}", vertices);
            return;
        }

        let (left, top, right, bottom) = self.clip_rect;
        let x_start = min_x.max(left);
        let x_end = max_x.min(right);
        let y_start = min_y.max(top);
        let y_end = max_y.min(bottom);
        if x_start > x_end || y_start > y_end {
            return;
        }

        // Edge k is opposite vertex k, so its value is that vertex's weight
        let edges = [Edge::new(&b, &c), Edge::new(&c, &a), Edge::new(&a, &b)];
        let verts = [a, b, c];
        let area = area as i64;

        for y in y_start..=y_end {
            let mut w = [
                edges[0].at(x_start, y),
                edges[1].at(x_start, y),
                edges[2].at(x_start, y),
            ];

            for x in x_start..=x_end {
                if edges[0].covers(w[0]) && edges[1].covers(w[1]) && edges[2].covers(w[2]) {
                    let color = match style.shading {
                        Shading::Flat => verts[0].color,
                        Shading::Gouraud => interpolate_color(&verts, &w, area),
                    };
                    let uv = if style.texture.is_some() {
                        interpolate_uv(&verts, &w, area)
                    } else {
                        TexCoord::default()
                    };
                    self.shade(vram, x, y, color, uv, style);
                }
                w[0] += edges[0].step_x;
                w[1] += edges[1].step_x;
                w[2] += edges[2].step_x;
            }
        }
    }

    /// Rasterize a quad as the triangles (v0, v1, v2) and (v1, v2, v3)
    pub fn draw_quad(&self, vram: &mut [u16], vertices: [RasterVertex; 4], style: &PrimitiveStyle) {
        self.draw_triangle(vram, [vertices[0], vertices[1], vertices[2]], style);
        self.draw_triangle(vram, [vertices[1], vertices[2], vertices[3]], style);
    }

    /// Rasterize an axis-aligned rectangle
    ///
    /// Texture coordinates advance by one texel per pixel from `origin.uv`,
    /// backwards on a flipped axis.
    pub fn draw_rect(
        &self,
        vram: &mut [u16],
        origin: RasterVertex,
        width: i32,
        height: i32,
        flip: (bool, bool),
        style: &PrimitiveStyle,
    ) {
        let (left, top, right, bottom) = self.clip_rect;
        let x_start = origin.x.max(left);
        let x_end = (origin.x + width - 1).min(right);
        let y_start = origin.y.max(top);
        let y_end = (origin.y + height - 1).min(bottom);

        for y in y_start..=y_end {
            let dv = (y - origin.y) as u8;
            let v = if flip.1 {
                origin.uv.v.wrapping_sub(dv)
            } else {
                origin.uv.v.wrapping_add(dv)
            };
            for x in x_start..=x_end {
                let du = (x - origin.x) as u8;
                let u = if flip.0 {
                    origin.uv.u.wrapping_sub(du)
                } else {
                    origin.uv.u.wrapping_add(du)
                };
                self.shade(vram, x, y, origin.color, TexCoord { u, v }, style);
            }
        }
    }

    /// Color and texture one covered pixel, then write it
    #[inline(always)]
    pub(super) fn shade(
        &self,
        vram: &mut [u16],
        x: i32,
        y: i32,
        color: Color,
        uv: TexCoord,
        style: &PrimitiveStyle,
    ) {
        match style.texture {
            Some(texture) => {
                let texel = texture.fetch(vram, uv.u, uv.v);
                if texel == 0 {
                    return;
                }
                let out = if texture.raw {
                    texel
                } else {
                    modulate(texel, color.r, color.g, color.b)
                };
                let blend = if texel & 0x8000 != 0 { style.blend } else { None };
                self.plot(vram, x, y, out, blend);
            }
            None => self.plot(vram, x, y, color.to_rgb15(), style.blend),
        }
    }

    /// Write one pixel through the mask and blending rules
    #[inline(always)]
    pub(super) fn plot(&self, vram: &mut [u16], x: i32, y: i32, color: u16, blend: Option<BlendMode>) {
        let index = ((y & 0x1FF) as usize) * GPU::VRAM_WIDTH + (x & 0x3FF) as usize;
        let Some(target) = vram.get_mut(index) else {
            return;
        };

        let back = *target;
        if self.mask.check_mask && back & 0x8000 != 0 {
            return;
        }

        let mut out = match blend {
            Some(mode) => blend_pixel(back, color, mode) | (color & 0x8000),
            None => color,
        };
        if self.mask.set_mask {
            out |= 0x8000;
        }
        *target = out;
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply a semi-transparency equation to two 5-5-5 pixels
///
/// The result has bit 15 clear.
pub(crate) fn blend_pixel(back: u16, front: u16, mode: BlendMode) -> u16 {
    let channel = |shift: u16| -> u16 {
        let b = ((back >> shift) & 0x1F) as i32;
        let f = ((front >> shift) & 0x1F) as i32;
        let out = match mode {
            BlendMode::Average => (b + f) >> 1,
            BlendMode::Add => b + f,
            BlendMode::Subtract => b - f,
            BlendMode::AddQuarter => b + (f >> 2),
        };
        out.clamp(0, 31) as u16
    };
    channel(0) | (channel(5) << 5) | (channel(10) << 10)
}

#[inline(always)]
fn interpolate(values: [u8; 3], w: &[i32; 3], area: i64) -> u8 {
    let sum = values[0] as i64 * w[0] as i64
        + values[1] as i64 * w[1] as i64
        + values[2] as i64 * w[2] as i64;
    (sum / area).clamp(0, 255) as u8
}

fn interpolate_color(v: &[RasterVertex; 3], w: &[i32; 3], area: i64) -> Color {
    Color {
        r: interpolate([v[0].color.r, v[1].color.r, v[2].color.r], w, area),
        g: interpolate([v[0].color.g, v[1].color.g, v[2].color.g], w, area),
        b: interpolate([v[0].color.b, v[1].color.b, v[2].color.b], w, area),
    }
}

fn interpolate_uv(v: &[RasterVertex; 3], w: &[i32; 3], area: i64) -> TexCoord {
    TexCoord {
        u: interpolate([v[0].uv.u, v[1].uv.u, v[2].uv.u], w, area),
        v: interpolate([v[0].uv.v, v[1].uv.v, v[2].uv.v], w, area),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color {
        r: 0xFF,
        g: 0xFF,
        b: 0xFF,
    };

    fn vram() -> Vec<u16> {
        vec![0u16; GPU::VRAM_SIZE]
    }

    fn at(vram: &[u16], x: usize, y: usize) -> u16 {
        vram[y * GPU::VRAM_WIDTH + x]
    }

    fn v(x: i32, y: i32) -> RasterVertex {
        RasterVertex::new(x, y, WHITE)
    }

    fn count_drawn(vram: &[u16]) -> usize {
        vram.iter().filter(|&&p| p != 0).count()
    }

    #[test]
    fn test_right_triangle_coverage() {
        let mut vram = vram();
        Rasterizer::new().draw_triangle(&mut vram, [v(0, 0), v(10, 0), v(0, 10)], &PrimitiveStyle::flat());

        // Pixels with x + y < 10 (top and left edges included, hypotenuse excluded)
        assert_eq!(count_drawn(&vram), 55);
        assert_ne!(at(&vram, 0, 0), 0);
        assert_ne!(at(&vram, 9, 0), 0);
        assert_eq!(at(&vram, 10, 0), 0);
        assert_eq!(at(&vram, 5, 5), 0);
    }

    #[test]
    fn test_winding_does_not_matter() {
        let mut cw = vram();
        let mut ccw = vram();
        let r = Rasterizer::new();
        r.draw_triangle(&mut cw, [v(3, 1), v(40, 9), v(12, 30)], &PrimitiveStyle::flat());
        r.draw_triangle(&mut ccw, [v(3, 1), v(12, 30), v(40, 9)], &PrimitiveStyle::flat());
        assert_eq!(cw, ccw);
    }

    #[test]
    fn test_shared_edge_no_gap_no_overlap() {
        // Two triangles splitting a quad along a slanted diagonal. Additive
        // blending turns any double-drawn pixel into a brighter value.
        let mut vram = vram();
        let r = Rasterizer::new();
        let dim = Color { r: 8, g: 8, b: 8 };
        let style = PrimitiveStyle {
            blend: Some(BlendMode::Add),
            ..PrimitiveStyle::flat()
        };
        let p = |x, y| RasterVertex::new(x, y, dim);

        r.draw_triangle(&mut vram, [p(10, 10), p(50, 13), p(17, 40)], &style);
        r.draw_triangle(&mut vram, [p(50, 13), p(17, 40), p(61, 45)], &style);

        let single = dim.to_rgb15();
        for y in 0..60 {
            for x in 0..70 {
                let px = at(&vram, x, y);
                assert!(px == 0 || px == single, "pixel ({}, {}) drawn twice", x, y);
            }
        }

        // Every pixel strictly inside the quad along the diagonal is drawn
        for t in 1..20 {
            let x = 50 - (33 * t) / 20;
            let y = 13 + (27 * t) / 20;
            assert_eq!(at(&vram, x as usize, y as usize), single, "gap at ({}, {})", x, y);
        }
    }

    #[test]
    fn test_clipping() {
        let mut vram = vram();
        let mut r = Rasterizer::new();
        r.set_clip_rect(&DrawingArea {
            left: 100,
            top: 100,
            right: 200,
            bottom: 200,
        });

        r.draw_triangle(&mut vram, [v(50, 50), v(250, 150), v(150, 250)], &PrimitiveStyle::flat());

        assert_eq!(at(&vram, 99, 150), 0);
        assert_eq!(at(&vram, 150, 201), 0);
        assert_ne!(at(&vram, 150, 150), 0);
    }

    #[test]
    fn test_degenerate_and_oversized() {
        let mut vram = vram();
        let r = Rasterizer::new();

        r.draw_triangle(&mut vram, [v(10, 10), v(20, 10), v(15, 10)], &PrimitiveStyle::flat());
        r.draw_triangle(&mut vram, [v(0, 0), v(1024, 0), v(0, 10)], &PrimitiveStyle::flat());
        r.draw_triangle(&mut vram, [v(-100, -100), v(900, 100), v(500, 412)], &PrimitiveStyle::flat());
        assert_eq!(count_drawn(&vram), 0);

        // Negative coordinates are clipped, not wrapped
        r.draw_triangle(&mut vram, [v(-20, -20), v(25, -20), v(-20, 25)], &PrimitiveStyle::flat());
        assert_ne!(at(&vram, 0, 0), 0);
        assert_eq!(at(&vram, 1023, 511), 0);
    }

    #[test]
    fn test_gouraud_interpolation() {
        let mut vram = vram();
        let style = PrimitiveStyle {
            shading: Shading::Gouraud,
            ..PrimitiveStyle::flat()
        };
        let black = Color::default();
        let red = Color { r: 0xF8, g: 0, b: 0 };
        Rasterizer::new().draw_triangle(
            &mut vram,
            [
                RasterVertex::new(0, 0, black),
                RasterVertex::new(0, 100, black),
                RasterVertex::new(100, 0, red),
            ],
            &style,
        );

        let near_black = at(&vram, 1, 1) & 0x1F;
        let mid = at(&vram, 50, 0) & 0x1F;
        assert!(near_black <= 1);
        assert!((14..=16).contains(&mid));
    }

    #[test]
    fn test_rect_edges() {
        let mut vram = vram();
        Rasterizer::new().draw_rect(&mut vram, v(4, 4), 3, 2, (false, false), &PrimitiveStyle::flat());

        assert_eq!(count_drawn(&vram), 6);
        assert_ne!(at(&vram, 4, 4), 0);
        assert_ne!(at(&vram, 6, 5), 0);
        assert_eq!(at(&vram, 7, 4), 0);
        assert_eq!(at(&vram, 4, 6), 0);
    }

    #[test]
    fn test_blend_modes() {
        let back = (20 << 10) | (10 << 5) | 4;
        let front = (8 << 10) | (30 << 5) | 8;

        assert_eq!(blend_pixel(back, front, BlendMode::Average), (14 << 10) | (20 << 5) | 6);
        assert_eq!(blend_pixel(back, front, BlendMode::Add), (28 << 10) | (31 << 5) | 12);
        assert_eq!(blend_pixel(back, front, BlendMode::Subtract), (12 << 10) | 0);
        assert_eq!(blend_pixel(back, front, BlendMode::AddQuarter), (22 << 10) | (17 << 5) | 6);
    }

    #[test]
    fn test_mask_check_and_set() {
        let mut vram = vram();
        vram[0] = 0x8001;
        let mut r = Rasterizer::new();
        r.set_mask(MaskSettings {
            set_mask: true,
            check_mask: true,
        });

        r.plot(&mut vram, 0, 0, 0x001F, None);
        r.plot(&mut vram, 1, 0, 0x001F, None);

        assert_eq!(vram[0], 0x8001);
        assert_eq!(vram[1], 0x801F);
    }
}
