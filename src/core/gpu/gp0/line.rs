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
//! GP0 line drawing commands (0x40-0x5F)

use super::super::render::{RasterVertex, Shading};
use super::super::types::{Color, Vertex};
use super::super::GPU;
use super::{LineFlags, POLYLINE_TERMINATOR};

impl GPU {
    /// Draw a line or polyline
    ///
    /// Polylines draw one segment per consecutive vertex pair; the
    /// terminator word is not a vertex.
    pub(super) fn gp0_line(&mut self, flags: LineFlags, words: &[u32]) {
        let blend = flags
            .semi_transparent
            .then_some(self.draw_mode.semi_transparency);
        let shading = if flags.gouraud {
            Shading::Gouraud
        } else {
            Shading::Flat
        };

        let mut points: Vec<RasterVertex> = Vec::with_capacity(words.len());
        let mut color = Color::from_u32(words[0]);
        let mut index = 1;
        while index < words.len() {
            if flags.gouraud && !points.is_empty() {
                let word = words[index];
                if flags.polyline && word & 0xF000_F000 == POLYLINE_TERMINATOR {
                    break;
                }
                color = Color::from_u32(word);
                index += 1;
            }
            let Some(&word) = words.get(index) else {
                break;
            };
            if flags.polyline && points.len() >= 2 && word & 0xF000_F000 == POLYLINE_TERMINATOR {
                break;
            }
            points.push(self.offset_vertex(Vertex::from_u32(word), color));
            index += 1;
        }

        for pair in points.windows(2) {
            self.rasterizer
                .draw_line(&mut self.vram, pair[0], pair[1], shading, blend);
        }
    }
}
