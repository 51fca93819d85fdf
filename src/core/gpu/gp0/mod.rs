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
//! GP0 command decoding and dispatch
//!
//! Every GP0 opcode decodes to one variant of [`Gp0Command`]. The variant
//! knows how many words the command occupies, which is what lets the GPU
//! hold a partially received command until the rest arrives.
//!
//! | Opcode    | Command                          |
//! |-----------|----------------------------------|
//! | 0x00      | NOP                              |
//! | 0x01      | Clear texture cache              |
//! | 0x02      | Fill rectangle                   |
//! | 0x1F      | Interrupt request                |
//! | 0x20-0x3F | Polygon                          |
//! | 0x40-0x5F | Line / polyline                  |
//! | 0x60-0x7F | Rectangle                        |
//! | 0x80-0x9F | VRAM→VRAM copy                   |
//! | 0xA0-0xBF | CPU→VRAM transfer                |
//! | 0xC0-0xDF | VRAM→CPU transfer                |
//! | 0xE1-0xE6 | Drawing environment              |

mod drawing_mode;
mod line;
mod polygon;
mod rectangle;
mod transfer;

use super::GPU;

/// Polyline terminator, matched against `word & 0xF000F000`
const POLYLINE_TERMINATOR: u32 = 0x5000_5000;

/// Attributes shared by polygon opcodes (0x20-0x3F)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolygonFlags {
    pub gouraud: bool,
    pub quad: bool,
    pub textured: bool,
    pub semi_transparent: bool,
    /// Texture without color modulation
    pub raw: bool,
}

impl PolygonFlags {
    fn vertices(&self) -> usize {
        if self.quad {
            4
        } else {
            3
        }
    }
}

/// Attributes shared by line opcodes (0x40-0x5F)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFlags {
    pub gouraud: bool,
    pub polyline: bool,
    pub semi_transparent: bool,
}

/// Rectangle size selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectSize {
    /// Width and height from an extra word
    Variable,
    Dot,
    Sprite8,
    Sprite16,
}

/// Attributes shared by rectangle opcodes (0x60-0x7F)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectFlags {
    pub size: RectSize,
    pub textured: bool,
    pub semi_transparent: bool,
    pub raw: bool,
}

/// A decoded GP0 command
///
/// # Examples
///
/// ```
/// use psrx_core::core::gpu::Gp0Command;
///
/// // Gouraud-shaded textured quad: 1 + 4 * 3 - 1 words
/// let command = Gp0Command::decode(0x3C00_0000);
/// assert_eq!(command.len(), 12);
///
/// assert_eq!(Gp0Command::decode(0x0200_0000), Gp0Command::FillRect);
/// assert_eq!(Gp0Command::FillRect.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gp0Command {
    Nop,
    ClearCache,
    FillRect,
    InterruptRequest,
    Polygon(PolygonFlags),
    Line(LineFlags),
    Rectangle(RectFlags),
    VramToVram,
    CpuToVram,
    VramToCpu,
    DrawMode,
    TextureWindow,
    DrawAreaTopLeft,
    DrawAreaBottomRight,
    DrawOffset,
    MaskSettings,
    /// Unassigned opcode, consumed as a single word
    Unknown(u8),
}

impl Gp0Command {
    /// Decode the opcode in bits 24-31 of a command word
    pub fn decode(word: u32) -> Self {
        let opcode = (word >> 24) as u8;
        let bit = |n: u8| opcode & (1 << n) != 0;

        match opcode {
            0x00 => Gp0Command::Nop,
            0x01 => Gp0Command::ClearCache,
            0x02 => Gp0Command::FillRect,
            0x1F => Gp0Command::InterruptRequest,
            0x20..=0x3F => Gp0Command::Polygon(PolygonFlags {
                gouraud: bit(4),
                quad: bit(3),
                textured: bit(2),
                semi_transparent: bit(1),
                raw: bit(0),
            }),
            0x40..=0x5F => Gp0Command::Line(LineFlags {
                gouraud: bit(4),
                polyline: bit(3),
                semi_transparent: bit(1),
            }),
            0x60..=0x7F => Gp0Command::Rectangle(RectFlags {
                size: match (opcode >> 3) & 3 {
                    0 => RectSize::Variable,
                    1 => RectSize::Dot,
                    2 => RectSize::Sprite8,
                    _ => RectSize::Sprite16,
                },
                textured: bit(2),
                semi_transparent: bit(1),
                raw: bit(0),
            }),
            0x80..=0x9F => Gp0Command::VramToVram,
            0xA0..=0xBF => Gp0Command::CpuToVram,
            0xC0..=0xDF => Gp0Command::VramToCpu,
            0xE1 => Gp0Command::DrawMode,
            0xE2 => Gp0Command::TextureWindow,
            0xE3 => Gp0Command::DrawAreaTopLeft,
            0xE4 => Gp0Command::DrawAreaBottomRight,
            0xE5 => Gp0Command::DrawOffset,
            0xE6 => Gp0Command::MaskSettings,
            other => Gp0Command::Unknown(other),
        }
    }

    /// Number of words in the command, including the opcode word
    ///
    /// For polylines this is the minimum (two vertices); the command ends
    /// at the terminator word.
    pub fn len(&self) -> usize {
        match self {
            Gp0Command::FillRect | Gp0Command::CpuToVram | Gp0Command::VramToCpu => 3,
            Gp0Command::VramToVram => 4,
            Gp0Command::Polygon(flags) => {
                let n = flags.vertices();
                let per_vertex = 1 + flags.textured as usize;
                let colors = if flags.gouraud { n - 1 } else { 0 };
                1 + n * per_vertex + colors
            }
            Gp0Command::Line(flags) => {
                if flags.gouraud {
                    4
                } else {
                    3
                }
            }
            Gp0Command::Rectangle(flags) => {
                2 + flags.textured as usize + (flags.size == RectSize::Variable) as usize
            }
            _ => 1,
        }
    }

    /// Always false; every command has at least its opcode word
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// The command held in `words`, if all of its words have arrived
pub(super) fn complete_command(words: &[u32]) -> Option<Gp0Command> {
    let first = *words.first()?;
    let command = Gp0Command::decode(first);

    if let Gp0Command::Line(flags) = command {
        if flags.polyline {
            return polyline_terminated(words, flags.gouraud).then_some(command);
        }
    }

    (words.len() >= command.len()).then_some(command)
}

/// A polyline ends with a terminator in a vertex-or-color slot after the
/// second vertex
fn polyline_terminated(words: &[u32], gouraud: bool) -> bool {
    let Some(&last) = words.last() else {
        return false;
    };
    let index = words.len() - 1;
    let first_slot = if gouraud { 4 } else { 3 };
    let in_slot = if gouraud { index % 2 == 0 } else { true };
    index >= first_slot && in_slot && last & 0xF000_F000 == POLYLINE_TERMINATOR
}

impl GPU {
    /// Run a complete command
    pub(in crate::core::gpu) fn execute_gp0(&mut self, command: Gp0Command, words: &[u32]) {
        log::trace!("GP0 {:?} ({} words)", command, words.len());

        match command {
            Gp0Command::Nop | Gp0Command::ClearCache => {}
            Gp0Command::FillRect => self.gp0_fill_rectangle(words),
            Gp0Command::InterruptRequest => self.request_irq(),
            Gp0Command::Polygon(flags) => self.gp0_polygon(flags, words),
            Gp0Command::Line(flags) => self.gp0_line(flags, words),
            Gp0Command::Rectangle(flags) => self.gp0_rectangle(flags, words),
            Gp0Command::VramToVram => self.gp0_vram_to_vram_transfer(words),
            Gp0Command::CpuToVram => self.gp0_cpu_to_vram_transfer(words),
            Gp0Command::VramToCpu => self.gp0_vram_to_cpu_transfer(words),
            Gp0Command::DrawMode => self.gp0_draw_mode(words[0]),
            Gp0Command::TextureWindow => self.gp0_texture_window(words[0]),
            Gp0Command::DrawAreaTopLeft => self.gp0_draw_area_top_left(words[0]),
            Gp0Command::DrawAreaBottomRight => self.gp0_draw_area_bottom_right(words[0]),
            Gp0Command::DrawOffset => self.gp0_draw_offset(words[0]),
            Gp0Command::MaskSettings => self.gp0_mask_settings(words[0]),
            Gp0Command::Unknown(opcode) => {
                log::warn!("Unimplemented GP0 command: 0x{:02X}", opcode);
            }
        }
    }
}
