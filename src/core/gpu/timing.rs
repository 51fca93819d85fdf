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
//! Video timing
//!
//! The GPU runs from its own video clock (about 53.69MHz NTSC, 53.20MHz
//! PAL). CPU cycles are converted exactly, as a rational of the two crystal
//! frequencies, and the remainder is carried between calls so no time is
//! lost. Each scanline is a fixed number of video cycles; the dot clock is
//! the video clock divided by a resolution-dependent divider.
//!
//! | Standard | Lines | Video cycles/line |
//! |----------|-------|-------------------|
//! | NTSC     | 263   | 3413              |
//! | PAL      | 314   | 3406              |

use serde::{Deserialize, Serialize};

/// CPU clock in Hz
pub const CPU_CLOCK_HZ: u64 = 33_868_800;

/// Video clock in Hz, NTSC
pub const NTSC_VIDEO_CLOCK_HZ: u64 = 53_693_175;

/// Video clock in Hz, PAL
pub const PAL_VIDEO_CLOCK_HZ: u64 = 53_203_425;

/// Timing of one video standard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoStandard {
    pub lines_per_frame: u16,
    pub cycles_per_line: u32,
    pub clock_hz: u64,
    /// Display vertical range used when the programmed one is unusable
    pub default_vrange: (u16, u16),
}

pub const NTSC: VideoStandard = VideoStandard {
    lines_per_frame: 263,
    cycles_per_line: 3413,
    clock_hz: NTSC_VIDEO_CLOCK_HZ,
    default_vrange: (16, 256),
};

pub const PAL: VideoStandard = VideoStandard {
    lines_per_frame: 314,
    cycles_per_line: 3406,
    clock_hz: PAL_VIDEO_CLOCK_HZ,
    default_vrange: (35, 291),
};

impl VideoStandard {
    pub fn select(pal: bool) -> Self {
        if pal {
            PAL
        } else {
            NTSC
        }
    }

    /// CPU cycles in one full frame, rounded up
    pub fn cpu_cycles_per_frame(&self) -> u64 {
        let video = self.lines_per_frame as u64 * self.cycles_per_line as u64;
        (video * CPU_CLOCK_HZ).div_ceil(self.clock_hz)
    }
}

/// Timing signals produced by one GPU tick, consumed by the timers and
/// the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoSignals {
    /// Dot clock ticks elapsed
    pub dots: u32,
    /// Scanlines completed (hblank pulses)
    pub hblanks: u32,
    /// Beam is in horizontal blank at the end of the tick
    pub in_hblank: bool,
    /// Beam is in vertical blank at the end of the tick
    pub in_vblank: bool,
    /// Vertical blank was entered during the tick
    pub vblank_started: bool,
}

/// Beam position and clock-conversion remainders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct VideoClock {
    /// Current scanline
    pub line: u16,
    /// Video cycles into the current line
    pub line_cycle: u32,
    /// CPU-to-video conversion remainder, in units of 1/CPU_CLOCK_HZ
    fraction: u64,
    /// Video cycles not yet turned into dots
    dot_remainder: u32,
}

impl VideoClock {
    /// Convert CPU cycles to video cycles, carrying the remainder
    pub fn video_cycles(&mut self, cpu_cycles: u32, standard: &VideoStandard) -> u32 {
        let scaled = cpu_cycles as u64 * standard.clock_hz + self.fraction;
        self.fraction = scaled % CPU_CLOCK_HZ;
        (scaled / CPU_CLOCK_HZ) as u32
    }

    /// Convert video cycles to dots, carrying the remainder
    pub fn dots(&mut self, video_cycles: u32, divider: u32) -> u32 {
        let total = self.dot_remainder + video_cycles;
        self.dot_remainder = total % divider;
        total / divider
    }
}
