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

//! PSX Timer/Counter Implementation
//!
//! The PlayStation has 3 timer channels that can count based on different clock sources
//! and generate interrupts when reaching target values or overflow.
//!
//! ## Timer Channels
//!
//! - **Timer 0**: System clock or pixel clock (GPU dot clock), synced to hblank
//! - **Timer 1**: System clock or horizontal blank, synced to vblank
//! - **Timer 2**: System clock or system clock / 8, no video sync
//!
//! ## Register Layout
//!
//! Each timer has 3 registers at 16-byte intervals:
//! - `0x1F801100 + (n * 0x10)`: Counter value (R/W)
//! - `0x1F801104 + (n * 0x10)`: Mode register (R/W)
//! - `0x1F801108 + (n * 0x10)`: Target value (R/W)
//!
//! ## Mode Register Format (16 bits)
//!
//! ```text
//! 15-13: Not used (always 0)
//! 12:    Reached max value (0xFFFF) - Read-only, reset on read
//! 11:    Reached target value - Read-only, reset on read
//! 10:    IRQ line (0=requested, 1=idle) - Read-only, set on mode write
//! 9:     Clock source bit 1
//! 8:     Clock source bit 0
//! 7:     IRQ pulse mode (0=pulse, 1=toggle)
//! 6:     IRQ repeat mode (0=one-shot, 1=repeat)
//! 5:     IRQ on max value (0xFFFF)
//! 4:     IRQ on target
//! 3:     Reset counter to 0 when target reached
//! 2-1:   Sync mode (meaning depends on timer)
//! 0:     Sync enable
//! ```
//!
//! ## References
//!
//! - [PSX-SPX: Timers](http://problemkaputt.de/psx-spx.htm#timers)

use crate::core::gpu::VideoSignals;
use serde::{Deserialize, Serialize};

/// Timer mode register fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerMode {
    /// Synchronization enable (bit 0)
    pub sync_enable: bool,

    /// Synchronization mode (bits 1-2)
    pub sync_mode: u8,

    /// Reset counter when target reached (bit 3)
    pub reset_on_target: bool,

    /// IRQ when counter == target (bit 4)
    pub irq_on_target: bool,

    /// IRQ when counter == 0xFFFF (bit 5)
    pub irq_on_max: bool,

    /// Repeat mode; one-shot otherwise (bit 6)
    pub irq_repeat: bool,

    /// Toggle mode; pulse otherwise (bit 7)
    pub irq_toggle: bool,

    /// Clock source (bits 8-9)
    pub clock_source: u8,
}

impl TimerMode {
    fn from_bits(value: u16) -> Self {
        Self {
            sync_enable: (value & 0x0001) != 0,
            sync_mode: ((value >> 1) & 0x03) as u8,
            reset_on_target: (value & 0x0008) != 0,
            irq_on_target: (value & 0x0010) != 0,
            irq_on_max: (value & 0x0020) != 0,
            irq_repeat: (value & 0x0040) != 0,
            irq_toggle: (value & 0x0080) != 0,
            clock_source: ((value >> 8) & 0x03) as u8,
        }
    }

    fn bits(&self) -> u16 {
        (self.sync_enable as u16)
            | ((self.sync_mode as u16) << 1)
            | ((self.reset_on_target as u16) << 3)
            | ((self.irq_on_target as u16) << 4)
            | ((self.irq_on_max as u16) << 5)
            | ((self.irq_repeat as u16) << 6)
            | ((self.irq_toggle as u16) << 7)
            | ((self.clock_source as u16) << 8)
    }
}

/// A single timer channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerChannel {
    /// Current counter value
    counter: u16,

    /// Mode configuration
    mode: TimerMode,

    /// Target value
    target: u16,

    /// Channel index (0-2)
    channel_id: u8,

    /// IRQ line as seen in mode bit 10 (true = idle)
    irq_line: bool,

    /// One-shot IRQ already delivered since the last mode write
    irq_fired: bool,

    /// Counter reached target since the last mode read
    reached_target: bool,

    /// Counter reached 0xFFFF since the last mode read
    reached_max: bool,

    /// Sync mode 3 has seen its first blank
    sync_latched: bool,
}

impl TimerChannel {
    /// Create a new timer channel
    ///
    /// # Arguments
    ///
    /// * `channel_id` - Timer index (0-2)
    pub fn new(channel_id: u8) -> Self {
        Self {
            counter: 0,
            mode: TimerMode::default(),
            target: 0,
            channel_id,
            irq_line: true,
            irq_fired: false,
            reached_target: false,
            reached_max: false,
            sync_latched: false,
        }
    }

    /// Read counter value
    #[inline(always)]
    pub fn read_counter(&self) -> u16 {
        self.counter
    }

    /// Write counter value
    pub fn write_counter(&mut self, value: u16) {
        self.counter = value;
        log::trace!("Timer {} counter = 0x{:04X}", self.channel_id, value);
    }

    /// Read mode register
    ///
    /// Reading acknowledges the reached-target and reached-max flags.
    pub fn read_mode(&mut self) -> u16 {
        let value = self.mode.bits()
            | ((self.irq_line as u16) << 10)
            | ((self.reached_target as u16) << 11)
            | ((self.reached_max as u16) << 12);

        self.reached_target = false;
        self.reached_max = false;

        value
    }

    /// Write mode register
    ///
    /// Resets the counter, releases the IRQ line and rearms one-shot IRQs.
    pub fn write_mode(&mut self, value: u16) {
        self.mode = TimerMode::from_bits(value);
        self.counter = 0;
        self.irq_line = true;
        self.irq_fired = false;
        self.sync_latched = false;

        log::debug!(
            "Timer {} mode: sync={}/{} source={} target_irq={} max_irq={} repeat={}",
            self.channel_id,
            self.mode.sync_enable,
            self.mode.sync_mode,
            self.mode.clock_source,
            self.mode.irq_on_target,
            self.mode.irq_on_max,
            self.mode.irq_repeat
        );
    }

    /// Read target value
    #[inline(always)]
    pub fn read_target(&self) -> u16 {
        self.target
    }

    /// Write target value
    pub fn write_target(&mut self, value: u16) {
        self.target = value;
        log::trace!("Timer {} target = 0x{:04X}", self.channel_id, value);
    }

    /// Current mode configuration
    pub fn mode(&self) -> &TimerMode {
        &self.mode
    }

    /// Advance the counter
    ///
    /// # Arguments
    ///
    /// * `ticks` - Number of clock-source ticks elapsed
    /// * `in_blank` - Sync signal level at the end of the period
    /// * `blank_started` - Whether the sync signal rose during the period
    ///
    /// # Returns
    ///
    /// `true` if the channel requested an interrupt
    pub fn tick(&mut self, ticks: u32, in_blank: bool, blank_started: bool) -> bool {
        if self.mode.sync_enable && self.channel_id != 2 && blank_started {
            match self.mode.sync_mode {
                1 | 2 => self.counter = 0,
                3 => {
                    // Free-run after the first blank
                    self.sync_latched = true;
                    self.mode.sync_enable = false;
                }
                _ => {}
            }
        }

        if !self.should_count(in_blank) {
            return false;
        }

        let mut irq = false;
        for _ in 0..ticks {
            self.counter = self.counter.wrapping_add(1);

            if self.counter == self.target {
                self.reached_target = true;
                if self.mode.irq_on_target {
                    irq |= self.trigger_irq();
                }
                if self.mode.reset_on_target {
                    self.counter = 0;
                    continue;
                }
            }

            if self.counter == 0xFFFF {
                self.reached_max = true;
                if self.mode.irq_on_max {
                    irq |= self.trigger_irq();
                }
            }
        }

        irq
    }

    fn should_count(&self, in_blank: bool) -> bool {
        if !self.mode.sync_enable {
            return true;
        }

        if self.channel_id == 2 {
            // Modes 0 and 3 stop the counter
            return matches!(self.mode.sync_mode, 1 | 2);
        }

        match self.mode.sync_mode {
            0 => !in_blank,
            1 => true,
            2 => in_blank,
            _ => self.sync_latched,
        }
    }

    fn trigger_irq(&mut self) -> bool {
        if self.irq_fired && !self.mode.irq_repeat {
            return false;
        }
        self.irq_fired = true;

        if self.mode.irq_toggle {
            self.irq_line = !self.irq_line;
            // Only the high-to-low edge reaches the interrupt controller
            if self.irq_line {
                return false;
            }
        } else {
            // Short pulse, line is back high before anyone can read it
            self.irq_line = true;
        }

        log::trace!("Timer {} IRQ", self.channel_id);
        true
    }

    /// Whether the IRQ line is currently asserted
    #[inline(always)]
    pub fn irq_asserted(&self) -> bool {
        !self.irq_line
    }
}

/// Timer block (3 channels)
///
/// # Example
///
/// ```
/// use psrx_core::core::gpu::VideoSignals;
/// use psrx_core::core::timer::Timers;
///
/// let mut timers = Timers::new();
/// timers.channel_mut(2).write_target(10);
/// timers.channel_mut(2).write_mode(0x0010);
///
/// let irqs = timers.tick(10, &VideoSignals::default());
/// assert!(irqs[2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timers {
    channels: [TimerChannel; 3],

    /// Sub-tick remainder for timer 2's system/8 source
    timer2_div_accum: u32,
}

impl Timers {
    /// Create the three channels at power-on state
    pub fn new() -> Self {
        Self {
            channels: [
                TimerChannel::new(0),
                TimerChannel::new(1),
                TimerChannel::new(2),
            ],
            timer2_div_accum: 0,
        }
    }

    /// Reset all channels
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Borrow a channel
    #[inline(always)]
    pub fn channel(&self, index: usize) -> &TimerChannel {
        &self.channels[index]
    }

    /// Mutably borrow a channel
    #[inline(always)]
    pub fn channel_mut(&mut self, index: usize) -> &mut TimerChannel {
        &mut self.channels[index]
    }

    /// Advance all timers
    ///
    /// # Arguments
    ///
    /// * `cycles` - CPU cycles elapsed
    /// * `video` - GPU timing signals produced over the same period
    ///
    /// # Returns
    ///
    /// Per-channel interrupt requests
    pub fn tick(&mut self, cycles: u32, video: &VideoSignals) -> [bool; 3] {
        let mut irqs = [false; 3];

        // Timer 0: sources 1 and 3 select the dot clock
        let t0_ticks = if self.channels[0].mode.clock_source & 0x01 != 0 {
            video.dots
        } else {
            cycles
        };
        irqs[0] = self.channels[0].tick(t0_ticks, video.in_hblank, video.hblanks > 0);

        // Timer 1: sources 1 and 3 select hblank
        let t1_ticks = if self.channels[1].mode.clock_source & 0x01 != 0 {
            video.hblanks
        } else {
            cycles
        };
        irqs[1] = self.channels[1].tick(t1_ticks, video.in_vblank, video.vblank_started);

        // Timer 2: sources 2 and 3 select system clock / 8
        let t2_ticks = if self.channels[2].mode.clock_source & 0x02 != 0 {
            self.timer2_div_accum += cycles;
            let whole = self.timer2_div_accum / 8;
            self.timer2_div_accum %= 8;
            whole
        } else {
            self.timer2_div_accum = 0;
            cycles
        };
        irqs[2] = self.channels[2].tick(t2_ticks, false, false);

        irqs
    }

    /// Read a timer register
    ///
    /// # Arguments
    ///
    /// * `offset` - Offset from 0x1F801100
    pub fn read(&mut self, offset: u32) -> u32 {
        let index = ((offset >> 4) & 0x3) as usize;
        if index > 2 {
            return 0;
        }
        let channel = &mut self.channels[index];
        match offset & 0xF {
            0x0 => channel.read_counter() as u32,
            0x4 => channel.read_mode() as u32,
            0x8 => channel.read_target() as u32,
            _ => 0,
        }
    }

    /// Write a timer register
    ///
    /// # Arguments
    ///
    /// * `offset` - Offset from 0x1F801100
    /// * `value` - Value written (upper 16 bits ignored)
    pub fn write(&mut self, offset: u32, value: u32) {
        let index = ((offset >> 4) & 0x3) as usize;
        if index > 2 {
            log::warn!("Write to nonexistent timer register +0x{:02X}", offset);
            return;
        }
        let channel = &mut self.channels[index];
        match offset & 0xF {
            0x0 => channel.write_counter(value as u16),
            0x4 => channel.write_mode(value as u16),
            0x8 => channel.write_target(value as u16),
            _ => {}
        }
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
