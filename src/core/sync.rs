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

//! Cycle-debt accounting
//!
//! The scheduler owns a single monotonic cycle counter. Every peripheral
//! that runs on its own clock is identified by a [`SyncToken`] and keeps the
//! counter value at which it was last brought up to date. The difference
//! between the two is the number of cycles the peripheral is owed.
//!
//! # Flow
//!
//! ```text
//! CPU step (c cycles) -> charge(c) -> counter += c
//! redistribute         -> resync(token) returns the debt and clears it
//! ```
//!
//! Charging never touches a peripheral. Nothing but an explicit
//! [`Synchronizer::resync`] moves a peripheral's clock forward, which keeps
//! the ordering between CPU effects and peripheral effects deterministic.

use serde::{Deserialize, Serialize};

/// Peripherals tracked by the synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncToken {
    Gpu,
    Timers,
    Dma,
    CdRom,
    Pad,
}

impl SyncToken {
    /// Number of tokens
    pub const COUNT: usize = 5;

    /// Every token, in redistribution order
    ///
    /// The GPU goes first since timers 0 and 1 are clocked by its
    /// dot/hblank signals.
    pub const ALL: [SyncToken; Self::COUNT] = [
        SyncToken::Gpu,
        SyncToken::Timers,
        SyncToken::Dma,
        SyncToken::CdRom,
        SyncToken::Pad,
    ];
}

/// Scheduler cycle counter and per-peripheral sync dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synchronizer {
    /// Total CPU cycles charged since power-on
    cycle_counter: u64,

    /// Counter value at each peripheral's last resync
    last_sync: [u64; SyncToken::COUNT],
}

impl Synchronizer {
    /// Create a synchronizer with everything at cycle 0
    pub fn new() -> Self {
        Self {
            cycle_counter: 0,
            last_sync: [0; SyncToken::COUNT],
        }
    }

    /// Reset the counter and forget every debt
    pub fn reset(&mut self) {
        self.cycle_counter = 0;
        self.last_sync = [0; SyncToken::COUNT];
    }

    /// Current value of the scheduler cycle counter
    #[inline(always)]
    pub fn cycles(&self) -> u64 {
        self.cycle_counter
    }

    /// Charge `cycles` to the counter without advancing any peripheral
    #[inline(always)]
    pub fn charge(&mut self, cycles: u32) {
        self.cycle_counter += u64::from(cycles);
    }

    /// Cycles owed to `token` since its last resync
    #[inline(always)]
    pub fn debt(&self, token: SyncToken) -> u64 {
        self.cycle_counter - self.last_sync[token as usize]
    }

    /// Bring `token` up to date
    ///
    /// # Returns
    ///
    /// The number of cycles the peripheral must now be advanced by
    pub fn resync(&mut self, token: SyncToken) -> u32 {
        let elapsed = self.debt(token);
        self.last_sync[token as usize] = self.cycle_counter;
        // A single redistribution never covers more than a frame, so the
        // debt always fits; saturate anyway rather than wrap.
        u32::try_from(elapsed).unwrap_or(u32::MAX)
    }
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self::new()
    }
}
