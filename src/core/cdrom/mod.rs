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
//! CD-ROM controller
//!
//! Register-level model of the CD-ROM controller: the index/status port,
//! parameter and response FIFOs, interrupt flag/enable registers, and the
//! sector data FIFO fed by a host-provided [`DiscReader`].
//!
//! Commands answer through timed replies. The first reply (INT3, or INT5
//! on error) arrives a fixed delay after the command byte is written; a
//! second reply (INT2) follows for commands that do background work. A
//! reply is only delivered once the previous interrupt was acknowledged.
//!
//! # Commands
//!
//! | Command | Name    | Replies                      |
//! |---------|---------|------------------------------|
//! | 0x01    | GetStat | INT3(stat)                   |
//! | 0x02    | SetLoc  | INT3(stat)                   |
//! | 0x06    | ReadN   | INT3(stat), INT1 per sector  |
//! | 0x09    | Pause   | INT3(stat), INT2(stat)       |
//! | 0x0A    | Init    | INT3(stat), INT2(stat)       |
//! | 0x0B    | Mute    | INT3(stat)                   |
//! | 0x0C    | Demute  | INT3(stat)                   |
//! | 0x0E    | SetMode | INT3(stat)                   |
//! | 0x13    | GetTN   | INT3(stat, first, last)      |
//! | 0x14    | GetTD   | INT3(stat, mm, ss)           |
//! | 0x15    | SeekL   | INT3(stat), INT2(stat)       |
//! | 0x16    | SeekP   | INT3(stat), INT2(stat)       |
//! | 0x19    | Test    | INT3(version) for 0x20       |
//! | 0x1A    | GetID   | INT3(stat), INT2/INT5(id)    |
//! | 0x1B    | ReadS   | INT3(stat), INT1 per sector  |
//! | 0x1E    | ReadTOC | INT3(stat), INT2(stat)       |
//!
//! # Example
//!
//! ```rust
//! use psrx_core::core::cdrom::CDROM;
//!
//! let mut cdrom = CDROM::new();
//!
//! // Unmask every interrupt, then send GetStat
//! cdrom.write8(0, 1);
//! cdrom.write8(2, 0x1F);
//! cdrom.write8(0, 0);
//! cdrom.write8(1, 0x01);
//!
//! assert!(cdrom.tick(CDROM::ACK_DELAY));
//! assert_eq!(cdrom.read8(1), 0x10); // shell open: no disc
//! ```
//!
//! # References
//!
//! - [PSX-SPX: CDROM Drive](http://problemkaputt.de/psx-spx.htm#cdromdrive)

use crate::core::config::Region;
use crate::core::dma::DmaDevice;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

mod commands;
mod disc;
#[cfg(test)]
mod tests;

pub use disc::{
    bcd_to_dec, dec_to_bcd, BinDisc, DiscReader, MemoryDisc, Msf, RawSector, SECTOR_SIZE,
};

/// Interrupt types reported in the low 3 bits of the flag register
pub mod int {
    /// Sector ready
    pub const DATA_READY: u8 = 1;
    /// Second reply (command complete)
    pub const COMPLETE: u8 = 2;
    /// First reply (acknowledge)
    pub const ACKNOWLEDGE: u8 = 3;
    /// Data end
    pub const DATA_END: u8 = 4;
    /// Error
    pub const ERROR: u8 = 5;
}

/// What the drive mechanism is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(super) enum Drive {
    Idle,
    Seeking,
    Reading,
}

/// A reply waiting to be delivered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct Reply {
    /// Cycles left before the reply may be delivered
    delay: u32,
    /// Interrupt type raised on delivery
    code: u8,
    /// Prepend the status byte as it is at delivery time
    with_stat: bool,
    bytes: Vec<u8>,
    /// Delivery ends a seek
    ends_seek: bool,
}

impl Reply {
    pub(super) fn new(delay: u32, code: u8) -> Self {
        Self {
            delay,
            code,
            with_stat: false,
            bytes: Vec::new(),
            ends_seek: false,
        }
    }

    pub(super) fn stat(mut self) -> Self {
        self.with_stat = true;
        self
    }

    pub(super) fn bytes(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub(super) fn ending_seek(mut self) -> Self {
        self.ends_seek = true;
        self
    }
}

/// CD-ROM drive controller
#[derive(Serialize, Deserialize)]
pub struct CDROM {
    /// Register bank select (0x1F801800 bits 0-1)
    index: u8,

    pub(super) param_fifo: VecDeque<u8>,
    response_fifo: VecDeque<u8>,

    /// Sector payload exposed through the data port
    data_fifo: Vec<u8>,
    data_pos: usize,

    /// Last raw sector read from the disc
    sector: Vec<u8>,

    interrupt_flag: u8,
    interrupt_enable: u8,
    irq_line: bool,

    pub(super) replies: VecDeque<Reply>,

    /// A command byte was written and its first reply is pending
    pub(super) busy: bool,

    pub(super) drive: Drive,

    /// SetMode value
    pub(super) mode: u8,
    pub(super) motor_on: bool,
    pub(super) muted: bool,

    /// Read head position
    pub(super) position: u32,

    /// SetLoc target not yet consumed by a seek or read
    pub(super) seek_target: Option<u32>,

    /// Cycles accumulated toward the next sector
    read_timer: u32,

    pub(super) region: Region,

    #[serde(skip)]
    pub(super) disc: Option<Box<dyn DiscReader>>,
}

impl CDROM {
    /// Cycles between a command write and its first reply
    pub const ACK_DELAY: u32 = 0xC4E1;

    /// Cycles per sector at single speed (75 sectors/s at 33.8688MHz)
    pub const SECTOR_CYCLES: u32 = 33_868_800 / 75;

    /// Maximum FIFO size
    const FIFO_SIZE: usize = 16;

    pub fn new() -> Self {
        Self {
            index: 0,
            param_fifo: VecDeque::with_capacity(Self::FIFO_SIZE),
            response_fifo: VecDeque::with_capacity(Self::FIFO_SIZE),
            data_fifo: Vec::new(),
            data_pos: 0,
            sector: Vec::new(),
            interrupt_flag: 0,
            interrupt_enable: 0,
            irq_line: false,
            replies: VecDeque::new(),
            busy: false,
            drive: Drive::Idle,
            mode: 0,
            motor_on: true,
            muted: false,
            position: 0,
            seek_target: None,
            read_timer: 0,
            region: Region::Ntsc,
            disc: None,
        }
    }

    /// Reset to power-on state, keeping the inserted disc and region
    pub fn reset(&mut self) {
        let disc = self.disc.take();
        let region = self.region;
        *self = Self::new();
        self.region = region;
        self.disc = disc;
    }

    /// Region reported by GetID
    pub fn set_region(&mut self, region: Region) {
        self.region = region;
    }

    /// Insert a disc, replacing any previous one
    pub fn insert_disc(&mut self, disc: Box<dyn DiscReader>) {
        log::info!("Disc inserted ({} sectors)", disc.sector_count());
        self.disc = Some(disc);
    }

    /// Remove the disc, stopping any read in progress
    pub fn eject_disc(&mut self) -> Option<Box<dyn DiscReader>> {
        self.drive = Drive::Idle;
        self.disc.take()
    }

    pub fn has_disc(&self) -> bool {
        self.disc.is_some()
    }

    /// Take over the disc bound to `other`
    pub(crate) fn adopt_disc(&mut self, other: &mut CDROM) {
        self.disc = other.disc.take();
    }

    /// Read head position (LBA)
    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn interrupt_flag(&self) -> u8 {
        self.interrupt_flag
    }

    /// Status byte returned by most commands
    ///
    /// ```text
    /// Bit 0: Error         Bit 4: Shell open
    /// Bit 1: Motor on      Bit 5: Reading
    /// Bit 2: Seek error    Bit 6: Seeking
    /// Bit 3: ID error      Bit 7: Playing audio
    /// ```
    pub(super) fn stat(&self) -> u8 {
        let mut stat = 0;
        if self.disc.is_none() {
            stat |= 1 << 4;
        } else if self.motor_on {
            stat |= 1 << 1;
        }
        match self.drive {
            Drive::Idle => {}
            Drive::Reading => stat |= 1 << 5,
            Drive::Seeking => stat |= 1 << 6,
        }
        stat
    }

    /// Index/status register (0x1F801800)
    ///
    /// ```text
    /// Bit 0-1: Index
    /// Bit 3: Parameter FIFO empty
    /// Bit 4: Parameter FIFO not full
    /// Bit 5: Response FIFO not empty
    /// Bit 6: Data FIFO not empty
    /// Bit 7: Busy (command being transmitted)
    /// ```
    pub fn read_status(&self) -> u8 {
        let mut status = self.index & 3;
        if self.param_fifo.is_empty() {
            status |= 1 << 3;
        }
        if self.param_fifo.len() < Self::FIFO_SIZE {
            status |= 1 << 4;
        }
        if !self.response_fifo.is_empty() {
            status |= 1 << 5;
        }
        if self.data_pos < self.data_fifo.len() {
            status |= 1 << 6;
        }
        if self.busy {
            status |= 1 << 7;
        }
        status
    }

    /// Read one of the four ports (0x1F801800 + `offset`)
    pub fn read8(&mut self, offset: u32) -> u8 {
        match offset & 3 {
            0 => self.read_status(),
            1 => self.response_fifo.pop_front().unwrap_or(0),
            2 => self.read_data_byte(),
            _ => {
                if self.index & 1 == 0 {
                    0xE0 | self.interrupt_enable
                } else {
                    0xE0 | self.interrupt_flag
                }
            }
        }
    }

    /// Write one of the four ports (0x1F801800 + `offset`)
    pub fn write8(&mut self, offset: u32, value: u8) {
        match (offset & 3, self.index) {
            (0, _) => self.index = value & 3,
            (1, 0) => self.execute_command(value),
            (2, 0) => self.push_param(value),
            (2, 1) => self.interrupt_enable = value & 0x1F,
            (3, 0) => self.write_request(value),
            (3, 1) => self.acknowledge(value),
            (port, index) => {
                log::trace!(
                    "CD-ROM audio/unused write {}.{} = 0x{:02X}",
                    port,
                    index,
                    value
                );
            }
        }
    }

    fn push_param(&mut self, value: u8) {
        if self.param_fifo.len() < Self::FIFO_SIZE {
            self.param_fifo.push_back(value);
        } else {
            log::warn!("CD-ROM parameter FIFO overflow");
        }
    }

    /// Interrupt flag write: clear acknowledged bits
    fn acknowledge(&mut self, value: u8) {
        self.interrupt_flag &= !(value & 0x1F);
        self.irq_line = self.interrupt_flag & self.interrupt_enable & 0x1F != 0;
        if value & 0x40 != 0 {
            self.param_fifo.clear();
        }
    }

    /// Request register: bit 7 loads the last sector into the data FIFO
    fn write_request(&mut self, value: u8) {
        if value & 0x80 == 0 {
            self.data_fifo.clear();
            self.data_pos = 0;
            return;
        }
        if self.data_pos < self.data_fifo.len() || self.sector.len() != SECTOR_SIZE {
            return;
        }

        let payload = if self.mode & 0x20 != 0 {
            &self.sector[12..12 + 2340]
        } else {
            &self.sector[24..24 + 2048]
        };
        self.data_fifo = payload.to_vec();
        self.data_pos = 0;
    }

    fn read_data_byte(&mut self) -> u8 {
        match self.data_fifo.get(self.data_pos) {
            Some(&byte) => {
                self.data_pos += 1;
                byte
            }
            None => 0,
        }
    }

    /// Queue a reply behind the ones already waiting
    pub(super) fn queue(&mut self, reply: Reply) {
        self.replies.push_back(reply);
    }

    /// Advance the drive by `cycles`
    ///
    /// # Returns
    ///
    /// `true` on a rising edge of the controller's interrupt output
    pub fn tick(&mut self, cycles: u32) -> bool {
        self.tick_read(cycles);
        self.tick_replies(cycles);

        let line = self.interrupt_flag & self.interrupt_enable & 0x1F != 0;
        let edge = line && !self.irq_line;
        self.irq_line = line;
        edge
    }

    fn sector_period(&self) -> u32 {
        if self.mode & 0x80 != 0 {
            Self::SECTOR_CYCLES / 2
        } else {
            Self::SECTOR_CYCLES
        }
    }

    fn tick_read(&mut self, cycles: u32) {
        if self.drive != Drive::Reading {
            return;
        }
        let period = self.sector_period();
        self.read_timer += cycles;
        while self.read_timer >= period && self.drive == Drive::Reading {
            self.read_timer -= period;
            self.read_next_sector();
        }
    }

    fn read_next_sector(&mut self) {
        let lba = self.position;
        let mut raw: RawSector = [0; SECTOR_SIZE];
        let result = match self.disc.as_mut() {
            Some(disc) => disc.read_sector(lba, &mut raw),
            None => Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no disc")),
        };

        match result {
            Ok(()) => {
                log::trace!("CD-ROM read sector {}", lba);
                self.sector = raw.to_vec();
                self.position += 1;
                // An unacknowledged sector is overwritten by the next one
                self.replies.retain(|reply| reply.code != int::DATA_READY);
                self.queue(Reply::new(0, int::DATA_READY).stat());
            }
            Err(err) => {
                log::warn!("CD-ROM read of sector {} failed: {}", lba, err);
                self.drive = Drive::Idle;
                let stat = self.stat() | 1;
                self.queue(Reply::new(0, int::ERROR).bytes(&[stat, 0x04]));
            }
        }
    }

    fn tick_replies(&mut self, cycles: u32) {
        let mut remaining = cycles;
        while let Some(head) = self.replies.front_mut() {
            if head.delay > remaining {
                head.delay -= remaining;
                return;
            }
            remaining -= head.delay;
            head.delay = 0;

            // Wait for the previous interrupt to be acknowledged
            if self.interrupt_flag & 7 != 0 {
                return;
            }
            if let Some(reply) = self.replies.pop_front() {
                self.deliver(reply);
            }
        }
    }

    fn deliver(&mut self, reply: Reply) {
        if reply.ends_seek {
            self.drive = Drive::Idle;
        }
        if matches!(reply.code, int::ACKNOWLEDGE | int::ERROR) {
            self.busy = false;
        }

        self.response_fifo.clear();
        if reply.with_stat {
            self.response_fifo.push_back(self.stat());
        }
        self.response_fifo.extend(reply.bytes);
        self.interrupt_flag = (self.interrupt_flag & !7) | reply.code;

        log::trace!("CD-ROM INT{} delivered", reply.code);
    }
}

impl Default for CDROM {
    fn default() -> Self {
        Self::new()
    }
}

impl DmaDevice for CDROM {
    fn dma_request(&self) -> bool {
        self.data_pos < self.data_fifo.len()
    }

    fn dma_read(&mut self) -> u32 {
        u32::from_le_bytes([
            self.read_data_byte(),
            self.read_data_byte(),
            self.read_data_byte(),
            self.read_data_byte(),
        ])
    }

    fn dma_write(&mut self, value: u32) {
        log::warn!("DMA write to CD-ROM ignored (0x{:08X})", value);
    }
}
