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
//! CD-ROM command implementations

use super::{dec_to_bcd, int, Drive, Msf, Reply, CDROM};
use crate::core::config::Region;

/// Error codes sent after `stat | 1` in an INT5 reply
mod error {
    pub const SEEK_FAILED: u8 = 0x04;
    pub const INVALID_PARAMETER: u8 = 0x10;
    pub const WRONG_PARAMETER_COUNT: u8 = 0x20;
    pub const INVALID_COMMAND: u8 = 0x40;
    pub const NO_DISC: u8 = 0x80;
}

impl CDROM {
    /// Second-reply delay for Init
    const INIT_DELAY: u32 = 0x0001_3CCE;

    /// Second-reply delay for GetID
    const GETID_DELAY: u32 = 0x4A00;

    /// Second-reply delay for seeks and ReadTOC
    const SEEK_DELAY: u32 = 100_000;

    /// Second-reply delay for Pause while idle
    const PAUSE_IDLE_DELAY: u32 = 0x1DF2;

    /// Execute a command byte with the queued parameters
    ///
    /// The parameter FIFO is consumed; replies are queued and delivered by
    /// [`CDROM::tick`].
    pub fn execute_command(&mut self, command: u8) {
        log::debug!(
            "CD-ROM command 0x{:02X} params {:02X?}",
            command,
            self.param_fifo
        );
        if self.busy {
            log::warn!("CD-ROM command 0x{:02X} sent while busy", command);
        }
        self.busy = true;

        let params: Vec<u8> = self.param_fifo.drain(..).collect();

        match command {
            0x01 => self.ack(),
            0x02 => self.cmd_setloc(&params),
            0x06 | 0x1B => self.cmd_read(),
            0x09 => self.cmd_pause(),
            0x0A => self.cmd_init(),
            0x0B | 0x0C => {
                self.muted = command == 0x0B;
                self.ack();
            }
            0x0E => self.cmd_setmode(&params),
            0x13 => self.cmd_gettn(),
            0x14 => self.cmd_gettd(&params),
            0x15 | 0x16 => self.cmd_seek(),
            0x19 => self.cmd_test(&params),
            0x1A => self.cmd_getid(),
            0x1E => {
                self.ack();
                self.queue(Reply::new(Self::SEEK_DELAY, int::COMPLETE).stat());
            }
            _ => {
                log::warn!("Unknown CD-ROM command 0x{:02X}", command);
                self.error(error::INVALID_COMMAND);
            }
        }
    }

    /// INT3(stat)
    fn ack(&mut self) {
        self.queue(Reply::new(Self::ACK_DELAY, int::ACKNOWLEDGE).stat());
    }

    /// INT5(stat | 1, code)
    fn error(&mut self, code: u8) {
        let stat = self.stat() | 1;
        self.queue(Reply::new(Self::ACK_DELAY, int::ERROR).bytes(&[stat, code]));
    }

    /// Command 0x02: SetLoc (mm, ss, ff in BCD)
    fn cmd_setloc(&mut self, params: &[u8]) {
        let &[minute, second, frame] = params else {
            self.error(error::WRONG_PARAMETER_COUNT);
            return;
        };
        let target = Msf::from_bcd(minute, second, frame);
        log::debug!(
            "CD-ROM SetLoc {:02}:{:02}:{:02}",
            target.minute,
            target.second,
            target.frame
        );
        self.seek_target = Some(target.to_lba());
        self.ack();
    }

    /// Commands 0x06/0x1B: ReadN/ReadS
    ///
    /// A pending SetLoc target is applied before reading starts.
    fn cmd_read(&mut self) {
        if self.disc.is_none() {
            self.error(error::NO_DISC);
            return;
        }
        if let Some(target) = self.seek_target.take() {
            self.position = target;
        }
        self.drive = Drive::Reading;
        self.ack();
    }

    /// Command 0x09: Pause
    fn cmd_pause(&mut self) {
        let delay = match self.drive {
            Drive::Idle => Self::PAUSE_IDLE_DELAY,
            _ if self.mode & 0x80 != 0 => 0x0010_BD93,
            _ => 0x0021_181C,
        };
        self.drive = Drive::Idle;
        self.ack();
        self.queue(Reply::new(delay, int::COMPLETE).stat());
    }

    /// Command 0x0A: Init (motor on, mode cleared)
    fn cmd_init(&mut self) {
        self.mode = 0;
        self.motor_on = true;
        self.drive = Drive::Idle;
        self.seek_target = None;
        self.ack();
        self.queue(Reply::new(Self::INIT_DELAY, int::COMPLETE).stat());
    }

    /// Command 0x0E: SetMode
    ///
    /// ```text
    /// Bit 5: Sector size (0 = 2048 data bytes, 1 = 2340 bytes)
    /// Bit 7: Speed (0 = single, 1 = double)
    /// ```
    fn cmd_setmode(&mut self, params: &[u8]) {
        let &[mode] = params else {
            self.error(error::WRONG_PARAMETER_COUNT);
            return;
        };
        self.mode = mode;
        self.ack();
    }

    /// Command 0x13: GetTN (single data track)
    fn cmd_gettn(&mut self) {
        self.queue(
            Reply::new(Self::ACK_DELAY, int::ACKNOWLEDGE)
                .stat()
                .bytes(&[0x01, 0x01]),
        );
    }

    /// Command 0x14: GetTD (track start, or disc end for track 0)
    fn cmd_gettd(&mut self, params: &[u8]) {
        let &[track] = params else {
            self.error(error::WRONG_PARAMETER_COUNT);
            return;
        };
        let start = match track {
            0x00 => {
                let sectors = self.disc.as_ref().map_or(0, |disc| disc.sector_count());
                Msf::from_lba(sectors)
            }
            0x01 => Msf::from_lba(0),
            _ => {
                self.error(error::INVALID_PARAMETER);
                return;
            }
        };
        self.queue(
            Reply::new(Self::ACK_DELAY, int::ACKNOWLEDGE)
                .stat()
                .bytes(&[dec_to_bcd(start.minute), dec_to_bcd(start.second)]),
        );
    }

    /// Commands 0x15/0x16: SeekL/SeekP
    fn cmd_seek(&mut self) {
        if self.disc.is_none() {
            self.error(error::NO_DISC);
            return;
        }
        let target = self.seek_target.take().unwrap_or(self.position);
        let in_range = self
            .disc
            .as_ref()
            .is_some_and(|disc| target < disc.sector_count());
        if !in_range {
            log::warn!("CD-ROM seek past end of disc (LBA {})", target);
            self.error(error::SEEK_FAILED);
            return;
        }

        self.position = target;
        self.drive = Drive::Seeking;
        self.ack();
        self.queue(
            Reply::new(Self::SEEK_DELAY, int::COMPLETE)
                .stat()
                .ending_seek(),
        );
    }

    /// Command 0x19: Test (only sub-function 0x20, controller version)
    fn cmd_test(&mut self, params: &[u8]) {
        match params.first() {
            Some(0x20) => self.queue(
                Reply::new(Self::ACK_DELAY, int::ACKNOWLEDGE).bytes(&[0x94, 0x09, 0x19, 0xC0]),
            ),
            Some(sub) => {
                log::warn!("CD-ROM Test sub-function 0x{:02X} not supported", sub);
                self.error(error::INVALID_PARAMETER);
            }
            None => self.error(error::WRONG_PARAMETER_COUNT),
        }
    }

    /// Command 0x1A: GetID
    fn cmd_getid(&mut self) {
        self.ack();
        if self.disc.is_none() {
            self.queue(
                Reply::new(Self::GETID_DELAY, int::ERROR)
                    .bytes(&[0x08, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
            );
            return;
        }

        let letter = match self.region {
            Region::Ntsc => b'A',
            Region::Pal => b'E',
        };
        self.queue(
            Reply::new(Self::GETID_DELAY, int::COMPLETE)
                .stat()
                .bytes(&[0x00, 0x20, 0x00, b'S', b'C', b'E', letter]),
        );
    }
}
