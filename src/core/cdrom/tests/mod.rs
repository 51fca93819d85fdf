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
//! CD-ROM controller tests

mod disc;

use super::*;

/// A disc whose sectors carry their LBA in the first data bytes
///
/// Mode 2 layout: the 2340-byte view starts at the header (offset 12),
/// the 2048-byte view at the data (offset 24).
fn test_disc(sectors: u32) -> Box<MemoryDisc> {
    let mut data = vec![0u8; sectors as usize * SECTOR_SIZE];
    for lba in 0..sectors {
        let base = lba as usize * SECTOR_SIZE;
        data[base + 12] = 0xAA;
        data[base + 24..base + 28].copy_from_slice(&lba.to_le_bytes());
        data[base + 24 + 2047] = 0xEE;
    }
    Box::new(MemoryDisc::new(data))
}

fn with_disc(sectors: u32) -> CDROM {
    let mut cdrom = CDROM::new();
    cdrom.insert_disc(test_disc(sectors));
    cdrom
}

/// Unmask every interrupt source and select index 0
fn unmask(cdrom: &mut CDROM) {
    cdrom.write8(0, 1);
    cdrom.write8(2, 0x1F);
    cdrom.write8(0, 0);
}

fn command(cdrom: &mut CDROM, cmd: u8, params: &[u8]) {
    cdrom.write8(0, 0);
    for &param in params {
        cdrom.write8(2, param);
    }
    cdrom.write8(1, cmd);
}

/// Acknowledge every interrupt and go back to index 0
fn acknowledge(cdrom: &mut CDROM) {
    cdrom.write8(0, 1);
    cdrom.write8(3, 0x1F);
    cdrom.write8(0, 0);
}

/// Interrupt type currently flagged
fn flag(cdrom: &mut CDROM) -> u8 {
    cdrom.write8(0, 1);
    let value = cdrom.read8(3) & 7;
    cdrom.write8(0, 0);
    value
}

/// Drain the response FIFO
fn response(cdrom: &mut CDROM) -> Vec<u8> {
    let mut bytes = Vec::new();
    while cdrom.read_status() & (1 << 5) != 0 {
        bytes.push(cdrom.read8(1));
    }
    bytes
}
