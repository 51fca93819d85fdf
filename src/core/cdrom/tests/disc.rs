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
//! Disc reader tests

use super::*;
use std::io::Write;

#[test]
fn test_memory_disc_out_of_range() {
    let mut disc = MemoryDisc::new(vec![0; SECTOR_SIZE * 2 + 100]);
    assert_eq!(disc.sector_count(), 2);

    let mut sector = [0; SECTOR_SIZE];
    assert!(disc.read_sector(1, &mut sector).is_ok());
    assert!(disc.read_sector(2, &mut sector).is_err());
}

#[test]
fn test_bin_disc_reads_sectors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for lba in 0..3u8 {
        file.write_all(&[lba; SECTOR_SIZE]).unwrap();
    }
    file.write_all(&[0xFF; 10]).unwrap();
    file.flush().unwrap();

    let mut disc = BinDisc::open(file.path()).unwrap();
    assert_eq!(disc.sector_count(), 3);

    let mut sector = [0; SECTOR_SIZE];
    disc.read_sector(2, &mut sector).unwrap();
    assert!(sector.iter().all(|&b| b == 2));
    disc.read_sector(0, &mut sector).unwrap();
    assert!(sector.iter().all(|&b| b == 0));
    assert!(disc.read_sector(3, &mut sector).is_err());
}

#[test]
fn test_bin_disc_missing_file() {
    assert!(BinDisc::open("/nonexistent/disc.bin").is_err());
}

#[test]
fn test_bin_disc_drives_controller() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let mut raw = vec![0u8; SECTOR_SIZE * 2];
    raw[SECTOR_SIZE + 24] = 0x5A;
    file.write_all(&raw).unwrap();
    file.flush().unwrap();

    let mut cdrom = CDROM::new();
    cdrom.insert_disc(Box::new(BinDisc::open(file.path()).unwrap()));
    command(&mut cdrom, 0x02, &[0x00, 0x02, 0x01]);
    cdrom.tick(CDROM::ACK_DELAY);
    acknowledge(&mut cdrom);
    command(&mut cdrom, 0x1B, &[]);
    cdrom.tick(CDROM::ACK_DELAY);
    acknowledge(&mut cdrom);

    cdrom.tick(CDROM::SECTOR_CYCLES);
    cdrom.write8(3, 0x80);
    assert_eq!(cdrom.read8(2), 0x5A);
}
