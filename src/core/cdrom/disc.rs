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
//! Disc access
//!
//! The controller never owns a disc image format. It asks a
//! [`DiscReader`] for raw 2352-byte sectors by logical block address, where
//! LBA 0 is MSF 00:02:00 (the first sector after the lead-in pregap).

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Raw sector size (sync + header + subheader + data + EDC/ECC)
pub const SECTOR_SIZE: usize = 2352;

/// One raw sector
pub type RawSector = [u8; SECTOR_SIZE];

/// Sectors in the two-second pregap before LBA 0
const PREGAP_SECTORS: u32 = 150;

/// Source of raw disc sectors
///
/// Implemented by the host. The controller calls it only while the core is
/// being driven, one sector at a time.
pub trait DiscReader {
    /// Fill `sector` with the raw sector at `lba`
    fn read_sector(&mut self, lba: u32, sector: &mut RawSector) -> io::Result<()>;

    /// Number of sectors on the disc
    fn sector_count(&self) -> u32;
}

/// A disc held entirely in memory
///
/// # Example
///
/// ```
/// use psrx_core::core::cdrom::{DiscReader, MemoryDisc, SECTOR_SIZE};
///
/// let mut disc = MemoryDisc::new(vec![0xAB; SECTOR_SIZE * 2]);
/// assert_eq!(disc.sector_count(), 2);
///
/// let mut sector = [0; SECTOR_SIZE];
/// disc.read_sector(1, &mut sector).unwrap();
/// assert_eq!(sector[0], 0xAB);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryDisc {
    data: Vec<u8>,
}

impl MemoryDisc {
    /// Wrap raw sector data; a trailing partial sector is ignored
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl DiscReader for MemoryDisc {
    fn read_sector(&mut self, lba: u32, sector: &mut RawSector) -> io::Result<()> {
        let start = lba as usize * SECTOR_SIZE;
        let raw = self
            .data
            .get(start..start + SECTOR_SIZE)
            .ok_or_else(|| out_of_range(lba))?;
        sector.copy_from_slice(raw);
        Ok(())
    }

    fn sector_count(&self) -> u32 {
        (self.data.len() / SECTOR_SIZE) as u32
    }
}

/// A raw `.bin` image read from disk on demand
pub struct BinDisc {
    file: File,
    sectors: u32,
}

impl BinDisc {
    /// Open a single-track raw image
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        let len = file.metadata()?.len();
        let sectors = u32::try_from(len / SECTOR_SIZE as u64).unwrap_or(u32::MAX);

        log::info!(
            "Opened disc image {} ({} sectors)",
            path.as_ref().display(),
            sectors
        );
        Ok(Self { file, sectors })
    }
}

impl DiscReader for BinDisc {
    fn read_sector(&mut self, lba: u32, sector: &mut RawSector) -> io::Result<()> {
        if lba >= self.sectors {
            return Err(out_of_range(lba));
        }
        self.file
            .seek(SeekFrom::Start(u64::from(lba) * SECTOR_SIZE as u64))?;
        self.file.read_exact(sector)
    }

    fn sector_count(&self) -> u32 {
        self.sectors
    }
}

fn out_of_range(lba: u32) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("sector {} is past the end of the disc", lba),
    )
}

/// Disc position in MSF (Minute:Second:Frame) format
///
/// All values are stored as decimal (not BCD).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Msf {
    pub minute: u8,
    pub second: u8,
    pub frame: u8,
}

impl Msf {
    pub fn new(minute: u8, second: u8, frame: u8) -> Self {
        Self {
            minute,
            second,
            frame,
        }
    }

    /// Decode three BCD bytes
    pub fn from_bcd(minute: u8, second: u8, frame: u8) -> Self {
        Self::new(bcd_to_dec(minute), bcd_to_dec(second), bcd_to_dec(frame))
    }

    /// Logical block address; positions inside the pregap clamp to 0
    pub fn to_lba(self) -> u32 {
        let sectors =
            (u32::from(self.minute) * 60 + u32::from(self.second)) * 75 + u32::from(self.frame);
        sectors.saturating_sub(PREGAP_SECTORS)
    }

    pub fn from_lba(lba: u32) -> Self {
        let sectors = lba + PREGAP_SECTORS;
        Self::new(
            (sectors / 75 / 60) as u8,
            ((sectors / 75) % 60) as u8,
            (sectors % 75) as u8,
        )
    }
}

/// Convert BCD (Binary-Coded Decimal) to decimal
///
/// Example: 0x23 (BCD) = 23 (decimal)
#[inline]
pub fn bcd_to_dec(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

/// Convert decimal (0-99) to BCD
#[inline]
pub fn dec_to_bcd(dec: u8) -> u8 {
    ((dec / 10) << 4) | (dec % 10)
}
