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
//! Main RAM
//!
//! 2MB of DRAM, mirrored four times across the first 8MB of the physical
//! address space. Accesses are little-endian.

use super::Width;
use crate::core::error::Result;
use crate::core::save_state::expect_len;
use serde::{Deserialize, Serialize};

/// Main system RAM
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ram {
    data: Vec<u8>,
}

impl Ram {
    /// RAM size (2MB)
    pub const SIZE: usize = 2 * 1024 * 1024;

    /// Address mask applied to every access (mirroring)
    const MASK: u32 = Self::SIZE as u32 - 1;

    pub fn new() -> Self {
        Self {
            data: vec![0; Self::SIZE],
        }
    }

    /// Reject a restored RAM of the wrong size
    pub(crate) fn validate_layout(&self) -> Result<()> {
        expect_len("RAM", self.data.len(), Self::SIZE)
    }

    /// Zero the whole RAM
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Read `width` bytes at a physical address (mirrored)
    pub fn read(&self, paddr: u32, width: Width) -> u32 {
        read_le(&self.data, (paddr & Self::MASK) as usize, width)
    }

    /// Write `width` bytes at a physical address (mirrored)
    pub fn write(&mut self, paddr: u32, width: Width, value: u32) {
        write_le(&mut self.data, (paddr & Self::MASK) as usize, width, value)
    }

    /// Word read used by DMA
    ///
    /// The address is masked to a word-aligned RAM offset, so a DMA
    /// pointer can never reach outside RAM.
    #[inline(always)]
    pub fn dma_read_word(&self, addr: u32) -> u32 {
        read_le(&self.data, (addr & Self::MASK & !3) as usize, Width::Word)
    }

    /// Word write used by DMA
    #[inline(always)]
    pub fn dma_write_word(&mut self, addr: u32, value: u32) {
        write_le(
            &mut self.data,
            (addr & Self::MASK & !3) as usize,
            Width::Word,
            value,
        )
    }

    /// Raw RAM contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

/// Little-endian read of `width` bytes from `buf`
///
/// Out-of-range offsets read as zero.
pub(super) fn read_le(buf: &[u8], offset: usize, width: Width) -> u32 {
    match buf.get(offset..offset + width.bytes()) {
        Some(bytes) => bytes
            .iter()
            .rev()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32),
        None => 0,
    }
}

/// Little-endian write of `width` bytes into `buf`
///
/// Out-of-range offsets are dropped.
pub(super) fn write_le(buf: &mut [u8], offset: usize, width: Width, value: u32) {
    if let Some(bytes) = buf.get_mut(offset..offset + width.bytes()) {
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (value >> (8 * i)) as u8;
        }
    }
}
