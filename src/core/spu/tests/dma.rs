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
//! DMA transfer tests - DMA read/write operations and addressing

use crate::core::dma::DmaDevice;
use crate::core::memory::Bus;
use crate::core::spu::SPU;

#[test]
fn test_dma_request_follows_transfer_mode() {
    let mut spu = SPU::new();
    assert!(!spu.dma_request());
    spu.write16(0x1AA, 0x0010);
    assert!(!spu.dma_request());
    spu.write16(0x1AA, 0x0020);
    assert!(spu.dma_request());
    spu.write16(0x1AA, 0x0030);
    assert!(spu.dma_request());
}

#[test]
fn test_spu_dma_write() {
    let mut spu = SPU::new();
    spu.write16(0x1A6, 0x1000);
    spu.dma_write(0x1234_5678);

    assert_eq!(spu.read_ram16(0x1000 * 8), 0x5678);
    assert_eq!(spu.read_ram16(0x1000 * 8 + 2), 0x1234);
}

#[test]
fn test_spu_dma_read() {
    let mut spu = SPU::new();
    spu.write16(0x1A6, 0x1000);
    spu.write_ram16(0x1000 * 8, 0xABCD);
    spu.write_ram16(0x1000 * 8 + 2, 0x1234);
    spu.write_ram16(0x1000 * 8 + 4, 0x5555);

    assert_eq!(spu.dma_read(), 0x1234_ABCD);
    assert_eq!(spu.dma_read() & 0xFFFF, 0x5555);
}

#[test]
fn test_channel_4_block_transfer() {
    let mut bus = Bus::new();
    for (i, word) in [0x1111_0000u32, 0x3333_2222, 0x5555_4444, 0x7777_6666]
        .iter()
        .enumerate()
    {
        bus.write32(0x2000 + 4 * i as u32, *word).unwrap();
    }

    bus.write16(0x1F80_1DA6, 0x0010).unwrap();
    bus.write16(0x1F80_1DAA, 0x0020).unwrap();

    bus.write32(0x1F80_10F0, 1 << 19).unwrap();
    bus.write32(0x1F80_10C0, 0x2000).unwrap();
    bus.write32(0x1F80_10C4, 0x0001_0004).unwrap();
    bus.write32(0x1F80_10C8, 0x0100_0201).unwrap();

    assert_eq!(bus.tick_dma(100), 4);
    let spu = bus.spu();
    assert_eq!(spu.read_ram16(0x80), 0x0000);
    assert_eq!(spu.read_ram16(0x82), 0x1111);
    assert_eq!(spu.read_ram16(0x8E), 0x7777);
}
