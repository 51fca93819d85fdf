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
use super::super::*;
use super::{asm, run, setup};

const DATA: u32 = 0x8000_2000;

#[test]
fn test_store_then_load_word() {
    let (mut cpu, mut bus) = setup(&[asm::sw(2, 8, 1), asm::lw(3, 8, 1), asm::NOP]);
    cpu.set_reg(1, DATA);
    cpu.set_reg(2, 0xCAFEBABE);

    run(&mut cpu, &mut bus, 3);
    assert_eq!(bus.read32(DATA + 8).unwrap(), 0xCAFEBABE);
    assert_eq!(cpu.reg(3), 0xCAFEBABE);
}

#[test]
fn test_byte_and_halfword_extension() {
    let (mut cpu, mut bus) = setup(&[
        asm::lb(2, 0, 1),
        asm::lbu(3, 0, 1),
        asm::lh(4, 0, 1),
        asm::NOP,
    ]);
    bus.write32(DATA, 0x0000_8080).unwrap();
    cpu.set_reg(1, DATA);

    run(&mut cpu, &mut bus, 4);
    assert_eq!(cpu.reg(2), 0xFFFF_FF80);
    assert_eq!(cpu.reg(3), 0x0000_0080);
    assert_eq!(cpu.reg(4), 0xFFFF_8080);
}

#[test]
fn test_sb_sh_touch_only_their_bytes() {
    let (mut cpu, mut bus) = setup(&[asm::sb(2, 1, 1), asm::sh(2, 2, 1)]);
    bus.write32(DATA, 0x1122_3344).unwrap();
    cpu.set_reg(1, DATA);
    cpu.set_reg(2, 0xAABB_CCDD);

    run(&mut cpu, &mut bus, 2);
    assert_eq!(bus.read32(DATA).unwrap(), 0xCCDD_DD44);
}

#[test]
fn test_swl_swr_unaligned_store() {
    let (mut cpu, mut bus) = setup(&[asm::swr(2, 1, 1), asm::swl(2, 4, 1)]);
    bus.write32(DATA, 0x4433_2211).unwrap();
    bus.write32(DATA + 4, 0x8877_6655).unwrap();
    cpu.set_reg(1, DATA);
    cpu.set_reg(2, 0xDDCC_BBAA);

    run(&mut cpu, &mut bus, 2);
    assert_eq!(bus.read32(DATA).unwrap(), 0xCCBB_AA11);
    assert_eq!(bus.read32(DATA + 4).unwrap(), 0x8877_66DD);
}

#[test]
fn test_isolated_cache_drops_stores() {
    let (mut cpu, mut bus) = setup(&[asm::sw(2, 0, 1)]);
    bus.write32(DATA, 0x1234).unwrap();
    cpu.set_reg(1, DATA);
    cpu.set_reg(2, 0xFFFF);
    cpu.cop0.write(COP0::SR, 1 << 16);

    cpu.step(&mut bus);
    assert_eq!(bus.read32(DATA).unwrap(), 0x1234);
}

#[test]
fn test_load_charges_extra_cycles() {
    let (mut cpu, mut bus) = setup(&[asm::lw(2, 0, 1)]);
    cpu.set_reg(1, DATA);
    assert_eq!(cpu.step(&mut bus), timing::BASE + timing::LOAD);
}

#[test]
fn test_kuseg_and_kseg1_mirror_ram() {
    let (mut cpu, mut bus) = setup(&[asm::sw(2, 0, 1), asm::lw(3, 0, 4), asm::NOP]);
    cpu.set_reg(1, 0x0000_3000);
    cpu.set_reg(4, 0xA000_3000u32);
    cpu.set_reg(2, 0x5A5A_5A5A);

    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.reg(3), 0x5A5A_5A5A);
}
