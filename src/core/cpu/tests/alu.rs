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

#[test]
fn test_addu_wraps() {
    let (mut cpu, mut bus) = setup(&[asm::addu(3, 1, 2)]);
    cpu.set_reg(1, 0xFFFF_FFFF);
    cpu.set_reg(2, 2);
    cpu.step(&mut bus);
    assert_eq!(cpu.reg(3), 1);
}

#[test]
fn test_add_without_overflow() {
    let (mut cpu, mut bus) = setup(&[asm::add(3, 1, 2)]);
    cpu.set_reg(1, (-5i32) as u32);
    cpu.set_reg(2, 3);
    cpu.step(&mut bus);
    assert_eq!(cpu.reg(3) as i32, -2);
}

#[test]
fn test_lui_ori() {
    let (mut cpu, mut bus) = setup(&[asm::lui(1, 0x1F80), asm::ori(1, 1, 0x1070)]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.reg(1), 0x1F80_1070);
}

#[test]
fn test_set_less_than() {
    let (mut cpu, mut bus) = setup(&[asm::slt(3, 1, 2), asm::sltu(4, 1, 2)]);
    cpu.set_reg(1, 0xFFFF_FFFF); // -1
    cpu.set_reg(2, 1);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.reg(3), 1);
    assert_eq!(cpu.reg(4), 0);
}

#[test]
fn test_nor() {
    let (mut cpu, mut bus) = setup(&[asm::nor(3, 1, 2)]);
    cpu.set_reg(1, 0xF0F0_0000);
    cpu.set_reg(2, 0x0000_0F0F);
    cpu.step(&mut bus);
    assert_eq!(cpu.reg(3), 0x0F0F_F0F0);
}

#[test]
fn test_shifts() {
    let (mut cpu, mut bus) = setup(&[asm::sll(2, 1, 4), asm::sra(3, 1, 4), asm::srlv(4, 1, 5)]);
    cpu.set_reg(1, 0x8000_0010);
    cpu.set_reg(5, 36); // only the low 5 bits count
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.reg(2), 0x0000_0100);
    assert_eq!(cpu.reg(3), 0xF800_0001);
    assert_eq!(cpu.reg(4), 0x0800_0001);
}

#[test]
fn test_mult_signed() {
    let (mut cpu, mut bus) = setup(&[asm::mult(1, 2), asm::mfhi(3), asm::mflo(4)]);
    cpu.set_reg(1, (-2i32) as u32);
    cpu.set_reg(2, 3);

    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, timing::BASE + timing::MULTIPLY);

    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.reg(3), 0xFFFF_FFFF);
    assert_eq!(cpu.reg(4), (-6i32) as u32);
}

#[test]
fn test_multu() {
    let (mut cpu, mut bus) = setup(&[asm::multu(1, 2)]);
    cpu.set_reg(1, 0xFFFF_FFFF);
    cpu.set_reg(2, 2);
    cpu.step(&mut bus);
    assert_eq!(cpu.hi(), 1);
    assert_eq!(cpu.lo(), 0xFFFF_FFFE);
}

#[test]
fn test_div() {
    let (mut cpu, mut bus) = setup(&[asm::div(1, 2)]);
    cpu.set_reg(1, (-7i32) as u32);
    cpu.set_reg(2, 2);

    let cycles = cpu.step(&mut bus);
    assert_eq!(cycles, timing::BASE + timing::DIVIDE);
    assert_eq!(cpu.lo() as i32, -3);
    assert_eq!(cpu.hi() as i32, -1);
}

#[test]
fn test_div_by_zero_does_not_trap() {
    let (mut cpu, mut bus) = setup(&[asm::div(1, 0), asm::div(2, 0), asm::divu(1, 0)]);
    cpu.set_reg(1, 5);
    cpu.set_reg(2, (-5i32) as u32);

    cpu.step(&mut bus);
    assert_eq!(cpu.lo(), 0xFFFF_FFFF);
    assert_eq!(cpu.hi(), 5);

    cpu.step(&mut bus);
    assert_eq!(cpu.lo(), 1);
    assert_eq!(cpu.hi(), (-5i32) as u32);

    cpu.step(&mut bus);
    assert_eq!(cpu.lo(), 0xFFFF_FFFF);
    assert_eq!(cpu.hi(), 5);
    assert_eq!((cpu.cop0.cause() >> 2) & 0x1F, 0);
}

#[test]
fn test_div_overflow() {
    let (mut cpu, mut bus) = setup(&[asm::div(1, 2)]);
    cpu.set_reg(1, 0x8000_0000);
    cpu.set_reg(2, 0xFFFF_FFFF);
    cpu.step(&mut bus);
    assert_eq!(cpu.lo(), 0x8000_0000);
    assert_eq!(cpu.hi(), 0);
}
