// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Just enough MIPS encoding to write boot programs

fn i_type(op: u32, rs: u8, rt: u8, imm: u16) -> u32 {
    (op << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | imm as u32
}

fn r_type(funct: u32, rs: u8, rt: u8, rd: u8) -> u32 {
    ((rs as u32) << 21) | ((rt as u32) << 16) | ((rd as u32) << 11) | funct
}

pub const NOP: u32 = 0;

pub fn addiu(rt: u8, rs: u8, imm: i16) -> u32 {
    i_type(0x09, rs, rt, imm as u16)
}

pub fn ori(rt: u8, rs: u8, imm: u16) -> u32 {
    i_type(0x0D, rs, rt, imm)
}

pub fn lui(rt: u8, imm: u16) -> u32 {
    i_type(0x0F, 0, rt, imm)
}

pub fn sw(rt: u8, offset: i16, base: u8) -> u32 {
    i_type(0x2B, base, rt, offset as u16)
}

pub fn lw(rt: u8, offset: i16, base: u8) -> u32 {
    i_type(0x23, base, rt, offset as u16)
}

pub fn bne(rs: u8, rt: u8, offset: i16) -> u32 {
    i_type(0x05, rs, rt, offset as u16)
}

pub fn j(target: u32) -> u32 {
    0x0800_0000 | ((target >> 2) & 0x03FF_FFFF)
}

pub fn addu(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(0x21, rs, rt, rd)
}

pub fn or(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(0x25, rs, rt, rd)
}

pub fn slt(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(0x2A, rs, rt, rd)
}

pub fn xor(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(0x26, rs, rt, rd)
}
