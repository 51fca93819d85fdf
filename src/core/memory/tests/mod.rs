// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Memory Bus Tests
//!
//! - Address translation and segment mirroring (KUSEG, KSEG0, KSEG1)
//! - Memory region identification
//! - Read/write operations with various data sizes (8-bit, 16-bit, 32-bit)
//! - Alignment faults and unmapped reads
//! - I/O register routing
//! - Expansion region behavior (ROM header and open bus)

use super::*;
use crate::core::error::EmulatorError;
use crate::core::memory::MemoryRegion;

mod regions;
