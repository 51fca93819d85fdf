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
//! Instruction cycle costs
//!
//! Every instruction is charged [`BASE`] cycles, plus the extra cost of
//! whatever it does beyond a single pipeline stage. The values approximate
//! a cached instruction stream; stalls on HI/LO are charged up front by the
//! multiply/divide instructions rather than at MFHI/MFLO.

/// Any instruction
pub const BASE: u32 = 1;

/// Extra cost of a data load
pub const LOAD: u32 = 1;

/// Extra cost of a data store (write buffer)
pub const STORE: u32 = 0;

/// MULT/MULTU
pub const MULTIPLY: u32 = 9;

/// DIV/DIVU
pub const DIVIDE: u32 = 36;

/// LWC2/SWC2 and coprocessor moves
pub const COP_TRANSFER: u32 = 1;

/// Pipeline flush on exception entry
pub const EXCEPTION: u32 = 3;
