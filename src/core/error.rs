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

/// Emulator error types
use thiserror::Error;

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Main error type for the emulator
///
/// Only the host-boundary variants (BIOS, region, configuration, save
/// state, lifecycle) ever leave [`System`](crate::core::System). Memory
/// faults are raised by the bus and turned into CPU exceptions before the
/// instruction step returns.
#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("BIOS file not found: {0}")]
    BiosNotFound(String),

    #[error("Invalid BIOS image: {reason}")]
    InvalidBiosImage { reason: String },

    #[error("Unsupported region: {0}")]
    UnsupportedRegion(String),

    #[error("Corrupt save state: {reason}")]
    CorruptState { reason: String },

    #[error("Invalid core state: expected {expected}, core is {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid memory access at 0x{address:08X}")]
    InvalidMemoryAccess { address: u32 },

    #[error("Unaligned memory access: {size}-byte access at 0x{address:08X}")]
    UnalignedAccess { address: u32, size: u8 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EmulatorError {
    /// Build a [`EmulatorError::CorruptState`] from anything printable
    pub(crate) fn corrupt(reason: impl std::fmt::Display) -> Self {
        EmulatorError::CorruptState {
            reason: reason.to_string(),
        }
    }
}

impl From<toml::de::Error> for EmulatorError {
    fn from(err: toml::de::Error) -> Self {
        EmulatorError::Config(err.to_string())
    }
}
