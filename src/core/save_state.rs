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
//! Save state blob format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic "PSRX"
//! 4       4     Format version (LE)
//! 8       8     Payload length in bytes (LE)
//! 16      N     bincode payload (CPU, bus with every peripheral,
//!               synchronizer, frame counter)
//! ```
//!
//! The BIOS image and the disc are host bindings: they are not stored and
//! are carried over from the running core on load.
//!
//! Bump [`SAVE_STATE_VERSION`] whenever a serialized component changes
//! shape; older blobs are then rejected with
//! [`EmulatorError::CorruptState`].

use super::error::{EmulatorError, Result};
use serde::{Deserialize, Serialize};

/// Blob magic
pub const MAGIC: [u8; 4] = *b"PSRX";

/// Save state version for compatibility checking
pub const SAVE_STATE_VERSION: u32 = 1;

/// Magic + version + payload length
pub const HEADER_SIZE: usize = 16;

/// Decoded blob header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveStateHeader {
    pub version: u32,
    pub payload_len: u64,
}

impl SaveStateHeader {
    /// Parse and validate the header of `blob`
    ///
    /// # Errors
    ///
    /// [`EmulatorError::CorruptState`] on a short blob, wrong magic, other
    /// version or a declared size that does not match the blob.
    ///
    /// # Example
    ///
    /// ```
    /// use psrx_core::core::save_state::SaveStateHeader;
    ///
    /// assert!(SaveStateHeader::parse(b"not a save state").is_err());
    /// ```
    pub fn parse(blob: &[u8]) -> Result<Self> {
        if blob.len() < HEADER_SIZE {
            return Err(EmulatorError::corrupt(format!(
                "blob is {} bytes, header needs {}",
                blob.len(),
                HEADER_SIZE
            )));
        }
        if blob[0..4] != MAGIC {
            return Err(EmulatorError::corrupt("bad magic"));
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&blob[4..8]);
        let version = u32::from_le_bytes(version);
        if version != SAVE_STATE_VERSION {
            return Err(EmulatorError::corrupt(format!(
                "version {} is not supported (expected {})",
                version, SAVE_STATE_VERSION
            )));
        }

        let mut payload_len = [0u8; 8];
        payload_len.copy_from_slice(&blob[8..16]);
        let payload_len = u64::from_le_bytes(payload_len);
        let actual = (blob.len() - HEADER_SIZE) as u64;
        if payload_len != actual {
            return Err(EmulatorError::corrupt(format!(
                "declared payload of {} bytes, blob carries {}",
                payload_len, actual
            )));
        }

        Ok(Self {
            version,
            payload_len,
        })
    }
}

/// Wrap `state` into a versioned blob
pub(crate) fn encode<T: Serialize>(state: &T) -> Result<Vec<u8>> {
    let payload = bincode::serde::encode_to_vec(state, bincode::config::standard())
        .map_err(|err| EmulatorError::corrupt(format!("encode failed: {}", err)))?;

    let mut blob = Vec::with_capacity(HEADER_SIZE + payload.len());
    blob.extend_from_slice(&MAGIC);
    blob.extend_from_slice(&SAVE_STATE_VERSION.to_le_bytes());
    blob.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    blob.extend_from_slice(&payload);
    Ok(blob)
}

/// Validate `blob` and decode its payload
pub(crate) fn decode<T: for<'de> Deserialize<'de>>(blob: &[u8]) -> Result<T> {
    SaveStateHeader::parse(blob)?;
    let payload = &blob[HEADER_SIZE..];

    let (state, read): (T, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())
            .map_err(|err| EmulatorError::corrupt(format!("decode failed: {}", err)))?;
    if read != payload.len() {
        return Err(EmulatorError::corrupt(format!(
            "{} trailing bytes after payload",
            payload.len() - read
        )));
    }
    Ok(state)
}

/// Check that a restored buffer has its fixed hardware size
pub(crate) fn expect_len(what: &str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(EmulatorError::corrupt(format!(
            "{} holds {} entries, expected {}",
            what, actual, expected
        )));
    }
    Ok(())
}
