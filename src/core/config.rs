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

//! Core configuration surface
//!
//! The options a host may set before (or between) frames. Everything here
//! can be loaded from a TOML document:
//!
//! ```toml
//! region = "pal"
//! video = "auto"
//! dma_bus_contention = false
//! frame_budget_slack = 10
//! ```

use super::error::{EmulatorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Console region
///
/// Selects the power-on video standard and the region string reported
/// by the CD-ROM controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// North America / Japan, 60Hz
    #[default]
    Ntsc,
    /// Europe, 50Hz
    Pal,
}

impl FromStr for Region {
    type Err = EmulatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ntsc" | "ntsc-u" | "ntsc-j" | "us" | "jp" => Ok(Region::Ntsc),
            "pal" | "eu" => Ok(Region::Pal),
            other => Err(EmulatorError::UnsupportedRegion(other.to_string())),
        }
    }
}

/// Video output timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoTiming {
    /// Use the standard that matches the region
    #[default]
    Auto,
    /// Force 263-line NTSC timing
    Ntsc,
    /// Force 314-line PAL timing
    Pal,
}

impl VideoTiming {
    /// Resolve `Auto` against a region
    ///
    /// # Returns
    ///
    /// `true` when PAL timing should be used
    pub fn is_pal(self, region: Region) -> bool {
        match self {
            VideoTiming::Auto => region == Region::Pal,
            VideoTiming::Ntsc => false,
            VideoTiming::Pal => true,
        }
    }
}

/// Emulator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// Console region
    pub region: Region,

    /// Video timing applied at power-on
    pub video: VideoTiming,

    /// Stall the CPU for the bus cycles consumed by DMA
    ///
    /// When disabled, DMA runs alongside the CPU for free, which is faster
    /// but lets some games observe transfers finishing "early".
    pub dma_bus_contention: bool,

    /// Extra headroom (percent) added to the per-frame cycle budget
    pub frame_budget_slack: u32,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            region: Region::Ntsc,
            video: VideoTiming::Auto,
            dma_bus_contention: true,
            frame_budget_slack: 10,
        }
    }
}

impl EmulatorConfig {
    /// Parse a configuration from a TOML document
    ///
    /// Missing keys fall back to [`EmulatorConfig::default`].
    ///
    /// # Example
    ///
    /// ```
    /// use psrx_core::core::config::{EmulatorConfig, Region};
    ///
    /// let config = EmulatorConfig::from_toml_str("region = \"pal\"").unwrap();
    /// assert_eq!(config.region, Region::Pal);
    /// assert!(config.dma_bus_contention);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        // Parse through a loose table first so an unknown region reports
        // UnsupportedRegion rather than a generic parse error.
        let table: toml::Table = text.parse()?;
        if let Some(region) = table.get("region").and_then(|v| v.as_str()) {
            Region::from_str(region)?;
        }
        let config: EmulatorConfig = toml::from_str(text)?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded config from {}", path.as_ref().display());
        Self::from_toml_str(&text)
    }

    /// Whether the GPU should power on with PAL timing
    pub fn pal_timing(&self) -> bool {
        self.video.is_pal(self.region)
    }
}
