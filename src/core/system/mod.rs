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
//! Scheduler and core lifecycle
//!
//! [`System`] owns every component and is the only thing a host talks to.
//! It drives the CPU one instruction at a time and, after each step, hands
//! the cycles the step cost to the peripherals through the
//! [`Synchronizer`]:
//!
//! ```text
//! run_frame
//!   loop {
//!     CPU step              -> c cycles, charged to the synchronizer
//!     GPU    += debt        -> video signals, VBLANK/GPU irq
//!     Timers += debt        -> clocked by the video signals
//!     DMA    += debt        -> words moved (CPU stalled for them)
//!     CD-ROM += debt        -> CDROM irq
//!     Pad    += debt        -> CONTROLLER irq
//!   } until vblank entry or the frame budget is spent
//! ```
//!
//! Peripheral effects of a step are visible to the next CPU step, never to
//! the step that produced them.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --init--> Running --reset--> Reset --run_frame/step--> Running
//!       ^                    |
//!       +-----teardown-------+
//! ```

#[cfg(test)]
mod tests;

use super::cdrom::DiscReader;
use super::config::{EmulatorConfig, Region};
use super::controller::InputSnapshot;
use super::cpu::CPU;
use super::error::{EmulatorError, Result};
use super::gpu::Framebuffer;
use super::memory::Bus;
use super::save_state;
use super::sync::{SyncToken, Synchronizer};
use serde::{Deserialize, Serialize};

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    /// No BIOS bound, nothing to run
    Uninitialized,
    Running,
    /// Soft reset done, waiting for the next frame
    Reset,
}

impl State {
    fn name(self) -> &'static str {
        match self {
            State::Uninitialized => "Uninitialized",
            State::Running => "Running",
            State::Reset => "Reset",
        }
    }
}

/// Audio produced during one frame, interleaved stereo
///
/// Always empty: sample synthesis happens outside the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBlock {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

impl AudioBlock {
    /// SPU output rate
    pub const SAMPLE_RATE: u32 = 44_100;

    pub fn empty() -> Self {
        Self {
            sample_rate: Self::SAMPLE_RATE,
            samples: Vec::new(),
        }
    }
}

/// Result of one [`System::run_frame`]
#[derive(Debug, Clone)]
pub struct FrameOutput {
    /// Display snapshot taken at the vblank that ended the frame
    pub framebuffer: Framebuffer,
    pub audio: AudioBlock,
}

/// Everything that makes up a save state
#[derive(Serialize, Deserialize)]
struct Machine {
    cpu: CPU,
    bus: Bus,
    sync: Synchronizer,
    frame_count: u64,
}

impl Machine {
    fn power_on(bios: &[u8], config: &EmulatorConfig) -> Result<Self> {
        let mut bus = Bus::new();
        bus.load_bios(bios)?;
        bus.gpu_mut().set_video_standard(config.pal_timing());
        bus.cdrom_mut().set_region(config.region);

        Ok(Self {
            cpu: CPU::new(),
            bus,
            sync: Synchronizer::new(),
            frame_count: 0,
        })
    }

    /// Execute one instruction and charge its cost
    fn step_cpu(&mut self) -> u32 {
        let cycles = self.cpu.step(&mut self.bus);
        self.sync.charge(cycles);
        cycles
    }

    /// Bring every peripheral up to the cycle counter
    ///
    /// # Returns
    ///
    /// `true` if vblank was entered
    fn redistribute(&mut self, dma_contention: bool) -> bool {
        // Timers consume the video signals of the same period, so the GPU
        // must be advanced first.
        let cycles = self.sync.resync(SyncToken::Gpu);
        let video = self.bus.tick_gpu(cycles);
        let cycles = self.sync.resync(SyncToken::Timers);
        self.bus.tick_timers(cycles, &video);

        let cycles = self.sync.resync(SyncToken::Dma);
        let words = self.bus.tick_dma(cycles);

        let cycles = self.sync.resync(SyncToken::CdRom);
        self.bus.tick_cdrom(cycles);
        let cycles = self.sync.resync(SyncToken::Pad);
        self.bus.tick_pad(cycles);

        // The CPU is halted while DMA owns the bus
        if dma_contention && words > 0 {
            self.sync.charge(words);
        }

        video.vblank_started
    }

    fn step(&mut self, dma_contention: bool) -> (u32, bool) {
        let cycles = self.step_cpu();
        let vblank = self.redistribute(dma_contention);
        (cycles, vblank)
    }
}

/// PlayStation System
///
/// # Example
///
/// ```
/// use psrx_core::core::config::Region;
/// use psrx_core::core::controller::InputSnapshot;
/// use psrx_core::core::system::{State, System};
///
/// let mut system = System::new();
/// assert_eq!(system.state(), State::Uninitialized);
///
/// // A BIOS that spins forever: `j 0xBFC00000; nop`
/// let mut bios = vec![0u8; 512 * 1024];
/// bios[0..4].copy_from_slice(&0x0BF0_0000u32.to_le_bytes());
/// system.init(&bios, Region::Ntsc).unwrap();
///
/// let frame = system.run_frame(&InputSnapshot::default()).unwrap();
/// assert_eq!(frame.framebuffer.width, 256);
/// assert_eq!(system.frame_count(), 1);
/// ```
pub struct System {
    config: EmulatorConfig,
    state: State,
    machine: Option<Machine>,
}

impl System {
    /// Create an uninitialized core with the default configuration
    pub fn new() -> Self {
        Self::with_config(EmulatorConfig::default())
    }

    pub fn with_config(config: EmulatorConfig) -> Self {
        Self {
            config,
            state: State::Uninitialized,
            machine: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    /// Change the configuration
    ///
    /// DMA contention and frame slack apply from the next step; region and
    /// video timing only at the next `init`.
    pub fn set_config(&mut self, config: EmulatorConfig) {
        self.config = config;
    }

    /// Power on with `bios` for `region`
    ///
    /// # Errors
    ///
    /// - [`EmulatorError::InvalidBiosImage`] unless `bios` is exactly 512KB;
    ///   the core stays uninitialized
    /// - [`EmulatorError::InvalidState`] if the core is already running
    pub fn init(&mut self, bios: &[u8], region: Region) -> Result<()> {
        if self.state != State::Uninitialized {
            return Err(EmulatorError::InvalidState {
                expected: State::Uninitialized.name(),
                actual: self.state.name(),
            });
        }

        let mut config = self.config.clone();
        config.region = region;
        let machine = Machine::power_on(bios, &config)?;

        log::info!(
            "Core initialized ({:?}, {} video)",
            region,
            if config.pal_timing() { "PAL" } else { "NTSC" }
        );
        self.config = config;
        self.machine = Some(machine);
        self.state = State::Running;
        Ok(())
    }

    /// Soft reset: every component back to power-on values
    ///
    /// The BIOS image and the inserted disc stay bound.
    pub fn reset(&mut self) -> Result<()> {
        let machine = self.machine_mut()?;
        machine.cpu.reset();
        machine.bus.reset();
        machine.sync.reset();
        machine.frame_count = 0;

        log::info!("Core reset");
        self.state = State::Reset;
        Ok(())
    }

    /// Drop all state, including the host bindings
    pub fn teardown(&mut self) {
        if self.machine.take().is_some() {
            log::info!("Core torn down");
        }
        self.state = State::Uninitialized;
    }

    /// Run until the next vblank
    ///
    /// The frame also ends once the cycle budget of one frame (plus the
    /// configured slack) is spent, so a guest that disables vblank cannot
    /// hang the host.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::InvalidState`] before `init`.
    pub fn run_frame(&mut self, input: &InputSnapshot) -> Result<FrameOutput> {
        let contention = self.config.dma_bus_contention;
        let slack = u64::from(self.config.frame_budget_slack);
        let machine = self.running()?;

        machine.bus.controller_ports_mut().set_input(input);

        let frame = machine.bus.gpu().video_standard().cpu_cycles_per_frame();
        let budget = frame * (100 + slack) / 100;
        let start = machine.sync.cycles();

        loop {
            let (_, vblank) = machine.step(contention);
            if vblank {
                break;
            }
            if machine.sync.cycles() - start >= budget {
                log::debug!("Frame budget of {} cycles spent before vblank", budget);
                break;
            }
        }

        machine.frame_count += 1;
        Ok(FrameOutput {
            framebuffer: machine.bus.gpu().framebuffer().clone(),
            audio: AudioBlock::empty(),
        })
    }

    /// Execute one instruction and advance the peripherals
    ///
    /// # Returns
    ///
    /// CPU cycles the instruction cost
    pub fn step(&mut self) -> Result<u32> {
        let contention = self.config.dma_bus_contention;
        let machine = self.running()?;
        Ok(machine.step(contention).0)
    }

    /// Execute one instruction without advancing the peripherals
    ///
    /// The cycles stay owed and are paid by the next [`System::step`] or
    /// [`System::run_frame`].
    pub fn step_cpu(&mut self) -> Result<u32> {
        Ok(self.running()?.step_cpu())
    }

    /// Capture the complete core state
    ///
    /// # Errors
    ///
    /// [`EmulatorError::InvalidState`] before `init`.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let machine = self.machine()?;
        let blob = save_state::encode(machine)?;
        log::debug!("State serialized ({} bytes)", blob.len());
        Ok(blob)
    }

    /// Restore a state produced by [`System::serialize`]
    ///
    /// The current BIOS and disc bindings are kept. On error the running
    /// state is left untouched.
    ///
    /// # Errors
    ///
    /// - [`EmulatorError::CorruptState`] if the blob's magic, version or
    ///   size is wrong, or its payload does not decode
    /// - [`EmulatorError::InvalidState`] before `init`
    pub fn deserialize(&mut self, blob: &[u8]) -> Result<()> {
        let current = self.machine_mut()?;
        let mut restored: Machine = save_state::decode(blob)?;
        restored.bus.validate_layout()?;
        restored.bus.adopt_host_bindings(&mut current.bus);
        *current = restored;

        log::info!("State loaded ({} bytes)", blob.len());
        self.state = State::Running;
        Ok(())
    }

    /// Bind a disc to the CD-ROM drive, replacing any previous one
    pub fn insert_disc(&mut self, disc: Box<dyn DiscReader>) -> Result<()> {
        self.machine_mut()?.bus.cdrom_mut().insert_disc(disc);
        Ok(())
    }

    pub fn eject_disc(&mut self) -> Option<Box<dyn DiscReader>> {
        self.machine.as_mut()?.bus.cdrom_mut().eject_disc()
    }

    /// Frames completed since power-on or reset
    pub fn frame_count(&self) -> u64 {
        self.machine.as_ref().map_or(0, |m| m.frame_count)
    }

    /// CPU cycles (including DMA stalls) since power-on or reset
    pub fn cycles(&self) -> u64 {
        self.machine.as_ref().map_or(0, |m| m.sync.cycles())
    }

    /// Get current program counter
    pub fn pc(&self) -> Option<u32> {
        self.machine.as_ref().map(|m| m.cpu.pc())
    }

    pub fn cpu(&self) -> Option<&CPU> {
        self.machine.as_ref().map(|m| &m.cpu)
    }

    pub fn cpu_mut(&mut self) -> Option<&mut CPU> {
        self.machine.as_mut().map(|m| &mut m.cpu)
    }

    pub fn bus(&self) -> Option<&Bus> {
        self.machine.as_ref().map(|m| &m.bus)
    }

    pub fn bus_mut(&mut self) -> Option<&mut Bus> {
        self.machine.as_mut().map(|m| &mut m.bus)
    }

    fn not_initialized(&self) -> EmulatorError {
        EmulatorError::InvalidState {
            expected: State::Running.name(),
            actual: self.state.name(),
        }
    }

    fn machine(&self) -> Result<&Machine> {
        self.machine.as_ref().ok_or_else(|| self.not_initialized())
    }

    fn machine_mut(&mut self) -> Result<&mut Machine> {
        let error = self.not_initialized();
        self.machine.as_mut().ok_or(error)
    }

    /// Machine for an execution call; leaves the Reset state
    fn running(&mut self) -> Result<&mut Machine> {
        if self.machine.is_some() {
            self.state = State::Running;
        }
        self.machine_mut()
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}
