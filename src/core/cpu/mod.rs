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
use crate::core::error::EmulatorError;
use crate::core::gte::GTE;
use crate::core::memory::Bus;
use serde::{Deserialize, Serialize};

/// CPU (MIPS R3000A) emulation implementation
///
/// # Specifications
/// - Architecture: MIPS I (32-bit)
/// - Clock frequency: 33.8688 MHz
/// - Registers: 32 general-purpose registers + HI/LO
/// - Coprocessors: COP0 (system control), COP2 (GTE)
///
/// # Pipeline hazards
///
/// Two hazards are visible to software and are modelled exactly:
///
/// - Branch delay slot: the instruction after a branch or jump always
///   executes, whether or not the branch is taken.
/// - Load delay slot: the value of a load (or MFC0/MFC2/CFC2) reaches the
///   register file one instruction late. The instruction in the slot reads
///   the old value. Two back-to-back loads to the same register cancel the
///   first, and a write by the slot instruction itself beats the load.
///
/// The load delay is implemented with two register files: each step reads
/// operands from `regs` and writes results to `out_regs`, into which the
/// pending load has already been retired.
///
/// # Example
/// ```
/// use psrx_core::core::cpu::CPU;
///
/// let mut cpu = CPU::new();
/// cpu.reset();
/// assert_eq!(cpu.reg(0), 0); // r0 is always 0
/// assert_eq!(cpu.pc(), 0xBFC0_0000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CPU {
    /// Register file as seen by the executing instruction
    regs: [u32; 32],

    /// Register file being written by the executing instruction
    #[serde(skip)]
    out_regs: [u32; 32],

    /// Load waiting to be retired by the next instruction
    load: Option<(u8, u32)>,

    /// Register retired from `load` during the current step
    #[serde(skip)]
    retiring_load: Option<u8>,

    /// Address of the next instruction to fetch
    pc: u32,

    /// Address of the instruction after that
    next_pc: u32,

    /// Address of the instruction being executed
    current_pc: u32,

    /// HI register (multiplication/division result upper 32 bits)
    hi: u32,

    /// LO register (multiplication/division result lower 32 bits)
    lo: u32,

    /// Set by the executing instruction when it is a branch or jump
    branch: bool,

    /// The executing instruction sits in a branch delay slot
    delay_slot: bool,

    /// Cycles charged on top of [`timing::BASE`] by the current step
    #[serde(skip)]
    extra_cycles: u32,

    /// Coprocessor 0 (System Control Unit)
    cop0: COP0,

    /// Coprocessor 2 (Geometry Transformation Engine)
    gte: GTE,
}

// Module declarations
mod cop0;
mod decode;
mod instructions;
#[cfg(test)]
mod tests;
pub mod timing;

// Re-exports
pub use cop0::{ExceptionCause, COP0};
pub use decode::Instruction;

/// Reset vector
const RESET_VECTOR: u32 = 0xBFC0_0000;

impl CPU {
    /// Create a new CPU instance at the reset vector
    ///
    /// # Example
    /// ```
    /// use psrx_core::core::cpu::CPU;
    ///
    /// let cpu = CPU::new();
    /// assert_eq!(cpu.reg(0), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            regs: [0; 32],
            out_regs: [0; 32],
            load: None,
            retiring_load: None,
            pc: RESET_VECTOR,
            next_pc: RESET_VECTOR.wrapping_add(4),
            current_pc: RESET_VECTOR,
            hi: 0,
            lo: 0,
            branch: false,
            delay_slot: false,
            extra_cycles: 0,
            cop0: COP0::new(),
            gte: GTE::new(),
        }
    }

    /// Reset CPU (and GTE) to power-on state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Read from general purpose register
    ///
    /// During an instruction this returns the value the instruction sees,
    /// i.e. without the load currently being retired.
    #[inline(always)]
    pub fn reg(&self, index: u8) -> u32 {
        self.regs[index as usize]
    }

    /// Write to general purpose register from outside the pipeline
    ///
    /// # Example
    /// ```
    /// use psrx_core::core::cpu::CPU;
    ///
    /// let mut cpu = CPU::new();
    /// cpu.set_reg(1, 0x12345678);
    /// assert_eq!(cpu.reg(1), 0x12345678);
    ///
    /// // Writes to r0 are ignored
    /// cpu.set_reg(0, 0xDEADBEEF);
    /// assert_eq!(cpu.reg(0), 0);
    /// ```
    pub fn set_reg(&mut self, index: u8, value: u32) {
        if index != 0 {
            self.regs[index as usize] = value;
            self.out_regs[index as usize] = value;
        }
    }

    /// Write the result of the executing instruction
    #[inline(always)]
    fn write_reg(&mut self, index: u8, value: u32) {
        if index != 0 {
            self.out_regs[index as usize] = value;
        }
    }

    /// Schedule a delayed load into `index`
    ///
    /// If the load being retired this step targets the same register, it
    /// never lands: the register keeps its pre-load value until the new
    /// load retires.
    fn delayed_load_chain(&mut self, index: u8, value: u32) {
        if self.retiring_load == Some(index) {
            self.out_regs[index as usize] = self.regs[index as usize];
        }
        self.load = if index != 0 { Some((index, value)) } else { None };
    }

    /// Current value of `index` including the load being retired
    ///
    /// LWL/LWR merge into this value rather than the stale one.
    #[inline(always)]
    fn reg_with_pending(&self, index: u8) -> u32 {
        self.out_regs[index as usize]
    }

    /// Address of the next instruction to execute
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Redirect execution to `address`
    ///
    /// Clears any branch in flight. Used by hosts that side-load
    /// executables and by tests.
    pub fn set_pc(&mut self, address: u32) {
        self.pc = address;
        self.next_pc = address.wrapping_add(4);
        self.branch = false;
        self.delay_slot = false;
    }

    pub fn hi(&self) -> u32 {
        self.hi
    }

    pub fn lo(&self) -> u32 {
        self.lo
    }

    pub fn cop0(&self) -> &COP0 {
        &self.cop0
    }

    /// Read a COP0 register by index (0 for unimplemented registers)
    pub fn cop0_reg(&self, index: u8) -> u32 {
        self.cop0.read(index).unwrap_or(0)
    }

    pub fn cop0_mut(&mut self) -> &mut COP0 {
        &mut self.cop0
    }

    pub fn gte(&self) -> &GTE {
        &self.gte
    }

    pub fn gte_mut(&mut self) -> &mut GTE {
        &mut self.gte
    }

    /// The next instruction to execute is a branch delay slot
    pub fn in_delay_slot(&self) -> bool {
        self.branch
    }

    /// A load is waiting to be retired
    pub fn pending_load(&self) -> Option<(u8, u32)> {
        self.load
    }

    /// Set the branch target for the instruction in the delay slot
    #[inline(always)]
    fn branch_to(&mut self, target: u32) {
        self.next_pc = target;
        self.branch = true;
    }

    /// Charge extra cycles to the current step
    #[inline(always)]
    fn charge(&mut self, cycles: u32) {
        self.extra_cycles += cycles;
    }

    /// Execute one instruction (or take one interrupt)
    ///
    /// Faults never escape: misaligned accesses, bus errors, overflow,
    /// reserved opcodes and coprocessor faults are all turned into CPU
    /// exceptions, exactly like the hardware.
    ///
    /// # Returns
    ///
    /// Number of CPU cycles the step consumed. The caller must charge
    /// exactly this amount to the scheduler.
    ///
    /// # Example
    ///
    /// ```
    /// use psrx_core::core::cpu::CPU;
    /// use psrx_core::core::memory::Bus;
    ///
    /// let mut cpu = CPU::new();
    /// let mut bus = Bus::new();
    /// bus.write32(0x8000_0000, 0x2401_0005).unwrap(); // addiu r1, r0, 5
    /// cpu.set_pc(0x8000_0000);
    ///
    /// let cycles = cpu.step(&mut bus);
    /// assert!(cycles >= 1);
    /// assert_eq!(cpu.reg(1), 5);
    /// ```
    pub fn step(&mut self, bus: &mut Bus) -> u32 {
        self.extra_cycles = 0;

        self.cop0.set_hardware_interrupt(bus.interrupt_line());
        if self.cop0.interrupt_pending() && !self.branch {
            return self.take_interrupt(bus);
        }

        self.current_pc = self.pc;
        self.delay_slot = self.branch;
        self.branch = false;

        if self.current_pc & 3 != 0 {
            self.retire_pending_load();
            self.exception_with_address(ExceptionCause::AddressErrorLoad, self.current_pc);
            return self.extra_cycles;
        }

        let instruction = match bus.read32(self.current_pc) {
            Ok(word) => Instruction(word),
            Err(_) => {
                self.retire_pending_load();
                self.exception(ExceptionCause::BusErrorInstruction);
                return self.extra_cycles;
            }
        };

        self.pc = self.next_pc;
        self.next_pc = self.pc.wrapping_add(4);

        self.out_regs = self.regs;
        self.retiring_load = None;
        if let Some((reg, value)) = self.load.take() {
            self.out_regs[reg as usize] = value;
            self.retiring_load = Some(reg);
        }

        if let Err(err) = self.execute_instruction(instruction, bus) {
            self.fault(err);
        }

        self.regs = self.out_regs;
        timing::BASE + self.extra_cycles
    }

    /// Commit a pending load outside of normal instruction flow
    fn retire_pending_load(&mut self) {
        if let Some((reg, value)) = self.load.take() {
            self.regs[reg as usize] = value;
            self.out_regs[reg as usize] = value;
        }
    }

    /// Take an external interrupt before the instruction at `pc`
    fn take_interrupt(&mut self, bus: &mut Bus) -> u32 {
        self.current_pc = self.pc;
        self.delay_slot = false;
        self.retire_pending_load();

        // A GTE command at the interrupted address has already been issued
        // to the coprocessor; the BIOS handler skips it on return.
        if let Ok(word) = bus.read32(self.pc) {
            let instruction = Instruction(word);
            if instruction.is_gte_command() && self.cop0.cop2_enabled() {
                let cycles = self.gte.execute(instruction.0);
                self.charge(cycles);
            }
        }

        log::trace!("Interrupt taken at PC=0x{:08X}", self.pc);
        self.exception(ExceptionCause::Interrupt);
        self.extra_cycles
    }

    /// Convert a memory error raised during execution into an exception
    fn fault(&mut self, err: EmulatorError) {
        match err {
            EmulatorError::InvalidMemoryAccess { address } => {
                log::debug!(
                    "Bus error at 0x{:08X} (PC=0x{:08X})",
                    address,
                    self.current_pc
                );
                self.exception(ExceptionCause::BusErrorData);
            }
            EmulatorError::UnalignedAccess { address, .. } => {
                self.exception_with_address(ExceptionCause::AddressErrorLoad, address);
            }
            other => {
                log::error!(
                    "Unexpected error at PC=0x{:08X}: {}",
                    self.current_pc,
                    other
                );
                self.exception(ExceptionCause::BusErrorData);
            }
        }
    }

    /// Enter the exception handler
    ///
    /// EPC is the faulting instruction, or the branch before it when the
    /// fault happened in a delay slot (with CAUSE.BD set).
    pub fn exception(&mut self, cause: ExceptionCause) {
        self.enter_exception(cause, None);
    }

    /// Enter the exception handler for an address error, latching BADA
    pub fn exception_with_address(&mut self, cause: ExceptionCause, address: u32) {
        self.enter_exception(cause, Some(address));
    }

    fn enter_exception(&mut self, cause: ExceptionCause, bad_address: Option<u32>) {
        let epc = if self.delay_slot {
            self.current_pc.wrapping_sub(4)
        } else {
            self.current_pc
        };

        let handler = self
            .cop0
            .enter_exception(cause, epc, self.delay_slot, bad_address);

        if cause != ExceptionCause::Interrupt && cause != ExceptionCause::Syscall {
            log::debug!(
                "Exception {:?}: EPC=0x{:08X}, handler=0x{:08X}, delay_slot={}",
                cause,
                epc,
                handler,
                self.delay_slot
            );
        }

        self.pc = handler;
        self.next_pc = handler.wrapping_add(4);
        self.branch = false;
        self.delay_slot = false;
        self.charge(timing::EXCEPTION);
    }
}

impl Default for CPU {
    fn default() -> Self {
        Self::new()
    }
}
