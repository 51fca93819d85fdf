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
//! Coprocessor 0 (System Control) instructions

use super::super::decode::Instruction;
use super::super::{timing, ExceptionCause, CPU};
use crate::core::error::Result;

impl CPU {
    /// MFC0: Move From COP0
    ///
    /// Goes through the load delay slot like a memory load. Reading an
    /// unimplemented register raises a reserved instruction exception.
    pub(crate) fn op_mfc0(&mut self, instr: Instruction) -> Result<()> {
        match self.cop0.read(instr.rd()) {
            Some(value) => {
                self.delayed_load_chain(instr.rt(), value);
                self.charge(timing::COP_TRANSFER);
            }
            None => self.exception(ExceptionCause::ReservedInstruction),
        }
        Ok(())
    }

    /// MTC0: Move To COP0
    pub(crate) fn op_mtc0(&mut self, instr: Instruction) -> Result<()> {
        let value = self.reg(instr.rt());
        self.cop0.write(instr.rd(), value);
        Ok(())
    }

    /// RFE: Restore From Exception
    ///
    /// Only pops the KU/IE stack; the jump back to EPC is the JR in
    /// whose delay slot RFE sits.
    pub(crate) fn op_rfe(&mut self) -> Result<()> {
        self.cop0.return_from_exception();
        Ok(())
    }
}
