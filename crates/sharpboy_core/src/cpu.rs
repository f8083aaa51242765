mod alu;
mod cb;
pub mod decode;
mod exec;
mod flags;
mod helpers;
pub mod regs;
pub mod timing;

pub use flags::Flags;
pub use regs::{Reg8, Register, RegisterPair, Registers, SpecialRegister};

use crate::bus::Bus;
use decode::Instruction;

/// Sharp LR35902 core.
///
/// Holds the register file and the run-state flags. All mutation happens
/// through [`Cpu::step`], which executes exactly one instruction against a
/// caller-owned bus and reports its cost in machine cycles.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    /// Interrupt master enable latch (EI/DI/RETI). Interrupts are not
    /// vectored by this core; the latch is kept for observers.
    pub ime: bool,
    /// Set by HALT.
    pub halted: bool,
    /// Set by STOP; the driving loop stops at the next instruction boundary.
    pub stopped: bool,
    /// When true, a halted CPU idles until an enabled interrupt is pending
    /// instead of continuing to fetch.
    halt_gating: bool,
    /// Set after an invalid opcode; `step` returns 0 until reset.
    locked: bool,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// CPU in the state the DMG boot ROM leaves behind at $0100.
    pub fn new() -> Self {
        Self {
            regs: Registers::post_boot(),
            ime: false,
            halted: false,
            stopped: false,
            halt_gating: false,
            locked: false,
        }
    }

    pub fn reset(&mut self) {
        let halt_gating = self.halt_gating;
        *self = Self::new();
        self.halt_gating = halt_gating;
    }

    pub fn set_halt_gating(&mut self, enabled: bool) {
        self.halt_gating = enabled;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Execute a single instruction and return the number of M-cycles taken.
    ///
    /// Returns 0 once the CPU has locked up on an invalid opcode.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if self.locked {
            return 0;
        }

        if self.halted && self.halt_gating {
            if bus.pending_interrupts().is_empty() {
                return 1;
            }
            self.halted = false;
        }

        let pc = self.regs.pc.get();
        let opcode = self.fetch8(bus);
        let instruction = decode::lookup(opcode);
        log::trace!("0x{pc:04X}: {opcode:02X} {instruction:?}");

        if instruction == Instruction::Invalid {
            log::error!(
                "CPU locked: invalid opcode 0x{opcode:02X} at PC=0x{pc:04X} (SP=0x{sp:04X} AF=0x{af:04X} BC=0x{bc:04X} DE=0x{de:04X} HL=0x{hl:04X})",
                sp = self.regs.sp.get(),
                af = self.regs.af(),
                bc = self.regs.bc(),
                de = self.regs.de(),
                hl = self.regs.hl(),
            );
            self.locked = true;
            return 0;
        }

        let extra = self.execute(bus, opcode, instruction);
        u32::from(timing::OPCODE_CYCLES[opcode as usize]) + extra
    }
}
