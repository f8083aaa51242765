//! The driving loop: CPU, bus, PPU and serial capture in lock-step.

mod config;
mod serial;

pub use config::MachineConfig;
pub use serial::{SerialLog, TRANSFER_START};

use crate::cpu::Cpu;
use crate::mmu::Mmu;
use crate::bus::Bus;
use crate::ppu::{FrameBuffer, Ppu};

/// Why a `run_*` call returned.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunExit {
    /// The requested number of frames completed.
    Frames,
    /// Serial output contained "Passed".
    Passed,
    /// Serial output contained "Failed".
    Failed,
    /// The cycle budget ran out.
    CycleLimit,
    /// A STOP instruction executed.
    Stopped,
    /// The CPU hit an invalid opcode.
    Locked,
}

/// A DMG machine without a cartridge mapper.
///
/// Owns every component; each [`GameBoy::step`] runs one instruction to
/// completion, polls the serial port and then advances the PPU by the
/// instruction's cost.
pub struct GameBoy {
    pub cpu: Cpu,
    pub bus: Mmu,
    pub ppu: Ppu,
    pub serial: SerialLog,
    config: MachineConfig,
    rom: Vec<u8>,
    cycles: u64,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoy {
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    pub fn with_config(config: MachineConfig) -> Self {
        let mut cpu = Cpu::new();
        cpu.set_halt_gating(config.enforce_halt);
        let mut gb = Self {
            cpu,
            bus: Mmu::new(),
            ppu: Ppu::new(),
            serial: SerialLog::new(config.serial_echo),
            config,
            rom: Vec::new(),
            cycles: 0,
        };
        gb.sync_stat_mode();
        gb
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Load a ROM image; execution starts at $0100 with the post-boot state.
    pub fn load_rom(&mut self, rom: &[u8]) {
        self.rom = rom.to_vec();
        self.bus.load_rom(rom);
    }

    /// Power-cycle everything, keeping the loaded ROM.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus = Mmu::new();
        self.bus.load_rom(&self.rom);
        self.ppu.reset();
        self.sync_stat_mode();
        self.serial.clear();
        self.cycles = 0;
    }

    /// CPU cycles executed since construction or the last reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Whether the loop can make progress.
    pub fn is_running(&self) -> bool {
        !self.cpu.stopped && !self.cpu.is_locked()
    }

    /// Execute one instruction and advance the PPU by its cost.
    ///
    /// Returns the CPU cycles spent, or 0 if the machine is stopped or
    /// locked.
    pub fn step(&mut self) -> u32 {
        if self.cpu.stopped {
            return 0;
        }
        let cycles = self.cpu.step(&mut self.bus);
        if cycles == 0 {
            return 0;
        }
        self.serial.poll(&mut self.bus);
        let dots = cycles.saturating_mul(self.config.ppu_clock_multiplier);
        self.ppu.tick(&mut self.bus, dots);
        self.cycles += u64::from(cycles);
        cycles
    }

    /// Run until `frames` more frames complete, or the machine halts for good.
    pub fn run_frames(&mut self, frames: u64) -> RunExit {
        self.run_frames_within(frames, u64::MAX)
    }

    /// [`GameBoy::run_frames`] bounded by `max_cycles` CPU cycles.
    pub fn run_frames_within(&mut self, frames: u64, max_cycles: u64) -> RunExit {
        let target = self.ppu.frame_count().saturating_add(frames);
        let deadline = self.cycles.saturating_add(max_cycles);
        while self.ppu.frame_count() < target {
            if let Some(exit) = self.step_or_exit(deadline) {
                return exit;
            }
        }
        RunExit::Frames
    }

    /// Run until the serial output reports "Passed" or "Failed", the machine
    /// halts for good, or `max_cycles` CPU cycles elapse.
    pub fn run_until_serial(&mut self, max_cycles: u64) -> RunExit {
        let deadline = self.cycles.saturating_add(max_cycles);
        loop {
            let captured = self.serial.bytes().len();
            if let Some(exit) = self.step_or_exit(deadline) {
                return exit;
            }
            // Only re-scan the log when a byte was just captured.
            if self.serial.bytes().len() != captured {
                if self.serial.contains("Passed") {
                    return RunExit::Passed;
                }
                if self.serial.contains("Failed") {
                    return RunExit::Failed;
                }
            }
        }
    }

    /// Last completed frame as 2-bit colour indices.
    pub fn frame(&self) -> &FrameBuffer {
        self.ppu.frame()
    }

    /// STAT bits 0-1 follow the PPU's mode from power-on.
    fn sync_stat_mode(&mut self) {
        self.bus.set_stat_mode(self.ppu.mode().stat_bits());
    }

    fn step_or_exit(&mut self, deadline: u64) -> Option<RunExit> {
        if self.cycles >= deadline {
            return Some(RunExit::CycleLimit);
        }
        if self.step() == 0 {
            return Some(if self.cpu.is_locked() {
                RunExit::Locked
            } else {
                RunExit::Stopped
            });
        }
        None
    }
}
