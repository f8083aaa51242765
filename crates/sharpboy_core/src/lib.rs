pub mod bus;
pub mod cpu;
pub mod machine;
pub mod mmu;
pub mod ppu;

pub use bus::Bus;
pub use cpu::Cpu;
pub use machine::{GameBoy, MachineConfig, RunExit, SerialLog};
pub use mmu::Mmu;
pub use ppu::{FrameBuffer, Ppu, PpuMode};

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
