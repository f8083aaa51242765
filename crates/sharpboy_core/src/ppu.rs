//! DMG pixel processing unit: mode state machine and scanline renderer.

mod render;
pub mod tile;

use crate::bus::{Bus, Interrupt, Stat};
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// One completed frame of 2-bit colour indices, `frame[y][x]`.
pub type FrameBuffer = [[u8; SCREEN_WIDTH]; SCREEN_HEIGHT];

/// First scanline of the vertical blanking period.
pub const VBLANK_START_LINE: u8 = SCREEN_HEIGHT as u8;
/// Total scanlines per frame, including the ten VBlank lines.
pub const LINES_PER_FRAME: u8 = 154;
/// Cycles per full scanline (OAM + VRAM + HBlank, or one VBlank line).
pub const CYCLES_PER_LINE: u32 = 456;
/// Cycles per full frame.
pub const CYCLES_PER_FRAME: u32 = CYCLES_PER_LINE * LINES_PER_FRAME as u32;

/// PPU mode, numbered as it appears in STAT bits 0-1.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum PpuMode {
    HBlank = 0,
    VBlank = 1,
    AccessOam = 2,
    AccessVram = 3,
}

impl PpuMode {
    /// Cycles spent in this mode before the next transition. VBlank's budget
    /// covers one scanline.
    pub const fn budget(self) -> u32 {
        match self {
            PpuMode::AccessOam => 80,
            PpuMode::AccessVram => 172,
            PpuMode::HBlank => 204,
            PpuMode::VBlank => CYCLES_PER_LINE,
        }
    }

    pub const fn stat_bits(self) -> u8 {
        self as u8
    }
}

/// Scanline-granular PPU.
///
/// Driven by [`Ppu::tick`] with the cost of each executed instruction. The
/// frame under construction is kept apart from the last completed one, which
/// is what [`Ppu::frame`] hands out.
pub struct Ppu {
    mode: PpuMode,
    scanline: u8,
    cycles: u32,
    back: Box<FrameBuffer>,
    front: Box<FrameBuffer>,
    frames: u64,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    /// PPU at scanline 0 in OAM search with an empty accumulator.
    pub fn new() -> Self {
        Self {
            mode: PpuMode::AccessOam,
            scanline: 0,
            cycles: 0,
            back: Box::new([[0; SCREEN_WIDTH]; SCREEN_HEIGHT]),
            front: Box::new([[0; SCREEN_WIDTH]; SCREEN_HEIGHT]),
            frames: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn mode(&self) -> PpuMode {
        self.mode
    }

    pub fn scanline(&self) -> u8 {
        self.scanline
    }

    /// Cycles accumulated towards the current mode's budget.
    pub fn mode_cycles(&self) -> u32 {
        self.cycles
    }

    /// Number of frames completed since construction.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Last completed frame.
    pub fn frame(&self) -> &FrameBuffer {
        &self.front
    }

    /// Advance by `cycles`, performing as many mode transitions as the
    /// accumulated count allows. Returns `true` if a frame completed.
    pub fn tick<B: Bus>(&mut self, bus: &mut B, cycles: u32) -> bool {
        // Two whole frames re-render every line; any further whole frames
        // leave the same state behind and are only counted.
        let skipped = (cycles / CYCLES_PER_FRAME).saturating_sub(2);
        self.frames += u64::from(skipped);
        let mut frame_done = skipped > 0;

        self.cycles += cycles - skipped * CYCLES_PER_FRAME;
        while self.cycles >= self.mode.budget() {
            self.cycles -= self.mode.budget();
            frame_done |= self.advance(bus);
        }
        frame_done
    }

    fn advance<B: Bus>(&mut self, bus: &mut B) -> bool {
        match self.mode {
            PpuMode::AccessOam => self.enter(bus, PpuMode::AccessVram),
            PpuMode::AccessVram => {
                self.enter(bus, PpuMode::HBlank);
                self.end_of_transfer(bus);
            }
            PpuMode::HBlank => {
                let line = self.scanline as usize;
                render::render_scanline(bus, self.scanline, &mut self.back[line]);
                self.next_line(bus);
                if self.scanline == VBLANK_START_LINE {
                    self.enter(bus, PpuMode::VBlank);
                    bus.request_interrupt(Interrupt::VBLANK);
                    log::trace!("VBlank start (frame {})", self.frames);
                } else {
                    self.enter(bus, PpuMode::AccessOam);
                }
            }
            PpuMode::VBlank => {
                self.next_line(bus);
                if self.scanline == LINES_PER_FRAME {
                    self.present();
                    self.scanline = 0;
                    bus.set_ly(0);
                    self.enter(bus, PpuMode::AccessOam);
                    return true;
                }
            }
        }
        false
    }

    /// HBlank entry: HBlank STAT source and the LY/LYC comparison.
    fn end_of_transfer<B: Bus>(&mut self, bus: &mut B) {
        if bus.stat_flag(Stat::HBLANK_INTERRUPT) {
            bus.request_interrupt(Interrupt::LCD_STAT);
        }

        let coincidence = bus.lyc() == self.scanline;
        if coincidence && bus.stat_flag(Stat::LYC_INTERRUPT) {
            bus.request_interrupt(Interrupt::LCD_STAT);
        }
        bus.set_stat_flag(Stat::COINCIDENCE, coincidence);
    }

    fn next_line<B: Bus>(&mut self, bus: &mut B) {
        self.scanline += 1;
        bus.set_ly(self.scanline);
    }

    fn enter<B: Bus>(&mut self, bus: &mut B, mode: PpuMode) {
        self.mode = mode;
        bus.set_stat_mode(mode.stat_bits());
    }

    fn present(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
        self.frames += 1;
        log::debug!("frame {} complete", self.frames);
    }
}

#[cfg(test)]
mod tests;
