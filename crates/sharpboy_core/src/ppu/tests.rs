use super::*;
use crate::bus::{reg, Bus, Interrupt, Lcdc, Stat};

struct TestBus {
    memory: [u8; 0x10000],
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
        }
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }
}

const VISIBLE_LINE: u32 = 80 + 172 + 204;

fn lcd_on(bus: &mut TestBus, extra: Lcdc) {
    bus.memory[reg::LCDC as usize] = (Lcdc::DISPLAY_ENABLE | Lcdc::BG_ENABLE | extra).bits();
}

/// Fill tile `index` in the $8000 block with one colour.
fn solid_tile(bus: &mut TestBus, index: u8, color: u8) {
    let lo = if color & 1 != 0 { 0xFF } else { 0x00 };
    let hi = if color & 2 != 0 { 0xFF } else { 0x00 };
    let base = 0x8000 + index as usize * 16;
    for row in 0..8 {
        bus.memory[base + row * 2] = lo;
        bus.memory[base + row * 2 + 1] = hi;
    }
}

#[test]
fn starts_at_line_zero_in_oam_search() {
    let ppu = Ppu::new();
    assert_eq!(ppu.mode(), PpuMode::AccessOam);
    assert_eq!(ppu.scanline(), 0);
    assert_eq!(ppu.mode_cycles(), 0);
}

#[test]
fn mode_sequence_within_a_visible_line() {
    let mut bus = TestBus::default();
    let mut ppu = Ppu::new();

    ppu.tick(&mut bus, 79);
    assert_eq!(ppu.mode(), PpuMode::AccessOam);
    ppu.tick(&mut bus, 1);
    assert_eq!(ppu.mode(), PpuMode::AccessVram);
    assert_eq!(bus.memory[reg::STAT as usize] & 0x03, 3);

    ppu.tick(&mut bus, 172);
    assert_eq!(ppu.mode(), PpuMode::HBlank);
    assert_eq!(bus.memory[reg::STAT as usize] & 0x03, 0);

    ppu.tick(&mut bus, 204);
    assert_eq!(ppu.mode(), PpuMode::AccessOam);
    assert_eq!(ppu.scanline(), 1);
    assert_eq!(bus.memory[reg::LY as usize], 1);
    assert_eq!(bus.memory[reg::STAT as usize] & 0x03, 2);
}

#[test]
fn remainder_carries_into_the_next_mode() {
    let mut bus = TestBus::default();
    let mut ppu = Ppu::new();

    ppu.tick(&mut bus, 100);

    assert_eq!(ppu.mode(), PpuMode::AccessVram);
    assert_eq!(ppu.mode_cycles(), 20);
}

#[test]
fn accumulator_stays_below_budget() {
    let mut bus = TestBus::default();
    let mut ppu = Ppu::new();

    for step in [0u32, 1, 3, 5, 79, 200, 456, 1000, 4560, 70224, 12345] {
        ppu.tick(&mut bus, step);
        assert!(
            ppu.mode_cycles() < ppu.mode().budget(),
            "after tick({step}): {} >= {} in {:?}",
            ppu.mode_cycles(),
            ppu.mode().budget(),
            ppu.mode()
        );
    }
}

#[test]
fn huge_tick_after_partial_tick() {
    let mut bus = TestBus::default();
    let mut ppu = Ppu::new();

    ppu.tick(&mut bus, 10);
    assert!(ppu.tick(&mut bus, u32::MAX - 5));

    let total = u64::from(u32::MAX) + 5;
    let into_frame = (total % u64::from(CYCLES_PER_FRAME)) as u32;
    assert_eq!(ppu.frame_count(), total / u64::from(CYCLES_PER_FRAME));
    assert!(ppu.mode_cycles() < ppu.mode().budget());
    assert_eq!(ppu.mode(), PpuMode::VBlank);
    assert_eq!(ppu.scanline(), (into_frame / CYCLES_PER_LINE) as u8);
    assert_eq!(ppu.mode_cycles(), into_frame % CYCLES_PER_LINE);
    assert_eq!(bus.memory[reg::LY as usize], ppu.scanline());
}

#[test]
fn one_frame_of_cycles_emits_exactly_one_frame() {
    let mut bus = TestBus::default();
    let mut ppu = Ppu::new();

    let total = VISIBLE_LINE * 144 + 456 * 10;
    assert_eq!(total, CYCLES_PER_FRAME);

    assert!(ppu.tick(&mut bus, total));
    assert_eq!(ppu.frame_count(), 1);
    assert_eq!(ppu.scanline(), 0);
    assert_eq!(ppu.mode(), PpuMode::AccessOam);
    assert_eq!(ppu.mode_cycles(), 0);
    assert_eq!(bus.memory[reg::LY as usize], 0);
}

#[test]
fn one_frame_in_instruction_sized_steps() {
    let mut bus = TestBus::default();
    let mut ppu = Ppu::new();

    let mut frames = 0;
    let mut spent = 0;
    let costs = [1u32, 2, 3, 4, 6];
    let mut i = 0;
    while spent < CYCLES_PER_FRAME {
        let c = costs[i % costs.len()].min(CYCLES_PER_FRAME - spent);
        if ppu.tick(&mut bus, c) {
            frames += 1;
        }
        spent += c;
        i += 1;
    }

    assert_eq!(frames, 1);
    assert_eq!(ppu.scanline(), 0);
    assert_eq!(ppu.mode(), PpuMode::AccessOam);
}

#[test]
fn vblank_raises_interrupt_flag_at_line_144() {
    let mut bus = TestBus::default();
    let mut ppu = Ppu::new();

    ppu.tick(&mut bus, VISIBLE_LINE * 144 - 1);
    assert!(!bus.interrupt_requested(Interrupt::VBLANK));
    assert_eq!(ppu.mode(), PpuMode::HBlank);

    ppu.tick(&mut bus, 1);
    assert_eq!(ppu.mode(), PpuMode::VBlank);
    assert_eq!(ppu.scanline(), 144);
    assert_eq!(bus.memory[reg::LY as usize], 144);
    assert_eq!(bus.memory[reg::STAT as usize] & 0x03, 1);
    assert!(bus.interrupt_requested(Interrupt::VBLANK));
}

#[test]
fn vblank_lines_advance_every_456_cycles() {
    let mut bus = TestBus::default();
    let mut ppu = Ppu::new();
    ppu.tick(&mut bus, VISIBLE_LINE * 144);

    for line in 145..154u32 {
        ppu.tick(&mut bus, 456);
        assert_eq!(ppu.scanline() as u32, line);
        assert_eq!(ppu.mode(), PpuMode::VBlank);
    }
    assert!(ppu.tick(&mut bus, 456));
    assert_eq!(ppu.scanline(), 0);
}

#[test]
fn hblank_stat_interrupt_only_when_enabled() {
    let mut bus = TestBus::default();
    let mut ppu = Ppu::new();

    ppu.tick(&mut bus, 80 + 172);
    assert!(!bus.interrupt_requested(Interrupt::LCD_STAT));

    let mut bus = TestBus::default();
    let mut ppu = Ppu::new();
    bus.memory[reg::STAT as usize] = Stat::HBLANK_INTERRUPT.bits();

    ppu.tick(&mut bus, 80 + 172);
    assert!(bus.interrupt_requested(Interrupt::LCD_STAT));
}

#[test]
fn coincidence_bit_tracks_lyc_regardless_of_interrupt_enable() {
    let mut bus = TestBus::default();
    let mut ppu = Ppu::new();
    bus.memory[reg::LYC as usize] = 2;

    ppu.tick(&mut bus, VISIBLE_LINE + 80 + 172);
    assert!(!bus.stat_flag(Stat::COINCIDENCE));

    ppu.tick(&mut bus, 204 + 80 + 172);
    assert_eq!(ppu.scanline(), 2);
    assert!(bus.stat_flag(Stat::COINCIDENCE));
    assert!(!bus.interrupt_requested(Interrupt::LCD_STAT));

    ppu.tick(&mut bus, 204 + 80 + 172);
    assert!(!bus.stat_flag(Stat::COINCIDENCE));
}

#[test]
fn coincidence_interrupt_when_enabled() {
    let mut bus = TestBus::default();
    let mut ppu = Ppu::new();
    bus.memory[reg::LYC as usize] = 0;
    bus.memory[reg::STAT as usize] = Stat::LYC_INTERRUPT.bits();

    ppu.tick(&mut bus, 80 + 172);

    assert!(bus.interrupt_requested(Interrupt::LCD_STAT));
    assert!(bus.stat_flag(Stat::COINCIDENCE));
}

#[test]
fn renders_background_with_scroll() {
    let mut bus = TestBus::default();
    lcd_on(&mut bus, Lcdc::TILE_DATA);
    solid_tile(&mut bus, 1, 3);
    solid_tile(&mut bus, 2, 1);
    // Map row 0: tile 1 at column 1; map row 1: tile 2 at column 0.
    bus.memory[0x9801] = 1;
    bus.memory[0x9820] = 2;
    bus.memory[reg::SCX as usize] = 4;

    let mut ppu = Ppu::new();
    ppu.tick(&mut bus, CYCLES_PER_FRAME);
    let frame = ppu.frame();

    // Column 0 maps to bg x=4 (tile 0), column 4 to bg x=8 (tile 1).
    assert_eq!(frame[0][3], 0);
    assert_eq!(frame[0][4], 3);
    assert_eq!(frame[7][11], 3);
    assert_eq!(frame[0][12], 0);

    // SCY shifts map row 1 up to screen line 0.
    bus.memory[reg::SCX as usize] = 0;
    bus.memory[reg::SCY as usize] = 8;
    ppu.tick(&mut bus, CYCLES_PER_FRAME);
    let frame = ppu.frame();
    assert_eq!(frame[0][0], 1);
    assert_eq!(frame[0][8], 0);
}

#[test]
fn background_scroll_wraps_at_256() {
    let mut bus = TestBus::default();
    lcd_on(&mut bus, Lcdc::TILE_DATA);
    solid_tile(&mut bus, 1, 2);
    bus.memory[0x9800] = 1;
    bus.memory[reg::SCX as usize] = 252;

    let mut ppu = Ppu::new();
    ppu.tick(&mut bus, CYCLES_PER_FRAME);

    assert_eq!(ppu.frame()[0][3], 0);
    assert_eq!(ppu.frame()[0][4], 2);
    assert_eq!(ppu.frame()[0][11], 2);
    assert_eq!(ppu.frame()[0][12], 0);
}

#[test]
fn signed_tile_addressing() {
    let mut bus = TestBus::default();
    lcd_on(&mut bus, Lcdc::empty());
    // Tile index 0xFF with signed addressing lives at $8FF0.
    for row in 0..8 {
        bus.memory[0x8FF0 + row * 2] = 0xFF;
    }
    // Tile index 0x00 with signed addressing lives at $9000.
    for row in 0..8 {
        bus.memory[0x9001 + row * 2] = 0xFF;
    }
    bus.memory[0x9800] = 0xFF;
    bus.memory[0x9801] = 0x00;
    // Any other cell points at tile 0x01 ($9010), left blank.
    for cell in 2..32 {
        bus.memory[0x9800 + cell] = 0x01;
    }

    let mut ppu = Ppu::new();
    ppu.tick(&mut bus, CYCLES_PER_FRAME);

    assert_eq!(ppu.frame()[0][0], 1);
    assert_eq!(ppu.frame()[0][8], 2);
    assert_eq!(ppu.frame()[0][16], 0);
}

#[test]
fn high_tile_map_select() {
    let mut bus = TestBus::default();
    lcd_on(&mut bus, Lcdc::TILE_DATA | Lcdc::BG_TILE_MAP);
    solid_tile(&mut bus, 3, 3);
    bus.memory[0x9C00] = 3;

    let mut ppu = Ppu::new();
    ppu.tick(&mut bus, CYCLES_PER_FRAME);

    assert_eq!(ppu.frame()[0][0], 3);
}

#[test]
fn background_disabled_renders_colour_zero() {
    let mut bus = TestBus::default();
    bus.memory[reg::LCDC as usize] = (Lcdc::DISPLAY_ENABLE | Lcdc::TILE_DATA).bits();
    solid_tile(&mut bus, 0, 3);

    let mut ppu = Ppu::new();
    ppu.tick(&mut bus, CYCLES_PER_FRAME);

    assert!(ppu.frame().iter().flatten().all(|&p| p == 0));
}

#[test]
fn window_overlays_from_wx_wy() {
    let mut bus = TestBus::default();
    lcd_on(
        &mut bus,
        Lcdc::TILE_DATA | Lcdc::WINDOW_ENABLE | Lcdc::WINDOW_TILE_MAP,
    );
    solid_tile(&mut bus, 0, 1);
    solid_tile(&mut bus, 5, 2);
    // Window map ($9C00) is entirely tile 5.
    for cell in 0..0x400 {
        bus.memory[0x9C00 + cell] = 5;
    }
    bus.memory[reg::WY as usize] = 10;
    bus.memory[reg::WX as usize] = 7 + 20;

    let mut ppu = Ppu::new();
    ppu.tick(&mut bus, CYCLES_PER_FRAME);
    let frame = ppu.frame();

    assert_eq!(frame[9][30], 1);
    assert_eq!(frame[10][19], 1);
    assert_eq!(frame[10][20], 2);
    assert_eq!(frame[143][159], 2);
}

#[test]
fn frame_buffer_holds_last_completed_frame() {
    let mut bus = TestBus::default();
    lcd_on(&mut bus, Lcdc::TILE_DATA);
    solid_tile(&mut bus, 0, 3);

    let mut ppu = Ppu::new();
    ppu.tick(&mut bus, CYCLES_PER_FRAME);
    assert_eq!(ppu.frame()[100][100], 3);

    // Mid-frame changes do not leak into the presented frame.
    solid_tile(&mut bus, 0, 0);
    ppu.tick(&mut bus, VISIBLE_LINE * 50);
    assert_eq!(ppu.frame()[0][0], 3);
}
