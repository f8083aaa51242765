use bitflags::bitflags;

/// Addresses of the I/O registers the core reads or writes directly.
pub mod reg {
    /// Serial transfer data.
    pub const SB: u16 = 0xFF01;
    /// Serial transfer control.
    pub const SC: u16 = 0xFF02;
    /// Interrupt flag.
    pub const IF: u16 = 0xFF0F;
    pub const LCDC: u16 = 0xFF40;
    pub const STAT: u16 = 0xFF41;
    pub const SCY: u16 = 0xFF42;
    pub const SCX: u16 = 0xFF43;
    pub const LY: u16 = 0xFF44;
    pub const LYC: u16 = 0xFF45;
    pub const BGP: u16 = 0xFF47;
    pub const WY: u16 = 0xFF4A;
    pub const WX: u16 = 0xFF4B;
    /// Interrupt enable.
    pub const IE: u16 = 0xFFFF;
}

bitflags! {
    /// LCD control register (LCDC, $FF40).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Lcdc: u8 {
        const DISPLAY_ENABLE = 1 << 7;
        /// Window tile map: 0=$9800, 1=$9C00.
        const WINDOW_TILE_MAP = 1 << 6;
        const WINDOW_ENABLE = 1 << 5;
        /// BG/window tile data: 0=$8800 signed, 1=$8000 unsigned.
        const TILE_DATA = 1 << 4;
        /// BG tile map: 0=$9800, 1=$9C00.
        const BG_TILE_MAP = 1 << 3;
        /// Sprite size: 0=8x8, 1=8x16.
        const SPRITE_SIZE = 1 << 2;
        const SPRITES_ENABLE = 1 << 1;
        const BG_ENABLE = 1 << 0;
    }
}

impl Lcdc {
    pub fn display_enabled(self) -> bool {
        self.contains(Lcdc::DISPLAY_ENABLE)
    }

    pub fn window_tile_map_select(self) -> bool {
        self.contains(Lcdc::WINDOW_TILE_MAP)
    }

    pub fn window_enabled(self) -> bool {
        self.contains(Lcdc::WINDOW_ENABLE)
    }

    pub fn tile_data_select(self) -> bool {
        self.contains(Lcdc::TILE_DATA)
    }

    pub fn bg_tile_map_select(self) -> bool {
        self.contains(Lcdc::BG_TILE_MAP)
    }

    pub fn tall_sprites(self) -> bool {
        self.contains(Lcdc::SPRITE_SIZE)
    }

    pub fn sprites_enabled(self) -> bool {
        self.contains(Lcdc::SPRITES_ENABLE)
    }

    pub fn bg_enabled(self) -> bool {
        self.contains(Lcdc::BG_ENABLE)
    }
}

bitflags! {
    /// LCD status register (STAT, $FF41).
    ///
    /// Bits 0-1 hold the current PPU mode, bit 2 the LY==LYC coincidence
    /// flag, bits 3-6 the interrupt source selects.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Stat: u8 {
        const LYC_INTERRUPT = 1 << 6;
        const OAM_INTERRUPT = 1 << 5;
        const VBLANK_INTERRUPT = 1 << 4;
        const HBLANK_INTERRUPT = 1 << 3;
        const COINCIDENCE = 1 << 2;
        const MODE_HIGH = 1 << 1;
        const MODE_LOW = 1 << 0;
    }
}

bitflags! {
    /// Interrupt request / enable bits shared by IF ($FF0F) and IE ($FFFF).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Interrupt: u8 {
        const VBLANK = 1 << 0;
        const LCD_STAT = 1 << 1;
        const TIMER = 1 << 2;
        const SERIAL = 1 << 3;
        const JOYPAD = 1 << 4;
    }
}

/// Abstraction over the Game Boy bus (memory and IO).
///
/// Implementors only need to supply byte access; word access and the LCD /
/// interrupt register helpers used by the PPU are layered on top.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Little-endian 16-bit read composed of two byte reads.
    fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read8(addr);
        let hi = self.read8(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Little-endian 16-bit write composed of two byte writes.
    fn write16(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr, lo);
        self.write8(addr.wrapping_add(1), hi);
    }

    fn lcdc(&mut self) -> Lcdc {
        Lcdc::from_bits_retain(self.read8(reg::LCDC))
    }

    fn stat(&mut self) -> Stat {
        Stat::from_bits_retain(self.read8(reg::STAT))
    }

    fn stat_flag(&mut self, flag: Stat) -> bool {
        self.stat().contains(flag)
    }

    fn set_stat_flag(&mut self, flag: Stat, value: bool) {
        let mut stat = self.stat();
        stat.set(flag, value);
        self.write8(reg::STAT, stat.bits());
    }

    /// Replace STAT bits 0-1 with `mode`, leaving the other bits alone.
    fn set_stat_mode(&mut self, mode: u8) {
        let stat = self.read8(reg::STAT);
        self.write8(reg::STAT, (stat & !0x03) | (mode & 0x03));
    }

    fn interrupt_requested(&mut self, interrupt: Interrupt) -> bool {
        Interrupt::from_bits_retain(self.read8(reg::IF)).contains(interrupt)
    }

    fn request_interrupt(&mut self, interrupt: Interrupt) {
        let iflags = self.read8(reg::IF);
        self.write8(reg::IF, iflags | interrupt.bits());
    }

    fn clear_interrupt(&mut self, interrupt: Interrupt) {
        let iflags = self.read8(reg::IF);
        self.write8(reg::IF, iflags & !interrupt.bits());
    }

    /// Interrupts that are both requested and enabled.
    fn pending_interrupts(&mut self) -> Interrupt {
        let iflags = self.read8(reg::IF);
        let enabled = self.read8(reg::IE);
        Interrupt::from_bits_truncate(iflags & enabled)
    }

    fn ly(&mut self) -> u8 {
        self.read8(reg::LY)
    }

    fn set_ly(&mut self, value: u8) {
        self.write8(reg::LY, value);
    }

    fn lyc(&mut self) -> u8 {
        self.read8(reg::LYC)
    }

    fn set_lyc(&mut self, value: u8) {
        self.write8(reg::LYC, value);
    }

    fn scroll_x(&mut self) -> u8 {
        self.read8(reg::SCX)
    }

    fn scroll_y(&mut self) -> u8 {
        self.read8(reg::SCY)
    }

    fn window_x(&mut self) -> u8 {
        self.read8(reg::WX)
    }

    fn window_y(&mut self) -> u8 {
        self.read8(reg::WY)
    }
}
