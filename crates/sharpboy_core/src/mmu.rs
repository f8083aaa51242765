use crate::bus::{reg, Bus};

const ROM_SIZE: usize = 0x8000;
const VRAM_SIZE: usize = 0x2000;
const ERAM_SIZE: usize = 0x2000;
const WRAM_SIZE: usize = 0x2000;
const OAM_SIZE: usize = 0xA0;
const IO_SIZE: usize = 0x80;
const HRAM_SIZE: usize = 0x80;

/// One of the fixed regions of the 64 KiB address space.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Region {
    /// $0000-$7FFF, read-only cartridge ROM (no bank switching).
    Rom,
    /// $8000-$9FFF
    VideoRam,
    /// $A000-$BFFF
    ExternalRam,
    /// $C000-$DFFF
    WorkRam,
    /// $E000-$FDFF, mirrors $C000-$DDFF for both reads and writes.
    Echo,
    /// $FE00-$FE9F, sprite attribute table.
    Oam,
    /// $FEA0-$FEFF, reads as $FF and ignores writes.
    Unusable,
    /// $FF00-$FF7F
    Io,
    /// $FF80-$FFFF, high RAM with IE at the top byte.
    HighRam,
}

impl Region {
    /// Resolve an address to its region and the offset inside that region's
    /// backing array.
    ///
    /// The match covers the whole `u16` range, so every address lands in
    /// exactly one region.
    pub fn decode(addr: u16) -> (Region, usize) {
        match addr {
            0x0000..=0x7FFF => (Region::Rom, addr as usize),
            0x8000..=0x9FFF => (Region::VideoRam, (addr - 0x8000) as usize),
            0xA000..=0xBFFF => (Region::ExternalRam, (addr - 0xA000) as usize),
            0xC000..=0xDFFF => (Region::WorkRam, (addr - 0xC000) as usize),
            0xE000..=0xFDFF => (Region::Echo, (addr - 0xE000) as usize),
            0xFE00..=0xFE9F => (Region::Oam, (addr - 0xFE00) as usize),
            0xFEA0..=0xFEFF => (Region::Unusable, (addr - 0xFEA0) as usize),
            0xFF00..=0xFF7F => (Region::Io, (addr - 0xFF00) as usize),
            0xFF80..=0xFFFF => (Region::HighRam, (addr - 0xFF80) as usize),
        }
    }
}

/// Flat, region-decoded memory bus for a cartridge without a mapper.
///
/// Each region owns its own backing array. The echo region has no storage of
/// its own and is routed into work RAM.
pub struct Mmu {
    rom: Box<[u8; ROM_SIZE]>,
    vram: Box<[u8; VRAM_SIZE]>,
    eram: Box<[u8; ERAM_SIZE]>,
    wram: Box<[u8; WRAM_SIZE]>,
    oam: [u8; OAM_SIZE],
    io: [u8; IO_SIZE],
    hram: [u8; HRAM_SIZE],
}

impl Default for Mmu {
    fn default() -> Self {
        let mut mmu = Self {
            rom: Box::new([0; ROM_SIZE]),
            vram: Box::new([0; VRAM_SIZE]),
            eram: Box::new([0; ERAM_SIZE]),
            wram: Box::new([0; WRAM_SIZE]),
            oam: [0; OAM_SIZE],
            io: [0; IO_SIZE],
            hram: [0; HRAM_SIZE],
        };
        mmu.apply_dmg_initial_io_state();
        mmu
    }
}

impl Mmu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a ROM image into the cartridge area.
    ///
    /// Only the first 32 KiB are mapped; anything beyond that would need a
    /// memory bank controller.
    pub fn load_rom(&mut self, rom: &[u8]) {
        let len = rom.len().min(ROM_SIZE);
        self.rom.fill(0);
        self.rom[..len].copy_from_slice(&rom[..len]);
        if rom.len() > ROM_SIZE {
            log::warn!(
                "ROM is {} bytes; only the first {} are mapped (no bank switching)",
                rom.len(),
                ROM_SIZE
            );
        }
        let title: String = self.rom[0x134..0x144]
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect();
        log::info!("Loaded ROM '{}' ({} bytes)", title.trim(), rom.len());
    }

    /// Direct view of video RAM ($8000-$9FFF).
    pub fn vram(&self) -> &[u8] {
        &self.vram[..]
    }

    /// I/O register values after the DMG boot ROM hands over to the cartridge.
    fn apply_dmg_initial_io_state(&mut self) {
        self.io_store(0xFF00, 0xCF); // P1
        self.io_store(reg::SC, 0x7E);
        self.io_store(reg::IF, 0xE1);
        self.io_store(reg::LCDC, 0x91);
        self.io_store(reg::STAT, 0x85);
        self.io_store(reg::BGP, 0xFC);
    }

    fn io_store(&mut self, addr: u16, value: u8) {
        self.io[(addr - 0xFF00) as usize] = value;
    }
}

impl Bus for Mmu {
    fn read8(&mut self, addr: u16) -> u8 {
        let (region, offset) = Region::decode(addr);
        match region {
            Region::Rom => self.rom[offset],
            Region::VideoRam => self.vram[offset],
            Region::ExternalRam => self.eram[offset],
            Region::WorkRam | Region::Echo => self.wram[offset],
            Region::Oam => self.oam[offset],
            Region::Unusable => 0xFF,
            Region::Io => self.io[offset],
            Region::HighRam => self.hram[offset],
        }
    }

    fn write8(&mut self, addr: u16, value: u8) {
        let (region, offset) = Region::decode(addr);
        match region {
            Region::Rom => {
                log::debug!(
                    "Ignoring write of 0x{:02X} to ROM at 0x{:04X} (no mapper)",
                    value,
                    addr
                );
            }
            Region::VideoRam => self.vram[offset] = value,
            Region::ExternalRam => self.eram[offset] = value,
            Region::WorkRam | Region::Echo => self.wram[offset] = value,
            Region::Oam => self.oam[offset] = value,
            Region::Unusable => {}
            Region::Io => self.io[offset] = value,
            Region::HighRam => self.hram[offset] = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Interrupt;

    #[test]
    fn every_address_decodes_inside_its_backing_array() {
        for addr in 0..=u16::MAX {
            let (region, offset) = Region::decode(addr);
            let len = match region {
                Region::Rom => ROM_SIZE,
                Region::VideoRam => VRAM_SIZE,
                Region::ExternalRam => ERAM_SIZE,
                Region::WorkRam | Region::Echo => WRAM_SIZE,
                Region::Oam => OAM_SIZE,
                Region::Unusable => 0x60,
                Region::Io => IO_SIZE,
                Region::HighRam => HRAM_SIZE,
            };
            assert!(offset < len, "0x{addr:04X} -> {region:?}+{offset}");
        }
    }

    #[test]
    fn echo_mirrors_work_ram_for_reads_and_writes() {
        let mut mmu = Mmu::new();
        mmu.write8(0xC123, 0x42);
        assert_eq!(mmu.read8(0xE123), 0x42);

        mmu.write8(0xFDFF, 0x99);
        assert_eq!(mmu.read8(0xDDFF), 0x99);
    }

    #[test]
    fn rom_is_read_only() {
        let mut mmu = Mmu::new();
        let mut rom = vec![0u8; 0x8000];
        rom[0x0100] = 0x3E;
        mmu.load_rom(&rom);

        mmu.write8(0x0100, 0x00);
        assert_eq!(mmu.read8(0x0100), 0x3E);
    }

    #[test]
    fn word_access_is_little_endian() {
        let mut mmu = Mmu::new();
        mmu.write16(0xC000, 0xBEEF);
        assert_eq!(mmu.read8(0xC000), 0xEF);
        assert_eq!(mmu.read8(0xC001), 0xBE);
        assert_eq!(mmu.read16(0xC000), 0xBEEF);
    }

    #[test]
    fn high_ram_includes_interrupt_enable() {
        let mut mmu = Mmu::new();
        mmu.write8(reg::IE, 0x1F);
        mmu.write8(0xFF80, 0x12);
        assert_eq!(mmu.read8(reg::IE), 0x1F);
        assert_eq!(mmu.read8(0xFF80), 0x12);
    }

    #[test]
    fn lcd_register_helpers_go_through_io() {
        let mut mmu = Mmu::new();

        let lcdc = mmu.lcdc();
        assert!(lcdc.display_enabled());
        assert!(lcdc.tile_data_select());
        assert!(lcdc.bg_enabled());
        assert!(!lcdc.window_enabled());
        assert!(!lcdc.bg_tile_map_select());

        mmu.set_stat_mode(3);
        assert_eq!(mmu.read8(reg::STAT), 0x87);
        mmu.set_stat_mode(0);
        assert_eq!(mmu.read8(reg::STAT), 0x84);

        mmu.set_lyc(0x42);
        assert_eq!(mmu.read8(reg::LYC), 0x42);
        assert_eq!(mmu.lyc(), 0x42);

        mmu.write8(reg::IF, 0x00);
        mmu.request_interrupt(Interrupt::LCD_STAT);
        assert!(mmu.interrupt_requested(Interrupt::LCD_STAT));
        mmu.clear_interrupt(Interrupt::LCD_STAT);
        assert_eq!(mmu.read8(reg::IF), 0x00);
    }

    #[test]
    fn vram_view_covers_8000_to_9fff() {
        let mut mmu = Mmu::new();
        mmu.write8(0x8000, 0x3C);
        mmu.write8(0x9FFF, 0x7E);

        let vram = mmu.vram();
        assert_eq!(vram.len(), 0x2000);
        assert_eq!(vram[0], 0x3C);
        assert_eq!(vram[0x1FFF], 0x7E);
    }

    #[test]
    fn unusable_region_reads_ff() {
        let mut mmu = Mmu::new();
        mmu.write8(0xFEA0, 0x00);
        assert_eq!(mmu.read8(0xFEA0), 0xFF);
    }
}
