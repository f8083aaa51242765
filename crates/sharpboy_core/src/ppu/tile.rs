//! Tile data and tile map addressing.

use crate::bus::{Bus, Lcdc};

/// Bytes per 8x8 tile: two bitplane bytes per row.
pub const TILE_BYTES: u16 = 16;
/// Tiles per tile map row/column.
pub const MAP_TILES: u16 = 32;

/// How a tile index from the map is turned into a tile-data address.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TileData {
    /// $8000 + index * 16, index in 0..=255.
    Unsigned,
    /// $9000 + index * 16, index in -128..=127.
    Signed,
}

impl TileData {
    pub fn from_lcdc(lcdc: Lcdc) -> Self {
        if lcdc.tile_data_select() {
            TileData::Unsigned
        } else {
            TileData::Signed
        }
    }

    /// Address of the first byte of tile `index`.
    pub fn tile_address(self, index: u8) -> u16 {
        match self {
            TileData::Unsigned => 0x8000 + u16::from(index) * TILE_BYTES,
            TileData::Signed => {
                0x9000u16.wrapping_add_signed(i16::from(index as i8) * TILE_BYTES as i16)
            }
        }
    }

    /// Address of the bitplane pair for `row` (0..8) of tile `index`.
    pub fn row_address(self, index: u8, row: u8) -> u16 {
        self.tile_address(index) + u16::from(row & 0x07) * 2
    }
}

/// One of the two 32x32 tile maps in VRAM.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TileMap {
    base: u16,
}

impl TileMap {
    pub const LOW: TileMap = TileMap { base: 0x9800 };
    pub const HIGH: TileMap = TileMap { base: 0x9C00 };

    /// Map selected by an LCDC select bit: clear = $9800, set = $9C00.
    pub fn select(high: bool) -> Self {
        if high {
            Self::HIGH
        } else {
            Self::LOW
        }
    }

    pub fn base(self) -> u16 {
        self.base
    }

    /// Address of the map cell covering tile column `tile_x`, row `tile_y`.
    pub fn cell_address(self, tile_x: u8, tile_y: u8) -> u16 {
        let x = u16::from(tile_x) % MAP_TILES;
        let y = u16::from(tile_y) % MAP_TILES;
        self.base + y * MAP_TILES + x
    }

    pub fn tile_index<B: Bus>(self, bus: &mut B, tile_x: u8, tile_y: u8) -> u8 {
        bus.read8(self.cell_address(tile_x, tile_y))
    }
}

/// Colour index (0..=3) of pixel `x` in a row; bit `7 - x` of `lo` is the low
/// bit and of `hi` the high bit.
#[inline]
pub fn pixel_color(lo: u8, hi: u8, x: u8) -> u8 {
    let bit = 7 - (x & 0x07);
    (((hi >> bit) & 0x01) << 1) | ((lo >> bit) & 0x01)
}

/// A decoded 8x8 tile of 2-bit colour indices, `pixels[y][x]`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Tile {
    pub pixels: [[u8; 8]; 8],
}

impl Tile {
    pub fn decode(bytes: &[u8; 16]) -> Self {
        let mut pixels = [[0u8; 8]; 8];
        for (y, row) in pixels.iter_mut().enumerate() {
            let lo = bytes[y * 2];
            let hi = bytes[y * 2 + 1];
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = pixel_color(lo, hi, x as u8);
            }
        }
        Self { pixels }
    }

    /// Read tile `index` from the bus using the given addressing mode.
    pub fn read<B: Bus>(bus: &mut B, data: TileData, index: u8) -> Self {
        let base = data.tile_address(index);
        let mut bytes = [0u8; 16];
        for (offset, byte) in (0u16..).zip(bytes.iter_mut()) {
            *byte = bus.read8(base + offset);
        }
        Self::decode(&bytes)
    }

    #[inline]
    pub fn pixel(&self, x: u8, y: u8) -> u8 {
        self.pixels[(y & 0x07) as usize][(x & 0x07) as usize]
    }
}
