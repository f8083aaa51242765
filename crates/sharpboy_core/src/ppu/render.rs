use crate::bus::Bus;
use crate::SCREEN_WIDTH;

use super::tile::{pixel_color, TileData, TileMap};

/// Draw scanline `line` into `row`: background first, then the window on top
/// when it is enabled and covers this line.
pub(super) fn render_scanline<B: Bus>(bus: &mut B, line: u8, row: &mut [u8; SCREEN_WIDTH]) {
    let lcdc = bus.lcdc();
    let data = TileData::from_lcdc(lcdc);

    if lcdc.bg_enabled() {
        draw_background(bus, data, TileMap::select(lcdc.bg_tile_map_select()), line, row);
    } else {
        row.fill(0);
    }

    if lcdc.window_enabled() {
        draw_window(bus, data, TileMap::select(lcdc.window_tile_map_select()), line, row);
    }
}

fn draw_background<B: Bus>(
    bus: &mut B,
    data: TileData,
    map: TileMap,
    line: u8,
    row: &mut [u8; SCREEN_WIDTH],
) {
    let scx = bus.scroll_x();
    let scy = bus.scroll_y();
    let bg_y = line.wrapping_add(scy);

    for (screen_x, pixel) in (0u8..).zip(row.iter_mut()) {
        let bg_x = screen_x.wrapping_add(scx);
        *pixel = fetch_pixel(bus, data, map, bg_x, bg_y);
    }
}

fn draw_window<B: Bus>(
    bus: &mut B,
    data: TileData,
    map: TileMap,
    line: u8,
    row: &mut [u8; SCREEN_WIDTH],
) {
    let wy = bus.window_y();
    if line < wy {
        return;
    }
    let win_y = line - wy;
    // WX is offset by 7: WX=7 puts the window's left edge at column 0.
    let wx = i16::from(bus.window_x()) - 7;

    for (screen_x, pixel) in (0i16..).zip(row.iter_mut()) {
        let win_x = screen_x - wx;
        if win_x < 0 {
            continue;
        }
        *pixel = fetch_pixel(bus, data, map, win_x as u8, win_y);
    }
}

/// Colour index at (`x`, `y`) of the 256x256 plane described by `map`.
#[inline]
fn fetch_pixel<B: Bus>(bus: &mut B, data: TileData, map: TileMap, x: u8, y: u8) -> u8 {
    let index = map.tile_index(bus, x / 8, y / 8);
    let addr = data.row_address(index, y % 8);
    let lo = bus.read8(addr);
    let hi = bus.read8(addr + 1);
    pixel_color(lo, hi, x % 8)
}
