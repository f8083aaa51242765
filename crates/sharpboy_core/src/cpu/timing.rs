//! Instruction costs in machine cycles (1 M-cycle = 4 clock ticks).

/// Cost of every main-table opcode.
///
/// Conditional control transfers list their not-taken cost; see
/// [`branch_taken_penalty`]. Unused opcodes cost 0. The 0xCB entry covers the
/// prefix fetch only; the second byte adds [`CB_CYCLES`].
#[rustfmt::skip]
pub const OPCODE_CYCLES: [u8; 256] = [
//  x0 x1 x2 x3 x4 x5 x6 x7 x8 x9 xA xB xC xD xE xF
    1, 3, 2, 2, 1, 1, 2, 1, 5, 2, 2, 2, 1, 1, 2, 1, // 0x
    1, 3, 2, 2, 1, 1, 2, 1, 3, 2, 2, 2, 1, 1, 2, 1, // 1x
    2, 3, 2, 2, 1, 1, 2, 1, 2, 2, 2, 2, 1, 1, 2, 1, // 2x
    2, 3, 2, 2, 3, 3, 3, 1, 2, 2, 2, 2, 1, 1, 2, 1, // 3x
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, // 4x
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, // 5x
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, // 6x
    2, 2, 2, 2, 2, 2, 1, 2, 1, 1, 1, 1, 1, 1, 2, 1, // 7x
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, // 8x
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, // 9x
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, // Ax
    1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 2, 1, // Bx
    2, 3, 3, 4, 3, 4, 2, 4, 2, 4, 3, 1, 3, 6, 2, 4, // Cx
    2, 3, 3, 0, 3, 4, 2, 4, 2, 4, 3, 0, 3, 0, 2, 4, // Dx
    3, 3, 2, 0, 0, 4, 2, 4, 4, 1, 4, 0, 0, 0, 2, 4, // Ex
    3, 3, 2, 1, 0, 4, 2, 4, 3, 2, 4, 1, 0, 0, 2, 4, // Fx
];

/// Additional cost of each CB-prefixed opcode on top of the prefix byte.
///
/// Register forms cost 1, BIT n,(HL) costs 2 and the read-modify-write
/// (HL) forms cost 3.
pub const CB_CYCLES: [u8; 256] = build_cb_cycles();

const fn build_cb_cycles() -> [u8; 256] {
    let mut table = [1u8; 256];
    let mut opcode = 0;
    while opcode < 256 {
        if opcode & 0x07 == 6 {
            let is_bit = (opcode >> 6) == 1;
            table[opcode] = if is_bit { 2 } else { 3 };
        }
        opcode += 1;
    }
    table
}

/// Extra M-cycles a conditional JR/JP/CALL/RET costs when its condition holds.
pub fn branch_taken_penalty(opcode: u8) -> u8 {
    match opcode {
        0x20 | 0x28 | 0x30 | 0x38 => 1, // JR cc
        0xC2 | 0xCA | 0xD2 | 0xDA => 1, // JP cc
        0xC4 | 0xCC | 0xD4 | 0xDC => 3, // CALL cc
        0xC0 | 0xC8 | 0xD0 | 0xD8 => 3, // RET cc
        _ => 0,
    }
}
