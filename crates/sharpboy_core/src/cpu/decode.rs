//! Opcode decoding.
//!
//! Every opcode byte is decoded once into an [`Instruction`] and cached in a
//! 256-entry table; the CB-prefixed space gets its own table of
//! [`CbInstruction`]s. Execution then matches on the decoded variant instead
//! of re-deriving bit fields.

use lazy_static::lazy_static;

use super::regs::{Reg8, RegisterPair};

/// 8-bit operand: a plain register or the byte at (HL).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operand8 {
    Reg(Reg8),
    IndirectHl,
}

impl Operand8 {
    /// Decode the 3-bit register selector used across the opcode tables:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    pub fn from_selector(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Operand8::Reg(Reg8::B),
            1 => Operand8::Reg(Reg8::C),
            2 => Operand8::Reg(Reg8::D),
            3 => Operand8::Reg(Reg8::E),
            4 => Operand8::Reg(Reg8::H),
            5 => Operand8::Reg(Reg8::L),
            6 => Operand8::IndirectHl,
            _ => Operand8::Reg(Reg8::A),
        }
    }
}

/// 16-bit operand for loads, INC/DEC and ADD HL.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reg16 {
    Pair(RegisterPair),
    Sp,
}

impl Reg16 {
    /// Pair selection by the high nibble of the opcode (0..=3).
    fn from_high_nibble(d1: u8) -> Self {
        match d1 & 0x03 {
            0 => Reg16::Pair(RegisterPair::BC),
            1 => Reg16::Pair(RegisterPair::DE),
            2 => Reg16::Pair(RegisterPair::HL),
            _ => Reg16::Sp,
        }
    }
}

/// Register pair moved by PUSH/POP.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StackPair {
    Pair(RegisterPair),
    Af,
}

/// Memory operand of the `LD (rr),A` / `LD A,(rr)` family.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Indirect {
    Bc,
    De,
    /// (HL+)
    HlIncrement,
    /// (HL-)
    HlDecrement,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Condition {
    NotZero,
    Zero,
    NotCarry,
    Carry,
}

impl Condition {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Condition::NotZero,
            1 => Condition::Zero,
            2 => Condition::NotCarry,
            _ => Condition::Carry,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }
}

/// Rotate/shift operations of the CB table; the first four also exist as
/// single-byte accumulator forms (RLCA, RRCA, RLA, RRA).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => ShiftOp::Rlc,
            1 => ShiftOp::Rrc,
            2 => ShiftOp::Rl,
            3 => ShiftOp::Rr,
            4 => ShiftOp::Sla,
            5 => ShiftOp::Sra,
            6 => ShiftOp::Swap,
            _ => ShiftOp::Srl,
        }
    }
}

/// A decoded main-table instruction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Instruction {
    Nop,
    Stop,
    Halt,
    /// LD r,r' (0x40-0x7F except 0x76).
    Ld { dst: Operand8, src: Operand8 },
    /// LD r,d8
    LdImm(Operand8),
    /// LD rr,d16
    Ld16Imm(Reg16),
    /// LD (rr),A
    StoreA(Indirect),
    /// LD A,(rr)
    LoadA(Indirect),
    /// LD (a16),SP
    StoreSp,
    /// LDH (a8),A
    StoreHigh,
    /// LDH A,(a8)
    LoadHigh,
    /// LD (C),A
    StoreHighC,
    /// LD A,(C)
    LoadHighC,
    /// LD (a16),A
    StoreAbsolute,
    /// LD A,(a16)
    LoadAbsolute,
    /// LD SP,HL
    LdSpHl,
    /// LD HL,SP+e8
    LdHlSpOffset,
    /// ADD SP,e8
    AddSpOffset,
    Inc(Operand8),
    Dec(Operand8),
    Inc16(Reg16),
    Dec16(Reg16),
    AddHl(Reg16),
    Alu(AluOp, Operand8),
    AluImm(AluOp),
    /// RLCA / RRCA / RLA / RRA
    RotateA(ShiftOp),
    Daa,
    Cpl,
    Scf,
    Ccf,
    Jr(Option<Condition>),
    Jp(Option<Condition>),
    JpHl,
    Call(Option<Condition>),
    Ret(Option<Condition>),
    Reti,
    Rst(u16),
    Push(StackPair),
    Pop(StackPair),
    Di,
    Ei,
    /// 0xCB, the next byte selects from the extended table.
    Prefix,
    /// One of the eleven unused opcodes.
    Invalid,
}

/// A decoded CB-prefixed instruction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CbInstruction {
    Shift(ShiftOp, Operand8),
    Bit(u8, Operand8),
    Res(u8, Operand8),
    Set(u8, Operand8),
}

/// Decode a main-table opcode byte.
pub fn decode(opcode: u8) -> Instruction {
    // 0x[d1][d0]
    let d1 = opcode >> 4;
    let d0 = opcode & 0x0F;
    let y = (opcode >> 3) & 0x07;
    let z = opcode & 0x07;

    match opcode {
        0x00 => Instruction::Nop,
        0x10 => Instruction::Stop,
        0x76 => Instruction::Halt,
        0x40..=0x7F => Instruction::Ld {
            dst: Operand8::from_selector(y),
            src: Operand8::from_selector(z),
        },
        0x80..=0xBF => Instruction::Alu(AluOp::from_bits(y), Operand8::from_selector(z)),

        0x07 | 0x0F | 0x17 | 0x1F => Instruction::RotateA(ShiftOp::from_bits(y)),
        0x27 => Instruction::Daa,
        0x2F => Instruction::Cpl,
        0x37 => Instruction::Scf,
        0x3F => Instruction::Ccf,
        0x08 => Instruction::StoreSp,
        0x18 => Instruction::Jr(None),
        0x20 | 0x28 | 0x30 | 0x38 => Instruction::Jr(Some(Condition::from_bits(y))),

        _ if d1 < 0x04 => match d0 {
            0x01 => Instruction::Ld16Imm(Reg16::from_high_nibble(d1)),
            0x02 => Instruction::StoreA(indirect_from_high_nibble(d1)),
            0x0A => Instruction::LoadA(indirect_from_high_nibble(d1)),
            0x03 => Instruction::Inc16(Reg16::from_high_nibble(d1)),
            0x0B => Instruction::Dec16(Reg16::from_high_nibble(d1)),
            0x09 => Instruction::AddHl(Reg16::from_high_nibble(d1)),
            0x04 | 0x0C => Instruction::Inc(Operand8::from_selector(y)),
            0x05 | 0x0D => Instruction::Dec(Operand8::from_selector(y)),
            0x06 | 0x0E => Instruction::LdImm(Operand8::from_selector(y)),
            _ => Instruction::Invalid,
        },

        0xC9 => Instruction::Ret(None),
        0xD9 => Instruction::Reti,
        0xC0 | 0xC8 | 0xD0 | 0xD8 => Instruction::Ret(Some(Condition::from_bits(y))),
        0xC3 => Instruction::Jp(None),
        0xC2 | 0xCA | 0xD2 | 0xDA => Instruction::Jp(Some(Condition::from_bits(y))),
        0xE9 => Instruction::JpHl,
        0xCD => Instruction::Call(None),
        0xC4 | 0xCC | 0xD4 | 0xDC => Instruction::Call(Some(Condition::from_bits(y))),
        0xCB => Instruction::Prefix,

        0xE0 => Instruction::StoreHigh,
        0xF0 => Instruction::LoadHigh,
        0xE2 => Instruction::StoreHighC,
        0xF2 => Instruction::LoadHighC,
        0xEA => Instruction::StoreAbsolute,
        0xFA => Instruction::LoadAbsolute,
        0xE8 => Instruction::AddSpOffset,
        0xF8 => Instruction::LdHlSpOffset,
        0xF9 => Instruction::LdSpHl,
        0xF3 => Instruction::Di,
        0xFB => Instruction::Ei,

        _ if d0 == 0x01 => Instruction::Pop(stack_pair_from_high_nibble(d1)),
        _ if d0 == 0x05 => Instruction::Push(stack_pair_from_high_nibble(d1)),
        _ if z == 0x06 => Instruction::AluImm(AluOp::from_bits(y)),
        _ if z == 0x07 => Instruction::Rst(u16::from(y) * 8),

        // D3, DB, DD, E3, E4, EB, EC, ED, F4, FC, FD
        _ => Instruction::Invalid,
    }
}

/// Decode the byte following a 0xCB prefix.
pub fn decode_cb(opcode: u8) -> CbInstruction {
    let y = (opcode >> 3) & 0x07;
    let operand = Operand8::from_selector(opcode);
    match opcode >> 6 {
        0 => CbInstruction::Shift(ShiftOp::from_bits(y), operand),
        1 => CbInstruction::Bit(y, operand),
        2 => CbInstruction::Res(y, operand),
        _ => CbInstruction::Set(y, operand),
    }
}

fn indirect_from_high_nibble(d1: u8) -> Indirect {
    match d1 & 0x03 {
        0 => Indirect::Bc,
        1 => Indirect::De,
        2 => Indirect::HlIncrement,
        _ => Indirect::HlDecrement,
    }
}

fn stack_pair_from_high_nibble(d1: u8) -> StackPair {
    match d1 & 0x03 {
        0 => StackPair::Pair(RegisterPair::BC),
        1 => StackPair::Pair(RegisterPair::DE),
        2 => StackPair::Pair(RegisterPair::HL),
        _ => StackPair::Af,
    }
}

lazy_static! {
    static ref MAIN_TABLE: [Instruction; 256] = {
        let mut table = [Instruction::Invalid; 256];
        for (opcode, slot) in table.iter_mut().enumerate() {
            *slot = decode(opcode as u8);
        }
        table
    };
    static ref CB_TABLE: [CbInstruction; 256] = {
        let mut table = [CbInstruction::Bit(0, Operand8::IndirectHl); 256];
        for (opcode, slot) in table.iter_mut().enumerate() {
            *slot = decode_cb(opcode as u8);
        }
        table
    };
}

#[inline]
pub fn lookup(opcode: u8) -> Instruction {
    MAIN_TABLE[opcode as usize]
}

#[inline]
pub fn lookup_cb(opcode: u8) -> CbInstruction {
    CB_TABLE[opcode as usize]
}
