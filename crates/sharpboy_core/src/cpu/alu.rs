use super::decode::{AluOp, ShiftOp};
use super::{Cpu, Flags};

impl Cpu {
    pub(super) fn alu(&mut self, op: AluOp, value: u8) {
        let carry = self.regs.f.carry_bit();
        match op {
            AluOp::Add => self.alu_add(value, 0),
            AluOp::Adc => self.alu_add(value, carry),
            AluOp::Sub => self.alu_sub(value, 0),
            AluOp::Sbc => self.alu_sub(value, carry),
            AluOp::And => self.alu_and(value),
            AluOp::Xor => self.alu_xor(value),
            AluOp::Or => self.alu_or(value),
            AluOp::Cp => self.alu_cp(value),
        }
    }

    /// Core 8-bit ADD/ADC operation on A.
    ///
    /// The half-carry covers every way the carry-in can push the low nibble
    /// over 0xF: `A + value`, `A + carry`, `carry + value` and
    /// `(A + carry) + value` all feed the same nibble sum.
    pub(super) fn alu_add(&mut self, value: u8, carry_in: u8) {
        let a = self.regs.a.get();
        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = a as u16 + value as u16 + carry_in as u16;
        let result = full as u8;

        self.regs.a.set(result);
        self.regs.f = Flags::from_parts(result == 0, false, half > 0x0F, full > 0xFF);
    }

    /// Core 8-bit SUB/SBC operation on A, mirroring `alu_add` for borrows.
    pub(super) fn alu_sub(&mut self, value: u8, carry_in: u8) {
        let a = self.regs.a.get();
        let half = (a & 0x0F) as i16 - (value & 0x0F) as i16 - carry_in as i16;
        let full = a as i16 - value as i16 - carry_in as i16;
        let result = full as u8;

        self.regs.a.set(result);
        self.regs.f = Flags::from_parts(result == 0, true, half < 0, full < 0);
    }

    #[inline]
    pub(super) fn alu_and(&mut self, value: u8) {
        let result = self.regs.a.get() & value;
        self.regs.a.set(result);
        self.regs.f = Flags::from_parts(result == 0, false, true, false);
    }

    #[inline]
    pub(super) fn alu_or(&mut self, value: u8) {
        let result = self.regs.a.get() | value;
        self.regs.a.set(result);
        self.regs.f = Flags::from_parts(result == 0, false, false, false);
    }

    #[inline]
    pub(super) fn alu_xor(&mut self, value: u8) {
        let result = self.regs.a.get() ^ value;
        self.regs.a.set(result);
        self.regs.f = Flags::from_parts(result == 0, false, false, false);
    }

    /// Compare A with `value`, setting flags as if `A - value` was performed.
    /// A itself is not modified.
    #[inline]
    pub(super) fn alu_cp(&mut self, value: u8) {
        let a = self.regs.a.get();
        self.regs.f = Flags::from_parts(a == value, true, (a & 0x0F) < (value & 0x0F), a < value);
    }

    /// 8-bit increment used by INC r and INC (HL). C is left unchanged.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.regs.f.set(Flags::ZERO, result == 0);
        self.regs.f.set(Flags::SUBTRACT, false);
        self.regs.f.set(Flags::HALF_CARRY, (value & 0x0F) == 0x0F);
        result
    }

    /// 8-bit decrement used by DEC r and DEC (HL). C is left unchanged.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.regs.f.set(Flags::ZERO, result == 0);
        self.regs.f.set(Flags::SUBTRACT, true);
        self.regs.f.set(Flags::HALF_CARRY, (value & 0x0F) == 0);
        result
    }

    /// `ADD HL,rr`: Z is unaffected, H and C come from bits 11 and 15.
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        let result = hl.wrapping_add(value);

        self.regs.f.set(Flags::SUBTRACT, false);
        self.regs
            .f
            .set(Flags::HALF_CARRY, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.regs
            .f
            .set(Flags::CARRY, hl as u32 + value as u32 > 0xFFFF);

        self.regs.set_hl(result);
    }

    /// Add a signed 8-bit immediate to a 16-bit base (ADD SP,e8 and
    /// LD HL,SP+e8). Z and N are cleared; H and C come from the low byte.
    pub(super) fn alu_add16_signed(&mut self, base: u16, imm8: u8) -> u16 {
        let offset = imm8 as i8 as i16 as u16;
        self.regs.f = Flags::from_parts(
            false,
            false,
            (base & 0x000F) + (offset & 0x000F) > 0x000F,
            (base & 0x00FF) + (offset & 0x00FF) > 0x00FF,
        );
        base.wrapping_add(offset)
    }

    /// Decimal adjust accumulator after BCD addition/subtraction.
    ///
    /// Updates A, Z, H, C; leaves N unchanged.
    pub(super) fn alu_daa(&mut self) {
        let mut a = self.regs.a.get();
        let flags = self.regs.f;
        let mut adjust: u8 = if flags.carry() { 0x60 } else { 0x00 };
        if flags.half_carry() {
            adjust |= 0x06;
        }

        if !flags.subtract() {
            if (a & 0x0F) > 0x09 {
                adjust |= 0x06;
            }
            if a > 0x99 {
                adjust |= 0x60;
            }
            a = a.wrapping_add(adjust);
        } else {
            a = a.wrapping_sub(adjust);
        }

        self.regs.f.set(Flags::CARRY, adjust >= 0x60);
        self.regs.f.set(Flags::HALF_CARRY, false);
        self.regs.f.set(Flags::ZERO, a == 0);
        self.regs.a.set(a);
    }

    /// Rotate/shift/swap primitive shared by the CB table and the
    /// accumulator rotates. Returns the result and the new flags; Z reflects
    /// the result, N and H are cleared, C takes the bit shifted out.
    pub(super) fn alu_shift(&self, op: ShiftOp, value: u8) -> (u8, Flags) {
        let carry_in = self.regs.f.carry();
        let (result, carry_out) = match op {
            ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            ShiftOp::Rl => ((value << 1) | carry_in as u8, value & 0x80 != 0),
            ShiftOp::Rr => ((value >> 1) | ((carry_in as u8) << 7), value & 0x01 != 0),
            ShiftOp::Sla => (value << 1, value & 0x80 != 0),
            ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            ShiftOp::Swap => (value.rotate_left(4), false),
            ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
        };
        (result, Flags::from_parts(result == 0, false, false, carry_out))
    }

    /// BIT n: Z is the complement of the tested bit, N=0, H=1, C unchanged.
    pub(super) fn alu_bit(&mut self, bit: u8, value: u8) {
        self.regs.f.set(Flags::ZERO, value & (1 << bit) == 0);
        self.regs.f.set(Flags::SUBTRACT, false);
        self.regs.f.set(Flags::HALF_CARRY, true);
    }
}
