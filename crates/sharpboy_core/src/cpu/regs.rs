use super::Flags;

/// An 8-bit register cell. Arithmetic on it wraps modulo 256.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Register(u8);

impl Register {
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn set(&mut self, value: u8) {
        self.0 = value;
    }

    #[inline]
    pub fn increment(&mut self) -> u8 {
        self.0 = self.0.wrapping_add(1);
        self.0
    }

    #[inline]
    pub fn decrement(&mut self) -> u8 {
        self.0 = self.0.wrapping_sub(1);
        self.0
    }
}

/// A standalone 16-bit register (SP, PC). Arithmetic wraps modulo 65536.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SpecialRegister(u16);

impl SpecialRegister {
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn set(&mut self, value: u16) {
        self.0 = value;
    }

    #[inline]
    pub fn increment(&mut self) -> u16 {
        self.0 = self.0.wrapping_add(1);
        self.0
    }

    #[inline]
    pub fn decrement(&mut self) -> u16 {
        self.0 = self.0.wrapping_sub(1);
        self.0
    }
}

/// 8-bit register selector.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reg8 {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

/// A pair of 8-bit registers addressed as one 16-bit value.
///
/// Pairs have no storage of their own: reads compose `(high << 8) | low` and
/// writes split the value back into the two backing registers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegisterPair {
    BC,
    DE,
    HL,
}

impl RegisterPair {
    fn halves(self) -> (Reg8, Reg8) {
        match self {
            RegisterPair::BC => (Reg8::B, Reg8::C),
            RegisterPair::DE => (Reg8::D, Reg8::E),
            RegisterPair::HL => (Reg8::H, Reg8::L),
        }
    }
}

/// Registers for the Game Boy CPU (LR35902).
#[derive(Clone, Copy, Debug, Default)]
pub struct Registers {
    pub a: Register,
    pub f: Flags,
    pub b: Register,
    pub c: Register,
    pub d: Register,
    pub e: Register,
    pub h: Register,
    pub l: Register,
    pub sp: SpecialRegister,
    pub pc: SpecialRegister,
}

impl Registers {
    /// Register values left behind by the DMG boot ROM at $0100.
    pub fn post_boot() -> Self {
        Self {
            a: Register::new(0x01),
            f: Flags::from_bits_truncate(0xB0),
            b: Register::new(0x00),
            c: Register::new(0x13),
            d: Register::new(0x00),
            e: Register::new(0xD8),
            h: Register::new(0x01),
            l: Register::new(0x4D),
            sp: SpecialRegister::new(0xFFFE),
            pc: SpecialRegister::new(0x0100),
        }
    }

    pub fn reg(&self, reg: Reg8) -> &Register {
        match reg {
            Reg8::A => &self.a,
            Reg8::B => &self.b,
            Reg8::C => &self.c,
            Reg8::D => &self.d,
            Reg8::E => &self.e,
            Reg8::H => &self.h,
            Reg8::L => &self.l,
        }
    }

    pub fn reg_mut(&mut self, reg: Reg8) -> &mut Register {
        match reg {
            Reg8::A => &mut self.a,
            Reg8::B => &mut self.b,
            Reg8::C => &mut self.c,
            Reg8::D => &mut self.d,
            Reg8::E => &mut self.e,
            Reg8::H => &mut self.h,
            Reg8::L => &mut self.l,
        }
    }

    #[inline]
    pub fn read(&self, reg: Reg8) -> u8 {
        self.reg(reg).get()
    }

    #[inline]
    pub fn write(&mut self, reg: Reg8, value: u8) {
        self.reg_mut(reg).set(value);
    }

    pub fn pair(&self, pair: RegisterPair) -> u16 {
        let (hi, lo) = pair.halves();
        u16::from_be_bytes([self.read(hi), self.read(lo)])
    }

    pub fn set_pair(&mut self, pair: RegisterPair, value: u16) {
        let (hi, lo) = pair.halves();
        let [high, low] = value.to_be_bytes();
        self.write(hi, high);
        self.write(lo, low);
    }

    pub fn increment_pair(&mut self, pair: RegisterPair) {
        let value = self.pair(pair).wrapping_add(1);
        self.set_pair(pair, value);
    }

    pub fn decrement_pair(&mut self, pair: RegisterPair) {
        let value = self.pair(pair).wrapping_sub(1);
        self.set_pair(pair, value);
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        self.pair(RegisterPair::BC)
    }

    #[inline]
    pub fn de(&self) -> u16 {
        self.pair(RegisterPair::DE)
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        self.pair(RegisterPair::HL)
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        self.set_pair(RegisterPair::HL, value);
    }

    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a.get(), self.f.bits()])
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a.set(a);
        // Lower 4 bits of F are always zero.
        self.f = Flags::from_bits_truncate(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_REGS: [Reg8; 7] = [Reg8::A, Reg8::B, Reg8::C, Reg8::D, Reg8::E, Reg8::H, Reg8::L];

    #[test]
    fn eight_bit_registers_wrap_after_256_increments() {
        let mut regs = Registers::post_boot();
        for reg in ALL_REGS {
            let before = regs.read(reg);
            for _ in 0..256 {
                regs.reg_mut(reg).increment();
            }
            assert_eq!(regs.read(reg), before, "{reg:?}");
        }
    }

    #[test]
    fn decrement_wraps_at_zero() {
        let mut r = Register::new(0x00);
        assert_eq!(r.decrement(), 0xFF);
        let mut sp = SpecialRegister::new(0x0000);
        assert_eq!(sp.decrement(), 0xFFFF);
    }

    #[test]
    fn special_registers_wrap_after_65536_increments() {
        let mut regs = Registers::post_boot();
        for _ in 0..65536u32 {
            regs.sp.increment();
            regs.pc.increment();
        }
        assert_eq!(regs.sp.get(), 0xFFFE);
        assert_eq!(regs.pc.get(), 0x0100);
    }

    #[test]
    fn pair_round_trips_every_value_through_backing_registers() {
        let mut regs = Registers::default();
        for pair in [RegisterPair::BC, RegisterPair::DE, RegisterPair::HL] {
            for v in 0..=u16::MAX {
                regs.set_pair(pair, v);
                assert_eq!(regs.pair(pair), v);
                let (hi, lo) = pair.halves();
                assert_eq!(regs.read(hi), (v >> 8) as u8);
                assert_eq!(regs.read(lo), (v & 0xFF) as u8);
            }
        }
    }

    #[test]
    fn writing_a_backing_register_changes_the_pair() {
        let mut regs = Registers::default();
        regs.set_pair(RegisterPair::DE, 0x1234);
        regs.e.set(0xFF);
        assert_eq!(regs.de(), 0x12FF);
        regs.increment_pair(RegisterPair::DE);
        assert_eq!(regs.de(), 0x1300);
        assert_eq!(regs.d.get(), 0x13);
    }

    #[test]
    fn post_boot_values_match_dmg() {
        let regs = Registers::post_boot();
        assert_eq!(regs.af(), 0x01B0);
        assert_eq!(regs.bc(), 0x0013);
        assert_eq!(regs.de(), 0x00D8);
        assert_eq!(regs.hl(), 0x014D);
        assert_eq!(regs.sp.get(), 0xFFFE);
        assert_eq!(regs.pc.get(), 0x0100);
    }

    #[test]
    fn af_masks_low_nibble_of_flags() {
        let mut regs = Registers::default();
        regs.set_af(0x12FF);
        assert_eq!(regs.a.get(), 0x12);
        assert_eq!(regs.f.bits(), 0xF0);
    }
}
