use bitflags::bitflags;

bitflags! {
    /// Condition codes held in the F register.
    ///
    /// Only the upper nibble is defined, so every constructor that goes
    /// through `from_bits_truncate` (and every set/clear) keeps bits 0-3 at
    /// zero.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Flags: u8 {
        /// Z
        const ZERO = 1 << 7;
        /// N
        const SUBTRACT = 1 << 6;
        /// H
        const HALF_CARRY = 1 << 5;
        /// C
        const CARRY = 1 << 4;
    }
}

impl Flags {
    #[inline]
    pub fn zero(self) -> bool {
        self.contains(Flags::ZERO)
    }

    #[inline]
    pub fn subtract(self) -> bool {
        self.contains(Flags::SUBTRACT)
    }

    #[inline]
    pub fn half_carry(self) -> bool {
        self.contains(Flags::HALF_CARRY)
    }

    #[inline]
    pub fn carry(self) -> bool {
        self.contains(Flags::CARRY)
    }

    /// Carry as an arithmetic carry-in (0 or 1).
    #[inline]
    pub fn carry_bit(self) -> u8 {
        self.carry() as u8
    }

    /// Build a full flag byte from the four condition bits.
    pub fn from_parts(zero: bool, subtract: bool, half_carry: bool, carry: bool) -> Self {
        let mut flags = Flags::empty();
        flags.set(Flags::ZERO, zero);
        flags.set(Flags::SUBTRACT, subtract);
        flags.set(Flags::HALF_CARRY, half_carry);
        flags.set(Flags::CARRY, carry);
        flags
    }
}
