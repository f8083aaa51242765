use super::decode::{Condition, Indirect, Operand8, Reg16, StackPair};
use super::{Bus, Cpu, Flags, RegisterPair};

impl Cpu {
    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.regs.pc.get());
        self.regs.pc.increment();
        value
    }

    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    #[inline]
    pub(super) fn read_operand<B: Bus>(&mut self, bus: &mut B, operand: Operand8) -> u8 {
        match operand {
            Operand8::Reg(reg) => self.regs.read(reg),
            Operand8::IndirectHl => bus.read8(self.regs.hl()),
        }
    }

    #[inline]
    pub(super) fn write_operand<B: Bus>(&mut self, bus: &mut B, operand: Operand8, value: u8) {
        match operand {
            Operand8::Reg(reg) => self.regs.write(reg, value),
            Operand8::IndirectHl => bus.write8(self.regs.hl(), value),
        }
    }

    pub(super) fn read_reg16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::Pair(pair) => self.regs.pair(pair),
            Reg16::Sp => self.regs.sp.get(),
        }
    }

    pub(super) fn write_reg16(&mut self, reg: Reg16, value: u16) {
        match reg {
            Reg16::Pair(pair) => self.regs.set_pair(pair, value),
            Reg16::Sp => self.regs.sp.set(value),
        }
    }

    /// Resolve the address of an `LD (rr),A` / `LD A,(rr)` operand, applying
    /// the HL post-increment/decrement.
    pub(super) fn indirect_address(&mut self, indirect: Indirect) -> u16 {
        match indirect {
            Indirect::Bc => self.regs.bc(),
            Indirect::De => self.regs.de(),
            Indirect::HlIncrement => {
                let hl = self.regs.hl();
                self.regs.increment_pair(RegisterPair::HL);
                hl
            }
            Indirect::HlDecrement => {
                let hl = self.regs.hl();
                self.regs.decrement_pair(RegisterPair::HL);
                hl
            }
        }
    }

    /// Push high byte then low byte, decrementing SP before each write.
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        let sp = self.regs.sp.decrement();
        bus.write8(sp, hi);
        let sp = self.regs.sp.decrement();
        bus.write8(sp, lo);
    }

    /// Pop low byte then high byte, incrementing SP after each read.
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = bus.read8(self.regs.sp.get());
        self.regs.sp.increment();
        let hi = bus.read8(self.regs.sp.get());
        self.regs.sp.increment();
        u16::from_le_bytes([lo, hi])
    }

    pub(super) fn read_stack_pair(&self, pair: StackPair) -> u16 {
        match pair {
            StackPair::Pair(pair) => self.regs.pair(pair),
            StackPair::Af => self.regs.af(),
        }
    }

    pub(super) fn write_stack_pair(&mut self, pair: StackPair, value: u16) {
        match pair {
            StackPair::Pair(pair) => self.regs.set_pair(pair, value),
            // set_af re-masks the restored flags.
            StackPair::Af => self.regs.set_af(value),
        }
    }

    #[inline]
    pub(super) fn condition_holds(&self, condition: Option<Condition>) -> bool {
        let f: Flags = self.regs.f;
        match condition {
            None => true,
            Some(Condition::NotZero) => !f.zero(),
            Some(Condition::Zero) => f.zero(),
            Some(Condition::NotCarry) => !f.carry(),
            Some(Condition::Carry) => f.carry(),
        }
    }
}
