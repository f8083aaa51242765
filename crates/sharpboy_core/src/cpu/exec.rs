use super::decode::{Instruction, ShiftOp};
use super::timing::branch_taken_penalty;
use super::{Bus, Cpu, Flags};

impl Cpu {
    /// Execute an already-fetched instruction.
    ///
    /// Returns the M-cycles spent on top of the opcode's table cost: the
    /// taken-branch penalty for conditional control flow and the second-byte
    /// cost for CB-prefixed instructions.
    pub(super) fn execute<B: Bus>(&mut self, bus: &mut B, opcode: u8, instruction: Instruction) -> u32 {
        match instruction {
            Instruction::Nop => {}
            Instruction::Stop => {
                // STOP is encoded as 0x10 0x00.
                self.fetch8(bus);
                self.stopped = true;
                log::debug!("STOP at 0x{:04X}", self.regs.pc.get().wrapping_sub(2));
            }
            Instruction::Halt => self.halted = true,

            Instruction::Ld { dst, src } => {
                let value = self.read_operand(bus, src);
                self.write_operand(bus, dst, value);
            }
            Instruction::LdImm(dst) => {
                let value = self.fetch8(bus);
                self.write_operand(bus, dst, value);
            }
            Instruction::Ld16Imm(dst) => {
                let value = self.fetch16(bus);
                self.write_reg16(dst, value);
            }
            Instruction::StoreA(indirect) => {
                let addr = self.indirect_address(indirect);
                bus.write8(addr, self.regs.a.get());
            }
            Instruction::LoadA(indirect) => {
                let addr = self.indirect_address(indirect);
                self.regs.a.set(bus.read8(addr));
            }
            Instruction::StoreSp => {
                let addr = self.fetch16(bus);
                bus.write16(addr, self.regs.sp.get());
            }
            Instruction::StoreHigh => {
                let addr = 0xFF00 | u16::from(self.fetch8(bus));
                bus.write8(addr, self.regs.a.get());
            }
            Instruction::LoadHigh => {
                let addr = 0xFF00 | u16::from(self.fetch8(bus));
                self.regs.a.set(bus.read8(addr));
            }
            Instruction::StoreHighC => {
                let addr = 0xFF00 | u16::from(self.regs.c.get());
                bus.write8(addr, self.regs.a.get());
            }
            Instruction::LoadHighC => {
                let addr = 0xFF00 | u16::from(self.regs.c.get());
                self.regs.a.set(bus.read8(addr));
            }
            Instruction::StoreAbsolute => {
                let addr = self.fetch16(bus);
                bus.write8(addr, self.regs.a.get());
            }
            Instruction::LoadAbsolute => {
                let addr = self.fetch16(bus);
                self.regs.a.set(bus.read8(addr));
            }
            Instruction::LdSpHl => self.regs.sp.set(self.regs.hl()),
            Instruction::LdHlSpOffset => {
                let imm = self.fetch8(bus);
                let result = self.alu_add16_signed(self.regs.sp.get(), imm);
                self.regs.set_hl(result);
            }
            Instruction::AddSpOffset => {
                let imm = self.fetch8(bus);
                let result = self.alu_add16_signed(self.regs.sp.get(), imm);
                self.regs.sp.set(result);
            }

            Instruction::Inc(operand) => {
                let value = self.read_operand(bus, operand);
                let result = self.alu_inc8(value);
                self.write_operand(bus, operand, result);
            }
            Instruction::Dec(operand) => {
                let value = self.read_operand(bus, operand);
                let result = self.alu_dec8(value);
                self.write_operand(bus, operand, result);
            }
            Instruction::Inc16(reg) => {
                let value = self.read_reg16(reg).wrapping_add(1);
                self.write_reg16(reg, value);
            }
            Instruction::Dec16(reg) => {
                let value = self.read_reg16(reg).wrapping_sub(1);
                self.write_reg16(reg, value);
            }
            Instruction::AddHl(reg) => {
                let value = self.read_reg16(reg);
                self.alu_add16_hl(value);
            }
            Instruction::Alu(op, operand) => {
                let value = self.read_operand(bus, operand);
                self.alu(op, value);
            }
            Instruction::AluImm(op) => {
                let value = self.fetch8(bus);
                self.alu(op, value);
            }

            Instruction::RotateA(op) => self.exec_rotate_a(op),
            Instruction::Daa => self.alu_daa(),
            Instruction::Cpl => {
                self.regs.a.set(!self.regs.a.get());
                self.regs.f.insert(Flags::SUBTRACT | Flags::HALF_CARRY);
            }
            Instruction::Scf => {
                self.regs.f.remove(Flags::SUBTRACT | Flags::HALF_CARRY);
                self.regs.f.insert(Flags::CARRY);
            }
            Instruction::Ccf => {
                self.regs.f.remove(Flags::SUBTRACT | Flags::HALF_CARRY);
                self.regs.f.toggle(Flags::CARRY);
            }

            Instruction::Jr(condition) => {
                let offset = self.fetch8(bus) as i8;
                if self.condition_holds(condition) {
                    let target = self.regs.pc.get().wrapping_add_signed(i16::from(offset));
                    self.regs.pc.set(target);
                    return self.taken(opcode, condition);
                }
            }
            Instruction::Jp(condition) => {
                let target = self.fetch16(bus);
                if self.condition_holds(condition) {
                    self.regs.pc.set(target);
                    return self.taken(opcode, condition);
                }
            }
            Instruction::JpHl => self.regs.pc.set(self.regs.hl()),
            Instruction::Call(condition) => {
                let target = self.fetch16(bus);
                if self.condition_holds(condition) {
                    // PC already points past the 3-byte CALL.
                    let ret = self.regs.pc.get();
                    self.push_u16(bus, ret);
                    self.regs.pc.set(target);
                    return self.taken(opcode, condition);
                }
            }
            Instruction::Ret(condition) => {
                if self.condition_holds(condition) {
                    let addr = self.pop_u16(bus);
                    self.regs.pc.set(addr);
                    return self.taken(opcode, condition);
                }
            }
            Instruction::Reti => {
                let addr = self.pop_u16(bus);
                self.regs.pc.set(addr);
                self.ime = true;
            }
            Instruction::Rst(vector) => {
                let ret = self.regs.pc.get();
                self.push_u16(bus, ret);
                self.regs.pc.set(vector);
            }
            Instruction::Push(pair) => {
                let value = self.read_stack_pair(pair);
                self.push_u16(bus, value);
            }
            Instruction::Pop(pair) => {
                let value = self.pop_u16(bus);
                self.write_stack_pair(pair, value);
            }
            Instruction::Di => self.ime = false,
            Instruction::Ei => self.ime = true,

            Instruction::Prefix => return self.step_cb(bus),
            // Rejected by `step` before dispatch.
            Instruction::Invalid => {}
        }
        0
    }

    /// Penalty for a taken branch; unconditional forms already pay the full
    /// cost in the opcode table.
    #[inline]
    fn taken(&self, opcode: u8, condition: Option<super::decode::Condition>) -> u32 {
        if condition.is_some() {
            u32::from(branch_taken_penalty(opcode))
        } else {
            0
        }
    }

    /// RLCA/RRCA/RLA/RRA always clear Z, unlike their CB counterparts.
    fn exec_rotate_a(&mut self, op: ShiftOp) {
        let (result, mut flags) = self.alu_shift(op, self.regs.a.get());
        flags.remove(Flags::ZERO);
        self.regs.a.set(result);
        self.regs.f = flags;
    }
}
