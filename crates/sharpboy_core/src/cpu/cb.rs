use super::decode::{self, CbInstruction};
use super::timing::CB_CYCLES;
use super::{Bus, Cpu};

impl Cpu {
    /// Fetch and execute the byte following a 0xCB prefix. Returns the cost
    /// of the second byte; the prefix itself is billed by the caller.
    pub(super) fn step_cb<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let opcode = self.fetch8(bus);
        match decode::lookup_cb(opcode) {
            CbInstruction::Shift(op, operand) => {
                let value = self.read_operand(bus, operand);
                let (result, flags) = self.alu_shift(op, value);
                self.regs.f = flags;
                self.write_operand(bus, operand, result);
            }
            CbInstruction::Bit(bit, operand) => {
                let value = self.read_operand(bus, operand);
                self.alu_bit(bit, value);
            }
            CbInstruction::Res(bit, operand) => {
                let value = self.read_operand(bus, operand);
                self.write_operand(bus, operand, value & !(1 << bit));
            }
            CbInstruction::Set(bit, operand) => {
                let value = self.read_operand(bus, operand);
                self.write_operand(bus, operand, value | (1 << bit));
            }
        }
        u32::from(CB_CYCLES[opcode as usize])
    }
}
