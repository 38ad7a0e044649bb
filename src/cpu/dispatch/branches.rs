/*!
branches.rs - Conditional branch opcode family handler

BPL/BMI/BVC/BVS/BCC/BCS/BNE/BEQ test one flag. The operand was resolved
to the target address already; a taken branch costs +1 cycle, and +1
more when the target lies on a different page than the branch opcode.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Resolved;
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CARRY, NEGATIVE, OVERFLOW, ZERO};
use crate::cpu::table::Operation;

pub(super) fn handle<C: CpuRegs>(
    op: Operation,
    r: &Resolved,
    cpu: &mut C,
    _bus: &mut Bus,
    cycles: &mut u32,
) -> bool {
    let take = match op {
        Operation::Bpl => !cpu.is_flag_set(NEGATIVE),
        Operation::Bmi => cpu.is_flag_set(NEGATIVE),
        Operation::Bvc => !cpu.is_flag_set(OVERFLOW),
        Operation::Bvs => cpu.is_flag_set(OVERFLOW),
        Operation::Bcc => !cpu.is_flag_set(CARRY),
        Operation::Bcs => cpu.is_flag_set(CARRY),
        Operation::Bne => !cpu.is_flag_set(ZERO),
        Operation::Beq => cpu.is_flag_set(ZERO),
        _ => return false,
    };

    if take {
        cpu.set_pc(r.operand.address());
        *cycles += 1;
        if r.page_crossed {
            *cycles += 1;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::super::step;
    use crate::bus::Bus;
    use crate::cpu::regs::CpuRegs;
    use crate::cpu::state::{CARRY, CpuState, ZERO};
    use crate::test_utils::bus_with_program;

    fn setup(origin: u16, program: &[u8]) -> (CpuState, Bus) {
        let bus = bus_with_program(origin, program);
        let mut cpu = CpuState::new();
        cpu.reset(&bus);
        (cpu, bus)
    }

    #[test]
    fn not_taken_costs_base() {
        let (mut cpu, mut bus) = setup(0x1000, &[0xF0, 0x10]);
        cpu.assign_flag(ZERO, false);
        assert_eq!(step(&mut cpu, &mut bus), 2);
        assert_eq!(cpu.pc(), 0x1002);
    }

    #[test]
    fn taken_same_page() {
        let (mut cpu, mut bus) = setup(0x1000, &[0x90, 0x10]);
        cpu.assign_flag(CARRY, false);
        assert_eq!(step(&mut cpu, &mut bus), 3);
        assert_eq!(cpu.pc(), 0x1012);
    }

    #[test]
    fn taken_backward() {
        let (mut cpu, mut bus) = setup(0x1010, &[0xB0, 0xFC]);
        cpu.assign_flag(CARRY, true);
        assert_eq!(step(&mut cpu, &mut bus), 3);
        assert_eq!(cpu.pc(), 0x100E);
    }

    #[test]
    fn taken_across_page() {
        // BNE at $10FE with offset +5 lands on $1105.
        let (mut cpu, mut bus) = setup(0x10FE, &[0xD0, 0x05]);
        cpu.assign_flag(ZERO, false);
        assert_eq!(step(&mut cpu, &mut bus), 4);
        assert_eq!(cpu.pc(), 0x1105);
    }
}
