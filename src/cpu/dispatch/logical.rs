/*!
logical.rs - AND / ORA / EOR / BIT opcode family handler

AND, ORA and EOR write A and recompute Z/N from it. BIT leaves A alone:
Z from `A & M`, N and V copied from bits 7 and 6 of the operand.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Resolved;
use crate::cpu::execute::{and, bit, eor, ora};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Operation;

pub(super) fn handle<C: CpuRegs>(
    op: Operation,
    r: &Resolved,
    cpu: &mut C,
    bus: &mut Bus,
    _cycles: &mut u32,
) -> bool {
    let apply: fn(&mut C, u8) = match op {
        Operation::And => and,
        Operation::Ora => ora,
        Operation::Eor => eor,
        Operation::Bit => bit,
        _ => return false,
    };
    apply(cpu, r.operand.value(bus));
    true
}

#[cfg(test)]
mod tests {
    use super::super::step;
    use crate::bus::Bus;
    use crate::cpu::regs::CpuRegs;
    use crate::cpu::state::{CpuState, NEGATIVE, OVERFLOW, ZERO};
    use crate::test_utils::bus_with_program;

    fn setup(program: &[u8]) -> (CpuState, Bus) {
        let bus = bus_with_program(0x1000, program);
        let mut cpu = CpuState::new();
        cpu.reset(&bus);
        (cpu, bus)
    }

    #[test]
    fn and_ora_eor_immediate() {
        // LDA #$F0 ; AND #$3C ; ORA #$01 ; EOR #$FF
        let (mut cpu, mut bus) = setup(&[0xA9, 0xF0, 0x29, 0x3C, 0x09, 0x01, 0x49, 0xFF]);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a(), 0x30);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a(), 0x31);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a(), 0xCE);
        assert!(cpu.is_flag_set(NEGATIVE));
    }

    #[test]
    fn bit_zero_page() {
        let (mut cpu, mut bus) = setup(&[0x24, 0x10]);
        bus.write(0x0010, 0x40);
        cpu.set_a(0x01);
        assert_eq!(step(&mut cpu, &mut bus), 3);
        assert!(cpu.is_flag_set(ZERO));
        assert!(cpu.is_flag_set(OVERFLOW));
        assert!(!cpu.is_flag_set(NEGATIVE));
        assert_eq!(cpu.a(), 0x01);
    }

    #[test]
    fn eor_indexed_indirect() {
        // EOR ($20,X), X=4 -> pointer at $24 -> $0300
        let (mut cpu, mut bus) = setup(&[0x41, 0x20]);
        bus.write(0x0024, 0x00);
        bus.write(0x0025, 0x03);
        bus.write(0x0300, 0xFF);
        cpu.set_x(0x04);
        cpu.set_a(0xFF);
        assert_eq!(step(&mut cpu, &mut bus), 6);
        assert_eq!(cpu.a(), 0x00);
        assert!(cpu.is_flag_set(ZERO));
    }
}
