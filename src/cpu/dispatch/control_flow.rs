/*!
control_flow.rs - Control-flow / system opcode family handler

  JMP abs / JMP (ind)   PC = resolved address (indirect page quirk applied
                        during resolution)
  JSR abs               push PC-1, PC = target
  RTS                   pull PC, +1
  RTI                   pull P (BREAK dropped, I restored), pull PC
  BRK                   push PC+1 and P with BREAK set, set I, PC = IRQ vector

BRK shares `service_interrupt` with hardware requests; only the pushed
BREAK bit and return address differ. Undefined opcodes decode to BRK and
arrive here as well.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Resolved;
use crate::cpu::dispatch::service_interrupt;
use crate::cpu::execute::{plp, pop_word, push_word};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Operation;

pub(super) fn handle<C: CpuRegs>(
    op: Operation,
    r: &Resolved,
    cpu: &mut C,
    bus: &mut Bus,
    _cycles: &mut u32,
) -> bool {
    match op {
        Operation::Jmp => cpu.set_pc(r.operand.address()),
        Operation::Jsr => {
            // PC already points past the operand; the pushed value is one less.
            let ret = cpu.pc().wrapping_sub(1);
            push_word(cpu, bus, ret);
            cpu.set_pc(r.operand.address());
        }
        Operation::Rts => {
            let ret = pop_word(cpu, bus);
            cpu.set_pc(ret.wrapping_add(1));
        }
        Operation::Rti => {
            plp(cpu, bus);
            let ret = pop_word(cpu, bus);
            cpu.set_pc(ret);
        }
        Operation::Brk => {
            // One padding byte after BRK is skipped on return.
            let ret = cpu.pc().wrapping_add(1);
            service_interrupt(cpu, bus, ret, true);
        }
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::super::step;
    use crate::bus::Bus;
    use crate::cpu::regs::CpuRegs;
    use crate::cpu::state::{BREAK, CARRY, CpuState, IRQ_DISABLE};
    use crate::test_utils::{IRQ_HANDLER, bus_with_program};

    fn setup(program: &[u8]) -> (CpuState, Bus) {
        let bus = bus_with_program(0x1000, program);
        let mut cpu = CpuState::new();
        cpu.reset(&bus);
        (cpu, bus)
    }

    #[test]
    fn jsr_rts_round_trip() {
        // JSR $1010 ; ... $1010: RTS
        let (mut cpu, mut bus) = setup(&[0x20, 0x10, 0x10]);
        bus.write(0x1010, 0x60);
        assert_eq!(step(&mut cpu, &mut bus), 6);
        assert_eq!(cpu.pc(), 0x1010);
        assert_eq!(bus.read(0x01FF), 0x10);
        assert_eq!(bus.read(0x01FE), 0x02);
        assert_eq!(step(&mut cpu, &mut bus), 6);
        assert_eq!(cpu.pc(), 0x1003);
        assert_eq!(cpu.sp(), 0xFF);
    }

    #[test]
    fn jmp_indirect_page_quirk() {
        let (mut cpu, mut bus) = setup(&[0x6C, 0xFF, 0x02]);
        bus.write(0x02FF, 0x34);
        bus.write(0x0200, 0x12);
        bus.write(0x0300, 0x99);
        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(cpu.pc(), 0x1234);
    }

    #[test]
    fn brk_then_rti_restores_state() {
        // CLI ; SEC ; BRK ; pad ; NOP
        let (mut cpu, mut bus) = setup(&[0x58, 0x38, 0x00, 0xFF, 0xEA]);
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert_eq!(step(&mut cpu, &mut bus), 7);
        assert_eq!(cpu.pc(), IRQ_HANDLER);
        assert!(cpu.is_flag_set(IRQ_DISABLE));
        assert_eq!(bus.read(0x01FD) & BREAK, BREAK);

        // Handler is a single RTI.
        assert_eq!(step(&mut cpu, &mut bus), 6);
        assert_eq!(cpu.pc(), 0x1004);
        assert!(cpu.is_flag_set(CARRY));
        assert!(!cpu.is_flag_set(IRQ_DISABLE));
        assert!(!cpu.is_flag_set(BREAK));
        assert_eq!(cpu.sp(), 0xFF);
    }
}
