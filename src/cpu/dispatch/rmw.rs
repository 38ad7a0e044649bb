/*!
rmw.rs - Read-modify-write opcode family handler

Shifts and rotates (ASL, LSR, ROL, ROR) in accumulator and memory forms,
plus INC / DEC on memory.

Memory forms read the byte, transform it and write it back once. The
write goes through `Bus::write`, so RMW on an I/O register sees the same
side effects as a store. Base cycles already cover indexed forms; there
is no page-cross penalty here.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{Operand, Resolved};
use crate::cpu::execute::{asl, dec_mem, inc_mem, lsr, on_accumulator, rmw_memory, rol, ror};
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Operation;

pub(super) fn handle<C: CpuRegs>(
    op: Operation,
    r: &Resolved,
    cpu: &mut C,
    bus: &mut Bus,
    _cycles: &mut u32,
) -> bool {
    let shift: fn(&mut C, u8) -> u8 = match op {
        Operation::Asl => asl,
        Operation::Lsr => lsr,
        Operation::Rol => rol,
        Operation::Ror => ror,
        Operation::Inc => {
            inc_mem(cpu, bus, r.operand.address());
            return true;
        }
        Operation::Dec => {
            dec_mem(cpu, bus, r.operand.address());
            return true;
        }
        _ => return false,
    };

    match r.operand {
        Operand::Accumulator => on_accumulator(cpu, shift),
        other => {
            rmw_memory(cpu, bus, other.address(), shift);
        }
    }
    true
}
