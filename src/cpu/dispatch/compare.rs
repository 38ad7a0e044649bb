/*!
compare.rs - CMP / CPX / CPY opcode family handler

C = reg >= M, Z = reg == M, N = bit 7 of (reg - M). The register is not
written.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Resolved;
use crate::cpu::execute::cmp_generic;
use crate::cpu::regs::CpuRegs;
use crate::cpu::table::Operation;

pub(super) fn handle<C: CpuRegs>(
    op: Operation,
    r: &Resolved,
    cpu: &mut C,
    bus: &mut Bus,
    _cycles: &mut u32,
) -> bool {
    let reg = match op {
        Operation::Cmp => cpu.a(),
        Operation::Cpx => cpu.x(),
        Operation::Cpy => cpu.y(),
        _ => return false,
    };
    let v = r.operand.value(bus);
    cmp_generic(cpu, reg, v);
    true
}
