/*!
arithmetic.rs - ADC / SBC opcode family handler

Both honour the D flag; see `execute::adc` / `execute::sbc` for the
binary and decimal rules. Operands come from any of the eight ALU
addressing modes.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Resolved;
use crate::cpu::execute::{adc, sbc};
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
        Operation::Adc => adc(cpu, r.operand.value(bus)),
        Operation::Sbc => sbc(cpu, r.operand.value(bus)),
        _ => return false,
    }
    true
}
