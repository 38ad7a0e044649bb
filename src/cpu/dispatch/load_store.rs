/*!
load_store.rs - Load / Store opcode family handler

Loads (set Z/N; page-cross penalty already applied by the dispatcher):
    LDA, LDX, LDY
Stores (no flags; no penalty):
    STA, STX, STY

Stores go through `Bus::write`, so a store into an I/O register triggers
its side effects (bank select, ROM latch, keyboard scan, timer control).
*/

use crate::bus::Bus;
use crate::cpu::addressing::Resolved;
use crate::cpu::execute::{lda, ldx, ldy};
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
        Operation::Lda => lda(cpu, r.operand.value(bus)),
        Operation::Ldx => ldx(cpu, r.operand.value(bus)),
        Operation::Ldy => ldy(cpu, r.operand.value(bus)),
        Operation::Sta => bus.write(r.operand.address(), cpu.a()),
        Operation::Stx => bus.write(r.operand.address(), cpu.x()),
        Operation::Sty => bus.write(r.operand.address(), cpu.y()),
        _ => return false,
    }
    true
}
