/*!
dispatch - Orchestrator for a single 6502 instruction step

Overview
========
`step` performs one fetch/decode/execute cycle:
1. Fetch the opcode byte at PC and look it up in the static opcode table.
2. Emit a trace line when the `tedium::trace` target is enabled.
3. Resolve the operand for the entry's addressing mode (PC now points at
   the next instruction).
4. Seed the cycle count with the table's base cycles plus the page-cross
   penalty for read-type operations.
5. Offer the operation to each family handler in turn; exactly one claims
   it. Branch handlers add their own taken/page-cross cycles.

Interrupt entry
===============
`service_interrupt` is shared by BRK and by hardware requests raised from
the TED (timers, raster compare). Both push a return address and the
status byte, set I, and load PC from the IRQ vector in the system ROM.
They differ only in the BREAK bit of the pushed status and in the return
address (BRK skips its padding byte).

Cycle accounting
================
The step reports cycles; it never advances any clock itself. The machine
feeds the count to the timers and the raster unit after each step.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{fetch_byte, resolve};
use crate::cpu::execute::{push_status_with_break, push_word};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::IRQ_DISABLE;
use crate::cpu::table;
use crate::trace;

pub(crate) mod arithmetic;
pub(crate) mod branches;
pub(crate) mod compare;
pub(crate) mod control_flow;
pub(crate) mod load_store;
pub(crate) mod logical;
pub(crate) mod misc;
pub(crate) mod rmw;

/// Execute one instruction and return the cycles it consumed.
pub(crate) fn step<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) -> u32 {
    let at = cpu.pc();
    let byte = fetch_byte(cpu, bus);
    let opcode = table::lookup(byte);

    if log::log_enabled!(target: trace::TARGET, log::Level::Trace) {
        trace::log_instruction(cpu, bus, at, byte);
    }

    let resolved = resolve(opcode.mode, cpu, bus);
    debug_assert_eq!(
        cpu.pc(),
        at.wrapping_add(opcode.length()),
        "operand fetch for {:?} left PC off the next instruction",
        opcode.mode
    );

    let op = opcode.operation;
    let mut cycles = opcode.cycles as u32;
    if resolved.page_crossed && op.pays_page_penalty() {
        cycles += 1;
    }

    let handled = load_store::handle(op, &resolved, cpu, bus, &mut cycles)
        || arithmetic::handle(op, &resolved, cpu, bus, &mut cycles)
        || logical::handle(op, &resolved, cpu, bus, &mut cycles)
        || compare::handle(op, &resolved, cpu, bus, &mut cycles)
        || rmw::handle(op, &resolved, cpu, bus, &mut cycles)
        || branches::handle(op, &resolved, cpu, bus, &mut cycles)
        || control_flow::handle(op, &resolved, cpu, bus, &mut cycles)
        || misc::handle(op, &resolved, cpu, bus, &mut cycles);
    debug_assert!(handled, "no family handles {op:?}");

    cycles
}

/// Push `return_addr` and P, set I, jump through the IRQ vector.
pub(crate) fn service_interrupt<C: CpuRegs>(
    cpu: &mut C,
    bus: &mut Bus,
    return_addr: u16,
    set_break: bool,
) {
    push_word(cpu, bus, return_addr);
    push_status_with_break(cpu, bus, set_break);
    cpu.assign_flag(IRQ_DISABLE, true);
    cpu.set_pc(bus.irq_vector());
}

/// Hardware interrupt entry: resumes at the current PC, BREAK clear.
/// Callers have already checked the I flag and the TED mask.
pub(crate) fn irq<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    let pc = cpu.pc();
    service_interrupt(cpu, bus, pc, false);
}
