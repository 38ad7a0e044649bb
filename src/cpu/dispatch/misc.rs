/*!
misc.rs - Transfers / stack / flags / register inc-dec / NOP

```text
    Transfers:  TAX TAY TXA TYA TSX TXS (TXS leaves flags)
    Stack:      PHA PHP PLA PLP
    Flags:      CLC SEC CLI SEI CLV CLD SED
    Registers:  INX INY DEX DEY
    NOP         (documented and undocumented forms; operand, if any, was
                already consumed by the resolver)
```
*/

use crate::bus::Bus;
use crate::cpu::addressing::Resolved;
use crate::cpu::execute::{dex, dey, inx, iny, pha, php, pla, plp, tax, tay, tsx, txa, txs, tya};
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{CARRY, DECIMAL, IRQ_DISABLE, OVERFLOW};
use crate::cpu::table::Operation;

pub(super) fn handle<C: CpuRegs>(
    op: Operation,
    _r: &Resolved,
    cpu: &mut C,
    bus: &mut Bus,
    _cycles: &mut u32,
) -> bool {
    use Operation::*;
    match op {
        Tax => tax(cpu),
        Tay => tay(cpu),
        Txa => txa(cpu),
        Tya => tya(cpu),
        Tsx => tsx(cpu),
        Txs => txs(cpu),

        Pha => pha(cpu, bus),
        Php => php(cpu, bus),
        Pla => pla(cpu, bus),
        Plp => plp(cpu, bus),

        Clc => cpu.assign_flag(CARRY, false),
        Sec => cpu.assign_flag(CARRY, true),
        Cli => cpu.assign_flag(IRQ_DISABLE, false),
        Sei => cpu.assign_flag(IRQ_DISABLE, true),
        Clv => cpu.assign_flag(OVERFLOW, false),
        Cld => cpu.assign_flag(DECIMAL, false),
        Sed => cpu.assign_flag(DECIMAL, true),

        Inx => inx(cpu),
        Iny => iny(cpu),
        Dex => dex(cpu),
        Dey => dey(cpu),

        Nop => {}
        _ => return false,
    }
    true
}
