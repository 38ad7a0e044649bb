/*!
cpu - 6502 core.

```text
    state.rs        Registers and flag bit masks.
    regs.rs         `CpuRegs` trait; everything below is generic over it.
    addressing.rs   Addressing modes and operand resolution.
    table.rs        Static 256-entry opcode table.
    execute.rs      Instruction semantics (ALU, stack, RMW).
    dispatch/       One step: fetch, resolve, family handlers; interrupt entry.
    core/           `Cpu` facade over `CpuState`.
```

Usage:
```ignore
use tedium::cpu::Cpu;

let mut cpu = Cpu::new();
cpu.reset(&bus);
let cycles = cpu.step(&mut bus);
```
*/

pub mod addressing;
pub mod core;
pub(crate) mod dispatch;
pub(crate) mod execute;
pub mod regs;
pub mod state;
pub mod table;

pub use crate::cpu::core::Cpu;
pub use crate::cpu::regs::CpuRegs;
pub use crate::cpu::state::{
    BREAK, CARRY, CpuState, DECIMAL, IRQ_DISABLE, NEGATIVE, OVERFLOW, UNUSED, ZERO,
};
