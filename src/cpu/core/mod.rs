/*!
core::Cpu - Public 6502 facade wrapping `CpuState`.

`Cpu` owns a single [`CpuState`] and exposes the operations the machine
and the front ends need: reset from the reset vector, single-step against
a [`Bus`], and register/flag inspection. Execution goes straight to the
generic dispatcher through the [`CpuRegs`](crate::cpu::regs::CpuRegs)
implementation on `CpuState`.

Hardware interrupts are not polled here. The TED raises them between
instructions via `ted::request_interrupt`, which operates on the state
returned by [`Cpu::state_mut`].
*/

use std::fmt;

use crate::bus::Bus;
use crate::cpu::state::CpuState;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cpu {
    state: CpuState,
}

impl Cpu {
    /// Construct a CPU with hard-reset register values (PC = 0).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CpuState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    /// Reset all registers and load PC from the system ROM reset vector.
    pub fn reset(&mut self, bus: &Bus) {
        self.state.reset(bus);
    }

    /// Execute one instruction; returns the cycles it took.
    pub fn step(&mut self, bus: &mut Bus) -> u32 {
        crate::cpu::dispatch::step(&mut self.state, bus)
    }

    // ---------------------------------------------------------------------
    // Register accessors
    // ---------------------------------------------------------------------
    pub fn a(&self) -> u8 {
        self.state.a
    }
    pub fn x(&self) -> u8 {
        self.state.x
    }
    pub fn y(&self) -> u8 {
        self.state.y
    }
    pub fn sp(&self) -> u8 {
        self.state.sp
    }
    pub fn pc(&self) -> u16 {
        self.state.pc
    }
    pub fn status(&self) -> u8 {
        self.state.status
    }

    pub fn set_pc(&mut self, v: u16) {
        self.state.pc = v;
    }

    pub fn get_flag(&self, mask: u8) -> bool {
        self.state.is_flag_set(mask)
    }

    pub fn set_flag(&mut self, mask: u8, on: bool) {
        self.state.assign_flag(mask, on);
    }
}

impl fmt::Display for Cpu {
    /// One-line register dump, `PC:1000 A:00 X:00 Y:00 SP:FF P:24`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PC:{:04X} A:{:02X} X:{:02X} Y:{:02X} SP:{:02X} P:{:02X}",
            self.pc(),
            self.a(),
            self.x(),
            self.y(),
            self.sp(),
            self.status()
        )
    }
}
