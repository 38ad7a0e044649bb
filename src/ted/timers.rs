//! TED countdown timers A, B and C.
//!
//! The 16-bit counters live in RAM at $FF00-$FF05 (low byte first), so
//! programs read them like any other register. Only the enable flags are
//! held here; the bus flips them on writes to the counter bytes.
//!
//! Each step, every enabled timer is decremented by the elapsed cycles
//! (scaled by the clock multiplier). A timer underflows when its value is
//! smaller than the decrement; it then wraps, timer A additionally losing
//! [`TIMER_A_RELOAD`](super::TIMER_A_RELOAD), and raises its request bit.

use crate::bus::{Bus, Ram};
use crate::cpu::regs::CpuRegs;
use crate::ted::{TIMER_A_RELOAD, clock_multiplier, irq_bits, reg, request_interrupt};

const NAMES: [char; 3] = ['A', 'B', 'C'];
const SOURCES: [u8; 3] = [irq_bits::TIMER_A, irq_bits::TIMER_B, irq_bits::TIMER_C];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timers {
    enabled: [bool; 3],
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(&self, index: usize) -> bool {
        self.enabled[index]
    }

    pub(crate) fn set_enabled(&mut self, index: usize, on: bool) {
        if self.enabled[index] != on {
            log::debug!(
                "timer {} {}",
                NAMES[index],
                if on { "started" } else { "stopped" }
            );
        }
        self.enabled[index] = on;
    }

    /// All timers stopped.
    pub fn reset(&mut self) {
        self.enabled = [false; 3];
    }

    /// Count every running timer down by `elapsed` cycles. Returns the
    /// request bits of the timers that underflowed.
    pub fn count(&self, ram: &mut Ram, elapsed: u32) -> u8 {
        let mut fired = 0;
        for (index, &on) in self.enabled.iter().enumerate() {
            if !on {
                continue;
            }
            let lo_addr = reg::TIMER_A_LO + 2 * index as u16;
            let value = ram.read(lo_addr) as u32 | (ram.read(lo_addr + 1) as u32) << 8;

            let underflow = value < elapsed;
            let mut next = value.wrapping_sub(elapsed) as u16;
            if underflow {
                fired |= SOURCES[index];
                if index == 0 {
                    next = next.wrapping_sub(TIMER_A_RELOAD);
                }
            }

            ram.write(lo_addr, next as u8);
            ram.write(lo_addr + 1, (next >> 8) as u8);
        }
        fired
    }
}

/// Advance the timers after an instruction of `cycles` cycles and deliver
/// any resulting interrupt requests, A before B before C.
pub(crate) fn tick<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, cycles: u32) {
    let elapsed = cycles * clock_multiplier(bus);
    let (timers, ram) = bus.timers_and_ram();
    let fired = timers.count(ram, elapsed);
    if fired == 0 {
        return;
    }
    for (index, &source) in SOURCES.iter().enumerate() {
        if fired & source != 0 && request_interrupt(cpu, bus, source) {
            log::debug!("timer {} IRQ delivered", NAMES[index]);
        }
    }
}
