/*!
state.rs - Architectural CPU state (registers + flags).

Overview
========
`CpuState` is the single owner of everything a program can observe about
the processor: A, X, Y, SP, PC and the status byte. It excludes bus
access, decoding and timing; those live in the dispatch, execute and
machine layers.

All fields are fixed-width integers, so the documented ranges (8-bit
registers, 16-bit PC, stack confined to page one) cannot be violated;
every increment and decrement goes through the wrapping operations.

Status Register Bit Layout
==========================
Bit: 7 6 5 4 3 2 1 0
     N V 1 B D I Z C
  N = NEGATIVE
  V = OVERFLOW
  1 = UNUSED (always reads as 1)
  B = BREAK (only meaningful in a pushed copy: set by BRK/PHP, clear for IRQ)
  D = DECIMAL (BCD arithmetic for ADC/SBC)
  I = IRQ_DISABLE
  Z = ZERO
  C = CARRY
*/

use crate::bus::Bus;

/// Processor status flag bit masks.
pub const CARRY: u8 = 0b0000_0001;
pub const ZERO: u8 = 0b0000_0010;
pub const IRQ_DISABLE: u8 = 0b0000_0100;
pub const DECIMAL: u8 = 0b0000_1000;
pub const BREAK: u8 = 0b0001_0000;
pub const UNUSED: u8 = 0b0010_0000; // Always set when read.
pub const OVERFLOW: u8 = 0b0100_0000;
pub const NEGATIVE: u8 = 0b1000_0000;

/// Base of the hardware stack page.
pub const STACK_BASE: u16 = 0x0100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
}

impl Default for CpuState {
    fn default() -> Self {
        // Hard-reset values: empty stack at $01FF, only I set.
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFF,
            pc: 0x0000,
            status: IRQ_DISABLE | UNUSED,
        }
    }
}

impl CpuState {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reinitialise every register and load PC from the reset vector.
    pub fn reset(&mut self, bus: &Bus) {
        *self = Self::default();
        self.pc = bus.reset_vector();
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------
    #[inline]
    pub fn a(&self) -> u8 {
        self.a
    }
    #[inline]
    pub fn x(&self) -> u8 {
        self.x
    }
    #[inline]
    pub fn y(&self) -> u8 {
        self.y
    }
    #[inline]
    pub fn sp(&self) -> u8 {
        self.sp
    }
    #[inline]
    pub fn pc(&self) -> u16 {
        self.pc
    }
    #[inline]
    pub fn status(&self) -> u8 {
        self.status
    }

    #[inline]
    pub fn set_a(&mut self, v: u8) {
        self.a = v;
    }
    #[inline]
    pub fn set_x(&mut self, v: u8) {
        self.x = v;
    }
    #[inline]
    pub fn set_y(&mut self, v: u8) {
        self.y = v;
    }
    #[inline]
    pub fn set_sp(&mut self, v: u8) {
        self.sp = v;
    }
    #[inline]
    pub fn set_pc(&mut self, v: u16) {
        self.pc = v;
    }
    /// Bit 5 is forced on; it has no storage in the real register.
    #[inline]
    pub fn set_status(&mut self, v: u8) {
        self.status = v | UNUSED;
    }

    /// Advance PC by `delta` (wrapping at 16 bits).
    #[inline]
    pub fn advance_pc(&mut self, delta: u16) {
        self.pc = self.pc.wrapping_add(delta);
    }

    // ---------------------------------------------------------------------
    // Flags
    // ---------------------------------------------------------------------

    #[inline]
    pub fn is_flag_set(&self, mask: u8) -> bool {
        (self.status & mask) != 0
    }

    #[inline]
    pub fn assign_flag(&mut self, mask: u8, value: bool) {
        if value {
            self.status |= mask;
        } else {
            self.status &= !mask;
        }
    }

    /// Address the next push will write to.
    #[inline]
    pub fn stack_top(&self) -> u16 {
        STACK_BASE | self.sp as u16
    }
}
