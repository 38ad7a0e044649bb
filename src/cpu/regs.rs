/*!
regs.rs - CpuRegs trait: the register + flag interface used by the
addressing, execute and dispatch layers.

The trait deliberately excludes bus access, stack and fetch helpers; those
stay explicit at call sites via `&mut Bus` so a handler never holds more
borrows than it needs. Everything is statically dispatched
(`fn op<C: CpuRegs>(cpu: &mut C, ..)`).

The chip logic (timers, raster) is generic over the same trait, which is
how it drives interrupt entry without knowing the concrete CPU type.
*/

use crate::cpu::state::{BREAK, CARRY, CpuState, NEGATIVE, OVERFLOW, UNUSED, ZERO};

pub trait CpuRegs {
    // ---------------------------------------------------------------------
    // Read accessors
    // ---------------------------------------------------------------------
    fn a(&self) -> u8;
    fn x(&self) -> u8;
    fn y(&self) -> u8;
    fn sp(&self) -> u8;
    fn pc(&self) -> u16;
    fn status(&self) -> u8;

    // ---------------------------------------------------------------------
    // Mutators
    // ---------------------------------------------------------------------
    fn set_a(&mut self, v: u8);
    fn set_x(&mut self, v: u8);
    fn set_y(&mut self, v: u8);
    fn set_sp(&mut self, v: u8);
    fn set_pc(&mut self, v: u16);
    fn set_status(&mut self, v: u8);

    /// Advance PC by `delta` (wrapping at 16 bits).
    fn advance_pc(&mut self, delta: u16);

    #[inline]
    fn advance_pc_one(&mut self) {
        self.advance_pc(1);
    }

    // ---------------------------------------------------------------------
    // Flag operations
    // ---------------------------------------------------------------------

    fn is_flag_set(&self, mask: u8) -> bool;

    fn assign_flag(&mut self, mask: u8, value: bool);

    #[inline]
    fn update_zn(&mut self, result: u8) {
        self.assign_flag(ZERO, result == 0);
        self.assign_flag(NEGATIVE, (result & 0x80) != 0);
    }

    #[inline]
    fn update_carry(&mut self, carry: bool) {
        self.assign_flag(CARRY, carry);
    }

    #[inline]
    fn update_overflow(&mut self, overflow: bool) {
        self.assign_flag(OVERFLOW, overflow);
    }

    /// Status byte as pushed to the stack: bit 5 set, BREAK only when the
    /// push comes from BRK/PHP.
    #[inline]
    fn compose_status_for_push(&self, set_break: bool) -> u8 {
        let v = self.status() | UNUSED;
        if set_break { v | BREAK } else { v & !BREAK }
    }
}

impl CpuRegs for CpuState {
    #[inline]
    fn a(&self) -> u8 {
        self.a()
    }
    #[inline]
    fn x(&self) -> u8 {
        self.x()
    }
    #[inline]
    fn y(&self) -> u8 {
        self.y()
    }
    #[inline]
    fn sp(&self) -> u8 {
        self.sp()
    }
    #[inline]
    fn pc(&self) -> u16 {
        self.pc()
    }
    #[inline]
    fn status(&self) -> u8 {
        self.status()
    }

    #[inline]
    fn set_a(&mut self, v: u8) {
        self.set_a(v);
    }
    #[inline]
    fn set_x(&mut self, v: u8) {
        self.set_x(v);
    }
    #[inline]
    fn set_y(&mut self, v: u8) {
        self.set_y(v);
    }
    #[inline]
    fn set_sp(&mut self, v: u8) {
        self.set_sp(v);
    }
    #[inline]
    fn set_pc(&mut self, v: u16) {
        self.set_pc(v);
    }
    #[inline]
    fn set_status(&mut self, v: u8) {
        self.set_status(v);
    }

    #[inline]
    fn advance_pc(&mut self, delta: u16) {
        self.advance_pc(delta);
    }

    #[inline]
    fn is_flag_set(&self, mask: u8) -> bool {
        self.is_flag_set(mask)
    }

    #[inline]
    fn assign_flag(&mut self, mask: u8, value: bool) {
        self.assign_flag(mask, value);
    }
}
