#![doc = r#"
TED video/timer chip

Responsibilities
- Three countdown timers clocked by elapsed CPU cycles (`timers.rs`).
- Raster line counter, blink toggle and raster-compare interrupt (`raster.rs`).
- Scanline rendering for text, multicolor text, bitmap and blank modes
  (`renderer.rs`), delivered to a `ScanlineSink`.
- The 128-colour palette used by presentation code (`palette.rs`).

Register model
- The chip registers are RAM cells in the $FF00-$FF3F window; programs
  read and write them through the bus like memory. This module only adds
  the state that is not visible there (timer enables, counters) and the
  constants below.
- Interrupt request bits accumulate in $FF09 and are gated by the mask in
  $FF0A. Entry into the handler is shared with BRK (`cpu::dispatch`).
"#]

pub mod palette;
pub mod raster;
pub(crate) mod renderer;
pub mod timers;

pub use raster::Raster;
pub use timers::Timers;

use crate::bus::Bus;
use crate::cpu::dispatch::irq;
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::IRQ_DISABLE;

/// Nominal CPU clock (PAL).
pub const CLOCK_HZ: u32 = 885_000;
/// Cycles accumulated before one raster line completes.
pub const CYCLES_PER_LINE: u32 = 114;
/// Raster lines per frame; the counter wraps here.
pub const RASTER_LINES: u16 = 312;
/// First raster line of the 200-line display window.
pub const FIRST_SCREEN_LINE: u16 = 3;
/// Visible pixels per line.
pub const SCREEN_WIDTH: usize = 320;
/// Visible lines per frame.
pub const SCREEN_HEIGHT: usize = 200;
/// Cursor / flashing-attribute half period.
pub const CYCLES_PER_BLINK: u32 = CLOCK_HZ / 8;
/// Subtracted from timer A on underflow instead of a plain wrap.
pub const TIMER_A_RELOAD: u16 = 0xC60E;

/// Register addresses.
pub mod reg {
    pub const TIMER_A_LO: u16 = 0xFF00;
    pub const TIMER_A_HI: u16 = 0xFF01;
    pub const TIMER_B_LO: u16 = 0xFF02;
    pub const TIMER_B_HI: u16 = 0xFF03;
    pub const TIMER_C_LO: u16 = 0xFF04;
    pub const TIMER_C_HI: u16 = 0xFF05;
    pub const CONTROL1: u16 = 0xFF06;
    pub const CONTROL2: u16 = 0xFF07;
    pub const KEYBOARD_LATCH: u16 = 0xFF08;
    pub const IRQ_REQUEST: u16 = 0xFF09;
    pub const IRQ_MASK: u16 = 0xFF0A;
    pub const RASTER_COMPARE: u16 = 0xFF0B;
    pub const CURSOR_HI: u16 = 0xFF0C;
    pub const CURSOR_LO: u16 = 0xFF0D;
    pub const BITMAP_CHARSET: u16 = 0xFF12;
    pub const CHARSET_BASE: u16 = 0xFF13;
    pub const VIDEO_MATRIX: u16 = 0xFF14;
    pub const BACKGROUND: u16 = 0xFF15;
    pub const COLOR1: u16 = 0xFF16;
    pub const COLOR2: u16 = 0xFF17;
    pub const COLOR3: u16 = 0xFF18;
    pub const BORDER: u16 = 0xFF19;
    pub const RASTER_HI: u16 = 0xFF1C;
    pub const RASTER_LO: u16 = 0xFF1D;
    pub const HPOS: u16 = 0xFF1E;
    pub const ROM_ON: u16 = 0xFF3E;
    pub const ROM_OFF: u16 = 0xFF3F;
    pub const KEYBOARD_SELECT: u16 = 0xFD30;
    pub const BANK_SELECT_FIRST: u16 = 0xFDD0;
    pub const BANK_SELECT_LAST: u16 = 0xFDDF;
}

/// Interrupt request / mask bits ($FF09 / $FF0A).
pub mod irq_bits {
    pub const RASTER: u8 = 0x02;
    pub const TIMER_A: u8 = 0x08;
    pub const TIMER_B: u8 = 0x10;
    pub const TIMER_C: u8 = 0x40;
    pub const ANY: u8 = 0x80;
}

// CONTROL1 bits
pub(crate) const DISPLAY_ON: u8 = 0x10;
pub(crate) const BITMAP_MODE: u8 = 0x20;
pub(crate) const EXTENDED_COLOR: u8 = 0x40;

/// Timers and the raster accumulator run at double rate while the display
/// enable bit is set.
#[inline]
pub(crate) fn clock_multiplier(bus: &Bus) -> u32 {
    if bus.ram().read(reg::CONTROL1) & DISPLAY_ON != 0 {
        2
    } else {
        1
    }
}

/// Latch `source` in the request register and, when the CPU accepts
/// interrupts and the source is unmasked, enter the handler.
///
/// Returns true if the CPU was redirected.
pub(crate) fn request_interrupt<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, source: u8) -> bool {
    bus.ram_mut()
        .set_bits(reg::IRQ_REQUEST, source | irq_bits::ANY);
    let unmasked = bus.ram().read(reg::IRQ_MASK) & source != 0;
    if unmasked && !cpu.is_flag_set(IRQ_DISABLE) {
        irq(cpu, bus);
        true
    } else {
        false
    }
}
