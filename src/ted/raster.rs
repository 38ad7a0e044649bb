/*!
raster.rs - Raster line counter, blink toggle and raster-compare IRQ.

Each step feeds the instruction's cycles in:

- the blink accumulator counts raw cycles and flips the blink toggle every
  [`CYCLES_PER_BLINK`] cycles (cursor and flashing attributes);
- the line accumulator counts cycles times the clock multiplier; once it
  exceeds [`CYCLES_PER_LINE`] one raster line completes.

Line completion, in order:
1. publish the counter: $FF1C = (line >> 8) | $FE, $FF1D = line low byte,
   $FF1E = $FF;
2. read the 9-bit compare value, bit 0 of $FF0A over $FF0B;
3. if the line lies in the display window, render row `line - 3` and hand
   it to the sink;
4. advance the counter, wrapping to 0 after line 311 (one frame done);
5. if the new line equals the compare value, raise the raster request.
*/

use crate::bus::Bus;
use crate::cpu::regs::CpuRegs;
use crate::display::ScanlineSink;
use crate::ted::{
    CYCLES_PER_BLINK, CYCLES_PER_LINE, FIRST_SCREEN_LINE, RASTER_LINES, SCREEN_HEIGHT,
    SCREEN_WIDTH, clock_multiplier, irq_bits, reg, renderer, request_interrupt,
};

#[derive(Clone)]
pub struct Raster {
    line: u16,
    cycles: u32,
    blink_cycles: u32,
    blink: bool,
    frames: u64,
    pixels: [u8; SCREEN_WIDTH],
}

impl Default for Raster {
    fn default() -> Self {
        Self {
            line: 0,
            cycles: 0,
            blink_cycles: 0,
            blink: false,
            frames: 0,
            pixels: [0; SCREEN_WIDTH],
        }
    }
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("line", &self.line)
            .field("cycles", &self.cycles)
            .field("blink", &self.blink)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl Raster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line 0, accumulators cleared, blink off. The frame count survives.
    pub fn reset(&mut self) {
        self.line = 0;
        self.cycles = 0;
        self.blink_cycles = 0;
        self.blink = false;
    }

    /// Current raster line, 0..312.
    pub fn line(&self) -> u16 {
        self.line
    }

    pub fn blink(&self) -> bool {
        self.blink
    }

    /// Completed frames (counter wraps) since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Account for `cycles` elapsed CPU cycles. Returns true when a raster
    /// line completed.
    pub(crate) fn tick<C, S>(&mut self, cpu: &mut C, bus: &mut Bus, cycles: u32, sink: &mut S) -> bool
    where
        C: CpuRegs,
        S: ScanlineSink + ?Sized,
    {
        self.blink_cycles += cycles;
        if self.blink_cycles >= CYCLES_PER_BLINK {
            self.blink_cycles -= CYCLES_PER_BLINK;
            self.blink = !self.blink;
        }

        self.cycles += cycles * clock_multiplier(bus);
        if self.cycles > CYCLES_PER_LINE {
            self.cycles -= CYCLES_PER_LINE;
            self.end_line(cpu, bus, sink);
            true
        } else {
            false
        }
    }

    fn end_line<C, S>(&mut self, cpu: &mut C, bus: &mut Bus, sink: &mut S)
    where
        C: CpuRegs,
        S: ScanlineSink + ?Sized,
    {
        let ram = bus.ram_mut();
        ram.write(reg::RASTER_HI, (self.line >> 8) as u8 | 0xFE);
        ram.write(reg::RASTER_LO, self.line as u8);
        ram.write(reg::HPOS, 0xFF);

        let compare = compare_line(bus);

        let window = FIRST_SCREEN_LINE..FIRST_SCREEN_LINE + SCREEN_HEIGHT as u16;
        if window.contains(&self.line) {
            let y = (self.line - FIRST_SCREEN_LINE) as usize;
            renderer::render_line(bus, y, self.blink, &mut self.pixels);
            sink.scanline(y, &self.pixels);
        }

        self.line += 1;
        if self.line >= RASTER_LINES {
            self.line = 0;
            self.frames += 1;
        }
        debug_assert!(self.line < RASTER_LINES);

        if self.line == compare && request_interrupt(cpu, bus, irq_bits::RASTER) {
            log::debug!("raster IRQ at line {}", self.line);
        }
    }
}

/// Programmed compare line: bit 0 of $FF0A is bit 8.
fn compare_line(bus: &Bus) -> u16 {
    let ram = bus.ram();
    ((ram.read(reg::IRQ_MASK) as u16 & 0x01) << 8) | ram.read(reg::RASTER_COMPARE) as u16
}
