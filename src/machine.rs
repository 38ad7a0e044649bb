/*!
machine - The assembled computer and its run loop.

A [`Machine`] owns the CPU, the bus (RAM, ROM images, banking, timer
enables, input latch) and the raster unit. Nothing is shared: every
component is driven through `&mut` from [`Machine::step`], which is the
only place the per-instruction order is spelled out:

1. the CPU executes one instruction and reports its cycles;
2. the TED timers count those cycles down and may enter the IRQ handler;
3. the raster unit accumulates them and, when a line completes, renders
   it into the caller's [`ScanlineSink`] and checks the compare line.

Cancellation
============
[`Machine::run`] polls a caller-owned `AtomicBool` between steps. An
instruction or a scanline is never cut short. [`spawn`] moves a machine
onto its own thread for front ends that present frames elsewhere.
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::display::ScanlineSink;
use crate::error::{Error, Result};
use crate::input::InputLatch;
use crate::prg::PrgImage;
use crate::rom::RomImage;
use crate::ted::{self, Raster};

/// Zero-page BASIC pointers set to the end of an injected program:
/// start of variables, start of arrays, end of arrays.
const BASIC_END_POINTERS: [u16; 3] = [0x2D, 0x2F, 0x31];

/// Counters reported by the run loops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub instructions: u64,
    pub cycles: u64,
    pub frames: u64,
}

#[derive(Debug)]
pub struct Machine {
    cpu: Cpu,
    bus: Bus,
    raster: Raster,
}

impl Machine {
    /// Machine with no input attached. Call [`hard_reset`](Self::hard_reset)
    /// before stepping.
    pub fn new(system_rom: RomImage, function_rom: RomImage) -> Self {
        Self::from_bus(Bus::new(system_rom, function_rom))
    }

    pub fn with_input(
        system_rom: RomImage,
        function_rom: RomImage,
        input: Box<dyn InputLatch>,
    ) -> Self {
        Self::from_bus(Bus::with_input(system_rom, function_rom, input))
    }

    fn from_bus(bus: Bus) -> Self {
        Self {
            cpu: Cpu::new(),
            bus,
            raster: Raster::new(),
        }
    }

    /// Power-on state: chip registers and banking reset, raster at line 0,
    /// CPU registers cleared with I set and PC from the reset vector.
    pub fn hard_reset(&mut self) {
        self.bus.reset();
        self.raster.reset();
        self.cpu.reset(&self.bus);
        log::info!("hard reset, PC = ${:04X}", self.cpu.pc());
    }

    /// One instruction followed by its timer and raster side effects.
    /// Returns the instruction's cycles.
    pub fn step<S: ScanlineSink + ?Sized>(&mut self, sink: &mut S) -> u32 {
        let cycles = self.cpu.step(&mut self.bus);
        let state = self.cpu.state_mut();
        ted::timers::tick(state, &mut self.bus, cycles);
        self.raster.tick(state, &mut self.bus, cycles, sink);
        cycles
    }

    /// Step until `frames` more raster frames have completed.
    pub fn run_frames<S: ScanlineSink + ?Sized>(&mut self, frames: u64, sink: &mut S) -> RunStats {
        let start = self.raster.frames();
        let target = start + frames;
        let mut stats = RunStats::default();
        while self.raster.frames() < target {
            stats.cycles += self.step(sink) as u64;
            stats.instructions += 1;
        }
        stats.frames = self.raster.frames() - start;
        stats
    }

    /// Step until `stop` is observed set. The flag is checked before every
    /// instruction.
    pub fn run<S: ScanlineSink + ?Sized>(&mut self, sink: &mut S, stop: &AtomicBool) -> RunStats {
        let start = self.raster.frames();
        let mut stats = RunStats::default();
        log::info!("run loop started at PC = ${:04X}", self.cpu.pc());
        while !stop.load(Ordering::Relaxed) {
            stats.cycles += self.step(sink) as u64;
            stats.instructions += 1;
        }
        stats.frames = self.raster.frames() - start;
        log::info!(
            "run loop stopped after {} instructions, {} frames",
            stats.instructions,
            stats.frames
        );
        stats
    }

    /// Copy a program into RAM. BASIC programs also get the end-of-program
    /// pointers so `RUN` sees them.
    pub fn load_prg(&mut self, prg: &PrgImage) -> Result<()> {
        self.bus.load(prg.load_address(), prg.data());
        let end = prg.end_address();
        if prg.is_basic_program() {
            let ram = self.bus.ram_mut();
            for ptr in BASIC_END_POINTERS {
                ram.write(ptr, end as u8);
                ram.write(ptr + 1, (end >> 8) as u8);
            }
        }
        log::info!(
            "loaded {} program ${:04X}-${:04X}",
            if prg.is_basic_program() { "BASIC" } else { "machine code" },
            prg.load_address(),
            end
        );
        Ok(())
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }
}

/// Run `machine` on a thread named `tedium-core` until `stop` is set. The
/// handle yields the machine back together with the run counters.
pub fn spawn<S>(
    mut machine: Machine,
    mut sink: S,
    stop: Arc<AtomicBool>,
) -> Result<JoinHandle<(Machine, RunStats)>>
where
    S: ScanlineSink + Send + 'static,
{
    thread::Builder::new()
        .name("tedium-core".into())
        .spawn(move || {
            let stats = machine.run(&mut sink, &stop);
            (machine, stats)
        })
        .map_err(Error::Spawn)
}
