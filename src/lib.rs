#![doc = r#"
tedium library crate.

An emulator core for the Commodore Plus/4 family: a 6502-compatible CPU,
the bank-switched memory map and the TED chip's timers, interrupt unit and
raster video generator. Binaries and tests drive it through [`Machine`].

Modules:
- bus: CPU-visible address space; RAM, ROM overlay, banking, register
  write side effects
- cpu: 6502 core (facade + state + addressing + opcode table + dispatch)
- display: scanline sinks (frame buffer, channel hand-off) and optional
  window / screenshot front ends
- error: startup error type
- input: keyboard matrix / joystick latch capability
- machine: the assembled computer, step order and run loops
- prg: `.prg` program images
- rom: 32 KiB ROM images
- ted: timers, interrupt requests, raster counter, renderer, palette
- trace: disassembler used for per-instruction trace logging

In tests, synthetic ROM and machine builders live under `crate::test_utils`.
"#]

pub mod bus;
pub mod cpu;
pub mod display;
pub mod error;
pub mod input;
pub mod machine;
pub mod prg;
pub mod rom;
pub mod ted;
pub mod trace;

// Re-export commonly used types at the crate root for convenience.
pub use bus::Bus;
pub use cpu::Cpu;
pub use display::{ChannelSink, FrameBuffer, NullSink, ScanlineSink, Scanline};
pub use error::{Error, Result};
pub use input::{InputLatch, KeyMatrix, NoInput, SharedKeys};
pub use machine::{Machine, RunStats};
pub use prg::PrgImage;
pub use rom::RomImage;

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
