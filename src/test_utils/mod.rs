//! Shared test utilities for building synthetic ROM images and machines.
//!
//! The system image built here is filled with NOPs (0xEA) and carries:
//! - the RESET vector at $FFFC pointing at the caller's program address,
//! - the IRQ/BRK vector at $FFFE pointing at [`IRQ_HANDLER`],
//! - an RTI at [`IRQ_HANDLER`].
//!
//! The function image is filled with a position-dependent pattern so tests
//! can tell the two images apart at any offset.
//!
//! Programs are copied into RAM (below $8000 they are always visible).

#![allow(dead_code)]

use crate::bus::Bus;
use crate::machine::Machine;
use crate::rom::{ROM_SIZE, RomImage};

/// Address of the interrupt handler stub inside the system image.
pub const IRQ_HANDLER: u16 = 0xE000;

/// System image with vectors set as documented above. `rom_code` lands
/// at $8000 (ROM offset 0).
pub fn system_rom(reset: u16, rom_code: &[u8]) -> RomImage {
    let mut bytes = vec![0xEA; ROM_SIZE];
    bytes[..rom_code.len()].copy_from_slice(rom_code);
    bytes[(IRQ_HANDLER & 0x7FFF) as usize] = 0x40; // RTI
    write_le_u16(&mut bytes, 0x7FFC, reset);
    write_le_u16(&mut bytes, 0x7FFE, IRQ_HANDLER);
    RomImage::from_bytes("system-test", bytes).unwrap()
}

pub fn function_rom() -> RomImage {
    let bytes = (0..ROM_SIZE).map(|i| (i as u8) ^ 0xA5).collect();
    RomImage::from_bytes("function-test", bytes).unwrap()
}

/// Bus whose RAM holds `program` at `origin` and whose reset vector
/// points there.
pub fn bus_with_program(origin: u16, program: &[u8]) -> Bus {
    let mut bus = Bus::new(system_rom(origin, &[]), function_rom());
    bus.load(origin, program);
    bus
}

/// Hard-reset machine executing `program` from `origin`.
pub fn machine_with_program(origin: u16, program: &[u8]) -> Machine {
    let mut m = Machine::new(system_rom(origin, &[]), function_rom());
    m.bus_mut().load(origin, program);
    m.hard_reset();
    m
}

#[inline]
fn write_le_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset] = (value & 0x00FF) as u8;
    buf[offset + 1] = (value >> 8) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_and_handler_in_place() {
        let rom = system_rom(0x1234, &[0xA9, 0x01]);
        assert_eq!(rom.read_word(0xFFFC), 0x1234);
        assert_eq!(rom.read_word(0xFFFE), IRQ_HANDLER);
        assert_eq!(rom.read(IRQ_HANDLER), 0x40);
        assert_eq!(rom.read(0x8000), 0xA9);
        assert_eq!(rom.read(0x8002), 0xEA);
    }

    #[test]
    fn images_differ() {
        let sys = system_rom(0x1000, &[]);
        let func = function_rom();
        assert_ne!(sys.read(0x9000), func.read(0x9000));
    }
}
