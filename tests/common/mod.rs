//! Synthetic ROM images and machines for the integration tests.

#![allow(dead_code)]

use tedium::rom::ROM_SIZE;
use tedium::{Machine, RomImage};

/// IRQ/BRK handler inside the system image: a lone RTI.
pub const IRQ_HANDLER: u16 = 0xE000;

/// NOP-filled system image with the reset vector at `reset` and the IRQ
/// vector at [`IRQ_HANDLER`].
pub fn system_rom(reset: u16) -> RomImage {
    let mut bytes = vec![0xEA; ROM_SIZE];
    bytes[(IRQ_HANDLER & 0x7FFF) as usize] = 0x40;
    bytes[0x7FFC..0x7FFE].copy_from_slice(&reset.to_le_bytes());
    bytes[0x7FFE..0x8000].copy_from_slice(&IRQ_HANDLER.to_le_bytes());
    RomImage::from_bytes("system", bytes).unwrap()
}

/// Function image whose bytes encode their own offset.
pub fn function_rom() -> RomImage {
    let bytes = (0..ROM_SIZE).map(|i| (i >> 8) as u8 ^ i as u8 ^ 0x5A).collect();
    RomImage::from_bytes("function", bytes).unwrap()
}

/// Reset machine with `program` in RAM at `origin`.
pub fn machine(origin: u16, program: &[u8]) -> Machine {
    let mut m = Machine::new(system_rom(origin), function_rom());
    m.bus_mut().load(origin, program);
    m.hard_reset();
    m
}
