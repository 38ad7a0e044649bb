/*!
Bus: the CPU-visible address space.

Owns RAM, both ROM images, the banking state, the timer enables and the
input latch. Nothing else keeps references into these; every access goes
through `read` / `write` (or the RAM view used by the chip logic, which
bypasses ROM overlay and write side effects).

Write side effects
==================
- $FF3E / $FF3F: ROM latch on / off (value not stored).
- $FDD0-$FDDF: bank select = low nibble of the *address* (not stored).
- $FF00/$FF02/$FF04: store, then stop timer A/B/C.
- $FF01/$FF03/$FF05: store, then start timer A/B/C.
- $FD30: store the row select, then rescan the keyboard.
- $FF08: never stored; the written byte selects a joystick port
  (0xFA = 1, 0xFD = 2) and the keyboard is rescanned into $FF08.
- Everything else: plain RAM store, including under ROM.
*/

pub mod banking;
pub mod ram;

pub use banking::{Banking, Source};
pub use ram::Ram;

use crate::input::{InputLatch, NoInput};
use crate::rom::RomImage;
use crate::ted::Timers;
use crate::ted::reg;

pub struct Bus {
    ram: Ram,
    system_rom: RomImage,
    function_rom: RomImage,
    banking: Banking,
    timers: Timers,
    input: Box<dyn InputLatch>,
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("banking", &self.banking)
            .field("timers", &self.timers)
            .finish_non_exhaustive()
    }
}

impl Bus {
    /// Bus with no input attached.
    pub fn new(system_rom: RomImage, function_rom: RomImage) -> Self {
        Self::with_input(system_rom, function_rom, Box::new(NoInput))
    }

    pub fn with_input(
        system_rom: RomImage,
        function_rom: RomImage,
        input: Box<dyn InputLatch>,
    ) -> Self {
        Self {
            ram: Ram::new(),
            system_rom,
            function_rom,
            banking: Banking::default(),
            timers: Timers::default(),
            input,
        }
    }

    pub fn set_input(&mut self, input: Box<dyn InputLatch>) {
        self.input = input;
    }

    /// Power-on chip state: ROM visible, bank 0, timers stopped, timer C
    /// low byte preset to 4. RAM contents are left alone.
    pub fn reset(&mut self) {
        self.banking = Banking::default();
        self.timers.reset();
        self.ram.write(reg::TIMER_C_LO, 4);
    }

    // ---------------------------------------------------------------------
    // CPU-visible access
    // ---------------------------------------------------------------------

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        match self.banking.resolve(addr) {
            Source::Ram => self.ram.read(addr),
            Source::SystemRom => self.system_rom.read(addr),
            Source::FunctionRom => self.function_rom.read(addr),
            Source::OpenBus => 0,
        }
    }

    #[inline]
    pub fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            reg::ROM_ON => {
                self.banking.set_rom_enabled(true);
                log::debug!("ROM latch on");
            }
            reg::ROM_OFF => {
                self.banking.set_rom_enabled(false);
                log::debug!("ROM latch off");
            }
            reg::BANK_SELECT_FIRST..=reg::BANK_SELECT_LAST => {
                self.banking.set_select((addr & 0x0F) as u8);
                log::debug!("bank select {:#06b}", self.banking.select());
            }
            reg::KEYBOARD_LATCH => {
                let joystick = match value {
                    0xFA => self.input.joystick(1),
                    0xFD => self.input.joystick(2),
                    _ => 0xFF,
                };
                self.scan_keyboard(joystick);
            }
            reg::KEYBOARD_SELECT => {
                self.ram.write(addr, value);
                self.scan_keyboard(0xFF);
            }
            reg::TIMER_A_LO..=reg::TIMER_C_HI => {
                self.ram.write(addr, value);
                let index = ((addr - reg::TIMER_A_LO) / 2) as usize;
                // Low byte stops the timer, high byte starts it.
                self.timers.set_enabled(index, addr & 1 == 1);
            }
            _ => self.ram.write(addr, value),
        }
    }

    fn scan_keyboard(&mut self, joystick: u8) {
        let select = self.ram.read(reg::KEYBOARD_SELECT);
        let columns = if select == 0xFF {
            0xFF
        } else {
            self.input.keyboard(select)
        };
        self.ram.write(reg::KEYBOARD_LATCH, columns & joystick);
    }

    // ---------------------------------------------------------------------
    // Chip-side views
    // ---------------------------------------------------------------------

    /// Raw RAM, ignoring ROM overlay.
    #[inline]
    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    /// Raw RAM for chip-internal updates (no write side effects).
    #[inline]
    pub fn ram_mut(&mut self) -> &mut Ram {
        &mut self.ram
    }

    /// Byte from the system ROM regardless of banking (charset fetches).
    #[inline]
    pub fn system_rom_byte(&self, addr: u16) -> u8 {
        self.system_rom.read(addr)
    }

    /// Reset vector from the system ROM.
    pub fn reset_vector(&self) -> u16 {
        self.system_rom.read_word(0xFFFC)
    }

    /// IRQ/BRK vector from the system ROM.
    pub fn irq_vector(&self) -> u16 {
        self.system_rom.read_word(0xFFFE)
    }

    pub fn banking(&self) -> &Banking {
        &self.banking
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub(crate) fn timers_and_ram(&mut self) -> (&mut Timers, &mut Ram) {
        (&mut self.timers, &mut self.ram)
    }

    /// Copy bytes straight into RAM (program injection, tests).
    pub fn load(&mut self, addr: u16, bytes: &[u8]) {
        self.ram.load(addr, bytes);
    }
}
