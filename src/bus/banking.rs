/*!
banking: which backing store answers a CPU read.

Resolution order
================
1. $FD00-$FDFF and $FF00-$FF3F are the chip register windows and always
   come from RAM.
2. Below $8000, or with the ROM latch off, RAM answers.
3. $8000-$BFFF: bank-select bits 0-1 pick the low half
   (0 = system ROM, 1 = function ROM, 2/3 = nothing mapped).
4. $FC00-$FCFF: always the system ROM (kernal banking trampoline).
5. $C000-$FFFF: bank-select bits 2-3 pick the high half, same encoding.

Unmapped slots read as 0 (open bus).

Writes never consult this table: RAM underneath ROM is always writable.
*/

/// Backing store chosen for a read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Ram,
    SystemRom,
    FunctionRom,
    OpenBus,
}

/// ROM latch plus the 4-bit bank-select nibble.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Banking {
    rom_enabled: bool,
    select: u8,
}

impl Default for Banking {
    fn default() -> Self {
        Self {
            rom_enabled: true,
            select: 0,
        }
    }
}

#[inline]
fn is_io_window(addr: u16) -> bool {
    matches!(addr, 0xFD00..=0xFDFF | 0xFF00..=0xFF3F)
}

#[inline]
fn slot(bits: u8) -> Source {
    match bits & 0x03 {
        0 => Source::SystemRom,
        1 => Source::FunctionRom,
        _ => Source::OpenBus,
    }
}

impl Banking {
    pub fn rom_enabled(&self) -> bool {
        self.rom_enabled
    }

    pub fn select(&self) -> u8 {
        self.select
    }

    pub fn set_rom_enabled(&mut self, on: bool) {
        self.rom_enabled = on;
    }

    /// Only the low nibble is kept.
    pub fn set_select(&mut self, value: u8) {
        self.select = value & 0x0F;
    }

    pub fn resolve(&self, addr: u16) -> Source {
        if is_io_window(addr) || addr < 0x8000 || !self.rom_enabled {
            return Source::Ram;
        }
        match addr {
            0x8000..=0xBFFF => slot(self.select),
            0xFC00..=0xFCFF => Source::SystemRom,
            _ => slot(self.select >> 2),
        }
    }
}
