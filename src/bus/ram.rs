/*!
RAM module: the full 64 KiB of machine RAM.

Every address has a backing byte here, including the ones normally hidden
behind ROM and the chip register windows at $FD00-$FDFF / $FF00-$FF3F.
Chip registers are plain RAM cells; the bus layers side effects on top of
writes, and the video/timer logic reads and updates the cells directly.
*/

/// Size of machine RAM (in bytes).
pub const RAM_SIZE: usize = 0x1_0000;

pub struct Ram {
    data: Box<[u8]>,
}

impl Default for Ram {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Ram {
    /// Create a new RAM instance initialized to 0.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: vec![0; RAM_SIZE].into_boxed_slice(),
        }
    }

    /// Clear RAM contents to 0.
    #[inline]
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }

    /// Set bits in a cell (request registers accumulate this way).
    #[inline]
    pub fn set_bits(&mut self, addr: u16, mask: u8) {
        self.data[addr as usize] |= mask;
    }

    /// Copy `bytes` starting at `addr`, wrapping at the top of memory.
    pub fn load(&mut self, addr: u16, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            self.write(addr.wrapping_add(i as u16), *b);
        }
    }

    /// Expose the internal slice (read-only). Useful for diagnostics or hashing.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
