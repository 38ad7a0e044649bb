/*!
Keyboard / joystick latch abstraction.

Behavior:
- The keyboard is an 8x8 switch matrix. The CPU writes a row-select byte to
  $FD30 (a 0 bit selects a row) and then reads the column byte the chip
  latched into $FF08. Both bytes are active-low: 0xFF means nothing pressed.
- A write to $FD30 or $FF08 asks for a rescan. A write of 0xFA / 0xFD to
  $FF08 additionally samples joystick port 1 / 2.
- The core never decodes host keys. It only talks to an [`InputLatch`]
  capability; how keys get into the matrix is the host's business.

Notes:
- [`KeyMatrix`] is the plain matrix implementation. [`SharedKeys`] wraps one
  in `Arc<Mutex<..>>` so a UI thread can press keys while the emulation
  thread owns the latch.
*/

use std::sync::{Arc, Mutex};

/// Capability the bus uses to rescan input.
pub trait InputLatch: Send {
    /// Column byte for the rows selected (active-low) by `row_select`.
    fn keyboard(&mut self, row_select: u8) -> u8;

    /// Direction/fire byte for joystick `port` (1 or 2), active-low.
    fn joystick(&mut self, _port: u8) -> u8 {
        0xFF
    }
}

/// Latch with nothing attached; every scan reads as "no key".
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInput;

impl InputLatch for NoInput {
    fn keyboard(&mut self, _row_select: u8) -> u8 {
        0xFF
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyMatrix {
    // rows[r] bit c set = key at (r, c) held down.
    rows: [u8; 8],
}

impl KeyMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, row: usize, col: usize) {
        if row < 8 && col < 8 {
            self.rows[row] |= 1 << col;
        }
    }

    pub fn release(&mut self, row: usize, col: usize) {
        if row < 8 && col < 8 {
            self.rows[row] &= !(1 << col);
        }
    }

    pub fn clear(&mut self) {
        self.rows = [0; 8];
    }

    pub fn is_pressed(&self, row: usize, col: usize) -> bool {
        row < 8 && col < 8 && self.rows[row] & (1 << col) != 0
    }
}

impl InputLatch for KeyMatrix {
    fn keyboard(&mut self, row_select: u8) -> u8 {
        let selected = !row_select;
        let held = self
            .rows
            .iter()
            .enumerate()
            .filter(|&(r, _)| selected & (1u8 << r) != 0)
            .fold(0u8, |acc, (_, &cols)| acc | cols);
        !held
    }
}

/// Thread-shareable handle onto a [`KeyMatrix`].
#[derive(Clone, Debug, Default)]
pub struct SharedKeys(Arc<Mutex<KeyMatrix>>);

impl SharedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the matrix. A poisoned lock is recovered; the matrix
    /// holds no invariants a panicking writer could break.
    pub fn with<R>(&self, f: impl FnOnce(&mut KeyMatrix) -> R) -> R {
        let mut guard = self.0.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl InputLatch for SharedKeys {
    fn keyboard(&mut self, row_select: u8) -> u8 {
        self.with(|m| m.keyboard(row_select))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_matrix_reads_all_high() {
        let mut m = KeyMatrix::new();
        assert_eq!(m.keyboard(0x00), 0xFF);
        assert_eq!(NoInput.keyboard(0x00), 0xFF);
        assert_eq!(NoInput.joystick(1), 0xFF);
    }

    #[test]
    fn only_selected_rows_report() {
        let mut m = KeyMatrix::new();
        m.press(1, 3);
        // Row 1 selected (bit 1 low).
        assert_eq!(m.keyboard(!0b0000_0010), !0b0000_1000);
        // Row 0 selected only: key not visible.
        assert_eq!(m.keyboard(!0b0000_0001), 0xFF);
        // No rows selected.
        assert_eq!(m.keyboard(0xFF), 0xFF);
    }

    #[test]
    fn multiple_rows_or_together() {
        let mut m = KeyMatrix::new();
        m.press(0, 0);
        m.press(7, 7);
        assert_eq!(m.keyboard(0x00), !0b1000_0001);
        m.release(7, 7);
        assert!(!m.is_pressed(7, 7));
        assert_eq!(m.keyboard(0x00), !0b0000_0001);
    }

    #[test]
    fn out_of_range_keys_ignored() {
        let mut m = KeyMatrix::new();
        m.press(8, 0);
        m.press(0, 9);
        assert_eq!(m, KeyMatrix::new());
    }

    #[test]
    fn shared_handle_sees_presses() {
        let keys = SharedKeys::new();
        let mut latch = keys.clone();
        keys.with(|m| m.press(2, 4));
        assert_eq!(latch.keyboard(!0b0000_0100), !0b0001_0000);
    }
}
