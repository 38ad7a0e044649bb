//! Scanline renderer.
//!
//! Produces one line of 320 colour indices from the current register and
//! memory contents. Mode selection, from $FF06:
//!
//! - display off: the whole line takes the border colour ($FF19);
//! - bitmap (bit 5): one bit per pixel, foreground colour from the colour
//!   table at $1800, background from $FF15;
//! - otherwise text, 40 cells of 8x8 glyphs. Extended-colour mode (bit 6)
//!   is drawn as plain text.
//!
//! Within text mode, a cell whose colour has bit 3 set is drawn multicolour
//! when $FF07 bit 4 is on (four double-width pixels per glyph row).

use crate::bus::Bus;
use crate::ted::{BITMAP_MODE, DISPLAY_ON, SCREEN_WIDTH, reg};

const COLUMNS: u16 = 40;
const COLOR_TABLE: u16 = 0x1800;
const SCREEN_CODES: u16 = 0x0400;
const BITMAP_BYTES_PER_ROW: u16 = 320;

// CONTROL2 bits
const FULL_CHARSET: u8 = 0x80;
const MULTICOLOR: u8 = 0x10;

// BITMAP_CHARSET bit: glyphs come from ROM instead of RAM.
const CHARSET_IN_ROM: u8 = 0x04;

/// Render pixel row `y` (0..200) of the display window into `out`.
pub(crate) fn render_line(bus: &Bus, y: usize, blink: bool, out: &mut [u8; SCREEN_WIDTH]) {
    let ram = bus.ram();
    let control = ram.read(reg::CONTROL1);
    let background = ram.read(reg::BACKGROUND) & 0x7F;

    if control & DISPLAY_ON == 0 {
        out.fill(ram.read(reg::BORDER) & 0x7F);
    } else if control & BITMAP_MODE != 0 {
        bitmap_line(bus, y as u16, background, out);
    } else {
        text_line(bus, y as u16, blink, background, out);
    }
}

fn bitmap_line(bus: &Bus, y: u16, background: u8, out: &mut [u8; SCREEN_WIDTH]) {
    let ram = bus.ram();
    let base = ((ram.read(reg::BITMAP_CHARSET) >> 3) & 0x07) as u16 * 0x2000;
    let row = y / 8;
    let line_start = base
        .wrapping_add(row * BITMAP_BYTES_PER_ROW)
        .wrapping_add(y & 7);

    for (x, px) in out.iter_mut().enumerate() {
        let x = x as u16;
        let bits = ram.read(line_start.wrapping_add((x / 8) * 8));
        *px = if bits & (0x80u8 >> (x & 7)) != 0 {
            ram.read(COLOR_TABLE + row * COLUMNS + x / 8) & 0x7F
        } else {
            background
        };
    }
}

fn text_line(bus: &Bus, y: u16, blink: bool, background: u8, out: &mut [u8; SCREEN_WIDTH]) {
    let ram = bus.ram();
    let matrix = ((ram.read(reg::VIDEO_MATRIX) & 0xF8) as u16) << 8;
    let cursor = (ram.read(reg::CURSOR_HI) as u16) << 8 | ram.read(reg::CURSOR_LO) as u16;
    let control2 = ram.read(reg::CONTROL2);
    let row = y / 8;
    let glyph_row = y & 7;

    for column in 0..COLUMNS {
        let offset = column + row * COLUMNS;
        let mut code = ram.read(matrix.wrapping_add(SCREEN_CODES + offset));
        let color = ram.read(matrix.wrapping_add(offset));
        if blink && cursor == offset {
            code ^= 0x80;
        }

        let bits = glyph_bits(bus, code, glyph_row, control2);
        let cell = &mut out[column as usize * 8..column as usize * 8 + 8];

        if control2 & MULTICOLOR != 0 && color & 0x08 != 0 {
            let colors = [
                background,
                ram.read(reg::COLOR3),
                ram.read(reg::COLOR2),
                color & !0x08,
            ];
            for pair in 0..4 {
                let pixel = colors[((bits >> (pair * 2)) & 0x03) as usize] & 0x7F;
                cell[6 - pair * 2] = pixel;
                cell[7 - pair * 2] = pixel;
            }
        } else {
            // Bit 7 of the colour flashes the foreground with the cursor.
            let hidden = color & 0x80 != 0 && !blink;
            for (cx, px) in cell.iter_mut().enumerate() {
                *px = if bits & (0x80u8 >> cx) != 0 && !hidden {
                    color & 0x7F
                } else {
                    background
                };
            }
        }
    }
}

/// Glyph byte for screen code `code`. With the 128-character set, codes
/// above 127 draw the inverse of `code - 128`.
fn glyph_bits(bus: &Bus, code: u8, glyph_row: u16, control2: u8) -> u8 {
    let ram = bus.ram();
    let charset = ((ram.read(reg::CHARSET_BASE) & 0xFC) as u16) << 8;
    let from_rom = ram.read(reg::BITMAP_CHARSET) & CHARSET_IN_ROM != 0;
    let fetch = |c: u8| {
        let addr = charset.wrapping_add(c as u16 * 8 + glyph_row);
        if from_rom {
            bus.system_rom_byte(addr)
        } else {
            ram.read(addr)
        }
    };

    if control2 & FULL_CHARSET == 0 && code > 127 {
        !fetch(code - 128)
    } else {
        fetch(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ted::EXTENDED_COLOR;
    use crate::test_utils::bus_with_program;

    fn setup() -> Bus {
        let mut bus = bus_with_program(0x1000, &[0xEA]);
        let ram = bus.ram_mut();
        // Matrix at $0800 (colours) / $0C00 (codes), charset in RAM at $2000.
        ram.write(reg::VIDEO_MATRIX, 0x08);
        ram.write(reg::CHARSET_BASE, 0x20);
        ram.write(reg::BITMAP_CHARSET, 0x00);
        ram.write(reg::CONTROL1, DISPLAY_ON);
        ram.write(reg::BACKGROUND, 0x71);
        ram.write(reg::CURSOR_HI, 0x03);
        ram.write(reg::CURSOR_LO, 0xFF);
        // Glyph 1: row 0 = 1000_0001.
        ram.write(0x2008, 0x81);
        bus
    }

    fn render(bus: &Bus, y: usize, blink: bool) -> [u8; SCREEN_WIDTH] {
        let mut out = [0u8; SCREEN_WIDTH];
        render_line(bus, y, blink, &mut out);
        out
    }

    #[test]
    fn display_off_fills_with_border() {
        let mut bus = setup();
        bus.ram_mut().write(reg::CONTROL1, 0x00);
        bus.ram_mut().write(reg::BORDER, 0xEE);
        assert!(render(&bus, 5, false).iter().all(|&p| p == 0x6E));
    }

    #[test]
    fn text_cell_draws_glyph_bits() {
        let mut bus = setup();
        bus.ram_mut().write(0x0C00, 0x01);
        bus.ram_mut().write(0x0800, 0x32);
        let line = render(&bus, 0, false);
        assert_eq!(line[0], 0x32);
        assert_eq!(&line[1..7], &[0x71; 6]);
        assert_eq!(line[7], 0x32);
        // Second cell: code 0, colour 0, empty glyph.
        assert_eq!(line[8], 0x71);
    }

    #[test]
    fn high_codes_are_inverse_with_small_charset() {
        let mut bus = setup();
        bus.ram_mut().write(0x0C00, 0x81);
        bus.ram_mut().write(0x0800, 0x05);
        let line = render(&bus, 0, false);
        assert_eq!(line[0], 0x71);
        assert_eq!(&line[1..7], &[0x05; 6]);
        assert_eq!(line[7], 0x71);
    }

    #[test]
    fn cursor_cell_inverts_when_blink_on() {
        let mut bus = setup();
        bus.ram_mut().write(reg::CURSOR_HI, 0x00);
        bus.ram_mut().write(reg::CURSOR_LO, 0x00);
        bus.ram_mut().write(0x0C00, 0x01);
        bus.ram_mut().write(0x0800, 0x05);
        assert_eq!(render(&bus, 0, false)[1], 0x71);
        assert_eq!(render(&bus, 0, true)[1], 0x05);
    }

    #[test]
    fn flashing_colour_hides_foreground_while_blink_off() {
        let mut bus = setup();
        bus.ram_mut().write(0x0C00, 0x01);
        bus.ram_mut().write(0x0800, 0x85);
        assert_eq!(render(&bus, 0, false)[0], 0x71);
        assert_eq!(render(&bus, 0, true)[0], 0x05);
    }

    #[test]
    fn multicolor_cell_uses_pairs() {
        let mut bus = setup();
        let ram = bus.ram_mut();
        ram.write(reg::CONTROL2, MULTICOLOR);
        ram.write(reg::COLOR2, 0x22);
        ram.write(reg::COLOR3, 0x33);
        // Glyph 2 row 0: 11 10 01 00
        ram.write(0x2010, 0b1110_0100);
        ram.write(0x0C00, 0x02);
        ram.write(0x0800, 0x0D);
        let line = render(&bus, 0, false);
        assert_eq!(&line[0..8], &[0x05, 0x05, 0x22, 0x22, 0x33, 0x33, 0x71, 0x71]);
    }

    #[test]
    fn bitmap_mode_uses_colour_table() {
        let mut bus = setup();
        let ram = bus.ram_mut();
        ram.write(reg::CONTROL1, DISPLAY_ON | BITMAP_MODE);
        ram.write(reg::BITMAP_CHARSET, 0x08); // bitmap at $2000
        ram.write(0x2000 + 320 + 2, 0x80); // y = 10: row 1, line 2, column 0
        ram.write(COLOR_TABLE + 40, 0x9C);
        let line = render(&bus, 10, false);
        assert_eq!(line[0], 0x1C);
        assert_eq!(line[1], 0x71);
    }

    #[test]
    fn extended_colour_renders_as_text() {
        let mut bus = setup();
        bus.ram_mut().write(reg::CONTROL1, DISPLAY_ON | EXTENDED_COLOR);
        bus.ram_mut().write(0x0C00, 0x01);
        bus.ram_mut().write(0x0800, 0x32);
        assert_eq!(render(&bus, 0, false)[0], 0x32);
    }

    #[test]
    fn charset_from_rom() {
        let mut bus = setup();
        bus.ram_mut().write(reg::BITMAP_CHARSET, CHARSET_IN_ROM);
        bus.ram_mut().write(reg::CHARSET_BASE, 0xD0);
        bus.ram_mut().write(0x0C00, 0x00);
        bus.ram_mut().write(0x0800, 0x32);
        // Synthetic system image is NOP-filled: 0xEA = 1110_1010.
        let line = render(&bus, 0, false);
        assert_eq!(&line[0..4], &[0x32, 0x32, 0x32, 0x71]);
    }
}
