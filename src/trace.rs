/*!
trace - Instruction disassembly for execution logs.

`disassemble` is a pure formatter: given an address, the opcode byte and
the two bytes after it, it produces one fixed-column line

```text
AAAA OP B1 B2  MNE operand    ; note
D88B A9 93     LDA #$93
D8A0 20 4E D8  JSR $D84E      ; editor reset
```

Unused operand byte columns are blank. Undocumented opcodes are marked
with `*` before the mnemonic. The note names well-known system ROM entry
points and zero-page cells the operand refers to.

When the `tedium::trace` log target is enabled at `trace` level the
dispatcher emits one such line per instruction, followed by the register
file as it was before execution.
*/

use std::fmt::Write;

use crate::bus::Bus;
use crate::cpu::addressing::AddressingMode;
use crate::cpu::regs::CpuRegs;
use crate::cpu::table;

/// Log target for per-instruction trace lines.
pub const TARGET: &str = "tedium::trace";

/// Operand column width; notes start after it.
const OPERAND_WIDTH: usize = 10;

/// Format one instruction. `b1` and `b2` are ignored beyond the
/// instruction's length.
pub fn disassemble(addr: u16, opcode: u8, b1: u8, b2: u8) -> String {
    let entry = table::lookup(opcode);
    let word = u16::from_le_bytes([b1, b2]);
    let length = entry.length();

    let mut line = String::with_capacity(48);
    let _ = write!(line, "{addr:04X} {opcode:02X} ");
    match length {
        1 => line.push_str("      "),
        2 => {
            let _ = write!(line, "{b1:02X}    ");
        }
        _ => {
            let _ = write!(line, "{b1:02X} {b2:02X} ");
        }
    }

    line.push(if entry.documented { ' ' } else { '*' });
    line.push_str(entry.operation.mnemonic());

    let (operand, target) = operand_text(entry.mode, addr, b1, word);
    if !operand.is_empty() {
        line.push(' ');
        line.push_str(&operand);
    }
    if let Some(note) = target.and_then(symbol) {
        let pad = OPERAND_WIDTH.saturating_sub(operand.len());
        let _ = write!(line, "{:pad$} ; {note}", "");
    }
    line
}

/// Operand text plus the address it names, if any.
fn operand_text(mode: AddressingMode, addr: u16, b1: u8, word: u16) -> (String, Option<u16>) {
    use AddressingMode::*;
    match mode {
        Implied => (String::new(), None),
        Accumulator => ("A".into(), None),
        Immediate => (format!("#${b1:02X}"), None),
        ZeroPage => (format!("${b1:02X}"), Some(b1 as u16)),
        ZeroPageX => (format!("${b1:02X},X"), Some(b1 as u16)),
        ZeroPageY => (format!("${b1:02X},Y"), Some(b1 as u16)),
        Absolute => (format!("${word:04X}"), Some(word)),
        AbsoluteX => (format!("${word:04X},X"), Some(word)),
        AbsoluteY => (format!("${word:04X},Y"), Some(word)),
        Indirect => (format!("(${word:04X})"), None),
        IndexedIndirectX => (format!("(${b1:02X},X)"), None),
        IndirectIndexedY => (format!("(${b1:02X}),Y"), None),
        Relative => {
            let dest = addr.wrapping_add(2).wrapping_add(b1 as i8 as u16);
            (format!("${dest:04X}"), Some(dest))
        }
    }
}

/// Name of a known system location.
pub fn symbol(addr: u16) -> Option<&'static str> {
    SYMBOLS
        .binary_search_by_key(&addr, |&(a, _)| a)
        .ok()
        .map(|i| SYMBOLS[i].1)
}

// Sorted by address.
static SYMBOLS: &[(u16, &str)] = &[
    (0x00CA, "cursor column"),
    (0x07E7, "left window border"),
    (0x8000, "BASIC cold start"),
    (0xCF11, "check stop key"),
    (0xD84E, "editor reset"),
    (0xD88B, "clear screen"),
    (0xD89A, "cursor home"),
    (0xD8C1, "get key from buffer"),
    (0xD8EA, "input from screen"),
    (0xD965, "read char from screen"),
    (0xD9BA, "toggle quote mode"),
    (0xD9C7, "finish PRINT"),
    (0xDA21, "scroll up"),
    (0xDA3D, "copy screen line"),
    (0xDA5E, "insert blank line"),
    (0xDB11, "scan keyboard"),
    (0xDB70, "decode key"),
    (0xDC49, "print char"),
    (0xDC8C, "return code"),
    (0xDC9B, "ESC-O clear flags"),
    (0xDCFA, "cursor right"),
    (0xDD00, "cursor down"),
    (0xDD0D, "cursor up"),
    (0xDD1C, "cursor left"),
    (0xDD27, "text mode"),
    (0xDEF6, "ESC-V scroll up"),
    (0xDF04, "ESC-W scroll down"),
    (0xDF1D, "ESC-L enable scrolling"),
    (0xDF20, "ESC-M disable scrolling"),
    (0xDF26, "ESC-C auto-insert off"),
    (0xDF2F, "fetch char from screen"),
    (0xDF39, "GETBIT"),
    (0xDF46, "PUTBIT"),
    (0xDF4A, "CLRBIT"),
    (0xDF66, "make bit position"),
    (0xDF95, "ESC-K cursor to line end"),
    (0xDFD4, "cursor left (wrap)"),
    (0xEB46, "init RS-232 area"),
    (0xEDEA, "IOINIT part"),
    (0xF2A4, "NMI and start"),
    (0xF2CE, "RESTOR"),
    (0xF2D3, "VECTOR"),
    (0xF30B, "IOINIT"),
    (0xF352, "RAMTAS"),
    (0xF445, "monitor"),
    (0xFBCB, "check stop key (kernal)"),
    (0xFBD8, "print message"),
    (0xFC19, "IOBASE"),
    (0xFC1E, "cartridge reset"),
    (0xFC59, "init cartridges"),
    (0xFC7F, "cartridge access"),
    (0xFC89, "cartridge call"),
    (0xFCB3, "PULS"),
    (0xFCC9, "enable and run cartridge"),
    (0xFFF6, "system start"),
];

/// Emit the trace line for the instruction whose opcode `byte` was just
/// fetched from `at`. Registers are shown as they were before execution.
pub(crate) fn log_instruction<C: CpuRegs>(cpu: &C, bus: &Bus, at: u16, byte: u8) {
    let b1 = bus.read(at.wrapping_add(1));
    let b2 = bus.read(at.wrapping_add(2));
    log::trace!(
        target: TARGET,
        "{:<44} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
        disassemble(at, byte, b1, b2),
        cpu.a(),
        cpu.x(),
        cpu.y(),
        cpu.status(),
        cpu.sp()
    );
}
