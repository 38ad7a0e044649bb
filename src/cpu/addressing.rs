/*!
addressing.rs - Addressing modes and operand resolution

Overview
========
Every opcode carries one [`AddressingMode`]. Before an operation runs, the
dispatcher calls [`resolve`], which consumes the operand bytes from the
instruction stream (advancing PC) and returns a [`Resolved`] value:

- the [`Operand`] the operation acts on (immediate byte, effective
  address, accumulator, or nothing), and
- whether indexing carried into a different 256-byte page.

The page-cross flag is returned rather than recorded anywhere, and the
dispatcher alone decides whether it costs a cycle (read-type operations
only). For relative branches the flag instead reports whether the target
sits on a different page than the branch opcode.

Wrap rules
==========
- Zero-page indexed modes wrap within page zero.
- `($nn,X)` and `($nn),Y` fetch their pointer from page zero, the high
  byte wrapping to $00 when the pointer sits at $FF.
- `JMP ($xxFF)` takes its high byte from $xx00 (same page), the classic
  NMOS quirk.
*/

use crate::bus::Bus;
use crate::cpu::regs::CpuRegs;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirectX,
    IndirectIndexedY,
    Relative,
}

impl AddressingMode {
    /// Instruction length in bytes, opcode included.
    pub const fn length(self) -> u16 {
        use AddressingMode::*;
        match self {
            Implied | Accumulator => 1,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY | IndexedIndirectX
            | IndirectIndexedY | Relative => 2,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    None,
    Accumulator,
    Immediate(u8),
    Address(u16),
}

impl Operand {
    /// Effective address of a memory operand.
    #[inline]
    pub fn address(self) -> u16 {
        match self {
            Operand::Address(addr) => addr,
            other => unreachable!("{other:?} has no effective address"),
        }
    }

    /// Value an operation reads: the immediate byte or the byte at the
    /// effective address.
    #[inline]
    pub fn value(self, bus: &Bus) -> u8 {
        match self {
            Operand::Immediate(v) => v,
            Operand::Address(addr) => bus.read(addr),
            other => unreachable!("{other:?} has no value"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub operand: Operand,
    pub page_crossed: bool,
}

impl Resolved {
    #[inline]
    fn plain(operand: Operand) -> Self {
        Self {
            operand,
            page_crossed: false,
        }
    }

    #[inline]
    fn indexed((addr, page_crossed): (u16, bool)) -> Self {
        Self {
            operand: Operand::Address(addr),
            page_crossed,
        }
    }
}

/// Consume the operand bytes for `mode`; PC must point just past the opcode.
pub(crate) fn resolve<C: CpuRegs>(mode: AddressingMode, cpu: &mut C, bus: &Bus) -> Resolved {
    use AddressingMode::*;
    match mode {
        Implied => Resolved::plain(Operand::None),
        Accumulator => Resolved::plain(Operand::Accumulator),
        Immediate => Resolved::plain(Operand::Immediate(fetch_byte(cpu, bus))),
        ZeroPage => Resolved::plain(Operand::Address(addr_zp(cpu, bus))),
        ZeroPageX => Resolved::plain(Operand::Address(addr_zp_x(cpu, bus))),
        ZeroPageY => Resolved::plain(Operand::Address(addr_zp_y(cpu, bus))),
        Absolute => Resolved::plain(Operand::Address(addr_abs(cpu, bus))),
        AbsoluteX => Resolved::indexed(addr_abs_x_pc(cpu, bus)),
        AbsoluteY => Resolved::indexed(addr_abs_y_pc(cpu, bus)),
        Indirect => {
            let ptr = addr_abs(cpu, bus);
            Resolved::plain(Operand::Address(read_word_indirect_bug(bus, ptr)))
        }
        IndexedIndirectX => Resolved::plain(Operand::Address(addr_ind_x(cpu, bus))),
        IndirectIndexedY => Resolved::indexed(addr_ind_y_pc(cpu, bus)),
        Relative => Resolved::indexed(branch_target(cpu, bus)),
    }
}

/// Fetch next byte from the instruction stream, incrementing PC.
#[inline]
pub(crate) fn fetch_byte<C: CpuRegs>(cpu: &mut C, bus: &Bus) -> u8 {
    let v = bus.read(cpu.pc());
    cpu.advance_pc_one();
    v
}

/// Fetch next little-endian word (low, then high), incrementing PC twice.
#[inline]
pub(crate) fn fetch_word<C: CpuRegs>(cpu: &mut C, bus: &Bus) -> u16 {
    let lo = fetch_byte(cpu, bus) as u16;
    let hi = fetch_byte(cpu, bus) as u16;
    (hi << 8) | lo
}

// -------------------------
// Basic addressing helpers
// -------------------------

#[inline]
fn addr_zp<C: CpuRegs>(cpu: &mut C, bus: &Bus) -> u16 {
    fetch_byte(cpu, bus) as u16
}

#[inline]
fn addr_zp_x<C: CpuRegs>(cpu: &mut C, bus: &Bus) -> u16 {
    fetch_byte(cpu, bus).wrapping_add(cpu.x()) as u16
}

#[inline]
fn addr_zp_y<C: CpuRegs>(cpu: &mut C, bus: &Bus) -> u16 {
    fetch_byte(cpu, bus).wrapping_add(cpu.y()) as u16
}

#[inline]
fn addr_abs<C: CpuRegs>(cpu: &mut C, bus: &Bus) -> u16 {
    fetch_word(cpu, bus)
}

#[inline]
fn addr_ind_x<C: CpuRegs>(cpu: &mut C, bus: &Bus) -> u16 {
    let zp = fetch_byte(cpu, bus).wrapping_add(cpu.x());
    read_word_zp(bus, zp)
}

// ------------------------------------------------------
// Addressing with page-cross detection (for penalties)
// ------------------------------------------------------

#[inline]
fn crossed(base: u16, addr: u16) -> bool {
    (base & 0xFF00) != (addr & 0xFF00)
}

#[inline]
fn addr_abs_x_pc<C: CpuRegs>(cpu: &mut C, bus: &Bus) -> (u16, bool) {
    let base = fetch_word(cpu, bus);
    let addr = base.wrapping_add(cpu.x() as u16);
    (addr, crossed(base, addr))
}

#[inline]
fn addr_abs_y_pc<C: CpuRegs>(cpu: &mut C, bus: &Bus) -> (u16, bool) {
    let base = fetch_word(cpu, bus);
    let addr = base.wrapping_add(cpu.y() as u16);
    (addr, crossed(base, addr))
}

#[inline]
fn addr_ind_y_pc<C: CpuRegs>(cpu: &mut C, bus: &Bus) -> (u16, bool) {
    let zp = fetch_byte(cpu, bus);
    let base = read_word_zp(bus, zp);
    let addr = base.wrapping_add(cpu.y() as u16);
    (addr, crossed(base, addr))
}

/// Signed displacement from the byte after the branch. The page test is
/// made against the branch opcode's own address.
#[inline]
fn branch_target<C: CpuRegs>(cpu: &mut C, bus: &Bus) -> (u16, bool) {
    let opcode_addr = cpu.pc().wrapping_sub(1);
    let offset = fetch_byte(cpu, bus) as i8;
    let target = cpu.pc().wrapping_add(offset as i16 as u16);
    (target, crossed(opcode_addr, target))
}

// -------------------------
// Low-level word helpers
// -------------------------

/// Pointer from zero page, high byte wrapping within page zero.
#[inline]
pub(crate) fn read_word_zp(bus: &Bus, base: u8) -> u16 {
    let lo = bus.read(base as u16) as u16;
    let hi = bus.read(base.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}

/// JMP (indirect) vector fetch: when the pointer's low byte is $FF the
/// high byte comes from the start of the same page.
#[inline]
pub(crate) fn read_word_indirect_bug(bus: &Bus, addr: u16) -> u16 {
    let lo = bus.read(addr) as u16;
    let hi_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
    let hi = bus.read(hi_addr) as u16;
    (hi << 8) | lo
}
