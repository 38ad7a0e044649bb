/*!
table.rs - Opcode table: byte -> (operation, addressing mode, base cycles).

Purpose
=======
One static 256-entry table replaces per-opcode handlers. The dispatcher
looks the fetched byte up here, resolves the operand for the entry's mode,
and hands the [`Operation`] tag to the family handler that implements it.

Design
------
- The table is built by a `const fn`, so it is fixed at compile time.
- The eight classic ALU groups (ORA, AND, EOR, ADC, STA, LDA, CMP, SBC)
  share one opcode layout and are filled by `alu_group`; the shift and
  INC/DEC groups likewise by `rmw_group`. Everything else is listed.
- Base cycles exclude the page-cross penalty and branch-taken extras;
  `Operation::pays_page_penalty` says which operations incur the former.
- Bytes outside the documented set execute as BRK, except the
  undocumented NOPs ($1A, $3A, $5A, $7A, $DA, $FA and the immediate
  forms $80, $82, $89, $C2, $E2) which behave as NOPs of the right length.
*/

use crate::cpu::addressing::AddressingMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
}

impl Operation {
    pub fn mnemonic(self) -> &'static str {
        use Operation::*;
        match self {
            Adc => "ADC",
            And => "AND",
            Asl => "ASL",
            Bcc => "BCC",
            Bcs => "BCS",
            Beq => "BEQ",
            Bit => "BIT",
            Bmi => "BMI",
            Bne => "BNE",
            Bpl => "BPL",
            Brk => "BRK",
            Bvc => "BVC",
            Bvs => "BVS",
            Clc => "CLC",
            Cld => "CLD",
            Cli => "CLI",
            Clv => "CLV",
            Cmp => "CMP",
            Cpx => "CPX",
            Cpy => "CPY",
            Dec => "DEC",
            Dex => "DEX",
            Dey => "DEY",
            Eor => "EOR",
            Inc => "INC",
            Inx => "INX",
            Iny => "INY",
            Jmp => "JMP",
            Jsr => "JSR",
            Lda => "LDA",
            Ldx => "LDX",
            Ldy => "LDY",
            Lsr => "LSR",
            Nop => "NOP",
            Ora => "ORA",
            Pha => "PHA",
            Php => "PHP",
            Pla => "PLA",
            Plp => "PLP",
            Rol => "ROL",
            Ror => "ROR",
            Rti => "RTI",
            Rts => "RTS",
            Sbc => "SBC",
            Sec => "SEC",
            Sed => "SED",
            Sei => "SEI",
            Sta => "STA",
            Stx => "STX",
            Sty => "STY",
            Tax => "TAX",
            Tay => "TAY",
            Tsx => "TSX",
            Txa => "TXA",
            Txs => "TXS",
            Tya => "TYA",
        }
    }

    /// Read-type operations take one extra cycle when indexing crosses a
    /// page. Stores and read-modify-write already budget for it.
    pub fn pays_page_penalty(self) -> bool {
        use Operation::*;
        matches!(
            self,
            Adc | And | Bit | Cmp | Eor | Lda | Ldx | Ldy | Ora | Sbc | Nop
        )
    }

    pub fn is_branch(self) -> bool {
        use Operation::*;
        matches!(self, Bcc | Bcs | Beq | Bmi | Bne | Bpl | Bvc | Bvs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opcode {
    pub operation: Operation,
    pub mode: AddressingMode,
    pub cycles: u8,
    pub documented: bool,
}

impl Opcode {
    const fn new(operation: Operation, mode: AddressingMode, cycles: u8) -> Self {
        Self {
            operation,
            mode,
            cycles,
            documented: true,
        }
    }

    const fn undocumented(operation: Operation, mode: AddressingMode, cycles: u8) -> Self {
        Self {
            operation,
            mode,
            cycles,
            documented: false,
        }
    }

    /// Bytes the instruction occupies.
    pub const fn length(&self) -> u16 {
        self.mode.length()
    }
}

/// Look up the table entry for an opcode byte.
#[inline]
pub fn lookup(byte: u8) -> &'static Opcode {
    &OPCODES[byte as usize]
}

pub static OPCODES: [Opcode; 256] = build();

const fn alu_group(t: &mut [Opcode; 256], base: usize, op: Operation) {
    use AddressingMode::*;
    t[base + 0x09] = Opcode::new(op, Immediate, 2);
    t[base + 0x05] = Opcode::new(op, ZeroPage, 3);
    t[base + 0x15] = Opcode::new(op, ZeroPageX, 4);
    t[base + 0x0D] = Opcode::new(op, Absolute, 4);
    t[base + 0x1D] = Opcode::new(op, AbsoluteX, 4);
    t[base + 0x19] = Opcode::new(op, AbsoluteY, 4);
    t[base + 0x01] = Opcode::new(op, IndexedIndirectX, 6);
    t[base + 0x11] = Opcode::new(op, IndirectIndexedY, 5);
}

const fn rmw_group(t: &mut [Opcode; 256], base: usize, op: Operation) {
    use AddressingMode::*;
    t[base + 0x06] = Opcode::new(op, ZeroPage, 5);
    t[base + 0x16] = Opcode::new(op, ZeroPageX, 6);
    t[base + 0x0E] = Opcode::new(op, Absolute, 6);
    t[base + 0x1E] = Opcode::new(op, AbsoluteX, 7);
}

const fn build() -> [Opcode; 256] {
    use AddressingMode::*;
    use Operation::*;

    let mut t = [Opcode::undocumented(Brk, Implied, 7); 256];

    alu_group(&mut t, 0x00, Ora);
    alu_group(&mut t, 0x20, And);
    alu_group(&mut t, 0x40, Eor);
    alu_group(&mut t, 0x60, Adc);
    alu_group(&mut t, 0xA0, Lda);
    alu_group(&mut t, 0xC0, Cmp);
    alu_group(&mut t, 0xE0, Sbc);

    // STA has no immediate form and fixed indexed timing.
    t[0x85] = Opcode::new(Sta, ZeroPage, 3);
    t[0x95] = Opcode::new(Sta, ZeroPageX, 4);
    t[0x8D] = Opcode::new(Sta, Absolute, 4);
    t[0x9D] = Opcode::new(Sta, AbsoluteX, 5);
    t[0x99] = Opcode::new(Sta, AbsoluteY, 5);
    t[0x81] = Opcode::new(Sta, IndexedIndirectX, 6);
    t[0x91] = Opcode::new(Sta, IndirectIndexedY, 6);

    rmw_group(&mut t, 0x00, Asl);
    rmw_group(&mut t, 0x20, Rol);
    rmw_group(&mut t, 0x40, Lsr);
    rmw_group(&mut t, 0x60, Ror);
    rmw_group(&mut t, 0xC0, Dec);
    rmw_group(&mut t, 0xE0, Inc);
    t[0x0A] = Opcode::new(Asl, Accumulator, 2);
    t[0x2A] = Opcode::new(Rol, Accumulator, 2);
    t[0x4A] = Opcode::new(Lsr, Accumulator, 2);
    t[0x6A] = Opcode::new(Ror, Accumulator, 2);

    t[0xA2] = Opcode::new(Ldx, Immediate, 2);
    t[0xA6] = Opcode::new(Ldx, ZeroPage, 3);
    t[0xB6] = Opcode::new(Ldx, ZeroPageY, 4);
    t[0xAE] = Opcode::new(Ldx, Absolute, 4);
    t[0xBE] = Opcode::new(Ldx, AbsoluteY, 4);

    t[0xA0] = Opcode::new(Ldy, Immediate, 2);
    t[0xA4] = Opcode::new(Ldy, ZeroPage, 3);
    t[0xB4] = Opcode::new(Ldy, ZeroPageX, 4);
    t[0xAC] = Opcode::new(Ldy, Absolute, 4);
    t[0xBC] = Opcode::new(Ldy, AbsoluteX, 4);

    t[0x86] = Opcode::new(Stx, ZeroPage, 3);
    t[0x96] = Opcode::new(Stx, ZeroPageY, 4);
    t[0x8E] = Opcode::new(Stx, Absolute, 4);
    t[0x84] = Opcode::new(Sty, ZeroPage, 3);
    t[0x94] = Opcode::new(Sty, ZeroPageX, 4);
    t[0x8C] = Opcode::new(Sty, Absolute, 4);

    t[0xE0] = Opcode::new(Cpx, Immediate, 2);
    t[0xE4] = Opcode::new(Cpx, ZeroPage, 3);
    t[0xEC] = Opcode::new(Cpx, Absolute, 4);
    t[0xC0] = Opcode::new(Cpy, Immediate, 2);
    t[0xC4] = Opcode::new(Cpy, ZeroPage, 3);
    t[0xCC] = Opcode::new(Cpy, Absolute, 4);

    t[0x24] = Opcode::new(Bit, ZeroPage, 3);
    t[0x2C] = Opcode::new(Bit, Absolute, 4);

    t[0x10] = Opcode::new(Bpl, Relative, 2);
    t[0x30] = Opcode::new(Bmi, Relative, 2);
    t[0x50] = Opcode::new(Bvc, Relative, 2);
    t[0x70] = Opcode::new(Bvs, Relative, 2);
    t[0x90] = Opcode::new(Bcc, Relative, 2);
    t[0xB0] = Opcode::new(Bcs, Relative, 2);
    t[0xD0] = Opcode::new(Bne, Relative, 2);
    t[0xF0] = Opcode::new(Beq, Relative, 2);

    t[0x00] = Opcode::new(Brk, Implied, 7);
    t[0x20] = Opcode::new(Jsr, Absolute, 6);
    t[0x4C] = Opcode::new(Jmp, Absolute, 3);
    t[0x6C] = Opcode::new(Jmp, Indirect, 5);
    t[0x40] = Opcode::new(Rti, Implied, 6);
    t[0x60] = Opcode::new(Rts, Implied, 6);

    t[0x48] = Opcode::new(Pha, Implied, 3);
    t[0x08] = Opcode::new(Php, Implied, 3);
    t[0x68] = Opcode::new(Pla, Implied, 4);
    t[0x28] = Opcode::new(Plp, Implied, 4);

    t[0x18] = Opcode::new(Clc, Implied, 2);
    t[0x38] = Opcode::new(Sec, Implied, 2);
    t[0x58] = Opcode::new(Cli, Implied, 2);
    t[0x78] = Opcode::new(Sei, Implied, 2);
    t[0xB8] = Opcode::new(Clv, Implied, 2);
    t[0xD8] = Opcode::new(Cld, Implied, 2);
    t[0xF8] = Opcode::new(Sed, Implied, 2);

    t[0xAA] = Opcode::new(Tax, Implied, 2);
    t[0xA8] = Opcode::new(Tay, Implied, 2);
    t[0xBA] = Opcode::new(Tsx, Implied, 2);
    t[0x8A] = Opcode::new(Txa, Implied, 2);
    t[0x9A] = Opcode::new(Txs, Implied, 2);
    t[0x98] = Opcode::new(Tya, Implied, 2);

    t[0xE8] = Opcode::new(Inx, Implied, 2);
    t[0xC8] = Opcode::new(Iny, Implied, 2);
    t[0xCA] = Opcode::new(Dex, Implied, 2);
    t[0x88] = Opcode::new(Dey, Implied, 2);

    t[0xEA] = Opcode::new(Nop, Implied, 2);

    let mut i = 0;
    let single = [0x1A, 0x3A, 0x5A, 0x7A, 0xDA, 0xFA];
    while i < single.len() {
        t[single[i]] = Opcode::undocumented(Nop, Implied, 2);
        i += 1;
    }
    let mut i = 0;
    let immediate = [0x80, 0x82, 0x89, 0xC2, 0xE2];
    while i < immediate.len() {
        t[immediate[i]] = Opcode::undocumented(Nop, Immediate, 2);
        i += 1;
    }

    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn documented_opcode_count() {
        let n = OPCODES.iter().filter(|o| o.documented).count();
        assert_eq!(n, 151);
    }

    #[test]
    fn spot_check_entries() {
        let lda = lookup(0xA9);
        assert_eq!(lda.operation, Operation::Lda);
        assert_eq!(lda.mode, AddressingMode::Immediate);
        assert_eq!(lda.cycles, 2);

        assert_eq!(lookup(0x16).operation, Operation::Asl);
        assert_eq!(lookup(0xF9).operation, Operation::Sbc);
        assert_eq!(lookup(0x9D).cycles, 5);
        assert_eq!(lookup(0x6C).mode, AddressingMode::Indirect);
        assert_eq!(lookup(0xBE).mode, AddressingMode::AbsoluteY);
    }

    #[test]
    fn undefined_bytes_are_brk() {
        for byte in [0x02u8, 0x03, 0x7F, 0xFF, 0x9C] {
            let op = lookup(byte);
            assert_eq!(op.operation, Operation::Brk);
            assert!(!op.documented);
            assert_eq!(op.length(), 1);
        }
    }

    #[test]
    fn undocumented_nops_have_right_length() {
        assert_eq!(lookup(0x1A).operation, Operation::Nop);
        assert_eq!(lookup(0x1A).length(), 1);
        assert_eq!(lookup(0x89).operation, Operation::Nop);
        assert_eq!(lookup(0x89).length(), 2);
    }

    #[test]
    fn every_operation_reachable() {
        let mut seen: HashMap<Operation, usize> = HashMap::new();
        for op in OPCODES.iter().filter(|o| o.documented) {
            *seen.entry(op.operation).or_default() += 1;
        }
        assert_eq!(seen.len(), 56);
        assert_eq!(seen[&Operation::Lda], 8);
        assert_eq!(seen[&Operation::Sta], 7);
    }

    #[test]
    fn penalty_only_for_reads() {
        assert!(Operation::Lda.pays_page_penalty());
        assert!(!Operation::Sta.pays_page_penalty());
        assert!(!Operation::Inc.pays_page_penalty());
        assert!(Operation::Bne.is_branch());
    }
}
