/*!
execute.rs - 6502 instruction semantics (ALU, flags, stack, RMW)

Purpose
=======
Side-effect logic for every instruction lives here so the dispatch
families stay thin: they pick the operand, call a helper, done. All helpers
are generic over [`CpuRegs`] and take `&mut Bus` only when they touch
memory.

Scope
-----
Stack:
    push, pop, push_word, pop_word, push_status_with_break,
    php, plp, pha, pla
Loads / transfers:
    lda/ldx/ldy, tax/tay/txa/tya/tsx/txs
Logical:
    and/ora/eor/bit
Increment / decrement:
    inx/iny/dex/dey, inc_mem/dec_mem
Shifts / rotates:
    accumulator and memory forms (memory forms via `rmw_memory`)
Arithmetic:
    adc/sbc (binary and decimal), cmp_generic

Decimal mode
============
ADC and SBC honour the D flag with nibble-wise BCD correction. Carry
reflects the decimal carry (ADC) or the absence of a borrow (SBC).
Zero, Negative and Overflow are taken from the *binary* result, the
behaviour of the NMOS part.
*/

use crate::bus::Bus;
use crate::cpu::regs::CpuRegs;
use crate::cpu::state::{BREAK, CARRY, DECIMAL, NEGATIVE, OVERFLOW, STACK_BASE, UNUSED, ZERO};

// ---------------------------------------------------------------------------
// Stack helpers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn push<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, v: u8) {
    let sp = cpu.sp();
    bus.write(STACK_BASE | sp as u16, v);
    cpu.set_sp(sp.wrapping_sub(1));
}

#[inline]
pub(crate) fn pop<C: CpuRegs>(cpu: &mut C, bus: &Bus) -> u8 {
    let sp = cpu.sp().wrapping_add(1);
    cpu.set_sp(sp);
    bus.read(STACK_BASE | sp as u16)
}

/// High byte first, so the low byte ends up at the lower address.
#[inline]
pub(crate) fn push_word<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, v: u16) {
    push(cpu, bus, (v >> 8) as u8);
    push(cpu, bus, (v & 0xFF) as u8);
}

#[inline]
pub(crate) fn pop_word<C: CpuRegs>(cpu: &mut C, bus: &Bus) -> u16 {
    let lo = pop(cpu, bus) as u16;
    let hi = pop(cpu, bus) as u16;
    (hi << 8) | lo
}

/// Push P; BREAK is set for BRK/PHP and clear for hardware interrupts.
pub(crate) fn push_status_with_break<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, set_break: bool) {
    let v = cpu.compose_status_for_push(set_break);
    push(cpu, bus, v);
}

#[inline]
pub(crate) fn php<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    push_status_with_break(cpu, bus, true);
}

/// BREAK has no storage in P, so it is dropped on the way back in.
#[inline]
pub(crate) fn plp<C: CpuRegs>(cpu: &mut C, bus: &Bus) {
    let v = pop(cpu, bus);
    cpu.set_status((v | UNUSED) & !BREAK);
}

#[inline]
pub(crate) fn pha<C: CpuRegs>(cpu: &mut C, bus: &mut Bus) {
    let a = cpu.a();
    push(cpu, bus, a);
}

#[inline]
pub(crate) fn pla<C: CpuRegs>(cpu: &mut C, bus: &Bus) {
    let val = pop(cpu, bus);
    cpu.set_a(val);
    cpu.update_zn(val);
}

// ---------------------------------------------------------------------------
// Loads / Transfers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn lda<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.set_a(v);
    cpu.update_zn(v);
}

#[inline]
pub(crate) fn ldx<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.set_x(v);
    cpu.update_zn(v);
}

#[inline]
pub(crate) fn ldy<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.set_y(v);
    cpu.update_zn(v);
}

#[inline]
pub(crate) fn tax<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.a();
    ldx(cpu, v);
}

#[inline]
pub(crate) fn tay<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.a();
    ldy(cpu, v);
}

#[inline]
pub(crate) fn txa<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.x();
    lda(cpu, v);
}

#[inline]
pub(crate) fn tya<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.y();
    lda(cpu, v);
}

#[inline]
pub(crate) fn tsx<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.sp();
    ldx(cpu, v);
}

/// The only transfer that leaves the flags alone.
#[inline]
pub(crate) fn txs<C: CpuRegs>(cpu: &mut C) {
    cpu.set_sp(cpu.x());
}

// ---------------------------------------------------------------------------
// Logical / Bit
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn and<C: CpuRegs>(cpu: &mut C, v: u8) {
    let r = cpu.a() & v;
    lda(cpu, r);
}

#[inline]
pub(crate) fn ora<C: CpuRegs>(cpu: &mut C, v: u8) {
    let r = cpu.a() | v;
    lda(cpu, r);
}

#[inline]
pub(crate) fn eor<C: CpuRegs>(cpu: &mut C, v: u8) {
    let r = cpu.a() ^ v;
    lda(cpu, r);
}

#[inline]
pub(crate) fn bit<C: CpuRegs>(cpu: &mut C, v: u8) {
    cpu.assign_flag(ZERO, (cpu.a() & v) == 0);
    cpu.assign_flag(NEGATIVE, (v & 0x80) != 0);
    cpu.assign_flag(OVERFLOW, (v & 0x40) != 0);
}

// ---------------------------------------------------------------------------
// Increment / Decrement (register)
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn inx<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.x().wrapping_add(1);
    ldx(cpu, v);
}

#[inline]
pub(crate) fn iny<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.y().wrapping_add(1);
    ldy(cpu, v);
}

#[inline]
pub(crate) fn dex<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.x().wrapping_sub(1);
    ldx(cpu, v);
}

#[inline]
pub(crate) fn dey<C: CpuRegs>(cpu: &mut C) {
    let v = cpu.y().wrapping_sub(1);
    ldy(cpu, v);
}

// ---------------------------------------------------------------------------
// Shifts / Rotates (pure value transforms, shared by both forms)
// ---------------------------------------------------------------------------

#[inline]
fn shift_left<C: CpuRegs>(cpu: &mut C, v: u8, carry_in: u8) -> u8 {
    cpu.update_carry((v & 0x80) != 0);
    let r = (v << 1) | carry_in;
    cpu.update_zn(r);
    r
}

#[inline]
fn shift_right<C: CpuRegs>(cpu: &mut C, v: u8, carry_in: u8) -> u8 {
    cpu.update_carry((v & 0x01) != 0);
    let r = (v >> 1) | carry_in;
    cpu.update_zn(r);
    r
}

#[inline]
fn carry_bit<C: CpuRegs>(cpu: &C) -> u8 {
    cpu.is_flag_set(CARRY) as u8
}

#[inline]
pub(crate) fn asl<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    shift_left(cpu, v, 0)
}

#[inline]
pub(crate) fn lsr<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    shift_right(cpu, v, 0)
}

#[inline]
pub(crate) fn rol<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let c = carry_bit(cpu);
    shift_left(cpu, v, c)
}

#[inline]
pub(crate) fn ror<C: CpuRegs>(cpu: &mut C, v: u8) -> u8 {
    let c = carry_bit(cpu) << 7;
    shift_right(cpu, v, c)
}

/// Apply a shift to A in place.
#[inline]
pub(crate) fn on_accumulator<C: CpuRegs>(cpu: &mut C, f: fn(&mut C, u8) -> u8) {
    let a = cpu.a();
    let r = f(cpu, a);
    cpu.set_a(r);
}

// ---------------------------------------------------------------------------
// Read-Modify-Write (memory)
// ---------------------------------------------------------------------------

/// Read the byte at `addr`, transform it, write it back once. Returns the
/// value written.
pub(crate) fn rmw_memory<C: CpuRegs, F>(cpu: &mut C, bus: &mut Bus, addr: u16, transform: F) -> u8
where
    F: FnOnce(&mut C, u8) -> u8,
{
    let old = bus.read(addr);
    let newv = transform(cpu, old);
    bus.write(addr, newv);
    newv
}

#[inline]
pub(crate) fn inc_mem<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, addr: u16) {
    let r = rmw_memory(cpu, bus, addr, |_, old| old.wrapping_add(1));
    cpu.update_zn(r);
}

#[inline]
pub(crate) fn dec_mem<C: CpuRegs>(cpu: &mut C, bus: &mut Bus, addr: u16) {
    let r = rmw_memory(cpu, bus, addr, |_, old| old.wrapping_sub(1));
    cpu.update_zn(r);
}

// ---------------------------------------------------------------------------
// ADC / SBC
// ---------------------------------------------------------------------------

pub(crate) fn adc<C: CpuRegs>(cpu: &mut C, v: u8) {
    let a = cpu.a();
    let carry_in = carry_bit(cpu) as u16;
    let raw = a as u16 + v as u16 + carry_in;
    let binary = raw as u8;

    // ( !(A ^ M) & (A ^ R) & 0x80 ) != 0
    cpu.update_overflow((!(a ^ v) & (a ^ binary) & 0x80) != 0);
    cpu.update_zn(binary);

    if cpu.is_flag_set(DECIMAL) {
        let mut lo = (a & 0x0F) as u16 + (v & 0x0F) as u16 + carry_in;
        if lo > 9 {
            lo += 6;
        }
        let mut hi = (a >> 4) as u16 + (v >> 4) as u16 + (lo > 0x0F) as u16;
        if hi > 9 {
            hi += 6;
        }
        cpu.update_carry(hi > 0x0F);
        cpu.set_a((((hi & 0x0F) << 4) | (lo & 0x0F)) as u8);
    } else {
        cpu.update_carry(raw > 0xFF);
        cpu.set_a(binary);
    }
}

pub(crate) fn sbc<C: CpuRegs>(cpu: &mut C, v: u8) {
    let a = cpu.a();
    let borrow = 1 - carry_bit(cpu) as i16;
    let raw = a as i16 - v as i16 - borrow;
    let binary = raw as u8;

    // Sign transitions of (A, M, result). Equal operand signs never overflow.
    let overflow = match (a & 0x80 != 0, v & 0x80 != 0, binary & 0x80 != 0) {
        (false, true, true) | (true, false, false) => true,
        (false, true, false) | (true, false, true) => false,
        _ => false,
    };
    cpu.update_overflow(overflow);
    cpu.update_zn(binary);
    cpu.update_carry(raw >= 0);

    if cpu.is_flag_set(DECIMAL) {
        let mut lo = (a & 0x0F) as i16 - (v & 0x0F) as i16 - borrow;
        let mut hi = (a >> 4) as i16 - (v >> 4) as i16;
        if lo < 0 {
            lo += 10;
            hi -= 1;
        }
        if hi < 0 {
            hi += 10;
        }
        cpu.set_a((((hi as u8) & 0x0F) << 4) | ((lo as u8) & 0x0F));
    } else {
        cpu.set_a(binary);
    }
}

// ---------------------------------------------------------------------------
// Compare
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn cmp_generic<C: CpuRegs>(cpu: &mut C, reg: u8, v: u8) {
    cpu.update_carry(reg >= v);
    cpu.update_zn(reg.wrapping_sub(v));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::state::CpuState;
    use crate::test_utils::bus_with_program;
    use proptest::prelude::*;

    fn setup() -> (CpuState, Bus) {
        let bus = bus_with_program(0x1000, &[0xEA]);
        let mut cpu = CpuState::new();
        cpu.reset(&bus);
        (cpu, bus)
    }

    fn bcd(n: u8) -> u8 {
        ((n / 10) << 4) | (n % 10)
    }

    #[test]
    fn adc_overflow_and_carry() {
        let (mut cpu, _bus) = setup();
        cpu.set_a(0x50);
        adc(&mut cpu, 0x50);
        assert_eq!(cpu.a(), 0xA0);
        assert!(cpu.is_flag_set(OVERFLOW));
        assert!(!cpu.is_flag_set(CARRY));
        assert!(cpu.is_flag_set(NEGATIVE));

        cpu.set_a(0xF0);
        adc(&mut cpu, 0x20);
        assert_eq!(cpu.a(), 0x10);
        assert!(cpu.is_flag_set(CARRY));
        assert!(!cpu.is_flag_set(OVERFLOW));
    }

    #[test]
    fn adc_decimal_carry_out() {
        let (mut cpu, _bus) = setup();
        cpu.assign_flag(DECIMAL, true);
        cpu.set_a(0x58);
        adc(&mut cpu, 0x46);
        assert_eq!(cpu.a(), 0x04);
        assert!(cpu.is_flag_set(CARRY));

        cpu.assign_flag(CARRY, false);
        cpu.set_a(0x99);
        adc(&mut cpu, 0x01);
        assert_eq!(cpu.a(), 0x00);
        assert!(cpu.is_flag_set(CARRY));
        // Zero comes from the binary sum 0x9A.
        assert!(!cpu.is_flag_set(ZERO));
    }

    #[test]
    fn sbc_basic_and_borrow() {
        let (mut cpu, _bus) = setup();
        cpu.set_a(0x10);
        cpu.assign_flag(CARRY, true);
        sbc(&mut cpu, 0x01);
        assert_eq!(cpu.a(), 0x0F);
        assert!(cpu.is_flag_set(CARRY));

        cpu.set_a(0x00);
        cpu.assign_flag(CARRY, true);
        sbc(&mut cpu, 0x01);
        assert_eq!(cpu.a(), 0xFF);
        assert!(!cpu.is_flag_set(CARRY));
        assert!(cpu.is_flag_set(NEGATIVE));
    }

    #[test]
    fn sbc_overflow_cases() {
        let (mut cpu, _bus) = setup();
        // 0x50 - 0xB0 = 0xA0: positive minus negative gives negative.
        cpu.set_a(0x50);
        cpu.assign_flag(CARRY, true);
        sbc(&mut cpu, 0xB0);
        assert!(cpu.is_flag_set(OVERFLOW));

        // 0xD0 - 0x70 = 0x60: negative minus positive gives positive.
        cpu.set_a(0xD0);
        cpu.assign_flag(CARRY, true);
        sbc(&mut cpu, 0x70);
        assert!(cpu.is_flag_set(OVERFLOW));

        cpu.set_a(0x50);
        cpu.assign_flag(CARRY, true);
        sbc(&mut cpu, 0x10);
        assert!(!cpu.is_flag_set(OVERFLOW));
    }

    #[test]
    fn sbc_decimal_wraps_below_zero() {
        let (mut cpu, _bus) = setup();
        cpu.assign_flag(DECIMAL, true);
        cpu.assign_flag(CARRY, true);
        cpu.set_a(0x00);
        sbc(&mut cpu, 0x01);
        assert_eq!(cpu.a(), 0x99);
        assert!(!cpu.is_flag_set(CARRY));
    }

    #[test]
    fn shifts_move_carry() {
        let (mut cpu, _bus) = setup();
        cpu.set_a(0x81);
        on_accumulator(&mut cpu, lsr);
        assert_eq!(cpu.a(), 0x40);
        assert!(cpu.is_flag_set(CARRY));
        assert!(!cpu.is_flag_set(NEGATIVE));

        on_accumulator(&mut cpu, ror);
        assert_eq!(cpu.a(), 0xA0);
        assert!(!cpu.is_flag_set(CARRY));

        on_accumulator(&mut cpu, asl);
        assert_eq!(cpu.a(), 0x40);
        assert!(cpu.is_flag_set(CARRY));

        on_accumulator(&mut cpu, rol);
        assert_eq!(cpu.a(), 0x81);
        assert!(!cpu.is_flag_set(CARRY));
    }

    #[test]
    fn inc_dec_memory() {
        let (mut cpu, mut bus) = setup();
        bus.write(0x0200, 0xFF);
        inc_mem(&mut cpu, &mut bus, 0x0200);
        assert_eq!(bus.read(0x0200), 0x00);
        assert!(cpu.is_flag_set(ZERO));
        dec_mem(&mut cpu, &mut bus, 0x0200);
        assert_eq!(bus.read(0x0200), 0xFF);
        assert!(cpu.is_flag_set(NEGATIVE));
    }

    #[test]
    fn bit_sets_nv_from_operand() {
        let (mut cpu, _bus) = setup();
        cpu.set_a(0x01);
        bit(&mut cpu, 0xC0);
        assert!(cpu.is_flag_set(ZERO));
        assert!(cpu.is_flag_set(NEGATIVE));
        assert!(cpu.is_flag_set(OVERFLOW));
    }

    #[test]
    fn php_plp_break_handling() {
        let (mut cpu, mut bus) = setup();
        cpu.assign_flag(CARRY, true);
        php(&mut cpu, &mut bus);
        assert_eq!(bus.read(0x01FF) & BREAK, BREAK);
        cpu.assign_flag(CARRY, false);
        plp(&mut cpu, &bus);
        assert!(cpu.is_flag_set(CARRY));
        assert!(!cpu.is_flag_set(BREAK));
        assert_eq!(cpu.sp(), 0xFF);
    }

    #[test]
    fn stack_wraps_in_page_one() {
        let (mut cpu, mut bus) = setup();
        cpu.set_sp(0x00);
        push(&mut cpu, &mut bus, 0x42);
        assert_eq!(bus.read(0x0100), 0x42);
        assert_eq!(cpu.sp(), 0xFF);
        assert_eq!(pop(&mut cpu, &bus), 0x42);
        assert_eq!(cpu.sp(), 0x00);
    }

    proptest! {
        #[test]
        fn decimal_add_matches_bcd(x in 0u8..100, y in 0u8..100, c in any::<bool>()) {
            let (mut cpu, _bus) = setup();
            cpu.assign_flag(DECIMAL, true);
            cpu.assign_flag(CARRY, c);
            cpu.set_a(bcd(x));
            adc(&mut cpu, bcd(y));
            let sum = x as u16 + y as u16 + c as u16;
            prop_assert_eq!(cpu.a(), bcd((sum % 100) as u8));
            prop_assert_eq!(cpu.is_flag_set(CARRY), sum >= 100);
        }

        #[test]
        fn decimal_sub_matches_bcd(x in 0u8..100, y in 0u8..100, c in any::<bool>()) {
            let (mut cpu, _bus) = setup();
            cpu.assign_flag(DECIMAL, true);
            cpu.assign_flag(CARRY, c);
            cpu.set_a(bcd(x));
            sbc(&mut cpu, bcd(y));
            let diff = x as i16 - y as i16 - (!c) as i16;
            prop_assert_eq!(cpu.a(), bcd(diff.rem_euclid(100) as u8));
            prop_assert_eq!(cpu.is_flag_set(CARRY), diff >= 0);
        }

        #[test]
        fn binary_add_matches_integer_sum(a in any::<u8>(), v in any::<u8>(), c in any::<bool>()) {
            let (mut cpu, _bus) = setup();
            cpu.assign_flag(CARRY, c);
            cpu.set_a(a);
            adc(&mut cpu, v);
            let sum = a as u16 + v as u16 + c as u16;
            prop_assert_eq!(cpu.a(), sum as u8);
            prop_assert_eq!(cpu.is_flag_set(CARRY), sum > 0xFF);
            let signed = a as i8 as i16 + v as i8 as i16 + c as i16;
            prop_assert_eq!(cpu.is_flag_set(OVERFLOW), !(-128..=127).contains(&signed));
        }

        #[test]
        fn binary_sub_matches_integer_difference(a in any::<u8>(), v in any::<u8>(), c in any::<bool>()) {
            let (mut cpu, _bus) = setup();
            cpu.assign_flag(CARRY, c);
            cpu.set_a(a);
            sbc(&mut cpu, v);
            let diff = a as i16 - v as i16 - (!c) as i16;
            prop_assert_eq!(cpu.a(), diff as u8);
            prop_assert_eq!(cpu.is_flag_set(CARRY), diff >= 0);
            let signed = a as i8 as i16 - v as i8 as i16 - (!c) as i16;
            prop_assert_eq!(cpu.is_flag_set(OVERFLOW), !(-128..=127).contains(&signed));
        }

        #[test]
        fn compare_with_itself(r in any::<u8>()) {
            let (mut cpu, _bus) = setup();
            cmp_generic(&mut cpu, r, r);
            prop_assert!(cpu.is_flag_set(ZERO));
            prop_assert!(cpu.is_flag_set(CARRY));
            prop_assert!(!cpu.is_flag_set(NEGATIVE));
        }

        #[test]
        fn stack_round_trip(bytes in proptest::collection::vec(any::<u8>(), 1..64), word in any::<u16>()) {
            let (mut cpu, mut bus) = setup();
            let start = cpu.sp();
            push_word(&mut cpu, &mut bus, word);
            for &b in &bytes {
                push(&mut cpu, &mut bus, b);
            }
            for &b in bytes.iter().rev() {
                prop_assert_eq!(pop(&mut cpu, &bus), b);
            }
            prop_assert_eq!(pop_word(&mut cpu, &bus), word);
            prop_assert_eq!(cpu.sp(), start);
        }
    }
}
