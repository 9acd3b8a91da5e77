//! The instruction cores. Each function receives the addressing mode's
//! already-resolved `Resolved` operand and the extra cycles it earns
//! (branches only - everything else reports 0 and lets `execute::step`
//! apply the table's page-crossing bonus uniformly).

use super::addressing::{Operand, Resolved};
use super::{Cpu, Flags};
use crate::nes::mem::Bus;

fn branch_if(cpu: &mut Cpu, resolved: &Resolved, condition: bool) -> u8 {
    if !condition {
        return 0;
    }
    let target = match resolved.operand {
        Operand::Memory(addr) => addr,
        _ => unreachable!("branches always resolve to Relative => Memory"),
    };
    cpu.regs.pc = target;
    if resolved.page_crossed {
        2
    } else {
        1
    }
}

// --- Loads / stores --------------------------------------------------

pub fn lda(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    cpu.regs.a = value;
    cpu.regs.change_zero_by_value(value);
    cpu.regs.change_negative_by_value(value);
    0
}

pub fn ldx(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    cpu.regs.x = value;
    cpu.regs.change_zero_by_value(value);
    cpu.regs.change_negative_by_value(value);
    0
}

pub fn ldy(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    cpu.regs.y = value;
    cpu.regs.change_zero_by_value(value);
    cpu.regs.change_negative_by_value(value);
    0
}

pub fn sta(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    cpu.write_operand(bus, resolved.operand, cpu.regs.a);
    0
}

pub fn stx(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    cpu.write_operand(bus, resolved.operand, cpu.regs.x);
    0
}

pub fn sty(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    cpu.write_operand(bus, resolved.operand, cpu.regs.y);
    0
}

// --- Register transfers ----------------------------------------------

pub fn tax(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.x = cpu.regs.a;
    cpu.regs.change_zero_by_value(cpu.regs.x);
    cpu.regs.change_negative_by_value(cpu.regs.x);
    0
}

pub fn tay(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.y = cpu.regs.a;
    cpu.regs.change_zero_by_value(cpu.regs.y);
    cpu.regs.change_negative_by_value(cpu.regs.y);
    0
}

pub fn txa(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.a = cpu.regs.x;
    cpu.regs.change_zero_by_value(cpu.regs.a);
    cpu.regs.change_negative_by_value(cpu.regs.a);
    0
}

pub fn tya(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.a = cpu.regs.y;
    cpu.regs.change_zero_by_value(cpu.regs.a);
    cpu.regs.change_negative_by_value(cpu.regs.a);
    0
}

pub fn tsx(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.x = cpu.regs.s;
    cpu.regs.change_zero_by_value(cpu.regs.x);
    cpu.regs.change_negative_by_value(cpu.regs.x);
    0
}

pub fn txs(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    // TXS is the one stack-pointer transfer that never touches N/Z - the
    // stack pointer isn't a data register.
    cpu.regs.s = cpu.regs.x;
    0
}

// --- Stack -------------------------------------------------------------

pub fn pha(cpu: &mut Cpu, bus: &mut Bus, _resolved: &Resolved) -> u8 {
    let a = cpu.regs.a;
    cpu.push(bus, a);
    0
}

pub fn pla(cpu: &mut Cpu, bus: &mut Bus, _resolved: &Resolved) -> u8 {
    let value = cpu.pull(bus);
    cpu.regs.a = value;
    cpu.regs.change_zero_by_value(value);
    cpu.regs.change_negative_by_value(value);
    0
}

pub fn php(cpu: &mut Cpu, bus: &mut Bus, _resolved: &Resolved) -> u8 {
    let status = cpu.regs.status_for_push();
    cpu.push(bus, status);
    0
}

pub fn plp(cpu: &mut Cpu, bus: &mut Bus, _resolved: &Resolved) -> u8 {
    let pulled = cpu.pull(bus);
    cpu.regs.restore_status(pulled);
    0
}

// --- Logical -------------------------------------------------------------

pub fn and(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    cpu.regs.a &= value;
    cpu.regs.change_zero_by_value(cpu.regs.a);
    cpu.regs.change_negative_by_value(cpu.regs.a);
    0
}

pub fn ora(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    cpu.regs.a |= value;
    cpu.regs.change_zero_by_value(cpu.regs.a);
    cpu.regs.change_negative_by_value(cpu.regs.a);
    0
}

pub fn eor(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    cpu.regs.a ^= value;
    cpu.regs.change_zero_by_value(cpu.regs.a);
    cpu.regs.change_negative_by_value(cpu.regs.a);
    0
}

pub fn bit(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    cpu.regs.bit_test(value);
    0
}

// --- Arithmetic ----------------------------------------------------------

pub fn adc(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    cpu.regs.a_add(value);
    0
}

pub fn sbc(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    cpu.regs.a_sub(value);
    0
}

pub fn cmp(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    let a = cpu.regs.a;
    cpu.regs.compare(a, value);
    0
}

pub fn cpx(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    let x = cpu.regs.x;
    cpu.regs.compare(x, value);
    0
}

pub fn cpy(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    let y = cpu.regs.y;
    cpu.regs.compare(y, value);
    0
}

// --- Increments / decrements ----------------------------------------------

pub fn inc(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand).wrapping_add(1);
    cpu.write_operand(bus, resolved.operand, value);
    cpu.regs.change_zero_by_value(value);
    cpu.regs.change_negative_by_value(value);
    0
}

pub fn dec(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand).wrapping_sub(1);
    cpu.write_operand(bus, resolved.operand, value);
    cpu.regs.change_zero_by_value(value);
    cpu.regs.change_negative_by_value(value);
    0
}

pub fn inx(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.x = cpu.regs.x.wrapping_add(1);
    cpu.regs.change_zero_by_value(cpu.regs.x);
    cpu.regs.change_negative_by_value(cpu.regs.x);
    0
}

pub fn iny(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.y = cpu.regs.y.wrapping_add(1);
    cpu.regs.change_zero_by_value(cpu.regs.y);
    cpu.regs.change_negative_by_value(cpu.regs.y);
    0
}

pub fn dex(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.x = cpu.regs.x.wrapping_sub(1);
    cpu.regs.change_zero_by_value(cpu.regs.x);
    cpu.regs.change_negative_by_value(cpu.regs.x);
    0
}

pub fn dey(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.y = cpu.regs.y.wrapping_sub(1);
    cpu.regs.change_zero_by_value(cpu.regs.y);
    cpu.regs.change_negative_by_value(cpu.regs.y);
    0
}

// --- Shifts / rotates ------------------------------------------------------

pub fn asl(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    let result = value << 1;
    cpu.write_operand(bus, resolved.operand, result);
    cpu.regs.set_flag(Flags::CARRY, (value & 0x80) != 0);
    cpu.regs.change_zero_by_value(result);
    cpu.regs.change_negative_by_value(result);
    0
}

pub fn lsr(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    let result = value >> 1;
    cpu.write_operand(bus, resolved.operand, result);
    cpu.regs.set_flag(Flags::CARRY, (value & 0x01) != 0);
    cpu.regs.change_zero_by_value(result);
    cpu.regs.change_negative_by_value(result);
    0
}

pub fn rol(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    let carry_in = cpu.regs.flag(Flags::CARRY) as u8;
    let result = (value << 1) | carry_in;
    cpu.write_operand(bus, resolved.operand, result);
    cpu.regs.set_flag(Flags::CARRY, (value & 0x80) != 0);
    cpu.regs.change_zero_by_value(result);
    cpu.regs.change_negative_by_value(result);
    0
}

pub fn ror(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let value = cpu.read_operand(bus, resolved.operand);
    let carry_in = cpu.regs.flag(Flags::CARRY) as u8;
    let result = (value >> 1) | (carry_in << 7);
    cpu.write_operand(bus, resolved.operand, result);
    cpu.regs.set_flag(Flags::CARRY, (value & 0x01) != 0);
    cpu.regs.change_zero_by_value(result);
    cpu.regs.change_negative_by_value(result);
    0
}

// --- Jumps / subroutines ---------------------------------------------------

pub fn jmp(cpu: &mut Cpu, _bus: &mut Bus, resolved: &Resolved) -> u8 {
    cpu.regs.pc = match resolved.operand {
        Operand::Memory(addr) => addr,
        _ => unreachable!("JMP always resolves to Memory"),
    };
    0
}

pub fn jsr(cpu: &mut Cpu, bus: &mut Bus, resolved: &Resolved) -> u8 {
    let target = match resolved.operand {
        Operand::Memory(addr) => addr,
        _ => unreachable!("JSR always resolves to Memory"),
    };
    // The addressing fetch already left PC one past the 3-byte instruction;
    // hardware pushes the address of the instruction's last byte, i.e. PC - 1.
    let return_addr = cpu.regs.pc.wrapping_sub(1);
    cpu.push_u16(bus, return_addr);
    cpu.regs.pc = target;
    0
}

pub fn rts(cpu: &mut Cpu, bus: &mut Bus, _resolved: &Resolved) -> u8 {
    let return_addr = cpu.pull_u16(bus);
    cpu.regs.pc = return_addr.wrapping_add(1);
    0
}

// --- Branches ----------------------------------------------------------

pub fn bcc(cpu: &mut Cpu, _bus: &mut Bus, resolved: &Resolved) -> u8 {
    branch_if(cpu, resolved, !cpu.regs.flag(Flags::CARRY))
}

pub fn bcs(cpu: &mut Cpu, _bus: &mut Bus, resolved: &Resolved) -> u8 {
    branch_if(cpu, resolved, cpu.regs.flag(Flags::CARRY))
}

pub fn beq(cpu: &mut Cpu, _bus: &mut Bus, resolved: &Resolved) -> u8 {
    branch_if(cpu, resolved, cpu.regs.flag(Flags::ZERO))
}

pub fn bne(cpu: &mut Cpu, _bus: &mut Bus, resolved: &Resolved) -> u8 {
    branch_if(cpu, resolved, !cpu.regs.flag(Flags::ZERO))
}

pub fn bmi(cpu: &mut Cpu, _bus: &mut Bus, resolved: &Resolved) -> u8 {
    branch_if(cpu, resolved, cpu.regs.flag(Flags::NEGATIVE))
}

pub fn bpl(cpu: &mut Cpu, _bus: &mut Bus, resolved: &Resolved) -> u8 {
    branch_if(cpu, resolved, !cpu.regs.flag(Flags::NEGATIVE))
}

pub fn bvc(cpu: &mut Cpu, _bus: &mut Bus, resolved: &Resolved) -> u8 {
    branch_if(cpu, resolved, !cpu.regs.flag(Flags::OVERFLOW))
}

pub fn bvs(cpu: &mut Cpu, _bus: &mut Bus, resolved: &Resolved) -> u8 {
    branch_if(cpu, resolved, cpu.regs.flag(Flags::OVERFLOW))
}

// --- Status flags --------------------------------------------------------

pub fn clc(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.flags_off(Flags::CARRY);
    0
}

pub fn sec(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.flags_on(Flags::CARRY);
    0
}

pub fn cli(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.flags_off(Flags::INT_DISABLE);
    0
}

pub fn sei(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.flags_on(Flags::INT_DISABLE);
    0
}

pub fn cld(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.flags_off(Flags::DECIMAL);
    0
}

pub fn sed(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.flags_on(Flags::DECIMAL);
    0
}

pub fn clv(cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    cpu.regs.flags_off(Flags::OVERFLOW);
    0
}

// --- System --------------------------------------------------------------

pub fn nop(_cpu: &mut Cpu, _bus: &mut Bus, _resolved: &Resolved) -> u8 {
    0
}

/// BRK: hardware-accurate, not the no-op some distillations assume (§4.1,
/// §9). Pushes PC+2 (one past the padding byte BRK always consumes) and
/// status with BREAK set, then jumps through the IRQ/BRK vector.
pub fn brk(cpu: &mut Cpu, bus: &mut Bus, _resolved: &Resolved) -> u8 {
    // `execute::step` has already advanced PC past the opcode byte; BRK
    // additionally consumes a padding byte before the return address.
    cpu.regs.pc = cpu.regs.pc.wrapping_add(1);
    cpu.interrupt(bus, super::IRQ_BRK_VECTOR, true);
    0
}

pub fn rti(cpu: &mut Cpu, bus: &mut Bus, _resolved: &Resolved) -> u8 {
    let status = cpu.pull(bus);
    cpu.regs.restore_status(status);
    cpu.regs.pc = cpu.pull_u16(bus);
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nes::cpu::addressing::AddrMode;
    use crate::nes::cpu::Cpu;
    use crate::nes::rom::{Cartridge, Mirroring};

    fn bus() -> Bus {
        Bus::new(&Cartridge::for_tests(
            vec![0u8; 0x4000],
            vec![0u8; 0x2000],
            Mirroring::Horizontal,
        ))
    }

    #[test]
    fn lda_immediate_sets_a_and_flags() {
        let mut cpu = Cpu::new();
        let mut bus = bus();
        cpu.regs.pc = 0x8000;
        bus.write(0x8000, 0x00);
        let resolved = cpu.resolve_operand(&mut bus, AddrMode::Immediate);
        lda(&mut cpu, &mut bus, &resolved);
        assert_eq!(cpu.regs.a, 0x00);
        assert!(cpu.regs.flag(Flags::ZERO));
    }

    #[test]
    fn jsr_then_rts_round_trips_pc() {
        let mut cpu = Cpu::new();
        let mut bus = bus();
        cpu.regs.s = 0xFF;
        cpu.regs.pc = 0x8000;
        bus.write(0x8000, 0x00);
        bus.write(0x8001, 0x90);
        let resolved = cpu.resolve_operand(&mut bus, AddrMode::Absolute);
        jsr(&mut cpu, &mut bus, &resolved);
        assert_eq!(cpu.regs.pc, 0x9000);
        rts(&mut cpu, &mut bus, &resolved);
        assert_eq!(cpu.regs.pc, 0x8003);
    }

    #[test]
    fn branch_not_taken_costs_no_extra_cycles() {
        let mut cpu = Cpu::new();
        let mut bus = bus();
        cpu.regs.pc = 0x8000;
        bus.write(0x8000, 0x10);
        let resolved = cpu.resolve_operand(&mut bus, AddrMode::Relative);
        let pc_before = cpu.regs.pc;
        let extra = bne(&mut cpu, &mut bus, &resolved);
        cpu.regs.flags_on(Flags::ZERO);
        let extra_not_taken = beq(&mut cpu, &mut bus, &resolved);
        let _ = extra;
        assert_eq!(extra_not_taken, 1);
        let _ = pc_before;
    }

    #[test]
    fn asl_shifts_and_sets_carry_from_old_bit7() {
        let mut cpu = Cpu::new();
        let mut bus = bus();
        cpu.regs.a = 0x80;
        let resolved = Resolved {
            operand: Operand::Accumulator,
            page_crossed: false,
        };
        asl(&mut cpu, &mut bus, &resolved);
        assert_eq!(cpu.regs.a, 0x00);
        assert!(cpu.regs.flag(Flags::CARRY));
        assert!(cpu.regs.flag(Flags::ZERO));
    }

    #[test]
    fn brk_pushes_pc_plus_two_and_break_flag() {
        let mut cpu = Cpu::new();
        let mut bus = bus();
        bus.write(0xFFFE, 0x00);
        bus.write(0xFFFF, 0x90);
        cpu.regs.s = 0xFF;
        cpu.regs.pc = 0x8001; // one past the BRK opcode byte, as execute::step leaves it
        let resolved = Resolved {
            operand: Operand::Implicit,
            page_crossed: false,
        };
        brk(&mut cpu, &mut bus, &resolved);
        assert_eq!(cpu.regs.pc, 0x9000);
        assert!(cpu.regs.int_disabled());
        let pushed_status = cpu.pull(&mut bus);
        assert!((pushed_status & Flags::BREAK.bits) != 0);
        let return_addr = cpu.pull_u16(&mut bus);
        assert_eq!(return_addr, 0x8002);
    }
}
