//! `Cpu::step`: the fetch-decode-execute loop that ties the opcode table,
//! addressing resolution, and instruction cores together.

use super::decoder::OPCODES;
use super::instructions;
use super::Cpu;
use crate::nes::mem::Bus;
use crate::nes::util::Error;

type InstructionFn = fn(&mut Cpu, &mut Bus, &super::addressing::Resolved) -> u8;

fn instruction_fn(mnemonic: &str) -> InstructionFn {
    match mnemonic {
        "LDA" => instructions::lda,
        "LDX" => instructions::ldx,
        "LDY" => instructions::ldy,
        "STA" => instructions::sta,
        "STX" => instructions::stx,
        "STY" => instructions::sty,
        "TAX" => instructions::tax,
        "TAY" => instructions::tay,
        "TXA" => instructions::txa,
        "TYA" => instructions::tya,
        "TSX" => instructions::tsx,
        "TXS" => instructions::txs,
        "PHA" => instructions::pha,
        "PLA" => instructions::pla,
        "PHP" => instructions::php,
        "PLP" => instructions::plp,
        "AND" => instructions::and,
        "ORA" => instructions::ora,
        "EOR" => instructions::eor,
        "BIT" => instructions::bit,
        "ADC" => instructions::adc,
        "SBC" => instructions::sbc,
        "CMP" => instructions::cmp,
        "CPX" => instructions::cpx,
        "CPY" => instructions::cpy,
        "INC" => instructions::inc,
        "DEC" => instructions::dec,
        "INX" => instructions::inx,
        "INY" => instructions::iny,
        "DEX" => instructions::dex,
        "DEY" => instructions::dey,
        "ASL" => instructions::asl,
        "LSR" => instructions::lsr,
        "ROL" => instructions::rol,
        "ROR" => instructions::ror,
        "JMP" => instructions::jmp,
        "JSR" => instructions::jsr,
        "RTS" => instructions::rts,
        "BCC" => instructions::bcc,
        "BCS" => instructions::bcs,
        "BEQ" => instructions::beq,
        "BNE" => instructions::bne,
        "BMI" => instructions::bmi,
        "BPL" => instructions::bpl,
        "BVC" => instructions::bvc,
        "BVS" => instructions::bvs,
        "CLC" => instructions::clc,
        "SEC" => instructions::sec,
        "CLI" => instructions::cli,
        "SEI" => instructions::sei,
        "CLD" => instructions::cld,
        "SED" => instructions::sed,
        "CLV" => instructions::clv,
        "NOP" => instructions::nop,
        "BRK" => instructions::brk,
        "RTI" => instructions::rti,
        other => unreachable!("opcode table references unimplemented mnemonic {}", other),
    }
}

impl Cpu {
    /// Executes exactly one instruction and returns the cycle count it
    /// cost, including any page-crossing and branch-taken bonuses (§4.1,
    /// §5). Returns `Error::Decode` for any of the 105 undocumented
    /// opcodes this core doesn't implement.
    pub fn step(&mut self, bus: &mut Bus) -> Result<u8, Error> {
        let opcode_pc = self.regs.pc;
        let opcode = self.fetch_u8(bus);
        let info = OPCODES[opcode as usize].ok_or(Error::Decode {
            opcode,
            pc: opcode_pc,
        })?;

        let resolved = self.resolve_operand(bus, info.mode);
        let page_bonus = if info.page_penalty && resolved.page_crossed {
            1
        } else {
            0
        };

        let exec = instruction_fn(info.mnemonic);
        let extra = exec(self, bus, &resolved);

        Ok(info.cycles + page_bonus + extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nes::cpu::Flags;
    use crate::nes::rom::{Cartridge, Mirroring};

    fn bus() -> Bus {
        Bus::new(&Cartridge::for_tests(
            vec![0u8; 0x4000],
            vec![0u8; 0x2000],
            Mirroring::Horizontal,
        ))
    }

    #[test]
    fn lda_immediate_steps_two_cycles() {
        let mut cpu = Cpu::new();
        let mut bus = bus();
        cpu.regs.pc = 0x8000;
        bus.write(0x8000, 0xA9); // LDA #imm
        bus.write(0x8001, 0x42);
        let cycles = cpu.step(&mut bus).unwrap();
        assert_eq!(cycles, 2);
        assert_eq!(cpu.regs.a, 0x42);
        assert_eq!(cpu.regs.pc, 0x8002);
    }

    #[test]
    fn absolute_x_read_pays_page_crossing_bonus() {
        let mut cpu = Cpu::new();
        let mut bus = bus();
        cpu.regs.pc = 0x8000;
        cpu.regs.x = 0x01;
        bus.write(0x8000, 0xBD); // LDA absolute,X
        bus.write(0x8001, 0xFF);
        bus.write(0x8002, 0x00);
        bus.write(0x0100, 0x99);
        let cycles = cpu.step(&mut bus).unwrap();
        assert_eq!(cycles, 5); // base 4 + 1 page-cross bonus
        assert_eq!(cpu.regs.a, 0x99);
    }

    #[test]
    fn sta_absolute_x_never_pays_page_bonus() {
        let mut cpu = Cpu::new();
        let mut bus = bus();
        cpu.regs.pc = 0x8000;
        cpu.regs.x = 0x01;
        cpu.regs.a = 0x77;
        bus.write(0x8000, 0x9D); // STA absolute,X
        bus.write(0x8001, 0xFF);
        bus.write(0x8002, 0x00);
        let cycles = cpu.step(&mut bus).unwrap();
        assert_eq!(cycles, 5); // fixed cost, no page bonus on stores
        assert_eq!(bus.read(0x0100), 0x77);
    }

    #[test]
    fn branch_taken_and_page_crossed_pays_two_extra_cycles() {
        let mut cpu = Cpu::new();
        let mut bus = bus();
        cpu.regs.pc = 0x80FD;
        cpu.regs.flags_on(Flags::ZERO);
        bus.write(0x80FD, 0xF0); // BEQ
        bus.write(0x80FE, 0x7F); // +127 from 0x80FF crosses into page 0x81
        let cycles = cpu.step(&mut bus).unwrap();
        assert_eq!(cycles, 4); // base 2 + taken (1) + page-cross (1)
        assert_eq!(cpu.regs.pc, 0x817E);
    }

    #[test]
    fn unimplemented_opcode_reports_decode_error() {
        let mut cpu = Cpu::new();
        let mut bus = bus();
        cpu.regs.pc = 0x8000;
        bus.write(0x8000, 0x02); // undocumented
        let err = cpu.step(&mut bus).unwrap_err();
        match err {
            Error::Decode { opcode, pc } => {
                assert_eq!(opcode, 0x02);
                assert_eq!(pc, 0x8000);
            }
            _ => panic!("expected Decode error"),
        }
    }
}
