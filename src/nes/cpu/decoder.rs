//! The 256-entry opcode table: for each byte value, the mnemonic (for
//! diagnostics), addressing mode, and nominal cycle cost. `execute::step`
//! is the only reader; it looks up one entry per instruction rather than
//! re-deriving addressing-mode arithmetic from the opcode's bit pattern.
//!
//! Unlisted (`None`) entries are the 105 undocumented opcodes this core
//! doesn't implement (§1, Non-goals) - `step` reports a `DecodeError` for
//! any of them.

use super::addressing::AddrMode;

#[derive(Debug, Copy, Clone)]
pub struct OpcodeInfo {
    pub mnemonic: &'static str,
    pub mode: AddrMode,
    /// Nominal cycle count from the 256-entry table (§4.1).
    pub cycles: u8,
    /// Whether an indexed/indirect-indexed read that crosses a page
    /// boundary costs one extra cycle here. Never set for stores or
    /// read-modify-write instructions, which always pay the worst case.
    pub page_penalty: bool,
}

const fn op(mnemonic: &'static str, mode: AddrMode, cycles: u8) -> Option<OpcodeInfo> {
    Some(OpcodeInfo {
        mnemonic,
        mode,
        cycles,
        page_penalty: false,
    })
}

const fn op_pg(mnemonic: &'static str, mode: AddrMode, cycles: u8) -> Option<OpcodeInfo> {
    Some(OpcodeInfo {
        mnemonic,
        mode,
        cycles,
        page_penalty: true,
    })
}

use AddrMode::*;

pub const OPCODES: [Option<OpcodeInfo>; 256] = {
    let mut table: [Option<OpcodeInfo>; 256] = [None; 256];

    table[0x00] = op("BRK", Implicit, 7);
    table[0x01] = op("ORA", IndirectX, 6);
    table[0x05] = op("ORA", ZeroPage, 3);
    table[0x06] = op("ASL", ZeroPage, 5);
    table[0x08] = op("PHP", Implicit, 3);
    table[0x09] = op("ORA", Immediate, 2);
    table[0x0A] = op("ASL", Accumulator, 2);
    table[0x0D] = op("ORA", Absolute, 4);
    table[0x0E] = op("ASL", Absolute, 6);

    table[0x10] = op("BPL", Relative, 2);
    table[0x11] = op_pg("ORA", IndirectY, 5);
    table[0x15] = op("ORA", ZeroPageX, 4);
    table[0x16] = op("ASL", ZeroPageX, 6);
    table[0x18] = op("CLC", Implicit, 2);
    table[0x19] = op_pg("ORA", AbsoluteY, 4);
    table[0x1D] = op_pg("ORA", AbsoluteX, 4);
    table[0x1E] = op("ASL", AbsoluteX, 7);

    table[0x20] = op("JSR", Absolute, 6);
    table[0x21] = op("AND", IndirectX, 6);
    table[0x24] = op("BIT", ZeroPage, 3);
    table[0x25] = op("AND", ZeroPage, 3);
    table[0x26] = op("ROL", ZeroPage, 5);
    table[0x28] = op("PLP", Implicit, 4);
    table[0x29] = op("AND", Immediate, 2);
    table[0x2A] = op("ROL", Accumulator, 2);
    table[0x2C] = op("BIT", Absolute, 4);
    table[0x2D] = op("AND", Absolute, 4);
    table[0x2E] = op("ROL", Absolute, 6);

    table[0x30] = op("BMI", Relative, 2);
    table[0x31] = op_pg("AND", IndirectY, 5);
    table[0x35] = op("AND", ZeroPageX, 4);
    table[0x36] = op("ROL", ZeroPageX, 6);
    table[0x38] = op("SEC", Implicit, 2);
    table[0x39] = op_pg("AND", AbsoluteY, 4);
    table[0x3D] = op_pg("AND", AbsoluteX, 4);
    table[0x3E] = op("ROL", AbsoluteX, 7);

    table[0x40] = op("RTI", Implicit, 6);
    table[0x41] = op("EOR", IndirectX, 6);
    table[0x45] = op("EOR", ZeroPage, 3);
    table[0x46] = op("LSR", ZeroPage, 5);
    table[0x48] = op("PHA", Implicit, 3);
    table[0x49] = op("EOR", Immediate, 2);
    table[0x4A] = op("LSR", Accumulator, 2);
    table[0x4C] = op("JMP", Absolute, 3);
    table[0x4D] = op("EOR", Absolute, 4);
    table[0x4E] = op("LSR", Absolute, 6);

    table[0x50] = op("BVC", Relative, 2);
    table[0x51] = op_pg("EOR", IndirectY, 5);
    table[0x55] = op("EOR", ZeroPageX, 4);
    table[0x56] = op("LSR", ZeroPageX, 6);
    table[0x58] = op("CLI", Implicit, 2);
    table[0x59] = op_pg("EOR", AbsoluteY, 4);
    table[0x5D] = op_pg("EOR", AbsoluteX, 4);
    table[0x5E] = op("LSR", AbsoluteX, 7);

    table[0x60] = op("RTS", Implicit, 6);
    table[0x61] = op("ADC", IndirectX, 6);
    table[0x65] = op("ADC", ZeroPage, 3);
    table[0x66] = op("ROR", ZeroPage, 5);
    table[0x68] = op("PLA", Implicit, 4);
    table[0x69] = op("ADC", Immediate, 2);
    table[0x6A] = op("ROR", Accumulator, 2);
    table[0x6C] = op("JMP", Indirect, 5);
    table[0x6D] = op("ADC", Absolute, 4);
    table[0x6E] = op("ROR", Absolute, 6);

    table[0x70] = op("BVS", Relative, 2);
    table[0x71] = op_pg("ADC", IndirectY, 5);
    table[0x75] = op("ADC", ZeroPageX, 4);
    table[0x76] = op("ROR", ZeroPageX, 6);
    table[0x78] = op("SEI", Implicit, 2);
    table[0x79] = op_pg("ADC", AbsoluteY, 4);
    table[0x7D] = op_pg("ADC", AbsoluteX, 4);
    table[0x7E] = op("ROR", AbsoluteX, 7);

    table[0x81] = op("STA", IndirectX, 6);
    table[0x84] = op("STY", ZeroPage, 3);
    table[0x85] = op("STA", ZeroPage, 3);
    table[0x86] = op("STX", ZeroPage, 3);
    table[0x88] = op("DEY", Implicit, 2);
    table[0x8A] = op("TXA", Implicit, 2);
    table[0x8C] = op("STY", Absolute, 4);
    table[0x8D] = op("STA", Absolute, 4);
    table[0x8E] = op("STX", Absolute, 4);

    table[0x90] = op("BCC", Relative, 2);
    table[0x91] = op("STA", IndirectY, 6);
    table[0x94] = op("STY", ZeroPageX, 4);
    table[0x95] = op("STA", ZeroPageX, 4);
    table[0x96] = op("STX", ZeroPageY, 4);
    table[0x98] = op("TYA", Implicit, 2);
    table[0x99] = op("STA", AbsoluteY, 5);
    table[0x9A] = op("TXS", Implicit, 2);
    table[0x9D] = op("STA", AbsoluteX, 5);

    table[0xA0] = op("LDY", Immediate, 2);
    table[0xA1] = op("LDA", IndirectX, 6);
    table[0xA2] = op("LDX", Immediate, 2);
    table[0xA4] = op("LDY", ZeroPage, 3);
    table[0xA5] = op("LDA", ZeroPage, 3);
    table[0xA6] = op("LDX", ZeroPage, 3);
    table[0xA8] = op("TAY", Implicit, 2);
    table[0xA9] = op("LDA", Immediate, 2);
    table[0xAA] = op("TAX", Implicit, 2);
    table[0xAC] = op("LDY", Absolute, 4);
    table[0xAD] = op("LDA", Absolute, 4);
    table[0xAE] = op("LDX", Absolute, 4);

    table[0xB0] = op("BCS", Relative, 2);
    table[0xB1] = op_pg("LDA", IndirectY, 5);
    table[0xB4] = op("LDY", ZeroPageX, 4);
    table[0xB5] = op("LDA", ZeroPageX, 4);
    table[0xB6] = op("LDX", ZeroPageY, 4);
    table[0xB8] = op("CLV", Implicit, 2);
    table[0xB9] = op_pg("LDA", AbsoluteY, 4);
    table[0xBA] = op("TSX", Implicit, 2);
    table[0xBC] = op_pg("LDY", AbsoluteX, 4);
    table[0xBD] = op_pg("LDA", AbsoluteX, 4);
    table[0xBE] = op_pg("LDX", AbsoluteY, 4);

    table[0xC0] = op("CPY", Immediate, 2);
    table[0xC1] = op("CMP", IndirectX, 6);
    table[0xC4] = op("CPY", ZeroPage, 3);
    table[0xC5] = op("CMP", ZeroPage, 3);
    table[0xC6] = op("DEC", ZeroPage, 5);
    table[0xC8] = op("INY", Implicit, 2);
    table[0xC9] = op("CMP", Immediate, 2);
    table[0xCA] = op("DEX", Implicit, 2);
    table[0xCC] = op("CPY", Absolute, 4);
    table[0xCD] = op("CMP", Absolute, 4);
    table[0xCE] = op("DEC", Absolute, 6);

    table[0xD0] = op("BNE", Relative, 2);
    table[0xD1] = op_pg("CMP", IndirectY, 5);
    table[0xD5] = op("CMP", ZeroPageX, 4);
    table[0xD6] = op("DEC", ZeroPageX, 6);
    table[0xD8] = op("CLD", Implicit, 2);
    table[0xD9] = op_pg("CMP", AbsoluteY, 4);
    table[0xDD] = op_pg("CMP", AbsoluteX, 4);
    table[0xDE] = op("DEC", AbsoluteX, 7);

    table[0xE0] = op("CPX", Immediate, 2);
    table[0xE1] = op("SBC", IndirectX, 6);
    table[0xE4] = op("CPX", ZeroPage, 3);
    table[0xE5] = op("SBC", ZeroPage, 3);
    table[0xE6] = op("INC", ZeroPage, 5);
    table[0xE8] = op("INX", Implicit, 2);
    table[0xE9] = op("SBC", Immediate, 2);
    table[0xEA] = op("NOP", Implicit, 2);
    table[0xEC] = op("CPX", Absolute, 4);
    table[0xED] = op("SBC", Absolute, 4);
    table[0xEE] = op("INC", Absolute, 6);

    table[0xF0] = op("BEQ", Relative, 2);
    table[0xF1] = op_pg("SBC", IndirectY, 5);
    table[0xF5] = op("SBC", ZeroPageX, 4);
    table[0xF6] = op("INC", ZeroPageX, 6);
    table[0xF8] = op("SED", Implicit, 2);
    table[0xF9] = op_pg("SBC", AbsoluteY, 4);
    table[0xFD] = op_pg("SBC", AbsoluteX, 4);
    table[0xFE] = op("INC", AbsoluteX, 7);

    table
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_exactly_151_legal_opcodes() {
        let count = OPCODES.iter().filter(|o| o.is_some()).count();
        assert_eq!(count, 151);
    }

    #[test]
    fn brk_and_lda_immediate_decode_correctly() {
        assert_eq!(OPCODES[0x00].unwrap().mnemonic, "BRK");
        let lda = OPCODES[0xA9].unwrap();
        assert_eq!(lda.mnemonic, "LDA");
        assert_eq!(lda.mode, AddrMode::Immediate);
        assert_eq!(lda.cycles, 2);
    }

    #[test]
    fn undocumented_opcodes_are_absent() {
        assert!(OPCODES[0x02].is_none());
        assert!(OPCODES[0xFF].is_none());
    }
}
