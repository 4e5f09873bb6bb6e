//! Opcode/funct tables and bit-packing for the MIPS64 subset. The packing
//! technique (shift-and-mask into one `u32`) follows the
//! `make_r_instruction`/`make_i_instruction` split; the field widths and
//! opcode/funct values are this ISA's own.

use util::EnumFromStr;
use util_derive::EnumFromStr;

/// Every mnemonic this ISA subset accepts, parsed from the assembly
/// listing the same way VCPU mnemonics are parsed: via the `EnumFromStr`
/// derive rather than a hand-written string match.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumFromStr)]
pub enum Mnemonic {
    daddu,
    dsub,
    dmult,
    ddiv,
    mflo,
    daddiu,
    ld,
    sd,
}

pub const OPCODE_RTYPE: u32 = 0x00;
pub const OPCODE_DADDIU: u32 = 0x19;
pub const OPCODE_LD: u32 = 0x37;
pub const OPCODE_SD: u32 = 0x3F;

pub const FUNCT_DADDU: u32 = 0x2D;
pub const FUNCT_DSUB: u32 = 0x2E;
pub const FUNCT_DMULT: u32 = 0x1C;
pub const FUNCT_DDIV: u32 = 0x1E;
pub const FUNCT_MFLO: u32 = 0x12;

/// `opcode(6) | rs(5) | rt(5) | rd(5) | shamt(5) | funct(6)`.
pub fn make_r_instruction(rs: u32, rt: u32, rd: u32, shamt: u32, funct: u32) -> u32 {
    (OPCODE_RTYPE << 26)
        | ((rs & 0x1F) << 21)
        | ((rt & 0x1F) << 16)
        | ((rd & 0x1F) << 11)
        | ((shamt & 0x1F) << 6)
        | (funct & 0x3F)
}

/// `opcode(6) | rs(5) | rt(5) | imm(16)`.
pub fn make_i_instruction(opcode: u32, rs: u32, rt: u32, imm: u16) -> u32 {
    (opcode << 26) | ((rs & 0x1F) << 21) | ((rt & 0x1F) << 16) | (imm as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn r_instruction_packs_fields_into_expected_positions() {
        let word = make_r_instruction(1, 2, 3, 0, FUNCT_DADDU);
        assert_eq!((word >> 26) & 0x3F, OPCODE_RTYPE);
        assert_eq!((word >> 21) & 0x1F, 1);
        assert_eq!((word >> 16) & 0x1F, 2);
        assert_eq!((word >> 11) & 0x1F, 3);
        assert_eq!(word & 0x3F, FUNCT_DADDU);
    }

    #[test]
    fn i_instruction_packs_immediate_in_low_16_bits() {
        let word = make_i_instruction(OPCODE_DADDIU, 0, 1, 5);
        assert_eq!((word >> 26) & 0x3F, OPCODE_DADDIU);
        assert_eq!((word >> 16) & 0x1F, 1);
        assert_eq!(word & 0xFFFF, 5);
    }

    #[test]
    fn immediate_masks_to_16_bits() {
        let word = make_i_instruction(OPCODE_LD, 0, 1, 0xFFF8);
        assert_eq!(word & 0xFFFF, 0xFFF8);
    }
}
