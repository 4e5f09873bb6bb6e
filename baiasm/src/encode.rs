//! Component F: encodes each parsed instruction to a 32-bit word, plus its
//! binary and hex renderings.

use crate::error::Error;
use crate::isa::*;
use crate::labels::LabelMap;
use crate::parser::{MemBase, ParsedInstruction, ParsedLine, ParsedOperand, ParsedProgram};

#[derive(Debug, Clone)]
pub struct EncodedLine {
    /// The exact source assembly line this word was encoded from.
    pub source: String,
    pub word: u32,
    pub binary: String,
    pub hex: String,
}

pub fn encode(program: &ParsedProgram, labels: &LabelMap) -> Result<Vec<EncodedLine>, Error> {
    let mut out = Vec::new();
    for line in &program.lines {
        if let ParsedLine::Instruction(instr) = line {
            let word = encode_instruction(instr, labels)?;
            out.push(EncodedLine {
                source: instr.text.clone(),
                word,
                binary: format!("{:032b}", word),
                hex: format!("0x{:08X}", word),
            });
        }
    }
    Ok(out)
}

fn operand_at<'a>(instr: &'a ParsedInstruction, idx: usize, expected: usize) -> Result<&'a ParsedOperand, Error> {
    instr.operands.get(idx).ok_or_else(|| Error::BadOperandCount {
        mnemonic: instr.mnemonic.clone(),
        expected,
        found: instr.operands.len(),
    })
}

fn as_register(instr: &ParsedInstruction, op: &ParsedOperand) -> Result<u32, Error> {
    match op {
        ParsedOperand::Register(r) => Ok(*r),
        other => Err(Error::BadOperandKind {
            mnemonic: instr.mnemonic.clone(),
            detail: format!("expected a register, found {:?}", other),
        }),
    }
}

fn as_displacement(instr: &ParsedInstruction, op: &ParsedOperand, labels: &LabelMap) -> Result<(u16, u32), Error> {
    match op {
        ParsedOperand::Memory { base, reg } => {
            let disp = match base {
                MemBase::Imm(v) => *v as u64,
                MemBase::Label(name) => *labels.get(name).ok_or_else(|| Error::UnknownLabel(name.clone()))?,
            };
            Ok(((disp & 0xFFFF) as u16, *reg))
        }
        other => Err(Error::BadOperandKind {
            mnemonic: instr.mnemonic.clone(),
            detail: format!("expected a memory reference, found {:?}", other),
        }),
    }
}

fn as_immediate(instr: &ParsedInstruction, op: &ParsedOperand) -> Result<i64, Error> {
    match op {
        ParsedOperand::Immediate(v) => Ok(*v),
        other => Err(Error::BadOperandKind {
            mnemonic: instr.mnemonic.clone(),
            detail: format!("expected an immediate, found {:?}", other),
        }),
    }
}

fn encode_instruction(instr: &ParsedInstruction, labels: &LabelMap) -> Result<u32, Error> {
    let mnemonic: Mnemonic = instr.mnemonic.parse().map_err(|_| Error::UnknownMnemonic(instr.mnemonic.clone()))?;
    match mnemonic {
        Mnemonic::daddu | Mnemonic::dsub => {
            let rd = as_register(instr, operand_at(instr, 0, 3)?)?;
            let rs = as_register(instr, operand_at(instr, 1, 3)?)?;
            let rt = as_register(instr, operand_at(instr, 2, 3)?)?;
            let funct = if mnemonic == Mnemonic::daddu { FUNCT_DADDU } else { FUNCT_DSUB };
            Ok(make_r_instruction(rs, rt, rd, 0, funct))
        }
        Mnemonic::dmult | Mnemonic::ddiv => {
            let rs = as_register(instr, operand_at(instr, 0, 2)?)?;
            let rt = as_register(instr, operand_at(instr, 1, 2)?)?;
            let funct = if mnemonic == Mnemonic::dmult { FUNCT_DMULT } else { FUNCT_DDIV };
            Ok(make_r_instruction(rs, rt, 0, 0, funct))
        }
        Mnemonic::mflo => {
            let rd = as_register(instr, operand_at(instr, 0, 1)?)?;
            Ok(make_r_instruction(0, 0, rd, 0, FUNCT_MFLO))
        }
        Mnemonic::daddiu => {
            let rt = as_register(instr, operand_at(instr, 0, 3)?)?;
            let rs = as_register(instr, operand_at(instr, 1, 3)?)?;
            let imm = as_immediate(instr, operand_at(instr, 2, 3)?)?;
            Ok(make_i_instruction(OPCODE_DADDIU, rs, rt, (imm & 0xFFFF) as u16))
        }
        Mnemonic::ld | Mnemonic::sd => {
            let rt = as_register(instr, operand_at(instr, 0, 2)?)?;
            let (disp, rs) = as_displacement(instr, operand_at(instr, 1, 2)?, labels)?;
            let opcode = if mnemonic == Mnemonic::ld { OPCODE_LD } else { OPCODE_SD };
            Ok(make_i_instruction(opcode, rs, rt, disp))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::assign_addresses;
    use crate::parser::parse_assembly;

    #[test]
    fn encodes_daddiu_and_store() {
        let program = parse_assembly(".data\na: .word64 0\n.code\ndaddiu r1, r0, 5\nsd r1, a(r0)\n").unwrap();
        let labels = assign_addresses(&program.data_labels);
        let encoded = encode(&program, &labels).unwrap();
        assert_eq!(encoded.len(), 2);
        assert_eq!(encoded[0].hex.len(), 10); // "0x" + 8 hex digits
        assert_eq!(encoded[1].binary.len(), 32);
    }

    #[test]
    fn encodes_arithmetic_r_type_instructions() {
        let program = parse_assembly(".code\ndaddu r3, r1, r2\ndmult r1, r2\nmflo r3\n").unwrap();
        let encoded = encode(&program, &assign_addresses(&[])).unwrap();
        assert_eq!(encoded.len(), 3);
    }

    #[test]
    fn reports_unknown_labels() {
        let program = parse_assembly(".code\nld r1, missing(r0)\n").unwrap();
        let err = encode(&program, &assign_addresses(&[])).unwrap_err();
        assert!(matches!(err, Error::UnknownLabel(_)));
    }

    #[test]
    fn reports_unknown_mnemonics() {
        let program = parse_assembly(".code\nfrobnicate r1\n").unwrap();
        let err = encode(&program, &assign_addresses(&[])).unwrap_err();
        assert!(matches!(err, Error::UnknownMnemonic(_)));
    }
}
