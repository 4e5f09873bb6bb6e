//! `baiasm`: lowers optimized BaiScript TAC to MIPS64-subset assembly
//! (Component E) and encodes that listing to machine words (Component F),
//! the same way a `vasm`-style crate assembles VCPU instructions — but
//! here Component E's own text output is also this crate's Component F
//! input, so the two re-use one `pest` grammar instead of two.

pub mod encode;
pub mod error;
pub mod isa;
pub mod labels;
pub mod parser;
pub mod target;

#[cfg(test)]
mod test;

use baiscript::symbol::SymbolTable;
use baiscript::tac::Instr;

pub use encode::EncodedLine;
pub use error::Error;

pub struct AssembledProgram {
    pub assembly_text: String,
    pub encoded: Vec<EncodedLine>,
}

/// Runs Components E and F over one optimized TAC listing: lowers it to
/// assembly text, re-parses that text, assigns `.data` addresses, and
/// encodes every instruction line to a machine word.
pub fn assemble(tac: &[Instr], symbols: &SymbolTable) -> Result<AssembledProgram, Error> {
    let assembly_text = target::lower(tac, symbols);
    let parsed = parser::parse_assembly(&assembly_text)?;
    let labels = labels::assign_addresses(&parsed.data_labels);
    let encoded = encode::encode(&parsed, &labels)?;
    Ok(AssembledProgram {
        assembly_text,
        encoded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use baiscript::symbol::SemType;
    use baiscript::tac::Operand;

    #[test]
    fn assembles_a_simple_copy_end_to_end() {
        let mut symbols = SymbolTable::new();
        symbols.add("a", SemType::Int, true, "5".to_string());
        let instrs = vec![Instr::copy(Operand::Var("a".to_string()), Operand::Const(5))];
        let assembled = assemble(&instrs, &symbols).unwrap();
        assert!(assembled.assembly_text.contains(".data"));
        assert!(!assembled.encoded.is_empty());
        for line in &assembled.encoded {
            assert_eq!(line.binary.len(), 32);
        }
    }
}
