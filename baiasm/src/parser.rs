//! Parses the assembly listing Component E produces back into a structured
//! form, using a `pest` grammar and a match over `Rule` variants the way
//! VCPU assembly is parsed, trimmed to this ISA's simpler operand shapes.

use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct AsmParser;

use crate::error::Error;
use pest::iterators::Pair;
use pest::Parser as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemBase {
    Label(String),
    Imm(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedOperand {
    Register(u32),
    Immediate(i64),
    Memory { base: MemBase, reg: u32 },
}

#[derive(Debug, Clone)]
pub struct ParsedInstruction {
    pub mnemonic: String,
    pub operands: Vec<ParsedOperand>,
    /// The exact source text of this instruction line, carried through to
    /// the `output_machine*.txt` artifacts verbatim.
    pub text: String,
}

#[derive(Debug, Clone)]
pub enum ParsedLine {
    Comment(String),
    Instruction(ParsedInstruction),
}

#[derive(Debug, Clone, Default)]
pub struct ParsedProgram {
    /// `.data` label names, in declaration order.
    pub data_labels: Vec<String>,
    pub lines: Vec<ParsedLine>,
}

pub fn parse_assembly(text: &str) -> Result<ParsedProgram, Error> {
    let mut pairs = AsmParser::parse(Rule::file, text)?;
    let file = pairs.next().expect("file rule always produces one pair");

    let mut program = ParsedProgram::default();
    for section in file.into_inner() {
        match section.as_rule() {
            Rule::data_section => {
                for data_line in section.into_inner() {
                    if data_line.as_rule() == Rule::data_line {
                        let name = data_line
                            .into_inner()
                            .next()
                            .expect("data_line always starts with an identifier")
                            .as_str()
                            .to_string();
                        program.data_labels.push(name);
                    }
                }
            }
            Rule::code_section => {
                for line in section.into_inner() {
                    if line.as_rule() == Rule::line {
                        let inner = line.into_inner().next().expect("line always has one alternative");
                        match inner.as_rule() {
                            Rule::comment => program.lines.push(ParsedLine::Comment(inner.as_str().to_string())),
                            Rule::instruction => program.lines.push(ParsedLine::Instruction(parse_instruction(inner))),
                            _ => {}
                        }
                    }
                }
            }
            Rule::EOI => {}
            _ => {}
        }
    }
    Ok(program)
}

fn parse_instruction(pair: Pair<Rule>) -> ParsedInstruction {
    let text = pair.as_str().to_string();
    let mut inner = pair.into_inner();
    let mnemonic = inner.next().expect("instruction always has a mnemonic").as_str().to_string();
    let operands = inner.map(parse_operand).collect();
    ParsedInstruction { mnemonic, operands, text }
}

fn parse_operand(pair: Pair<Rule>) -> ParsedOperand {
    let inner = pair.into_inner().next().expect("operand always wraps one alternative");
    match inner.as_rule() {
        Rule::register => ParsedOperand::Register(parse_register(inner.as_str())),
        Rule::integer => ParsedOperand::Immediate(inner.as_str().parse().expect("integer rule only matches digits")),
        Rule::memory_ref => {
            let mut parts = inner.into_inner();
            let base_tok = parts.next().expect("memory_ref always has a base");
            let reg_tok = parts.next().expect("memory_ref always has a register");
            let base = match base_tok.as_rule() {
                Rule::identifier => MemBase::Label(base_tok.as_str().to_string()),
                Rule::integer => MemBase::Imm(base_tok.as_str().parse().expect("integer rule only matches digits")),
                other => unreachable!("unexpected memory_ref base rule {:?}", other),
            };
            ParsedOperand::Memory {
                base,
                reg: parse_register(reg_tok.as_str()),
            }
        }
        other => unreachable!("unexpected operand rule {:?}", other),
    }
}

fn parse_register(s: &str) -> u32 {
    s[1..].parse().expect("register rule guarantees digits after 'r'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_data_and_code_sections() {
        let text = ".data\na: .word64 0\n.code\n; a = 5\ndaddiu r1, r0, 5\nsd r1, a(r0)\n";
        let program = parse_assembly(text).unwrap();
        assert_eq!(program.data_labels, vec!["a".to_string()]);
        assert_eq!(program.lines.len(), 2);
        match &program.lines[0] {
            ParsedLine::Comment(c) => assert_eq!(c, "; a = 5"),
            other => panic!("expected comment, got {:?}", other),
        }
        match &program.lines[1] {
            ParsedLine::Instruction(i) => {
                assert_eq!(i.mnemonic, "sd");
                assert_eq!(
                    i.operands,
                    vec![
                        ParsedOperand::Register(1),
                        ParsedOperand::Memory {
                            base: MemBase::Label("a".to_string()),
                            reg: 0
                        }
                    ]
                );
            }
            other => panic!("expected instruction, got {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_instruction() {
        assert!(parse_assembly(".code\ndaddu r1 r2\n").is_err());
    }

    #[test]
    fn parses_register_only_instruction() {
        let program = parse_assembly(".code\nmflo r3\n").unwrap();
        match &program.lines[0] {
            ParsedLine::Instruction(i) => assert_eq!(i.operands, vec![ParsedOperand::Register(3)]),
            other => panic!("expected instruction, got {:?}", other),
        }
    }
}
