//! Peephole temp-inlining optimizer.
//!
//! The reference inlines a temp's *first* operand into its single consumer
//! regardless of what operator defined it, which silently drops the rest
//! of the expression whenever the definition wasn't itself a plain copy.
//! This implementation restricts inlining to `op == "="` definitions
//! instead. A temp defined by an arithmetic op is always left in place —
//! it's never unsound to keep an instruction, only to inline across one.
//!
//! A result that is a real variable (never a temp) is never touched: it
//! must remain a materialized store for whatever reads the variable later.

use super::{Instr, Operand, TacOp};

pub fn optimize(mut instrs: Vec<Instr>) -> Vec<Instr> {
    let mut i = 0;
    while i < instrs.len() {
        let result_temp = match &instrs[i].result {
            Operand::Temp(t) => Some(*t),
            _ => None,
        };
        let t = match result_temp {
            Some(t) => t,
            None => {
                i += 1;
                continue;
            }
        };

        let uses: Vec<usize> = (i + 1..instrs.len())
            .filter(|&j| references(&instrs[j], t))
            .collect();

        match uses.len() {
            0 => {
                instrs.remove(i);
                // Retry the same index: the next instruction slid into it.
            }
            1 if instrs[i].op == TacOp::Copy => {
                let src = instrs[i].arg1.clone();
                let j = uses[0];
                if instrs[j].arg1 == Operand::Temp(t) {
                    instrs[j].arg1 = src.clone();
                }
                if instrs[j].arg2 == Some(Operand::Temp(t)) {
                    instrs[j].arg2 = Some(src);
                }
                instrs.remove(i);
            }
            _ => i += 1,
        }
    }
    instrs
}

fn references(instr: &Instr, t: u32) -> bool {
    instr.arg1 == Operand::Temp(t) || instr.arg2 == Some(Operand::Temp(t))
}
