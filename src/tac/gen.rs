//! TAC generator.
//!
//! This is a purely structural lowering of the AST — it does **not** reuse
//! the semantic analyzer's folded constants. `a = 2 + 3 * 4;` always emits
//! two temporaries here even though the analyzer already knows the answer
//! is 14; the optimizer, not the generator, is where redundant structure
//! gets collapsed. Downstream components treat the (optimized) TAC as the
//! source of truth, never the analyzer's evaluation trace.

use super::{Instr, Operand, TacOp};
use crate::ast::*;

pub fn generate(program: &Program) -> Vec<Instr> {
    let mut gen = Gen {
        instrs: Vec::new(),
        next_temp: 0,
    };
    for stmt in program {
        gen.gen_stmt(stmt);
    }
    gen.instrs
}

struct Gen {
    instrs: Vec<Instr>,
    next_temp: u32,
}

fn to_tac_op(op: BinOp) -> TacOp {
    match op {
        BinOp::Add => TacOp::Add,
        BinOp::Sub => TacOp::Sub,
        BinOp::Mul => TacOp::Mul,
        BinOp::Div => TacOp::Div,
    }
}

impl Gen {
    fn new_temp(&mut self) -> Operand {
        let t = Operand::Temp(self.next_temp);
        self.next_temp += 1;
        t
    }

    fn emit(&mut self, instr: Instr) {
        self.instrs.push(instr);
    }

    fn gen_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Declaration(decl) => {
                for d in &decl.declarators {
                    if let Some(init) = &d.init {
                        let v = self.gen_expr(init);
                        self.emit(Instr::copy(Operand::Var(d.name.clone()), v));
                    }
                }
            }
            Stmt::Assignment(assign) => {
                let name = match &assign.target {
                    Expr::Identifier(n, _) => n.clone(),
                    _ => return,
                };
                match assign.op {
                    AssignOp::Assign => {
                        let v = self.gen_expr(&assign.value);
                        self.emit(Instr::copy(Operand::Var(name), v));
                    }
                    _ => {
                        let op = to_tac_op(assign.op.binop().unwrap());
                        let rhs = self.gen_expr(&assign.value);
                        self.emit(Instr::binary(Operand::Var(name.clone()), op, Operand::Var(name), rhs));
                    }
                }
            }
            Stmt::Expr(expr) => {
                self.gen_expr(expr);
            }
            Stmt::Print(items, _) => {
                // PRENT never emits an instruction of its own — printing is
                // a compile-time artifact of the semantic analyzer, and the
                // target ISA has no I/O opcode. Only side effects (postfix
                // and prefix updates) survive into the TAC stream.
                for item in items {
                    if let PrintItem::Expr(e) = item {
                        self.gen_expr(e);
                    }
                }
            }
        }
    }

    fn gen_expr(&mut self, expr: &Expr) -> Operand {
        match expr {
            Expr::Literal(Literal::Int(v), _) => Operand::Const(*v),
            Expr::Literal(Literal::Char(v), _) => Operand::Const(*v),
            Expr::Identifier(name, _) => Operand::Var(name.clone()),
            Expr::Binary { op, left, right, .. } => {
                let l = self.gen_expr(left);
                let r = self.gen_expr(right);
                let t = self.new_temp();
                self.emit(Instr::binary(t.clone(), to_tac_op(*op), l, r));
                t
            }
            Expr::Unary { op, operand, .. } => {
                let v = self.gen_expr(operand);
                match op {
                    UnaryOp::Pos => v,
                    UnaryOp::Neg => {
                        let t = self.new_temp();
                        self.emit(Instr::binary(t.clone(), TacOp::Sub, Operand::Const(0), v));
                        t
                    }
                }
            }
            Expr::Prefix { op, operand, .. } => {
                let name = match &**operand {
                    Expr::Identifier(n, _) => n.clone(),
                    _ => return Operand::Const(0),
                };
                let tac_op = if *op == IncDec::Inc { TacOp::Add } else { TacOp::Sub };
                self.emit(Instr::binary(
                    Operand::Var(name.clone()),
                    tac_op,
                    Operand::Var(name.clone()),
                    Operand::Const(1),
                ));
                Operand::Var(name)
            }
            Expr::Postfix { op, operand, .. } => {
                let name = match &**operand {
                    Expr::Identifier(n, _) => n.clone(),
                    _ => return Operand::Const(0),
                };
                let saved = self.new_temp();
                self.emit(Instr::copy(saved.clone(), Operand::Var(name.clone())));
                let tac_op = if *op == IncDec::Inc { TacOp::Add } else { TacOp::Sub };
                self.emit(Instr::binary(
                    Operand::Var(name.clone()),
                    tac_op,
                    Operand::Var(name.clone()),
                    Operand::Const(1),
                ));
                saved
            }
        }
    }
}
