//! Semantic analyzer: symbol table population, constant folding, and
//! diagnostics.
//!
//! Evaluation is left-to-right, depth-first, and never short-circuits on
//! error — every phase keeps going with a neutral substitute value so one
//! mistake doesn't hide the next.

use super::diagnostics::{Diagnostic, Severity};
use super::eval::{KnownVar, KnownVars, SemTemp, SemValue};
use crate::ast::*;
use crate::symbol::{SemType, SymbolTable};

pub struct AnalysisResult {
    pub symbols: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
    pub error_count: usize,
    /// `Some` only when `error_count == 0`; the reference only flushes the
    /// print buffer on a clean run.
    pub print_output: Option<String>,
}

pub fn analyze(program: &Program) -> AnalysisResult {
    let mut analyzer = Analyzer::new();
    for stmt in program {
        analyzer.analyze_stmt(stmt);
    }
    analyzer.check_unused_variables();
    analyzer.finish()
}

struct Analyzer {
    symbols: SymbolTable,
    known: KnownVars,
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    print_buffer: String,
}

impl Analyzer {
    fn new() -> Self {
        Analyzer {
            symbols: SymbolTable::new(),
            known: KnownVars::new(),
            diagnostics: Vec::new(),
            error_count: 0,
            print_buffer: String::new(),
        }
    }

    fn error(&mut self, message: impl Into<String>, line: u32) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            line,
        });
        self.error_count += 1;
    }

    fn warning(&mut self, message: impl Into<String>, line: u32) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            line,
        });
    }

    fn finish(self) -> AnalysisResult {
        let print_output = if self.error_count == 0 {
            Some(self.print_buffer)
        } else {
            None
        };
        AnalysisResult {
            symbols: self.symbols,
            diagnostics: self.diagnostics,
            error_count: self.error_count,
            print_output,
        }
    }

    fn analyze_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Declaration(decl) => self.handle_declaration(decl),
            Stmt::Assignment(assign) => self.handle_assignment(assign),
            Stmt::Expr(expr) => {
                self.eval_expr(expr, false);
            }
            Stmt::Print(items, line) => self.handle_print(items, *line),
        }
    }

    fn handle_declaration(&mut self, decl: &Declaration) {
        for declarator in &decl.declarators {
            if self.known.contains_key(&declarator.name) {
                self.error(
                    format!("Redeclaration of variable '{}'", declarator.name),
                    declarator.line,
                );
                continue;
            }

            match decl.datatype {
                DataType::Enteger | DataType::Charot => {
                    let declared_ty = if decl.datatype == DataType::Enteger {
                        SemType::Int
                    } else {
                        SemType::Char
                    };
                    let (initialized, is_constant, int_value) = match &declarator.init {
                        Some(init_expr) => {
                            let v = self.eval_expr(init_expr, false);
                            (true, v.is_constant, v.int_value)
                        }
                        None => (false, false, 0),
                    };
                    self.declare(
                        &declarator.name,
                        declared_ty,
                        initialized,
                        is_constant,
                        int_value,
                        declarator.line,
                    );
                }
                DataType::Kuan => match &declarator.init {
                    Some(init_expr) => {
                        let v = self.eval_expr(init_expr, false);
                        let inferred_ty = if v.ty == SemType::Unknown {
                            SemType::Int
                        } else {
                            v.ty
                        };
                        self.declare(
                            &declarator.name,
                            inferred_ty,
                            true,
                            v.is_constant,
                            v.int_value,
                            declarator.line,
                        );
                    }
                    None => {
                        self.declare(&declarator.name, SemType::Unknown, false, false, 0, declarator.line);
                    }
                },
            }
        }
    }

    fn declare(
        &mut self,
        name: &str,
        ty: SemType,
        initialized: bool,
        is_constant: bool,
        int_value: i64,
        decl_line: u32,
    ) {
        self.known.insert(
            name.to_string(),
            KnownVar {
                temp: SemTemp {
                    ty,
                    is_constant,
                    int_value,
                },
                initialized,
                used: false,
                decl_line,
            },
        );
        let value_text = if initialized { int_value.to_string() } else { String::new() };
        self.symbols.add(name, ty, initialized, value_text);
    }

    fn handle_assignment(&mut self, assign: &Assignment) {
        let name = match &assign.target {
            Expr::Identifier(n, _) => n.clone(),
            other => {
                self.error("Invalid LHS in assignment", other.line());
                return;
            }
        };

        if !self.known.contains_key(&name) {
            self.error(format!("Undeclared identifier '{}'", name), assign.line);
            return;
        }

        let rhs = self.eval_expr(&assign.value, false);

        let (current_ty, current_initialized, current_value) = {
            let kv = self.known.get(&name).unwrap();
            (kv.temp.ty, kv.initialized, kv.temp.int_value)
        };

        let (new_ty, new_initialized, new_constant, new_value) = match assign.op {
            AssignOp::Assign => {
                let ty = if current_ty == SemType::Unknown {
                    if rhs.ty == SemType::Unknown {
                        SemType::Int
                    } else {
                        rhs.ty
                    }
                } else {
                    current_ty
                };
                (ty, true, rhs.is_constant, rhs.int_value)
            }
            AssignOp::AddAssign | AssignOp::SubAssign | AssignOp::MulAssign | AssignOp::DivAssign => {
                if !current_initialized {
                    self.error(format!("Use of uninitialized variable '{}'", name), assign.line);
                }
                let base = if current_initialized { current_value } else { 0 };
                let op = assign.op.binop().unwrap();
                if op == BinOp::Div && rhs.is_constant && rhs.int_value == 0 {
                    self.error("Division by zero", assign.line);
                    (current_ty, true, true, 0)
                } else if rhs.is_constant {
                    (current_ty, true, true, apply_binop(op, base, rhs.int_value))
                } else {
                    (current_ty, true, false, 0)
                }
            }
        };

        let kv = self.known.get_mut(&name).unwrap();
        kv.temp.ty = new_ty;
        kv.initialized = new_initialized;
        kv.temp.is_constant = new_constant;
        kv.temp.int_value = new_value;

        if let Some(entry) = self.symbols.find_mut(&name) {
            entry.datatype = new_ty;
            entry.initialized = new_initialized;
            entry.value = if new_initialized { new_value.to_string() } else { String::new() };
        }
    }

    fn handle_print(&mut self, items: &[PrintItem], line: u32) {
        let mut line_out = String::new();
        for item in items {
            match item {
                PrintItem::Str(s, _) => line_out.push_str(s),
                PrintItem::Expr(expr) => {
                    let v = self.eval_expr(expr, true);
                    if v.ty == SemType::Char {
                        if let Some(c) = char::from_u32(v.int_value as u32) {
                            line_out.push(c);
                        }
                    } else {
                        line_out.push_str(&v.int_value.to_string());
                    }
                }
            }
        }
        line_out.push('\n');
        self.print_buffer.push_str(&line_out);
        let _ = line; // no separate diagnostic is tied to the PRENT line itself
    }

    fn check_unused_variables(&mut self) {
        let mut unused: Vec<(String, u32)> = self
            .known
            .iter()
            .filter(|(_, kv)| !kv.used)
            .map(|(name, kv)| (name.clone(), kv.decl_line))
            .collect();
        unused.sort();
        for (name, line) in unused {
            self.warning(format!("Unused variable '{}'", name), line);
        }
    }

    /// `EXPRESSION` / `TERM` / `FACTOR`: the three-layer folding evaluator.
    fn eval_expr(&mut self, expr: &Expr, in_prent: bool) -> SemValue {
        match expr {
            Expr::Literal(Literal::Int(v), _) => SemValue {
                ty: SemType::Int,
                is_constant: true,
                int_value: *v,
            },
            Expr::Literal(Literal::Char(v), _) => SemValue {
                ty: SemType::Char,
                is_constant: true,
                int_value: *v,
            },
            Expr::Identifier(name, line) => self.eval_identifier(name, *line),
            Expr::Binary { op, left, right, .. } => {
                let l = self.eval_expr(left, in_prent);
                let r = self.eval_expr(right, in_prent);
                self.eval_binary(*op, l, r, expr.line())
            }
            Expr::Unary { op, operand, .. } => {
                let v = self.eval_expr(operand, in_prent);
                match op {
                    UnaryOp::Pos => v,
                    UnaryOp::Neg => SemValue {
                        ty: v.ty,
                        is_constant: v.is_constant,
                        int_value: if v.is_constant { v.int_value.wrapping_neg() } else { 0 },
                    },
                }
            }
            Expr::Prefix { op, operand, line } => self.eval_prefix(*op, operand, *line),
            Expr::Postfix { op, operand, line } => self.eval_postfix(*op, operand, *line, in_prent),
        }
    }

    fn eval_identifier(&mut self, name: &str, line: u32) -> SemValue {
        if let Some(kv) = self.known.get_mut(name) {
            kv.used = true;
            if !kv.initialized {
                let ty = kv.temp.ty;
                self.error(format!("Use of uninitialized variable '{}'", name), line);
                return SemValue {
                    ty,
                    is_constant: false,
                    int_value: 0,
                };
            }
            SemValue {
                ty: kv.temp.ty,
                is_constant: kv.temp.is_constant,
                int_value: kv.temp.int_value,
            }
        } else {
            self.error(format!("Undeclared identifier '{}'", name), line);
            SemValue::unknown()
        }
    }

    fn eval_binary(&mut self, op: BinOp, l: SemValue, r: SemValue, line: u32) -> SemValue {
        let result_ty = combine_type(l.ty, r.ty);
        if op == BinOp::Div && r.is_constant && r.int_value == 0 {
            self.error("Division by zero", line);
            return SemValue {
                ty: result_ty,
                is_constant: true,
                int_value: 0,
            };
        }
        if l.is_constant && r.is_constant {
            SemValue {
                ty: result_ty,
                is_constant: true,
                int_value: apply_binop(op, l.int_value, r.int_value),
            }
        } else {
            SemValue {
                ty: result_ty,
                is_constant: false,
                int_value: 0,
            }
        }
    }

    fn eval_prefix(&mut self, op: IncDec, operand: &Expr, line: u32) -> SemValue {
        let name = match operand {
            Expr::Identifier(n, _) => n.clone(),
            _ => {
                self.error("Prefix operator requires an identifier operand", line);
                return SemValue::unknown();
            }
        };
        if !self.known.contains_key(&name) {
            self.error(format!("Undeclared identifier '{}'", name), line);
            return SemValue::unknown();
        }
        let kv = self.known.get_mut(&name).unwrap();
        kv.used = true;
        let base = if kv.initialized { kv.temp.int_value } else { 0 };
        let was_uninitialized = !kv.initialized;
        let new_value = base.wrapping_add(op.step());
        kv.initialized = true;
        kv.temp.is_constant = true;
        kv.temp.int_value = new_value;
        let ty = kv.temp.ty;
        if was_uninitialized {
            self.error(format!("Use of uninitialized variable '{}'", name), line);
        }
        if let Some(entry) = self.symbols.find_mut(&name) {
            entry.initialized = true;
            entry.value = new_value.to_string();
        }
        SemValue {
            ty,
            is_constant: true,
            int_value: new_value,
        }
    }

    /// Postfix is the one place the reference silently tolerates an
    /// uninitialized operand as 0 — but only when the postfix expression is
    /// being evaluated for a `PRENT` item. Outside of `PRENT` the same
    /// operand reports the usual uninitialized-use error. This asymmetry
    /// is intentional and must not be smoothed away by treating both cases
    /// the same.
    fn eval_postfix(&mut self, op: IncDec, operand: &Expr, line: u32, in_prent: bool) -> SemValue {
        let name = match operand {
            Expr::Identifier(n, _) => n.clone(),
            _ => {
                self.error("Postfix operator requires an identifier operand", line);
                return SemValue::unknown();
            }
        };
        if !self.known.contains_key(&name) {
            self.error(format!("Undeclared identifier '{}'", name), line);
            return SemValue::unknown();
        }
        let kv = self.known.get_mut(&name).unwrap();
        kv.used = true;
        let was_uninitialized = !kv.initialized;
        let old_value = if kv.initialized { kv.temp.int_value } else { 0 };
        let new_value = old_value.wrapping_add(op.step());
        kv.initialized = true;
        kv.temp.is_constant = true;
        kv.temp.int_value = new_value;
        let ty = kv.temp.ty;
        if was_uninitialized && !in_prent {
            self.error(format!("Use of uninitialized variable '{}'", name), line);
        }
        if let Some(entry) = self.symbols.find_mut(&name) {
            entry.initialized = true;
            entry.value = new_value.to_string();
        }
        SemValue {
            ty,
            is_constant: true,
            int_value: old_value,
        }
    }
}

/// `CHAR op CHAR` folds to `CHAR`; every other combination (including an
/// `UNKNOWN` operand from an earlier error) folds to `INT`.
fn combine_type(l: SemType, r: SemType) -> SemType {
    if l == SemType::Char && r == SemType::Char {
        SemType::Char
    } else {
        SemType::Int
    }
}

fn apply_binop(op: BinOp, l: i64, r: i64) -> i64 {
    match op {
        BinOp::Add => l.wrapping_add(r),
        BinOp::Sub => l.wrapping_sub(r),
        BinOp::Mul => l.wrapping_mul(r),
        BinOp::Div => {
            if r == 0 {
                0
            } else {
                l.wrapping_div(r)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, ParseOutcome};

    fn analyze_src(src: &str) -> AnalysisResult {
        match parse(src) {
            ParseOutcome::Ok(program) => analyze(&program),
            other => panic!("expected a parsed program, got a parse/lex failure: {:?}", matches!(other, ParseOutcome::Ok(_))),
        }
    }

    #[test]
    fn simple_print() {
        let r = analyze_src("ENTEGER a = 5; PRENT a;");
        assert_eq!(r.error_count, 0);
        assert_eq!(r.print_output.unwrap(), "5\n");
    }

    #[test]
    fn postfix_print_then_value() {
        let r = analyze_src("ENTEGER i = 3; PRENT i++; PRENT i;");
        assert_eq!(r.error_count, 0);
        assert_eq!(r.print_output.unwrap(), "3\n4\n");
    }

    #[test]
    fn prefix_print_then_value() {
        let r = analyze_src("ENTEGER i = 3; PRENT ++i; PRENT i;");
        assert_eq!(r.error_count, 0);
        assert_eq!(r.print_output.unwrap(), "4\n4\n");
    }

    #[test]
    fn char_promotion_on_explicit_charot() {
        let r = analyze_src("CHAROT c = 'A' + 1; PRENT c;");
        assert_eq!(r.error_count, 0);
        assert_eq!(r.print_output.unwrap(), "B\n");
    }

    #[test]
    fn redeclaration_is_a_single_error() {
        let r = analyze_src("ENTEGER x; ENTEGER x;");
        assert_eq!(r.error_count, 1);
        assert!(r.print_output.is_none());
        assert_eq!(
            r.diagnostics[0].to_string(),
            "[SEM ERROR] Redeclaration of variable 'x' [line:1]"
        );
    }

    #[test]
    fn division_by_zero_in_declaration_is_one_error() {
        let r = analyze_src("ENTEGER x = 10 / 0;");
        assert_eq!(r.error_count, 1);
        assert!(r.print_output.is_none());
    }

    #[test]
    fn unused_variable_is_a_warning_not_an_error() {
        let r = analyze_src("ENTEGER x;");
        assert_eq!(r.error_count, 0);
        assert_eq!(r.diagnostics.len(), 1);
        assert_eq!(r.diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn kuan_infers_type_from_first_assignment() {
        let r = analyze_src("KUAN x; x = 'A'; PRENT x;");
        assert_eq!(r.error_count, 0);
        assert_eq!(r.print_output.unwrap(), "A\n");
    }

    #[test]
    fn postfix_on_uninitialized_is_tolerated_only_inside_prent() {
        let r = analyze_src("ENTEGER x; PRENT x++;");
        assert_eq!(r.error_count, 0);
        assert_eq!(r.print_output.unwrap(), "0\n");

        let r2 = analyze_src("ENTEGER x; x++;");
        assert_eq!(r2.error_count, 1);
    }

    #[test]
    fn compound_assignment_to_uninitialized_is_an_error() {
        let r = analyze_src("ENTEGER x; x += 1;");
        assert_eq!(r.error_count, 1);
    }
}
