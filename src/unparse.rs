//! Canonical pretty-printer for the AST
//!
//! Re-emits a program as C-- surface syntax in a deterministic layout:
//! four spaces per nesting level, parentheses around every unary and
//! binary expression and around assignments in expression position, and a
//! blank line after each function or struct declaration.
//!
//! After name resolution every resolved identifier prints as
//! `spelling(symbol)`, e.g. `x(int)`, `f(int, bool->void)`, or
//! `Point(structdecl)`. Identifiers whose resolution failed print bare.
//! The unparsed form of an unresolved tree contains no annotations and
//! re-parses to an equal tree.

use crate::parser::ast::*;

/// Render `program` in canonical form.
pub fn unparse_program(program: &Program) -> String {
    let mut printer = Unparser { out: String::new() };
    for decl in &program.decls {
        printer.decl(decl, 0);
    }
    printer.out
}

struct Unparser {
    out: String,
}

impl Unparser {
    fn decl(&mut self, decl: &Decl, indent: usize) {
        match decl {
            Decl::Var(var) => self.var_decl(var, indent),
            Decl::Fn(func) => self.fn_decl(func, indent),
            Decl::Struct(s) => self.struct_decl(s, indent),
        }
    }

    fn var_decl(&mut self, decl: &VarDecl, indent: usize) {
        self.pad(indent);
        self.ty(&decl.ty);
        self.out.push(' ');
        self.id(&decl.id);
        self.out.push_str(";\n");
    }

    fn fn_decl(&mut self, decl: &FnDecl, indent: usize) {
        self.pad(indent);
        self.ty(&decl.ret);
        self.out.push(' ');
        self.id(&decl.id);
        self.out.push('(');
        for (i, formal) in decl.formals.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.ty(&formal.ty);
            self.out.push(' ');
            self.id(&formal.id);
        }
        self.out.push_str(") {\n");
        self.block(&decl.body, indent + 4);
        self.pad(indent);
        self.out.push_str("}\n\n");
    }

    fn struct_decl(&mut self, decl: &StructDecl, indent: usize) {
        self.pad(indent);
        self.out.push_str("struct ");
        self.id(&decl.id);
        self.out.push_str("{\n");
        for member in &decl.members {
            self.var_decl(member, indent + 4);
        }
        self.pad(indent);
        self.out.push_str("};\n\n");
    }

    fn ty(&mut self, ty: &Type) {
        match ty {
            Type::Int => self.out.push_str("int"),
            Type::Bool => self.out.push_str("bool"),
            Type::Void => self.out.push_str("void"),
            Type::Struct(id) => {
                self.out.push_str("struct ");
                self.id(id);
            }
        }
    }

    fn block(&mut self, block: &Block, indent: usize) {
        for decl in &block.decls {
            self.var_decl(decl, indent);
        }
        for stmt in &block.stmts {
            self.stmt(stmt, indent);
        }
    }

    fn stmt(&mut self, stmt: &Stmt, indent: usize) {
        match stmt {
            Stmt::Assign(assign) => {
                self.pad(indent);
                // A statement-position assignment drops the outer parens.
                self.assign(assign, false);
                self.out.push_str(";\n");
            }
            Stmt::PostInc(expr) => {
                self.pad(indent);
                self.expr(expr);
                self.out.push_str("++;\n");
            }
            Stmt::PostDec(expr) => {
                self.pad(indent);
                self.expr(expr);
                self.out.push_str("--;\n");
            }
            Stmt::Read(expr) => {
                self.pad(indent);
                self.out.push_str("cin >> ");
                self.expr(expr);
                self.out.push_str(";\n");
            }
            Stmt::Write(expr) => {
                self.pad(indent);
                self.out.push_str("cout << ");
                self.expr(expr);
                self.out.push_str(";\n");
            }
            Stmt::If(cond, body) => {
                self.pad(indent);
                self.out.push_str("if (");
                self.expr(cond);
                self.out.push_str(") {\n");
                self.block(body, indent + 4);
                self.pad(indent);
                self.out.push_str("}\n");
            }
            Stmt::IfElse(cond, then_body, else_body) => {
                self.pad(indent);
                self.out.push_str("if (");
                self.expr(cond);
                self.out.push_str(") {\n");
                self.block(then_body, indent + 4);
                self.pad(indent);
                self.out.push_str("}\n");
                self.pad(indent);
                self.out.push_str("else {\n");
                self.block(else_body, indent + 4);
                self.pad(indent);
                self.out.push_str("}\n");
            }
            Stmt::While(cond, body) => {
                self.pad(indent);
                self.out.push_str("while (");
                self.expr(cond);
                self.out.push_str(") {\n");
                self.block(body, indent + 4);
                self.pad(indent);
                self.out.push_str("}\n");
            }
            Stmt::Repeat(cond, body) => {
                self.pad(indent);
                self.out.push_str("repeat (");
                self.expr(cond);
                self.out.push_str(") {\n");
                self.block(body, indent + 4);
                self.pad(indent);
                self.out.push_str("}\n");
            }
            Stmt::Call(call) => {
                self.pad(indent);
                self.call(call);
                self.out.push_str(";\n");
            }
            Stmt::Return(value) => {
                self.pad(indent);
                self.out.push_str("return");
                if let Some(expr) = value {
                    self.out.push(' ');
                    self.expr(expr);
                }
                self.out.push_str(";\n");
            }
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::IntLit(value, _) => self.out.push_str(&value.to_string()),
            // The raw spelling already includes the quotes.
            Expr::StrLit(text, _) => self.out.push_str(text),
            Expr::True(_) => self.out.push_str("true"),
            Expr::False(_) => self.out.push_str("false"),
            Expr::Id(id) => self.id(id),
            Expr::Dot(loc, field) => {
                self.out.push('(');
                self.expr(loc);
                self.out.push_str(").");
                self.id(field);
            }
            Expr::Assign(assign) => self.assign(assign, true),
            Expr::Call(call) => self.call(call),
            Expr::Unary(op, operand) => {
                self.out.push('(');
                self.out.push_str(match op {
                    UnOp::Neg => "-",
                    UnOp::Not => "!",
                });
                self.expr(operand);
                self.out.push(')');
            }
            Expr::Binary(op, left, right) => {
                self.out.push('(');
                self.expr(left);
                self.out.push(' ');
                self.out.push_str(bin_op_str(*op));
                self.out.push(' ');
                self.expr(right);
                self.out.push(')');
            }
        }
    }

    fn assign(&mut self, assign: &AssignExpr, parens: bool) {
        if parens {
            self.out.push('(');
        }
        self.expr(&assign.lhs);
        self.out.push_str(" = ");
        self.expr(&assign.rhs);
        if parens {
            self.out.push(')');
        }
    }

    fn call(&mut self, call: &CallExpr) {
        self.id(&call.id);
        self.out.push('(');
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(arg);
        }
        self.out.push(')');
    }

    fn id(&mut self, id: &Id) {
        self.out.push_str(&id.name);
        if let Some(sym) = &id.sym {
            self.out.push('(');
            self.out.push_str(&sym.to_string());
            self.out.push(')');
        }
    }

    fn pad(&mut self, indent: usize) {
        for _ in 0..indent {
            self.out.push(' ');
        }
    }
}

fn bin_op_str(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::And => "&&",
        BinOp::Or => "||",
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
        BinOp::Lt => "<",
        BinOp::Le => "<=",
        BinOp::Gt => ">",
        BinOp::Ge => ">=",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Diagnostics;
    use crate::parser::lexer::Lexer;
    use crate::parser::parser::Parser;

    fn unparse(source: &str) -> String {
        let mut diag = Diagnostics::quiet();
        let tokens = Lexer::new(source).tokenize(&mut diag);
        let program = Parser::new(tokens, &mut diag).parse_program().unwrap();
        assert!(diag.lines().is_empty(), "diagnostics: {:?}", diag.lines());
        unparse_program(&program)
    }

    #[test]
    fn test_var_decl() {
        assert_eq!(unparse("int   x ;"), "int x;\n");
        assert_eq!(unparse("struct Point p;"), "struct Point p;\n");
    }

    #[test]
    fn test_struct_decl_layout() {
        assert_eq!(
            unparse("struct Point { int x; int y; };"),
            "struct Point{\n    int x;\n    int y;\n};\n\n"
        );
    }

    #[test]
    fn test_function_layout_and_indentation() {
        let text = unparse("void f(int a, bool b) { int x; if (a < 1) { x = a; } }");
        assert_eq!(
            text,
            "void f(int a, bool b) {\n\
             \x20   int x;\n\
             \x20   if ((a < 1)) {\n\
             \x20       x = a;\n\
             \x20   }\n\
             }\n\n"
        );
    }

    #[test]
    fn test_expression_parenthesization() {
        let text = unparse("void f() { int x; x = 1 + 2 * -3; cout << (x = 4); }");
        assert!(text.contains("x = (1 + (2 * (-3)));\n"));
        assert!(text.contains("cout << (x = 4);\n"));
    }

    #[test]
    fn test_dot_access_form() {
        let text = unparse("void f() { struct S s; s.a.b = 1; }");
        assert!(text.contains("((s).a).b = 1;\n"));
    }

    #[test]
    fn test_unparse_is_a_fixed_point() {
        let source = "struct Point { int x; int y; };\n\
                      int g;\n\
                      void f(int a) {\n\
                      struct Point p;\n\
                      p.x = a * 2;\n\
                      p.x++;\n\
                      if (a < 10) { cout << \"small\\n\"; } else { cout << p.x; }\n\
                      while (a > 0) { a--; }\n\
                      repeat (3) { cin >> p.y; }\n\
                      return;\n\
                      }\n";
        let once = unparse(source);
        let twice = unparse(&once);
        assert_eq!(once, twice);
    }
}
