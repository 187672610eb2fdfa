//! Recursive descent parser for C--
//!
//! Realizes the language's LALR(1) grammar with one method per precedence
//! level. The lattice, lowest binding first:
//!
//! 1. `=` (right associative; the left side must be a `loc`)
//! 2. `||` `&&` (one level, left associative)
//! 3. `==` `!=` `<` `>` `<=` `>=` (non-associative)
//! 4. `+` `-` (left)
//! 5. `*` `/` (left)
//! 6. `!`, unary `-` (prefix)
//! 7. `.` (left; a dot chain roots at an identifier or at a parenthesized
//!    `loc` — the form the unparser prints for a dot-access left side)
//!
//! Parsing stops at the first syntax error: the parser reports
//! `Syntax error` (or `Syntax error at end of file`) at the offending token
//! through the diagnostic sink and returns [`ParseError`].

use crate::diag::Diagnostics;
use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use thiserror::Error;

/// Position of the token where parsing stopped. The diagnostic itself has
/// already been emitted when this value is constructed.
#[derive(Debug, Clone, Copy, Error)]
#[error("syntax error at {line}:{column}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
}

/// Recursive descent parser over the token stream.
pub struct Parser<'d> {
    tokens: Vec<Token>,
    position: usize,
    diag: &'d mut Diagnostics,
}

impl<'d> Parser<'d> {
    /// Create a parser for a token stream ending in [`TokenKind::Eof`].
    pub fn new(tokens: Vec<Token>, diag: &'d mut Diagnostics) -> Self {
        Self {
            tokens,
            position: 0,
            diag,
        }
    }

    /// Parse the entire program (top-level declarations).
    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut program = Program::default();

        while !self.is_at_end() {
            program.decls.push(self.parse_decl()?);
        }

        Ok(program)
    }

    /// Parse a top-level declaration (variable, function, or struct).
    fn parse_decl(&mut self) -> Result<Decl, ParseError> {
        match self.peek().kind {
            // `struct S { ... };` declares a type; `struct S x;` a variable.
            TokenKind::Struct => {
                if matches!(
                    self.peek_ahead(2).map(|t| &t.kind),
                    Some(TokenKind::LBrace)
                ) {
                    self.parse_struct_decl()
                } else {
                    Ok(Decl::Var(self.parse_var_decl()?))
                }
            }
            TokenKind::Int | TokenKind::Bool | TokenKind::Void => {
                let ty = self.parse_base_type()?;
                let id = self.expect_identifier()?;
                match self.peek().kind {
                    TokenKind::Semicolon => {
                        self.advance();
                        Ok(Decl::Var(VarDecl { ty, id }))
                    }
                    TokenKind::LParen => self.parse_fn_decl(ty, id),
                    _ => Err(self.syntax_error()),
                }
            }
            _ => Err(self.syntax_error()),
        }
    }

    /// Parse a struct declaration: `struct Name { varDecl+ };`
    fn parse_struct_decl(&mut self) -> Result<Decl, ParseError> {
        self.advance(); // 'struct'
        let id = self.expect_identifier()?;
        self.expect(&TokenKind::LBrace)?;

        let mut members = Vec::new();
        while self.is_type_keyword() {
            members.push(self.parse_var_decl()?);
        }
        // The grammar requires at least one member.
        if members.is_empty() {
            return Err(self.syntax_error());
        }

        self.expect(&TokenKind::RBrace)?;
        self.expect(&TokenKind::Semicolon)?;

        Ok(Decl::Struct(StructDecl { id, members }))
    }

    /// Parse a variable declaration: `type id ;` or `struct id id ;`
    fn parse_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let ty = if self.match_token(&TokenKind::Struct) {
            Type::Struct(self.expect_identifier()?)
        } else {
            self.parse_base_type()?
        };
        let id = self.expect_identifier()?;
        self.expect(&TokenKind::Semicolon)?;

        Ok(VarDecl { ty, id })
    }

    /// Parse a function declaration after its return type and name:
    /// `( formals ) { varDeclList stmtList }`
    fn parse_fn_decl(&mut self, ret: Type, id: Id) -> Result<Decl, ParseError> {
        self.advance(); // '('

        let mut formals = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let ty = self.parse_base_type()?;
                let formal_id = self.expect_identifier()?;
                formals.push(FormalDecl { ty, id: formal_id });

                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;

        self.expect(&TokenKind::LBrace)?;
        let body = self.parse_block()?;
        self.expect(&TokenKind::RBrace)?;

        Ok(Decl::Fn(FnDecl {
            ret,
            id,
            formals,
            body,
        }))
    }

    /// Parse `int`, `bool`, or `void`.
    fn parse_base_type(&mut self) -> Result<Type, ParseError> {
        let ty = match self.peek().kind {
            TokenKind::Int => Type::Int,
            TokenKind::Bool => Type::Bool,
            TokenKind::Void => Type::Void,
            _ => return Err(self.syntax_error()),
        };
        self.advance();
        Ok(ty)
    }

    /// Parse the contents of a brace block: declarations first, then
    /// statements. The braces themselves belong to the caller.
    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let mut decls = Vec::new();
        while self.is_type_keyword() {
            decls.push(self.parse_var_decl()?);
        }

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.parse_stmt()?);
        }

        Ok(Block { decls, stmts })
    }

    /// Parse a statement.
    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.peek().kind {
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => {
                self.advance();
                let (cond, body) = self.parse_guarded_block()?;
                Ok(Stmt::While(cond, body))
            }
            TokenKind::Repeat => {
                self.advance();
                let (cond, body) = self.parse_guarded_block()?;
                Ok(Stmt::Repeat(cond, body))
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect(&TokenKind::Semicolon)?;
                Ok(Stmt::Return(value))
            }
            TokenKind::Cin => {
                self.advance();
                self.expect(&TokenKind::GtGt)?;
                let target = self.parse_loc()?;
                self.expect(&TokenKind::Semicolon)?;
                Ok(Stmt::Read(target))
            }
            TokenKind::Cout => {
                self.advance();
                self.expect(&TokenKind::LtLt)?;
                let value = self.parse_expression()?;
                self.expect(&TokenKind::Semicolon)?;
                Ok(Stmt::Write(value))
            }
            TokenKind::Ident(_) | TokenKind::LParen => self.parse_loc_stmt(),
            _ => Err(self.syntax_error()),
        }
    }

    /// Parse `if ( exp ) { ... }` with an optional `else { ... }`.
    fn parse_if_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.advance(); // 'if'
        let (cond, then_block) = self.parse_guarded_block()?;

        if self.match_token(&TokenKind::Else) {
            self.expect(&TokenKind::LBrace)?;
            let else_block = self.parse_block()?;
            self.expect(&TokenKind::RBrace)?;
            Ok(Stmt::IfElse(cond, then_block, else_block))
        } else {
            Ok(Stmt::If(cond, then_block))
        }
    }

    /// Parse `( exp ) { varDeclList stmtList }` shared by `if`, `while`,
    /// and `repeat`.
    fn parse_guarded_block(&mut self) -> Result<(Expr, Block), ParseError> {
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::LBrace)?;
        let block = self.parse_block()?;
        self.expect(&TokenKind::RBrace)?;
        Ok((cond, block))
    }

    /// Parse a statement that begins with an identifier: assignment,
    /// post-increment/decrement, or a call.
    fn parse_loc_stmt(&mut self) -> Result<Stmt, ParseError> {
        let lhs = self.parse_loc()?;

        match self.peek().kind {
            TokenKind::PlusPlus => {
                self.advance();
                self.expect(&TokenKind::Semicolon)?;
                Ok(Stmt::PostInc(lhs))
            }
            TokenKind::MinusMinus => {
                self.advance();
                self.expect(&TokenKind::Semicolon)?;
                Ok(Stmt::PostDec(lhs))
            }
            TokenKind::Eq => {
                self.advance();
                let rhs = self.parse_expression()?;
                self.expect(&TokenKind::Semicolon)?;
                Ok(Stmt::Assign(AssignExpr { lhs, rhs }))
            }
            TokenKind::LParen => {
                // Only a plain identifier can be called.
                let id = match lhs {
                    Expr::Id(id) => id,
                    _ => return Err(self.syntax_error()),
                };
                self.advance();
                let args = self.parse_actuals()?;
                self.expect(&TokenKind::RParen)?;
                self.expect(&TokenKind::Semicolon)?;
                Ok(Stmt::Call(CallExpr { id, args }))
            }
            _ => Err(self.syntax_error()),
        }
    }

    // ===== Expressions =====

    /// Parse an expression. Assignment is the loosest level and is
    /// right-associative; its left side must be a `loc`, never a
    /// parenthesized expression (`(x) = 1` is a syntax error).
    ///
    /// A `loc` is parsed speculatively first; if no `=` follows, the
    /// position is restored and the operator levels take over.
    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        if matches!(self.peek().kind, TokenKind::Ident(_) | TokenKind::LParen) {
            let saved_pos = self.position;
            if let Some(lhs) = self.try_parse_loc() {
                if self.match_token(&TokenKind::Eq) {
                    let rhs = self.parse_expression()?;
                    return Ok(Expr::Assign(Box::new(AssignExpr { lhs, rhs })));
                }
            }
            self.position = saved_pos;
        }

        self.parse_logical()
    }

    /// Parse `||` and `&&`. The two share a single precedence level and
    /// associate to the left, so `a || b && c` is `(a || b) && c`.
    fn parse_logical(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::OrOr => BinOp::Or,
                TokenKind::AndAnd => BinOp::And,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    /// Parse the comparison level (`== != < > <= >=`). These operators are
    /// non-associative: a second comparison at the same level is a syntax
    /// error at that operator.
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_additive()?;

        if let Some(op) = comparison_op(&self.peek().kind) {
            self.advance();
            let right = self.parse_additive()?;
            if comparison_op(&self.peek().kind).is_some() {
                return Err(self.syntax_error());
            }
            return Ok(Expr::Binary(op, Box::new(left), Box::new(right)));
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    /// Parse multiplicative (* /)
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    /// Parse prefix `!` and unary `-`.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match self.peek().kind {
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expr::Unary(UnOp::Neg, Box::new(operand)))
            }
            TokenKind::Bang => {
                self.advance();
                let operand = self.parse_unary()?;
                Ok(Expr::Unary(UnOp::Not, Box::new(operand)))
            }
            _ => self.parse_term(),
        }
    }

    /// Parse a term: literal, parenthesized expression, call, or loc.
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let loc = self.peek().loc;

        match &self.peek().kind {
            TokenKind::IntLiteral(value) => {
                let value = *value;
                self.advance();
                Ok(Expr::IntLit(value, loc))
            }
            TokenKind::StringLiteral(text) => {
                let text = text.clone();
                self.advance();
                Ok(Expr::StrLit(text, loc))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::True(loc))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::False(loc))
            }
            TokenKind::LParen => {
                self.advance();
                let mut expr = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                // The canonical form parenthesizes the left side of a
                // dot-access, so a dot may continue a parenthesized loc.
                if self.check(&TokenKind::Dot) {
                    if !is_loc(&expr) {
                        return Err(self.syntax_error());
                    }
                    while self.match_token(&TokenKind::Dot) {
                        let field = self.expect_identifier()?;
                        expr = Expr::Dot(Box::new(expr), field);
                    }
                }
                Ok(expr)
            }
            TokenKind::Ident(_) => {
                if matches!(
                    self.peek_ahead(1).map(|t| &t.kind),
                    Some(TokenKind::LParen)
                ) {
                    let id = self.expect_identifier()?;
                    self.advance(); // '('
                    let args = self.parse_actuals()?;
                    self.expect(&TokenKind::RParen)?;
                    Ok(Expr::Call(CallExpr { id, args }))
                } else {
                    self.parse_loc()
                }
            }
            _ => Err(self.syntax_error()),
        }
    }

    /// Parse a `loc`: an identifier optionally followed by `.field`
    /// accesses. Dot binds tightest and associates to the left.
    ///
    /// The head may also be a parenthesized `loc` — the form the unparser
    /// prints for a dot-access left side — but only when a `.` follows:
    /// `(p).x` is a loc, `(p)` on its own is a plain expression.
    fn parse_loc(&mut self) -> Result<Expr, ParseError> {
        let mut expr = if self.check(&TokenKind::LParen) {
            self.advance();
            let inner = self.parse_loc()?;
            self.expect(&TokenKind::RParen)?;
            if !self.check(&TokenKind::Dot) {
                return Err(self.syntax_error());
            }
            inner
        } else {
            Expr::Id(self.expect_identifier()?)
        };

        while self.match_token(&TokenKind::Dot) {
            let field = self.expect_identifier()?;
            expr = Expr::Dot(Box::new(expr), field);
        }

        Ok(expr)
    }

    /// Speculative version of [`Parser::parse_loc`]: consumes a `loc` and
    /// returns it, or returns `None` without emitting a diagnostic. The
    /// caller restores the saved position on failure.
    fn try_parse_loc(&mut self) -> Option<Expr> {
        let mut expr = if self.check(&TokenKind::LParen) {
            self.advance();
            let inner = self.try_parse_loc()?;
            if !self.match_token(&TokenKind::RParen) {
                return None;
            }
            if !self.check(&TokenKind::Dot) {
                return None;
            }
            inner
        } else if let TokenKind::Ident(name) = &self.peek().kind {
            let id = Id::new(name.clone(), self.peek().loc);
            self.advance();
            Expr::Id(id)
        } else {
            return None;
        };

        while self.match_token(&TokenKind::Dot) {
            if let TokenKind::Ident(name) = &self.peek().kind {
                let field = Id::new(name.clone(), self.peek().loc);
                self.advance();
                expr = Expr::Dot(Box::new(expr), field);
            } else {
                return None;
            }
        }

        Some(expr)
    }

    /// Parse a comma-separated actual list; the parentheses belong to the
    /// caller.
    fn parse_actuals(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(args)
    }

    // ===== Helper methods =====

    fn is_type_keyword(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Int | TokenKind::Bool | TokenKind::Void | TokenKind::Struct
        )
    }

    /// Report `Syntax error` at the current token and build the
    /// corresponding [`ParseError`].
    fn syntax_error(&mut self) -> ParseError {
        let token = self.peek();
        let loc = token.loc;
        let msg = if matches!(token.kind, TokenKind::Eof) {
            "Syntax error at end of file"
        } else {
            "Syntax error"
        };
        self.diag.fatal(loc.line, loc.column, msg);
        ParseError {
            line: loc.line,
            column: loc.column,
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.match_token(kind) {
            Ok(())
        } else {
            Err(self.syntax_error())
        }
    }

    fn expect_identifier(&mut self) -> Result<Id, ParseError> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            let id = Id::new(name.clone(), self.peek().loc);
            self.advance();
            Ok(id)
        } else {
            Err(self.syntax_error())
        }
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }
}

fn is_loc(expr: &Expr) -> bool {
    matches!(expr, Expr::Id(_) | Expr::Dot(..))
}

fn comparison_op(kind: &TokenKind) -> Option<BinOp> {
    match kind {
        TokenKind::EqEq => Some(BinOp::Eq),
        TokenKind::NotEq => Some(BinOp::Ne),
        TokenKind::Lt => Some(BinOp::Lt),
        TokenKind::Le => Some(BinOp::Le),
        TokenKind::Gt => Some(BinOp::Gt),
        TokenKind::Ge => Some(BinOp::Ge),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn parse(source: &str) -> (Result<Program, ParseError>, Diagnostics) {
        let mut diag = Diagnostics::quiet();
        let tokens = Lexer::new(source).tokenize(&mut diag);
        let result = Parser::new(tokens, &mut diag).parse_program();
        (result, diag)
    }

    fn parse_ok(source: &str) -> Program {
        let (result, diag) = parse(source);
        assert!(diag.lines().is_empty(), "diagnostics: {:?}", diag.lines());
        result.unwrap()
    }

    #[test]
    fn test_parse_var_decls() {
        let program = parse_ok("int x;\nbool b;\nstruct Point p;");

        assert_eq!(program.decls.len(), 3);
        match &program.decls[2] {
            Decl::Var(v) => {
                assert!(matches!(&v.ty, Type::Struct(id) if id.name == "Point"));
                assert_eq!(v.id.name, "p");
            }
            _ => panic!("Expected variable declaration"),
        }
    }

    #[test]
    fn test_parse_function() {
        let program = parse_ok("void f(int a, bool b) { int x; x = a; }");

        match &program.decls[0] {
            Decl::Fn(f) => {
                assert_eq!(f.id.name, "f");
                assert_eq!(f.ret, Type::Void);
                assert_eq!(f.formals.len(), 2);
                assert_eq!(f.body.decls.len(), 1);
                assert_eq!(f.body.stmts.len(), 1);
            }
            _ => panic!("Expected function declaration"),
        }
    }

    #[test]
    fn test_parse_struct_decl() {
        let program = parse_ok("struct Point { int x; int y; };");

        match &program.decls[0] {
            Decl::Struct(s) => {
                assert_eq!(s.id.name, "Point");
                assert_eq!(s.members.len(), 2);
            }
            _ => panic!("Expected struct declaration"),
        }
    }

    #[test]
    fn test_empty_struct_body_is_an_error() {
        let (result, diag) = parse("struct S { };");

        assert!(result.is_err());
        assert_eq!(diag.lines(), &["1:12 ***ERROR*** Syntax error"]);
    }

    #[test]
    fn test_statement_forms() {
        let program = parse_ok(
            "void f() {\n\
             int i;\n\
             i = 0;\n\
             i++;\n\
             i--;\n\
             cin >> i;\n\
             cout << (i + 1);\n\
             if (i < 10) { i = 1; }\n\
             if (true) { i = 1; } else { i = 2; }\n\
             while (i > 0) { i--; }\n\
             repeat (3) { i++; }\n\
             f();\n\
             return i;\n\
             }",
        );

        let body = match &program.decls[0] {
            Decl::Fn(f) => &f.body,
            _ => panic!("Expected function"),
        };
        assert_eq!(body.stmts.len(), 11);
        assert!(matches!(body.stmts[5], Stmt::If(..)));
        assert!(matches!(body.stmts[6], Stmt::IfElse(..)));
        assert!(matches!(body.stmts[9], Stmt::Call(_)));
        assert!(matches!(body.stmts[10], Stmt::Return(Some(_))));
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let program = parse_ok("void f() { int x; x = 1 + 2 * 3; }");

        let rhs = match &program.decls[0] {
            Decl::Fn(f) => match &f.body.stmts[0] {
                Stmt::Assign(a) => &a.rhs,
                _ => panic!("Expected assignment"),
            },
            _ => panic!("Expected function"),
        };
        // 1 + (2 * 3)
        match rhs {
            Expr::Binary(BinOp::Add, _, right) => {
                assert!(matches!(**right, Expr::Binary(BinOp::Mul, _, _)));
            }
            other => panic!("Expected addition at the top, got {:?}", other),
        }
    }

    #[test]
    fn test_or_and_and_share_a_level() {
        let program = parse_ok("void f() { bool b; b = true || false && true; }");

        let rhs = match &program.decls[0] {
            Decl::Fn(f) => match &f.body.stmts[0] {
                Stmt::Assign(a) => &a.rhs,
                _ => panic!("Expected assignment"),
            },
            _ => panic!("Expected function"),
        };
        // Left associative at one level: (true || false) && true
        match rhs {
            Expr::Binary(BinOp::And, left, _) => {
                assert!(matches!(**left, Expr::Binary(BinOp::Or, _, _)));
            }
            other => panic!("Expected && at the top, got {:?}", other),
        }
    }

    #[test]
    fn test_comparisons_are_non_associative() {
        let (result, diag) = parse("void f() { bool b; b = 1 < 2 < 3; }");

        assert!(result.is_err());
        assert_eq!(diag.lines(), &["1:30 ***ERROR*** Syntax error"]);
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let program = parse_ok("void f() { int x; int y; x = y = 5; }");

        match &program.decls[0] {
            Decl::Fn(f) => match &f.body.stmts[0] {
                Stmt::Assign(a) => {
                    assert!(matches!(a.lhs, Expr::Id(_)));
                    assert!(matches!(a.rhs, Expr::Assign(_)));
                }
                _ => panic!("Expected assignment"),
            },
            _ => panic!("Expected function"),
        }
    }

    #[test]
    fn test_assignment_target_must_be_a_loc() {
        let (result, diag) = parse("void f() { int x; x = (x + 1) = 2; }");

        assert!(result.is_err());
        assert!(diag.lines()[0].ends_with("***ERROR*** Syntax error"));
    }

    #[test]
    fn test_dot_chains() {
        let program = parse_ok("void f() { struct S s; s.a.b = 1; }");

        match &program.decls[0] {
            Decl::Fn(f) => match &f.body.stmts[0] {
                Stmt::Assign(a) => match &a.lhs {
                    Expr::Dot(inner, field) => {
                        assert_eq!(field.name, "b");
                        assert!(matches!(**inner, Expr::Dot(..)));
                    }
                    other => panic!("Expected dot access, got {:?}", other),
                },
                _ => panic!("Expected assignment"),
            },
            _ => panic!("Expected function"),
        }
    }

    #[test]
    fn test_parenthesized_loc_heads_a_dot_chain() {
        // The canonical unparsed form of a dot-access.
        let program = parse_ok("void f() { struct S p; (p).x = (p).y; ((p).a).b = 1; }");

        match &program.decls[0] {
            Decl::Fn(f) => {
                match &f.body.stmts[0] {
                    Stmt::Assign(a) => {
                        assert!(matches!(&a.lhs, Expr::Dot(base, field)
                            if matches!(**base, Expr::Id(_)) && field.name == "x"));
                        assert!(matches!(&a.rhs, Expr::Dot(..)));
                    }
                    other => panic!("Expected assignment, got {:?}", other),
                }
                match &f.body.stmts[1] {
                    Stmt::Assign(a) => {
                        assert!(matches!(&a.lhs, Expr::Dot(base, field)
                            if matches!(**base, Expr::Dot(..)) && field.name == "b"));
                    }
                    other => panic!("Expected assignment, got {:?}", other),
                }
            }
            _ => panic!("Expected function"),
        }
    }

    #[test]
    fn test_dot_after_parenthesized_non_loc_is_an_error() {
        let (result, diag) = parse("void f() { int x; x = (x + 1).y; }");

        assert!(result.is_err());
        assert_eq!(diag.lines(), &["1:30 ***ERROR*** Syntax error"]);
    }

    #[test]
    fn test_parenthesized_identifier_is_not_an_assignment_target() {
        // In statement position,
        let (result, _) = parse("void f() { int x; (x) = 1; }");
        assert!(result.is_err());

        // and in expression position.
        let (result, diag) = parse("void f() { int x; cout << ((x) = 1); }");
        assert!(result.is_err());
        assert!(diag.lines()[0].ends_with("***ERROR*** Syntax error"));
    }

    #[test]
    fn test_call_expression_and_statement() {
        let program = parse_ok("void f(int a) { int x; x = g(1, x + 2); g(); }");

        match &program.decls[0] {
            Decl::Fn(f) => {
                match &f.body.stmts[0] {
                    Stmt::Assign(a) => match &a.rhs {
                        Expr::Call(call) => {
                            assert_eq!(call.id.name, "g");
                            assert_eq!(call.args.len(), 2);
                        }
                        other => panic!("Expected call, got {:?}", other),
                    },
                    _ => panic!("Expected assignment"),
                }
                assert!(matches!(&f.body.stmts[1], Stmt::Call(c) if c.args.is_empty()));
            }
            _ => panic!("Expected function"),
        }
    }

    #[test]
    fn test_reserved_word_as_identifier_is_a_syntax_error() {
        let (result, diag) = parse("int int;");

        assert!(result.is_err());
        assert_eq!(diag.lines(), &["1:5 ***ERROR*** Syntax error"]);
    }

    #[test]
    fn test_syntax_error_at_end_of_file() {
        let (result, diag) = parse("int x");

        assert!(result.is_err());
        assert_eq!(diag.lines(), &["1:6 ***ERROR*** Syntax error at end of file"]);
    }

    #[test]
    fn test_error_position_is_the_offending_token() {
        let (result, diag) = parse("int x;\nint 5;");

        assert!(result.is_err());
        assert_eq!(diag.lines(), &["2:5 ***ERROR*** Syntax error"]);
    }

    #[test]
    fn test_declarations_must_precede_statements_in_a_block() {
        let (result, _) = parse("void f() { x = 1; int x; }");
        assert!(result.is_err());
    }
}
