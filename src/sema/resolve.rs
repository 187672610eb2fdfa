//! Name resolution pass
//!
//! A single post-order walk over the AST that installs declarations,
//! resolves identifier uses, and links each occurrence to its symbol.
//! Resolution errors are recovered locally: the offending node keeps its
//! `None` annotation, the error goes to the diagnostic sink, and the walk
//! continues, so one compile surfaces every name error.
//!
//! Struct declarations do not use the scope stack for their members.
//! Each struct gets an arena slot ([`StructInfo`]) holding a dedicated
//! single-scope member table that persists for the life of the program,
//! because later dot-access expressions consult it.

use crate::diag::Diagnostics;
use crate::parser::ast::*;
use crate::sema::symbol::{StructId, Sym, SymKind, SymTable, SymTableError};

/// Member scope of one declared struct.
#[derive(Debug)]
pub struct StructInfo {
    pub name: String,
    pub members: SymTable,
}

/// Arena of struct declarations, indexed by [`StructId`].
///
/// Symbols and identifier nodes reference entries by index, which keeps
/// the symbol ↔ declaration cycle free of ownership.
#[derive(Debug, Default)]
pub struct StructArena {
    infos: Vec<StructInfo>,
}

impl StructArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, name: String) -> StructId {
        let id = StructId(self.infos.len());
        self.infos.push(StructInfo {
            name,
            members: SymTable::new(),
        });
        id
    }

    pub fn get(&self, id: StructId) -> &StructInfo {
        &self.infos[id.0]
    }

    fn get_mut(&mut self, id: StructId) -> &mut StructInfo {
        &mut self.infos[id.0]
    }
}

/// Resolve every name in `program`, reporting errors to `diag`.
///
/// The AST is annotated in place; the returned arena owns the member
/// tables that the annotations refer to.
pub fn resolve_program(program: &mut Program, diag: &mut Diagnostics) -> StructArena {
    let mut resolver = Resolver {
        table: SymTable::new(),
        structs: StructArena::new(),
        diag,
    };

    for decl in &mut program.decls {
        resolver.resolve_decl(decl);
    }

    resolver.structs
}

struct Resolver<'d> {
    table: SymTable,
    structs: StructArena,
    diag: &'d mut Diagnostics,
}

impl Resolver<'_> {
    fn resolve_decl(&mut self, decl: &mut Decl) {
        match decl {
            Decl::Var(var) => self.resolve_var_decl(var, None),
            Decl::Fn(func) => self.resolve_fn_decl(func),
            Decl::Struct(s) => self.resolve_struct_decl(s),
        }
    }

    /// Install a variable declaration, either into the current scope or,
    /// for struct members, into the owning struct's member table.
    fn resolve_var_decl(&mut self, decl: &mut VarDecl, member_of: Option<StructId>) {
        match &decl.ty {
            Type::Void => {
                self.diag.fatal(
                    decl.id.loc.line,
                    decl.id.loc.column,
                    "Non-function declared void",
                );
            }
            Type::Struct(ty_id) => {
                // The type name must resolve to a declared struct before
                // the variable itself is considered.
                let target = match self.table.lookup_global(&ty_id.name) {
                    Ok(Some(sym)) if matches!(sym.kind, SymKind::Struct) => sym.struct_decl,
                    Ok(_) => {
                        self.diag.fatal(
                            ty_id.loc.line,
                            ty_id.loc.column,
                            "Invalid name of struct type",
                        );
                        return;
                    }
                    Err(_) => return,
                };

                let mut sym = Sym::var(&ty_id.name);
                sym.struct_decl = target;
                if self.install(&mut decl.id, sym, member_of) {
                    decl.id.struct_decl = target;
                }
            }
            _ => {
                let sym = Sym::var(decl.ty.spelling());
                self.install(&mut decl.id, sym, member_of);
            }
        }
    }

    fn resolve_fn_decl(&mut self, decl: &mut FnDecl) {
        let params: Vec<String> = decl
            .formals
            .iter()
            .map(|f| f.ty.spelling().to_string())
            .collect();
        let sym = Sym::func(decl.ret.spelling(), params);
        // A duplicate function name is reported, but the body is still
        // resolved in its own scope.
        self.install(&mut decl.id, sym, None);

        self.table.push_scope();
        for formal in &mut decl.formals {
            self.resolve_formal(formal);
        }
        // The body shares the formals' scope.
        for var in &mut decl.body.decls {
            self.resolve_var_decl(var, None);
        }
        for stmt in &mut decl.body.stmts {
            self.resolve_stmt(stmt);
        }
        let _ = self.table.pop_scope();
    }

    fn resolve_formal(&mut self, formal: &mut FormalDecl) {
        let sym = Sym::var(formal.ty.spelling());
        self.install(&mut formal.id, sym, None);
    }

    fn resolve_struct_decl(&mut self, decl: &mut StructDecl) {
        let sid = self.structs.alloc(decl.id.name.clone());
        let sym = Sym::struct_type(sid);

        match self.table.add(&decl.id.name, sym.clone()) {
            Ok(()) => {
                decl.id.sym = Some(sym);
                decl.id.struct_decl = Some(sid);
            }
            Err(SymTableError::Duplicate) => {
                self.diag.fatal(
                    decl.id.loc.line,
                    decl.id.loc.column,
                    "Multiply declared identifier",
                );
                // Members of a redeclared struct are not processed.
                return;
            }
            Err(_) => return,
        }

        // Members go into the struct's own table; struct-typed members
        // still resolve their type name against the enclosing scope, so a
        // struct type must be declared before it is used.
        for member in &mut decl.members {
            self.resolve_var_decl(member, Some(sid));
        }
    }

    fn resolve_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Assign(assign) => {
                self.resolve_expr(&mut assign.lhs);
                self.resolve_expr(&mut assign.rhs);
            }
            Stmt::PostInc(expr)
            | Stmt::PostDec(expr)
            | Stmt::Read(expr)
            | Stmt::Write(expr) => self.resolve_expr(expr),
            Stmt::If(cond, body) => {
                self.resolve_expr(cond);
                self.resolve_block(body);
            }
            Stmt::IfElse(cond, then_body, else_body) => {
                self.resolve_expr(cond);
                self.resolve_block(then_body);
                self.resolve_block(else_body);
            }
            Stmt::While(cond, body) | Stmt::Repeat(cond, body) => {
                self.resolve_expr(cond);
                self.resolve_block(body);
            }
            Stmt::Call(call) => self.resolve_call(call),
            Stmt::Return(value) => {
                if let Some(expr) = value {
                    self.resolve_expr(expr);
                }
            }
        }
    }

    /// Resolve a guarded block body in a scope of its own. The guard
    /// expression has already been resolved in the enclosing scope.
    fn resolve_block(&mut self, block: &mut Block) {
        self.table.push_scope();
        for var in &mut block.decls {
            self.resolve_var_decl(var, None);
        }
        for stmt in &mut block.stmts {
            self.resolve_stmt(stmt);
        }
        let _ = self.table.pop_scope();
    }

    fn resolve_expr(&mut self, expr: &mut Expr) {
        match expr {
            Expr::IntLit(..) | Expr::StrLit(..) | Expr::True(_) | Expr::False(_) => {}
            Expr::Id(id) => self.resolve_id_use(id),
            Expr::Dot(loc, field) => {
                self.resolve_expr(loc);

                if let Some(sid) = self.chain_struct(loc) {
                    let found = self
                        .structs
                        .get(sid)
                        .members
                        .lookup_global(&field.name)
                        .ok()
                        .flatten()
                        .cloned();
                    match found {
                        Some(sym) => field.sym = Some(sym),
                        None => self.diag.fatal(
                            field.loc.line,
                            field.loc.column,
                            "Invalid struct field name",
                        ),
                    }
                }
            }
            Expr::Assign(assign) => {
                self.resolve_expr(&mut assign.lhs);
                self.resolve_expr(&mut assign.rhs);
            }
            Expr::Call(call) => self.resolve_call(call),
            Expr::Unary(_, operand) => self.resolve_expr(operand),
            Expr::Binary(_, left, right) => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
        }
    }

    fn resolve_call(&mut self, call: &mut CallExpr) {
        self.resolve_id_use(&mut call.id);
        for arg in &mut call.args {
            self.resolve_expr(arg);
        }
    }

    fn resolve_id_use(&mut self, id: &mut Id) {
        match self.table.lookup_global(&id.name) {
            Ok(Some(sym)) => {
                let sym = sym.clone();
                id.struct_decl = sym.struct_decl;
                id.sym = Some(sym);
            }
            Ok(None) => {
                self.diag
                    .fatal(id.loc.line, id.loc.column, "Undeclared identifier");
            }
            Err(_) => {}
        }
    }

    /// Determine the struct whose member table the right side of a
    /// dot-access must be looked up in.
    ///
    /// The left side has already been resolved. An identifier that failed
    /// to resolve aborts silently (the failure is already reported); an
    /// identifier bound to a non-struct symbol is reported here. For a
    /// nested dot-access the chain is walked again from the root, stepping
    /// through one member table per link; any missing link aborts silently.
    fn chain_struct(&mut self, loc: &Expr) -> Option<StructId> {
        match loc {
            Expr::Id(id) => {
                let sym = id.sym.as_ref()?;
                if sym.struct_decl.is_none() {
                    self.diag.fatal(
                        id.loc.line,
                        id.loc.column,
                        "Dot-access of non-struct type",
                    );
                }
                sym.struct_decl
            }
            Expr::Dot(inner, field) => {
                let sid = self.chain_struct(inner)?;
                self.structs
                    .get(sid)
                    .members
                    .lookup_global(&field.name)
                    .ok()
                    .flatten()
                    .and_then(|sym| sym.struct_decl)
            }
            _ => None,
        }
    }

    /// Bind `sym` to `id` in the current scope, or in a struct's member
    /// table. On success the symbol is also attached to the declared id so
    /// that the unparser can annotate it. Returns whether the binding took.
    fn install(&mut self, id: &mut Id, sym: Sym, member_of: Option<StructId>) -> bool {
        let result = match member_of {
            Some(sid) => self.structs.get_mut(sid).members.add(&id.name, sym.clone()),
            None => self.table.add(&id.name, sym.clone()),
        };

        match result {
            Ok(()) => {
                id.sym = Some(sym);
                true
            }
            Err(SymTableError::Duplicate) => {
                self.diag.fatal(
                    id.loc.line,
                    id.loc.column,
                    "Multiply declared identifier",
                );
                false
            }
            // The walk never sees an empty table or an empty name.
            Err(_) => false,
        }
    }
}
