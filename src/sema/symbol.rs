//! Symbols and the scoped symbol table
//!
//! A [`Sym`] describes one declared name: a variable (with its type
//! spelling), a function (return type and parameter types), or a struct
//! type. Struct-typed variable symbols and struct-type symbols carry a
//! [`StructId`] into the resolver's struct arena so that dot-access can
//! find the member scope without re-resolving by name.
//!
//! The [`SymTable`] is a stack of name→symbol maps. Names are unique within
//! a scope; lookups either stay in the innermost scope or walk outward.

use rustc_hash::FxHashMap;
use std::fmt;
use thiserror::Error;

/// Stable index of a struct declaration in the resolver's arena.
///
/// Symbols and identifier nodes both refer to struct declarations through
/// this index, which keeps the symbol/declaration reference cycle unowned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructId(pub usize);

/// What kind of entity a symbol names.
#[derive(Debug, Clone, PartialEq)]
pub enum SymKind {
    /// A variable, with the spelling of its declared type.
    Var { ty: String },
    /// A function, with its return type and parameter type spellings.
    Fn { ret: String, params: Vec<String> },
    /// A struct type declaration.
    Struct,
}

/// One entry in a symbol-table scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Sym {
    pub kind: SymKind,
    /// For a struct-typed variable or a struct type: its declaration.
    pub struct_decl: Option<StructId>,
}

impl Sym {
    /// A variable symbol of the given type spelling.
    pub fn var(ty: &str) -> Self {
        Sym {
            kind: SymKind::Var { ty: ty.to_string() },
            struct_decl: None,
        }
    }

    /// A function symbol.
    pub fn func(ret: &str, params: Vec<String>) -> Self {
        Sym {
            kind: SymKind::Fn {
                ret: ret.to_string(),
                params,
            },
            struct_decl: None,
        }
    }

    /// A struct type symbol pointing at its declaration.
    pub fn struct_type(decl: StructId) -> Self {
        Sym {
            kind: SymKind::Struct,
            struct_decl: Some(decl),
        }
    }
}

impl fmt::Display for Sym {
    /// The annotation the unparser prints after a resolved identifier:
    /// `int` for variables, `int, bool->void` (or `->void`) for functions,
    /// `structdecl` for struct types.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SymKind::Var { ty } => f.write_str(ty),
            SymKind::Fn { ret, params } => {
                if params.is_empty() {
                    write!(f, "->{}", ret)
                } else {
                    write!(f, "{}->{}", params.join(", "), ret)
                }
            }
            SymKind::Struct => f.write_str("structdecl"),
        }
    }
}

/// Ways a symbol-table operation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SymTableError {
    /// The table has no scope at all.
    #[error("symbol table has no scope")]
    Empty,
    /// The name is already bound in the innermost scope.
    #[error("name already declared in this scope")]
    Duplicate,
    /// The name is not a usable key.
    #[error("illegal name argument")]
    IllegalArgument,
}

/// A stack of scopes mapping names to symbols.
///
/// A fresh table holds a single empty scope (the global scope). The last
/// element of the stack is the innermost scope.
#[derive(Debug, Clone)]
pub struct SymTable {
    scopes: Vec<FxHashMap<String, Sym>>,
}

impl SymTable {
    pub fn new() -> Self {
        SymTable {
            scopes: vec![FxHashMap::default()],
        }
    }

    /// Enter a new innermost scope.
    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Leave the innermost scope.
    pub fn pop_scope(&mut self) -> Result<(), SymTableError> {
        self.scopes.pop().map(|_| ()).ok_or(SymTableError::Empty)
    }

    /// Bind `name` in the innermost scope.
    pub fn add(&mut self, name: &str, sym: Sym) -> Result<(), SymTableError> {
        if name.is_empty() {
            return Err(SymTableError::IllegalArgument);
        }
        let scope = self.scopes.last_mut().ok_or(SymTableError::Empty)?;
        if scope.contains_key(name) {
            return Err(SymTableError::Duplicate);
        }
        scope.insert(name.to_string(), sym);
        Ok(())
    }

    /// Look `name` up in the innermost scope only.
    pub fn lookup_local(&self, name: &str) -> Result<Option<&Sym>, SymTableError> {
        let scope = self.scopes.last().ok_or(SymTableError::Empty)?;
        Ok(scope.get(name))
    }

    /// Look `name` up walking scopes innermost-out; the first match wins.
    pub fn lookup_global(&self, name: &str) -> Result<Option<&Sym>, SymTableError> {
        if self.scopes.is_empty() {
            return Err(SymTableError::Empty);
        }
        for scope in self.scopes.iter().rev() {
            if let Some(sym) = scope.get(name) {
                return Ok(Some(sym));
            }
        }
        Ok(None)
    }

    /// Number of scopes currently on the stack.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Debug dump of every scope, innermost first. Entries are sorted by
    /// name so the output is stable.
    pub fn dump(&self) -> String {
        let mut out = String::from("\nSym Table\n\n");
        for scope in self.scopes.iter().rev() {
            let mut entries: Vec<_> = scope.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (name, sym)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&format!("{}={}", name, sym));
            }
            out.push_str("}\n");
        }
        out.push('\n');
        out
    }
}

impl Default for SymTable {
    fn default() -> Self {
        Self::new()
    }
}
