//! Name analysis for C-- programs
//!
//! This module binds identifier uses to declarations:
//! - [`symbol`]: symbols and the scoped symbol table
//! - [`resolve`]: the AST walk that installs declarations, enforces scoping
//!   rules, and links every identifier occurrence to its symbol
//!
//! # Scoping model
//!
//! The table starts with a single global scope. A new scope is pushed for
//! each function (formals and body share it) and for every `if`, `else`,
//! `while`, and `repeat` block. Struct types and ordinary identifiers share
//! one namespace, but each declared struct owns a separate, persistent
//! member table that dot-access expressions consult.

pub mod resolve;
pub mod symbol;
