//! # Introduction
//!
//! `cmmc` is the front end of a compiler for C--, a small C-like teaching
//! language with integers, booleans, structs, functions, I/O statements,
//! and structured control flow. It turns source text into an abstract
//! syntax tree annotated with symbol-table information, ready for a later
//! type-checking and code-generation pass.
//!
//! ## Compilation pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Name resolver → annotated AST → Unparser
//! ```
//!
//! 1. [`parser::lexer`] — tokenises the source, validating literals and
//!    tracking line/column positions.
//! 2. [`parser::parser`] — builds the AST; stops at the first syntax error.
//! 3. [`sema`] — installs declarations in a scoped symbol table, resolves
//!    every identifier use, and links struct fields through per-struct
//!    member tables.
//! 4. [`unparse`] — re-emits the annotated tree in canonical form; this is
//!    the output contract with downstream tooling.
//!
//! All diagnostics flow through one [`diag::Diagnostics`] sink as
//! `line:column ***ERROR*** message` records in call order. Lexical and
//! name-resolution errors are recovered locally so one run surfaces as
//! many of them as possible; a syntax error ends the compilation.

pub mod diag;
pub mod parser;
pub mod sema;
pub mod unparse;

use diag::Diagnostics;
use parser::ast::Program;
use parser::lexer::Lexer;
use parser::parser::{ParseError, Parser};
use sema::resolve::{resolve_program, StructArena};

/// Run the full front end over `source`.
///
/// On success the returned program is annotated with resolved symbols and
/// the arena holds the struct member tables those annotations refer to.
/// Recoverable errors are reported through `diag` without failing the
/// call; check [`Diagnostics::errors_occurred`] afterwards.
pub fn compile(source: &str, diag: &mut Diagnostics) -> Result<(Program, StructArena), ParseError> {
    let tokens = Lexer::new(source).tokenize(diag);
    let mut program = Parser::new(tokens, diag).parse_program()?;
    let structs = resolve_program(&mut program, diag);
    Ok((program, structs))
}
