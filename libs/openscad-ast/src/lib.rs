//! # OpenSCAD AST
//!
//! Abstract Syntax Tree types for OpenSCAD.
//!
//! ## Architecture
//!
//! This crate defines the tree shape that the rest of the pipeline is
//! built around: [`Ast`], [`Statement`], [`Expression`], and their
//! supporting types. Producing that tree from source text — lexing,
//! parsing, recovering from syntax errors — is a separate concern left to
//! whichever front end embeds this crate; nothing here depends on a
//! concrete parser.
//!
//! ```text
//! source text → (external parser) → Ast (this crate) → openscad-eval
//! ```

pub mod ast;
pub mod cst;
pub mod cst_parser;
pub mod diagnostic;
pub mod error;
pub mod span;
pub mod visitor;

pub use ast::{
    Argument, Ast, BinaryOp, CustomizerAnnotation, Expression, Modifier, Parameter, Statement,
    UnaryOp,
};
pub use diagnostic::{Diagnostic, Severity};
pub use error::AstError;
pub use span::Span;

/// Parses OpenSCAD source text into an [`Ast`] using the bundled
/// pure-Rust lexer/parser (`openscad-parser`).
///
/// A browser host that already has a web-tree-sitter CST in hand should
/// go through [`cst_parser::parse_from_cst`] instead; this entry point
/// is for anything that can link a native Rust parser.
pub fn parse(source: &str) -> Result<Ast, AstError> {
    let cst = openscad_parser::parse(source);
    visitor::cst_to_ast::transform(&cst)
}
