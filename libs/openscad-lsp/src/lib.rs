//! # OpenSCAD Language Server
//!
//! Language Server Protocol implementation for OpenSCAD, built on
//! `tower-lsp` and the `openscad-ast` front end.
//!
//! ## Features
//!
//! - Syntax diagnostics
//! - Document tracking across edits
//!
//! ## Usage
//!
//! ```rust,ignore
//! use openscad_lsp::run_server;
//!
//! #[tokio::main]
//! async fn main() {
//!     run_server().await;
//! }
//! ```

pub mod document_store;
pub mod parser;
pub mod server;

pub use server::Backend;

/// Runs the language server over stdio.
pub async fn run_server() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = tower_lsp::LspService::new(Backend::new);

    tower_lsp::Server::new(stdin, stdout, socket)
        .serve(service)
        .await;
}
