//! Thin wrapper around the `openscad-ast` front end, caching the most
//! recent parse of a document so the rest of the server can re-use it
//! between requests (diagnostics, hover, symbols).

use openscad_ast::Ast;

pub struct OpenscadParser {
    last_ast: Option<Ast>,
}

impl OpenscadParser {
    pub fn new() -> Self {
        Self { last_ast: None }
    }

    /// Parses `text`, caching the AST on success and returning the
    /// diagnostics to publish (empty on success).
    pub fn parse(&mut self, text: &str) -> Vec<Diagnostic> {
        match openscad_ast::parse(text) {
            Ok(ast) => {
                self.last_ast = Some(ast);
                Vec::new()
            }
            Err(err) => {
                self.last_ast = None;
                vec![Diagnostic::from_ast_error(&err)]
            }
        }
    }

    pub fn last_ast(&self) -> Option<&Ast> {
        self.last_ast.as_ref()
    }
}

impl Default for OpenscadParser {
    fn default() -> Self {
        Self::new()
    }
}

/// A position-less diagnostic derived from an [`openscad_ast::AstError`].
///
/// Byte offsets for parse failures live inside the error message rather
/// than a structured field today, so the server reports a whole-document
/// diagnostic; see `document_store` for how this is turned into an LSP
/// `Range`.
pub struct Diagnostic {
    pub message: String,
}

impl Diagnostic {
    fn from_ast_error(err: &openscad_ast::AstError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}
