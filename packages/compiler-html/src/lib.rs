//! # Maildraft HTML Compiler
//!
//! Compiles a block sequence into a standalone HTML email. Layout is
//! built from nested presentation tables and inline styles only, since
//! mail clients drop stylesheets and ignore flexbox.

mod compiler;


pub use compiler::{compile, compile_to_html, CompileError, CompileOptions, HtmlCompiler};
