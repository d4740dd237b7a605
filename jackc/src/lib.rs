pub mod compiler;
pub mod conf;
pub mod error;
pub mod lex;
pub mod symbol;
pub mod vm;
pub mod xml;

use self::{compiler::Compiler, lex::Lexer};

pub const IMPL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compile the source of one class into stack machine code,
/// using the default configuration.
pub fn compile_str(source_code: &str) -> JackResult<String> {
    compile_with(source_code, &JackConf::default())
}

/// Compile the source of one class into stack machine code.
///
/// Compilation stops at the first error. No code is
/// returned for a class that fails.
pub fn compile_with(source_code: &str, conf: &JackConf) -> JackResult<String> {
    let mut compiler = Compiler::new(Lexer::new(source_code), conf);
    compiler.compile_class()?;
    Ok(compiler.into_code())
}

/// Render the parse tree of one class as XML.
///
/// Annotated trees describe each identifier by its category,
/// running index and whether it is being defined or used.
pub fn parse_tree_xml(source_code: &str, annotate: bool) -> JackResult<String> {
    let mut compiler =
        Compiler::new(Lexer::new(source_code), &JackConf::default()).with_tree(annotate);
    compiler.compile_class()?;
    Ok(compiler
        .into_tree()
        .map(xml::XmlTree::into_string)
        .unwrap_or_default())
}

/// Write the XML token listing of the source into a new string.
pub fn tokens_xml(source_code: &str) -> JackResult<String> {
    let mut buf = String::new();
    lex::write_tokens_xml(source_code, &mut buf)?;
    Ok(buf)
}

pub use self::{
    conf::JackConf,
    error::{JackError, JackResult, LexError, LexErrorKind, NameError, SourceLine, SyntaxError},
};

pub mod prelude {
    pub use super::{
        compile_str, compile_with, parse_tree_xml,
        compiler::Compiler,
        conf::JackConf,
        error::{JackError, JackResult},
        lex::{Lexer, TokenStream},
        symbol::{Kind, SymbolTable},
        vm::VmWriter,
    };
}
