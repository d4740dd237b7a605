//! Single pass compiler from class source to stack machine code.
//!
//! Parsing and code generation are interleaved. Each grammar
//! production consumes its tokens and writes its instructions
//! in the same step, so no syntax tree is built. An XML rendering
//! of the parse tree can be recorded along the way.
mod class;
mod expr;
mod stmts;

use smol_str::SmolStr;

use crate::{
    conf::JackConf,
    error::{JackResult, NameError},
    lex::{Keyword, Lexer, Symbol, Token, TokenKind, TokenStream},
    symbol::{Kind, SymbolRow, SymbolTable, MAX_PER_KIND},
    vm::VmWriter,
    xml::{Category, Usage, XmlTree},
};

/// Runtime library subroutines the generated code depends on.
mod runtime {
    pub const MULTIPLY: &str = "Math.multiply";
    pub const DIVIDE: &str = "Math.divide";
    pub const ALLOC: &str = "Memory.alloc";
    pub const STRING_NEW: &str = "String.new";
    pub const STRING_APPEND_CHAR: &str = "String.appendChar";
}

/// Deepest nesting of terms and statement blocks.
pub const MAX_NESTING: usize = 256;

/// Compiles one class.
pub struct Compiler<'a> {
    stream: TokenStream<'a>,
    writer: VmWriter,
    /// Parse tree listing, when requested.
    tree: Option<XmlTree>,
    /// Name of the class being compiled, known after the class header.
    class_name: SmolStr,
    /// Static and field variables, for the whole class.
    class_table: SymbolTable,
    /// Arguments and locals, for the current subroutine.
    subroutine_table: SymbolTable,
    /// Monotonically increasing label counter, never reset
    /// within a class.
    label_counter: usize,
    /// Current nesting of terms and blocks.
    depth: usize,
}

impl<'a> Compiler<'a> {
    pub fn new(lexer: Lexer<'a>, conf: &JackConf) -> Self {
        Self {
            stream: TokenStream::new(lexer),
            writer: VmWriter::with_indent(conf.indent),
            tree: None,
            class_name: SmolStr::default(),
            class_table: SymbolTable::new(),
            subroutine_table: SymbolTable::new(),
            label_counter: 0,
            depth: 0,
        }
    }

    /// Also record the parse tree as XML.
    ///
    /// Annotated trees describe every identifier by its
    /// category, index and usage.
    pub fn with_tree(mut self, annotate: bool) -> Self {
        self.tree = Some(XmlTree::new(annotate));
        self
    }

    pub fn class_name(&self) -> &str {
        self.class_name.as_str()
    }

    pub fn class_table(&self) -> &SymbolTable {
        &self.class_table
    }

    /// Symbols of the most recently compiled subroutine.
    pub fn subroutine_table(&self) -> &SymbolTable {
        &self.subroutine_table
    }

    /// Instructions generated so far.
    pub fn code(&self) -> &str {
        self.writer.code()
    }

    pub fn into_code(self) -> String {
        self.writer.into_code()
    }

    /// Parse tree recorded so far, if enabled.
    pub fn tree(&self) -> Option<&XmlTree> {
        self.tree.as_ref()
    }

    pub fn into_tree(self) -> Option<XmlTree> {
        self.tree
    }
}

/// Tokens
///
/// Every token is consumed through these helpers so the parse tree
/// sees it. Identifiers are the exception: they're recorded by the
/// production, which knows what they name.
impl<'a> Compiler<'a> {
    /// Consume the next token regardless of kind.
    fn advance(&mut self) -> JackResult<Token> {
        let token = self.stream.next_token()?;
        self.record_token(&token)?;
        Ok(token)
    }

    fn expect(&mut self, kind: TokenKind) -> JackResult<Token> {
        let token = self.stream.consume(kind)?;
        self.record_token(&token)?;
        Ok(token)
    }

    #[inline]
    fn keyword(&mut self, keyword: Keyword) -> JackResult<Token> {
        self.expect(TokenKind::Keyword(keyword))
    }

    #[inline]
    fn symbol(&mut self, symbol: Symbol) -> JackResult<Token> {
        self.expect(TokenKind::Symbol(symbol))
    }

    fn match_kind(&mut self, kind: TokenKind) -> JackResult<bool> {
        if self.stream.peek_kind()? == kind {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    #[inline]
    fn match_symbol(&mut self, symbol: Symbol) -> JackResult<bool> {
        self.match_kind(TokenKind::Symbol(symbol))
    }

    #[inline]
    fn peek_is_symbol(&mut self, symbol: Symbol) -> JackResult<bool> {
        Ok(self.stream.peek_kind()?.is_symbol(symbol))
    }

    /// Consume an identifier, left for the caller to record.
    #[inline]
    fn ident(&mut self) -> JackResult<Token> {
        self.stream.consume(TokenKind::Ident)
    }

    #[inline]
    fn text(&self, token: &Token) -> &'a str {
        self.stream.text(token)
    }

    /// Consume a type name: a primitive, a class name, or
    /// `void` when allowed.
    fn type_name(&mut self, allow_void: bool) -> JackResult<&'a str> {
        let token = self.advance()?;

        match token.kind {
            TokenKind::Keyword(k) if k.is_primitive_type() => Ok(k.as_str()),
            TokenKind::Keyword(Keyword::Void) if allow_void => Ok(Keyword::Void.as_str()),
            TokenKind::Ident => {
                let name = self.text(&token);
                self.record_ident(name, Category::Class, Usage::Using)?;
                Ok(name)
            }
            _ if allow_void => Err(self.stream.unexpected(&token, "type or 'void'")),
            _ => Err(self.stream.unexpected(&token, "type")),
        }
    }
}

/// Parse tree
impl<'a> Compiler<'a> {
    fn record_token(&mut self, token: &Token) -> JackResult<()> {
        let source = self.stream.source_code();
        if let Some(tree) = self.tree.as_mut() {
            if token.kind != TokenKind::Ident {
                tree.token(token.kind, token.text(source))?;
            }
        }
        Ok(())
    }

    fn record_ident(&mut self, name: &str, category: Category, usage: Usage) -> JackResult<()> {
        if let Some(tree) = self.tree.as_mut() {
            tree.ident(name, category, usage)?;
        }
        Ok(())
    }

    fn record_var(&mut self, row: &SymbolRow, usage: Usage) -> JackResult<()> {
        let category = Category::Var {
            kind: row.kind,
            index: row.index,
        };
        self.record_ident(&row.name, category, usage)
    }

    fn open(&mut self, tag: &str) -> JackResult<()> {
        if let Some(tree) = self.tree.as_mut() {
            tree.open(tag)?;
        }
        Ok(())
    }

    fn close(&mut self, tag: &str) -> JackResult<()> {
        if let Some(tree) = self.tree.as_mut() {
            tree.close(tag)?;
        }
        Ok(())
    }
}

/// Scopes
impl<'a> Compiler<'a> {
    /// Define the variable named by the token in the scope its
    /// kind belongs to.
    fn declare(&mut self, token: &Token, ty: &str, kind: Kind) -> JackResult<()> {
        let name = self.text(token);
        let table = match kind {
            Kind::Static | Kind::Field => &mut self.class_table,
            Kind::Argument | Kind::Local => &mut self.subroutine_table,
        };

        let Some(row) = table.define(name, ty, kind).cloned() else {
            let expected = format!("at most {MAX_PER_KIND} {kind} variables");
            return Err(self.stream.unexpected(token, expected));
        };

        self.record_var(&row, Usage::Definition)
    }

    /// Find a variable, preferring the subroutine scope over the
    /// class scope.
    fn lookup(&self, name: &str) -> Option<&SymbolRow> {
        self.subroutine_table
            .get(name)
            .or_else(|| self.class_table.get(name))
    }

    /// Find the variable named by the token, which must exist.
    fn resolve_var(&self, token: &Token) -> JackResult<SymbolRow> {
        let name = self.text(token);
        match self.lookup(name) {
            Some(row) => Ok(row.clone()),
            None => Err(NameError::new(self.stream.source_code(), token.span, name).into()),
        }
    }

    fn push_var(&mut self, row: &SymbolRow) -> JackResult<()> {
        self.writer.push(row.kind.segment(), row.index.into())
    }

    fn pop_var(&mut self, row: &SymbolRow) -> JackResult<()> {
        self.writer.pop(row.kind.segment(), row.index.into())
    }

    /// Reserve a number for a pair of branch labels, unique within
    /// the class.
    fn next_label_id(&mut self) -> usize {
        let id = self.label_counter;
        self.label_counter += 1;
        id
    }

    /// Run a recursive production one nesting level deeper.
    ///
    /// The token is blamed when the limit is reached.
    fn nested<T>(
        &mut self,
        token: &Token,
        production: impl FnOnce(&mut Self) -> JackResult<T>,
    ) -> JackResult<T> {
        if self.depth >= MAX_NESTING {
            let expected = format!("at most {MAX_NESTING} levels of nesting");
            return Err(self.stream.unexpected(token, expected));
        }

        self.depth += 1;
        let result = production(self);
        self.depth -= 1;

        result
    }
}
