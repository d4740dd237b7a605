//! Class and subroutine declarations.
use std::fmt;

use log::debug;

use super::{runtime, Compiler};
use crate::{
    error::JackResult,
    lex::{Keyword, Symbol, TokenKind},
    symbol::Kind,
    vm::Segment,
    xml::{Category, Usage},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

impl SubroutineKind {
    fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Keyword(Keyword::Constructor) => Some(Self::Constructor),
            TokenKind::Keyword(Keyword::Function) => Some(Self::Function),
            TokenKind::Keyword(Keyword::Method) => Some(Self::Method),
            _ => None,
        }
    }
}

impl fmt::Display for SubroutineKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Constructor => write!(f, "constructor"),
            Self::Function => write!(f, "function"),
            Self::Method => write!(f, "method"),
        }
    }
}

fn class_var_kind(kind: TokenKind) -> Option<Kind> {
    match kind {
        TokenKind::Keyword(Keyword::Static) => Some(Kind::Static),
        TokenKind::Keyword(Keyword::Field) => Some(Kind::Field),
        _ => None,
    }
}

impl<'a> Compiler<'a> {
    /// Compile one class, which must make up the whole source.
    ///
    /// ```text
    /// class Name { classVarDec* subroutineDec* }
    /// ```
    pub fn compile_class(&mut self) -> JackResult<()> {
        self.open("class")?;
        self.keyword(Keyword::Class)?;

        let name = self.ident()?;
        let name = self.text(&name);
        self.class_name = name.into();
        self.record_ident(name, Category::Class, Usage::Definition)?;
        debug!("compiling class {}", self.class_name);

        self.symbol(Symbol::LeftBrace)?;

        while let Some(kind) = class_var_kind(self.stream.peek_kind()?) {
            self.class_var_dec(kind)?;
        }

        while let Some(kind) = SubroutineKind::from_token(self.stream.peek_kind()?) {
            self.subroutine_dec(kind)?;
        }

        let token = self.advance()?;
        if !token.kind.is_symbol(Symbol::RightBrace) {
            return Err(self
                .stream
                .unexpected(&token, "subroutine declaration or '}'"));
        }
        self.close("class")?;

        // Nothing may follow the class.
        let token = self.advance()?;
        if token.kind != TokenKind::EOF {
            return Err(self.stream.unexpected(&token, "end-of-file"));
        }

        Ok(())
    }

    /// ```text
    /// (static | field) type name (, name)* ;
    /// ```
    fn class_var_dec(&mut self, kind: Kind) -> JackResult<()> {
        self.open("classVarDec")?;
        self.advance()?;
        let ty = self.type_name(false)?;

        loop {
            let name = self.ident()?;
            self.declare(&name, ty, kind)?;

            if !self.match_symbol(Symbol::Comma)? {
                break;
            }
        }

        self.symbol(Symbol::Semicolon)?;
        self.close("classVarDec")
    }

    /// ```text
    /// (constructor | function | method) (void | type) name ( parameterList ) body
    /// ```
    fn subroutine_dec(&mut self, kind: SubroutineKind) -> JackResult<()> {
        self.open("subroutineDec")?;
        self.advance()?;
        self.subroutine_table.reset();

        let _return_type = self.type_name(true)?;
        let name = self.ident()?;
        let name = self.text(&name);
        self.record_ident(name, Category::Subroutine, Usage::Definition)?;

        let full_name = format!("{}.{}", self.class_name, name);
        debug!("compiling {kind} {full_name}");

        // The receiver is passed as the hidden first argument.
        if kind == SubroutineKind::Method {
            self.subroutine_table
                .define(Keyword::This.as_str(), &self.class_name, Kind::Argument);
        }

        self.symbol(Symbol::LeftParen)?;
        self.parameter_list()?;
        self.symbol(Symbol::RightParen)?;

        self.open("subroutineBody")?;
        self.symbol(Symbol::LeftBrace)?;

        while self.stream.peek_kind()?.is_keyword(Keyword::Var) {
            self.var_dec()?;
        }

        // The local count is only known after all declarations.
        let n_locals = self.subroutine_table.count_of(Kind::Local);
        self.writer.function(&full_name, n_locals.into())?;

        match kind {
            SubroutineKind::Constructor => {
                let n_fields = self.class_table.count_of(Kind::Field);
                self.writer.push(Segment::Constant, n_fields.into())?;
                self.writer.call(runtime::ALLOC, 1)?;
                self.writer.pop(Segment::Pointer, 0)?;
            }
            SubroutineKind::Method => {
                self.writer.push(Segment::Argument, 0)?;
                self.writer.pop(Segment::Pointer, 0)?;
            }
            SubroutineKind::Function => {}
        }

        self.statements()?;
        self.end_block()?;

        self.close("subroutineBody")?;
        self.close("subroutineDec")
    }

    /// ```text
    /// (type name (, type name)*)?
    /// ```
    fn parameter_list(&mut self) -> JackResult<()> {
        self.open("parameterList")?;

        if !self.peek_is_symbol(Symbol::RightParen)? {
            loop {
                let ty = self.type_name(false)?;
                let name = self.ident()?;
                self.declare(&name, ty, Kind::Argument)?;

                if !self.match_symbol(Symbol::Comma)? {
                    break;
                }
            }
        }

        self.close("parameterList")
    }

    /// ```text
    /// var type name (, name)* ;
    /// ```
    fn var_dec(&mut self) -> JackResult<()> {
        self.open("varDec")?;
        self.keyword(Keyword::Var)?;
        let ty = self.type_name(false)?;

        loop {
            let name = self.ident()?;
            self.declare(&name, ty, Kind::Local)?;

            if !self.match_symbol(Symbol::Comma)? {
                break;
            }
        }

        self.symbol(Symbol::Semicolon)?;
        self.close("varDec")
    }
}
