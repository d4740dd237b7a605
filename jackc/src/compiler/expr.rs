//! Expressions, terms and subroutine calls.
use log::trace;

use super::{runtime, Compiler};
use crate::{
    error::JackResult,
    lex::{Keyword, Symbol, Token, TokenKind},
    vm::{ArithOp, Segment},
    xml::{Category, Usage},
};

/// Code emitted for a binary operator.
#[derive(Debug, Clone, Copy)]
enum BinaryOp {
    Arith(ArithOp),
    /// Operator implemented by the runtime library.
    Call(&'static str),
}

impl BinaryOp {
    #[rustfmt::skip]
    fn from_token(kind: TokenKind) -> Option<Self> {
        let TokenKind::Symbol(symbol) = kind else {
            return None;
        };

        match symbol {
            Symbol::Plus    => Some(Self::Arith(ArithOp::Add)),
            Symbol::Minus   => Some(Self::Arith(ArithOp::Sub)),
            Symbol::Amp     => Some(Self::Arith(ArithOp::And)),
            Symbol::Pipe    => Some(Self::Arith(ArithOp::Or)),
            Symbol::Less    => Some(Self::Arith(ArithOp::Lt)),
            Symbol::Greater => Some(Self::Arith(ArithOp::Gt)),
            Symbol::Eq      => Some(Self::Arith(ArithOp::Eq)),
            Symbol::Star    => Some(Self::Call(runtime::MULTIPLY)),
            Symbol::Slash   => Some(Self::Call(runtime::DIVIDE)),
            _ => None,
        }
    }
}

impl<'a> Compiler<'a> {
    /// ```text
    /// term (op term)*
    /// ```
    ///
    /// Operators have no precedence. The operands are
    /// combined strictly left to right.
    pub(super) fn expression(&mut self) -> JackResult<()> {
        self.open("expression")?;
        self.term()?;

        while let Some(op) = BinaryOp::from_token(self.stream.peek_kind()?) {
            self.advance()?;
            self.term()?;

            match op {
                BinaryOp::Arith(op) => self.writer.arithmetic(op)?,
                BinaryOp::Call(name) => self.writer.call(name, 2)?,
            }
        }

        self.close("expression")
    }

    /// Terms recurse through parentheses and unary operators, so each
    /// one counts as a level of nesting.
    fn term(&mut self) -> JackResult<()> {
        let start = self.stream.peek()?.clone();
        self.nested(&start, |this| {
            this.open("term")?;
            this.term_inner()?;
            this.close("term")
        })
    }

    fn term_inner(&mut self) -> JackResult<()> {
        if self.stream.peek_kind()? == TokenKind::Ident {
            return self.ident_term();
        }

        let token = self.advance()?;

        match token.kind {
            TokenKind::Int => {
                let value = match self.text(&token).parse::<u32>() {
                    Ok(value) => value,
                    Err(_) => {
                        return Err(self
                            .stream
                            .unexpected(&token, "integer constant in 32-bit range"))
                    }
                };
                self.writer.push(Segment::Constant, value)?;
            }
            TokenKind::Str => {
                let text = self.text(&token);
                self.string_constant(text)?;
            }
            TokenKind::Keyword(Keyword::True) => {
                self.writer.push(Segment::Constant, 1)?;
                self.writer.arithmetic(ArithOp::Neg)?;
            }
            TokenKind::Keyword(Keyword::False) | TokenKind::Keyword(Keyword::Null) => {
                self.writer.push(Segment::Constant, 0)?;
            }
            TokenKind::Keyword(Keyword::This) => {
                self.writer.push(Segment::Pointer, 0)?;
            }
            TokenKind::Symbol(Symbol::LeftParen) => {
                self.expression()?;
                self.symbol(Symbol::RightParen)?;
            }
            TokenKind::Symbol(Symbol::Minus) => {
                self.term()?;
                self.writer.arithmetic(ArithOp::Neg)?;
            }
            TokenKind::Symbol(Symbol::Tilde) => {
                self.term()?;
                self.writer.arithmetic(ArithOp::Not)?;
            }
            _ => return Err(self.stream.unexpected(&token, "term")),
        }

        Ok(())
    }

    /// Variable read, array element read or subroutine call.
    fn ident_term(&mut self) -> JackResult<()> {
        let token = self.ident()?;

        match self.stream.peek_kind()? {
            TokenKind::Symbol(Symbol::LeftBracket) => {
                let array = self.resolve_var(&token)?;
                self.record_var(&array, Usage::Using)?;
                self.symbol(Symbol::LeftBracket)?;

                self.push_var(&array)?;
                self.expression()?;
                self.symbol(Symbol::RightBracket)?;
                self.writer.arithmetic(ArithOp::Add)?;

                self.writer.pop(Segment::Pointer, 1)?;
                self.writer.push(Segment::That, 0)?;
            }
            TokenKind::Symbol(Symbol::LeftParen) | TokenKind::Symbol(Symbol::Dot) => {
                self.subroutine_call(&token)?;
            }
            _ => {
                let var = self.resolve_var(&token)?;
                self.record_var(&var, Usage::Using)?;
                self.push_var(&var)?;
            }
        }

        Ok(())
    }

    /// Build a new string object, one character at a time.
    fn string_constant(&mut self, text: &str) -> JackResult<()> {
        let len = text.chars().count() as u32;
        self.writer.push(Segment::Constant, len)?;
        self.writer.call(runtime::STRING_NEW, 1)?;

        for c in text.chars() {
            self.writer.push(Segment::Constant, c as u32)?;
            self.writer.call(runtime::STRING_APPEND_CHAR, 2)?;
        }

        Ok(())
    }

    /// Compile a call whose leading identifier was already consumed.
    ///
    /// ```text
    /// name ( expressionList )
    /// (className | varName) . name ( expressionList )
    /// ```
    ///
    /// A qualifier that names a variable makes this a method call
    /// on that object, otherwise it names a class. An unqualified
    /// call is a method call on the current object.
    pub(super) fn subroutine_call(&mut self, head: &Token) -> JackResult<()> {
        let head = self.text(head);

        let (name, receivers) = if self.peek_is_symbol(Symbol::Dot)? {
            let receiver = self.lookup(head).cloned();
            match &receiver {
                Some(var) => self.record_var(var, Usage::Using)?,
                None => self.record_ident(head, Category::Class, Usage::Using)?,
            }
            self.symbol(Symbol::Dot)?;

            let method = self.ident()?;
            let method = self.text(&method);
            self.record_ident(method, Category::Subroutine, Usage::Using)?;

            match receiver {
                Some(var) => {
                    self.push_var(&var)?;
                    (format!("{}.{method}", var.ty), 1)
                }
                None => (format!("{head}.{method}"), 0),
            }
        } else {
            self.record_ident(head, Category::Subroutine, Usage::Using)?;
            self.writer.push(Segment::Pointer, 0)?;
            (format!("{}.{head}", self.class_name), 1)
        };

        self.symbol(Symbol::LeftParen)?;
        let n_args = receivers + self.expression_list()?;
        self.symbol(Symbol::RightParen)?;

        trace!("call {name} with {n_args} arguments");
        self.writer.call(&name, n_args)
    }

    /// Compile comma separated arguments, returning how many.
    fn expression_list(&mut self) -> JackResult<u32> {
        self.open("expressionList")?;

        let mut count = 0;
        if !self.peek_is_symbol(Symbol::RightParen)? {
            loop {
                self.expression()?;
                count += 1;

                if !self.match_symbol(Symbol::Comma)? {
                    break;
                }
            }
        }

        self.close("expressionList")?;
        Ok(count)
    }
}
